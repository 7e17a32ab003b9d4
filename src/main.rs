use std::net::SocketAddr;
use std::sync::Arc;

use argh::FromArgs;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trello_e2e::sandbox::{API_PREFIX, SandboxState, create_app};

#[derive(FromArgs, Debug)]
/// trello-e2e: serve the in-memory sandbox the API suites can run against.
struct Args {
    /// host to bind to
    #[argh(option, default = "String::from(\"127.0.0.1\")")]
    host: String,

    /// port to listen on (0 for random available port)
    #[argh(option, short = 'p', default = "0")]
    port: u16,

    /// API key clients must send
    #[argh(option, default = "String::from(\"sandbox-key\")")]
    key: String,

    /// API token clients must send
    #[argh(option, default = "String::from(\"sandbox-token\")")]
    token: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trello_e2e=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Args = argh::from_env();

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    tracing::info!("http://{}{}", actual_addr, API_PREFIX);
    tracing::info!(
        "point the suites here with TRELLO_E2E_TARGET=live TRELLO_BASE_URL=http://{}{} and TRELLO_KEY/TRELLO_TOKEN set to --key/--token",
        actual_addr,
        API_PREFIX
    );

    let state = Arc::new(SandboxState::new(args.key, args.token));
    axum::serve(listener, create_app(state)).await?;

    Ok(())
}
