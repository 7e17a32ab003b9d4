//! An in-process stand-in for the board service.
//!
//! It keeps everything in memory and enforces the contract the suites
//! assert: auth query parameters, required names, organization name and
//! website rules, default lists, cascading board deletion and the service's
//! plain-text error bodies. Routes live under `/1` like the real API.

pub mod error;
pub mod handlers;
pub mod store;

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::Router;
use axum::middleware;
use axum::routing::{MethodRouter, get, post, put};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use crate::HarnessResult;
use crate::config::ApiConfig;
use crate::template::format_latency;

pub use error::{ApiError, ApiResult};
pub use store::Store;

/// Version prefix of every API route.
pub const API_PREFIX: &str = "/1";

pub struct SandboxState {
    pub key: String,
    pub token: String,
    store: Mutex<Store>,
}

pub type SharedSandboxState = Arc<SandboxState>;

impl SandboxState {
    pub fn new(key: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            token: token.into(),
            store: Mutex::new(Store::new()),
        }
    }

    pub fn store(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Registers `path` with and without a trailing slash.
fn route_both(
    router: Router<SharedSandboxState>,
    path: &str,
    method_router: MethodRouter<SharedSandboxState>,
) -> Router<SharedSandboxState> {
    router
        .route(path, method_router.clone())
        .route(&format!("{}/", path), method_router)
}

pub fn create_app(state: SharedSandboxState) -> Router {
    let mut api = Router::new();
    api = route_both(api, "/boards", post(handlers::create_board));
    api = route_both(
        api,
        "/boards/:id",
        get(handlers::get_board)
            .put(handlers::update_board)
            .delete(handlers::delete_board),
    );
    api = route_both(
        api,
        "/boards/:id/lists",
        get(handlers::board_lists).post(handlers::create_list),
    );
    api = route_both(api, "/boards/:id/cards", get(handlers::board_cards));
    api = route_both(api, "/lists/:id", get(handlers::get_list));
    api = route_both(api, "/lists/:id/closed", put(handlers::close_list));
    api = route_both(api, "/lists/:id/cards", get(handlers::list_cards));
    api = route_both(api, "/cards", post(handlers::create_card));
    api = route_both(
        api,
        "/cards/:id",
        get(handlers::get_card)
            .put(handlers::update_card)
            .delete(handlers::delete_card),
    );
    api = route_both(api, "/organizations", post(handlers::create_organization));
    api = route_both(
        api,
        "/organizations/:id",
        get(handlers::get_organization)
            .put(handlers::update_organization)
            .delete(handlers::delete_organization),
    );
    let api = api.route_layer(middleware::from_fn_with_state(
        state.clone(),
        handlers::require_credentials,
    ));

    Router::new()
        .nest(API_PREFIX, api)
        .route("/health", get(handlers::health_check))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    static REQUEST_ID: AtomicU64 = AtomicU64::new(1);
                    let request_id_num = REQUEST_ID.fetch_add(1, Ordering::Relaxed);
                    let generator = block_id::BlockId::new(
                        block_id::Alphabet::alphanumeric(),
                        1234,
                        5,
                    );
                    let request_id = generator
                        .encode_string(request_id_num)
                        .unwrap_or_else(|| request_id_num.to_string());
                    // The query carries credentials, so only the path is recorded
                    tracing::info_span!(
                        "request",
                        id = %request_id,
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                })
                .on_request(|request: &axum::http::Request<_>, _span: &Span| {
                    tracing::info!("-> {} {}", request.method(), request.uri().path());
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &Span| {
                        tracing::info!(
                            "<- {} latency={}",
                            response.status().as_u16(),
                            format_latency(latency)
                        );
                    },
                ),
        )
        .layer(CompressionLayer::new())
}

/// A sandbox served on a background task. Dropping it stops the server.
pub struct Sandbox {
    addr: SocketAddr,
    state: SharedSandboxState,
    server: JoinHandle<()>,
}

impl Sandbox {
    /// Serves a fresh sandbox on an ephemeral localhost port.
    pub async fn start(key: impl Into<String>, token: impl Into<String>) -> HarnessResult<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        Self::serve(listener, Arc::new(SandboxState::new(key, token)))
    }

    pub fn serve(listener: TcpListener, state: SharedSandboxState) -> HarnessResult<Self> {
        let addr = listener.local_addr()?;
        let app = create_app(state.clone());

        let server = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("sandbox server stopped: {}", e);
            }
        });

        tracing::debug!(%addr, "sandbox listening");
        Ok(Self {
            addr,
            state,
            server,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn base_url(&self) -> String {
        format!("http://{}{}", self.addr, API_PREFIX)
    }

    /// Configuration pointing a request template at this sandbox.
    pub fn config(&self) -> ApiConfig {
        ApiConfig::new(self.base_url(), &self.state.key, &self.state.token)
    }

    pub fn state(&self) -> &SharedSandboxState {
        &self.state
    }
}

impl Drop for Sandbox {
    fn drop(&mut self) {
        self.server.abort();
    }
}
