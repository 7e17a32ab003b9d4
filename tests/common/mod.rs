//! Shared setup for the API suites.
//!
//! Every suite gets its request template from [`test_api`], which targets a
//! fresh in-process sandbox unless live credentials are configured (see
//! `trello_e2e::config`).

use std::future::Future;
use std::sync::Arc;

use trello_e2e::{
    ApiConfig, HarnessResult, RequestTemplate, Sandbox, Scenario, Target, run_scenario,
    unique_name,
};

pub const SANDBOX_KEY: &str = "sandbox-key";
pub const SANDBOX_TOKEN: &str = "sandbox-token";

pub struct TestApi {
    pub target: Target,
    api: Arc<RequestTemplate>,
    sandbox: Option<Sandbox>,
}

impl TestApi {
    pub fn api(&self) -> Arc<RequestTemplate> {
        self.api.clone()
    }

    /// Organization names are unique across the whole live service, so live
    /// runs get a suffixed copy of `name`.
    pub fn org_name(&self, name: &str) -> String {
        match self.target {
            Target::Sandbox => name.to_string(),
            Target::Live => unique_name(name),
        }
    }

    /// Runs a scenario and, against a sandbox, checks nothing was left behind.
    pub async fn run<F, Fut>(&self, name: &str, body: F) -> HarnessResult<()>
    where
        F: FnOnce(Scenario) -> Fut,
        Fut: Future<Output = HarnessResult<()>> + Send + 'static,
    {
        let result = run_scenario(name, self.api(), body).await;
        self.assert_clean();
        result
    }

    pub fn assert_clean(&self) {
        if let Some(sandbox) = &self.sandbox {
            assert_eq!(
                sandbox.state().store().resource_count(),
                0,
                "scenario left resources behind"
            );
        }
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Resolves the target and builds the request template for one test.
pub async fn test_api() -> TestApi {
    init_tracing();

    let target = Target::from_env().expect("Invalid test target");
    match target {
        Target::Sandbox => {
            let (sandbox, api) = sandbox_api().await;
            TestApi {
                target,
                api,
                sandbox: Some(sandbox),
            }
        }
        Target::Live => {
            let config = ApiConfig::from_env().expect("Live target needs credentials");
            let api = RequestTemplate::from_config(&config).expect("Failed to build template");
            TestApi {
                target,
                api: Arc::new(api),
                sandbox: None,
            }
        }
    }
}

/// A fresh sandbox and a template pointed at it, regardless of the target.
pub async fn sandbox_api() -> (Sandbox, Arc<RequestTemplate>) {
    init_tracing();

    let sandbox = Sandbox::start(SANDBOX_KEY, SANDBOX_TOKEN)
        .await
        .expect("Failed to start sandbox");
    let api = RequestTemplate::from_config(&sandbox.config()).expect("Failed to build template");

    (sandbox, Arc::new(api))
}
