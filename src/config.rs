//! Environment-backed configuration for the API harness.
//!
//! Credentials are only ever read here; scenarios receive a built
//! [`RequestTemplate`](crate::template::RequestTemplate) instead.

use std::fmt;

use crate::{HarnessError, HarnessResult};

pub const DEFAULT_BASE_URL: &str = "https://api.trello.com/1";

pub const ENV_BASE_URL: &str = "TRELLO_BASE_URL";
pub const ENV_KEY: &str = "TRELLO_KEY";
pub const ENV_TOKEN: &str = "TRELLO_TOKEN";
pub const ENV_TARGET: &str = "TRELLO_E2E_TARGET";

/// Base URL and credentials of the service under test.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub key: String,
    pub token: String,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("key", &"<redacted>")
            .field("token", &"<redacted>")
            .finish()
    }
}

impl ApiConfig {
    pub fn new(
        base_url: impl Into<String>,
        key: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            key: key.into(),
            token: token.into(),
        }
    }

    pub fn from_env() -> HarnessResult<Self> {
        Self::from_parts(
            std::env::var(ENV_BASE_URL).ok(),
            std::env::var(ENV_KEY).ok(),
            std::env::var(ENV_TOKEN).ok(),
        )
    }

    fn from_parts(
        base_url: Option<String>,
        key: Option<String>,
        token: Option<String>,
    ) -> HarnessResult<Self> {
        let mut missing = Vec::new();

        let base_url = non_empty(base_url).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let key = non_empty(key).unwrap_or_else(|| {
            missing.push(ENV_KEY);
            String::new()
        });

        let token = non_empty(token).unwrap_or_else(|| {
            missing.push(ENV_TOKEN);
            String::new()
        });

        if !missing.is_empty() {
            return Err(HarnessError::Config(format!(
                "missing {}",
                missing.join(", ")
            )));
        }

        Ok(Self::new(base_url, key, token))
    }
}

/// Where the suites send their requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// An in-process [`Sandbox`](crate::sandbox::Sandbox), fresh per test.
    Sandbox,
    /// The real service, configured by [`ApiConfig::from_env`].
    Live,
}

impl Target {
    pub fn from_env() -> HarnessResult<Self> {
        let has_credentials = non_empty(std::env::var(ENV_KEY).ok()).is_some()
            && non_empty(std::env::var(ENV_TOKEN).ok()).is_some();
        Self::resolve(std::env::var(ENV_TARGET).ok().as_deref(), has_credentials)
    }

    fn resolve(explicit: Option<&str>, has_credentials: bool) -> HarnessResult<Self> {
        match explicit.map(str::trim) {
            Some("sandbox") => Ok(Target::Sandbox),
            Some("live") => Ok(Target::Live),
            None | Some("") if has_credentials => Ok(Target::Live),
            None | Some("") => Ok(Target::Sandbox),
            Some(other) => Err(HarnessError::Config(format!(
                "{ENV_TARGET} must be `sandbox` or `live`, got `{other}`"
            ))),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
