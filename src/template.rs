//! The request template: base URL, auth query parameters and content type
//! applied to every outgoing call.

use std::fmt;
use std::time::Instant;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};

use crate::config::ApiConfig;
use crate::json::JsonPath;
use crate::{HarnessError, HarnessResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Json,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Json => "application/json",
        }
    }
}

/// Format latency in human-readable units
pub(crate) fn format_latency(duration: std::time::Duration) -> String {
    let micros = duration.as_micros();
    if micros < 1000 {
        format!("{}µs", micros)
    } else if micros < 1_000_000 {
        format!("{}ms", micros / 1000)
    } else {
        format!("{:.1}s", micros as f64 / 1_000_000.0)
    }
}

// The URL carries the auth query parameters.
fn without_url(e: reqwest::Error) -> HarnessError {
    HarnessError::Transport(e.without_url())
}

pub struct RequestTemplateBuilder {
    base_url: String,
    content_type: ContentType,
    query: Vec<(String, String)>,
}

impl RequestTemplateBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            content_type: ContentType::Json,
            query: Vec::new(),
        }
    }

    pub fn add_query_param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    pub fn content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = content_type;
        self
    }

    pub fn build(self) -> HarnessResult<RequestTemplate> {
        let client = reqwest::Client::builder().build()?;
        Ok(RequestTemplate {
            client,
            base_url: self.base_url,
            content_type: self.content_type,
            default_query: self.query,
        })
    }
}

/// Immutable once built; share it behind an `Arc`.
pub struct RequestTemplate {
    client: reqwest::Client,
    base_url: String,
    content_type: ContentType,
    default_query: Vec<(String, String)>,
}

impl fmt::Debug for RequestTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<&str> = self.default_query.iter().map(|(n, _)| n.as_str()).collect();
        f.debug_struct("RequestTemplate")
            .field("base_url", &self.base_url)
            .field("content_type", &self.content_type)
            .field("default_query", &params)
            .finish()
    }
}

impl RequestTemplate {
    pub fn from_config(config: &ApiConfig) -> HarnessResult<Self> {
        RequestTemplateBuilder::new(&config.base_url)
            .add_query_param("key", &config.key)
            .add_query_param("token", &config.token)
            .content_type(ContentType::Json)
            .build()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn default_query(&self) -> &[(String, String)] {
        &self.default_query
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn request(&self, method: Method, path: impl Into<String>) -> ApiRequest<'_> {
        ApiRequest {
            template: self,
            method,
            path: path.into(),
            query: Vec::new(),
        }
    }

    pub fn get(&self, path: impl Into<String>) -> ApiRequest<'_> {
        self.request(Method::GET, path)
    }

    pub fn post(&self, path: impl Into<String>) -> ApiRequest<'_> {
        self.request(Method::POST, path)
    }

    pub fn put(&self, path: impl Into<String>) -> ApiRequest<'_> {
        self.request(Method::PUT, path)
    }

    pub fn delete(&self, path: impl Into<String>) -> ApiRequest<'_> {
        self.request(Method::DELETE, path)
    }
}

/// A single call being assembled from the template.
pub struct ApiRequest<'a> {
    template: &'a RequestTemplate,
    method: Method,
    path: String,
    query: Vec<(String, String)>,
}

impl ApiRequest<'_> {
    pub fn query_param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    pub fn query_params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        self.query
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.to_string())));
        self
    }

    /// Template defaults followed by this call's parameters. A per-call
    /// parameter replaces a default of the same name.
    pub fn merged_query(&self) -> Vec<(String, String)> {
        self.template
            .default_query
            .iter()
            .filter(|(name, _)| !self.query.iter().any(|(n, _)| n == name))
            .chain(self.query.iter())
            .cloned()
            .collect()
    }

    pub async fn send(self) -> HarnessResult<ApiResponse> {
        let query = self.merged_query();
        let started = Instant::now();

        tracing::debug!("-> {} {}", self.method, self.path);

        let response = self
            .template
            .client
            .request(self.method.clone(), self.template.url(&self.path))
            .header(CONTENT_TYPE, self.template.content_type.as_str())
            .query(&query)
            .send()
            .await
            .map_err(without_url)?;

        let status = response.status();
        let body = response.text().await.map_err(without_url)?;

        tracing::debug!(
            "<- {} {} {} latency={}",
            status.as_u16(),
            self.method,
            self.path,
            format_latency(started.elapsed())
        );

        Ok(ApiResponse {
            method: self.method,
            path: self.path,
            status,
            body,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ApiResponse {
    method: Method,
    path: String,
    status: StatusCode,
    body: String,
}

impl ApiResponse {
    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn text(&self) -> &str {
        &self.body
    }

    pub fn expect_status(self, expected: StatusCode) -> HarnessResult<Self> {
        if self.status == expected {
            Ok(self)
        } else {
            Err(HarnessError::UnexpectedStatus {
                method: self.method,
                path: self.path,
                expected: expected.as_u16(),
                actual: self.status.as_u16(),
                body: self.body,
            })
        }
    }

    pub fn json(&self) -> HarnessResult<JsonPath> {
        JsonPath::parse(&self.body)
    }
}
