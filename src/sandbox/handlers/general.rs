use axum::{
    extract::{Query, Request, State},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;

use crate::sandbox::SharedSandboxState;
use crate::sandbox::error::{ApiError, ApiResult};

pub async fn health_check() -> &'static str {
    "OK"
}

#[derive(Deserialize)]
pub struct Credentials {
    key: Option<String>,
    token: Option<String>,
}

/// Every API call carries `key` and `token` as query parameters.
pub async fn require_credentials(
    State(state): State<SharedSandboxState>,
    Query(credentials): Query<Credentials>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    if credentials.key.as_deref() != Some(state.key.as_str()) {
        return Err(ApiError::Unauthorized("invalid key"));
    }
    if credentials.token.as_deref() != Some(state.token.as_str()) {
        return Err(ApiError::Unauthorized("invalid token"));
    }
    Ok(next.run(request).await)
}
