use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_json::{Value, json};

use crate::sandbox::SharedSandboxState;
use crate::sandbox::error::ApiResult;
use crate::sandbox::store::{Organization, OrganizationInput};

pub async fn create_organization(
    State(state): State<SharedSandboxState>,
    Query(input): Query<OrganizationInput>,
) -> ApiResult<Json<Organization>> {
    let org = state.store().create_organization(input)?;
    tracing::info!(id = %org.id, name = %org.name, "organization created");
    Ok(Json(org))
}

/// Accepts the organization's id or its name.
pub async fn get_organization(
    State(state): State<SharedSandboxState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Organization>> {
    Ok(Json(state.store().get_organization(&id)?))
}

pub async fn update_organization(
    State(state): State<SharedSandboxState>,
    Path(id): Path<String>,
    Query(input): Query<OrganizationInput>,
) -> ApiResult<Json<Organization>> {
    Ok(Json(state.store().update_organization(&id, input)?))
}

pub async fn delete_organization(
    State(state): State<SharedSandboxState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.store().delete_organization(&id)?;
    tracing::info!(%id, "organization deleted");
    Ok(Json(json!({ "_value": null })))
}
