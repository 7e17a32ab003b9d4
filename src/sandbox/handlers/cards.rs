use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_json::{Value, json};

use crate::sandbox::SharedSandboxState;
use crate::sandbox::error::ApiResult;
use crate::sandbox::store::{Card, CardCreate, CardUpdate};

pub async fn create_card(
    State(state): State<SharedSandboxState>,
    Query(input): Query<CardCreate>,
) -> ApiResult<Json<Card>> {
    let card = state.store().create_card(input)?;
    tracing::info!(id = %card.id, list = %card.id_list, "card created");
    Ok(Json(card))
}

pub async fn get_card(
    State(state): State<SharedSandboxState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Card>> {
    Ok(Json(state.store().get_card(&id)?))
}

pub async fn update_card(
    State(state): State<SharedSandboxState>,
    Path(id): Path<String>,
    Query(update): Query<CardUpdate>,
) -> ApiResult<Json<Card>> {
    let card = state.store().update_card(&id, update)?;
    tracing::info!(%id, list = %card.id_list, "card updated");
    Ok(Json(card))
}

pub async fn delete_card(
    State(state): State<SharedSandboxState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.store().delete_card(&id)?;
    Ok(Json(json!({ "limits": {} })))
}
