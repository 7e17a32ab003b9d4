use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_json::{Value, json};

use crate::sandbox::SharedSandboxState;
use crate::sandbox::error::ApiResult;
use crate::sandbox::store::{Board, BoardCreate, BoardList, BoardUpdate, Card};

pub async fn create_board(
    State(state): State<SharedSandboxState>,
    Query(input): Query<BoardCreate>,
) -> ApiResult<Json<Board>> {
    let default_lists = input.default_lists;
    let board = state.store().create_board(input)?;
    tracing::info!(id = %board.id, default_lists, "board created");
    Ok(Json(board))
}

pub async fn get_board(
    State(state): State<SharedSandboxState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Board>> {
    Ok(Json(state.store().get_board(&id)?))
}

pub async fn update_board(
    State(state): State<SharedSandboxState>,
    Path(id): Path<String>,
    Query(update): Query<BoardUpdate>,
) -> ApiResult<Json<Board>> {
    Ok(Json(state.store().update_board(&id, update)?))
}

pub async fn delete_board(
    State(state): State<SharedSandboxState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.store().delete_board(&id)?;
    tracing::info!(%id, "board deleted");
    Ok(Json(json!({ "_value": null })))
}

pub async fn board_lists(
    State(state): State<SharedSandboxState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<BoardList>>> {
    Ok(Json(state.store().board_lists(&id)?))
}

pub async fn board_cards(
    State(state): State<SharedSandboxState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Card>>> {
    Ok(Json(state.store().board_cards(&id)?))
}
