use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::sandbox::SharedSandboxState;
use crate::sandbox::error::ApiResult;
use crate::sandbox::store::{BoardList, Card, ListClosed, ListCreate};

/// `POST /boards/:id/lists`
pub async fn create_list(
    State(state): State<SharedSandboxState>,
    Path(board_id): Path<String>,
    Query(input): Query<ListCreate>,
) -> ApiResult<Json<BoardList>> {
    let list = state.store().create_list(&board_id, input)?;
    tracing::info!(id = %list.id, board = %board_id, "list created");
    Ok(Json(list))
}

pub async fn get_list(
    State(state): State<SharedSandboxState>,
    Path(id): Path<String>,
) -> ApiResult<Json<BoardList>> {
    Ok(Json(state.store().get_list(&id)?))
}

pub async fn close_list(
    State(state): State<SharedSandboxState>,
    Path(id): Path<String>,
    Query(input): Query<ListClosed>,
) -> ApiResult<Json<BoardList>> {
    let list = state.store().set_list_closed(&id, input.value)?;
    tracing::info!(%id, closed = list.closed, "list archived");
    Ok(Json(list))
}

pub async fn list_cards(
    State(state): State<SharedSandboxState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Card>>> {
    Ok(Json(state.store().list_cards(&id)?))
}
