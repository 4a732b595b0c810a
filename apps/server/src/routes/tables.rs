//! Table routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};

use super::ApiJson;
use crate::commands::{orders, tables};
use crate::error::{ApiResult, DeleteResult};
use crate::state::AppState;
use mesa_core::{Order, Table};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tables", get(list).post(create))
        .route("/tables/{id}", get(get_by_id).put(update).delete(delete))
        .route("/tables/{id}/status", put(update_status))
        .route("/tables/{id}/order", get(current_order))
}

/// GET /api/tables
async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Table>>> {
    Ok(Json(tables::get_all_tables(&state).await?))
}

/// GET /api/tables/{id}
async fn get_by_id(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Table>> {
    Ok(Json(tables::get_table_by_id(&state, &id).await?))
}

/// POST /api/tables
async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<tables::TableInput>,
) -> ApiResult<(StatusCode, Json<Table>)> {
    let table = tables::create_table(&state, input).await?;
    Ok((StatusCode::CREATED, Json(table)))
}

/// PUT /api/tables/{id}
async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<tables::TableInput>,
) -> ApiResult<Json<Table>> {
    Ok(Json(tables::update_table(&state, &id, input).await?))
}

/// PUT /api/tables/{id}/status
async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<tables::TableStatusInput>,
) -> ApiResult<Json<Table>> {
    Ok(Json(tables::update_table_status(&state, &id, input).await?))
}

/// DELETE /api/tables/{id}
async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> DeleteResult {
    tables::delete_table(&state, &id).await.into()
}

/// GET /api/tables/{id}/order
async fn current_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Option<Order>>> {
    Ok(Json(orders::get_order_for_table(&state, &id).await?))
}
