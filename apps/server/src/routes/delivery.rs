//! Delivery order routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, put};
use axum::{Json, Router};
use serde::Deserialize;

use super::{ApiJson, ApiQuery};
use crate::commands::delivery::{self, DeliveryOrderInput, DeliveryStatusInput};
use crate::error::{ApiResult, DeleteResult};
use crate::state::AppState;
use mesa_core::{DeliveryOrder, DeliveryStatus};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/delivery-orders", get(list).post(create))
        .route("/delivery-orders/{id}", delete(remove))
        .route("/delivery-orders/{id}/status", put(update_status))
}

#[derive(Debug, Deserialize)]
struct DeliveryQuery {
    status: Option<DeliveryStatus>,
}

/// GET /api/delivery-orders?status=ready
async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DeliveryQuery>,
) -> ApiResult<Json<Vec<DeliveryOrder>>> {
    Ok(Json(delivery::get_delivery_orders(&state, query.status).await?))
}

async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<DeliveryOrderInput>,
) -> ApiResult<(StatusCode, Json<DeliveryOrder>)> {
    let order = delivery::create_delivery_order(&state, input).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<DeliveryStatusInput>,
) -> ApiResult<Json<DeliveryOrder>> {
    Ok(Json(delivery::update_delivery_status(&state, &id, input).await?))
}

async fn remove(State(state): State<AppState>, Path(id): Path<String>) -> DeleteResult {
    delivery::delete_delivery_order(&state, &id).await.into()
}
