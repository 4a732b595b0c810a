//! Order routes: order entry, kitchen display, payment, kitchen tickets.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;

use super::{ApiJson, ApiQuery};
use crate::commands::orders::{
    self, CreateOrderInput, ModifiersInput, OrderItemInput, OrderStatusInput, QuantityInput,
};
use crate::commands::payment::{self, PayOrderInput, PaymentReceipt};
use crate::commands::print::{self, PrintSummary};
use crate::error::ApiResult;
use crate::state::AppState;
use mesa_core::{Order, OrderStatus};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list).post(create))
        .route("/orders/active", get(active))
        .route("/orders/{id}", get(get_by_id))
        .route("/orders/{id}/items", post(add_item).put(replace_items))
        .route("/orders/{id}/status", put(update_status))
        .route("/orders/{id}/pay", post(pay))
        .route("/orders/{id}/print", post(send_to_print_server))
        .route("/order-items/{id}", axum::routing::delete(remove_item))
        .route("/order-items/{id}/quantity", put(update_quantity))
        .route("/order-items/{id}/modifiers", put(update_modifiers))
}

#[derive(Debug, Deserialize)]
struct OrderQuery {
    status: Option<OrderStatus>,
}

/// GET /api/orders?status=PAID
async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<OrderQuery>,
) -> ApiResult<Json<Vec<Order>>> {
    Ok(Json(orders::get_orders(&state, query.status).await?))
}

/// GET /api/orders/active
async fn active(State(state): State<AppState>) -> ApiResult<Json<Vec<Order>>> {
    Ok(Json(orders::get_active_orders(&state).await?))
}

/// GET /api/orders/{id}
async fn get_by_id(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Order>> {
    Ok(Json(orders::get_order_by_id(&state, &id).await?))
}

/// POST /api/orders
async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateOrderInput>,
) -> ApiResult<(StatusCode, Json<Order>)> {
    let order = orders::create_order(&state, input).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// POST /api/orders/{id}/items
async fn add_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<OrderItemInput>,
) -> ApiResult<Json<Order>> {
    Ok(Json(orders::add_order_item(&state, &id, input).await?))
}

/// PUT /api/orders/{id}/items
async fn replace_items(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(items): ApiJson<Vec<OrderItemInput>>,
) -> ApiResult<Json<Order>> {
    Ok(Json(orders::replace_order_items(&state, &id, items).await?))
}

/// PUT /api/orders/{id}/status
async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<OrderStatusInput>,
) -> ApiResult<Json<Order>> {
    Ok(Json(orders::update_order_status(&state, &id, input).await?))
}

/// POST /api/orders/{id}/pay
async fn pay(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<PayOrderInput>,
) -> ApiResult<Json<PaymentReceipt>> {
    Ok(Json(payment::pay_order(&state, &id, input).await?))
}

/// POST /api/orders/{id}/print
async fn send_to_print_server(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PrintSummary>> {
    Ok(Json(print::send_order_to_print_server(&state, &id).await?))
}

/// DELETE /api/order-items/{id}
async fn remove_item(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Order>> {
    Ok(Json(orders::remove_order_item(&state, &id).await?))
}

/// PUT /api/order-items/{id}/quantity
async fn update_quantity(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<QuantityInput>,
) -> ApiResult<Json<Order>> {
    Ok(Json(orders::update_order_item_quantity(&state, &id, input).await?))
}

/// PUT /api/order-items/{id}/modifiers
async fn update_modifiers(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<ModifiersInput>,
) -> ApiResult<Json<Order>> {
    Ok(Json(orders::update_order_item_modifiers(&state, &id, input).await?))
}
