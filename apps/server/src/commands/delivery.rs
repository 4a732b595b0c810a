//! # Delivery Actions
//!
//! Orders arriving from delivery platforms, tracked alongside dine-in.

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use mesa_core::validation::{
    validate_name, validate_optional_text, validate_price_cents, MAX_NAME_LEN, MAX_TEXT_LEN,
};
use mesa_core::{DeliveryOrder, DeliveryPlatform, DeliveryStatus};
use mesa_db::DeliveryOrderDraft;

/// Body of a create request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryOrderInput {
    pub platform: DeliveryPlatform,
    pub external_ref: String,
    pub customer_name: String,
    pub items_summary: String,
    pub total_cents: i64,
    #[serde(default)]
    pub courier_name: Option<String>,
}

/// Body of a status change request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryStatusInput {
    pub status: DeliveryStatus,
    #[serde(default)]
    pub courier_name: Option<String>,
}

/// Lists delivery orders, newest first.
pub async fn get_delivery_orders(
    state: &AppState,
    status: Option<DeliveryStatus>,
) -> ApiResult<Vec<DeliveryOrder>> {
    Ok(state.db.delivery_orders().list(status).await?)
}

pub async fn create_delivery_order(state: &AppState, input: DeliveryOrderInput) -> ApiResult<DeliveryOrder> {
    debug!(platform = %input.platform, external_ref = %input.external_ref, "create_delivery_order command");

    let external_ref = validate_name("external reference", &input.external_ref, MAX_NAME_LEN)?;
    let customer_name = validate_name("customer name", &input.customer_name, MAX_NAME_LEN)?;
    let items_summary = validate_name("items summary", &input.items_summary, MAX_TEXT_LEN)?;
    let courier_name = validate_optional_text("courier name", input.courier_name.as_deref(), MAX_NAME_LEN)?;
    validate_price_cents(input.total_cents)?;

    if state
        .db
        .delivery_orders()
        .reference_taken(input.platform, &external_ref)
        .await?
    {
        return Err(ApiError::duplicate(format!(
            "{} order '{}' already exists",
            input.platform, external_ref
        )));
    }

    let order = state
        .db
        .delivery_orders()
        .insert(&DeliveryOrderDraft {
            platform: input.platform,
            external_ref,
            customer_name,
            items_summary,
            total_cents: input.total_cents,
            courier_name,
        })
        .await?;

    info!(id = %order.id, platform = %order.platform, "Delivery order received");
    Ok(order)
}

/// Moves a delivery order forward, or cancels it.
pub async fn update_delivery_status(
    state: &AppState,
    id: &str,
    input: DeliveryStatusInput,
) -> ApiResult<DeliveryOrder> {
    debug!(id = %id, status = %input.status, "update_delivery_status command");
    let courier_name = validate_optional_text("courier name", input.courier_name.as_deref(), MAX_NAME_LEN)?;

    Ok(state
        .db
        .delivery_orders()
        .update_status(id, input.status, courier_name.as_deref())
        .await?)
}

pub async fn delete_delivery_order(state: &AppState, id: &str) -> ApiResult<()> {
    debug!(id = %id, "delete_delivery_order command");
    state.db.delivery_orders().delete(id).await?;
    info!(id = %id, "Delivery order deleted");
    Ok(())
}
