//! # Order Actions
//!
//! Order entry for the order panel and the kitchen display.
//!
//! ## Order Entry Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Order Entry Flow                                     │
//! │                                                                         │
//! │  Server taps table 4                                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  create_order(table 4) ──► table 4 occupied, order OPEN                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  add_order_item(Burger ×2, [Extra cheese])                              │
//! │       │  name + price snapshot from the menu                            │
//! │       │  modifiers resolved to {id, name, delta}                        │
//! │       ▼                                                                 │
//! │  totals recomputed: subtotal, tax, total (table total refreshed)        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  update_order_status(IN_PROGRESS) ──► kitchen display                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DONE ──► pay_order ──► PAID, table dirty                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use mesa_core::order::{line_total, plan_transition};
use mesa_core::validation::{validate_optional_text, validate_quantity, MAX_TEXT_LEN};
use mesa_core::{Money, Order, OrderStatus, SelectedModifier, ValidationError};
use mesa_db::NewOrderItem;

fn default_quantity() -> i64 {
    1
}

/// Body of a create order request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderInput {
    pub table_id: String,
}

/// A line as entered on the order panel.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    pub menu_item_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    #[serde(default)]
    pub modifier_ids: Vec<String>,
    #[serde(default)]
    pub special_requests: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantityInput {
    pub quantity: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifiersInput {
    #[serde(default)]
    pub modifier_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusInput {
    pub status: OrderStatus,
}

async fn resolve_modifiers(state: &AppState, ids: &[String]) -> ApiResult<Vec<SelectedModifier>> {
    let modifiers = state.db.modifiers().get_many(ids).await?;
    Ok(modifiers.iter().map(SelectedModifier::from).collect())
}

/// Snapshots the menu item into a line ready to write.
async fn resolve_line(state: &AppState, input: OrderItemInput) -> ApiResult<NewOrderItem> {
    validate_quantity(input.quantity)?;
    let special_requests =
        validate_optional_text("special requests", input.special_requests.as_deref(), MAX_TEXT_LEN)?;

    let item = state
        .db
        .menu_items()
        .get_by_id(&input.menu_item_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Menu item", &input.menu_item_id))?;

    if !item.is_available {
        return Err(ApiError::validation(format!("'{}' is currently unavailable", item.name)));
    }

    let modifiers = resolve_modifiers(state, &input.modifier_ids).await?;
    line_total(Money::from_cents(item.price_cents), input.quantity, &modifiers)?;

    Ok(NewOrderItem {
        modifiers,
        menu_item_id: item.id,
        name: item.name,
        unit_price_cents: item.price_cents,
        quantity: input.quantity,
        special_requests,
    })
}

// =============================================================================
// Reading
// =============================================================================

pub async fn get_order_by_id(state: &AppState, id: &str) -> ApiResult<Order> {
    state
        .orders()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Order", id))
}

/// The unsettled order at a table, if there is one.
pub async fn get_order_for_table(state: &AppState, table_id: &str) -> ApiResult<Option<Order>> {
    state
        .db
        .tables()
        .get_by_id(table_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Table", table_id))?;

    Ok(state.orders().get_open_for_table(table_id).await?)
}

/// Kitchen display feed: OPEN and IN_PROGRESS orders, oldest first.
pub async fn get_active_orders(state: &AppState) -> ApiResult<Vec<Order>> {
    Ok(state.orders().list_active().await?)
}

/// Order history, newest first.
pub async fn get_orders(state: &AppState, status: Option<OrderStatus>) -> ApiResult<Vec<Order>> {
    Ok(state.orders().list(status).await?)
}

// =============================================================================
// Writing
// =============================================================================

/// Opens an order at a table.
pub async fn create_order(state: &AppState, input: CreateOrderInput) -> ApiResult<Order> {
    debug!(table_id = %input.table_id, "create_order command");
    Ok(state.orders().create_for_table(&input.table_id).await?)
}

pub async fn add_order_item(state: &AppState, order_id: &str, input: OrderItemInput) -> ApiResult<Order> {
    debug!(order_id = %order_id, menu_item_id = %input.menu_item_id, "add_order_item command");
    let line = resolve_line(state, input).await?;
    Ok(state.orders().add_item(order_id, &line).await?)
}

/// Changes a line's quantity. Zero removes the line.
pub async fn update_order_item_quantity(
    state: &AppState,
    item_id: &str,
    input: QuantityInput,
) -> ApiResult<Order> {
    debug!(item_id = %item_id, quantity = input.quantity, "update_order_item_quantity command");
    if input.quantity != 0 {
        validate_quantity(input.quantity)?;
    }
    Ok(state.orders().update_item_quantity(item_id, input.quantity).await?)
}

pub async fn update_order_item_modifiers(
    state: &AppState,
    item_id: &str,
    input: ModifiersInput,
) -> ApiResult<Order> {
    debug!(item_id = %item_id, count = input.modifier_ids.len(), "update_order_item_modifiers command");
    let modifiers = resolve_modifiers(state, &input.modifier_ids).await?;
    Ok(state.orders().update_item_modifiers(item_id, &modifiers).await?)
}

pub async fn remove_order_item(state: &AppState, item_id: &str) -> ApiResult<Order> {
    debug!(item_id = %item_id, "remove_order_item command");
    Ok(state.orders().remove_item(item_id).await?)
}

/// Rewrites every line of an order in one transaction.
pub async fn replace_order_items(
    state: &AppState,
    order_id: &str,
    items: Vec<OrderItemInput>,
) -> ApiResult<Order> {
    debug!(order_id = %order_id, lines = items.len(), "replace_order_items command");

    let mut lines = Vec::with_capacity(items.len());
    for (index, input) in items.into_iter().enumerate() {
        let line = resolve_line(state, input).await.map_err(|e| {
            ApiError::new(e.code, format!("Line {}: {}", index + 1, e.message))
        })?;
        lines.push(line);
    }

    Ok(state.orders().replace_items(order_id, &lines).await?)
}

/// Moves an order through its lifecycle. PAID is reached through `pay_order`.
pub async fn update_order_status(
    state: &AppState,
    order_id: &str,
    input: OrderStatusInput,
) -> ApiResult<Order> {
    debug!(order_id = %order_id, status = %input.status, "update_order_status command");

    if input.status == OrderStatus::Paid {
        let order = get_order_by_id(state, order_id).await?;
        // a settled order reports that it is closed before anything else
        plan_transition(&order.id, order.status, input.status)?;
        if order.status != OrderStatus::Paid {
            return Err(ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: ["OPEN", "IN_PROGRESS", "DONE", "CANCELLED"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            }
            .into());
        }
    }

    let order = state.orders().update_status(order_id, input.status).await?;
    info!(order_id = %order_id, status = %order.status, "update_order_status complete");
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_state;
    use crate::error::ErrorCode;
    use mesa_core::TableStatus;
    use mesa_db::{CategoryDraft, MenuItemDraft, ModifierDraft, TableDraft};

    struct Fixture {
        state: AppState,
        table_id: String,
        burger_id: String,
        cheese_id: String,
    }

    async fn fixture() -> Fixture {
        let state = test_state().await;
        let table = state
            .db
            .tables()
            .insert(&TableDraft { number: 4, capacity: 4 })
            .await
            .unwrap();
        let category = state
            .db
            .categories()
            .insert(&CategoryDraft {
                name: "Mains".to_string(),
                icon: None,
                default_printer_role_id: None,
            })
            .await
            .unwrap();
        let cheese = state
            .db
            .modifiers()
            .insert(&ModifierDraft {
                name: "Extra cheese".to_string(),
                price_delta_cents: 150,
            })
            .await
            .unwrap();
        let burger = state
            .db
            .menu_items()
            .insert(&MenuItemDraft {
                name: "Burger".to_string(),
                description: None,
                price_cents: 1000,
                category_id: category.id,
                printer_role_id: None,
                is_available: true,
                modifier_ids: vec![cheese.id.clone()],
            })
            .await
            .unwrap();

        Fixture {
            state,
            table_id: table.id,
            burger_id: burger.id,
            cheese_id: cheese.id,
        }
    }

    fn line(menu_item_id: &str, quantity: i64, modifier_ids: Vec<String>) -> OrderItemInput {
        OrderItemInput {
            menu_item_id: menu_item_id.to_string(),
            quantity,
            modifier_ids,
            special_requests: None,
        }
    }

    #[tokio::test]
    async fn test_order_entry_totals() {
        let f = fixture().await;
        let order = create_order(&f.state, CreateOrderInput { table_id: f.table_id.clone() })
            .await
            .unwrap();

        let order = add_order_item(&f.state, &order.id, line(&f.burger_id, 2, vec![f.cheese_id.clone()]))
            .await
            .unwrap();
        // 2 × (10.00 + 1.50) = 23.00, tax 8% = 1.84
        assert_eq!(order.subtotal_cents, 2300);
        assert_eq!(order.tax_cents, 184);
        assert_eq!(order.total_cents, 2484);
        assert_eq!(order.items[0].modifiers[0].name, "Extra cheese");

        let item_id = order.items[0].id.clone();
        let order = update_order_item_modifiers(&f.state, &item_id, ModifiersInput { modifier_ids: vec![] })
            .await
            .unwrap();
        assert_eq!(order.subtotal_cents, 2000);

        let order = update_order_item_quantity(&f.state, &item_id, QuantityInput { quantity: 0 })
            .await
            .unwrap();
        assert!(order.items.is_empty());
        assert_eq!(order.total_cents, 0);

        let table = f.state.db.tables().get_by_id(&f.table_id).await.unwrap().unwrap();
        assert_eq!(table.current_order_total_cents, Some(0));
    }

    #[tokio::test]
    async fn test_second_order_on_table_rejected() {
        let f = fixture().await;
        create_order(&f.state, CreateOrderInput { table_id: f.table_id.clone() })
            .await
            .unwrap();

        let err = create_order(&f.state, CreateOrderInput { table_id: f.table_id.clone() })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::TableOccupied);

        let open = get_order_for_table(&f.state, &f.table_id).await.unwrap();
        assert!(open.is_some());
    }

    #[tokio::test]
    async fn test_unavailable_item_and_bad_quantity() {
        let f = fixture().await;
        let order = create_order(&f.state, CreateOrderInput { table_id: f.table_id.clone() })
            .await
            .unwrap();

        let err = add_order_item(&f.state, &order.id, line(&f.burger_id, 0, vec![]))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let burger = f.state.db.menu_items().get_by_id(&f.burger_id).await.unwrap().unwrap();
        f.state
            .db
            .menu_items()
            .update(
                &f.burger_id,
                &MenuItemDraft {
                    name: burger.name,
                    description: None,
                    price_cents: burger.price_cents,
                    category_id: burger.category_id,
                    printer_role_id: None,
                    is_available: false,
                    modifier_ids: vec![],
                },
            )
            .await
            .unwrap();

        let err = add_order_item(&f.state, &order.id, line(&f.burger_id, 1, vec![]))
            .await
            .unwrap_err();
        assert_eq!(err.message, "'Burger' is currently unavailable");
    }

    #[tokio::test]
    async fn test_replace_and_lifecycle() {
        let f = fixture().await;
        let order = create_order(&f.state, CreateOrderInput { table_id: f.table_id.clone() })
            .await
            .unwrap();

        let order = replace_order_items(
            &f.state,
            &order.id,
            vec![line(&f.burger_id, 1, vec![]), line(&f.burger_id, 3, vec![])],
        )
        .await
        .unwrap();
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.subtotal_cents, 4000);

        let err = replace_order_items(&f.state, &order.id, vec![line("missing", 1, vec![])])
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert!(err.message.starts_with("Line 1:"));

        let order = update_order_status(&f.state, &order.id, OrderStatusInput { status: OrderStatus::InProgress })
            .await
            .unwrap();
        assert_eq!(get_active_orders(&f.state).await.unwrap().len(), 1);

        let err = update_order_status(&f.state, &order.id, OrderStatusInput { status: OrderStatus::Paid })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        update_order_status(&f.state, &order.id, OrderStatusInput { status: OrderStatus::Cancelled })
            .await
            .unwrap();
        assert!(get_active_orders(&f.state).await.unwrap().is_empty());

        let err = add_order_item(&f.state, &order.id, line(&f.burger_id, 1, vec![]))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessRule);

        let err = update_order_status(&f.state, &order.id, OrderStatusInput { status: OrderStatus::Open })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessRule);

        let err = update_order_status(&f.state, &order.id, OrderStatusInput { status: OrderStatus::Paid })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessRule);
        assert!(err.message.contains("can no longer be modified"));

        let table = f.state.db.tables().get_by_id(&f.table_id).await.unwrap().unwrap();
        assert_eq!(table.status, TableStatus::Available);
        assert!(table.current_order_id.is_none());

        let cancelled = get_orders(&f.state, Some(OrderStatus::Cancelled)).await.unwrap();
        assert_eq!(cancelled.len(), 1);
    }

    #[tokio::test]
    async fn test_most_expensive_line_totals_exactly() {
        use mesa_core::{MAX_ITEM_QUANTITY, MAX_PRICE_CENTS};

        let f = fixture().await;
        let category_id = f.state.db.menu_items().get_by_id(&f.burger_id).await.unwrap().unwrap().category_id;
        let caviar = f
            .state
            .db
            .menu_items()
            .insert(&MenuItemDraft {
                name: "Caviar service".to_string(),
                description: None,
                price_cents: MAX_PRICE_CENTS,
                category_id,
                printer_role_id: None,
                is_available: true,
                modifier_ids: vec![],
            })
            .await
            .unwrap();
        let order = create_order(&f.state, CreateOrderInput { table_id: f.table_id.clone() })
            .await
            .unwrap();

        let order = add_order_item(&f.state, &order.id, line(&caviar.id, MAX_ITEM_QUANTITY, vec![]))
            .await
            .unwrap();
        assert_eq!(order.subtotal_cents, 9_990_000_000);
        assert_eq!(order.tax_cents, 799_200_000);
        assert_eq!(order.total_cents, 10_789_200_000);
    }

    #[tokio::test]
    async fn test_discount_cannot_make_line_negative() {
        let f = fixture().await;
        let big_discount = f
            .state
            .db
            .modifiers()
            .insert(&ModifierDraft {
                name: "Staff meal".to_string(),
                price_delta_cents: -1500,
            })
            .await
            .unwrap();
        let order = create_order(&f.state, CreateOrderInput { table_id: f.table_id.clone() })
            .await
            .unwrap();

        let err = add_order_item(&f.state, &order.id, line(&f.burger_id, 1, vec![big_discount.id.clone()]))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessRule);

        let err = replace_order_items(
            &f.state,
            &order.id,
            vec![
                line(&f.burger_id, 1, vec![]),
                line(&f.burger_id, 2, vec![big_discount.id.clone(), f.cheese_id.clone()]),
            ],
        )
        .await
        .unwrap_err();
        assert!(err.message.starts_with("Line 2:"));

        // the same discount on an existing line is rejected too
        let order = add_order_item(&f.state, &order.id, line(&f.burger_id, 1, vec![]))
            .await
            .unwrap();
        let item_id = order.items[0].id.clone();
        let err = update_order_item_modifiers(
            &f.state,
            &item_id,
            ModifiersInput { modifier_ids: vec![big_discount.id] },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessRule);

        let order = get_order_by_id(&f.state, &order.id).await.unwrap();
        assert_eq!(order.subtotal_cents, 1000);
        assert!(order.items[0].modifiers.is_empty());
    }
}
