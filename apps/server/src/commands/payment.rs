//! # Payment Actions
//!
//! ## Payment Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Payment screen: total $24.84                                           │
//! │                                                                         │
//! │  Cash tendered $30.00 ──► settle() ──► change $5.16                     │
//! │  Card charged  $24.84 ──► settle() ──► change $0.00                     │
//! │  Cash tendered $20.00 ──► rejected: does not cover the total            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  order PAID (payment method + amount stored), table dirty               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiResult;
use crate::state::AppState;
use mesa_core::validation::validate_payment_amount;
use mesa_core::{Money, Order, PaymentMethod};

/// Body of a pay request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayOrderInput {
    pub method: PaymentMethod,
    /// Cash tendered or card amount charged.
    pub amount_cents: i64,
}

/// Settled order plus the change to hand back.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub order: Order,
    pub change_cents: i64,
}

/// Settles an order and marks it PAID.
pub async fn pay_order(state: &AppState, order_id: &str, input: PayOrderInput) -> ApiResult<PaymentReceipt> {
    debug!(order_id = %order_id, method = ?input.method, amount_cents = input.amount_cents, "pay_order command");
    validate_payment_amount(input.amount_cents)?;

    let outcome = state
        .orders()
        .pay(order_id, input.method, Money::from_cents(input.amount_cents))
        .await?;

    Ok(PaymentReceipt {
        order: outcome.order,
        change_cents: outcome.change.cents(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_state;
    use crate::error::ErrorCode;
    use mesa_core::{OrderStatus, TableStatus};
    use mesa_db::{CategoryDraft, MenuItemDraft, NewOrderItem, TableDraft};

    /// Opens an order with one 10.00 line (total 10.80).
    async fn open_order(state: &AppState) -> (String, String) {
        let table = state
            .db
            .tables()
            .insert(&TableDraft { number: 9, capacity: 2 })
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
        let item = state
            .db
            .menu_items()
            .insert(&MenuItemDraft {
                name: "Risotto".to_string(),
                description: None,
                price_cents: 1000,
                category_id: category.id,
                printer_role_id: None,
                is_available: true,
                modifier_ids: vec![],
            })
            .await
            .unwrap();

        let order = state.orders().create_for_table(&table.id).await.unwrap();
        state
            .orders()
            .add_item(
                &order.id,
                &NewOrderItem {
                    menu_item_id: item.id,
                    name: item.name,
                    unit_price_cents: item.price_cents,
                    quantity: 1,
                    modifiers: vec![],
                    special_requests: None,
                },
            )
            .await
            .unwrap();

        (order.id, table.id)
    }

    #[tokio::test]
    async fn test_cash_payment_gives_change() {
        let state = test_state().await;
        let (order_id, table_id) = open_order(&state).await;

        let receipt = pay_order(
            &state,
            &order_id,
            PayOrderInput {
                method: PaymentMethod::Cash,
                amount_cents: 2000,
            },
        )
        .await
        .unwrap();

        assert_eq!(receipt.order.status, OrderStatus::Paid);
        assert_eq!(receipt.order.total_cents, 1080);
        assert_eq!(receipt.change_cents, 920);

        let table = state.db.tables().get_by_id(&table_id).await.unwrap().unwrap();
        assert_eq!(table.status, TableStatus::Dirty);
        assert!(table.current_order_id.is_none());
    }

    #[tokio::test]
    async fn test_insufficient_cash_rejected() {
        let state = test_state().await;
        let (order_id, _) = open_order(&state).await;

        let err = pay_order(
            &state,
            &order_id,
            PayOrderInput {
                method: PaymentMethod::Cash,
                amount_cents: 1000,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentError);

        let err = pay_order(
            &state,
            &order_id,
            PayOrderInput {
                method: PaymentMethod::Card,
                amount_cents: 0,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let order = state.orders().get_by_id(&order_id).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Open);
    }

    #[tokio::test]
    async fn test_paid_order_cannot_be_paid_again() {
        let state = test_state().await;
        let (order_id, _) = open_order(&state).await;
        let card = PayOrderInput {
            method: PaymentMethod::Card,
            amount_cents: 1080,
        };

        pay_order(&state, &order_id, card.clone()).await.unwrap();
        let err = pay_order(&state, &order_id, card).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessRule);
    }
}
