//! # Kitchen Ticket Actions
//!
//! ## Print Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Order: Burger, Fries (kitchen) · Lager (bar, category default)         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  OrderRepository::kitchen_tickets()                                     │
//! │       │  resolve role per line: item → category → "kitchen"             │
//! │       │  group by role, keep line order                                 │
//! │       ▼                                                                 │
//! │  ┌──────────────────┐   ┌──────────────────┐                            │
//! │  │ KOT  role=bar    │   │ KOT role=kitchen │                            │
//! │  │ 1× Lager         │   │ 1× Burger        │                            │
//! │  └────────┬─────────┘   │ 2× Fries         │                            │
//! │           │             └────────┬─────────┘                            │
//! │           ▼                      ▼                                      │
//! │  POST {PRINT_SERVER_URL}/print (one request per ticket)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use mesa_core::KitchenTicket;

/// Tickets that reached the print server.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintSummary {
    pub order_id: String,
    pub tickets: Vec<KitchenTicket>,
}

/// Sends one kitchen ticket per printer role to the print server.
///
/// Stops at the first ticket the print server does not accept.
pub async fn send_order_to_print_server(state: &AppState, order_id: &str) -> ApiResult<PrintSummary> {
    debug!(order_id = %order_id, "send_order_to_print_server command");

    let tickets = state.orders().kitchen_tickets(order_id).await?;
    if tickets.is_empty() {
        return Err(ApiError::validation("Order has no items to print"));
    }

    for ticket in &tickets {
        state.printer.send(ticket).await?;
    }

    info!(
        order_id = %order_id,
        tickets = tickets.len(),
        roles = ?tickets.iter().map(|t| t.role.as_str()).collect::<Vec<_>>(),
        "Kitchen tickets sent"
    );

    Ok(PrintSummary {
        order_id: order_id.to_string(),
        tickets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_state;
    use crate::error::ErrorCode;
    use mesa_db::TableDraft;

    #[tokio::test]
    async fn test_empty_order_not_printed() {
        let state = test_state().await;
        let table = state
            .db
            .tables()
            .insert(&TableDraft { number: 1, capacity: 2 })
            .await
            .unwrap();
        let order = state.orders().create_for_table(&table.id).await.unwrap();

        let err = send_order_to_print_server(&state, &order.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_unknown_order() {
        let state = test_state().await;
        let err = send_order_to_print_server(&state, "missing").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
