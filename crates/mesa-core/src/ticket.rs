//! # Kitchen Order Tickets
//!
//! Splits an order into one ticket per printer role.
//!
//! ## Routing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  for each order line:                                                   │
//! │     menu item printer role     ── set? ──► use it                       │
//! │            │ no                                                         │
//! │            ▼                                                            │
//! │     category default role      ── set? ──► use it                       │
//! │            │ no                                                         │
//! │            ▼                                                            │
//! │     "kitchen"                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Tickets come out ordered by role name. Lines keep their order position.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::OrderItem;
use crate::FALLBACK_PRINTER_ROLE;

/// One line on a kitchen ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TicketLine {
    pub name: String,
    pub quantity: i64,
    pub modifiers: Vec<String>,
    pub special_requests: Option<String>,
}

/// A ticket for one printer role.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct KitchenTicket {
    pub order_id: String,
    pub table_number: i64,
    /// Printer role name ("kitchen", "bar", ...).
    pub role: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub lines: Vec<TicketLine>,
}

/// An order line with the role names needed to route it.
#[derive(Debug, Clone, Copy)]
pub struct RoutedItem<'a> {
    pub item: &'a OrderItem,
    pub item_role: Option<&'a str>,
    pub category_role: Option<&'a str>,
}

impl RoutedItem<'_> {
    /// Resolves the printer role for this line.
    pub fn role(&self) -> &str {
        self.item_role
            .or(self.category_role)
            .unwrap_or(FALLBACK_PRINTER_ROLE)
    }
}

impl From<&OrderItem> for TicketLine {
    fn from(item: &OrderItem) -> Self {
        TicketLine {
            name: item.name.clone(),
            quantity: item.quantity,
            modifiers: item.modifiers.iter().map(|m| m.name.clone()).collect(),
            special_requests: item.special_requests.clone(),
        }
    }
}

/// Groups order lines into tickets.
///
/// An order with no lines produces no tickets.
pub fn build_tickets(
    order_id: &str,
    table_number: i64,
    items: &[RoutedItem<'_>],
    created_at: DateTime<Utc>,
) -> Vec<KitchenTicket> {
    let mut sorted: Vec<&RoutedItem<'_>> = items.iter().collect();
    sorted.sort_by_key(|r| r.item.position);

    let mut groups: BTreeMap<&str, Vec<TicketLine>> = BTreeMap::new();
    for routed in sorted {
        groups
            .entry(routed.role())
            .or_default()
            .push(TicketLine::from(routed.item));
    }

    groups
        .into_iter()
        .map(|(role, lines)| KitchenTicket {
            order_id: order_id.to_string(),
            table_number,
            role: role.to_string(),
            created_at,
            lines,
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
