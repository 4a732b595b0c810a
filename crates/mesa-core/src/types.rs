//! # Domain Types
//!
//! Core domain types used throughout Mesa POS.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌───────────────┐    ┌────────────────┐    ┌────────────────┐         │
//! │  │    Table      │    │  MenuCategory  │    │   Modifier     │         │
//! │  │  number       │    │  name          │    │  name          │         │
//! │  │  status       │    │  default role ─┼─┐  │  price delta   │         │
//! │  │  current order│    └───────▲────────┘ │  └───────▲────────┘         │
//! │  └──────┬────────┘            │          │          │ many-to-many     │
//! │         │              ┌──────┴────────┐ │  ┌───────┴────────┐         │
//! │         │              │   MenuItem    │─┼─►│  PrinterRole   │         │
//! │         │              │  price, role ─┼─┘  │  kitchen, bar  │         │
//! │         ▼              └──────▲────────┘    └───────▲────────┘         │
//! │  ┌───────────────┐            │                     │                  │
//! │  │    Order      │    ┌───────┴────────┐    ┌───────┴────────┐         │
//! │  │  status       │───►│   OrderItem    │    │    Printer     │         │
//! │  │  totals       │    │  snapshot name │    │  connection    │         │
//! │  └───────────────┘    │  modifiers JSON│    └────────────────┘         │
//! │                       └────────────────┘                               │
//! │                                                                         │
//! │  DeliveryOrder: tracked separately, one row per platform order         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every entity is keyed by a UUID v4 string. Business identifiers
//! (table number, category name, ...) are unique but mutable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 800 bps = 8%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        crate::DEFAULT_TAX_RATE
    }
}

// =============================================================================
// Tables
// =============================================================================

/// Floor status of a dining table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum TableStatus {
    #[default]
    Available,
    Occupied,
    Reserved,
    /// Guests left, table needs clearing before it can be seated again.
    Dirty,
}

impl TableStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableStatus::Available => "available",
            TableStatus::Occupied => "occupied",
            TableStatus::Reserved => "reserved",
            TableStatus::Dirty => "dirty",
        }
    }
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dining table on the floor plan.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub id: String,

    /// Number painted on the table. Unique.
    pub number: i64,

    /// Seats.
    pub capacity: i64,

    pub status: TableStatus,

    /// Order currently running at this table, if any.
    pub current_order_id: Option<String>,

    /// Total of the current order, refreshed whenever its lines change.
    pub current_order_total_cents: Option<i64>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Menu
// =============================================================================

/// A section of the menu ("Starters", "Drinks", ...).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MenuCategory {
    pub id: String,
    /// Unique display name.
    pub name: String,
    /// Icon identifier understood by the front end.
    pub icon: Option<String>,
    /// Printer role used for items in this category that name none.
    pub default_printer_role_id: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// A priced add-on or variant ("Extra cheese +$1.20", "No onions").
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Modifier {
    pub id: String,
    pub name: String,
    /// Signed delta added to the unit price of a line.
    pub price_delta_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// A dish or drink that can be ordered.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub category_id: String,
    /// Printer role overriding the category default.
    pub printer_role_id: Option<String>,
    /// Hidden from the menu browser when false (sold out, seasonal).
    pub is_available: bool,
    /// Modifiers that may be applied to this item.
    pub modifiers: Vec<Modifier>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Orders
// =============================================================================

/// Lifecycle status of a dine-in order.
///
/// ```text
///   OPEN ──► IN_PROGRESS ──► DONE ──► PAID
///     │           │            │
///     └───────────┴────────────┴────► CANCELLED
/// ```
/// Any open state may move to any other state; PAID and CANCELLED are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Open,
    InProgress,
    Done,
    Paid,
    Cancelled,
}

impl OrderStatus {
    /// PAID and CANCELLED are terminal.
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Paid | OrderStatus::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Open => "OPEN",
            OrderStatus::InProgress => "IN_PROGRESS",
            OrderStatus::Done => "DONE",
            OrderStatus::Paid => "PAID",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an order was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash, change is computed.
    Cash,
    /// Card on an external terminal.
    Card,
}

/// A modifier as it was applied to an order line.
///
/// Name and delta are frozen at the time the line was written so later
/// menu edits do not change what the guest was charged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SelectedModifier {
    pub modifier_id: String,
    pub name: String,
    pub price_delta_cents: i64,
}

impl From<&Modifier> for SelectedModifier {
    fn from(m: &Modifier) -> Self {
        SelectedModifier {
            modifier_id: m.id.clone(),
            name: m.name.clone(),
            price_delta_cents: m.price_delta_cents,
        }
    }
}

/// One line of an order.
/// Uses the snapshot pattern: name and unit price are copied from the menu.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    /// Zero-based position in the order.
    pub position: i64,
    pub menu_item_id: String,
    /// Menu item name at time of ordering (frozen).
    pub name: String,
    /// Menu item price at time of ordering (frozen).
    pub unit_price_cents: i64,
    pub quantity: i64,
    pub modifiers: Vec<SelectedModifier>,
    /// Free text for the kitchen ("no ice", "well done").
    pub special_requests: Option<String>,
    /// quantity × (unit price + Σ modifier deltas)
    pub line_total_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A dine-in order attached to a table.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub table_id: String,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub payment_method: Option<PaymentMethod>,
    /// Amount handed over at payment (cash tendered or card charge).
    pub amount_paid_cents: Option<i64>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
    /// Set when the order reaches PAID or CANCELLED.
    #[ts(as = "Option<String>")]
    pub completed_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Printing
// =============================================================================

/// A logical printer role (kitchen, bar, receipt, report).
///
/// The external print server maps roles onto physical printers.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PrinterRole {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A configured printer bound to one role.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Printer {
    pub id: String,
    pub name: String,
    pub role_id: String,
    /// Network address ("192.168.1.50:9100") or device path.
    pub connection: String,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Delivery
// =============================================================================

/// Third-party platform a delivery order came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryPlatform {
    UberEats,
    DoorDash,
    Grubhub,
    Other,
}

impl DeliveryPlatform {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryPlatform::UberEats => "uber_eats",
            DeliveryPlatform::DoorDash => "door_dash",
            DeliveryPlatform::Grubhub => "grubhub",
            DeliveryPlatform::Other => "other",
        }
    }
}

impl fmt::Display for DeliveryPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress of a delivery order.
///
/// ```text
/// RECEIVED ─► PREPARING ─► READY ─► PICKED_UP ─► DELIVERED
///     └───────────┴──────────┴──────────┴──────► CANCELLED
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    #[default]
    Received,
    Preparing,
    Ready,
    PickedUp,
    Delivered,
    Cancelled,
}

impl DeliveryStatus {
    #[inline]
    pub const fn is_final(&self) -> bool {
        matches!(self, DeliveryStatus::Delivered | DeliveryStatus::Cancelled)
    }

    /// Statuses only move forward; cancelling is allowed until delivered.
    pub fn can_transition_to(&self, next: DeliveryStatus) -> bool {
        if self.is_final() {
            return false;
        }
        next == DeliveryStatus::Cancelled || next > *self
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Received => "received",
            DeliveryStatus::Preparing => "preparing",
            DeliveryStatus::Ready => "ready",
            DeliveryStatus::PickedUp => "picked_up",
            DeliveryStatus::Delivered => "delivered",
            DeliveryStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An order placed through a delivery platform.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryOrder {
    pub id: String,
    pub platform: DeliveryPlatform,
    /// Order number on the platform, unique per platform.
    pub external_ref: String,
    pub customer_name: String,
    /// Human-readable summary ("2x Margherita, 1x Tiramisu").
    pub items_summary: String,
    pub total_cents: i64,
    pub status: DeliveryStatus,
    pub courier_name: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_default_is_eight_percent() {
        let rate = TaxRate::default();
        assert_eq!(rate.bps(), 800);
    }

    #[test]
    fn test_order_status_terminal() {
        assert!(!OrderStatus::Open.is_terminal());
        assert!(!OrderStatus::InProgress.is_terminal());
        assert!(!OrderStatus::Done.is_terminal());
        assert!(OrderStatus::Paid.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_order_status_serializes_upper_case() {
        let json = serde_json::to_string(&OrderStatus::InProgress).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");
        let parsed: OrderStatus = serde_json::from_str("\"CANCELLED\"").unwrap();
        assert_eq!(parsed, OrderStatus::Cancelled);
    }

    #[test]
    fn test_table_status_serializes_lower_case() {
        let json = serde_json::to_string(&TableStatus::Dirty).unwrap();
        assert_eq!(json, "\"dirty\"");
    }

    #[test]
    fn test_delivery_status_moves_forward_only() {
        use DeliveryStatus::*;

        assert!(Received.can_transition_to(Preparing));
        assert!(Received.can_transition_to(Ready));
        assert!(Ready.can_transition_to(PickedUp));
        assert!(PickedUp.can_transition_to(Cancelled));

        assert!(!Ready.can_transition_to(Preparing));
        assert!(!Preparing.can_transition_to(Preparing));
        assert!(!Delivered.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Received));
    }

    #[test]
    fn test_selected_modifier_snapshots_modifier() {
        let now = Utc::now();
        let modifier = Modifier {
            id: "mod-1".to_string(),
            name: "Extra cheese".to_string(),
            price_delta_cents: 120,
            created_at: now,
            updated_at: now,
        };
        let selected = SelectedModifier::from(&modifier);
        assert_eq!(selected.modifier_id, "mod-1");
        assert_eq!(selected.price_delta_cents, 120);
    }
}
