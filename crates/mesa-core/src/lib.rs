//! # mesa-core: Pure Business Logic for Mesa POS
//!
//! This crate holds the restaurant domain as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Mesa POS Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Web Front End (external)                     │   │
//! │  │   Tables Map ──► Menu ──► Order Panel ──► Kitchen ──► Payment   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON over HTTP                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/server (actions + routes)               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ mesa-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   order   │  │  ticket   │  │   │
//! │  │   │  Table    │  │   Money   │  │  Totals   │  │  KOT      │  │   │
//! │  │   │  MenuItem │  │  TaxRate  │  │  Status   │  │  routing  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    mesa-db (Database Layer)                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Table, MenuItem, Order, Printer, ...)
//! - [`money`] - Money type with integer arithmetic
//! - [`order`] - Totals recomputation and the order status state machine
//! - [`ticket`] - Kitchen order ticket grouping by printer role
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use mesa_core::money::Money;
//! use mesa_core::DEFAULT_TAX_RATE;
//!
//! let subtotal = Money::from_cents(2500); // $25.00
//! let tax = subtotal.calculate_tax(DEFAULT_TAX_RATE);
//! assert_eq!(tax.cents(), 200); // 8% = $2.00
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod order;
pub mod ticket;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use order::OrderTotals;
pub use ticket::{KitchenTicket, TicketLine};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Sales tax applied to every order (8%).
pub const DEFAULT_TAX_RATE: TaxRate = TaxRate::from_bps(800);

/// Printer role used when neither the item nor its category names one.
pub const FALLBACK_PRINTER_ROLE: &str = "kitchen";

/// Maximum quantity of a single order line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 100 instead of 10)
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Most a single menu item or delivery order may cost ($100,000).
pub const MAX_PRICE_CENTS: i64 = 10_000_000;

/// Largest surcharge or discount one modifier may carry ($1,000).
pub const MAX_PRICE_DELTA_CENTS: i64 = 100_000;

/// Maximum number of lines on a single order.
pub const MAX_ORDER_LINES: usize = 200;

/// Largest seating capacity accepted for a table.
pub const MAX_TABLE_CAPACITY: i64 = 50;
