//! # Repository Module
//!
//! Database repository implementations for Mesa POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Server action                                                         │
//! │       │                                                                 │
//! │       │  db.orders().add_item(&order_id, &line)                        │
//! │       ▼                                                                 │
//! │  OrderRepository                                                       │
//! │  ├── BEGIN                                                             │
//! │  ├── check order is still modifiable    (mesa-core rule)              │
//! │  ├── INSERT order_items                                                │
//! │  ├── recompute totals                   (mesa-core arithmetic)        │
//! │  ├── UPDATE orders, dining_tables                                      │
//! │  └── COMMIT                                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each repository owns a clone of the pool. Editable entities take a
//! `*Draft` struct for both insert and update, and expose a
//! `name_taken`-style pre-check for their unique column.
//!
//! ## Available Repositories
//!
//! - [`TableRepository`] - Floor plan
//! - [`CategoryRepository`] - Menu sections
//! - [`MenuItemRepository`] - Dishes and their modifier links
//! - [`ModifierRepository`] - Priced add-ons
//! - [`OrderRepository`] - Orders, lines, status, payment, kitchen tickets
//! - [`PrinterRoleRepository`] - Printer roles
//! - [`PrinterRepository`] - Configured printers
//! - [`DeliveryOrderRepository`] - Delivery platform orders

pub mod category;
pub mod delivery;
pub mod menu_item;
pub mod modifier;
pub mod order;
pub mod printer;
pub mod printer_role;
pub mod table;

pub use category::{CategoryDraft, CategoryRepository};
pub use delivery::{DeliveryOrderDraft, DeliveryOrderRepository};
pub use menu_item::{MenuItemDraft, MenuItemRepository};
pub use modifier::{ModifierDraft, ModifierRepository};
pub use order::{NewOrderItem, OrderRepository, PaymentOutcome};
pub use printer::{PrinterDraft, PrinterRepository};
pub use printer_role::{PrinterRoleDraft, PrinterRoleRepository, RoleUsage};
pub use table::{TableDraft, TableRepository};
