//! # Server Actions
//!
//! Every operation the front end can perform, one module per entity.
//!
//! ## Action Organization
//! ```text
//! commands/
//! ├── mod.rs            ◄─── You are here (exports)
//! ├── tables.rs         ◄─── Floor plan CRUD, table status
//! ├── categories.rs     ◄─── Menu categories
//! ├── menu_items.rs     ◄─── Menu items and their modifier lists
//! ├── modifiers.rs      ◄─── Modifier CRUD
//! ├── orders.rs         ◄─── Order entry, kitchen display, status
//! ├── payment.rs        ◄─── Settling orders
//! ├── printer_roles.rs  ◄─── Printer role definitions
//! ├── printers.rs       ◄─── Printer configurations
//! ├── print.rs          ◄─── Kitchen tickets to the print server
//! └── delivery.rs       ◄─── Delivery platform orders
//! ```
//!
//! ## How Actions Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Server Action Flow                                   │
//! │                                                                         │
//! │  Route handler (routes/)                                                │
//! │       │  State<AppState>, Path, Json<Input>                             │
//! │       ▼                                                                 │
//! │  pub async fn create_category(state: &AppState, input: CategoryInput)   │
//! │       │                                                                 │
//! │       ├── 1. validate fields (mesa_core::validation)                    │
//! │       ├── 2. check references exist (404)                               │
//! │       ├── 3. uniqueness pre-check (409)                                 │
//! │       ├── 4. repository mutation (mesa_db)                              │
//! │       └── 5. DbError / CoreError → ApiError                             │
//! │       ▼                                                                 │
//! │  ApiResult<MenuCategory> ──► JSON                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Input structs deserialize from camelCase JSON.

pub mod categories;
pub mod delivery;
pub mod menu_items;
pub mod modifiers;
pub mod orders;
pub mod payment;
pub mod print;
pub mod printer_roles;
pub mod printers;
pub mod tables;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Fails with 404 unless the printer role exists.
pub(crate) async fn ensure_printer_role(state: &AppState, role_id: &str) -> ApiResult<()> {
    state
        .db
        .printer_roles()
        .get_by_id(role_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Printer role", role_id))?;
    Ok(())
}

#[cfg(test)]
pub(crate) async fn test_state() -> AppState {
    use crate::config::ServerConfig;
    use mesa_db::{Database, DbConfig};

    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    AppState::new(db, ServerConfig::default()).unwrap()
}
