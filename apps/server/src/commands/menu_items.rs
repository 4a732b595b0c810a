//! # Menu Item Actions
//!
//! Dishes and drinks, each with the list of modifiers a server may apply.
//!
//! ## Printer Routing
//! ```text
//! menu item printer_role_id ──► set?  yes ──► that role
//!                                      no  ──► category default role
//!                                              └─► none? "kitchen"
//! ```

use std::collections::HashSet;

use serde::Deserialize;
use tracing::{debug, info};

use super::ensure_printer_role;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use mesa_core::validation::{
    validate_name, validate_optional_text, validate_price_cents, MAX_NAME_LEN, MAX_TEXT_LEN,
};
use mesa_core::MenuItem;
use mesa_db::MenuItemDraft;

fn default_available() -> bool {
    true
}

/// Body of create and update requests.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price_cents: i64,
    pub category_id: String,
    #[serde(default)]
    pub printer_role_id: Option<String>,
    #[serde(default = "default_available")]
    pub is_available: bool,
    #[serde(default)]
    pub modifier_ids: Vec<String>,
}

async fn prepare(state: &AppState, input: MenuItemInput) -> ApiResult<MenuItemDraft> {
    let name = validate_name("name", &input.name, MAX_NAME_LEN)?;
    let description = validate_optional_text("description", input.description.as_deref(), MAX_TEXT_LEN)?;
    validate_price_cents(input.price_cents)?;

    state
        .db
        .categories()
        .get_by_id(&input.category_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Category", &input.category_id))?;

    if let Some(role_id) = &input.printer_role_id {
        ensure_printer_role(state, role_id).await?;
    }

    let mut seen = HashSet::new();
    let mut modifier_ids = input.modifier_ids;
    modifier_ids.retain(|id| seen.insert(id.clone()));
    state.db.modifiers().get_many(&modifier_ids).await?;

    Ok(MenuItemDraft {
        name,
        description,
        price_cents: input.price_cents,
        category_id: input.category_id,
        printer_role_id: input.printer_role_id,
        is_available: input.is_available,
        modifier_ids,
    })
}

/// Lists menu items, optionally only one category's.
pub async fn get_all_menu_items(
    state: &AppState,
    category_id: Option<&str>,
) -> ApiResult<Vec<MenuItem>> {
    Ok(state.db.menu_items().list(category_id).await?)
}

/// Gets a menu item with its modifiers.
pub async fn get_menu_item_by_id(state: &AppState, id: &str) -> ApiResult<MenuItem> {
    state
        .db
        .menu_items()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Menu item", id))
}

pub async fn create_menu_item(state: &AppState, input: MenuItemInput) -> ApiResult<MenuItem> {
    debug!(name = %input.name, category_id = %input.category_id, "create_menu_item command");
    let draft = prepare(state, input).await?;

    let item = state.db.menu_items().insert(&draft).await?;
    info!(id = %item.id, name = %item.name, price_cents = item.price_cents, "Menu item created");
    Ok(item)
}

/// Replaces a menu item's fields and modifier list.
///
/// Existing order lines keep the name and price they were rung up with.
pub async fn update_menu_item(state: &AppState, id: &str, input: MenuItemInput) -> ApiResult<MenuItem> {
    debug!(id = %id, "update_menu_item command");
    get_menu_item_by_id(state, id).await?;
    let draft = prepare(state, input).await?;

    let item = state.db.menu_items().update(id, &draft).await?;
    info!(id = %id, name = %item.name, modifiers = item.modifiers.len(), "Menu item updated");
    Ok(item)
}

/// Deletes a menu item that no order references.
pub async fn delete_menu_item(state: &AppState, id: &str) -> ApiResult<()> {
    debug!(id = %id, "delete_menu_item command");
    let item = get_menu_item_by_id(state, id).await?;
    let message = format!(
        "'{}' appears on existing orders and cannot be deleted. Mark it unavailable instead.",
        item.name
    );

    if state.db.menu_items().count_order_lines(id).await? > 0 {
        return Err(ApiError::in_use(message));
    }

    state
        .db
        .menu_items()
        .delete(id)
        .await
        .map_err(|e| ApiError::from_db_in_use(e, message))?;

    info!(id = %id, name = %item.name, "Menu item deleted");
    Ok(())
}
