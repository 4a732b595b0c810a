//! # Printer Role Actions
//!
//! Roles name a destination ("kitchen", "bar") independent of the physical
//! printer. The four standard roles ship with the schema.

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use mesa_core::validation::{validate_name, validate_optional_text, MAX_NAME_LEN, MAX_TEXT_LEN};
use mesa_core::PrinterRole;
use mesa_db::PrinterRoleDraft;

/// Body of create and update requests.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrinterRoleInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

async fn prepare(state: &AppState, input: PrinterRoleInput, id: Option<&str>) -> ApiResult<PrinterRoleDraft> {
    let name = validate_name("name", &input.name, MAX_NAME_LEN)?.to_lowercase();
    let description = validate_optional_text("description", input.description.as_deref(), MAX_TEXT_LEN)?;

    if state.db.printer_roles().name_taken(&name, id).await? {
        return Err(ApiError::duplicate(format!("Printer role '{}' already exists", name)));
    }

    Ok(PrinterRoleDraft { name, description })
}

/// Lists roles by name. Also served to the print server.
pub async fn get_all_printer_roles(state: &AppState) -> ApiResult<Vec<PrinterRole>> {
    Ok(state.db.printer_roles().list().await?)
}

pub async fn create_printer_role(state: &AppState, input: PrinterRoleInput) -> ApiResult<PrinterRole> {
    debug!(name = %input.name, "create_printer_role command");
    let draft = prepare(state, input, None).await?;

    let role = state.db.printer_roles().insert(&draft).await?;
    info!(id = %role.id, name = %role.name, "Printer role created");
    Ok(role)
}

pub async fn update_printer_role(
    state: &AppState,
    id: &str,
    input: PrinterRoleInput,
) -> ApiResult<PrinterRole> {
    debug!(id = %id, "update_printer_role command");
    state
        .db
        .printer_roles()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Printer role", id))?;
    let draft = prepare(state, input, Some(id)).await?;

    let role = state.db.printer_roles().update(id, &draft).await?;
    info!(id = %id, name = %role.name, "Printer role updated");
    Ok(role)
}

/// Deletes a role nothing references.
pub async fn delete_printer_role(state: &AppState, id: &str) -> ApiResult<()> {
    debug!(id = %id, "delete_printer_role command");
    let role = state
        .db
        .printer_roles()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Printer role", id))?;

    let usage = state.db.printer_roles().usage(id).await?;
    if !usage.is_unused() {
        return Err(ApiError::in_use(format!(
            "Printer role '{}' is used by {} categories, {} menu items and {} printers",
            role.name, usage.categories, usage.menu_items, usage.printers
        )));
    }

    state
        .db
        .printer_roles()
        .delete(id)
        .await
        .map_err(|e| ApiError::from_db_in_use(e, format!("Printer role '{}' is in use", role.name)))?;

    info!(id = %id, name = %role.name, "Printer role deleted");
    Ok(())
}
