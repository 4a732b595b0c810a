//! # Printer Actions
//!
//! Physical printers and the role each one serves.

use serde::Deserialize;
use tracing::{debug, info};

use super::ensure_printer_role;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use mesa_core::validation::{validate_name, MAX_NAME_LEN, MAX_TEXT_LEN};
use mesa_core::Printer;
use mesa_db::PrinterDraft;

fn default_active() -> bool {
    true
}

/// Body of create and update requests.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrinterInput {
    pub name: String,
    pub role_id: String,
    /// Network address (`host:port`) or device path.
    pub connection: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

async fn prepare(state: &AppState, input: PrinterInput, id: Option<&str>) -> ApiResult<PrinterDraft> {
    let name = validate_name("name", &input.name, MAX_NAME_LEN)?;
    let connection = validate_name("connection", &input.connection, MAX_TEXT_LEN)?;
    ensure_printer_role(state, &input.role_id).await?;

    if state.db.printers().name_taken(&name, id).await? {
        return Err(ApiError::duplicate(format!("Printer '{}' already exists", name)));
    }

    Ok(PrinterDraft {
        name,
        role_id: input.role_id,
        connection,
        is_active: input.is_active,
    })
}

pub async fn get_all_printers(state: &AppState) -> ApiResult<Vec<Printer>> {
    Ok(state.db.printers().list().await?)
}

pub async fn get_printer_by_id(state: &AppState, id: &str) -> ApiResult<Printer> {
    state
        .db
        .printers()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Printer", id))
}

pub async fn create_printer(state: &AppState, input: PrinterInput) -> ApiResult<Printer> {
    debug!(name = %input.name, role_id = %input.role_id, "create_printer command");
    let draft = prepare(state, input, None).await?;

    let printer = state.db.printers().insert(&draft).await?;
    info!(id = %printer.id, name = %printer.name, "Printer created");
    Ok(printer)
}

pub async fn update_printer(state: &AppState, id: &str, input: PrinterInput) -> ApiResult<Printer> {
    debug!(id = %id, "update_printer command");
    get_printer_by_id(state, id).await?;
    let draft = prepare(state, input, Some(id)).await?;

    let printer = state.db.printers().update(id, &draft).await?;
    info!(id = %id, name = %printer.name, active = printer.is_active, "Printer updated");
    Ok(printer)
}

pub async fn delete_printer(state: &AppState, id: &str) -> ApiResult<()> {
    debug!(id = %id, "delete_printer command");
    state.db.printers().delete(id).await?;
    info!(id = %id, "Printer deleted");
    Ok(())
}
