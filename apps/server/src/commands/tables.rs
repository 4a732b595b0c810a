//! # Table Actions
//!
//! Floor plan management.
//!
//! ## Table Lifecycle
//! ```text
//! ┌─────────────┐  create_order   ┌─────────────┐   pay_order    ┌─────────────┐
//! │  available  │ ──────────────► │  occupied   │ ─────────────► │    dirty    │
//! └─────────────┘                 └─────────────┘                └─────────────┘
//!    ▲     ▲                             │ cancel                       │
//!    │     └─────────────────────────────┘                              │
//!    └──────────── update_table_status("available") after bussing ──────┘
//! ```
//!
//! A table linked to a running order stays `occupied` until the order is
//! paid or cancelled.

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use mesa_core::validation::{validate_capacity, validate_table_number};
use mesa_core::{CoreError, Table, TableStatus};
use mesa_db::TableDraft;

/// Body of create and update requests.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableInput {
    pub number: i64,
    pub capacity: i64,
}

/// Body of a status change request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableStatusInput {
    pub status: TableStatus,
}

impl TableInput {
    fn validate(&self) -> ApiResult<TableDraft> {
        validate_table_number(self.number)?;
        validate_capacity(self.capacity)?;
        Ok(TableDraft {
            number: self.number,
            capacity: self.capacity,
        })
    }
}

/// Lists every table, ascending by number.
pub async fn get_all_tables(state: &AppState) -> ApiResult<Vec<Table>> {
    Ok(state.db.tables().list().await?)
}

/// Gets a single table.
pub async fn get_table_by_id(state: &AppState, id: &str) -> ApiResult<Table> {
    state
        .db
        .tables()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Table", id))
}

/// Adds a table to the floor plan.
pub async fn create_table(state: &AppState, input: TableInput) -> ApiResult<Table> {
    debug!(number = input.number, "create_table command");
    let draft = input.validate()?;

    if state.db.tables().number_taken(draft.number, None).await? {
        return Err(ApiError::duplicate(format!(
            "Table number {} already exists",
            draft.number
        )));
    }

    let table = state.db.tables().insert(&draft).await?;
    info!(id = %table.id, number = table.number, "Table created");
    Ok(table)
}

/// Changes a table's number or capacity.
pub async fn update_table(state: &AppState, id: &str, input: TableInput) -> ApiResult<Table> {
    debug!(id = %id, "update_table command");
    let draft = input.validate()?;
    get_table_by_id(state, id).await?;

    if state.db.tables().number_taken(draft.number, Some(id)).await? {
        return Err(ApiError::duplicate(format!(
            "Table number {} already exists",
            draft.number
        )));
    }

    let table = state.db.tables().update(id, &draft).await?;
    info!(id = %id, number = table.number, "Table updated");
    Ok(table)
}

/// Sets a table's status by hand (reserving, bussing).
///
/// A table linked to a running order can only be `occupied`.
pub async fn update_table_status(
    state: &AppState,
    id: &str,
    input: TableStatusInput,
) -> ApiResult<Table> {
    debug!(id = %id, status = %input.status, "update_table_status command");
    let table = get_table_by_id(state, id).await?;

    if table.current_order_id.is_some() && input.status != TableStatus::Occupied {
        return Err(CoreError::TableOccupied {
            table_number: table.number,
        }
        .into());
    }

    let table = state.db.tables().update_status(id, input.status).await?;
    info!(id = %id, number = table.number, status = %table.status, "Table status updated");
    Ok(table)
}

/// Removes a table. Tables with order history cannot be removed.
pub async fn delete_table(state: &AppState, id: &str) -> ApiResult<()> {
    debug!(id = %id, "delete_table command");
    let table = get_table_by_id(state, id).await?;

    if table.current_order_id.is_some() {
        return Err(CoreError::TableOccupied {
            table_number: table.number,
        }
        .into());
    }

    state.db.tables().delete(id).await.map_err(|e| {
        ApiError::from_db_in_use(
            e,
            format!("Table {} has orders and cannot be deleted", table.number),
        )
    })?;

    info!(id = %id, number = table.number, "Table deleted");
    Ok(())
}
