//! Printer and printer role routes.
//!
//! `GET /api/printer-roles` is also polled by the print server.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};

use super::ApiJson;
use crate::commands::printer_roles::{self, PrinterRoleInput};
use crate::commands::printers::{self, PrinterInput};
use crate::error::{ApiResult, DeleteResult};
use crate::state::AppState;
use mesa_core::{Printer, PrinterRole};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/printers", get(list_printers).post(create_printer))
        .route(
            "/printers/{id}",
            get(get_printer).put(update_printer).delete(delete_printer),
        )
        .route("/printer-roles", get(list_roles).post(create_role))
        .route("/printer-roles/{id}", put(update_role).delete(delete_role))
}

async fn list_printers(State(state): State<AppState>) -> ApiResult<Json<Vec<Printer>>> {
    Ok(Json(printers::get_all_printers(&state).await?))
}

async fn get_printer(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Printer>> {
    Ok(Json(printers::get_printer_by_id(&state, &id).await?))
}

async fn create_printer(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<PrinterInput>,
) -> ApiResult<(StatusCode, Json<Printer>)> {
    let printer = printers::create_printer(&state, input).await?;
    Ok((StatusCode::CREATED, Json(printer)))
}

async fn update_printer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<PrinterInput>,
) -> ApiResult<Json<Printer>> {
    Ok(Json(printers::update_printer(&state, &id, input).await?))
}

async fn delete_printer(State(state): State<AppState>, Path(id): Path<String>) -> DeleteResult {
    printers::delete_printer(&state, &id).await.into()
}

async fn list_roles(State(state): State<AppState>) -> ApiResult<Json<Vec<PrinterRole>>> {
    Ok(Json(printer_roles::get_all_printer_roles(&state).await?))
}

async fn create_role(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<PrinterRoleInput>,
) -> ApiResult<(StatusCode, Json<PrinterRole>)> {
    let role = printer_roles::create_printer_role(&state, input).await?;
    Ok((StatusCode::CREATED, Json(role)))
}

async fn update_role(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<PrinterRoleInput>,
) -> ApiResult<Json<PrinterRole>> {
    Ok(Json(printer_roles::update_printer_role(&state, &id, input).await?))
}

async fn delete_role(State(state): State<AppState>, Path(id): Path<String>) -> DeleteResult {
    printer_roles::delete_printer_role(&state, &id).await.into()
}
