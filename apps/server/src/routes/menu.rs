//! Menu routes: categories, menu items, modifiers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use super::{ApiJson, ApiQuery};
use crate::commands::{categories, menu_items, modifiers};
use crate::error::{ApiResult, DeleteResult};
use crate::state::AppState;
use mesa_core::{MenuCategory, MenuItem, Modifier};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            get(get_category).put(update_category).delete(delete_category),
        )
        .route("/menu-items", get(list_menu_items).post(create_menu_item))
        .route(
            "/menu-items/{id}",
            get(get_menu_item).put(update_menu_item).delete(delete_menu_item),
        )
        .route("/modifiers", get(list_modifiers).post(create_modifier))
        .route(
            "/modifiers/{id}",
            get(get_modifier).put(update_modifier).delete(delete_modifier),
        )
}

// =============================================================================
// Categories
// =============================================================================

async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<MenuCategory>>> {
    Ok(Json(categories::get_all_categories(&state).await?))
}

async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MenuCategory>> {
    Ok(Json(categories::get_category_by_id(&state, &id).await?))
}

async fn create_category(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<categories::CategoryInput>,
) -> ApiResult<(StatusCode, Json<MenuCategory>)> {
    let category = categories::create_category(&state, input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<categories::CategoryInput>,
) -> ApiResult<Json<MenuCategory>> {
    Ok(Json(categories::update_category(&state, &id, input).await?))
}

async fn delete_category(State(state): State<AppState>, Path(id): Path<String>) -> DeleteResult {
    categories::delete_category(&state, &id).await.into()
}

// =============================================================================
// Menu items
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MenuItemQuery {
    category_id: Option<String>,
}

/// GET /api/menu-items?categoryId=...
async fn list_menu_items(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<MenuItemQuery>,
) -> ApiResult<Json<Vec<MenuItem>>> {
    Ok(Json(
        menu_items::get_all_menu_items(&state, query.category_id.as_deref()).await?,
    ))
}

async fn get_menu_item(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<MenuItem>> {
    Ok(Json(menu_items::get_menu_item_by_id(&state, &id).await?))
}

async fn create_menu_item(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<menu_items::MenuItemInput>,
) -> ApiResult<(StatusCode, Json<MenuItem>)> {
    let item = menu_items::create_menu_item(&state, input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn update_menu_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<menu_items::MenuItemInput>,
) -> ApiResult<Json<MenuItem>> {
    Ok(Json(menu_items::update_menu_item(&state, &id, input).await?))
}

async fn delete_menu_item(State(state): State<AppState>, Path(id): Path<String>) -> DeleteResult {
    menu_items::delete_menu_item(&state, &id).await.into()
}

// =============================================================================
// Modifiers
// =============================================================================

async fn list_modifiers(State(state): State<AppState>) -> ApiResult<Json<Vec<Modifier>>> {
    Ok(Json(modifiers::get_all_modifiers(&state).await?))
}

async fn get_modifier(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Modifier>> {
    Ok(Json(modifiers::get_modifier_by_id(&state, &id).await?))
}

async fn create_modifier(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<modifiers::ModifierInput>,
) -> ApiResult<(StatusCode, Json<Modifier>)> {
    let modifier = modifiers::create_modifier(&state, input).await?;
    Ok((StatusCode::CREATED, Json(modifier)))
}

async fn update_modifier(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<modifiers::ModifierInput>,
) -> ApiResult<Json<Modifier>> {
    Ok(Json(modifiers::update_modifier(&state, &id, input).await?))
}

async fn delete_modifier(State(state): State<AppState>, Path(id): Path<String>) -> DeleteResult {
    modifiers::delete_modifier(&state, &id).await.into()
}
