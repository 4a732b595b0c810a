//! # Category Actions
//!
//! Menu sections and their default printer role.

use serde::Deserialize;
use tracing::{debug, info};

use super::ensure_printer_role;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use mesa_core::validation::{validate_name, validate_optional_text, MAX_NAME_LEN};
use mesa_core::MenuCategory;
use mesa_db::CategoryDraft;

/// Body of create and update requests.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub default_printer_role_id: Option<String>,
}

async fn prepare(state: &AppState, input: CategoryInput, id: Option<&str>) -> ApiResult<CategoryDraft> {
    let name = validate_name("name", &input.name, MAX_NAME_LEN)?;
    let icon = validate_optional_text("icon", input.icon.as_deref(), MAX_NAME_LEN)?;

    if let Some(role_id) = &input.default_printer_role_id {
        ensure_printer_role(state, role_id).await?;
    }

    if state.db.categories().name_taken(&name, id).await? {
        return Err(ApiError::duplicate(format!("Category '{}' already exists", name)));
    }

    Ok(CategoryDraft {
        name,
        icon,
        default_printer_role_id: input.default_printer_role_id,
    })
}

/// Lists categories by name.
pub async fn get_all_categories(state: &AppState) -> ApiResult<Vec<MenuCategory>> {
    Ok(state.db.categories().list().await?)
}

/// Gets a single category.
pub async fn get_category_by_id(state: &AppState, id: &str) -> ApiResult<MenuCategory> {
    state
        .db
        .categories()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Category", id))
}

pub async fn create_category(state: &AppState, input: CategoryInput) -> ApiResult<MenuCategory> {
    debug!(name = %input.name, "create_category command");
    let draft = prepare(state, input, None).await?;

    let category = state.db.categories().insert(&draft).await?;
    info!(id = %category.id, name = %category.name, "Category created");
    Ok(category)
}

/// Renames or re-routes a category. Keeping its own name is allowed.
pub async fn update_category(
    state: &AppState,
    id: &str,
    input: CategoryInput,
) -> ApiResult<MenuCategory> {
    debug!(id = %id, name = %input.name, "update_category command");
    get_category_by_id(state, id).await?;
    let draft = prepare(state, input, Some(id)).await?;

    let category = state.db.categories().update(id, &draft).await?;
    info!(id = %id, name = %category.name, "Category updated");
    Ok(category)
}

/// Deletes an empty category.
pub async fn delete_category(state: &AppState, id: &str) -> ApiResult<()> {
    debug!(id = %id, "delete_category command");
    let category = get_category_by_id(state, id).await?;

    let items = state.db.categories().count_menu_items(id).await?;
    if items > 0 {
        return Err(ApiError::in_use(format!(
            "Category '{}' has {} menu items and cannot be deleted",
            category.name, items
        )));
    }

    state.db.categories().delete(id).await.map_err(|e| {
        ApiError::from_db_in_use(e, format!("Category '{}' is in use", category.name))
    })?;

    info!(id = %id, name = %category.name, "Category deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_state;
    use crate::error::ErrorCode;

    fn input(name: &str) -> CategoryInput {
        CategoryInput {
            name: name.to_string(),
            icon: None,
            default_printer_role_id: None,
        }
    }

    #[tokio::test]
    async fn test_rename_rules() {
        let state = test_state().await;
        let drinks = create_category(&state, input("Drinks")).await.unwrap();
        create_category(&state, input("Mains")).await.unwrap();

        let same = update_category(&state, &drinks.id, input("Drinks")).await.unwrap();
        assert_eq!(same.name, "Drinks");

        let err = update_category(&state, &drinks.id, input("Mains")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Duplicate);
        assert_eq!(err.message, "Category 'Mains' already exists");
    }

    #[tokio::test]
    async fn test_name_is_trimmed_and_required() {
        let state = test_state().await;
        let category = create_category(&state, input("  Desserts ")).await.unwrap();
        assert_eq!(category.name, "Desserts");

        let err = create_category(&state, input("   ")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_unknown_printer_role() {
        let state = test_state().await;
        let mut body = input("Bar");
        body.default_printer_role_id = Some("nope".to_string());

        let err = create_category(&state, body).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_delete_rejected_while_items_exist() {
        let state = test_state().await;
        let category = create_category(&state, input("Starters")).await.unwrap();
        state
            .db
            .menu_items()
            .insert(&mesa_db::MenuItemDraft {
                name: "Soup".to_string(),
                description: None,
                price_cents: 650,
                category_id: category.id.clone(),
                printer_role_id: None,
                is_available: true,
                modifier_ids: vec![],
            })
            .await
            .unwrap();

        let err = delete_category(&state, &category.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InUse);

        let empty = create_category(&state, input("Specials")).await.unwrap();
        delete_category(&state, &empty.id).await.unwrap();
    }
}
