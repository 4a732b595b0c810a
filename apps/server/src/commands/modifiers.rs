//! # Modifier Actions
//!
//! Priced add-ons. Deleting a modifier unlinks it from every menu item;
//! order lines keep their own snapshot of it.

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use mesa_core::validation::{validate_name, validate_price_delta, MAX_NAME_LEN};
use mesa_core::Modifier;
use mesa_db::ModifierDraft;

/// Body of create and update requests.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifierInput {
    pub name: String,
    #[serde(default)]
    pub price_delta_cents: i64,
}

async fn prepare(state: &AppState, input: ModifierInput, id: Option<&str>) -> ApiResult<ModifierDraft> {
    let name = validate_name("name", &input.name, MAX_NAME_LEN)?;
    validate_price_delta(input.price_delta_cents)?;

    if state.db.modifiers().name_taken(&name, id).await? {
        return Err(ApiError::duplicate(format!("Modifier '{}' already exists", name)));
    }

    Ok(ModifierDraft {
        name,
        price_delta_cents: input.price_delta_cents,
    })
}

pub async fn get_all_modifiers(state: &AppState) -> ApiResult<Vec<Modifier>> {
    Ok(state.db.modifiers().list().await?)
}

pub async fn get_modifier_by_id(state: &AppState, id: &str) -> ApiResult<Modifier> {
    state
        .db
        .modifiers()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Modifier", id))
}

pub async fn create_modifier(state: &AppState, input: ModifierInput) -> ApiResult<Modifier> {
    debug!(name = %input.name, "create_modifier command");
    let draft = prepare(state, input, None).await?;

    let modifier = state.db.modifiers().insert(&draft).await?;
    info!(id = %modifier.id, name = %modifier.name, "Modifier created");
    Ok(modifier)
}

pub async fn update_modifier(state: &AppState, id: &str, input: ModifierInput) -> ApiResult<Modifier> {
    debug!(id = %id, "update_modifier command");
    get_modifier_by_id(state, id).await?;
    let draft = prepare(state, input, Some(id)).await?;

    let modifier = state.db.modifiers().update(id, &draft).await?;
    info!(id = %id, name = %modifier.name, "Modifier updated");
    Ok(modifier)
}

pub async fn delete_modifier(state: &AppState, id: &str) -> ApiResult<()> {
    debug!(id = %id, "delete_modifier command");
    state.db.modifiers().delete(id).await?;
    info!(id = %id, "Modifier deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_state;
    use crate::error::ErrorCode;

    fn input(name: &str, delta: i64) -> ModifierInput {
        ModifierInput {
            name: name.to_string(),
            price_delta_cents: delta,
        }
    }

    #[tokio::test]
    async fn test_modifier_crud() {
        let state = test_state().await;
        let cheese = create_modifier(&state, input("Extra cheese", 120)).await.unwrap();
        create_modifier(&state, input("No onions", 0)).await.unwrap();

        let err = create_modifier(&state, input("Extra cheese", 50)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Duplicate);

        let updated = update_modifier(&state, &cheese.id, input("Extra cheese", 150))
            .await
            .unwrap();
        assert_eq!(updated.price_delta_cents, 150);

        delete_modifier(&state, &cheese.id).await.unwrap();
        assert_eq!(get_all_modifiers(&state).await.unwrap().len(), 1);

        let err = get_modifier_by_id(&state, &cheese.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_negative_delta_allowed() {
        let state = test_state().await;
        let small = create_modifier(&state, input("Half portion", -300)).await.unwrap();
        assert_eq!(small.price_delta_cents, -300);
    }

    #[tokio::test]
    async fn test_delta_out_of_range_rejected() {
        use mesa_core::MAX_PRICE_DELTA_CENTS;

        let state = test_state().await;
        let err = create_modifier(&state, input("Gold leaf", MAX_PRICE_DELTA_CENTS + 1))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = create_modifier(&state, input("Free", i64::MIN)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(get_all_modifiers(&state).await.unwrap().is_empty());
    }
}
