//! # Modifier Repository
//!
//! Database operations for modifiers ("Extra cheese", "No onions").
//!
//! Deleting a modifier drops its menu item links (ON DELETE CASCADE).
//! Order lines keep their JSON snapshot and are unaffected.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use mesa_core::Modifier;

const SELECT_MODIFIER: &str = r#"
    SELECT id, name, price_delta_cents, created_at, updated_at
    FROM modifiers
"#;

/// Fields accepted when creating or editing a modifier.
#[derive(Debug, Clone)]
pub struct ModifierDraft {
    pub name: String,
    pub price_delta_cents: i64,
}

/// Repository for modifier operations.
#[derive(Debug, Clone)]
pub struct ModifierRepository {
    pool: SqlitePool,
}

impl ModifierRepository {
    /// Creates a new ModifierRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ModifierRepository { pool }
    }

    /// Lists modifiers ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Modifier>> {
        let sql = format!("{SELECT_MODIFIER} ORDER BY name ASC");
        let modifiers = sqlx::query_as::<_, Modifier>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(modifiers)
    }

    /// Gets a modifier by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Modifier>> {
        let sql = format!("{SELECT_MODIFIER} WHERE id = ?1");
        let modifier = sqlx::query_as::<_, Modifier>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(modifier)
    }

    /// Resolves a list of modifier IDs, preserving the requested order.
    ///
    /// Fails with [`DbError::NotFound`] on the first unknown ID.
    pub async fn get_many(&self, ids: &[String]) -> DbResult<Vec<Modifier>> {
        let mut modifiers = Vec::with_capacity(ids.len());
        for id in ids {
            let modifier = self
                .get_by_id(id)
                .await?
                .ok_or_else(|| DbError::not_found("Modifier", id.as_str()))?;
            modifiers.push(modifier);
        }
        Ok(modifiers)
    }

    /// Returns true when another modifier already uses `name`.
    pub async fn name_taken(&self, name: &str, exclude_id: Option<&str>) -> DbResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM modifiers WHERE name = ?1 AND (?2 IS NULL OR id != ?2)",
        )
        .bind(name)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    /// Inserts a new modifier.
    pub async fn insert(&self, draft: &ModifierDraft) -> DbResult<Modifier> {
        let now = Utc::now();
        let modifier = Modifier {
            id: Uuid::new_v4().to_string(),
            name: draft.name.clone(),
            price_delta_cents: draft.price_delta_cents,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %modifier.id, name = %modifier.name, "Inserting modifier");

        sqlx::query(
            r#"
            INSERT INTO modifiers (id, name, price_delta_cents, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&modifier.id)
        .bind(&modifier.name)
        .bind(modifier.price_delta_cents)
        .bind(modifier.created_at)
        .bind(modifier.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(modifier)
    }

    /// Replaces a modifier's name and price delta.
    pub async fn update(&self, id: &str, draft: &ModifierDraft) -> DbResult<Modifier> {
        debug!(id = %id, name = %draft.name, "Updating modifier");

        let result = sqlx::query(
            "UPDATE modifiers SET name = ?2, price_delta_cents = ?3, updated_at = ?4 WHERE id = ?1",
        )
        .bind(id)
        .bind(&draft.name)
        .bind(draft.price_delta_cents)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Modifier", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Modifier", id))
    }

    /// Deletes a modifier and its menu item links.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting modifier");

        let result = sqlx::query("DELETE FROM modifiers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Modifier", id));
        }

        Ok(())
    }
}
