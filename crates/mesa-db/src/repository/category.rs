//! # Category Repository
//!
//! Database operations for menu categories.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use mesa_core::MenuCategory;

const SELECT_CATEGORY: &str = r#"
    SELECT id, name, icon, default_printer_role_id, created_at, updated_at
    FROM menu_categories
"#;

/// Fields accepted when creating or editing a category.
#[derive(Debug, Clone)]
pub struct CategoryDraft {
    pub name: String,
    pub icon: Option<String>,
    pub default_printer_role_id: Option<String>,
}

/// Repository for menu category operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Lists categories ordered by name.
    pub async fn list(&self) -> DbResult<Vec<MenuCategory>> {
        let sql = format!("{SELECT_CATEGORY} ORDER BY name ASC");
        let categories = sqlx::query_as::<_, MenuCategory>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(categories)
    }

    /// Gets a category by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<MenuCategory>> {
        let sql = format!("{SELECT_CATEGORY} WHERE id = ?1");
        let category = sqlx::query_as::<_, MenuCategory>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(category)
    }

    /// Returns true when another category already uses `name`.
    pub async fn name_taken(&self, name: &str, exclude_id: Option<&str>) -> DbResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM menu_categories WHERE name = ?1 AND (?2 IS NULL OR id != ?2)",
        )
        .bind(name)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    /// Counts menu items filed under a category.
    pub async fn count_menu_items(&self, id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM menu_items WHERE category_id = ?1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Inserts a new category.
    pub async fn insert(&self, draft: &CategoryDraft) -> DbResult<MenuCategory> {
        let now = Utc::now();
        let category = MenuCategory {
            id: Uuid::new_v4().to_string(),
            name: draft.name.clone(),
            icon: draft.icon.clone(),
            default_printer_role_id: draft.default_printer_role_id.clone(),
            created_at: now,
            updated_at: now,
        };

        debug!(id = %category.id, name = %category.name, "Inserting category");

        sqlx::query(
            r#"
            INSERT INTO menu_categories (
                id, name, icon, default_printer_role_id, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&category.id)
        .bind(&category.name)
        .bind(&category.icon)
        .bind(&category.default_printer_role_id)
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(category)
    }

    /// Replaces a category's editable fields.
    pub async fn update(&self, id: &str, draft: &CategoryDraft) -> DbResult<MenuCategory> {
        debug!(id = %id, name = %draft.name, "Updating category");

        let result = sqlx::query(
            r#"
            UPDATE menu_categories SET
                name = ?2,
                icon = ?3,
                default_printer_role_id = ?4,
                updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&draft.name)
        .bind(&draft.icon)
        .bind(&draft.default_printer_role_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Category", id))
    }

    /// Deletes a category.
    ///
    /// Fails with [`DbError::ForeignKeyViolation`] while menu items use it.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting category");

        let result = sqlx::query("DELETE FROM menu_categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    fn draft(name: &str) -> CategoryDraft {
        CategoryDraft {
            name: name.to_string(),
            icon: None,
            default_printer_role_id: None,
        }
    }

    #[tokio::test]
    async fn test_rename_to_own_name_is_not_taken() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.categories();

        let starters = repo.insert(&draft("Starters")).await.unwrap();
        repo.insert(&draft("Mains")).await.unwrap();

        assert!(!repo.name_taken("Starters", Some(&starters.id)).await.unwrap());
        assert!(repo.name_taken("Mains", Some(&starters.id)).await.unwrap());

        let updated = repo.update(&starters.id, &draft("Starters")).await.unwrap();
        assert_eq!(updated.name, "Starters");

        let err = repo.update(&starters.id, &draft("Mains")).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_unknown_printer_role_is_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut bad = draft("Drinks");
        bad.default_printer_role_id = Some("missing".to_string());

        let err = db.categories().insert(&bad).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_list_sorted_by_name() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.categories();
        for name in ["Mains", "Desserts", "Starters"] {
            repo.insert(&draft(name)).await.unwrap();
        }

        let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Desserts", "Mains", "Starters"]);
    }
}
