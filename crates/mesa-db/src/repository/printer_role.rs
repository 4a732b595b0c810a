//! # Printer Role Repository
//!
//! Database operations for printer role definitions.
//!
//! The four standard roles (kitchen, bar, receipt, report) are seeded by
//! migration `002`. Roles are referenced by categories, menu items and
//! printers. A role cannot be deleted while any of them still point at it.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use mesa_core::PrinterRole;

const SELECT_ROLE: &str = "SELECT id, name, description, created_at FROM printer_roles";

/// Fields accepted when creating or editing a printer role.
#[derive(Debug, Clone)]
pub struct PrinterRoleDraft {
    pub name: String,
    pub description: Option<String>,
}

/// Where a printer role is still referenced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoleUsage {
    pub categories: i64,
    pub menu_items: i64,
    pub printers: i64,
}

impl RoleUsage {
    pub fn is_unused(&self) -> bool {
        self.categories == 0 && self.menu_items == 0 && self.printers == 0
    }
}

/// Repository for printer role operations.
#[derive(Debug, Clone)]
pub struct PrinterRoleRepository {
    pool: SqlitePool,
}

impl PrinterRoleRepository {
    /// Creates a new PrinterRoleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PrinterRoleRepository { pool }
    }

    /// Lists roles ordered by name.
    pub async fn list(&self) -> DbResult<Vec<PrinterRole>> {
        let sql = format!("{SELECT_ROLE} ORDER BY name ASC");
        let roles = sqlx::query_as::<_, PrinterRole>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(roles)
    }

    /// Gets a role by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<PrinterRole>> {
        let sql = format!("{SELECT_ROLE} WHERE id = ?1");
        let role = sqlx::query_as::<_, PrinterRole>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(role)
    }

    /// Returns true when another role already uses `name`.
    pub async fn name_taken(&self, name: &str, exclude_id: Option<&str>) -> DbResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM printer_roles WHERE name = ?1 AND (?2 IS NULL OR id != ?2)",
        )
        .bind(name)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    /// Counts the rows that reference a role.
    pub async fn usage(&self, id: &str) -> DbResult<RoleUsage> {
        let (categories, menu_items, printers): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM menu_categories WHERE default_printer_role_id = ?1),
                (SELECT COUNT(*) FROM menu_items WHERE printer_role_id = ?1),
                (SELECT COUNT(*) FROM printers WHERE role_id = ?1)
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(RoleUsage {
            categories,
            menu_items,
            printers,
        })
    }

    /// Inserts a new role.
    pub async fn insert(&self, draft: &PrinterRoleDraft) -> DbResult<PrinterRole> {
        let role = PrinterRole {
            id: Uuid::new_v4().to_string(),
            name: draft.name.clone(),
            description: draft.description.clone(),
            created_at: Utc::now(),
        };

        debug!(id = %role.id, name = %role.name, "Inserting printer role");

        sqlx::query(
            "INSERT INTO printer_roles (id, name, description, created_at) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&role.id)
        .bind(&role.name)
        .bind(&role.description)
        .bind(role.created_at)
        .execute(&self.pool)
        .await?;

        Ok(role)
    }

    /// Replaces a role's name and description.
    pub async fn update(&self, id: &str, draft: &PrinterRoleDraft) -> DbResult<PrinterRole> {
        debug!(id = %id, name = %draft.name, "Updating printer role");

        let result = sqlx::query("UPDATE printer_roles SET name = ?2, description = ?3 WHERE id = ?1")
            .bind(id)
            .bind(&draft.name)
            .bind(&draft.description)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("PrinterRole", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("PrinterRole", id))
    }

    /// Deletes a role.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting printer role");

        let result = sqlx::query("DELETE FROM printer_roles WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("PrinterRole", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::PrinterDraft;
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_usage_counts_printers() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let role = db
            .printer_roles()
            .insert(&PrinterRoleDraft { name: "dessert".to_string(), description: None })
            .await
            .unwrap();

        assert!(db.printer_roles().usage(&role.id).await.unwrap().is_unused());

        db.printers()
            .insert(&PrinterDraft {
                name: "Pastry".to_string(),
                role_id: role.id.clone(),
                connection: "10.0.0.9:9100".to_string(),
                is_active: true,
            })
            .await
            .unwrap();

        let usage = db.printer_roles().usage(&role.id).await.unwrap();
        assert_eq!(usage.printers, 1);
        assert!(!usage.is_unused());

        let err = db.printer_roles().delete(&role.id).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_duplicate_role_name() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.printer_roles().name_taken("kitchen", None).await.unwrap());

        let err = db
            .printer_roles()
            .insert(&PrinterRoleDraft { name: "kitchen".to_string(), description: None })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }
}
