//! # Printer Repository
//!
//! Database operations for configured printers.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use mesa_core::Printer;

const SELECT_PRINTER: &str = r#"
    SELECT id, name, role_id, connection, is_active, created_at, updated_at
    FROM printers
"#;

/// Fields accepted when creating or editing a printer.
#[derive(Debug, Clone)]
pub struct PrinterDraft {
    pub name: String,
    pub role_id: String,
    pub connection: String,
    pub is_active: bool,
}

/// Repository for printer operations.
#[derive(Debug, Clone)]
pub struct PrinterRepository {
    pool: SqlitePool,
}

impl PrinterRepository {
    /// Creates a new PrinterRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PrinterRepository { pool }
    }

    /// Lists printers ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Printer>> {
        let sql = format!("{SELECT_PRINTER} ORDER BY name ASC");
        let printers = sqlx::query_as::<_, Printer>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(printers)
    }

    /// Gets a printer by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Printer>> {
        let sql = format!("{SELECT_PRINTER} WHERE id = ?1");
        let printer = sqlx::query_as::<_, Printer>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(printer)
    }

    /// Returns true when another printer already uses `name`.
    pub async fn name_taken(&self, name: &str, exclude_id: Option<&str>) -> DbResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM printers WHERE name = ?1 AND (?2 IS NULL OR id != ?2)",
        )
        .bind(name)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    /// Inserts a new printer.
    pub async fn insert(&self, draft: &PrinterDraft) -> DbResult<Printer> {
        let now = Utc::now();
        let printer = Printer {
            id: Uuid::new_v4().to_string(),
            name: draft.name.clone(),
            role_id: draft.role_id.clone(),
            connection: draft.connection.clone(),
            is_active: draft.is_active,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %printer.id, name = %printer.name, role_id = %printer.role_id, "Inserting printer");

        sqlx::query(
            r#"
            INSERT INTO printers (
                id, name, role_id, connection, is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&printer.id)
        .bind(&printer.name)
        .bind(&printer.role_id)
        .bind(&printer.connection)
        .bind(printer.is_active)
        .bind(printer.created_at)
        .bind(printer.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(printer)
    }

    /// Replaces a printer's editable fields.
    pub async fn update(&self, id: &str, draft: &PrinterDraft) -> DbResult<Printer> {
        debug!(id = %id, name = %draft.name, "Updating printer");

        let result = sqlx::query(
            r#"
            UPDATE printers SET
                name = ?2,
                role_id = ?3,
                connection = ?4,
                is_active = ?5,
                updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&draft.name)
        .bind(&draft.role_id)
        .bind(&draft.connection)
        .bind(draft.is_active)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Printer", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Printer", id))
    }

    /// Deletes a printer.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting printer");

        let result = sqlx::query("DELETE FROM printers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Printer", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_printer_crud() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let roles = db.printer_roles().list().await.unwrap();
        let bar = roles.iter().find(|r| r.name == "bar").unwrap();

        let repo = db.printers();
        let printer = repo
            .insert(&PrinterDraft {
                name: "Bar printer".to_string(),
                role_id: bar.id.clone(),
                connection: "192.168.1.50:9100".to_string(),
                is_active: true,
            })
            .await
            .unwrap();

        let updated = repo
            .update(
                &printer.id,
                &PrinterDraft {
                    name: "Bar printer".to_string(),
                    role_id: bar.id.clone(),
                    connection: "192.168.1.51:9100".to_string(),
                    is_active: false,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.connection, "192.168.1.51:9100");
        assert!(!updated.is_active);

        repo.delete(&printer.id).await.unwrap();
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_role_is_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db
            .printers()
            .insert(&PrinterDraft {
                name: "Ghost".to_string(),
                role_id: "missing".to_string(),
                connection: "/dev/usb/lp0".to_string(),
                is_active: true,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }
}
