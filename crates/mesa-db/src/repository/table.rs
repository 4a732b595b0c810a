//! # Table Repository
//!
//! Database operations for dining tables.
//!
//! Order-driven status changes (occupied on order creation, dirty on
//! payment) happen inside [`OrderRepository`](super::OrderRepository)
//! transactions. This repository covers the floor-plan editing side.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use mesa_core::{Table, TableStatus};

const SELECT_TABLE: &str = r#"
    SELECT id, number, capacity, status, current_order_id,
           current_order_total_cents, created_at, updated_at
    FROM dining_tables
"#;

/// Fields accepted when creating or editing a table.
#[derive(Debug, Clone)]
pub struct TableDraft {
    pub number: i64,
    pub capacity: i64,
}

/// Repository for dining table operations.
#[derive(Debug, Clone)]
pub struct TableRepository {
    pool: SqlitePool,
}

impl TableRepository {
    /// Creates a new TableRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TableRepository { pool }
    }

    /// Lists every table ordered by number.
    pub async fn list(&self) -> DbResult<Vec<Table>> {
        let sql = format!("{SELECT_TABLE} ORDER BY number ASC");
        let tables = sqlx::query_as::<_, Table>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = tables.len(), "Listed tables");
        Ok(tables)
    }

    /// Gets a table by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Table>> {
        let sql = format!("{SELECT_TABLE} WHERE id = ?1");
        let table = sqlx::query_as::<_, Table>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(table)
    }

    /// Returns true when another table already uses `number`.
    ///
    /// `exclude_id` skips the table being edited so that saving a table
    /// with its own number is not reported as a duplicate.
    pub async fn number_taken(&self, number: i64, exclude_id: Option<&str>) -> DbResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM dining_tables WHERE number = ?1 AND (?2 IS NULL OR id != ?2)",
        )
        .bind(number)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    /// Inserts a new, available table.
    pub async fn insert(&self, draft: &TableDraft) -> DbResult<Table> {
        let now = Utc::now();
        let table = Table {
            id: Uuid::new_v4().to_string(),
            number: draft.number,
            capacity: draft.capacity,
            status: TableStatus::Available,
            current_order_id: None,
            current_order_total_cents: None,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %table.id, number = table.number, "Inserting table");

        sqlx::query(
            r#"
            INSERT INTO dining_tables (
                id, number, capacity, status,
                current_order_id, current_order_total_cents,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, NULL, NULL, ?5, ?6)
            "#,
        )
        .bind(&table.id)
        .bind(table.number)
        .bind(table.capacity)
        .bind(table.status)
        .bind(table.created_at)
        .bind(table.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(table)
    }

    /// Updates number and capacity.
    pub async fn update(&self, id: &str, draft: &TableDraft) -> DbResult<Table> {
        debug!(id = %id, number = draft.number, "Updating table");

        let result = sqlx::query(
            "UPDATE dining_tables SET number = ?2, capacity = ?3, updated_at = ?4 WHERE id = ?1",
        )
        .bind(id)
        .bind(draft.number)
        .bind(draft.capacity)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Table", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Table", id))
    }

    /// Sets the floor status of a table.
    pub async fn update_status(&self, id: &str, status: TableStatus) -> DbResult<Table> {
        debug!(id = %id, status = %status, "Updating table status");

        let result =
            sqlx::query("UPDATE dining_tables SET status = ?2, updated_at = ?3 WHERE id = ?1")
                .bind(id)
                .bind(status)
                .bind(Utc::now())
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Table", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Table", id))
    }

    /// Deletes a table.
    ///
    /// Fails with [`DbError::ForeignKeyViolation`] while orders reference it.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting table");

        let result = sqlx::query("DELETE FROM dining_tables WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Table", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    async fn repo() -> TableRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().tables()
    }

    #[tokio::test]
    async fn test_list_is_sorted_by_number() {
        let repo = repo().await;
        for number in [12, 3, 7] {
            repo.insert(&TableDraft { number, capacity: 4 }).await.unwrap();
        }

        let numbers: Vec<i64> = repo.list().await.unwrap().iter().map(|t| t.number).collect();
        assert_eq!(numbers, vec![3, 7, 12]);
    }

    #[tokio::test]
    async fn test_duplicate_number_hits_unique_constraint() {
        let repo = repo().await;
        repo.insert(&TableDraft { number: 1, capacity: 2 }).await.unwrap();

        let err = repo
            .insert(&TableDraft { number: 1, capacity: 6 })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_number_taken_excludes_self() {
        let repo = repo().await;
        let table = repo.insert(&TableDraft { number: 5, capacity: 2 }).await.unwrap();

        assert!(repo.number_taken(5, None).await.unwrap());
        assert!(!repo.number_taken(5, Some(&table.id)).await.unwrap());
        assert!(!repo.number_taken(6, None).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_status_and_delete() {
        let repo = repo().await;
        let table = repo.insert(&TableDraft { number: 9, capacity: 4 }).await.unwrap();

        let table = repo.update_status(&table.id, TableStatus::Reserved).await.unwrap();
        assert_eq!(table.status, TableStatus::Reserved);

        repo.delete(&table.id).await.unwrap();
        assert!(repo.get_by_id(&table.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(&table.id).await,
            Err(DbError::NotFound { .. })
        ));
    }
}
