//! # Delivery Order Repository
//!
//! Tracks orders received from delivery platforms.
//!
//! ## Lifecycle
//! ```text
//! received ─► preparing ─► ready ─► picked_up ─► delivered
//!     └───────────┴──────────┴──────────┴──────► cancelled
//! ```
//! Steps may be skipped but never reversed. Status checks run inside the
//! updating transaction.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use mesa_core::{CoreError, DeliveryOrder, DeliveryPlatform, DeliveryStatus};

const SELECT_DELIVERY: &str = r#"
    SELECT id, platform, external_ref, customer_name, items_summary,
           total_cents, status, courier_name, created_at, updated_at
    FROM delivery_orders
"#;

/// Fields accepted when recording a delivery order.
#[derive(Debug, Clone)]
pub struct DeliveryOrderDraft {
    pub platform: DeliveryPlatform,
    pub external_ref: String,
    pub customer_name: String,
    pub items_summary: String,
    pub total_cents: i64,
    pub courier_name: Option<String>,
}

/// Repository for delivery order operations.
#[derive(Debug, Clone)]
pub struct DeliveryOrderRepository {
    pool: SqlitePool,
}

impl DeliveryOrderRepository {
    /// Creates a new DeliveryOrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DeliveryOrderRepository { pool }
    }

    /// Lists delivery orders, newest first, optionally by status.
    pub async fn list(&self, status: Option<DeliveryStatus>) -> DbResult<Vec<DeliveryOrder>> {
        let sql = format!("{SELECT_DELIVERY} WHERE (?1 IS NULL OR status = ?1) ORDER BY created_at DESC");
        let orders = sqlx::query_as::<_, DeliveryOrder>(&sql)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }

    /// Gets a delivery order by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<DeliveryOrder>> {
        let sql = format!("{SELECT_DELIVERY} WHERE id = ?1");
        let order = sqlx::query_as::<_, DeliveryOrder>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(order)
    }

    /// Returns true when the platform already sent this reference.
    pub async fn reference_taken(&self, platform: DeliveryPlatform, external_ref: &str) -> DbResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM delivery_orders WHERE platform = ?1 AND external_ref = ?2",
        )
        .bind(platform)
        .bind(external_ref)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    /// Records a newly received delivery order.
    pub async fn insert(&self, draft: &DeliveryOrderDraft) -> DbResult<DeliveryOrder> {
        let now = Utc::now();
        let order = DeliveryOrder {
            id: Uuid::new_v4().to_string(),
            platform: draft.platform,
            external_ref: draft.external_ref.clone(),
            customer_name: draft.customer_name.clone(),
            items_summary: draft.items_summary.clone(),
            total_cents: draft.total_cents,
            status: DeliveryStatus::Received,
            courier_name: draft.courier_name.clone(),
            created_at: now,
            updated_at: now,
        };

        debug!(id = %order.id, external_ref = %order.external_ref, "Inserting delivery order");

        sqlx::query(
            r#"
            INSERT INTO delivery_orders (
                id, platform, external_ref, customer_name, items_summary,
                total_cents, status, courier_name, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&order.id)
        .bind(order.platform)
        .bind(&order.external_ref)
        .bind(&order.customer_name)
        .bind(&order.items_summary)
        .bind(order.total_cents)
        .bind(order.status)
        .bind(&order.courier_name)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(order)
    }

    /// Moves a delivery order along its lifecycle.
    ///
    /// A request for the current status changes nothing. A courier name,
    /// when given, replaces the stored one.
    pub async fn update_status(
        &self,
        id: &str,
        status: DeliveryStatus,
        courier_name: Option<&str>,
    ) -> DbResult<DeliveryOrder> {
        let mut tx = self.pool.begin().await?;

        let current =
            sqlx::query_scalar::<_, DeliveryStatus>("SELECT status FROM delivery_orders WHERE id = ?1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| DbError::not_found("DeliveryOrder", id))?;

        if current != status && !current.can_transition_to(status) {
            return Err(CoreError::InvalidDeliveryTransition {
                from: current,
                to: status,
            }
            .into());
        }

        sqlx::query(
            r#"
            UPDATE delivery_orders SET
                status = ?2,
                courier_name = COALESCE(?3, courier_name),
                updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(courier_name)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(id = %id, from = %current, to = %status, "Delivery order status updated");

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("DeliveryOrder", id))
    }

    /// Deletes a delivery order.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting delivery order");

        let result = sqlx::query("DELETE FROM delivery_orders WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("DeliveryOrder", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    fn draft(external_ref: &str) -> DeliveryOrderDraft {
        DeliveryOrderDraft {
            platform: DeliveryPlatform::UberEats,
            external_ref: external_ref.to_string(),
            customer_name: "Sam".to_string(),
            items_summary: "2x Margherita".to_string(),
            total_cents: 2400,
            courier_name: None,
        }
    }

    #[tokio::test]
    async fn test_lifecycle_moves_forward() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.delivery_orders();
        let order = repo.insert(&draft("UE-100")).await.unwrap();
        assert_eq!(order.status, DeliveryStatus::Received);

        let order = repo
            .update_status(&order.id, DeliveryStatus::Ready, Some("Alex"))
            .await
            .unwrap();
        assert_eq!(order.status, DeliveryStatus::Ready);
        assert_eq!(order.courier_name.as_deref(), Some("Alex"));

        let err = repo
            .update_status(&order.id, DeliveryStatus::Preparing, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Rule(CoreError::InvalidDeliveryTransition { .. })
        ));

        let order = repo
            .update_status(&order.id, DeliveryStatus::Cancelled, None)
            .await
            .unwrap();
        assert_eq!(order.courier_name.as_deref(), Some("Alex"));
        assert!(repo
            .update_status(&order.id, DeliveryStatus::Delivered, None)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_reference_unique_per_platform() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.delivery_orders();
        repo.insert(&draft("X-1")).await.unwrap();

        assert!(repo.reference_taken(DeliveryPlatform::UberEats, "X-1").await.unwrap());
        assert!(!repo.reference_taken(DeliveryPlatform::Grubhub, "X-1").await.unwrap());

        let mut other = draft("X-1");
        other.platform = DeliveryPlatform::Grubhub;
        repo.insert(&other).await.unwrap();

        let err = repo.insert(&draft("X-1")).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_list_filters_by_status() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.delivery_orders();
        let first = repo.insert(&draft("A")).await.unwrap();
        repo.insert(&draft("B")).await.unwrap();
        repo.update_status(&first.id, DeliveryStatus::Preparing, None).await.unwrap();

        assert_eq!(repo.list(None).await.unwrap().len(), 2);
        let preparing = repo.list(Some(DeliveryStatus::Preparing)).await.unwrap();
        assert_eq!(preparing.len(), 1);
        assert_eq!(preparing[0].external_ref, "A");
    }
}
