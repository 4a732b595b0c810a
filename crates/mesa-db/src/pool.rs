//! # Database Handle
//!
//! Opens the SQLite pool, applies migrations and hands out repositories.
//!
//! ```text
//! DbConfig::new("./mesa.db")
//!      │
//!      ▼
//! Database::new ── WAL, foreign keys on ── migrations ──► Database
//!                                                          ├── tables()
//!                                                          ├── categories() / menu_items() / modifiers()
//!                                                          ├── orders()
//!                                                          ├── printers() / printer_roles()
//!                                                          └── delivery_orders()
//! ```
//!
//! WAL lets the kitchen display keep polling active orders while the order
//! panel writes.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::{
    CategoryRepository, DeliveryOrderRepository, MenuItemRepository, ModifierRepository,
    OrderRepository, PrinterRepository, PrinterRoleRepository, TableRepository,
};

// =============================================================================
// Configuration
// =============================================================================

/// Where the database lives and how many connections the pool may open.
///
/// ```rust,ignore
/// let config = DbConfig::new("/var/lib/mesa/mesa.db").max_connections(8);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
    /// Default 5. One restaurant rarely has more than a handful of terminals.
    pub max_connections: u32,
    /// How long a request waits for a free connection.
    pub acquire_timeout: Duration,
}

impl DbConfig {
    /// File-backed database, created on first start.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            path: path.into(),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Private in-memory database for tests.
    ///
    /// Every connection to `:memory:` opens a fresh database, so the pool is
    /// pinned to a single connection.
    pub fn in_memory() -> Self {
        DbConfig {
            path: PathBuf::from(":memory:"),
            max_connections: 1,
            acquire_timeout: Duration::from_secs(5),
        }
    }

    fn is_in_memory(&self) -> bool {
        self.path.as_os_str() == ":memory:"
    }
}

// =============================================================================
// Database
// =============================================================================

/// Handle to the pool. Hands out one repository per entity.
///
/// ```rust,ignore
/// pub async fn get_all_tables(state: &AppState) -> ApiResult<Vec<Table>> {
///     Ok(state.db.tables().list().await?)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool and brings the schema up to date.
    ///
    /// SQLite runs in WAL mode with `synchronous = NORMAL` and foreign keys
    /// enforced. The `ON DELETE RESTRICT` rules in the schema depend on the
    /// latter.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(path = %config.path.display(), "Opening database");

        let url = format!("sqlite://{}?mode=rwc", config.path.display());
        let options = SqliteConnectOptions::from_str(&url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .create_if_missing(true);

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout);
        if config.is_in_memory() {
            // closing the only connection drops the database
            pool_options = pool_options.idle_timeout(None).max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;
        debug!(max_connections = config.max_connections, "Pool created");

        migrations::run_migrations(&pool).await?;
        let (total, applied) = migrations::migration_status(&pool).await?;
        info!(migrations = total, applied, "Database ready");

        Ok(Database { pool })
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the dining table repository.
    pub fn tables(&self) -> TableRepository {
        TableRepository::new(self.pool.clone())
    }

    /// Returns the menu category repository.
    pub fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(self.pool.clone())
    }

    /// Returns the menu item repository.
    pub fn menu_items(&self) -> MenuItemRepository {
        MenuItemRepository::new(self.pool.clone())
    }

    /// Returns the modifier repository.
    pub fn modifiers(&self) -> ModifierRepository {
        ModifierRepository::new(self.pool.clone())
    }

    /// Returns the order repository using the default 8% tax rate.
    ///
    /// Use [`OrderRepository::with_tax_rate`] to apply a configured rate.
    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.pool.clone())
    }

    /// Returns the printer repository.
    pub fn printers(&self) -> PrinterRepository {
        PrinterRepository::new(self.pool.clone())
    }

    /// Returns the printer role repository.
    pub fn printer_roles(&self) -> PrinterRoleRepository {
        PrinterRoleRepository::new(self.pool.clone())
    }

    /// Returns the delivery order repository.
    pub fn delivery_orders(&self) -> DeliveryOrderRepository {
        DeliveryOrderRepository::new(self.pool.clone())
    }

    /// Closes the pool on shutdown. Repository calls fail afterwards.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// True when the database answers a trivial query.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database() {
        let config = DbConfig::in_memory();
        let db = Database::new(config).await.unwrap();

        assert!(db.health_check().await);
    }

    #[tokio::test]
    async fn test_in_memory_database_has_seeded_roles() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let roles = db.printer_roles().list().await.unwrap();

        let names: Vec<_> = roles.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["bar", "kitchen", "receipt", "report"]);
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("/tmp/test.db").max_connections(10);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.path, PathBuf::from("/tmp/test.db"));
        assert_eq!(DbConfig::in_memory().max_connections, 1);
    }
}
