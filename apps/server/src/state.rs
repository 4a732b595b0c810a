//! # Application State
//!
//! Shared by every route through axum's `State` extractor.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           AppState (Clone)                              │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────────┐  ┌──────────────────────────┐  │
//! │  │  Database    │  │  ServerConfig    │  │  PrintClient             │  │
//! │  │  (SQLite     │  │  (Arc, read-only │  │  (reqwest client,        │  │
//! │  │   pool)      │  │   after startup) │  │   pooled connections)    │  │
//! │  └──────────────┘  └──────────────────┘  └──────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every member is internally reference-counted, so cloning per request is
//! cheap and needs no locking.

use std::sync::Arc;

use mesa_db::{Database, OrderRepository};

use crate::config::{ConfigError, ServerConfig};
use crate::print_client::PrintClient;

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<ServerConfig>,
    pub printer: PrintClient,
}

impl AppState {
    /// Builds state from an open database and loaded configuration.
    pub fn new(db: Database, config: ServerConfig) -> Result<Self, ConfigError> {
        let printer = PrintClient::new(
            config.print_server_url.clone(),
            config.print_server_timeout,
        )?;

        Ok(AppState {
            db,
            config: Arc::new(config),
            printer,
        })
    }

    /// Order repository using the configured tax rate.
    pub fn orders(&self) -> OrderRepository {
        self.db.orders().with_tax_rate(self.config.tax_rate)
    }
}
