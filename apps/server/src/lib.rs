//! # Mesa POS Server
//!
//! JSON HTTP back end for the restaurant front end and the print server.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           mesa-server                                   │
//! │                                                                         │
//! │  HTTP request                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  TraceLayer ─► CorsLayer ─► Router                                      │
//! │                               ├── GET /health                           │
//! │                               └── /api/*  (routes/)                     │
//! │                                      │                                  │
//! │                                      ▼                                  │
//! │                              Server actions (commands/)                 │
//! │                                      │                                  │
//! │                    ┌─────────────────┴─────────────────┐                │
//! │                    ▼                                   ▼                │
//! │             mesa-db (SQLite)                   PrintClient (reqwest)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - `commands`: one module of server actions per entity
//! - `routes`: axum handlers mapping HTTP onto the actions
//! - `error`: `ApiError` and the `{ error, code }` response shape
//! - `state`: shared `AppState`
//! - `config`: environment configuration
//! - `print_client`: kitchen ticket delivery

pub mod commands;
pub mod config;
pub mod error;
pub mod print_client;
pub mod routes;
pub mod state;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ApiResult, DeleteResult, ErrorCode};
pub use state::AppState;

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", routes::api_router())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Health {
    status: &'static str,
    database: bool,
    print_server_configured: bool,
    version: &'static str,
}

/// GET /health
async fn health(State(state): State<AppState>) -> Json<Health> {
    let database = state.db.health_check().await;
    Json(Health {
        status: if database { "ok" } else { "degraded" },
        database,
        print_server_configured: state.printer.is_configured(),
        version: env!("CARGO_PKG_VERSION"),
    })
}
