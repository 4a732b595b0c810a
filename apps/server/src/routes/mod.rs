//! # HTTP Routes
//!
//! Thin axum handlers over [`crate::commands`]. Handlers only extract
//! path, query and body, call the action, and wrap the result.
//!
//! ```text
//! /api
//! ├── /tables             tables.rs
//! ├── /categories         menu.rs
//! ├── /menu-items         menu.rs
//! ├── /modifiers          menu.rs
//! ├── /orders             orders.rs
//! ├── /order-items        orders.rs
//! ├── /printers           printers.rs
//! ├── /printer-roles      printers.rs
//! └── /delivery-orders    delivery.rs
//! ```

mod delivery;
mod menu;
mod orders;
mod printers;
mod tables;

use axum::extract::{FromRequest, FromRequestParts};
use axum::Router;

use crate::error::ApiError;
use crate::state::AppState;

/// JSON body extractor whose rejections use the API error shape.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Query string extractor whose rejections use the API error shape.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// Every `/api` route.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(tables::router())
        .merge(menu::router())
        .merge(orders::router())
        .merge(printers::router())
        .merge(delivery::router())
}
