//! # Print Server Client
//!
//! Posts kitchen tickets to the external print server.
//!
//! ```text
//! mesa-server ── POST {PRINT_SERVER_URL}/print ──► print server ──► printers
//!                 body: KitchenTicket (JSON)
//! ```
//!
//! The print server picks the physical printer from the ticket's role.

use std::time::Duration;

use tracing::{debug, warn};

use crate::config::ConfigError;
use crate::error::{ApiError, ApiResult};
use mesa_core::KitchenTicket;

/// HTTP client for the print server.
#[derive(Debug, Clone)]
pub struct PrintClient {
    http: reqwest::Client,
    base_url: Option<String>,
}

impl PrintClient {
    /// Creates a client. With no `base_url` every send fails.
    pub fn new(base_url: Option<String>, timeout: Duration) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(PrintClient { http, base_url })
    }

    /// Returns true when a print server URL is configured.
    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }

    /// Sends one ticket.
    pub async fn send(&self, ticket: &KitchenTicket) -> ApiResult<()> {
        let Some(base_url) = &self.base_url else {
            return Err(ApiError::print_server("Print server is not configured"));
        };
        let url = format!("{}/print", base_url);

        debug!(
            url = %url,
            order_id = %ticket.order_id,
            role = %ticket.role,
            lines = ticket.lines.len(),
            "Sending kitchen ticket"
        );

        let response = self.http.post(&url).json(ticket).send().await.map_err(|e| {
            warn!(error = %e, url = %url, "Print server unreachable");
            ApiError::print_server("Print server is unreachable")
        })?;

        if !response.status().is_success() {
            let status = response.status();
            warn!(status = %status, order_id = %ticket.order_id, "Print server rejected ticket");
            return Err(ApiError::print_server(format!(
                "Print server rejected the {} ticket ({})",
                ticket.role, status
            )));
        }

        Ok(())
    }
}
