//! Server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;
use std::time::Duration;

use mesa_core::validation::validate_tax_rate_bps;
use mesa_core::TaxRate;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,

    /// SQLite database file
    pub db_path: String,

    /// Connection pool size
    pub db_max_connections: u32,

    /// Tax applied to every order
    pub tax_rate: TaxRate,

    /// Base URL of the kitchen print server (optional)
    pub print_server_url: Option<String>,

    /// Request timeout for the print server
    pub print_server_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            http_port: 3000,
            db_path: "./mesa.db".to_string(),
            db_max_connections: 5,
            tax_rate: TaxRate::default(),
            print_server_url: None,
            print_server_timeout: Duration::from_secs(5),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ServerConfig::default();

        let tax_bps: u32 = parse_or(&lookup, "MESA_TAX_RATE_BPS", defaults.tax_rate.bps())?;
        validate_tax_rate_bps(tax_bps)
            .map_err(|_| ConfigError::InvalidValue("MESA_TAX_RATE_BPS".to_string()))?;

        let timeout_secs: u64 = parse_or(
            &lookup,
            "PRINT_SERVER_TIMEOUT_SECS",
            defaults.print_server_timeout.as_secs(),
        )?;

        let config = ServerConfig {
            http_port: parse_or(&lookup, "MESA_HTTP_PORT", defaults.http_port)?,

            db_path: lookup("MESA_DB_PATH").unwrap_or(defaults.db_path),

            db_max_connections: parse_or(
                &lookup,
                "MESA_DB_MAX_CONNECTIONS",
                defaults.db_max_connections,
            )?,

            tax_rate: TaxRate::from_bps(tax_bps),

            print_server_url: lookup("PRINT_SERVER_URL")
                .map(|url| url.trim().trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty()),

            print_server_timeout: Duration::from_secs(timeout_secs),
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("MESA_DB_MAX_CONNECTIONS".to_string()));
        }

        if let Some(url) = &config.print_server_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::InvalidValue("PRINT_SERVER_URL".to_string()));
            }
        }

        Ok(config)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.http_port, 3000);
        assert_eq!(config.db_path, "./mesa.db");
        assert_eq!(config.tax_rate.bps(), 800);
        assert!(config.print_server_url.is_none());
        assert_eq!(config.print_server_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("MESA_HTTP_PORT", "8080"),
            ("MESA_TAX_RATE_BPS", "1000"),
            ("PRINT_SERVER_URL", "http://printhub.local:9000/"),
        ]))
        .unwrap();

        assert_eq!(config.http_port, 8080);
        assert_eq!(config.tax_rate.bps(), 1000);
        assert_eq!(
            config.print_server_url.as_deref(),
            Some("http://printhub.local:9000")
        );
    }

    #[test]
    fn test_invalid_values() {
        let err = ServerConfig::from_lookup(lookup(&[("MESA_HTTP_PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(key) if key == "MESA_HTTP_PORT"));

        assert!(ServerConfig::from_lookup(lookup(&[("MESA_TAX_RATE_BPS", "20000")])).is_err());
        assert!(ServerConfig::from_lookup(lookup(&[("MESA_DB_MAX_CONNECTIONS", "0")])).is_err());
        assert!(ServerConfig::from_lookup(lookup(&[("PRINT_SERVER_URL", "printhub:9000")])).is_err());
    }
}
