//! Service configuration.

use std::env;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to listen on.
    pub listen_url: String,
    /// Log level.
    pub log_level: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let listen_url = env::var("ROOMPRICES_LISTEN_URL")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "0.0.0.0:8100".to_string());

        Ok(Self {
            listen_url,
            log_level: env::var("ROOMPRICES_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
