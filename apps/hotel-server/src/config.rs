//! Server configuration.

use std::{env, time::Duration};

/// `DATABASE_URL` value selecting the in-memory store.
pub const MEMORY_DATABASE_URL: &str = "memory";

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Database URL, or `memory` for the in-memory store.
    pub database_url: String,
    /// JWT signing secret.
    pub jwt_secret: String,
    /// JWT expiration in hours.
    pub jwt_expiration_hours: u64,
    /// Base URL of the room price service.
    pub room_prices_url: String,
    /// Timeout for one price lookup, in milliseconds.
    pub room_prices_timeout_ms: u64,
    /// bcrypt work factor for new passwords.
    pub bcrypt_cost: u32,
    /// Log level.
    pub log_level: String,
    /// Email of the administrator account ensured at startup.
    pub admin_email: Option<String>,
    /// Password for that account if it has to be created.
    pub admin_password: Option<String>,
}

fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt_secret = env::var("JWT_SECRET")
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| anyhow::anyhow!("JWT_SECRET is required"))?;

        Ok(Self {
            host: env::var("HOTEL_SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_or("HOTEL_SERVER_PORT", 8000),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| MEMORY_DATABASE_URL.to_string()),
            jwt_secret,
            jwt_expiration_hours: parse_or(
                "JWT_EXPIRATION_HOURS",
                auth::DEFAULT_JWT_EXPIRATION_HOURS,
            ),
            room_prices_url: env::var("ROOMPRICES_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8100".to_string()),
            room_prices_timeout_ms: parse_or("ROOMPRICES_TIMEOUT_MS", 2000),
            bcrypt_cost: parse_or("BCRYPT_COST", auth::DEFAULT_BCRYPT_COST),
            log_level: env::var("HOTEL_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            admin_email: env::var("HOTEL_ADMIN_EMAIL").ok().filter(|v| !v.is_empty()),
            admin_password: env::var("HOTEL_ADMIN_PASSWORD").ok().filter(|v| !v.is_empty()),
        })
    }

    /// Creates a configuration for tests with the in-memory store.
    pub fn for_tests(jwt_secret: impl Into<String>) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            database_url: MEMORY_DATABASE_URL.to_string(),
            jwt_secret: jwt_secret.into(),
            jwt_expiration_hours: auth::DEFAULT_JWT_EXPIRATION_HOURS,
            room_prices_url: "http://127.0.0.1:8100".to_string(),
            room_prices_timeout_ms: 2000,
            bcrypt_cost: 4,
            log_level: "debug".to_string(),
            admin_email: None,
            admin_password: None,
        }
    }

    /// Returns the server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns true if the in-memory store is selected.
    pub fn uses_memory_store(&self) -> bool {
        self.database_url == MEMORY_DATABASE_URL
    }

    /// Returns the administrator credentials if both are configured.
    pub fn admin_credentials(&self) -> Option<(&str, &str)> {
        match (&self.admin_email, &self.admin_password) {
            (Some(email), Some(password)) => Some((email.as_str(), password.as_str())),
            _ => None,
        }
    }

    /// Returns the price lookup timeout.
    pub fn room_prices_timeout(&self) -> Duration {
        Duration::from_millis(self.room_prices_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env() {
        // SAFETY: Tests run serially or in isolation
        unsafe {
            env::remove_var("JWT_SECRET");
        }
        assert!(Config::from_env().is_err());

        // SAFETY: Tests run serially or in isolation
        unsafe {
            env::set_var("JWT_SECRET", "test-secret");
            env::remove_var("HOTEL_SERVER_PORT");
            env::remove_var("DATABASE_URL");
            env::remove_var("ROOMPRICES_TIMEOUT_MS");
            env::set_var("HOTEL_ADMIN_EMAIL", "admin@mail.ru");
            env::remove_var("HOTEL_ADMIN_PASSWORD");
        }

        let config = Config::from_env().unwrap();
        assert_eq!(config.port, 8000);
        assert!(config.uses_memory_store());
        assert_eq!(config.jwt_expiration_hours, 72);
        assert_eq!(config.room_prices_timeout(), Duration::from_secs(2));
        assert_eq!(config.admin_credentials(), None);

        let config = Config {
            admin_password: Some("adminpassword".to_string()),
            ..config
        };
        assert_eq!(
            config.admin_credentials(),
            Some(("admin@mail.ru", "adminpassword"))
        );
    }
}
