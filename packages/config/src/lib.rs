// ABOUTME: Runtime configuration loaded from environment variables
// ABOUTME: Server port, database URL, CORS origin, webhook and cron settings

pub mod constants;

use std::env;
use std::num::ParseIntError;
use thiserror::Error;
use tracing::warn;

pub const DEFAULT_PORT: u16 = 4001;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://rentwise.db?mode=rwc";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_WEBHOOK_TIMEOUT_SECS: u64 = 10;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port number: {0}")]
    InvalidPort(#[from] ParseIntError),
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
    #[error("Invalid webhook URL: {0}. Must start with http:// or https://")]
    InvalidWebhookUrl(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub cors_origin: String,
    pub signup_webhook_url: Option<String>,
    pub webhook_timeout_secs: u64,
    pub cron_secret: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
            signup_webhook_url: None,
            webhook_timeout_secs: DEFAULT_WEBHOOK_TIMEOUT_SECS,
            cron_secret: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match env::var(constants::RENTWISE_PORT) {
            Ok(value) => value.trim().parse::<u16>()?,
            Err(_) => DEFAULT_PORT,
        };

        if port == 0 {
            return Err(ConfigError::PortOutOfRange(port));
        }

        let database_url = env::var(constants::RENTWISE_DATABASE_URL)
            .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let db_max_connections = parse_or_default(
            constants::RENTWISE_DB_MAX_CONNECTIONS,
            DEFAULT_DB_MAX_CONNECTIONS,
        );

        let cors_origin = env::var(constants::RENTWISE_CORS_ORIGIN)
            .unwrap_or_else(|_| DEFAULT_CORS_ORIGIN.to_string());

        let signup_webhook_url = non_empty_var(constants::RENTWISE_SIGNUP_WEBHOOK_URL);
        if let Some(url) = &signup_webhook_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::InvalidWebhookUrl(url.clone()));
            }
        }

        let webhook_timeout_secs = parse_or_default(
            constants::RENTWISE_WEBHOOK_TIMEOUT_SECS,
            DEFAULT_WEBHOOK_TIMEOUT_SECS,
        );

        let cron_secret = non_empty_var(constants::RENTWISE_CRON_SECRET);

        Ok(Config {
            port,
            database_url,
            db_max_connections,
            cors_origin,
            signup_webhook_url,
            webhook_timeout_secs,
            cron_secret,
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or_default<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr + Copy + std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse::<T>().unwrap_or_else(|_| {
            warn!("Invalid value for {}: {:?}, using default {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for name in [
            constants::RENTWISE_PORT,
            constants::RENTWISE_DATABASE_URL,
            constants::RENTWISE_DB_MAX_CONNECTIONS,
            constants::RENTWISE_CORS_ORIGIN,
            constants::RENTWISE_SIGNUP_WEBHOOK_URL,
            constants::RENTWISE_WEBHOOK_TIMEOUT_SECS,
            constants::RENTWISE_CRON_SECRET,
        ] {
            env::remove_var(name);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_when_unset() {
        clear_env();
        let config = Config::from_env().unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.cors_origin, DEFAULT_CORS_ORIGIN);
        assert!(config.signup_webhook_url.is_none());
        assert!(config.cron_secret.is_none());
    }

    #[test]
    #[serial]
    fn test_reads_overrides() {
        clear_env();
        env::set_var(constants::RENTWISE_PORT, "8080");
        env::set_var(constants::RENTWISE_SIGNUP_WEBHOOK_URL, "https://hooks.example.com/x");
        env::set_var(constants::RENTWISE_CRON_SECRET, "s3cret");
        env::set_var(constants::RENTWISE_WEBHOOK_TIMEOUT_SECS, "not-a-number");

        let config = Config::from_env().unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(
            config.signup_webhook_url.as_deref(),
            Some("https://hooks.example.com/x")
        );
        assert_eq!(config.cron_secret.as_deref(), Some("s3cret"));
        assert_eq!(config.webhook_timeout_secs, DEFAULT_WEBHOOK_TIMEOUT_SECS);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_rejects_bad_port_and_webhook() {
        clear_env();
        env::set_var(constants::RENTWISE_PORT, "0");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::PortOutOfRange(0))
        ));

        env::set_var(constants::RENTWISE_PORT, "abc");
        assert!(matches!(Config::from_env(), Err(ConfigError::InvalidPort(_))));

        env::remove_var(constants::RENTWISE_PORT);
        env::set_var(constants::RENTWISE_SIGNUP_WEBHOOK_URL, "ftp://nope");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::InvalidWebhookUrl(_))
        ));
        clear_env();
    }
}
