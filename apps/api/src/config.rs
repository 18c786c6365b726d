use std::time::Duration;

use anyhow::{Context, Result};

use crate::cv::debounce::DEFAULT_DEBOUNCE;

/// Application configuration loaded from environment variables.
/// Every variable is optional; export settings are fixed and not configurable.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Quiescence window applied to draft edits before they reach the store.
    pub draft_debounce: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let draft_debounce = match std::env::var("DRAFT_DEBOUNCE_MS") {
            Ok(ms) => Duration::from_millis(
                ms.parse::<u64>()
                    .context("DRAFT_DEBOUNCE_MS must be a whole number of milliseconds")?,
            ),
            Err(_) => DEFAULT_DEBOUNCE,
        };

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            draft_debounce,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            draft_debounce: DEFAULT_DEBOUNCE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_uses_documented_debounce() {
        let config = Config::default();
        assert_eq!(config.draft_debounce, Duration::from_millis(300));
        assert_eq!(config.port, 8080);
    }
}
