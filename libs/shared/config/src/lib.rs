use std::env;
use std::str::FromStr;
use std::time::Duration;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_NOTIFICATION_DWELL_MS: u64 = 5_000;
pub const DEFAULT_NOTIFICATION_ENTER_MS: u64 = 100;
pub const DEFAULT_NOTIFICATION_EXIT_MS: u64 = 300;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_base_url: String,
    pub notification_dwell_ms: u64,
    pub notification_enter_ms: u64,
    pub notification_exit_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            notification_dwell_ms: DEFAULT_NOTIFICATION_DWELL_MS,
            notification_enter_ms: DEFAULT_NOTIFICATION_ENTER_MS,
            notification_exit_ms: DEFAULT_NOTIFICATION_EXIT_MS,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            api_base_url: env::var("API_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| {
                    warn!("API_BASE_URL not set, using default {}", DEFAULT_API_BASE_URL);
                    String::new()
                }),
            notification_dwell_ms: millis_from_env("NOTIFICATION_DWELL_MS", DEFAULT_NOTIFICATION_DWELL_MS),
            notification_enter_ms: millis_from_env("NOTIFICATION_ENTER_MS", DEFAULT_NOTIFICATION_ENTER_MS),
            notification_exit_ms: millis_from_env("NOTIFICATION_EXIT_MS", DEFAULT_NOTIFICATION_EXIT_MS),
        };

        if !config.is_configured() {
            warn!("Remote API not explicitly configured - falling back to local default");
            return Self {
                api_base_url: DEFAULT_API_BASE_URL.to_string(),
                ..config
            };
        }

        config
    }

    /// Whether an explicit API base URL was supplied.
    pub fn is_configured(&self) -> bool {
        !self.api_base_url.is_empty()
    }

    pub fn notification_dwell(&self) -> Duration {
        Duration::from_millis(self.notification_dwell_ms)
    }

    pub fn notification_enter(&self) -> Duration {
        Duration::from_millis(self.notification_enter_ms)
    }

    pub fn notification_exit(&self) -> Duration {
        Duration::from_millis(self.notification_exit_ms)
    }
}

fn millis_from_env(key: &str, default: u64) -> u64 {
    match env::var(key) {
        Ok(raw) => u64::from_str(raw.trim()).unwrap_or_else(|_| {
            warn!("{} is not a valid number of milliseconds ({:?}), using default {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}
