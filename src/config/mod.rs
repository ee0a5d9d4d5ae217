//! Configuration management

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Booking service root; the client talks to `{base_url}/seats` etc.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Name sent with every booking
    #[serde(default = "default_requester_name")]
    pub requester_name: String,

    /// Session cookie value copied from a browser sign-in
    #[serde(default)]
    pub session_cookie: Option<String>,

    #[serde(default = "default_session_cookie_name")]
    pub session_cookie_name: String,

    #[serde(default = "default_notification_ms")]
    pub notification_ms: u64,

    #[serde(default = "default_booking_notification_ms")]
    pub booking_notification_ms: u64,

    #[serde(default = "default_color")]
    pub color: bool,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_requester_name() -> String {
    "Employee".to_string()
}

fn default_session_cookie_name() -> String {
    "session".to_string()
}

fn default_notification_ms() -> u64 {
    3000
}

fn default_booking_notification_ms() -> u64 {
    4000
}

fn default_color() -> bool {
    true
}

impl Config {
    pub fn poll_interval(&self) -> Duration {
        // A zero period would make tokio's interval panic
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notification_ms)
    }

    pub fn booking_notification_ttl(&self) -> Duration {
        Duration::from_millis(self.booking_notification_ms)
    }
}

/// Platform config directory, or the working directory if there is none
pub fn get_config_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "blu-reserve", "blu-reserve")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&get_config_dir())
}

/// Defaults, then `<config_dir>/config.{toml,json,yaml,...}` if present,
/// then `BLU_*` environment variables.
pub fn load_config_from(config_dir: &Path) -> Result<Config> {
    let config = ::config::Config::builder()
        // Start with defaults
        .set_default("base_url", default_base_url())?
        .set_default("poll_interval_ms", default_poll_interval_ms())?
        // Load from config file if it exists
        .add_source(
            ::config::File::with_name(&config_dir.join("config").to_string_lossy())
                .required(false),
        )
        // Override with environment variables (BLU_BASE_URL, BLU_POLL_INTERVAL_MS, etc.)
        .add_source(
            ::config::Environment::with_prefix("BLU")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(config.try_deserialize()?)
}
