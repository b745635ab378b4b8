//! Application configuration structures
//!
//! Loaded by the infra config loader from environment variables or a
//! JSON/TOML file.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_REMINDER_INTERVAL_SECS, DEFAULT_REMINDER_WINDOW_MINUTES};

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub email: EmailConfig,
    pub reminders: ReminderConfig,
    pub storage: StorageConfig,
}

/// Database settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    pub path: String,
    /// Connection pool size
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: "medibook.db".into(), pool_size: 4 }
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the API binds to
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind_addr: "127.0.0.1:8080".into() }
    }
}

/// Outbound email settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    /// Transactional mail HTTP endpoint. When absent, sends are logged only.
    pub api_url: Option<String>,
    /// Bearer token for the mail endpoint
    pub api_key: Option<String>,
    /// Deployment identifier; the from-address is
    /// `no-reply@{deployment}.example`
    pub deployment: String,
    /// Optional webhook notified after each admission decision
    pub webhook_url: Option<String>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self { api_url: None, api_key: None, deployment: "hospital".into(), webhook_url: None }
    }
}

impl EmailConfig {
    /// From-address derived from the deployment identifier.
    pub fn from_address(&self) -> String {
        format!("no-reply@{}.example", self.deployment)
    }
}

/// Reminder scheduler settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReminderConfig {
    /// Seconds between reminder passes
    pub interval_seconds: u64,
    /// Look-ahead window in minutes
    pub window_minutes: i64,
    /// Whether the scheduler runs at all
    pub enabled: bool,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            interval_seconds: DEFAULT_REMINDER_INTERVAL_SECS,
            window_minutes: DEFAULT_REMINDER_WINDOW_MINUTES,
            enabled: true,
        }
    }
}

/// Blob storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding profile photos
    pub photo_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { photo_dir: "photos".into() }
    }
}
