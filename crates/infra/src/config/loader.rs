//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the database path is not set, falls back to loading from a file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//! 5. With neither source present, the built-in defaults apply
//!
//! ## Environment Variables
//! - `MEDIBOOK_DB_PATH`: Database file path
//! - `MEDIBOOK_DB_POOL_SIZE`: Connection pool size
//! - `MEDIBOOK_BIND_ADDR`: API socket address
//! - `MEDIBOOK_EMAIL_API_URL`: Transactional mail endpoint (optional)
//! - `MEDIBOOK_EMAIL_API_KEY`: Bearer token for the mail endpoint (optional)
//! - `MEDIBOOK_EMAIL_DEPLOYMENT`: Deployment id used in the from-address
//! - `MEDIBOOK_WEBHOOK_URL`: Admission decision webhook (optional)
//! - `MEDIBOOK_REMINDER_INTERVAL`: Seconds between reminder passes
//! - `MEDIBOOK_REMINDER_WINDOW`: Reminder look-ahead in minutes
//! - `MEDIBOOK_REMINDER_ENABLED`: Whether the scheduler runs (true/false)
//! - `MEDIBOOK_PHOTO_DIR`: Profile photo directory

use std::path::{Path, PathBuf};

use medibook_domain::{Config, MedibookError, Result};

/// Load configuration with automatic fallback strategy
///
/// Environment first, then a probed config file, then built-in defaults.
pub fn load() -> Result<Config> {
    if std::env::var("MEDIBOOK_DB_PATH").is_ok() {
        tracing::info!("Configuration loaded from environment variables");
        return load_from_env();
    }

    match probe_config_paths() {
        Some(path) => load_from_file(Some(path)),
        None => {
            tracing::info!("No configuration source found; using defaults");
            Ok(Config::default())
        }
    }
}

/// Load configuration from environment variables
///
/// `MEDIBOOK_DB_PATH` is required; every other variable falls back to its
/// default.
///
/// # Errors
/// Returns `MedibookError::Config` if required variables are missing or
/// have invalid values.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::default();

    config.database.path = env_var("MEDIBOOK_DB_PATH")?;
    if let Some(size) = env_opt("MEDIBOOK_DB_POOL_SIZE") {
        config.database.pool_size = size
            .parse::<u32>()
            .map_err(|e| MedibookError::Config(format!("Invalid pool size: {e}")))?;
    }

    if let Some(addr) = env_opt("MEDIBOOK_BIND_ADDR") {
        config.server.bind_addr = addr;
    }

    config.email.api_url = env_opt("MEDIBOOK_EMAIL_API_URL");
    config.email.api_key = env_opt("MEDIBOOK_EMAIL_API_KEY");
    if let Some(deployment) = env_opt("MEDIBOOK_EMAIL_DEPLOYMENT") {
        config.email.deployment = deployment;
    }
    config.email.webhook_url = env_opt("MEDIBOOK_WEBHOOK_URL");

    if let Some(interval) = env_opt("MEDIBOOK_REMINDER_INTERVAL") {
        config.reminders.interval_seconds = interval
            .parse::<u64>()
            .map_err(|e| MedibookError::Config(format!("Invalid reminder interval: {e}")))?;
    }
    if let Some(window) = env_opt("MEDIBOOK_REMINDER_WINDOW") {
        config.reminders.window_minutes = window
            .parse::<i64>()
            .map_err(|e| MedibookError::Config(format!("Invalid reminder window: {e}")))?;
    }
    config.reminders.enabled = env_bool("MEDIBOOK_REMINDER_ENABLED", true);

    if let Some(dir) = env_opt("MEDIBOOK_PHOTO_DIR") {
        config.storage.photo_dir = dir;
    }

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `MedibookError::Config` if the file is missing or invalid.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(MedibookError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            MedibookError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| MedibookError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| MedibookError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| MedibookError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(MedibookError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches the working directory and its parents, then next to the
/// executable. Returns the first config file found.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(vec![
            cwd.join("config.json"),
            cwd.join("config.toml"),
            cwd.join("medibook.json"),
            cwd.join("medibook.toml"),
            cwd.join("../config.json"),
            cwd.join("../config.toml"),
        ]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(vec![
                exe_dir.join("config.json"),
                exe_dir.join("config.toml"),
                exe_dir.join("medibook.json"),
                exe_dir.join("medibook.toml"),
            ]);
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        MedibookError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Get optional environment variable
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.is_empty())
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off`
/// (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
