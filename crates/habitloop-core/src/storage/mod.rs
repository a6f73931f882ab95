mod config;
pub mod database;
pub mod kv;

pub use config::{Config, HabitsConfig, InsightsConfig, PrivacyConfig};
pub use database::SqliteStore;
pub use kv::{KeyValueStore, MemoryStore};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Storage keys. Each holds a JSON-encoded value.
pub mod keys {
    pub const HABITS: &str = "habits";
    pub const IS_PREMIUM: &str = "is_premium";
    pub const FAILED_ATTEMPTS: &str = "privacy.failed_attempts";
    pub const LOCK_UNTIL: &str = "privacy.lock_until";
    pub const LAST_ACTIVE_DAY: &str = "last_active_day";
}

/// Returns the habitloop data directory.
///
/// `HABITLOOP_DATA_DIR` wins when set. Otherwise `~/.config/habitloop[-dev]/`
/// based on `HABITLOOP_ENV` (set it to `dev` for a development directory).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("HABITLOOP_DATA_DIR") {
        Some(explicit) => PathBuf::from(explicit),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("HABITLOOP_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("habitloop-dev")
            } else {
                base_dir.join("habitloop")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
