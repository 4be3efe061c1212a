mod config;
pub mod database;

pub use config::{ChecklistConfig, Config, CuesConfig, DisplayConfig, PomodoroConfig};
pub use database::Database;

use std::path::PathBuf;

use crate::error::{Result, StorageError};

/// Minimal string key-value persistence.
///
/// The checklist is written through this trait so it can run against the
/// SQLite [`Database`] or any other store.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Returns `~/.config/focusdeck[-dev]/` based on FOCUSDECK_ENV.
///
/// Set FOCUSDECK_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("FOCUSDECK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("focusdeck-dev")
    } else {
        base_dir.join("focusdeck")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
