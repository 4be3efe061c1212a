//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - The timer mode selected at startup
//! - Pomodoro phase lengths and long-break cadence
//! - Display and cue preferences
//! - The checklist storage key
//!
//! Configuration is stored at `~/.config/focusdeck/config.toml`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::timer::{PomodoroDurations, PomodoroSettings, TimeFormat, TimerMode};

/// Pomodoro-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PomodoroConfig {
    #[serde(default = "default_work_minutes")]
    pub work_minutes: u32,
    #[serde(default = "default_break_minutes")]
    pub break_minutes: u32,
    #[serde(default = "default_long_break_minutes")]
    pub long_break_minutes: u32,
    #[serde(default = "default_long_break_every")]
    pub long_break_every: u32,
    /// Keep running across phase boundaries instead of pausing.
    #[serde(default)]
    pub auto_advance: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_true")]
    pub show_hundredths: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CuesConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistConfig {
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/focusdeck/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_startup_mode")]
    pub startup_mode: TimerMode,
    #[serde(default)]
    pub pomodoro: PomodoroConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub cues: CuesConfig,
    #[serde(default)]
    pub checklist: ChecklistConfig,
}

// Default functions
fn default_work_minutes() -> u32 {
    25
}
fn default_break_minutes() -> u32 {
    5
}
fn default_long_break_minutes() -> u32 {
    15
}
fn default_long_break_every() -> u32 {
    4
}
fn default_true() -> bool {
    true
}
fn default_storage_key() -> String {
    "checklistTasks".into()
}
fn default_startup_mode() -> TimerMode {
    TimerMode::Countdown
}

impl Default for PomodoroConfig {
    fn default() -> Self {
        Self {
            work_minutes: default_work_minutes(),
            break_minutes: default_break_minutes(),
            long_break_minutes: default_long_break_minutes(),
            long_break_every: default_long_break_every(),
            auto_advance: false,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_hundredths: true,
        }
    }
}

impl Default for CuesConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for ChecklistConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            startup_mode: default_startup_mode(),
            pomodoro: PomodoroConfig::default(),
            display: DisplayConfig::default(),
            cues: CuesConfig::default(),
            checklist: ChecklistConfig::default(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => serde_json::Value::Number(
                        value
                            .parse::<u32>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?
                            .into(),
                    ),
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("cannot replace a whole section".into()));
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults when the file is
    /// missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there when the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// default config cannot be written.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                Ok(cfg)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("using default configuration: {e}");
            Self::default()
        })
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key. Does not save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit
    /// the field.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    pub fn pomodoro_settings(&self) -> PomodoroSettings {
        PomodoroSettings {
            defaults: PomodoroDurations::from_minutes(
                self.pomodoro.work_minutes as u64,
                self.pomodoro.break_minutes as u64,
                self.pomodoro.long_break_minutes as u64,
            ),
            long_break_every: self.pomodoro.long_break_every,
            auto_advance: self.pomodoro.auto_advance,
        }
    }

    pub fn time_format(&self) -> TimeFormat {
        if self.display.show_hundredths {
            TimeFormat::Hundredths
        } else {
            TimeFormat::Seconds
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.startup_mode, TimerMode::Countdown);
        assert_eq!(parsed.pomodoro.work_minutes, 25);
        assert_eq!(parsed.checklist.storage_key, "checklistTasks");
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let cfg: Config = toml::from_str(indoc! {r#"
            startup_mode = "pomodoro"

            [pomodoro]
            work_minutes = 50
            auto_advance = true
        "#})
        .unwrap();
        assert_eq!(cfg.startup_mode, TimerMode::Pomodoro);
        assert_eq!(cfg.pomodoro.work_minutes, 50);
        assert_eq!(cfg.pomodoro.break_minutes, 5);
        assert_eq!(cfg.pomodoro.long_break_every, 4);
        assert!(cfg.pomodoro.auto_advance);
        assert!(cfg.display.show_hundredths);
        assert!(cfg.cues.enabled);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("display.show_hundredths").as_deref(), Some("true"));
        assert_eq!(cfg.get("pomodoro.work_minutes").as_deref(), Some("25"));
        assert_eq!(cfg.get("startup_mode").as_deref(), Some("countdown"));
        assert!(cfg.get("display.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_nested_values() {
        let mut cfg = Config::default();
        cfg.set("pomodoro.long_break_every", "3").unwrap();
        cfg.set("cues.enabled", "false").unwrap();
        cfg.set("checklist.storage_key", "todo").unwrap();
        cfg.set("startup_mode", "stopwatch").unwrap();
        assert_eq!(cfg.pomodoro.long_break_every, 3);
        assert!(!cfg.cues.enabled);
        assert_eq!(cfg.checklist.storage_key, "todo");
        assert_eq!(cfg.startup_mode, TimerMode::Stopwatch);
    }

    #[test]
    fn startup_mode_accepts_timer_alias() {
        let mut cfg = Config::default();
        cfg.set("startup_mode", "pomodoro").unwrap();
        cfg.set("startup_mode", "timer").unwrap();
        assert_eq!(cfg.startup_mode, TimerMode::Countdown);

        let cfg: Config = toml::from_str(r#"startup_mode = "timer""#).unwrap();
        assert_eq!(cfg.startup_mode, TimerMode::Countdown);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("display.nonexistent_key", "value"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(cfg.set("", "value"), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_rejects_invalid_values() {
        let mut cfg = Config::default();
        assert!(cfg.set("display.show_hundredths", "not_a_bool").is_err());
        assert!(cfg.set("pomodoro.work_minutes", "-1").is_err());
        assert!(cfg.set("startup_mode", "flowmodoro").is_err());
        assert!(cfg.set("pomodoro", "{}").is_err());
        assert_eq!(cfg.startup_mode, TimerMode::Countdown);
        assert!(cfg.display.show_hundredths);
    }

    #[test]
    fn load_from_writes_defaults_when_missing() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.pomodoro.work_minutes, 25);
        assert!(path.exists());
    }

    #[test]
    fn save_to_then_load_from_preserves_changes() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.set("pomodoro.break_minutes", "7").unwrap();
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.pomodoro.break_minutes, 7);
    }

    #[test]
    fn load_from_rejects_malformed_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "startup_mode = [").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn derived_settings() {
        let mut cfg = Config::default();
        cfg.set("display.show_hundredths", "false").unwrap();
        cfg.set("pomodoro.work_minutes", "90").unwrap();
        assert_eq!(cfg.time_format(), TimeFormat::Seconds);

        let settings = cfg.pomodoro_settings();
        assert_eq!(settings.defaults.work.hours(), 1);
        assert_eq!(settings.defaults.work.minutes(), 30);
        assert_eq!(settings.long_break_every, 4);
        assert!(!settings.auto_advance);
    }
}
