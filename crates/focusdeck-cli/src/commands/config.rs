use std::error::Error;

use clap::Subcommand;
use focusdeck_core::{Config, ConfigError};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one value (e.g. "pomodoro.work_minutes", "cues.enabled")
    Get { key: String },
    /// Change one value and save the file
    Set { key: String, value: String },
    /// Print the whole configuration as JSON
    List,
    /// Overwrite the file with defaults
    Reset,
}

impl ConfigAction {
    fn writes(&self) -> bool {
        matches!(self, ConfigAction::Set { .. } | ConfigAction::Reset)
    }
}

/// Apply `action` to `config` and return the text to print.
///
/// Saving is left to the caller so this stays free of file I/O.
pub fn apply(config: &mut Config, action: &ConfigAction) -> Result<String, Box<dyn Error>> {
    let output = match action {
        ConfigAction::Get { key } => config
            .get(key)
            .ok_or_else(|| ConfigError::UnknownKey(key.clone()))?,
        ConfigAction::Set { key, value } => {
            config.set(key, value)?;
            format!("{key} = {value}")
        }
        ConfigAction::List => serde_json::to_string_pretty(config)?,
        ConfigAction::Reset => {
            *config = Config::default();
            "config reset to defaults".to_string()
        }
    };
    Ok(output)
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn Error>> {
    let mut config = match action {
        ConfigAction::Reset => Config::default(),
        _ => Config::load()?,
    };
    let output = apply(&mut config, &action)?;
    if action.writes() {
        config.save()?;
    }
    println!("{output}");
    Ok(())
}
