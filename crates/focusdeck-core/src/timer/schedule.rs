use serde::{Deserialize, Serialize};

use super::time_value::{coerce_field, TimeValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Work,
    ShortBreak,
    LongBreak,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Work => "Work Time",
            Phase::ShortBreak => "Break Time",
            Phase::LongBreak => "Long Break Time",
        }
    }

    pub fn is_break(&self) -> bool {
        !matches!(self, Phase::Work)
    }
}

/// Lengths of the three Pomodoro phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroDurations {
    pub work: TimeValue,
    pub short_break: TimeValue,
    pub long_break: TimeValue,
}

impl PomodoroDurations {
    pub fn from_minutes(work: u64, short_break: u64, long_break: u64) -> Self {
        Self {
            work: TimeValue::from_minutes(work),
            short_break: TimeValue::from_minutes(short_break),
            long_break: TimeValue::from_minutes(long_break),
        }
    }

    /// Read raw minute fields; anything non-numeric becomes zero.
    pub fn parse(work: &str, short_break: &str, long_break: &str) -> Self {
        Self::from_minutes(
            coerce_field(work),
            coerce_field(short_break),
            coerce_field(long_break),
        )
    }

    pub fn duration(&self, phase: Phase) -> TimeValue {
        match phase {
            Phase::Work => self.work,
            Phase::ShortBreak => self.short_break,
            Phase::LongBreak => self.long_break,
        }
    }
}

impl Default for PomodoroDurations {
    fn default() -> Self {
        Self::from_minutes(25, 5, 15)
    }
}
