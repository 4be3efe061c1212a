use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Phase, TimeValue, TimerMode, TimerState};

/// Every state change of the active timer produces an Event.
/// Front ends render them; the controller derives cues from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        remaining: TimeValue,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: TimerMode,
        remaining: TimeValue,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: TimerMode,
        remaining: TimeValue,
        at: DateTime<Utc>,
    },
    TimerSet {
        mode: TimerMode,
        remaining: TimeValue,
        at: DateTime<Utc>,
    },
    /// A countdown reached zero and stopped.
    TimerCompleted {
        mode: TimerMode,
        at: DateTime<Utc>,
    },
    /// A Pomodoro crossed a phase boundary.
    PhaseChanged {
        from: Phase,
        to: Phase,
        cycles_completed: u32,
        remaining: TimeValue,
        /// False when the engine paused itself at the boundary.
        running: bool,
        at: DateTime<Utc>,
    },
    ModeSwitched {
        from: TimerMode,
        to: TimerMode,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        mode: TimerMode,
        state: TimerState,
        remaining: TimeValue,
        label: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        phase: Option<Phase>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cycles_completed: Option<u32>,
        at: DateTime<Utc>,
    },
}
