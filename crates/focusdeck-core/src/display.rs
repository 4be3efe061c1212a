//! Output side of the timer: what gets shown and what gets played.
//!
//! The controller renders a [`DisplayFrame`] after every command and tick
//! and hands it to a [`DisplaySink`]. Completions and Pomodoro phase changes
//! additionally trigger a [`Cue`] on the [`CueSink`]. Both sinks are
//! fire-and-forget: they cannot report failure back to the controller.

use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::timer::{Phase, TimeFormat, TimerEngine};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayFrame {
    /// Zero-padded `HH:MM:SS:CC` or `HH:MM:SS`.
    pub time: String,
    /// `Running`, `Paused`, or the Pomodoro phase name.
    pub label: String,
}

impl DisplayFrame {
    pub fn render(engine: &TimerEngine, format: TimeFormat) -> Self {
        Self {
            time: engine.remaining().format(format),
            label: engine.label().to_string(),
        }
    }
}

pub trait DisplaySink {
    fn show(&mut self, frame: &DisplayFrame);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    /// A countdown reached zero.
    TimerFinished,
    /// A work phase ended and a short break begins.
    BreakReached,
    /// A work phase ended and a long break begins.
    LongBreakReached,
    /// A break ended and work begins.
    BreakFinished,
}

impl Cue {
    pub fn for_event(event: &Event) -> Option<Cue> {
        match event {
            Event::TimerCompleted { .. } => Some(Cue::TimerFinished),
            Event::PhaseChanged { to, .. } => Some(match to {
                Phase::Work => Cue::BreakFinished,
                Phase::ShortBreak => Cue::BreakReached,
                Phase::LongBreak => Cue::LongBreakReached,
            }),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::TimerFinished => "timer_finished",
            Cue::BreakReached => "break_reached",
            Cue::LongBreakReached => "long_break_reached",
            Cue::BreakFinished => "break_finished",
        }
    }
}

/// Plays cues. Implementations swallow their own failures.
pub trait CueSink {
    fn play(&mut self, cue: Cue);
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl DisplaySink for Silent {
    fn show(&mut self, _frame: &DisplayFrame) {}
}

impl CueSink for Silent {
    fn play(&mut self, _cue: Cue) {}
}
