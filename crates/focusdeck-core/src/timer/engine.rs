//! Timer engine implementation.
//!
//! One engine type covers the three timer modes. The mode-specific data
//! lives in the variant payload, the shared `remaining` value and running
//! flag live on the engine itself.
//!
//! The engine holds no thread or interval handle. While it reports
//! `Running`, the caller is expected to invoke `tick()` every
//! [`TICK_INTERVAL`](super::TICK_INTERVAL); each tick is one hundredth of a
//! second.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start--> Running --pause/reset/set/completion--> Idle
//! ```
//!
//! ## Usage
//!
//! ```
//! use focusdeck_core::timer::{TimeValue, TimerEngine, TimerState};
//!
//! let mut engine = TimerEngine::countdown();
//! engine.set_duration(TimeValue::new(0, 0, 1));
//! engine.start();
//! for _ in 0..100 {
//!     engine.tick();
//! }
//! assert!(engine.remaining().is_zero());
//! // The tick after reaching zero completes the countdown.
//! assert!(engine.tick().is_some());
//! assert_eq!(engine.state(), TimerState::Idle);
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::schedule::{Phase, PomodoroDurations};
use super::time_value::TimeValue;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    #[serde(alias = "timer")]
    Countdown,
    Stopwatch,
    Pomodoro,
}

impl TimerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::Countdown => "countdown",
            TimerMode::Stopwatch => "stopwatch",
            TimerMode::Pomodoro => "pomodoro",
        }
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("timer mode \"{0}\" is not implemented")]
pub struct UnknownMode(pub String);

impl FromStr for TimerMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "timer" | "countdown" => Ok(TimerMode::Countdown),
            "stopwatch" => Ok(TimerMode::Stopwatch),
            "pomodoro" => Ok(TimerMode::Pomodoro),
            _ => Err(UnknownMode(s.trim().to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
}

/// New settings for the active engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Configuration {
    /// Starting value for a countdown or stopwatch.
    Duration(TimeValue),
    /// Phase lengths for a Pomodoro cycle.
    Pomodoro(PomodoroDurations),
}

/// How freshly built Pomodoro engines behave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PomodoroSettings {
    /// Durations used at construction and restored by `reset()`.
    pub defaults: PomodoroDurations,
    /// Every n-th completed work phase is followed by a long break.
    pub long_break_every: u32,
    /// Keep running across phase boundaries instead of pausing.
    pub auto_advance: bool,
}

impl Default for PomodoroSettings {
    fn default() -> Self {
        Self {
            defaults: PomodoroDurations::default(),
            long_break_every: 4,
            auto_advance: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PomodoroCycle {
    durations: PomodoroDurations,
    defaults: PomodoroDurations,
    phase: Phase,
    cycles_completed: u32,
    long_break_every: u32,
    auto_advance: bool,
}

impl PomodoroCycle {
    fn new(settings: &PomodoroSettings) -> Self {
        Self {
            durations: settings.defaults,
            defaults: settings.defaults,
            phase: Phase::Work,
            cycles_completed: 0,
            long_break_every: settings.long_break_every.max(1),
            auto_advance: settings.auto_advance,
        }
    }

    /// Move to the phase after the current one and return it.
    fn advance(&mut self) -> Phase {
        self.phase = match self.phase {
            Phase::Work => {
                self.cycles_completed = self.cycles_completed.saturating_add(1);
                if self.cycles_completed % self.long_break_every == 0 {
                    Phase::LongBreak
                } else {
                    Phase::ShortBreak
                }
            }
            Phase::ShortBreak | Phase::LongBreak => Phase::Work,
        };
        self.phase
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Variant {
    Countdown,
    Stopwatch,
    Pomodoro(PomodoroCycle),
}

/// Core timer engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerEngine {
    variant: Variant,
    state: TimerState,
    remaining: TimeValue,
}

impl TimerEngine {
    pub fn new(mode: TimerMode, pomodoro: &PomodoroSettings) -> Self {
        match mode {
            TimerMode::Countdown => Self::countdown(),
            TimerMode::Stopwatch => Self::stopwatch(),
            TimerMode::Pomodoro => Self::pomodoro(pomodoro),
        }
    }

    pub fn countdown() -> Self {
        Self {
            variant: Variant::Countdown,
            state: TimerState::Idle,
            remaining: TimeValue::ZERO,
        }
    }

    pub fn stopwatch() -> Self {
        Self {
            variant: Variant::Stopwatch,
            state: TimerState::Idle,
            remaining: TimeValue::ZERO,
        }
    }

    pub fn pomodoro(settings: &PomodoroSettings) -> Self {
        let cycle = PomodoroCycle::new(settings);
        let remaining = cycle.durations.work;
        Self {
            variant: Variant::Pomodoro(cycle),
            state: TimerState::Idle,
            remaining,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> TimerMode {
        match self.variant {
            Variant::Countdown => TimerMode::Countdown,
            Variant::Stopwatch => TimerMode::Stopwatch,
            Variant::Pomodoro(_) => TimerMode::Pomodoro,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    /// Time left for countdowns and Pomodoro phases, time elapsed for the
    /// stopwatch.
    pub fn remaining(&self) -> TimeValue {
        self.remaining
    }

    pub fn phase(&self) -> Option<Phase> {
        match &self.variant {
            Variant::Pomodoro(cycle) => Some(cycle.phase),
            _ => None,
        }
    }

    pub fn cycles_completed(&self) -> Option<u32> {
        match &self.variant {
            Variant::Pomodoro(cycle) => Some(cycle.cycles_completed),
            _ => None,
        }
    }

    pub fn durations(&self) -> Option<&PomodoroDurations> {
        match &self.variant {
            Variant::Pomodoro(cycle) => Some(&cycle.durations),
            _ => None,
        }
    }

    /// State text shown next to the time: the phase name for Pomodoro,
    /// `Running`/`Paused` otherwise.
    pub fn label(&self) -> &'static str {
        match &self.variant {
            Variant::Pomodoro(cycle) => cycle.phase.label(),
            _ if self.is_running() => "Running",
            _ => "Paused",
        }
    }

    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            mode: self.mode(),
            state: self.state,
            remaining: self.remaining,
            label: self.label().to_string(),
            phase: self.phase(),
            cycles_completed: self.cycles_completed(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin ticking. Returns `None` when already running, or when a
    /// countdown has nothing left to count.
    pub fn start(&mut self) -> Option<Event> {
        if self.is_running() {
            return None;
        }
        if matches!(self.variant, Variant::Countdown) && self.remaining.is_zero() {
            tracing::debug!("countdown not started: nothing to count down");
            return None;
        }
        self.state = TimerState::Running;
        tracing::info!("{} started", self.mode());
        Some(Event::TimerStarted {
            mode: self.mode(),
            remaining: self.remaining,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.is_running() {
            return None;
        }
        self.state = TimerState::Idle;
        tracing::info!("{} paused", self.mode());
        Some(Event::TimerPaused {
            mode: self.mode(),
            remaining: self.remaining,
            at: Utc::now(),
        })
    }

    /// Stop and return to the mode's starting point. Pomodoro engines also
    /// restore their default durations and forget completed cycles.
    pub fn reset(&mut self) -> Option<Event> {
        self.pause();
        self.remaining = match &mut self.variant {
            Variant::Countdown | Variant::Stopwatch => TimeValue::ZERO,
            Variant::Pomodoro(cycle) => {
                cycle.durations = cycle.defaults;
                cycle.phase = Phase::Work;
                cycle.cycles_completed = 0;
                cycle.durations.work
            }
        };
        tracing::info!("{} reset", self.mode());
        Some(Event::TimerReset {
            mode: self.mode(),
            remaining: self.remaining,
            at: Utc::now(),
        })
    }

    /// Apply new settings. A configuration that does not fit the mode is
    /// rejected and leaves the engine untouched.
    pub fn set(&mut self, configuration: Configuration) -> Option<Event> {
        let accepted = matches!(
            (&self.variant, &configuration),
            (Variant::Countdown | Variant::Stopwatch, Configuration::Duration(_))
                | (Variant::Pomodoro(_), Configuration::Pomodoro(_))
        );
        if !accepted {
            tracing::warn!(
                "{} ignored a configuration meant for another mode",
                self.mode()
            );
            return None;
        }

        self.pause();
        match (&mut self.variant, configuration) {
            (Variant::Pomodoro(cycle), Configuration::Pomodoro(durations)) => {
                cycle.durations = durations;
                cycle.phase = Phase::Work;
                self.remaining = durations.work;
            }
            (_, Configuration::Duration(value)) => {
                self.remaining = value;
            }
            (_, Configuration::Pomodoro(_)) => return None,
        }
        tracing::info!("{} set to {}", self.mode(), self.remaining);
        Some(Event::TimerSet {
            mode: self.mode(),
            remaining: self.remaining,
            at: Utc::now(),
        })
    }

    pub fn set_duration(&mut self, value: TimeValue) -> Option<Event> {
        self.set(Configuration::Duration(value))
    }

    /// Advance by one hundredth. Only does anything while running.
    ///
    /// Returns `Some(Event::TimerCompleted)` when a countdown finishes and
    /// `Some(Event::PhaseChanged)` when a Pomodoro crosses a boundary.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.is_running() {
            return None;
        }
        match &mut self.variant {
            Variant::Stopwatch => {
                self.remaining.increment();
                None
            }
            Variant::Countdown => {
                if self.remaining.decrement().is_ok() {
                    return None;
                }
                self.state = TimerState::Idle;
                tracing::info!("countdown finished");
                Some(Event::TimerCompleted {
                    mode: TimerMode::Countdown,
                    at: Utc::now(),
                })
            }
            Variant::Pomodoro(cycle) => {
                if self.remaining.decrement().is_ok() {
                    return None;
                }
                let from = cycle.phase;
                let to = cycle.advance();
                self.remaining = cycle.durations.duration(to);
                if !cycle.auto_advance {
                    self.state = TimerState::Idle;
                }
                if from == Phase::Work {
                    tracing::info!(
                        "pomodoro completed, total completed: {}",
                        cycle.cycles_completed
                    );
                }
                Some(Event::PhaseChanged {
                    from,
                    to,
                    cycles_completed: cycle.cycles_completed,
                    remaining: self.remaining,
                    running: self.state == TimerState::Running,
                    at: Utc::now(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_until_event(engine: &mut TimerEngine) -> Event {
        loop {
            if let Some(event) = engine.tick() {
                return event;
            }
            assert!(engine.is_running(), "engine stopped without an event");
        }
    }

    #[test]
    fn mode_names_parse() {
        assert_eq!("timer".parse::<TimerMode>(), Ok(TimerMode::Countdown));
        assert_eq!("Countdown".parse::<TimerMode>(), Ok(TimerMode::Countdown));
        assert_eq!(" stopwatch ".parse::<TimerMode>(), Ok(TimerMode::Stopwatch));
        assert_eq!("pomodoro".parse::<TimerMode>(), Ok(TimerMode::Pomodoro));
        assert_eq!(
            "flowmodoro".parse::<TimerMode>(),
            Err(UnknownMode("flowmodoro".into()))
        );
    }

    #[test]
    fn countdown_refuses_to_start_at_zero() {
        let mut engine = TimerEngine::countdown();
        assert!(engine.start().is_none());
        assert_eq!(engine.state(), TimerState::Idle);
    }

    #[test]
    fn start_twice_is_start_once() {
        let mut engine = TimerEngine::countdown();
        engine.set_duration(TimeValue::new(0, 1, 0));
        assert!(engine.start().is_some());
        let after_first = engine.clone();
        assert!(engine.start().is_none());
        assert_eq!(engine, after_first);
    }

    #[test]
    fn pause_when_idle_is_noop() {
        let mut engine = TimerEngine::stopwatch();
        assert!(engine.pause().is_none());
        engine.start();
        assert!(engine.pause().is_some());
        assert_eq!(engine.state(), TimerState::Idle);
    }

    #[test]
    fn ticks_are_ignored_while_idle() {
        let mut engine = TimerEngine::stopwatch();
        assert!(engine.tick().is_none());
        assert!(engine.remaining().is_zero());
    }

    #[test]
    fn countdown_completes_on_tick_after_zero() {
        let mut engine = TimerEngine::countdown();
        engine.set_duration(TimeValue::new(0, 0, 2));
        engine.start();
        for _ in 0..200 {
            assert!(engine.tick().is_none());
        }
        assert!(engine.remaining().is_zero());
        assert!(engine.is_running());

        let event = engine.tick();
        assert!(matches!(event, Some(Event::TimerCompleted { mode: TimerMode::Countdown, .. })));
        assert_eq!(engine.state(), TimerState::Idle);
        assert!(engine.remaining().is_zero());
    }

    #[test]
    fn stopwatch_starts_from_zero_and_carries() {
        let mut engine = TimerEngine::stopwatch();
        assert!(engine.start().is_some());
        for _ in 0..6_150 {
            assert!(engine.tick().is_none());
        }
        let elapsed = engine.remaining();
        assert_eq!(elapsed.minutes(), 1);
        assert_eq!(elapsed.seconds(), 1);
        assert_eq!(elapsed.hundredths(), 50);
    }

    #[test]
    fn set_pauses_and_overwrites() {
        let mut engine = TimerEngine::countdown();
        engine.set_duration(TimeValue::new(0, 5, 0));
        engine.start();
        engine.tick();
        let event = engine.set_duration(TimeValue::new(1, 2, 3));
        assert!(matches!(event, Some(Event::TimerSet { .. })));
        assert_eq!(engine.state(), TimerState::Idle);
        assert_eq!(engine.remaining(), TimeValue::new(1, 2, 3));
    }

    #[test]
    fn set_rejects_mismatched_configuration() {
        let mut engine = TimerEngine::pomodoro(&PomodoroSettings::default());
        engine.start();
        let before = engine.clone();
        assert!(engine.set_duration(TimeValue::new(0, 1, 0)).is_none());
        assert_eq!(engine, before);

        let mut countdown = TimerEngine::countdown();
        assert!(countdown
            .set(Configuration::Pomodoro(PomodoroDurations::default()))
            .is_none());
    }

    #[test]
    fn reset_returns_each_mode_to_its_default() {
        let mut countdown = TimerEngine::countdown();
        countdown.set_duration(TimeValue::new(0, 3, 0));
        countdown.start();
        countdown.reset();
        assert!(countdown.remaining().is_zero());
        assert_eq!(countdown.state(), TimerState::Idle);

        let mut stopwatch = TimerEngine::stopwatch();
        stopwatch.start();
        stopwatch.tick();
        stopwatch.reset();
        assert!(stopwatch.remaining().is_zero());

        let mut pomodoro = TimerEngine::pomodoro(&PomodoroSettings::default());
        pomodoro.set(Configuration::Pomodoro(PomodoroDurations::from_minutes(50, 10, 30)));
        pomodoro.reset();
        assert_eq!(pomodoro.remaining(), TimeValue::from_minutes(25));
        assert_eq!(pomodoro.durations(), Some(&PomodoroDurations::default()));
        assert_eq!(pomodoro.phase(), Some(Phase::Work));
    }

    #[test]
    fn pomodoro_pauses_at_every_boundary() {
        let settings = PomodoroSettings {
            defaults: PomodoroDurations::from_minutes(0, 0, 0),
            ..PomodoroSettings::default()
        };
        let mut engine = TimerEngine::pomodoro(&settings);
        engine.set(Configuration::Pomodoro(PomodoroDurations {
            work: TimeValue::new(0, 0, 1),
            short_break: TimeValue::new(0, 0, 1),
            long_break: TimeValue::new(0, 0, 2),
        }));
        assert!(engine.start().is_some());

        let event = run_until_event(&mut engine);
        match event {
            Event::PhaseChanged { from, to, cycles_completed, running, .. } => {
                assert_eq!(from, Phase::Work);
                assert_eq!(to, Phase::ShortBreak);
                assert_eq!(cycles_completed, 1);
                assert!(!running);
            }
            other => panic!("expected PhaseChanged, got {other:?}"),
        }
        assert_eq!(engine.state(), TimerState::Idle);
        assert_eq!(engine.label(), "Break Time");
        assert_eq!(engine.remaining(), TimeValue::new(0, 0, 1));
    }

    #[test]
    fn pomodoro_every_fourth_break_is_long() {
        let settings = PomodoroSettings {
            defaults: PomodoroDurations::from_minutes(1, 1, 1),
            ..PomodoroSettings::default()
        };
        let mut engine = TimerEngine::pomodoro(&settings);
        let mut breaks = Vec::new();

        while engine.cycles_completed() != Some(4) {
            engine.start();
            if let Event::PhaseChanged { to, .. } = run_until_event(&mut engine) {
                if to.is_break() {
                    breaks.push(to);
                }
            }
        }

        assert_eq!(
            breaks,
            vec![Phase::ShortBreak, Phase::ShortBreak, Phase::ShortBreak, Phase::LongBreak]
        );
        assert_eq!(engine.phase(), Some(Phase::LongBreak));
        assert_eq!(engine.remaining(), TimeValue::from_minutes(1));
        assert_eq!(engine.label(), "Long Break Time");
    }

    #[test]
    fn pomodoro_auto_advance_keeps_running() {
        let settings = PomodoroSettings {
            defaults: PomodoroDurations::from_minutes(0, 1, 1),
            long_break_every: 4,
            auto_advance: true,
        };
        let mut engine = TimerEngine::pomodoro(&settings);
        assert!(engine.start().is_some());
        let event = engine.tick();
        assert!(matches!(event, Some(Event::PhaseChanged { running: true, .. })));
        assert!(engine.is_running());
        assert_eq!(engine.phase(), Some(Phase::ShortBreak));
    }

    #[test]
    fn set_keeps_completed_cycles_but_reset_clears_them() {
        let settings = PomodoroSettings {
            defaults: PomodoroDurations::from_minutes(0, 5, 15),
            ..PomodoroSettings::default()
        };
        let mut engine = TimerEngine::pomodoro(&settings);
        engine.start();
        engine.tick();
        assert_eq!(engine.cycles_completed(), Some(1));

        engine.set(Configuration::Pomodoro(PomodoroDurations::from_minutes(30, 5, 15)));
        assert_eq!(engine.cycles_completed(), Some(1));
        assert_eq!(engine.phase(), Some(Phase::Work));

        engine.reset();
        assert_eq!(engine.cycles_completed(), Some(0));
    }

    #[test]
    fn long_break_every_zero_is_treated_as_one() {
        let settings = PomodoroSettings {
            defaults: PomodoroDurations::from_minutes(0, 5, 15),
            long_break_every: 0,
            auto_advance: false,
        };
        let mut engine = TimerEngine::pomodoro(&settings);
        engine.start();
        engine.tick();
        assert_eq!(engine.phase(), Some(Phase::LongBreak));
    }

    #[test]
    fn snapshot_reports_pomodoro_fields() {
        let engine = TimerEngine::pomodoro(&PomodoroSettings::default());
        match engine.snapshot() {
            Event::StateSnapshot {
                mode,
                state,
                remaining,
                label,
                phase,
                cycles_completed,
                ..
            } => {
                assert_eq!(mode, TimerMode::Pomodoro);
                assert_eq!(state, TimerState::Idle);
                assert_eq!(remaining, TimeValue::from_minutes(25));
                assert_eq!(label, "Work Time");
                assert_eq!(phase, Some(Phase::Work));
                assert_eq!(cycles_completed, Some(0));
            }
            other => panic!("Expected StateSnapshot, got {other:?}"),
        }
    }
}
