//! # focusdeck Core Library
//!
//! Timer engines and the checklist behind the focusdeck productivity widget.
//! All behaviour lives here; the CLI binary is a thin terminal front end
//! over the same library.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a tick-driven state machine over three modes
//!   (countdown, stopwatch, Pomodoro). It owns no timer handle; the caller
//!   invokes `tick()` every 10 ms while it is running
//! - **Controller**: owns the single active engine, applies commands and
//!   pushes display frames and cues to its sinks
//! - **Checklist**: ordered to-do items persisted through a key-value store
//! - **Storage**: SQLite key-value store and TOML configuration
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`TimerController`]: Mode switching and command dispatch
//! - [`Ticker`]: The periodic tick source
//! - [`ChecklistStore`]: Persisted checklist
//! - [`Config`]: Application configuration management

pub mod checklist;
pub mod command;
pub mod controller;
pub mod display;
pub mod error;
pub mod events;
pub mod storage;
pub mod timer;

pub use checklist::{ChecklistItem, ChecklistStore};
pub use command::{Command, CommandError, RawConfiguration};
pub use controller::{ControllerSettings, TimerController};
pub use display::{Cue, CueSink, DisplayFrame, DisplaySink, Silent};
pub use error::{ConfigError, CoreError, StorageError};
pub use events::Event;
pub use storage::{Config, Database, KvStore};
pub use timer::{
    Configuration, Phase, PomodoroDurations, PomodoroSettings, TimeFormat, TimeValue, Ticker,
    TimerEngine, TimerMode, TimerState, TICK_INTERVAL,
};
