mod engine;
mod schedule;
mod ticker;
mod time_value;

pub use engine::{
    Configuration, PomodoroSettings, TimerEngine, TimerMode, TimerState, UnknownMode,
};
pub use schedule::{Phase, PomodoroDurations};
pub use ticker::{Ticker, TICK_INTERVAL};
pub use time_value::{coerce_field, FieldOutOfRange, TimeFormat, TimeValue, Underflow};
