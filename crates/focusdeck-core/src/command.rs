//! Textual timer commands.
//!
//! Front ends turn user input into a [`Command`] and hand it to
//! [`TimerController::dispatch`](crate::controller::TimerController::dispatch).

use std::str::FromStr;

use thiserror::Error;

use crate::timer::{Configuration, PomodoroDurations, TimeValue, TimerMode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Reset,
    Set(RawConfiguration),
    /// Mode names are checked by the controller, not the parser.
    SelectMode(String),
    Status,
}

/// Up to three raw form fields. Their meaning depends on the active mode:
/// hours/minutes/seconds for countdown and stopwatch, work/break/long-break
/// minutes for Pomodoro.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawConfiguration {
    pub fields: [String; 3],
}

impl RawConfiguration {
    pub fn new(first: impl Into<String>, second: impl Into<String>, third: impl Into<String>) -> Self {
        Self {
            fields: [first.into(), second.into(), third.into()],
        }
    }

    pub fn for_mode(&self, mode: TimerMode) -> Configuration {
        let [a, b, c] = &self.fields;
        match mode {
            TimerMode::Countdown | TimerMode::Stopwatch => {
                Configuration::Duration(TimeValue::parse(a, b, c))
            }
            TimerMode::Pomodoro => Configuration::Pomodoro(PomodoroDurations::parse(a, b, c)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("'{command}' needs a {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("'{command}' takes at most {max} argument(s)")]
    TooManyArguments { command: &'static str, max: usize },
}

impl Command {
    /// Parse one line of input such as `set 0 25 0` or `mode pomodoro`.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] for blank lines, unknown verbs and wrong
    /// argument counts.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let verb = words.next().ok_or(CommandError::Empty)?.to_ascii_lowercase();
        let args: Vec<&str> = words.collect();

        let no_args = |command: &'static str, parsed: Command| {
            if args.is_empty() {
                Ok(parsed)
            } else {
                Err(CommandError::TooManyArguments { command, max: 0 })
            }
        };

        match verb.as_str() {
            "start" => no_args("start", Command::Start),
            "pause" | "stop" => no_args("pause", Command::Pause),
            "reset" => no_args("reset", Command::Reset),
            "status" => no_args("status", Command::Status),
            "set" => {
                if args.len() > 3 {
                    return Err(CommandError::TooManyArguments {
                        command: "set",
                        max: 3,
                    });
                }
                let field = |i: usize| args.get(i).copied().unwrap_or_default();
                Ok(Command::Set(RawConfiguration::new(field(0), field(1), field(2))))
            }
            "mode" => match args.as_slice() {
                [] => Err(CommandError::MissingArgument {
                    command: "mode",
                    argument: "mode name",
                }),
                [name] => Ok(Command::SelectMode((*name).to_string())),
                _ => Err(CommandError::TooManyArguments {
                    command: "mode",
                    max: 1,
                }),
            },
            _ => Err(CommandError::Unknown(verb)),
        }
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::parse(s)
    }
}
