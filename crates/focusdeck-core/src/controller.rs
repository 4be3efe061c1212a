//! The owner of the active timer.
//!
//! A [`TimerController`] holds exactly one [`TimerEngine`] and the two
//! output sinks. Every command goes through it; after each command (and each
//! tick while running) it pushes a fresh [`DisplayFrame`] to the display
//! sink. Switching modes pauses and drops the old engine before building a
//! new one, so no state carries over between modes.

use chrono::Utc;

use crate::command::Command;
use crate::display::{Cue, CueSink, DisplayFrame, DisplaySink};
use crate::events::Event;
use crate::storage::Config;
use crate::timer::{Configuration, PomodoroSettings, TimeFormat, TimerEngine, TimerMode};

/// Knobs the controller applies to every engine it builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerSettings {
    pub pomodoro: PomodoroSettings,
    pub time_format: TimeFormat,
    pub cues_enabled: bool,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            pomodoro: PomodoroSettings::default(),
            time_format: TimeFormat::default(),
            cues_enabled: true,
        }
    }
}

impl From<&Config> for ControllerSettings {
    fn from(config: &Config) -> Self {
        Self {
            pomodoro: config.pomodoro_settings(),
            time_format: config.time_format(),
            cues_enabled: config.cues.enabled,
        }
    }
}

pub struct TimerController {
    engine: TimerEngine,
    settings: ControllerSettings,
    display: Box<dyn DisplaySink>,
    cues: Box<dyn CueSink>,
}

impl TimerController {
    /// Build a controller running `mode` and push the first frame.
    pub fn new(
        mode: TimerMode,
        settings: ControllerSettings,
        display: Box<dyn DisplaySink>,
        cues: Box<dyn CueSink>,
    ) -> Self {
        let mut controller = Self {
            engine: TimerEngine::new(mode, &settings.pomodoro),
            settings,
            display,
            cues,
        };
        controller.refresh();
        controller
    }

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn mode(&self) -> TimerMode {
        self.engine.mode()
    }

    pub fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    pub fn frame(&self) -> DisplayFrame {
        DisplayFrame::render(&self.engine, self.settings.time_format)
    }

    pub fn snapshot(&self) -> Event {
        self.engine.snapshot()
    }

    /// Switch to the mode named `name`.
    ///
    /// Unknown names are logged and ignored; the current engine stays
    /// active and untouched.
    pub fn select_mode(&mut self, name: &str) -> Option<Event> {
        match name.parse::<TimerMode>() {
            Ok(mode) => Some(self.select(mode)),
            Err(e) => {
                tracing::error!("{e}");
                None
            }
        }
    }

    /// Replace the active engine with a fresh one of `mode`.
    pub fn select(&mut self, mode: TimerMode) -> Event {
        let from = self.engine.mode();
        self.engine.pause();
        self.engine = TimerEngine::new(mode, &self.settings.pomodoro);
        self.refresh();
        tracing::info!("switched to {mode}");
        Event::ModeSwitched {
            from,
            to: mode,
            at: Utc::now(),
        }
    }

    pub fn start(&mut self) -> Option<Event> {
        let event = self.engine.start();
        self.refresh();
        event
    }

    pub fn pause(&mut self) -> Option<Event> {
        let event = self.engine.pause();
        self.refresh();
        event
    }

    pub fn reset(&mut self) -> Option<Event> {
        let event = self.engine.reset();
        self.refresh();
        event
    }

    pub fn set_configuration(&mut self, configuration: Configuration) -> Option<Event> {
        let event = self.engine.set(configuration);
        self.refresh();
        event
    }

    /// Advance the active engine by one tick. Does nothing while idle.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.engine.is_running() {
            return None;
        }
        let event = self.engine.tick();
        if let Some(event) = &event {
            self.cue(event);
        }
        self.refresh();
        event
    }

    pub fn dispatch(&mut self, command: Command) -> Option<Event> {
        match command {
            Command::Start => self.start(),
            Command::Pause => self.pause(),
            Command::Reset => self.reset(),
            Command::Set(raw) => {
                let configuration = raw.for_mode(self.engine.mode());
                self.set_configuration(configuration)
            }
            Command::SelectMode(name) => self.select_mode(&name),
            Command::Status => Some(self.snapshot()),
        }
    }

    fn refresh(&mut self) {
        let frame = self.frame();
        self.display.show(&frame);
    }

    fn cue(&mut self, event: &Event) {
        if !self.settings.cues_enabled {
            return;
        }
        if let Some(cue) = Cue::for_event(event) {
            tracing::debug!("playing cue {}", cue.as_str());
            self.cues.play(cue);
        }
    }
}
