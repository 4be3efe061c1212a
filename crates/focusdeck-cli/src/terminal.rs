//! Terminal implementations of the display and cue sinks.

use std::io::Write;

use focusdeck_core::{Cue, CueSink, DisplayFrame, DisplaySink};

/// Redraws the current line with the latest frame.
#[derive(Debug, Default)]
pub struct TerminalDisplay {
    last: Option<DisplayFrame>,
}

impl DisplaySink for TerminalDisplay {
    fn show(&mut self, frame: &DisplayFrame) {
        if self.last.as_ref() == Some(frame) {
            return;
        }
        let mut out = std::io::stdout().lock();
        // Best effort: a closed stdout must not stop the timer.
        let _ = write!(out, "\r\x1b[2K{}  {}", frame.time, frame.label);
        let _ = out.flush();
        self.last = Some(frame.clone());
    }
}

/// Rings the terminal bell and names the cue.
#[derive(Debug, Default)]
pub struct TerminalCues;

impl CueSink for TerminalCues {
    fn play(&mut self, cue: Cue) {
        let mut out = std::io::stdout().lock();
        if let Err(e) = write!(out, "\x07\n{}\n", cue_message(cue)).and_then(|_| out.flush()) {
            tracing::debug!("cue {} not played: {e}", cue.as_str());
        }
    }
}

fn cue_message(cue: Cue) -> &'static str {
    match cue {
        Cue::TimerFinished => "Time is up!",
        Cue::BreakReached => "Work session done, take a break.",
        Cue::LongBreakReached => "Cycle complete, take a long break.",
        Cue::BreakFinished => "Break is over, back to work.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_cue_has_a_message() {
        for cue in [
            Cue::TimerFinished,
            Cue::BreakReached,
            Cue::LongBreakReached,
            Cue::BreakFinished,
        ] {
            assert!(!cue_message(cue).is_empty());
        }
    }
}
