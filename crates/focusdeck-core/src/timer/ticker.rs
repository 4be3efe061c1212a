//! The periodic tick source.
//!
//! A [`Ticker`] owns at most one `tokio` interval. Front ends call
//! [`Ticker::sync`] with the controller's running flag after every command
//! and every tick: a running engine gets an interval armed, an idle one has
//! it dropped. Awaiting [`Ticker::next`] on a disarmed ticker never resolves,
//! so it can sit in a `select!` next to the input stream.

use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior};

/// One tick is one hundredth of a second.
pub const TICK_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    interval: Option<Interval>,
}

impl Ticker {
    pub fn new() -> Self {
        Self::with_period(TICK_INTERVAL)
    }

    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            interval: None,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.interval.is_some()
    }

    /// Arm or disarm to match `running`. Arming an already armed ticker
    /// keeps the existing interval and its phase.
    ///
    /// Must be called from within a tokio runtime.
    pub fn sync(&mut self, running: bool) {
        match (running, self.interval.is_some()) {
            (true, false) => {
                let mut interval =
                    tokio::time::interval_at(Instant::now() + self.period, self.period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                self.interval = Some(interval);
                tracing::trace!("ticker armed");
            }
            (false, true) => {
                self.interval = None;
                tracing::trace!("ticker disarmed");
            }
            _ => {}
        }
    }

    /// Wait for the next tick.
    pub async fn next(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new()
    }
}
