//! Periodic "now" source for refreshing departure labels.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::trace;

use crate::domain::Clock;

/// Reference refresh cadence for departure boards.
pub const DEFAULT_TICK: Duration = Duration::from_secs(30);

/// Error returned when waiting on a ticker whose task has ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("ticker stopped")]
pub struct TickerStopped;

/// Publishes the current time on a fixed interval.
///
/// The background task lives exactly as long as the `Ticker`: dropping it
/// aborts the task, so a board that is torn down and rebuilt never leaves a
/// timer behind.
#[derive(Debug)]
pub struct Ticker {
    now: watch::Receiver<DateTime<Utc>>,
    task: JoinHandle<()>,
}

impl Ticker {
    /// Start ticking. The first value is published immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<C>(clock: C, period: Duration) -> Self
    where
        C: Clock + Send + 'static,
    {
        let (tx, rx) = watch::channel(clock.now());

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // First tick completes immediately and the initial value is already published
            interval.tick().await;
            loop {
                interval.tick().await;
                let now = clock.now();
                trace!(%now, "tick");
                if tx.send(now).is_err() {
                    break;
                }
            }
        });

        Self { now: rx, task }
    }

    /// The most recently published time.
    pub fn now(&self) -> DateTime<Utc> {
        *self.now.borrow()
    }

    /// Wait for the next tick and return its time.
    pub async fn tick(&mut self) -> Result<DateTime<Utc>, TickerStopped> {
        self.now.changed().await.map_err(|_| TickerStopped)?;
        Ok(*self.now.borrow_and_update())
    }

    /// A separate receiver for the same ticks.
    pub fn subscribe(&self) -> watch::Receiver<DateTime<Utc>> {
        self.now.clone()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.task.abort();
    }
}
