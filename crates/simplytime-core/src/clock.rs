//! Tick pulse sources.
//!
//! Three concerns in the system each own exactly one ticking source: the
//! 1-second countdown, the 50-millisecond breathing loop, and the
//! 1-second cue-overlay countdown. A [`Ticker`] enforces the shared
//! invariant that (re)starting a concern first cancels any prior
//! instance of that same concern - a source is never double-scheduled.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// A start/stoppable pulse source backed by a tokio interval task.
///
/// Each pulse is a unit value on the channel handed to [`start`]. The
/// task ends on its own once the receiving side is dropped.
///
/// [`start`]: Ticker::start
#[derive(Debug, Default)]
pub struct Ticker {
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn new() -> Self {
        Self { handle: None }
    }

    /// Begin emitting one pulse per `period`. If a previous task is
    /// still live it is aborted first, so restart never produces a
    /// doubled cadence.
    pub fn start(&mut self, period: Duration, tx: UnboundedSender<()>) {
        self.stop();
        self.handle = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first interval tick completes immediately; skip it so
            // the first pulse arrives one full period after start.
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(()).is_err() {
                    break;
                }
            }
        }));
    }

    /// Cancel the pulse source synchronously. Safe to call when already
    /// stopped.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn emits_one_pulse_per_period() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut ticker = Ticker::new();
        ticker.start(Duration::from_secs(1), tx);
        tokio::task::yield_now().await;

        for _ in 0..3 {
            tokio::time::advance(Duration::from_secs(1)).await;
            tokio::task::yield_now().await;
        }

        let mut pulses = 0;
        while rx.try_recv().is_ok() {
            pulses += 1;
        }
        assert_eq!(pulses, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_does_not_double_cadence() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut ticker = Ticker::new();
        ticker.start(Duration::from_secs(1), tx.clone());
        ticker.start(Duration::from_secs(1), tx);
        tokio::task::yield_now().await;

        for _ in 0..2 {
            tokio::time::advance(Duration::from_secs(1)).await;
            tokio::task::yield_now().await;
        }

        let mut pulses = 0;
        while rx.try_recv().is_ok() {
            pulses += 1;
        }
        // One source, two wall-seconds, two pulses - not four.
        assert_eq!(pulses, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_halts_pulses() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut ticker = Ticker::new();
        ticker.start(Duration::from_secs(1), tx);
        tokio::task::yield_now().await;

        tokio::time::advance(Duration::from_secs(1)).await;
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_ok());

        ticker.stop();
        assert!(!ticker.is_running());
        tokio::time::advance(Duration::from_secs(5)).await;
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
    }
}
