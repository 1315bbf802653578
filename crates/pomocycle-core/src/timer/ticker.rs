//! Tick sources.
//!
//! A tick source holds at most one schedule. `arm` replaces whatever was
//! scheduled before, `disarm` cancels it synchronously. Every schedule is
//! tagged with a generation number; ticks carry it back so the engine can
//! drop ticks that were already in flight when the schedule changed.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::error::{CoreError, Result};

/// One elapsed second of a particular schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub generation: u64,
}

pub trait TickSource: Send {
    /// Cancel any pending schedule and start delivering ticks tagged with
    /// `generation`.
    fn arm(&mut self, generation: u64);

    /// Cancel the pending schedule, if any.
    fn disarm(&mut self);

    /// Generation of the live schedule.
    fn armed_generation(&self) -> Option<u64>;

    fn is_armed(&self) -> bool {
        self.armed_generation().is_some()
    }
}

/// Tokio-backed tick source. Ticks arrive on the receiver returned by
/// [`IntervalTicker::new`].
#[derive(Debug)]
pub struct IntervalTicker {
    period: Duration,
    tx: mpsc::UnboundedSender<Tick>,
    runtime: tokio::runtime::Handle,
    slot: Option<(u64, JoinHandle<()>)>,
}

impl IntervalTicker {
    /// One tick per second.
    ///
    /// # Errors
    ///
    /// Returns an error when called outside a tokio runtime.
    pub fn new() -> Result<(Self, mpsc::UnboundedReceiver<Tick>)> {
        Self::with_period(Duration::from_secs(1))
    }

    /// # Errors
    ///
    /// Returns an error when called outside a tokio runtime.
    pub fn with_period(period: Duration) -> Result<(Self, mpsc::UnboundedReceiver<Tick>)> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| CoreError::Custom(format!("tick source needs a tokio runtime: {e}")))?;
        let (tx, rx) = mpsc::unbounded_channel();
        Ok((
            Self {
                period,
                tx,
                runtime,
                slot: None,
            },
            rx,
        ))
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl TickSource for IntervalTicker {
    fn arm(&mut self, generation: u64) {
        self.disarm();
        let tx = self.tx.clone();
        let period = self.period;
        let handle = self.runtime.spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            // A suspended process catches up on the seconds it slept through.
            interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
            loop {
                interval.tick().await;
                if tx.send(Tick { generation }).is_err() {
                    break;
                }
            }
        });
        self.slot = Some((generation, handle));
    }

    fn disarm(&mut self) {
        if let Some((_, handle)) = self.slot.take() {
            handle.abort();
        }
    }

    fn armed_generation(&self) -> Option<u64> {
        self.slot.as_ref().map(|(generation, _)| *generation)
    }
}

impl Drop for IntervalTicker {
    fn drop(&mut self) {
        self.disarm();
    }
}

/// Tick source for hosts that call `tick` by hand, and for tests. Records
/// how many schedules it was asked to create.
#[derive(Debug, Default, Clone)]
pub struct ManualTicker {
    armed: Option<u64>,
    arms: u64,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm_count(&self) -> u64 {
        self.arms
    }
}

impl TickSource for ManualTicker {
    fn arm(&mut self, generation: u64) {
        self.armed = Some(generation);
        self.arms += 1;
    }

    fn disarm(&mut self) {
        self.armed = None;
    }

    fn armed_generation(&self) -> Option<u64> {
        self.armed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_ticker_single_slot() {
        let mut t = ManualTicker::new();
        assert!(!t.is_armed());
        t.arm(1);
        t.arm(2);
        assert_eq!(t.armed_generation(), Some(2));
        assert_eq!(t.arm_count(), 2);
        t.disarm();
        assert!(!t.is_armed());
    }

    #[test]
    fn interval_ticker_needs_runtime() {
        assert!(IntervalTicker::new().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn interval_ticker_delivers_tagged_ticks() {
        let (mut ticker, mut rx) = IntervalTicker::new().unwrap();
        ticker.arm(7);
        time::advance(Duration::from_millis(3_100)).await;
        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(rx.recv().await.unwrap());
        }
        assert!(seen.iter().all(|t| t.generation == 7));
    }

    #[tokio::test(start_paused = true)]
    async fn rearm_cancels_previous_schedule() {
        let (mut ticker, mut rx) = IntervalTicker::new().unwrap();
        ticker.arm(1);
        ticker.arm(2);
        time::sleep(Duration::from_millis(2_500)).await;
        ticker.disarm();
        let mut generations = Vec::new();
        while let Ok(tick) = rx.try_recv() {
            generations.push(tick.generation);
        }
        assert_eq!(generations, vec![2, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn disarm_stops_delivery() {
        let (mut ticker, mut rx) = IntervalTicker::new().unwrap();
        ticker.arm(1);
        time::sleep(Duration::from_millis(1_500)).await;
        ticker.disarm();
        assert!(!ticker.is_armed());
        time::sleep(Duration::from_secs(5)).await;
        let mut count = 0;
        while rx.try_recv().is_ok() {
            count += 1;
        }
        assert_eq!(count, 1);
    }
}
