use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::Settings;
use crate::timer::{TimerMode, TimerStatus};

/// Every state change in the engine produces an Event.
/// Hosts render them; the CLI prints them as JSON lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        cycle: u32,
        planned_cycles: u32,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        time_left_seconds: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        time_left_seconds: u64,
        at: DateTime<Utc>,
    },
    TimerStopped {
        at: DateTime<Utc>,
    },
    /// An interval reached zero and the next one started without a gap.
    IntervalCompleted {
        mode: TimerMode,
        cycle: u32,
        next_mode: TimerMode,
        next_cycle: u32,
        at: DateTime<Utc>,
    },
    /// The last work interval of the run finished; the timer is idle again.
    AllCyclesCompleted {
        cycles: u32,
        work_minutes: u32,
        at: DateTime<Utc>,
    },
    SettingsUpdated {
        settings: Settings,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        status: TimerStatus,
        mode: TimerMode,
        current_cycle: u32,
        planned_cycles: u32,
        time_left_seconds: u64,
        interval_seconds: u64,
        time_label: String,
        progress_pct: f64,
        at: DateTime<Utc>,
    },
}
