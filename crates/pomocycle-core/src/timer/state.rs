use serde::{Deserialize, Serialize};

use crate::storage::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    Work,
    Break,
}

impl TimerMode {
    pub fn label(self) -> &'static str {
        match self {
            TimerMode::Work => "Work",
            TimerMode::Break => "Break",
        }
    }
}

/// In-memory countdown state. Owned by the engine; hosts only read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub status: TimerStatus,
    pub mode: TimerMode,
    /// 1-based; never exceeds `planned_cycles`.
    pub current_cycle: u32,
    pub time_left_seconds: u64,
    /// Full length of the current interval, captured at its reset.
    pub interval_seconds: u64,
    /// Minutes the current interval was started with. A work interval reports
    /// this value on completion even if settings changed mid-run.
    pub interval_minutes: u32,
    /// Cycle count captured when the run started.
    pub planned_cycles: u32,
}

impl TimerState {
    /// Fresh `idle / work / cycle 1` state for the given settings.
    pub fn idle(settings: &Settings) -> Self {
        Self {
            status: TimerStatus::Idle,
            ..Self::work_interval(settings, 1, settings.cycles)
        }
    }

    /// A work interval of cycle `cycle` at full length.
    pub(crate) fn work_interval(settings: &Settings, cycle: u32, planned_cycles: u32) -> Self {
        Self {
            status: TimerStatus::Running,
            mode: TimerMode::Work,
            current_cycle: cycle,
            time_left_seconds: settings.work_seconds(),
            interval_seconds: settings.work_seconds(),
            interval_minutes: settings.work_minutes,
            planned_cycles,
        }
    }

    /// A break interval following work cycle `cycle`.
    pub(crate) fn break_interval(settings: &Settings, cycle: u32, planned_cycles: u32) -> Self {
        Self {
            status: TimerStatus::Running,
            mode: TimerMode::Break,
            current_cycle: cycle,
            time_left_seconds: settings.break_seconds(),
            interval_seconds: settings.break_seconds(),
            interval_minutes: settings.break_minutes,
            planned_cycles,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.status == TimerStatus::Idle
    }

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    /// 0.0 .. 100.0 progress within the current interval.
    pub fn progress_pct(&self) -> f64 {
        if self.interval_seconds == 0 {
            return 0.0;
        }
        let elapsed = self.interval_seconds.saturating_sub(self.time_left_seconds);
        (elapsed as f64 / self.interval_seconds as f64 * 100.0).min(100.0)
    }

    /// `"2/4"` style cycle indicator.
    pub fn cycle_label(&self) -> String {
        format!("{}/{}", self.current_cycle, self.planned_cycles)
    }

    pub fn time_label(&self) -> String {
        format_time(self.time_left_seconds)
    }
}

/// Format seconds as zero-padded `MM:SS`. Minutes are not wrapped at 60.
pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
