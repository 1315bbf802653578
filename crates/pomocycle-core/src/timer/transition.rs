//! Pure state-transition function.
//!
//! `apply(state, settings, input)` returns the next state together with the
//! side effects the host should perform. Nothing here touches audio,
//! notifications, storage, or the clock, so the whole cycle can be driven
//! deterministically in tests.
//!
//! ```text
//! idle --start--> work(1) --0--> break(1) --0--> work(2) ... work(N) --0--> idle
//!                   |  ^
//!             pause |  | resume / start
//!                   v  |
//!                  paused
//! ```

use serde::{Deserialize, Serialize};

use super::state::{TimerMode, TimerState, TimerStatus};
use crate::storage::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Input {
    Start,
    Pause,
    Resume,
    Stop,
    Tick,
    /// Settings were replaced; only an idle timer picks them up immediately.
    SettingsChanged,
}

/// An audible cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tone {
    pub frequency_hz: u32,
    pub duration_ms: u64,
}

pub const WORK_COMPLETE_TONE: Tone = Tone {
    frequency_hz: 800,
    duration_ms: 800,
};
pub const BREAK_COMPLETE_TONE: Tone = Tone {
    frequency_hz: 600,
    duration_ms: 600,
};
pub const PREVIEW_TONE: Tone = Tone {
    frequency_hz: 600,
    duration_ms: 300,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyKind {
    WorkComplete,
    BreakStart,
    BreakComplete,
    AllCyclesComplete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    PlayTone {
        tone: Tone,
        volume: f64,
    },
    Notify {
        kind: NotifyKind,
        title: String,
        body: String,
    },
    /// Report a finished work interval to the host's recorder.
    RecordWork {
        minutes: u32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: TimerState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn quiet(state: TimerState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }
}

pub fn apply(state: &TimerState, settings: &Settings, input: Input) -> Transition {
    match (input, state.status) {
        (Input::Start, TimerStatus::Idle) => {
            Transition::quiet(TimerState::work_interval(settings, 1, settings.cycles))
        }
        (Input::Start | Input::Resume, TimerStatus::Paused) => Transition::quiet(TimerState {
            status: TimerStatus::Running,
            ..*state
        }),
        (Input::Pause, TimerStatus::Running) => Transition::quiet(TimerState {
            status: TimerStatus::Paused,
            ..*state
        }),
        (Input::Stop, _) => Transition::quiet(TimerState::idle(settings)),
        (Input::SettingsChanged, TimerStatus::Idle) => Transition::quiet(TimerState::idle(settings)),
        (Input::Tick, TimerStatus::Running) => {
            let time_left_seconds = state.time_left_seconds.saturating_sub(1);
            if time_left_seconds > 0 {
                return Transition::quiet(TimerState {
                    time_left_seconds,
                    ..*state
                });
            }
            complete(state, settings)
        }
        _ => Transition::quiet(*state),
    }
}

/// The countdown of the current interval reached zero.
fn complete(state: &TimerState, settings: &Settings) -> Transition {
    let mut effects = Vec::new();
    let cycle = state.current_cycle;

    let next = match state.mode {
        TimerMode::Work => {
            tone(settings, WORK_COMPLETE_TONE, &mut effects);
            notify(
                settings,
                NotifyKind::WorkComplete,
                "Pomodoro complete!",
                format!("{} minutes of work done. Nice job!", state.interval_minutes),
                &mut effects,
            );
            effects.push(Effect::RecordWork {
                minutes: state.interval_minutes,
            });

            if cycle < state.planned_cycles {
                notify(
                    settings,
                    NotifyKind::BreakStart,
                    "Break time",
                    format!("Take a proper {} minute rest.", settings.break_minutes),
                    &mut effects,
                );
                TimerState::break_interval(settings, cycle, state.planned_cycles)
            } else {
                notify(
                    settings,
                    NotifyKind::AllCyclesComplete,
                    "All cycles complete!",
                    format!("{} cycles of work finished. Well done!", state.planned_cycles),
                    &mut effects,
                );
                TimerState::idle(settings)
            }
        }
        TimerMode::Break => {
            tone(settings, BREAK_COMPLETE_TONE, &mut effects);
            notify(
                settings,
                NotifyKind::BreakComplete,
                "Break over!",
                "Time to start the next work cycle.".to_string(),
                &mut effects,
            );
            TimerState::work_interval(settings, cycle + 1, state.planned_cycles)
        }
    };

    Transition {
        state: next,
        effects,
    }
}

fn tone(settings: &Settings, tone: Tone, effects: &mut Vec<Effect>) {
    if settings.sound_enabled {
        effects.push(Effect::PlayTone {
            tone,
            volume: settings.volume,
        });
    }
}

fn notify(
    settings: &Settings,
    kind: NotifyKind,
    title: &str,
    body: String,
    effects: &mut Vec<Effect>,
) {
    if settings.notification_enabled {
        effects.push(Effect::Notify {
            kind,
            title: title.to_string(),
            body,
        });
    }
}
