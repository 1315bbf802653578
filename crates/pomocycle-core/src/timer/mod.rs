mod engine;
mod state;
mod ticker;
mod transition;

pub use engine::TimerEngine;
pub use state::{format_time, TimerMode, TimerState, TimerStatus};
pub use ticker::{IntervalTicker, ManualTicker, Tick, TickSource};
pub use transition::{
    apply, Effect, Input, NotifyKind, Tone, Transition, BREAK_COMPLETE_TONE, PREVIEW_TONE,
    WORK_COMPLETE_TONE,
};
