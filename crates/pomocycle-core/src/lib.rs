//! # Pomocycle Core Library
//!
//! Core logic for a work/break cycle timer. The library drives a single
//! countdown through a fixed sequence of work and break intervals and hands
//! side effects (tones, notifications, work records) to the host through
//! injected ports. The CLI binary is one such host.
//!
//! ## Architecture
//!
//! - **Transition function**: pure `apply(state, settings, input)` returning
//!   the next state and the effects to perform
//! - **Timer Engine**: owns the state, a single-slot tick source, and the ports
//! - **Storage**: clamped settings record behind the [`SettingsStore`] port,
//!   with in-memory and TOML file backends
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`Settings`]: Persisted user preferences
//! - [`Ports`]: Side-effect collaborators supplied by the host
//! - [`TickSource`]: One-second tick schedule, tokio-backed or manual

pub mod error;
pub mod events;
pub mod ports;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, PortError};
pub use events::Event;
pub use ports::{CallbackRecorder, Notifier, Permission, Ports, Silent, TonePlayer, WorkRecorder};
pub use storage::{FileStore, MemoryStore, Settings, SettingsStore};
pub use timer::{
    Effect, IntervalTicker, ManualTicker, Tick, TickSource, TimerEngine, TimerMode, TimerState,
    TimerStatus, Tone,
};
