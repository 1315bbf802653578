//! Timer engine implementation.
//!
//! The engine wraps the pure [`apply`](super::transition::apply) function
//! with the things it deliberately leaves out: settings persistence, the
//! single-slot tick source, and execution of side effects through [`Ports`].
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!   ^        |
//!   +--------+  (stop, or last work interval done)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(Box::new(store), ports, Box::new(ticker));
//! engine.start();
//! // For every Tick received from the tick source:
//! engine.tick(tick.generation); // Some(Event) when an interval completes
//! ```

use chrono::Utc;

use super::state::{TimerState, TimerStatus};
use super::ticker::TickSource;
use super::transition::{apply, Effect, Input, PREVIEW_TONE};
use crate::events::Event;
use crate::ports::{Permission, Ports};
use crate::storage::{Settings, SettingsStore};

/// Core timer engine.
///
/// Owns the countdown state and the tick schedule. Hosts issue commands and
/// read snapshots; they never mutate the state directly.
pub struct TimerEngine {
    settings: Settings,
    state: TimerState,
    store: Box<dyn SettingsStore>,
    ports: Ports,
    ticker: Box<dyn TickSource>,
    /// Bumped on every arm/disarm. Ticks from older schedules are ignored.
    generation: u64,
}

impl TimerEngine {
    /// Create an engine, loading settings once from `store`.
    ///
    /// A store that fails or holds nothing yields the defaults.
    pub fn new(store: Box<dyn SettingsStore>, ports: Ports, ticker: Box<dyn TickSource>) -> Self {
        let settings = match store.load() {
            Ok(Some(settings)) => settings.clamped(),
            Ok(None) => Settings::default(),
            Err(e) => {
                tracing::warn!("failed to load settings, using defaults: {e}");
                Settings::default()
            }
        };
        Self {
            settings,
            state: TimerState::idle(&settings),
            store,
            ports,
            ticker,
            generation: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn status(&self) -> TimerStatus {
        self.state.status
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Generation that a tick must carry to be counted.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_armed()
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            status: self.state.status,
            mode: self.state.mode,
            current_cycle: self.state.current_cycle,
            planned_cycles: self.state.planned_cycles,
            time_left_seconds: self.state.time_left_seconds,
            interval_seconds: self.state.interval_seconds,
            time_label: self.state.time_label(),
            progress_pct: self.state.progress_pct(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a fresh run from idle, or resume a paused one.
    pub fn start(&mut self) -> Option<Event> {
        match self.state.status {
            TimerStatus::Idle => {
                self.transition(Input::Start);
                self.arm();
                Some(Event::TimerStarted {
                    mode: self.state.mode,
                    cycle: self.state.current_cycle,
                    planned_cycles: self.state.planned_cycles,
                    duration_secs: self.state.interval_seconds,
                    at: Utc::now(),
                })
            }
            TimerStatus::Paused => self.resume(),
            TimerStatus::Running => None, // Already running.
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        if self.state.status != TimerStatus::Running {
            return None;
        }
        self.disarm();
        self.transition(Input::Pause);
        Some(Event::TimerPaused {
            time_left_seconds: self.state.time_left_seconds,
            at: Utc::now(),
        })
    }

    pub fn resume(&mut self) -> Option<Event> {
        if self.state.status != TimerStatus::Paused {
            return None;
        }
        self.transition(Input::Resume);
        self.arm();
        Some(Event::TimerResumed {
            time_left_seconds: self.state.time_left_seconds,
            at: Utc::now(),
        })
    }

    /// Back to `idle / work / cycle 1` from any status. Fires no side effects.
    pub fn stop(&mut self) -> Option<Event> {
        self.disarm();
        self.transition(Input::Stop);
        Some(Event::TimerStopped { at: Utc::now() })
    }

    /// Replace the settings. Values are clamped, persisted, and picked up
    /// immediately only if the timer is idle; a running or paused countdown
    /// keeps going unchanged.
    pub fn update_settings(&mut self, settings: Settings) -> Option<Event> {
        self.settings = settings.clamped();
        if let Err(e) = self.store.persist(&self.settings) {
            tracing::warn!("failed to persist settings: {e}");
        }
        self.transition(Input::SettingsChanged);
        Some(Event::SettingsUpdated {
            settings: self.settings,
            at: Utc::now(),
        })
    }

    /// Count one elapsed second from the schedule tagged `generation`.
    ///
    /// Returns an event when an interval completes. Ticks from a cancelled
    /// schedule, or while not running, change nothing.
    pub fn tick(&mut self, generation: u64) -> Option<Event> {
        if generation != self.generation || self.state.status != TimerStatus::Running {
            tracing::trace!(
                generation,
                current = self.generation,
                "ignoring stale tick"
            );
            return None;
        }

        let before = self.state;
        let effects = self.transition(Input::Tick);
        let after = self.state;

        if before.mode == after.mode && after.status == TimerStatus::Running {
            return None;
        }

        self.run_effects(effects);

        if after.status == TimerStatus::Idle {
            self.disarm();
            tracing::info!(cycles = before.planned_cycles, "all cycles complete");
            return Some(Event::AllCyclesCompleted {
                cycles: before.planned_cycles,
                work_minutes: before.interval_minutes,
                at: Utc::now(),
            });
        }

        tracing::debug!(
            from = before.mode.label(),
            to = after.mode.label(),
            cycle = after.current_cycle,
            "interval complete"
        );
        Some(Event::IntervalCompleted {
            mode: before.mode,
            cycle: before.current_cycle,
            next_mode: after.mode,
            next_cycle: after.current_cycle,
            at: Utc::now(),
        })
    }

    /// Tick the live schedule. For hosts that drive the clock themselves.
    pub fn tick_now(&mut self) -> Option<Event> {
        self.tick(self.generation)
    }

    /// Play the preview cue at the current volume.
    pub fn preview_volume(&mut self) {
        if !self.settings.sound_enabled {
            return;
        }
        self.run_effects(vec![Effect::PlayTone {
            tone: PREVIEW_TONE,
            volume: self.settings.volume,
        }]);
    }

    pub fn notification_permission(&self) -> Permission {
        self.ports.notifier.permission()
    }

    pub fn request_notification_permission(&mut self) -> Permission {
        let permission = self.ports.notifier.request_permission();
        tracing::debug!(?permission, "notification permission");
        permission
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn transition(&mut self, input: Input) -> Vec<Effect> {
        let t = apply(&self.state, &self.settings, input);
        self.state = t.state;
        t.effects
    }

    fn arm(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.ticker.arm(self.generation);
    }

    fn disarm(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.ticker.disarm();
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::PlayTone { tone, volume } => {
                    if let Err(e) = self.ports.tone.play_tone(tone, volume) {
                        tracing::warn!(hz = tone.frequency_hz, "failed to play tone: {e}");
                    }
                }
                Effect::Notify { kind, title, body } => {
                    if self.ports.notifier.permission() != Permission::Granted {
                        tracing::debug!(?kind, "notification skipped, permission not granted");
                        continue;
                    }
                    if let Err(e) = self.ports.notifier.notify(&title, &body) {
                        tracing::warn!(?kind, "failed to send notification: {e}");
                    }
                }
                Effect::RecordWork { minutes } => {
                    if let Err(e) = self.ports.recorder.record_work(minutes) {
                        tracing::warn!(minutes, "failed to record work interval: {e}");
                    }
                }
            }
        }
    }
}

impl std::fmt::Debug for TimerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerEngine")
            .field("settings", &self.settings)
            .field("state", &self.state)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl Drop for TimerEngine {
    fn drop(&mut self) {
        self.ticker.disarm();
    }
}
