//! Side-effect ports.
//!
//! The engine never talks to an audio device, a notification centre, or a
//! work-record endpoint directly. Hosts plug implementations of these traits
//! into [`Ports`]. Every call is best-effort: an `Err` is logged by the
//! engine and otherwise ignored.

use serde::{Deserialize, Serialize};

use crate::error::PortError;
use crate::timer::Tone;

/// Receives the length of every completed work interval.
pub trait WorkRecorder: Send {
    fn record_work(&mut self, minutes: u32) -> Result<(), PortError>;
}

/// Plays a short audible cue.
pub trait TonePlayer: Send {
    fn play_tone(&mut self, tone: Tone, volume: f64) -> Result<(), PortError>;
}

/// Notification permission as reported by the host environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Not asked yet.
    Default,
    Granted,
    Denied,
}

/// Shows user-visible alerts.
pub trait Notifier: Send {
    fn permission(&self) -> Permission;

    /// Ask the host for permission. Hosts without a prompt just report the
    /// current state.
    fn request_permission(&mut self) -> Permission {
        self.permission()
    }

    fn notify(&mut self, title: &str, body: &str) -> Result<(), PortError>;
}

/// Port that does nothing. Stands in for any side effect a host does not
/// care about.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl WorkRecorder for Silent {
    fn record_work(&mut self, _minutes: u32) -> Result<(), PortError> {
        Ok(())
    }
}

impl TonePlayer for Silent {
    fn play_tone(&mut self, _tone: Tone, _volume: f64) -> Result<(), PortError> {
        Ok(())
    }
}

impl Notifier for Silent {
    fn permission(&self) -> Permission {
        Permission::Denied
    }

    fn notify(&mut self, _title: &str, _body: &str) -> Result<(), PortError> {
        Err(PortError::PermissionDenied)
    }
}

/// Adapts a closure into a [`WorkRecorder`].
pub struct CallbackRecorder<F>(pub F);

impl<F> WorkRecorder for CallbackRecorder<F>
where
    F: FnMut(u32) -> Result<(), PortError> + Send,
{
    fn record_work(&mut self, minutes: u32) -> Result<(), PortError> {
        (self.0)(minutes)
    }
}

/// The set of side-effect ports an engine drives.
pub struct Ports {
    pub recorder: Box<dyn WorkRecorder>,
    pub tone: Box<dyn TonePlayer>,
    pub notifier: Box<dyn Notifier>,
}

impl Ports {
    /// All ports silent.
    pub fn silent() -> Self {
        Self {
            recorder: Box::new(Silent),
            tone: Box::new(Silent),
            notifier: Box::new(Silent),
        }
    }

    pub fn with_recorder(mut self, recorder: impl WorkRecorder + 'static) -> Self {
        self.recorder = Box::new(recorder);
        self
    }

    pub fn with_tone(mut self, tone: impl TonePlayer + 'static) -> Self {
        self.tone = Box::new(tone);
        self
    }

    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }
}

impl Default for Ports {
    fn default() -> Self {
        Self::silent()
    }
}

impl std::fmt::Debug for Ports {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ports").finish_non_exhaustive()
    }
}
