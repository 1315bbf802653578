//! Terminal implementations of the engine's side-effect ports.

use std::io::Write;

use chrono::Utc;
use pomocycle_core::{
    CallbackRecorder, Notifier, Permission, PortError, Ports, Tone, TonePlayer,
};
use serde::Serialize;

/// Rings the terminal bell. Frequency and duration are not expressible on a
/// terminal; a muted volume skips the bell.
pub struct TerminalBell;

impl TonePlayer for TerminalBell {
    fn play_tone(&mut self, tone: Tone, volume: f64) -> Result<(), PortError> {
        if volume <= 0.0 {
            return Ok(());
        }
        tracing::debug!(hz = tone.frequency_hz, ms = tone.duration_ms, volume, "bell");
        let mut err = std::io::stderr();
        err.write_all(b"\x07")?;
        err.flush()?;
        Ok(())
    }
}

/// Prints notifications to stderr.
pub struct StderrNotifier {
    permission: Permission,
}

impl StderrNotifier {
    pub fn new(enabled: bool) -> Self {
        Self {
            permission: if enabled {
                Permission::Default
            } else {
                Permission::Denied
            },
        }
    }
}

impl Notifier for StderrNotifier {
    fn permission(&self) -> Permission {
        self.permission
    }

    fn request_permission(&mut self) -> Permission {
        if self.permission == Permission::Default {
            self.permission = Permission::Granted;
        }
        self.permission
    }

    fn notify(&mut self, title: &str, body: &str) -> Result<(), PortError> {
        let mut err = std::io::stderr();
        writeln!(err, "[{title}] {body}")?;
        Ok(())
    }
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum Record {
    WorkRecorded {
        minutes: u32,
        at: chrono::DateTime<Utc>,
    },
}

/// Emits one JSON line per completed work interval on stdout.
fn print_work_record(minutes: u32) -> Result<(), PortError> {
    let line = serde_json::to_string(&Record::WorkRecorded {
        minutes,
        at: Utc::now(),
    })
    .map_err(|e| PortError::RecorderFailed(e.to_string()))?;
    println!("{line}");
    Ok(())
}

pub fn terminal_ports(notifications: bool) -> Ports {
    Ports::silent()
        .with_recorder(CallbackRecorder(print_work_record))
        .with_tone(TerminalBell)
        .with_notifier(StderrNotifier::new(notifications))
}
