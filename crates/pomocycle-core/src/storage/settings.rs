//! User preferences for the cycle timer.
//!
//! Settings are a flat record of six fields. Every numeric field has a fixed
//! range; values outside it are clamped, never rejected. Missing or
//! non-numeric values fall back to the field default.
//!
//! The persisted blob uses camelCase keys:
//!
//! ```toml
//! workMinutes = 25
//! breakMinutes = 5
//! cycles = 3
//! soundEnabled = true
//! volume = 0.5
//! notificationEnabled = true
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigError;

pub const WORK_MINUTES_MIN: u32 = 1;
pub const WORK_MINUTES_MAX: u32 = 120;
pub const BREAK_MINUTES_MIN: u32 = 1;
pub const BREAK_MINUTES_MAX: u32 = 60;
pub const CYCLES_MIN: u32 = 1;
pub const CYCLES_MAX: u32 = 10;

/// Persisted user preferences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_work_minutes")]
    pub work_minutes: u32,
    #[serde(default = "default_break_minutes")]
    pub break_minutes: u32,
    #[serde(default = "default_cycles")]
    pub cycles: u32,
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
    /// 0.0 .. 1.0
    #[serde(default = "default_volume")]
    pub volume: f64,
    #[serde(default = "default_true")]
    pub notification_enabled: bool,
}

// Default functions
fn default_work_minutes() -> u32 {
    25
}
fn default_break_minutes() -> u32 {
    5
}
fn default_cycles() -> u32 {
    3
}
fn default_volume() -> f64 {
    0.5
}
fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_minutes: default_work_minutes(),
            break_minutes: default_break_minutes(),
            cycles: default_cycles(),
            sound_enabled: true,
            volume: default_volume(),
            notification_enabled: true,
        }
    }
}

/// Field keys accepted by [`Settings::get_field`] and [`Settings::set_field`].
pub const FIELD_KEYS: [&str; 6] = [
    "workMinutes",
    "breakMinutes",
    "cycles",
    "soundEnabled",
    "volume",
    "notificationEnabled",
];

impl Settings {
    /// Clamp every numeric field into its valid range.
    pub fn clamped(self) -> Self {
        Self {
            work_minutes: self.work_minutes.clamp(WORK_MINUTES_MIN, WORK_MINUTES_MAX),
            break_minutes: self.break_minutes.clamp(BREAK_MINUTES_MIN, BREAK_MINUTES_MAX),
            cycles: self.cycles.clamp(CYCLES_MIN, CYCLES_MAX),
            volume: clamp_volume(self.volume),
            ..self
        }
    }

    pub fn work_seconds(&self) -> u64 {
        u64::from(self.work_minutes) * 60
    }

    pub fn break_seconds(&self) -> u64 {
        u64::from(self.break_minutes) * 60
    }

    /// Decode a persisted blob without ever failing.
    ///
    /// Accepts both camelCase and snake_case keys. Numeric strings count as
    /// numbers; anything else non-numeric takes the field default.
    pub fn from_value(value: &Value) -> Self {
        let defaults = Self::default();
        Self {
            work_minutes: int_field(
                lookup(value, "workMinutes"),
                defaults.work_minutes,
                WORK_MINUTES_MIN,
                WORK_MINUTES_MAX,
            ),
            break_minutes: int_field(
                lookup(value, "breakMinutes"),
                defaults.break_minutes,
                BREAK_MINUTES_MIN,
                BREAK_MINUTES_MAX,
            ),
            cycles: int_field(lookup(value, "cycles"), defaults.cycles, CYCLES_MIN, CYCLES_MAX),
            sound_enabled: bool_field(lookup(value, "soundEnabled"), defaults.sound_enabled),
            volume: lookup(value, "volume")
                .and_then(as_number)
                .map(clamp_volume)
                .unwrap_or(defaults.volume),
            notification_enabled: bool_field(
                lookup(value, "notificationEnabled"),
                defaults.notification_enabled,
            ),
        }
    }

    /// Get a field value as a string by its key.
    pub fn get_field(&self, key: &str) -> Option<String> {
        let canonical = canonical_key(key)?;
        let json = serde_json::to_value(self).ok()?;
        json.get(canonical).map(|v| v.to_string())
    }

    /// Set one field from its string form.
    ///
    /// An unparsable value takes the field default and the result is clamped.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownKey`] if `key` names no field.
    pub fn set_field(&mut self, key: &str, raw: &str) -> Result<(), ConfigError> {
        let canonical = canonical_key(key).ok_or_else(|| ConfigError::UnknownKey(key.into()))?;
        let mut json = serde_json::to_value(*self).unwrap_or(Value::Null);
        if let Value::Object(ref mut obj) = json {
            obj.insert(canonical.to_string(), Value::String(raw.trim().to_string()));
        }
        *self = Self::from_value(&json);
        Ok(())
    }
}

fn canonical_key(key: &str) -> Option<&'static str> {
    let squashed: String = key
        .chars()
        .filter(|c| *c != '_' && *c != '-')
        .collect::<String>()
        .to_ascii_lowercase();
    FIELD_KEYS
        .iter()
        .copied()
        .find(|k| k.to_ascii_lowercase() == squashed)
}

fn lookup<'a>(value: &'a Value, camel: &str) -> Option<&'a Value> {
    let obj = value.as_object()?;
    obj.get(camel).or_else(|| {
        obj.iter()
            .find(|(k, _)| canonical_key(k) == Some(camel))
            .map(|(_, v)| v)
    })
}

fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

fn int_field(value: Option<&Value>, default: u32, min: u32, max: u32) -> u32 {
    match value.and_then(as_number) {
        Some(n) => n.trunc().clamp(f64::from(min), f64::from(max)) as u32,
        None => default,
    }
}

fn bool_field(value: Option<&Value>, default: bool) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.trim().parse::<bool>().unwrap_or(default),
        _ => default,
    }
}

fn clamp_volume(volume: f64) -> f64 {
    if volume.is_nan() {
        default_volume()
    } else {
        volume.clamp(0.0, 1.0)
    }
}
