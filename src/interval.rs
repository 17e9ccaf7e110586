//! Slideshow interval selection: six fixed presets plus a custom value in seconds.

use crate::error::SketchError;
use std::fmt;
use std::time::Duration;

/// Upper bound for a custom interval (one hour)
pub const MAX_CUSTOM_SECS: u64 = 3600;

/// Time each image stays on screen before the slideshow advances
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval(Duration);

impl Interval {
    /// Build an interval from whole seconds, rejecting values outside 1..=3600
    pub fn from_secs(seconds: i64) -> Result<Self, SketchError> {
        if seconds <= 0 || seconds > MAX_CUSTOM_SECS as i64 {
            return Err(SketchError::InvalidInterval {
                value: seconds.to_string(),
            });
        }
        Ok(Interval(Duration::from_secs(seconds as u64)))
    }

    /// Parse the free-text custom interval field
    pub fn parse_custom(input: &str) -> Result<Self, SketchError> {
        let trimmed = input.trim();
        match trimmed.parse::<i64>() {
            Ok(seconds) => Self::from_secs(seconds),
            // A whole number too large for i64 is still out of range
            Err(_) if is_integer_literal(trimmed) => Err(SketchError::InvalidInterval {
                value: trimmed.to_string(),
            }),
            Err(_) => Err(SketchError::NotANumber {
                input: trimmed.to_string(),
            }),
        }
    }

    pub fn duration(&self) -> Duration {
        self.0
    }

    pub fn as_millis(&self) -> u128 {
        self.0.as_millis()
    }
}

fn is_integer_literal(text: &str) -> bool {
    let digits = text.strip_prefix(&['-', '+'][..]).unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

impl Default for Interval {
    fn default() -> Self {
        Preset::Secs30.interval()
    }
}

impl From<Preset> for Interval {
    fn from(preset: Preset) -> Self {
        preset.interval()
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.0.as_secs();
        if secs >= 60 && secs % 60 == 0 {
            write!(f, "{} min", secs / 60)
        } else {
            write!(f, "{} s", secs)
        }
    }
}

/// Preset buttons shown on the setup page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Secs30,
    Secs45,
    Min1,
    Min2,
    Min5,
    Min10,
}

impl Preset {
    pub const ALL: [Preset; 6] = [
        Preset::Secs30,
        Preset::Secs45,
        Preset::Min1,
        Preset::Min2,
        Preset::Min5,
        Preset::Min10,
    ];

    pub fn interval(self) -> Interval {
        let secs = match self {
            Preset::Secs30 => 30,
            Preset::Secs45 => 45,
            Preset::Min1 => 60,
            Preset::Min2 => 120,
            Preset::Min5 => 300,
            Preset::Min10 => 600,
        };
        Interval(Duration::from_secs(secs))
    }

    pub fn label(self) -> &'static str {
        match self {
            Preset::Secs30 => "30s",
            Preset::Secs45 => "45s",
            Preset::Min1 => "1m",
            Preset::Min2 => "2m",
            Preset::Min5 => "5m",
            Preset::Min10 => "10m",
        }
    }
}

/// Format a remaining duration as `MM:SS` for the countdown label
pub fn format_countdown(remaining: Duration) -> String {
    let total = remaining.as_secs();
    format!("{:02}:{:02}", total / 60, total % 60)
}
