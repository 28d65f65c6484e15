//! Race time parsing and formatting
//!
//! Accepts `MM:SS` or `HH:MM:SS` with `:` or `.` as separator and renders the
//! canonical `M:SS` / `H:MM:SS` form.

use crate::error::TimeFormatError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A non-negative duration stored as whole seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RaceTime(u32);

impl RaceTime {
    pub const fn from_seconds(seconds: u32) -> Self {
        Self(seconds)
    }

    /// Build a time from hours, minutes and seconds
    pub const fn hms(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self(hours * 3600 + minutes * 60 + seconds)
    }

    /// Round a fractional second count to the nearest whole second
    pub fn from_seconds_f64(seconds: f64) -> Self {
        if !seconds.is_finite() || seconds <= 0.0 {
            return Self(0);
        }
        Self(seconds.round().min(u32::MAX as f64) as u32)
    }

    pub const fn seconds(self) -> u32 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

/// Parse `MM:SS` or `HH:MM:SS` (separator `:` or `.`) into a [`RaceTime`]
pub fn parse_time(text: &str) -> Result<RaceTime, TimeFormatError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TimeFormatError::Empty);
    }

    let fields: Vec<&str> = trimmed.split([':', '.']).collect();
    if fields.len() != 2 && fields.len() != 3 {
        return Err(TimeFormatError::FieldCount {
            input: trimmed.to_string(),
            fields: fields.len(),
        });
    }

    let mut values = Vec::with_capacity(fields.len());
    for field in &fields {
        if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TimeFormatError::NonNumeric {
                input: trimmed.to_string(),
                field: field.to_string(),
            });
        }
        // Digits only, so a parse failure can only be overflow
        let value: u64 = field.parse().map_err(|_| TimeFormatError::TooLong {
            input: trimmed.to_string(),
        })?;
        values.push(value);
    }

    let (hours, minutes, seconds) = match values[..] {
        [m, s] => (0, m, s),
        [h, m, s] => (h, m, s),
        _ => {
            return Err(TimeFormatError::FieldCount {
                input: trimmed.to_string(),
                fields: values.len(),
            })
        }
    };

    for (unit, value) in [("minutes", minutes), ("seconds", seconds)] {
        if value >= 60 {
            return Err(TimeFormatError::FieldOutOfRange {
                input: trimmed.to_string(),
                unit,
                value,
            });
        }
    }

    hours
        .checked_mul(3600)
        .and_then(|total| total.checked_add(minutes * 60 + seconds))
        .and_then(|total| u32::try_from(total).ok())
        .map(RaceTime)
        .ok_or_else(|| TimeFormatError::TooLong {
            input: trimmed.to_string(),
        })
}

/// Render as `H:MM:SS` when hours are present, otherwise `M:SS`
pub fn format_time(time: RaceTime) -> String {
    format_seconds(time.0)
}

pub(crate) fn format_seconds(total: u32) -> String {
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

impl FromStr for RaceTime {
    type Err = TimeFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_time(s)
    }
}

impl fmt::Display for RaceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_time(*self))
    }
}

impl Serialize for RaceTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_time(*self))
    }
}

impl<'de> Deserialize<'de> for RaceTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_time(&text).map_err(serde::de::Error::custom)
    }
}
