//! Time units and hour/minute/second values

use std::fmt;

use serde::{Deserialize, Serialize};

/// Field of a duration that can be selected for digit entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Hours,
    Minutes,
    Seconds,
}

impl TimeUnit {
    /// Short suffix shown under the field
    pub fn suffix(&self) -> &'static str {
        match self {
            TimeUnit::Hours => "h",
            TimeUnit::Minutes => "min",
            TimeUnit::Seconds => "sec",
        }
    }

    /// Largest value a completed two-digit entry may hold
    pub fn max_value(&self) -> u8 {
        match self {
            TimeUnit::Hours => 99,
            TimeUnit::Minutes | TimeUnit::Seconds => 59,
        }
    }

    /// Field that receives focus after a two-digit entry completes
    pub fn next(&self) -> TimeUnit {
        match self {
            TimeUnit::Hours => TimeUnit::Minutes,
            TimeUnit::Minutes | TimeUnit::Seconds => TimeUnit::Seconds,
        }
    }

    /// Parse a unit name as used on the HTTP surface
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "hours" | "hour" | "h" => Some(TimeUnit::Hours),
            "minutes" | "minute" | "min" | "m" => Some(TimeUnit::Minutes),
            "seconds" | "second" | "sec" | "s" => Some(TimeUnit::Seconds),
            _ => None,
        }
    }
}

/// A duration split into hours, minutes and seconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Time {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

impl Time {
    pub fn new(hours: u8, minutes: u8, seconds: u8) -> Self {
        Self { hours, minutes, seconds }
    }

    pub fn total_seconds(&self) -> u64 {
        u64::from(self.hours) * 3600 + u64::from(self.minutes) * 60 + u64::from(self.seconds)
    }

    pub fn get(&self, unit: TimeUnit) -> u8 {
        match unit {
            TimeUnit::Hours => self.hours,
            TimeUnit::Minutes => self.minutes,
            TimeUnit::Seconds => self.seconds,
        }
    }

    /// Copy of this value with one field replaced
    pub fn with(&self, unit: TimeUnit, value: u8) -> Self {
        match unit {
            TimeUnit::Hours => Self { hours: value, ..*self },
            TimeUnit::Minutes => Self { minutes: value, ..*self },
            TimeUnit::Seconds => Self { seconds: value, ..*self },
        }
    }

    /// One second less, borrowing from minutes and hours. Zero stays zero.
    pub fn saturating_decrement(&self) -> Self {
        if self.seconds > 0 {
            Self { seconds: self.seconds - 1, ..*self }
        } else if self.minutes > 0 {
            Self { minutes: self.minutes - 1, seconds: 59, ..*self }
        } else if self.hours > 0 {
            Self { hours: self.hours - 1, minutes: 59, seconds: 59 }
        } else {
            *self
        }
    }

    pub fn is_zero(&self) -> bool {
        self.total_seconds() == 0
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}
