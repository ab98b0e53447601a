//! Keypad buttons

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Every button the keypad can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    /// A single digit, always in 0..=9
    Digit(u8),
    /// Clears the selected field
    Delete,
    /// Arms the countdown if the total time is non-zero
    Start,
    /// Stops the countdown and restores the duration set before Start
    Stop,
    /// Stops everything and returns to the zero state
    Reset,
}

impl Button {
    /// Digit button, or `None` if `value` is not a single decimal digit
    pub fn digit(value: u8) -> Option<Self> {
        (value <= 9).then_some(Button::Digit(value))
    }

    /// Text printed on the key
    pub fn label(&self) -> String {
        match self {
            Button::Digit(value) => value.to_string(),
            Button::Delete => "Delete".to_string(),
            Button::Start => "Start".to_string(),
            Button::Stop => "Stop".to_string(),
            Button::Reset => "Reset".to_string(),
        }
    }

    pub fn is_digit(&self) -> bool {
        matches!(self, Button::Digit(_))
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for Button {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(value) = s.parse::<u8>() {
            return Button::digit(value).ok_or_else(|| format!("Not a single digit: {}", s));
        }
        match s.to_ascii_lowercase().as_str() {
            "delete" | "del" => Ok(Button::Delete),
            "start" => Ok(Button::Start),
            "stop" => Ok(Button::Stop),
            "reset" => Ok(Button::Reset),
            _ => Err(format!("Unknown button: {}", s)),
        }
    }
}
