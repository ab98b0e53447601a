//! Two-digit entry buffer

use serde::{Deserialize, Serialize};

use super::{Button, TimeUnit};

/// Remembers the first digit of a pair until the second one arrives
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "first", rename_all = "snake_case")]
pub enum DigitEntry {
    #[default]
    Idle,
    OneNumber(u8),
}

impl DigitEntry {
    /// Next buffer state after `button`. Entry is disabled when no field is selected.
    pub fn next(self, selected: Option<TimeUnit>, button: Button) -> DigitEntry {
        if selected.is_none() {
            return DigitEntry::Idle;
        }

        match (self, button) {
            (DigitEntry::Idle, Button::Digit(value)) => DigitEntry::OneNumber(value),
            (DigitEntry::OneNumber(_), Button::Digit(_)) => DigitEntry::Idle,
            _ => DigitEntry::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs_digits() {
        let entry = DigitEntry::Idle.next(Some(TimeUnit::Hours), Button::Digit(7));
        assert_eq!(entry, DigitEntry::OneNumber(7));
        let entry = entry.next(Some(TimeUnit::Hours), Button::Digit(3));
        assert_eq!(entry, DigitEntry::Idle);
    }

    #[test]
    fn test_disabled_without_selection() {
        assert_eq!(DigitEntry::Idle.next(None, Button::Digit(1)), DigitEntry::Idle);
        assert_eq!(DigitEntry::OneNumber(4).next(None, Button::Digit(1)), DigitEntry::Idle);
    }

    #[test]
    fn test_other_buttons_clear_buffer() {
        for button in [Button::Delete, Button::Start, Button::Stop, Button::Reset] {
            assert_eq!(
                DigitEntry::OneNumber(5).next(Some(TimeUnit::Minutes), button),
                DigitEntry::Idle
            );
        }
    }
}
