//! Duration fields, field selection and the countdown decrement

use serde::{Deserialize, Serialize};

use super::{Button, DigitEntry, Time, TimeUnit};

/// Authoritative timer state rendered by the UI
///
/// While entry is open `time` is the duration being typed. While the
/// countdown runs it is the time remaining.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationState {
    #[serde(flatten)]
    pub time: Time,
    /// Field open for digit entry, `None` when entry is closed
    pub selected: Option<TimeUnit>,
    /// Set by the orchestrator while a tick schedule is active
    pub is_running: bool,
    /// Total seconds captured when Start was pressed, 0 otherwise
    pub last_armed_total_seconds: u64,
}

impl DurationState {
    pub fn hours(&self) -> u8 {
        self.time.hours
    }

    pub fn minutes(&self) -> u8 {
        self.time.minutes
    }

    pub fn seconds(&self) -> u8 {
        self.time.seconds
    }

    pub fn total_seconds(&self) -> u64 {
        self.time.total_seconds()
    }

    /// Running with nothing left on the clock
    pub fn time_up(&self) -> bool {
        self.is_running && self.total_seconds() == 0
    }

    /// Start is only allowed with a non-zero duration and no countdown in progress
    pub fn action_allowed(&self) -> bool {
        self.total_seconds() != 0 && !self.is_running
    }

    /// Fraction of the armed duration already elapsed, in `[0, 1]`
    pub fn progress(&self) -> f64 {
        if !self.is_running || self.last_armed_total_seconds == 0 {
            return 0.0;
        }
        let remaining = self.total_seconds() as f64 / self.last_armed_total_seconds as f64;
        (1.0 - remaining).clamp(0.0, 1.0)
    }

    /// Apply `button` given the digit buffer as it was before this press.
    ///
    /// `previous` is the duration captured at the last Start and is what Stop
    /// restores.
    pub fn next(self, digit_entry: DigitEntry, previous: Time, button: Button) -> DurationState {
        match button {
            Button::Digit(value) => {
                let Some(unit) = self.selected else {
                    return self;
                };
                match digit_entry {
                    DigitEntry::Idle => Self {
                        time: self.time.with(unit, value.min(unit.max_value())),
                        ..self
                    },
                    DigitEntry::OneNumber(first) => {
                        let combined = (u16::from(first) * 10 + u16::from(value))
                            .min(u16::from(unit.max_value()));
                        Self {
                            time: self.time.with(unit, combined as u8),
                            selected: Some(unit.next()),
                            ..self
                        }
                    }
                }
            }
            Button::Delete => match self.selected {
                Some(unit) => Self { time: self.time.with(unit, 0), ..self },
                None => self,
            },
            Button::Start => Self {
                last_armed_total_seconds: self.total_seconds(),
                selected: None,
                ..self
            },
            Button::Stop => Self {
                time: previous,
                last_armed_total_seconds: 0,
                ..self
            },
            Button::Reset => DurationState::default(),
        }
    }

    /// Remove one second from the remaining time
    pub fn subtract_one_second(self) -> DurationState {
        Self { time: self.time.saturating_decrement(), ..self }
    }

    /// Open a field for entry
    pub fn select(self, unit: TimeUnit) -> DurationState {
        Self { selected: Some(unit), ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selected(unit: TimeUnit) -> DurationState {
        DurationState::default().select(unit)
    }

    #[test]
    fn test_first_digit_sets_field() {
        let state = selected(TimeUnit::Hours).next(DigitEntry::Idle, Time::default(), Button::Digit(7));
        assert_eq!(state.hours(), 7);
        assert_eq!(state.selected, Some(TimeUnit::Hours));
    }

    #[test]
    fn test_second_digit_combines_and_advances() {
        let state = selected(TimeUnit::Hours)
            .next(DigitEntry::OneNumber(7), Time::default(), Button::Digit(3));
        assert_eq!(state.hours(), 73);
        assert_eq!(state.selected, Some(TimeUnit::Minutes));

        let state = selected(TimeUnit::Minutes)
            .next(DigitEntry::OneNumber(4), Time::default(), Button::Digit(5));
        assert_eq!(state.minutes(), 45);
        assert_eq!(state.selected, Some(TimeUnit::Seconds));
    }

    #[test]
    fn test_clamps_pairs() {
        let state = selected(TimeUnit::Seconds)
            .next(DigitEntry::OneNumber(9), Time::default(), Button::Digit(9));
        assert_eq!(state.seconds(), 59);
        assert_eq!(state.selected, Some(TimeUnit::Seconds));

        let state = selected(TimeUnit::Minutes)
            .next(DigitEntry::OneNumber(7), Time::default(), Button::Digit(0));
        assert_eq!(state.minutes(), 59);

        let state = selected(TimeUnit::Hours)
            .next(DigitEntry::OneNumber(9), Time::default(), Button::Digit(9));
        assert_eq!(state.hours(), 99);
    }

    #[test]
    fn test_oversized_digit_is_clamped() {
        let state = selected(TimeUnit::Minutes).next(DigitEntry::Idle, Time::default(), Button::Digit(200));
        assert_eq!(state.minutes(), 59);

        let state = selected(TimeUnit::Hours).next(DigitEntry::Idle, Time::default(), Button::Digit(250));
        assert_eq!(state.hours(), 99);

        let state = selected(TimeUnit::Seconds)
            .next(DigitEntry::OneNumber(200), Time::default(), Button::Digit(200));
        assert_eq!(state.seconds(), 59);
    }

    #[test]
    fn test_digit_without_selection_is_noop() {
        let state = DurationState { time: Time::new(1, 2, 3), ..Default::default() };
        assert_eq!(state.next(DigitEntry::Idle, Time::default(), Button::Digit(5)), state);
    }

    #[test]
    fn test_delete_clears_selected_field() {
        let state = DurationState {
            time: Time::new(1, 2, 3),
            selected: Some(TimeUnit::Minutes),
            ..Default::default()
        };
        let state = state.next(DigitEntry::Idle, Time::default(), Button::Delete);
        assert_eq!(state.time, Time::new(1, 0, 3));
    }

    #[test]
    fn test_delete_without_selection_is_noop() {
        let state = DurationState { time: Time::new(1, 2, 3), ..Default::default() };
        assert_eq!(state.next(DigitEntry::Idle, Time::default(), Button::Delete), state);
    }

    #[test]
    fn test_start_arms_and_closes_entry() {
        let state = DurationState {
            time: Time::new(0, 1, 30),
            selected: Some(TimeUnit::Seconds),
            ..Default::default()
        };
        let state = state.next(DigitEntry::Idle, Time::default(), Button::Start);
        assert_eq!(state.last_armed_total_seconds, 90);
        assert_eq!(state.selected, None);
        assert_eq!(state.time, Time::new(0, 1, 30));
    }

    #[test]
    fn test_stop_restores_previous() {
        let state = DurationState {
            time: Time::new(0, 0, 12),
            is_running: true,
            last_armed_total_seconds: 90,
            ..Default::default()
        };
        let state = state.next(DigitEntry::Idle, Time::new(0, 1, 30), Button::Stop);
        assert_eq!(state.time, Time::new(0, 1, 30));
        assert_eq!(state.last_armed_total_seconds, 0);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let state = DurationState {
            time: Time::new(3, 4, 5),
            selected: Some(TimeUnit::Hours),
            is_running: true,
            last_armed_total_seconds: 42,
        };
        let once = state.next(DigitEntry::OneNumber(1), Time::new(1, 1, 1), Button::Reset);
        let twice = once.next(DigitEntry::Idle, Time::new(1, 1, 1), Button::Reset);
        assert_eq!(once, DurationState::default());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_progress() {
        let mut state = DurationState {
            time: Time::new(0, 0, 30),
            is_running: true,
            last_armed_total_seconds: 120,
            ..Default::default()
        };
        assert!((state.progress() - 0.75).abs() < f64::EPSILON);

        state.is_running = false;
        assert_eq!(state.progress(), 0.0);
    }

    #[test]
    fn test_action_allowed() {
        assert!(!DurationState::default().action_allowed());
        let state = DurationState { time: Time::new(0, 0, 1), ..Default::default() };
        assert!(state.action_allowed());
        assert!(!DurationState { is_running: true, ..state }.action_allowed());
    }
}
