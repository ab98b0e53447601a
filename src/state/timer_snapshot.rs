//! Render-ready view of the timer

use serde::{Deserialize, Serialize};

use crate::timer::{Core, DigitEntry, TimeUnit};

/// Everything a UI needs to draw the timer, taken from a [`Core`] at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
    /// `HH:MM:SS`
    pub display: String,
    pub selected: Option<TimeUnit>,
    pub digit_entry: DigitEntry,
    pub is_running: bool,
    pub time_up: bool,
    pub action_allowed: bool,
    pub total_seconds: u64,
    pub last_armed_total_seconds: u64,
    /// Elapsed share of the armed duration, 0 when stopped
    pub progress: f64,
}

impl TimerSnapshot {
    pub fn from_core(core: &Core) -> Self {
        let state = core.state();
        Self {
            hours: state.hours(),
            minutes: state.minutes(),
            seconds: state.seconds(),
            display: state.time.to_string(),
            selected: state.selected,
            digit_entry: core.digit_entry(),
            is_running: state.is_running,
            time_up: state.time_up(),
            action_allowed: state.action_allowed(),
            total_seconds: state.total_seconds(),
            last_armed_total_seconds: state.last_armed_total_seconds,
            progress: state.progress(),
        }
    }
}

impl Default for TimerSnapshot {
    fn default() -> Self {
        Self::from_core(&Core::new())
    }
}
