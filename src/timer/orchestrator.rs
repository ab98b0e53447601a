//! Orchestrator combining digit entry, duration state and the Start snapshot

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{Button, DigitEntry, DurationState, Time, TimeUnit};

/// Input delivered to the core by its collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Press(Button),
    Tick,
}

/// What the collaborator must do with the periodic tick after an event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleAction {
    #[default]
    None,
    Start,
    Stop,
}

/// Result of handling one event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub state: DurationState,
    pub schedule_action: ScheduleAction,
    /// Set only on the tick that took the remaining time from 1 to 0
    pub time_up: bool,
    /// The event was disabled in the current state and changed nothing
    pub ignored: bool,
}

impl Outcome {
    fn unchanged(state: DurationState) -> Self {
        Self { state, schedule_action: ScheduleAction::None, time_up: false, ignored: true }
    }
}

/// The countdown timer state machine
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Core {
    state: DurationState,
    digit_entry: DigitEntry,
    previous: Time,
}

impl Core {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DurationState {
        self.state
    }

    pub fn digit_entry(&self) -> DigitEntry {
        self.digit_entry
    }

    /// Duration captured at the last Start
    pub fn previous_duration(&self) -> Time {
        self.previous
    }

    pub fn total_seconds(&self) -> u64 {
        self.state.total_seconds()
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    pub fn selected_field(&self) -> Option<TimeUnit> {
        self.state.selected
    }

    pub fn time_up(&self) -> bool {
        self.state.time_up()
    }

    pub fn action_allowed(&self) -> bool {
        self.state.action_allowed()
    }

    pub fn handle(&mut self, event: Event) -> Outcome {
        match event {
            Event::Press(button) => self.press(button),
            Event::Tick => self.tick(),
        }
    }

    /// Open `unit` for digit entry. Ignored while the countdown runs.
    pub fn select_field(&mut self, unit: TimeUnit) -> bool {
        if self.state.is_running {
            debug!("Ignoring selection of {:?} while running", unit);
            return false;
        }
        self.state = self.state.select(unit);
        self.digit_entry = DigitEntry::Idle;
        true
    }

    fn press(&mut self, button: Button) -> Outcome {
        let enabled = match button {
            Button::Start => self.state.action_allowed(),
            Button::Stop => self.state.is_running,
            _ => true,
        };
        if !enabled {
            debug!("{} pressed while disabled, ignoring", button);
            return Outcome::unchanged(self.state);
        }

        if button == Button::Start {
            self.previous = self.state.time;
        }

        // Both machines read the pre-press values: the duration machine needs
        // the buffered first digit, and the buffer is gated on the selection
        // that was open when the key was pressed.
        let before = self.state;
        let mut next = before.next(self.digit_entry, self.previous, button);
        self.digit_entry = self.digit_entry.next(before.selected, button);

        let schedule_action = match button {
            Button::Start => {
                next.is_running = true;
                ScheduleAction::Start
            }
            Button::Stop | Button::Reset => {
                next.is_running = false;
                ScheduleAction::Stop
            }
            _ => ScheduleAction::None,
        };
        self.state = next;

        trace!("{} -> {:?}, entry {:?}", button, self.state, self.digit_entry);
        Outcome { state: self.state, schedule_action, time_up: false, ignored: false }
    }

    fn tick(&mut self) -> Outcome {
        if !self.state.is_running {
            trace!("Tick while stopped, ignoring");
            return Outcome::unchanged(self.state);
        }

        if self.state.total_seconds() > 0 {
            self.state = self.state.subtract_one_second();
            let time_up = self.state.total_seconds() == 0;
            if time_up {
                debug!("Countdown reached zero");
            }
            return Outcome {
                state: self.state,
                schedule_action: ScheduleAction::None,
                time_up,
                ignored: false,
            };
        }

        debug!("Time's up, restoring {}", self.previous);
        let mut next = self.state.next(self.digit_entry, self.previous, Button::Stop);
        next.is_running = false;
        self.state = next;
        self.digit_entry = DigitEntry::Idle;
        Outcome { state: self.state, schedule_action: ScheduleAction::Stop, time_up: false, ignored: false }
    }
}
