//! Countdown timer core
//!
//! Pure, synchronous state machines: a keypad digit buffer, the duration
//! fields with their transitions, and the orchestrator that combines them
//! and tells its caller when to start or stop the periodic tick.

pub mod button;
pub mod orchestrator;
pub mod digit_entry;
pub mod duration_state;
pub mod time;

pub use button::Button;
pub use orchestrator::{Core, Event, Outcome, ScheduleAction};
pub use digit_entry::DigitEntry;
pub use duration_state::DurationState;
pub use time::{Time, TimeUnit};
