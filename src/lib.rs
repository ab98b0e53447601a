//! Keypad Timer - a countdown timer driven by keypad presses
//!
//! The [`timer`] module is a pure state machine: digits entered in pairs set
//! hours, minutes and seconds, Start arms a per-second countdown and Stop
//! restores the duration that was armed. Around it sit a pluggable tick
//! [`scheduler`], the shared [`state`] that serialises presses and ticks, and
//! an HTTP [`api`] that plays the part of the touch UI.

pub mod config;
pub mod timer;
pub mod scheduler;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::AppState;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
