//! State management module
//!
//! This module owns the running timer and the snapshots published to observers.

pub mod app_state;
pub mod timer_snapshot;

// Re-export main types
pub use app_state::AppState;
pub use timer_snapshot::TimerSnapshot;
