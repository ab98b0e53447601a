//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod tick_pump;

// Re-export main functions
pub use tick_pump::tick_pump_task;
