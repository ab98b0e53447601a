//! Periodic tick scheduling
//!
//! The timer core never touches a clock. Whoever drives it supplies a
//! [`TickScheduler`] that delivers [`TickHandle`]s into a channel at a fixed
//! rate until the schedule is cancelled.

pub mod manual;
pub mod tokio_scheduler;

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

pub use manual::ManualScheduler;
pub use tokio_scheduler::TokioScheduler;

/// Identifies one tick schedule. Every delivered tick carries the handle of
/// the schedule that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TickHandle(pub u64);

impl fmt::Display for TickHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tick#{}", self.0)
    }
}

/// Where scheduled ticks are delivered
pub type TickSink = mpsc::UnboundedSender<TickHandle>;

/// Receiving end of a [`TickSink`]
pub type TickReceiver = mpsc::UnboundedReceiver<TickHandle>;

/// Capability to run a repeating tick
pub trait TickScheduler: Send + Sync {
    /// Deliver the returned handle into `sink` after `initial_delay`, then
    /// every `interval`, until cancelled.
    fn schedule_tick(&self, interval: Duration, initial_delay: Duration, sink: TickSink) -> TickHandle;

    /// Stop a schedule. Unknown or already cancelled handles are ignored.
    fn cancel(&self, handle: TickHandle);

    /// Number of schedules currently active
    fn active_schedules(&self) -> usize;
}
