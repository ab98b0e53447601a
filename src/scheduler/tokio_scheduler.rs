//! Tick schedules backed by tokio timers

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex,
    },
    time::Duration,
};
use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant},
};
use tracing::{debug, warn};

use super::{TickHandle, TickScheduler, TickSink};

/// Spawns one tokio task per schedule. Must be used from within a runtime.
#[derive(Debug, Default)]
pub struct TokioScheduler {
    next_id: AtomicU64,
    tasks: Mutex<HashMap<TickHandle, JoinHandle<()>>>,
}

impl TokioScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TickScheduler for TokioScheduler {
    fn schedule_tick(&self, interval: Duration, initial_delay: Duration, sink: TickSink) -> TickHandle {
        let handle = TickHandle(self.next_id.fetch_add(1, Ordering::Relaxed));
        debug!("Scheduling {} every {:?} after {:?}", handle, interval, initial_delay);

        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + initial_delay, interval);
            loop {
                ticker.tick().await;
                if sink.send(handle).is_err() {
                    debug!("Tick receiver dropped, ending {}", handle);
                    break;
                }
            }
        });

        match self.tasks.lock() {
            Ok(mut tasks) => {
                tasks.insert(handle, task);
            }
            Err(e) => {
                warn!("Failed to lock tick tasks, aborting {}: {}", handle, e);
                task.abort();
            }
        }
        handle
    }

    fn cancel(&self, handle: TickHandle) {
        let task = match self.tasks.lock() {
            Ok(mut tasks) => tasks.remove(&handle),
            Err(e) => {
                warn!("Failed to lock tick tasks while cancelling {}: {}", handle, e);
                None
            }
        };
        if let Some(task) = task {
            task.abort();
            debug!("Cancelled {}", handle);
        }
    }

    fn active_schedules(&self) -> usize {
        self.tasks.lock().map(|tasks| tasks.len()).unwrap_or(0)
    }
}
