//! Tick schedules driven by a simulated clock

use std::{collections::HashMap, sync::Mutex, time::Duration};
use tracing::{debug, warn};

use super::{TickHandle, TickScheduler, TickSink};

#[derive(Debug)]
struct Schedule {
    next_due: Duration,
    interval: Duration,
    sink: TickSink,
}

#[derive(Debug, Default)]
struct Clock {
    now: Duration,
    next_id: u64,
    schedules: HashMap<TickHandle, Schedule>,
}

/// Scheduler whose time only moves when [`ManualScheduler::advance`] is called
#[derive(Debug, Default)]
pub struct ManualScheduler {
    clock: Mutex<Clock>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulated time elapsed since creation
    pub fn now(&self) -> Duration {
        self.clock.lock().map(|clock| clock.now).unwrap_or_default()
    }

    pub fn is_active(&self, handle: TickHandle) -> bool {
        self.clock
            .lock()
            .map(|clock| clock.schedules.contains_key(&handle))
            .unwrap_or(false)
    }

    /// Move the clock forward, delivering every tick that falls due in order.
    /// Returns the number of ticks delivered.
    pub fn advance(&self, by: Duration) -> usize {
        let mut clock = match self.clock.lock() {
            Ok(clock) => clock,
            Err(e) => {
                warn!("Failed to lock simulated clock: {}", e);
                return 0;
            }
        };

        let target = clock.now + by;
        let mut delivered = 0;
        loop {
            let due = clock
                .schedules
                .iter()
                .filter(|(_, schedule)| schedule.next_due <= target)
                .min_by_key(|(handle, schedule)| (schedule.next_due, handle.0))
                .map(|(handle, _)| *handle);
            let Some(handle) = due else { break };

            let Some(schedule) = clock.schedules.get_mut(&handle) else { break };
            let at = schedule.next_due;
            schedule.next_due += schedule.interval;
            let sent = schedule.sink.send(handle).is_ok();

            clock.now = at;
            if sent {
                delivered += 1;
            } else {
                debug!("Tick receiver dropped, removing {}", handle);
                clock.schedules.remove(&handle);
            }
        }
        clock.now = target;
        delivered
    }
}

impl TickScheduler for ManualScheduler {
    fn schedule_tick(&self, interval: Duration, initial_delay: Duration, sink: TickSink) -> TickHandle {
        let mut clock = match self.clock.lock() {
            Ok(clock) => clock,
            Err(poisoned) => poisoned.into_inner(),
        };
        let handle = TickHandle(clock.next_id);
        clock.next_id += 1;
        let next_due = clock.now + initial_delay;
        let interval = interval.max(Duration::from_nanos(1));
        clock.schedules.insert(handle, Schedule { next_due, interval, sink });
        debug!("Scheduled {} at {:?}", handle, next_due);
        handle
    }

    fn cancel(&self, handle: TickHandle) {
        if let Ok(mut clock) = self.clock.lock() {
            if clock.schedules.remove(&handle).is_some() {
                debug!("Cancelled {}", handle);
            }
        }
    }

    fn active_schedules(&self) -> usize {
        self.clock.lock().map(|clock| clock.schedules.len()).unwrap_or(0)
    }
}
