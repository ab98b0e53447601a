//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::{
    scheduler::{TickHandle, TickReceiver, TickScheduler, TickSink},
    timer::{Button, Core, Event, Outcome, ScheduleAction, TimeUnit},
};
use super::TimerSnapshot;

/// The core together with the tick schedule it is currently driving
#[derive(Debug, Default)]
struct Session {
    core: Core,
    active_tick: Option<TickHandle>,
}

/// Owns the timer and is the single consumer of button presses and ticks
pub struct AppState {
    session: Mutex<Session>,
    scheduler: Arc<dyn TickScheduler>,
    tick_tx: TickSink,
    /// Tick period, also used as the delay before the first tick
    pub tick_interval: Duration,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Channel for timer updates
    pub snapshot_tx: watch::Sender<TimerSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    pub _snapshot_rx: watch::Receiver<TimerSnapshot>,
}

impl AppState {
    /// Create a new AppState. The returned receiver must be drained into
    /// [`AppState::tick`], normally by the tick pump task.
    pub fn new(
        port: u16,
        host: String,
        tick_interval: Duration,
        scheduler: Arc<dyn TickScheduler>,
    ) -> (Self, TickReceiver) {
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(TimerSnapshot::default());

        let state = Self {
            session: Mutex::new(Session::default()),
            scheduler,
            tick_tx,
            tick_interval,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            snapshot_tx,
            _snapshot_rx: snapshot_rx,
        };
        (state, tick_rx)
    }

    /// Press a keypad button
    pub fn press(&self, button: Button) -> Result<(Outcome, TimerSnapshot), String> {
        let mut session = self.session.lock()
            .map_err(|e| format!("Failed to lock timer session: {}", e))?;

        let outcome = session.core.handle(Event::Press(button));
        self.apply_schedule_action(&mut session, outcome.schedule_action);
        let snapshot = TimerSnapshot::from_core(&session.core);
        drop(session); // Release the lock early

        let label = button.label().to_lowercase();
        if outcome.ignored {
            info!("Button {} is disabled, timer stays at {}", button, snapshot.display);
            self.record_action(&format!("ignored press {}", label));
            return Ok((outcome, snapshot));
        }

        info!("Button {} pressed, timer at {}", button, snapshot.display);
        self.record_action(&format!("press {}", label));
        self.publish(snapshot.clone());

        Ok((outcome, snapshot))
    }

    /// Select a field for digit entry. Returns whether the selection was applied.
    pub fn select(&self, unit: TimeUnit) -> Result<(bool, TimerSnapshot), String> {
        let mut session = self.session.lock()
            .map_err(|e| format!("Failed to lock timer session: {}", e))?;

        let applied = session.core.select_field(unit);
        let snapshot = TimerSnapshot::from_core(&session.core);
        drop(session);

        if applied {
            info!("Selected {:?} for entry", unit);
            self.record_action(&format!("select {}", unit.suffix()));
            self.publish(snapshot.clone());
        } else {
            debug!("Selection of {:?} ignored while running", unit);
        }

        Ok((applied, snapshot))
    }

    /// Deliver a tick produced by the scheduler.
    ///
    /// Ticks from any schedule other than the active one are discarded, so a
    /// tick still in flight when its schedule is cancelled never reaches the core.
    pub fn tick(&self, handle: TickHandle) -> Result<Option<Outcome>, String> {
        let mut session = self.session.lock()
            .map_err(|e| format!("Failed to lock timer session: {}", e))?;

        if session.active_tick != Some(handle) {
            debug!("Discarding stale {}", handle);
            return Ok(None);
        }

        let outcome = session.core.handle(Event::Tick);
        self.apply_schedule_action(&mut session, outcome.schedule_action);
        let snapshot = TimerSnapshot::from_core(&session.core);
        drop(session);

        debug!("{} -> {}", handle, snapshot.display);
        if outcome.time_up {
            info!("Time's up");
            self.record_action("time up");
        }
        if outcome.schedule_action == ScheduleAction::Stop {
            info!("Countdown finished, restored {}", snapshot.display);
            self.record_action("auto stop");
        }
        self.publish(snapshot);

        Ok(Some(outcome))
    }

    /// Start or cancel the tick schedule as the core asks. Runs under the session
    /// lock so a cancelled schedule can never deliver another tick.
    fn apply_schedule_action(&self, session: &mut Session, action: ScheduleAction) {
        match action {
            ScheduleAction::None => {}
            ScheduleAction::Start => {
                if let Some(stale) = session.active_tick.take() {
                    warn!("Replacing tick schedule {} that was still active", stale);
                    self.scheduler.cancel(stale);
                }
                let handle = self.scheduler.schedule_tick(
                    self.tick_interval,
                    self.tick_interval,
                    self.tick_tx.clone(),
                );
                info!("Countdown started ({})", handle);
                session.active_tick = Some(handle);
            }
            ScheduleAction::Stop => {
                if let Some(handle) = session.active_tick.take() {
                    self.scheduler.cancel(handle);
                    info!("Countdown stopped ({})", handle);
                }
            }
        }
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    fn publish(&self, snapshot: TimerSnapshot) {
        if let Err(e) = self.snapshot_tx.send(snapshot) {
            warn!("Failed to send timer update: {}", e);
        }
    }

    /// Get current timer snapshot
    pub fn get_snapshot(&self) -> Result<TimerSnapshot, String> {
        self.session.lock()
            .map(|session| TimerSnapshot::from_core(&session.core))
            .map_err(|e| format!("Failed to lock timer session: {}", e))
    }

    /// Handle of the tick schedule currently driving the countdown
    pub fn active_tick(&self) -> Option<TickHandle> {
        self.session.lock().ok().and_then(|session| session.active_tick)
    }

    /// Watch every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ManualScheduler;

    const SECOND: Duration = Duration::from_secs(1);

    fn setup() -> (AppState, Arc<ManualScheduler>, TickReceiver) {
        let scheduler = Arc::new(ManualScheduler::new());
        let (state, rx) = AppState::new(0, "127.0.0.1".to_string(), SECOND, scheduler.clone());
        (state, scheduler, rx)
    }

    fn enter(state: &AppState, unit: TimeUnit, digits: &[u8]) {
        state.select(unit).unwrap();
        for digit in digits {
            state.press(Button::Digit(*digit)).unwrap();
        }
    }

    #[test]
    fn test_start_schedules_one_tick() {
        let (state, scheduler, _rx) = setup();
        enter(&state, TimeUnit::Seconds, &[0, 5]);

        let (outcome, snapshot) = state.press(Button::Start).unwrap();
        assert_eq!(outcome.schedule_action, ScheduleAction::Start);
        assert!(snapshot.is_running);
        assert_eq!(scheduler.active_schedules(), 1);
        assert!(state.active_tick().is_some());

        // Disabled while running, so no second schedule
        state.press(Button::Start).unwrap();
        assert_eq!(scheduler.active_schedules(), 1);
    }

    #[test]
    fn test_stop_cancels_schedule() {
        let (state, scheduler, _rx) = setup();
        enter(&state, TimeUnit::Minutes, &[0, 1]);
        state.press(Button::Start).unwrap();

        let (outcome, snapshot) = state.press(Button::Stop).unwrap();
        assert_eq!(outcome.schedule_action, ScheduleAction::Stop);
        assert_eq!(scheduler.active_schedules(), 0);
        assert_eq!(state.active_tick(), None);
        assert_eq!(snapshot.display, "00:01:00");
    }

    #[test]
    fn test_ticks_count_down() {
        let (state, scheduler, mut rx) = setup();
        enter(&state, TimeUnit::Minutes, &[0, 1]);
        state.press(Button::Start).unwrap();

        assert_eq!(scheduler.advance(SECOND), 1);
        let handle = rx.try_recv().unwrap();
        state.tick(handle).unwrap();

        assert_eq!(state.get_snapshot().unwrap().display, "00:00:59");
    }

    #[test]
    fn test_stale_tick_is_discarded() {
        let (state, scheduler, mut rx) = setup();
        enter(&state, TimeUnit::Seconds, &[3, 0]);
        state.press(Button::Start).unwrap();

        scheduler.advance(SECOND);
        let handle = rx.try_recv().unwrap();
        state.press(Button::Stop).unwrap();

        assert_eq!(state.tick(handle).unwrap(), None);
        let snapshot = state.get_snapshot().unwrap();
        assert_eq!(snapshot.display, "00:00:30");
        assert!(!snapshot.is_running);
    }

    #[test]
    fn test_reset_cancels_and_clears() {
        let (state, scheduler, _rx) = setup();
        enter(&state, TimeUnit::Hours, &[0, 2]);
        state.press(Button::Start).unwrap();

        let (_, snapshot) = state.press(Button::Reset).unwrap();
        assert_eq!(scheduler.active_schedules(), 0);
        assert_eq!(snapshot, TimerSnapshot::default());
    }

    #[test]
    fn test_select_ignored_while_running() {
        let (state, _scheduler, _rx) = setup();
        enter(&state, TimeUnit::Seconds, &[0, 9]);
        state.press(Button::Start).unwrap();

        let (applied, snapshot) = state.select(TimeUnit::Hours).unwrap();
        assert!(!applied);
        assert_eq!(snapshot.selected, None);
    }

    #[test]
    fn test_updates_are_published() {
        let (state, _scheduler, _rx) = setup();
        let mut updates = state.subscribe();

        enter(&state, TimeUnit::Hours, &[1]);
        assert!(updates.has_changed().unwrap());
        assert_eq!(updates.borrow_and_update().hours, 1);

        let (action, time) = state.get_last_action();
        assert_eq!(action.as_deref(), Some("press 1"));
        assert!(time.is_some());
    }

    #[test]
    fn test_ignored_press_is_recorded_as_ignored() {
        let (state, scheduler, _rx) = setup();
        let mut updates = state.subscribe();

        let (outcome, snapshot) = state.press(Button::Start).unwrap();
        assert!(outcome.ignored);
        assert!(!snapshot.is_running);
        assert_eq!(scheduler.active_schedules(), 0);
        assert!(!updates.has_changed().unwrap());

        let (action, _) = state.get_last_action();
        assert_eq!(action.as_deref(), Some("ignored press start"));
    }

    #[test]
    fn test_previous_duration_survives_countdown() {
        let (state, scheduler, mut rx) = setup();
        enter(&state, TimeUnit::Minutes, &[0, 1, 0, 5]);
        state.press(Button::Start).unwrap();

        scheduler.advance(SECOND * 3);
        while let Ok(handle) = rx.try_recv() {
            state.tick(handle).unwrap();
        }
        assert_eq!(state.get_snapshot().unwrap().total_seconds, 62);

        let (_, snapshot) = state.press(Button::Stop).unwrap();
        assert_eq!(
            (snapshot.hours, snapshot.minutes, snapshot.seconds),
            (0, 1, 5)
        );
    }
}
