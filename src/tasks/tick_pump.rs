//! Tick delivery background task

use std::sync::Arc;
use tracing::{error, info};

use crate::{scheduler::TickReceiver, state::AppState};

/// Background task that feeds scheduled ticks into the timer one at a time
pub async fn tick_pump_task(state: Arc<AppState>, mut ticks: TickReceiver) {
    info!("Starting tick pump task");

    while let Some(handle) = ticks.recv().await {
        if let Err(e) = state.tick(handle) {
            error!("Failed to apply {}: {}", handle, e);
        }
    }

    info!("Tick channel closed, tick pump stopping");
}
