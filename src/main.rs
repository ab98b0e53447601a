//! Keypad Timer - a countdown timer driven by keypad presses
//!
//! This is the main entry point for the keypad-timer server.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use keypad_timer::{
    config::Config,
    state::AppState,
    api::create_router,
    scheduler::TokioScheduler,
    tasks::tick_pump_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("keypad_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting keypad-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, tick={}ms",
          config.host, config.port, config.tick_ms);

    let scheduler = Arc::new(TokioScheduler::new());
    let (state, ticks) = AppState::new(
        config.port,
        config.host.clone(),
        config.tick_interval(),
        scheduler,
    );
    let state = Arc::new(state);

    // Ticks are applied one at a time by a single consumer
    tokio::spawn(tick_pump_task(Arc::clone(&state), ticks));

    let app = create_router(state);

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /press/:button - Press 0-9, delete, start, stop or reset");
    info!("  POST /select/:unit  - Select hours, minutes or seconds for entry");
    info!("  GET  /status        - Current timer state");
    info!("  GET  /health        - Health check");

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        signal = shutdown_signal() => {
            match signal {
                Ok(signal) => info!("Shutdown signal {} received", signal),
                Err(e) => tracing::error!("Signal handling failed: {}", e),
            }
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
