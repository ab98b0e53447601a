//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use crate::{
    state::AppState,
    timer::{Button, ScheduleAction, TimeUnit},
};
use super::responses::{ApiResponse, ErrorResponse, HealthResponse, StatusResponse};

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn internal_error(message: String) -> HandlerError {
    error!("{}", message);
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::new(message)))
}

fn bad_request(message: String) -> HandlerError {
    warn!("Rejected request: {}", message);
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message)))
}

/// Handle POST /press/:button - Press a keypad button
pub async fn press_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse>, HandlerError> {
    let button: Button = name.parse().map_err(bad_request)?;

    let (outcome, snapshot) = state.press(button).map_err(internal_error)?;

    if outcome.ignored {
        info!("Press endpoint called - {} is disabled right now", button);
        return Ok(Json(ApiResponse::ignored(
            format!("{} is not available", button),
            snapshot,
        )));
    }

    info!("Press endpoint called - {} applied", button);
    Ok(Json(ApiResponse::applied(
        format!("{} pressed", button),
        outcome.schedule_action,
        snapshot,
    )))
}

/// Handle POST /select/:unit - Open a field for digit entry
pub async fn select_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse>, HandlerError> {
    let unit = TimeUnit::from_name(&name)
        .ok_or_else(|| bad_request(format!("Unknown field: {}", name)))?;

    let (applied, snapshot) = state.select(unit).map_err(internal_error)?;

    if applied {
        Ok(Json(ApiResponse::applied(
            format!("{} selected", unit.suffix()),
            ScheduleAction::None,
            snapshot,
        )))
    } else {
        Ok(Json(ApiResponse::ignored(
            "Fields cannot be edited while the countdown runs".to_string(),
            snapshot,
        )))
    }
}

/// Handle GET /status - Return current timer status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, HandlerError> {
    let timer = state.get_snapshot().map_err(internal_error)?;
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
