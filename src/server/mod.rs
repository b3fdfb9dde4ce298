use std::sync::Arc;

use anyhow::Error;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::light::{LightController, Snapshot, Status};
use crate::power::PowerControl;

#[derive(Clone)]
pub struct AppState {
    pub light: LightController,
    pub power: Arc<dyn PowerControl>,
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/off", get(set_off))
        .route("/busy", get(set_busy))
        .route("/free", get(set_free))
        .route("/away", get(set_away))
        .route("/holiday", get(set_holiday))
        .route("/status", get(status))
        .route("/brightness/:level", get(brightness))
        .route("/blink/on", get(blink_on))
        .route("/blink/off", get(blink_off))
        .route("/shutdown", get(shutdown));

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Shared body of the status routes: set, render, echo the new status.
async fn apply_status(state: &AppState, status: Status) -> Result<&'static str, StatusCode> {
    state.light.set_status(status).await.map_err(driver_error)?;
    Ok(status.as_str())
}

async fn set_off(State(state): State<AppState>) -> Result<&'static str, StatusCode> {
    apply_status(&state, Status::Off).await
}

async fn set_busy(State(state): State<AppState>) -> Result<&'static str, StatusCode> {
    apply_status(&state, Status::Busy).await
}

async fn set_free(State(state): State<AppState>) -> Result<&'static str, StatusCode> {
    apply_status(&state, Status::Free).await
}

async fn set_away(State(state): State<AppState>) -> Result<&'static str, StatusCode> {
    apply_status(&state, Status::Away).await
}

async fn set_holiday(State(state): State<AppState>) -> Result<&'static str, StatusCode> {
    apply_status(&state, Status::Holiday).await
}

async fn status(State(state): State<AppState>) -> Json<Snapshot> {
    Json(state.light.snapshot().await)
}

async fn brightness(
    State(state): State<AppState>,
    Path(level): Path<i64>,
) -> Result<String, StatusCode> {
    let applied = state
        .light
        .set_brightness(level)
        .await
        .map_err(driver_error)?;
    Ok(format!("brightness {applied}"))
}

async fn blink_on(State(state): State<AppState>) -> &'static str {
    state.light.start_blink().await;
    "blink on"
}

async fn blink_off(State(state): State<AppState>) -> Result<&'static str, StatusCode> {
    state.light.stop_blink().await.map_err(driver_error)?;
    Ok("blink off")
}

/// Stop blinking, blank the strip, then hand off to the OS power command.
/// The response goes out before the command runs.
async fn shutdown(State(state): State<AppState>) -> Result<&'static str, StatusCode> {
    info!("shutdown requested over the API");
    state.light.shutdown().await.map_err(driver_error)?;
    state.power.power_off();
    Ok("Shutting down...")
}

fn driver_error(err: Error) -> StatusCode {
    error!("strip driver failure: {err:#}");
    StatusCode::INTERNAL_SERVER_ERROR
}
