use std::sync::Arc;

use anyhow::Error;
use tokio::signal;
use tracing::info;

use busylight::config;
use busylight::light::LightController;
use busylight::power::SystemPower;
use busylight::server::{self, AppState};
use busylight::strip;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "busylight=debug,tower_http=info".into()),
        )
        .init();

    info!("Starting strip...");
    let strip = strip::open()?;
    let light = LightController::new(strip, config::BLINK_INTERVAL);

    // Show the boot state (free, dimmest) before the first request arrives
    light.initial_render().await?;

    let state = AppState {
        light: light.clone(),
        power: Arc::new(SystemPower),
    };
    let app = server::router(state);

    let listener = tokio::net::TcpListener::bind(config::LISTEN_ADDR).await?;
    info!("Listening on http://{}", config::LISTEN_ADDR);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Runs on SIGINT/SIGTERM and on normal return alike
    info!("Shutting down... turning off LEDs");
    light.shutdown().await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
