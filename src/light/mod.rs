use std::sync::Arc;
use std::time::Duration;

use anyhow::Error;
use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::config::LED_MAX_BRIGHTNESS;
use crate::strip::{LedStrip, Rgb};

/// The presence state driving the strip color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Off,
    Busy,
    Away,
    Free,
    Holiday,
}

impl Status {
    pub fn color(self) -> Rgb {
        match self {
            Status::Free => Rgb::new(0, 255, 0),
            Status::Busy => Rgb::new(255, 0, 0),
            Status::Away => Rgb::new(255, 165, 0),
            Status::Holiday => Rgb::new(128, 0, 128),
            Status::Off => Rgb::OFF,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Off => "off",
            Status::Busy => "busy",
            Status::Away => "away",
            Status::Free => "free",
            Status::Holiday => "holiday",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time view of the controller state, as served by `/api/status`.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Snapshot {
    pub status: Status,
    pub blink: bool,
    pub brightness: u8,
}

/// Everything the lock guards. The strip handle lives here too, so a blink
/// phase can never interleave with a request-triggered render.
struct LightState {
    status: Status,
    brightness: u8,
    // Present exactly while a blink loop is running; the loop holds the
    // paired receiver as its cancellation signal.
    blink: Option<watch::Sender<bool>>,
    strip: Box<dyn LedStrip>,
}

/// Owns the status/brightness/blink state and the strip handle behind a
/// single lock. Handlers and the blink task only hold the lock for one
/// state transition or frame push, never across a sleep.
#[derive(Clone)]
pub struct LightController {
    state: Arc<Mutex<LightState>>,
    blink_interval: Duration,
}

impl LightController {
    pub fn new(strip: Box<dyn LedStrip>, blink_interval: Duration) -> Self {
        LightController {
            state: Arc::new(Mutex::new(LightState {
                status: Status::Free,
                brightness: 1,
                blink: None,
                strip,
            })),
            blink_interval,
        }
    }

    /// Push the boot state to the strip so it shows something before the
    /// first request arrives.
    pub async fn initial_render(&self) -> Result<(), Error> {
        let mut state = self.state.lock().await;
        let hw = hardware_brightness(state.brightness);
        state.strip.set_brightness(hw);
        render(&mut state)
    }

    pub async fn set_status(&self, status: Status) -> Result<(), Error> {
        let mut state = self.state.lock().await;
        debug!("status {} -> {}", state.status, status);
        state.status = status;

        if status == Status::Off {
            // Cancel the loop before the strip goes dark, otherwise its next
            // lit phase would overwrite the dark frame.
            if let Some(cancel) = state.blink.take() {
                let _ = cancel.send(true);
            }
        }

        render(&mut state)
    }

    /// Clamp the requested level into [1,10], push the matching hardware
    /// brightness, and refresh the frame so the change is visible on its
    /// own. Returns the applied level.
    pub async fn set_brightness(&self, level: i64) -> Result<u8, Error> {
        let level = level.clamp(1, 10) as u8;

        let mut state = self.state.lock().await;
        debug!("brightness {} -> {}", state.brightness, level);
        state.brightness = level;
        let hw = hardware_brightness(level);
        state.strip.set_brightness(hw);
        render(&mut state)?;

        Ok(level)
    }

    /// Start the blink loop. No-op if one is already running.
    pub async fn start_blink(&self) {
        let mut state = self.state.lock().await;
        if state.blink.is_some() {
            return;
        }

        info!("blink on");
        let (cancel_tx, cancel_rx) = watch::channel(false);
        state.blink = Some(cancel_tx);

        tokio::spawn(blink_loop(
            Arc::clone(&self.state),
            self.blink_interval,
            cancel_rx,
        ));
    }

    /// Stop the blink loop and leave the strip lit to the current status,
    /// never the dark half of the cycle. No-op if idle.
    pub async fn stop_blink(&self) -> Result<(), Error> {
        let mut state = self.state.lock().await;
        if let Some(cancel) = state.blink.take() {
            info!("blink off");
            let _ = cancel.send(true);
            render(&mut state)?;
        }
        Ok(())
    }

    pub async fn snapshot(&self) -> Snapshot {
        let state = self.state.lock().await;
        Snapshot {
            status: state.status,
            blink: state.blink.is_some(),
            brightness: state.brightness,
        }
    }

    /// Idempotent teardown: cancel any blink loop and blank the strip. Runs
    /// on the shutdown endpoint, on SIGINT/SIGTERM, and on normal exit.
    pub async fn shutdown(&self) -> Result<(), Error> {
        let mut state = self.state.lock().await;
        if let Some(cancel) = state.blink.take() {
            let _ = cancel.send(true);
        }
        state.strip.fill(Rgb::OFF);
        state.strip.show()
    }

}

/// Alternates dark and lit frames until cancelled. The cancellation check
/// runs under the lock immediately before every pixel write, so a stop
/// issued during the dark phase is seen before the pending lit phase can
/// execute.
async fn blink_loop(
    state: Arc<Mutex<LightState>>,
    interval: Duration,
    cancel: watch::Receiver<bool>,
) {
    loop {
        {
            let mut state = state.lock().await;
            if *cancel.borrow() {
                break;
            }
            state.strip.fill(Rgb::OFF);
            if let Err(err) = state.strip.show() {
                error!("strip failure in blink loop: {err:#}");
                state.blink = None;
                break;
            }
        }

        sleep(interval).await;

        {
            let mut state = state.lock().await;
            if *cancel.borrow() {
                break;
            }
            // Read the status at render time so changes made mid-blink
            // show up on the next lit phase.
            if let Err(err) = render(&mut state) {
                error!("strip failure in blink loop: {err:#}");
                state.blink = None;
                break;
            }
        }

        sleep(interval).await;
    }
}

fn render(state: &mut LightState) -> Result<(), Error> {
    state.strip.fill(state.status.color());
    state.strip.show()
}

fn hardware_brightness(level: u8) -> u8 {
    (level as u16 * LED_MAX_BRIGHTNESS as u16 / 10) as u8
}
