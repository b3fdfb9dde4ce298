use tokio::process::Command;
use tracing::warn;

/// Seam for the OS power-off side effect, injected so handlers can run
/// under test without taking the machine down.
pub trait PowerControl: Send + Sync {
    /// Ask the operating system to power the machine off.
    fn power_off(&self);
}

/// The real thing: shells out to `shutdown`, detached from the caller. The
/// HTTP response has already been written by the time the command runs, so
/// failures are only logged.
pub struct SystemPower;

impl PowerControl for SystemPower {
    fn power_off(&self) {
        tokio::spawn(async {
            match Command::new("sudo").args(["shutdown", "now"]).status().await {
                Ok(status) if !status.success() => {
                    warn!("shutdown command exited with {status}");
                }
                Ok(_) => {}
                Err(err) => warn!("failed to run shutdown command: {err}"),
            }
        });
    }
}
