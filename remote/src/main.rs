use anyhow::{bail, Context, Error};
use clap::error::ErrorKind;
use clap::{Parser, Subcommand, ValueEnum};
use log::debug;

const BASE_URL: &str = "http://busylight.local:3000/api";

#[derive(Parser)]
#[command(name = "busylight-remote", about = "Remote control for the busylight daemon")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show green
    Free,
    /// Show red
    Busy,
    /// Show orange
    Away,
    /// Do not disturb; same light as busy
    Dnd,
    /// Show purple
    Holiday,
    /// Turn the strip off
    Off,
    /// Print the daemon's current state
    Status,
    /// Toggle the blink animation
    Blink {
        #[arg(value_enum)]
        state: BlinkState,
    },
    /// Set the brightness level, 1-10; the daemon clamps anything outside
    Brightness { level: i64 },
}

#[derive(Clone, Copy, ValueEnum)]
enum BlinkState {
    On,
    Off,
}

impl Command {
    fn endpoint(&self) -> String {
        match self {
            Command::Free => "free".into(),
            Command::Busy | Command::Dnd => "busy".into(),
            Command::Away => "away".into(),
            Command::Holiday => "holiday".into(),
            Command::Off => "off".into(),
            Command::Status => "status".into(),
            Command::Blink {
                state: BlinkState::On,
            } => "blink/on".into(),
            Command::Blink {
                state: BlinkState::Off,
            } => "blink/off".into(),
            Command::Brightness { level } => format!("brightness/{level}"),
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = err.print();
            return;
        }
        Err(err) => {
            // Usage errors exit 1, not clap's default 2
            let _ = err.print();
            std::process::exit(1);
        }
    };

    if let Err(err) = run(cli.command).await {
        eprintln!("Request failed: {err:#}");
        std::process::exit(1);
    }
}

async fn run(command: Command) -> Result<(), Error> {
    let url = format!("{BASE_URL}/{}", command.endpoint());
    debug!("GET {url}");

    let response = reqwest::Client::new()
        .get(&url)
        .send()
        .await
        .with_context(|| format!("could not reach {url}"))?;

    if !response.status().is_success() {
        bail!("server returned {}", response.status());
    }

    let body = response.text().await?;
    if !body.is_empty() {
        println!("{body}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_map_to_their_endpoints() {
        assert_eq!(Command::Free.endpoint(), "free");
        assert_eq!(Command::Busy.endpoint(), "busy");
        assert_eq!(Command::Away.endpoint(), "away");
        assert_eq!(Command::Holiday.endpoint(), "holiday");
        assert_eq!(Command::Off.endpoint(), "off");
        assert_eq!(Command::Status.endpoint(), "status");
    }

    #[test]
    fn dnd_shares_the_busy_endpoint() {
        assert_eq!(Command::Dnd.endpoint(), "busy");
    }

    #[test]
    fn blink_and_brightness_carry_their_argument() {
        assert_eq!(
            Command::Blink {
                state: BlinkState::On
            }
            .endpoint(),
            "blink/on"
        );
        assert_eq!(
            Command::Blink {
                state: BlinkState::Off
            }
            .endpoint(),
            "blink/off"
        );
        // Sent as-is; clamping is the server's job
        assert_eq!(Command::Brightness { level: 15 }.endpoint(), "brightness/15");
    }

    #[test]
    fn blink_requires_on_or_off() {
        assert!(Cli::try_parse_from(["busylight-remote", "blink", "sideways"]).is_err());
        assert!(Cli::try_parse_from(["busylight-remote", "blink", "on"]).is_ok());
    }

    #[test]
    fn brightness_requires_a_numeric_level() {
        assert!(Cli::try_parse_from(["busylight-remote", "brightness"]).is_err());
        assert!(Cli::try_parse_from(["busylight-remote", "brightness", "bright"]).is_err());
        assert!(Cli::try_parse_from(["busylight-remote", "brightness", "7"]).is_ok());
    }
}
