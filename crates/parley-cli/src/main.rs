//! Parley replay binary.
//!
//! # Usage
//!
//! ```bash
//! # Replay a session transcript as user alice
//! parley-replay --user alice --contacts bob,carol < session.jsonl
//!
//! # Read the script from a file with verbose logging
//! parley-replay --user alice --script session.jsonl --log-level debug
//! ```

use std::{path::PathBuf, time::Duration};

use clap::Parser;
use parley_cli::{ReplayDriver, Runtime, SessionConfig};
use parley_core::env::SystemEnv;
use tokio::io::{AsyncBufRead, BufReader};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Parley session replay
#[derive(Parser, Debug)]
#[command(name = "parley-replay")]
#[command(about = "Drive a Parley chat session from a JSON-lines script")]
#[command(version)]
struct Args {
    /// Signed-in user
    #[arg(short, long)]
    user: String,

    /// Contacts whose online status is displayed (comma separated)
    #[arg(long, value_delimiter = ',')]
    contacts: Vec<String>,

    /// Script to replay. Reads stdin when omitted.
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Idle time after the last keystroke before typing stops, in milliseconds
    #[arg(
        long,
        default_value = "1000",
        value_parser = clap::value_parser!(u64).range(1..=3_600_000)
    )]
    typing_idle_ms: u64,

    /// Characters of a message shown in conversation previews
    #[arg(long, default_value = "25")]
    preview_len: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)).with(filter).init();

    let config = SessionConfig::new(args.user)
        .with_contacts(args.contacts)
        .with_typing_idle(Duration::from_millis(args.typing_idle_ms))
        .with_preview_len(args.preview_len);

    let script: Box<dyn AsyncBufRead + Unpin + Send> = match &args.script {
        Some(path) => Box::new(BufReader::new(tokio::fs::File::open(path).await?)),
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };

    tracing::info!(user = %config.local_user, "replay starting");

    let driver = ReplayDriver::new(script, std::io::stdout());
    let mut runtime = Runtime::new(driver, SystemEnv, config);
    runtime.run().await?;

    tracing::info!("replay finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_idle_flag_is_bounded() {
        let args = Args::try_parse_from(["parley-replay", "-u", "alice"]).unwrap();
        assert_eq!(args.typing_idle_ms, 1000);

        let args =
            Args::try_parse_from(["parley-replay", "-u", "alice", "--typing-idle-ms", "250"]).unwrap();
        assert_eq!(args.typing_idle_ms, 250);

        for bad in ["0", "3600001", "18446744073709551615"] {
            assert!(
                Args::try_parse_from(["parley-replay", "-u", "alice", "--typing-idle-ms", bad])
                    .is_err()
            );
        }
    }
}
