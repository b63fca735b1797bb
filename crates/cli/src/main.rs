//! Settle CLI - debounce a stream of stdin lines
//!
//! Reads lines from stdin and prints each one once the input has been
//! quiet for the configured delay. Bursty input (per-keystroke pipes,
//! chatty watch tools) collapses to the last line of each burst.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use owo_colors::OwoColorize;
use settle_core::{DebounceConfig, Debounced};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Settle - trailing-edge debounce for line streams
#[derive(Parser)]
#[command(name = "settle")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Quiescence window in milliseconds (overrides the config file)
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Prefix each settled line with elapsed milliseconds
    #[arg(long)]
    timestamps: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => DebounceConfig::load(path)?,
        None => DebounceConfig::default(),
    };
    let delay = cli
        .delay_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.delay());
    debug!(?delay, "starting");

    run(delay, cli.timestamps).await
}

async fn run(delay: Duration, timestamps: bool) -> Result<()> {
    let start = Instant::now();

    // stdin is blocking; read it on a dedicated thread
    let (line_tx, mut line_rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        use std::io::BufRead;
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    let debounced = Debounced::spawn(None::<String>, delay);
    let mut settled = debounced.subscribe();
    let mut pending = false;

    loop {
        tokio::select! {
            line = line_rx.recv() => match line {
                Some(line) => {
                    debounced.set(Some(line));
                    pending = true;
                }
                None => break,
            },
            changed = settled.changed() => {
                changed?;
                pending = false;
                emit(&settled.borrow_and_update(), start, timestamps);
            }
        }
    }

    // Input is done; wait out the trailing window so the last burst settles.
    if pending {
        let grace = delay + Duration::from_millis(50);
        if tokio::time::timeout(grace, settled.changed()).await.is_ok() {
            emit(&settled.borrow_and_update(), start, timestamps);
        }
    }

    info!("input closed, exiting");
    Ok(())
}

/// Print a settled line. The initial `None` sentinel is never printed.
fn emit(value: &Option<String>, start: Instant, timestamps: bool) {
    let Some(line) = value else { return };
    if timestamps {
        let elapsed = start.elapsed().as_millis();
        println!("{} {}", format!("[{elapsed:>6} ms]").dimmed(), line);
    } else {
        println!("{line}");
    }
}
