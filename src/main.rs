//! EcoBot entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Load config
//!   3. Resolve effective log level (CLI `-v` flags > env > config)
//!   4. Init logger once
//!   5. Build shared state (assistant + restored session)
//!   6. Spawn Ctrl-C → shutdown signal watcher
//!   7. Run channels until they exit or shutdown is cancelled

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use ecobot::comms::{self, AppState};
use ecobot::config::{self, AssistantMode};
use ecobot::error::AppError;
use ecobot::logger;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    // Load .env if present — ignore errors (file is optional).
    let _ = dotenvy::dotenv();

    let args = parse_cli_args();

    let mut config = config::load(args.config_path.as_deref())?;
    if args.offline {
        config.assistant.mode = AssistantMode::Offline;
    }

    let effective_log_level = args.log_level.unwrap_or(config.log_level.as_str());
    logger::parse_level(&config.log_level)?;
    let filter_source = logger::init(effective_log_level, args.log_level.is_some())?;

    info!(
        app_name = %config.app_name,
        data_dir = %config.data_dir.display(),
        mode = ?config.assistant.mode,
        fallback = ?config.assistant.fallback,
        effective_log_level = %effective_log_level,
        filter_source = ?filter_source,
        "config loaded"
    );

    let state = Arc::new(AppState::from_config(&config)?);
    info!(assistant = state.assistant_backend(), "assistant ready");

    let shutdown = CancellationToken::new();

    let ctrlc_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("ctrl-c received — initiating shutdown");
            ctrlc_token.cancel();
        }
    });

    let channels = comms::start(&config, state, shutdown.clone());
    let result = channels.join().await;

    // With only background channels (or none) running, wait for Ctrl-C.
    if result.is_ok() && !(cfg!(feature = "channel-console") && config.comms.console.enabled) {
        shutdown.cancelled().await;
    }

    info!("shutdown complete");
    result
}

struct CliArgs {
    log_level: Option<&'static str>,
    config_path: Option<String>,
    offline: bool,
}

fn parse_cli_args() -> CliArgs {
    let mut verbosity = 0u8;
    let mut config_path = None;
    let mut offline = false;

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        if arg == "--" {
            break;
        }

        match arg.as_str() {
            "-h" | "--help" => {
                println!("Usage: ecobot [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -h, --help                 Print help");
                println!("  -f, --config <PATH>        Path to configuration file (default: {})", config::DEFAULT_CONFIG_PATH);
                println!("      --offline              Answer from the built-in resolver only");
                println!("  -v, -vv, -vvv, -vvvv       Increase logging verbosity");
                std::process::exit(0);
            }
            "-f" | "--config" => {
                if let Some(path) = iter.next() {
                    config_path = Some(path);
                } else {
                    eprintln!("error: -f/--config requires a path argument");
                    std::process::exit(1);
                }
            }
            "--offline" => offline = true,
            "--verbose" => verbosity = verbosity.saturating_add(1),
            a if a.starts_with('-') && a.len() > 1 && a.chars().skip(1).all(|c| c == 'v') => {
                verbosity = verbosity.saturating_add((a.len() - 1) as u8);
            }
            _ => {}
        }
    }

    CliArgs {
        log_level: logger::level_for_verbosity(verbosity),
        config_path,
        offline,
    }
}
