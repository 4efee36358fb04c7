//! Innkeeper interactive session binary

use std::error::Error;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use innkeeper::{
    config::{Settings, StorePaths},
    hotel::Hotel,
    menu::MenuSession,
    store::Store,
};

/// Hotel reservation manager
#[derive(Debug, Parser)]
#[command(name = "innkeeper", about = "Hotel reservation manager", long_about = None)]
struct Cli {
    /// Settings file (YAML) with store paths and admin credentials
    #[arg(short, long, env = "INNKEEPER_CONFIG")]
    config: Option<PathBuf>,

    /// Directory for the flat-file stores (overrides the settings file)
    #[arg(short, long, env = "INNKEEPER_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    log_level: String,
}

fn main() -> ExitCode {
    // Load .env file if present (ignore if missing)
    _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Diagnostics go to stderr so they do not interleave with the menu
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("session ended with error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut settings = match cli.config {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };

    if let Some(dir) = cli.data_dir {
        settings.stores = StorePaths::in_dir(dir);
    }

    let mut hotel = Hotel::open(Store::new(settings.stores.clone()))?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    MenuSession::new(&mut hotel, settings.admin, stdin.lock(), stdout.lock()).run()?;

    Ok(())
}
