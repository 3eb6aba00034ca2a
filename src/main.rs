//! Hatrack - command-line tool for discovering, calibrating and previewing hat overlays

use std::process::ExitCode;

use hatrack::cli;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hatrack=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    cli::run()
}
