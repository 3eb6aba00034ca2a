//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod calibrate;
mod discover;
mod hats;
mod preview;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::{load_config, HatrackConfig};
use crate::overlay::HatOverlay;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Hatrack - put hats on sprite characters and tune where they sit
#[derive(Parser)]
#[command(name = "hatrack")]
#[command(about = "Hatrack - discover hat sprites, calibrate per-character offsets, preview overlays")]
#[command(version)]
pub struct Cli {
    /// Path to hatrack.toml (default: search upward from the current directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the hats found in the asset directory
    Discover {
        /// Also write each hat's 16x16 icon into this directory
        #[arg(long)]
        icons: Option<PathBuf>,

        /// Scale written icons by integer factor (1-16, default: 1)
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u8).range(1..=16))]
        scale: u8,
    },

    /// Estimate offsets from character sheets into the generated offsets file
    Analyze {
        /// Characters to analyse (default: the configured roster)
        names: Vec<String>,

        /// Analyse every sheet in the character sheet directory
        #[arg(long, conflicts_with = "names")]
        all: bool,

        /// Write here instead of the configured generated offsets file
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Copy generated offsets into the live offsets file
    Promote,

    /// Move one axis of one direction's offset and save
    Adjust {
        /// Character name (case-sensitive)
        name: String,

        /// up, down, left or right
        direction: String,

        /// x or y
        axis: String,

        /// Signed pixel amount
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },

    /// Print the offsets in effect for a character
    Show {
        /// Character name (case-sensitive)
        name: String,
    },

    /// Put a hat on a character
    Give {
        /// Character name
        name: String,

        /// Hat display name, e.g. "Pumpkin Hat"
        hat: String,
    },

    /// Take a character's hat off
    Remove {
        /// Character name
        name: String,
    },

    /// List who wears which hat
    Hats,

    /// Render a character with a hat to a PNG
    Preview {
        /// Character name; the sheet is <character_sheets>/<name>.png
        name: String,

        /// Hat display name
        #[arg(long)]
        hat: String,

        /// Facing: up, down, left, right or an ordinal 0-3
        #[arg(short, long, default_value = "down")]
        direction: String,

        /// Animation phase (odd phases bob)
        #[arg(long, default_value = "0")]
        phase: u32,

        /// Output PNG path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Read calibration commands from stdin, one per line
    Console,
}

/// Parse arguments and run the selected command.
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    match cli.command {
        Commands::Discover { icons, scale } => discover::run_discover(config, icons.as_deref(), scale),
        Commands::Analyze { names, all, out } => {
            calibrate::run_analyze(config, &names, all, out.as_deref())
        }
        Commands::Promote => calibrate::run_promote(config),
        Commands::Adjust { name, direction, axis, amount } => {
            calibrate::run_adjust(config, &name, &direction, &axis, &amount)
        }
        Commands::Show { name } => calibrate::run_show(config, &name),
        Commands::Give { name, hat } => hats::run_give(config, &name, &hat),
        Commands::Remove { name } => hats::run_remove(config, &name),
        Commands::Hats => hats::run_list(config),
        Commands::Preview { name, hat, direction, phase, output } => {
            preview::run_preview(config, &name, &hat, &direction, phase, &output)
        }
        Commands::Console => calibrate::run_console(config),
    }
}

/// An overlay that has gone through startup.
pub(crate) fn started_overlay(config: HatrackConfig) -> HatOverlay {
    let mut overlay = HatOverlay::new(config);
    overlay.startup();
    overlay
}

/// Display a path relative to the working directory when possible.
pub(crate) fn display_path(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf))
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}
