//! Analysis and offset tuning commands

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitCode;

use crate::analyze::HeadTopAnalyzer;
use crate::calibration::{format_offsets, CalibrationSession};
use crate::config::HatrackConfig;
use crate::offsets::OffsetStore;

use super::{display_path, started_overlay, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the analyze command - write generated offsets for review
pub fn run_analyze(config: HatrackConfig, names: &[String], all: bool, out: Option<&Path>) -> ExitCode {
    let analyzer = HeadTopAnalyzer::new(&config.paths.character_sheets);
    let roster = if all {
        analyzer.discover_roster()
    } else if names.is_empty() {
        config.analysis.roster.clone()
    } else {
        names.to_vec()
    };

    if roster.is_empty() {
        eprintln!(
            "Error: No characters to analyze in {}",
            display_path(analyzer.sheet_dir())
        );
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let results = analyzer.analyze_roster(&roster);
    let mut generated = OffsetStore::with_defaults(config.defaults.offsets());
    generated.merge_from(&results);

    let path = out.unwrap_or(&config.paths.generated_offsets);
    if let Err(e) = generated.save(path) {
        eprintln!("Error writing '{}': {}", path.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }

    for (name, offsets) in generated.entries() {
        println!("{}", format_offsets(name, offsets));
    }
    println!(
        "Analyzed {} of {} characters into {}",
        results.len(),
        roster.len(),
        display_path(path)
    );

    if results.is_empty() {
        ExitCode::from(EXIT_ERROR)
    } else {
        ExitCode::from(EXIT_SUCCESS)
    }
}

/// Execute the promote command - merge generated offsets into the live file
pub fn run_promote(config: HatrackConfig) -> ExitCode {
    let mut overlay = started_overlay(config);
    match overlay.promote_generated() {
        Ok(count) => {
            println!(
                "Promoted {} characters into {}",
                count,
                display_path(&overlay.config().paths.offsets)
            );
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Execute the adjust command - one adjustment, saved immediately
pub fn run_adjust(config: HatrackConfig, name: &str, direction: &str, axis: &str, amount: &str) -> ExitCode {
    let amount: i32 = match amount.trim().parse() {
        Ok(a) => a,
        Err(_) => {
            eprintln!("Error: Amount '{}' is not a whole number", amount);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let mut store = OffsetStore::load_or_default(&config.paths.offsets, config.defaults.offsets());
    let mut session = CalibrationSession::new(&mut store, &config.paths.offsets);

    if let Err(e) = session.adjust(name, direction, axis, amount) {
        eprintln!("Error: {}", e);
        return ExitCode::from(EXIT_INVALID_ARGS);
    }
    if let Err(e) = session.save() {
        eprintln!("Error: {}", e);
        return ExitCode::from(EXIT_ERROR);
    }

    println!("{}", format_offsets(name, session.show(name)));
    ExitCode::from(EXIT_SUCCESS)
}

/// Execute the show command
pub fn run_show(config: HatrackConfig, name: &str) -> ExitCode {
    let store = OffsetStore::load_or_default(&config.paths.offsets, config.defaults.offsets());
    let suffix = if store.get(name).is_none() { " (defaults)" } else { "" };
    println!("{}{}", format_offsets(name, store.effective(name)), suffix);
    ExitCode::from(EXIT_SUCCESS)
}

/// Execute the console command - a line-oriented calibration loop over stdin
pub fn run_console(config: HatrackConfig) -> ExitCode {
    let mut overlay = started_overlay(config);
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Error reading stdin: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        };
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if matches!(line, "quit" | "exit") {
            break;
        }

        match overlay.run_command(line) {
            Ok(reply) => println!("{}", reply),
            Err(e) => eprintln!("Error: {}", e),
        }
        let _ = stdout.flush();
    }

    ExitCode::from(EXIT_SUCCESS)
}
