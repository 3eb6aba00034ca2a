//! Hat assignment commands

use std::process::ExitCode;

use crate::config::HatrackConfig;

use super::{started_overlay, EXIT_ERROR, EXIT_SUCCESS};

/// Execute the give command
pub fn run_give(config: HatrackConfig, name: &str, hat: &str) -> ExitCode {
    let mut overlay = started_overlay(config);
    match overlay.give_hat(name, hat) {
        Ok(Some(old)) => println!("{} swapped their {} for a {}", name, old, hat),
        Ok(None) => println!("{} is now wearing a {}", name, hat),
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    }
    save(&overlay)
}

/// Execute the remove command
pub fn run_remove(config: HatrackConfig, name: &str) -> ExitCode {
    let mut overlay = started_overlay(config);
    match overlay.remove_hat(name) {
        Some(old) => println!("Took the {} off {}", old, name),
        None => {
            println!("{} is not wearing a hat", name);
            return ExitCode::from(EXIT_SUCCESS);
        }
    }
    save(&overlay)
}

/// Execute the hats command - list assignments
pub fn run_list(config: HatrackConfig) -> ExitCode {
    let overlay = started_overlay(config);
    if overlay.assignments().is_empty() {
        println!("Nobody is wearing a hat");
    }
    for (character, hat) in overlay.assignments().iter() {
        let marker = if overlay.registry().get_by_name(hat).is_some() { "" } else { "  (missing asset)" };
        println!("{:<16} {}{}", character, hat, marker);
    }
    ExitCode::from(EXIT_SUCCESS)
}

fn save(overlay: &crate::overlay::HatOverlay) -> ExitCode {
    match overlay.session_saved() {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
