//! Discover command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::config::HatrackConfig;
use crate::output::{icon_path, save_png, scale_image};
use crate::registry::AssetRegistry;

use super::{display_path, EXIT_ERROR, EXIT_SUCCESS};

/// Execute the discover command - list hats and optionally export icons
pub fn run_discover(config: HatrackConfig, icons: Option<&Path>, scale: u8) -> ExitCode {
    let mut registry =
        AssetRegistry::with_options(config.assets.id_base, config.assets.on_name_collision);
    let assets = registry.discover(&config.paths.assets);

    if assets.is_empty() {
        println!("No hats found in {}", display_path(&config.paths.assets));
    }
    for asset in assets {
        println!("{:>5}  {:<24} {}", asset.id, asset.name, display_path(&asset.path));
    }

    let mut failed = false;
    if let Some(dir) = icons {
        for asset in registry.assets() {
            let path = icon_path(dir, asset.id, &asset.name);
            match save_png(&scale_image(asset.icon.clone(), scale), &path) {
                Ok(()) => eprintln!("Wrote: {}", display_path(&path)),
                Err(e) => {
                    eprintln!("Error writing '{}': {}", path.display(), e);
                    failed = true;
                }
            }
        }
    }

    for skipped in registry.skipped() {
        eprintln!("Skipped {}: {}", display_path(&skipped.path), skipped.error);
    }

    if failed {
        ExitCode::from(EXIT_ERROR)
    } else {
        ExitCode::from(EXIT_SUCCESS)
    }
}
