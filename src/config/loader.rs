//! Configuration loading and discovery for `hatrack.toml`
//!
//! Provides functions to find and load configuration.

use super::schema::HatrackConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file.
pub const CONFIG_FILE: &str = "hatrack.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse hatrack.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// Find hatrack.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for hatrack.toml
/// 2. Check XDG_CONFIG_HOME/hatrack/hatrack.toml (or ~/.config/hatrack/hatrack.toml)
///
/// # Returns
/// - `Some(path)` of the first hatrack.toml found
/// - `None` if neither location has one
///
/// # Example
/// ```no_run
/// use hatrack::config::find_config;
///
/// if let Some(path) = find_config() {
///     println!("Using {}", path.display());
/// }
/// ```
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find hatrack.toml in the XDG config directory.
///
/// # Returns
/// - `Some(path)` if `$XDG_CONFIG_HOME/hatrack/hatrack.toml` exists, with
///   `$HOME/.config` standing in for an unset `XDG_CONFIG_HOME`
/// - `None` otherwise, including when neither variable is set
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("hatrack").join(CONFIG_FILE);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find hatrack.toml by walking up from a specific directory.
///
/// # Arguments
/// - `start` - Directory to search first; its ancestors follow
///
/// # Returns
/// - `Some(path)` in the nearest directory holding hatrack.toml
/// - `None` once the filesystem root has been checked
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate one. If no config file is found, returns the defaults.
///
/// # Arguments
/// - `path` - Explicit hatrack.toml, as given by `--config`
///
/// # Returns
/// - `Ok(HatrackConfig)` on success
/// - `Err(ConfigError)` if the file cannot be read, parsed or validated
///
/// # Example
/// ```no_run
/// use hatrack::config::load_config;
/// use std::path::Path;
///
/// let discovered = load_config(None).unwrap();
/// let explicit = load_config(Some(Path::new("hatrack.toml"))).unwrap();
/// assert_eq!(discovered.render.zoom, explicit.render.zoom);
/// ```
pub fn load_config(path: Option<&Path>) -> Result<HatrackConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(HatrackConfig::default()),
    }
}

/// Load configuration from a specific file path.
///
/// # Returns
/// - `Ok(HatrackConfig)` on success
/// - `Err(ConfigError::Io)` if the file cannot be read, otherwise as
///   [`parse_config`]
pub fn load_config_file(path: &Path) -> Result<HatrackConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parse and validate configuration text.
///
/// # Returns
/// - `Ok(HatrackConfig)` with every omitted section at its default
/// - `Err(ConfigError::Parse)` for malformed TOML
/// - `Err(ConfigError::Validation)` listing every rule the values break
///
/// # Example
/// ```
/// use hatrack::config::parse_config;
///
/// let config = parse_config("[render]\nzoom = 2.0\n").unwrap();
/// assert_eq!(config.render.zoom, 2.0);
/// assert_eq!(config.render.hat_scale, 3.0);
/// assert!(parse_config("[render]\nzoom = 0.0\n").is_err());
/// ```
pub fn parse_config(contents: &str) -> Result<HatrackConfig, ConfigError> {
    let config: HatrackConfig = toml::from_str(contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    Ok(config)
}
