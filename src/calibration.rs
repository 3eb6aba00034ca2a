//! Live offset tuning
//!
//! A [`CalibrationSession`] borrows the offset store and its backing file.
//! Adjustments only touch memory; `save` writes, `reload` reads back.

use std::fmt;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::direction::Direction;
use crate::offsets::{DirectionalOffsets, Offset, OffsetStore, OffsetStoreError};

/// Which coordinate of an offset to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "x" => Some(Axis::X),
            "y" => Some(Axis::Y),
            _ => None,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Axis::X => "x",
            Axis::Y => "y",
        })
    }
}

/// Calibration input or persistence failure
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CalibrationError {
    #[error("Character name must not be empty")]
    EmptyName,
    #[error("Unknown direction '{0}' (expected up, down, left or right)")]
    InvalidDirection(String),
    #[error("Unknown axis '{0}' (expected x or y)")]
    InvalidAxis(String),
    #[error("Amount '{0}' is not a whole number")]
    InvalidAmount(String),
    #[error("Unknown command '{0}' (expected adjust, show, reset, save, reload or analyze)")]
    UnknownCommand(String),
    #[error("Moving {axis} by {delta} from {from} leaves the offset range")]
    OutOfRange { axis: Axis, from: i32, delta: i32 },
    #[error("Usage: {0}")]
    Usage(&'static str),
    #[error("Failed to save offsets: {0}")]
    Save(#[from] OffsetStoreError),
}

/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalibrationCommand {
    Adjust {
        name: String,
        direction: Direction,
        axis: Axis,
        amount: i32,
    },
    Show {
        name: String,
    },
    Reset {
        name: String,
    },
    Save,
    Reload,
    Analyze,
}

const ADJUST_USAGE: &str = "adjust <name> <direction> <x|y> <amount>";
const SHOW_USAGE: &str = "show <name>";
const RESET_USAGE: &str = "reset <name>";

impl CalibrationCommand {
    /// Parse a whitespace-separated console line.
    pub fn parse(line: &str) -> Result<Self, CalibrationError> {
        let args: Vec<&str> = line.split_whitespace().collect();
        let Some((verb, rest)) = args.split_first() else {
            return Err(CalibrationError::Usage(ADJUST_USAGE));
        };

        match verb.to_ascii_lowercase().as_str() {
            "adjust" => match rest {
                [name, direction, axis, amount] => Ok(CalibrationCommand::Adjust {
                    name: name.to_string(),
                    direction: parse_direction(direction)?,
                    axis: parse_axis(axis)?,
                    amount: parse_amount(amount)?,
                }),
                _ => Err(CalibrationError::Usage(ADJUST_USAGE)),
            },
            "show" => match rest {
                [name] => Ok(CalibrationCommand::Show {
                    name: name.to_string(),
                }),
                _ => Err(CalibrationError::Usage(SHOW_USAGE)),
            },
            "reset" => match rest {
                [name] => Ok(CalibrationCommand::Reset {
                    name: name.to_string(),
                }),
                _ => Err(CalibrationError::Usage(RESET_USAGE)),
            },
            "save" => Ok(CalibrationCommand::Save),
            "reload" => Ok(CalibrationCommand::Reload),
            "analyze" => Ok(CalibrationCommand::Analyze),
            other => Err(CalibrationError::UnknownCommand(other.to_string())),
        }
    }
}

fn parse_direction(token: &str) -> Result<Direction, CalibrationError> {
    Direction::parse(token).ok_or_else(|| CalibrationError::InvalidDirection(token.to_string()))
}

fn parse_axis(token: &str) -> Result<Axis, CalibrationError> {
    Axis::parse(token).ok_or_else(|| CalibrationError::InvalidAxis(token.to_string()))
}

fn parse_amount(token: &str) -> Result<i32, CalibrationError> {
    token
        .trim()
        .parse()
        .map_err(|_| CalibrationError::InvalidAmount(token.to_string()))
}

/// Live tuning over a borrowed store.
#[derive(Debug)]
pub struct CalibrationSession<'a> {
    store: &'a mut OffsetStore,
    path: &'a Path,
}

impl<'a> CalibrationSession<'a> {
    pub fn new(store: &'a mut OffsetStore, path: &'a Path) -> Self {
        Self { store, path }
    }

    /// Move one axis of one direction by `delta`.
    ///
    /// Tokens are validated before anything changes. A character without an
    /// entry gets one copied from the defaults.
    pub fn adjust(
        &mut self,
        name: &str,
        direction: &str,
        axis: &str,
        delta: i32,
    ) -> Result<Offset, CalibrationError> {
        let direction = parse_direction(direction)?;
        let axis = parse_axis(axis)?;
        self.apply(name, direction, axis, delta)
    }

    /// [`CalibrationSession::adjust`] with already-parsed tokens.
    pub fn apply(
        &mut self,
        name: &str,
        direction: Direction,
        axis: Axis,
        delta: i32,
    ) -> Result<Offset, CalibrationError> {
        if name.trim().is_empty() {
            return Err(CalibrationError::EmptyName);
        }

        let current = self.store.effective(name).get(direction);
        let from = match axis {
            Axis::X => current.x,
            Axis::Y => current.y,
        };
        let moved = from
            .checked_add(delta)
            .ok_or(CalibrationError::OutOfRange { axis, from, delta })?;

        let offset = self.store.entry(name).get_mut(direction);
        match axis {
            Axis::X => offset.x = moved,
            Axis::Y => offset.y = moved,
        }
        info!(character = name, %direction, %axis, delta, "Adjusted offset to ({}, {})", offset.x, offset.y);
        Ok(*offset)
    }

    /// Offsets in effect for `name`.
    pub fn show(&self, name: &str) -> &DirectionalOffsets {
        self.store.effective(name)
    }

    /// Drop `name`'s entry so it falls back to the defaults. Returns whether one existed.
    pub fn reset(&mut self, name: &str) -> bool {
        let removed = self.store.remove(name).is_some();
        if removed {
            info!(character = name, "Reset offsets to defaults");
        }
        removed
    }

    /// Write the whole store. On failure the in-memory state is kept.
    pub fn save(&self) -> Result<(), CalibrationError> {
        match self.store.save(self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), entries = self.store.len(), "Saved offsets");
                Ok(())
            }
            Err(e) => {
                error!(path = %self.path.display(), "Failed to save offsets: {}", e);
                Err(e.into())
            }
        }
    }

    /// Replace memory with the file's contents; missing or corrupt files give an empty store.
    pub fn reload(&mut self) {
        let defaults = *self.store.defaults();
        if !self.path.exists() {
            warn!(path = %self.path.display(), "No offsets file to reload; starting with no offsets");
        }
        *self.store = OffsetStore::load_or_default(self.path, defaults);
    }

    pub fn store(&self) -> &OffsetStore {
        &*self.store
    }
}

/// Multi-line text rendering of a set of offsets, for `show`.
pub fn format_offsets(name: &str, offsets: &DirectionalOffsets) -> String {
    let mut out = format!("{}:", name);
    for direction in [Direction::Down, Direction::Up, Direction::Left, Direction::Right] {
        let offset = offsets.get(direction);
        out.push_str(&format!("\n  {:<5} x={:>3} y={:>3}", direction, offset.x, offset.y));
    }
    out
}
