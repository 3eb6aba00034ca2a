//! Facing directions and the sheet-column tables that depend on them
//!
//! Two numbering schemes meet here. Hosts report facing as an ordinal
//! (`0=Up, 1=Right, 2=Down, 3=Left`), while sprite sheets store frames in
//! their own column order. Every conversion goes through the named tables
//! below rather than an inline `match` at the call site.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four canonical facing directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

/// Hat sheet column for each direction.
///
/// Hat art is laid out Down, Up, Left, Right in a single row of 16x16 cells.
pub const HAT_SHEET_COLUMNS: [(Direction, u32); 4] = [
    (Direction::Down, 0),
    (Direction::Up, 1),
    (Direction::Left, 2),
    (Direction::Right, 3),
];

/// Character sheet column holding the standing frame for each direction.
///
/// Character sheets only draw Down, Up and Left; Right is the mirrored Left frame.
pub const CHARACTER_SHEET_COLUMNS: [(Direction, u32); 4] = [
    (Direction::Down, 0),
    (Direction::Up, 1),
    (Direction::Left, 2),
    (Direction::Right, 2),
];

impl Direction {
    /// All directions in host ordinal order.
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

    /// Convert a host facing ordinal. Anything outside `0..=3` falls back to `Down`.
    pub fn from_ordinal(ordinal: i32) -> Self {
        match ordinal {
            0 => Direction::Up,
            1 => Direction::Right,
            2 => Direction::Down,
            3 => Direction::Left,
            _ => Direction::Down,
        }
    }

    /// The host facing ordinal for this direction.
    pub fn ordinal(self) -> i32 {
        match self {
            Direction::Up => 0,
            Direction::Right => 1,
            Direction::Down => 2,
            Direction::Left => 3,
        }
    }

    /// Lowercase name, as used in offset files and console commands.
    pub fn name(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Right => "right",
            Direction::Down => "down",
            Direction::Left => "left",
        }
    }

    /// Parse a direction token: a name (any case) or a host ordinal `0..=3`.
    ///
    /// Unlike [`Direction::from_ordinal`] this is strict and returns `None`
    /// for anything it does not recognise.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        match token.to_ascii_lowercase().as_str() {
            "up" | "u" | "0" => Some(Direction::Up),
            "right" | "r" | "1" => Some(Direction::Right),
            "down" | "d" | "2" => Some(Direction::Down),
            "left" | "l" | "3" => Some(Direction::Left),
            _ => None,
        }
    }

    /// Column of this direction's frame in a hat sheet.
    pub fn hat_sheet_column(self) -> u32 {
        lookup_column(&HAT_SHEET_COLUMNS, self)
    }

    /// Column of this direction's standing frame in a character sheet.
    pub fn character_sheet_column(self) -> u32 {
        lookup_column(&CHARACTER_SHEET_COLUMNS, self)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Inverse of [`Direction::hat_sheet_column`].
pub fn direction_for_hat_column(column: u32) -> Option<Direction> {
    HAT_SHEET_COLUMNS
        .iter()
        .find(|(_, c)| *c == column)
        .map(|(direction, _)| *direction)
}

fn lookup_column(table: &[(Direction, u32); 4], direction: Direction) -> u32 {
    table
        .iter()
        .find(|(d, _)| *d == direction)
        .map(|(_, column)| *column)
        .unwrap_or(0)
}
