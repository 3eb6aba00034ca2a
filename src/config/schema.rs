//! Configuration schema types for `hatrack.toml`
//!
//! Every section is optional; an empty file gives the reference setup.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::analyze::DEFAULT_ROSTER;
use crate::assignments::DEFAULT_REFUSALS;
use crate::offsets::{DirectionalOffsets, Offset, DEFAULT_OFFSET_Y};
use crate::registry::{NameCollision, DEFAULT_ID_BASE};
use crate::renderer::RenderSettings;

/// File locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding hat sheets
    pub assets: PathBuf,
    /// Directory holding `<Name>.png` character sheets
    pub character_sheets: PathBuf,
    /// Live offsets file
    pub offsets: PathBuf,
    /// Output of `analyze`, reviewed before `promote`
    pub generated_offsets: PathBuf,
    /// Worn hats file
    pub assignments: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            assets: PathBuf::from("assets"),
            character_sheets: PathBuf::from("Characters"),
            offsets: PathBuf::from("hat_offsets.json"),
            generated_offsets: PathBuf::from("generated_offsets.json"),
            assignments: PathBuf::from("npc_hats.json"),
        }
    }
}

/// Asset discovery settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// First id handed out during discovery
    pub id_base: u32,
    /// Policy for two files with the same display name
    pub on_name_collision: NameCollision,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            id_base: DEFAULT_ID_BASE,
            on_name_collision: NameCollision::default(),
        }
    }
}

/// Offset used for characters without an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub x: i32,
    pub y: i32,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            x: 0,
            y: DEFAULT_OFFSET_Y,
        }
    }
}

impl DefaultsConfig {
    pub fn offsets(&self) -> DirectionalOffsets {
        DirectionalOffsets::uniform(Offset::new(self.x, self.y))
    }
}

/// Head-top analysis settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Characters analysed by `analyze`
    pub roster: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            roster: DEFAULT_ROSTER.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Hat assignment settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignmentsConfig {
    /// Characters that decline hats
    pub refuse: Vec<String>,
}

impl Default for AssignmentsConfig {
    fn default() -> Self {
        Self {
            refuse: DEFAULT_REFUSALS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HatrackConfig {
    pub paths: PathsConfig,
    pub assets: AssetsConfig,
    pub render: RenderSettings,
    pub defaults: DefaultsConfig,
    pub analysis: AnalysisConfig,
    pub assignments: AssignmentsConfig,
}

/// A single validation problem
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl HatrackConfig {
    /// Check values serde cannot; an empty list means the config is usable.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if !(self.render.hat_scale.is_finite() && self.render.hat_scale > 0.0) {
            errors.push(ValidationError::new("render.hat_scale", "must be a positive number"));
        }
        if !(self.render.zoom.is_finite() && self.render.zoom > 0.0) {
            errors.push(ValidationError::new("render.zoom", "must be a positive number"));
        }
        if self.render.character_width == 0 {
            errors.push(ValidationError::new("render.character_width", "must be at least 1"));
        }
        if self.render.hat_width == 0 {
            errors.push(ValidationError::new("render.hat_width", "must be at least 1"));
        }
        if self.paths.offsets == self.paths.generated_offsets {
            errors.push(ValidationError::new(
                "paths.generated_offsets",
                "must differ from paths.offsets",
            ));
        }
        if self.analysis.roster.iter().any(|n| n.trim().is_empty()) {
            errors.push(ValidationError::new("analysis.roster", "contains an empty name"));
        }

        errors
    }
}
