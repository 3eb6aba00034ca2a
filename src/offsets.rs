//! Per-character hat offsets and their JSON persistence
//!
//! The store maps a character name to four directional offsets. Characters
//! without an entry use the store's defaults. Nothing here saves on its own;
//! callers save after every mutation they want to keep.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

use crate::direction::Direction;

/// Default vertical offset: one half hat-cell above the anchor.
pub const DEFAULT_OFFSET_Y: i32 = -8;

/// Pixel displacement applied to the hat before world zoom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offset {
    pub x: i32,
    pub y: i32,
}

impl Offset {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Default for Offset {
    fn default() -> Self {
        Self::new(0, DEFAULT_OFFSET_Y)
    }
}

/// Offsets for all four facing directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionalOffsets {
    #[serde(default)]
    pub up: Offset,
    #[serde(default)]
    pub right: Offset,
    #[serde(default)]
    pub down: Offset,
    #[serde(default)]
    pub left: Offset,
}

impl DirectionalOffsets {
    /// The same offset in every direction.
    pub const fn uniform(offset: Offset) -> Self {
        Self {
            up: offset,
            right: offset,
            down: offset,
            left: offset,
        }
    }

    pub fn get(&self, direction: Direction) -> Offset {
        match direction {
            Direction::Up => self.up,
            Direction::Right => self.right,
            Direction::Down => self.down,
            Direction::Left => self.left,
        }
    }

    pub fn get_mut(&mut self, direction: Direction) -> &mut Offset {
        match direction {
            Direction::Up => &mut self.up,
            Direction::Right => &mut self.right,
            Direction::Down => &mut self.down,
            Direction::Left => &mut self.left,
        }
    }

    /// Offset for a host facing ordinal; out-of-range ordinals read `down`.
    pub fn for_ordinal(&self, ordinal: i32) -> Offset {
        self.get(Direction::from_ordinal(ordinal))
    }
}

impl Default for DirectionalOffsets {
    fn default() -> Self {
        Self::uniform(Offset::default())
    }
}

/// Error reading or writing an offsets file
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OffsetStoreError {
    /// File I/O error
    #[error("Failed to access offsets file: {0}")]
    Io(#[from] io::Error),
    /// JSON parsing or encoding error
    #[error("Invalid offsets file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Character name to offsets, with a fallback set for everyone else.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OffsetStore {
    entries: BTreeMap<String, DirectionalOffsets>,
    defaults: DirectionalOffsets,
}

impl OffsetStore {
    /// Create an empty store using the built-in defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with custom defaults.
    pub fn with_defaults(defaults: DirectionalOffsets) -> Self {
        Self {
            entries: BTreeMap::new(),
            defaults,
        }
    }

    pub fn defaults(&self) -> &DirectionalOffsets {
        &self.defaults
    }

    /// The stored entry for `name`, if any.
    pub fn get(&self, name: &str) -> Option<&DirectionalOffsets> {
        self.entries.get(name)
    }

    /// The stored entry for `name`, or the defaults.
    pub fn effective(&self, name: &str) -> &DirectionalOffsets {
        self.entries.get(name).unwrap_or(&self.defaults)
    }

    /// The offset to draw `name` facing `direction` with.
    pub fn resolve(&self, name: &str, direction: Direction) -> Offset {
        self.effective(name).get(direction)
    }

    /// Entry for `name`, created from the defaults if absent.
    pub fn entry(&mut self, name: &str) -> &mut DirectionalOffsets {
        let defaults = self.defaults;
        self.entries.entry(name.to_string()).or_insert(defaults)
    }

    pub fn insert(&mut self, name: impl Into<String>, offsets: DirectionalOffsets) {
        self.entries.insert(name.into(), offsets);
    }

    /// Forget `name`'s entry so lookups fall back to the defaults.
    pub fn remove(&mut self, name: &str) -> Option<DirectionalOffsets> {
        self.entries.remove(name)
    }

    /// Overwrite entries with every entry from `other`, keeping the rest.
    pub fn merge_from(&mut self, other: &BTreeMap<String, DirectionalOffsets>) {
        for (name, offsets) in other {
            self.entries.insert(name.clone(), *offsets);
        }
    }

    pub fn entries(&self) -> &BTreeMap<String, DirectionalOffsets> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse entries from JSON text.
    pub fn from_json(json: &str, defaults: DirectionalOffsets) -> Result<Self, OffsetStoreError> {
        let entries: BTreeMap<String, DirectionalOffsets> = serde_json::from_str(json)?;
        Ok(Self { entries, defaults })
    }

    /// Pretty JSON for the entries; defaults are not written.
    pub fn to_json(&self) -> Result<String, OffsetStoreError> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }

    /// Load a store from `path`. A missing file is an empty store.
    pub fn load(path: &Path, defaults: DirectionalOffsets) -> Result<Self, OffsetStoreError> {
        match fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents, defaults),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::with_defaults(defaults)),
            Err(e) => Err(e.into()),
        }
    }

    /// Like [`OffsetStore::load`], but an unreadable or corrupt file resets to empty.
    pub fn load_or_default(path: &Path, defaults: DirectionalOffsets) -> Self {
        match Self::load(path, defaults) {
            Ok(store) => store,
            Err(e) => {
                warn!(path = %path.display(), "{}; starting with no offsets", e);
                Self::with_defaults(defaults)
            }
        }
    }

    /// Write every entry to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), OffsetStoreError> {
        write_json_file(path, &self.to_json()?)?;
        Ok(())
    }
}

/// Write `contents` to `path`, creating missing parent directories.
pub(crate) fn write_json_file(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, contents)
}
