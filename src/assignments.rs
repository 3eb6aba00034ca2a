//! Which character wears which hat
//!
//! Hats are recorded by display name, which survives rediscovery; ids may
//! shift between passes.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::offsets::write_json_file;

/// Characters that keep their own hat by default.
pub const DEFAULT_REFUSALS: &[&str] = &["Willy", "Wizard"];

/// Error assigning or persisting hats
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AssignmentError {
    #[error("Character name must not be empty")]
    EmptyName,
    #[error("Hat name must not be empty")]
    EmptyHat,
    #[error("{0} already has a hat")]
    Refused(String),
    #[error("Failed to access assignments file: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid assignments file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Character name to worn hat name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HatAssignments {
    hats: BTreeMap<String, String>,
    refusals: BTreeSet<String>,
}

impl HatAssignments {
    /// Empty assignments with no refusals.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty assignments refusing the given characters.
    pub fn with_refusals<I, S>(refusals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hats: BTreeMap::new(),
            refusals: refusals.into_iter().map(Into::into).collect(),
        }
    }

    pub fn refuses(&self, character: &str) -> bool {
        self.refusals.contains(character)
    }

    /// Put `hat` on `character`, returning the hat it replaces.
    pub fn give(&mut self, character: &str, hat: &str) -> Result<Option<String>, AssignmentError> {
        if character.trim().is_empty() {
            return Err(AssignmentError::EmptyName);
        }
        if hat.trim().is_empty() {
            return Err(AssignmentError::EmptyHat);
        }
        if self.refuses(character) {
            return Err(AssignmentError::Refused(character.to_string()));
        }

        let previous = self.hats.insert(character.to_string(), hat.to_string());
        match &previous {
            Some(old) => debug!(character, hat, old = %old, "Replacing hat"),
            None => debug!(character, hat, "Giving hat"),
        }
        Ok(previous)
    }

    /// Take `character`'s hat off.
    pub fn remove(&mut self, character: &str) -> Option<String> {
        let removed = self.hats.remove(character);
        if removed.is_some() {
            debug!(character, "Removed hat");
        }
        removed
    }

    pub fn hat_for(&self, character: &str) -> Option<&str> {
        self.hats.get(character).map(String::as_str)
    }

    pub fn has_hat(&self, character: &str) -> bool {
        self.hats.contains_key(character)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.hats.iter().map(|(c, h)| (c.as_str(), h.as_str()))
    }

    pub fn len(&self) -> usize {
        self.hats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hats.is_empty()
    }

    /// Load from `path`; a missing file is empty. Refusals are kept from `self`.
    pub fn load(&mut self, path: &Path) -> Result<(), AssignmentError> {
        let hats: BTreeMap<String, String> = match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        self.hats = hats.into_iter().filter(|(c, _)| !c.trim().is_empty()).collect();
        Ok(())
    }

    /// Like [`HatAssignments::load`], but a bad file leaves no assignments.
    pub fn load_or_default(&mut self, path: &Path) {
        if let Err(e) = self.load(path) {
            warn!(path = %path.display(), "{}; starting with no hats assigned", e);
            self.hats.clear();
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), AssignmentError> {
        write_json_file(path, &serde_json::to_string_pretty(&self.hats)?)?;
        info!(path = %path.display(), assigned = self.hats.len(), "Saved hat assignments");
        Ok(())
    }
}
