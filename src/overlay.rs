//! The owning orchestrator
//!
//! [`HatOverlay`] holds every piece of state and exposes one method per host
//! lifecycle point: [`HatOverlay::startup`] before the first frame,
//! [`HatOverlay::render_frame`] once per frame, [`HatOverlay::run_command`]
//! for console input, and [`HatOverlay::session_saved`] at save boundaries.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};

use crate::analyze::HeadTopAnalyzer;
use crate::assignments::{AssignmentError, HatAssignments};
use crate::calibration::{format_offsets, CalibrationCommand, CalibrationError, CalibrationSession};
use crate::config::HatrackConfig;
use crate::offsets::{DirectionalOffsets, OffsetStore, OffsetStoreError};
use crate::registry::AssetRegistry;
use crate::renderer::{CompositeRenderer, DrawTarget, Point, SpriteBatch};

/// Error from an orchestrator operation
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OverlayError {
    #[error(transparent)]
    Calibration(#[from] CalibrationError),
    #[error(transparent)]
    Assignment(#[from] AssignmentError),
    #[error(transparent)]
    Offsets(#[from] OffsetStoreError),
    #[error("Unknown hat '{0}'")]
    UnknownHat(String),
    #[error("No generated offsets at {0}; run analyze first")]
    NothingToPromote(PathBuf),
}

/// One visible character, as reported by the host for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterFrame {
    pub name: String,
    /// Host facing ordinal, `0=Up, 1=Right, 2=Down, 3=Left`
    pub facing: i32,
    /// Screen position of the sprite's draw origin
    pub anchor: Point,
    /// World Y, for depth sorting
    pub world_y: f32,
    pub phase: u32,
    pub bob: Option<bool>,
    pub jump: f32,
}

impl CharacterFrame {
    /// A standing character with no animation state.
    pub fn standing(name: impl Into<String>, facing: i32, anchor: Point, world_y: f32) -> Self {
        Self {
            name: name.into(),
            facing,
            anchor,
            world_y,
            phase: 0,
            bob: None,
            jump: 0.0,
        }
    }
}

/// Owner of the registry, offsets and assignments.
#[derive(Debug)]
pub struct HatOverlay {
    config: HatrackConfig,
    registry: AssetRegistry,
    offsets: OffsetStore,
    assignments: HatAssignments,
}

impl HatOverlay {
    /// Build an overlay with empty state. Call [`HatOverlay::startup`] before rendering.
    pub fn new(config: HatrackConfig) -> Self {
        let registry =
            AssetRegistry::with_options(config.assets.id_base, config.assets.on_name_collision);
        let offsets = OffsetStore::with_defaults(config.defaults.offsets());
        let assignments = HatAssignments::with_refusals(config.assignments.refuse.iter().cloned());
        Self {
            config,
            registry,
            offsets,
            assignments,
        }
    }

    /// Discover hats, then load offsets and assignments.
    pub fn startup(&mut self) {
        self.registry.discover(&self.config.paths.assets);
        self.offsets =
            OffsetStore::load_or_default(&self.config.paths.offsets, self.config.defaults.offsets());
        self.assignments.load_or_default(&self.config.paths.assignments);
        info!(
            hats = self.registry.len(),
            offsets = self.offsets.len(),
            assigned = self.assignments.len(),
            "Hat overlay ready"
        );
    }

    pub fn config(&self) -> &HatrackConfig {
        &self.config
    }

    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }

    pub fn offsets(&self) -> &OffsetStore {
        &self.offsets
    }

    pub fn assignments(&self) -> &HatAssignments {
        &self.assignments
    }

    /// A renderer over the current state.
    pub fn renderer(&self) -> CompositeRenderer<'_> {
        CompositeRenderer::new(&self.registry, &self.offsets, self.config.render)
    }

    /// Draw the hats of every character wearing one. Returns the number drawn.
    pub fn render_frame<B: SpriteBatch + ?Sized>(&self, characters: &[CharacterFrame], batch: &mut B) -> usize {
        let renderer = self.renderer();
        let mut drawn = 0;
        for character in characters {
            let Some(hat) = self.assignments.hat_for(&character.name) else {
                continue;
            };
            let target = DrawTarget {
                character: &character.name,
                facing: character.facing,
                anchor: character.anchor,
                world_y: character.world_y,
                phase: character.phase,
                bob: character.bob,
                jump: character.jump,
                hat,
            };
            if renderer.draw(&target, batch) {
                drawn += 1;
            }
        }
        drawn
    }

    /// A tuning session over the live offsets.
    pub fn calibration(&mut self) -> CalibrationSession<'_> {
        CalibrationSession::new(&mut self.offsets, &self.config.paths.offsets)
    }

    /// Run one console line and return the text to show the user.
    pub fn run_command(&mut self, line: &str) -> Result<String, OverlayError> {
        match CalibrationCommand::parse(line)? {
            CalibrationCommand::Adjust {
                name,
                direction,
                axis,
                amount,
            } => {
                let offset = self.calibration().apply(&name, direction, axis, amount)?;
                Ok(format!("{} {} is now x={} y={}", name, direction, offset.x, offset.y))
            }
            CalibrationCommand::Show { name } => {
                Ok(format_offsets(&name, self.calibration().show(&name)))
            }
            CalibrationCommand::Reset { name } => {
                if self.calibration().reset(&name) {
                    Ok(format!("{} is back on the default offsets", name))
                } else {
                    Ok(format!("{} has no offsets to reset", name))
                }
            }
            CalibrationCommand::Save => {
                self.calibration().save()?;
                Ok(format!("Saved offsets to {}", self.config.paths.offsets.display()))
            }
            CalibrationCommand::Reload => {
                self.calibration().reload();
                Ok(format!("Reloaded {} offsets", self.offsets.len()))
            }
            CalibrationCommand::Analyze => {
                let (count, path) = self.analyze()?;
                Ok(format!("Analyzed {} characters into {}", count, path.display()))
            }
        }
    }

    /// Analyse the configured roster and write the generated offsets file.
    ///
    /// Live offsets are not touched; see [`HatOverlay::promote_generated`].
    pub fn analyze(&self) -> Result<(usize, &Path), OverlayError> {
        let roster = &self.config.analysis.roster;
        let results = HeadTopAnalyzer::new(&self.config.paths.character_sheets).analyze_roster(roster.as_slice());
        self.write_generated(&results)?;
        Ok((results.len(), self.config.paths.generated_offsets.as_path()))
    }

    /// Write an analysis result to the generated offsets file.
    pub fn write_generated(&self, results: &BTreeMap<String, DirectionalOffsets>) -> Result<(), OverlayError> {
        let mut generated = OffsetStore::with_defaults(self.config.defaults.offsets());
        generated.merge_from(results);
        generated.save(&self.config.paths.generated_offsets).inspect_err(|e| {
            error!(path = %self.config.paths.generated_offsets.display(), "Failed to write generated offsets: {}", e)
        })?;
        Ok(())
    }

    /// Replace live entries with the generated ones and save the live file.
    pub fn promote_generated(&mut self) -> Result<usize, OverlayError> {
        let path = &self.config.paths.generated_offsets;
        if !path.exists() {
            return Err(OverlayError::NothingToPromote(path.clone()));
        }
        let generated = OffsetStore::load(path, self.config.defaults.offsets())?;
        self.offsets.merge_from(generated.entries());
        self.calibration().save()?;
        Ok(generated.len())
    }

    /// Put a registered hat on a character.
    pub fn give_hat(&mut self, character: &str, hat: &str) -> Result<Option<String>, OverlayError> {
        if self.registry.get_by_name(hat).is_none() {
            return Err(OverlayError::UnknownHat(hat.to_string()));
        }
        Ok(self.assignments.give(character, hat)?)
    }

    pub fn remove_hat(&mut self, character: &str) -> Option<String> {
        self.assignments.remove(character)
    }

    /// Persist assignments at a host save boundary.
    pub fn session_saved(&self) -> Result<(), OverlayError> {
        self.assignments.save(&self.config.paths.assignments).inspect_err(|e| {
            error!(path = %self.config.paths.assignments.display(), "Failed to save hat assignments: {}", e)
        })?;
        Ok(())
    }
}
