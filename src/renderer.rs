//! Hat compositing: where, how big and how deep to draw a hat
//!
//! The renderer borrows the registry and offset store and owns nothing
//! persistent. [`CompositeRenderer::plan`] is the pure computation;
//! [`CompositeRenderer::draw`] hands the result to a [`SpriteBatch`].

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::direction::Direction;
use crate::offsets::OffsetStore;
use crate::registry::AssetRegistry;
use crate::spritesheet::{CellRect, CHARACTER_CELL_WIDTH, HAT_CELL};

/// Divisor turning a world Y coordinate into a layer depth.
pub const DEPTH_SCALE: f32 = 10000.0;
/// Added to world Y so the hat sorts just in front of its wearer.
pub const DEPTH_BIAS: f32 = 1.0;

/// A screen or world position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Fixed rendering parameters, the `[render]` config section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Scale applied to the hat cell, independent of world zoom
    pub hat_scale: f32,
    /// World-to-screen zoom applied to offsets and the character sprite
    pub zoom: f32,
    /// Width of the character sprite in art pixels
    pub character_width: u32,
    /// Width of a hat cell in art pixels
    pub hat_width: u32,
    /// Art pixels the head dips on mid-stride frames
    pub bob_pixels: i32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            hat_scale: 3.0,
            zoom: 4.0,
            character_width: CHARACTER_CELL_WIDTH,
            hat_width: HAT_CELL,
            bob_pixels: 1,
        }
    }
}

impl RenderSettings {
    /// Horizontal screen shift centring the scaled hat over the zoomed sprite.
    pub fn centering(&self) -> f32 {
        (self.character_width as f32 * self.zoom - self.hat_width as f32 * self.hat_scale) / 2.0
    }
}

/// Everything the host tells us about one character for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawTarget<'a> {
    pub character: &'a str,
    /// Host facing ordinal, `0=Up, 1=Right, 2=Down, 3=Left`
    pub facing: i32,
    /// Screen position of the character's draw origin
    pub anchor: Point,
    /// World Y of the character, for depth sorting
    pub world_y: f32,
    /// Host animation frame counter
    pub phase: u32,
    /// Explicit bob flag; derived from `phase` when `None`
    pub bob: Option<bool>,
    /// Host vertical jump displacement in screen pixels
    pub jump: f32,
    /// Display name of the worn hat
    pub hat: &'a str,
}

impl DrawTarget<'_> {
    /// Whether the head is dipped this frame. Odd phases are mid-stride.
    pub fn bobbing(&self) -> bool {
        self.bob.unwrap_or(self.phase % 2 == 1)
    }
}

/// One sprite draw, in the host's terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub source: CellRect,
    pub position: Point,
    pub scale: f32,
    pub depth: f32,
}

/// The host's sprite batch.
pub trait SpriteBatch {
    fn draw(&mut self, texture: &RgbaImage, command: &DrawCommand);
}

/// Layer depth for a world Y: non-decreasing, clamped to `0.0..=1.0`.
pub fn layer_depth(world_y: f32) -> f32 {
    ((world_y + DEPTH_BIAS) / DEPTH_SCALE).clamp(0.0, 1.0)
}

/// Plans and issues hat draws.
#[derive(Debug, Clone, Copy)]
pub struct CompositeRenderer<'a> {
    registry: &'a AssetRegistry,
    offsets: &'a OffsetStore,
    settings: RenderSettings,
}

impl<'a> CompositeRenderer<'a> {
    pub fn new(registry: &'a AssetRegistry, offsets: &'a OffsetStore, settings: RenderSettings) -> Self {
        Self {
            registry,
            offsets,
            settings,
        }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Compute the draw for `target`, or `None` if its hat is unknown.
    pub fn plan(&self, target: &DrawTarget<'_>) -> Option<DrawCommand> {
        self.registry.get_by_name(target.hat)?;
        let direction = Direction::from_ordinal(target.facing);
        let column = direction.hat_sheet_column();

        let zoom = self.settings.zoom;
        let offset = self.offsets.resolve(target.character, direction);
        let bob = if target.bobbing() {
            self.settings.bob_pixels as f32 * zoom
        } else {
            0.0
        };

        let position = Point::new(
            target.anchor.x + self.settings.centering() + offset.x as f32 * zoom,
            target.anchor.y + target.jump + bob + offset.y as f32 * zoom,
        );

        Some(DrawCommand {
            source: CellRect::grid(column, 0, HAT_CELL, HAT_CELL),
            position,
            scale: self.settings.hat_scale,
            depth: layer_depth(target.world_y),
        })
    }

    /// Draw `target`'s hat into `batch`. Returns whether anything was drawn.
    pub fn draw<B: SpriteBatch + ?Sized>(&self, target: &DrawTarget<'_>, batch: &mut B) -> bool {
        let Some(texture) = self.registry.texture_by_name(target.hat) else {
            debug!(character = target.character, hat = target.hat, "Unknown hat, not drawing");
            return false;
        };
        match self.plan(target) {
            Some(command) => {
                batch.draw(texture, &command);
                true
            }
            None => false,
        }
    }
}
