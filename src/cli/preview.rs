//! Preview command implementation

use image::RgbaImage;
use std::path::Path;
use std::process::ExitCode;

use crate::config::HatrackConfig;
use crate::direction::Direction;
use crate::output::{save_png, scale_by, CanvasBatch};
use crate::renderer::{DrawTarget, Point, RenderSettings};
use crate::spritesheet::{crop_cell, mirror, CellRect, CHARACTER_CELL_HEIGHT, CHARACTER_CELL_WIDTH};

use super::{display_path, started_overlay, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Canvas geometry for one previewed character.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PreviewLayout {
    pub width: u32,
    pub height: u32,
    /// Top-left of the zoomed character sprite
    pub sprite_origin: (i64, i64),
    /// Host draw origin: the sprite's left edge, half a sprite below its top
    pub anchor: Point,
}

impl PreviewLayout {
    pub(crate) fn new(settings: &RenderSettings) -> Self {
        let zoom = settings.zoom;
        let sprite_w = (CHARACTER_CELL_WIDTH as f32 * zoom).round() as i64;
        let sprite_h = (CHARACTER_CELL_HEIGHT as f32 * zoom).round() as i64;
        // Room for a hat pushed a full sprite width sideways or half a sprite upward
        let margin_x = sprite_w;
        let margin_top = sprite_h;

        Self {
            width: (sprite_w + 2 * margin_x) as u32,
            height: (sprite_h + margin_top) as u32,
            sprite_origin: (margin_x, margin_top),
            anchor: Point::new(margin_x as f32, (margin_top + sprite_h / 2) as f32),
        }
    }
}

/// The standing frame for `direction`, oriented to face it.
pub(crate) fn standing_frame(sheet: &RgbaImage, direction: Direction) -> RgbaImage {
    let rect = CellRect::grid(
        direction.character_sheet_column(),
        0,
        CHARACTER_CELL_WIDTH,
        CHARACTER_CELL_HEIGHT,
    );
    let frame = crop_cell(sheet, rect);
    if direction == Direction::Right {
        mirror(&frame)
    } else {
        frame
    }
}

/// Execute the preview command
pub fn run_preview(
    config: HatrackConfig,
    name: &str,
    hat: &str,
    direction: &str,
    phase: u32,
    output: &Path,
) -> ExitCode {
    let Some(direction) = Direction::parse(direction) else {
        eprintln!("Error: Unknown direction '{}' (use up, down, left, right or 0-3)", direction);
        return ExitCode::from(EXIT_INVALID_ARGS);
    };

    let overlay = started_overlay(config);
    if overlay.registry().get_by_name(hat).is_none() {
        eprintln!("Error: Unknown hat '{}'", hat);
        let known: Vec<&str> = overlay.registry().assets().iter().map(|a| a.name.as_str()).collect();
        if !known.is_empty() {
            eprintln!("Known hats: {}", known.join(", "));
        }
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let sheet_path = overlay.config().paths.character_sheets.join(format!("{}.png", name));
    let sheet = match image::open(&sheet_path) {
        Ok(img) => img.to_rgba8(),
        Err(e) => {
            eprintln!("Error: Cannot read '{}': {}", sheet_path.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let renderer = overlay.renderer();
    let settings = *renderer.settings();
    let layout = PreviewLayout::new(&settings);

    let mut batch = CanvasBatch::new(layout.width, layout.height);
    let sprite = scale_by(&standing_frame(&sheet, direction), settings.zoom);
    batch.blit(&sprite, layout.sprite_origin.0, layout.sprite_origin.1);

    let target = DrawTarget {
        character: name,
        facing: direction.ordinal(),
        anchor: layout.anchor,
        world_y: 0.0,
        phase,
        bob: None,
        jump: 0.0,
        hat,
    };
    renderer.draw(&target, &mut batch);

    match save_png(&batch.into_image(), output) {
        Ok(()) => {
            println!("Saved: {}", display_path(output));
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: Failed to save '{}': {}", output.display(), e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
