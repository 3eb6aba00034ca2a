//! PNG output, scaling, and an image-backed sprite batch

use image::imageops::{self, FilterType};
use image::RgbaImage;
use std::io;
use std::path::{Path, PathBuf};

use crate::registry::HatId;
use crate::renderer::{DrawCommand, SpriteBatch};
use crate::spritesheet::{crop_cell, TRANSPARENT};

/// Error type for output operations
#[derive(Debug)]
pub enum OutputError {
    /// IO error during file operations
    Io(io::Error),
    /// Image encoding error
    Image(image::ImageError),
}

impl std::fmt::Display for OutputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputError::Io(e) => write!(f, "IO error: {}", e),
            OutputError::Image(e) => write!(f, "Image error: {}", e),
        }
    }
}

impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OutputError::Io(e) => Some(e),
            OutputError::Image(e) => Some(e),
        }
    }
}

impl From<io::Error> for OutputError {
    fn from(e: io::Error) -> Self {
        OutputError::Io(e)
    }
}

impl From<image::ImageError> for OutputError {
    fn from(e: image::ImageError) -> Self {
        OutputError::Image(e)
    }
}

/// Save an RGBA image to a PNG file, creating parent directories.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    image.save(path)?;
    Ok(())
}

/// Scale image by integer factor using nearest-neighbor interpolation.
///
/// This preserves crisp pixel edges for pixel art.
pub fn scale_image(image: RgbaImage, factor: u8) -> RgbaImage {
    if factor <= 1 {
        return image;
    }
    let (w, h) = image.dimensions();
    imageops::resize(&image, w * factor as u32, h * factor as u32, FilterType::Nearest)
}

/// Scale by an arbitrary positive factor, nearest-neighbor, at least 1x1.
pub fn scale_by(image: &RgbaImage, factor: f32) -> RgbaImage {
    let (w, h) = image.dimensions();
    let new_w = ((w as f32 * factor).round() as u32).max(1);
    let new_h = ((h as f32 * factor).round() as u32).max(1);
    if (new_w, new_h) == (w, h) {
        return image.clone();
    }
    imageops::resize(image, new_w, new_h, FilterType::Nearest)
}

/// File name for a hat icon: `<id>_<slug>.png`.
///
/// ```
/// use hatrack::output::icon_path;
/// use hatrack::registry::HatId;
/// use std::path::Path;
///
/// let path = icon_path(Path::new("icons"), HatId(950), "Pumpkin Hat");
/// assert_eq!(path, Path::new("icons/950_pumpkin-hat.png"));
/// ```
pub fn icon_path(dir: &Path, id: HatId, name: &str) -> PathBuf {
    let slug: String = name
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-");
    dir.join(format!("{}_{}.png", id, slug))
}

/// A [`SpriteBatch`] that composites onto an in-memory canvas.
#[derive(Debug, Clone)]
pub struct CanvasBatch {
    canvas: RgbaImage,
    draws: usize,
}

impl CanvasBatch {
    /// Transparent canvas of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self::from_image(RgbaImage::from_pixel(width, height, TRANSPARENT))
    }

    /// Draw over an existing image.
    pub fn from_image(canvas: RgbaImage) -> Self {
        Self { canvas, draws: 0 }
    }

    /// Blit `image` with its top-left at (`x`, `y`); out-of-bounds parts are clipped.
    pub fn blit(&mut self, image: &RgbaImage, x: i64, y: i64) {
        imageops::overlay(&mut self.canvas, image, x, y);
    }

    pub fn draws(&self) -> usize {
        self.draws
    }

    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn into_image(self) -> RgbaImage {
        self.canvas
    }
}

impl SpriteBatch for CanvasBatch {
    fn draw(&mut self, texture: &RgbaImage, command: &DrawCommand) {
        let cell = crop_cell(texture, command.source);
        let scaled = scale_by(&cell, command.scale);
        self.blit(
            &scaled,
            command.position.x.round() as i64,
            command.position.y.round() as i64,
        );
        self.draws += 1;
    }
}
