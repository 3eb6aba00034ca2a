//! Head-top analysis of character sprite sheets
//!
//! Finds the first opaque row of each standing frame and turns it into a
//! vertical hat offset. Only vertical placement is inferred; `x` is always 0.

use image::RgbaImage;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::direction::Direction;
use crate::offsets::{DirectionalOffsets, Offset};
use crate::spritesheet::{CHARACTER_CELL_HEIGHT, CHARACTER_CELL_WIDTH};

/// Row reported for a frame with no opaque pixels.
pub const FALLBACK_HEAD_TOP_ROW: u32 = 8;

/// Bytes per RGBA8 pixel.
const BYTES_PER_PIXEL: usize = 4;

/// Villagers analysed when no roster is configured.
pub const DEFAULT_ROSTER: &[&str] = &[
    "Abigail", "Alex", "Caroline", "Clint", "Demetrius", "Dwarf", "Elliott", "Emily", "Evelyn",
    "George", "Gus", "Haley", "Harvey", "Jas", "Jodi", "Kent", "Krobus", "Leah", "Lewis", "Linus",
    "Marnie", "Maru", "Pam", "Penny", "Pierre", "Robin", "Sam", "Sandy", "Sebastian", "Shane",
    "Vincent", "Willy", "Wizard",
];

/// Error analysing one character
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AnalyzeError {
    /// Sheet could not be read or decoded
    #[error("Failed to load sprite sheet {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    /// Pixel buffer does not describe whole rows of the given width
    #[error("Pixel buffer of {len} bytes is not whole RGBA rows of width {width}")]
    BufferShape { len: usize, width: u32 },
}

/// Correction added to the raw head-top offset for each pose.
///
/// The topmost head pixel sits differently relative to where a hat looks
/// centred: front and back views by 2 pixels, profiles by 3.
pub fn head_correction(direction: Direction) -> i32 {
    match direction {
        Direction::Down | Direction::Up => 2,
        Direction::Left | Direction::Right => 3,
    }
}

/// First row in `0..32` of the 16-pixel band at `column` holding an opaque pixel.
///
/// Pixels beyond the buffer or the sheet width count as transparent.
pub fn find_head_top(pixels: &[u8], width: u32, column: u32) -> Option<u32> {
    let frame_x = column * CHARACTER_CELL_WIDTH;
    let stride = width as usize * BYTES_PER_PIXEL;

    for y in 0..CHARACTER_CELL_HEIGHT {
        for x in frame_x..(frame_x + CHARACTER_CELL_WIDTH).min(width) {
            let alpha_index = y as usize * stride + x as usize * BYTES_PER_PIXEL + 3;
            match pixels.get(alpha_index) {
                Some(&alpha) if alpha > 0 => return Some(y),
                Some(_) => {}
                None => return None,
            }
        }
    }
    None
}

/// Vertical offset for a head-top row seen in `direction`'s frame.
pub fn offset_for_head_top(head_top_row: u32, direction: Direction) -> Offset {
    let y = head_top_row as i32 - CHARACTER_CELL_HEIGHT as i32 + head_correction(direction);
    Offset::new(0, y)
}

/// Analyse a row-major RGBA8 buffer `width` pixels wide.
///
/// # Examples
///
/// ```
/// use hatrack::analyze::analyze;
///
/// // 64x32 sheet, Down frame's first opaque pixel on row 10
/// let mut pixels = vec![0u8; 64 * 32 * 4];
/// pixels[(10 * 64 + 5) * 4 + 3] = 255;
///
/// let offsets = analyze(&pixels, 64).unwrap();
/// assert_eq!((offsets.down.x, offsets.down.y), (0, -20));
/// ```
pub fn analyze(pixels: &[u8], width: u32) -> Result<DirectionalOffsets, AnalyzeError> {
    let row_bytes = width as usize * BYTES_PER_PIXEL;
    if row_bytes == 0 || pixels.is_empty() || pixels.len() % row_bytes != 0 {
        return Err(AnalyzeError::BufferShape {
            len: pixels.len(),
            width,
        });
    }

    let mut offsets = DirectionalOffsets::default();
    for direction in Direction::ALL {
        let column = direction.character_sheet_column();
        let row = find_head_top(pixels, width, column).unwrap_or_else(|| {
            warn!(%direction, column, "Frame is fully transparent, using row {}", FALLBACK_HEAD_TOP_ROW);
            FALLBACK_HEAD_TOP_ROW
        });
        *offsets.get_mut(direction) = offset_for_head_top(row, direction);
    }
    Ok(offsets)
}

/// Analyse a decoded sheet.
pub fn analyze_image(sheet: &RgbaImage) -> Result<DirectionalOffsets, AnalyzeError> {
    analyze(sheet.as_raw(), sheet.width())
}

/// Analyser over a directory of `<Name>.png` character sheets.
#[derive(Debug, Clone)]
pub struct HeadTopAnalyzer {
    sheet_dir: PathBuf,
}

impl HeadTopAnalyzer {
    pub fn new(sheet_dir: impl Into<PathBuf>) -> Self {
        Self {
            sheet_dir: sheet_dir.into(),
        }
    }

    pub fn sheet_dir(&self) -> &Path {
        &self.sheet_dir
    }

    /// Path of `name`'s sheet.
    pub fn sheet_path(&self, name: &str) -> PathBuf {
        self.sheet_dir.join(format!("{}.png", name))
    }

    /// Load and analyse one character's sheet.
    pub fn analyze_character(&self, name: &str) -> Result<DirectionalOffsets, AnalyzeError> {
        let path = self.sheet_path(name);
        let sheet = image::open(&path)
            .map_err(|source| AnalyzeError::Load {
                path: path.clone(),
                source,
            })?
            .to_rgba8();
        analyze_image(&sheet)
    }

    /// Analyse every named character, leaving out the ones that fail.
    pub fn analyze_roster<S: AsRef<str>>(&self, names: &[S]) -> BTreeMap<String, DirectionalOffsets> {
        let mut results = BTreeMap::new();
        for name in names.iter().map(AsRef::as_ref) {
            match self.analyze_character(name) {
                Ok(offsets) => {
                    debug!(character = name, "Analyzed");
                    results.insert(name.to_string(), offsets);
                }
                Err(e) => warn!(character = name, "Failed to analyze: {}", e),
            }
        }
        info!(analyzed = results.len(), requested = names.len(), "Roster analysis finished");
        results
    }

    /// Names of every `*.png` sheet in the sheet directory, sorted.
    pub fn discover_roster(&self) -> Vec<String> {
        let pattern = self.sheet_dir.join("*.png");
        let mut names: Vec<String> = match glob::glob(&pattern.to_string_lossy()) {
            Ok(paths) => paths
                .filter_map(Result::ok)
                .filter_map(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
                .collect(),
            Err(e) => {
                warn!("Invalid sheet pattern {}: {}", pattern.display(), e);
                Vec::new()
            }
        };
        names.sort();
        names
    }
}
