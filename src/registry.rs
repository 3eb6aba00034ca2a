//! Hat asset registry
//!
//! Discovers hat sheets in a directory, assigns each a sequential [`HatId`],
//! derives a display name from the file name and crops a 16x16 icon.
//! Lookups by id or by display name never fail loudly; unknown keys are `None`.

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::spritesheet::{crop_cell, CellRect, HAT_CELL};

/// First id handed out by a discovery pass.
pub const DEFAULT_ID_BASE: u32 = 950;

/// File-name suffix marking an icon override of a sibling sheet.
pub const ITEM_SUFFIX: &str = "-item";

/// Extensions the registry will try to decode.
pub const IMAGE_EXTENSIONS: &[&str] =
    &["png", "jpg", "jpeg", "bmp", "gif", "tga", "webp", "ico", "tif", "tiff"];

/// Identifier of a registered hat.
///
/// Ids are only stable within one discovery pass; persisted data refers to
/// hats by display name instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HatId(pub u32);

impl fmt::Display for HatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for HatId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(HatId)
    }
}

/// What to do when two files derive the same display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameCollision {
    /// Rename the later asset "Name (2)", "Name (3)", ...
    #[default]
    Suffix,
    /// Skip the later asset
    Reject,
    /// Keep both assets; the name resolves to the later one
    Overwrite,
}

/// A discovered hat.
#[derive(Debug, Clone)]
pub struct HatAsset {
    pub id: HatId,
    pub name: String,
    pub path: PathBuf,
    /// Full sheet, one 16x16 cell per direction.
    pub texture: Arc<RgbaImage>,
    /// First cell of the sheet.
    pub icon: RgbaImage,
}

/// Why a single file was not registered
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AssetError {
    /// File I/O error
    #[error("Failed to read asset: {0}")]
    Io(#[from] io::Error),
    /// Image decoding error
    #[error("Failed to decode image: {0}")]
    Image(#[from] image::ImageError),
    /// Image cannot hold a single hat cell
    #[error("Image is {width}x{height}, smaller than one {cell}x{cell} cell")]
    TooSmall { width: u32, height: u32, cell: u32 },
    /// No id left between the configured base and `u32::MAX`
    #[error("No hat ids left after {base} ({registered} already registered)")]
    IdSpaceExhausted { base: u32, registered: usize },
    /// Display name already taken under the reject policy
    #[error("Display name '{0}' is already registered")]
    DuplicateName(String),
}

/// A file that discovery skipped, and why.
#[derive(Debug)]
pub struct SkippedAsset {
    pub path: PathBuf,
    pub error: AssetError,
}

/// Registry of discovered hats.
#[derive(Debug, Default)]
pub struct AssetRegistry {
    id_base: u32,
    collision: NameCollision,
    assets: Vec<HatAsset>,
    by_id: HashMap<HatId, usize>,
    by_name: HashMap<String, usize>,
    skipped: Vec<SkippedAsset>,
}

impl AssetRegistry {
    /// Create an empty registry with the default id base and collision policy.
    pub fn new() -> Self {
        Self::with_options(DEFAULT_ID_BASE, NameCollision::default())
    }

    pub fn with_options(id_base: u32, collision: NameCollision) -> Self {
        Self {
            id_base,
            collision,
            ..Self::default()
        }
    }

    /// Replace the registry contents with the hats found in `dir`.
    ///
    /// A missing directory is created and yields no hats. Files that fail to
    /// load are logged and listed in [`AssetRegistry::skipped`].
    pub fn discover(&mut self, dir: &Path) -> &[HatAsset] {
        self.clear();

        if !dir.exists() {
            if let Err(e) = fs::create_dir_all(dir) {
                warn!(dir = %dir.display(), "Failed to create asset directory: {}", e);
            }
            return &self.assets;
        }

        let candidates = match list_candidates(dir) {
            Ok(c) => c,
            Err(e) => {
                warn!(dir = %dir.display(), "Failed to list asset directory: {}", e);
                return &self.assets;
            }
        };

        for path in candidates {
            if let Err(error) = self.register_file(&path) {
                warn!(path = %path.display(), "Skipping hat: {}", error);
                self.skipped.push(SkippedAsset { path, error });
            }
        }

        info!(
            dir = %dir.display(),
            hats = self.assets.len(),
            skipped = self.skipped.len(),
            "Discovered hats"
        );
        &self.assets
    }

    /// Register an already-decoded sheet under a display name.
    ///
    /// Used by discovery; also handy for hosts that load textures themselves.
    pub fn register(
        &mut self,
        name: &str,
        path: PathBuf,
        texture: RgbaImage,
    ) -> Result<HatId, AssetError> {
        if texture.width() < HAT_CELL || texture.height() < HAT_CELL {
            return Err(AssetError::TooSmall {
                width: texture.width(),
                height: texture.height(),
                cell: HAT_CELL,
            });
        }

        let id = u32::try_from(self.assets.len())
            .ok()
            .and_then(|n| self.id_base.checked_add(n))
            .map(HatId)
            .ok_or(AssetError::IdSpaceExhausted {
                base: self.id_base,
                registered: self.assets.len(),
            })?;

        let name = match (self.by_name.contains_key(name), self.collision) {
            (false, _) | (true, NameCollision::Overwrite) => name.to_string(),
            (true, NameCollision::Reject) => return Err(AssetError::DuplicateName(name.to_string())),
            (true, NameCollision::Suffix) => self.next_free_name(name),
        };
        if self.by_name.contains_key(&name) {
            warn!("Display name '{}' now refers to {}", name, path.display());
        }

        let icon = crop_cell(&texture, CellRect::grid(0, 0, HAT_CELL, HAT_CELL));
        let index = self.assets.len();

        debug!(%id, name = %name, "Registered hat");
        self.by_id.insert(id, index);
        self.by_name.insert(name.clone(), index);
        self.assets.push(HatAsset {
            id,
            name,
            path,
            texture: Arc::new(texture),
            icon,
        });
        Ok(id)
    }

    fn register_file(&mut self, path: &Path) -> Result<HatId, AssetError> {
        let texture = image::open(path)?.to_rgba8();
        let stem = path.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
        let name = display_name(&stem);
        self.register(&name, path.to_path_buf(), texture)
    }

    fn next_free_name(&self, name: &str) -> String {
        (2..)
            .map(|n| format!("{} ({})", name, n))
            .find(|candidate| !self.by_name.contains_key(candidate))
            .unwrap_or_else(|| name.to_string())
    }

    /// Forget every asset and skipped file.
    pub fn clear(&mut self) {
        self.assets.clear();
        self.by_id.clear();
        self.by_name.clear();
        self.skipped.clear();
    }

    /// Assets in discovery order.
    pub fn assets(&self) -> &[HatAsset] {
        &self.assets
    }

    pub fn skipped(&self) -> &[SkippedAsset] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn get(&self, id: HatId) -> Option<&HatAsset> {
        self.by_id.get(&id).map(|&i| &self.assets[i])
    }

    pub fn get_by_name(&self, name: &str) -> Option<&HatAsset> {
        self.by_name.get(name).map(|&i| &self.assets[i])
    }

    pub fn name_by_id(&self, id: HatId) -> Option<&str> {
        self.get(id).map(|a| a.name.as_str())
    }

    pub fn icon_by_id(&self, id: HatId) -> Option<&RgbaImage> {
        self.get(id).map(|a| &a.icon)
    }

    pub fn id_by_name(&self, name: &str) -> Option<HatId> {
        self.get_by_name(name).map(|a| a.id)
    }

    pub fn texture_by_name(&self, name: &str) -> Option<&Arc<RgbaImage>> {
        self.get_by_name(name).map(|a| &a.texture)
    }
}

/// Derive a display name from a file stem.
///
/// `-` and `_` separate words; each word gets an uppercase first letter.
///
/// ```
/// use hatrack::registry::display_name;
///
/// assert_eq!(display_name("pumpkin-hat"), "Pumpkin Hat");
/// assert_eq!(display_name("top_hat--deluxe"), "Top Hat Deluxe");
/// ```
pub fn display_name(stem: &str) -> String {
    stem.split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether `path` has an extension the registry tries to decode.
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Image files in `dir`, sorted by file name, minus `-item` icon overrides.
pub fn list_candidates(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_image_file(path))
        .collect();
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let stems: HashSet<String> = files.iter().filter_map(|p| file_stem(p)).collect();
    files.retain(|path| match file_stem(path).as_deref().and_then(|s| s.strip_suffix(ITEM_SUFFIX)) {
        Some(base) if stems.contains(base) => {
            debug!(path = %path.display(), "Skipping icon override");
            false
        }
        _ => true,
    });
    Ok(files)
}

fn file_stem(path: &Path) -> Option<String> {
    path.file_stem().map(|s| s.to_string_lossy().into_owned())
}
