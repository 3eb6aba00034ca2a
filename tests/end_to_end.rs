//! Library-level tests across discovery, analysis, calibration and rendering
//!
//! Each test builds a throwaway asset tree in a temp directory and drives
//! the public API the way a host would.

use image::{Rgba, RgbaImage};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use hatrack::analyze::{analyze, HeadTopAnalyzer};
use hatrack::config::HatrackConfig;
use hatrack::direction::Direction;
use hatrack::offsets::{DirectionalOffsets, Offset, OffsetStore};
use hatrack::output::{icon_path, save_png, CanvasBatch};
use hatrack::overlay::{CharacterFrame, HatOverlay};
use hatrack::registry::AssetRegistry;
use hatrack::renderer::{CompositeRenderer, DrawCommand, DrawTarget, Point, RenderSettings, SpriteBatch};

const OPAQUE: Rgba<u8> = Rgba([200, 40, 40, 255]);

#[derive(Default)]
struct RecordingBatch {
    commands: Vec<DrawCommand>,
}

impl SpriteBatch for RecordingBatch {
    fn draw(&mut self, _texture: &RgbaImage, command: &DrawCommand) {
        self.commands.push(*command);
    }
}

/// A 64x16 hat sheet with each cell tinted by its column.
fn hat_sheet() -> RgbaImage {
    RgbaImage::from_fn(64, 16, |x, _| Rgba([(x / 16 * 60) as u8, 100, 50, 255]))
}

/// A 64x32 character sheet whose head starts at `row` in every column.
fn character_sheet(row: u32) -> RgbaImage {
    let mut sheet = RgbaImage::new(64, 32);
    for x in 0..64 {
        for y in row..32 {
            sheet.put_pixel(x, y, OPAQUE);
        }
    }
    sheet
}

fn config_in(dir: &Path) -> HatrackConfig {
    let mut config = HatrackConfig::default();
    config.paths.assets = dir.join("assets");
    config.paths.character_sheets = dir.join("Characters");
    config.paths.offsets = dir.join("hat_offsets.json");
    config.paths.generated_offsets = dir.join("generated_offsets.json");
    config.paths.assignments = dir.join("npc_hats.json");
    config.analysis.roster = vec!["Alex".to_string()];
    config
}

fn write_hats(dir: &Path, stems: &[&str]) {
    fs::create_dir_all(dir).unwrap();
    for stem in stems {
        hat_sheet().save(dir.join(format!("{}.png", stem))).unwrap();
    }
}

fn digest(path: &Path) -> Vec<u8> {
    Sha256::digest(fs::read(path).unwrap()).to_vec()
}

#[test]
fn test_item_variant_collapses_into_one_hat() {
    let tmp = TempDir::new().unwrap();
    let assets = tmp.path().join("assets");
    write_hats(&assets, &["pumpkin-hat", "pumpkin-hat-item"]);

    let mut registry = AssetRegistry::new();
    let names: Vec<String> = registry.discover(&assets).iter().map(|a| a.name.clone()).collect();

    assert_eq!(names, vec!["Pumpkin Hat".to_string()]);
    assert!(registry.skipped().is_empty());
}

#[test]
fn test_rediscovery_is_deterministic() {
    let tmp = TempDir::new().unwrap();
    let assets = tmp.path().join("assets");
    write_hats(&assets, &["top_hat", "fez", "wizard-cap", "pumpkin-hat"]);

    let export = |out: &Path| -> Vec<(String, PathBuf)> {
        let mut registry = AssetRegistry::new();
        registry.discover(&assets);
        registry
            .assets()
            .iter()
            .map(|asset| {
                let path = icon_path(out, asset.id, &asset.name);
                save_png(&asset.icon, &path).unwrap();
                (format!("{} {}", asset.id, asset.name), path)
            })
            .collect()
    };

    let first = export(&tmp.path().join("icons_a"));
    let second = export(&tmp.path().join("icons_b"));

    let labels = |run: &[(String, PathBuf)]| run.iter().map(|(l, _)| l.clone()).collect::<Vec<_>>();
    assert_eq!(labels(&first), labels(&second));
    assert_eq!(first[0].0, "950 Fez");
    for ((_, a), (_, b)) in first.iter().zip(&second) {
        assert_eq!(digest(a), digest(b));
    }
}

#[test]
fn test_head_at_row_ten_gives_minus_twenty_facing_down() {
    let sheet = character_sheet(10);
    let offsets = analyze(sheet.as_raw(), sheet.width()).unwrap();

    assert_eq!(offsets.down, Offset::new(0, -20));
    assert_eq!(offsets.up, Offset::new(0, -20));
    assert_eq!(offsets.left, Offset::new(0, -19));
    assert_eq!(offsets.right, Offset::new(0, -19));
}

#[test]
fn test_analyze_roster_skips_missing_sheets() {
    let tmp = TempDir::new().unwrap();
    let sheets = tmp.path().join("Characters");
    fs::create_dir_all(&sheets).unwrap();
    character_sheet(12).save(sheets.join("Alex.png")).unwrap();

    let results = HeadTopAnalyzer::new(&sheets).analyze_roster(&["Alex", "Ghost"]);
    assert_eq!(results.len(), 1);
    assert_eq!(results["Alex"].down, Offset::new(0, -18));
}

#[test]
fn test_offsets_survive_save_and_reload() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("nested").join("hat_offsets.json");

    let mut store = OffsetStore::new();
    store.entry("Abigail").left = Offset::new(2, -11);
    store.insert("Sam", DirectionalOffsets::uniform(Offset::new(-1, -9)));
    store.save(&path).unwrap();

    let loaded = OffsetStore::load(&path, DirectionalOffsets::default()).unwrap();
    assert_eq!(loaded.entries(), store.entries());
    assert_eq!(loaded.resolve("Abigail", Direction::Left), Offset::new(2, -11));
    assert_eq!(loaded.resolve("Nobody", Direction::Up), Offset::new(0, -8));
}

#[test]
fn test_absent_and_explicit_defaults_draw_identically() {
    let mut registry = AssetRegistry::new();
    registry.register("Fez", PathBuf::from("fez.png"), hat_sheet()).unwrap();

    let mut store = OffsetStore::new();
    store.insert("Explicit", DirectionalOffsets::default());

    let renderer = CompositeRenderer::new(&registry, &store, RenderSettings::default());
    let mut batch = RecordingBatch::default();
    for character in ["Explicit", "Absent"] {
        for facing in 0..4 {
            let target = DrawTarget {
                character,
                facing,
                anchor: Point::new(100.0, 200.0),
                world_y: 640.0,
                phase: 3,
                bob: None,
                jump: -4.0,
                hat: "Fez",
            };
            assert!(renderer.draw(&target, &mut batch));
        }
    }

    let (explicit, absent) = batch.commands.split_at(4);
    assert_eq!(explicit, absent);
    // anchor + centering + jump + bob + default offset
    assert_eq!(explicit[2].position, Point::new(108.0, 200.0 - 4.0 + 4.0 - 32.0));
}

#[test]
fn test_overlay_frame_composites_onto_canvas() {
    let tmp = TempDir::new().unwrap();
    let config = config_in(tmp.path());
    write_hats(&config.paths.assets, &["fez"]);

    let mut overlay = HatOverlay::new(config);
    overlay.startup();
    overlay.give_hat("Alex", "Fez").unwrap();

    let frames = [
        CharacterFrame::standing("Alex", 2, Point::new(16.0, 64.0), 100.0),
        CharacterFrame::standing("Bare", 2, Point::new(16.0, 64.0), 100.0),
    ];
    let mut batch = CanvasBatch::new(96, 96);
    assert_eq!(overlay.render_frame(&frames, &mut batch), 1);
    assert_eq!(batch.draws(), 1);

    // Down uses sheet column 0; the hat lands at (16+8, 64-32) scaled 3x
    let canvas = batch.into_image();
    assert_eq!(*canvas.get_pixel(24, 32), Rgba([0, 100, 50, 255]));
    assert_eq!(canvas.get_pixel(23, 32)[3], 0);
    assert_eq!(canvas.get_pixel(24 + 47, 32 + 47)[3], 255);
}

#[test]
fn test_analyze_then_promote_then_persist_assignments() {
    let tmp = TempDir::new().unwrap();
    let config = config_in(tmp.path());
    write_hats(&config.paths.assets, &["fez"]);
    fs::create_dir_all(&config.paths.character_sheets).unwrap();
    character_sheet(10).save(config.paths.character_sheets.join("Alex.png")).unwrap();

    let mut overlay = HatOverlay::new(config.clone());
    overlay.startup();
    let (count, _) = overlay.analyze().unwrap();
    assert_eq!(count, 1);
    assert!(overlay.offsets().get("Alex").is_none());

    assert_eq!(overlay.promote_generated().unwrap(), 1);
    assert_eq!(overlay.offsets().resolve("Alex", Direction::Down), Offset::new(0, -20));

    overlay.give_hat("Alex", "Fez").unwrap();
    overlay.session_saved().unwrap();

    let mut restarted = HatOverlay::new(config);
    restarted.startup();
    assert_eq!(restarted.assignments().hat_for("Alex"), Some("Fez"));
    assert_eq!(restarted.offsets().resolve("Alex", Direction::Down), Offset::new(0, -20));
}
