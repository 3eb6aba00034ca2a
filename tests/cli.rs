//! CLI integration tests for the hatrack binary
//!
//! These tests run the binary against a temp directory described by a
//! generated hatrack.toml and check exit codes, stdout and written files.

use image::{Rgba, RgbaImage};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

fn hatrack_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_hatrack"))
}

/// Lay out assets, sheets and a config file; returns the config path.
fn workspace(dir: &Path) -> PathBuf {
    let assets = dir.join("assets");
    let sheets = dir.join("Characters");
    fs::create_dir_all(&assets).unwrap();
    fs::create_dir_all(&sheets).unwrap();

    RgbaImage::from_pixel(64, 16, Rgba([90, 60, 20, 255]))
        .save(assets.join("pumpkin-hat.png"))
        .unwrap();
    RgbaImage::from_pixel(16, 16, Rgba([1, 1, 1, 255]))
        .save(assets.join("pumpkin-hat-item.png"))
        .unwrap();

    let mut sheet = RgbaImage::new(64, 32);
    for x in 0..64 {
        for y in 10..32 {
            sheet.put_pixel(x, y, Rgba([180, 140, 120, 255]));
        }
    }
    sheet.save(sheets.join("Alex.png")).unwrap();

    let quoted = |p: PathBuf| format!("{:?}", p.display().to_string());
    let config = format!(
        "[paths]\nassets = {}\ncharacter_sheets = {}\noffsets = {}\ngenerated_offsets = {}\nassignments = {}\n\n[analysis]\nroster = [\"Alex\", \"Ghost\"]\n",
        quoted(assets),
        quoted(sheets),
        quoted(dir.join("hat_offsets.json")),
        quoted(dir.join("generated_offsets.json")),
        quoted(dir.join("npc_hats.json")),
    );
    let path = dir.join("hatrack.toml");
    fs::write(&path, config).unwrap();
    path
}

fn run(config: &Path, args: &[&str]) -> Output {
    Command::new(hatrack_binary())
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute hatrack")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_discover_lists_one_pumpkin_hat() {
    let tmp = TempDir::new().unwrap();
    let config = workspace(tmp.path());

    let output = run(&config, &["discover"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let text = stdout(&output);
    assert_eq!(text.matches("Pumpkin Hat").count(), 1, "stdout: {}", text);
    assert!(text.contains("950"));
    assert!(!text.contains("Item"));
}

#[test]
fn test_discover_writes_icons() {
    let tmp = TempDir::new().unwrap();
    let config = workspace(tmp.path());
    let icons = tmp.path().join("icons");

    let output = run(&config, &["discover", "--icons", icons.to_str().unwrap(), "--scale", "2"]);
    assert!(output.status.success());

    let icon = image::open(icons.join("950_pumpkin-hat.png")).unwrap();
    assert_eq!((icon.width(), icon.height()), (32, 32));
}

#[test]
fn test_analyze_writes_generated_offsets_and_promote_applies_them() {
    let tmp = TempDir::new().unwrap();
    let config = workspace(tmp.path());

    let output = run(&config, &["analyze"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout(&output).contains("Analyzed 1 of 2 characters"));
    assert!(tmp.path().join("generated_offsets.json").exists());
    assert!(!tmp.path().join("hat_offsets.json").exists());

    let output = run(&config, &["promote"]);
    assert!(output.status.success());

    let live: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(tmp.path().join("hat_offsets.json")).unwrap()).unwrap();
    assert_eq!(live["Alex"]["down"]["y"], -20);
    assert_eq!(live["Alex"]["left"]["y"], -19);
}

#[test]
fn test_promote_without_analysis_fails() {
    let tmp = TempDir::new().unwrap();
    let config = workspace(tmp.path());

    let output = run(&config, &["promote"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_adjust_saves_and_show_reports() {
    let tmp = TempDir::new().unwrap();
    let config = workspace(tmp.path());

    let output = run(&config, &["adjust", "Alex", "down", "y", "-2"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let output = run(&config, &["show", "Alex"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("y=-10"), "stdout: {}", text);
    assert!(!text.contains("(defaults)"));
}

#[test]
fn test_adjust_rejects_bad_axis() {
    let tmp = TempDir::new().unwrap();
    let config = workspace(tmp.path());

    let output = run(&config, &["adjust", "Alex", "down", "z", "1"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(!tmp.path().join("hat_offsets.json").exists());
}

#[test]
fn test_adjust_past_integer_range_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let config = workspace(tmp.path());

    let output = run(&config, &["adjust", "Alex", "down", "y", "-2147483647"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("offset range"));
    assert!(!tmp.path().join("hat_offsets.json").exists());
}

#[test]
fn test_give_list_remove() {
    let tmp = TempDir::new().unwrap();
    let config = workspace(tmp.path());

    assert!(run(&config, &["give", "Alex", "Pumpkin Hat"]).status.success());
    let listed = stdout(&run(&config, &["hats"]));
    assert!(listed.contains("Alex") && listed.contains("Pumpkin Hat"));

    assert!(run(&config, &["remove", "Alex"]).status.success());
    assert!(stdout(&run(&config, &["hats"])).contains("Nobody is wearing a hat"));
}

#[test]
fn test_give_refused_and_unknown() {
    let tmp = TempDir::new().unwrap();
    let config = workspace(tmp.path());

    assert_eq!(run(&config, &["give", "Wizard", "Pumpkin Hat"]).status.code(), Some(1));
    assert_eq!(run(&config, &["give", "Alex", "Crown"]).status.code(), Some(1));
}

#[test]
fn test_preview_renders_png() {
    let tmp = TempDir::new().unwrap();
    let config = workspace(tmp.path());
    let out = tmp.path().join("out").join("alex.png");

    let output = run(
        &config,
        &["preview", "Alex", "--hat", "Pumpkin Hat", "--direction", "left", "-o", out.to_str().unwrap()],
    );
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let image = image::open(&out).unwrap().to_rgba8();
    assert_eq!(image.dimensions(), (192, 256));
    // Hat top-left: anchor (64, 192) + centering 8, default y -8 * zoom 4
    assert_eq!(*image.get_pixel(72, 160), Rgba([90, 60, 20, 255]));
}

#[test]
fn test_console_reads_commands() {
    let tmp = TempDir::new().unwrap();
    let config = workspace(tmp.path());

    let mut child = Command::new(hatrack_binary())
        .arg("--config")
        .arg(&config)
        .arg("console")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn hatrack");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"adjust Alex left x 3\nbogus\nsave\nquit\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Alex left is now x=3 y=-8"), "stdout: {}", text);
    assert!(text.contains("Saved offsets"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error"));
    assert!(tmp.path().join("hat_offsets.json").exists());
}

#[test]
fn test_invalid_config_exits_with_usage_code() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("hatrack.toml");
    fs::write(&path, "[render]\nzoom = 0.0\n").unwrap();

    assert_eq!(run(&path, &["hats"]).status.code(), Some(2));
}
