//! Criterion benchmarks for Hatrack critical paths
//!
//! Benchmarks the operations a host hits every frame or every startup:
//! - Analyzer: head-top scan over character sheets
//! - Renderer: draw planning for a crowd of characters
//! - Registry: display names and candidate filtering

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hatrack::analyze::analyze;
use hatrack::offsets::{DirectionalOffsets, Offset, OffsetStore};
use hatrack::registry::{display_name, AssetRegistry};
use hatrack::renderer::{CompositeRenderer, DrawTarget, Point, RenderSettings};
use image::{Rgba, RgbaImage};
use std::path::PathBuf;

// =============================================================================
// Test Data Generators
// =============================================================================

/// A 64x32 character sheet, head starting at `row`.
fn make_character_sheet(row: u32) -> RgbaImage {
    RgbaImage::from_fn(64, 32, |_, y| {
        if y >= row {
            Rgba([180, 140, 120, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

fn make_names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("Villager{}", i)).collect()
}

// =============================================================================
// Analyzer Benchmarks
// =============================================================================

fn bench_analyzer(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyzer");

    for row in [0u32, 10, 31] {
        let sheet = make_character_sheet(row);
        group.bench_with_input(BenchmarkId::new("analyze", row), &sheet, |b, sheet| {
            b.iter(|| analyze(black_box(sheet.as_raw()), sheet.width()))
        });
    }

    let empty = RgbaImage::new(64, 32);
    group.bench_function("analyze_transparent", |b| {
        b.iter(|| analyze(black_box(empty.as_raw()), empty.width()))
    });

    group.finish();
}

// =============================================================================
// Renderer Benchmarks
// =============================================================================

fn bench_renderer(c: &mut Criterion) {
    let mut group = c.benchmark_group("renderer");

    let mut registry = AssetRegistry::new();
    registry
        .register("Pumpkin Hat", PathBuf::from("pumpkin-hat.png"), RgbaImage::new(64, 16))
        .ok();

    for size in [10usize, 100, 1000].iter() {
        let names = make_names(*size);
        let mut store = OffsetStore::new();
        for (i, name) in names.iter().enumerate() {
            store.insert(name.clone(), DirectionalOffsets::uniform(Offset::new(0, -(i as i32 % 12))));
        }
        let renderer = CompositeRenderer::new(&registry, &store, RenderSettings::default());

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("plan", size), &names, |b, names| {
            b.iter(|| {
                names
                    .iter()
                    .enumerate()
                    .filter_map(|(i, name)| {
                        renderer.plan(&DrawTarget {
                            character: name,
                            facing: (i % 4) as i32,
                            anchor: Point::new(i as f32, 64.0),
                            world_y: i as f32 * 16.0,
                            phase: i as u32,
                            bob: None,
                            jump: 0.0,
                            hat: "Pumpkin Hat",
                        })
                    })
                    .count()
            })
        });
    }

    group.finish();
}

// =============================================================================
// Registry Benchmarks
// =============================================================================

fn bench_registry(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry");

    group.bench_function("display_name_short", |b| b.iter(|| display_name(black_box("fez"))));
    group.bench_function("display_name_long", |b| {
        b.iter(|| display_name(black_box("very_fancy-top--hat_with-a_feather")))
    });

    group.finish();
}

criterion_group!(benches, bench_analyzer, bench_renderer, bench_registry);
criterion_main!(benches);
