//! Criterion benchmarks for building census queries on a crowded server.
//!
//! Benchmarks:
//!   - radius count around a base cupboard
//!   - membership count over a base's decay entities
//!   - full placement assessment (classify, resolve, count, evaluate)
//!
//! Run with: cargo bench --bench census_bench

use bevy::math::Vec3;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use turret_limits::census::BuildingCensus;
use turret_limits::limits::{assess_placement, PlacementAttempt};
use turret_limits::resources::PlayerOverrideStore;
use turret_limits::settings::GlobalConfig;
use turret_limits::world::{Layer, StructureWorld};
use turret_limits::{BuildingId, StructureClass};

const AUTO: &str = "assets/prefabs/npc/autoturret/autoturret_deployed.prefab";
const FLAME: &str = "assets/prefabs/npc/flame turret/flameturret.deployed.prefab";
const WALL: &str = "assets/prefabs/building/wall.external.high.stone/wall.external.high.stone.prefab";

/// 20x20 bases 150u apart, each with a mix of turrets and walls.
fn crowded_world() -> (StructureWorld, BuildingId, Vec3) {
    let mut world = StructureWorld::default();
    let mut target_base = None;
    for gx in 0..20 {
        for gz in 0..20 {
            let center = Vec3::new(gx as f32 * 150.0, 0.0, gz as f32 * 150.0);
            let building = world.place_cupboard(gx * 100 + gz, center);
            for i in 0..24 {
                let angle = i as f32 * 0.2618;
                let offset = Vec3::new(angle.cos(), 0.0, angle.sin()) * (8.0 + i as f32 * 1.5);
                let prefab = match i % 3 {
                    0 => AUTO,
                    1 => FLAME,
                    _ => WALL,
                };
                let _ = world.place_structure(prefab, center + offset, Layer::Deployed);
            }
            if gx == 10 && gz == 10 {
                target_base = Some((building, center));
            }
        }
    }
    let (building, center) = target_base.unwrap_or((BuildingId(1), Vec3::ZERO));
    (world, building, center)
}

// ---------------------------------------------------------------------------
// Benchmark: raw census queries
// ---------------------------------------------------------------------------

fn bench_census_counts(c: &mut Criterion) {
    let mut group = c.benchmark_group("census_count");
    let (world, building, center) = crowded_world();

    group.bench_function("radius_auto_turret", |b| {
        b.iter(|| {
            black_box(world.count_by_radius(StructureClass::AutoTurret, black_box(center), 30.0, building))
        });
    });

    group.bench_function("membership_flame_turret", |b| {
        b.iter(|| black_box(world.count_by_membership(StructureClass::FlameTurret, black_box(building))));
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark: end-to-end placement assessment
// ---------------------------------------------------------------------------

fn bench_assess_placement(c: &mut Criterion) {
    let mut group = c.benchmark_group("assess_placement");
    let (world, _, center) = crowded_world();
    let config = GlobalConfig::default();
    let overrides = PlayerOverrideStore::default();
    let owner = 10 * 100 + 10;

    for (name, prefab) in [("auto_turret", AUTO), ("flame_turret", FLAME), ("non_turret", WALL)] {
        let attempt = PlacementAttempt {
            player_id: owner,
            is_admin: false,
            player_position: center,
            prefab,
            target: center + Vec3::new(2.0, 0.0, 2.0),
        };
        group.bench_function(name, |b| {
            b.iter(|| black_box(assess_placement(black_box(&attempt), &world, &config, &overrides)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_census_counts, bench_assess_placement);
criterion_main!(benches);
