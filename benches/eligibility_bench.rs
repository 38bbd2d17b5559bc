//! Eligibility and step throughput over the shipped upgrades file.
//!
//! Run with: `cargo bench`
//! Results show mean time to evaluate every upgrade for one slot.

use std::path::PathBuf;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use mvm_upgrades::loadout::{load_loadout_fixture, LoadoutFixture, LoadoutSlot};
use mvm_upgrades::manager::UpgradeManager;
use mvm_upgrades::schema::StaticSchema;
use mvm_upgrades::settings::Settings;

fn shipped_manager() -> UpgradeManager<StaticSchema> {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let schema = StaticSchema::from_file(root.join("data/attributes.json"))
        .expect("shipped schema should load");
    let settings = Settings {
        content_root: root,
        ..Settings::default()
    };
    let mut manager = UpgradeManager::new(schema, settings);
    manager.load_default().expect("default upgrades should load");
    manager
}

fn loadout(name: &str) -> LoadoutFixture {
    let path = format!("{}/data/loadouts/{name}.yaml", env!("CARGO_MANIFEST_DIR"));
    load_loadout_fixture(&path).expect("loadout fixture should load")
}

fn bench_eligibility(c: &mut Criterion) {
    let manager = shipped_manager();
    let upgrades = manager.catalog().map_or(0, |catalog| catalog.len()) as u64;

    let mut group = c.benchmark_group("eligibility");
    group.throughput(Throughput::Elements(upgrades));
    for (name, slot) in [
        ("soldier", LoadoutSlot::Primary),
        ("medic", LoadoutSlot::Secondary),
        ("demoman", LoadoutSlot::Melee),
    ] {
        let fixture = loadout(name);
        group.bench_function(format!("{name}_{slot}"), |b| {
            b.iter(|| black_box(manager.eligible_indices(black_box(&fixture), slot)))
        });
    }
    group.finish();
}

fn bench_steps(c: &mut Criterion) {
    let manager = shipped_manager();
    let soldier = loadout("soldier");
    let indices = manager.eligible_indices(&soldier, LoadoutSlot::Primary);

    let mut group = c.benchmark_group("steps");
    group.throughput(Throughput::Elements(indices.len() as u64));
    group.bench_function("soldier_primary", |b| {
        b.iter(|| {
            for &index in &indices {
                black_box(manager.compute_step(&soldier, LoadoutSlot::Primary, index));
            }
        })
    });
    group.bench_function("index_of_attribute_memoized", |b| {
        b.iter(|| black_box(manager.index_of_attribute(black_box("building cost reduction"))))
    });
    group.finish();
}

criterion_group!(benches, bench_eligibility, bench_steps);
criterion_main!(benches);
