//! Benchmarks for battle resolution.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use conquest_core::army::{Composition, UnitStatTable, UnitType};
use conquest_core::battle::{prepare_attacker, prepare_defender, simulate_battle, AttackRequest, BattleEngine};
use conquest_core::campaign::{TerrainType, Tile, TileGrid};
use conquest_core::core::{PlayerId, TileCoord};
use conquest_core::data::GameData;

fn army(size: u32) -> Composition {
    Composition::new()
        .with(UnitType::Militia, size)
        .with(UnitType::Archer, size / 2)
        .with(UnitType::Cavalry, size / 4)
}

fn bench_simulate_battle(c: &mut Criterion) {
    let catalog = UnitStatTable::standard();
    let attacker = prepare_attacker(&army(1000), &catalog, &[]);
    let defender = prepare_defender(&army(1200), &catalog, 0.2);

    c.bench_function("simulate_battle_1000v1200", |b| {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        b.iter(|| {
            let sim = simulate_battle(black_box(attacker.clone()), black_box(defender.clone()), &mut rng);
            black_box(sim)
        });
    });
}

fn bench_resolve_battle(c: &mut Criterion) {
    let home = TileCoord::new(0, 0);
    let target = TileCoord::new(1, 0);
    let request = AttackRequest::new(PlayerId(1), home, target, army(400));

    c.bench_function("resolve_battle_with_report", |b| {
        let mut engine = BattleEngine::with_seed(GameData::standard(), 42);
        b.iter(|| {
            let mut map = TileGrid::new();
            map.insert(Tile::new(home, TerrainType::City).with_owner(PlayerId(1)));
            map.insert(
                Tile::new(target, TerrainType::Forest)
                    .with_owner(PlayerId(2))
                    .with_garrison(army(300)),
            );
            let report = engine.resolve_battle(&mut map, black_box(&request));
            black_box(report)
        });
    });
}

criterion_group!(benches, bench_simulate_battle, bench_resolve_battle);
criterion_main!(benches);
