use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use dune_hegemony::ai::Personality;
use dune_hegemony::core::config::MapSize;
use dune_hegemony::{GameState, MatchConfig};

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");

    for (label, size) in [
        ("small", MapSize::Small),
        ("medium", MapSize::Medium),
        ("large", MapSize::Large),
    ] {
        group.bench_with_input(BenchmarkId::new("map", label), &size, |b, &size| {
            b.iter_batched(
                || {
                    let config = MatchConfig {
                        map_size: size,
                        ai_count: 4,
                        personalities: vec![Personality::Swarm; 4],
                        ..MatchConfig::default()
                    };
                    let mut state = GameState::new(config).expect("valid config");
                    for faction in state.players.values_mut() {
                        faction.economy.earn(10_000, 5_000);
                    }
                    state
                },
                |mut state| {
                    state.run(50);
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(tick_benches, bench_tick);
criterion_main!(tick_benches);
