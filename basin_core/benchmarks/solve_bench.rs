use basin_core::{random_terrain, FloodSolver, RimSearchStrategy, SolverConfig};
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve");

    for size in [8u32, 16, 32, 48] {
        let terrain = random_terrain(size, size, 40, 0x5EED).expect("bench terrain");
        for strategy in [RimSearchStrategy::LinearScan, RimSearchStrategy::PriorityQueue] {
            let config = SolverConfig {
                rim_search: strategy,
                ..SolverConfig::default()
            };
            group.bench_with_input(
                BenchmarkId::new(format!("{strategy:?}"), size),
                &terrain,
                |b, terrain| {
                    b.iter_batched(
                        || FloodSolver::with_config(terrain.clone(), config),
                        |solver| solver.solve(),
                        BatchSize::SmallInput,
                    )
                },
            );
        }
    }

    group.finish();
}

criterion_group!(solve_benches, bench_solve);
criterion_main!(solve_benches);
