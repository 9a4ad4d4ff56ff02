//! Randomised checks of the solver against an independent priority flood.

mod common;

use basin_core::{
    find_minimal_border, Cell, FloodEvent, FloodSolver, RimSearchStrategy, SolverConfig,
    SolverPhase, TerrainGrid, TraceFingerprint, TraceMode,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const CASES: usize = 300;

fn grids(seed: u64) -> impl Iterator<Item = TerrainGrid> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..CASES).map(move |_| common::random_grid(&mut rng))
}

#[test]
fn resting_depths_match_priority_flood() {
    for terrain in grids(0xB451) {
        let expected = common::reference_depths(&terrain);
        for config in common::all_solver_configs() {
            let depths = FloodSolver::with_config(terrain.clone(), config).solve();
            assert_eq!(
                depths.depth,
                expected,
                "{config:?} on {:?}",
                terrain.to_rows()
            );
        }
    }
}

#[test]
fn depth_only_decreases_one_cell_at_a_time() {
    for terrain in grids(0xD0E5) {
        for config in common::all_solver_configs() {
            let mut solver = FloodSolver::with_config(terrain.clone(), config);
            let mut previous = solver.snapshot();
            while let Some(event) = solver.next() {
                let current = solver.snapshot();
                let changes = current.diff(&previous);
                assert!(changes.len() <= 1, "{event} changed {changes:?}");
                for change in &changes {
                    assert!(change.to < change.from, "{event} raised {change:?}");
                    assert_eq!(change.cell, event.cell());
                }
                if !event.is_mutation() {
                    assert!(changes.is_empty(), "marker {event} wrote a depth");
                }
                previous = current;
            }
        }
    }
}

/// Mutation events that leave the depth unchanged, or lower a cell to a depth
/// no smaller than its previous `LowerHeight`.
fn repeated_writes(terrain: &TerrainGrid, config: SolverConfig) -> Vec<FloodEvent> {
    let mut solver = FloodSolver::with_config(terrain.clone(), config);
    let mut last_lowered: Vec<Option<u32>> = vec![None; terrain.len()];
    let mut repeats = Vec::new();
    loop {
        let before = solver.snapshot();
        let Some(event) = solver.next() else {
            break;
        };
        let Some(depth) = event.depth_update() else {
            continue;
        };
        let cell = event.cell();
        let index = terrain.index(cell);
        let mut repeated = before.depth(cell) == depth;
        if let FloodEvent::LowerHeight { .. } = event {
            repeated |= last_lowered[index].is_some_and(|last| depth >= last);
            last_lowered[index] = Some(depth);
        }
        if repeated {
            repeats.push(event);
        }
    }
    repeats
}

#[test]
fn compact_writes_always_change_the_depth() {
    for terrain in grids(0xC0DE) {
        for rim_search in [RimSearchStrategy::LinearScan, RimSearchStrategy::PriorityQueue] {
            let config = SolverConfig {
                trace: TraceMode::Compact,
                rim_search,
            };
            let repeats = repeated_writes(&terrain, config);
            assert!(
                repeats.is_empty(),
                "{config:?} repeated {repeats:?} on {:?}",
                terrain.to_rows()
            );
        }
    }
}

#[test]
fn only_faithful_trace_repeats_writes() {
    let terrain = TerrainGrid::from_rows(&[
        [0u32, 6, 6, 2, 1],
        [6, 3, 1, 4, 3],
        [5, 0, 4, 0, 6],
        [4, 5, 5, 4, 5],
        [5, 4, 5, 4, 6],
        [2, 2, 6, 0, 6],
    ])
    .expect("valid terrain");
    let faithful = SolverConfig {
        trace: TraceMode::Faithful,
        ..SolverConfig::default()
    };

    let repeats = repeated_writes(&terrain, faithful);
    assert!(repeats.contains(&FloodEvent::LowerHeight {
        cell: Cell::new(2, 3),
        depth: 4
    }));
    assert!(repeats
        .iter()
        .any(|event| matches!(event, FloodEvent::Zero { .. })));
    assert!(repeated_writes(&terrain, SolverConfig::default()).is_empty());

    assert_eq!(
        FloodSolver::with_config(terrain.clone(), faithful).solve(),
        FloodSolver::new(terrain).solve()
    );
}

#[test]
fn border_is_dry_once_draining_ends() {
    for terrain in grids(0xB0D3) {
        for config in common::all_solver_configs() {
            let mut solver = FloodSolver::with_config(terrain.clone(), config);
            while solver.phase() == SolverPhase::Draining && solver.next().is_some() {}

            let state = solver.state();
            for cell in terrain.border_cells() {
                assert!(state.is_dry(cell), "border {cell} still wet after draining");
            }
        }
    }
}

#[test]
fn converged_state_is_a_fixed_point() {
    for terrain in grids(0xF1C5) {
        let mut solver = FloodSolver::new(terrain.clone());
        let events = solver.run_to_completion();

        assert!(solver.is_converged());
        assert_eq!(find_minimal_border(solver.state()), None);
        assert!(
            solver.metrics().rim_rounds as usize <= terrain.len(),
            "each rim round dries at least its rim cell"
        );

        let mut rerun = FloodSolver::new(terrain.clone());
        assert_eq!(rerun.run_to_completion(), events);
    }
}

#[test]
fn rim_strategies_emit_identical_traces() {
    for terrain in grids(0x5CA7) {
        for trace in [TraceMode::Compact, TraceMode::Faithful] {
            let linear = SolverConfig {
                trace,
                rim_search: RimSearchStrategy::LinearScan,
            };
            let queued = SolverConfig {
                rim_search: RimSearchStrategy::PriorityQueue,
                ..linear
            };
            let a: Vec<FloodEvent> = FloodSolver::with_config(terrain.clone(), linear).collect();
            let b: Vec<FloodEvent> = FloodSolver::with_config(terrain.clone(), queued).collect();
            assert_eq!(TraceFingerprint::of(&a), TraceFingerprint::of(&b));
            assert_eq!(a, b, "{:?}", terrain.to_rows());
        }
    }
}

#[test]
fn compact_trace_is_never_longer() {
    for terrain in grids(0xC0A7) {
        let compact = FloodSolver::new(terrain.clone()).count();
        let faithful = FloodSolver::with_config(
            terrain.clone(),
            SolverConfig {
                trace: TraceMode::Faithful,
                ..SolverConfig::default()
            },
        )
        .count();
        assert!(compact <= faithful, "{:?}", terrain.to_rows());
    }
}
