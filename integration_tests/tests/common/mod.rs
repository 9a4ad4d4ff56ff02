#![allow(dead_code)]

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::path::PathBuf;
use std::sync::Once;

use basin_core::{Cell, RimSearchStrategy, SolverConfig, TerrainGrid, TraceMode};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

static INIT: Once = Once::new();

pub fn ensure_test_config() {
    INIT.call_once(|| {
        let config_path = fixture_path("test_basin_config.json");

        debug_assert!(
            config_path.exists(),
            "missing test basin config at {}",
            config_path.display()
        );

        std::env::set_var("BASIN_CONFIG_PATH", &config_path);
    });
}

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Every trace mode paired with every rim search strategy.
pub fn all_solver_configs() -> [SolverConfig; 4] {
    let mut configs = [SolverConfig::default(); 4];
    let modes = [TraceMode::Compact, TraceMode::Faithful];
    let strategies = [RimSearchStrategy::LinearScan, RimSearchStrategy::PriorityQueue];
    for (slot, config) in configs.iter_mut().enumerate() {
        config.trace = modes[slot / 2];
        config.rim_search = strategies[slot % 2];
    }
    configs
}

/// Small grids with few distinct heights, so ties and plateaus are common.
pub fn random_grid(rng: &mut ChaCha8Rng) -> TerrainGrid {
    let rows = rng.gen_range(1..=8);
    let cols = rng.gen_range(1..=8);
    let max_height = rng.gen_range(0..=7);
    let heights = (0..rows * cols)
        .map(|_| rng.gen_range(0..=max_height))
        .collect();
    TerrainGrid::from_flat(rows, cols, heights).expect("random grid is rectangular")
}

/// Resting depths computed independently with a priority flood from the edge.
///
/// The water level of a cell is the lowest possible maximum height along any
/// path from it to the edge of the grid.
pub fn reference_depths(terrain: &TerrainGrid) -> Vec<u32> {
    let mut level = vec![u32::MAX; terrain.len()];
    let mut heap = BinaryHeap::new();
    for cell in terrain.border_cells() {
        let index = terrain.index(cell);
        level[index] = terrain.height(cell);
        heap.push(Reverse((level[index], index)));
    }

    while let Some(Reverse((current, index))) = heap.pop() {
        if current > level[index] {
            continue;
        }
        let cell: Cell = terrain.cell_at(index);
        for next in terrain.neighbors(cell).iter() {
            let next_index = terrain.index(next);
            let candidate = current.max(terrain.height(next));
            if candidate < level[next_index] {
                level[next_index] = candidate;
                heap.push(Reverse((candidate, next_index)));
            }
        }
    }

    terrain
        .heights()
        .iter()
        .zip(&level)
        .map(|(&height, &level)| level - height)
        .collect()
}
