use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{
    config::EditorConfig,
    grid::{TerrainError, TerrainGrid},
};

/// Uniform random heightmap with heights in `0..=max_height`.
///
/// The same seed always yields the same terrain.
pub fn random_terrain(
    rows: u32,
    cols: u32,
    max_height: u32,
    seed: u64,
) -> Result<TerrainGrid, TerrainError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let len = rows as usize * cols as usize;
    let heights = (0..len).map(|_| rng.gen_range(0..=max_height)).collect();
    TerrainGrid::from_flat(rows, cols, heights)
}

/// Random heightmap sized and bounded by the editor limits.
pub fn random_terrain_for(editor: &EditorConfig, seed: u64) -> Result<TerrainGrid, TerrainError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let len = editor.rows as usize * editor.cols as usize;
    let max_height = editor.max_height.max(editor.min_height);
    let heights = (0..len)
        .map(|_| rng.gen_range(editor.min_height..=max_height))
        .collect();
    TerrainGrid::from_flat(editor.rows, editor.cols, heights)
}
