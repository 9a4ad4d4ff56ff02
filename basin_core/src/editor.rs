use thiserror::Error;

use crate::{
    config::{EditorConfig, SolverConfig},
    grid::{Cell, TerrainError, TerrainGrid},
    snapshot::DepthSnapshot,
    solver::FloodSolver,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("cell {cell} is outside the {rows}x{cols} terrain")]
    OutOfBounds { cell: Cell, rows: u32, cols: u32 },
    #[error("terrain size {rows}x{cols} is outside the allowed {min}..={max} cells per side")]
    SizeLimit {
        rows: i64,
        cols: i64,
        min: u32,
        max: u32,
    },
}

/// Editable heightmap.
///
/// Solvers never see the editor's buffer: every solve starts from a fresh
/// [`TerrainGrid`] snapshot, so editing while a solver runs cannot disturb it.
#[derive(Debug, Clone)]
pub struct TerrainEditor {
    limits: EditorConfig,
    rows: u32,
    cols: u32,
    heights: Vec<u32>,
}

impl TerrainEditor {
    /// Flat terrain at `min_height` with the configured default size.
    pub fn new(limits: EditorConfig) -> Self {
        let len = limits.rows as usize * limits.cols as usize;
        Self {
            limits,
            rows: limits.rows,
            cols: limits.cols,
            heights: vec![limits.min_height; len],
        }
    }

    /// Start from existing terrain, clamping heights into the editor limits.
    pub fn from_terrain(terrain: &TerrainGrid, limits: EditorConfig) -> Self {
        let heights = terrain
            .heights()
            .iter()
            .map(|&h| clamp_height(&limits, h as i64))
            .collect();
        Self {
            limits,
            rows: terrain.rows(),
            cols: terrain.cols(),
            heights,
        }
    }

    pub fn limits(&self) -> &EditorConfig {
        &self.limits
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    fn index(&self, cell: Cell) -> Result<usize, EditError> {
        if cell.row >= self.rows || cell.col >= self.cols {
            return Err(EditError::OutOfBounds {
                cell,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(cell.row as usize * self.cols as usize + cell.col as usize)
    }

    pub fn height(&self, cell: Cell) -> Result<u32, EditError> {
        Ok(self.heights[self.index(cell)?])
    }

    /// Raise or lower one cell, clamped to the configured height range.
    pub fn adjust_height(&mut self, cell: Cell, delta: i32) -> Result<u32, EditError> {
        let index = self.index(cell)?;
        let updated = clamp_height(&self.limits, self.heights[index] as i64 + delta as i64);
        self.heights[index] = updated;
        Ok(updated)
    }

    pub fn set_height(&mut self, cell: Cell, height: u32) -> Result<u32, EditError> {
        let index = self.index(cell)?;
        let updated = clamp_height(&self.limits, height as i64);
        self.heights[index] = updated;
        Ok(updated)
    }

    /// Grow or shrink the grid. New cells are padded at `min_height`.
    pub fn resize(&mut self, d_rows: i32, d_cols: i32) -> Result<(), EditError> {
        let rows = self.rows as i64 + d_rows as i64;
        let cols = self.cols as i64 + d_cols as i64;
        let (min, max) = (self.limits.min_side.max(1), self.limits.max_side);
        let allowed = (min as i64)..=(max as i64);
        if !allowed.contains(&rows) || !allowed.contains(&cols) {
            return Err(EditError::SizeLimit {
                rows,
                cols,
                min,
                max,
            });
        }

        let (rows, cols) = (rows as u32, cols as u32);
        let mut heights = vec![self.limits.min_height; rows as usize * cols as usize];
        let (old_cols, new_cols) = (self.cols as usize, cols as usize);
        for row in 0..rows.min(self.rows) as usize {
            for col in 0..cols.min(self.cols) as usize {
                heights[row * new_cols + col] = self.heights[row * old_cols + col];
            }
        }

        tracing::debug!(
            target: "basin::editor",
            from_rows = self.rows,
            from_cols = self.cols,
            rows,
            cols,
            "terrain.resized"
        );
        self.rows = rows;
        self.cols = cols;
        self.heights = heights;
        Ok(())
    }

    /// Immutable copy of the current terrain.
    pub fn snapshot(&self) -> Result<TerrainGrid, TerrainError> {
        TerrainGrid::from_flat(self.rows, self.cols, self.heights.clone())
    }

    /// Depths a viewer shows while editing: the flooded upper bound.
    pub fn preview(&self) -> Result<DepthSnapshot, TerrainError> {
        Ok(DepthSnapshot::flooded(&self.snapshot()?))
    }

    /// New solver over the current terrain.
    pub fn solver(&self, config: SolverConfig) -> Result<FloodSolver, TerrainError> {
        Ok(FloodSolver::with_config(self.snapshot()?, config))
    }
}

fn clamp_height(limits: &EditorConfig, height: i64) -> u32 {
    let max = limits.max_height.max(limits.min_height);
    height.clamp(limits.min_height as i64, max as i64) as u32
}
