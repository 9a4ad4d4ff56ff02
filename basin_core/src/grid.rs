use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Position of a single terrain cell.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Cell {
    pub row: u32,
    pub col: u32,
}

impl Cell {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TerrainError {
    #[error("terrain grid has no cells")]
    Empty,
    #[error("terrain row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("terrain of {rows}x{cols} cannot hold {len} heights")]
    Size { rows: u32, cols: u32, len: usize },
    #[error("terrain of {rows}x{cols} does not fit u32 sides")]
    TooLarge { rows: usize, cols: usize },
}

/// Immutable rectangular heightmap.
///
/// Heights are stored row-major and shared behind an [`Arc`], so cloning a grid
/// for a new solver or an observer never copies the terrain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u32>>", into = "Vec<Vec<u32>>")]
pub struct TerrainGrid {
    rows: u32,
    cols: u32,
    heights: Arc<Vec<u32>>,
}

impl TerrainGrid {
    /// Build a grid from rows of heights. Every row must have the same length.
    pub fn from_rows<R: AsRef<[u32]>>(rows: &[R]) -> Result<Self, TerrainError> {
        let expected = rows.first().map(|row| row.as_ref().len()).unwrap_or(0);
        if expected == 0 {
            return Err(TerrainError::Empty);
        }
        let (row_count, col_count) = checked_shape(rows.len(), expected)?;

        let mut heights = Vec::with_capacity(rows.len() * expected);
        for (row_index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != expected {
                return Err(TerrainError::Ragged {
                    row: row_index,
                    expected,
                    found: row.len(),
                });
            }
            heights.extend_from_slice(row);
        }

        Ok(Self {
            rows: row_count,
            cols: col_count,
            heights: Arc::new(heights),
        })
    }

    /// Build a grid from row-major heights.
    pub fn from_flat(rows: u32, cols: u32, heights: Vec<u32>) -> Result<Self, TerrainError> {
        if rows == 0 || cols == 0 {
            return Err(TerrainError::Empty);
        }
        if heights.len() != (rows as usize) * (cols as usize) {
            return Err(TerrainError::Size {
                rows,
                cols,
                len: heights.len(),
            });
        }
        Ok(Self {
            rows,
            cols,
            heights: Arc::new(heights),
        })
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    #[inline]
    pub fn index(&self, cell: Cell) -> usize {
        debug_assert!(self.contains(cell), "cell {cell} outside terrain");
        cell.row as usize * self.cols as usize + cell.col as usize
    }

    #[inline]
    pub fn cell_at(&self, index: usize) -> Cell {
        debug_assert!(index < self.heights.len());
        let cols = self.cols as usize;
        Cell::new((index / cols) as u32, (index % cols) as u32)
    }

    #[inline]
    pub fn height(&self, cell: Cell) -> u32 {
        self.heights[self.index(cell)]
    }

    pub fn heights(&self) -> &[u32] {
        &self.heights
    }

    pub fn max_height(&self) -> u32 {
        self.heights.iter().copied().max().unwrap_or(0)
    }

    /// All cells in row-major scan order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.heights.len()).map(move |index| self.cell_at(index))
    }

    /// In-bounds cells one step away along a single axis.
    ///
    /// Order is fixed: row above, row below, column left, column right.
    pub fn neighbors(&self, cell: Cell) -> Neighbors {
        debug_assert!(self.contains(cell), "cell {cell} outside terrain");
        let mut neighbors = Neighbors::default();
        if cell.row > 0 {
            neighbors.push(Cell::new(cell.row - 1, cell.col));
        }
        if cell.row + 1 < self.rows {
            neighbors.push(Cell::new(cell.row + 1, cell.col));
        }
        if cell.col > 0 {
            neighbors.push(Cell::new(cell.row, cell.col - 1));
        }
        if cell.col + 1 < self.cols {
            neighbors.push(Cell::new(cell.row, cell.col + 1));
        }
        neighbors
    }

    /// Every cell on the outer rim, each exactly once.
    ///
    /// Scan order: first and last column of every row top to bottom, then the
    /// first row and the last row left to right. Corners appear at their first
    /// occurrence only.
    pub fn border_cells(&self) -> Vec<Cell> {
        let mut seen = vec![false; self.heights.len()];
        let mut border = Vec::with_capacity(2 * (self.rows as usize + self.cols as usize));
        let mut visit = |cell: Cell, border: &mut Vec<Cell>| {
            let index = self.index(cell);
            if !seen[index] {
                seen[index] = true;
                border.push(cell);
            }
        };

        let last_row = self.rows - 1;
        let last_col = self.cols - 1;
        for row in 0..self.rows {
            visit(Cell::new(row, 0), &mut border);
            visit(Cell::new(row, last_col), &mut border);
        }
        for row in [0, last_row] {
            for col in 0..self.cols {
                visit(Cell::new(row, col), &mut border);
            }
        }
        border
    }

    pub fn to_rows(&self) -> Vec<Vec<u32>> {
        self.heights
            .chunks(self.cols as usize)
            .map(|row| row.to_vec())
            .collect()
    }
}

fn checked_shape(rows: usize, cols: usize) -> Result<(u32, u32), TerrainError> {
    match (u32::try_from(rows), u32::try_from(cols)) {
        (Ok(rows), Ok(cols)) => Ok((rows, cols)),
        _ => Err(TerrainError::TooLarge { rows, cols }),
    }
}

impl TryFrom<Vec<Vec<u32>>> for TerrainGrid {
    type Error = TerrainError;

    fn try_from(rows: Vec<Vec<u32>>) -> Result<Self, Self::Error> {
        TerrainGrid::from_rows(&rows)
    }
}

impl From<TerrainGrid> for Vec<Vec<u32>> {
    fn from(grid: TerrainGrid) -> Self {
        grid.to_rows()
    }
}

/// Up to four orthogonal neighbors of a cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Neighbors {
    cells: [Cell; 4],
    len: usize,
}

impl Neighbors {
    fn push(&mut self, cell: Cell) {
        self.cells[self.len] = cell;
        self.len += 1;
    }

    pub fn as_slice(&self) -> &[Cell] {
        &self.cells[..self.len]
    }

    pub fn get(&self, index: usize) -> Option<Cell> {
        self.as_slice().get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.as_slice().iter().copied()
    }
}

/// Terrain plus the mutable water depth above every cell.
///
/// Depth starts at the pessimistic bound `max(terrain) - terrain[p]`, i.e. the
/// whole grid flooded to its highest point. Only the solver mutates it.
#[derive(Debug, Clone)]
pub struct GridState {
    terrain: TerrainGrid,
    depth: Vec<u32>,
}

impl GridState {
    pub fn new(terrain: TerrainGrid) -> Self {
        let max = terrain.max_height();
        let depth = terrain.heights().iter().map(|&h| max - h).collect();
        Self { terrain, depth }
    }

    pub fn terrain(&self) -> &TerrainGrid {
        &self.terrain
    }

    #[inline]
    pub fn height(&self, cell: Cell) -> u32 {
        self.terrain.height(cell)
    }

    #[inline]
    pub fn depth(&self, cell: Cell) -> u32 {
        self.depth[self.terrain.index(cell)]
    }

    pub fn depths(&self) -> &[u32] {
        &self.depth
    }

    /// Terrain height plus water depth.
    #[inline]
    pub fn surface(&self, cell: Cell) -> u32 {
        self.height(cell) + self.depth(cell)
    }

    #[inline]
    pub fn is_dry(&self, cell: Cell) -> bool {
        self.depth(cell) == 0
    }

    pub fn neighbors(&self, cell: Cell) -> Neighbors {
        self.terrain.neighbors(cell)
    }

    /// A dry cell holding back a neighbouring pool whose surface is above it.
    pub fn is_rim_candidate(&self, cell: Cell) -> bool {
        if !self.is_dry(cell) {
            return false;
        }
        let height = self.height(cell);
        self.neighbors(cell)
            .iter()
            .any(|next| !self.is_dry(next) && self.surface(next) > height)
    }

    pub(crate) fn set_depth(&mut self, cell: Cell, depth: u32) {
        let index = self.terrain.index(cell);
        let current = self.depth[index];
        debug_assert!(
            depth <= current,
            "depth at {cell} must not rise ({current} -> {depth})"
        );
        self.depth[index] = depth;
    }
}
