use serde::{Deserialize, Serialize};

use crate::{
    events::FloodEvent,
    grid::{Cell, GridState, TerrainGrid},
};

/// Owned copy of the water depth grid handed to observers.
///
/// A consumer that mirrors the solver (a renderer, the playback plugin) keeps
/// one of these and feeds it every event with [`DepthSnapshot::apply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthSnapshot {
    pub rows: u32,
    pub cols: u32,
    pub depth: Vec<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub selected: Option<Cell>,
}

/// One cell whose depth differs between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DepthChange {
    pub cell: Cell,
    pub from: u32,
    pub to: u32,
}

impl DepthSnapshot {
    pub fn from_state(state: &GridState) -> Self {
        let terrain = state.terrain();
        Self {
            rows: terrain.rows(),
            cols: terrain.cols(),
            depth: state.depths().to_vec(),
            selected: None,
        }
    }

    /// Depths before any solving: everything flooded to the highest terrain point.
    pub fn flooded(terrain: &TerrainGrid) -> Self {
        Self::from_state(&GridState::new(terrain.clone()))
    }

    fn index(&self, cell: Cell) -> usize {
        debug_assert!(cell.row < self.rows && cell.col < self.cols);
        cell.row as usize * self.cols as usize + cell.col as usize
    }

    pub fn depth(&self, cell: Cell) -> u32 {
        self.depth[self.index(cell)]
    }

    pub fn total_volume(&self) -> u64 {
        self.depth.iter().map(|&d| d as u64).sum()
    }

    pub fn max_depth(&self) -> u32 {
        self.depth.iter().copied().max().unwrap_or(0)
    }

    pub fn wet_cells(&self) -> usize {
        self.depth.iter().filter(|&&d| d > 0).count()
    }

    /// Mirror one solver event. Returns true when a depth changed.
    pub fn apply(&mut self, event: &FloodEvent) -> bool {
        match *event {
            FloodEvent::Select { cell } => {
                self.selected = Some(cell);
                false
            }
            FloodEvent::Zero { cell } => self.write(cell, 0),
            FloodEvent::LowerHeight { cell, depth } => self.write(cell, depth),
            FloodEvent::ExpandOver { .. } | FloodEvent::NextMinimalBorder { .. } => false,
        }
    }

    fn write(&mut self, cell: Cell, depth: u32) -> bool {
        let index = self.index(cell);
        let changed = self.depth[index] != depth;
        self.depth[index] = depth;
        changed
    }

    /// Cells whose depth changed since `previous`, in row-major order.
    pub fn diff(&self, previous: &DepthSnapshot) -> Vec<DepthChange> {
        debug_assert_eq!((self.rows, self.cols), (previous.rows, previous.cols));
        self.depth
            .iter()
            .zip(&previous.depth)
            .enumerate()
            .filter(|(_, (now, before))| now != before)
            .map(|(index, (&to, &from))| DepthChange {
                cell: Cell::new(
                    (index / self.cols as usize) as u32,
                    (index % self.cols as usize) as u32,
                ),
                from,
                to,
            })
            .collect()
    }

    pub fn to_rows(&self) -> Vec<Vec<u32>> {
        self.depth
            .chunks(self.cols as usize)
            .map(|row| row.to_vec())
            .collect()
    }
}
