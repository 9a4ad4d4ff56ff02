use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grid::Cell;

/// One step of the solver.
///
/// `Zero` and `LowerHeight` mutate the depth grid; the other variants are
/// markers that let an observer follow the traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FloodEvent {
    Select { cell: Cell },
    Zero { cell: Cell },
    LowerHeight { cell: Cell, depth: u32 },
    ExpandOver { cell: Cell },
    NextMinimalBorder { cell: Cell },
}

impl FloodEvent {
    pub fn cell(&self) -> Cell {
        match *self {
            FloodEvent::Select { cell }
            | FloodEvent::Zero { cell }
            | FloodEvent::LowerHeight { cell, .. }
            | FloodEvent::ExpandOver { cell }
            | FloodEvent::NextMinimalBorder { cell } => cell,
        }
    }

    /// New depth written by this event, if it writes one.
    pub fn depth_update(&self) -> Option<u32> {
        match *self {
            FloodEvent::Zero { .. } => Some(0),
            FloodEvent::LowerHeight { depth, .. } => Some(depth),
            _ => None,
        }
    }

    pub fn is_mutation(&self) -> bool {
        self.depth_update().is_some()
    }

    /// Events a paced consumer counts as visible progress.
    pub fn is_meaningful(&self) -> bool {
        matches!(
            self,
            FloodEvent::Select { .. } | FloodEvent::Zero { .. } | FloodEvent::LowerHeight { .. }
        )
    }

    pub(crate) fn tag(&self) -> u8 {
        match self {
            FloodEvent::Select { .. } => 0,
            FloodEvent::Zero { .. } => 1,
            FloodEvent::LowerHeight { .. } => 2,
            FloodEvent::ExpandOver { .. } => 3,
            FloodEvent::NextMinimalBorder { .. } => 4,
        }
    }
}

impl fmt::Display for FloodEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FloodEvent::Select { cell } => write!(f, "select {cell}"),
            FloodEvent::Zero { cell } => write!(f, "zero {cell}"),
            FloodEvent::LowerHeight { cell, depth } => write!(f, "lower {cell} -> {depth}"),
            FloodEvent::ExpandOver { cell } => write!(f, "expand {cell}"),
            FloodEvent::NextMinimalBorder { cell } => write!(f, "next-border {cell}"),
        }
    }
}
