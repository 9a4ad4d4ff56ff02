//! Trapped-water solver exposed as a pull-based event stream.
//!
//! The solver first drains every pool connected to the open edge of the grid,
//! then repeatedly breaches the lowest dry cell that holds back a higher pool
//! and lowers everything reachable behind it to that level. Each call to
//! [`Iterator::next`] performs at most one write to the depth grid, so the
//! state observed between events is always consistent.

use std::{hash::Hasher, iter::FusedIterator};

use crate::{
    config::{SolverConfig, TraceMode},
    events::FloodEvent,
    grid::{Cell, GridState, TerrainError, TerrainGrid},
    metrics::{SolveMetrics, TraceFingerprint},
    rim_search::RimSearch,
    snapshot::DepthSnapshot,
};

/// Coarse solver state: `Draining → Scanning ⇄ Expanding → Converged`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverPhase {
    Draining,
    Scanning,
    Expanding,
    Converged,
}

/// Resume point between two events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Seed,
    DrainPop,
    DrainZero(Cell),
    DrainNeighbors { cell: Cell, next: usize },
    Scan,
    ExpandPop,
    ExpandSettle(Cell),
    ExpandNeighbors { cell: Cell, next: usize },
    Converged,
}

pub struct FloodSolver {
    state: GridState,
    config: SolverConfig,
    cursor: Cursor,
    border: Vec<Cell>,
    border_next: usize,
    stack: Vec<Cell>,
    queued: Vec<bool>,
    level: u32,
    rim: RimSearch,
    metrics: SolveMetrics,
    fingerprint: TraceFingerprint,
}

impl FloodSolver {
    pub fn new(terrain: TerrainGrid) -> Self {
        Self::with_config(terrain, SolverConfig::default())
    }

    pub fn with_config(terrain: TerrainGrid, config: SolverConfig) -> Self {
        let border = terrain.border_cells();
        let cells = terrain.len();
        let state = GridState::new(terrain);
        let rim = RimSearch::new(config.rim_search, &state);

        tracing::debug!(
            target: "basin::solver",
            rows = state.terrain().rows(),
            cols = state.terrain().cols(),
            trace = ?config.trace,
            rim_search = ?config.rim_search,
            "solver.phase=draining"
        );

        Self {
            state,
            config,
            cursor: Cursor::Seed,
            border,
            border_next: 0,
            stack: Vec::new(),
            queued: vec![false; cells],
            level: 0,
            rim,
            metrics: SolveMetrics::default(),
            fingerprint: TraceFingerprint::new(),
        }
    }

    pub fn from_rows<R: AsRef<[u32]>>(rows: &[R]) -> Result<Self, TerrainError> {
        Ok(Self::new(TerrainGrid::from_rows(rows)?))
    }

    pub fn config(&self) -> SolverConfig {
        self.config
    }

    /// Read-only view of the grid. Observers never get mutable access.
    pub fn state(&self) -> &GridState {
        &self.state
    }

    pub fn terrain(&self) -> &TerrainGrid {
        self.state.terrain()
    }

    pub fn depth(&self, cell: Cell) -> u32 {
        self.state.depth(cell)
    }

    pub fn snapshot(&self) -> DepthSnapshot {
        DepthSnapshot::from_state(&self.state)
    }

    pub fn phase(&self) -> SolverPhase {
        match self.cursor {
            Cursor::Seed
            | Cursor::DrainPop
            | Cursor::DrainZero(_)
            | Cursor::DrainNeighbors { .. } => SolverPhase::Draining,
            Cursor::Scan => SolverPhase::Scanning,
            Cursor::ExpandPop | Cursor::ExpandSettle(_) | Cursor::ExpandNeighbors { .. } => {
                SolverPhase::Expanding
            }
            Cursor::Converged => SolverPhase::Converged,
        }
    }

    pub fn is_converged(&self) -> bool {
        self.cursor == Cursor::Converged
    }

    pub fn metrics(&self) -> SolveMetrics {
        self.metrics
    }

    /// Digest of every event emitted so far.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint.finish()
    }

    /// Pull the remaining events in one go.
    pub fn run_to_completion(&mut self) -> Vec<FloodEvent> {
        self.by_ref().collect()
    }

    /// Run to convergence and return the resting depths.
    pub fn solve(mut self) -> DepthSnapshot {
        self.by_ref().for_each(drop);
        self.snapshot()
    }

    pub fn into_state(self) -> GridState {
        self.state
    }

    fn advance(&mut self) -> Option<FloodEvent> {
        loop {
            match self.cursor {
                Cursor::Seed => {
                    let Some(&cell) = self.border.get(self.border_next) else {
                        tracing::debug!(
                            target: "basin::solver",
                            floods = self.metrics.drain_floods,
                            events = self.metrics.events,
                            "solver.phase=scanning"
                        );
                        self.cursor = Cursor::Scan;
                        continue;
                    };
                    self.border_next += 1;
                    if self.state.is_dry(cell) {
                        continue;
                    }
                    self.metrics.drain_floods += 1;
                    self.push(cell);
                    self.cursor = Cursor::DrainPop;
                }
                Cursor::DrainPop => match self.pop() {
                    Some(cell) => {
                        self.cursor = Cursor::DrainZero(cell);
                        return Some(FloodEvent::Select { cell });
                    }
                    None => self.cursor = Cursor::Seed,
                },
                Cursor::DrainZero(cell) => {
                    self.cursor = Cursor::DrainNeighbors { cell, next: 0 };
                    if let Some(event) = self.dry(cell) {
                        return Some(event);
                    }
                }
                Cursor::DrainNeighbors { cell, next } => {
                    let Some(neighbor) = self.state.neighbors(cell).get(next) else {
                        self.cursor = Cursor::DrainPop;
                        continue;
                    };
                    self.cursor = Cursor::DrainNeighbors {
                        cell,
                        next: next + 1,
                    };
                    // Water on terrain no lower than a drained cell escapes through it.
                    if !self.state.is_dry(neighbor)
                        && self.state.height(neighbor) >= self.state.height(cell)
                        && self.push(neighbor)
                    {
                        return Some(FloodEvent::ExpandOver { cell: neighbor });
                    }
                }
                Cursor::Scan => match self.rim.next_border(&self.state) {
                    Some(cell) => {
                        self.level = self.state.height(cell);
                        tracing::debug!(
                            target: "basin::solver",
                            round = self.metrics.rim_rounds + 1,
                            %cell,
                            level = self.level,
                            "solver.phase=expanding"
                        );
                        self.push(cell);
                        self.cursor = Cursor::ExpandPop;
                        return Some(FloodEvent::NextMinimalBorder { cell });
                    }
                    None => {
                        self.cursor = Cursor::Converged;
                        tracing::info!(
                            target: "basin::solver",
                            events = self.metrics.events,
                            rim_rounds = self.metrics.rim_rounds,
                            drain_floods = self.metrics.drain_floods,
                            lowerings = self.metrics.lowerings,
                            "solver.phase=converged"
                        );
                        return None;
                    }
                },
                Cursor::ExpandPop => match self.pop() {
                    Some(cell) => {
                        self.cursor = Cursor::ExpandSettle(cell);
                        return Some(FloodEvent::Select { cell });
                    }
                    None => self.cursor = Cursor::Scan,
                },
                Cursor::ExpandSettle(cell) => {
                    self.cursor = Cursor::ExpandNeighbors { cell, next: 0 };
                    let height = self.state.height(cell);
                    if height == self.level {
                        if let Some(event) = self.dry(cell) {
                            return Some(event);
                        }
                    } else {
                        // Only cells at or below the level are ever pushed.
                        let depth = self.level - height;
                        self.state.set_depth(cell, depth);
                        return Some(FloodEvent::LowerHeight { cell, depth });
                    }
                }
                Cursor::ExpandNeighbors { cell, next } => {
                    let Some(neighbor) = self.state.neighbors(cell).get(next) else {
                        self.cursor = Cursor::ExpandPop;
                        continue;
                    };
                    self.cursor = Cursor::ExpandNeighbors {
                        cell,
                        next: next + 1,
                    };
                    if self.state.height(neighbor) > self.level {
                        if let Some(event) = self.dry(neighbor) {
                            return Some(event);
                        }
                    } else if self.state.surface(neighbor) > self.level && self.push(neighbor) {
                        return Some(FloodEvent::ExpandOver { cell: neighbor });
                    }
                }
                Cursor::Converged => return None,
            }
        }
    }

    /// Returns false when compact tracing suppresses a repeat push.
    fn push(&mut self, cell: Cell) -> bool {
        let index = self.state.terrain().index(cell);
        if self.config.trace == TraceMode::Compact && self.queued[index] {
            return false;
        }
        self.queued[index] = true;
        self.stack.push(cell);
        true
    }

    fn pop(&mut self) -> Option<Cell> {
        let cell = self.stack.pop()?;
        let index = self.state.terrain().index(cell);
        self.queued[index] = false;
        Some(cell)
    }

    fn dry(&mut self, cell: Cell) -> Option<FloodEvent> {
        if self.config.trace == TraceMode::Compact && self.state.is_dry(cell) {
            return None;
        }
        self.state.set_depth(cell, 0);
        self.rim.note_dry(&self.state, cell);
        Some(FloodEvent::Zero { cell })
    }
}

impl Iterator for FloodSolver {
    type Item = FloodEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let event = self.advance()?;
        self.metrics.record(&event);
        self.fingerprint.record(&event);
        tracing::trace!(target: "basin::solver", %event, "solver.event");
        Some(event)
    }
}

impl FusedIterator for FloodSolver {}
