use std::{cmp::Reverse, collections::BinaryHeap};

use crate::{config::RimSearchStrategy, grid::Cell, grid::GridState};

/// Lowest dry cell currently holding back a higher neighbouring pool.
///
/// Ties on terrain height go to the first cell in row-major order. Returns
/// `None` once no cell qualifies, which is the convergence signal.
pub fn find_minimal_border(state: &GridState) -> Option<Cell> {
    let mut best: Option<(u32, Cell)> = None;
    for cell in state.terrain().cells() {
        if !state.is_rim_candidate(cell) {
            continue;
        }
        let height = state.height(cell);
        if best.map_or(true, |(best_height, _)| height < best_height) {
            best = Some((height, cell));
        }
    }
    best.map(|(_, cell)| cell)
}

pub(crate) enum RimSearch {
    LinearScan,
    PriorityQueue(RimQueue),
}

impl RimSearch {
    pub(crate) fn new(strategy: RimSearchStrategy, state: &GridState) -> Self {
        match strategy {
            RimSearchStrategy::LinearScan => RimSearch::LinearScan,
            RimSearchStrategy::PriorityQueue => RimSearch::PriorityQueue(RimQueue::new(state)),
        }
    }

    /// Called whenever the solver dries a cell.
    pub(crate) fn note_dry(&mut self, state: &GridState, cell: Cell) {
        if let RimSearch::PriorityQueue(queue) = self {
            queue.push(state, cell);
        }
    }

    pub(crate) fn next_border(&mut self, state: &GridState) -> Option<Cell> {
        match self {
            RimSearch::LinearScan => find_minimal_border(state),
            RimSearch::PriorityQueue(queue) => queue.peek_candidate(state),
        }
    }
}

/// Dry cells ordered by `(terrain height, row-major index)`.
///
/// Entries are validated lazily. A dry cell that stops being a candidate can
/// never become one again (surfaces only fall, dry cells stay dry), so a stale
/// entry is discarded for good.
pub(crate) struct RimQueue {
    heap: BinaryHeap<Reverse<(u32, usize)>>,
}

impl RimQueue {
    fn new(state: &GridState) -> Self {
        let terrain = state.terrain();
        let heap = terrain
            .cells()
            .filter(|&cell| state.is_dry(cell))
            .map(|cell| Reverse((terrain.height(cell), terrain.index(cell))))
            .collect();
        Self { heap }
    }

    fn push(&mut self, state: &GridState, cell: Cell) {
        let terrain = state.terrain();
        self.heap
            .push(Reverse((terrain.height(cell), terrain.index(cell))));
    }

    fn peek_candidate(&mut self, state: &GridState) -> Option<Cell> {
        while let Some(&Reverse((_, index))) = self.heap.peek() {
            let cell = state.terrain().cell_at(index);
            if state.is_rim_candidate(cell) {
                return Some(cell);
            }
            self.heap.pop();
        }
        None
    }
}
