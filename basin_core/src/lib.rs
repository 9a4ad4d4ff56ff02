//! Core crate for the Basin trapped-water solver.
//!
//! Computes how much water rests above every cell of a heightmap and exposes
//! the computation as an ordered stream of [`FloodEvent`]s, so callers can
//! animate it step by step or drain it in one call.

pub mod config;
mod editor;
mod events;
mod grid;
pub mod metrics;
pub mod playback;
mod rim_search;
mod snapshot;
mod solver;
mod terrain_gen;

pub use config::{
    load_basin_config_from_env, BasinConfig, BasinConfigError, BasinConfigMetadata, EditorConfig,
    PlaybackConfig, RimSearchStrategy, SolverConfig, TraceMode,
};
pub use editor::{EditError, TerrainEditor};
pub use events::FloodEvent;
pub use grid::{Cell, GridState, Neighbors, TerrainError, TerrainGrid};
pub use metrics::{SolveMetrics, TraceFingerprint};
pub use playback::{
    build_headless_app, finish_flood, run_tick, start_flood, ActiveFlood, BasinPlugin,
    FloodStepped, WaterSurface,
};
pub use rim_search::find_minimal_border;
pub use snapshot::{DepthChange, DepthSnapshot};
pub use solver::{FloodSolver, SolverPhase};
pub use terrain_gen::{random_terrain, random_terrain_for};
