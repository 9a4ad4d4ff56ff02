//! Configuration for the solver, playback pacing and terrain editing.
//!
//! Loaded from `basin_config.json` with support for an environment variable override.

use std::{
    env, fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const BUILTIN_BASIN_CONFIG: &str = include_str!("data/basin_config.json");

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasinConfig {
    pub solver: SolverConfig,
    pub playback: PlaybackConfig,
    pub editor: EditorConfig,
}

impl BasinConfig {
    pub fn builtin() -> Arc<Self> {
        Arc::new(
            serde_json::from_str(BUILTIN_BASIN_CONFIG).expect("builtin basin config should parse"),
        )
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_file(path: &Path) -> Result<Self, BasinConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| BasinConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let config = BasinConfig::from_json_str(&contents)?;
        Ok(config)
    }
}

#[derive(Debug, Error)]
pub enum BasinConfigError {
    #[error("failed to parse basin config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read basin config from {path:?}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// How much of the raw traversal shows up in the event stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceMode {
    /// Every push and every forced drain is reported, including repeats.
    Faithful,
    /// A cell already waiting on the work stack is not pushed again, and cells
    /// that are already dry are not zeroed again.
    #[default]
    Compact,
}

/// How the rim expansion loop finds its next minimal border cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RimSearchStrategy {
    /// Full row-major scan of the grid every round.
    #[default]
    LinearScan,
    /// Min-heap keyed by terrain height then scan index, with lazy invalidation.
    PriorityQueue,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub trace: TraceMode,
    pub rim_search: RimSearchStrategy,
}

/// Pacing for consumers that animate the solver one tick at a time.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Meaningful events applied per tick.
    pub events_per_tick: u32,
    /// Do not count `ExpandOver` / `NextMinimalBorder` toward the budget.
    pub skip_markers: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            events_per_tick: 1,
            skip_markers: true,
        }
    }
}

/// Limits applied by [`crate::TerrainEditor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub min_height: u32,
    pub max_height: u32,
    pub min_side: u32,
    pub max_side: u32,
    pub rows: u32,
    pub cols: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_height: 0,
            max_height: 40,
            min_side: 1,
            max_side: 30,
            rows: 10,
            cols: 10,
        }
    }
}

/// Where the active configuration came from.
#[derive(Debug, Clone, Default)]
pub struct BasinConfigMetadata {
    path: Option<PathBuf>,
}

impl BasinConfigMetadata {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }
}

/// Load configuration from `BASIN_CONFIG_PATH`, falling back to the builtin defaults.
pub fn load_basin_config_from_env() -> (Arc<BasinConfig>, BasinConfigMetadata) {
    let override_path = env::var("BASIN_CONFIG_PATH").ok().map(PathBuf::from);

    if let Some(path) = override_path {
        match BasinConfig::from_file(&path) {
            Ok(config) => {
                tracing::info!(
                    target: "basin::config",
                    path = %path.display(),
                    "basin_config.loaded=file"
                );
                return (Arc::new(config), BasinConfigMetadata::new(Some(path)));
            }
            Err(err) => {
                tracing::warn!(
                    target: "basin::config",
                    path = %path.display(),
                    error = %err,
                    "basin_config.load_failed"
                );
            }
        }
    }

    let config = BasinConfig::builtin();
    tracing::info!(target: "basin::config", "basin_config.loaded=builtin");
    (config, BasinConfigMetadata::new(None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_matches_defaults() {
        let builtin = BasinConfig::builtin();
        assert_eq!(*builtin, BasinConfig::default());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            BasinConfig::from_json_str(r#"{"solver": {"rim_search": "priority_queue"}}"#).unwrap();
        assert_eq!(config.solver.rim_search, RimSearchStrategy::PriorityQueue);
        assert_eq!(config.solver.trace, TraceMode::Compact);
        assert_eq!(config.playback.events_per_tick, 1);
        assert_eq!(config.editor.max_height, 40);
    }

    #[test]
    fn unknown_trace_mode_is_a_parse_error() {
        let err = BasinConfig::from_json_str(r#"{"solver": {"trace": "verbose"}}"#);
        assert!(err.is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let path = Path::new("/nonexistent/basin_config.json");
        match BasinConfig::from_file(path) {
            Err(BasinConfigError::ReadFailed { path: reported, .. }) => {
                assert_eq!(reported, path);
            }
            other => panic!("expected read failure, got {other:?}"),
        }
    }
}
