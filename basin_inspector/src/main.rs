use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use basin_core::{
    load_basin_config_from_env, random_terrain, random_terrain_for, BasinConfig, FloodSolver,
    RimSearchStrategy, TerrainGrid, TraceMode,
};
use clap::{Parser, ValueEnum};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use tracing::info;

mod report;

#[derive(Parser, Debug)]
#[command(author, version, about = "Basin trapped-water inspector", long_about = None)]
struct Cli {
    /// JSON file holding the terrain as an array of rows.
    #[arg(long, conflicts_with = "random")]
    terrain: Option<PathBuf>,
    /// Generate random terrain of the given size, e.g. `12x20`.
    #[arg(long)]
    random: Option<GridSize>,
    /// Seed for random terrain.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Highest random height; defaults to the editor limit.
    #[arg(long)]
    max_height: Option<u32>,
    /// Configuration file. Falls back to `BASIN_CONFIG_PATH`, then the builtin defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, value_enum)]
    trace: Option<TraceArg>,
    #[arg(long, value_enum)]
    rim_search: Option<RimSearchArg>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Events)]
    output: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct GridSize {
    rows: u32,
    cols: u32,
}

impl FromStr for GridSize {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (rows, cols) = value
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected ROWSxCOLS, got `{value}`"))?;
        let parse = |part: &str| {
            part.trim()
                .parse::<u32>()
                .map_err(|err| format!("invalid size `{part}`: {err}"))
        };
        Ok(Self {
            rows: parse(rows)?,
            cols: parse(cols)?,
        })
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TraceArg {
    Faithful,
    Compact,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RimSearchArg {
    LinearScan,
    PriorityQueue,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One line per event, then the final grid.
    Events,
    /// One JSON object per event, then a summary object.
    Json,
    /// Final grid and metrics only.
    Summary,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let terrain = load_terrain(&cli, &config)?;

    let mut solver_config = config.solver;
    if let Some(trace) = cli.trace {
        solver_config.trace = match trace {
            TraceArg::Faithful => TraceMode::Faithful,
            TraceArg::Compact => TraceMode::Compact,
        };
    }
    if let Some(rim_search) = cli.rim_search {
        solver_config.rim_search = match rim_search {
            RimSearchArg::LinearScan => RimSearchStrategy::LinearScan,
            RimSearchArg::PriorityQueue => RimSearchStrategy::PriorityQueue,
        };
    }

    info!(
        rows = terrain.rows(),
        cols = terrain.cols(),
        trace = ?solver_config.trace,
        rim_search = ?solver_config.rim_search,
        "inspector.solving"
    );

    let mut solver = FloodSolver::with_config(terrain.clone(), solver_config);
    let mut stdout = std::io::stdout().lock();
    for (index, event) in solver.by_ref().enumerate() {
        match cli.output {
            OutputFormat::Events => report::write_event_line(&mut stdout, index, &event)?,
            OutputFormat::Json => report::write_event_json(&mut stdout, &event)?,
            OutputFormat::Summary => {}
        }
    }

    let depths = solver.snapshot();
    let metrics = solver.metrics();
    match cli.output {
        OutputFormat::Json => {
            report::write_summary_json(&mut stdout, &depths, &metrics, solver.fingerprint())?
        }
        OutputFormat::Events | OutputFormat::Summary => {
            report::write_summary(&mut stdout, &terrain, &depths, &metrics, solver.fingerprint())?
        }
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<Arc<BasinConfig>> {
    match &cli.config {
        Some(path) => {
            let config = BasinConfig::from_file(path)
                .wrap_err_with(|| format!("loading config {}", path.display()))?;
            info!(path = %path.display(), "inspector.config_loaded");
            Ok(Arc::new(config))
        }
        None => Ok(load_basin_config_from_env().0),
    }
}

fn load_terrain(cli: &Cli, config: &BasinConfig) -> Result<TerrainGrid> {
    if let Some(path) = &cli.terrain {
        let contents = fs::read_to_string(path)
            .wrap_err_with(|| format!("reading terrain {}", path.display()))?;
        let terrain: TerrainGrid = serde_json::from_str(&contents)
            .wrap_err_with(|| format!("parsing terrain {}", path.display()))?;
        return Ok(terrain);
    }

    let terrain = match cli.random {
        Some(size) => {
            let max_height = cli.max_height.unwrap_or(config.editor.max_height);
            random_terrain(size.rows, size.cols, max_height, cli.seed)?
        }
        None => {
            let mut editor = config.editor;
            if let Some(max_height) = cli.max_height {
                editor.max_height = max_height;
            }
            random_terrain_for(&editor, cli.seed)?
        }
    };
    Ok(terrain)
}
