mod common;

use std::fs;

use anyhow::{ensure, Context, Result};
use basin_core::{FloodSolver, TerrainGrid};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Scenario {
    name: String,
    terrain: TerrainGrid,
    depths: Vec<Vec<u32>>,
    rim_rounds: u64,
}

fn load_scenarios() -> Result<Vec<Scenario>> {
    let path = common::fixture_path("scenarios.json");
    let contents =
        fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parsing {}", path.display()))
}

#[test]
fn fixture_scenarios_settle_to_recorded_depths() -> Result<()> {
    let scenarios = load_scenarios()?;
    ensure!(!scenarios.is_empty(), "no scenarios in fixture");

    for scenario in scenarios {
        for config in common::all_solver_configs() {
            let mut solver = FloodSolver::with_config(scenario.terrain.clone(), config);
            solver.run_to_completion();
            let depths = solver.snapshot().to_rows();
            ensure!(
                depths == scenario.depths,
                "{} with {config:?}: got {depths:?}",
                scenario.name
            );
            ensure!(
                solver.metrics().rim_rounds == scenario.rim_rounds,
                "{} with {config:?}: {} rim rounds",
                scenario.name,
                solver.metrics().rim_rounds
            );
        }
        ensure!(
            common::reference_depths(&scenario.terrain) == scenario.depths.concat(),
            "{}: fixture disagrees with the priority flood",
            scenario.name
        );
    }
    Ok(())
}

#[test]
fn ragged_fixture_terrain_is_rejected() {
    let parsed = serde_json::from_str::<Scenario>(
        r#"{"name": "ragged", "terrain": [[1, 2], [3]], "depths": [], "rim_rounds": 0}"#,
    );
    let err = parsed.expect_err("ragged terrain must not parse");
    assert!(err.to_string().contains("row 1"), "{err}");
}
