//! Headless Bevy playback: advances a solver a few events per `Update` tick
//! and mirrors the depth grid the way a renderer would.

use bevy::prelude::*;

use crate::{
    config::PlaybackConfig, events::FloodEvent, snapshot::DepthSnapshot, solver::FloodSolver,
};

/// The solver being played back, if any.
#[derive(Resource, Default)]
pub struct ActiveFlood {
    solver: Option<FloodSolver>,
}

impl ActiveFlood {
    pub fn solver(&self) -> Option<&FloodSolver> {
        self.solver.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.solver
            .as_ref()
            .is_some_and(|solver| !solver.is_converged())
    }

    pub fn clear(&mut self) {
        self.solver = None;
    }
}

/// Consumer-side copy of the depths, updated only from emitted events.
#[derive(Resource, Debug, Clone, Default)]
pub struct WaterSurface {
    pub depths: Option<DepthSnapshot>,
    pub applied: u64,
    pub finished: bool,
}

/// Emitted once for every event pulled from the solver.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloodStepped(pub FloodEvent);

pub struct BasinPlugin {
    pub playback: PlaybackConfig,
}

impl Plugin for BasinPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.playback)
            .init_resource::<ActiveFlood>()
            .init_resource::<WaterSurface>()
            .add_event::<FloodStepped>()
            .add_systems(Update, advance_flood);
    }
}

/// Construct a Bevy [`App`] that plays back solvers at the given pace.
pub fn build_headless_app(playback: PlaybackConfig) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(BasinPlugin { playback });
    app
}

/// Advance playback by one tick.
pub fn run_tick(app: &mut App) {
    app.update();
}

/// Replace whatever is playing with `solver` and reset the mirrored surface.
pub fn start_flood(world: &mut World, solver: FloodSolver) {
    let depths = solver.snapshot();
    tracing::info!(
        target: "basin::playback",
        rows = depths.rows,
        cols = depths.cols,
        "playback.started"
    );
    *world.resource_mut::<WaterSurface>() = WaterSurface {
        depths: Some(depths),
        applied: 0,
        finished: false,
    };
    world.resource_mut::<ActiveFlood>().solver = Some(solver);
}

/// Pull every remaining event at once. Returns how many were applied.
pub fn finish_flood(world: &mut World) -> usize {
    let Some(mut solver) = world.resource_mut::<ActiveFlood>().solver.take() else {
        return 0;
    };
    let events = solver.run_to_completion();
    {
        let mut surface = world.resource_mut::<WaterSurface>();
        for event in &events {
            if let Some(depths) = surface.depths.as_mut() {
                depths.apply(event);
            }
        }
        surface.applied += events.len() as u64;
        surface.finished = true;
    }
    {
        let mut stepped = world.resource_mut::<Events<FloodStepped>>();
        for event in &events {
            stepped.send(FloodStepped(*event));
        }
    }
    tracing::info!(
        target: "basin::playback",
        applied = events.len(),
        "playback.finished=eager"
    );
    world.resource_mut::<ActiveFlood>().solver = Some(solver);
    events.len()
}

pub fn advance_flood(
    mut active: ResMut<ActiveFlood>,
    playback: Res<PlaybackConfig>,
    mut surface: ResMut<WaterSurface>,
    mut stepped: EventWriter<FloodStepped>,
) {
    let Some(solver) = active.solver.as_mut() else {
        return;
    };
    if surface.finished {
        return;
    }

    let mut budget = playback.events_per_tick.max(1);
    while budget > 0 {
        let Some(event) = solver.next() else {
            surface.finished = true;
            tracing::info!(
                target: "basin::playback",
                applied = surface.applied,
                "playback.finished"
            );
            break;
        };
        if let Some(depths) = surface.depths.as_mut() {
            depths.apply(&event);
        }
        surface.applied += 1;
        stepped.send(FloodStepped(event));
        if event.is_meaningful() || !playback.skip_markers {
            budget -= 1;
        }
    }
}
