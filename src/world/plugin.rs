//! World plugin - owns the simulation while in game and drives it from the
//! Bevy frame loop.

use bevy::prelude::*;

use crate::core::{
    FixedStepScheduler, FrameClock, GameEvent, GameState, InputLatch, SimulationEvent, Tunables,
};
use crate::enemies::EnemyRegistry;
use crate::rendering::DrawList;

use super::simulation::{Simulation, SimulationDriver};

/// World plugin - builds a fresh world on entering the game and tears it
/// down on leaving.
pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DrawList>()
            .init_resource::<FixedStepScheduler>()
            .add_systems(OnEnter(GameState::InGame), start_simulation)
            .add_systems(
                Update,
                drive_simulation
                    .run_if(in_state(GameState::InGame))
                    .run_if(resource_exists::<Simulation>),
            )
            .add_systems(OnExit(GameState::InGame), stop_simulation);
    }
}

/// Generate a new world from the loaded tunables and enemy data.
pub fn start_simulation(
    mut commands: Commands,
    tunables: Option<Res<Tunables>>,
    registry: Option<Res<EnemyRegistry>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let tunables = tunables.map(|t| t.clone()).unwrap_or_default();
    let enemy = registry.map(|r| r.wave_enemy()).unwrap_or_default();
    let scheduler = FixedStepScheduler::new(tunables.tick_rate, tunables.max_catch_up);

    match Simulation::new_game(tunables, enemy) {
        Ok(simulation) => {
            commands.insert_resource(simulation);
            commands.insert_resource(scheduler);
        }
        Err(e) => {
            error!("Failed to start a new game: {}", e);
            next_state.set(GameState::MainMenu);
        }
    }
}

/// Run however many ticks the frame time allows, then forward what the
/// simulation raised.
#[allow(clippy::too_many_arguments)]
fn drive_simulation(
    time: Res<Time<Real>>,
    mut scheduler: ResMut<FixedStepScheduler>,
    mut simulation: ResMut<Simulation>,
    mut latch: ResMut<InputLatch>,
    mut draw_list: ResMut<DrawList>,
    mut events: EventWriter<SimulationEvent>,
    mut next_state: ResMut<NextState<GameState>>,
    mut exit: EventWriter<AppExit>,
) {
    let mut clock = FrameClock(time.elapsed());
    let mut driver = SimulationDriver {
        simulation: &mut simulation,
        input: &mut *latch,
        draw_list: &mut draw_list,
    };
    let report = scheduler.run_pass(&mut clock, &mut driver);
    if report.updates > 1 {
        trace!("Caught up {} ticks", report.updates);
    }

    for event in simulation.drain_events() {
        match event {
            GameEvent::ReturnToMenu => next_state.set(GameState::MainMenu),
            GameEvent::ExitRequested => {
                exit.send(AppExit::Success);
            }
            _ => {}
        }
        events.send(SimulationEvent(event));
    }
}

fn stop_simulation(
    mut commands: Commands,
    mut draw_list: ResMut<DrawList>,
    mut scheduler: ResMut<FixedStepScheduler>,
) {
    commands.remove_resource::<Simulation>();
    draw_list.clear();
    scheduler.reset();
    info!("World torn down");
}
