mod common;

use isometric_brawler::core::{Action, Clock, FixedStepScheduler, GameEvent, InputSnapshot, ScriptedInput};
use isometric_brawler::rendering::DrawList;
use isometric_brawler::world::SimulationDriver;

#[test]
fn a_four_tick_gap_runs_four_updates_and_one_render() {
    let mut sim = common::flat_simulation(common::seeded_tunables());
    let mut input = ScriptedInput::default();
    let mut draw_list = DrawList::default();
    let mut clock = common::manual_clock();
    let mut scheduler = FixedStepScheduler::new(60, 5);
    scheduler.start(&clock);

    clock.advance(scheduler.tick() * 4);
    let before = clock.now();
    let report = scheduler.run_pass(
        &mut clock,
        &mut SimulationDriver {
            simulation: &mut sim,
            input: &mut input,
            draw_list: &mut draw_list,
        },
    );

    assert_eq!(report.updates, 4);
    assert_eq!(sim.ticks(), 4);
    assert_eq!(scheduler.last_update(), Some(before));
    assert!(!draw_list.world().is_empty());
}

#[test]
fn quitting_from_the_pause_menu_stops_the_loop() {
    let mut sim = common::flat_simulation(common::seeded_tunables());
    let idle = InputSnapshot::default();
    let mut input = common::scripted([
        idle.with(Action::Pause),
        idle,
        idle.with(Action::Down),
        idle,
        idle.with(Action::Down),
        idle,
        idle.with(Action::Confirm),
    ]);
    let mut draw_list = DrawList::default();
    let mut clock = common::manual_clock();
    let mut scheduler = FixedStepScheduler::new(60, 5);

    let passes = scheduler.run(
        &mut clock,
        &mut SimulationDriver {
            simulation: &mut sim,
            input: &mut input,
            draw_list: &mut draw_list,
        },
    );

    // The first pass only anchors the clock.
    assert_eq!(passes, 8);
    assert_eq!(sim.ticks(), 7);
    assert!(sim.is_paused());
    assert!(sim.exit_requested());
    assert!(sim.drain_events().contains(&GameEvent::ExitRequested));
    assert!(draw_list.hud_texts().any(|(text, ..)| text == "Quit game"));
}
