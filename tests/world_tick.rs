mod common;

use bevy::prelude::*;
use isometric_brawler::core::{GameEvent, InputSnapshot, Tunables};
use isometric_brawler::enemies::{AiState, EnemyDefinition};
use isometric_brawler::rendering::{DrawCommand, DrawList};
use isometric_brawler::world::{ObjectKind, Simulation};

fn quick_waves() -> Tunables {
    Tunables {
        wave_delay: 10,
        spawn_throttle: 5,
        ..common::seeded_tunables()
    }
}

fn enemies(simulation: &Simulation) -> Vec<isometric_brawler::world::ObjectId> {
    simulation
        .objects()
        .iter()
        .filter(|o| o.is_enemy())
        .map(|o| o.id)
        .collect()
}

fn kill(simulation: &mut Simulation, id: isometric_brawler::world::ObjectId) {
    let enemy = simulation
        .object_mut(id)
        .and_then(|o| o.as_enemy_mut())
        .expect("enemy is live");
    let health = enemy.health.current;
    enemy.damage(health);
}

#[test]
fn lethal_damage_kills_and_scores_on_the_next_tick() {
    let mut sim = common::flat_simulation(common::seeded_tunables());
    let id = sim.spawn_enemy(IVec2::new(4, 4)).unwrap();
    sim.tick(InputSnapshot::default());
    assert_eq!(sim.ledger().enemy_count, 1);

    sim.object_mut(id)
        .and_then(|o| o.as_enemy_mut())
        .unwrap()
        .damage(150);
    sim.tick(InputSnapshot::default());

    let object = sim.object(id).expect("corpses stay in the world");
    assert_eq!(object.as_enemy().unwrap().state(), AiState::Dead);
    assert!(!object.body.solid);
    let corpse = object.body.position();
    assert_eq!(sim.ledger().enemy_count, 0);
    assert_eq!(sim.ledger().score, 100);
    assert!(sim
        .drain_events()
        .contains(&GameEvent::EnemyKilled { id, score: 100 }));

    let mut later = Vec::new();
    for _ in 0..120 {
        sim.tick(InputSnapshot::default());
        later.extend(sim.drain_events());
        let object = sim.object(id).expect("corpses stay in the world");
        assert_eq!(object.as_enemy().unwrap().state(), AiState::Dead);
        assert_eq!(object.body.position(), corpse);
        assert_eq!(sim.ledger().enemy_count, 0);
        assert_eq!(sim.ledger().score, 100);
    }
    assert!(!later
        .iter()
        .any(|e| matches!(e, GameEvent::EnemyKilled { .. })));
}

#[test]
fn wave_enemies_are_released_at_the_throttle_rate() {
    let mut sim = common::flat_simulation(quick_waves());
    let mut events = Vec::new();
    for _ in 0..12 {
        sim.tick(InputSnapshot::default());
        events.extend(sim.drain_events());
    }
    assert!(events.contains(&GameEvent::WaveStarted { wave: 1 }));
    assert_eq!(enemies(&sim).len(), 1);

    common::idle_ticks(&mut sim, 5);
    assert_eq!(enemies(&sim).len(), 2);
    assert_eq!(sim.ledger().enemy_count, 2);
    assert_eq!(sim.spawner().wave(), 2);
}

#[test]
fn next_wave_waits_for_the_field_to_clear() {
    let mut sim = common::flat_simulation(quick_waves());
    common::idle_ticks(&mut sim, 20);
    sim.drain_events();
    assert_eq!(enemies(&sim).len(), 2);

    common::idle_ticks(&mut sim, 40);
    assert!(!sim
        .drain_events()
        .iter()
        .any(|e| matches!(e, GameEvent::WaveStarted { .. })));

    for id in enemies(&sim) {
        kill(&mut sim, id);
    }
    common::idle_ticks(&mut sim, 20);
    assert_eq!(sim.ledger().enemy_count, 0);
    assert!(sim.drain_events().contains(&GameEvent::WaveStarted { wave: 2 }));
}

#[test]
fn new_game_places_the_player_and_the_pickup() {
    let mut sim = Simulation::new_game(common::seeded_tunables(), EnemyDefinition::default()).unwrap();
    assert!(sim.player().is_none(), "the player joins on the first tick");
    assert_eq!(sim.pending_len(), 2);

    sim.tick(InputSnapshot::default());
    let player = sim.player_object().expect("player spawned");
    assert_eq!(player.body.tile(), IVec2::new(7, 7));
    assert!(sim
        .objects()
        .iter()
        .any(|o| matches!(o.kind, ObjectKind::Pickup(_))));
    assert_eq!(sim.ledger().enemy_count, 0);
}

#[test]
fn seeded_worlds_are_identical() {
    let a = Simulation::new_game(common::seeded_tunables(), EnemyDefinition::default()).unwrap();
    let b = Simulation::new_game(common::seeded_tunables(), EnemyDefinition::default()).unwrap();
    let tiles = |s: &Simulation| s.terrain().render_order().map(|(_, t)| *t).collect::<Vec<_>>();
    assert_eq!(tiles(&a), tiles(&b));
    assert_eq!(a.objects().len(), b.objects().len());
}

#[test]
fn render_draws_terrain_before_objects() {
    let mut sim = common::flat_simulation(common::seeded_tunables());
    sim.spawn_player(IVec2::new(7, 7)).unwrap();
    sim.tick(InputSnapshot::default());

    let mut list = DrawList::default();
    sim.render(&mut list);
    let tiles = (sim.terrain().width() * sim.terrain().height()) as usize;
    assert!(list.world().len() > tiles);
    assert!(list.world()[..tiles]
        .iter()
        .all(|c| matches!(c, DrawCommand::Sprite { sheet, .. } if sheet.starts_with("tiles/"))));
    assert!(list.hud_texts().any(|(text, ..)| text == "0"));
}
