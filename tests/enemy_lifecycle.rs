mod common;

use bevy::prelude::*;
use isometric_brawler::core::{Action, GameEvent, InputSnapshot, PointerButton};
use isometric_brawler::enemies::AiState;
use isometric_brawler::world::{ObjectId, ObjectKind, Simulation};

fn arena() -> (Simulation, ObjectId, ObjectId) {
    let mut sim = common::flat_simulation(common::seeded_tunables());
    let player = sim.spawn_player(IVec2::new(7, 7)).unwrap();
    let enemy = sim.spawn_enemy(IVec2::new(2, 2)).unwrap();
    sim.tick(InputSnapshot::default());
    (sim, player, enemy)
}

/// Input with the pointer far to the right so the player faces east.
fn aim() -> InputSnapshot {
    InputSnapshot::default().with_pointer(Vec2::new(1000.0, 10.0))
}

fn click(button: PointerButton) -> InputSnapshot {
    aim().with_button(button)
}

/// Player on (7, 7) with the sword drawn, facing an enemy on `enemy_tile`.
fn duel(enemy_tile: IVec2) -> (Simulation, ObjectId) {
    let mut sim = common::flat_simulation(common::seeded_tunables());
    sim.spawn_player(IVec2::new(7, 7)).unwrap();
    let enemy = sim.spawn_enemy(enemy_tile).unwrap();
    sim.tick(aim());
    sim.tick(aim().with(Action::Sheathe));
    for _ in 0..10 {
        sim.tick(aim());
    }
    assert_eq!(node(&sim), "Idle");
    (sim, enemy)
}

fn node(sim: &Simulation) -> &'static str {
    sim.player().unwrap().weapon.graph().current().name()
}

fn state(sim: &Simulation, enemy: ObjectId) -> AiState {
    sim.object(enemy).unwrap().as_enemy().unwrap().state()
}

fn health(sim: &Simulation, enemy: ObjectId) -> i32 {
    sim.object(enemy).unwrap().as_enemy().unwrap().health.current
}

fn player_health(sim: &Simulation) -> i32 {
    sim.player().unwrap().health.current
}

/// Click once and follow through until the swing staggers `enemy`.
fn swing_until_staggered(sim: &mut Simulation, enemy: ObjectId) {
    sim.tick(click(PointerButton::Primary));
    for _ in 0..25 {
        if state(sim, enemy) == AiState::Damaged {
            return;
        }
        sim.tick(aim());
    }
    panic!("the swing never reached the enemy");
}

fn kills(events: &[GameEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, GameEvent::EnemyKilled { .. }))
        .count()
}

fn gap(sim: &Simulation, a: ObjectId, b: ObjectId) -> f32 {
    let a = sim.object(a).unwrap().body.position();
    let b = sim.object(b).unwrap().body.position();
    a.distance(b)
}

#[test]
fn enemy_stands_still_then_closes_in() {
    let (mut sim, player, enemy) = arena();
    let start = sim.object(enemy).unwrap().body.position();
    let initial = gap(&sim, player, enemy);

    common::idle_ticks(&mut sim, 30);
    assert_eq!(sim.object(enemy).unwrap().body.position(), start);

    let mut chased = false;
    for _ in 0..400 {
        sim.tick(InputSnapshot::default());
        let state = sim.object(enemy).unwrap().as_enemy().unwrap().state();
        chased |= state == AiState::Moving;
    }
    assert!(chased);
    assert!(gap(&sim, player, enemy) < initial / 2.0);
}

#[test]
fn projectile_bursts_on_the_player() {
    let (mut sim, player, _) = arena();
    let target = sim.object(player).unwrap().body.position();
    sim.spawn_projectile(target + Vec3::new(40.0, 0.0, 0.0), target, 0.0)
        .unwrap();

    common::idle_ticks(&mut sim, 30);
    assert_eq!(sim.player().unwrap().health.current, 90);
    assert!(sim
        .drain_events()
        .contains(&GameEvent::PlayerDamaged { amount: 10 }));

    common::idle_ticks(&mut sim, 120);
    assert!(!sim
        .objects()
        .iter()
        .any(|o| matches!(o.kind, ObjectKind::Projectile(_))));
}

#[test]
fn projectile_leaving_the_map_is_removed() {
    let mut sim = common::flat_simulation(common::seeded_tunables());
    let origin = Vec3::new(40.0, 0.0, 0.0);
    sim.spawn_projectile(origin, origin - Vec3::new(400.0, 0.0, 0.0), 0.0)
        .unwrap();
    common::idle_ticks(&mut sim, 200);
    assert!(sim.objects().is_empty());
}

#[test]
fn adjacent_enemy_hits_once_per_swing_then_cools_down() {
    let mut sim = common::flat_simulation(common::seeded_tunables());
    sim.spawn_player(IVec2::new(7, 7)).unwrap();
    let enemy = sim.spawn_enemy(IVec2::new(8, 7)).unwrap();
    sim.tick(InputSnapshot::default());
    let post = sim.object(enemy).unwrap().body.position();

    let mut waited = 0;
    while state(&sim, enemy) != AiState::Attacking {
        sim.tick(InputSnapshot::default());
        waited += 1;
        assert!(waited <= 70, "enemy never started its swing");
    }
    assert_eq!(player_health(&sim), 100);
    sim.drain_events();

    let mut hits = Vec::new();
    for _ in 0..45 {
        sim.tick(InputSnapshot::default());
        assert_eq!(state(&sim, enemy), AiState::Attacking);
        hits.extend(
            sim.drain_events()
                .into_iter()
                .filter(|e| matches!(e, GameEvent::PlayerDamaged { .. })),
        );
    }
    assert_eq!(hits, vec![GameEvent::PlayerDamaged { amount: 10 }]);
    assert_eq!(player_health(&sim), 90);

    sim.tick(InputSnapshot::default());
    assert_eq!(state(&sim, enemy), AiState::Seeking);
    assert_eq!(sim.object(enemy).unwrap().as_enemy().unwrap().wait, 20);

    let mut cooldown = 0;
    while player_health(&sim) == 90 {
        sim.tick(InputSnapshot::default());
        cooldown += 1;
        assert!(cooldown <= 80, "enemy never swung again");
    }
    assert!(cooldown > 20);
    assert_eq!(player_health(&sim), 80);
    assert_eq!(sim.object(enemy).unwrap().body.position(), post);
    assert_eq!(sim.ledger().enemy_count, 1);
}

#[test]
fn sword_hit_staggers_and_knocks_back_without_double_hits() {
    let (mut sim, enemy) = duel(IVec2::new(8, 8));
    let start_x = sim.object(enemy).unwrap().body.x();

    swing_until_staggered(&mut sim, enemy);
    assert_eq!(health(&sim, enemy), 120);

    // Keep swinging through the invulnerability window.
    for tick in 1..50 {
        let input = if tick % 2 == 0 {
            click(PointerButton::Primary)
        } else {
            aim()
        };
        sim.tick(input);
        assert_eq!(state(&sim, enemy), AiState::Damaged);
        assert_eq!(health(&sim, enemy), 120);
    }
    let knocked = sim.object(enemy).unwrap().body.position();
    assert!((knocked.x - (start_x + 12.5)).abs() < 0.01);
    assert_eq!(knocked.y, 0.0);

    let mut ticks = 0;
    while health(&sim, enemy) == 120 {
        let input = if ticks % 2 == 0 {
            click(PointerButton::Primary)
        } else {
            aim()
        };
        sim.tick(input);
        ticks += 1;
        assert!(ticks <= 30, "window never closed");
    }
    assert_eq!(health(&sim, enemy), 90);
    assert_eq!(state(&sim, enemy), AiState::Damaged);
    assert_eq!(sim.ledger().enemy_count, 1);
    assert_eq!(sim.ledger().score, 0);
}

#[test]
fn stabbed_enemy_is_carried_thrown_and_dies_on_landing() {
    let (mut sim, enemy) = duel(IVec2::new(8, 8));
    sim.object_mut(enemy)
        .and_then(|o| o.as_enemy_mut())
        .unwrap()
        .damage(110);

    swing_until_staggered(&mut sim, enemy);
    assert_eq!(health(&sim, enemy), 10);
    assert!(sim.object(enemy).unwrap().as_enemy().unwrap().is_stabbable());
    for _ in 0..55 {
        sim.tick(aim());
    }
    assert_ne!(state(&sim, enemy), AiState::Damaged);
    assert_eq!(node(&sim), "Idle");

    // A heavy thrust skewers it.
    sim.tick(click(PointerButton::Secondary));
    assert_eq!(node(&sim), "Heavy1");
    let mut ticks = 0;
    while sim.object(enemy).is_some() {
        sim.tick(aim());
        ticks += 1;
        assert!(ticks <= 25, "the thrust never skewered the enemy");
    }
    let weapon = &sim.player().unwrap().weapon;
    assert_eq!(weapon.victim().map(|v| v.id), Some(enemy));
    assert_eq!(sim.ledger().enemy_count, 0);

    let mut carry = 0;
    while node(&sim) != "Idle" {
        sim.tick(aim());
        assert!(sim.player().unwrap().weapon.victim().is_some());
        assert!(sim.object(enemy).is_none());
        carry += 1;
        assert!(carry <= 60, "the thrust never finished");
    }
    let carried = sim.player().unwrap().weapon.victim().unwrap().body.position();
    assert_eq!(carried.y, 0.0);

    // The light swing flings it east and puts it back in the world.
    sim.drain_events();
    sim.tick(click(PointerButton::Primary));
    assert_eq!(node(&sim), "Light1");
    assert!(!sim.player().unwrap().weapon.holds_victim());
    assert_eq!(sim.ledger().enemy_count, 1);

    sim.tick(aim());
    let launched = sim.object(enemy).unwrap();
    assert_eq!(launched.as_enemy().unwrap().state(), AiState::Thrown);
    assert_eq!(launched.as_enemy().unwrap().inertia.x, 49);
    let first_x = launched.body.x();

    let mut events = Vec::new();
    let mut flight = 0;
    while state(&sim, enemy) == AiState::Thrown {
        sim.tick(aim());
        events.extend(sim.drain_events());
        flight += 1;
        assert!(flight <= 60, "the enemy never landed");
    }
    assert_eq!(flight, 49);
    assert_eq!(state(&sim, enemy), AiState::Dead);
    let landed = sim.object(enemy).unwrap().body.x();
    assert!((landed - (first_x + 245.0)).abs() < 0.01);
    assert_eq!(sim.ledger().enemy_count, 0);
    assert_eq!(sim.ledger().score, 100);
    assert_eq!(kills(&events), 1);

    for _ in 0..60 {
        sim.tick(aim());
        events.extend(sim.drain_events());
    }
    assert_eq!(sim.ledger().enemy_count, 0);
    assert_eq!(sim.ledger().score, 100);
    assert_eq!(kills(&events), 1);
}
