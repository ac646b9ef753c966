mod common;

use std::sync::Arc;

use bevy::prelude::*;
use isometric_brawler::combat::Stamina;
use isometric_brawler::core::{Action, InputSnapshot, PointerButton};
use isometric_brawler::enemies::{AiState, Enemy, EnemyDefinition};
use isometric_brawler::rendering::AnimationLibrary;
use isometric_brawler::world::{ObjectId, Simulation};

fn armed_player() -> Simulation {
    let mut sim = common::flat_simulation(common::seeded_tunables());
    sim.spawn_player(IVec2::new(7, 7)).unwrap();
    sim.tick(InputSnapshot::default());
    sim.tick(InputSnapshot::default().with(Action::Sheathe));
    assert_eq!(node(&sim), "TransitionOpen");
    common::idle_ticks(&mut sim, 10);
    assert_eq!(node(&sim), "Idle");
    sim
}

fn node(sim: &Simulation) -> &'static str {
    sim.player().unwrap().weapon.graph().current().name()
}

fn click(button: PointerButton) -> InputSnapshot {
    InputSnapshot::default().with_button(button)
}

/// Skewer a fresh enemy on the drawn sword without it ever entering the world.
fn skewer(sim: &mut Simulation) -> ObjectId {
    let victim = Enemy::spawn(
        ObjectId(900),
        IVec2::new(8, 8),
        sim.terrain(),
        Arc::new(EnemyDefinition::default()),
        &mut AnimationLibrary::default(),
    )
    .unwrap();
    let id = victim.id;
    let weapon = &mut sim.player_mut().unwrap().weapon;
    assert!(weapon.claim_victim(id));
    weapon.take_victim(victim);
    assert!(weapon.victim().is_some());
    id
}

#[test]
fn click_starts_a_light_attack_and_costs_stamina() {
    let mut sim = armed_player();
    sim.tick(InputSnapshot::default().with_button(PointerButton::Primary));
    assert_eq!(node(&sim), "Light1");
    assert_eq!(sim.player().unwrap().stamina.current(), 85);
    assert!(sim.player().unwrap().weapon.is_attacking());
}

#[test]
fn held_button_does_not_repeat_the_attack() {
    let mut sim = armed_player();
    let held = InputSnapshot::default().with_button(PointerButton::Primary);
    for _ in 0..200 {
        sim.tick(held);
    }
    assert_eq!(node(&sim), "Idle");
    assert_eq!(sim.player().unwrap().stamina.current(), 100);
}

#[test]
fn sheathing_again_puts_the_sword_away() {
    let mut sim = armed_player();
    sim.tick(InputSnapshot::default().with(Action::Sheathe));
    common::idle_ticks(&mut sim, 30);
    assert_eq!(node(&sim), "Sheathed");
    assert!(!sim.player().unwrap().weapon.is_drawn());
}

#[test]
fn heavy_and_special_become_light_while_holding_a_victim() {
    for button in [PointerButton::Secondary, PointerButton::Middle] {
        let mut sim = armed_player();
        let victim = skewer(&mut sim);
        assert_eq!(sim.ledger().enemy_count, 0);

        sim.tick(click(button));
        assert_eq!(node(&sim), "Light1");
        assert_eq!(sim.player().unwrap().stamina.current(), 85);
        // Light1 throws whatever is on the blade.
        assert!(!sim.player().unwrap().weapon.holds_victim());
        assert_eq!(sim.ledger().enemy_count, 1);

        sim.tick(InputSnapshot::default());
        let thrown = sim.object(victim).and_then(|o| o.as_enemy()).unwrap();
        assert_eq!(thrown.state(), AiState::Thrown);
    }
}

#[test]
fn heavy_and_special_keep_their_meaning_with_an_empty_blade() {
    let mut sim = armed_player();
    sim.tick(click(PointerButton::Middle));
    assert_eq!(node(&sim), "Idle");

    sim.tick(click(PointerButton::Secondary));
    assert_eq!(node(&sim), "Heavy1");
    assert_eq!(sim.player().unwrap().stamina.current(), 75);
}

#[test]
fn stamina_debt_refuses_the_next_attack() {
    let mut sim = armed_player();
    sim.player_mut().unwrap().stamina = Stamina::new(10, 3);

    sim.tick(click(PointerButton::Primary));
    assert_eq!(node(&sim), "Light1");
    let stamina = sim.player().unwrap().stamina;
    assert_eq!(stamina.current(), 0);
    assert_eq!(stamina.debt(), 35);

    common::idle_ticks(&mut sim, 30);
    sim.tick(click(PointerButton::Primary));
    assert_eq!(sim.player().unwrap().weapon.graph().pending().name(), "Light2");

    let mut ticks = 0;
    while node(&sim) == "Light1" {
        sim.tick(InputSnapshot::default());
        ticks += 1;
        assert!(ticks <= 20, "Light1 never finished");
    }
    assert_eq!(node(&sim), "Idle");

    sim.tick(click(PointerButton::Primary));
    assert_eq!(node(&sim), "Idle");
    assert!(sim.player().unwrap().stamina.balance() < 0);
}

#[test]
fn dodge_launches_the_player_along_their_facing() {
    let mut sim = armed_player();
    let right = InputSnapshot::default().with_pointer(Vec2::new(1000.0, 10.0));
    sim.tick(right);
    let start_x = sim.player_object().unwrap().body.x();

    sim.tick(right.with(Action::JumpDodge));
    assert_eq!(node(&sim), "Dodge");
    assert_eq!(sim.player().unwrap().stamina.current(), 85);

    sim.tick(right);
    let player = sim.player().unwrap();
    assert_eq!(player.locomotion.inertia, IVec2::new(20, 0));
    assert!(player.is_invincible());
    assert!(!sim.player_object().unwrap().body.solid);
    assert_eq!(sim.player_object().unwrap().body.z(), 0.0);

    sim.tick(right);
    let x = sim.player_object().unwrap().body.x();
    assert!((x - (start_x + 12.0)).abs() < 0.01);

    for _ in 0..30 {
        sim.tick(right);
    }
    let player = sim.player().unwrap();
    assert_eq!(node(&sim), "Idle");
    assert_eq!(player.locomotion.inertia, IVec2::ZERO);
    assert!(!player.is_invincible());
    assert!(sim.player_object().unwrap().body.solid);
    assert!(sim.player_object().unwrap().body.x() > start_x + 100.0);
}

#[test]
fn diagonal_dodge_splits_the_launch() {
    let mut sim = armed_player();
    let held = InputSnapshot::default()
        .with(Action::Right)
        .with(Action::Down);
    sim.tick(held.with(Action::JumpDodge));
    assert_eq!(node(&sim), "Dodge");

    sim.tick(held);
    assert_eq!(sim.player().unwrap().locomotion.inertia, IVec2::new(13, 13));
}
