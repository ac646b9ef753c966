//! Player state and animation table.

use bevy::prelude::*;

use crate::combat::{Health, Stamina, Weapon};
use crate::rendering::{AnimationSet, AnimationSpec};

/// Rows of the player sprite sheet. The back-facing half mirrors the front
/// half at an offset of [`PlayerAnimation::BACK_OFFSET`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum PlayerAnimation {
    IdleFront,
    RunningFront,
    JumpingFront,
    IdleWeaponFront,
    RunningWeaponFront,
    JumpingWeaponFront,
    DodgeFront,
    AttackFront1,
    AttackFront2,
    HeavyAttackFront1,
    HeavyAttackFront2,
    HeavyComboFront1,
    HeavyComboFront2,
    WhirlFront,
    DeadFront,
    IdleBack,
    RunningBack,
    JumpingBack,
    IdleWeaponBack,
    RunningWeaponBack,
    JumpingWeaponBack,
    DodgeBack,
    AttackBack1,
    AttackBack2,
    HeavyAttackBack1,
    HeavyAttackBack2,
    HeavyComboBack1,
    HeavyComboBack2,
    WhirlBack,
    DeadBack,
}

impl PlayerAnimation {
    pub const COUNT: usize = 30;
    pub const BACK_OFFSET: usize = Self::COUNT / 2;
    /// Distance from a bare-handed pose to its weapon-drawn twin.
    pub const WEAPON_OFFSET: usize = 3;

    pub const fn index(self) -> usize {
        self as usize
    }
}

const PLAYER_ANIMATIONS: [AnimationSpec; PlayerAnimation::COUNT] = [
    AnimationSpec::new(3, 4, true),
    AnimationSpec::new(12, 12, true),
    AnimationSpec::new(8, 8, false),
    AnimationSpec::new(3, 4, true),
    AnimationSpec::new(12, 12, true),
    AnimationSpec::new(8, 6, true),
    AnimationSpec::new(3, 12, true),
    AnimationSpec::new(9, 14, false),
    AnimationSpec::new(9, 14, false),
    AnimationSpec::new(9, 10, false),
    AnimationSpec::new(9, 10, false),
    AnimationSpec::new(9, 10, false),
    AnimationSpec::new(9, 10, false),
    AnimationSpec::new(9, 14, true),
    AnimationSpec::new(12, 5, false),
    AnimationSpec::new(3, 4, true),
    AnimationSpec::new(12, 12, true),
    AnimationSpec::new(8, 8, false),
    AnimationSpec::new(3, 4, true),
    AnimationSpec::new(12, 12, true),
    AnimationSpec::new(8, 6, false),
    AnimationSpec::new(3, 12, true),
    AnimationSpec::new(9, 14, false),
    AnimationSpec::new(9, 14, false),
    AnimationSpec::new(9, 10, false),
    AnimationSpec::new(9, 10, false),
    AnimationSpec::new(9, 10, false),
    AnimationSpec::new(9, 10, false),
    AnimationSpec::new(9, 14, true),
    AnimationSpec::new(12, 5, false),
];

pub const PLAYER_SHEET: &str = "player/player_anim.png";

pub fn player_animations() -> AnimationSet {
    AnimationSet::new(PLAYER_SHEET, Vec2::new(40.0, 60.0), &PLAYER_ANIMATIONS)
}

/// Movement and survival tuning for the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerConfig {
    pub max_health: i32,
    pub max_stamina: i32,
    /// Ticks per point of stamina regained while idle.
    pub stamina_recovery: u32,
    /// Invulnerability after a hit, in ticks.
    pub damage_cooldown: u32,
    pub resting_speed: f32,
    pub max_speed: f32,
    pub speed_ramp: f32,
    /// Multiplier applied to inertia when sliding.
    pub inertia: f32,
    pub inertia_max: i32,
    pub jump_ticks: u32,
    pub jump_height: f32,
    pub fall_speed: f32,
    pub dodge_distance: i32,
    /// Falling below this height counts as leaving the map.
    pub kill_height: f32,
    pub half_extents: Vec3,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_health: 100,
            max_stamina: 100,
            stamina_recovery: 3,
            damage_cooldown: 30,
            resting_speed: 20.0,
            max_speed: 30.0,
            speed_ramp: 0.5,
            inertia: 6.0,
            inertia_max: 10,
            jump_ticks: 20,
            jump_height: 2.0,
            fall_speed: 2.0,
            dodge_distance: 20,
            kill_height: -4.0,
            half_extents: Vec3::new(10.0, 5.0, 2.0),
        }
    }
}

/// Hit invulnerability bookkeeping.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Invulnerability {
    pub active: bool,
    /// Set when damage lands, consumed on the next tick.
    pub damaged: bool,
    pub cooldown: u32,
}

impl Invulnerability {
    /// One tick of the post-hit timer.
    pub fn tick(&mut self, duration: u32) {
        if self.damaged {
            self.cooldown = duration;
            self.damaged = false;
            self.active = true;
        }
        if self.cooldown == 0 {
            self.active = false;
        } else {
            self.cooldown -= 1;
        }
    }
}

/// The player character.
#[derive(Debug)]
pub struct Player {
    pub config: PlayerConfig,
    pub health: Health,
    pub stamina: Stamina,
    pub weapon: Weapon,
    pub invulnerability: Invulnerability,
    pub locomotion: super::movement::Locomotion,
    pub controllable: bool,
    /// Set by the combo graph for the following tick.
    pub can_move: bool,
    pub facing_away: bool,
}

impl Player {
    pub fn new(config: PlayerConfig, weapon: Weapon) -> Self {
        Self {
            health: Health::new(config.max_health),
            stamina: Stamina::new(config.max_stamina, config.stamina_recovery),
            weapon,
            invulnerability: Invulnerability::default(),
            locomotion: super::movement::Locomotion::new(&config),
            controllable: true,
            can_move: true,
            facing_away: false,
            config,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health.is_dead()
    }

    pub fn is_invincible(&self) -> bool {
        self.invulnerability.active
    }

    pub fn is_moving(&self) -> bool {
        self.locomotion.moved
    }

    pub fn heal(&mut self, amount: i32) {
        self.health.heal(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn back_half_mirrors_front_half() {
        for front in 0..PlayerAnimation::BACK_OFFSET {
            let back = front + PlayerAnimation::BACK_OFFSET;
            assert_eq!(PLAYER_ANIMATIONS[front].frames, PLAYER_ANIMATIONS[back].frames);
            assert_eq!(PLAYER_ANIMATIONS[front].fps, PLAYER_ANIMATIONS[back].fps);
        }
        assert_eq!(PlayerAnimation::DeadBack.index(), PlayerAnimation::COUNT - 1);
    }

    #[test]
    fn invulnerability_lasts_the_cooldown() {
        let mut inv = Invulnerability {
            damaged: true,
            ..default()
        };
        for _ in 0..30 {
            inv.tick(30);
            assert!(inv.active);
        }
        inv.tick(30);
        assert!(!inv.active);
    }
}
