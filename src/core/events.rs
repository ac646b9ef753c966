//! Events produced by the simulation for the presentation layers.
//!
//! The simulation never touches Bevy directly. It pushes [`GameEvent`]s into
//! an outbox which the world plugin drains each frame and forwards as
//! [`SimulationEvent`]s, so audio and UI systems stay decoupled from it.

use bevy::prelude::*;

use crate::world::ObjectId;

/// Named sound effects emitted by combo nodes, enemies and pickups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    WeaponDrawn,
    SwordWoosh,
    SwordSlash,
    SwordHit,
    Footstep,
    EnemyHurt,
    EnemyDeath,
    EnemyStep,
    EnemySwing,
    PickupCollected,
    PickupExpired,
}

impl SoundCue {
    pub const ALL: [SoundCue; 11] = [
        SoundCue::WeaponDrawn,
        SoundCue::SwordWoosh,
        SoundCue::SwordSlash,
        SoundCue::SwordHit,
        SoundCue::Footstep,
        SoundCue::EnemyHurt,
        SoundCue::EnemyDeath,
        SoundCue::EnemyStep,
        SoundCue::EnemySwing,
        SoundCue::PickupCollected,
        SoundCue::PickupExpired,
    ];

    /// Clip path relative to the asset folder.
    pub fn asset_path(self) -> &'static str {
        match self {
            SoundCue::WeaponDrawn => "sfx/drawn.wav",
            SoundCue::SwordWoosh => "sfx/sword_woosh.wav",
            SoundCue::SwordSlash => "sfx/sword_slash.wav",
            SoundCue::SwordHit => "sfx/sword_hit.wav",
            SoundCue::Footstep => "sfx/metallic_step_1.wav",
            SoundCue::EnemyHurt => "sfx/enemies/clang.wav",
            SoundCue::EnemyDeath => "sfx/enemies/bot_dead.wav",
            SoundCue::EnemyStep => "sfx/enemies/step_clang.wav",
            SoundCue::EnemySwing => "sfx/enemies/swing.wav",
            SoundCue::PickupCollected => "sfx/pickups/AS_pick.wav",
            SoundCue::PickupExpired => "sfx/pickups/AS_end.wav",
        }
    }

    /// Gain adjustment in decibels.
    pub fn volume_db(self) -> f32 {
        match self {
            SoundCue::Footstep => -30.0,
            SoundCue::EnemyHurt => -10.0,
            SoundCue::EnemySwing => 10.0,
            _ => 0.0,
        }
    }

    /// Exclusive cues are skipped while a previous instance is still playing.
    /// Everything else restarts from the beginning.
    pub fn exclusive(self) -> bool {
        matches!(
            self,
            SoundCue::Footstep | SoundCue::EnemyStep | SoundCue::EnemySwing
        )
    }
}

/// Something that happened during a simulation tick.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Sound(SoundCue),
    PlayerDamaged { amount: i32 },
    PlayerDied,
    EnemyKilled { id: ObjectId, score: u32 },
    WaveStarted { wave: u32 },
    /// The player confirmed the death screen or left from the pause menu.
    ReturnToMenu,
    /// Quit chosen from the pause menu.
    ExitRequested,
}

/// Bevy-side wrapper for events drained from the simulation.
#[derive(Event, Debug, Clone)]
pub struct SimulationEvent(pub GameEvent);
