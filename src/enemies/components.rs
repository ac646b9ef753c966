//! Enemy state.

use bevy::prelude::*;
use std::sync::Arc;

use super::data::EnemyDefinition;
use super::pathfinding::Path;
use crate::combat::Health;
use crate::core::GameError;
use crate::rendering::AnimationLibrary;
use crate::world::iso::tile_to_world;
use crate::world::terrain::TerrainGrid;
use crate::world::{Body, GameObject, ObjectId, ObjectKind};

/// Rows of an enemy sprite sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum EnemyAnimation {
    Idle,
    Damaged,
    Dead,
    Stabbed,
    Walk,
    Melee,
}

impl EnemyAnimation {
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// What an enemy is doing, as seen from outside.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum AiState {
    /// Looking for a route to the player.
    #[default]
    Seeking,
    /// Walking towards the next waypoint.
    Moving,
    Attacking,
    Damaged,
    /// Flying after being thrown off the sword.
    Thrown,
    Dead,
}

/// A hostile walker.
#[derive(Debug, Clone)]
pub struct Enemy {
    pub definition: Arc<EnemyDefinition>,
    pub health: Health,
    pub(super) damaged: bool,
    pub(super) damage_timer: u32,
    /// Damage of the hit being processed.
    pub(super) incoming: i32,
    pub(super) attacking: bool,
    pub(super) attack_time: u32,
    pub(super) can_be_staggered: bool,
    pub(super) stabbable: bool,
    pub(super) dead: bool,
    pub(super) thrown: bool,
    pub invulnerable: bool,
    /// Ticks to stand still before the next decision.
    pub wait: u32,
    /// Residual push per axis, decaying by one each tick.
    pub inertia: IVec2,
    /// Distance covered per tick of inertia.
    pub inertia_step: f32,
    pub(super) moving: bool,
    pub(super) path: Option<Path>,
    pub(super) destination: Option<IVec2>,
    pub(super) final_destination: Option<IVec2>,
}

impl Enemy {
    /// Sprite row shown while skewered on the sword.
    pub const STAB_ANIMATION: usize = EnemyAnimation::Stabbed.index();

    pub fn new(definition: Arc<EnemyDefinition>) -> Self {
        Self {
            health: Health::new(definition.health),
            damaged: false,
            damage_timer: definition.invulnerability,
            incoming: 0,
            attacking: false,
            attack_time: 0,
            can_be_staggered: true,
            stabbable: false,
            dead: false,
            thrown: false,
            invulnerable: false,
            wait: definition.spawn_wait,
            inertia: IVec2::ZERO,
            inertia_step: 5.0,
            moving: false,
            path: None,
            destination: None,
            final_destination: None,
            definition,
        }
    }

    /// Build an enemy standing on `tile`.
    pub fn spawn(
        id: ObjectId,
        tile: IVec2,
        terrain: &TerrainGrid,
        definition: Arc<EnemyDefinition>,
        library: &mut AnimationLibrary,
    ) -> Result<GameObject, GameError> {
        let height = terrain
            .height_at(tile)
            .ok_or(GameError::OutOfBounds { x: tile.x, y: tile.y })?;
        let set = library.get_or_create(&definition.name, || definition.animation_set());
        let body = Body::new(tile_to_world(tile).extend(height), set)
            .with_extents(definition.half_extents())
            .with_solid(true);

        let mut object = GameObject::new(id, body, ObjectKind::Enemy(Box::new(Enemy::new(definition))))
            .with_shadow();
        if let Some(shadow) = object.shadow.as_mut() {
            shadow.follow(&object.body, terrain);
        }
        Ok(object)
    }

    pub fn state(&self) -> AiState {
        if self.dead {
            AiState::Dead
        } else if self.thrown {
            AiState::Thrown
        } else if self.damaged {
            AiState::Damaged
        } else if self.attacking {
            AiState::Attacking
        } else if self.destination.is_some() {
            AiState::Moving
        } else {
            AiState::Seeking
        }
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn is_stabbable(&self) -> bool {
        self.stabbable
    }

    /// Remaining waypoints, goal end first.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref()
    }

    pub fn damage(&mut self, amount: i32) {
        if !self.invulnerable {
            self.health.take_damage(amount);
        }
    }

    /// Launch the enemy sideways. It dies where it lands.
    pub fn throw(&mut self, inertia: i32) {
        self.thrown = true;
        self.inertia.x = inertia;
    }
}
