//! Per-tick player behavior: survival timers, movement, facing, the weapon
//! and rendering order.

use bevy::prelude::*;

use super::components::{player_animations, Player, PlayerAnimation, PlayerConfig};
use crate::combat::{ComboEffect, ComboTick, OwnerPose, Weapon};
use crate::core::{GameError, GameEvent, SoundCue};
use crate::rendering::{AnimationLibrary, DrawSurface};
use crate::world::context::{LifestealWindow, Neighbors, TickContext};
use crate::world::iso::tile_to_world;
use crate::world::terrain::TerrainGrid;
use crate::world::{Body, GameObject, ObjectId, ObjectKind, Shadow};

impl Player {
    /// Build the player standing on `tile`.
    pub fn spawn(
        id: ObjectId,
        tile: IVec2,
        terrain: &TerrainGrid,
        library: &mut AnimationLibrary,
        attack_speed: f32,
    ) -> Result<GameObject, GameError> {
        let config = PlayerConfig::default();
        let height = terrain
            .height_at(tile)
            .ok_or(GameError::OutOfBounds { x: tile.x, y: tile.y })?;

        let mut weapon = Weapon::new(library)?;
        weapon.modify_attack_speed(attack_speed - weapon.attack_speed());

        let set = library.get_or_create("player", player_animations);
        let body = Body::new(tile_to_world(tile).extend(height), set)
            .with_extents(config.half_extents)
            .with_solid(true);

        let mut object = GameObject::new(
            id,
            body,
            ObjectKind::Player(Box::new(Player::new(config, weapon))),
        )
        .with_shadow();
        if let Some(shadow) = object.shadow.as_mut() {
            shadow.follow(&object.body, terrain);
        }
        Ok(object)
    }

    /// Apply damage unless invulnerable.
    pub fn take_hit(&mut self, amount: i32, ctx: &mut TickContext) {
        if self.invulnerability.active {
            return;
        }
        let was_alive = !self.health.is_dead();
        self.health.take_damage(amount);
        self.invulnerability.damaged = true;
        ctx.emit(GameEvent::PlayerDamaged { amount });
        if was_alive && self.health.is_dead() {
            info!("Player died");
            ctx.emit(GameEvent::PlayerDied);
        }
    }

    /// Heal from a landed hit while the HUD offers lifesteal.
    pub fn lifesteal(&mut self, window: LifestealWindow) {
        if let Some(amount) = self.weapon.lifesteal_amount(window) {
            self.health.heal_to(amount, window.ceiling);
        }
    }

    pub fn update(
        &mut self,
        id: ObjectId,
        body: &mut Body,
        shadow: &mut Option<Shadow>,
        ctx: &mut TickContext,
        others: &mut Neighbors,
    ) {
        if self.health.current <= 0 {
            self.controllable = false;
            body.animation.current = PlayerAnimation::DeadFront.index();
            body.animation.sync();
            self.weapon.drop_beside(body.position());
            return;
        }

        self.invulnerability.tick(self.config.damage_cooldown);
        self.stamina.recover(self.weapon.graph().current().is_idle());

        if !self.controllable {
            return;
        }

        let config = self.config;
        self.locomotion.moved = false;
        let mut animation = PlayerAnimation::IdleFront.index();
        self.facing_away = false;
        self.invulnerability.active |= self.weapon.graph().current().is_dodge();

        if body.z() < config.kill_height {
            self.respawn(id, body, shadow, ctx);
        }

        let axis = self.locomotion.read_input(ctx.input, self.can_move, &config);
        let walked = self.locomotion.step(body, axis, ctx.terrain, ctx.tick_seconds, &config, |moved| {
            others
                .iter()
                .any(|o| o.body.solid && moved.collides_with(&o.body))
        });
        if walked {
            animation = PlayerAnimation::RunningFront.index();
            ctx.play(SoundCue::Footstep);
        }
        if self
            .locomotion
            .jump(body, ctx.terrain, ctx.input, self.weapon.is_drawn(), &config)
        {
            animation = PlayerAnimation::JumpingFront.index();
        }

        if (!self.locomotion.moved && !self.locomotion.jumping) || self.weapon.in_action() {
            animation = self.weapon.graph().current().descriptor.player_animation.index();
        }

        if !self.weapon.is_attacking() {
            animation = self.face_pointer(body, ctx.input.pointer(), animation);
        }

        *ctx.camera = body.position().truncate();

        let back = PlayerAnimation::BACK_OFFSET;
        let weapon_poses = PlayerAnimation::WEAPON_OFFSET;
        if self.weapon.is_drawn()
            && (animation < weapon_poses || (back..back + weapon_poses - 1).contains(&animation))
        {
            animation += weapon_poses;
        }

        if self.weapon.attack_speed_changed() {
            self.rescale_attack_animations(body);
        }

        body.animation.current = animation;
        body.animation.sync();

        if let Some(shadow) = shadow.as_mut() {
            shadow.follow(body, ctx.terrain);
        }

        let pose = OwnerPose {
            position: body.position(),
            flipped: body.flip,
            facing_away: self.facing_away,
            moving: self.locomotion.moved,
            airborne: self.locomotion.is_airborne(),
            sprite_height: body.sprite_size().y,
        };
        let tick = self
            .weapon
            .update(pose, self.health.current, &mut self.stamina, ctx);
        self.apply_combo(tick, body, ctx);
    }

    /// Face the pointer horizontally and pick the front or back half of the
    /// animation table from its vertical position.
    fn face_pointer(&mut self, body: &mut Body, pointer: Vec2, animation: usize) -> usize {
        body.flip = pointer.x < body.x();
        let back = PlayerAnimation::BACK_OFFSET;
        if pointer.y > body.y() && animation >= back {
            self.facing_away = false;
            animation - back
        } else if pointer.y < body.y() && animation < back {
            self.facing_away = true;
            animation + back
        } else {
            animation
        }
    }

    fn rescale_attack_animations(&self, body: &mut Body) {
        let speed = self.weapon.attack_speed();
        for node in self.weapon.graph().attack_nodes() {
            let front = node.descriptor.player_animation.index();
            let fps = (body.animation.base_fps(front) as f32 * speed) as u32 + 1;
            body.animation.set_fps(front, fps);
            body.animation.set_fps(front + PlayerAnimation::BACK_OFFSET, fps);
        }
    }

    fn apply_combo(&mut self, tick: ComboTick, body: &mut Body, ctx: &mut TickContext) {
        self.can_move = tick.can_move;
        for effect in tick.effects {
            match effect {
                ComboEffect::Sound(cue) => ctx.play(cue),
                ComboEffect::SetSolid(solid) => body.solid = solid,
                ComboEffect::DodgeLaunch => {
                    self.locomotion.dodge_launch(ctx.input, body.flip, &self.config)
                }
                ComboEffect::Shake {
                    duration,
                    intensity,
                } => ctx.shake.start(duration, intensity),
            }
        }
    }

    /// Put the player back at the origin after falling off the map. The fall
    /// costs all remaining health.
    fn respawn(
        &mut self,
        id: ObjectId,
        body: &mut Body,
        shadow: &mut Option<Shadow>,
        ctx: &mut TickContext,
    ) {
        warn!("Player {} fell off the map", id);
        body.set_position(Vec3::ZERO);
        if let Some(shadow) = shadow.as_mut() {
            shadow.follow(body, ctx.terrain);
        }
        let health = self.health.current;
        self.take_hit(health, ctx);
    }

    pub fn advance_animations(&mut self) {
        self.weapon.advance_animation();
    }

    /// Draw the player with the weapon behind or in front, depending on
    /// facing and whether the weapon is drawn.
    pub fn render(&mut self, id: ObjectId, body: &mut Body, surface: &mut dyn DrawSurface) {
        let drawn = self.weapon.is_drawn();
        let behind = !self.weapon.in_action()
            && ((!self.facing_away && !drawn) || (self.facing_away && drawn));

        if behind {
            self.weapon.render(id, surface);
        }
        body.draw(id, surface);
        if !behind {
            self.weapon.render(id, surface);
        }
    }
}
