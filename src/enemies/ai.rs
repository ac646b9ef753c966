//! Enemy behavior: chasing along A* routes, melee swings, staggering,
//! being thrown and dying.

use bevy::prelude::*;

use super::components::{Enemy, EnemyAnimation};
use super::pathfinding::find_path;
use crate::combat::hitbox::sweep_reaches;
use crate::core::{GameEvent, SoundCue};
use crate::world::context::{Neighbors, TickContext};
use crate::world::iso::{tile_to_world, world_to_tile};
use crate::world::terrain::TerrainGrid;
use crate::world::{Body, ObjectId, Shadow};

/// Hits are only checked against a player this close.
const DAMAGE_CHECK_RANGE: f32 = 100.0;
/// Distance at which a waypoint counts as reached.
const WAYPOINT_TOLERANCE: f32 = 2.0;

fn can_enter(terrain: &TerrainGrid, tile: IVec2, z: f32) -> bool {
    terrain.is_traversable(tile) && terrain.height_at(tile).is_some_and(|h| z - h >= 0.0)
}

fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

impl Enemy {
    pub fn update(
        &mut self,
        id: ObjectId,
        body: &mut Body,
        shadow: &mut Option<Shadow>,
        ctx: &mut TickContext,
        others: &mut Neighbors,
    ) {
        if self.dead {
            return;
        }
        if let Some(shadow) = shadow.as_mut() {
            shadow.follow(body, ctx.terrain);
        }

        self.fly(body, ctx, others);
        if self.thrown {
            body.animation.sync();
            self.moving = false;
            return;
        } else if self.inertia != IVec2::ZERO && !self.moving {
            self.slide(body, ctx.terrain);
        }

        if self.health.is_dead() {
            self.die(id, body, ctx);
            return;
        }

        if !self.damaged {
            self.check_for_damage(id, body, ctx, others);
        }
        if self.damaged {
            self.stagger(body, ctx, others);
            if self.can_be_staggered {
                self.moving = false;
                body.animation.sync();
                return;
            }
        }

        self.moving = false;
        if self.wait > 0 {
            self.wait -= 1;
        } else if !self.attacking {
            self.seek(body, ctx, others);
        } else {
            self.swing(body, ctx, others);
        }
        body.animation.sync();
    }

    /// Thrown flight. Hitting a cliff or the map edge stops the flight, and
    /// the first solid object struck stops it too. Enemies struck are killed.
    fn fly(&mut self, body: &mut Body, ctx: &mut TickContext, others: &mut Neighbors) {
        if self.thrown && self.inertia.x != 0 {
            let new_x = body.x() + self.inertia.x.signum() as f32 * self.inertia_step;
            let tile = world_to_tile(Vec2::new(new_x, body.y()));
            match ctx.terrain.height_at(tile) {
                Some(h) if h <= body.z() => body.set_x(new_x),
                _ => self.inertia.x = 1,
            }
            self.inertia.x -= self.inertia.x.signum();

            let struck = others
                .iter_mut()
                .find(|o| !o.is_player() && o.body.solid && body.collides_with(&o.body));
            if let Some(struck) = struck {
                self.inertia.x = 0;
                if let Some(enemy) = struck.as_enemy_mut() {
                    let remaining = enemy.health.current;
                    enemy.damage(remaining);
                }
            }
        }
        if self.thrown && self.inertia.x == 0 {
            self.thrown = false;
            self.health.current = 0;
        }
    }

    /// Knockback drift, a quarter step per tick on each axis.
    fn slide(&mut self, body: &mut Body, terrain: &TerrainGrid) {
        let step = self.inertia_step / 4.0;

        let new_x = body.x() + self.inertia.x.signum() as f32 * step;
        if can_enter(terrain, world_to_tile(Vec2::new(new_x, body.y())), body.z()) {
            body.set_x(new_x);
        } else {
            self.inertia.x = 1;
        }
        self.inertia.x -= self.inertia.x.signum();

        let new_y = body.y() + self.inertia.y.signum() as f32 * step;
        if can_enter(terrain, world_to_tile(Vec2::new(body.x(), new_y)), body.z()) {
            body.set_y(new_y);
        } else {
            self.inertia.y = 1;
        }
        self.inertia.y -= self.inertia.y.signum();
    }

    fn die(&mut self, id: ObjectId, body: &mut Body, ctx: &mut TickContext) {
        let score = self.definition.score;
        ctx.ledger.score += score;
        ctx.ledger.enemy_count -= 1;

        body.animation.current = EnemyAnimation::Dead.index();
        body.solid = false;
        ctx.play(SoundCue::EnemyDeath);
        ctx.emit(GameEvent::EnemyKilled { id, score });
        debug!("Enemy {} destroyed, {} enemies left", id, ctx.ledger.enemy_count);

        self.dead = true;
        self.moving = false;
        self.path = None;
        self.destination = None;
        body.animation.sync();
    }

    /// Test the player's sword against this enemy. A landed hit may heal the
    /// player and, on a stabbing attack, take the enemy out of the world onto
    /// the blade.
    fn check_for_damage(
        &mut self,
        id: ObjectId,
        body: &mut Body,
        ctx: &mut TickContext,
        others: &mut Neighbors,
    ) {
        let Some((player_body, player)) = others.player_mut() else {
            return;
        };
        if body.distance_to(player_body) > DAMAGE_CHECK_RANGE || player_body.z() > body.z() + 1.0 {
            return;
        }
        if !player.weapon.is_doing_damage() {
            return;
        }
        let Some(attack) = player.weapon.current_attack().copied() else {
            return;
        };
        if !sweep_reaches(attack.sweep, player_body.tile(), body.tile()) {
            return;
        }

        let size = body.sprite_size();
        let center = Vec2::new(body.x(), body.y() - size.y / 2.0);
        self.damaged = player.weapon.hitbox().is_hit(center, size);
        if !self.damaged {
            return;
        }

        self.incoming = attack.damage;
        player.lifesteal(ctx.lifesteal);
        if self.stabbable && attack.can_stab && player.weapon.claim_victim(id) {
            body.remove = true;
            ctx.ledger.enemy_count -= 1;
        }
    }

    /// Hit reaction. Damage and knockback land on the first tick; the
    /// stagger pose holds until the invulnerability window runs out.
    fn stagger(&mut self, body: &mut Body, ctx: &mut TickContext, others: &Neighbors) {
        let window = self.definition.invulnerability;
        if self.damage_timer == window {
            ctx.play(SoundCue::EnemyHurt);
            self.damage(self.incoming);
            if self.health.current < self.definition.stab_threshold {
                self.stabbable = true;
            }
            if self.can_be_staggered {
                let player_x = others.player().map_or(body.x(), |p| p.body.x());
                let knockback = self.definition.knockback;
                self.inertia.x = if body.x() - player_x > 0.0 {
                    knockback
                } else {
                    -knockback
                };
            }
        }

        if self.can_be_staggered {
            body.animation.current = EnemyAnimation::Damaged.index();
        }
        if self.damage_timer > 0 {
            self.damage_timer -= 1;
        } else {
            body.animation.current = EnemyAnimation::Idle.index();
            self.damage_timer = window;
            self.damaged = false;
        }
    }

    /// Route towards the player, or start a swing once close enough.
    fn seek(&mut self, body: &mut Body, ctx: &mut TickContext, others: &Neighbors) {
        let Some(player) = others.player() else {
            return;
        };
        let player_position = player.body.position();
        let player_tile = player.body.tile();
        let distance = body.position().distance(player_position);
        let melee_range = self.definition.melee_range;

        if distance > melee_range && self.destination.is_none() {
            if self.path.is_none() || self.final_destination != Some(player_tile) {
                self.final_destination = Some(player_tile);
                if !ctx.terrain.is_traversable(player_tile) {
                    return;
                }
                self.path = find_path(ctx.terrain, body.tile(), player_tile);
            }
            if let Some(path) = self.path.as_mut() {
                self.destination = path.pop();
            }
        } else {
            if let Some(waypoint) = self.destination {
                let target = tile_to_world(waypoint);
                if (body.x() - target.x).abs() <= WAYPOINT_TOLERANCE
                    && (body.y() - target.y).abs() <= WAYPOINT_TOLERANCE
                {
                    self.destination = None;
                } else {
                    self.walk_towards(body, target, ctx.terrain, others);
                    body.animation.current = EnemyAnimation::Walk.index();
                    let frame = body.animation.frame();
                    if frame == 5 || frame == 13 {
                        ctx.play(SoundCue::EnemyStep);
                    }
                }
            } else {
                body.animation.current = EnemyAnimation::Melee.index();
            }
            if self.path.as_ref().is_some_and(|p| p.is_empty()) {
                self.path = None;
            }
        }

        if distance < melee_range {
            body.flip = body.x() > player_position.x;
            self.destination = None;
            self.path = None;
            self.attacking = true;
            self.attack_time = 0;
        }
    }

    /// Step towards `target`, x first. A blocked step tries to slip past the
    /// obstruction sideways before giving up.
    fn walk_towards(&mut self, body: &mut Body, target: Vec2, terrain: &TerrainGrid, others: &Neighbors) {
        self.moving = true;
        body.flip = body.x() > target.x;
        let step = self.definition.speed / 4.0;

        if (target.x - body.x()).abs() > 1.0 {
            let anchor = body.tile();
            let old_x = body.x();
            body.set_x(body.x() - sign(body.x() - target.x) * step);
            if !can_enter(terrain, body.tile(), body.z()) {
                if !terrain.is_traversable(anchor + IVec2::new(0, 1)) {
                    body.set_y(body.y() + 1.0);
                } else if anchor.y > 0 && !terrain.is_traversable(anchor + IVec2::new(0, -1)) {
                    body.set_y(body.y() - 1.0);
                } else if let Some(other) = Self::obstruction(body, others) {
                    let push = other.half_extents.y;
                    if other.y() < body.y() {
                        body.set_y(body.y() + push);
                    } else {
                        body.set_y(body.y() - push);
                    }
                }
                if !can_enter(terrain, body.tile(), body.z()) {
                    body.set_x(old_x);
                }
            }
        }

        if (target.y - body.y()).abs() > 1.0 {
            let anchor = body.tile();
            let old_y = body.y();
            body.set_y(body.y() - sign(body.y() - target.y) * step);
            if !can_enter(terrain, body.tile(), body.z()) {
                let last = IVec2::new(terrain.width() - 1, terrain.height() - 1);
                if anchor.x > 0 && anchor.y > 0 && !terrain.is_traversable(anchor - IVec2::ONE) {
                    body.set_x(body.x() + 1.0);
                } else if anchor.x < last.x
                    && anchor.y < last.y
                    && !terrain.is_traversable(anchor + IVec2::ONE)
                {
                    body.set_x(body.x() - 1.0);
                } else if let Some(other) = Self::obstruction(body, others) {
                    let push = other.half_extents.x;
                    if other.x() < body.x() {
                        body.set_x(body.x() + push);
                    } else {
                        body.set_x(body.x() - push);
                    }
                }
                if !can_enter(terrain, body.tile(), body.z()) {
                    body.set_y(old_y);
                }
            }
        }
    }

    fn obstruction<'b>(body: &Body, others: &'b Neighbors) -> Option<&'b Body> {
        others
            .iter()
            .map(|o| &o.body)
            .find(|other| other.solid && body.collides_with(other))
    }

    /// One tick of the melee swing. The blow lands on the configured frame if
    /// the player stands in front within reach.
    fn swing(&mut self, body: &mut Body, ctx: &mut TickContext, others: &mut Neighbors) {
        let def = &self.definition;
        if self.attack_time == 0 {
            body.animation.current = EnemyAnimation::Melee.index();
            self.can_be_staggered = false;
        } else if body.animation.frame() == def.melee_frame {
            ctx.play(SoundCue::EnemySwing);
            if let Some((player_body, player)) = others.player_mut() {
                let dx = player_body.x() - body.x();
                let level = (body.z() - player_body.z()).abs() <= 1.0;
                let in_line = (player_body.y() - body.y()).abs() <= def.melee_reach;
                let in_front = if body.flip {
                    dx < 0.0 && -dx < def.melee_reach
                } else {
                    dx > 0.0 && dx < def.melee_reach
                };
                if level && in_line && in_front {
                    player.take_hit(def.melee_damage, ctx);
                }
            }
        } else if self.attack_time == def.melee_time {
            self.wait = def.attack_cooldown();
            body.animation.current = EnemyAnimation::Idle.index();
            self.attacking = false;
            self.can_be_staggered = true;
        }
        self.attack_time += 1;
    }
}
