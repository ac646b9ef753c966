//! Ranged shots that fly in a straight line and burst on the player.

use bevy::prelude::*;

use crate::rendering::{AnimationLibrary, AnimationSet, AnimationSpec};
use crate::world::context::{Neighbors, TickContext};
use crate::world::{Body, GameObject, ObjectId, ObjectKind, Shadow};

pub const PROJECTILE_SHEET: &str = "enemies/projectile.png";

const FLIGHT: usize = 0;
const IMPACT: usize = 1;
/// Impact frame after which the shot disappears.
const LAST_IMPACT_FRAME: usize = 3;
/// Distance to the player that counts as a hit.
const HIT_RADIUS: f32 = 10.0;

pub fn projectile_animations() -> AnimationSet {
    AnimationSet::new(
        PROJECTILE_SHEET,
        Vec2::new(16.0, 16.0),
        &[AnimationSpec::new(4, 12, true), AnimationSpec::new(4, 12, false)],
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    /// Displacement per unit of speed.
    pub step: Vec3,
    pub speed: f32,
    pub damage: i32,
    collided: bool,
}

impl Projectile {
    /// Aim from `origin` at `target`. `flight_height` lifts the arc's screen
    /// y so shots read as travelling above the ground.
    pub fn new(origin: Vec3, target: Vec3, flight_height: f32) -> Self {
        let delta = Vec3::new(
            target.x - origin.x,
            target.y - origin.y + flight_height,
            target.z - origin.z,
        );
        let distance = origin.distance(target);
        let step = if distance > f32::EPSILON {
            delta / distance
        } else {
            Vec3::ZERO
        };
        Self {
            step,
            speed: 2.0,
            damage: 10,
            collided: false,
        }
    }

    pub fn spawn(
        id: ObjectId,
        origin: Vec3,
        target: Vec3,
        flight_height: f32,
        library: &mut AnimationLibrary,
    ) -> GameObject {
        let set = library.get_or_create(PROJECTILE_SHEET, projectile_animations);
        let body = Body::new(origin, set);
        GameObject::new(
            id,
            body,
            ObjectKind::Projectile(Self::new(origin, target, flight_height)),
        )
        .with_shadow()
    }

    pub fn has_collided(&self) -> bool {
        self.collided
    }

    pub fn update(
        &mut self,
        body: &mut Body,
        shadow: &mut Option<Shadow>,
        ctx: &mut TickContext,
        others: &mut Neighbors,
    ) {
        if self.collided {
            body.animation.current = IMPACT;
            body.animation.sync();
            if body.animation.frame() == LAST_IMPACT_FRAME {
                body.visible = false;
                body.remove = true;
            }
            return;
        }

        if let Some((player_body, player)) = others.player_mut() {
            if body.distance_to(player_body) <= HIT_RADIUS {
                self.collided = true;
                player.take_hit(self.damage, ctx);
                return;
            }
        }
        body.animation.current = FLIGHT;
        body.animation.sync();

        let next = body.position() + self.step * self.speed;
        body.set_position(next);
        if !ctx.terrain.in_bounds(body.tile()) {
            self.collided = true;
            return;
        }

        if let Some(shadow) = shadow.as_mut() {
            shadow.follow(body, ctx.terrain);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_is_normalised_by_the_aim_distance() {
        let shot = Projectile::new(Vec3::ZERO, Vec3::new(30.0, 40.0, 0.0), 0.0);
        assert!((shot.step.length() - 1.0).abs() < 1e-5);
        assert!((shot.step.x - 0.6).abs() < 1e-5);
    }

    #[test]
    fn aiming_at_itself_stays_put() {
        let shot = Projectile::new(Vec3::ONE, Vec3::ONE, 5.0);
        assert_eq!(shot.step, Vec3::ZERO);
        assert!(!shot.has_collided());
    }
}
