//! Walking, sliding, jumping and dodging on the tile grid.

use bevy::prelude::*;

use super::components::PlayerConfig;
use crate::core::{Action, InputState};
use crate::world::terrain::TerrainGrid;
use crate::world::Body;

/// World units per unit of speed per second.
pub const PIXEL_SCALE: f32 = 6.0;

/// Inertia timer used after releasing the up key. The other directions use
/// the full inertia maximum.
const UP_INERTIA_TICKS: i32 = 5;

/// Player motion state carried between ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct Locomotion {
    pub speed: f32,
    /// Residual slide per axis, decaying by one each tick.
    pub inertia: IVec2,
    inertia_time: IVec2,
    /// A direction key was active this tick.
    pub moved: bool,
    pub jumping: bool,
    jump_time: u32,
    pub falling: bool,
}

impl Locomotion {
    pub fn new(config: &PlayerConfig) -> Self {
        Self {
            speed: config.resting_speed,
            inertia: IVec2::ZERO,
            inertia_time: IVec2::ZERO,
            moved: false,
            jumping: false,
            jump_time: 0,
            falling: false,
        }
    }

    pub fn is_airborne(&self) -> bool {
        self.jumping || self.falling
    }

    /// Sample the direction keys. Returns the input axis, y growing downwards.
    pub fn read_input(&mut self, input: &InputState, can_move: bool, config: &PlayerConfig) -> Vec2 {
        let mut axis = Vec2::ZERO;
        if !can_move {
            return axis;
        }
        let max = config.inertia_max;

        if input.key_active(Action::Up) {
            axis.y -= 1.0;
            self.inertia.y = -max;
            self.inertia_time.y = UP_INERTIA_TICKS;
            self.moved = true;
        } else {
            self.inertia_time.y -= 1;
        }
        if input.key_active(Action::Down) {
            axis.y += 1.0;
            self.inertia.y = max;
            self.inertia_time.y = max;
            self.moved = true;
        } else {
            self.inertia_time.y -= 1;
        }
        if input.key_active(Action::Left) {
            axis.x -= 1.0;
            self.inertia.x = -max;
            self.inertia_time.x = max;
            self.moved = true;
        } else {
            self.inertia_time.x -= 1;
        }
        if input.key_active(Action::Right) {
            axis.x += 1.0;
            self.inertia.x = max;
            self.inertia_time.x = max;
            self.moved = true;
        } else {
            self.inertia_time.x -= 1;
        }

        if self.inertia_time.x <= 0 {
            self.inertia.x = 0;
        }
        if self.inertia_time.y <= 0 {
            self.inertia.y = 0;
        }
        axis
    }

    /// Move along y, then x. A rejected step puts the body back where it
    /// started the tick. `blocked` reports a collision with a solid neighbor.
    /// Returns true if the body tried to move at all.
    pub fn step(
        &mut self,
        body: &mut Body,
        axis: Vec2,
        terrain: &TerrainGrid,
        tick_seconds: f32,
        config: &PlayerConfig,
        blocked: impl Fn(&Body) -> bool,
    ) -> bool {
        let sliding = self.inertia != IVec2::ZERO;
        let active = self.moved || sliding;
        if active {
            let start = body.position();
            let scale = tick_seconds * PIXEL_SCALE;

            if self.moved {
                body.set_y(body.y() + axis.y * scale * self.speed);
            } else if self.inertia.y != 0 {
                body.set_y(body.y() + self.inertia.y as f32 * scale * config.inertia);
                self.inertia.y -= self.inertia.y.signum();
            }
            if !self.can_stand(body, terrain, &blocked) {
                body.set_position(start);
            }

            if self.moved {
                body.set_x(body.x() + axis.x * scale * self.speed);
            } else if self.inertia.x != 0 {
                body.set_x(body.x() + self.inertia.x as f32 * scale * config.inertia);
                self.inertia.x -= self.inertia.x.signum();
            }
            if !self.can_stand(body, terrain, &blocked) {
                body.set_position(start);
            }
        }

        if self.moved && self.speed < config.max_speed {
            self.speed += config.speed_ramp;
        } else if !self.moved {
            self.speed = config.resting_speed;
        }
        active
    }

    fn can_stand(&self, body: &Body, terrain: &TerrainGrid, blocked: &impl Fn(&Body) -> bool) -> bool {
        if body.solid && blocked(body) {
            return false;
        }
        terrain
            .get(body.tile())
            .is_some_and(|t| (t.traversable || self.jumping) && t.height <= body.z())
    }

    /// Start, continue or land a jump. Returns true while rising.
    pub fn jump(
        &mut self,
        body: &mut Body,
        terrain: &TerrainGrid,
        input: &InputState,
        weapon_drawn: bool,
        config: &PlayerConfig,
    ) -> bool {
        let can_jump = !weapon_drawn && !self.falling;
        let mut rising = false;

        if !self.jumping && can_jump {
            if input.key_down(Action::JumpDodge) {
                self.jumping = true;
                self.jump_time = 0;
            }
        } else if self.jumping {
            rising = true;
            if self.jump_time < config.jump_ticks {
                body.set_z(body.z() + config.jump_height / config.jump_ticks as f32);
                self.jump_time += 1;
            } else {
                self.jumping = false;
            }
        }

        if !self.jumping {
            // Off the grid there is no floor.
            let ground = terrain.height_at(body.tile()).unwrap_or(f32::NEG_INFINITY);
            if body.z() > ground {
                body.set_z(body.z() - config.fall_speed / config.jump_ticks as f32);
                self.falling = true;
            } else {
                self.jump_time = 0;
                body.set_z(ground);
                self.falling = false;
            }
        }
        rising
    }

    /// Leap along the held directions, or forward if none are held.
    /// Diagonal leaps are shortened.
    pub fn dodge_launch(&mut self, input: &InputState, flipped: bool, config: &PlayerConfig) {
        let distance = config.dodge_distance;
        if input.key_active(Action::Left) {
            self.inertia.x = -distance;
        }
        if input.key_active(Action::Right) {
            self.inertia.x = distance;
        }
        if input.key_active(Action::Down) {
            self.inertia.y = distance;
        }
        if input.key_active(Action::Up) {
            self.inertia.y = -distance;
        }

        if self.inertia == IVec2::ZERO {
            self.inertia.x = if flipped { -distance } else { distance };
        }
        if self.inertia.x != 0 && self.inertia.y != 0 {
            self.inertia.x = (self.inertia.x as f32 / 1.5) as i32;
            self.inertia.y = (self.inertia.y as f32 / 1.5) as i32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::InputSnapshot;
    use crate::player::player_animations;
    use crate::world::iso::tile_to_world;
    use std::sync::Arc;

    fn body_at(tile: IVec2) -> Body {
        Body::new(tile_to_world(tile).extend(0.0), Arc::new(player_animations()))
            .with_extents(Vec3::new(10.0, 5.0, 2.0))
            .with_solid(true)
    }

    fn holding(action: Action) -> InputState {
        let mut input = InputState::default();
        input.latch(InputSnapshot::default().with(action));
        input
    }

    #[test]
    fn walking_ramps_speed_and_moves_right() {
        let config = PlayerConfig::default();
        let terrain = TerrainGrid::flat(16, 16).unwrap();
        let mut body = body_at(IVec2::new(7, 7));
        let start = body.x();
        let mut motion = Locomotion::new(&config);

        let input = holding(Action::Right);
        let axis = motion.read_input(&input, true, &config);
        motion.step(&mut body, axis, &terrain, 1.0 / 60.0, &config, |_| false);

        assert!((body.x() - start - 2.0).abs() < 1e-4);
        assert_eq!(motion.speed, 20.5);
        assert_eq!(motion.inertia, IVec2::new(10, 0));
    }

    #[test]
    fn blocked_tile_keeps_the_old_position() {
        let config = PlayerConfig::default();
        let terrain = TerrainGrid::flat(16, 16).unwrap();
        let mut body = body_at(IVec2::new(7, 7));
        let start = body.position();
        let mut motion = Locomotion::new(&config);

        let input = holding(Action::Right);
        let axis = motion.read_input(&input, true, &config);
        motion.step(&mut body, axis, &terrain, 1.0 / 60.0, &config, |_| true);
        assert_eq!(body.position(), start);
    }

    #[test]
    fn jump_rises_then_lands() {
        let config = PlayerConfig::default();
        let terrain = TerrainGrid::flat(16, 16).unwrap();
        let mut body = body_at(IVec2::new(3, 3));
        let mut motion = Locomotion::new(&config);

        let press = holding(Action::JumpDodge);
        motion.jump(&mut body, &terrain, &press, false, &config);
        assert!(motion.jumping);

        let idle = InputState::default();
        for _ in 0..config.jump_ticks {
            assert!(motion.jump(&mut body, &terrain, &idle, false, &config));
        }
        assert!((body.z() - config.jump_height).abs() < 1e-4);

        for _ in 0..200 {
            motion.jump(&mut body, &terrain, &idle, false, &config);
        }
        assert_eq!(body.z(), 0.0);
        assert!(!motion.is_airborne());
    }

    #[test]
    fn drawn_weapon_prevents_jumping() {
        let config = PlayerConfig::default();
        let terrain = TerrainGrid::flat(16, 16).unwrap();
        let mut body = body_at(IVec2::new(3, 3));
        let mut motion = Locomotion::new(&config);
        motion.jump(&mut body, &terrain, &holding(Action::JumpDodge), true, &config);
        assert!(!motion.jumping);
    }

    #[test]
    fn diagonal_dodge_is_shortened() {
        let config = PlayerConfig::default();
        let mut motion = Locomotion::new(&config);
        let mut input = InputState::default();
        input.latch(InputSnapshot::default().with(Action::Left).with(Action::Down));
        motion.dodge_launch(&input, false, &config);
        assert_eq!(motion.inertia, IVec2::new(-13, 13));

        let mut forward = Locomotion::new(&config);
        forward.dodge_launch(&InputState::default(), true, &config);
        assert_eq!(forward.inertia, IVec2::new(-20, 0));
    }
}
