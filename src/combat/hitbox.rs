//! Per-frame damage points of the sword's attack animations.
//!
//! Each attack animation frame carries nine points relative to the weapon
//! anchor. On damage frames the points are moved into world space and an
//! enemy is hit when any of them lands inside its sprite rectangle.

use bevy::prelude::*;

use super::combo::SweepType;
use crate::world::iso::{in_rectangle, tile_distance};

/// Number of attack animations with hitbox data.
pub const ATTACK_ANIMATIONS: usize = 7;
/// Damage points per frame.
pub const POINTS: usize = 9;
/// Frames per attack animation.
pub const FRAMES: usize = 9;
/// Vertical swings only reach enemies this many tiles away.
pub const VERTICAL_SWEEP_REACH: i32 = 2;

/// Point offsets per attack animation. Row `2i` holds the x offsets of point
/// `i` and row `2i + 1` its y offsets; columns are animation frames.
#[rustfmt::skip]
const OFFSETS: [[[i16; 9]; 18]; ATTACK_ANIMATIONS] = [
    // Light attack 1
    [
        [ -42,   -8,   31,   40,   40,    6,  -28,  -36,  -26],
        [   6,   16,   -5,  -33,  -57,  -55,  -48,    3,   -5],
        [ -28,   -3,   22,   60,   39,    6,  -20,  -26,  -26],
        [  -6,   12,   -9,  -34,  -50,  -45,  -34,   -6,   -5],
        [ -35,  -13,   27,   54,   32,   11,  -17,  -33,  -26],
        [  -6,   12,  -12,  -28,  -55,  -48,  -44,   -6,   -5],
        [ -29,   -3,   22,   54,   28,    2,  -26,  -27,  -26],
        [   1,    8,  -18,  -39,  -50,  -48,  -40,    1,   -5],
        [ -20,  -16,   12,   30,   34,    3,  -13,  -18,  -26],
        [  -7,    8,  -13,  -40,  -44,  -35,  -40,   -7,   -5],
        [ -28,   -8,   17,   30,   32,   12,  -15,  -26,  -26],
        [ -14,    6,  -16,  -26,  -40,  -35,  -25,  -14,   -5],
        [ -14,   -8,   17,   42,   23,    0,   -5,  -12,  -26],
        [  -9,   -1,  -25,  -26,  -48,  -29,  -38,   -9,   -5],
        [ -25,  -17,    7,   42,   29,   12,  -14,  -23,  -26],
        [ -16,    1,  -18,  -40,  -34,  -29,  -34,  -21,   -5],
        [ -21,   -1,   13,   30,   16,    6,   -7,  -19,  -26],
        [ -13,    1,  -20,  -33,  -44,  -29,  -27,  -13,   -5],
    ],
    // Light attack 2
    [
        [ -36,  -28,    6,   40,   40,   31,   -8,  -42,  -36],
        [   3,  -48,  -55,  -57,  -33,   -5,   16,    6,  100],
        [ -26,  -20,    6,   39,   60,   22,   -3,  -28,  -36],
        [  -6,  -34,  -45,  -50,  -34,   -9,   12,   -6,  100],
        [ -33,  -17,   11,   32,   49,   27,  -13,  -35,  -36],
        [  -6,  -44,  -48,  -55,  -28,  -12,   12,   -6,  100],
        [ -27,  -26,    2,   28,   49,   22,   -3,  -29,  -36],
        [   1,  -40,  -48,  -50,  -39,  -18,    8,    1,  100],
        [ -18,  -13,    3,   34,   30,   12,  -16,  -20,  -36],
        [  -7,  -40,  -35,  -44,  -40,  -13,    8,   -7,  100],
        [ -26,  -15,   12,   32,   30,   17,   -8,  -28,  -36],
        [ -14,  -25,  -35,  -40,  -26,  -16,    6,  -14,  100],
        [ -12,   -5,    0,   23,   37,   17,   -8,  -14,  -26],
        [  -9,  -38,  -29,  -48,  -26,  -25,   -1,   -9,  500],
        [ -23,  -14,   12,   29,   37,    7,  -17,  -25,  -26],
        [ -21,  -34,  -29,  -34,  -40,  -18,    1,  -17,  500],
        [ -19,   -7,    6,   16,   30,   13,   -1,  -21,  -26],
        [ -13,  -27,  -29,  -44,  -33,  -20,    1,  -13,  500],
    ],
    // Heavy attack 1
    [
        [ -30,    0,   30,   60,   35,   55,   60,   60,   60],
        [   5,   20,    5,    0,  -12,  -12,  -14,  -16,  -20],
        [ -30,    0,   30,   60,   15,   35,   45,   40,   45],
        [   5,   20,    5,    0,  -12,  -12,  -20,  -24,  -14],
        [ -30,    0,   30,   60,   25,   45,   35,   50,   55],
        [   5,   20,    5,    0,  -18,  -18,  -20,  -18,  -24],
        [ -30,    0,   30,   60,   25,   45,   52,   50,   55],
        [   5,   20,    5,    0,   -8,   -8,  -14,  -12,  -16],
        [ -30,    0,   30,   60,   15,   30,   35,   40,   45],
        [   5,   20,    5,    0,  -18,  -18,  -10,  -24,  -26],
        [ -30,    0,   30,   60,    5,   18,   30,   30,   30],
        [   5,   20,    5,    0,  -12,   -8, -150,  -18,  -14],
        [ -12,   -5,    0,   23,    5,   18,   15,   30,   30],
        [  -9,  -38,  -29,  -48,  -20,  -20,  -21,  -24,  -26],
        [ -23,  -14,   12,   29,    5,   25,   15,   30,   45],
        [ -21,  -34,  -29,  -34,   -7,  -12,   -9,  -12,  -20],
        [ -19,   -7,    6,   16,   15,   35,   45,   40,   35],
        [ -13,  -27,  -29,  -44,   -8,   -8,  -10,  -12,  -20],
    ],
    // Heavy attack 2
    [
        [ -30,    0,   30,   60,   30,    0,   46,   55,   55],
        [   5,   20,    5,    0,   -5,  -20,  -42,   20,   25],
        [ -30,    0,   30,   60,   30,    0,   40,   45,   45],
        [   5,   20,    5,    0,   -5,  -20,  -30,   17,   22],
        [ -30,    0,   30,   60,   30,    0,   44,   35,   35],
        [   5,   20,    5,    0,   -5,  -20,  -38,   14,   19],
        [ -30,    0,   30,   60,   30,    0,   35,   25,   25],
        [   5,   20,    5,    0,   -5,  -20,  -20,   11,   16],
        [ -30,    0,   30,   60,   30,    0,   27,   45,   45],
        [   5,   20,    5,    0,   -5,  -20,  -10,   12,   17],
        [ -30,    0,   30,   60,   30,    0,   37,   35,   45],
        [   5,   20,    5,    0,   -5,  -20,  -35,   24,   29],
        [ -12,   -5,    0,   23,    5,   18,   20,   25,   30],
        [  -9,  -38,  -29,  -48,  -20,  -20,  -15,   24,   29],
        [ -23,  -14,   12,   29,    5,   25,   27,   40,   45],
        [ -21,  -34,  -29,  -34,   -7,  -12,  -35,   25,   30],
        [ -19,   -7,    6,   16,   15,   35,   35,   30,   35],
        [ -13,  -27,  -29,  -44,   -8,   -8,  -42,   25,   30],
    ],
    // Heavy combo 1
    [
        [ -50,  -57,  -37,  -37,   30,    0,   34,   44,   44],
        [   5,  -15,  -55,  -55,   -5,  -20,   12,   18,   18],
        [ -50,  -37,  -27,  -27,   30,    0,   27,   37,   37],
        [   5,  -15,  -45,  -45,   -5,  -20,    1,    7,    7],
        [ -50,  -17,  -17,  -17,   30,    0,   27,   37,   37],
        [   5,  -15,  -35,  -35,   -5,  -20,   15,   21,   21],
        [ -50,  -47,  -37,  -37,   30,    0,   20,   30,   30],
        [   5,  -20,  -45,  -45,   -5,  -20,   -2,    4,    4],
        [ -50,  -47,  -23,  -23,   30,    0,   20,   30,   30],
        [   5,  -10,  -50,  -50,   -5,  -20,    7,   13,   13],
        [ -50,  -30,  -15,  -15,   30,    0,   10,   20,   20],
        [   5,  -10,  -40,  -40,   -5,  -20,   -5,    1,    1],
        [ -12,  -30,  -25,  -25,    5,   18,   10,   20,   20],
        [   9,  -20,  -35,  -35,  -20,  -20,    5,   11,   11],
        [ -23,  -17,  -20,  -20,    5,   25,   10,   20,   20],
        [  21,  -24,  -25,  -25,   -7,  -12,  -12,   -6,   -6],
        [ -19,  -17,  -10,  -10,   15,   35,    5,   15,   15],
        [ -13,   -6,  -35,  -35,   -8,   -8,   -6,    0,    0],
    ],
    // Heavy combo 2
    [
        [ -50,  -37,  -27,  -27,   30,    0,   40,   44,   44],
        [   5,    5,  -45,  -45,   -5,  -20,   22,   33,   33],
        [ -50,  -32,  -17,  -17,   30,    0,   37,   37,   37],
        [   5,    2,  -35,  -35,   -5,  -20,   11,   22,   22],
        [ -50,   -7,   -7,   -7,   30,    0,   37,   37,   37],
        [   5,    5,  -25,  -25,   -5,  -20,   25,   36,   36],
        [ -50,  -32,  -27,  -27,   30,    0,   30,   30,   30],
        [   5,    0,  -35,  -35,   -5,  -20,    8,   19,   19],
        [ -50,  -37,  -13,  -13,   30,    0,   30,   30,   30],
        [   5,   10,  -40,  -40,   -5,  -20,   17,   28,   28],
        [ -50,  -20,   -5,   -5,   30,    0,   20,   20,   20],
        [   5,   10,  -30,  -30,   -5,  -20,    5,   16,   16],
        [ -12,  -20,  -15,  -15,    5,   18,   20,   20,   20],
        [   9,    0,  -25,  -25,  -20,  -20,   15,   26,   26],
        [ -23,   -7,  -10,  -10,    5,   25,   20,   20,   20],
        [  21,   -4,  -15,  -15,   -7,  -12,    8,    9,    9],
        [ -19,   -7,    0,    0,   15,   35,   15,   15,   15],
        [ -13,   14,  -25,  -25,   -8,   -8,    4,   15,   15],
    ],
    // Whirl
    [
        [ -42,   -8,   31,   40,   40,    6,  -28,  -36,  -26],
        [   6,   16,   -5,  -33,  -57,  -55,  -48,    3,   -5],
        [ -28,   -3,   22,   60,   39,    6,  -20,  -26,  -26],
        [  -6,   12,   -9,  -34,  -50,  -45,  -34,   -6,   -5],
        [ -35,  -13,   27,   54,   32,   11,  -17,  -33,  -26],
        [  -6,   12,  -12,  -28,  -55,  -48,  -44,   -6,   -5],
        [ -29,   -3,   22,   54,   28,    2,  -26,  -27,  -26],
        [   1,    8,  -18,  -39,  -50,  -48,  -40,    1,   -5],
        [ -20,  -16,   12,   30,   34,    3,  -13,  -18,  -26],
        [  -7,    8,  -13,  -40,  -44,  -35,  -40,   -7,   -5],
        [ -28,   -8,   17,   30,   32,   12,  -15,  -26,  -26],
        [ -14,    6,  -16,  -26,  -40,  -35,  -25,  -14,   -5],
        [ -14,   -8,   17,   42,   23,    0,   -5,  -12,  -26],
        [  -9,   -1,  -25,  -26,  -48,  -29,  -38,   -9,   -5],
        [ -25,  -17,    7,   42,   29,   12,  -14,  -23,  -26],
        [ -16,    1,  -18,  -40,  -34,  -29,  -34,  -21,   -5],
        [ -21,   -1,   13,   30,   16,    6,   -7,  -19,  -26],
        [ -13,    1,  -20,  -33,  -44,  -29,  -27,  -13,   -5],
    ],
];

/// Frames of each attack animation that deal damage.
#[rustfmt::skip]
const DAMAGE_FRAMES: [[bool; 9]; ATTACK_ANIMATIONS] = [
    [false, true , true , true , true , true , true , true , false], // Light attack 1
    [false, true , true , true , true , true , true , true , false], // Light attack 2
    [false, false, false, false, true , true , true , true , true ], // Heavy attack 1
    [false, false, false, false, false, false, true , true , true ], // Heavy attack 2
    [false, true , true , true , false, false, true , true , true ], // Heavy combo 1
    [false, true , true , true , false, false, true , true , true ], // Heavy combo 2
    [true , true , true , true , true , true , true , true , false], // Whirl
];

/// Whether `frame` of attack animation `attack` deals damage.
pub fn is_damage_frame(attack: usize, frame: usize) -> bool {
    DAMAGE_FRAMES
        .get(attack)
        .and_then(|frames| frames.get(frame))
        .copied()
        .unwrap_or(false)
}

/// World-space damage points for one frame, mirrored when the owner faces
/// left. Coordinates truncate towards zero. Returns None on frames that
/// deal no damage.
pub fn damage_points(anchor: Vec2, attack: usize, frame: usize, flipped: bool) -> Option<[IVec2; POINTS]> {
    if !is_damage_frame(attack, frame) {
        return None;
    }
    let rows = &OFFSETS[attack];
    Some(std::array::from_fn(|i| {
        let dx = rows[2 * i][frame] as f32;
        let dy = rows[2 * i + 1][frame] as f32;
        let x = if flipped { anchor.x - dx } else { anchor.x + dx };
        IVec2::new(x as i32, (anchor.y + dy + 10.0) as i32)
    }))
}

/// Vertical swings connect only with targets within
/// [`VERTICAL_SWEEP_REACH`] tiles; horizontal swings are not gated.
pub fn sweep_reaches(sweep: SweepType, attacker: IVec2, target: IVec2) -> bool {
    match sweep {
        SweepType::Horizontal => true,
        SweepType::Vertical => tile_distance(attacker, target) <= VERTICAL_SWEEP_REACH,
    }
}

/// The weapon's current damage points. Only refreshed on damage frames.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HitBox {
    points: [IVec2; POINTS],
}

impl HitBox {
    pub fn update(&mut self, anchor: Vec2, attack: usize, frame: usize, flipped: bool) {
        if let Some(points) = damage_points(anchor, attack, frame, flipped) {
            self.points = points;
        }
    }

    pub fn points(&self) -> &[IVec2; POINTS] {
        &self.points
    }

    /// Any point inside the rectangle of `size` centred at `center`.
    pub fn is_hit(&self, center: Vec2, size: Vec2) -> bool {
        self.points
            .iter()
            .any(|p| in_rectangle(p.as_vec2(), center, size))
    }
}
