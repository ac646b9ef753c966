//! Isometric coordinate transform between world space and the tile grid.
//!
//! World space is the flat 2D plane everything is drawn in, with y growing
//! downwards. A tile at `(tx, ty)` is a 40x20 diamond centred on
//! [`tile_to_world`]. Height (`z`) is measured in tile levels and lifts the
//! drawn sprite by [`TILE_Z_HEIGHT`] per level.

use bevy::math::{IVec2, Vec2};

/// Diamond width in world units.
pub const TILE_WIDTH: f32 = 40.0;
/// Diamond height in world units.
pub const TILE_HEIGHT: f32 = 20.0;
/// Vertical draw offset of one height level.
pub const TILE_Z_HEIGHT: f32 = 20.0;

/// Tile containing the world point `p`.
///
/// The point is stretched back to a square grid (doubling y), rotated by 45
/// degrees and divided by the rotated tile edge. Both axes floor towards
/// negative infinity so the mapping stays correct on every side of the origin.
pub fn world_to_tile(p: Vec2) -> IVec2 {
    let flattened_y = TILE_HEIGHT - 2.0 * p.y;
    let along_x = (flattened_y + p.x) / TILE_WIDTH;
    let along_y = (flattened_y - p.x) / TILE_WIDTH;
    IVec2::new(along_x.floor() as i32, -(along_y.floor() as i32))
}

/// Centre of the tile diamond at `tile`.
pub fn tile_to_world(tile: IVec2) -> Vec2 {
    Vec2::new(
        (tile.x + tile.y) as f32 * TILE_WIDTH / 2.0,
        (tile.y - tile.x) as f32 * TILE_HEIGHT / 2.0,
    )
}

/// Whether `point` lies in the axis-aligned rectangle of `size` centred at
/// `center`. Edges count as inside.
pub fn in_rectangle(point: Vec2, center: Vec2, size: Vec2) -> bool {
    let half = size / 2.0;
    point.x >= center.x - half.x
        && point.x <= center.x + half.x
        && point.y >= center.y - half.y
        && point.y <= center.y + half.y
}

/// Chebyshev distance between two tiles.
pub fn tile_distance(a: IVec2, b: IVec2) -> i32 {
    let d = (a - b).abs();
    d.x.max(d.y)
}
