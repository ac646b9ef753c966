//! The fixed-size tile grid the world is built on.
//!
//! Tiles carry a height in levels and a traversable flag. Solid decorations
//! mark their tile as obstructed so the pathfinder routes around them.

use bevy::math::{IVec2, Vec2};
use rand::Rng;

use super::iso::{tile_to_world, world_to_tile};
use crate::core::GameError;

/// Height of the impassable cliff ring around the playfield.
pub const BORDER_HEIGHT: f32 = 3.0;

/// Surface texture of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileKind {
    Dirt,
    Cliff,
}

impl TileKind {
    pub fn sheet(self) -> &'static str {
        match self {
            TileKind::Dirt => "tiles/dirt.png",
            TileKind::Cliff => "tiles/cliff.png",
        }
    }
}

/// A single grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    /// Height in levels.
    pub height: f32,
    pub traversable: bool,
    pub kind: TileKind,
    /// A solid decoration stands on this tile.
    pub obstructed: bool,
}

impl Tile {
    pub fn new(kind: TileKind, height: f32) -> Self {
        Self {
            height,
            traversable: true,
            kind,
            obstructed: false,
        }
    }

    pub fn blocked(kind: TileKind, height: f32) -> Self {
        Self {
            traversable: false,
            ..Self::new(kind, height)
        }
    }
}

/// Answer to "can something stand on this tile".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    OutOfBounds,
    Blocked,
    Open,
}

/// Tile matrix indexed by `(x, y)` with `x` in `[0, width)` and `y` in `[0, height)`.
#[derive(Debug, Clone)]
pub struct TerrainGrid {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

impl TerrainGrid {
    /// Level dirt field with no border.
    pub fn flat(width: i32, height: i32) -> Result<Self, GameError> {
        if width <= 0 || height <= 0 {
            return Err(GameError::InvalidTerrainSize { width, height });
        }
        Ok(Self {
            width,
            height,
            tiles: vec![Tile::new(TileKind::Dirt, 0.0); (width * height) as usize],
        })
    }

    /// Cliff border along `y == 0` and `x == width - 1`, with the interior a
    /// random mix of dirt and flat cliff texture. Every tile is traversable.
    pub fn generate(width: i32, height: i32, rng: &mut impl Rng) -> Result<Self, GameError> {
        let mut grid = Self::flat(width, height)?;
        for x in 0..width {
            for y in 0..height {
                let tile = if y == 0 || x == width - 1 {
                    Tile::new(TileKind::Cliff, BORDER_HEIGHT)
                } else if rng.gen_range(0..10) > 8 {
                    Tile::new(TileKind::Cliff, 0.0)
                } else {
                    Tile::new(TileKind::Dirt, 0.0)
                };
                let idx = grid.index(x, y);
                grid.tiles[idx] = tile;
            }
        }
        Ok(grid)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, tile: IVec2) -> bool {
        tile.x >= 0 && tile.y >= 0 && tile.x < self.width && tile.y < self.height
    }

    fn index(&self, x: i32, y: i32) -> usize {
        (x * self.height + y) as usize
    }

    /// Tile at grid position. Returns None if out of bounds.
    pub fn get(&self, tile: IVec2) -> Option<&Tile> {
        if !self.in_bounds(tile) {
            return None;
        }
        Some(&self.tiles[self.index(tile.x, tile.y)])
    }

    /// Replace a tile during world construction.
    pub fn set(&mut self, tile: IVec2, value: Tile) -> Result<(), GameError> {
        if !self.in_bounds(tile) {
            return Err(GameError::OutOfBounds {
                x: tile.x,
                y: tile.y,
            });
        }
        let index = self.index(tile.x, tile.y);
        self.tiles[index] = value;
        Ok(())
    }

    /// Height of a tile. Returns None if out of bounds.
    pub fn height_at(&self, tile: IVec2) -> Option<f32> {
        self.get(tile).map(|t| t.height)
    }

    /// Height of the tile under a world point, if any.
    pub fn ground_height(&self, point: Vec2) -> Option<f32> {
        self.height_at(world_to_tile(point))
    }

    pub fn traversal(&self, tile: IVec2) -> Traversal {
        match self.get(tile) {
            None => Traversal::OutOfBounds,
            Some(t) if t.traversable => Traversal::Open,
            Some(_) => Traversal::Blocked,
        }
    }

    /// Out of bounds counts as not traversable.
    pub fn is_traversable(&self, tile: IVec2) -> bool {
        self.traversal(tile) == Traversal::Open
    }

    /// Mark the tile under a solid decoration.
    pub fn place_obstacle(&mut self, tile: IVec2) {
        if self.in_bounds(tile) {
            let index = self.index(tile.x, tile.y);
            self.tiles[index].obstructed = true;
        }
    }

    pub fn has_obstacle(&self, tile: IVec2) -> bool {
        self.get(tile).is_some_and(|t| t.obstructed)
    }

    /// Whether a walker whose footing is `reference_height` may enter `tile`.
    pub fn is_valid_move(&self, tile: IVec2, reference_height: f32) -> bool {
        self.get(tile)
            .is_some_and(|t| t.traversable && !t.obstructed && t.height <= reference_height)
    }

    /// Tiles in draw order: columns from the far `x` edge inwards, each
    /// column walked by ascending `y`.
    pub fn render_order(&self) -> impl Iterator<Item = (IVec2, &Tile)> + '_ {
        (0..self.width).rev().flat_map(move |x| {
            (0..self.height).map(move |y| {
                let pos = IVec2::new(x, y);
                (pos, &self.tiles[self.index(x, y)])
            })
        })
    }

    /// World position at the centre of a tile, lifted to its surface height.
    pub fn surface_point(&self, tile: IVec2) -> Option<(Vec2, f32)> {
        self.height_at(tile).map(|h| (tile_to_world(tile), h))
    }
}
