//! Grass and rocks scattered over the playfield at world generation.

use bevy::prelude::*;
use rand::Rng;

use super::iso::tile_to_world;
use super::object::{Body, GameObject, ObjectId, ObjectKind};
use super::terrain::TerrainGrid;
use crate::rendering::{AnimationLibrary, AnimationSet};

pub const GRASS_SHEET: &str = "decorations/grass.png";
pub const ROCK_SHEET: &str = "decorations/rock.png";

/// Static scenery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoration {
    /// Purely visual.
    Grass,
    /// Blocks movement and pathfinding.
    Rock,
}

impl Decoration {
    /// Pick scenery for a roll in `0..width`.
    pub fn from_roll(roll: i32) -> Option<Self> {
        match roll {
            7..=11 => Some(Decoration::Grass),
            5 => Some(Decoration::Rock),
            _ => None,
        }
    }

    pub fn is_solid(self) -> bool {
        self == Decoration::Rock
    }

    fn animations(self, library: &mut AnimationLibrary) -> std::sync::Arc<AnimationSet> {
        match self {
            Decoration::Grass => library.get_or_create(GRASS_SHEET, || {
                AnimationSet::single(GRASS_SHEET, Vec2::new(20.0, 20.0), 3, 3)
            }),
            Decoration::Rock => library.get_or_create(ROCK_SHEET, || {
                AnimationSet::single(ROCK_SHEET, Vec2::new(20.0, 20.0), 1, 1)
            }),
        }
    }

    fn half_extents(self) -> Vec3 {
        match self {
            Decoration::Grass => Vec3::ZERO,
            Decoration::Rock => Vec3::new(10.0, 2.0, 1.0),
        }
    }

    pub fn build(
        self,
        id: ObjectId,
        tile: IVec2,
        terrain: &TerrainGrid,
        flip: bool,
        library: &mut AnimationLibrary,
    ) -> GameObject {
        let height = terrain.height_at(tile).unwrap_or(0.0);
        let mut body = Body::new(tile_to_world(tile).extend(height), self.animations(library))
            .with_extents(self.half_extents())
            .with_solid(self.is_solid());
        body.flip = flip;
        GameObject::new(id, body, ObjectKind::Decoration(self))
    }
}

/// Roll scenery for every interior tile, skipping the cliff border. Rocks
/// mark their tile as obstructed.
pub fn scatter(
    terrain: &mut TerrainGrid,
    rng: &mut impl Rng,
    library: &mut AnimationLibrary,
    mut next_id: impl FnMut() -> ObjectId,
) -> Vec<GameObject> {
    let (width, height) = (terrain.width(), terrain.height());
    let mut placed = Vec::new();
    for x in 1..width {
        for y in 0..height - 1 {
            if y == 0 || x == width - 1 {
                continue;
            }
            let roll = rng.gen_range(0..width);
            let Some(decoration) = Decoration::from_roll(roll) else {
                continue;
            };
            let tile = IVec2::new(x, y);
            let flip = rng.gen_bool(0.5);
            if decoration.is_solid() {
                terrain.place_obstacle(tile);
            }
            placed.push(decoration.build(next_id(), tile, terrain, flip, library));
        }
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::object::IdAllocator;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn rolls_map_to_scenery() {
        assert_eq!(Decoration::from_roll(5), Some(Decoration::Rock));
        assert_eq!(Decoration::from_roll(7), Some(Decoration::Grass));
        assert_eq!(Decoration::from_roll(11), Some(Decoration::Grass));
        assert_eq!(Decoration::from_roll(6), None);
        assert_eq!(Decoration::from_roll(12), None);
    }

    #[test]
    fn border_stays_clear_and_rocks_obstruct() {
        let mut terrain = TerrainGrid::flat(16, 16).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let mut ids = IdAllocator::default();
        let mut library = AnimationLibrary::default();
        let placed = scatter(&mut terrain, &mut rng, &mut library, || ids.next());

        assert!(!placed.is_empty());
        for object in &placed {
            let tile = object.body.tile();
            assert!(tile.x >= 1 && tile.x < 15 && tile.y >= 1 && tile.y < 15);
            assert_eq!(object.body.solid, terrain.has_obstacle(tile));
        }
    }
}
