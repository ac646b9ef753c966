//! Pickups the player collects by walking over them.

use bevy::prelude::*;

use super::context::{Neighbors, TickContext};
use super::iso::tile_to_world;
use super::object::{Body, GameObject, ObjectId, ObjectKind, Shadow};
use super::terrain::TerrainGrid;
use crate::core::config::PickupPlacement;
use crate::core::{GameError, SoundCue};
use crate::rendering::{AnimationLibrary, AnimationSet};

pub const ATTACK_SPEED_SHEET: &str = "pickups/attack_speed.png";

const PICKUP_RADIUS: f32 = 20.0;
/// Hover above the tile surface.
const HOVER: f32 = 0.6;
const BOB_STEP: f32 = 0.005;
const BOB_LIMIT: f32 = 0.1;

/// Temporary attack speed bonus.
#[derive(Debug, Clone, PartialEq)]
pub struct Pickup {
    pub bonus: f32,
    /// Ticks the bonus lasts once collected.
    pub remaining: u32,
    collected: bool,
    bounce: f32,
    rising: bool,
}

impl Pickup {
    pub fn new(bonus: f32, seconds: u32) -> Self {
        Self {
            bonus,
            remaining: seconds * 60,
            collected: false,
            bounce: 0.0,
            rising: true,
        }
    }

    /// Place an attack speed pickup. Tiles outside the interior are pulled in
    /// to the nearest interior tile.
    pub fn spawn(
        id: ObjectId,
        placement: &PickupPlacement,
        terrain: &TerrainGrid,
        library: &mut AnimationLibrary,
    ) -> Result<GameObject, GameError> {
        let tile = IVec2::new(
            placement.tile.0.clamp(1, (terrain.width() - 1).max(1)),
            placement.tile.1.clamp(1, (terrain.height() - 1).max(1)),
        );
        let height = terrain
            .height_at(tile)
            .ok_or(GameError::OutOfBounds { x: tile.x, y: tile.y })?;
        let set = library.get_or_create(ATTACK_SPEED_SHEET, || {
            AnimationSet::single(ATTACK_SPEED_SHEET, Vec2::new(20.0, 20.0), 1, 1)
        });
        let body = Body::new(tile_to_world(tile).extend(height + HOVER), set);
        let mut object = GameObject::new(
            id,
            body,
            ObjectKind::Pickup(Self::new(placement.bonus, placement.seconds)),
        )
        .with_shadow();
        if let Some(shadow) = object.shadow.as_mut() {
            shadow.follow(&object.body, terrain);
        }
        Ok(object)
    }

    pub fn is_collected(&self) -> bool {
        self.collected
    }

    pub fn update(
        &mut self,
        body: &mut Body,
        shadow: &mut Option<Shadow>,
        ctx: &mut TickContext,
        others: &mut Neighbors,
    ) {
        if !self.collected {
            if let Some((player_body, player)) = others.player_mut() {
                if body.distance_to(player_body) < PICKUP_RADIUS {
                    ctx.play(SoundCue::PickupCollected);
                    self.collected = true;
                    body.visible = false;
                    if let Some(shadow) = shadow.as_mut() {
                        shadow.visible = false;
                    }
                    player.weapon.modify_attack_speed(self.bonus);
                }
            }
        }

        if let Some(shadow) = shadow.as_mut() {
            shadow.follow(body, ctx.terrain);
        }
        self.bob(body);

        if self.collected {
            if self.remaining > 0 {
                self.remaining -= 1;
            } else {
                if let Some((_, player)) = others.player_mut() {
                    player.weapon.modify_attack_speed(-self.bonus);
                }
                ctx.play(SoundCue::PickupExpired);
                body.remove = true;
            }
        }
    }

    fn bob(&mut self, body: &mut Body) {
        let base = body.z() - self.bounce;
        if self.bounce.abs() >= BOB_LIMIT {
            self.rising = !self.rising;
        }
        self.bounce += if self.rising { BOB_STEP } else { -BOB_STEP };
        body.set_z(base + self.bounce);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::AnimationLibrary;

    #[test]
    fn placement_is_pulled_inside_the_border() {
        let terrain = TerrainGrid::flat(16, 16).unwrap();
        let mut library = AnimationLibrary::default();
        let placement = PickupPlacement {
            bonus: 0.5,
            seconds: 10,
            tile: (-3, 40),
        };
        let object = Pickup::spawn(ObjectId(1), &placement, &terrain, &mut library).unwrap();
        assert_eq!(object.body.tile(), IVec2::new(1, 15));
        assert!((object.body.z() - HOVER).abs() < 1e-6);
    }

    #[test]
    fn bobbing_stays_within_bounds() {
        let terrain = TerrainGrid::flat(4, 4).unwrap();
        let mut library = AnimationLibrary::default();
        let placement = PickupPlacement {
            bonus: 0.5,
            seconds: 1,
            tile: (2, 2),
        };
        let mut object = Pickup::spawn(ObjectId(1), &placement, &terrain, &mut library).unwrap();
        let ObjectKind::Pickup(pickup) = &mut object.kind else {
            unreachable!()
        };
        for _ in 0..500 {
            pickup.bob(&mut object.body);
            assert!((object.body.z() - HOVER).abs() <= BOB_LIMIT + BOB_STEP + 1e-4);
        }
    }

    #[test]
    fn duration_is_counted_in_ticks() {
        assert_eq!(Pickup::new(0.5, 10).remaining, 600);
    }
}
