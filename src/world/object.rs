//! Simulated objects: the shared record every object carries and the kind
//! tag that selects its behavior.

use bevy::prelude::*;
use std::fmt;
use std::sync::Arc;

use super::collision::Bounds;
use super::context::{Neighbors, TickContext};
use super::decoration::Decoration;
use super::iso::{world_to_tile, TILE_Z_HEIGHT};
use super::pickup::Pickup;
use super::terrain::TerrainGrid;
use crate::enemies::{Enemy, Projectile};
use crate::player::Player;
use crate::rendering::{AnimationCursor, AnimationSet, DrawSurface, SpriteRef};

/// Stable handle for an object in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out increasing ids.
#[derive(Debug, Default, Clone)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn next(&mut self) -> ObjectId {
        self.next += 1;
        ObjectId(self.next)
    }
}

/// Position, extents and presentation state shared by every object.
///
/// The tile is re-derived on every position write, so it can never be stale.
#[derive(Debug, Clone)]
pub struct Body {
    position: Vec3,
    tile: IVec2,
    /// `(xWidth, yWidth, zWidth)` as used by [`Bounds`].
    pub half_extents: Vec3,
    pub solid: bool,
    /// Swept out of the world after the current update pass.
    pub remove: bool,
    pub visible: bool,
    pub flip: bool,
    /// Degrees.
    pub rotation: f32,
    pub animation: AnimationCursor,
}

impl Body {
    pub fn new(position: Vec3, animations: Arc<AnimationSet>) -> Self {
        Self {
            position,
            tile: world_to_tile(position.truncate()),
            half_extents: Vec3::ZERO,
            solid: false,
            remove: false,
            visible: true,
            flip: false,
            rotation: 0.0,
            animation: AnimationCursor::new(animations),
        }
    }

    pub fn with_extents(mut self, half_extents: Vec3) -> Self {
        self.half_extents = half_extents;
        self
    }

    pub fn with_solid(mut self, solid: bool) -> Self {
        self.solid = solid;
        self
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn x(&self) -> f32 {
        self.position.x
    }

    pub fn y(&self) -> f32 {
        self.position.y
    }

    pub fn z(&self) -> f32 {
        self.position.z
    }

    /// Tile under the object.
    pub fn tile(&self) -> IVec2 {
        self.tile
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.tile = world_to_tile(position.truncate());
    }

    pub fn set_ground_position(&mut self, point: Vec2) {
        self.set_position(point.extend(self.position.z));
    }

    pub fn set_x(&mut self, x: f32) {
        self.set_ground_position(Vec2::new(x, self.position.y));
    }

    pub fn set_y(&mut self, y: f32) {
        self.set_ground_position(Vec2::new(self.position.x, y));
    }

    pub fn set_z(&mut self, z: f32) {
        self.position.z = z;
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.set_ground_position(self.position.truncate() + delta);
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.position, self.half_extents)
    }

    pub fn distance_to(&self, other: &Body) -> f32 {
        self.position.distance(other.position)
    }

    /// Whether this body overlaps `other`, honoring the distance cutoff.
    pub fn collides_with(&self, other: &Body) -> bool {
        let (a, b) = (self.bounds(), other.bounds());
        a.within_cutoff(&b) && a.overlaps(&b)
    }

    pub fn sprite_size(&self) -> Vec2 {
        self.animation.animations().frame_size
    }

    /// Sprite anchor on screen: feet on the ground, lifted by height.
    pub fn draw_position(&self) -> Vec2 {
        Vec2::new(
            self.position.x,
            self.position.y - TILE_Z_HEIGHT * self.position.z - self.sprite_size().y / 2.0,
        )
    }

    /// Draws the current frame at `position`. A frame counter that ran past
    /// its animation is logged and reset instead of drawn.
    pub fn draw_at(&mut self, id: ObjectId, surface: &mut dyn DrawSurface, position: Vec2) {
        if !self.visible {
            return;
        }
        let Some(frame) = self.animation.checked_frame() else {
            error!(
                "Animation overrun on object {}: animation {} frame {}",
                id,
                self.animation.current,
                self.animation.frame()
            );
            self.animation.reset_frame();
            return;
        };
        let set = self.animation.animations();
        surface.draw_sprite(
            SpriteRef {
                sheet: &set.sheet,
                animation: self.animation.current,
                frame,
            },
            set.frame_size,
            position,
            self.flip,
            self.rotation,
        );
    }

    pub fn draw(&mut self, id: ObjectId, surface: &mut dyn DrawSurface) {
        let position = self.draw_position();
        self.draw_at(id, surface, position);
    }
}

/// Ground shadow that follows an owner.
#[derive(Debug, Clone, PartialEq)]
pub struct Shadow {
    base_size: Vec2,
    pub position: Vec3,
    pub size: Vec2,
    pub visible: bool,
}

impl Shadow {
    pub const SHEET: &'static str = "player/shadow.png";

    pub fn new(base_size: Vec2) -> Self {
        Self {
            base_size,
            position: Vec3::ZERO,
            size: base_size,
            visible: true,
        }
    }

    /// Follow `owner`, shrinking with the owner's height above the ground.
    pub fn follow(&mut self, owner: &Body, terrain: &TerrainGrid) {
        let ground = terrain.height_at(owner.tile()).unwrap_or(0.0);
        self.position = Vec3::new(owner.x(), owner.y() + self.size.y / 2.0, ground);
        self.size = self.base_size / (1.0 + (ground - owner.z()).abs());
    }

    pub fn draw(&self, surface: &mut dyn DrawSurface) {
        if !self.visible {
            return;
        }
        let anchor = Vec2::new(
            self.position.x,
            self.position.y - TILE_Z_HEIGHT * self.position.z - self.size.y / 2.0,
        );
        surface.draw_sprite(
            SpriteRef {
                sheet: Self::SHEET,
                animation: 0,
                frame: 0,
            },
            self.size,
            anchor,
            false,
            0.0,
        );
    }
}

impl Default for Shadow {
    fn default() -> Self {
        Self::new(Vec2::new(20.0, 8.0))
    }
}

/// Behavior attached to a body.
#[derive(Debug)]
pub enum ObjectKind {
    Player(Box<Player>),
    Enemy(Box<Enemy>),
    Projectile(Projectile),
    Pickup(Pickup),
    Decoration(Decoration),
}

impl ObjectKind {
    pub fn name(&self) -> &'static str {
        match self {
            ObjectKind::Player(_) => "Player",
            ObjectKind::Enemy(_) => "Enemy",
            ObjectKind::Projectile(_) => "Projectile",
            ObjectKind::Pickup(_) => "Pickup",
            ObjectKind::Decoration(_) => "Decoration",
        }
    }
}

/// A live simulated object.
#[derive(Debug)]
pub struct GameObject {
    pub id: ObjectId,
    pub body: Body,
    pub kind: ObjectKind,
    pub shadow: Option<Shadow>,
}

impl GameObject {
    pub fn new(id: ObjectId, body: Body, kind: ObjectKind) -> Self {
        Self {
            id,
            body,
            kind,
            shadow: None,
        }
    }

    pub fn with_shadow(mut self) -> Self {
        self.shadow = Some(Shadow::default());
        self
    }

    pub fn is_enemy(&self) -> bool {
        matches!(self.kind, ObjectKind::Enemy(_))
    }

    pub fn is_player(&self) -> bool {
        matches!(self.kind, ObjectKind::Player(_))
    }

    pub fn as_player(&self) -> Option<&Player> {
        match &self.kind {
            ObjectKind::Player(player) => Some(player),
            _ => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut Player> {
        match &mut self.kind {
            ObjectKind::Player(player) => Some(player),
            _ => None,
        }
    }

    pub fn as_enemy(&self) -> Option<&Enemy> {
        match &self.kind {
            ObjectKind::Enemy(enemy) => Some(enemy),
            _ => None,
        }
    }

    pub fn as_enemy_mut(&mut self) -> Option<&mut Enemy> {
        match &mut self.kind {
            ObjectKind::Enemy(enemy) => Some(enemy),
            _ => None,
        }
    }

    /// Run one tick of this object's behavior.
    pub fn update(&mut self, ctx: &mut TickContext, others: &mut Neighbors) {
        let id = self.id;
        let body = &mut self.body;
        let shadow = &mut self.shadow;
        match &mut self.kind {
            ObjectKind::Player(player) => player.update(id, body, shadow, ctx, others),
            ObjectKind::Enemy(enemy) => enemy.update(id, body, shadow, ctx, others),
            ObjectKind::Projectile(projectile) => projectile.update(body, shadow, ctx, others),
            ObjectKind::Pickup(pickup) => pickup.update(body, shadow, ctx, others),
            ObjectKind::Decoration(_) => {}
        }
    }

    /// Advance sprite playback by one tick, including any held object.
    pub fn advance_animation(&mut self) {
        self.body.animation.advance();
        if let ObjectKind::Player(player) = &mut self.kind {
            player.advance_animations();
        }
    }

    pub fn render(&mut self, surface: &mut dyn DrawSurface) {
        if let Some(shadow) = &self.shadow {
            shadow.draw(surface);
        }
        match &mut self.kind {
            ObjectKind::Player(player) => player.render(self.id, &mut self.body, surface),
            _ => self.body.draw(self.id, surface),
        }
    }
}
