//! Per-tick state handed to every object update.

use bevy::prelude::*;

use super::object::{Body, GameObject, IdAllocator, ObjectId, ObjectKind};
use super::terrain::TerrainGrid;
use crate::combat::ScreenShake;
use crate::core::{GameError, GameEvent, InputState, SoundCue};
use crate::player::Player;

/// Running totals the world keeps across ticks.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Ledger {
    pub score: u32,
    pub enemy_count: i32,
}

/// Lifesteal state published by the HUD for the current tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LifestealWindow {
    pub available: bool,
    pub amount: i32,
    /// Health before the recent loss; healing never goes above it.
    pub ceiling: i32,
}

/// Objects requested during a tick, flushed into the world at the start of
/// the next one.
#[derive(Debug, Default)]
pub struct Pending {
    objects: Vec<GameObject>,
    ids: IdAllocator,
}

impl Pending {
    pub fn next_id(&mut self) -> ObjectId {
        self.ids.next()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, GameObject> {
        self.objects.drain(..)
    }

    /// Queue `object` if its tile lies on the terrain. Enemies count towards
    /// the live enemy total as soon as they are queued.
    pub fn queue(
        &mut self,
        object: GameObject,
        terrain: &TerrainGrid,
        ledger: &mut Ledger,
    ) -> Result<ObjectId, GameError> {
        let tile = object.body.tile();
        if !terrain.in_bounds(tile) {
            return Err(GameError::OutOfBounds {
                x: tile.x,
                y: tile.y,
            });
        }
        if object.is_enemy() {
            ledger.enemy_count += 1;
        }
        let id = object.id;
        self.objects.push(object);
        Ok(id)
    }
}

/// Everything in the world except the object being updated.
pub struct Neighbors<'a> {
    before: &'a mut [GameObject],
    after: &'a mut [GameObject],
}

impl<'a> Neighbors<'a> {
    /// Split `objects` around `index`, returning the object there and the rest.
    pub fn split(objects: &'a mut [GameObject], index: usize) -> Option<(&'a mut GameObject, Self)> {
        if index >= objects.len() {
            return None;
        }
        let (before, rest) = objects.split_at_mut(index);
        let (current, after) = rest.split_first_mut()?;
        Some((current, Self { before, after }))
    }

    pub fn empty() -> Self {
        Self {
            before: &mut [],
            after: &mut [],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameObject> {
        self.before.iter().chain(self.after.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut GameObject> {
        self.before.iter_mut().chain(self.after.iter_mut())
    }

    pub fn player(&self) -> Option<&GameObject> {
        self.iter().find(|o| o.is_player())
    }

    pub fn player_mut(&mut self) -> Option<(&mut Body, &mut Player)> {
        self.iter_mut().find_map(|o| match &mut o.kind {
            ObjectKind::Player(player) => Some((&mut o.body, player.as_mut())),
            _ => None,
        })
    }
}

/// Borrowed world state for one tick.
pub struct TickContext<'a> {
    pub terrain: &'a TerrainGrid,
    pub input: &'a InputState,
    /// Length of one tick in seconds.
    pub tick_seconds: f32,
    pub ledger: &'a mut Ledger,
    pub pending: &'a mut Pending,
    pub shake: &'a mut ScreenShake,
    /// Camera centre in world space.
    pub camera: &'a mut Vec2,
    pub lifesteal: LifestealWindow,
    events: &'a mut Vec<GameEvent>,
}

impl<'a> TickContext<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        terrain: &'a TerrainGrid,
        input: &'a InputState,
        tick_seconds: f32,
        ledger: &'a mut Ledger,
        pending: &'a mut Pending,
        shake: &'a mut ScreenShake,
        camera: &'a mut Vec2,
        lifesteal: LifestealWindow,
        events: &'a mut Vec<GameEvent>,
    ) -> Self {
        Self {
            terrain,
            input,
            tick_seconds,
            ledger,
            pending,
            shake,
            camera,
            lifesteal,
            events,
        }
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn play(&mut self, cue: SoundCue) {
        self.events.push(GameEvent::Sound(cue));
    }

    /// Queue an object for the next tick. Out-of-bounds requests are logged
    /// and dropped.
    pub fn add_object(&mut self, object: GameObject) -> Option<ObjectId> {
        let kind = object.kind.name();
        match self.pending.queue(object, self.terrain, self.ledger) {
            Ok(id) => Some(id),
            Err(e) => {
                warn!("{} was not added: {}", kind, e);
                None
            }
        }
    }
}
