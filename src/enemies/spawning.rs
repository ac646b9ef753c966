//! Wave spawning.
//!
//! Enemies for the next wave are built ahead of time, one per tick, into a
//! staging buffer. Once the countdown between waves has run out they are
//! released into the world one every `throttle` ticks.

use bevy::prelude::*;
use rand::Rng;
use std::sync::Arc;

use super::components::Enemy;
use super::data::EnemyDefinition;
use crate::core::Tunables;
use crate::rendering::AnimationLibrary;
use crate::world::context::{Ledger, Pending};
use crate::world::terrain::TerrainGrid;
use crate::world::{GameObject, ObjectId};

/// What the spawner borrows from the world for one tick.
pub struct SpawnContext<'a, R: Rng> {
    pub rng: &'a mut R,
    pub terrain: &'a TerrainGrid,
    pub library: &'a mut AnimationLibrary,
    pub definition: &'a Arc<EnemyDefinition>,
    pub pending: &'a mut Pending,
    pub ledger: &'a mut Ledger,
}

#[derive(Debug)]
pub struct WaveSpawner {
    wave: u32,
    /// Countdown before a wave, then release clock during one.
    time: u32,
    delay: u32,
    throttle: u32,
    spawn_points: Vec<IVec2>,
    staged: Vec<GameObject>,
    wave_done: bool,
}

impl WaveSpawner {
    pub fn new(tunables: &Tunables) -> Self {
        Self {
            wave: 1,
            time: 0,
            delay: tunables.wave_delay,
            throttle: tunables.spawn_throttle.max(1),
            spawn_points: tunables
                .spawn_points
                .iter()
                .map(|&(x, y)| IVec2::new(x, y))
                .collect(),
            staged: Vec::new(),
            wave_done: true,
        }
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn time(&self) -> u32 {
        self.time
    }

    pub fn delay(&self) -> u32 {
        self.delay
    }

    pub fn staged(&self) -> usize {
        self.staged.len()
    }

    pub fn is_wave_active(&self) -> bool {
        !self.wave_done
    }

    /// The countdown is in its final quarter.
    pub fn wave_imminent(&self) -> bool {
        self.time as f32 > self.delay as f32 * 0.75 && self.time < self.delay
    }

    fn wave_size(&self) -> usize {
        self.wave as usize * 2
    }

    /// Run one tick of wave bookkeeping. Returns the wave number when a wave
    /// starts releasing enemies.
    pub fn update<R: Rng>(&mut self, ctx: SpawnContext<'_, R>) -> Option<u32> {
        let mut started = None;

        if self.wave_done && self.staged.len() < self.wave_size() {
            let roll = ctx.rng.gen_range(0..5);
            self.stage(roll, ctx.terrain, ctx.library, ctx.definition);
        }

        if !self.wave_done {
            if self.time % self.throttle == 0 {
                if let Some(mut enemy) = self.staged.pop() {
                    enemy.id = ctx.pending.next_id();
                    if let Err(e) = ctx.pending.queue(enemy, ctx.terrain, ctx.ledger) {
                        warn!("Wave enemy was not added: {}", e);
                    }
                }
            }
            self.time += 1;
        }

        if self.time == self.delay && !self.staged.is_empty() {
            self.wave_done = false;
            self.time = 0;
            info!("Wave {} started with {} enemies", self.wave, self.staged.len());
            started = Some(self.wave);
        }

        if self.wave_done && self.time < self.delay && ctx.ledger.enemy_count == 0 {
            self.time += 1;
        }

        if !self.wave_done && self.staged.is_empty() {
            self.wave += 1;
            self.time = 0;
            self.wave_done = true;
        }

        started
    }

    /// Build the next enemy. The first half of a wave comes from the first
    /// spawn points, the second half from the far side of the map.
    fn stage(
        &mut self,
        roll: usize,
        terrain: &TerrainGrid,
        library: &mut AnimationLibrary,
        definition: &Arc<EnemyDefinition>,
    ) {
        let index = if self.staged.len() < self.wave_size() / 2 {
            roll
        } else {
            3 + roll
        };
        let Some(&tile) = self.spawn_points.get(index) else {
            warn!("No spawn point at index {}", index);
            return;
        };
        // Staged enemies get their id when they are released.
        match Enemy::spawn(ObjectId(0), tile, terrain, definition.clone(), library) {
            Ok(enemy) => self.staged.push(enemy),
            Err(e) => warn!("Could not stage enemy at {}: {}", tile, e),
        }
    }
}
