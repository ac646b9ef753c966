//! The world: terrain, live objects, waves and the HUD, stepped one tick at
//! a time.
//!
//! Objects requested during a tick land in a pending buffer and only join
//! the live collection at the start of the next tick. Removal is a sweep
//! after every object has updated.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

use super::context::{Ledger, Neighbors, Pending, TickContext};
use super::decoration::scatter;
use super::iso::{tile_to_world, TILE_HEIGHT, TILE_WIDTH, TILE_Z_HEIGHT};
use super::object::{GameObject, ObjectId};
use super::pickup::Pickup;
use super::terrain::TerrainGrid;
use crate::combat::ScreenShake;
use crate::core::{Action, GameError, GameEvent, InputSnapshot, InputSource, InputState, Steppable, Tunables};
use crate::enemies::spawning::SpawnContext;
use crate::enemies::{Enemy, EnemyDefinition, Projectile, WaveSpawner};
use crate::player::Player;
use crate::rendering::{AnimationLibrary, DrawLayer, DrawList, DrawSurface, SpriteRef};
use crate::ui::{Hud, HudAction, HudView, MenuChoice};

#[derive(Resource, Debug)]
pub struct Simulation {
    tunables: Tunables,
    terrain: TerrainGrid,
    objects: Vec<GameObject>,
    pending: Pending,
    ledger: Ledger,
    spawner: WaveSpawner,
    rng: StdRng,
    library: AnimationLibrary,
    enemy: Arc<EnemyDefinition>,
    input: InputState,
    shake: ScreenShake,
    camera: Vec2,
    hud: Hud,
    paused: bool,
    exit: bool,
    events: Vec<GameEvent>,
    ticks: u64,
}

impl Simulation {
    /// An empty world on `terrain`. Nothing is spawned.
    pub fn with_terrain(tunables: Tunables, enemy: EnemyDefinition, terrain: TerrainGrid) -> Self {
        let rng = match tunables.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            spawner: WaveSpawner::new(&tunables),
            tunables,
            terrain,
            objects: Vec::new(),
            pending: Pending::default(),
            ledger: Ledger::default(),
            rng,
            library: AnimationLibrary::default(),
            enemy: Arc::new(enemy),
            input: InputState::default(),
            shake: ScreenShake::default(),
            camera: Vec2::ZERO,
            hud: Hud::default(),
            paused: false,
            exit: false,
            events: Vec::new(),
            ticks: 0,
        }
    }

    /// Generate a fresh world with the player and the attack speed pickup.
    pub fn new_game(tunables: Tunables, enemy: EnemyDefinition) -> Result<Self, GameError> {
        let placeholder = TerrainGrid::flat(1, 1)?;
        let mut sim = Self::with_terrain(tunables, enemy, placeholder);
        sim.terrain = TerrainGrid::generate(
            sim.tunables.terrain_width,
            sim.tunables.terrain_height,
            &mut sim.rng,
        )?;

        let pending = &mut sim.pending;
        let decorations = scatter(&mut sim.terrain, &mut sim.rng, &mut sim.library, || {
            pending.next_id()
        });
        sim.objects.extend(decorations);

        let (x, y) = sim.tunables.player_start;
        sim.spawn_player(IVec2::new(x, y))?;
        let placement = sim.tunables.pickup.clone();
        let pickup = Pickup::spawn(sim.pending.next_id(), &placement, &sim.terrain, &mut sim.library)?;
        sim.add_object(pickup)?;

        info!(
            "New game on a {}x{} map with {} decorations",
            sim.terrain.width(),
            sim.terrain.height(),
            sim.objects.len()
        );
        Ok(sim)
    }

    pub fn tunables(&self) -> &Tunables {
        &self.tunables
    }

    pub fn terrain(&self) -> &TerrainGrid {
        &self.terrain
    }

    pub fn objects(&self) -> &[GameObject] {
        &self.objects
    }

    pub fn object(&self, id: ObjectId) -> Option<&GameObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut GameObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn ledger(&self) -> Ledger {
        self.ledger
    }

    pub fn spawner(&self) -> &WaveSpawner {
        &self.spawner
    }

    pub fn hud(&self) -> &Hud {
        &self.hud
    }

    pub fn camera(&self) -> Vec2 {
        self.camera
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        debug!("Paused: {}", self.paused);
    }

    pub fn exit_requested(&self) -> bool {
        self.exit
    }

    pub fn player(&self) -> Option<&Player> {
        self.objects.iter().find_map(|o| o.as_player())
    }

    pub fn player_mut(&mut self) -> Option<&mut Player> {
        self.objects.iter_mut().find_map(|o| o.as_player_mut())
    }

    pub fn player_object(&self) -> Option<&GameObject> {
        self.objects.iter().find(|o| o.is_player())
    }

    /// Events raised since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Queue `object` for the next tick.
    pub fn add_object(&mut self, object: GameObject) -> Result<ObjectId, GameError> {
        self.pending.queue(object, &self.terrain, &mut self.ledger)
    }

    /// There is only ever one player; a second request is ignored.
    pub fn spawn_player(&mut self, tile: IVec2) -> Result<ObjectId, GameError> {
        if let Some(existing) = self.player_object() {
            warn!("Player already present as {}", existing.id);
            return Ok(existing.id);
        }
        let player = Player::spawn(
            self.pending.next_id(),
            tile,
            &self.terrain,
            &mut self.library,
            self.tunables.attack_speed,
        )?;
        self.camera = player.body.position().truncate();
        self.add_object(player)
    }

    pub fn spawn_enemy(&mut self, tile: IVec2) -> Result<ObjectId, GameError> {
        let enemy = Enemy::spawn(
            self.pending.next_id(),
            tile,
            &self.terrain,
            self.enemy.clone(),
            &mut self.library,
        )?;
        self.add_object(enemy)
    }

    pub fn spawn_projectile(&mut self, origin: Vec3, target: Vec3, flight_height: f32) -> Result<ObjectId, GameError> {
        let projectile = Projectile::spawn(
            self.pending.next_id(),
            origin,
            target,
            flight_height,
            &mut self.library,
        );
        self.add_object(projectile)
    }

    /// Run one simulation tick against a fresh input snapshot.
    pub fn tick(&mut self, snapshot: InputSnapshot) {
        self.input.latch(snapshot);
        self.ticks += 1;
        if self.input.key_down(Action::Pause) {
            self.toggle_pause();
        }

        if !self.paused {
            let started = self.spawner.update(SpawnContext {
                rng: &mut self.rng,
                terrain: &self.terrain,
                library: &mut self.library,
                definition: &self.enemy,
                pending: &mut self.pending,
                ledger: &mut self.ledger,
            });
            if let Some(wave) = started {
                self.events.push(GameEvent::WaveStarted { wave });
            }

            self.objects.extend(self.pending.drain());
            self.update_objects();
            self.sweep();
            for object in &mut self.objects {
                object.advance_animation();
            }
        }

        let player = self.objects.iter().find_map(|o| o.as_player());
        match self.hud.update(player, self.paused, &self.input) {
            Some(HudAction::Menu(MenuChoice::Resume)) => self.toggle_pause(),
            Some(HudAction::Menu(MenuChoice::ExitToMenu)) | Some(HudAction::ReturnToMenu) => {
                self.events.push(GameEvent::ReturnToMenu)
            }
            Some(HudAction::Menu(MenuChoice::Quit)) => {
                info!("Quit requested");
                self.exit = true;
                self.events.push(GameEvent::ExitRequested);
            }
            None => {}
        }
    }

    fn update_objects(&mut self) {
        let lifesteal = self.hud.lifesteal();
        let tick_seconds = self.tunables.tick_seconds();
        for index in 0..self.objects.len() {
            let Some((object, mut others)) = Neighbors::split(&mut self.objects, index) else {
                continue;
            };
            let mut ctx = TickContext::new(
                &self.terrain,
                &self.input,
                tick_seconds,
                &mut self.ledger,
                &mut self.pending,
                &mut self.shake,
                &mut self.camera,
                lifesteal,
                &mut self.events,
            );
            object.update(&mut ctx, &mut others);
        }
    }

    /// Drop objects flagged for removal. An enemy stabbed this tick moves
    /// onto the blade instead.
    fn sweep(&mut self) {
        let claimed = self.player().and_then(|p| p.weapon.claimed_victim());
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.objects)
            .into_iter()
            .partition(|o| o.body.remove);
        self.objects = kept;

        let victim = removed.into_iter().find(|o| Some(o.id) == claimed);
        if let (Some(victim), Some(player)) = (victim, self.player_mut()) {
            player.weapon.take_victim(victim);
        }
    }

    /// Draw terrain, objects far to near, then the HUD. Returns the camera
    /// centre for this frame, shake included.
    pub fn render(&mut self, surface: &mut dyn DrawSurface) -> Vec2 {
        let camera = self.camera + self.shake.next_offset();

        surface.set_layer(DrawLayer::World);
        for (tile, cell) in self.terrain.render_order() {
            let centre = tile_to_world(tile);
            surface.draw_sprite(
                SpriteRef {
                    sheet: cell.kind.sheet(),
                    animation: 0,
                    frame: 0,
                },
                Vec2::new(TILE_WIDTH, TILE_HEIGHT),
                Vec2::new(centre.x, centre.y - TILE_Z_HEIGHT * cell.height),
                false,
                0.0,
            );
        }

        self.objects
            .sort_by(|a, b| a.body.y().total_cmp(&b.body.y()));
        for object in &mut self.objects {
            object.render(surface);
        }

        surface.set_layer(DrawLayer::Hud);
        let view = HudView {
            score: self.ledger.score,
            enemy_count: self.ledger.enemy_count,
            wave: self.spawner.wave(),
            wave_imminent: self.spawner.wave_imminent(),
            paused: self.paused,
        };
        self.hud.render(view, surface);
        surface.set_layer(DrawLayer::World);
        camera
    }
}

/// Pairs a simulation with its input source and draw target so a
/// [`crate::core::FixedStepScheduler`] can drive it.
pub struct SimulationDriver<'a, S: InputSource> {
    pub simulation: &'a mut Simulation,
    pub input: &'a mut S,
    pub draw_list: &'a mut DrawList,
}

impl<S: InputSource> Steppable for SimulationDriver<'_, S> {
    fn step(&mut self) {
        let snapshot = self.input.snapshot();
        self.simulation.tick(snapshot);
    }

    fn present(&mut self) {
        self.draw_list.clear();
        let camera = self.simulation.render(&mut *self.draw_list);
        self.draw_list.camera = camera;
    }

    fn exit_requested(&self) -> bool {
        self.simulation.exit_requested()
    }
}
