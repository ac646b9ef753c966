//! Enemy data loading from RON files.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::core::GameError;
use crate::rendering::{AnimationSet, AnimationSpec};

/// Directory scanned for enemy definitions.
pub const ENEMIES_DIR: &str = "assets/data/enemies";

/// Registry key of the built-in enemy.
pub const SECURITY_BOT: &str = "security_bot";

/// One row of an enemy sprite sheet: `(frames, fps, looping)`.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct AnimationRow(pub usize, pub u32, pub bool);

/// Enemy definition loaded from RON file.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct EnemyDefinition {
    pub name: String,
    /// World units per tick, divided by four when walking.
    pub speed: f32,
    pub health: i32,
    pub score: u32,
    pub half_extents: (f32, f32, f32),
    pub sheet: String,
    pub sprite_size: (f32, f32),
    /// Rows in the order idle, damaged, dead, stabbed, walk, melee.
    pub animations: Vec<AnimationRow>,
    /// Ticks spent staggered after a hit.
    pub invulnerability: u32,
    pub melee_time: u32,
    pub melee_damage: i32,
    /// Animation frame on which the melee swing connects.
    pub melee_frame: usize,
    /// Melee reach along x and y.
    pub melee_reach: f32,
    /// Attacks per second, turned into a cooldown of `60 / attack_speed` ticks.
    pub attack_speed: f32,
    /// Distance at which the enemy stops chasing and swings.
    pub melee_range: f32,
    /// Health below which the enemy can be stabbed.
    pub stab_threshold: i32,
    pub knockback: i32,
    /// Ticks the enemy stands still after spawning.
    pub spawn_wait: u32,
}

impl Default for EnemyDefinition {
    fn default() -> Self {
        Self {
            name: "Security Bot".to_string(),
            speed: 7.0,
            health: 150,
            score: 100,
            half_extents: (10.0, 5.0, 2.0),
            sheet: "enemies/security_bot.png".to_string(),
            sprite_size: (80.0, 60.0),
            animations: vec![
                AnimationRow(5, 5, true),
                AnimationRow(1, 1, false),
                AnimationRow(12, 8, false),
                AnimationRow(2, 2, true),
                AnimationRow(19, 18, true),
                AnimationRow(8, 12, true),
            ],
            invulnerability: 50,
            melee_time: 45,
            melee_damage: 10,
            melee_frame: 6,
            melee_reach: 30.0,
            attack_speed: 3.0,
            melee_range: 25.0,
            stab_threshold: 50,
            knockback: 10,
            spawn_wait: 60,
        }
    }
}

impl EnemyDefinition {
    pub fn from_ron(contents: &str, origin: &str) -> Result<Self, GameError> {
        ron::from_str(contents).map_err(|e| GameError::Parse {
            path: origin.to_string(),
            details: e.to_string(),
        })
    }

    /// Ticks between the end of one swing and the next decision.
    pub fn attack_cooldown(&self) -> u32 {
        if self.attack_speed <= 0.0 {
            return 0;
        }
        (60.0 / self.attack_speed) as u32
    }

    pub fn half_extents(&self) -> Vec3 {
        Vec3::new(self.half_extents.0, self.half_extents.1, self.half_extents.2)
    }

    pub fn animation_set(&self) -> AnimationSet {
        let specs: Vec<AnimationSpec> = self
            .animations
            .iter()
            .map(|row| AnimationSpec::new(row.0, row.1, row.2))
            .collect();
        AnimationSet::new(
            self.sheet.clone(),
            Vec2::new(self.sprite_size.0, self.sprite_size.1),
            &specs,
        )
    }
}

/// Resource holding all loaded enemy definitions.
#[derive(Resource, Debug, Clone)]
pub struct EnemyRegistry {
    pub definitions: HashMap<String, EnemyDefinition>,
}

impl Default for EnemyRegistry {
    fn default() -> Self {
        let mut definitions = HashMap::new();
        definitions.insert(SECURITY_BOT.to_string(), EnemyDefinition::default());
        Self { definitions }
    }
}

impl EnemyRegistry {
    /// Get an enemy definition by type name.
    pub fn get(&self, enemy_type: &str) -> Option<&EnemyDefinition> {
        self.definitions.get(enemy_type)
    }

    /// The definition waves spawn, falling back to the built-in bot.
    pub fn wave_enemy(&self) -> EnemyDefinition {
        self.get(SECURITY_BOT).cloned().unwrap_or_default()
    }

    /// Read every `.ron` file in `dir`. Files that fail to parse are logged
    /// and skipped; the built-in definition stays unless a file replaces it.
    pub fn load_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let mut registry = Self::default();

        if !dir.exists() {
            warn!("Enemy definitions directory not found: {:?}", dir);
            return registry;
        }

        let Ok(entries) = fs::read_dir(dir) else {
            warn!("Failed to read enemy definitions directory");
            return registry;
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if !path.extension().is_some_and(|ext| ext == "ron") {
                continue;
            }
            let enemy_type = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("unknown")
                .to_string();

            match fs::read_to_string(&path) {
                Ok(contents) => match EnemyDefinition::from_ron(&contents, &path.display().to_string()) {
                    Ok(definition) => {
                        info!("Loaded enemy definition: {} ({})", definition.name, enemy_type);
                        registry.definitions.insert(enemy_type, definition);
                    }
                    Err(e) => error!("{}", e),
                },
                Err(e) => {
                    error!("Failed to read enemy definition {:?}: {}", path, e);
                }
            }
        }

        info!("Loaded {} enemy definitions", registry.definitions.len());
        registry
    }
}

/// Load all enemy definitions from the assets/data/enemies/ directory.
pub fn load_enemy_definitions(mut commands: Commands) {
    commands.insert_resource(EnemyRegistry::load_dir(ENEMIES_DIR));
}
