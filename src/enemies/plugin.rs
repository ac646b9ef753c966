//! Enemy plugin - registers enemy data loading.

use bevy::prelude::*;

use super::data::{load_enemy_definitions, EnemyRegistry};

/// Enemy plugin - makes the enemy definitions available before a game starts.
pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EnemyRegistry>()
            .add_systems(Startup, load_enemy_definitions);
    }
}
