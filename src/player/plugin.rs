//! Player plugin - key bindings and device input latching.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::core::{Action, InputLatch, InputSnapshot, KeyBindings, PointerButton};

/// Player plugin - loads the control bindings and feeds raw device state to
/// the simulation every frame.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, load_key_bindings)
            .add_systems(PreUpdate, latch_device_input);
    }
}

fn load_key_bindings(mut commands: Commands) {
    commands.insert_resource(KeyBindings::load());
}

/// Copy keyboard, mouse and cursor state into the input latch. The cursor is
/// converted to simulation space, where y grows downwards.
fn latch_device_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    bindings: Option<Res<KeyBindings>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera2d>>,
    mut latch: ResMut<InputLatch>,
) {
    let mut snapshot = InputSnapshot {
        pointer: latch.raw.pointer,
        ..default()
    };

    let bindings = bindings.map(|b| *b).unwrap_or_default();
    for (action, key) in bindings.key_codes() {
        snapshot.set(action, keyboard.pressed(key));
    }
    snapshot.set(Action::Pause, keyboard.pressed(KeyCode::Escape));
    snapshot.set(Action::Confirm, keyboard.pressed(KeyCode::Space));

    snapshot.set_button(PointerButton::Primary, mouse.pressed(MouseButton::Left));
    snapshot.set_button(PointerButton::Middle, mouse.pressed(MouseButton::Middle));
    snapshot.set_button(PointerButton::Secondary, mouse.pressed(MouseButton::Right));

    let cursor = windows.get_single().ok().and_then(|w| w.cursor_position());
    if let (Some(cursor), Ok((camera, transform))) = (cursor, cameras.get_single()) {
        if let Ok(world) = camera.viewport_to_world_2d(transform, cursor) {
            snapshot.pointer = Vec2::new(world.x, -world.y);
        }
    }

    latch.raw = snapshot;
}
