//! Rendering plugin - the 2D camera and the world presenter.
//!
//! The world layer of the [`DrawList`] is replayed as sprites every frame.
//! Simulation space has y growing downwards, so positions are mirrored on
//! the way in.

use bevy::prelude::*;

use super::surface::{DrawCommand, DrawList};
use super::visual_config::{load_visual_config, VisualConfig};

/// Rendering plugin - camera setup and draw list presentation.
pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DrawList>()
            .add_systems(Startup, (load_visual_config, spawn_camera).chain())
            .add_systems(PostUpdate, present_world);
    }
}

/// The single camera. Menus and the HUD render through it too.
#[derive(Component)]
pub struct WorldCamera;

/// Marker for sprites rebuilt from the draw list.
#[derive(Component)]
struct WorldSprite;

fn spawn_camera(mut commands: Commands, config: Option<Res<VisualConfig>>) {
    let scale = config.map(|c| c.camera_scale).unwrap_or(1.0);
    commands.spawn((
        Camera2d,
        OrthographicProjection {
            scale,
            ..OrthographicProjection::default_2d()
        },
        WorldCamera,
    ));
}

/// Region of a sheet holding `frame` of animation row `animation`.
pub fn frame_rect(animation: usize, frame: usize, size: Vec2) -> Rect {
    let min = Vec2::new(frame as f32 * size.x, animation as f32 * size.y);
    Rect::from_corners(min, min + size)
}

fn to_screen(position: Vec2) -> Vec2 {
    Vec2::new(position.x, -position.y)
}

fn present_world(
    mut commands: Commands,
    draw_list: Res<DrawList>,
    config: Option<Res<VisualConfig>>,
    asset_server: Res<AssetServer>,
    sprites: Query<Entity, With<WorldSprite>>,
    mut cameras: Query<&mut Transform, With<WorldCamera>>,
) {
    for entity in sprites.iter() {
        commands.entity(entity).despawn();
    }

    if let Ok(mut transform) = cameras.get_single_mut() {
        let centre = to_screen(draw_list.camera);
        transform.translation.x = centre.x;
        transform.translation.y = centre.y;
    }

    let depth_step = config.map(|c| c.depth_step).unwrap_or(0.001);
    for (index, command) in draw_list.world().iter().enumerate() {
        let depth = index as f32 * depth_step;
        match command {
            DrawCommand::Sprite {
                sheet,
                animation,
                frame,
                size,
                position,
                flip,
                rotation,
                tint,
            } => {
                let at = to_screen(*position);
                commands.spawn((
                    Sprite {
                        image: asset_server.load(sheet.clone()),
                        rect: Some(frame_rect(*animation, *frame, *size)),
                        custom_size: Some(*size),
                        flip_x: *flip,
                        color: tint.to_color(),
                        ..default()
                    },
                    Transform::from_translation(at.extend(depth))
                        .with_rotation(Quat::from_rotation_z(-rotation.to_radians())),
                    WorldSprite,
                ));
            }
            DrawCommand::Rect {
                position,
                size,
                color,
            } => {
                let centre = to_screen(*position + *size / 2.0);
                commands.spawn((
                    Sprite::from_color(color.to_color(), *size),
                    Transform::from_translation(centre.extend(depth)),
                    WorldSprite,
                ));
            }
            DrawCommand::Text {
                text,
                size,
                position,
                color,
            } => {
                commands.spawn((
                    Text2d::new(text.clone()),
                    TextFont {
                        font_size: *size,
                        ..default()
                    },
                    TextColor(color.to_color()),
                    Transform::from_translation(to_screen(*position).extend(depth)),
                    WorldSprite,
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_are_laid_out_in_rows() {
        let rect = frame_rect(2, 3, Vec2::new(16.0, 12.0));
        assert_eq!(rect.min, Vec2::new(48.0, 24.0));
        assert_eq!(rect.max, Vec2::new(64.0, 36.0));
    }

    #[test]
    fn screen_space_flips_y() {
        assert_eq!(to_screen(Vec2::new(3.0, 5.0)), Vec2::new(3.0, -5.0));
    }
}
