//! In-game HUD - the simulation-side model and its Bevy UI presenter.
//!
//! [`Hud`] is updated once per simulation tick and draws onto the HUD layer
//! of the draw list. [`present_hud`] rebuilds absolute-positioned UI nodes
//! from that layer every frame.

use bevy::prelude::*;

use super::menu::{MenuChoice, PauseMenu};
use super::stat_bars::StatBars;
use crate::core::{Action, GameState, InputState};
use crate::player::Player;
use crate::rendering::{DrawCommand, DrawList, DrawSurface, Rgba};
use crate::world::context::LifestealWindow;

const SMALL_TEXT: f32 = 20.0;
const MEDIUM_TEXT: f32 = 32.0;

/// What the HUD asks the world to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudAction {
    Menu(MenuChoice),
    /// The player confirmed the death screen.
    ReturnToMenu,
}

/// World totals shown on the HUD.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HudView {
    pub score: u32,
    pub enemy_count: i32,
    pub wave: u32,
    pub wave_imminent: bool,
    pub paused: bool,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Hud {
    stats: StatBars,
    menu: PauseMenu,
    player_dead: bool,
}

impl Hud {
    /// Runs every tick, paused or not. Bars only move while the world runs;
    /// the pause menu only listens while it is paused.
    pub fn update(&mut self, player: Option<&Player>, paused: bool, input: &InputState) -> Option<HudAction> {
        let mut action = None;
        if !paused {
            if let Some(player) = player {
                self.stats
                    .update(player.health.current, player.stamina.current());
            }
        } else {
            action = self.menu.update(input).map(HudAction::Menu);
        }

        self.player_dead = player.is_some_and(|p| p.is_dead());
        if self.player_dead && input.key_down(Action::Confirm) {
            action = Some(HudAction::ReturnToMenu);
        }
        action
    }

    pub fn stats(&self) -> &StatBars {
        &self.stats
    }

    pub fn lifesteal(&self) -> LifestealWindow {
        self.stats.lifesteal()
    }

    pub fn render(&self, view: HudView, surface: &mut dyn DrawSurface) {
        if self.player_dead {
            surface.draw_text("YOU DIED!", MEDIUM_TEXT, Vec2::new(560.0, 300.0), Rgba::WHITE);
            surface.draw_text(
                "Press SPACE to continue",
                MEDIUM_TEXT,
                Vec2::new(450.0, 340.0),
                Rgba::WHITE,
            );
        }

        surface.draw_text(
            &view.enemy_count.to_string(),
            SMALL_TEXT,
            Vec2::new(630.0, 40.0),
            Rgba::WHITE,
        );
        if view.wave_imminent {
            surface.draw_text(
                &format!("WAVE {}", view.wave),
                SMALL_TEXT,
                Vec2::new(600.0, 120.0),
                Rgba::WHITE,
            );
        }

        if view.paused {
            self.menu.render(surface);
        }

        self.stats.render(surface);
        surface.draw_text(
            &view.score.to_string(),
            SMALL_TEXT,
            Vec2::new(1160.0, 24.0),
            Rgba::WHITE,
        );
    }
}

/// Marker for HUD root entity.
#[derive(Component)]
pub struct HudRoot;

/// Setup HUD systems.
pub fn setup_hud_systems(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_hud)
        .add_systems(OnExit(GameState::InGame), cleanup_hud)
        .add_systems(
            PostUpdate,
            present_hud.run_if(in_state(GameState::InGame)),
        );
}

/// Spawn the full-screen container HUD elements are placed in.
fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            position_type: PositionType::Absolute,
            ..default()
        },
        HudRoot,
    ));
}

/// Rebuild the HUD from the draw list's HUD layer.
pub fn present_hud(
    mut commands: Commands,
    draw_list: Res<DrawList>,
    root: Query<Entity, With<HudRoot>>,
) {
    let Ok(root) = root.get_single() else {
        return;
    };
    commands.entity(root).despawn_descendants();
    commands.entity(root).with_children(|parent| {
        for command in draw_list.hud() {
            match command {
                DrawCommand::Rect {
                    position,
                    size,
                    color,
                } => {
                    parent.spawn((
                        Node {
                            position_type: PositionType::Absolute,
                            left: Val::Px(position.x),
                            top: Val::Px(position.y),
                            width: Val::Px(size.x),
                            height: Val::Px(size.y),
                            ..default()
                        },
                        BackgroundColor(color.to_color()),
                    ));
                }
                DrawCommand::Text {
                    text,
                    size,
                    position,
                    color,
                } => {
                    parent.spawn((
                        Text::new(text.clone()),
                        TextFont {
                            font_size: *size,
                            ..default()
                        },
                        TextColor(color.to_color()),
                        Node {
                            position_type: PositionType::Absolute,
                            left: Val::Px(position.x),
                            top: Val::Px(position.y),
                            ..default()
                        },
                    ));
                }
                DrawCommand::Sprite { .. } => {}
            }
        }
    });
}

/// Clean up HUD entities.
fn cleanup_hud(mut commands: Commands, query: Query<Entity, With<HudRoot>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
