//! Keyboard driven pause menu.

use bevy::prelude::*;

use crate::core::{Action, InputState, PointerButton};
use crate::rendering::{DrawSurface, Rgba};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Resume,
    ExitToMenu,
    Quit,
}

const OPTIONS: [(&str, MenuChoice); 3] = [
    ("Resume", MenuChoice::Resume),
    ("Exit to menu", MenuChoice::ExitToMenu),
    ("Quit game", MenuChoice::Quit),
];

const TEXT_SIZE: f32 = 20.0;
const FIRST_ROW: Vec2 = Vec2::new(560.0, 300.0);
const ROW_SPACING: f32 = 30.0;
const GLYPH_WIDTH: f32 = 11.0;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PauseMenu {
    selected: usize,
}

impl PauseMenu {
    pub fn selected(&self) -> MenuChoice {
        OPTIONS[self.selected].1
    }

    /// Move the cursor with up/down and activate with confirm or a click.
    pub fn update(&mut self, input: &InputState) -> Option<MenuChoice> {
        let count = OPTIONS.len();
        if input.key_down(Action::Up) {
            self.selected = (self.selected + count - 1) % count;
        }
        if input.key_down(Action::Down) {
            self.selected = (self.selected + 1) % count;
        }
        if input.key_down(Action::Confirm) || input.mouse_pressed(PointerButton::Primary) {
            return Some(self.selected());
        }
        None
    }

    pub fn render(&self, surface: &mut dyn DrawSurface) {
        let (label, _) = OPTIONS[self.selected];
        let row = FIRST_ROW + Vec2::new(0.0, ROW_SPACING * self.selected as f32);
        let width = label.len() as f32 * GLYPH_WIDTH;
        surface.set_color(Rgba::WHITE);
        surface.fill_rect(row - Vec2::splat(4.0), Vec2::new(width + 8.0, TEXT_SIZE + 8.0));
        surface.set_color(Rgba::BLACK);
        surface.fill_rect(row - Vec2::splat(2.0), Vec2::new(width + 4.0, TEXT_SIZE + 4.0));
        surface.set_color(Rgba::WHITE);

        for (i, (label, _)) in OPTIONS.iter().enumerate() {
            let position = FIRST_ROW + Vec2::new(0.0, ROW_SPACING * i as f32);
            surface.draw_text(label, TEXT_SIZE, position, Rgba::WHITE);
        }
    }
}
