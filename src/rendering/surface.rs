//! The drawing surface the simulation renders into.
//!
//! The simulation never talks to the GPU. It issues commands against
//! [`DrawSurface`]; the app records them in a [`DrawList`] and a presenter
//! system replays them each frame.

use bevy::prelude::*;

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba(pub u8, pub u8, pub u8, pub u8);

impl Rgba {
    pub const WHITE: Rgba = Rgba(255, 255, 255, 255);
    pub const BLACK: Rgba = Rgba(0, 0, 0, 255);
    pub const YELLOW: Rgba = Rgba(255, 255, 0, 255);
    pub const RED: Rgba = Rgba(240, 0, 0, 255);

    pub fn to_color(self) -> Color {
        Color::srgba_u8(self.0, self.1, self.2, self.3)
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Rgba::WHITE
    }
}

/// World commands follow the camera, HUD commands are in screen pixels
/// measured from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawLayer {
    #[default]
    World,
    Hud,
}

/// A frame of a sprite sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteRef<'a> {
    pub sheet: &'a str,
    pub animation: usize,
    pub frame: usize,
}

/// Target of a render pass.
pub trait DrawSurface {
    fn set_color(&mut self, color: Rgba);
    fn set_layer(&mut self, layer: DrawLayer);
    /// Draw `sprite` centred on `position`, mirrored when `flip` is set.
    /// `rotation` is in degrees.
    fn draw_sprite(&mut self, sprite: SpriteRef<'_>, size: Vec2, position: Vec2, flip: bool, rotation: f32);
    /// Solid rectangle with its top-left corner at `position`, in the current color.
    fn fill_rect(&mut self, position: Vec2, size: Vec2);
    fn draw_text(&mut self, text: &str, size: f32, position: Vec2, color: Rgba);
}

/// A recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Sprite {
        sheet: String,
        animation: usize,
        frame: usize,
        size: Vec2,
        position: Vec2,
        flip: bool,
        rotation: f32,
        tint: Rgba,
    },
    Rect {
        position: Vec2,
        size: Vec2,
        color: Rgba,
    },
    Text {
        text: String,
        size: f32,
        position: Vec2,
        color: Rgba,
    },
}

/// Recording surface. Cleared and refilled once per rendered frame.
#[derive(Resource, Debug, Default, Clone)]
pub struct DrawList {
    color: Rgba,
    layer: DrawLayer,
    /// Camera centre for the world layer, shake included.
    pub camera: Vec2,
    world: Vec<DrawCommand>,
    hud: Vec<DrawCommand>,
}

impl DrawList {
    pub fn clear(&mut self) {
        self.world.clear();
        self.hud.clear();
        self.color = Rgba::WHITE;
        self.layer = DrawLayer::World;
    }

    pub fn world(&self) -> &[DrawCommand] {
        &self.world
    }

    pub fn hud(&self) -> &[DrawCommand] {
        &self.hud
    }

    /// HUD text commands in draw order.
    pub fn hud_texts(&self) -> impl Iterator<Item = (&str, f32, Vec2, Rgba)> {
        self.hud.iter().filter_map(|c| match c {
            DrawCommand::Text {
                text,
                size,
                position,
                color,
            } => Some((text.as_str(), *size, *position, *color)),
            _ => None,
        })
    }

    fn push(&mut self, command: DrawCommand) {
        match self.layer {
            DrawLayer::World => self.world.push(command),
            DrawLayer::Hud => self.hud.push(command),
        }
    }
}

impl DrawSurface for DrawList {
    fn set_color(&mut self, color: Rgba) {
        self.color = color;
    }

    fn set_layer(&mut self, layer: DrawLayer) {
        self.layer = layer;
    }

    fn draw_sprite(&mut self, sprite: SpriteRef<'_>, size: Vec2, position: Vec2, flip: bool, rotation: f32) {
        self.push(DrawCommand::Sprite {
            sheet: sprite.sheet.to_string(),
            animation: sprite.animation,
            frame: sprite.frame,
            size,
            position,
            flip,
            rotation,
            tint: self.color,
        });
    }

    fn fill_rect(&mut self, position: Vec2, size: Vec2) {
        self.push(DrawCommand::Rect {
            position,
            size,
            color: self.color,
        });
    }

    fn draw_text(&mut self, text: &str, size: f32, position: Vec2, color: Rgba) {
        self.push(DrawCommand::Text {
            text: text.to_string(),
            size,
            position,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_land_on_the_active_layer() {
        let mut list = DrawList::default();
        list.fill_rect(Vec2::ZERO, Vec2::ONE);
        list.set_layer(DrawLayer::Hud);
        list.set_color(Rgba::YELLOW);
        list.fill_rect(Vec2::ZERO, Vec2::ONE);
        list.draw_text("WAVE 2", 20.0, Vec2::new(5.0, 5.0), Rgba::WHITE);

        assert_eq!(list.world().len(), 1);
        assert_eq!(list.hud().len(), 2);
        assert!(matches!(list.hud()[0], DrawCommand::Rect { color: Rgba::YELLOW, .. }));
        assert_eq!(list.hud_texts().map(|t| t.0).collect::<Vec<_>>(), vec!["WAVE 2"]);

        list.clear();
        assert!(list.world().is_empty() && list.hud().is_empty());
    }
}
