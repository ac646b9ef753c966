//! Health and stamina bars with a trailing "recent loss" segment.

use bevy::prelude::*;

use crate::rendering::{DrawSurface, Rgba};
use crate::world::context::LifestealWindow;

/// Ticks the loss segment stays up after a drop.
pub const LOSS_LINGER: u32 = 180;
/// Full bar widths at 100 points.
pub const HEALTH_BAR_WIDTH: f32 = 82.0;
pub const STAMINA_BAR_WIDTH: f32 = 60.0;

/// Screen pixels per bar unit.
const PIXEL_SCALE: f32 = 4.0;
const HEALTH_BAR_ORIGIN: Vec2 = Vec2::new(24.0, 24.0);
const STAMINA_BAR_ORIGIN: Vec2 = Vec2::new(24.0, 48.0);
const HEALTH_BAR_HEIGHT: f32 = 16.0;
const STAMINA_BAR_HEIGHT: f32 = 12.0;

const HEALTH_COLOR: Rgba = Rgba(102, 0, 254, 255);
const STAMINA_COLOR: Rgba = Rgba(0, 153, 90, 255);

#[derive(Debug, Default, Clone, PartialEq)]
struct Bar {
    width: f32,
    old_width: f32,
    timer: u32,
}

impl Bar {
    /// Returns true when a new loss was registered this tick.
    fn update(&mut self, width: f32) -> bool {
        if self.timer == 0 {
            self.old_width = self.width;
        }
        self.width = width;
        let dropped = self.timer == 0 && self.old_width > self.width;
        if dropped {
            self.timer = LOSS_LINGER;
        }
        dropped
    }

    /// Count down, draining the loss segment over the last quarter.
    fn settle(&mut self) {
        if self.timer > 0 {
            self.timer -= 1;
        }
        if self.timer > 0 && self.timer <= LOSS_LINGER / 4 {
            self.old_width -= (self.old_width - self.width) / 4.0;
        }
    }

    fn render(&self, surface: &mut dyn DrawSurface, origin: Vec2, height: f32, color: Rgba) {
        if self.timer > 0 && self.old_width > 0.0 {
            surface.set_color(Rgba::YELLOW);
            surface.fill_rect(origin, Vec2::new(self.old_width * PIXEL_SCALE, height));
        }
        if self.width > 0.0 {
            surface.set_color(color);
            surface.fill_rect(origin, Vec2::new(self.width * PIXEL_SCALE, height));
        }
        surface.set_color(Rgba::WHITE);
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct StatBars {
    health: Bar,
    stamina: Bar,
    lifesteal_available: bool,
    lifesteal_amount: i32,
}

impl StatBars {
    pub fn update(&mut self, health: i32, stamina: i32) {
        let current_health = health as f32 * HEALTH_BAR_WIDTH / 100.0;
        if self.health.update(current_health) {
            self.lifesteal_amount = (Self::points(self.health.old_width) - Self::points(current_health)) as i32;
        }
        self.stamina
            .update(stamina as f32 * STAMINA_BAR_WIDTH / 100.0);

        self.lifesteal_available = self.health.timer as f32 > LOSS_LINGER as f32 / 4.0;

        self.health.settle();
        self.stamina.settle();
    }

    /// Health points represented by a bar width.
    fn points(width: f32) -> f32 {
        width * 100.0 / 81.0
    }

    pub fn health_width(&self) -> f32 {
        self.health.width
    }

    pub fn stamina_width(&self) -> f32 {
        self.stamina.width
    }

    pub fn loss_visible(&self) -> bool {
        self.health.timer > 0
    }

    /// Healing the player may still claim back from the recent loss.
    pub fn lifesteal(&self) -> LifestealWindow {
        LifestealWindow {
            available: self.lifesteal_available,
            amount: self.lifesteal_amount,
            ceiling: Self::points(self.health.old_width) as i32,
        }
    }

    pub fn render(&self, surface: &mut dyn DrawSurface) {
        self.health
            .render(surface, HEALTH_BAR_ORIGIN, HEALTH_BAR_HEIGHT, HEALTH_COLOR);
        self.stamina
            .render(surface, STAMINA_BAR_ORIGIN, STAMINA_BAR_HEIGHT, STAMINA_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_follow_the_stats() {
        let mut bars = StatBars::default();
        bars.update(100, 50);
        assert_eq!(bars.health_width(), 82.0);
        assert_eq!(bars.stamina_width(), 30.0);
        assert!(!bars.loss_visible());
    }

    #[test]
    fn a_hit_opens_the_lifesteal_window() {
        let mut bars = StatBars::default();
        bars.update(100, 100);
        bars.update(100, 100);
        bars.update(60, 100);

        let window = bars.lifesteal();
        assert!(window.available);
        assert_eq!(window.amount, 40);
        assert_eq!(window.ceiling, 101);
        assert!(bars.loss_visible());
    }

    #[test]
    fn lifesteal_closes_before_the_loss_bar_fades() {
        let mut bars = StatBars::default();
        bars.update(100, 100);
        bars.update(100, 100);
        bars.update(60, 100);
        for _ in 0..LOSS_LINGER - 45 {
            bars.update(60, 100);
        }
        assert!(!bars.lifesteal().available);
        assert!(bars.loss_visible());
        for _ in 0..45 {
            bars.update(60, 100);
        }
        assert!(!bars.loss_visible());
    }
}
