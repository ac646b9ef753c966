//! Combat stats shared by the player and enemies.

use bevy::prelude::*;

/// Hit points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    pub current: i32,
    pub maximum: i32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        Self {
            current: max,
            maximum: max,
        }
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.current -= amount;
    }

    /// Heal up to `ceiling`, which is itself capped at the maximum.
    pub fn heal_to(&mut self, amount: i32, ceiling: i32) {
        let ceiling = ceiling.min(self.maximum);
        if self.current < ceiling {
            self.current = (self.current + amount).min(ceiling);
        }
    }

    pub fn heal(&mut self, amount: i32) {
        self.heal_to(amount, self.maximum);
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0
    }
}

/// Stamina pool with overdraft.
///
/// Spending more than is available leaves the visible pool at zero and books
/// the shortfall plus a penalty of twice the cost as debt. Recovery pays the
/// debt off before the pool refills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stamina {
    current: i32,
    maximum: i32,
    debt: i32,
    recovery_ticks: u32,
    recovery_interval: u32,
}

impl Stamina {
    pub fn new(max: i32, recovery_interval: u32) -> Self {
        Self {
            current: max,
            maximum: max,
            debt: 0,
            recovery_ticks: 0,
            recovery_interval: recovery_interval.max(1),
        }
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn maximum(&self) -> i32 {
        self.maximum
    }

    pub fn debt(&self) -> i32 {
        self.debt
    }

    /// Pool minus outstanding debt.
    pub fn balance(&self) -> i32 {
        self.current - self.debt
    }

    /// A state costing `cost` may be entered.
    pub fn can_afford(&self, cost: i32) -> bool {
        self.balance() > 0 || cost == 0
    }

    pub fn spend(&mut self, cost: i32) {
        if self.current <= 0 || cost == 0 {
            return;
        }
        let left = self.current - cost;
        if left < 0 {
            self.current = 0;
            self.debt += -left + cost * 2;
        } else {
            self.current = left;
        }
    }

    /// One tick of regeneration. `resting` is true while in an idle state;
    /// anything else resets the counter.
    pub fn recover(&mut self, resting: bool) {
        if self.current >= self.maximum && self.debt == 0 {
            return;
        }
        if !resting {
            self.recovery_ticks = 0;
            return;
        }
        self.recovery_ticks += 1;
        if self.recovery_ticks >= self.recovery_interval {
            self.recovery_ticks = 0;
            if self.debt > 0 {
                self.debt -= 1;
            } else {
                self.current = (self.current + 1).min(self.maximum);
            }
        }
    }
}

/// Camera shake requested by attacks.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScreenShake {
    pub intensity: i32,
    pub duration: u32,
}

impl ScreenShake {
    pub fn start(&mut self, duration: u32, intensity: i32) {
        self.duration = duration;
        self.intensity = intensity;
    }

    pub fn is_active(&self) -> bool {
        self.duration > 0
    }

    /// Camera offset for the next rendered frame. Alternates sign while active.
    pub fn next_offset(&mut self) -> Vec2 {
        if self.duration == 0 {
            return Vec2::ZERO;
        }
        self.duration -= 1;
        let offset = Vec2::splat(self.intensity as f32);
        self.intensity = -self.intensity;
        offset
    }
}
