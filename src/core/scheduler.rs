//! Fixed-timestep update scheduling with bounded catch-up.
//!
//! Each pass runs as many whole ticks as real time allows (at most
//! `max_updates`), advances the committed time by exactly one tick per update,
//! renders once and then idles away whatever is left of the tick budget.

use bevy::prelude::*;
use std::time::{Duration, Instant};

/// Catch-up limit per pass.
pub const MAX_UPDATES: u32 = 5;

/// Source of monotonic time for the scheduler.
pub trait Clock {
    /// Time since an arbitrary fixed origin.
    fn now(&self) -> Duration;
    /// Block for `duration`.
    fn sleep(&mut self, duration: Duration);
}

/// Wall clock backed by [`Instant`].
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Clock that only moves when told to. Sleeping advances it too.
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    now: Duration,
    slept: Duration,
}

impl ManualClock {
    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    /// Total time spent in [`Clock::sleep`].
    pub fn slept(&self) -> Duration {
        self.slept
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now
    }

    fn sleep(&mut self, duration: Duration) {
        self.slept += duration;
        self.now += duration;
    }
}

/// Bevy frame time. Frame pacing belongs to the app runner, so sleeping is a no-op.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock(pub Duration);

impl Clock for FrameClock {
    fn now(&self) -> Duration {
        self.0
    }

    fn sleep(&mut self, _duration: Duration) {}
}

/// Something the scheduler can drive.
pub trait Steppable {
    /// Run one simulation tick.
    fn step(&mut self);
    /// Draw the current state once.
    fn present(&mut self);
    /// Checked at the top of every pass by [`FixedStepScheduler::run`].
    fn exit_requested(&self) -> bool {
        false
    }
}

/// What a single scheduler pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassReport {
    pub updates: u32,
    pub slept: Duration,
}

/// Drives a [`Steppable`] at a fixed tick rate.
#[derive(Resource, Debug, Clone)]
pub struct FixedStepScheduler {
    tick: Duration,
    max_updates: u32,
    last_update: Option<Duration>,
}

impl Default for FixedStepScheduler {
    fn default() -> Self {
        Self::new(60, MAX_UPDATES)
    }
}

impl FixedStepScheduler {
    pub fn new(tick_rate: u32, max_updates: u32) -> Self {
        Self {
            tick: Duration::from_nanos(1_000_000_000 / tick_rate.max(1) as u64),
            max_updates: max_updates.max(1),
            last_update: None,
        }
    }

    pub fn tick(&self) -> Duration {
        self.tick
    }

    /// Committed simulation time, if the scheduler has started.
    pub fn last_update(&self) -> Option<Duration> {
        self.last_update
    }

    /// Anchor committed time at the clock's current reading.
    pub fn start(&mut self, clock: &impl Clock) {
        self.last_update = Some(clock.now());
    }

    /// Forget the anchor. The next pass starts fresh.
    pub fn reset(&mut self) {
        self.last_update = None;
    }

    /// Catch up, render once, then sleep off the rest of the budget.
    pub fn run_pass(&mut self, clock: &mut impl Clock, target: &mut impl Steppable) -> PassReport {
        let pass_start = clock.now();
        let mut last = *self.last_update.get_or_insert(pass_start);
        let mut updates = 0;

        while pass_start.saturating_sub(last) >= self.tick && updates < self.max_updates {
            target.step();
            last += self.tick;
            updates += 1;
        }
        self.last_update = Some(last);

        target.present();

        let taken = clock.now().saturating_sub(pass_start);
        let slept = self.tick.saturating_sub(taken);
        if !slept.is_zero() {
            clock.sleep(slept);
        }

        PassReport { updates, slept }
    }

    /// Run passes until the target asks to exit. Returns the number of passes.
    pub fn run(&mut self, clock: &mut impl Clock, target: &mut impl Steppable) -> u64 {
        let mut passes = 0;
        while !target.exit_requested() {
            self.run_pass(clock, target);
            passes += 1;
        }
        passes
    }
}
