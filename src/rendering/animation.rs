//! Sprite-sheet animation data and per-object playback state.
//!
//! Animations advance once per simulation tick, so playback is deterministic
//! under the fixed-step scheduler.

use bevy::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

/// Simulation ticks per second that animation rates are expressed against.
const TICKS_PER_SECOND: u32 = 60;

/// One row of a sprite sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationSpec {
    pub frames: usize,
    pub fps: u32,
    pub looping: bool,
}

impl AnimationSpec {
    pub const fn new(frames: usize, fps: u32, looping: bool) -> Self {
        Self {
            frames,
            fps,
            looping,
        }
    }
}

/// All animations cut from one sprite sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationSet {
    pub sheet: String,
    pub frame_size: Vec2,
    pub animations: Vec<AnimationSpec>,
}

impl AnimationSet {
    pub fn new(sheet: impl Into<String>, frame_size: Vec2, animations: &[AnimationSpec]) -> Self {
        Self {
            sheet: sheet.into(),
            frame_size,
            animations: animations.to_vec(),
        }
    }

    /// A single looping animation. Decorations and pickups use these.
    pub fn single(sheet: impl Into<String>, frame_size: Vec2, frames: usize, fps: u32) -> Self {
        Self::new(sheet, frame_size, &[AnimationSpec::new(frames, fps, true)])
    }

    pub fn get(&self, index: usize) -> Option<&AnimationSpec> {
        self.animations.get(index)
    }
}

/// Cache of animation sets keyed by the owning object type.
#[derive(Resource, Debug, Default, Clone)]
pub struct AnimationLibrary {
    sets: HashMap<String, Arc<AnimationSet>>,
}

impl AnimationLibrary {
    /// Returns the cached set for `key`, building it on first use.
    pub fn get_or_create(
        &mut self,
        key: &str,
        build: impl FnOnce() -> AnimationSet,
    ) -> Arc<AnimationSet> {
        if let Some(set) = self.sets.get(key) {
            return Arc::clone(set);
        }
        let set = Arc::new(build());
        self.sets.insert(key.to_string(), Arc::clone(&set));
        set
    }

    pub fn get(&self, key: &str) -> Option<Arc<AnimationSet>> {
        self.sets.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

/// Which animation an object shows and how far into it playback is.
///
/// Update code writes [`AnimationCursor::current`] freely, possibly several
/// times per tick. [`AnimationCursor::sync`] then restarts playback only if
/// the final choice differs from the one shown last tick.
#[derive(Debug, Clone)]
pub struct AnimationCursor {
    set: Arc<AnimationSet>,
    pub current: usize,
    shown: usize,
    frame: usize,
    elapsed: u32,
    rates: Vec<u32>,
}

impl AnimationCursor {
    pub fn new(set: Arc<AnimationSet>) -> Self {
        let rates = set.animations.iter().map(|a| a.fps).collect();
        Self {
            set,
            current: 0,
            shown: 0,
            frame: 0,
            elapsed: 0,
            rates,
        }
    }

    pub fn animations(&self) -> &AnimationSet {
        &self.set
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Restart at frame 0 if the animation changed since the last sync.
    pub fn sync(&mut self) {
        if self.current != self.shown {
            self.frame = 0;
            self.elapsed = 0;
        }
        self.shown = self.current;
    }

    /// Switch animation immediately, keeping the frame counter.
    pub fn force(&mut self, index: usize) {
        self.current = index;
        self.shown = index;
    }

    /// Base rate of an animation as authored.
    pub fn base_fps(&self, index: usize) -> u32 {
        self.set.get(index).map_or(1, |a| a.fps)
    }

    /// Override the playback rate of one animation for this object only.
    pub fn set_fps(&mut self, index: usize, fps: u32) {
        if let Some(rate) = self.rates.get_mut(index) {
            *rate = fps.max(1);
        }
    }

    pub fn fps(&self, index: usize) -> u32 {
        self.rates.get(index).copied().unwrap_or(1)
    }

    /// Advance by one simulation tick. Looping animations wrap, others hold
    /// their final frame.
    pub fn advance(&mut self) {
        let Some(spec) = self.set.get(self.current).copied() else {
            return;
        };
        self.elapsed += self.fps(self.current);
        if self.elapsed < TICKS_PER_SECOND {
            return;
        }
        self.elapsed -= TICKS_PER_SECOND;
        self.frame += 1;
        if self.frame >= spec.frames {
            self.frame = if spec.looping {
                0
            } else {
                spec.frames.saturating_sub(1)
            };
        }
    }

    /// The frame to draw, or None when the frame counter ran past the current
    /// animation (possible after [`AnimationCursor::force`]).
    pub fn checked_frame(&self) -> Option<usize> {
        let spec = self.set.get(self.current)?;
        (self.frame < spec.frames).then_some(self.frame)
    }

    /// Recover from an overrun by restarting the current animation.
    pub fn reset_frame(&mut self) {
        self.frame = 0;
        self.elapsed = 0;
        self.shown = self.current;
    }

    /// Whether a non-looping animation has reached its last frame.
    pub fn finished(&self) -> bool {
        self.set
            .get(self.current)
            .is_some_and(|a| !a.looping && self.frame + 1 >= a.frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor() -> AnimationCursor {
        AnimationCursor::new(Arc::new(AnimationSet::new(
            "test.png",
            Vec2::new(10.0, 10.0),
            &[
                AnimationSpec::new(3, 30, true),
                AnimationSpec::new(2, 60, false),
            ],
        )))
    }

    #[test]
    fn frames_advance_at_the_authored_rate() {
        let mut c = cursor();
        c.advance();
        assert_eq!(c.frame(), 0);
        c.advance();
        assert_eq!(c.frame(), 1);
        for _ in 0..4 {
            c.advance();
        }
        assert_eq!(c.frame(), 0, "looping animation wraps");
    }

    #[test]
    fn one_shot_holds_its_last_frame() {
        let mut c = cursor();
        c.current = 1;
        c.sync();
        for _ in 0..10 {
            c.advance();
        }
        assert_eq!(c.frame(), 1);
        assert!(c.finished());
    }

    #[test]
    fn sync_only_restarts_on_change() {
        let mut c = cursor();
        c.advance();
        c.advance();
        c.sync();
        assert_eq!(c.frame(), 1);

        c.current = 1;
        c.current = 0;
        c.sync();
        assert_eq!(c.frame(), 1, "net change is what counts");

        c.current = 1;
        c.sync();
        assert_eq!(c.frame(), 0);
    }

    #[test]
    fn forced_switch_can_overrun() {
        let mut c = cursor();
        for _ in 0..4 {
            c.advance();
        }
        assert_eq!(c.frame(), 2);
        c.force(1);
        assert_eq!(c.checked_frame(), None);
        c.reset_frame();
        assert_eq!(c.checked_frame(), Some(0));
    }

    #[test]
    fn per_object_rate_override() {
        let mut c = cursor();
        c.set_fps(0, 60);
        c.advance();
        assert_eq!(c.frame(), 1);
        assert_eq!(c.base_fps(0), 30);
    }

    #[test]
    fn library_caches_by_key() {
        let mut library = AnimationLibrary::default();
        let mut builds = 0;
        for _ in 0..3 {
            library.get_or_create("bot", || {
                builds += 1;
                AnimationSet::single("bot.png", Vec2::ONE, 1, 1)
            });
        }
        assert_eq!(builds, 1);
        assert_eq!(library.len(), 1);
    }
}
