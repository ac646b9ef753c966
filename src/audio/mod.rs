//! Audio module - plays the sound cues raised by the simulation.

mod plugin;

pub use plugin::{SoundBank, SoundPlugin};
