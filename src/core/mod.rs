//! Core game module - states, events, configuration, input and scheduling.
//!
//! This module provides the foundation that all other game systems build upon.

pub mod config;
pub mod error;
mod events;
pub mod input;
mod plugin;
pub mod scheduler;
mod states;

pub use config::Tunables;
pub use error::GameError;
pub use events::*;
pub use input::{
    Action, InputLatch, InputSnapshot, InputSource, InputState, KeyBindings, PointerButton, ScriptedInput,
};
pub use plugin::CorePlugin;
pub use scheduler::{Clock, FixedStepScheduler, FrameClock, ManualClock, PassReport, Steppable, SystemClock};
pub use states::*;
