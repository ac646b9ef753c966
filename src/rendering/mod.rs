//! Rendering module - sprite animation, the draw surface and its presenter.

pub mod animation;
mod plugin;
pub mod surface;
pub mod visual_config;

pub use animation::{AnimationCursor, AnimationLibrary, AnimationSet, AnimationSpec};
pub use plugin::{frame_rect, RenderingPlugin, WorldCamera};
pub use surface::{DrawCommand, DrawLayer, DrawList, DrawSurface, Rgba, SpriteRef};
pub use visual_config::VisualConfig;
