//! Combat module - stats, the combo graph, hitboxes and the sword.

mod components;
pub mod combo;
pub mod hitbox;
pub mod weapon;

pub use combo::{
    sword_graph, AttackProfile, ComboEffect, ComboGraph, ComboGraphBuilder, ComboInput, ComboTick,
    NodeKind, SweepType,
};
pub use components::*;
pub use hitbox::HitBox;
pub use weapon::{OwnerPose, Weapon, WeaponAnimation};
