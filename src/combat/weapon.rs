//! The player's sword: follows its owner, runs the combo graph, exposes the
//! hitbox and carries a stabbed enemy.

use bevy::prelude::*;
use std::sync::Arc;

use super::combo::{sword_graph, AttackProfile, ComboActor, ComboGraph, ComboSignals, ComboTick};
use super::components::Stamina;
use super::hitbox::{self, HitBox};
use crate::core::{Action, GameError, PointerButton};
use crate::enemies::Enemy;
use crate::rendering::{AnimationLibrary, AnimationSet, AnimationSpec, DrawSurface};
use crate::world::context::{LifestealWindow, TickContext};
use crate::world::iso::TILE_Z_HEIGHT;
use crate::world::{Body, GameObject, ObjectId};

/// Rows of the sword sprite sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum WeaponAnimation {
    Sheathed,
    DrawnFront,
    DrawnFullFront,
    WalkFront,
    WalkFullFront,
    DrawnBack,
    DrawnFullBack,
    WalkBack,
    WalkFullBack,
    LightAttack1,
    LightAttack2,
    HeavyAttack1,
    HeavyAttack2,
    HeavyCombo1,
    HeavyCombo2,
    Whirl,
}

impl WeaponAnimation {
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Animations before this index are carry poses, the rest are attacks.
pub const PASSIVE_ANIMATION_COUNT: usize = 9;

/// Attack speed a fresh sword starts with.
pub const DEFAULT_ATTACK_SPEED: f32 = 1.5;

const SWORD_SHEET: &str = "player/weapons/sword.png";

const SWORD_ANIMATIONS: [AnimationSpec; 16] = [
    AnimationSpec::new(1, 1, true),
    AnimationSpec::new(3, 3, true),
    AnimationSpec::new(3, 3, true),
    AnimationSpec::new(4, 4, true),
    AnimationSpec::new(4, 4, true),
    AnimationSpec::new(3, 3, true),
    AnimationSpec::new(3, 3, true),
    AnimationSpec::new(4, 4, true),
    AnimationSpec::new(4, 4, true),
    AnimationSpec::new(9, 14, false),
    AnimationSpec::new(9, 14, false),
    AnimationSpec::new(9, 10, false),
    AnimationSpec::new(9, 10, false),
    AnimationSpec::new(9, 10, false),
    AnimationSpec::new(9, 10, false),
    AnimationSpec::new(9, 14, true),
];

pub fn sword_animations() -> AnimationSet {
    AnimationSet::new(SWORD_SHEET, Vec2::new(120.0, 90.0), &SWORD_ANIMATIONS)
}

/// Offset and rotation of a stabbed enemy on the blade, by weapon animation
/// and frame: `(dx, dz, degrees)`.
fn victim_pose(animation: usize, frame: usize) -> (f32, f32, f32) {
    const THRUST: [f32; 9] = [10.0, 10.0, 10.0, 15.0, 20.0, 25.0, 25.0, 25.0, 30.0];
    match (animation, frame) {
        (0, 0) => (0.0, 0.0, -90.0),
        (2 | 6, 0..=2) => (0.0, 20.0, -90.0),
        (4, 0) => (-1.0, 20.0, -90.0),
        (4, 1) => (0.0, 20.0, -90.0),
        (4, 2..=3) | (8, 0..=3) => (1.0, 20.0, -90.0),
        (11, f) if f < THRUST.len() => (THRUST[f], 10.0, 0.0),
        _ => (0.0, 0.0, 0.0),
    }
}

/// What the weapon needs to know about its owner this tick.
#[derive(Debug, Clone, Copy)]
pub struct OwnerPose {
    pub position: Vec3,
    pub flipped: bool,
    pub facing_away: bool,
    pub moving: bool,
    pub airborne: bool,
    pub sprite_height: f32,
}

/// The sword.
#[derive(Debug)]
pub struct Weapon {
    pub body: Body,
    graph: ComboGraph,
    hitbox: HitBox,
    attack_speed: f32,
    speed_changed: bool,
    drawn: bool,
    action: bool,
    attacking: bool,
    doing_damage: bool,
    lifesteal: bool,
    victim: Option<Box<GameObject>>,
    /// Enemy stabbed this tick, moved onto the blade once the pass ends.
    claimed: Option<ObjectId>,
}

impl Weapon {
    pub fn new(library: &mut AnimationLibrary) -> Result<Self, GameError> {
        Self::with_graph(library, sword_graph()?)
    }

    pub fn with_graph(library: &mut AnimationLibrary, graph: ComboGraph) -> Result<Self, GameError> {
        let set: Arc<AnimationSet> = library.get_or_create("sword", sword_animations);
        Ok(Self {
            body: Body::new(Vec3::ZERO, set),
            graph,
            hitbox: HitBox::default(),
            attack_speed: DEFAULT_ATTACK_SPEED,
            speed_changed: true,
            drawn: false,
            action: false,
            attacking: false,
            doing_damage: false,
            lifesteal: true,
            victim: None,
            claimed: None,
        })
    }

    pub fn graph(&self) -> &ComboGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut ComboGraph {
        &mut self.graph
    }

    pub fn hitbox(&self) -> &HitBox {
        &self.hitbox
    }

    pub fn attack_speed(&self) -> f32 {
        self.attack_speed
    }

    /// Attack speed changed since the weapon last rescaled its animations.
    pub fn attack_speed_changed(&self) -> bool {
        self.speed_changed
    }

    /// Add `delta` to the attack speed. Ignored if the result is not positive.
    pub fn modify_attack_speed(&mut self, delta: f32) {
        let speed = self.attack_speed + delta;
        if speed > 0.0 {
            self.attack_speed = speed;
            self.speed_changed = true;
        }
    }

    pub fn is_drawn(&self) -> bool {
        self.drawn
    }

    /// Attacking or dodging. The owner draws the weapon in front while true.
    pub fn in_action(&self) -> bool {
        self.action
    }

    pub fn is_attacking(&self) -> bool {
        self.attacking
    }

    pub fn is_doing_damage(&self) -> bool {
        self.doing_damage
    }

    /// The current attack, if the weapon is in an attack node.
    pub fn current_attack(&self) -> Option<&AttackProfile> {
        self.graph.current().attack()
    }

    pub fn holds_victim(&self) -> bool {
        self.victim.is_some() || self.claimed.is_some()
    }

    pub fn victim(&self) -> Option<&GameObject> {
        self.victim.as_deref()
    }

    /// Reserve the blade for the enemy `id`. It is handed over with
    /// [`Weapon::take_victim`] once it has left the world.
    pub fn claim_victim(&mut self, id: ObjectId) -> bool {
        if self.holds_victim() {
            return false;
        }
        self.claimed = Some(id);
        true
    }

    pub fn claimed_victim(&self) -> Option<ObjectId> {
        self.claimed
    }

    pub fn take_victim(&mut self, victim: GameObject) {
        if self.claimed == Some(victim.id) {
            self.claimed = None;
            self.victim = Some(Box::new(victim));
        }
    }

    pub fn set_lifesteal(&mut self, enabled: bool) {
        self.lifesteal = enabled;
    }

    /// Health the owner regains for the current attack landing.
    pub fn lifesteal_amount(&self, window: LifestealWindow) -> Option<i32> {
        if !self.lifesteal || !window.available {
            return None;
        }
        let attack = self.current_attack()?;
        Some(window.amount / 10 * attack.damage / 10)
    }

    fn signals(ctx: &TickContext) -> ComboSignals {
        ComboSignals {
            dodge: ctx.input.key_down(Action::JumpDodge),
            sheathe: ctx.input.key_down(Action::Sheathe),
            light: ctx.input.mouse_pressed(PointerButton::Primary),
            heavy: ctx.input.mouse_pressed(PointerButton::Secondary),
            special: ctx.input.mouse_pressed(PointerButton::Middle),
        }
    }

    /// Run the combo graph and place the weapon. Returns the effects the
    /// owner has to apply.
    pub fn update(
        &mut self,
        owner: OwnerPose,
        health: i32,
        stamina: &mut Stamina,
        ctx: &mut TickContext,
    ) -> ComboTick {
        if self.speed_changed {
            self.rescale_attacks();
        }

        let holding_victim = self.holds_victim();
        let tick = self.graph.update(
            Self::signals(ctx),
            ComboActor {
                health,
                stamina,
                holding_victim,
            },
        );

        let node = self.graph.current().descriptor;
        self.attacking = self.graph.current().attack().is_some();
        let mut animation = node.weapon_animation.index();

        self.body.flip = owner.flipped;
        let x = if owner.flipped {
            owner.position.x + node.offset.x as f32
        } else {
            owner.position.x - node.offset.x as f32
        };
        let y = owner.position.y + node.offset.y as f32 - owner.sprite_height / 2.0;
        self.body.set_position(Vec3::new(x, y, owner.position.z));
        self.body.rotation = 0.0;

        self.drawn = animation > 0;
        self.action = animation >= PASSIVE_ANIMATION_COUNT || self.graph.current().is_dodge();

        if !self.action {
            let walking = self.drawn
                && self.graph.current().is_idle()
                && owner.moving
                && !owner.airborne;
            if walking {
                self.body.flip = !self.body.flip;
                if animation < 3 || (animation > 4 && animation < 7) {
                    animation += 2;
                }
                let sway = if owner.flipped { 20.0 } else { -20.0 };
                self.body.translate(Vec2::new(sway, -14.0));
            }
            if owner.facing_away && animation > 0 && animation < 5 {
                animation += 4;
            }
        }

        self.body.animation.current = animation;
        self.body.animation.sync();

        let frame = self.body.animation.frame();
        self.doing_damage = self.attacking
            && hitbox::is_damage_frame(animation - PASSIVE_ANIMATION_COUNT, frame);
        if self.doing_damage {
            self.hitbox.update(
                self.body.position().truncate(),
                animation - PASSIVE_ANIMATION_COUNT,
                frame,
                owner.flipped,
            );
        }

        self.carry_victim(owner, node.can_throw, ctx);
        tick
    }

    fn rescale_attacks(&mut self) {
        let speed = self.attack_speed;
        let attacks: Vec<usize> = self
            .graph
            .attack_nodes()
            .map(|n| n.descriptor.weapon_animation.index())
            .collect();
        for index in attacks {
            let base = self.body.animation.base_fps(index);
            self.body
                .animation
                .set_fps(index, (base as f32 * speed) as u32 + 1);
        }
        self.graph.rescale(speed);
        self.speed_changed = false;
    }

    fn carry_victim(&mut self, owner: OwnerPose, can_throw: bool, ctx: &mut TickContext) {
        let Some(mut victim) = self.victim.take() else {
            return;
        };
        let (dx, dz, rotation) = victim_pose(self.body.animation.current, self.body.animation.frame());
        let x = if self.body.flip {
            self.body.x() - dx
        } else {
            self.body.x() + dx
        };
        victim
            .body
            .set_position(Vec3::new(x, owner.position.y, owner.position.z + dz / TILE_Z_HEIGHT));
        victim.body.rotation = rotation;
        victim.body.animation.force(Enemy::STAB_ANIMATION);
        victim.body.half_extents.y = 20.0;
        if let Some(shadow) = victim.shadow.as_mut() {
            shadow.follow(&victim.body, ctx.terrain);
        }

        if !can_throw {
            self.victim = Some(victim);
            return;
        }
        let inertia = if self.body.flip { -50 } else { 50 };
        if let Some(enemy) = victim.as_enemy_mut() {
            enemy.throw(inertia);
        }
        victim.body.remove = false;
        ctx.add_object(*victim);
    }

    pub fn advance_animation(&mut self) {
        self.body.animation.advance();
        if let Some(victim) = self.victim.as_mut() {
            victim.body.animation.advance();
        }
    }

    pub fn render(&mut self, id: ObjectId, surface: &mut dyn DrawSurface) {
        let position = Vec2::new(
            self.body.x(),
            self.body.y() - TILE_Z_HEIGHT * self.body.z(),
        );
        self.body.draw_at(id, surface, position);
        if let Some(victim) = self.victim.as_mut() {
            victim.render(surface);
        }
    }

    /// Lay the weapon down next to a dead owner.
    pub fn drop_beside(&mut self, owner_position: Vec3) {
        self.graph.set_idle();
        self.body
            .set_position(Vec3::new(self.body.x(), owner_position.y - 10.0, self.body.z()));
        self.body.rotation = 90.0;
        self.body.animation.current = WeaponAnimation::Sheathed.index();
        self.body.animation.sync();
        self.attacking = false;
        self.doing_damage = false;
        self.action = false;
        self.drawn = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attack_speed_never_drops_to_zero() {
        let mut library = AnimationLibrary::default();
        let mut weapon = Weapon::new(&mut library).unwrap();
        weapon.modify_attack_speed(-1.5);
        assert_eq!(weapon.attack_speed(), DEFAULT_ATTACK_SPEED);
        weapon.modify_attack_speed(0.5);
        assert_eq!(weapon.attack_speed(), 2.0);
        assert!(weapon.attack_speed_changed());
    }

    #[test]
    fn victim_thrust_follows_the_stab_frames() {
        assert_eq!(victim_pose(11, 0), (10.0, 10.0, 0.0));
        assert_eq!(victim_pose(11, 8), (30.0, 10.0, 0.0));
        assert_eq!(victim_pose(4, 3), (1.0, 20.0, -90.0));
        assert_eq!(victim_pose(9, 0), (0.0, 0.0, 0.0));
    }

    #[test]
    fn only_one_victim_at_a_time() {
        let mut library = AnimationLibrary::default();
        let mut weapon = Weapon::new(&mut library).unwrap();
        assert!(weapon.claim_victim(ObjectId(4)));
        assert!(!weapon.claim_victim(ObjectId(5)));
        assert_eq!(weapon.claimed_victim(), Some(ObjectId(4)));
    }

    #[test]
    fn lifesteal_needs_an_attack() {
        let mut library = AnimationLibrary::default();
        let mut weapon = Weapon::new(&mut library).unwrap();
        let window = LifestealWindow {
            available: true,
            amount: 25,
            ceiling: 90,
        };
        assert_eq!(weapon.lifesteal_amount(window), None, "sheathed");

        weapon.graph_mut().set_idle();
        assert_eq!(weapon.lifesteal_amount(window), None, "idle is not an attack");
    }
}
