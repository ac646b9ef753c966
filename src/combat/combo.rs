//! The combo graph: the weapon's finite state machine.
//!
//! Nodes are plain data. Each node names its successor for every
//! [`ComboInput`], and the graph is validated when built so a missing or
//! dangling transition is caught before play starts. The only per-node code
//! is the small set of effects selected by [`NodeKind`].

use bevy::prelude::*;
use std::collections::HashMap;
use std::fmt;

use super::components::Stamina;
use super::weapon::WeaponAnimation;
use crate::core::{GameError, SoundCue};
use crate::player::PlayerAnimation;

/// Transition labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComboInput {
    Light,
    Heavy,
    Special,
    TimeUp,
    DrawSheath,
    Dodge,
}

impl ComboInput {
    pub const ALL: [ComboInput; 6] = [
        ComboInput::Light,
        ComboInput::Heavy,
        ComboInput::Special,
        ComboInput::TimeUp,
        ComboInput::DrawSheath,
        ComboInput::Dodge,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ComboInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Swing direction. Vertical swings only connect with targets close on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepType {
    Horizontal,
    Vertical,
}

/// Extra data carried by attack nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackProfile {
    pub damage: i32,
    pub sweep: SweepType,
    /// `(duration, intensity)` of the camera shake at window entry.
    pub shake: Option<(u32, i32)>,
    pub can_stab: bool,
}

/// Selects the start and window effects of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Idle,
    Dodge,
    Attack(AttackProfile),
}

/// Static description of one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeDescriptor {
    pub name: &'static str,
    pub kind: NodeKind,
    pub weapon_animation: WeaponAnimation,
    pub player_animation: PlayerAnimation,
    pub can_dodge: bool,
    pub can_move: bool,
    pub can_throw: bool,
    /// Weapon offset from its owner.
    pub offset: IVec2,
    pub duration: u32,
    /// Trailing ticks during which input picks the next node.
    pub window: u32,
    pub cost: i32,
    pub start_cue: Option<SoundCue>,
    pub finish_cue: Option<SoundCue>,
}

/// Index of a node within its graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A node as held by a built graph.
#[derive(Debug, Clone, PartialEq)]
pub struct ComboNode {
    pub descriptor: NodeDescriptor,
    /// Duration after attack-speed scaling.
    pub duration: u32,
    transitions: [NodeId; 6],
}

impl ComboNode {
    pub fn name(&self) -> &'static str {
        self.descriptor.name
    }

    pub fn kind(&self) -> NodeKind {
        self.descriptor.kind
    }

    pub fn is_idle(&self) -> bool {
        self.descriptor.kind == NodeKind::Idle
    }

    pub fn is_dodge(&self) -> bool {
        self.descriptor.kind == NodeKind::Dodge
    }

    pub fn attack(&self) -> Option<&AttackProfile> {
        match &self.descriptor.kind {
            NodeKind::Attack(profile) => Some(profile),
            _ => None,
        }
    }

    pub fn cost(&self) -> i32 {
        self.descriptor.cost
    }

    pub fn target(&self, input: ComboInput) -> NodeId {
        self.transitions[input.index()]
    }
}

/// Collects descriptors and transitions, then validates them into a graph.
#[derive(Debug, Default)]
pub struct ComboGraphBuilder {
    nodes: Vec<NodeDescriptor>,
    transitions: HashMap<&'static str, Vec<(ComboInput, &'static str)>>,
}

impl ComboGraphBuilder {
    pub fn node(mut self, descriptor: NodeDescriptor) -> Self {
        self.nodes.push(descriptor);
        self
    }

    pub fn transition(mut self, from: &'static str, input: ComboInput, to: &'static str) -> Self {
        self.transitions.entry(from).or_default().push((input, to));
        self
    }

    /// Transitions for every input of `from`, in [`ComboInput::ALL`] order.
    pub fn transitions(mut self, from: &'static str, targets: [&'static str; 6]) -> Self {
        let row = self.transitions.entry(from).or_default();
        row.extend(ComboInput::ALL.into_iter().zip(targets));
        self
    }

    /// Build the graph starting at `entry`, with `idle` as the fallback node.
    pub fn build(self, entry: &str, idle: &str) -> Result<ComboGraph, GameError> {
        let index: HashMap<&str, NodeId> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.name, NodeId(i)))
            .collect();
        let resolve = |node: &str, target: &str| {
            index.get(target).copied().ok_or_else(|| GameError::UnknownComboNode {
                node: node.to_string(),
                target: target.to_string(),
            })
        };

        let mut nodes = Vec::with_capacity(self.nodes.len());
        for descriptor in &self.nodes {
            let row = self
                .transitions
                .get(descriptor.name)
                .map(Vec::as_slice)
                .unwrap_or_default();
            let mut transitions = [NodeId(0); 6];
            for input in ComboInput::ALL {
                let target = row
                    .iter()
                    .rev()
                    .find(|(i, _)| *i == input)
                    .map(|(_, to)| *to)
                    .ok_or_else(|| GameError::IncompleteComboTable {
                        node: descriptor.name.to_string(),
                        input: input.to_string(),
                    })?;
                transitions[input.index()] = resolve(descriptor.name, target)?;
            }
            nodes.push(ComboNode {
                descriptor: *descriptor,
                duration: descriptor.duration,
                transitions,
            });
        }

        let entry = resolve("<entry>", entry)?;
        let idle = resolve("<idle>", idle)?;
        Ok(ComboGraph {
            next: nodes[entry.0].target(ComboInput::TimeUp),
            nodes,
            current: entry,
            idle,
            time: 0,
            finished: false,
        })
    }
}

/// Inputs sampled for one tick. All are edge triggered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ComboSignals {
    pub dodge: bool,
    pub sheathe: bool,
    pub light: bool,
    pub heavy: bool,
    pub special: bool,
}

/// The owner state the graph reads and writes during a tick.
pub struct ComboActor<'a> {
    pub health: i32,
    pub stamina: &'a mut Stamina,
    /// A stabbed enemy is on the blade.
    pub holding_victim: bool,
}

/// Side effects a tick asks the owner to carry out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComboEffect {
    Sound(SoundCue),
    SetSolid(bool),
    /// Launch a dodge along the held direction.
    DodgeLaunch,
    Shake { duration: u32, intensity: i32 },
}

/// Result of one tick.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ComboTick {
    pub can_move: bool,
    pub effects: Vec<ComboEffect>,
}

/// The running state machine.
#[derive(Debug, Clone)]
pub struct ComboGraph {
    nodes: Vec<ComboNode>,
    current: NodeId,
    idle: NodeId,
    time: u32,
    finished: bool,
    next: NodeId,
}

impl ComboGraph {
    pub fn current(&self) -> &ComboNode {
        &self.nodes[self.current.0]
    }

    pub fn current_id(&self) -> NodeId {
        self.current
    }

    pub fn node(&self, id: NodeId) -> &ComboNode {
        &self.nodes[id.0]
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.name() == name).map(NodeId)
    }

    /// The node that will be entered when the current one finishes.
    pub fn pending(&self) -> &ComboNode {
        &self.nodes[self.next.0]
    }

    /// Ticks spent in the current node.
    pub fn time(&self) -> u32 {
        self.time
    }

    pub fn attack_nodes(&self) -> impl Iterator<Item = &ComboNode> {
        self.nodes.iter().filter(|n| n.attack().is_some())
    }

    /// Rescale every attack node's duration for a new attack speed.
    pub fn rescale(&mut self, attack_speed: f32) {
        for node in self.nodes.iter_mut().filter(|n| n.attack().is_some()) {
            node.duration = (node.descriptor.duration as f32 / attack_speed) as u32 + 5;
        }
    }

    /// Reset to the idle node.
    pub fn set_idle(&mut self) {
        self.enter(self.idle);
    }

    fn enter(&mut self, id: NodeId) {
        self.current = id;
        self.time = 0;
        self.finished = false;
        self.next = self.nodes[id.0].target(ComboInput::TimeUp);
    }

    /// Run one tick.
    pub fn update(&mut self, signals: ComboSignals, actor: ComboActor<'_>) -> ComboTick {
        if actor.health < 0 {
            self.current = self.idle;
            return ComboTick {
                can_move: self.current().descriptor.can_move,
                effects: Vec::new(),
            };
        }

        let tick = self.step_node(signals, actor.holding_victim);

        if self.finished {
            let next = self.next;
            let cost = self.nodes[next.0].cost();
            if actor.stamina.can_afford(cost) {
                actor.stamina.spend(cost);
                self.enter(next);
            } else {
                self.enter(self.idle);
            }
        }

        tick
    }

    fn step_node(&mut self, signals: ComboSignals, holding_victim: bool) -> ComboTick {
        let node = self.nodes[self.current.0].clone();
        let d = &node.descriptor;
        let mut tick = ComboTick {
            can_move: d.can_move,
            effects: Vec::new(),
        };

        if self.time == 0 {
            self.on_start(&node, &mut tick.effects);
        }

        let window_start = node.duration.saturating_sub(d.window);
        if self.time >= window_start {
            if d.can_dodge && signals.dodge {
                self.next = node.target(ComboInput::Dodge);
            }
            let heavy = if holding_victim { ComboInput::Light } else { ComboInput::Heavy };
            let special = if holding_victim { ComboInput::Light } else { ComboInput::Special };
            if signals.sheathe {
                self.next = node.target(ComboInput::DrawSheath);
            } else if signals.light {
                self.next = node.target(ComboInput::Light);
            } else if signals.heavy {
                self.next = node.target(heavy);
            } else if signals.special {
                self.next = node.target(special);
            }
        }

        if self.time == window_start {
            if let Some(cue) = d.finish_cue {
                tick.effects.push(ComboEffect::Sound(cue));
            }
            if let NodeKind::Attack(AttackProfile {
                shake: Some((duration, intensity)),
                ..
            }) = d.kind
            {
                tick.effects.push(ComboEffect::Shake {
                    duration,
                    intensity,
                });
            }
        }

        self.time += 1;
        if self.time >= node.duration {
            self.finished = true;
        }
        tick
    }

    fn on_start(&mut self, node: &ComboNode, effects: &mut Vec<ComboEffect>) {
        let d = &node.descriptor;
        if !matches!(d.kind, NodeKind::Attack(_)) {
            self.next = node.target(ComboInput::TimeUp);
        }
        if let Some(cue) = d.start_cue {
            effects.push(ComboEffect::Sound(cue));
        }
        match d.kind {
            NodeKind::Idle | NodeKind::Attack(_) => effects.push(ComboEffect::SetSolid(true)),
            NodeKind::Dodge => {
                effects.push(ComboEffect::SetSolid(false));
                effects.push(ComboEffect::DodgeLaunch);
            }
        }
    }
}

// Sword node table.

const fn idle_node(
    name: &'static str,
    weapon_animation: WeaponAnimation,
    can_dodge: bool,
    offset: IVec2,
    duration: u32,
    window: u32,
    start_cue: Option<SoundCue>,
) -> NodeDescriptor {
    NodeDescriptor {
        name,
        kind: NodeKind::Idle,
        weapon_animation,
        player_animation: PlayerAnimation::IdleFront,
        can_dodge,
        can_move: true,
        can_throw: false,
        offset,
        duration,
        window,
        cost: 0,
        start_cue,
        finish_cue: None,
    }
}

#[allow(clippy::too_many_arguments)]
const fn attack_node(
    name: &'static str,
    weapon_animation: WeaponAnimation,
    player_animation: PlayerAnimation,
    can_move: bool,
    can_throw: bool,
    offset: IVec2,
    damage: i32,
    duration: u32,
    window: u32,
    finish_cue: Option<SoundCue>,
    shake: Option<(u32, i32)>,
    sweep: SweepType,
    cost: i32,
) -> NodeDescriptor {
    NodeDescriptor {
        name,
        kind: NodeKind::Attack(AttackProfile {
            damage,
            sweep,
            shake,
            can_stab: false,
        }),
        weapon_animation,
        player_animation,
        can_dodge: true,
        can_move,
        can_throw,
        offset,
        duration,
        window,
        cost,
        start_cue: Some(SoundCue::SwordSlash),
        finish_cue,
    }
}

const fn stabbing(node: NodeDescriptor) -> NodeDescriptor {
    match node.kind {
        NodeKind::Attack(profile) => NodeDescriptor {
            kind: NodeKind::Attack(AttackProfile {
                can_stab: true,
                ..profile
            }),
            ..node
        },
        _ => node,
    }
}

const HIT: Option<SoundCue> = Some(SoundCue::SwordHit);

/// Every node of the sword graph.
pub const SWORD_NODES: [NodeDescriptor; 12] = [
    idle_node("Sheathed", WeaponAnimation::Sheathed, false, IVec2::new(6, -5), 1, 1, None),
    idle_node(
        "TransitionOpen",
        WeaponAnimation::DrawnFront,
        false,
        IVec2::new(-10, -10),
        10,
        0,
        Some(SoundCue::WeaponDrawn),
    ),
    idle_node(
        "TransitionClosed",
        WeaponAnimation::DrawnFront,
        false,
        IVec2::new(-10, -10),
        10,
        0,
        Some(SoundCue::WeaponDrawn),
    ),
    idle_node("Idle", WeaponAnimation::DrawnFullFront, true, IVec2::new(-10, -10), 1, 1, None),
    NodeDescriptor {
        name: "Dodge",
        kind: NodeKind::Dodge,
        weapon_animation: WeaponAnimation::DrawnFullFront,
        player_animation: PlayerAnimation::DodgeFront,
        can_dodge: true,
        can_move: false,
        can_throw: false,
        offset: IVec2::new(-10, -10),
        duration: 22,
        window: 22,
        cost: 15,
        start_cue: Some(SoundCue::SwordWoosh),
        finish_cue: None,
    },
    attack_node(
        "Light1",
        WeaponAnimation::LightAttack1,
        PlayerAnimation::AttackFront1,
        false,
        true,
        IVec2::new(1, 15),
        30,
        60,
        20,
        HIT,
        Some((10, 1)),
        SweepType::Horizontal,
        15,
    ),
    attack_node(
        "Light2",
        WeaponAnimation::LightAttack2,
        PlayerAnimation::AttackFront2,
        false,
        true,
        IVec2::new(1, 15),
        30,
        60,
        20,
        HIT,
        Some((10, 1)),
        SweepType::Horizontal,
        15,
    ),
    stabbing(NodeDescriptor {
        start_cue: Some(SoundCue::SwordWoosh),
        ..attack_node(
            "Heavy1",
            WeaponAnimation::HeavyAttack1,
            PlayerAnimation::HeavyAttackFront1,
            false,
            false,
            IVec2::new(-8, 8),
            50,
            80,
            25,
            None,
            None,
            SweepType::Vertical,
            25,
        )
    }),
    attack_node(
        "Heavy2",
        WeaponAnimation::HeavyAttack2,
        PlayerAnimation::HeavyAttackFront2,
        false,
        false,
        IVec2::new(1, -7),
        50,
        80,
        25,
        HIT,
        Some((10, 2)),
        SweepType::Vertical,
        25,
    ),
    attack_node(
        "HeavyCombo1",
        WeaponAnimation::HeavyCombo1,
        PlayerAnimation::HeavyComboFront1,
        false,
        true,
        IVec2::new(0, 7),
        50,
        70,
        20,
        HIT,
        Some((10, 2)),
        SweepType::Horizontal,
        30,
    ),
    attack_node(
        "HeavyCombo2",
        WeaponAnimation::HeavyCombo2,
        PlayerAnimation::HeavyComboFront2,
        false,
        false,
        IVec2::new(0, -7),
        50,
        70,
        20,
        HIT,
        Some((10, 2)),
        SweepType::Horizontal,
        30,
    ),
    attack_node(
        "Whirl",
        WeaponAnimation::Whirl,
        PlayerAnimation::WhirlFront,
        true,
        true,
        IVec2::new(1, 15),
        30,
        240,
        20,
        None,
        None,
        SweepType::Horizontal,
        50,
    ),
];

/// Successors per node, in [`ComboInput::ALL`] order:
/// Light, Heavy, Special, TimeUp, DrawSheath, Dodge.
pub const SWORD_TRANSITIONS: [(&str, [&str; 6]); 12] = [
    ("Sheathed", ["TransitionOpen", "TransitionOpen", "TransitionOpen", "Sheathed", "TransitionOpen", "Dodge"]),
    ("TransitionOpen", ["Idle", "Idle", "Idle", "Idle", "Idle", "Dodge"]),
    ("TransitionClosed", ["Sheathed", "Sheathed", "Sheathed", "Sheathed", "Sheathed", "Sheathed"]),
    ("Idle", ["Light1", "Heavy1", "Idle", "Idle", "TransitionClosed", "Dodge"]),
    ("Light1", ["Light2", "HeavyCombo1", "Idle", "Idle", "Idle", "Dodge"]),
    ("Light2", ["Light1", "HeavyCombo2", "Idle", "Idle", "Idle", "Dodge"]),
    ("Heavy1", ["Light1", "Heavy2", "Idle", "Idle", "Idle", "Dodge"]),
    ("Heavy2", ["Light1", "HeavyCombo1", "Idle", "Idle", "Idle", "Dodge"]),
    ("HeavyCombo1", ["Light1", "Whirl", "Idle", "Idle", "Idle", "Dodge"]),
    ("HeavyCombo2", ["Light1", "Whirl", "Idle", "Idle", "Idle", "Dodge"]),
    ("Whirl", ["HeavyCombo1", "Heavy1", "Idle", "Idle", "Idle", "Dodge"]),
    ("Dodge", ["Light1", "Heavy1", "Idle", "Idle", "Idle", "Dodge"]),
];

/// The sword graph, entered sheathed.
pub fn sword_graph() -> Result<ComboGraph, GameError> {
    let builder = SWORD_NODES
        .iter()
        .fold(ComboGraphBuilder::default(), |b, node| b.node(*node));
    SWORD_TRANSITIONS
        .iter()
        .fold(builder, |b, (from, targets)| b.transitions(*from, *targets))
        .build("Sheathed", "Idle")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(stamina: &mut Stamina) -> ComboActor<'_> {
        ComboActor {
            health: 100,
            stamina,
            holding_victim: false,
        }
    }

    fn run(graph: &mut ComboGraph, stamina: &mut Stamina, signals: ComboSignals, ticks: u32) {
        for _ in 0..ticks {
            graph.update(signals, actor(stamina));
        }
    }

    fn drawn(graph: &mut ComboGraph, stamina: &mut Stamina) {
        run(graph, stamina, ComboSignals { sheathe: true, ..default() }, 1);
        assert_eq!(graph.current().name(), "TransitionOpen");
        run(graph, stamina, ComboSignals::default(), 10);
        assert_eq!(graph.current().name(), "Idle");
    }

    #[test]
    fn sword_table_is_complete() {
        let graph = sword_graph().unwrap();
        assert_eq!(graph.current().name(), "Sheathed");
        assert_eq!(graph.attack_nodes().count(), 7);
    }

    #[test]
    fn missing_transition_is_a_construction_error() {
        let result = ComboGraphBuilder::default()
            .node(SWORD_NODES[3])
            .transition("Idle", ComboInput::Light, "Idle")
            .build("Idle", "Idle");
        assert_eq!(
            result.unwrap_err(),
            GameError::IncompleteComboTable {
                node: "Idle".into(),
                input: "Heavy".into()
            }
        );
    }

    #[test]
    fn dangling_target_is_rejected() {
        let result = ComboGraphBuilder::default()
            .node(SWORD_NODES[3])
            .transitions("Idle", ["Idle", "Idle", "Idle", "Idle", "Idle", "Nowhere"])
            .build("Idle", "Idle");
        assert!(matches!(result, Err(GameError::UnknownComboNode { .. })));
    }

    #[test]
    fn drawing_without_further_input_settles_in_idle() {
        let mut graph = sword_graph().unwrap();
        let mut stamina = Stamina::new(100, 3);
        drawn(&mut graph, &mut stamina);
        for _ in 0..200 {
            graph.update(ComboSignals::default(), actor(&mut stamina));
            assert!(graph.current().attack().is_none());
        }
        assert_eq!(graph.current().name(), "Idle");
    }

    #[test]
    fn light_input_in_window_chains_attacks() {
        let mut graph = sword_graph().unwrap();
        let mut stamina = Stamina::new(100, 3);
        drawn(&mut graph, &mut stamina);

        run(&mut graph, &mut stamina, ComboSignals { light: true, ..default() }, 1);
        assert_eq!(graph.current().name(), "Light1");
        assert_eq!(stamina.current(), 85);

        // Outside the window a click is ignored.
        run(&mut graph, &mut stamina, ComboSignals { light: true, ..default() }, 1);
        assert_eq!(graph.pending().name(), "Idle");

        // Light1 lasts 60 ticks with a 20 tick window.
        run(&mut graph, &mut stamina, ComboSignals::default(), 40);
        run(&mut graph, &mut stamina, ComboSignals { light: true, ..default() }, 1);
        assert_eq!(graph.pending().name(), "Light2");
        run(&mut graph, &mut stamina, ComboSignals::default(), 18);
        assert_eq!(graph.current().name(), "Light2");
        assert_eq!(graph.time(), 0);
    }

    #[test]
    fn last_sampled_input_wins() {
        let mut graph = sword_graph().unwrap();
        let mut stamina = Stamina::new(100, 3);
        drawn(&mut graph, &mut stamina);
        run(
            &mut graph,
            &mut stamina,
            ComboSignals {
                dodge: true,
                light: true,
                ..default()
            },
            1,
        );
        assert_eq!(graph.current().name(), "Light1");
    }

    #[test]
    fn held_victim_turns_heavy_into_light() {
        let mut graph = sword_graph().unwrap();
        let mut stamina = Stamina::new(100, 3);
        drawn(&mut graph, &mut stamina);
        graph.update(
            ComboSignals { heavy: true, ..default() },
            ComboActor {
                health: 100,
                stamina: &mut stamina,
                holding_victim: true,
            },
        );
        assert_eq!(graph.current().name(), "Light1");
    }

    #[test]
    fn exhausted_actor_falls_back_to_idle() {
        let mut graph = sword_graph().unwrap();
        let mut stamina = Stamina::new(10, 3);
        drawn(&mut graph, &mut stamina);
        run(&mut graph, &mut stamina, ComboSignals { light: true, ..default() }, 1);
        assert_eq!(graph.current().name(), "Light1");
        assert_eq!(stamina.current(), 0);
        assert!(stamina.debt() > 0);

        run(&mut graph, &mut stamina, ComboSignals::default(), 40);
        run(&mut graph, &mut stamina, ComboSignals { light: true, ..default() }, 1);
        run(&mut graph, &mut stamina, ComboSignals::default(), 19);
        assert_eq!(graph.current().name(), "Idle");
    }

    #[test]
    fn committed_transitions_keep_stamina_non_negative() {
        let mut graph = sword_graph().unwrap();
        let mut stamina = Stamina::new(40, 3);
        drawn(&mut graph, &mut stamina);
        for tick in 0..600 {
            let signals = ComboSignals {
                light: tick % 3 == 0,
                heavy: tick % 7 == 0,
                dodge: tick % 11 == 0,
                ..default()
            };
            graph.update(signals, actor(&mut stamina));
            assert!(stamina.current() >= 0);
        }
    }

    #[test]
    fn dead_actor_is_held_in_idle() {
        let mut graph = sword_graph().unwrap();
        let mut stamina = Stamina::new(100, 3);
        graph.update(
            ComboSignals { sheathe: true, ..default() },
            ComboActor {
                health: -1,
                stamina: &mut stamina,
                holding_victim: false,
            },
        );
        assert_eq!(graph.current().name(), "Idle");
    }

    #[test]
    fn dying_mid_swing_keeps_the_node_clock() {
        let mut graph = sword_graph().unwrap();
        let mut stamina = Stamina::new(100, 3);
        drawn(&mut graph, &mut stamina);
        run(&mut graph, &mut stamina, ComboSignals { light: true, ..default() }, 1);
        run(&mut graph, &mut stamina, ComboSignals::default(), 12);
        assert_eq!(graph.current().name(), "Light1");
        assert_eq!(graph.time(), 12);

        let tick = graph.update(
            ComboSignals { light: true, ..default() },
            ComboActor {
                health: -1,
                stamina: &mut stamina,
                holding_victim: false,
            },
        );
        assert_eq!(graph.current().name(), "Idle");
        assert_eq!(graph.time(), 12);
        assert!(tick.effects.is_empty());
    }

    #[test]
    fn window_entry_triggers_shake_once() {
        let mut graph = sword_graph().unwrap();
        let mut stamina = Stamina::new(100, 3);
        drawn(&mut graph, &mut stamina);
        run(&mut graph, &mut stamina, ComboSignals { light: true, ..default() }, 1);

        let mut shakes = 0;
        for _ in 0..59 {
            let tick = graph.update(ComboSignals::default(), actor(&mut stamina));
            shakes += tick
                .effects
                .iter()
                .filter(|e| matches!(e, ComboEffect::Shake { .. }))
                .count();
        }
        assert_eq!(shakes, 1);
    }

    #[test]
    fn attack_speed_rescales_durations() {
        let mut graph = sword_graph().unwrap();
        graph.rescale(1.5);
        let light = graph.find("Light1").unwrap();
        assert_eq!(graph.node(light).duration, 45);
        let idle = graph.find("Idle").unwrap();
        assert_eq!(graph.node(idle).duration, 1);
    }
}
