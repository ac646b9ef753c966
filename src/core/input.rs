//! Per-tick input latching and persisted key bindings.
//!
//! Raw device state is written into an [`InputLatch`] by the player plugin
//! every frame. The simulation samples it once per tick through an
//! [`InputSource`], keeping the previous snapshot so "down" (edge) and
//! "held" (level) queries can be answered without touching Bevy.

use bevy::prelude::*;
use std::fs;
use std::path::Path;

use super::error::GameError;

/// Location of the control bindings file.
pub const BINDINGS_PATH: &str = "preferences.txt";

const BINDINGS_HEADER: &str = "======[CONTROLS]=====";
const BINDINGS_FOOTER: &str = "=====================";

/// Logical keyboard actions the simulation reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    JumpDodge,
    Sheathe,
    Pause,
    Confirm,
}

impl Action {
    fn bit(self) -> u16 {
        1 << self as u16
    }
}

/// Mouse buttons the combo graph listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

impl PointerButton {
    fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Raw device state at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    pub(crate) actions: u16,
    pub(crate) buttons: u8,
    /// Pointer position in world space (y grows downwards).
    pub pointer: Vec2,
}

impl InputSnapshot {
    pub fn set(&mut self, action: Action, pressed: bool) {
        if pressed {
            self.actions |= action.bit();
        } else {
            self.actions &= !action.bit();
        }
    }

    pub fn set_button(&mut self, button: PointerButton, pressed: bool) {
        if pressed {
            self.buttons |= button.bit();
        } else {
            self.buttons &= !button.bit();
        }
    }

    pub fn with(mut self, action: Action) -> Self {
        self.set(action, true);
        self
    }

    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.set_button(button, true);
        self
    }

    pub fn with_pointer(mut self, pointer: Vec2) -> Self {
        self.pointer = pointer;
        self
    }

    pub fn is_pressed(&self, action: Action) -> bool {
        self.actions & action.bit() != 0
    }

    pub fn is_button_pressed(&self, button: PointerButton) -> bool {
        self.buttons & button.bit() != 0
    }
}

/// The snapshot pair the simulation reads during one tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    previous: InputSnapshot,
    current: InputSnapshot,
}

impl InputState {
    /// Advance to a new snapshot. Called exactly once per tick.
    pub fn latch(&mut self, next: InputSnapshot) {
        self.previous = self.current;
        self.current = next;
    }

    /// Pressed this tick but not the previous one.
    pub fn key_down(&self, action: Action) -> bool {
        !self.previous.is_pressed(action) && self.current.is_pressed(action)
    }

    /// Pressed for at least two consecutive ticks.
    pub fn key_held(&self, action: Action) -> bool {
        self.previous.is_pressed(action) && self.current.is_pressed(action)
    }

    /// Either down or held.
    pub fn key_active(&self, action: Action) -> bool {
        self.current.is_pressed(action)
    }

    /// Single click, edge triggered.
    pub fn mouse_pressed(&self, button: PointerButton) -> bool {
        !self.previous.is_button_pressed(button) && self.current.is_button_pressed(button)
    }

    pub fn mouse_held(&self, button: PointerButton) -> bool {
        self.previous.is_button_pressed(button) && self.current.is_button_pressed(button)
    }

    pub fn pointer(&self) -> Vec2 {
        self.current.pointer
    }
}

/// Anything that can produce a device snapshot once per tick.
pub trait InputSource {
    fn snapshot(&mut self) -> InputSnapshot;
}

/// Device state written by Bevy input systems, read by the scheduler.
#[derive(Resource, Debug, Default)]
pub struct InputLatch {
    pub raw: InputSnapshot,
}

impl InputSource for InputLatch {
    fn snapshot(&mut self) -> InputSnapshot {
        self.raw
    }
}

/// Replays a fixed list of snapshots, then reports an idle device.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    frames: std::collections::VecDeque<InputSnapshot>,
}

impl ScriptedInput {
    pub fn new(frames: impl IntoIterator<Item = InputSnapshot>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    pub fn push(&mut self, frame: InputSnapshot) {
        self.frames.push_back(frame);
    }

    /// Queue `count` copies of the same snapshot.
    pub fn repeat(&mut self, frame: InputSnapshot, count: usize) {
        self.frames.extend(std::iter::repeat(frame).take(count));
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl InputSource for ScriptedInput {
    fn snapshot(&mut self) -> InputSnapshot {
        self.frames.pop_front().unwrap_or_default()
    }
}

/// Numeric key codes for the rebindable actions.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBindings {
    pub up: u16,
    pub down: u16,
    pub left: u16,
    pub right: u16,
    pub jump_dodge: u16,
    pub sheathe: u16,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            up: 87,
            down: 83,
            left: 65,
            right: 68,
            jump_dodge: 32,
            sheathe: 88,
        }
    }
}

impl KeyBindings {
    /// Parse the bindings section. Unknown names are ignored and missing
    /// entries keep their default codes.
    pub fn parse(contents: &str) -> Result<Self, GameError> {
        let mut bindings = Self::default();
        let mut inside = false;

        for (index, line) in contents.lines().enumerate() {
            let line = line.trim_end();
            if !inside {
                inside = line == BINDINGS_HEADER;
                continue;
            }
            if line == BINDINGS_FOOTER {
                break;
            }

            let invalid = || GameError::InvalidBinding {
                line: index + 1,
                text: line.to_string(),
            };
            let (name, code) = line.split_once('=').ok_or_else(invalid)?;
            let code: u16 = code.trim().parse().map_err(|_| invalid())?;

            match name.trim() {
                "UP" => bindings.up = code,
                "DOWN" => bindings.down = code,
                "LEFT" => bindings.left = code,
                "RIGHT" => bindings.right = code,
                "JUMP_DODGE" => bindings.jump_dodge = code,
                "SHEATHE" => bindings.sheathe = code,
                _ => {}
            }
        }

        Ok(bindings)
    }

    /// Render the bindings in the persisted file format.
    pub fn to_file_string(&self) -> String {
        format!(
            "{BINDINGS_HEADER}\nUP={}\nDOWN={}\nLEFT={}\nRIGHT={}\nJUMP_DODGE={}\nSHEATHE={}\n{BINDINGS_FOOTER}\n",
            self.up, self.down, self.left, self.right, self.jump_dodge, self.sheathe
        )
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), GameError> {
        let path = path.as_ref();
        fs::write(path, self.to_file_string()).map_err(|e| GameError::Io {
            path: path.display().to_string(),
            details: e.to_string(),
        })
    }

    /// Read the bindings file, creating it with defaults if it is missing.
    pub fn load_or_create(path: impl AsRef<Path>) -> Result<Self, GameError> {
        let path = path.as_ref();
        if !path.exists() {
            let defaults = Self::default();
            defaults.save(path)?;
            info!("Created key binding file {}", path.display());
            return Ok(defaults);
        }

        let contents = fs::read_to_string(path).map_err(|e| GameError::Io {
            path: path.display().to_string(),
            details: e.to_string(),
        })?;
        let bindings = Self::parse(&contents)?;
        info!("Loaded key bindings from {}", path.display());
        Ok(bindings)
    }

    /// Load bindings, falling back to defaults on any error.
    pub fn load() -> Self {
        Self::load_or_create(BINDINGS_PATH).unwrap_or_else(|e| {
            error!("{}. Using default key bindings.", e);
            Self::default()
        })
    }

    /// Bevy key codes for each bound action, skipping codes with no mapping.
    pub fn key_codes(&self) -> Vec<(Action, KeyCode)> {
        [
            (Action::Up, self.up),
            (Action::Down, self.down),
            (Action::Left, self.left),
            (Action::Right, self.right),
            (Action::JumpDodge, self.jump_dodge),
            (Action::Sheathe, self.sheathe),
        ]
        .into_iter()
        .filter_map(|(action, code)| vk_to_key_code(code).map(|key| (action, key)))
        .collect()
    }
}

/// Translate a numeric virtual key code into a Bevy key code.
pub fn vk_to_key_code(code: u16) -> Option<KeyCode> {
    const LETTERS: [KeyCode; 26] = [
        KeyCode::KeyA,
        KeyCode::KeyB,
        KeyCode::KeyC,
        KeyCode::KeyD,
        KeyCode::KeyE,
        KeyCode::KeyF,
        KeyCode::KeyG,
        KeyCode::KeyH,
        KeyCode::KeyI,
        KeyCode::KeyJ,
        KeyCode::KeyK,
        KeyCode::KeyL,
        KeyCode::KeyM,
        KeyCode::KeyN,
        KeyCode::KeyO,
        KeyCode::KeyP,
        KeyCode::KeyQ,
        KeyCode::KeyR,
        KeyCode::KeyS,
        KeyCode::KeyT,
        KeyCode::KeyU,
        KeyCode::KeyV,
        KeyCode::KeyW,
        KeyCode::KeyX,
        KeyCode::KeyY,
        KeyCode::KeyZ,
    ];
    const DIGITS: [KeyCode; 10] = [
        KeyCode::Digit0,
        KeyCode::Digit1,
        KeyCode::Digit2,
        KeyCode::Digit3,
        KeyCode::Digit4,
        KeyCode::Digit5,
        KeyCode::Digit6,
        KeyCode::Digit7,
        KeyCode::Digit8,
        KeyCode::Digit9,
    ];

    match code {
        65..=90 => Some(LETTERS[(code - 65) as usize]),
        48..=57 => Some(DIGITS[(code - 48) as usize]),
        8 => Some(KeyCode::Backspace),
        9 => Some(KeyCode::Tab),
        13 => Some(KeyCode::Enter),
        16 => Some(KeyCode::ShiftLeft),
        17 => Some(KeyCode::ControlLeft),
        18 => Some(KeyCode::AltLeft),
        27 => Some(KeyCode::Escape),
        32 => Some(KeyCode::Space),
        37 => Some(KeyCode::ArrowLeft),
        38 => Some(KeyCode::ArrowUp),
        39 => Some(KeyCode::ArrowRight),
        40 => Some(KeyCode::ArrowDown),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn down_is_edge_triggered_and_held_is_level() {
        let mut input = InputState::default();
        let pressed = InputSnapshot::default().with(Action::Up);

        input.latch(pressed);
        assert!(input.key_down(Action::Up));
        assert!(!input.key_held(Action::Up));

        input.latch(pressed);
        assert!(!input.key_down(Action::Up));
        assert!(input.key_held(Action::Up));

        input.latch(InputSnapshot::default());
        assert!(!input.key_active(Action::Up));
    }

    #[test]
    fn mouse_click_fires_once() {
        let mut input = InputState::default();
        let click = InputSnapshot::default().with_button(PointerButton::Primary);
        input.latch(click);
        assert!(input.mouse_pressed(PointerButton::Primary));
        input.latch(click);
        assert!(!input.mouse_pressed(PointerButton::Primary));
        assert!(input.mouse_held(PointerButton::Primary));
    }

    #[test]
    fn default_bindings_survive_the_file_format() {
        let text = KeyBindings::default().to_file_string();
        assert!(text.starts_with("======[CONTROLS]=====\nUP=87\n"));
        assert_eq!(KeyBindings::parse(&text), Ok(KeyBindings::default()));
    }

    #[test]
    fn rebinding_only_changes_named_keys() {
        let text = "======[CONTROLS]=====\nUP=38\nFLY=1\n=====================\nDOWN=1\n";
        let bindings = KeyBindings::parse(text).unwrap();
        assert_eq!(bindings.up, 38);
        assert_eq!(bindings.down, 83);
    }

    #[test]
    fn malformed_binding_reports_line() {
        let text = "======[CONTROLS]=====\nUP=87\nDOWN\n=====================\n";
        assert_eq!(
            KeyBindings::parse(text),
            Err(GameError::InvalidBinding {
                line: 3,
                text: "DOWN".to_string()
            })
        );
    }

    #[test]
    fn virtual_codes_map_to_bevy_keys() {
        assert_eq!(vk_to_key_code(87), Some(KeyCode::KeyW));
        assert_eq!(vk_to_key_code(32), Some(KeyCode::Space));
        assert_eq!(vk_to_key_code(300), None);
        assert_eq!(KeyBindings::default().key_codes().len(), 6);
    }

    #[test]
    fn scripted_input_runs_dry_to_idle() {
        let mut source = ScriptedInput::new([InputSnapshot::default().with(Action::Left)]);
        assert!(source.snapshot().is_pressed(Action::Left));
        assert_eq!(source.snapshot(), InputSnapshot::default());
    }
}
