//! UI plugin - title screen pages and HUD wiring.
//!
//! The title screen has three pages: the main list, a read-only view of the
//! current key bindings, and a short help text. Options are picked with
//! W/S or the arrow keys and activated with Space, Enter or a click.

use bevy::prelude::*;

use super::hud;
use crate::core::input::vk_to_key_code;
use crate::core::{GameState, KeyBindings};

const TITLE: &str = "PERIHELION";

const HELP_TEXT: [&str; 4] = [
    "Survive for as long as you can against ever larger waves of enemies.",
    "Move with UP, DOWN, LEFT and RIGHT. JUMP/DODGE leaps while the sword is sheathed and dodges while it is drawn.",
    "Left-click is a light attack, right-click a heavy one.",
    "Chaining them inside an attack's window leads to stronger combos.",
];

const OPTION_IDLE: Color = Color::srgb(0.0, 0.0, 0.0);
const OPTION_SELECTED: Color = Color::srgb(0.25, 0.25, 0.3);
const OPTION_BORDER: Color = Color::WHITE;

/// UI plugin - title screen and HUD.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        hud::setup_hud_systems(app);

        app.init_resource::<TitleMenu>()
            .add_systems(OnEnter(GameState::MainMenu), open_title)
            .add_systems(
                Update,
                (title_keyboard, title_pointer, rebuild_title)
                    .chain()
                    .run_if(in_state(GameState::MainMenu)),
            )
            .add_systems(OnExit(GameState::MainMenu), cleanup_title);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TitlePage {
    #[default]
    Main,
    Controls,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleAction {
    NewGame,
    Open(TitlePage),
    Exit,
}

impl TitlePage {
    fn options(self) -> &'static [(&'static str, TitleAction)] {
        match self {
            TitlePage::Main => &[
                ("New Game", TitleAction::NewGame),
                ("Controls", TitleAction::Open(TitlePage::Controls)),
                ("Help", TitleAction::Open(TitlePage::Help)),
                ("Exit Game", TitleAction::Exit),
            ],
            TitlePage::Controls | TitlePage::Help => &[("BACK", TitleAction::Open(TitlePage::Main))],
        }
    }
}

/// Page and cursor of the title screen.
#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct TitleMenu {
    page: TitlePage,
    selected: usize,
}

impl TitleMenu {
    pub fn page(&self) -> TitlePage {
        self.page
    }

    pub fn selected(&self) -> TitleAction {
        self.page.options()[self.selected].1
    }

    /// Move the cursor, wrapping at both ends.
    pub fn step(&mut self, up: bool, down: bool) {
        let count = self.page.options().len();
        if up {
            self.selected = (self.selected + count - 1) % count;
        }
        if down {
            self.selected = (self.selected + 1) % count;
        }
    }

    /// Run an option. Page changes are handled here, anything else is
    /// returned for the caller.
    pub fn activate(&mut self, index: usize) -> Option<TitleAction> {
        let (_, action) = *self.page.options().get(index)?;
        match action {
            TitleAction::Open(page) => {
                self.page = page;
                self.selected = 0;
                None
            }
            other => Some(other),
        }
    }
}

/// Display name of a numeric key code, e.g. `W` or `Space`.
pub fn key_label(code: u16) -> String {
    let Some(key) = vk_to_key_code(code) else {
        return format!("#{code}");
    };
    let name = format!("{key:?}");
    ["Key", "Digit"]
        .iter()
        .find_map(|prefix| name.strip_prefix(prefix))
        .map_or(name.clone(), str::to_string)
}

fn binding_rows(bindings: &KeyBindings) -> [(&'static str, u16); 6] {
    [
        ("UP:", bindings.up),
        ("DOWN:", bindings.down),
        ("LEFT:", bindings.left),
        ("RIGHT:", bindings.right),
        ("JUMP/DODGE:", bindings.jump_dodge),
        ("DRAW/SHEATHE:", bindings.sheathe),
    ]
}

/// Marker for title screen entities.
#[derive(Component)]
struct TitleUi;

/// Index of a clickable option on the current page.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
struct TitleOption(usize);

fn open_title(mut commands: Commands, mut menu: ResMut<TitleMenu>) {
    *menu = TitleMenu::default();
    commands.insert_resource(TitleDirty);
}

/// Set when the visible page has to be respawned.
#[derive(Resource)]
struct TitleDirty;

fn title_keyboard(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut menu: ResMut<TitleMenu>,
    mut commands: Commands,
    mut next_state: ResMut<NextState<GameState>>,
    mut exit: EventWriter<AppExit>,
) {
    let up = keyboard.any_just_pressed([KeyCode::KeyW, KeyCode::ArrowUp]);
    let down = keyboard.any_just_pressed([KeyCode::KeyS, KeyCode::ArrowDown]);
    if up || down {
        menu.step(up, down);
        commands.insert_resource(TitleDirty);
    }
    if keyboard.any_just_pressed([KeyCode::Space, KeyCode::Enter]) {
        let index = menu.selected;
        run_action(index, &mut menu, &mut commands, &mut next_state, &mut exit);
    }
}

fn title_pointer(
    options: Query<(&Interaction, &TitleOption), Changed<Interaction>>,
    mut menu: ResMut<TitleMenu>,
    mut commands: Commands,
    mut next_state: ResMut<NextState<GameState>>,
    mut exit: EventWriter<AppExit>,
) {
    for (interaction, option) in &options {
        match interaction {
            Interaction::Hovered if menu.selected != option.0 => {
                menu.selected = option.0;
                commands.insert_resource(TitleDirty);
            }
            Interaction::Pressed => {
                run_action(option.0, &mut menu, &mut commands, &mut next_state, &mut exit);
            }
            _ => {}
        }
    }
}

fn run_action(
    index: usize,
    menu: &mut TitleMenu,
    commands: &mut Commands,
    next_state: &mut NextState<GameState>,
    exit: &mut EventWriter<AppExit>,
) {
    match menu.activate(index) {
        Some(TitleAction::NewGame) => next_state.set(GameState::InGame),
        Some(TitleAction::Exit) => {
            info!("Exit chosen from the title screen");
            exit.send(AppExit::Success);
        }
        Some(TitleAction::Open(_)) | None => {}
    }
    commands.insert_resource(TitleDirty);
}

fn rebuild_title(
    mut commands: Commands,
    dirty: Option<Res<TitleDirty>>,
    menu: Res<TitleMenu>,
    bindings: Option<Res<KeyBindings>>,
    existing: Query<Entity, With<TitleUi>>,
) {
    if dirty.is_none() {
        return;
    }
    commands.remove_resource::<TitleDirty>();
    for entity in &existing {
        commands.entity(entity).despawn_recursive();
    }

    let bindings = bindings.map(|b| *b).unwrap_or_default();
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(6.0),
                ..default()
            },
            BackgroundColor(Color::BLACK),
            TitleUi,
        ))
        .with_children(|parent| {
            match menu.page {
                TitlePage::Main => spawn_heading(parent, TITLE),
                TitlePage::Controls => {
                    spawn_heading(parent, "CONTROLS");
                    for (label, code) in binding_rows(&bindings) {
                        spawn_line(parent, &format!("{label} {}", key_label(code)));
                    }
                    spawn_line(parent, "Bindings are read from preferences.txt");
                }
                TitlePage::Help => {
                    spawn_heading(parent, "HELP");
                    for line in HELP_TEXT {
                        spawn_line(parent, line);
                    }
                }
            }

            for (index, (label, _)) in menu.page.options().iter().enumerate() {
                spawn_option(parent, label, index, index == menu.selected);
            }
        });
}

fn spawn_heading(parent: &mut ChildBuilder, text: &str) {
    parent.spawn((
        Text::new(text),
        TextFont {
            font_size: 64.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            margin: UiRect::bottom(Val::Px(40.0)),
            ..default()
        },
    ));
}

fn spawn_line(parent: &mut ChildBuilder, text: &str) {
    parent.spawn((
        Text::new(text),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(Color::WHITE),
    ));
}

/// One option row; the selected one gets a white frame like the pause menu.
fn spawn_option(parent: &mut ChildBuilder, text: &str, index: usize, selected: bool) {
    let (border, background) = if selected {
        (OPTION_BORDER, OPTION_SELECTED)
    } else {
        (Color::NONE, OPTION_IDLE)
    };
    parent
        .spawn((
            Button,
            Node {
                padding: UiRect::axes(Val::Px(8.0), Val::Px(2.0)),
                margin: UiRect::top(Val::Px(4.0)),
                border: UiRect::all(Val::Px(2.0)),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BorderColor(border),
            BackgroundColor(background),
            TitleOption(index),
        ))
        .with_children(|button| {
            button.spawn((
                Text::new(text),
                TextFont {
                    font_size: 24.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });
}

fn cleanup_title(mut commands: Commands, ui_query: Query<Entity, With<TitleUi>>) {
    commands.remove_resource::<TitleDirty>();
    for entity in ui_query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
