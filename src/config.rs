//! Gameplay constants and the per-session configuration they seed.

use crate::walls::WallPattern;
use crossterm::event::KeyCode;
use ratatui::style::Color;

/// Tick interval a round starts at, in milliseconds.
pub const STARTING_SPEED: u64 = 150;
/// Default floor for the tick interval, in milliseconds.
pub const STD_MIN_SPEED: u64 = 50;
/// How much the tick interval shrinks per food eaten.
pub const SPEED_STEP: u64 = 2;
pub const STARTING_LENGTH: u32 = 5;
pub const GROW_FACTOR: u32 = 10;
pub const SUPERFOOD_GROW_FACTOR: u32 = 15;
pub const SUPERFOOD_MULTIPLIER: u64 = 5;
/// Foods eaten between two super foods.
pub const SUPERFOOD_INTERVAL: u32 = 10;
/// Bonus handed out for food reached right after the last one.
pub const BONUS_MAX: u32 = 1000;
/// The bonus never decays below this.
pub const BONUS_FLOOR: u32 = 100;
pub const SPEED_BONUS_FACTOR: u64 = 5;
pub const GRACE_TICKS: u32 = 3;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Bounds {
    #[default]
    Closed,
    Wrapping,
}

impl Bounds {
    pub fn toggled(self) -> Self {
        match self {
            Bounds::Closed => Bounds::Wrapping,
            Bounds::Wrapping => Bounds::Closed,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Bounds::Closed => "Closed",
            Bounds::Wrapping => "Open",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyBindings {
    pub up: KeyCode,
    pub down: KeyCode,
    pub left: KeyCode,
    pub right: KeyCode,
}

impl KeyBindings {
    pub fn arrows() -> Self {
        KeyBindings {
            up: KeyCode::Up,
            down: KeyCode::Down,
            left: KeyCode::Left,
            right: KeyCode::Right,
        }
    }

    pub fn vim() -> Self {
        KeyBindings {
            up: KeyCode::Char('k'),
            down: KeyCode::Char('j'),
            left: KeyCode::Char('h'),
            right: KeyCode::Char('l'),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::arrows()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SnakeColor {
    White,
    #[default]
    Green,
    Red,
    Yellow,
    Blue,
}

impl SnakeColor {
    /// Maps the 1-5 selector used on the command line.
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(SnakeColor::White),
            2 => Some(SnakeColor::Green),
            3 => Some(SnakeColor::Red),
            4 => Some(SnakeColor::Yellow),
            5 => Some(SnakeColor::Blue),
            _ => None,
        }
    }
}

impl From<SnakeColor> for Color {
    fn from(color: SnakeColor) -> Self {
        match color {
            SnakeColor::White => Color::White,
            SnakeColor::Green => Color::Green,
            SnakeColor::Red => Color::Red,
            SnakeColor::Yellow => Color::Yellow,
            SnakeColor::Blue => Color::Blue,
        }
    }
}

/// Everything a round reads but never writes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub bounds: Bounds,
    pub walls_enabled: bool,
    pub wall_pattern: WallPattern,
    pub starting_speed: u64,
    pub min_speed: u64,
    pub speed_step: u64,
    pub starting_length: u32,
    pub grow_factor: u32,
    pub superfood_grow_factor: u32,
    pub grace_ticks: u32,
    pub snake_color: SnakeColor,
    pub keys: KeyBindings,
    pub skip_title: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            bounds: Bounds::Closed,
            walls_enabled: false,
            wall_pattern: WallPattern::Cross,
            starting_speed: STARTING_SPEED,
            min_speed: STD_MIN_SPEED,
            speed_step: SPEED_STEP,
            starting_length: STARTING_LENGTH,
            grow_factor: GROW_FACTOR,
            superfood_grow_factor: SUPERFOOD_GROW_FACTOR,
            grace_ticks: GRACE_TICKS,
            snake_color: SnakeColor::default(),
            keys: KeyBindings::default(),
            skip_title: false,
        }
    }
}

impl GameConfig {
    /// The wall pattern for the next round, if walls are switched on.
    pub fn active_walls(&self) -> Option<WallPattern> {
        self.walls_enabled.then_some(self.wall_pattern)
    }
}
