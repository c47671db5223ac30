//! Title, options and credits screens.

use crate::config::{GameConfig, KeyBindings};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;

pub const CREDITS: [&str; 4] = [
    "A terminal snake with walls, wrapping borders and super food",
    "Built with ratatui and crossterm",
    "Run with --help for all options",
    "Press any key!",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TitleEntry {
    Play,
    Options,
    Credits,
    Quit,
}

impl TitleEntry {
    pub const ALL: [TitleEntry; 4] = [
        TitleEntry::Play,
        TitleEntry::Options,
        TitleEntry::Credits,
        TitleEntry::Quit,
    ];

    fn label(&self) -> &'static str {
        match self {
            TitleEntry::Play => "Play Game",
            TitleEntry::Options => "Options",
            TitleEntry::Credits => "Credits",
            TitleEntry::Quit => "Quit",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionEntry {
    Borders,
    Walls,
    WallPattern,
    Back,
}

impl OptionEntry {
    pub const ALL: [OptionEntry; 4] = [
        OptionEntry::Borders,
        OptionEntry::Walls,
        OptionEntry::WallPattern,
        OptionEntry::Back,
    ];

    fn describe(&self, config: &GameConfig) -> String {
        match self {
            OptionEntry::Borders => format!("     Borders: {:<8}", config.bounds.label()),
            OptionEntry::Walls => format!(
                "       Walls: {:<8}",
                if config.walls_enabled {
                    "Enabled"
                } else {
                    "Disabled"
                }
            ),
            OptionEntry::WallPattern => format!("Wall-pattern: {:<8}", config.wall_pattern),
            OptionEntry::Back => format!("     {:<17}", "Back"),
        }
    }

    /// Changes the setting; returns true for Back.
    pub fn apply(&self, config: &mut GameConfig) -> bool {
        match self {
            OptionEntry::Borders => config.bounds = config.bounds.toggled(),
            OptionEntry::Walls => config.walls_enabled = !config.walls_enabled,
            OptionEntry::WallPattern => config.wall_pattern = config.wall_pattern.next(),
            OptionEntry::Back => return true,
        }
        false
    }
}

fn option_lines(config: &GameConfig) -> Vec<String> {
    OptionEntry::ALL.iter().map(|e| e.describe(config)).collect()
}

/// A vertical list with one highlighted entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Menu {
    entries: Vec<String>,
    selected: usize,
}

impl Menu {
    pub fn title() -> Self {
        Menu::new(
            TitleEntry::ALL
                .iter()
                .map(|e| e.label().to_string())
                .collect(),
        )
    }

    pub fn options(config: &GameConfig) -> Self {
        Menu::new(option_lines(config))
    }

    fn new(entries: Vec<String>) -> Self {
        Menu {
            entries,
            selected: 0,
        }
    }

    /// Re-reads the option values, keeping the highlight where it was.
    pub fn refresh_options(&mut self, config: &GameConfig) {
        self.entries = option_lines(config);
    }

    #[cfg(test)]
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Moves the highlight with the up/down bindings; Enter picks the entry.
    pub fn handle_key(&mut self, key: KeyEvent, keys: &KeyBindings) -> Option<usize> {
        let count = self.entries.len();
        if count == 0 {
            return None;
        }
        match key.code {
            code if code == keys.up => {
                self.selected = (self.selected + count - 1) % count;
                None
            }
            code if code == keys.down => {
                self.selected = (self.selected + 1) % count;
                None
            }
            KeyCode::Enter => Some(self.selected),
            _ => None,
        }
    }
}

impl Widget for &Menu {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines: Vec<Line> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let style = if i == self.selected {
                    Style::new().fg(Color::Black).bg(Color::Red)
                } else {
                    Style::new()
                };
                Line::styled(entry.as_str(), style).centered()
            })
            .collect();
        Text::from(lines).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Bounds;
    use crate::walls::WallPattern;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_navigation_wraps() {
        let keys = KeyBindings::arrows();
        let mut menu = Menu::title();

        assert_eq!(menu.handle_key(key(KeyCode::Up), &keys), None);
        assert_eq!(menu.selected(), 3);
        assert_eq!(menu.handle_key(key(KeyCode::Down), &keys), None);
        assert_eq!(menu.selected(), 0);
        menu.handle_key(key(KeyCode::Down), &keys);
        assert_eq!(menu.handle_key(key(KeyCode::Enter), &keys), Some(1));
        assert_eq!(TitleEntry::ALL[1], TitleEntry::Options);
    }

    #[test]
    fn test_navigation_uses_bindings() {
        let keys = KeyBindings::vim();
        let mut menu = Menu::title();

        menu.handle_key(key(KeyCode::Down), &keys);
        assert_eq!(menu.selected(), 0);
        menu.handle_key(key(KeyCode::Char('j')), &keys);
        assert_eq!(menu.selected(), 1);
    }

    #[test]
    fn test_options_change_config() {
        let mut config = GameConfig::default();

        assert!(!OptionEntry::Borders.apply(&mut config));
        assert_eq!(config.bounds, Bounds::Wrapping);
        assert!(!OptionEntry::Walls.apply(&mut config));
        assert!(config.walls_enabled);
        assert!(!OptionEntry::WallPattern.apply(&mut config));
        assert_eq!(config.wall_pattern, WallPattern::Columns);
        assert!(OptionEntry::Back.apply(&mut config));

        let menu = Menu::options(&config);
        assert!(menu.entries[0].contains("Open"));
        assert!(menu.entries[1].contains("Enabled"));
        assert!(menu.entries[2].contains('2'));
    }

    #[test]
    fn test_refresh_keeps_selection() {
        let keys = KeyBindings::arrows();
        let mut config = GameConfig::default();
        let mut menu = Menu::options(&config);

        menu.handle_key(key(KeyCode::Down), &keys);
        OptionEntry::Walls.apply(&mut config);
        menu.refresh_options(&config);
        assert_eq!(menu.selected(), 1);
        assert!(menu.entries[1].contains("Enabled"));
    }
}
