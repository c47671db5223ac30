use crate::geometry::{Pos, Size};
use crate::menu::Menu;
use crate::round::Round;
use ratatui::{
    backend::Backend,
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};
use std::io;

const STATUS_HEIGHT: u16 = 4;
const WIDE_STATUS: u16 = 50;
const WALL_SYMBOL: &str = "▒";
const FOOD_SYMBOL: &str = "0";

const LOGO: [&str; 6] = [
    r" _    _       _ _                 _    ",
    r"| |  | |     | | |               | |   ",
    r"| |  | | __ _| | |___ _ __   ___| | __",
    r"| |/\| |/ _` | | / __| '_ \ / _ \ |/ /",
    r"\  /\  / (_| | | \__ \ | | |  __/   < ",
    r" \/  \/ \__,_|_|_|___/_| |_|\___|_|\_\",
];

/// Message shown in place of the status line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Banner {
    Paused,
    GameOver,
    NewHighScore,
}

impl Banner {
    fn text(&self) -> &'static str {
        match self {
            Banner::Paused => "--- PAUSED ---",
            Banner::GameOver => "--- GAME OVER ---",
            Banner::NewHighScore => "--- NEW HIGHSCORE ---",
        }
    }

    fn style(&self) -> Style {
        let color = match self {
            Banner::Paused => Color::Yellow,
            Banner::GameOver => Color::Red,
            Banner::NewHighScore => Color::Green,
        };
        Style::new().fg(color).bold()
    }
}

/// Splits the terminal into the framed arena and the status block below it.
fn layout(area: Rect) -> (Rect, Rect) {
    let [arena, status] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(STATUS_HEIGHT)]).areas(area);
    (arena, status)
}

/// Owns the terminal and draws every screen of the game.
pub struct Screen<B: Backend> {
    terminal: Terminal<B>,
}

impl<B: Backend> Screen<B> {
    pub fn new(terminal: Terminal<B>) -> Self {
        Screen { terminal }
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }

    #[cfg(test)]
    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }

    /// Size of the whole terminal.
    pub fn size(&self) -> io::Result<Size> {
        let size = self.terminal.size()?;
        Ok(Size::new(size.width, size.height))
    }

    /// Playable cells inside the arena frame, queried fresh for every round.
    pub fn arena_size(&self) -> io::Result<Size> {
        let size = self.size()?;
        let (arena, _) = layout(Rect::new(0, 0, size.width, size.height));
        let inner = Block::bordered().inner(arena);
        Ok(Size::new(inner.width, inner.height))
    }

    pub fn draw_round(&mut self, round: &Round, high_score: u64) -> io::Result<()> {
        self.terminal.draw(|frame| {
            let (arena, status) = layout(frame.area());
            render_arena(frame, round, arena);
            frame.render_widget(status_paragraph(round, high_score, status.width), status);
        })?;
        Ok(())
    }

    pub fn draw_banner(&mut self, round: &Round, banner: Banner) -> io::Result<()> {
        self.terminal.draw(|frame| {
            let (arena, status) = layout(frame.area());
            render_arena(frame, round, arena);
            frame.render_widget(
                Paragraph::new(Line::styled(banner.text(), banner.style()))
                    .alignment(Alignment::Center)
                    .block(Block::bordered()),
                status,
            );
        })?;
        Ok(())
    }

    /// Logo, a menu below it and the version line at the bottom.
    pub fn draw_menu(&mut self, menu: &Menu, color: Color) -> io::Result<()> {
        self.terminal.draw(|frame| {
            let body = render_logo(frame, color);
            frame.render_widget(menu, body);
        })?;
        Ok(())
    }

    pub fn draw_message(&mut self, lines: &[&str], color: Color) -> io::Result<()> {
        self.terminal.draw(|frame| {
            let body = render_logo(frame, color);
            let text: Vec<Line> = lines.iter().map(|l| Line::from(*l)).collect();
            frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), body);
        })?;
        Ok(())
    }
}

/// Draws logo and version; returns the area left for the menu.
fn render_logo(frame: &mut Frame, color: Color) -> Rect {
    let area = frame.area();
    let [_, logo, _, body, version] = Layout::vertical([
        Constraint::Length(area.height / 4),
        Constraint::Length(LOGO.len() as u16),
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    let logo_lines: Vec<Line> = LOGO.iter().map(|l| Line::from(*l)).collect();
    frame.render_widget(
        Paragraph::new(logo_lines)
            .style(Style::new().fg(color).bold())
            .alignment(Alignment::Center),
        logo,
    );
    frame.render_widget(
        Paragraph::new(format!("Version: {}", env!("CARGO_PKG_VERSION")))
            .bold()
            .alignment(Alignment::Center),
        version,
    );
    body
}

fn render_arena(frame: &mut Frame, round: &Round, area: Rect) {
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(round, inner);
}

fn status_paragraph(round: &Round, high_score: u64, width: u16) -> Paragraph<'static> {
    let score = format!("Score: {}", round.score());
    let bonus = format!("Bonus: {}", round.bonus());

    let lines = if width > WIDE_STATUS {
        let high = if high_score != 0 {
            format!("Highscore: {high_score}")
        } else {
            "No highscore set".to_string()
        };
        let length = format!("Length: {}", round.length());
        vec![
            two_columns(score, high, width),
            two_columns(bonus, length, width),
        ]
    } else {
        vec![Line::from(score).centered(), Line::from(bonus).centered()]
    };

    Paragraph::new(lines).bold().block(Block::bordered())
}

/// Centres `left` on the first third of the line and `right` on the second.
fn two_columns(left: String, right: String, width: u16) -> Line<'static> {
    let inner = width.saturating_sub(2) as usize;
    let left_at = (inner / 3).saturating_sub(left.chars().count() / 2);
    let right_at = (2 * inner / 3).saturating_sub(right.chars().count() / 2);
    let gap = right_at.saturating_sub(left_at + left.chars().count()).max(1);
    Line::from(format!("{}{left}{}{right}", " ".repeat(left_at), " ".repeat(gap)))
}

fn set_cell(buf: &mut Buffer, area: Rect, pos: Pos, symbol: &str, style: Style) {
    if pos.x >= area.width || pos.y >= area.height {
        return;
    }
    if let Some(cell) = buf.cell_mut((area.x + pos.x, area.y + pos.y)) {
        cell.set_symbol(symbol).set_style(style);
    }
}

impl Widget for &Round<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if let Some(walls) = self.walls() {
            let style = Style::new().fg(Color::Blue).bold();
            for &pos in walls.cells() {
                set_cell(buf, area, pos, WALL_SYMBOL, style);
            }
        }

        let food_color = if self.is_superfood() {
            Color::Yellow
        } else {
            Color::Red
        };
        set_cell(
            buf,
            area,
            self.food(),
            FOOD_SYMBOL,
            Style::new().fg(food_color).bold(),
        );

        let snake_style = Style::new().fg(self.config().snake_color.into()).bold();
        for cell in self.body().cells() {
            set_cell(buf, area, cell.pos, cell.shape.symbol(), snake_style);
        }

        // drawn last so a crash site shows over whatever it hit
        set_cell(buf, area, self.head(), "X", snake_style);
    }
}
