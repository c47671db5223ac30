use crate::geometry::{Direction, Obstacle, Pos};
use std::collections::VecDeque;

/// How a body cell is drawn, fixed when the head moves off it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Head,
    Horizontal,
    Vertical,
    UpperLeft,
    UpperRight,
    LowerLeft,
    LowerRight,
}

impl Shape {
    /// Shape of the cell the head just left, given the heading it left with
    /// and the heading it arrived with.
    pub fn from_turn(direction: Direction, previous: Option<Direction>) -> Shape {
        use Direction::*;

        match (direction, previous) {
            (Up, Some(Left)) => Shape::LowerLeft,
            (Up, Some(Right)) => Shape::LowerRight,
            (Down, Some(Left)) => Shape::UpperLeft,
            (Down, Some(Right)) => Shape::UpperRight,
            (Left, Some(Up)) => Shape::UpperRight,
            (Left, Some(Down)) => Shape::LowerRight,
            (Right, Some(Up)) => Shape::UpperLeft,
            (Right, Some(Down)) => Shape::LowerLeft,
            (Up | Down, _) => Shape::Vertical,
            (Left | Right, _) => Shape::Horizontal,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Shape::Head => "X",
            Shape::Horizontal => "─",
            Shape::Vertical => "│",
            Shape::UpperLeft => "┌",
            Shape::UpperRight => "┐",
            Shape::LowerLeft => "└",
            Shape::LowerRight => "┘",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BodyCell {
    pub pos: Pos,
    pub shape: Shape,
}

/// The cells the snake covers, tail at the front and head at the back.
#[derive(Clone, Debug, Default)]
pub struct Body {
    cells: VecDeque<BodyCell>,
}

impl Body {
    pub fn new(head: Pos) -> Self {
        let mut cells = VecDeque::new();
        cells.push_back(BodyCell {
            pos: head,
            shape: Shape::Head,
        });
        Body { cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> impl Iterator<Item = &BodyCell> {
        self.cells.iter()
    }

    /// Commits a move: the old head takes `departed` as its shape and `pos`
    /// becomes the new head.
    pub fn push_head(&mut self, pos: Pos, departed: Shape) {
        if let Some(old_head) = self.cells.back_mut() {
            old_head.shape = departed;
        }
        self.cells.push_back(BodyCell {
            pos,
            shape: Shape::Head,
        });
    }

    pub fn pop_tail(&mut self) -> Option<Pos> {
        // the head is never trimmed
        if self.len() <= 1 {
            return None;
        }
        self.cells.pop_front().map(|cell| cell.pos)
    }
}

impl Obstacle for Body {
    fn occupies(&self, pos: Pos) -> bool {
        self.cells.iter().any(|cell| cell.pos == pos)
    }
}
