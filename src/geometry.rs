#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    pub fn new(width: u16, height: u16) -> Self {
        Size { width, height }
    }

    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn center(&self) -> Pos {
        Pos {
            x: self.width / 2,
            y: self.height / 2,
        }
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.x < self.width && pos.y < self.height
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: u16,
    pub y: u16,
}

impl Pos {
    pub fn new(x: u16, y: u16) -> Self {
        Pos { x, y }
    }

    /// Steps by `delta`, re-entering at the opposite edge when it leaves the arena.
    pub fn wrapped_add(&self, delta: PosDelta, size: Size) -> Pos {
        let new_x = (self.x as i32 + delta.x).rem_euclid(size.width as i32) as u16;
        let new_y = (self.y as i32 + delta.y).rem_euclid(size.height as i32) as u16;
        Pos { x: new_x, y: new_y }
    }

    /// Steps by `delta`, or `None` when the result lies outside the arena.
    pub fn checked_add(&self, delta: PosDelta, size: Size) -> Option<Pos> {
        let new_x = self.x as i32 + delta.x;
        let new_y = self.y as i32 + delta.y;
        if new_x < 0 || new_y < 0 || new_x >= size.width as i32 || new_y >= size.height as i32 {
            return None;
        }
        Some(Pos {
            x: new_x as u16,
            y: new_y as u16,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PosDelta {
    pub x: i32,
    pub y: i32,
}

impl From<Direction> for PosDelta {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::Up => PosDelta { x: 0, y: -1 },
            Direction::Down => PosDelta { x: 0, y: 1 },
            Direction::Right => PosDelta { x: 1, y: 0 },
            Direction::Left => PosDelta { x: -1, y: 0 },
        }
    }
}

/// Anything that fills grid cells the snake must not enter.
pub trait Obstacle {
    fn occupies(&self, pos: Pos) -> bool;
}

impl<T: Obstacle> Obstacle for Option<T> {
    fn occupies(&self, pos: Pos) -> bool {
        self.as_ref().is_some_and(|inner| inner.occupies(pos))
    }
}

impl<T: Obstacle + ?Sized> Obstacle for &T {
    fn occupies(&self, pos: Pos) -> bool {
        (**self).occupies(pos)
    }
}
