use crate::geometry::{Direction, Obstacle, Pos, Size};
use log::{debug, warn};
use rand::Rng;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Random segments must be longer than this or the layout is re-rolled.
pub const MIN_SEGMENT_LEN: i32 = 3;
const RANDOM_ATTEMPTS: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WallPattern {
    Cross,
    Columns,
    Rows,
    Frame,
    Comb,
    Random,
}

impl WallPattern {
    /// The selector shown in menus and accepted on the command line.
    pub fn id(&self) -> Option<u8> {
        match self {
            WallPattern::Cross => Some(1),
            WallPattern::Columns => Some(2),
            WallPattern::Rows => Some(3),
            WallPattern::Frame => Some(4),
            WallPattern::Comb => Some(5),
            WallPattern::Random => None,
        }
    }

    pub fn from_id(id: u8) -> Result<Self, WallPatternError> {
        match id {
            1 => Ok(WallPattern::Cross),
            2 => Ok(WallPattern::Columns),
            3 => Ok(WallPattern::Rows),
            4 => Ok(WallPattern::Frame),
            5 => Ok(WallPattern::Comb),
            _ => Err(WallPatternError(id.to_string())),
        }
    }

    /// Options menu order: 1 through 5, then random, then back to 1.
    pub fn next(&self) -> WallPattern {
        match self {
            WallPattern::Cross => WallPattern::Columns,
            WallPattern::Columns => WallPattern::Rows,
            WallPattern::Rows => WallPattern::Frame,
            WallPattern::Frame => WallPattern::Comb,
            WallPattern::Comb => WallPattern::Random,
            WallPattern::Random => WallPattern::Cross,
        }
    }

    fn segments(&self, size: Size) -> Vec<Segment> {
        use Direction::*;

        let w = size.width as i32;
        let h = size.height as i32;
        match self {
            WallPattern::Cross => vec![
                Segment::new(0, h / 4, w / 2, Down),
                Segment::new(h, 3 * h / 4, w / 2, Up),
                Segment::new(0, w / 4, h / 2, Right),
                Segment::new(w, 3 * w / 4, h / 2, Left),
            ],
            WallPattern::Columns => vec![
                Segment::new(h / 4, 3 * h / 4, w / 4, Down),
                Segment::new(h / 4, 3 * h / 4, 3 * w / 4, Down),
            ],
            WallPattern::Rows => vec![
                Segment::new(w / 4, 3 * w / 4, h / 4, Right),
                Segment::new(w / 4, 3 * w / 4, 3 * h / 4, Right),
            ],
            WallPattern::Frame => vec![
                Segment::new(h / 2 + 2, 3 * h / 4, w / 4, Down),
                Segment::new(h / 4, h / 2 - 1, w / 4, Down),
                Segment::new(h / 2 + 2, 3 * h / 4, 3 * w / 4, Down),
                Segment::new(h / 4, h / 2 - 1, 3 * w / 4, Down),
                Segment::new(w / 4, w / 2 - 1, h / 4, Right),
                Segment::new(w / 4, w / 2 - 1, 3 * h / 4, Right),
                Segment::new(w / 2 + 2, 3 * w / 4, h / 4, Right),
                Segment::new(w / 2 + 2, 3 * w / 4 + 1, 3 * h / 4, Right),
            ],
            WallPattern::Comb => vec![
                Segment::new(0, h / 4, w / 4, Down),
                Segment::new(0, h / 4, 3 * w / 4, Down),
                Segment::new(0, h / 4, w / 2, Down),
                Segment::new(h, 3 * h / 4, w / 4, Up),
                Segment::new(h, 3 * h / 4, 3 * w / 4, Up),
                Segment::new(h, 3 * h / 4, w / 2, Up),
                Segment::new(0, w / 4, h / 2, Right),
                Segment::new(w, 3 * w / 4, h / 2, Left),
            ],
            WallPattern::Random => Vec::new(),
        }
    }
}

impl fmt::Display for WallPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id() {
            Some(id) => f.pad(&id.to_string()),
            None => f.pad("random"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("illegal wall pattern: {0} (expected 1-5 or \"random\")")]
pub struct WallPatternError(String);

impl FromStr for WallPattern {
    type Err = WallPatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("random") {
            return Ok(WallPattern::Random);
        }
        let id: u8 = s.parse().map_err(|_| WallPatternError(s.to_string()))?;
        WallPattern::from_id(id)
    }
}

/// A straight run of wall cells. Covers `start`, then steps toward `end`
/// (exclusive) along the heading's axis with the other axis at `constant`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Segment {
    start: i32,
    end: i32,
    constant: i32,
    heading: Direction,
}

impl Segment {
    fn new(start: i32, end: i32, constant: i32, heading: Direction) -> Self {
        Segment {
            start,
            end,
            constant,
            heading,
        }
    }

    /// Distance from start to end along the heading; negative when reversed.
    fn len(&self) -> i32 {
        match self.heading {
            Direction::Down | Direction::Right => self.end - self.start,
            Direction::Up | Direction::Left => self.start - self.end,
        }
    }

    fn ordinates(&self) -> Vec<i32> {
        let mut out = vec![self.start];
        match self.heading {
            Direction::Down | Direction::Right => out.extend(self.start + 1..self.end),
            Direction::Up | Direction::Left => {
                out.extend((self.end + 1..self.start).rev());
            }
        }
        out
    }

    fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let horizontal = self.heading.is_horizontal();
        self.ordinates().into_iter().map(move |i| {
            if horizontal {
                (i, self.constant)
            } else {
                (self.constant, i)
            }
        })
    }
}

/// Obstacle cells for one round. Never changes once built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Walls {
    cells: Vec<Pos>,
    lookup: HashSet<Pos>,
}

impl Walls {
    fn from_segments(segments: &[Segment], size: Size) -> Self {
        let mut walls = Walls::default();
        for segment in segments {
            for (x, y) in segment.cells() {
                if x < 0 || y < 0 {
                    continue;
                }
                let pos = Pos::new(x as u16, y as u16);
                if size.contains(pos) && walls.lookup.insert(pos) {
                    walls.cells.push(pos);
                }
            }
        }
        walls
    }

    pub fn cells(&self) -> &[Pos] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }
}

impl Obstacle for Walls {
    fn occupies(&self, pos: Pos) -> bool {
        self.lookup.contains(&pos)
    }
}

pub fn build_walls(pattern: WallPattern, size: Size, rng: &mut impl Rng) -> Walls {
    let walls = match pattern {
        WallPattern::Random => random_walls(size, rng),
        fixed => Walls::from_segments(&fixed.segments(size), size),
    };
    debug!(
        "Built wall pattern {} with {} cells for {}x{}",
        pattern,
        walls.len(),
        size.width,
        size.height
    );
    walls
}

fn random_walls(size: Size, rng: &mut impl Rng) -> Walls {
    for _ in 0..RANDOM_ATTEMPTS {
        let segments = if rng.gen_bool(0.5) {
            bands(size, rng)
        } else {
            gates(size, rng)
        };
        if segments.iter().any(|s| s.len() <= MIN_SEGMENT_LEN) {
            continue;
        }
        let walls = Walls::from_segments(&segments, size);
        if !walls.occupies(size.center()) {
            return walls;
        }
    }
    warn!(
        "No usable random wall layout for {}x{}, playing without walls",
        size.width, size.height
    );
    Walls::default()
}

fn margin(extent: i32, rng: &mut impl Rng) -> i32 {
    let lo = (extent / 8).max(1);
    let hi = (extent / 3).max(lo);
    rng.gen_range(lo..=hi)
}

/// Two rows and two columns mirrored about the centre, corners left open.
fn bands(size: Size, rng: &mut impl Rng) -> Vec<Segment> {
    use Direction::*;

    let w = size.width as i32;
    let h = size.height as i32;
    let mx = margin(w, rng);
    let my = margin(h, rng);
    vec![
        Segment::new(mx + 2, w - mx - 2, my, Right),
        Segment::new(mx + 2, w - mx - 2, h - 1 - my, Right),
        Segment::new(my + 2, h - my - 2, mx, Down),
        Segment::new(my + 2, h - my - 2, w - 1 - mx, Down),
    ]
}

/// Two full-height columns, each with a gap mirrored top to bottom.
fn gates(size: Size, rng: &mut impl Rng) -> Vec<Segment> {
    use Direction::*;

    let w = size.width as i32;
    let h = size.height as i32;
    let gap = margin(h, rng).max(2);
    let top = rng.gen_range(0..=(h - gap).max(0));
    let left = w / 4;
    let right = w - 1 - w / 4;
    vec![
        Segment::new(0, top, left, Down),
        Segment::new(top + gap, h, left, Down),
        Segment::new(0, h - top - gap, right, Down),
        Segment::new(h - top, h, right, Down),
    ]
}
