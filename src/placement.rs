use crate::geometry::{Obstacle, Pos, Size};
use log::warn;
use rand::seq::IteratorRandom;
use rand::Rng;
use thiserror::Error;

/// Rejection samples drawn per arena cell before falling back to a scan.
const SAMPLES_PER_CELL: usize = 4;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlacementError {
    #[error("no free cell left for food in a {width}x{height} arena")]
    ArenaFull { width: u16, height: u16 },
}

/// Picks a uniformly random cell covered by neither `body` nor `walls`.
pub fn place_food(
    body: &impl Obstacle,
    walls: &impl Obstacle,
    size: Size,
    rng: &mut impl Rng,
) -> Result<Pos, PlacementError> {
    let free = |pos: Pos| !body.occupies(pos) && !walls.occupies(pos);

    if size.area() > 0 {
        for _ in 0..size.area() * SAMPLES_PER_CELL {
            let pos = Pos::new(rng.gen_range(0..size.width), rng.gen_range(0..size.height));
            if free(pos) {
                return Ok(pos);
            }
        }
        warn!("Food sampling exhausted, scanning for a free cell");
    }

    (0..size.height)
        .flat_map(|y| (0..size.width).map(move |x| Pos::new(x, y)))
        .filter(|&pos| free(pos))
        .choose(rng)
        .ok_or(PlacementError::ArenaFull {
            width: size.width,
            height: size.height,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snake::{Body, Shape};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Filled(Size);

    impl Obstacle for Filled {
        fn occupies(&self, pos: Pos) -> bool {
            self.0.contains(pos)
        }
    }

    struct AllBut(Pos);

    impl Obstacle for AllBut {
        fn occupies(&self, pos: Pos) -> bool {
            pos != self.0
        }
    }

    #[test]
    fn test_food_avoids_body_and_walls() {
        let size = Size::new(6, 4);
        let mut body = Body::new(Pos::new(0, 0));
        for x in 1..6 {
            body.push_head(Pos::new(x, 0), Shape::Horizontal);
        }
        let walls: Option<Filled> = Some(Filled(Size::new(6, 3)));
        let mut rng = StdRng::seed_from_u64(9);

        for _ in 0..50 {
            let pos = place_food(&body, &walls, size, &mut rng).unwrap();
            assert_eq!(pos.y, 3);
            assert!(pos.x < 6);
        }
    }

    #[test]
    fn test_single_free_cell_is_found() {
        let size = Size::new(5, 5);
        let target = Pos::new(3, 1);
        let mut rng = StdRng::seed_from_u64(1);
        let none: Option<Filled> = None;

        let pos = place_food(&AllBut(target), &none, size, &mut rng).unwrap();
        assert_eq!(pos, target);
    }

    #[test]
    fn test_full_arena_is_an_error() {
        let size = Size::new(3, 3);
        let mut rng = StdRng::seed_from_u64(1);
        let none: Option<Filled> = None;

        assert_eq!(
            place_food(&Filled(size), &none, size, &mut rng),
            Err(PlacementError::ArenaFull {
                width: 3,
                height: 3
            })
        );
    }
}
