use crate::config::{
    Bounds, GameConfig, BONUS_FLOOR, BONUS_MAX, SPEED_BONUS_FACTOR, SUPERFOOD_INTERVAL,
    SUPERFOOD_MULTIPLIER,
};
use crate::geometry::{Direction, Obstacle, Pos, Size};
use crate::input::is_interrupt;
use crate::placement::{place_food, PlacementError};
use crate::snake::{Body, Shape};
use crate::walls::{build_walls, Walls};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use log::{debug, info};
use rand::Rng;
use std::time::Duration;

/// What a polled key asks the round to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    None,
    Direction,
    Pause,
    Restart,
    Quit,
}

/// `Q` or Ctrl+C; both end the session from a round or its pause screen.
pub fn is_quit_key(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('Q') || is_interrupt(key)
}

/// Result of a tick, or of a whole round once it is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    /// A collision was forgiven; the head stayed where it was.
    Grace,
    GameOver,
    Restart,
    Quit,
}

impl Outcome {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Outcome::GameOver | Outcome::Restart | Outcome::Quit)
    }
}

/// Live state of a single round.
#[derive(Debug)]
pub struct Round<'a> {
    config: &'a GameConfig,
    size: Size,
    score: u64,
    direction: Option<Direction>,
    previous_direction: Option<Direction>,
    speed: u64,
    head: Pos,
    previous_head: Pos,
    bonus: u32,
    length: u32,
    pending_growth: u32,
    grace_ticks: u32,
    superfood_countdown: u32,
    food: Pos,
    body: Body,
    walls: Option<Walls>,
}

impl<'a> Round<'a> {
    pub fn new(
        config: &'a GameConfig,
        size: Size,
        rng: &mut impl Rng,
    ) -> Result<Self, PlacementError> {
        let head = size.center();
        let body = Body::new(head);
        let walls = config
            .active_walls()
            .map(|pattern| build_walls(pattern, size, rng));
        let food = place_food(&body, &walls, size, rng)?;

        info!(
            "New round on {}x{} arena, bounds {:?}, walls {:?}",
            size.width,
            size.height,
            config.bounds,
            config.active_walls()
        );

        Ok(Round {
            config,
            size,
            score: 0,
            direction: None,
            previous_direction: None,
            speed: config.starting_speed,
            head,
            previous_head: head,
            bonus: BONUS_MAX,
            length: config.starting_length,
            pending_growth: config.grow_factor,
            grace_ticks: config.grace_ticks,
            superfood_countdown: SUPERFOOD_INTERVAL,
            food,
            body,
            walls,
        })
    }

    pub fn config(&self) -> &GameConfig {
        self.config
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn bonus(&self) -> u32 {
        self.bonus
    }

    pub fn length(&self) -> u32 {
        self.length
    }

    pub fn head(&self) -> Pos {
        self.head
    }

    pub fn food(&self) -> Pos {
        self.food
    }

    /// The food on the board is worth the super multiplier.
    pub fn is_superfood(&self) -> bool {
        self.superfood_countdown == 0
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn walls(&self) -> Option<&Walls> {
        self.walls.as_ref()
    }

    /// The snake only moves once a first direction has been chosen.
    pub fn is_moving(&self) -> bool {
        self.direction.is_some()
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.speed)
    }

    pub fn handle_input(&mut self, key: Option<KeyEvent>) -> Intent {
        let Some(key) = key else {
            return Intent::None;
        };
        if key.kind == KeyEventKind::Release {
            return Intent::None;
        }
        if is_quit_key(&key) {
            return Intent::Quit;
        }

        let keys = self.config.keys;
        match key.code {
            code if code == keys.up => self.steer(Direction::Up),
            code if code == keys.down => self.steer(Direction::Down),
            code if code == keys.left => self.steer(Direction::Left),
            code if code == keys.right => self.steer(Direction::Right),
            KeyCode::Enter => Intent::Pause,
            KeyCode::Char('R') => Intent::Restart,
            _ => Intent::None,
        }
    }

    fn steer(&mut self, new_direction: Direction) -> Intent {
        if self.direction != Some(new_direction.opposite()) {
            self.direction = Some(new_direction);
        }
        Intent::Direction
    }

    /// Advances the round by one tick.
    pub fn update(&mut self, rng: &mut impl Rng) -> Result<Outcome, PlacementError> {
        let Some(direction) = self.direction else {
            return Ok(Outcome::Continue);
        };

        self.previous_head = self.head;
        let stepped = match self.config.bounds {
            Bounds::Wrapping => Some(self.head.wrapped_add(direction.into(), self.size)),
            Bounds::Closed => self.head.checked_add(direction.into(), self.size),
        };

        let target = match stepped {
            Some(pos) if !self.body.occupies(pos) && !self.walls.occupies(pos) => pos,
            _ => return Ok(self.collide(stepped)),
        };

        self.grace_ticks = self.config.grace_ticks;
        self.head = target;
        let departed = Shape::from_turn(direction, self.previous_direction);
        self.body.push_head(target, departed);
        self.previous_direction = Some(direction);

        if self.head == self.food {
            self.eat(rng)?;
        }

        if self.pending_growth == 0 {
            self.body.pop_tail();
        } else {
            self.pending_growth -= 1;
            self.length += 1;
        }

        if self.bonus > BONUS_FLOOR {
            self.bonus -= 1;
        }

        Ok(Outcome::Continue)
    }

    fn collide(&mut self, stepped: Option<Pos>) -> Outcome {
        if self.grace_ticks > 0 {
            self.grace_ticks -= 1;
            self.head = self.previous_head;
            debug!("Collision forgiven, {} grace ticks left", self.grace_ticks);
            return Outcome::Grace;
        }

        // show where the snake crashed; leaving the arena keeps the last cell
        if let Some(pos) = stepped {
            self.head = pos;
        }
        info!("Round over with score {}", self.score);
        Outcome::GameOver
    }

    fn eat(&mut self, rng: &mut impl Rng) -> Result<(), PlacementError> {
        let superfood = self.is_superfood();

        self.pending_growth += if superfood {
            self.config.superfood_grow_factor
        } else {
            self.config.grow_factor
        };
        if self.speed > self.config.min_speed {
            self.speed = self
                .speed
                .saturating_sub(self.config.speed_step)
                .max(self.config.min_speed);
        }

        let speed_bonus =
            self.config.starting_speed.saturating_sub(self.speed) * SPEED_BONUS_FACTOR;
        let multiplier = if superfood { SUPERFOOD_MULTIPLIER } else { 1 };
        let gain = (self.bonus as u64 + self.length as u64 + speed_bonus) * multiplier;
        self.score = self.score.saturating_add(gain);

        self.bonus = BONUS_MAX;
        self.superfood_countdown = if superfood {
            SUPERFOOD_INTERVAL
        } else {
            self.superfood_countdown - 1
        };
        self.food = place_food(&self.body, &self.walls, self.size, rng)?;

        debug!(
            "Ate {}food for {} points, speed now {}ms",
            if superfood { "super" } else { "" },
            gain,
            self.speed
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walls::WallPattern;
    use crossterm::event::KeyModifiers;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn key(code: KeyCode) -> Option<KeyEvent> {
        Some(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x5EED)
    }

    /// Moves a fresh round's snake to `head` so tests can set up a scene.
    fn place_snake(round: &mut Round, head: Pos, direction: Direction) {
        round.head = head;
        round.previous_head = head;
        round.body = Body::new(head);
        round.direction = Some(direction);
    }

    #[test]
    fn test_new_round() {
        let config = GameConfig::default();
        let round = Round::new(&config, Size::new(20, 10), &mut rng()).unwrap();

        assert_eq!(round.head(), Pos::new(10, 5));
        assert_eq!(round.body().len(), 1);
        assert_eq!(round.length(), 5);
        assert_eq!(round.score(), 0);
        assert_eq!(round.bonus(), 1000);
        assert_eq!(round.tick_interval(), Duration::from_millis(150));
        assert!(!round.is_moving());
        assert!(!round.is_superfood());
        assert!(round.walls().is_none());
        assert_ne!(round.food(), round.head());
    }

    #[test]
    fn test_update_without_direction_is_idle() {
        let config = GameConfig::default();
        let mut round = Round::new(&config, Size::new(20, 10), &mut rng()).unwrap();

        assert_eq!(round.update(&mut rng()), Ok(Outcome::Continue));
        assert_eq!(round.head(), Pos::new(10, 5));
        assert_eq!(round.length(), 5);
    }

    #[test]
    fn test_handle_input_mapping() {
        let config = GameConfig::default();
        let mut round = Round::new(&config, Size::new(20, 10), &mut rng()).unwrap();

        assert_eq!(round.handle_input(None), Intent::None);
        assert_eq!(round.handle_input(key(KeyCode::Char('x'))), Intent::None);
        assert_eq!(round.handle_input(key(KeyCode::Enter)), Intent::Pause);
        assert_eq!(round.handle_input(key(KeyCode::Char('R'))), Intent::Restart);
        assert_eq!(round.handle_input(key(KeyCode::Char('Q'))), Intent::Quit);
        assert_eq!(
            round.handle_input(Some(KeyEvent::new(
                KeyCode::Char('c'),
                KeyModifiers::CONTROL
            ))),
            Intent::Quit
        );
        assert!(!round.is_moving());

        assert_eq!(round.handle_input(key(KeyCode::Up)), Intent::Direction);
        assert_eq!(round.direction, Some(Direction::Up));
    }

    #[test]
    fn test_reversal_is_rejected() {
        let config = GameConfig::default();
        let mut round = Round::new(&config, Size::new(20, 10), &mut rng()).unwrap();

        round.handle_input(key(KeyCode::Right));
        assert_eq!(round.handle_input(key(KeyCode::Left)), Intent::Direction);
        assert_eq!(round.direction, Some(Direction::Right));

        round.handle_input(key(KeyCode::Down));
        assert_eq!(round.direction, Some(Direction::Down));
    }

    #[test]
    fn test_vim_bindings() {
        let config = GameConfig {
            keys: crate::config::KeyBindings::vim(),
            ..GameConfig::default()
        };
        let mut round = Round::new(&config, Size::new(20, 10), &mut rng()).unwrap();

        assert_eq!(round.handle_input(key(KeyCode::Up)), Intent::None);
        assert_eq!(
            round.handle_input(key(KeyCode::Char('h'))),
            Intent::Direction
        );
        assert_eq!(round.direction, Some(Direction::Left));
    }

    #[test]
    fn test_food_scenario() {
        let config = GameConfig::default();
        let mut rng = rng();
        let mut round = Round::new(&config, Size::new(20, 10), &mut rng).unwrap();
        round.food = Pos::new(15, 5);
        round.handle_input(key(KeyCode::Right));

        for _ in 0..4 {
            assert_eq!(round.update(&mut rng), Ok(Outcome::Continue));
        }
        assert_eq!(round.head(), Pos::new(14, 5));
        assert_eq!(round.bonus(), 996);
        assert_eq!(round.length(), 9);
        assert_eq!(round.pending_growth, 6);
        assert_eq!(round.score(), 0);

        assert_eq!(round.update(&mut rng), Ok(Outcome::Continue));
        assert_eq!(round.head(), Pos::new(15, 5));
        // bonus 996 + length 9 + (150 - 148) * 5
        assert_eq!(round.score(), 996 + 9 + 10);
        assert_eq!(round.pending_growth, 6 + 10 - 1);
        assert_eq!(round.tick_interval(), Duration::from_millis(148));
        assert_eq!(round.bonus(), 999);
        assert_ne!(round.food(), Pos::new(15, 5));
        assert!(!round.body().occupies(round.food()));
    }

    #[test]
    fn test_grace_then_game_over_on_wall() {
        let config = GameConfig {
            walls_enabled: true,
            wall_pattern: WallPattern::Columns,
            ..GameConfig::default()
        };
        let mut rng = rng();
        let mut round = Round::new(&config, Size::new(20, 10), &mut rng).unwrap();
        // columns at x=5 and x=15, rows 2..7
        assert!(round.walls().occupies(Pos::new(5, 4)));
        place_snake(&mut round, Pos::new(6, 4), Direction::Left);
        round.food = Pos::new(0, 0);

        for expected in [2, 1, 0] {
            assert_eq!(round.update(&mut rng), Ok(Outcome::Grace));
            assert_eq!(round.grace_ticks, expected);
            assert_eq!(round.head(), Pos::new(6, 4));
        }
        assert_eq!(round.update(&mut rng), Ok(Outcome::GameOver));
        assert_eq!(round.head(), Pos::new(5, 4));
    }

    #[test]
    fn test_grace_replenishes_after_move() {
        let config = GameConfig::default();
        let mut rng = rng();
        let mut round = Round::new(&config, Size::new(20, 10), &mut rng).unwrap();
        place_snake(&mut round, Pos::new(19, 5), Direction::Right);
        round.food = Pos::new(0, 0);

        assert_eq!(round.update(&mut rng), Ok(Outcome::Grace));
        assert_eq!(round.update(&mut rng), Ok(Outcome::Grace));
        assert_eq!(round.grace_ticks, 1);

        round.handle_input(key(KeyCode::Down));
        assert_eq!(round.update(&mut rng), Ok(Outcome::Continue));
        assert_eq!(round.head(), Pos::new(19, 6));
        assert_eq!(round.grace_ticks, config.grace_ticks);
    }

    #[test]
    fn test_closed_bounds_collide() {
        let config = GameConfig {
            grace_ticks: 0,
            ..GameConfig::default()
        };
        let mut rng = rng();
        for (head, direction) in [
            (Pos::new(0, 3), Direction::Left),
            (Pos::new(3, 0), Direction::Up),
            (Pos::new(9, 3), Direction::Right),
            (Pos::new(3, 5), Direction::Down),
        ] {
            let mut round = Round::new(&config, Size::new(10, 6), &mut rng).unwrap();
            place_snake(&mut round, head, direction);
            assert_eq!(round.update(&mut rng), Ok(Outcome::GameOver));
            assert_eq!(round.head(), head);
        }
    }

    #[test]
    fn test_wrap_correctness() {
        let config = GameConfig {
            bounds: Bounds::Wrapping,
            grace_ticks: 0,
            ..GameConfig::default()
        };
        let mut rng = rng();
        let size = Size::new(10, 6);
        for (head, direction, wrapped) in [
            (Pos::new(9, 3), Direction::Right, Pos::new(0, 3)),
            (Pos::new(0, 3), Direction::Left, Pos::new(9, 3)),
            (Pos::new(4, 5), Direction::Down, Pos::new(4, 0)),
            (Pos::new(4, 0), Direction::Up, Pos::new(4, 5)),
        ] {
            let mut round = Round::new(&config, size, &mut rng).unwrap();
            place_snake(&mut round, head, direction);
            round.food = Pos::new(2, 2);
            assert_eq!(round.update(&mut rng), Ok(Outcome::Continue));
            assert_eq!(round.head(), wrapped);
        }
    }

    #[test]
    fn test_self_collision() {
        let config = GameConfig {
            grace_ticks: 0,
            ..GameConfig::default()
        };
        let mut rng = rng();
        let mut round = Round::new(&config, Size::new(20, 10), &mut rng).unwrap();
        round.food = Pos::new(0, 0);
        round.handle_input(key(KeyCode::Right));

        // grow a little, then loop back into the body
        for _ in 0..4 {
            assert_eq!(round.update(&mut rng), Ok(Outcome::Continue));
        }
        round.handle_input(key(KeyCode::Down));
        assert_eq!(round.update(&mut rng), Ok(Outcome::Continue));
        round.handle_input(key(KeyCode::Left));
        assert_eq!(round.update(&mut rng), Ok(Outcome::Continue));
        round.handle_input(key(KeyCode::Up));
        assert_eq!(round.update(&mut rng), Ok(Outcome::GameOver));
    }

    #[test]
    fn test_growth_conservation() {
        let config = GameConfig::default();
        let mut rng = rng();
        let mut round = Round::new(&config, Size::new(40, 10), &mut rng).unwrap();
        place_snake(&mut round, Pos::new(2, 5), Direction::Right);
        round.pending_growth = 0;
        round.food = Pos::new(3, 5);

        assert_eq!(round.update(&mut rng), Ok(Outcome::Continue));
        let eaten_at = round.length();
        let growth = round.pending_growth;
        assert_eq!(growth, config.grow_factor - 1);
        round.food = Pos::new(0, 0);

        let mut previous = eaten_at;
        for tick in 0..growth + 5 {
            assert_eq!(round.update(&mut rng), Ok(Outcome::Continue));
            assert!(round.body().len() as u32 <= round.length());
            if tick < growth {
                assert_eq!(round.length(), previous + 1);
            } else {
                assert_eq!(round.length(), previous);
            }
            previous = round.length();
        }
        assert_eq!(round.body().len() as u32, 1 + config.grow_factor);
    }

    #[test]
    fn test_superfood_cycle() {
        let config = GameConfig {
            bounds: Bounds::Wrapping,
            ..GameConfig::default()
        };
        let mut rng = rng();
        let mut round = Round::new(&config, Size::new(200, 5), &mut rng).unwrap();
        round.handle_input(key(KeyCode::Right));

        for eaten in 1..=SUPERFOOD_INTERVAL {
            let ahead = round.head().wrapped_add(Direction::Right.into(), round.size);
            round.food = ahead;
            assert_eq!(round.update(&mut rng), Ok(Outcome::Continue));
            assert_eq!(round.is_superfood(), eaten == SUPERFOOD_INTERVAL);
        }

        let ahead = round.head().wrapped_add(Direction::Right.into(), round.size);
        round.food = ahead;
        let before = round.score();
        let growth_before = round.pending_growth;
        let bonus = round.bonus() as u64;
        let length = round.length() as u64;
        assert_eq!(round.update(&mut rng), Ok(Outcome::Continue));

        let speed_bonus = (150 - round.speed) * SPEED_BONUS_FACTOR;
        assert_eq!(round.score() - before, (bonus + length + speed_bonus) * 5);
        assert_eq!(
            round.pending_growth,
            growth_before + config.superfood_grow_factor - 1
        );
        assert!(!round.is_superfood());
        assert_eq!(round.superfood_countdown, SUPERFOOD_INTERVAL);
    }

    #[test]
    fn test_speed_is_floored() {
        let config = GameConfig {
            bounds: Bounds::Wrapping,
            min_speed: 145,
            ..GameConfig::default()
        };
        let mut rng = rng();
        let mut round = Round::new(&config, Size::new(100, 5), &mut rng).unwrap();
        round.handle_input(key(KeyCode::Right));

        for _ in 0..5 {
            round.food = round.head().wrapped_add(Direction::Right.into(), round.size);
            round.update(&mut rng).unwrap();
        }
        assert_eq!(round.tick_interval(), Duration::from_millis(145));
    }

    #[test]
    fn test_bonus_decays_to_floor() {
        let config = GameConfig {
            bounds: Bounds::Wrapping,
            ..GameConfig::default()
        };
        let mut rng = rng();
        let mut round = Round::new(&config, Size::new(10, 6), &mut rng).unwrap();
        place_snake(&mut round, Pos::new(0, 0), Direction::Right);
        round.pending_growth = 0;
        round.food = Pos::new(5, 5);

        for _ in 0..(BONUS_MAX - BONUS_FLOOR + 10) {
            assert_eq!(round.update(&mut rng), Ok(Outcome::Continue));
        }
        assert_eq!(round.bonus(), BONUS_FLOOR);
    }

    #[test]
    fn test_score_monotonic_and_walls_immutable() {
        let config = GameConfig {
            bounds: Bounds::Wrapping,
            walls_enabled: true,
            wall_pattern: WallPattern::Frame,
            ..GameConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(77);
        let mut round = Round::new(&config, Size::new(30, 16), &mut rng).unwrap();
        let walls_at_start = round.walls().cloned();
        let codes = [KeyCode::Up, KeyCode::Down, KeyCode::Left, KeyCode::Right];

        let mut score = round.score();
        for _ in 0..2000 {
            let code = codes[rng.gen_range(0..codes.len())];
            round.handle_input(key(code));
            let outcome = round.update(&mut rng).unwrap();
            assert!(round.score() >= score);
            score = round.score();
            assert!(round.body().len() as u32 <= round.length());
            if outcome == Outcome::GameOver {
                break;
            }
        }
        assert_eq!(round.walls().cloned(), walls_at_start);
    }

    #[test]
    fn test_quit_keys() {
        let quit = KeyEvent::new(KeyCode::Char('Q'), KeyModifiers::NONE);
        let interrupt = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let lower = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);

        assert!(is_quit_key(&quit));
        assert!(is_quit_key(&interrupt));
        assert!(!is_quit_key(&lower));
    }

    #[test]
    fn test_outcome_terminality() {
        assert!(!Outcome::Continue.is_terminal());
        assert!(!Outcome::Grace.is_terminal());
        assert!(Outcome::GameOver.is_terminal());
        assert!(Outcome::Restart.is_terminal());
        assert!(Outcome::Quit.is_terminal());
    }
}
