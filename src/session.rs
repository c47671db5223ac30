use crate::config::GameConfig;
use crate::error::GameError;
use crate::input::{is_interrupt, InputSource, PollMode};
use crate::menu::{Menu, OptionEntry, TitleEntry, CREDITS};
use crate::round::{is_quit_key, Intent, Outcome, Round};
use crate::savefile::ScoreStore;
use crate::ui::{Banner, Screen};
use log::{error, info, warn};
use rand::Rng;
use ratatui::backend::Backend;
use std::time::Duration;

/// How long end-of-round banners stay up.
const BANNER_TIME: Duration = Duration::from_secs(2);
/// Below this the title logo does not fit and rounds start straight away.
const MIN_TITLE_WIDTH: u16 = 64;
const MIN_TITLE_HEIGHT: u16 = 19;
pub const MIN_ARENA_WIDTH: u16 = 10;
pub const MIN_ARENA_HEIGHT: u16 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Runs rounds back to back and keeps the high score.
pub struct Session<'a, B: Backend, I: InputSource, S: ScoreStore, R: Rng> {
    config: GameConfig,
    screen: &'a mut Screen<B>,
    input: I,
    store: S,
    rng: R,
    high_score: u64,
}

impl<'a, B: Backend, I: InputSource, S: ScoreStore, R: Rng> Session<'a, B, I, S, R> {
    pub fn new(config: GameConfig, screen: &'a mut Screen<B>, input: I, store: S, rng: R) -> Self {
        let high_score = match store.load() {
            Ok(Some(score)) => score,
            Ok(None) => 0,
            Err(e) => {
                warn!("Unable to read save file {}: {}", store.location(), e);
                0
            }
        };
        info!("Loaded high score {}", high_score);

        Session {
            config,
            screen,
            input,
            store,
            rng,
            high_score,
        }
    }

    /// Plays until the player quits.
    pub fn run(&mut self) -> Result<(), GameError> {
        let size = self.screen.size()?;
        if !self.config.skip_title
            && (size.width < MIN_TITLE_WIDTH || size.height < MIN_TITLE_HEIGHT)
        {
            info!(
                "Terminal {}x{} too small for the title screen, skipping it",
                size.width, size.height
            );
            self.config.skip_title = true;
        }

        loop {
            let flow = if self.config.skip_title {
                self.play_game()?
            } else {
                self.title_screen()?
            };
            if flow == Flow::Quit {
                info!("Quitting with high score {}", self.high_score);
                return Ok(());
            }
        }
    }

    /// Plays rounds for as long as the player keeps restarting them.
    fn play_game(&mut self) -> Result<Flow, GameError> {
        loop {
            match self.play_round()? {
                Outcome::Restart => continue,
                Outcome::Quit => return Ok(Flow::Quit),
                _ => return Ok(Flow::Continue),
            }
        }
    }

    fn play_round(&mut self) -> Result<Outcome, GameError> {
        let size = self.screen.arena_size()?;
        if size.width < MIN_ARENA_WIDTH || size.height < MIN_ARENA_HEIGHT {
            return Err(GameError::TerminalTooSmall {
                width: size.width,
                height: size.height,
                min_width: MIN_ARENA_WIDTH,
                min_height: MIN_ARENA_HEIGHT,
            });
        }

        let mut round = Round::new(&self.config, size, &mut self.rng)?;
        let outcome = loop {
            self.screen.draw_round(&round, self.high_score)?;

            // a key or the timeout ends the tick
            let wait = PollMode::Timeout(round.tick_interval());
            let key = self.input.poll_key(wait)?;
            match round.handle_input(key) {
                Intent::Pause => {
                    self.screen.draw_banner(&round, Banner::Paused)?;
                    let resume = self.input.poll_key(PollMode::Blocking)?;
                    if resume.as_ref().is_some_and(is_quit_key) {
                        break Outcome::Quit;
                    }
                    continue;
                }
                Intent::Restart => break Outcome::Restart,
                Intent::Quit => break Outcome::Quit,
                Intent::Direction | Intent::None => {}
            }

            if !round.is_moving() {
                continue;
            }

            let tick = round.update(&mut self.rng)?;
            if tick.is_terminal() {
                break tick;
            }
        };
        info!("Round ended with {:?}, score {}", outcome, round.score());

        if outcome != Outcome::Quit
            && record_high_score(&mut self.store, &mut self.high_score, round.score())?
        {
            self.screen.draw_banner(&round, Banner::NewHighScore)?;
            self.input.idle(BANNER_TIME);
            self.input.discard_pending()?;
        }
        if outcome == Outcome::GameOver {
            self.screen.draw_banner(&round, Banner::GameOver)?;
            self.input.idle(BANNER_TIME);
            self.input.discard_pending()?;
        }

        Ok(outcome)
    }

    fn title_screen(&mut self) -> Result<Flow, GameError> {
        let mut menu = Menu::title();
        loop {
            self.screen.draw_menu(&menu, self.config.snake_color.into())?;
            let Some(key) = self.input.poll_key(PollMode::Blocking)? else {
                continue;
            };
            if is_interrupt(&key) {
                return Ok(Flow::Quit);
            }
            let Some(index) = menu.handle_key(key, &self.config.keys) else {
                continue;
            };

            match TitleEntry::ALL[index] {
                TitleEntry::Play => {
                    if self.play_game()? == Flow::Quit {
                        return Ok(Flow::Quit);
                    }
                }
                TitleEntry::Options => self.options_screen()?,
                TitleEntry::Credits => {
                    self.screen
                        .draw_message(&CREDITS, self.config.snake_color.into())?;
                    self.input.poll_key(PollMode::Blocking)?;
                }
                TitleEntry::Quit => return Ok(Flow::Quit),
            }
        }
    }

    fn options_screen(&mut self) -> Result<(), GameError> {
        let mut menu = Menu::options(&self.config);
        loop {
            self.screen.draw_menu(&menu, self.config.snake_color.into())?;
            let Some(key) = self.input.poll_key(PollMode::Blocking)? else {
                continue;
            };
            if let Some(index) = menu.handle_key(key, &self.config.keys) {
                if OptionEntry::ALL[index].apply(&mut self.config) {
                    info!("Options set to {:?}", self.config);
                    return Ok(());
                }
                menu.refresh_options(&self.config);
            }
        }
    }
}

/// Stores `score` if it beats the high score. Returns whether it did.
fn record_high_score(
    store: &mut impl ScoreStore,
    high_score: &mut u64,
    score: u64,
) -> Result<bool, GameError> {
    if score <= *high_score {
        return Ok(false);
    }
    *high_score = score;
    if let Err(source) = store.save(score) {
        error!("Error saving high score to {}: {}", store.location(), source);
        return Err(GameError::SaveHighScore {
            location: store.location(),
            score,
            source,
        });
    }
    info!("New high score {}", score);
    Ok(true)
}
