mod config;
mod error;
mod geometry;
mod input;
mod menu;
mod placement;
mod round;
mod savefile;
mod session;
mod snake;
mod ui;
mod walls;

use crate::config::{Bounds, GameConfig, KeyBindings, SnakeColor, STARTING_SPEED};
use crate::error::GameError;
use crate::input::TerminalInput;
use crate::savefile::{ScoreFile, ScoreStore};
use crate::session::Session;
use crate::ui::Screen;
use crate::walls::WallPattern;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::prelude::*;
use simplelog::{Config, LevelFilter, WriteLogger};
use std::fs::File;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::process::ExitCode;

/// Snake for the terminal, with walls, open borders and super food.
#[derive(Parser, Debug)]
#[command(version)]
struct Cli {
    /// Leaving the arena wraps around to the other side
    #[arg(short = 'o', long)]
    open_bounds: bool,

    /// Play with walls, using pattern 1-5 or "random"
    #[arg(short = 'w', long, value_name = "PATTERN")]
    walls: Option<WallPattern>,

    /// Snake colour: 1 white, 2 green, 3 red, 4 yellow, 5 blue
    #[arg(short = 'c', long, value_name = "COLOR", value_parser = clap::value_parser!(u8).range(1..=5))]
    color: Option<u8>,

    /// Start playing without the title screen
    #[arg(short = 's', long)]
    skip_title: bool,

    /// Delete the save file and exit
    #[arg(short = 'r', long)]
    remove_savefile: bool,

    /// Neither read nor write a save file
    #[arg(short = 'i', long)]
    ignore_savefile: bool,

    /// Save file to use instead of $HOME/.wallsnek
    #[arg(short = 'f', long, value_name = "PATH")]
    filepath: Option<PathBuf>,

    /// Steer with h, j, k and l
    #[arg(long)]
    vim: bool,

    /// Highest speed the snake can reach; the shortest tick is 150 minus this, in ms
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u64).range(0..=150))]
    maximum_speed: u64,

    /// Seed for food and wall placement
    #[arg(long)]
    seed: Option<u64>,

    /// Where to write the log
    #[arg(long, default_value = "wallsnek.log")]
    log_file: PathBuf,

    /// Log at debug level
    #[arg(long)]
    debug: bool,
}

impl Cli {
    fn game_config(&self) -> GameConfig {
        let mut config = GameConfig {
            skip_title: self.skip_title,
            min_speed: STARTING_SPEED - self.maximum_speed,
            ..GameConfig::default()
        };
        if self.open_bounds {
            config.bounds = Bounds::Wrapping;
        }
        if let Some(pattern) = self.walls {
            config.walls_enabled = true;
            config.wall_pattern = pattern;
        }
        if let Some(color) = self.color.and_then(SnakeColor::from_id) {
            config.snake_color = color;
        }
        if self.vim {
            config.keys = KeyBindings::vim();
        }
        config
    }

    fn score_file(&self) -> ScoreFile {
        if self.ignore_savefile {
            ScoreFile::disabled()
        } else if let Some(path) = &self.filepath {
            ScoreFile::new(path)
        } else {
            ScoreFile::in_home()
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging before anything else
    let level = if cli.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let logger = File::create(&cli.log_file)
        .map_err(|e| e.to_string())
        .and_then(|file| {
            WriteLogger::init(level, Config::default(), file).map_err(|e| e.to_string())
        });
    if let Err(e) = logger {
        eprintln!("Unable to log to {}: {}", cli.log_file.display(), e);
        return ExitCode::FAILURE;
    }

    info!("Starting wallsnek {}", env!("CARGO_PKG_VERSION"));

    let store = cli.score_file();
    if cli.remove_savefile {
        return match store.remove() {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Unable to remove {}: {}", store.location(), e);
                ExitCode::FAILURE
            }
        };
    }

    match run(&cli, store) {
        Ok(()) => {
            info!("Exiting normally");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, store: ScoreFile) -> Result<(), GameError> {
    let rng = match cli.seed {
        Some(seed) => {
            info!("Using seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let mut screen = Screen::new(setup_terminal()?);
    let result = Session::new(cli.game_config(), &mut screen, TerminalInput, store, rng).run();
    // the terminal comes back before any error gets printed
    let restored = restore_terminal(screen.terminal_mut());
    settle(result, restored)
}

/// Picks the error to report once the terminal is restored. A session error
/// wins over a failed restore, since it may carry the final score.
fn settle(result: Result<(), GameError>, restored: io::Result<()>) -> Result<(), GameError> {
    match (result, restored) {
        (Err(e), Err(restore_error)) => {
            error!("Unable to restore the terminal: {}", restore_error);
            Err(e)
        }
        (result, Ok(())) => result,
        (Ok(()), Err(restore_error)) => Err(restore_error.into()),
    }
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.hide_cursor()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}
