use crate::placement::PlacementError;
use std::io;
use thiserror::Error;

/// Conditions that end the whole program rather than a round.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
    #[error("unable to write savefile at {location}: {source}\nFinal highscore was: {score}")]
    SaveHighScore {
        location: String,
        score: u64,
        #[source]
        source: io::Error,
    },
    #[error("terminal too small: the arena needs at least {min_width}x{min_height} cells, got {width}x{height}")]
    TerminalTooSmall {
        width: u16,
        height: u16,
        min_width: u16,
        min_height: u16,
    },
    #[error(transparent)]
    Placement(#[from] PlacementError),
}
