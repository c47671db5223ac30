use log::{info, warn};
use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;

pub const STD_FILE_NAME: &str = ".wallsnek";
/// Minimum width of the zero-padded score; wider scores are written in full.
const SCORE_DIGITS: usize = 19;

/// Keeps the single high score between sessions.
pub trait ScoreStore {
    fn load(&self) -> io::Result<Option<u64>>;
    fn save(&mut self, score: u64) -> io::Result<()>;
    /// Human readable location, for error messages.
    fn location(&self) -> String;
}

/// High score kept as a zero-padded number in a plain text file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreFile {
    path: Option<PathBuf>,
}

impl ScoreFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ScoreFile {
            path: Some(path.into()),
        }
    }

    /// A store that never reads and accepts every save.
    pub fn disabled() -> Self {
        ScoreFile { path: None }
    }

    /// `$HOME/.wallsnek`, or a disabled store when HOME is unset.
    pub fn in_home() -> Self {
        match env::var_os("HOME") {
            Some(home) => ScoreFile::new(PathBuf::from(home).join(STD_FILE_NAME)),
            None => {
                warn!("HOME is not set, high scores will not be saved");
                ScoreFile::disabled()
            }
        }
    }

    /// Deletes the file. A file that does not exist counts as removed.
    pub fn remove(&self) -> io::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        match fs::remove_file(path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => {
                info!("Removed save file {}", path.display());
                Ok(())
            }
        }
    }
}

impl ScoreStore for ScoreFile {
    fn load(&self) -> io::Result<Option<u64>> {
        let Some(path) = &self.path else {
            return Ok(None);
        };
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        match contents.trim().parse() {
            Ok(score) => Ok(Some(score)),
            Err(e) => {
                warn!("Ignoring malformed save file {}: {}", path.display(), e);
                Ok(None)
            }
        }
    }

    fn save(&mut self, score: u64) -> io::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        fs::write(path, format!("{score:0width$}", width = SCORE_DIGITS))
    }

    fn location(&self) -> String {
        match &self.path {
            Some(path) => path.display().to_string(),
            None => "<disabled>".to_string(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_file(name: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("wallsnek-{}-{}", std::process::id(), name));
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn test_missing_file_loads_nothing() {
        let store = ScoreFile::new(scratch_file("missing"));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_save_then_load() {
        let path = scratch_file("roundtrip");
        let mut store = ScoreFile::new(&path);

        store.save(4242).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "0000000000000004242");
        assert_eq!(store.load().unwrap(), Some(4242));

        store.remove().unwrap();
        assert!(!path.exists());
        // removing twice is fine
        store.remove().unwrap();
    }

    #[test]
    fn test_malformed_file_loads_nothing() {
        let path = scratch_file("malformed");
        fs::write(&path, "not a number").unwrap();

        assert_eq!(ScoreFile::new(&path).load().unwrap(), None);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_disabled_store() {
        let mut store = ScoreFile::disabled();
        store.save(10).unwrap();
        assert_eq!(store.load().unwrap(), None);
        assert_eq!(store.location(), "<disabled>");
        store.remove().unwrap();
    }

    #[test]
    fn test_unwritable_path_fails_save() {
        let dir = scratch_file("as-dir");
        fs::create_dir_all(&dir).unwrap();

        let mut store = ScoreFile::new(&dir);
        assert!(store.save(1).is_err());
        fs::remove_dir(&dir).unwrap();
    }
}
