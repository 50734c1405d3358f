//! High score store
//!
//! The game only ever needs a single number: read it for display, write it
//! when a session beats it, zero it on reset. Backends that fail to read or
//! write log a warning and carry on with what they have in memory.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Key-value contract for the persisted high score
pub trait HighScoreStore {
    fn get(&self) -> u32;
    fn set(&mut self, score: u32);
}

/// On-disk representation
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct HighScoreRecord {
    highscore: u32,
}

/// Volatile store, used by tests and when nothing else is available
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScores {
    score: u32,
}

impl MemoryHighScores {
    pub fn new(score: u32) -> Self {
        Self { score }
    }
}

impl HighScoreStore for MemoryHighScores {
    fn get(&self) -> u32 {
        self.score
    }

    fn set(&mut self, score: u32) {
        self.score = score;
    }
}

/// JSON file backend
#[derive(Debug, Clone)]
pub struct FileHighScores {
    path: PathBuf,
    cached: u32,
}

impl FileHighScores {
    /// Default location under the user's config directory
    pub fn default_path() -> PathBuf {
        crate::persistence::config_dir().join("highscore.json")
    }

    /// Open the store, reading the current value once
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let cached = match crate::persistence::load_json::<HighScoreRecord>(&path) {
            Ok(Some(record)) => {
                log::info!("Loaded high score {} from {}", record.highscore, path.display());
                record.highscore
            }
            Ok(None) => {
                log::info!("No high score found, starting fresh");
                0
            }
            Err(e) => {
                log::warn!("Ignoring unreadable high score: {e:#}");
                0
            }
        };
        Self { path, cached }
    }
}

impl HighScoreStore for FileHighScores {
    fn get(&self) -> u32 {
        self.cached
    }

    fn set(&mut self, score: u32) {
        self.cached = score;
        let record = HighScoreRecord { highscore: score };
        match crate::persistence::save_json(&self.path, &record) {
            Ok(()) => log::info!("High score saved ({score})"),
            Err(e) => log::warn!("High score not saved: {e:#}"),
        }
    }
}

/// Browser LocalStorage backend
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageHighScores {
    cached: u32,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageHighScores {
    const STORAGE_KEY: &'static str = "twister_highscore";

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }

    pub fn load() -> Self {
        let cached = Self::storage()
            .and_then(|s| s.get_item(Self::STORAGE_KEY).ok().flatten())
            .and_then(|json| serde_json::from_str::<HighScoreRecord>(&json).ok())
            .map(|r| r.highscore)
            .unwrap_or(0);
        log::info!("Loaded high score {cached}");
        Self { cached }
    }
}

#[cfg(target_arch = "wasm32")]
impl HighScoreStore for LocalStorageHighScores {
    fn get(&self) -> u32 {
        self.cached
    }

    fn set(&mut self, score: u32) {
        self.cached = score;
        let Some(storage) = Self::storage() else {
            log::warn!("LocalStorage unavailable, high score kept in memory");
            return;
        };
        let Ok(json) = serde_json::to_string(&HighScoreRecord { highscore: score }) else {
            return;
        };
        match storage.set_item(Self::STORAGE_KEY, &json) {
            Ok(()) => log::info!("High score saved ({score})"),
            Err(e) => log::warn!("High score not saved: {e:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "twister-highscore-{}-{name}.json",
            std::process::id()
        ))
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryHighScores::new(7);
        assert_eq!(store.get(), 7);
        store.set(0);
        assert_eq!(store.get(), 0);
    }

    #[test]
    fn test_file_store_persists_across_opens() {
        let path = scratch("persist");
        let mut store = FileHighScores::open(&path);
        assert_eq!(store.get(), 0);
        store.set(42);
        assert_eq!(FileHighScores::open(&path).get(), 42);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_file_store_survives_corrupt_file() {
        let path = scratch("corrupt");
        std::fs::write(&path, b"{{{").unwrap();
        let mut store = FileHighScores::open(&path);
        assert_eq!(store.get(), 0);
        store.set(3);
        assert_eq!(store.get(), 3);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_unwritable_path_degrades_to_memory() {
        // A directory cannot be replaced by a file rename
        let root = std::env::temp_dir().join(format!("twister-hs-dir-{}", std::process::id()));
        let dir = root.join("highscore.json");
        std::fs::create_dir_all(&dir).unwrap();
        let mut store = FileHighScores::open(&dir);
        store.set(9);
        assert_eq!(store.get(), 9);
        let _ = std::fs::remove_dir_all(&root);
    }
}
