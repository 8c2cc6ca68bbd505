use crate::error::Error;
use crate::models::Snapshot;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

const CACHE_FILE: &str = "data.json";

/// File-backed store for the last successful extraction.
///
/// Writes go to a temp file in the cache directory and replace the previous
/// cache atomically, so a failed write never corrupts existing data. A
/// missing or unreadable cache file reads as [`Error::CacheMiss`].
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    /// Store rooted at an explicit directory. Tests point this at a tempdir.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Per-user default under the platform cache directory. `None` when the
    /// platform has no such notion.
    pub fn default_location() -> Option<Self> {
        dirs::cache_dir().map(|base| Self::new(base.join("corona-rs")))
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(CACHE_FILE)
    }

    /// Persist `snapshot`, replacing any previous cache. Creates the cache
    /// directory on first use.
    pub fn save(&self, snapshot: &Snapshot) -> Result<(), Error> {
        fs::create_dir_all(&self.dir).map_err(Error::CacheWrite)?;
        let json =
            serde_json::to_string_pretty(snapshot).map_err(|e| Error::CacheWrite(e.into()))?;
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(Error::CacheWrite)?;
        tmp.write_all(json.as_bytes()).map_err(Error::CacheWrite)?;
        tmp.persist(self.path())
            .map_err(|e| Error::CacheWrite(e.error))?;
        Ok(())
    }

    /// Load the previously saved snapshot. A corrupt cache file is rejected
    /// as a miss, not an abort.
    pub fn load(&self) -> Result<Snapshot, Error> {
        let raw = fs::read_to_string(self.path()).map_err(|_| Error::CacheMiss)?;
        serde_json::from_str(&raw).map_err(|e| {
            log::warn!(
                "discarding corrupt cache at {}: {}",
                self.path().display(),
                e
            );
            Error::CacheMiss
        })
    }
}
