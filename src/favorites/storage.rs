//! The single persistent slot the hall of fame lives in.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the favorites slot inside the app data directory.
pub const FAVORITES_FILE: &str = "hall_of_fame_v2.json";

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt favorites data: {0}")]
    Corrupt(#[from] serde_json::Error),
}

// For Tauri command return compatibility
impl From<PersistenceError> for String {
    fn from(e: PersistenceError) -> String {
        e.to_string()
    }
}

/// Opaque key-value slot holding the serialized favorites list.
pub trait FavoritesSlot: Send + Sync {
    /// `Ok(None)` when nothing has been saved yet.
    fn read(&self) -> Result<Option<String>, PersistenceError>;

    /// Replace the whole slot.
    fn write(&self, contents: &str) -> Result<(), PersistenceError>;
}

/// Slot backed by one JSON file.
pub struct JsonFileSlot {
    path: PathBuf,
}

impl JsonFileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default slot location under `data_dir`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(FAVORITES_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FavoritesSlot for JsonFileSlot {
    fn read(&self) -> Result<Option<String>, PersistenceError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, contents: &str) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        // Write-then-rename so a crash never leaves half a file behind
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, contents)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_file_reads_as_none() {
        let tmp = tempfile::TempDir::new().unwrap();
        let slot = JsonFileSlot::in_dir(tmp.path());
        assert!(slot.read().unwrap().is_none());
    }

    #[test]
    fn write_creates_missing_dirs() {
        let tmp = tempfile::TempDir::new().unwrap();
        let slot = JsonFileSlot::in_dir(&tmp.path().join("a").join("b"));
        slot.write("[]").unwrap();
        assert_eq!(slot.read().unwrap().as_deref(), Some("[]"));
        assert!(slot.path().ends_with(FAVORITES_FILE));
    }

    #[test]
    fn write_replaces_previous_contents() {
        let tmp = tempfile::TempDir::new().unwrap();
        let slot = JsonFileSlot::in_dir(tmp.path());
        slot.write("[1]").unwrap();
        slot.write("[2]").unwrap();
        assert_eq!(slot.read().unwrap().as_deref(), Some("[2]"));
    }

    #[test]
    fn directory_in_place_of_file_is_io_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join(FAVORITES_FILE);
        std::fs::create_dir_all(&path).unwrap();
        let slot = JsonFileSlot::new(&path);
        assert!(matches!(slot.read(), Err(PersistenceError::Io(_))));
    }
}
