//! PatternStore: the process-wide reminder pattern and its JSON document.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use super::pattern::ReminderPattern;
use crate::sheets::{file_ops, Result, SheetError};

pub struct PatternStore {
    path: PathBuf,
    pattern: Mutex<ReminderPattern>,
}

impl PatternStore {
    pub fn new(path: impl Into<PathBuf>, pattern: ReminderPattern) -> Self {
        Self {
            path: path.into(),
            pattern: Mutex::new(pattern),
        }
    }

    /// Load the pattern document at `path` (or the default) into a new store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let pattern = Self::load(&path)?;
        Ok(Self::new(path, pattern))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read a pattern document. A missing file yields the default pattern.
    pub fn load(path: &Path) -> Result<ReminderPattern> {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("[PATTERN] No pattern file at {:?}, using default", path);
                return Ok(ReminderPattern::default());
            }
            Err(e) => return Err(SheetError::io(path, e)),
        };

        serde_json::from_str(&data).map_err(|e| {
            SheetError::InvalidPattern(format!("failed to parse pattern file {:?}: {}", path, e))
        })
    }

    /// Write a pattern document, creating its directory if needed.
    ///
    /// The old document stays intact until the new one is fully written.
    pub fn save(path: &Path, pattern: &ReminderPattern) -> Result<()> {
        let data = serde_json::to_string_pretty(pattern)
            .map_err(|e| SheetError::InvalidPattern(format!("failed to serialize pattern: {}", e)))?;
        file_ops::write_atomic(path, &data).map_err(|e| SheetError::io(path, e))
    }

    /// Copy of the current pattern.
    pub fn get(&self) -> ReminderPattern {
        self.pattern.lock().clone()
    }

    /// Swap in a new pattern (memory only).
    pub fn replace(&self, pattern: ReminderPattern) {
        *self.pattern.lock() = pattern;
        log::info!("[PATTERN] Pattern replaced");
    }

    /// Persist `pattern` to this store's file, then swap it in.
    ///
    /// If the write fails the current pattern stays in place.
    pub fn replace_and_save(&self, pattern: ReminderPattern) -> Result<()> {
        let mut current = self.pattern.lock();
        Self::save(&self.path, &pattern)?;
        *current = pattern;
        log::info!("[PATTERN] Saved pattern to {:?}", self.path);
        Ok(())
    }
}
