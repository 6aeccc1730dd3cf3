//! SheetStore: file-backed sheet storage with an in-memory cache
//!
//! Each sheet is one markdown file under the store root. The cache is filled
//! by a full scan at startup, then kept in step with disk: reads fall back to
//! disk on a miss, and every mutation commits to disk before touching the cache.
//! A single mutex covers the cache and the file-system call made while holding it.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use parking_lot::Mutex;
use sheets_types::{MemorySheet, SearchHit};

use super::error::{Result, SheetError};
use super::file_ops;
use super::kind::{CacheOrder, DateLayout, DateSheets, NavSheets, SheetKind};
use super::search::{self, Searchable};
use crate::reminder::{self, ReminderPattern};

pub struct SheetStore<K: SheetKind> {
    root: PathBuf,
    kind: K,
    sheets: Mutex<Vec<K::Sheet>>,
}

/// Date-keyed memory sheets, cached in ascending date order.
pub type MemorySheetStore = SheetStore<DateSheets>;
/// Title-keyed nav sheets, cached in insertion order.
pub type NavSheetStore = SheetStore<NavSheets>;

/// Where `key` sits in the cache: `Ok(index)` if cached, `Err(insert_at)` if not.
fn position<K: SheetKind>(sheets: &[K::Sheet], key: &K::Key) -> std::result::Result<usize, usize> {
    match K::ORDER {
        CacheOrder::Sorted => {
            let idx = sheets.partition_point(|s| K::key_of(s) < key);
            match sheets.get(idx) {
                Some(s) if K::key_of(s) == key => Ok(idx),
                _ => Err(idx),
            }
        }
        CacheOrder::Insertion => sheets
            .iter()
            .position(|s| K::key_of(s) == key)
            .ok_or(sheets.len()),
    }
}

/// Replace the cached text for `key`, or insert a new sheet where it belongs.
fn upsert<K: SheetKind>(sheets: &mut Vec<K::Sheet>, key: &K::Key, text: String) {
    match position::<K>(sheets, key) {
        Ok(idx) => K::set_text(&mut sheets[idx], text),
        Err(idx) => sheets.insert(idx, K::build(key.clone(), text)),
    }
}

impl<K: SheetKind> SheetStore<K> {
    /// Create a store with an empty cache. Call [`scan_all`](Self::scan_all) to fill it.
    pub fn with_kind(root: impl Into<PathBuf>, kind: K) -> Self {
        Self {
            root: root.into(),
            kind,
            sheets: Mutex::new(Vec::new()),
        }
    }

    /// Create a store and load every sheet under `root`.
    pub fn open(root: impl Into<PathBuf>, kind: K) -> Result<Self> {
        let store = Self::with_kind(root, kind);
        store.scan_all()?;
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.sheets.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn full_path(&self, key: &K::Key) -> Result<PathBuf> {
        Ok(self.root.join(self.kind.key_to_path(key)?))
    }

    /// Rebuild the cache from every sheet file under the root.
    ///
    /// Files that do not fit the filename grammar, or cannot be read, are logged
    /// and skipped. Failing to walk the root itself is an error.
    pub fn scan_all(&self) -> Result<usize> {
        let mut sheets = self.sheets.lock();

        let files = file_ops::list_sheets(&self.root, |rel| self.kind.descend(rel))
            .map_err(|e| SheetError::io(&self.root, e))?;

        let mut loaded = Vec::with_capacity(files.len());
        for file_path in files {
            let Some(rel_path) = file_ops::relative_path(&self.root, &file_path) else {
                continue;
            };
            let key = match self.kind.path_to_key(rel_path) {
                Ok(key) => key,
                Err(e) => {
                    log::warn!("{} Skipping {:?}: {}", K::LOG_TAG, file_path, e);
                    continue;
                }
            };
            match file_ops::read_sheet(&file_path) {
                Ok(Some(text)) => loaded.push(K::build(key, text)),
                Ok(None) => {}
                Err(e) => log::warn!("{} Skipping {:?}: {}", K::LOG_TAG, file_path, e),
            }
        }

        if K::ORDER == CacheOrder::Sorted {
            loaded.sort_by(|a, b| K::key_of(a).cmp(K::key_of(b)));
        }

        let count = loaded.len();
        *sheets = loaded;
        log::info!("{} Loaded {} sheets from {:?}", K::LOG_TAG, count, self.root);
        Ok(count)
    }

    /// Get a sheet, loading it from disk into the cache on a miss.
    pub fn get(&self, key: &K::Key) -> Result<K::Sheet> {
        let path = self.full_path(key)?;
        let mut sheets = self.sheets.lock();

        let insert_at = match position::<K>(&sheets, key) {
            Ok(idx) => return Ok(sheets[idx].clone()),
            Err(idx) => idx,
        };

        match file_ops::read_sheet(&path) {
            Ok(Some(text)) => {
                log::debug!("{} Lazy-loaded {} from {:?}", K::LOG_TAG, key, path);
                let sheet = K::build(key.clone(), text);
                sheets.insert(insert_at, sheet.clone());
                Ok(sheet)
            }
            Ok(None) => Err(SheetError::NotFound(key.to_string())),
            Err(e) => Err(SheetError::io(&path, e)),
        }
    }

    /// Whether a sheet exists in the cache or on disk. Never touches the cache.
    pub fn exists(&self, key: &K::Key) -> bool {
        let Ok(path) = self.full_path(key) else {
            return false;
        };
        let sheets = self.sheets.lock();
        position::<K>(&sheets, key).is_ok() || file_ops::sheet_exists(&path)
    }

    /// Write a new sheet. Fails with `AlreadyExists` if its file is present.
    pub fn create(&self, key: &K::Key, text: &str) -> Result<()> {
        let path = self.full_path(key)?;
        let mut sheets = self.sheets.lock();

        if file_ops::sheet_exists(&path) {
            return Err(SheetError::AlreadyExists(key.to_string()));
        }
        file_ops::write_atomic(&path, text).map_err(|e| SheetError::io(&path, e))?;
        upsert::<K>(&mut sheets, key, text.to_string());

        log::debug!("{} Created {}", K::LOG_TAG, key);
        Ok(())
    }

    /// Overwrite an existing sheet. Fails with `NotFound` if its file is missing.
    pub fn update(&self, key: &K::Key, text: &str) -> Result<()> {
        let path = self.full_path(key)?;
        let mut sheets = self.sheets.lock();

        if !file_ops::sheet_exists(&path) {
            return Err(SheetError::NotFound(key.to_string()));
        }
        file_ops::write_atomic(&path, text).map_err(|e| SheetError::io(&path, e))?;
        upsert::<K>(&mut sheets, key, text.to_string());

        log::debug!("{} Updated {}", K::LOG_TAG, key);
        Ok(())
    }

    /// Remove a sheet from disk and cache. Fails with `NotFound` if its file is missing.
    pub fn delete(&self, key: &K::Key) -> Result<()> {
        let path = self.full_path(key)?;
        let mut sheets = self.sheets.lock();

        if !file_ops::sheet_exists(&path) {
            return Err(SheetError::NotFound(key.to_string()));
        }
        file_ops::remove_sheet(&path).map_err(|e| SheetError::io(&path, e))?;
        if let Ok(idx) = position::<K>(&sheets, key) {
            sheets.remove(idx);
        }

        log::debug!("{} Deleted {}", K::LOG_TAG, key);
        Ok(())
    }

    /// Snapshot of every cached sheet, in cache order.
    pub fn list(&self) -> Vec<K::Sheet> {
        self.sheets.lock().clone()
    }
}

impl<K> SheetStore<K>
where
    K: SheetKind,
    K::Sheet: Searchable,
{
    /// Search a snapshot of the cache. The lock is released before matching starts.
    pub fn search(&self, query: &str) -> Result<Vec<SearchHit<K::Sheet>>> {
        let snapshot = self.list();
        search::search(snapshot, query)
    }
}

impl SheetStore<DateSheets> {
    pub fn open_dir(root: impl Into<PathBuf>, layout: DateLayout) -> Result<Self> {
        Self::open(root, DateSheets::new(layout))
    }

    /// Sheets that resurface on `today`, ascending by date.
    pub fn due_on(&self, today: NaiveDate, pattern: &ReminderPattern) -> Vec<MemorySheet> {
        self.sheets
            .lock()
            .iter()
            .filter(|sheet| reminder::is_due(sheet.date, today, pattern))
            .cloned()
            .collect()
    }

    /// A single sheet, only if it resurfaces on `today`.
    pub fn due_sheet(
        &self,
        date: NaiveDate,
        today: NaiveDate,
        pattern: &ReminderPattern,
    ) -> Result<MemorySheet> {
        if !reminder::is_due(date, today, pattern) {
            return Err(SheetError::NotFound(format!("{} is not due on {}", date, today)));
        }
        self.get(&date)
    }

    /// Cached sheets dated within `start..=end`, ascending.
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> Vec<MemorySheet> {
        let sheets = self.sheets.lock();
        let from = sheets.partition_point(|s| s.date < start);
        let to = sheets.partition_point(|s| s.date <= end);
        if from >= to {
            return Vec::new();
        }
        sheets[from..to].to_vec()
    }

    /// Write the sheet for the current local date.
    pub fn create_today(&self, text: &str) -> Result<NaiveDate> {
        let today = reminder::today();
        self.create(&today, text)?;
        Ok(today)
    }
}

impl SheetStore<NavSheets> {
    pub fn open_dir(root: impl Into<PathBuf>) -> Result<Self> {
        Self::open(root, NavSheets)
    }
}
