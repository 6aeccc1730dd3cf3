//! Storage and scheduling engine for a spaced-repetition note journal.
//!
//! Date-keyed memory sheets resurface according to a [`ReminderPattern`];
//! title-keyed nav sheets hold reference notes. Both live as markdown files
//! on disk with an in-memory cache in front.

pub mod config;
pub mod reminder;
pub mod session;
pub mod sheets;

use std::sync::Arc;

use chrono::NaiveDate;
use sheets_types::{MemorySheet, NavSheet, SearchHit};

use config::Config;
use reminder::{PatternStore, ReminderPattern};
use session::FlashSession;
use sheets::{MemorySheetStore, NavSheetStore, Result};

/// Long-lived stores shared by every request handler.
pub struct AppState {
    pub config: Config,
    pub sheets: Arc<MemorySheetStore>,
    pub nav_sheets: Arc<NavSheetStore>,
    pub pattern: Arc<PatternStore>,
    pub session: Arc<FlashSession>,
}

/// Search results from both stores.
#[derive(Debug, Clone)]
pub struct SearchResults {
    pub sheets: Vec<SearchHit<MemorySheet>>,
    pub nav_sheets: Vec<SearchHit<NavSheet>>,
}

impl AppState {
    /// Open every store described by `config`.
    ///
    /// A pattern file that cannot be parsed is replaced by the default pattern
    /// (logged, and rewritten to disk). A sheet root that cannot be scanned is
    /// an error.
    pub fn bootstrap(config: Config) -> Result<Self> {
        let pattern = match PatternStore::open(&config.pattern_file) {
            Ok(store) => store,
            Err(e) => {
                log::warn!("[PATTERN] {}; falling back to the default pattern", e);
                let default = ReminderPattern::default();
                if let Err(save_err) = PatternStore::save(&config.pattern_file, &default) {
                    log::warn!(
                        "[PATTERN] Failed to save default pattern to {:?}: {}",
                        config.pattern_file,
                        save_err
                    );
                }
                PatternStore::new(&config.pattern_file, default)
            }
        };

        let sheets = MemorySheetStore::open_dir(&config.sheets_dir, config.layout)?;
        let nav_sheets = NavSheetStore::open_dir(&config.nav_dir)?;

        Ok(Self {
            config,
            sheets: Arc::new(sheets),
            nav_sheets: Arc::new(nav_sheets),
            pattern: Arc::new(pattern),
            session: Arc::new(FlashSession::new()),
        })
    }

    /// Memory sheets resurfacing on `today` under the current pattern.
    pub fn due_on(&self, today: NaiveDate) -> Vec<MemorySheet> {
        let pattern = self.pattern.get();
        self.sheets.due_on(today, &pattern)
    }

    /// Run one query against both stores, each from its own snapshot.
    pub fn search_all(&self, query: &str) -> Result<SearchResults> {
        Ok(SearchResults {
            sheets: self.sheets.search(query)?,
            nav_sheets: self.nav_sheets.search(query)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheets::DateLayout;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn test_config(root: &Path) -> Config {
        Config {
            sheets_dir: root.join("sheets"),
            nav_dir: root.join("sheets/nav"),
            pattern_file: root.join("pattern.json"),
            layout: DateLayout::Nested,
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_bootstrap_separates_nav_from_dated_sheets() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());
        fs::create_dir_all(config.sheets_dir.join("2025")).unwrap();
        fs::create_dir_all(&config.nav_dir).unwrap();
        fs::write(config.sheets_dir.join("2025/jan-1.md"), "dated").unwrap();
        fs::write(config.nav_dir.join("index.md"), "reference").unwrap();

        let state = AppState::bootstrap(config).unwrap();
        assert_eq!(state.sheets.len(), 1);
        assert_eq!(state.nav_sheets.len(), 1);
        assert_eq!(state.pattern.get(), ReminderPattern::default());
    }

    #[test]
    fn test_bootstrap_recovers_from_corrupt_pattern() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());
        fs::write(&config.pattern_file, "{ broken").unwrap();

        let state = AppState::bootstrap(config.clone()).unwrap();
        assert_eq!(state.pattern.get(), ReminderPattern::default());
        assert_eq!(PatternStore::load(&config.pattern_file).unwrap(), ReminderPattern::default());
    }

    #[test]
    fn test_bootstrap_fails_on_unreadable_root() {
        let dir = tempdir().unwrap();
        let mut config = test_config(dir.path());
        // A file where the sheets root directory should be
        fs::write(dir.path().join("not-a-dir"), "x").unwrap();
        config.sheets_dir = dir.path().join("not-a-dir");

        assert!(AppState::bootstrap(config).is_err());
    }

    #[test]
    fn test_due_on_uses_live_pattern() {
        let dir = tempdir().unwrap();
        let state = AppState::bootstrap(test_config(dir.path())).unwrap();
        state.sheets.create(&ymd(2025, 1, 1), "entry").unwrap();

        assert_eq!(state.due_on(ymd(2025, 1, 2)).len(), 1);
        state.pattern.replace(ReminderPattern::new(vec![3]).unwrap());
        assert!(state.due_on(ymd(2025, 1, 2)).is_empty());
        assert_eq!(state.due_on(ymd(2025, 1, 4)).len(), 1);
    }

    #[test]
    fn test_search_all() {
        let dir = tempdir().unwrap();
        let state = AppState::bootstrap(test_config(dir.path())).unwrap();
        state.sheets.create(&ymd(2025, 1, 1), "met Alice for coffee").unwrap();
        state.nav_sheets.create(&"people/alice".to_string(), "likes tea").unwrap();
        state.nav_sheets.create(&"people/bob".to_string(), "likes coffee").unwrap();

        let results = state.search_all("alice").unwrap();
        assert_eq!(results.sheets.len(), 1);
        assert_eq!(results.sheets[0].text, "met **Alice** for coffee");
        assert_eq!(results.nav_sheets.len(), 1);
        assert_eq!(results.nav_sheets[0].title, "people/**alice**");

        assert!(state.search_all("(").is_err());
    }
}
