use std::env;
use std::path::PathBuf;

use crate::sheets::DateLayout;

/// Environment variable names - single source of truth
pub mod env_vars {
    /// Root directory for date-keyed memory sheets.
    pub const SHEETS_DIR: &str = "SHEETS_DIR";
    /// Root directory for title-keyed nav sheets. Defaults to `<SHEETS_DIR>/nav`.
    pub const NAV_DIR: &str = "NAV_DIR";
    /// JSON document holding the reminder pattern.
    pub const PATTERN_FILE: &str = "PATTERN_FILE";
    /// `nested` (2025/jan-1.md) or `flat` (2025-jan-1.md).
    pub const SHEET_LAYOUT: &str = "SHEET_LAYOUT";
}

/// Default values
pub mod defaults {
    pub const SHEETS_DIR: &str = "sheets";
    pub const NAV_SUBDIR: &str = "nav";
    pub const PATTERN_FILE: &str = "pattern.json";
}

#[derive(Clone, Debug)]
pub struct Config {
    pub sheets_dir: PathBuf,
    pub nav_dir: PathBuf,
    pub pattern_file: PathBuf,
    pub layout: DateLayout,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from any variable source (the process environment in production).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let sheets_dir = PathBuf::from(
            var(env_vars::SHEETS_DIR).unwrap_or_else(|| defaults::SHEETS_DIR.to_string()),
        );
        let nav_dir = var(env_vars::NAV_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| sheets_dir.join(defaults::NAV_SUBDIR));
        let pattern_file = PathBuf::from(
            var(env_vars::PATTERN_FILE).unwrap_or_else(|| defaults::PATTERN_FILE.to_string()),
        );
        let layout = match var(env_vars::SHEET_LAYOUT) {
            Some(value) => DateLayout::parse(&value).unwrap_or_else(|| {
                log::warn!(
                    "Unknown {} {:?}, falling back to {:?}",
                    env_vars::SHEET_LAYOUT,
                    value,
                    DateLayout::default()
                );
                DateLayout::default()
            }),
            None => DateLayout::default(),
        };

        Self {
            sheets_dir,
            nav_dir,
            pattern_file,
            layout,
        }
    }
}

/// Create the sheet and nav directories if they don't exist.
/// Called at startup before the stores scan them.
pub fn initialize_dirs(config: &Config) -> std::io::Result<()> {
    for dir in [&config.sheets_dir, &config.nav_dir] {
        std::fs::create_dir_all(dir)?;
        log::info!("Using directory {:?}", dir);
    }
    Ok(())
}
