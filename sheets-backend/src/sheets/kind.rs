//! Key types, filename codecs and cache ordering for the two sheet stores.
//!
//! A [`SheetKind`] tells [`SheetStore`](super::SheetStore) how a key maps to a
//! file under the store root and back, and how the in-memory cache is ordered.

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use sheets_types::{MemorySheet, NavSheet};

use super::error::{Result, SheetError};

pub const SHEET_EXTENSION: &str = ".md";

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

static NESTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})/([a-z]{3})-([1-9]\d?)\.md$").unwrap());
static FLAT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-([a-z]{3})-([1-9]\d?)\.md$").unwrap());
static YEAR_DIR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}$").unwrap());

/// How a store keeps its cache ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOrder {
    /// Ascending by key; lookups and inserts use binary search.
    Sorted,
    /// Insertion order; lookups scan, inserts append.
    Insertion,
}

pub trait SheetKind: Send + Sync {
    type Key: Clone + Ord + fmt::Display;
    type Sheet: Clone + Send;

    /// Log prefix, e.g. `[SHEETS]`.
    const LOG_TAG: &'static str;
    const ORDER: CacheOrder;

    /// File for `key`, relative to the store root.
    fn key_to_path(&self, key: &Self::Key) -> Result<PathBuf>;

    /// Inverse of [`key_to_path`](Self::key_to_path). Off-grammar paths are `InvalidFormat`.
    fn path_to_key(&self, rel_path: &Path) -> Result<Self::Key>;

    /// Whether a directory (relative to the root) can hold sheets of this kind.
    fn descend(&self, _rel_dir: &Path) -> bool {
        true
    }

    fn key_of(sheet: &Self::Sheet) -> &Self::Key;

    fn build(key: Self::Key, text: String) -> Self::Sheet;

    fn set_text(sheet: &mut Self::Sheet, text: String);
}

/// Join path components with '/', rejecting anything that is not a plain name.
fn slash_path(rel_path: &Path) -> Option<String> {
    let mut parts = Vec::new();
    for component in rel_path.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            _ => return None,
        }
    }
    Some(parts.join("/"))
}

// =====================================================
// Date-keyed memory sheets
// =====================================================

/// On-disk layout for date-keyed sheets. One layout is active per store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateLayout {
    /// `2025/jan-1.md`
    #[default]
    Nested,
    /// `2025-jan-1.md`
    Flat,
}

impl DateLayout {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "nested" => Some(DateLayout::Nested),
            "flat" => Some(DateLayout::Flat),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DateSheets {
    pub layout: DateLayout,
}

impl DateSheets {
    pub fn new(layout: DateLayout) -> Self {
        Self { layout }
    }
}

impl SheetKind for DateSheets {
    type Key = NaiveDate;
    type Sheet = MemorySheet;

    const LOG_TAG: &'static str = "[SHEETS]";
    const ORDER: CacheOrder = CacheOrder::Sorted;

    fn key_to_path(&self, date: &NaiveDate) -> Result<PathBuf> {
        let year = date.year();
        if !(0..=9999).contains(&year) {
            return Err(SheetError::InvalidFormat(format!(
                "year {} cannot be stored as a sheet",
                year
            )));
        }
        let month = MONTHS[date.month0() as usize];
        let day = date.day();
        let filename = match self.layout {
            DateLayout::Nested => format!("{:04}/{}-{}{}", year, month, day, SHEET_EXTENSION),
            DateLayout::Flat => format!("{:04}-{}-{}{}", year, month, day, SHEET_EXTENSION),
        };
        Ok(PathBuf::from(filename))
    }

    fn path_to_key(&self, rel_path: &Path) -> Result<NaiveDate> {
        let invalid = || {
            SheetError::InvalidFormat(format!(
                "{} is not a {:?} sheet filename",
                rel_path.display(),
                self.layout
            ))
        };
        let slashed = slash_path(rel_path).ok_or_else(invalid)?;
        let re = match self.layout {
            DateLayout::Nested => &*NESTED_RE,
            DateLayout::Flat => &*FLAT_RE,
        };
        let caps = re.captures(&slashed).ok_or_else(invalid)?;

        let year: i32 = caps[1].parse().map_err(|_| invalid())?;
        let month = MONTHS
            .iter()
            .position(|m| *m == &caps[2])
            .ok_or_else(invalid)? as u32
            + 1;
        let day: u32 = caps[3].parse().map_err(|_| invalid())?;

        NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
    }

    fn descend(&self, rel_dir: &Path) -> bool {
        match self.layout {
            DateLayout::Nested => slash_path(rel_dir)
                .map(|dir| YEAR_DIR_RE.is_match(&dir))
                .unwrap_or(false),
            DateLayout::Flat => false,
        }
    }

    fn key_of(sheet: &MemorySheet) -> &NaiveDate {
        &sheet.date
    }

    fn build(date: NaiveDate, text: String) -> MemorySheet {
        MemorySheet::new(date, text)
    }

    fn set_text(sheet: &mut MemorySheet, text: String) {
        sheet.text = text;
    }
}

// =====================================================
// Title-keyed nav sheets
// =====================================================

/// Check that a title is a relative `/`-separated path that stays inside the
/// store root and would be found again by a scan.
pub fn validate_title(title: &str) -> Result<()> {
    let invalid = |why: &str| SheetError::InvalidFormat(format!("title {:?} {}", title, why));

    if title.is_empty() {
        return Err(invalid("is empty"));
    }
    if title.contains('\\') || title.contains('\0') {
        return Err(invalid("contains a backslash or NUL"));
    }
    for part in title.split('/') {
        if part.is_empty() {
            return Err(invalid("has an empty path segment"));
        }
        if part.starts_with('.') {
            return Err(invalid("has a segment starting with '.'"));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct NavSheets;

impl SheetKind for NavSheets {
    type Key = String;
    type Sheet = NavSheet;

    const LOG_TAG: &'static str = "[NAV]";
    const ORDER: CacheOrder = CacheOrder::Insertion;

    fn key_to_path(&self, title: &String) -> Result<PathBuf> {
        validate_title(title)?;
        let mut path: PathBuf = title.split('/').collect();
        path.set_file_name(format!(
            "{}{}",
            title.rsplit('/').next().unwrap_or(title),
            SHEET_EXTENSION
        ));
        Ok(path)
    }

    fn path_to_key(&self, rel_path: &Path) -> Result<String> {
        let slashed = slash_path(rel_path).ok_or_else(|| {
            SheetError::InvalidFormat(format!("{} is not a nav sheet path", rel_path.display()))
        })?;
        let title = slashed.strip_suffix(SHEET_EXTENSION).ok_or_else(|| {
            SheetError::InvalidFormat(format!("{} is not a markdown file", rel_path.display()))
        })?;
        validate_title(title)?;
        Ok(title.to_string())
    }

    fn key_of(sheet: &NavSheet) -> &String {
        &sheet.title
    }

    fn build(title: String, text: String) -> NavSheet {
        NavSheet::new(title, text)
    }

    fn set_text(sheet: &mut NavSheet, text: String) {
        sheet.text = text;
    }
}
