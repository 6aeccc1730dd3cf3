//! Shared record types for the memory-sheets engine and the layers that render it.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Format used for dates in URLs and on screen.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// =====================================================
// Records
// =====================================================

/// A date-keyed journal entry. One per calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemorySheet {
    pub date: NaiveDate,
    /// Cached from `date`, kept for display and filename reconstruction.
    pub year: i32,
    pub text: String,
}

impl MemorySheet {
    pub fn new(date: NaiveDate, text: impl Into<String>) -> Self {
        Self {
            date,
            year: date.year(),
            text: text.into(),
        }
    }

    /// `YYYY-MM-DD`
    pub fn display_date(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

/// A title-keyed reference note. Titles may contain `/` to nest notes in folders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavSheet {
    pub title: String,
    pub text: String,
}

impl NavSheet {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
        }
    }
}

// =====================================================
// Search
// =====================================================

/// One search result: the untouched source record plus highlighted copies of
/// its title and body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit<S> {
    pub sheet: S,
    pub title: String,
    pub text: String,
}
