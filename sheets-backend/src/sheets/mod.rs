//! Sheet storage: one markdown file per sheet, cached in memory
//!
//! Memory sheets are keyed by date and resurface on a spaced-repetition
//! schedule; nav sheets are keyed by title and hold reference material.

pub mod error;
pub mod file_ops;
pub mod kind;
pub mod search;
pub mod store;

use chrono::NaiveDate;

pub use error::{Result, SheetError};
pub use kind::{CacheOrder, DateLayout, DateSheets, NavSheets, SheetKind};
pub use search::Searchable;
pub use store::{MemorySheetStore, NavSheetStore, SheetStore};

/// Parse a `YYYY-MM-DD` date as it appears in request paths.
pub fn parse_date_param(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), sheets_types::DATE_FORMAT)
        .map_err(|e| SheetError::InvalidFormat(format!("invalid date {:?}: {}", value, e)))
}
