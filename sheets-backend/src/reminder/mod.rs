//! Reminder scheduling: the interval pattern, the due-date predicate, and the
//! store that owns the live pattern.

pub mod pattern;
pub mod schedule;
pub mod store;

pub use pattern::{ReminderPattern, DEFAULT_PATTERN, MAX_SELECTABLE_DAY};
pub use schedule::{is_due, resurface_dates, today};
pub use store::PatternStore;
