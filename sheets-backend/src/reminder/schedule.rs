//! Spaced-repetition scheduling.
//!
//! An entry resurfaces on the dates reached by adding the pattern's intervals
//! to its date one after another; once the pattern runs out its last interval
//! keeps repeating. An entry is never due on its own date.

use chrono::{Days, Local, NaiveDate};

use super::pattern::ReminderPattern;

/// Today's local calendar date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Whether an entry written on `entry_date` resurfaces on `today`.
pub fn is_due(entry_date: NaiveDate, today: NaiveDate, pattern: &ReminderPattern) -> bool {
    if today <= entry_date {
        return false;
    }
    let target = (today - entry_date).num_days();

    let mut offset: i64 = 0;
    for &interval in pattern.intervals() {
        offset += i64::from(interval);
        if offset == target {
            return true;
        }
        if offset > target {
            return false;
        }
    }

    // Past the ramp: every further advance adds the plateau interval.
    (target - offset) % i64::from(pattern.plateau()) == 0
}

/// Every date the entry resurfaces on, in order. Endless unless the calendar runs out.
pub fn resurface_dates(
    entry_date: NaiveDate,
    pattern: &ReminderPattern,
) -> impl Iterator<Item = NaiveDate> + '_ {
    let mut step = 0;
    let mut date = entry_date;
    std::iter::from_fn(move || {
        let next = date.checked_add_days(Days::new(u64::from(pattern.interval(step))))?;
        step += 1;
        date = next;
        Some(next)
    })
}
