//! ReminderPattern: the interval ladder that drives resurfacing.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::sheets::{Result, SheetError};

/// Used when no pattern document exists yet.
pub const DEFAULT_PATTERN: [u32; 11] = [1, 1, 2, 3, 5, 8, 13, 21, 34, 55, 89];

/// Largest day offset the pattern editor offers.
pub const MAX_SELECTABLE_DAY: u32 = 200;

/// Day intervals between resurfacings: walked in order, then the last one
/// repeats forever. Never empty, never contains a zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct ReminderPattern(Vec<u32>);

impl ReminderPattern {
    pub fn new(intervals: Vec<u32>) -> Result<Self> {
        if intervals.is_empty() {
            return Err(SheetError::InvalidPattern(
                "reminder pattern must contain at least one interval".to_string(),
            ));
        }
        if let Some(pos) = intervals.iter().position(|&days| days == 0) {
            return Err(SheetError::InvalidPattern(format!(
                "reminder interval at position {} must be at least 1 day",
                pos
            )));
        }
        Ok(Self(intervals))
    }

    /// Build a pattern from the day numbers ticked in the pattern editor.
    ///
    /// Days outside `1..=MAX_SELECTABLE_DAY` are ignored; the rest are
    /// deduplicated and sorted ascending.
    pub fn from_selected_days<I>(days: I) -> Result<Self>
    where
        I: IntoIterator<Item = u32>,
    {
        let selected: BTreeSet<u32> = days
            .into_iter()
            .filter(|day| (1..=MAX_SELECTABLE_DAY).contains(day))
            .collect();
        Self::new(selected.into_iter().collect())
    }

    pub fn intervals(&self) -> &[u32] {
        &self.0
    }

    /// Interval used for the `step`-th advance.
    pub fn interval(&self, step: usize) -> u32 {
        self.0[step.min(self.0.len() - 1)]
    }

    /// The interval that repeats once the ladder is exhausted.
    pub fn plateau(&self) -> u32 {
        self.0[self.0.len() - 1]
    }
}

impl Default for ReminderPattern {
    fn default() -> Self {
        Self(DEFAULT_PATTERN.to_vec())
    }
}

impl TryFrom<Vec<u32>> for ReminderPattern {
    type Error = SheetError;

    fn try_from(intervals: Vec<u32>) -> Result<Self> {
        Self::new(intervals)
    }
}

impl From<ReminderPattern> for Vec<u32> {
    fn from(pattern: ReminderPattern) -> Self {
        pattern.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_and_zero() {
        assert!(matches!(ReminderPattern::new(vec![]), Err(SheetError::InvalidPattern(_))));
        assert!(matches!(
            ReminderPattern::new(vec![1, 0, 2]),
            Err(SheetError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_interval_plateaus_on_last_value() {
        let pattern = ReminderPattern::new(vec![1, 2, 4]).unwrap();
        let steps: Vec<u32> = (0..6).map(|s| pattern.interval(s)).collect();
        assert_eq!(steps, vec![1, 2, 4, 4, 4, 4]);
        assert_eq!(pattern.plateau(), 4);
    }

    #[test]
    fn test_from_selected_days() {
        let pattern = ReminderPattern::from_selected_days([30, 1, 7, 7, 0, 201, 3]).unwrap();
        assert_eq!(pattern.intervals(), &[1, 3, 7, 30]);
        assert!(ReminderPattern::from_selected_days([0, 500]).is_err());
    }

    #[test]
    fn test_json_round_trip_is_a_flat_array() {
        let pattern = ReminderPattern::new(vec![1, 1, 2]).unwrap();
        assert_eq!(serde_json::to_string(&pattern).unwrap(), "[1,1,2]");
        let parsed: ReminderPattern = serde_json::from_str("[2, 3]").unwrap();
        assert_eq!(parsed.intervals(), &[2, 3]);
    }

    #[test]
    fn test_json_rejects_invalid_patterns() {
        assert!(serde_json::from_str::<ReminderPattern>("[]").is_err());
        assert!(serde_json::from_str::<ReminderPattern>("[1, 0]").is_err());
        assert!(serde_json::from_str::<ReminderPattern>("[1, -2]").is_err());
        assert!(serde_json::from_str::<ReminderPattern>("{\"a\": 1}").is_err());
    }

    #[test]
    fn test_default_is_fibonacci_ladder() {
        assert_eq!(ReminderPattern::default().intervals(), &DEFAULT_PATTERN);
    }
}
