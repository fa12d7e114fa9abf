use std::fmt;

use serde::{Deserialize, Serialize};

use crate::match_dataset::{MatchDataset, MatchRecord};

pub const ALL_STAGES: &str = "All";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StageFilter {
    All,
    Stage(String),
}

impl StageFilter {
    /// Accepts the "All" sentinel or one of `known`; anything else is an invalid selection.
    pub fn parse(raw: &str, known: &[String]) -> Option<Self> {
        let raw = raw.trim();
        if raw == ALL_STAGES {
            return Some(StageFilter::All);
        }
        known
            .iter()
            .find(|s| s.as_str() == raw)
            .map(|s| StageFilter::Stage(s.clone()))
    }

    pub fn label(&self) -> &str {
        match self {
            StageFilter::All => ALL_STAGES,
            StageFilter::Stage(name) => name,
        }
    }

    pub fn accepts(&self, stage: &str) -> bool {
        match self {
            StageFilter::All => true,
            StageFilter::Stage(name) => name == stage,
        }
    }
}

impl fmt::Display for StageFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inclusive year window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearRange {
    pub start: u16,
    pub end: u16,
}

impl YearRange {
    pub fn new(start: u16, end: u16) -> Self {
        Self { start, end }
    }

    pub fn full(dataset: &MatchDataset) -> Self {
        let (start, end) = dataset.year_bounds();
        Self { start, end }
    }

    pub fn contains(&self, year: u16) -> bool {
        year >= self.start && year <= self.end
    }
}

/// Records in `years` (inclusive) whose stage passes `stage`, in dataset order.
/// No clamping: an inverted range simply matches nothing.
pub fn filter_matches<'a>(
    dataset: &'a MatchDataset,
    years: YearRange,
    stage: &StageFilter,
) -> Vec<&'a MatchRecord> {
    dataset
        .matches()
        .iter()
        .filter(|m| years.contains(m.year))
        .filter(|m| stage.accepts(&m.stage))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_sentinel_and_known_only() {
        let known = vec!["Group".to_string(), "Final".to_string()];
        assert_eq!(StageFilter::parse("All", &known), Some(StageFilter::All));
        assert_eq!(
            StageFilter::parse(" Final ", &known),
            Some(StageFilter::Stage("Final".to_string()))
        );
        assert_eq!(StageFilter::parse("final", &known), None);
        assert_eq!(StageFilter::parse("Quarter-finals", &known), None);
    }

    #[test]
    fn year_range_is_inclusive() {
        let range = YearRange::new(1954, 1958);
        assert!(range.contains(1954));
        assert!(range.contains(1958));
        assert!(!range.contains(1950));
        assert!(!range.contains(1962));
    }
}
