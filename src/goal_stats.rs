use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::match_dataset::{BothTeamsScored, HalfWithMoreGoals, MatchDataset, MatchRecord};

pub const OVER_THRESHOLDS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoalPeriod {
    Fulltime,
    Halftime,
}

impl GoalPeriod {
    pub fn goals(self, m: &MatchRecord) -> u32 {
        match self {
            GoalPeriod::Fulltime => m.ft_total_goals,
            GoalPeriod::Halftime => m.ht_total_goals,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GoalPeriod::Fulltime => "Fulltime",
            GoalPeriod::Halftime => "Halftime",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverGoalsRow {
    /// "Over 0.5" .. "Over 4.5".
    pub label: String,
    pub threshold: u32,
    /// Share of matches with strictly more than `threshold` goals, 3 decimals.
    pub proportion: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverGoalsTable {
    pub period: GoalPeriod,
    pub rows: [OverGoalsRow; OVER_THRESHOLDS],
}

impl OverGoalsTable {
    pub fn proportions(&self) -> [f64; OVER_THRESHOLDS] {
        std::array::from_fn(|idx| self.rows[idx].proportion)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramBucket {
    pub goals: u32,
    pub matches: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalHistogram {
    pub period: GoalPeriod,
    /// Strictly increasing in `goals`, always starting at 0.
    pub buckets: Vec<HistogramBucket>,
}

impl GoalHistogram {
    pub fn max_count(&self) -> usize {
        self.buckets.iter().map(|b| b.matches).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts<T> {
    pub counts: Vec<(T, usize)>,
}

impl<T: Copy> CategoryCounts<T> {
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, n)| n).sum()
    }

    /// Fraction of the ring each category takes. Empty when there is nothing to show.
    pub fn shares(&self) -> Vec<(T, f64)> {
        let total = self.total();
        if total == 0 {
            return Vec::new();
        }
        self.counts
            .iter()
            .map(|(cat, n)| (*cat, *n as f64 / total as f64))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearlyAverage {
    pub year: u16,
    pub matches: usize,
    pub avg_ft_goals: f64,
    pub avg_ht_goals: f64,
}

/// Cumulative "over N.5" table for `period`.
///
/// An empty subset yields all-zero proportions; callers that need to tell
/// "no matches" apart from "no goals" look at the subset size.
pub fn over_goals(subset: &[&MatchRecord], period: GoalPeriod) -> OverGoalsTable {
    let by_goals = goal_counts(subset, period);
    let total = subset.len();

    let rows = std::array::from_fn(|idx| {
        let threshold = idx as u32;
        let above: usize = by_goals.range(threshold + 1..).map(|(_, n)| n).sum();
        let proportion = if total == 0 {
            0.0
        } else {
            round3(above as f64 / total as f64)
        };
        OverGoalsRow {
            label: format!("Over {threshold}.5"),
            threshold,
            proportion,
        }
    });

    OverGoalsTable { period, rows }
}

/// Goal-count histogram for `period`, padded so the first bucket is 0 goals.
pub fn goal_histogram(subset: &[&MatchRecord], period: GoalPeriod) -> GoalHistogram {
    let by_goals = goal_counts(subset, period);

    let mut buckets = Vec::with_capacity(by_goals.len() + 1);
    if by_goals.keys().next() != Some(&0) {
        buckets.push(HistogramBucket {
            goals: 0,
            matches: 0,
        });
    }
    buckets.extend(
        by_goals
            .into_iter()
            .map(|(goals, matches)| HistogramBucket { goals, matches }),
    );

    GoalHistogram { period, buckets }
}

pub fn which_half_more(subset: &[&MatchRecord]) -> CategoryCounts<HalfWithMoreGoals> {
    count_by(subset, |m| m.which_half_more_goals)
}

pub fn both_teams_score(subset: &[&MatchRecord]) -> CategoryCounts<BothTeamsScored> {
    count_by(subset, |m| m.both_teams_to_score)
}

/// Average fulltime and halftime goals per game for every year of the full dataset.
pub fn yearly_average_goals(dataset: &MatchDataset) -> Vec<YearlyAverage> {
    let mut per_year: BTreeMap<u16, (u64, u64, usize)> = BTreeMap::new();
    for m in dataset.matches() {
        let entry = per_year.entry(m.year).or_insert((0, 0, 0));
        entry.0 += u64::from(m.ft_total_goals);
        entry.1 += u64::from(m.ht_total_goals);
        entry.2 += 1;
    }

    per_year
        .into_iter()
        .map(|(year, (ft, ht, n))| YearlyAverage {
            year,
            matches: n,
            avg_ft_goals: ft as f64 / n as f64,
            avg_ht_goals: ht as f64 / n as f64,
        })
        .collect()
}

fn goal_counts(subset: &[&MatchRecord], period: GoalPeriod) -> BTreeMap<u32, usize> {
    let mut counts = BTreeMap::new();
    for m in subset {
        *counts.entry(period.goals(m)).or_insert(0) += 1;
    }
    counts
}

fn count_by<T, F>(subset: &[&MatchRecord], key: F) -> CategoryCounts<T>
where
    T: Ord + Copy,
    F: Fn(&MatchRecord) -> T,
{
    let mut counts: BTreeMap<T, usize> = BTreeMap::new();
    for m in subset {
        *counts.entry(key(m)).or_insert(0) += 1;
    }
    CategoryCounts {
        counts: counts.into_iter().collect(),
    }
}

// Half-to-even on the scaled value, so 0.0625 reports as 0.062.
fn round3(value: f64) -> f64 {
    (value * 1000.0).round_ties_even() / 1000.0
}
