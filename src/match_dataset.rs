use std::collections::BTreeSet;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

pub const DATASET_PATH_ENV: &str = "WC_DATASET_PATH";
pub const DEFAULT_DATASET_PATH: &str = "data/worldcup_cleaned_updated.csv";

const REQUIRED_COLUMNS: [&str; 6] = [
    "year",
    "stage",
    "ft_total_goals",
    "ht_total_goals",
    "which_half_more_goals",
    "both_teams_to_score",
];

// Variant order is the alphabetical order of the labels, so derived `Ord`
// reports distributions the same way a sorted group-by would.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HalfWithMoreGoals {
    #[serde(rename = "Equal")]
    Equal,
    #[serde(rename = "First Half")]
    FirstHalf,
    #[serde(rename = "Second Half")]
    SecondHalf,
}

impl HalfWithMoreGoals {
    pub fn label(self) -> &'static str {
        match self {
            HalfWithMoreGoals::Equal => "Equal",
            HalfWithMoreGoals::FirstHalf => "First Half",
            HalfWithMoreGoals::SecondHalf => "Second Half",
        }
    }
}

impl fmt::Display for HalfWithMoreGoals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BothTeamsScored {
    No,
    Yes,
}

impl BothTeamsScored {
    pub fn label(self) -> &'static str {
        match self {
            BothTeamsScored::No => "No",
            BothTeamsScored::Yes => "Yes",
        }
    }
}

impl fmt::Display for BothTeamsScored {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One World Cup match. Extra CSV columns are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub year: u16,
    pub stage: String,
    pub ft_total_goals: u32,
    pub ht_total_goals: u32,
    pub which_half_more_goals: HalfWithMoreGoals,
    pub both_teams_to_score: BothTeamsScored,
}

/// Immutable match table plus the control seeds derived from it at load time.
#[derive(Debug, Clone)]
pub struct MatchDataset {
    matches: Vec<MatchRecord>,
    years: Vec<u16>,
    stages: Vec<String>,
}

impl MatchDataset {
    pub fn from_records(matches: Vec<MatchRecord>) -> Result<Self> {
        if matches.is_empty() {
            return Err(anyhow!("dataset has no matches"));
        }

        let years = matches
            .iter()
            .map(|m| m.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        // First-appearance order, the order the stage control lists them in.
        let mut stages: Vec<String> = Vec::new();
        for m in &matches {
            if !stages.iter().any(|s| s == &m.stage) {
                stages.push(m.stage.clone());
            }
        }

        Ok(Self {
            matches,
            years,
            stages,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open dataset {}", path.display()))?;
        Self::from_reader(file, &path.display().to_string())
    }

    /// Parses a headed CSV. Any malformed row fails the whole load.
    pub fn from_reader<R: Read>(reader: R, source: &str) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr
            .headers()
            .with_context(|| format!("{source}: failed to read header row"))?
            .clone();
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|col| !headers.iter().any(|h| h == *col))
            .collect();
        if !missing.is_empty() {
            return Err(anyhow!(
                "{source}: missing required column(s): {}",
                missing.join(", ")
            ));
        }

        let mut matches = Vec::new();
        for (idx, row) in rdr.deserialize::<MatchRecord>().enumerate() {
            // +2: one for the header, one for 1-based line numbers.
            let record =
                row.with_context(|| format!("{source}: malformed match on line {}", idx + 2))?;
            matches.push(record);
        }

        Self::from_records(matches).with_context(|| format!("{source}: unusable dataset"))
    }

    pub fn matches(&self) -> &[MatchRecord] {
        &self.matches
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Distinct years, ascending.
    pub fn years(&self) -> &[u16] {
        &self.years
    }

    pub fn year_bounds(&self) -> (u16, u16) {
        // `from_records` rejects empty tables, so both ends exist.
        let min = self.years.first().copied().unwrap_or_default();
        let max = self.years.last().copied().unwrap_or_default();
        (min, max)
    }

    pub fn stages(&self) -> &[String] {
        &self.stages
    }
}

pub fn default_dataset_path() -> PathBuf {
    match std::env::var(DATASET_PATH_ENV) {
        Ok(raw) if !raw.trim().is_empty() => PathBuf::from(raw.trim()),
        _ => PathBuf::from(DEFAULT_DATASET_PATH),
    }
}
