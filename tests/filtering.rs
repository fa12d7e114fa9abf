use std::path::PathBuf;

use wc_goals_dashboard::filter::{StageFilter, YearRange, filter_matches};
use wc_goals_dashboard::match_dataset::MatchDataset;

fn load_fixture(name: &str) -> MatchDataset {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    MatchDataset::load(&path).expect("fixture dataset should load")
}

fn final_stage() -> StageFilter {
    StageFilter::Stage("Final".to_string())
}

#[test]
fn full_range_all_stages_keeps_every_match() {
    let ds = load_fixture("four_matches.csv");
    let subset = filter_matches(&ds, YearRange::new(2014, 2018), &StageFilter::All);
    assert_eq!(subset.len(), 4);
}

#[test]
fn stage_filter_restricts_to_matching_stage() {
    let ds = load_fixture("four_matches.csv");
    let subset = filter_matches(&ds, YearRange::full(&ds), &final_stage());
    assert_eq!(subset.len(), 2);
    assert!(subset.iter().all(|m| m.stage == "Final"));
}

#[test]
fn year_bounds_are_inclusive() {
    let ds = load_fixture("worldcup_sample.csv");
    let subset = filter_matches(&ds, YearRange::new(1934, 1938), &StageFilter::All);
    assert_eq!(subset.len(), 5);
    assert!(subset.iter().all(|m| (1934..=1938).contains(&m.year)));

    let finals = filter_matches(&ds, YearRange::new(1934, 1950), &final_stage());
    let years: Vec<u16> = finals.iter().map(|m| m.year).collect();
    assert_eq!(years, vec![1934, 1938, 1950]);
}

#[test]
fn single_year_window() {
    let ds = load_fixture("worldcup_sample.csv");
    let subset = filter_matches(&ds, YearRange::new(1950, 1950), &StageFilter::All);
    assert_eq!(subset.len(), 3);
}

#[test]
fn no_matches_yields_empty_subset() {
    let ds = load_fixture("worldcup_sample.csv");
    assert!(filter_matches(&ds, YearRange::new(1938, 1934), &StageFilter::All).is_empty());
    assert!(filter_matches(&ds, YearRange::new(1938, 1938), &StageFilter::Stage("Group".into())).is_empty());
}

#[test]
fn subset_keeps_dataset_order() {
    let ds = load_fixture("worldcup_sample.csv");
    let subset = filter_matches(&ds, YearRange::full(&ds), &StageFilter::Stage("Group".into()));
    let goals: Vec<u32> = subset.iter().map(|m| m.ft_total_goals).collect();
    assert_eq!(goals, vec![5, 1, 4, 1]);
}

#[test]
fn dataset_seeds_controls() {
    let ds = load_fixture("worldcup_sample.csv");
    assert_eq!(ds.years(), [1930, 1934, 1938, 1950]);
    assert_eq!(ds.year_bounds(), (1930, 1950));
    assert_eq!(
        ds.stages(),
        ["Group", "Semi-finals", "Final", "Round of 16", "Quarter-finals"]
    );
}

#[test]
fn malformed_datasets_fail_with_context() {
    let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    dir.push("tests");
    dir.push("fixtures");

    let err = MatchDataset::load(&dir.join("missing_column.csv")).unwrap_err();
    assert!(format!("{err:#}").contains("which_half_more_goals"));

    let err = MatchDataset::load(&dir.join("bad_goals.csv")).unwrap_err();
    assert!(format!("{err:#}").contains("line 3"));

    let err = MatchDataset::load(&dir.join("does_not_exist.csv")).unwrap_err();
    assert!(format!("{err:#}").contains("does_not_exist.csv"));
}
