use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use wc_goals_dashboard::filter::{StageFilter, YearRange};
use wc_goals_dashboard::goal_stats::{GoalPeriod, goal_histogram, over_goals, yearly_average_goals};
use wc_goals_dashboard::match_dataset::{
    BothTeamsScored, HalfWithMoreGoals, MatchDataset, MatchRecord,
};
use wc_goals_dashboard::state::{AppState, ControlEvent, FilterState, apply_event, on_filter_changed};

const STAGES: [&str; 6] = [
    "Group",
    "Round of 16",
    "Quarter-finals",
    "Semi-finals",
    "Third place",
    "Final",
];

// Roughly every World Cup match ever played, with deterministic pseudo-random goals.
fn sample_dataset() -> MatchDataset {
    let mut records = Vec::with_capacity(964);
    let mut seed: u32 = 17;
    let years = (1930u16..=2022).step_by(4).filter(|y| *y != 1942 && *y != 1946);
    for year in years {
        for idx in 0..44 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let ft = (seed >> 16) % 8;
            let ht = ft.min((seed >> 8) % 4);
            let half = match (ht * 2).cmp(&ft) {
                std::cmp::Ordering::Greater => HalfWithMoreGoals::FirstHalf,
                std::cmp::Ordering::Less => HalfWithMoreGoals::SecondHalf,
                std::cmp::Ordering::Equal => HalfWithMoreGoals::Equal,
            };
            records.push(MatchRecord {
                year,
                stage: STAGES[idx % STAGES.len()].to_string(),
                ft_total_goals: ft,
                ht_total_goals: ht,
                which_half_more_goals: half,
                both_teams_to_score: if (seed >> 4) % 2 == 0 {
                    BothTeamsScored::Yes
                } else {
                    BothTeamsScored::No
                },
            });
        }
    }
    MatchDataset::from_records(records).expect("sample dataset is non-empty")
}

fn bench_on_filter_changed(c: &mut Criterion) {
    let dataset = sample_dataset();
    let filter = FilterState {
        years: YearRange::new(1970, 2014),
        stage: StageFilter::Stage("Group".to_string()),
    };
    c.bench_function("on_filter_changed", |b| {
        b.iter(|| {
            let view = on_filter_changed(black_box(&dataset), black_box(&filter));
            black_box(view.match_count);
        })
    });
}

fn bench_over_goals_and_histogram(c: &mut Criterion) {
    let dataset = sample_dataset();
    let subset: Vec<&MatchRecord> = dataset.matches().iter().collect();
    c.bench_function("over_goals_full", |b| {
        b.iter(|| black_box(over_goals(black_box(&subset), GoalPeriod::Fulltime)))
    });
    c.bench_function("goal_histogram_full", |b| {
        b.iter(|| black_box(goal_histogram(black_box(&subset), GoalPeriod::Halftime)))
    });
}

fn bench_overview(c: &mut Criterion) {
    let dataset = sample_dataset();
    c.bench_function("yearly_average_goals", |b| {
        b.iter(|| black_box(yearly_average_goals(black_box(&dataset))))
    });
}

fn bench_event_sweep(c: &mut Criterion) {
    let dataset = sample_dataset();
    c.bench_function("apply_event_sweep", |b| {
        b.iter(|| {
            let mut state = AppState::new(dataset.clone());
            for _ in 0..6 {
                apply_event(&mut state, ControlEvent::StepStart(1));
                apply_event(&mut state, ControlEvent::CycleStage(1));
            }
            apply_event(&mut state, ControlEvent::Reset);
            black_box(state.view.match_count);
        })
    });
}

criterion_group!(
    benches,
    bench_on_filter_changed,
    bench_over_goals_and_histogram,
    bench_overview,
    bench_event_sweep
);
criterion_main!(benches);
