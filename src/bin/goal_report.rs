use std::path::PathBuf;

use anyhow::{Context, Result};

use wc_goals_dashboard::goal_stats::{CategoryCounts, GoalHistogram, OverGoalsTable};
use wc_goals_dashboard::match_dataset::{MatchDataset, default_dataset_path};
use wc_goals_dashboard::state::{AppState, ControlEvent, ViewModel, apply_event};

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let path = arg_value(&args, "--data")
        .map(PathBuf::from)
        .unwrap_or_else(default_dataset_path);
    let dataset = MatchDataset::load(&path)?;
    let mut state = AppState::new(dataset);

    let from = arg_value(&args, "--from")
        .map(|raw| raw.trim().parse::<u16>().context("--from must be a year"))
        .transpose()?;
    let to = arg_value(&args, "--to")
        .map(|raw| raw.trim().parse::<u16>().context("--to must be a year"))
        .transpose()?;
    if from.is_some() || to.is_some() {
        let start = from.unwrap_or(state.filter.years.start);
        let end = to.unwrap_or(state.filter.years.end);
        apply_event(&mut state, ControlEvent::SetYearRange { start, end });
    }
    if let Some(stage) = arg_value(&args, "--stage") {
        apply_event(&mut state, ControlEvent::SelectStage(stage));
    }

    // Rejected controls leave the previous view in place; surface why on stderr.
    for line in state.logs.iter().filter(|l| l.starts_with("[WARN]")) {
        eprintln!("{line}");
    }

    if args.iter().any(|a| a == "--json") {
        let json = serde_json::to_string_pretty(&state.view).context("serialize view model")?;
        println!("{json}");
    } else {
        print_report(&state.view);
    }

    Ok(())
}

fn print_report(view: &ViewModel) {
    let filter = &view.filter;
    println!(
        "World Cup goals {}-{} | stage: {} | matches: {}",
        filter.years.start, filter.years.end, filter.stage, view.match_count
    );
    if !view.has_data() {
        println!("No matches for this filter");
        return;
    }

    print_over_goals(&view.ft_over_goals);
    print_over_goals(&view.ht_over_goals);
    print_histogram(&view.ft_histogram);
    print_histogram(&view.ht_histogram);
    print_categories("Which half has more goals?", &view.which_half);
    print_categories("Both teams to score?", &view.both_teams_score);
}

fn print_over_goals(table: &OverGoalsTable) {
    println!();
    println!("{} total goals", table.period.label());
    for row in &table.rows {
        println!("  {:<10} {:.3}", row.label, row.proportion);
    }
}

fn print_histogram(hist: &GoalHistogram) {
    println!();
    println!("{} goal histogram", hist.period.label());
    for bucket in &hist.buckets {
        println!("  {:>2} goals: {}", bucket.goals, bucket.matches);
    }
}

fn print_categories<T: Copy + std::fmt::Display>(title: &str, counts: &CategoryCounts<T>) {
    println!();
    println!("{title}");
    for ((cat, share), (_, n)) in counts.shares().into_iter().zip(&counts.counts) {
        println!("  {:<12} {:>5} ({:.1}%)", cat.to_string(), n, share * 100.0);
    }
}

fn arg_value(args: &[String], name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == name {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(next.clone());
            }
        }
    }
    None
}
