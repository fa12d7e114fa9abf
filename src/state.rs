use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::filter::{ALL_STAGES, StageFilter, YearRange, filter_matches};
use crate::goal_stats::{
    self, CategoryCounts, GoalHistogram, GoalPeriod, OverGoalsTable, YearlyAverage,
};
use crate::match_dataset::{BothTeamsScored, HalfWithMoreGoals, MatchDataset};

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub years: YearRange,
    pub stage: StageFilter,
}

impl FilterState {
    /// Full year range, every stage.
    pub fn default_for(dataset: &MatchDataset) -> Self {
        Self {
            years: YearRange::full(dataset),
            stage: StageFilter::All,
        }
    }
}

/// Everything the dashboard draws for one filter state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewModel {
    pub filter: FilterState,
    /// Zero means "no data" for this filter; every table below is then zero-filled.
    pub match_count: usize,
    pub ft_over_goals: OverGoalsTable,
    pub ht_over_goals: OverGoalsTable,
    pub ft_histogram: GoalHistogram,
    pub ht_histogram: GoalHistogram,
    pub which_half: CategoryCounts<HalfWithMoreGoals>,
    pub both_teams_score: CategoryCounts<BothTeamsScored>,
}

impl ViewModel {
    pub fn has_data(&self) -> bool {
        self.match_count > 0
    }
}

pub fn on_filter_changed(dataset: &MatchDataset, filter: &FilterState) -> ViewModel {
    let subset = filter_matches(dataset, filter.years, &filter.stage);
    ViewModel {
        filter: filter.clone(),
        match_count: subset.len(),
        ft_over_goals: goal_stats::over_goals(&subset, GoalPeriod::Fulltime),
        ht_over_goals: goal_stats::over_goals(&subset, GoalPeriod::Halftime),
        ft_histogram: goal_stats::goal_histogram(&subset, GoalPeriod::Fulltime),
        ht_histogram: goal_stats::goal_histogram(&subset, GoalPeriod::Halftime),
        which_half: goal_stats::which_half_more(&subset),
        both_teams_score: goal_stats::both_teams_score(&subset),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFocus {
    StartYear,
    EndYear,
    Stage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlEvent {
    SetYearRange { start: u16, end: u16 },
    /// Move the start handle by this many distinct-year steps.
    StepStart(i32),
    StepEnd(i32),
    SelectStage(String),
    CycleStage(i32),
    Reset,
}

#[derive(Debug, Clone)]
pub struct AppState {
    dataset: MatchDataset,
    pub stage_options: Vec<String>,
    pub filter: FilterState,
    pub default_filter: FilterState,
    pub view: ViewModel,
    pub default_view: ViewModel,
    pub overview: Vec<YearlyAverage>,
    pub focus: ControlFocus,
    pub help_overlay: bool,
    pub logs: VecDeque<String>,
}

impl AppState {
    pub fn new(dataset: MatchDataset) -> Self {
        let mut stage_options = Vec::with_capacity(dataset.stages().len() + 1);
        stage_options.push(ALL_STAGES.to_string());
        stage_options.extend(dataset.stages().iter().cloned());

        let default_filter = FilterState::default_for(&dataset);
        let default_view = on_filter_changed(&dataset, &default_filter);
        let overview = goal_stats::yearly_average_goals(&dataset);
        let (min_year, max_year) = dataset.year_bounds();

        let mut state = Self {
            stage_options,
            filter: default_filter.clone(),
            default_filter,
            view: default_view.clone(),
            default_view,
            overview,
            focus: ControlFocus::StartYear,
            help_overlay: false,
            logs: VecDeque::with_capacity(MAX_LOGS),
            dataset,
        };
        state.push_log(format!(
            "[INFO] Loaded {} matches, {}-{}, {} stages",
            state.dataset.len(),
            min_year,
            max_year,
            state.dataset.stages().len()
        ));
        state
    }

    pub fn dataset(&self) -> &MatchDataset {
        &self.dataset
    }

    pub fn years(&self) -> &[u16] {
        self.dataset.years()
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn cycle_focus_next(&mut self) {
        self.focus = match self.focus {
            ControlFocus::StartYear => ControlFocus::EndYear,
            ControlFocus::EndYear => ControlFocus::Stage,
            ControlFocus::Stage => ControlFocus::StartYear,
        };
    }

    pub fn cycle_focus_prev(&mut self) {
        self.focus = match self.focus {
            ControlFocus::StartYear => ControlFocus::Stage,
            ControlFocus::EndYear => ControlFocus::StartYear,
            ControlFocus::Stage => ControlFocus::EndYear,
        };
    }

    /// The event a left/right nudge on the focused control stands for.
    pub fn nudge_focused(&self, steps: i32) -> ControlEvent {
        match self.focus {
            ControlFocus::StartYear => ControlEvent::StepStart(steps),
            ControlFocus::EndYear => ControlEvent::StepEnd(steps),
            ControlFocus::Stage => ControlEvent::CycleStage(steps),
        }
    }

    fn year_index(&self, year: u16) -> Option<usize> {
        self.years().iter().position(|y| *y == year)
    }

    fn set_filter(&mut self, filter: FilterState) -> bool {
        if filter == self.filter {
            return false;
        }
        self.view = on_filter_changed(&self.dataset, &filter);
        self.filter = filter;
        true
    }
}

/// Applies one control change. Returns `true` when the view was recomputed;
/// rejected events leave the current view untouched.
pub fn apply_event(state: &mut AppState, event: ControlEvent) -> bool {
    match event {
        ControlEvent::SetYearRange { start, end } => {
            if start > end || state.year_index(start).is_none() || state.year_index(end).is_none()
            {
                state.push_log(format!("[WARN] Ignored year range {start}-{end}"));
                return false;
            }
            let filter = FilterState {
                years: YearRange::new(start, end),
                stage: state.filter.stage.clone(),
            };
            state.set_filter(filter)
        }
        ControlEvent::StepStart(steps) => {
            let years = state.years();
            let last = years.len().saturating_sub(1);
            let start_idx = state.year_index(state.filter.years.start).unwrap_or(0);
            let end_idx = state.year_index(state.filter.years.end).unwrap_or(last);
            let idx = step_index(start_idx, steps, 0, end_idx);
            let filter = FilterState {
                years: YearRange::new(years[idx], state.filter.years.end),
                stage: state.filter.stage.clone(),
            };
            state.set_filter(filter)
        }
        ControlEvent::StepEnd(steps) => {
            let years = state.years();
            let last = years.len().saturating_sub(1);
            let start_idx = state.year_index(state.filter.years.start).unwrap_or(0);
            let end_idx = state.year_index(state.filter.years.end).unwrap_or(last);
            let idx = step_index(end_idx, steps, start_idx, last);
            let filter = FilterState {
                years: YearRange::new(state.filter.years.start, years[idx]),
                stage: state.filter.stage.clone(),
            };
            state.set_filter(filter)
        }
        ControlEvent::SelectStage(raw) => {
            let Some(stage) = StageFilter::parse(&raw, state.dataset.stages()) else {
                state.push_log(format!("[WARN] Ignored unknown stage {raw:?}"));
                return false;
            };
            let filter = FilterState {
                years: state.filter.years,
                stage,
            };
            state.set_filter(filter)
        }
        ControlEvent::CycleStage(steps) => {
            let total = state.stage_options.len() as i64;
            let current = state
                .stage_options
                .iter()
                .position(|s| s == state.filter.stage.label())
                .unwrap_or(0) as i64;
            let next = (current + i64::from(steps)).rem_euclid(total) as usize;
            let raw = state.stage_options[next].clone();
            apply_event(state, ControlEvent::SelectStage(raw))
        }
        ControlEvent::Reset => {
            state.filter = state.default_filter.clone();
            state.view = state.default_view.clone();
            state.push_log("[INFO] Filters reset");
            true
        }
    }
}

fn step_index(current: usize, steps: i32, min: usize, max: usize) -> usize {
    let moved = current as i64 + i64::from(steps);
    moved.clamp(min as i64, max as i64) as usize
}
