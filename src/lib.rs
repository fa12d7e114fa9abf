pub mod filter;
pub mod goal_stats;
pub mod match_dataset;
pub mod state;
