pub mod champion_stats;
pub mod extract;
pub mod ranking;
pub mod role;
