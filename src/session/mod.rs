pub mod practice;
pub mod stats_tracker;

pub use practice::PracticeSession;
pub use stats_tracker::StatsTracker;
