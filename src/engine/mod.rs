pub mod motivation;
pub mod planner;
pub mod rank;
pub mod stats;
pub mod study_guide;
pub mod topics;

pub use stats::UserStats;
