pub mod capacity;
pub mod compass;
pub mod memory;
pub mod speed_math;

use std::time::{Duration, Instant};

/// Delay before a correctly answered problem is replaced.
pub const AUTO_ADVANCE: Duration = Duration::from_secs(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Incorrect,
}

/// True once the auto-advance delay after a correct answer has passed.
pub(crate) fn advance_due(correct_at: Option<Instant>, now: Instant) -> bool {
    correct_at.is_some_and(|at| now.saturating_duration_since(at) >= AUTO_ADVANCE)
}
