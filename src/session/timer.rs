use std::time::{Duration, Instant};

use crate::session::question::{Difficulty, Question};

/// Countdown for one question. Expiry has no effect on the session.
#[derive(Clone, Debug)]
pub struct QuestionTimer {
    pub duration: Duration,
    started_at: Instant,
    stopped_at: Option<Instant>,
}

impl QuestionTimer {
    pub fn start(duration: Duration, now: Instant) -> Self {
        Self {
            duration,
            started_at: now,
            stopped_at: None,
        }
    }

    pub fn for_question(question: &Question, now: Instant) -> Self {
        Self::start(duration_for(question), now)
    }

    pub fn stop(&mut self, now: Instant) {
        if self.stopped_at.is_none() {
            self.stopped_at = Some(now);
        }
    }

    pub fn is_running(&self) -> bool {
        self.stopped_at.is_none()
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        let end = self.stopped_at.unwrap_or(now);
        end.saturating_duration_since(self.started_at)
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.duration.saturating_sub(self.elapsed(now))
    }

    pub fn expired(&self, now: Instant) -> bool {
        self.remaining(now).is_zero()
    }

    /// Fraction of time left, 1.0 at start.
    pub fn ratio_left(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 0.0;
        }
        self.remaining(now).as_secs_f64() / self.duration.as_secs_f64()
    }
}

/// Word problems and number work get two minutes, everything else scales
/// with difficulty.
pub fn duration_for(question: &Question) -> Duration {
    let topic = question.topic.to_lowercase();
    if topic.contains("redactie") || topic.contains("reken") || topic.contains("cijfer") {
        return Duration::from_secs(120);
    }
    match question.difficulty {
        Difficulty::Easy => Duration::from_secs(45),
        Difficulty::Medium => Duration::from_secs(60),
        Difficulty::Hard => Duration::from_secs(90),
    }
}
