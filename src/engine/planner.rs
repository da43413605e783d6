use std::collections::BTreeSet;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::session::result::SessionResult;

pub const DEFAULT_TARGET_QUESTIONS: u32 = 2000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyPlan {
    pub exam_date: Option<NaiveDate>,
    pub target_questions: u32,
    pub start_date: NaiveDate,
}

impl StudyPlan {
    pub fn starting(today: NaiveDate) -> Self {
        Self {
            exam_date: None,
            target_questions: DEFAULT_TARGET_QUESTIONS,
            start_date: today,
        }
    }

    pub fn days_left(&self, today: NaiveDate) -> Option<i64> {
        self.exam_date.map(|exam| (exam - today).num_days())
    }

    pub fn questions_remaining(&self, done: u32) -> u32 {
        self.target_questions.saturating_sub(done)
    }

    /// Questions per day needed to hit the target, 0 once the exam passed.
    pub fn daily_goal(&self, done: u32, today: NaiveDate) -> u32 {
        match self.days_left(today) {
            Some(days) if days > 0 => {
                let remaining = self.questions_remaining(done) as i64;
                ((remaining + days - 1) / days) as u32
            }
            _ => 0,
        }
    }

    pub fn percent_done(&self, done: u32) -> u32 {
        if self.target_questions == 0 {
            return 100;
        }
        let pct = (done as f64 / self.target_questions as f64 * 100.0).round() as u32;
        pct.min(100)
    }

    /// `done >= target * elapsed / total`, with elapsed clamped to the plan
    /// window. A plan without a positive window is on track only once the
    /// target is reached. `None` without an exam date.
    pub fn on_track(&self, done: u32, today: NaiveDate) -> Option<bool> {
        let exam = self.exam_date?;
        let total_days = (exam - self.start_date).num_days();
        if total_days <= 0 {
            return Some(done >= self.target_questions);
        }
        let elapsed = (today - self.start_date).num_days().clamp(0, total_days);
        let expected = self.target_questions as f64 * (elapsed as f64 / total_days as f64);
        Some(done as f64 >= expected)
    }
}

/// Nudge shown on the home screen when an exam is planned and no session
/// was finished today.
pub fn reminder(plan: &StudyPlan, last_session: Option<NaiveDate>, today: NaiveDate) -> Option<&'static str> {
    plan.exam_date?;
    if last_session == Some(today) {
        return None;
    }
    Some("You have not trained today! Stay on schedule for your exam.")
}

/// Days of the given month with at least one finished session.
pub fn active_days(history: &[SessionResult], year: i32, month: u32) -> BTreeSet<u32> {
    history
        .iter()
        .map(|r| r.date.with_timezone(&Local).date_naive())
        .filter(|d| d.year() == year && d.month() == month)
        .map(|d| d.day())
        .collect()
}

/// Leading blank cells for a Monday-first calendar and the number of days.
pub fn month_grid(year: i32, month: u32) -> (u32, u32) {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return (0, 0);
    };
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let days = next_month
        .map(|n| (n - first).num_days() as u32)
        .unwrap_or(31);
    (first.weekday().num_days_from_monday(), days)
}
