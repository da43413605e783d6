use chrono::{DateTime, Utc};

use crate::engine::UserStats;
use crate::session::question::{Question, SavedQuestion};
use crate::session::result::{SessionMode, SessionResult};

/// Outcome of moving past the current question.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    Next,
    Finished,
}

#[derive(Clone, Debug, PartialEq)]
pub struct QuizSession {
    pub topic: String,
    pub math_mode: bool,
    pub queue: Vec<Question>,
    pub index: usize,
    pub score: u32,
    pub total: u32,
    pub user_answer: Option<String>,
    pub answered: bool,
    pub time_spent_secs: f64,
}

impl QuizSession {
    pub fn new(topic: &str, math_mode: bool, queue: Vec<Question>) -> Self {
        Self {
            topic: topic.to_string(),
            math_mode,
            queue,
            index: 0,
            score: 0,
            total: 0,
            user_answer: None,
            answered: false,
            time_spent_secs: 0.0,
        }
    }

    pub fn current(&self) -> Option<&Question> {
        self.queue.get(self.index)
    }

    /// Record an answer for the current question.
    ///
    /// Returns `None` when the question was already answered or there is no
    /// current question; nothing is touched in that case. Otherwise the
    /// session counters, the lifetime stats and the saved list are all
    /// updated before returning whether the answer was correct.
    pub fn answer(
        &mut self,
        label: &str,
        time_spent: f64,
        stats: &mut UserStats,
        saved: &mut Vec<SavedQuestion>,
    ) -> Option<bool> {
        if self.answered {
            return None;
        }
        let question = self.queue.get(self.index)?;
        let correct = question.is_correct(label);

        saved.insert(0, SavedQuestion::answered(question, label));
        stats.record_answer(question, correct, time_spent);

        self.user_answer = Some(label.to_string());
        self.answered = true;
        self.total += 1;
        if correct {
            self.score += 1;
        }
        self.time_spent_secs += time_spent.max(0.0);
        Some(correct)
    }

    /// Move to the next question, clearing per-question answer state.
    pub fn advance(&mut self) -> Advance {
        if self.index + 1 < self.queue.len() {
            self.index += 1;
            self.user_answer = None;
            self.answered = false;
            Advance::Next
        } else {
            Advance::Finished
        }
    }

    /// Summarise the session for the history, if anything was answered.
    pub fn result(&self, date: DateTime<Utc>) -> Option<SessionResult> {
        if self.queue.is_empty() || self.total == 0 {
            return None;
        }
        Some(SessionResult {
            date,
            topic: self.topic.clone(),
            score: self.score,
            total: self.total,
            average_time: self.time_spent_secs / self.total as f64,
            mode: SessionMode::from_math_mode(self.math_mode),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::question::{Difficulty, sample_question};

    fn batch(n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| {
                let d = Difficulty::ALL[i % 3];
                sample_question("Analogieën", d, "B")
            })
            .collect()
    }

    #[test]
    fn test_answer_updates_session_and_stats() {
        let mut quiz = QuizSession::new("Analogieën", false, batch(3));
        let mut stats = UserStats::default();
        let mut saved = Vec::new();

        assert_eq!(quiz.answer("B", 5.0, &mut stats, &mut saved), Some(true));
        assert_eq!(quiz.score, 1);
        assert_eq!(quiz.total, 1);
        assert_eq!(stats.total_questions, 1);
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].user_answer.as_deref(), Some("B"));
    }

    #[test]
    fn test_second_answer_is_noop() {
        let mut quiz = QuizSession::new("Analogieën", false, batch(3));
        let mut stats = UserStats::default();
        let mut saved = Vec::new();

        quiz.answer("A", 1.0, &mut stats, &mut saved);
        let before = (quiz.score, quiz.total, saved.len(), stats.clone());
        assert_eq!(quiz.answer("B", 1.0, &mut stats, &mut saved), None);
        assert_eq!((quiz.score, quiz.total, saved.len(), stats), before);
        assert_eq!(quiz.user_answer.as_deref(), Some("A"));
    }

    #[test]
    fn test_saved_list_is_most_recent_first() {
        let mut queue = batch(2);
        queue[1].question = "Cirkel staat tot Bol als Vierkant staat tot ...".to_string();
        let mut quiz = QuizSession::new("Analogieën", false, queue);
        let mut stats = UserStats::default();
        let mut saved = Vec::new();

        quiz.answer("B", 1.0, &mut stats, &mut saved);
        quiz.advance();
        quiz.answer("C", 1.0, &mut stats, &mut saved);
        assert!(saved[0].question.question.starts_with("Cirkel"));
    }

    #[test]
    fn test_answer_without_question_is_noop() {
        let mut quiz = QuizSession::new("Analogieën", false, Vec::new());
        let mut stats = UserStats::default();
        let mut saved = Vec::new();
        assert_eq!(quiz.answer("A", 1.0, &mut stats, &mut saved), None);
        assert_eq!(stats.total_questions, 0);
        assert!(saved.is_empty());
    }

    #[test]
    fn test_advance_clears_answer_state_then_finishes() {
        let mut quiz = QuizSession::new("Analogieën", false, batch(2));
        let mut stats = UserStats::default();
        let mut saved = Vec::new();
        quiz.answer("B", 1.0, &mut stats, &mut saved);

        assert_eq!(quiz.advance(), Advance::Next);
        assert_eq!(quiz.index, 1);
        assert!(!quiz.answered);
        assert!(quiz.user_answer.is_none());
        assert_eq!(quiz.advance(), Advance::Finished);
        assert_eq!(quiz.index, 1);
    }

    #[test]
    fn test_result_requires_answers() {
        let quiz = QuizSession::new("Analogieën", true, batch(3));
        assert!(quiz.result(Utc::now()).is_none());
    }

    #[test]
    fn test_result_average_time_and_mode() {
        let mut quiz = QuizSession::new("Rekenvaardigheid", true, batch(2));
        let mut stats = UserStats::default();
        let mut saved = Vec::new();
        quiz.answer("B", 10.0, &mut stats, &mut saved);
        quiz.advance();
        quiz.answer("A", 20.0, &mut stats, &mut saved);

        let result = quiz.result(Utc::now()).unwrap();
        assert_eq!(result.score, 1);
        assert_eq!(result.total, 2);
        assert_eq!(result.mode, SessionMode::Math);
        assert!((result.average_time - 15.0).abs() < f64::EPSILON);
    }
}
