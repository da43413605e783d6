use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::session::question::{Difficulty, Question};
use crate::session::result::SessionResult;

/// Topics below this accuracy show up as weak areas on the dashboard.
const WEAK_ACCURACY: u32 = 60;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicStats {
    pub total: u32,
    pub correct: u32,
    #[serde(default)]
    pub time_spent: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub total: u32,
    pub correct: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub total_questions: u32,
    pub correct: u32,
    pub topic_breakdown: BTreeMap<String, TopicStats>,
    pub difficulty_stats: BTreeMap<Difficulty, Tally>,
    pub history: Vec<SessionResult>,
}

impl Default for UserStats {
    fn default() -> Self {
        Self {
            total_questions: 0,
            correct: 0,
            topic_breakdown: BTreeMap::new(),
            difficulty_stats: Difficulty::ALL
                .iter()
                .map(|&d| (d, Tally::default()))
                .collect(),
            history: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TopicRow {
    pub topic: String,
    pub accuracy: u32,
    pub total: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Recommendation {
    pub text: String,
    pub category: &'static str,
    pub label: &'static str,
}

impl UserStats {
    /// Fold one answered question into the global, per-topic and
    /// per-difficulty counters.
    pub fn record_answer(&mut self, question: &Question, correct: bool, time_spent: f64) {
        self.total_questions += 1;
        if correct {
            self.correct += 1;
        }

        let topic = self
            .topic_breakdown
            .entry(question.topic.clone())
            .or_default();
        topic.total += 1;
        topic.time_spent += time_spent.max(0.0);
        if correct {
            topic.correct += 1;
        }

        let tally = self.difficulty_stats.entry(question.difficulty).or_default();
        tally.total += 1;
        if correct {
            tally.correct += 1;
        }
    }

    pub fn push_session(&mut self, result: SessionResult) {
        self.history.push(result);
    }

    pub fn accuracy(&self) -> u32 {
        percent(self.correct, self.total_questions)
    }

    pub fn incorrect(&self) -> u32 {
        self.total_questions.saturating_sub(self.correct)
    }

    pub fn difficulty(&self, difficulty: Difficulty) -> Tally {
        self.difficulty_stats
            .get(&difficulty)
            .copied()
            .unwrap_or_default()
    }

    /// Both breakdowns must add up to the global total.
    pub fn totals_consistent(&self) -> bool {
        let by_topic: u32 = self.topic_breakdown.values().map(|t| t.total).sum();
        let by_difficulty: u32 = self.difficulty_stats.values().map(|t| t.total).sum();
        by_topic == self.total_questions
            && by_difficulty == self.total_questions
            && self.correct <= self.total_questions
    }

    /// Per-topic accuracy, best first.
    pub fn topic_rows(&self) -> Vec<TopicRow> {
        let mut rows: Vec<TopicRow> = self
            .topic_breakdown
            .iter()
            .map(|(topic, data)| TopicRow {
                topic: topic.clone(),
                accuracy: percent(data.correct, data.total),
                total: data.total,
            })
            .collect();
        rows.sort_by(|a, b| b.accuracy.cmp(&a.accuracy));
        rows
    }

    pub fn weak_areas(&self) -> Vec<TopicRow> {
        let mut weak: Vec<TopicRow> = self
            .topic_rows()
            .into_iter()
            .filter(|row| row.total > 0 && row.accuracy < WEAK_ACCURACY)
            .collect();
        weak.sort_by(|a, b| a.accuracy.cmp(&b.accuracy));
        weak
    }

    /// Study advice for the weakest topic, pointing into the study guide.
    pub fn recommendation(&self) -> Option<Recommendation> {
        let weakest = self.weak_areas().into_iter().next()?;
        let topic = weakest.topic.to_lowercase();
        let rec = if topic.contains("reken") || topic.contains("cijfer") || topic.contains("redactie")
        {
            Recommendation {
                text: format!(
                    "Your accuracy on {} is {}%. Review the arithmetic rules and tricks.",
                    weakest.topic, weakest.accuracy
                ),
                category: "math_basics",
                label: "Arithmetic tricks",
            }
        } else if topic.contains("syllogism") || topic.contains("logica") {
            Recommendation {
                text: format!(
                    "Syllogisms can be tricky ({}%). Learn how to draw Venn diagrams.",
                    weakest.accuracy
                ),
                category: "logic_verbal",
                label: "Logic guide",
            }
        } else {
            Recommendation {
                text: format!(
                    "Keep practising {}. See the general tips in the study guide.",
                    weakest.topic
                ),
                category: "logic_verbal",
                label: "Study guide",
            }
        };
        Some(rec)
    }

    /// Most recent sessions, newest first.
    pub fn recent_sessions(&self, count: usize) -> impl Iterator<Item = &SessionResult> {
        self.history.iter().rev().take(count)
    }

    pub fn last_session_day(&self) -> Option<NaiveDate> {
        self.history
            .last()
            .map(|r| r.date.with_timezone(&chrono::Local).date_naive())
    }
}

fn percent(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::question::sample_question;

    #[test]
    fn test_default_has_all_difficulties() {
        let stats = UserStats::default();
        assert_eq!(stats.difficulty_stats.len(), 3);
        assert!(stats.totals_consistent());
    }

    #[test]
    fn test_record_answer_updates_all_breakdowns() {
        let mut stats = UserStats::default();
        let q = sample_question("Analogieën", Difficulty::Medium, "B");
        stats.record_answer(&q, true, 12.0);
        stats.record_answer(&q, false, 8.0);

        assert_eq!(stats.total_questions, 2);
        assert_eq!(stats.correct, 1);
        let topic = &stats.topic_breakdown["Analogieën"];
        assert_eq!(topic.total, 2);
        assert_eq!(topic.correct, 1);
        assert!((topic.time_spent - 20.0).abs() < f64::EPSILON);
        assert_eq!(stats.difficulty(Difficulty::Medium).total, 2);
        assert!(stats.totals_consistent());
    }

    #[test]
    fn test_topic_rows_sorted_best_first() {
        let mut stats = UserStats::default();
        let good = sample_question("Cijferreeksen", Difficulty::Easy, "B");
        let bad = sample_question("Syllogismen", Difficulty::Hard, "B");
        stats.record_answer(&good, true, 0.0);
        stats.record_answer(&bad, false, 0.0);
        let rows = stats.topic_rows();
        assert_eq!(rows[0].topic, "Cijferreeksen");
        assert_eq!(rows[0].accuracy, 100);
        assert_eq!(rows[1].accuracy, 0);
    }

    #[test]
    fn test_recommendation_targets_weakest_topic() {
        let mut stats = UserStats::default();
        let syl = sample_question("Syllogismen", Difficulty::Hard, "B");
        let reken = sample_question("Rekenvaardigheid", Difficulty::Easy, "B");
        stats.record_answer(&syl, false, 0.0);
        stats.record_answer(&reken, true, 0.0);
        stats.record_answer(&reken, false, 0.0);

        let rec = stats.recommendation().unwrap();
        assert_eq!(rec.category, "logic_verbal");
        assert!(rec.text.contains("0%"));
    }

    #[test]
    fn test_no_recommendation_without_weak_areas() {
        let mut stats = UserStats::default();
        let q = sample_question("Analogieën", Difficulty::Easy, "B");
        stats.record_answer(&q, true, 0.0);
        assert!(stats.recommendation().is_none());
    }

    #[test]
    fn test_inconsistent_totals_detected() {
        let mut stats = UserStats::default();
        stats.total_questions = 3;
        assert!(!stats.totals_consistent());
    }
}
