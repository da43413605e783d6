use serde::{Deserialize, Serialize};

use crate::engine::UserStats;
use crate::engine::planner::StudyPlan;
use crate::session::question::{Question, SavedQuestion};
use crate::session::quiz::QuizSession;

pub const SCHEMA_VERSION: u32 = 1;

/// A persisted record: one JSON file with a schema version and an optional
/// consistency check run after loading.
pub trait Record: Serialize + for<'de> Deserialize<'de> {
    const FILE: &'static str;

    fn schema_version(&self) -> u32;

    fn validate(&self) -> Result<(), String> {
        Ok(())
    }

    /// Check if loaded data has a stale schema version and needs reset.
    fn needs_reset(&self) -> bool {
        self.schema_version() != SCHEMA_VERSION
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatsData {
    pub schema_version: u32,
    pub stats: UserStats,
}

impl StatsData {
    pub fn new(stats: UserStats) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            stats,
        }
    }
}

impl Record for StatsData {
    const FILE: &'static str = "stats.json";

    fn schema_version(&self) -> u32 {
        self.schema_version
    }

    fn validate(&self) -> Result<(), String> {
        if self.stats.totals_consistent() {
            Ok(())
        } else {
            Err(format!(
                "totals do not add up to {} questions",
                self.stats.total_questions
            ))
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedQuestionsData {
    pub schema_version: u32,
    pub questions: Vec<SavedQuestion>,
}

impl SavedQuestionsData {
    pub fn new(questions: Vec<SavedQuestion>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            questions,
        }
    }
}

impl Record for SavedQuestionsData {
    const FILE: &'static str = "saved_questions.json";

    fn schema_version(&self) -> u32 {
        self.schema_version
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StudyPlanData {
    pub schema_version: u32,
    pub plan: StudyPlan,
}

impl StudyPlanData {
    pub fn new(plan: StudyPlan) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            plan,
        }
    }
}

impl Record for StudyPlanData {
    const FILE: &'static str = "study_plan.json";

    fn schema_version(&self) -> u32 {
        self.schema_version
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TopicsData {
    pub schema_version: u32,
    pub topics: Vec<String>,
}

impl TopicsData {
    pub fn new(topics: Vec<String>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            topics,
        }
    }
}

impl Record for TopicsData {
    const FILE: &'static str = "topics.json";

    fn schema_version(&self) -> u32 {
        self.schema_version
    }
}

/// Screen an interrupted session was on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnapshotView {
    Quiz,
    SpeedMath,
    Capacity,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActiveSessionData {
    pub schema_version: u32,
    pub view: SnapshotView,
    pub question_queue: Vec<Question>,
    pub current_question_index: usize,
    pub session_score: u32,
    pub session_total: u32,
    pub selected_topic: String,
    pub is_math_mode: bool,
    pub user_answer: Option<String>,
    pub is_answered: bool,
    #[serde(default)]
    pub session_time_secs: f64,
}

impl ActiveSessionData {
    pub fn from_quiz(quiz: &QuizSession) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            view: SnapshotView::Quiz,
            question_queue: quiz.queue.clone(),
            current_question_index: quiz.index,
            session_score: quiz.score,
            session_total: quiz.total,
            selected_topic: quiz.topic.clone(),
            is_math_mode: quiz.math_mode,
            user_answer: quiz.user_answer.clone(),
            is_answered: quiz.answered,
            session_time_secs: quiz.time_spent_secs,
        }
    }

    /// Snapshot for a mini-game screen; only the view is restored.
    pub fn for_view(view: SnapshotView) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            view,
            question_queue: Vec::new(),
            current_question_index: 0,
            session_score: 0,
            session_total: 0,
            selected_topic: String::new(),
            is_math_mode: false,
            user_answer: None,
            is_answered: false,
            session_time_secs: 0.0,
        }
    }

    /// Rebuild the quiz state. `None` unless this is a quiz snapshot with
    /// questions left to show.
    pub fn to_quiz(&self) -> Option<QuizSession> {
        if self.view != SnapshotView::Quiz || self.question_queue.is_empty() {
            return None;
        }
        let mut quiz = QuizSession::new(
            &self.selected_topic,
            self.is_math_mode,
            self.question_queue.clone(),
        );
        quiz.index = self.current_question_index;
        quiz.score = self.session_score;
        quiz.total = self.session_total;
        quiz.user_answer = self.user_answer.clone();
        quiz.answered = self.is_answered;
        quiz.time_spent_secs = self.session_time_secs;
        Some(quiz)
    }
}

impl Record for ActiveSessionData {
    const FILE: &'static str = "active_session.json";

    fn schema_version(&self) -> u32 {
        self.schema_version
    }

    fn validate(&self) -> Result<(), String> {
        if self.session_score > self.session_total {
            return Err(format!(
                "score {} exceeds total {}",
                self.session_score, self.session_total
            ));
        }
        if !self.question_queue.is_empty()
            && self.current_question_index >= self.question_queue.len()
        {
            return Err(format!(
                "question index {} out of range for {} questions",
                self.current_question_index,
                self.question_queue.len()
            ));
        }
        Ok(())
    }
}
