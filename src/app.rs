use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate, Utc};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::ai::{AiError, AiOutcome, AiReply, AiRequest, RequestId, Step};
use crate::config::Config;
use crate::engine::UserStats;
use crate::engine::motivation::Motivation;
use crate::engine::planner::{self, StudyPlan};
use crate::engine::rank::RankTable;
use crate::engine::study_guide::StudyGuide;
use crate::engine::topics::{default_topics, fallback_topics, merge_topics};
use crate::games::capacity::CapacityTrainer;
use crate::games::speed_math::SpeedMath;
use crate::session::question::{Difficulty, SavedQuestion};
use crate::session::quiz::{Advance, QuizSession};
use crate::session::timer::QuestionTimer;
use crate::store::{JsonStore, StoreError};
use crate::store::schema::{
    ActiveSessionData, SavedQuestionsData, SnapshotView, StatsData, StudyPlanData, TopicsData,
};
use crate::store::starter::starter_questions;
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

pub const MATH_TOPIC: &str = "Rekenvaardigheid";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Home,
    Quiz,
    Dashboard,
    StudyGuide,
    SpeedMath,
    Review,
    Planner,
    Capacity,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HomeAction {
    MathTraining,
    SpeedMath,
    Capacity,
    Topic(String),
    Dashboard,
    Planner,
    StudyGuide,
    Review,
    AddTopics,
    ToggleTheme,
    Quit,
}

impl HomeAction {
    pub fn key(&self) -> Option<char> {
        match self {
            HomeAction::MathTraining => Some('1'),
            HomeAction::SpeedMath => Some('2'),
            HomeAction::Capacity => Some('3'),
            HomeAction::Topic(_) => None,
            HomeAction::Dashboard => Some('d'),
            HomeAction::Planner => Some('p'),
            HomeAction::StudyGuide => Some('g'),
            HomeAction::Review => Some('r'),
            HomeAction::AddTopics => Some('a'),
            HomeAction::ToggleTheme => Some('t'),
            HomeAction::Quit => Some('q'),
        }
    }

    pub fn label(&self) -> String {
        match self {
            HomeAction::MathTraining => "Math training".to_string(),
            HomeAction::SpeedMath => "Speed math".to_string(),
            HomeAction::Capacity => "Capacity trainer".to_string(),
            HomeAction::Topic(topic) => topic.clone(),
            HomeAction::Dashboard => "Dashboard".to_string(),
            HomeAction::Planner => "Study planner".to_string(),
            HomeAction::StudyGuide => "Study guide".to_string(),
            HomeAction::Review => "Review questions".to_string(),
            HomeAction::AddTopics => "Add topics".to_string(),
            HomeAction::ToggleTheme => "Toggle dark/light".to_string(),
            HomeAction::Quit => "Quit".to_string(),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            HomeAction::MathTraining => "Mental arithmetic, word problems and number series",
            HomeAction::SpeedMath => "Quick-fire arithmetic against the clock",
            HomeAction::Capacity => "Memory readbacks and compass turns",
            HomeAction::Topic(_) => "Practice this topic with generated questions",
            HomeAction::Dashboard => "Rank, accuracy per topic and recent sessions",
            HomeAction::Planner => "Exam date, daily goal and training calendar",
            HomeAction::StudyGuide => "Strategies and worked examples",
            HomeAction::Review => "Every answered question, with explanations",
            HomeAction::AddTopics => "Paste study material to extract new topics",
            HomeAction::ToggleTheme => "Switch between the dark and light theme",
            HomeAction::Quit => "Leave pilotprep",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Clone, Debug)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub shown_at: Instant,
}

/// What an in-flight AI request will update when it comes back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AiTarget {
    Batch,
    Topics,
    Definitions,
    Explanation,
    Steps,
    Verify,
    Diagram,
}

impl AiTarget {
    fn is_question_scoped(self) -> bool {
        matches!(
            self,
            AiTarget::Definitions
                | AiTarget::Explanation
                | AiTarget::Steps
                | AiTarget::Verify
                | AiTarget::Diagram
        )
    }
}

/// Request ids still wanted by the app. Replies for any other id are stale.
#[derive(Debug, Default)]
pub struct AiTracker {
    next_id: u64,
    in_flight: HashMap<RequestId, AiTarget>,
}

impl AiTracker {
    pub fn issue(&mut self, target: AiTarget) -> RequestId {
        self.next_id += 1;
        let id = RequestId(self.next_id);
        self.in_flight.insert(id, target);
        id
    }

    pub fn take(&mut self, id: RequestId) -> Option<AiTarget> {
        self.in_flight.remove(&id)
    }

    pub fn is_pending(&self, target: AiTarget) -> bool {
        self.in_flight.values().any(|&t| t == target)
    }

    pub fn cancel(&mut self, target: AiTarget) {
        self.in_flight.retain(|_, t| *t != target);
    }

    pub fn cancel_question_scoped(&mut self) {
        self.in_flight.retain(|_, t| !t.is_question_scoped());
    }

    pub fn clear(&mut self) {
        self.in_flight.clear();
    }
}

/// Batch generation in progress; HOME shows a loading overlay meanwhile.
#[derive(Clone, Debug)]
pub struct PendingBatch {
    pub topic: String,
    pub math_mode: bool,
    pub difficulty: Difficulty,
    pub message: &'static str,
}

/// Extra help for the question on screen. Reset for every question.
#[derive(Clone, Debug, Default)]
pub struct QuestionAids {
    pub definitions: Option<String>,
    pub explanation: Option<String>,
    pub steps: Vec<Step>,
    pub steps_revealed: usize,
    pub verification: Option<String>,
    pub diagram_path: Option<PathBuf>,
    pub scratchpad: LineInput,
    pub scratchpad_open: bool,
    pub success_message: Option<&'static str>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReviewFilter {
    All,
    Incorrect,
}

#[derive(Clone, Debug)]
pub struct ReviewState {
    pub filter: ReviewFilter,
    pub selected: usize,
    pub confirm_clear: bool,
}

impl Default for ReviewState {
    fn default() -> Self {
        Self {
            filter: ReviewFilter::All,
            selected: 0,
            confirm_clear: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlannerField {
    ExamDate,
    Target,
}

#[derive(Clone, Debug)]
pub struct PlannerForm {
    pub field: PlannerField,
    pub exam_date: LineInput,
    pub target: LineInput,
    pub error: Option<String>,
}

impl PlannerForm {
    pub fn focused_mut(&mut self) -> &mut LineInput {
        match self.field {
            PlannerField::ExamDate => &mut self.exam_date,
            PlannerField::Target => &mut self.target,
        }
    }

    pub fn switch_field(&mut self) {
        self.field = match self.field {
            PlannerField::ExamDate => PlannerField::Target,
            PlannerField::Target => PlannerField::ExamDate,
        };
    }
}

pub struct App {
    pub screen: AppScreen,
    pub config: Config,
    pub theme: Theme,
    pub store: Option<JsonStore>,
    pub stats: UserStats,
    pub saved: Vec<SavedQuestion>,
    pub plan: StudyPlan,
    pub topics: Vec<String>,
    pub quiz: Option<QuizSession>,
    pub timer: Option<QuestionTimer>,
    pub aids: QuestionAids,
    pub pending_batch: Option<PendingBatch>,
    pub home_selected: usize,
    pub topic_input: LineInput,
    pub topic_input_focused: bool,
    pub toast: Option<Toast>,
    pub quote: &'static str,
    pub speed_math: Option<SpeedMath>,
    pub capacity: CapacityTrainer,
    pub review: ReviewState,
    pub planner_form: Option<PlannerForm>,
    pub guide: StudyGuide,
    pub guide_selected: usize,
    pub guide_scroll: u16,
    pub motivation: Motivation,
    pub ranks: RankTable,
    pub should_quit: bool,
    pub rng: SmallRng,
    config_path: Option<PathBuf>,
    ai: AiTracker,
    outbox: Vec<(RequestId, AiRequest)>,
    topics_source: Option<String>,
    last_snapshot: Option<ActiveSessionData>,
}

impl App {
    pub fn new(config: Config, store: Option<JsonStore>, config_path: Option<PathBuf>) -> Self {
        let theme = Theme::load(&config.theme).unwrap_or_default();
        let motivation = Motivation::default();
        let mut rng = SmallRng::from_entropy();
        let quote = motivation.quote(&mut rng);

        let mut app = Self {
            screen: AppScreen::Home,
            config,
            theme,
            store,
            stats: UserStats::default(),
            saved: Vec::new(),
            plan: StudyPlan::starting(today()),
            topics: default_topics(),
            quiz: None,
            timer: None,
            aids: QuestionAids::default(),
            pending_batch: None,
            home_selected: 0,
            topic_input: LineInput::default(),
            topic_input_focused: false,
            toast: None,
            quote,
            speed_math: None,
            capacity: CapacityTrainer::default(),
            review: ReviewState::default(),
            planner_form: None,
            guide: StudyGuide::bundled(),
            guide_selected: 0,
            guide_scroll: 0,
            motivation,
            ranks: RankTable::default(),
            should_quit: false,
            rng,
            config_path,
            ai: AiTracker::default(),
            outbox: Vec::new(),
            topics_source: None,
            last_snapshot: None,
        };
        app.load_records();
        app.restore_session();
        app
    }

    /// App backed by `store` with default settings and no config file.
    pub fn with_store(store: JsonStore) -> Self {
        Self::new(Config::default(), Some(store), None)
    }

    pub fn seed_rng(&mut self, seed: u64) {
        self.rng = SmallRng::seed_from_u64(seed);
    }

    // --- persistence ---------------------------------------------------

    fn load_records(&mut self) {
        let Some(store) = self.store.as_ref() else {
            self.saved = starter_questions();
            return;
        };
        let mut failed: Vec<&'static str> = Vec::new();

        if let Some(data) = loaded(store.load_stats(), &mut failed) {
            self.stats = data.stats;
        }
        if let Some(data) = loaded(store.load_study_plan(), &mut failed) {
            self.plan = data.plan;
        }
        if let Some(data) = loaded(store.load_topics(), &mut failed) {
            self.topics = data.topics;
        }
        let saved = loaded(store.load_saved_questions(), &mut failed)
            .map(|data| data.questions)
            .unwrap_or_default();

        if saved.is_empty() {
            self.saved = starter_questions();
            tracing::info!(count = self.saved.len(), "seeding saved questions with starter set");
            self.persist_saved();
        } else {
            self.saved = saved;
        }

        if !failed.is_empty() {
            self.notify(
                ToastKind::Error,
                format!("Could not read {}; using defaults.", failed.join(", ")),
            );
        }
    }

    fn restore_session(&mut self) {
        let Some(store) = self.store.as_ref() else {
            return;
        };
        let snapshot = match store.load_active_session() {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => return,
            Err(e) => {
                tracing::error!("discarding active session: {e}");
                self.notify(ToastKind::Error, "Your previous session could not be restored.");
                self.clear_snapshot();
                return;
            }
        };

        match snapshot.view {
            SnapshotView::Quiz => match snapshot.to_quiz() {
                Some(quiz) => {
                    tracing::info!(topic = %quiz.topic, index = quiz.index, "restoring quiz session");
                    self.quiz = Some(quiz);
                    self.screen = AppScreen::Quiz;
                    self.begin_question();
                    self.last_snapshot = Some(snapshot);
                    // A load failure reported by load_records stays visible.
                    if !self.toast.as_ref().is_some_and(|t| t.kind == ToastKind::Error) {
                        self.notify(ToastKind::Success, "Your previous session was restored!");
                    }
                }
                None => self.clear_snapshot(),
            },
            SnapshotView::SpeedMath => {
                self.speed_math = Some(SpeedMath::new(&mut self.rng));
                self.screen = AppScreen::SpeedMath;
                self.last_snapshot = Some(snapshot);
            }
            SnapshotView::Capacity => {
                self.capacity = CapacityTrainer::default();
                self.screen = AppScreen::Capacity;
                self.last_snapshot = Some(snapshot);
            }
        }
    }

    fn persist_stats(&self) {
        if let Some(store) = self.store.as_ref()
            && let Err(e) = store.save_stats(&StatsData::new(self.stats.clone()))
        {
            tracing::error!("failed to save stats: {e}");
        }
    }

    fn persist_saved(&self) {
        if let Some(store) = self.store.as_ref()
            && let Err(e) = store.save_saved_questions(&SavedQuestionsData::new(self.saved.clone()))
        {
            tracing::error!("failed to save questions: {e}");
        }
    }

    fn persist_plan(&self) {
        if let Some(store) = self.store.as_ref()
            && let Err(e) = store.save_study_plan(&StudyPlanData::new(self.plan.clone()))
        {
            tracing::error!("failed to save study plan: {e}");
        }
    }

    fn persist_topics(&self) {
        if let Some(store) = self.store.as_ref()
            && let Err(e) = store.save_topics(&TopicsData::new(self.topics.clone()))
        {
            tracing::error!("failed to save topics: {e}");
        }
    }

    /// Write the active-session record when it differs from the last write.
    pub fn sync_snapshot(&mut self) {
        let snapshot = match self.screen {
            AppScreen::Quiz => self.quiz.as_ref().map(ActiveSessionData::from_quiz),
            AppScreen::SpeedMath => Some(ActiveSessionData::for_view(SnapshotView::SpeedMath)),
            AppScreen::Capacity => Some(ActiveSessionData::for_view(SnapshotView::Capacity)),
            _ => None,
        };
        let Some(snapshot) = snapshot else {
            return;
        };
        if self.last_snapshot.as_ref() == Some(&snapshot) {
            return;
        }
        if let Some(store) = self.store.as_ref()
            && let Err(e) = store.save_active_session(&snapshot)
        {
            tracing::error!("failed to save active session: {e}");
        }
        self.last_snapshot = Some(snapshot);
    }

    fn clear_snapshot(&mut self) {
        self.last_snapshot = None;
        if let Some(store) = self.store.as_ref()
            && let Err(e) = store.clear_active_session()
        {
            tracing::error!("failed to remove active session: {e}");
        }
    }

    // --- notifications -------------------------------------------------

    pub fn notify(&mut self, kind: ToastKind, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            kind,
            shown_at: Instant::now(),
        });
    }

    pub fn tick(&mut self, now: Instant) {
        let ttl = Duration::from_secs(self.config.toast_secs);
        if self
            .toast
            .as_ref()
            .is_some_and(|t| now.saturating_duration_since(t.shown_at) >= ttl)
        {
            self.toast = None;
        }
        match self.screen {
            AppScreen::SpeedMath => {
                if let Some(game) = self.speed_math.as_mut() {
                    game.tick(now, &mut self.rng);
                }
            }
            AppScreen::Capacity => self.capacity.tick(now, &mut self.rng),
            _ => {}
        }
    }

    // --- AI plumbing ---------------------------------------------------

    fn request(&mut self, target: AiTarget, request: AiRequest) -> RequestId {
        let id = self.ai.issue(target);
        tracing::debug!(id = id.0, ?target, "queueing AI request");
        self.outbox.push((id, request));
        id
    }

    /// Requests queued since the last call, for the event loop to dispatch.
    pub fn take_jobs(&mut self) -> Vec<(RequestId, AiRequest)> {
        std::mem::take(&mut self.outbox)
    }

    pub fn is_loading(&self, target: AiTarget) -> bool {
        self.ai.is_pending(target)
    }

    pub fn handle_ai_reply(&mut self, reply: AiReply) {
        let Some(target) = self.ai.take(reply.id) else {
            tracing::debug!(id = reply.id.0, "discarding stale AI reply");
            return;
        };
        match (target, reply.result) {
            (AiTarget::Batch, result) => self.on_batch(result),
            (AiTarget::Topics, result) => self.on_topics(result),
            (AiTarget::Definitions, Ok(AiOutcome::Definitions(text))) => {
                self.aids.definitions = text;
            }
            (AiTarget::Definitions, Err(e)) => {
                tracing::warn!("term definitions unavailable: {e}");
            }
            (AiTarget::Explanation, Ok(AiOutcome::Explanation(text))) => {
                self.aids.explanation = Some(text);
            }
            (AiTarget::Steps, Ok(AiOutcome::Steps(steps))) => {
                if steps.is_empty() {
                    self.notify(ToastKind::Info, "No step breakdown available for this question.");
                } else {
                    self.aids.steps = steps;
                    self.aids.steps_revealed = 1;
                }
            }
            (AiTarget::Verify, Ok(AiOutcome::Verify(text))) => {
                self.aids.verification = Some(text);
            }
            (AiTarget::Diagram, Ok(AiOutcome::Diagram(svg))) => self.on_diagram(svg),
            (target, Err(e)) => {
                tracing::error!(?target, "AI request failed: {e}");
                self.notify(ToastKind::Error, format!("AI request failed: {e}"));
            }
            (target, Ok(outcome)) => {
                tracing::error!(?target, ?outcome, "AI reply does not match its request");
            }
        }
    }

    // --- quiz lifecycle ------------------------------------------------

    /// Ask for a batch; HOME stays up with a loading overlay until it arrives.
    pub fn start_session(&mut self, topic: &str, math_mode: bool) {
        if self.pending_batch.is_some() || self.quiz.is_some() {
            return;
        }
        let difficulty = Difficulty::random(&mut self.rng);
        let message = self.motivation.loading(&mut self.rng);
        tracing::info!(topic, math_mode, difficulty = difficulty.as_str(), "starting session");
        self.pending_batch = Some(PendingBatch {
            topic: topic.to_string(),
            math_mode,
            difficulty,
            message,
        });
        self.request(
            AiTarget::Batch,
            AiRequest::Batch {
                topic: topic.to_string(),
                difficulty,
                math_mode,
                count: self.config.batch_size,
            },
        );
    }

    pub fn cancel_batch(&mut self) {
        if self.pending_batch.take().is_some() {
            self.ai.cancel(AiTarget::Batch);
            tracing::info!("batch generation cancelled");
        }
    }

    fn on_batch(&mut self, result: Result<AiOutcome, AiError>) {
        let Some(pending) = self.pending_batch.take() else {
            return;
        };
        let questions = match result {
            Ok(AiOutcome::Batch(questions)) if !questions.is_empty() => questions,
            Ok(_) => {
                self.notify(ToastKind::Error, "Could not generate questions. Please try again.");
                return;
            }
            Err(e) => {
                tracing::error!(topic = %pending.topic, "batch generation failed: {e}");
                self.notify(
                    ToastKind::Error,
                    format!("Could not generate questions: {e}"),
                );
                return;
            }
        };
        tracing::info!(count = questions.len(), topic = %pending.topic, "batch received");
        self.quiz = Some(QuizSession::new(&pending.topic, pending.math_mode, questions));
        self.screen = AppScreen::Quiz;
        self.begin_question();
        self.sync_snapshot();
    }

    fn begin_question(&mut self) {
        self.ai.cancel_question_scoped();
        self.aids = QuestionAids::default();
        let Some(question) = self.quiz.as_ref().and_then(|q| q.current()).cloned() else {
            self.timer = None;
            return;
        };
        let answered = self.quiz.as_ref().is_some_and(|q| q.answered);
        self.timer = (!answered).then(|| QuestionTimer::for_question(&question, Instant::now()));
        if !answered {
            self.request(
                AiTarget::Definitions,
                AiRequest::Definitions {
                    question_text: question.question.clone(),
                },
            );
        }
    }

    /// Answer the current question with an option label such as "B".
    pub fn answer(&mut self, label: &str) -> Option<bool> {
        let now = Instant::now();
        let quiz = self.quiz.as_mut()?;
        if !quiz.current()?.has_label(label) {
            return None;
        }
        let time_spent = self
            .timer
            .as_ref()
            .map(|t| t.elapsed(now).as_secs_f64())
            .unwrap_or(0.0);
        let correct = quiz.answer(label, time_spent, &mut self.stats, &mut self.saved)?;

        if let Some(timer) = self.timer.as_mut() {
            timer.stop(now);
        }
        self.aids.success_message = correct.then(|| self.motivation.success(&mut self.rng));
        self.persist_stats();
        self.persist_saved();
        self.sync_snapshot();
        Some(correct)
    }

    pub fn next(&mut self) {
        let Some(quiz) = self.quiz.as_mut() else {
            return;
        };
        match quiz.advance() {
            Advance::Next => {
                self.begin_question();
                self.sync_snapshot();
            }
            Advance::Finished => self.end_session(),
        }
    }

    pub fn end_session(&mut self) {
        if let Some(quiz) = self.quiz.take()
            && let Some(result) = quiz.result(Utc::now())
        {
            tracing::info!(
                topic = %result.topic,
                score = result.score,
                total = result.total,
                "session finished"
            );
            self.stats.push_session(result);
            self.persist_stats();
        }
        self.ai.cancel_question_scoped();
        self.aids = QuestionAids::default();
        self.timer = None;
        self.clear_snapshot();
        self.quote = self.motivation.quote(&mut self.rng);
        self.screen = AppScreen::Home;
    }

    pub fn reveal_step(&mut self) {
        let Some(question) = self.current_question() else {
            return;
        };
        if self.aids.steps.is_empty() {
            if !self.ai.is_pending(AiTarget::Steps) {
                self.request(AiTarget::Steps, AiRequest::Steps { question });
            }
        } else if self.aids.steps_revealed < self.aids.steps.len() {
            self.aids.steps_revealed += 1;
        }
    }

    pub fn explain_more(&mut self) {
        let Some(question) = self.current_question() else {
            return;
        };
        if self.aids.explanation.is_none() && !self.ai.is_pending(AiTarget::Explanation) {
            self.request(AiTarget::Explanation, AiRequest::Explanation { question });
        }
    }

    pub fn verify_answer(&mut self) {
        let answered = self.quiz.as_ref().is_some_and(|q| q.answered);
        let Some(question) = self.current_question().filter(|_| answered) else {
            return;
        };
        if self.aids.verification.is_none() && !self.ai.is_pending(AiTarget::Verify) {
            self.request(AiTarget::Verify, AiRequest::Verify { question });
        }
    }

    pub fn request_diagram(&mut self) {
        let Some(question) = self.current_question().filter(|q| q.is_syllogism()) else {
            return;
        };
        if self.aids.diagram_path.is_some() || self.ai.is_pending(AiTarget::Diagram) {
            return;
        }
        let description = format!("{}\n{}", question.question, question.explanation);
        self.request(AiTarget::Diagram, AiRequest::Diagram { description });
    }

    fn on_diagram(&mut self, svg: Option<String>) {
        let Some(svg) = svg else {
            self.notify(ToastKind::Info, "No diagram could be drawn for this question.");
            return;
        };
        let Some(store) = self.store.as_ref() else {
            tracing::warn!("no data directory, dropping generated diagram");
            self.notify(ToastKind::Info, "No data directory to save the diagram in.");
            return;
        };
        let written = store
            .diagram_path(&uuid::Uuid::new_v4().to_string())
            .and_then(|path| fs::write(&path, svg).map(|()| path));
        match written {
            Ok(path) => {
                self.notify(
                    ToastKind::Success,
                    format!("Venn diagram saved to {}", path.display()),
                );
                self.aids.diagram_path = Some(path);
            }
            Err(e) => {
                tracing::error!("failed to write diagram: {e}");
                self.notify(ToastKind::Error, "Could not save the diagram.");
            }
        }
    }

    /// Bracketed paste goes to whichever text field has focus.
    pub fn paste(&mut self, text: &str) {
        match self.screen {
            AppScreen::Home if self.topic_input_focused => self.topic_input.insert_str(text),
            AppScreen::Quiz if self.aids.scratchpad_open => self.aids.scratchpad.insert_str(text),
            AppScreen::Planner => {
                if let Some(form) = self.planner_form.as_mut() {
                    form.focused_mut().insert_str(text);
                }
            }
            _ => {}
        }
    }

    pub fn toggle_scratchpad(&mut self) {
        self.aids.scratchpad_open = !self.aids.scratchpad_open;
    }

    fn current_question(&self) -> Option<crate::session::question::Question> {
        self.quiz.as_ref()?.current().cloned()
    }

    // --- home ----------------------------------------------------------

    pub fn home_actions(&self) -> Vec<HomeAction> {
        let mut actions = vec![
            HomeAction::MathTraining,
            HomeAction::SpeedMath,
            HomeAction::Capacity,
        ];
        actions.extend(self.topics.iter().cloned().map(HomeAction::Topic));
        actions.extend([
            HomeAction::Dashboard,
            HomeAction::Planner,
            HomeAction::StudyGuide,
            HomeAction::Review,
            HomeAction::AddTopics,
            HomeAction::ToggleTheme,
            HomeAction::Quit,
        ]);
        actions
    }

    pub fn home_next(&mut self) {
        let len = self.home_actions().len();
        self.home_selected = (self.home_selected + 1) % len;
    }

    pub fn home_prev(&mut self) {
        let len = self.home_actions().len();
        self.home_selected = (self.home_selected + len - 1) % len;
    }

    pub fn activate_selected(&mut self) {
        if let Some(action) = self.home_actions().get(self.home_selected).cloned() {
            self.activate(action);
        }
    }

    pub fn activate(&mut self, action: HomeAction) {
        match action {
            HomeAction::MathTraining => self.start_session(MATH_TOPIC, true),
            HomeAction::SpeedMath => self.go_to_speed_math(),
            HomeAction::Capacity => self.go_to_capacity(),
            HomeAction::Topic(topic) => self.start_session(&topic, false),
            HomeAction::Dashboard => self.go_to(AppScreen::Dashboard),
            HomeAction::Planner => self.go_to_planner(),
            HomeAction::StudyGuide => self.go_to_study_guide(None),
            HomeAction::Review => {
                self.review = ReviewState::default();
                self.go_to(AppScreen::Review);
            }
            HomeAction::AddTopics => self.topic_input_focused = true,
            HomeAction::ToggleTheme => self.toggle_theme(),
            HomeAction::Quit => self.should_quit = true,
        }
    }

    /// Home-screen nudge when an exam is planned and nothing was done today.
    pub fn reminder(&self) -> Option<&'static str> {
        planner::reminder(&self.plan, self.stats.last_session_day(), today())
    }

    pub fn add_topics(&mut self) {
        let text = self.topic_input.value().to_string();
        if text.trim().is_empty() || self.ai.is_pending(AiTarget::Topics) {
            return;
        }
        self.topics_source = Some(text.clone());
        self.request(AiTarget::Topics, AiRequest::Topics { text });
    }

    fn on_topics(&mut self, result: Result<AiOutcome, AiError>) {
        let source = self.topics_source.take().unwrap_or_default();
        let found = match result {
            Ok(AiOutcome::Topics(topics)) if !topics.is_empty() => topics,
            Ok(_) | Err(AiError::Disabled) => fallback_topics(&source),
            Err(e) => {
                tracing::error!("topic extraction failed: {e}");
                self.notify(ToastKind::Error, "Could not analyse the text. Please try again.");
                return;
            }
        };
        let added = merge_topics(&mut self.topics, found);
        self.persist_topics();
        self.topic_input.clear();
        self.topic_input_focused = false;
        self.notify(ToastKind::Success, format!("Added {added} topics!"));
    }

    pub fn toggle_theme(&mut self) {
        self.config.toggle_theme();
        if let Some(theme) = Theme::load(&self.config.theme) {
            self.theme = theme;
        }
        if let Some(path) = self.config_path.as_ref()
            && let Err(e) = self.config.save_to(path)
        {
            tracing::warn!("failed to save config: {e}");
        }
    }

    // --- navigation ----------------------------------------------------

    /// Switch to a non-quiz screen, dropping every in-flight request.
    pub fn go_to(&mut self, screen: AppScreen) {
        if screen == AppScreen::Quiz || self.screen == AppScreen::Quiz {
            return;
        }
        self.ai.clear();
        self.pending_batch = None;
        self.topics_source = None;
        self.screen = screen;
        self.sync_snapshot();
    }

    /// Back to HOME from any screen except the quiz, which only ends through
    /// `end_session`.
    pub fn go_home(&mut self) {
        let leaving_game = matches!(self.screen, AppScreen::SpeedMath | AppScreen::Capacity);
        self.go_to(AppScreen::Home);
        if leaving_game && self.screen == AppScreen::Home {
            self.speed_math = None;
            self.capacity = CapacityTrainer::default();
            self.clear_snapshot();
        }
    }

    pub fn go_to_speed_math(&mut self) {
        self.speed_math = Some(SpeedMath::new(&mut self.rng));
        self.go_to(AppScreen::SpeedMath);
    }

    pub fn go_to_capacity(&mut self) {
        self.capacity = CapacityTrainer::default();
        self.go_to(AppScreen::Capacity);
    }

    pub fn go_to_study_guide(&mut self, category: Option<&str>) {
        self.guide_selected = category
            .and_then(|id| self.guide.position(id))
            .unwrap_or(0);
        self.guide_scroll = 0;
        self.go_to(AppScreen::StudyGuide);
    }

    pub fn go_to_planner(&mut self) {
        self.planner_form = if self.plan.exam_date.is_none() {
            Some(self.planner_form_from_plan())
        } else {
            None
        };
        self.go_to(AppScreen::Planner);
    }

    // --- planner -------------------------------------------------------

    fn planner_form_from_plan(&self) -> PlannerForm {
        let date = self
            .plan
            .exam_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        PlannerForm {
            field: PlannerField::ExamDate,
            exam_date: LineInput::new(&date),
            target: LineInput::new(&self.plan.target_questions.to_string()),
            error: None,
        }
    }

    pub fn edit_plan(&mut self) {
        self.planner_form = Some(self.planner_form_from_plan());
    }

    /// Leave the form; without a saved exam date there is nothing to show
    /// besides the form, so this returns to HOME.
    pub fn cancel_plan_edit(&mut self) {
        self.planner_form = None;
        if self.plan.exam_date.is_none() {
            self.go_home();
        }
    }

    pub fn save_plan(&mut self) {
        let Some(form) = self.planner_form.as_mut() else {
            return;
        };
        let date_text = form.exam_date.value().trim();
        if date_text.is_empty() {
            form.error = Some("Enter an exam date first.".to_string());
            return;
        }
        let Ok(exam_date) = NaiveDate::parse_from_str(date_text, "%Y-%m-%d") else {
            form.error = Some("Use the date format YYYY-MM-DD.".to_string());
            return;
        };
        let target = match form.target.value().trim().parse::<u32>() {
            Ok(target) if target > 0 => target,
            _ => {
                form.error = Some("The target must be a positive number.".to_string());
                return;
            }
        };
        self.plan = StudyPlan {
            exam_date: Some(exam_date),
            target_questions: target,
            start_date: self.plan.start_date,
        };
        self.planner_form = None;
        self.persist_plan();
        self.notify(ToastKind::Success, "Study plan saved.");
    }

    // --- review --------------------------------------------------------

    pub fn review_items(&self) -> Vec<&SavedQuestion> {
        self.saved
            .iter()
            .filter(|q| match self.review.filter {
                ReviewFilter::All => true,
                ReviewFilter::Incorrect => !q.was_correct(),
            })
            .collect()
    }

    pub fn toggle_review_filter(&mut self) {
        self.review.filter = match self.review.filter {
            ReviewFilter::All => ReviewFilter::Incorrect,
            ReviewFilter::Incorrect => ReviewFilter::All,
        };
        self.review.selected = 0;
    }

    pub fn clear_saved(&mut self) {
        self.saved.clear();
        self.review = ReviewState::default();
        self.persist_saved();
        self.notify(ToastKind::Info, "Saved questions cleared.");
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Unwrap a record load, remembering which file failed.
fn loaded<T>(result: Result<Option<T>, StoreError>, failed: &mut Vec<&'static str>) -> Option<T> {
    match result {
        Ok(data) => data,
        Err(e) => {
            tracing::error!("{e}");
            failed.push(e.file());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::session::question::{Question, sample_question};

    fn make_app() -> (TempDir, App) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        let mut app = App::with_store(store);
        app.seed_rng(17);
        (dir, app)
    }

    fn batch(n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| sample_question("Analogieën", Difficulty::ALL[i % 3], "B"))
            .collect()
    }

    fn reply_to(app: &mut App, target: AiTarget, outcome: Result<AiOutcome, AiError>) {
        let jobs = app.take_jobs();
        let (id, _) = jobs
            .into_iter()
            .rev()
            .find(|(id, _)| app.ai.in_flight.get(id) == Some(&target))
            .expect("request for target");
        app.handle_ai_reply(AiReply { id, result: outcome });
    }

    fn start_quiz(app: &mut App, n: usize) {
        app.start_session("Analogieën", false);
        reply_to(app, AiTarget::Batch, Ok(AiOutcome::Batch(batch(n))));
    }

    #[test]
    fn test_new_app_seeds_starter_questions() {
        let (_dir, app) = make_app();
        assert_eq!(app.screen, AppScreen::Home);
        assert_eq!(app.saved.len(), 30);
        let store = app.store.as_ref().unwrap();
        let persisted = store.load_saved_questions().unwrap().unwrap();
        assert_eq!(persisted.questions.len(), 30);
        assert_eq!(app.topics, default_topics());
    }

    #[test]
    fn test_start_session_waits_on_home() {
        let (_dir, mut app) = make_app();
        app.start_session("Analogieën", false);
        assert_eq!(app.screen, AppScreen::Home);
        assert!(app.pending_batch.is_some());
        assert!(app.is_loading(AiTarget::Batch));

        reply_to(&mut app, AiTarget::Batch, Ok(AiOutcome::Batch(batch(3))));
        assert_eq!(app.screen, AppScreen::Quiz);
        assert!(app.pending_batch.is_none());
        let quiz = app.quiz.as_ref().unwrap();
        assert_eq!((quiz.index, quiz.score, quiz.total), (0, 0, 0));
        assert!(app.store.as_ref().unwrap().has_active_session());
    }

    #[test]
    fn test_failed_batch_stays_home() {
        let (_dir, mut app) = make_app();
        app.start_session("Syllogismen", false);
        reply_to(&mut app, AiTarget::Batch, Err(AiError::EmptyBatch));
        assert_eq!(app.screen, AppScreen::Home);
        assert!(app.quiz.is_none());
        assert!(app.pending_batch.is_none());
        assert_eq!(app.toast.as_ref().map(|t| t.kind), Some(ToastKind::Error));
    }

    #[test]
    fn test_cancelled_batch_reply_is_discarded() {
        let (_dir, mut app) = make_app();
        app.start_session("Analogieën", false);
        let jobs = app.take_jobs();
        app.cancel_batch();
        let (id, _) = jobs[0].clone();
        app.handle_ai_reply(AiReply {
            id,
            result: Ok(AiOutcome::Batch(batch(2))),
        });
        assert_eq!(app.screen, AppScreen::Home);
        assert!(app.quiz.is_none());
    }

    #[test]
    fn test_answer_records_and_ignores_repeat() {
        let (_dir, mut app) = make_app();
        start_quiz(&mut app, 3);
        let before = app.saved.len();

        assert_eq!(app.answer("B"), Some(true));
        assert_eq!(app.answer("A"), None);
        let quiz = app.quiz.as_ref().unwrap();
        assert_eq!((quiz.score, quiz.total), (1, 1));
        assert_eq!(app.stats.total_questions, 1);
        assert_eq!(app.saved.len(), before + 1);
        assert!(app.aids.success_message.is_some());
    }

    #[test]
    fn test_answer_with_unknown_label_is_ignored() {
        let (_dir, mut app) = make_app();
        start_quiz(&mut app, 1);
        assert_eq!(app.answer("F"), None);
        assert_eq!(app.stats.total_questions, 0);
    }

    #[test]
    fn test_end_without_answers_adds_no_history() {
        let (_dir, mut app) = make_app();
        start_quiz(&mut app, 2);
        app.end_session();
        assert_eq!(app.screen, AppScreen::Home);
        assert!(app.stats.history.is_empty());
        assert!(!app.store.as_ref().unwrap().has_active_session());
    }

    #[test]
    fn test_definitions_for_previous_question_are_dropped() {
        let (_dir, mut app) = make_app();
        start_quiz(&mut app, 2);
        let jobs = app.take_jobs();
        let (first_defs, _) = jobs
            .iter()
            .find(|(_, r)| matches!(r, AiRequest::Definitions { .. }))
            .cloned()
            .unwrap();

        app.answer("B");
        app.next();
        app.handle_ai_reply(AiReply {
            id: first_defs,
            result: Ok(AiOutcome::Definitions(Some("Stale".to_string()))),
        });
        assert!(app.aids.definitions.is_none());

        reply_to(
            &mut app,
            AiTarget::Definitions,
            Ok(AiOutcome::Definitions(Some("Blad: deel van een plant".to_string()))),
        );
        assert_eq!(app.aids.definitions.as_deref(), Some("Blad: deel van een plant"));
    }

    #[test]
    fn test_steps_reveal_one_at_a_time() {
        let (_dir, mut app) = make_app();
        start_quiz(&mut app, 1);
        app.reveal_step();
        let steps = vec![
            Step {
                step: "Zoek de relatie".to_string(),
                hint: String::new(),
            },
            Step {
                step: "Pas toe".to_string(),
                hint: String::new(),
            },
        ];
        reply_to(&mut app, AiTarget::Steps, Ok(AiOutcome::Steps(steps)));
        assert_eq!(app.aids.steps_revealed, 1);
        app.reveal_step();
        app.reveal_step();
        assert_eq!(app.aids.steps_revealed, 2);
    }

    #[test]
    fn test_verify_requires_answer() {
        let (_dir, mut app) = make_app();
        start_quiz(&mut app, 1);
        app.take_jobs();
        app.verify_answer();
        assert!(app.take_jobs().is_empty());
        app.answer("A");
        app.verify_answer();
        assert!(matches!(
            app.take_jobs().as_slice(),
            [(_, AiRequest::Verify { .. })]
        ));
    }

    #[test]
    fn test_diagram_only_for_syllogisms() {
        let (_dir, mut app) = make_app();
        start_quiz(&mut app, 1);
        app.take_jobs();
        app.request_diagram();
        assert!(app.take_jobs().is_empty());
    }

    #[test]
    fn test_diagram_without_store_is_reported() {
        let mut app = App::new(Config::default(), None, None);
        app.start_session("Syllogismen", false);
        let questions = vec![sample_question("Syllogismen", Difficulty::Medium, "A")];
        reply_to(&mut app, AiTarget::Batch, Ok(AiOutcome::Batch(questions)));
        app.take_jobs();

        app.request_diagram();
        reply_to(
            &mut app,
            AiTarget::Diagram,
            Ok(AiOutcome::Diagram(Some("<svg></svg>".to_string()))),
        );
        assert!(app.aids.diagram_path.is_none());
        assert_eq!(app.toast.as_ref().map(|t| t.kind), Some(ToastKind::Info));
    }

    #[test]
    fn test_add_topics_falls_back_to_lines() {
        let (_dir, mut app) = make_app();
        app.topic_input.insert_str("Meteorologie\nab\nNavigatie");
        app.add_topics();
        reply_to(&mut app, AiTarget::Topics, Ok(AiOutcome::Topics(Vec::new())));
        assert!(app.topics.contains(&"Meteorologie".to_string()));
        assert!(app.topics.contains(&"Navigatie".to_string()));
        assert!(!app.topics.contains(&"ab".to_string()));
        assert!(app.topic_input.is_empty());
        let stored = app.store.as_ref().unwrap().load_topics().unwrap().unwrap();
        assert_eq!(stored.topics, app.topics);
    }

    #[test]
    fn test_paste_goes_to_focused_field() {
        let (_dir, mut app) = make_app();
        app.paste("ignored");
        assert!(app.topic_input.is_empty());
        app.activate(HomeAction::AddTopics);
        app.paste("Meteorologie\r\nNavigatie");
        assert_eq!(app.topic_input.value(), "Meteorologie\nNavigatie");
    }

    #[test]
    fn test_blank_topic_input_sends_nothing() {
        let (_dir, mut app) = make_app();
        app.topic_input.insert_str("   ");
        app.add_topics();
        assert!(app.take_jobs().is_empty());
    }

    #[test]
    fn test_toast_expires() {
        let (_dir, mut app) = make_app();
        app.notify(ToastKind::Info, "hello");
        let shown = app.toast.as_ref().unwrap().shown_at;
        app.tick(shown + Duration::from_secs(4));
        assert!(app.toast.is_some());
        app.tick(shown + Duration::from_secs(5));
        assert!(app.toast.is_none());
    }

    #[test]
    fn test_planner_save_validates() {
        let (_dir, mut app) = make_app();
        app.go_to_planner();
        let form = app.planner_form.as_mut().unwrap();
        form.exam_date = LineInput::new("next week");
        app.save_plan();
        assert!(app.planner_form.as_ref().unwrap().error.is_some());

        let form = app.planner_form.as_mut().unwrap();
        form.exam_date = LineInput::new("2031-06-01");
        form.target = LineInput::new("1500");
        app.save_plan();
        assert!(app.planner_form.is_none());
        assert_eq!(app.plan.target_questions, 1500);
        let stored = app.store.as_ref().unwrap().load_study_plan().unwrap().unwrap();
        assert_eq!(stored.plan, app.plan);
    }

    #[test]
    fn test_review_filter_incorrect() {
        let (_dir, mut app) = make_app();
        start_quiz(&mut app, 2);
        app.answer("B");
        app.end_session();
        app.activate(HomeAction::Review);
        let all = app.review_items().len();
        app.toggle_review_filter();
        let incorrect = app.review_items().len();
        assert_eq!(all, 31);
        assert_eq!(incorrect, 30);
    }

    #[test]
    fn test_quiz_screen_ignores_navigation() {
        let (_dir, mut app) = make_app();
        start_quiz(&mut app, 1);
        app.go_home();
        assert_eq!(app.screen, AppScreen::Quiz);
    }

    #[test]
    fn test_leaving_mini_game_clears_snapshot() {
        let (_dir, mut app) = make_app();
        app.go_to_speed_math();
        assert!(app.store.as_ref().unwrap().has_active_session());
        app.go_home();
        assert!(!app.store.as_ref().unwrap().has_active_session());
    }
}
