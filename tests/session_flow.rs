use pilotprep::ai::{AiError, AiOutcome, AiReply, AiRequest, RequestId};
use pilotprep::app::{App, AppScreen, HomeAction, ToastKind};
use pilotprep::session::question::{Difficulty, Question};
use pilotprep::store::JsonStore;
use tempfile::TempDir;

fn question(topic: &str, difficulty: Difficulty, n: usize) -> Question {
    Question {
        topic: topic.to_string(),
        question: format!("Vraag {n}: Vogel staat tot Nest als Bij staat tot ..."),
        options: vec![
            "A) Honing".to_string(),
            "B) Korf".to_string(),
            "C) Bloem".to_string(),
            "D) Angel".to_string(),
        ],
        correct_answer: "B".to_string(),
        difficulty,
        explanation: "Een vogel woont in een nest, een bij in een korf.".to_string(),
    }
}

fn batch(topic: &str, n: usize) -> Vec<Question> {
    (0..n)
        .map(|i| question(topic, Difficulty::ALL[i % 3], i))
        .collect()
}

fn new_app(dir: &TempDir) -> App {
    let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    let mut app = App::with_store(store);
    app.seed_rng(7);
    app
}

fn batch_request(app: &mut App) -> RequestId {
    app.take_jobs()
        .into_iter()
        .find(|(_, request)| matches!(request, AiRequest::Batch { .. }))
        .map(|(id, _)| id)
        .expect("batch request queued")
}

fn start(app: &mut App, topic: &str, n: usize) {
    app.start_session(topic, false);
    let id = batch_request(app);
    app.handle_ai_reply(AiReply {
        id,
        result: Ok(AiOutcome::Batch(batch(topic, n))),
    });
}

fn assert_totals_consistent(app: &App) {
    let stats = &app.stats;
    let by_difficulty: u32 = Difficulty::ALL
        .iter()
        .map(|&d| stats.difficulty(d).total)
        .sum();
    let by_topic: u32 = stats.topic_breakdown.values().map(|t| t.total).sum();
    assert_eq!(stats.total_questions, by_difficulty);
    assert_eq!(stats.total_questions, by_topic);
}

#[test]
fn ten_question_session_records_one_result() {
    let dir = TempDir::new().unwrap();
    let mut app = new_app(&dir);

    start(&mut app, "Analogieën", 10);
    assert_eq!(app.screen, AppScreen::Quiz);

    assert_eq!(app.answer("B"), Some(true));
    let quiz = app.quiz.as_ref().unwrap();
    assert_eq!((quiz.score, quiz.total), (1, 1));

    let saved_before = app.saved.len();
    assert_eq!(app.answer("A"), None);
    let quiz = app.quiz.as_ref().unwrap();
    assert_eq!((quiz.score, quiz.total), (1, 1));
    assert_eq!(app.saved.len(), saved_before);

    for _ in 0..9 {
        app.next();
        assert_eq!(app.screen, AppScreen::Quiz);
    }
    app.next();

    assert_eq!(app.screen, AppScreen::Home);
    assert!(app.quiz.is_none());
    assert_eq!(app.stats.history.len(), 1);
    let result = &app.stats.history[0];
    assert_eq!(result.topic, "Analogieën");
    assert_eq!((result.score, result.total), (1, 1));
    assert!(!app.store.as_ref().unwrap().has_active_session());
}

#[test]
fn stats_stay_consistent_over_mixed_sessions() {
    let dir = TempDir::new().unwrap();
    let mut app = new_app(&dir);

    for (topic, answers) in [
        ("Analogieën", ["B", "A", "B"]),
        ("Syllogismen", ["C", "B", "D"]),
    ] {
        start(&mut app, topic, 3);
        for label in answers {
            app.answer(label);
            assert_totals_consistent(&app);
            app.next();
        }
        assert_eq!(app.screen, AppScreen::Home);
    }

    assert_eq!(app.stats.total_questions, 6);
    assert_eq!(app.stats.correct, 3);
    assert_eq!(app.stats.history.len(), 2);
    assert!(app.stats.totals_consistent());

    let reloaded = new_app(&dir);
    assert_eq!(reloaded.stats, app.stats);
}

#[test]
fn answered_questions_are_saved_newest_first() {
    let dir = TempDir::new().unwrap();
    let mut app = new_app(&dir);
    start(&mut app, "Analogieën", 2);

    app.answer("B");
    app.next();
    app.answer("C");

    assert!(app.saved[0].question.question.starts_with("Vraag 1"));
    assert_eq!(app.saved[0].user_answer.as_deref(), Some("C"));
    assert!(app.saved[1].question.question.starts_with("Vraag 0"));
}

#[test]
fn ending_without_answers_adds_no_history_but_clears_snapshot() {
    let dir = TempDir::new().unwrap();
    let mut app = new_app(&dir);
    start(&mut app, "Analogieën", 4);
    assert!(app.store.as_ref().unwrap().has_active_session());

    app.end_session();

    assert!(app.stats.history.is_empty());
    assert_eq!(app.screen, AppScreen::Home);
    assert!(!app.store.as_ref().unwrap().has_active_session());
}

#[test]
fn failed_generation_returns_home_with_error() {
    let dir = TempDir::new().unwrap();
    let mut app = new_app(&dir);

    app.activate(HomeAction::MathTraining);
    let id = batch_request(&mut app);
    app.handle_ai_reply(AiReply {
        id,
        result: Err(AiError::Status {
            status: 503,
            body: "overloaded".to_string(),
        }),
    });

    assert_eq!(app.screen, AppScreen::Home);
    assert!(app.quiz.is_none());
    assert!(app.pending_batch.is_none());
    assert_eq!(app.toast.as_ref().map(|t| t.kind), Some(ToastKind::Error));
    assert!(!app.store.as_ref().unwrap().has_active_session());
}

#[test]
fn reply_after_leaving_is_ignored() {
    let dir = TempDir::new().unwrap();
    let mut app = new_app(&dir);

    app.start_session("Verbaal", false);
    let id = batch_request(&mut app);
    app.activate(HomeAction::Dashboard);
    assert_eq!(app.screen, AppScreen::Dashboard);

    app.handle_ai_reply(AiReply {
        id,
        result: Ok(AiOutcome::Batch(batch("Verbaal", 3))),
    });
    assert_eq!(app.screen, AppScreen::Dashboard);
    assert!(app.quiz.is_none());
}

#[test]
fn extracted_topics_persist_across_restart() {
    let dir = TempDir::new().unwrap();
    let mut app = new_app(&dir);

    app.activate(HomeAction::AddTopics);
    app.paste("Meteorologie\nLuchtrecht");
    app.add_topics();
    let id = app
        .take_jobs()
        .into_iter()
        .find(|(_, r)| matches!(r, AiRequest::Topics { .. }))
        .map(|(id, _)| id)
        .unwrap();
    app.handle_ai_reply(AiReply {
        id,
        result: Ok(AiOutcome::Topics(vec![
            "Meteorologie".to_string(),
            "Luchtrecht".to_string(),
        ])),
    });

    let reloaded = new_app(&dir);
    assert!(reloaded.topics.contains(&"Meteorologie".to_string()));
    assert!(reloaded.topics.contains(&"Luchtrecht".to_string()));
    assert!(
        reloaded
            .home_actions()
            .contains(&HomeAction::Topic("Luchtrecht".to_string()))
    );
}

#[test]
fn offline_topic_extraction_uses_line_fallback() {
    let dir = TempDir::new().unwrap();
    let mut app = new_app(&dir);

    let lines: Vec<String> = (0..14).map(|i| format!("Onderwerp {i}")).collect();
    app.activate(HomeAction::AddTopics);
    app.paste(&format!("abc\n{}", lines.join("\n")));
    app.add_topics();
    let id = app.take_jobs()[0].0;
    app.handle_ai_reply(AiReply {
        id,
        result: Err(AiError::Disabled),
    });

    let added: Vec<&String> = app
        .topics
        .iter()
        .filter(|t| t.starts_with("Onderwerp"))
        .collect();
    assert_eq!(added.len(), 10);
    assert!(!app.topics.contains(&"abc".to_string()));
}
