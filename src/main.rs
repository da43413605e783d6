mod ai;
mod app;
mod config;
mod engine;
mod event;
mod games;
mod session;
mod store;
mod ui;

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::{Datelike, Local};
use clap::Parser;
use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};
use tracing_subscriber::EnvFilter;

use ai::gemini::GeminiConfig;
use ai::{GeminiClient, QuestionService};
use app::{AiTarget, App, AppScreen};
use config::{Config, TimerPolicy};
use event::{AppEvent, EventHandler};
use games::capacity::CapacityMode;
use games::memory::MemoryPhase;
use store::JsonStore;
use ui::components::capacity_view::CapacityView;
use ui::components::dashboard::Dashboard;
use ui::components::guide_view::GuideView;
use ui::components::menu::{Menu, MenuItem};
use ui::components::planner_view::PlannerView;
use ui::components::progress_bar::ProgressBar;
use ui::components::quiz_card::{AidsLoading, AidsPanel, QuizCard};
use ui::components::review_list::ReviewList;
use ui::components::speed_math_view::SpeedMathView;
use ui::components::toast::{LoadingOverlay, ToastView};
use ui::layout::{AppLayout, pack_hint_lines};
use ui::line_input::InputResult;

#[derive(Parser)]
#[command(name = "pilotprep", version, about = "Pilot selection exam trainer for the terminal")]
struct Cli {
    #[arg(short, long, help = "Theme name (dark, light)")]
    theme: Option<String>,

    #[arg(long, help = "Directory for saved progress")]
    data_dir: Option<PathBuf>,

    #[arg(short, long, help = "Questions per generated batch")]
    batch_size: Option<usize>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let store = match cli.data_dir {
        Some(dir) => JsonStore::with_base_dir(dir),
        None => JsonStore::new(),
    }
    .ok();
    if let Some(dir) = store.as_ref().map(|s| s.base_dir().clone()) {
        if let Err(e) = init_logging(&dir) {
            eprintln!("pilotprep: logging disabled: {e}");
        }
    }

    let mut config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("could not read config, using defaults: {e}");
        Config::default()
    });
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if let Some(size) = cli.batch_size {
        config.batch_size = size;
    }
    config.validate();

    let client = GeminiClient::new(GeminiConfig::from_config(&config))
        .or_else(|e| {
            tracing::error!("could not build HTTP client: {e}");
            GeminiClient::new(None)
        })?;
    if !client.enabled() {
        tracing::info!(env = %config.api_key_env, "no API key found, AI features disabled");
    }
    let service: Arc<dyn QuestionService> = Arc::new(client);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting pilotprep");
    let mut app = App::new(config, store, Some(Config::config_path()));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events, service);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!("exiting with error: {err:?}");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn init_logging(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("pilotprep.log"))?;
    let filter = EnvFilter::try_from_env("PILOTPREP_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
    service: Arc<dyn QuestionService>,
) -> Result<()> {
    loop {
        for (id, request) in app.take_jobs() {
            ai::worker::spawn(Arc::clone(&service), id, request, events.sender());
        }

        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Paste(text) => app.paste(&text),
            AppEvent::Ai(reply) => app.handle_ai_reply(reply),
            AppEvent::Tick => app.tick(Instant::now()),
            AppEvent::Resize(_, _) => {}
        }
        app.sync_snapshot();

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Home => handle_home_key(app, key),
        AppScreen::Quiz => handle_quiz_key(app, key),
        AppScreen::Dashboard => handle_dashboard_key(app, key),
        AppScreen::StudyGuide => handle_guide_key(app, key),
        AppScreen::SpeedMath => handle_speed_math_key(app, key),
        AppScreen::Review => handle_review_key(app, key),
        AppScreen::Planner => handle_planner_key(app, key),
        AppScreen::Capacity => handle_capacity_key(app, key),
    }
}

fn handle_home_key(app: &mut App, key: KeyEvent) {
    if app.pending_batch.is_some() {
        if key.code == KeyCode::Esc {
            app.cancel_batch();
        }
        return;
    }

    if app.topic_input_focused {
        match app.topic_input.handle(key) {
            InputResult::Submit => app.add_topics(),
            InputResult::Cancel => app.topic_input_focused = false,
            InputResult::Continue => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.home_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.home_next(),
        KeyCode::Enter => app.activate_selected(),
        KeyCode::Char(ch) => {
            if let Some(action) = app
                .home_actions()
                .into_iter()
                .find(|action| action.key() == Some(ch))
            {
                app.activate(action);
            }
        }
        _ => {}
    }
}

fn handle_quiz_key(app: &mut App, key: KeyEvent) {
    if app.aids.scratchpad_open {
        match app.aids.scratchpad.handle(key) {
            InputResult::Submit | InputResult::Cancel => app.toggle_scratchpad(),
            InputResult::Continue => {}
        }
        return;
    }

    let answered = app.quiz.as_ref().is_some_and(|q| q.answered);
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.end_session(),
        KeyCode::Char(ch @ 'a'..='f') if !answered => {
            app.answer(&ch.to_ascii_uppercase().to_string());
        }
        KeyCode::Char(ch @ '1'..='6') if !answered => {
            let label = (b'A' + (ch as u8 - b'1')) as char;
            app.answer(&label.to_string());
        }
        KeyCode::Enter if answered => app.next(),
        KeyCode::Char('n') => app.next(),
        KeyCode::Char('h') => app.reveal_step(),
        KeyCode::Char('x') => app.explain_more(),
        KeyCode::Char('v') => app.verify_answer(),
        KeyCode::Char('g') => app.request_diagram(),
        KeyCode::Char('w') => app.toggle_scratchpad(),
        _ => {}
    }
}

fn handle_dashboard_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_home(),
        KeyCode::Char('g') => {
            let category = app.stats.recommendation().map(|rec| rec.category);
            app.go_to_study_guide(category);
        }
        _ => {}
    }
}

fn handle_guide_key(app: &mut App, key: KeyEvent) {
    let count = app.guide.categories.len();
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_home(),
        KeyCode::Up | KeyCode::Char('k') if count > 0 => {
            app.guide_selected = (app.guide_selected + count - 1) % count;
            app.guide_scroll = 0;
        }
        KeyCode::Down | KeyCode::Char('j') if count > 0 => {
            app.guide_selected = (app.guide_selected + 1) % count;
            app.guide_scroll = 0;
        }
        KeyCode::PageDown | KeyCode::Char(' ') => {
            app.guide_scroll = app.guide_scroll.saturating_add(5);
        }
        KeyCode::PageUp => app.guide_scroll = app.guide_scroll.saturating_sub(5),
        _ => {}
    }
}

fn handle_speed_math_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Esc {
        app.go_home();
        return;
    }
    let Some(game) = app.speed_math.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Char(ch) => game.type_char(ch),
        KeyCode::Backspace => game.backspace(),
        KeyCode::Enter => {
            game.submit(Instant::now(), &mut app.rng);
        }
        _ => {}
    }
}

fn handle_capacity_key(app: &mut App, key: KeyEvent) {
    let now = Instant::now();
    if key.code == KeyCode::Esc {
        if !app.capacity.stop() {
            app.go_home();
        }
        return;
    }

    if matches!(app.capacity.mode, CapacityMode::Menu) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => app.capacity.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => app.capacity.select_next(),
            KeyCode::Enter => {
                let drill = app.capacity.selected_drill();
                app.capacity.start(drill, &mut app.rng, now);
            }
            _ => {}
        }
        return;
    }

    match &mut app.capacity.mode {
        CapacityMode::Menu => {}
        CapacityMode::Memory(game) => match (game.phase, key.code) {
            (MemoryPhase::Recall, KeyCode::Char(ch)) => game.type_char(ch),
            (MemoryPhase::Recall, KeyCode::Backspace) => game.backspace(),
            (MemoryPhase::Recall, KeyCode::Tab | KeyCode::Down) => game.focus_next(),
            (MemoryPhase::Recall, KeyCode::BackTab | KeyCode::Up) => game.focus_prev(),
            (MemoryPhase::Recall, KeyCode::Enter) => {
                game.submit();
            }
            (MemoryPhase::Feedback(_), KeyCode::Enter) => game.next(&mut app.rng, now),
            _ => {}
        },
        CapacityMode::Compass(game) => match key.code {
            KeyCode::Char(ch) => game.type_char(ch),
            KeyCode::Backspace => game.backspace(),
            KeyCode::Enter => {
                game.submit(now);
            }
            _ => {}
        },
    }
}

fn handle_review_key(app: &mut App, key: KeyEvent) {
    if app.review.confirm_clear {
        match key.code {
            KeyCode::Char('y') => app.clear_saved(),
            KeyCode::Char('n') | KeyCode::Esc => app.review.confirm_clear = false,
            _ => {}
        }
        return;
    }

    let count = app.review_items().len();
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_home(),
        KeyCode::Down | KeyCode::Char('j') => {
            if count > 0 {
                app.review.selected = (app.review.selected + 1).min(count - 1);
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.review.selected = app.review.selected.saturating_sub(1);
        }
        KeyCode::Char('f') | KeyCode::Tab => app.toggle_review_filter(),
        KeyCode::Char('c') | KeyCode::Delete => {
            if !app.saved.is_empty() {
                app.review.confirm_clear = true;
            }
        }
        _ => {}
    }
}

fn handle_planner_key(app: &mut App, key: KeyEvent) {
    let Some(form) = app.planner_form.as_mut() else {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => app.go_home(),
            KeyCode::Char('e') => app.edit_plan(),
            _ => {}
        }
        return;
    };

    match key.code {
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => form.switch_field(),
        _ => match form.focused_mut().handle(key) {
            InputResult::Submit => app.save_plan(),
            InputResult::Cancel => app.cancel_plan_edit(),
            InputResult::Continue => form.error = None,
        },
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let hints = footer_hints(app);
    let hint_lines = pack_hint_lines(&hints, area.width as usize);
    let layout = AppLayout::new(area, hint_lines.len() as u16);

    render_header(frame, app, layout.header);

    match app.screen {
        AppScreen::Home => render_home(frame, app, layout.main),
        AppScreen::Quiz => render_quiz(frame, app, &layout),
        AppScreen::Dashboard => {
            frame.render_widget(Dashboard::new(&app.stats, &app.ranks, &app.theme), layout.main);
        }
        AppScreen::StudyGuide => frame.render_widget(
            GuideView::new(&app.guide, app.guide_selected, app.guide_scroll, &app.theme),
            layout.main,
        ),
        AppScreen::SpeedMath => {
            if let Some(game) = app.speed_math.as_ref() {
                frame.render_widget(SpeedMathView::new(game, &app.theme), layout.main);
            }
        }
        AppScreen::Review => {
            let items = app.review_items();
            frame.render_widget(
                ReviewList::new(
                    &items,
                    app.review.selected,
                    app.review.filter,
                    app.review.confirm_clear,
                    &app.theme,
                ),
                layout.main,
            );
        }
        AppScreen::Planner => render_planner(frame, app, layout.main),
        AppScreen::Capacity => frame.render_widget(
            CapacityView::new(&app.capacity, Instant::now(), &app.theme),
            layout.main,
        ),
    }

    let footer = Paragraph::new(
        hint_lines
            .into_iter()
            .map(|line| Line::from(Span::styled(line, Style::default().fg(colors.muted()))))
            .collect::<Vec<_>>(),
    );
    frame.render_widget(footer, layout.footer);

    if let Some(pending) = app.pending_batch.as_ref() {
        frame.render_widget(
            LoadingOverlay::new(&pending.topic, pending.difficulty, pending.message, &app.theme),
            layout.main,
        );
    }
    if let Some(toast) = app.toast.as_ref() {
        frame.render_widget(ToastView::new(toast, &app.theme), layout.main);
    }
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let colors = &app.theme.colors;
    let rank = app.ranks.current(app.stats.correct);
    let info = match (app.screen, app.quiz.as_ref()) {
        (AppScreen::Quiz, Some(quiz)) => format!(
            " {} | Score {}/{} ",
            quiz.topic, quiz.score, quiz.total
        ),
        _ => format!(
            " {} | {} answered | {}% accuracy ",
            rank.title,
            app.stats.total_questions,
            app.stats.accuracy()
        ),
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " pilotprep ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(info, Style::default().fg(colors.muted()).bg(colors.header_bg())),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_home(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let colors = &app.theme.colors;
    let reminder = app.reminder();
    let show_input = app.topic_input_focused || app.is_loading(AiTarget::Topics);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(u16::from(reminder.is_some())),
            Constraint::Min(8),
            Constraint::Length(if show_input { 6 } else { 0 }),
        ])
        .split(area);

    if let Some(text) = reminder {
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!(" {text}"),
                Style::default()
                    .fg(colors.warning())
                    .add_modifier(Modifier::BOLD),
            )),
            layout[0],
        );
    }

    let items = app
        .home_actions()
        .iter()
        .map(|action| MenuItem {
            key: action.key(),
            label: action.label(),
            description: action.description().to_string(),
        })
        .collect();
    let menu = Menu::new(items, app.home_selected, app.quote, &app.theme);
    frame.render_widget(&menu, ui::layout::centered_rect(70, 100, layout[1]));

    if show_input {
        let (before, cursor, after) = app.topic_input.render_parts();
        let title = if app.is_loading(AiTarget::Topics) {
            " Analysing text... "
        } else {
            " Paste study material, Enter to extract topics "
        };
        let text = vec![Line::from(vec![
            Span::styled(before.to_string(), Style::default().fg(colors.fg())),
            Span::styled(
                cursor.map(String::from).unwrap_or_else(|| " ".to_string()),
                Style::default().fg(colors.bg()).bg(colors.fg()),
            ),
            Span::styled(after.to_string(), Style::default().fg(colors.fg())),
        ])];
        frame.render_widget(
            Paragraph::new(text)
                .wrap(Wrap { trim: false })
                .block(
                    Block::bordered()
                        .title(title)
                        .border_style(Style::default().fg(colors.border_focused())),
                ),
            layout[2],
        );
    }
}

fn render_quiz(frame: &mut ratatui::Frame, app: &App, layout: &AppLayout) {
    let Some(quiz) = app.quiz.as_ref() else {
        return;
    };
    let colors = &app.theme.colors;
    let now = Instant::now();

    let show_timer = app.config.timer == TimerPolicy::Advisory && app.timer.is_some();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(if show_timer { 3 } else { 0 }),
            Constraint::Min(5),
        ])
        .split(layout.main);

    if let Some(timer) = app.timer.as_ref().filter(|_| show_timer) {
        let remaining = timer.remaining(now).as_secs();
        let (label, fill) = if timer.expired(now) {
            ("Time's up", colors.error())
        } else if timer.ratio_left(now) < 0.25 {
            ("Time", colors.warning())
        } else {
            ("Time", colors.bar_filled())
        };
        frame.render_widget(
            ProgressBar::new(label, timer.ratio_left(now), &app.theme)
                .caption(format!("{}:{:02}", remaining / 60, remaining % 60))
                .fill(fill),
            rows[0],
        );
    }

    let body = AppLayout {
        header: layout.header,
        main: rows[1],
        footer: layout.footer,
    };
    let (card_area, aids_area) = body.split_main(40);
    frame.render_widget(
        QuizCard::new(quiz, app.aids.success_message, &app.theme),
        card_area,
    );
    let loading = AidsLoading {
        definitions: app.is_loading(AiTarget::Definitions),
        explanation: app.is_loading(AiTarget::Explanation),
        steps: app.is_loading(AiTarget::Steps),
        verify: app.is_loading(AiTarget::Verify),
        diagram: app.is_loading(AiTarget::Diagram),
    };
    frame.render_widget(AidsPanel::new(&app.aids, loading, &app.theme), aids_area);
}

fn render_planner(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let today = Local::now().date_naive();
    let active = engine::planner::active_days(&app.stats.history, today.year(), today.month());
    frame.render_widget(
        PlannerView::new(
            &app.plan,
            app.stats.total_questions,
            today,
            &active,
            app.planner_form.as_ref(),
            &app.theme,
        ),
        area,
    );
}

fn footer_hints(app: &App) -> Vec<&'static str> {
    match app.screen {
        AppScreen::Home if app.pending_batch.is_some() => vec!["[Esc] Cancel"],
        AppScreen::Home if app.topic_input_focused => {
            vec!["[Enter] Extract topics", "[Esc] Cancel", "[Ctrl+U] Clear"]
        }
        AppScreen::Home => vec![
            "[\u{2191}\u{2193}] Select",
            "[Enter] Start",
            "[1-3] Training",
            "[d] Dashboard",
            "[p] Planner",
            "[g] Guide",
            "[r] Review",
            "[a] Add topics",
            "[t] Theme",
            "[q] Quit",
        ],
        AppScreen::Quiz if app.aids.scratchpad_open => vec!["[Enter/Esc] Close scratchpad"],
        AppScreen::Quiz if app.quiz.as_ref().is_some_and(|q| q.answered) => vec![
            "[Enter/n] Next",
            "[h] Step",
            "[x] Explain",
            "[v] Verify answer",
            "[g] Venn diagram",
            "[w] Scratchpad",
            "[Esc] End session",
        ],
        AppScreen::Quiz => vec![
            "[a-f/1-6] Answer",
            "[h] Step",
            "[x] Explain",
            "[g] Venn diagram",
            "[w] Scratchpad",
            "[n] Skip",
            "[Esc] End session",
        ],
        AppScreen::Dashboard => vec!["[g] Study guide", "[Esc] Back"],
        AppScreen::StudyGuide => vec!["[\u{2191}\u{2193}] Topic", "[PgUp/PgDn] Scroll", "[Esc] Back"],
        AppScreen::SpeedMath => vec!["[0-9 / -] Type", "[Enter] Check", "[Esc] Back"],
        AppScreen::Review if app.review.confirm_clear => vec!["[y] Delete all", "[n] Keep"],
        AppScreen::Review => vec![
            "[\u{2191}\u{2193}] Select",
            "[f] All/incorrect",
            "[c] Clear all",
            "[Esc] Back",
        ],
        AppScreen::Planner if app.planner_form.is_some() => {
            vec!["[Tab] Next field", "[Enter] Save", "[Esc] Cancel"]
        }
        AppScreen::Planner => vec!["[e] Edit plan", "[Esc] Back"],
        AppScreen::Capacity => match &app.capacity.mode {
            CapacityMode::Menu => vec!["[\u{2191}\u{2193}] Select", "[Enter] Start", "[Esc] Back"],
            CapacityMode::Memory(_) => vec!["[Tab] Next field", "[Enter] Submit", "[Esc] Stop"],
            CapacityMode::Compass(_) => vec!["[0-9] Heading", "[Enter] Check", "[Esc] Stop"],
        },
    }
}
