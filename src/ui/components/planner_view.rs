use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::app::{PlannerField, PlannerForm};
use crate::engine::planner::StudyPlan;
use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::components::training_calendar::TrainingCalendar;
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

pub struct PlannerView<'a> {
    plan: &'a StudyPlan,
    done: u32,
    today: NaiveDate,
    active: &'a BTreeSet<u32>,
    form: Option<&'a PlannerForm>,
    theme: &'a Theme,
}

impl<'a> PlannerView<'a> {
    pub fn new(
        plan: &'a StudyPlan,
        done: u32,
        today: NaiveDate,
        active: &'a BTreeSet<u32>,
        form: Option<&'a PlannerForm>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            plan,
            done,
            today,
            active,
            form,
            theme,
        }
    }

    fn render_form(&self, form: &PlannerForm, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let field_line = |label: &'static str, input: &LineInput, focused: bool| {
            let label_style = if focused {
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };
            let (before, cursor, after) = input.render_parts();
            let mut spans = vec![
                Span::styled(format!("  {label:<18}"), label_style),
                Span::styled(before.to_string(), Style::default().fg(colors.fg())),
            ];
            if focused {
                spans.push(Span::styled(
                    cursor.map(String::from).unwrap_or_else(|| " ".to_string()),
                    Style::default().fg(colors.bg()).bg(colors.fg()),
                ));
            } else if let Some(ch) = cursor {
                spans.push(Span::styled(ch.to_string(), Style::default().fg(colors.fg())));
            }
            spans.push(Span::styled(after.to_string(), Style::default().fg(colors.fg())));
            Line::from(spans)
        };

        let mut lines = vec![
            Line::from(Span::styled(
                "  Set your exam date and how many questions you want to practise.",
                Style::default().fg(colors.muted()),
            )),
            Line::from(""),
            field_line(
                "Exam date (Y-M-D)",
                &form.exam_date,
                form.field == PlannerField::ExamDate,
            ),
            field_line(
                "Target questions",
                &form.target,
                form.field == PlannerField::Target,
            ),
        ];
        if let Some(error) = form.error.as_deref() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("  {error}"),
                Style::default().fg(colors.error()),
            )));
        }

        let block = Block::bordered()
            .title(" Plan your exam ")
            .border_style(Style::default().fg(colors.border_focused()));
        Paragraph::new(lines).block(block).render(area, buf);
    }

    fn render_metrics(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(6), Constraint::Length(3)])
            .split(area);

        let days_left = self.plan.days_left(self.today).unwrap_or(0).max(0);
        let exam = self
            .plan
            .exam_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "not set".to_string());
        let (track_text, track_color) = match self.plan.on_track(self.done, self.today) {
            Some(true) => ("On track", colors.success()),
            Some(false) => ("Behind schedule", colors.error()),
            None => ("No exam planned", colors.muted()),
        };

        let metric = |label: &'static str, value: String| {
            Line::from(vec![
                Span::styled(format!("  {label:<20}"), Style::default().fg(colors.fg())),
                Span::styled(
                    value,
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD),
                ),
            ])
        };
        let lines = vec![
            metric("Exam date", exam),
            metric("Days left", days_left.to_string()),
            metric("Daily goal", format!("{} questions", self.plan.daily_goal(self.done, self.today))),
            metric(
                "Remaining",
                format!("{} of {}", self.plan.questions_remaining(self.done), self.plan.target_questions),
            ),
            Line::from(""),
            Line::from(Span::styled(
                format!("  {track_text}"),
                Style::default().fg(track_color).add_modifier(Modifier::BOLD),
            )),
        ];
        Paragraph::new(lines)
            .block(
                Block::bordered()
                    .title(" Study plan ")
                    .border_style(Style::default().fg(colors.border())),
            )
            .wrap(Wrap { trim: false })
            .render(layout[0], buf);

        let percent = self.plan.percent_done(self.done);
        ProgressBar::new("Progress", percent as f64 / 100.0, self.theme)
            .caption(format!("{} / {} ({percent}%)", self.done, self.plan.target_questions))
            .render(layout[1], buf);
    }
}

impl Widget for PlannerView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(" Study planner ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(36), Constraint::Length(32)])
            .split(inner);

        match self.form {
            Some(form) => self.render_form(form, columns[0], buf),
            None => self.render_metrics(columns[0], buf),
        }

        let calendar_area = Rect::new(
            columns[1].x,
            columns[1].y,
            columns[1].width,
            columns[1].height.min(9),
        );
        TrainingCalendar::new(
            self.today.year(),
            self.today.month(),
            Some(self.today.day()),
            self.active,
            self.theme,
        )
        .render(calendar_area, buf);
    }
}
