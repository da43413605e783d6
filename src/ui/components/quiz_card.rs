use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::app::QuestionAids;
use crate::session::question::option_label;
use crate::session::quiz::QuizSession;
use crate::ui::theme::Theme;

/// The current question, its options and, once answered, the explanation.
pub struct QuizCard<'a> {
    quiz: &'a QuizSession,
    success_message: Option<&'a str>,
    theme: &'a Theme,
}

impl<'a> QuizCard<'a> {
    pub fn new(quiz: &'a QuizSession, success_message: Option<&'a str>, theme: &'a Theme) -> Self {
        Self {
            quiz,
            success_message,
            theme,
        }
    }
}

impl Widget for QuizCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let Some(question) = self.quiz.current() else {
            return;
        };

        let title = format!(
            " {} \u{00b7} {} \u{00b7} {}/{} ",
            question.topic,
            question.difficulty.as_str(),
            self.quiz.index + 1,
            self.quiz.queue.len()
        );
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = vec![
            Line::from(Span::styled(
                question.question.as_str(),
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];

        let chosen = self.quiz.user_answer.as_deref();
        for option in &question.options {
            let label = option_label(option);
            let is_correct = question.is_correct(&label);
            let is_chosen = chosen == Some(label.as_str());
            let (marker, style) = if !self.quiz.answered {
                ("  ", Style::default().fg(colors.fg()))
            } else if is_correct {
                (
                    "\u{2713} ",
                    Style::default()
                        .fg(colors.success())
                        .add_modifier(Modifier::BOLD),
                )
            } else if is_chosen {
                ("\u{2717} ", Style::default().fg(colors.error()))
            } else {
                ("  ", Style::default().fg(colors.muted()))
            };
            lines.push(Line::from(Span::styled(format!("{marker}{option}"), style)));
        }

        if self.quiz.answered {
            lines.push(Line::from(""));
            let correct = chosen.is_some_and(|label| question.is_correct(label));
            let verdict = if correct {
                Span::styled(
                    self.success_message.unwrap_or("Correct!"),
                    Style::default()
                        .fg(colors.success())
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Span::styled(
                    format!("Incorrect. The answer is {}.", question.correct_answer),
                    Style::default()
                        .fg(colors.error())
                        .add_modifier(Modifier::BOLD),
                )
            };
            lines.push(Line::from(verdict));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                question.explanation.as_str(),
                Style::default().fg(colors.fg()),
            )));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}

/// Which help requests are still in flight.
#[derive(Clone, Copy, Debug, Default)]
pub struct AidsLoading {
    pub definitions: bool,
    pub explanation: bool,
    pub steps: bool,
    pub verify: bool,
    pub diagram: bool,
}

/// Side panel with term definitions, stepwise hints and tutor replies.
pub struct AidsPanel<'a> {
    aids: &'a QuestionAids,
    loading: AidsLoading,
    theme: &'a Theme,
}

impl<'a> AidsPanel<'a> {
    pub fn new(aids: &'a QuestionAids, loading: AidsLoading, theme: &'a Theme) -> Self {
        Self {
            aids,
            loading,
            theme,
        }
    }
}

impl Widget for AidsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(" Help ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let heading = |text: &'static str| {
            Line::from(Span::styled(
                text,
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ))
        };
        let body = |text: &str| Line::from(Span::styled(text.to_string(), Style::default().fg(colors.fg())));
        let waiting = || Line::from(Span::styled("  ...", Style::default().fg(colors.muted())));

        let mut lines = Vec::new();

        if self.loading.definitions {
            lines.push(heading("Terms"));
            lines.push(waiting());
        } else if let Some(defs) = self.aids.definitions.as_deref() {
            lines.push(heading("Terms"));
            lines.extend(defs.lines().map(body));
        }

        if !self.aids.steps.is_empty() || self.loading.steps {
            lines.push(Line::from(""));
            lines.push(heading("Steps"));
            for (i, step) in self.aids.steps.iter().take(self.aids.steps_revealed).enumerate() {
                lines.push(body(&format!("{}. {}", i + 1, step.step)));
                if !step.hint.is_empty() {
                    lines.push(Line::from(Span::styled(
                        format!("   hint: {}", step.hint),
                        Style::default().fg(colors.muted()),
                    )));
                }
            }
            if self.loading.steps {
                lines.push(waiting());
            }
        }

        if self.aids.explanation.is_some() || self.loading.explanation {
            lines.push(Line::from(""));
            lines.push(heading("Tutor"));
            match self.aids.explanation.as_deref() {
                Some(text) => lines.extend(text.lines().map(body)),
                None => lines.push(waiting()),
            }
        }

        if self.aids.verification.is_some() || self.loading.verify {
            lines.push(Line::from(""));
            lines.push(heading("Answer check"));
            match self.aids.verification.as_deref() {
                Some(text) => lines.extend(text.lines().map(body)),
                None => lines.push(waiting()),
            }
        }

        if self.loading.diagram {
            lines.push(Line::from(""));
            lines.push(heading("Venn diagram"));
            lines.push(waiting());
        } else if let Some(path) = self.aids.diagram_path.as_ref() {
            lines.push(Line::from(""));
            lines.push(heading("Venn diagram"));
            lines.push(body(&path.display().to_string()));
        }

        if self.aids.scratchpad_open {
            lines.push(Line::from(""));
            lines.push(heading("Scratchpad"));
            let (before, cursor, after) = self.aids.scratchpad.render_parts();
            lines.push(Line::from(vec![
                Span::styled(before.to_string(), Style::default().fg(colors.fg())),
                Span::styled(
                    cursor.map(String::from).unwrap_or_else(|| " ".to_string()),
                    Style::default().fg(colors.bg()).bg(colors.fg()),
                ),
                Span::styled(after.to_string(), Style::default().fg(colors.fg())),
            ]));
        }

        if lines.is_empty() {
            lines.push(Line::from(Span::styled(
                "Press s for a step, e for an explanation.",
                Style::default().fg(colors.muted()),
            )));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}
