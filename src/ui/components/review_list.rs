use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::app::ReviewFilter;
use crate::session::question::{SavedQuestion, option_label};
use crate::ui::theme::Theme;

pub struct ReviewList<'a> {
    items: &'a [&'a SavedQuestion],
    selected: usize,
    filter: ReviewFilter,
    confirm_clear: bool,
    theme: &'a Theme,
}

impl<'a> ReviewList<'a> {
    pub fn new(
        items: &'a [&'a SavedQuestion],
        selected: usize,
        filter: ReviewFilter,
        confirm_clear: bool,
        theme: &'a Theme,
    ) -> Self {
        Self {
            items,
            selected,
            filter,
            confirm_clear,
            theme,
        }
    }

    fn render_list(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let title = match self.filter {
            ReviewFilter::All => format!(" All questions ({}) ", self.items.len()),
            ReviewFilter::Incorrect => format!(" Incorrect ({}) ", self.items.len()),
        };
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        let visible = inner.height as usize;
        if visible == 0 {
            return;
        }
        let offset = self.selected.saturating_sub(visible - 1);
        let width = inner.width.saturating_sub(4) as usize;

        for (row, (i, item)) in self
            .items
            .iter()
            .enumerate()
            .skip(offset)
            .take(visible)
            .enumerate()
        {
            let (mark, mark_color) = match item.user_answer {
                None => ("\u{00b7}", colors.muted()),
                Some(_) if item.was_correct() => ("\u{2713}", colors.success()),
                Some(_) => ("\u{2717}", colors.error()),
            };
            let text: String = item.question.question.chars().take(width).collect();
            let mut text_style = Style::default().fg(colors.fg());
            if i == self.selected {
                text_style = text_style.bg(colors.selected_bg()).add_modifier(Modifier::BOLD);
            }
            let line = Line::from(vec![
                Span::styled(format!(" {mark} "), Style::default().fg(mark_color)),
                Span::styled(text, text_style),
            ]);
            Paragraph::new(line).render(
                Rect::new(inner.x, inner.y + row as u16, inner.width, 1),
                buf,
            );
        }
    }

    fn render_detail(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(" Details ")
            .border_style(Style::default().fg(colors.border()));

        let Some(item) = self.items.get(self.selected) else {
            block.render(area, buf);
            return;
        };
        let question = &item.question;

        let mut lines = vec![
            Line::from(Span::styled(
                format!(
                    "{} \u{00b7} {} \u{00b7} {}",
                    question.topic,
                    question.difficulty.as_str(),
                    item.timestamp.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M")
                ),
                Style::default().fg(colors.muted()),
            )),
            Line::from(""),
            Line::from(Span::styled(
                question.question.as_str(),
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for option in &question.options {
            let label = option_label(option);
            let style = if question.is_correct(&label) {
                Style::default().fg(colors.success())
            } else if item.user_answer.as_deref() == Some(label.as_str()) {
                Style::default().fg(colors.error())
            } else {
                Style::default().fg(colors.fg())
            };
            lines.push(Line::from(Span::styled(format!("  {option}"), style)));
        }
        lines.push(Line::from(""));
        let answer = match item.user_answer.as_deref() {
            Some(answer) => format!("Your answer: {answer}   Correct: {}", question.correct_answer),
            None => format!("Not answered yet. Correct: {}", question.correct_answer),
        };
        lines.push(Line::from(Span::styled(answer, Style::default().fg(colors.accent()))));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            question.explanation.as_str(),
            Style::default().fg(colors.fg()),
        )));

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}

impl Widget for ReviewList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(" Review ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(inner);

        if self.items.is_empty() {
            let msg = match self.filter {
                ReviewFilter::All => "No saved questions.",
                ReviewFilter::Incorrect => "No incorrect answers. Nice flying!",
            };
            Paragraph::new(Span::styled(msg, Style::default().fg(colors.muted())))
                .render(rows[0], buf);
        } else {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
                .split(rows[0]);
            self.render_list(columns[0], buf);
            self.render_detail(columns[1], buf);
        }

        if self.confirm_clear {
            Paragraph::new(Span::styled(
                " Delete all saved questions? (y/n)",
                Style::default()
                    .fg(colors.error())
                    .add_modifier(Modifier::BOLD),
            ))
            .render(rows[1], buf);
        }
    }
}
