use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::engine::study_guide::StudyGuide;
use crate::ui::theme::Theme;

pub struct GuideView<'a> {
    guide: &'a StudyGuide,
    selected: usize,
    scroll: u16,
    theme: &'a Theme,
}

impl<'a> GuideView<'a> {
    pub fn new(guide: &'a StudyGuide, selected: usize, scroll: u16, theme: &'a Theme) -> Self {
        Self {
            guide,
            selected,
            scroll,
            theme,
        }
    }
}

impl Widget for GuideView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(" Study guide ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(28), Constraint::Min(20)])
            .split(inner);

        let categories: Vec<Line> = self
            .guide
            .categories
            .iter()
            .enumerate()
            .map(|(i, category)| {
                let selected = i == self.selected;
                let style = if selected {
                    Style::default()
                        .fg(colors.accent())
                        .bg(colors.selected_bg())
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(colors.fg())
                };
                Line::from(Span::styled(
                    format!(" {} {}", if selected { ">" } else { " " }, category.title),
                    style,
                ))
            })
            .collect();
        Paragraph::new(categories)
            .block(
                Block::bordered()
                    .title(" Topics ")
                    .border_style(Style::default().fg(colors.border())),
            )
            .render(columns[0], buf);

        let content_block = Block::bordered().border_style(Style::default().fg(colors.border()));
        let Some(category) = self.guide.category(self.selected) else {
            content_block.render(columns[1], buf);
            return;
        };

        let mut lines = vec![
            Line::from(Span::styled(
                category.title.as_str(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                category.description.as_str(),
                Style::default().fg(colors.muted()),
            )),
        ];
        for section in &category.sections {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                section.title.as_str(),
                Style::default()
                    .fg(colors.warning())
                    .add_modifier(Modifier::BOLD),
            )));
            lines.extend(section.content.lines().map(|line| {
                Line::from(Span::styled(line, Style::default().fg(colors.fg())))
            }));
        }

        Paragraph::new(lines)
            .block(content_block)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0))
            .render(columns[1], buf);
    }
}
