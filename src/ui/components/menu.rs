use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::ui::theme::Theme;

pub struct MenuItem {
    pub key: Option<char>,
    pub label: String,
    pub description: String,
}

pub struct Menu<'a> {
    pub items: Vec<MenuItem>,
    pub selected: usize,
    pub subtitle: &'a str,
    pub theme: &'a Theme,
}

impl<'a> Menu<'a> {
    pub fn new(items: Vec<MenuItem>, selected: usize, subtitle: &'a str, theme: &'a Theme) -> Self {
        Self {
            items,
            selected,
            subtitle,
            theme,
        }
    }
}

impl Widget for &Menu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "pilotprep",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("\u{201c}{}\u{201d}", self.subtitle),
                Style::default()
                    .fg(colors.muted())
                    .add_modifier(Modifier::ITALIC),
            )),
        ];
        Paragraph::new(title_lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(layout[0], buf);

        let list_area = layout[2];
        let visible = list_area.height as usize;
        if visible == 0 {
            return;
        }
        let offset = self.selected.saturating_sub(visible - 1);

        for (row, (i, item)) in self
            .items
            .iter()
            .enumerate()
            .skip(offset)
            .take(visible)
            .enumerate()
        {
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };
            let key = item
                .key
                .map(|k| format!("[{k}]"))
                .unwrap_or_else(|| " \u{2022} ".to_string());

            let label_style = Style::default()
                .fg(if is_selected {
                    colors.accent()
                } else {
                    colors.fg()
                })
                .add_modifier(if is_selected {
                    Modifier::BOLD
                } else {
                    Modifier::empty()
                });
            let line = Line::from(vec![
                Span::styled(format!(" {indicator} {key} {:<22}", item.label), label_style),
                Span::styled(item.description.as_str(), Style::default().fg(colors.muted())),
            ]);

            let row_area = Rect::new(list_area.x, list_area.y + row as u16, list_area.width, 1);
            let mut paragraph = Paragraph::new(line);
            if is_selected {
                paragraph = paragraph.style(Style::default().bg(colors.selected_bg()));
            }
            paragraph.render(row_area, buf);
        }
    }
}
