use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget, Wrap};

use crate::app::{Toast, ToastKind};
use crate::session::question::Difficulty;
use crate::ui::layout::centered_rect;
use crate::ui::theme::Theme;

const TOAST_WIDTH: u16 = 48;

/// Transient notice in the bottom-right corner.
pub struct ToastView<'a> {
    toast: &'a Toast,
    theme: &'a Theme,
}

impl<'a> ToastView<'a> {
    pub fn new(toast: &'a Toast, theme: &'a Theme) -> Self {
        Self { toast, theme }
    }
}

impl Widget for ToastView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let color = match self.toast.kind {
            ToastKind::Success => colors.success(),
            ToastKind::Error => colors.error(),
            ToastKind::Info => colors.accent(),
        };

        let width = TOAST_WIDTH.min(area.width);
        let text_width = width.saturating_sub(2).max(1) as usize;
        let height = (self.toast.message.chars().count().div_ceil(text_width) as u16 + 2)
            .min(area.height);
        let rect = Rect::new(
            area.x + area.width.saturating_sub(width + 1),
            area.y + area.height.saturating_sub(height + 1),
            width,
            height,
        );

        Clear.render(rect, buf);
        Paragraph::new(Span::styled(
            self.toast.message.as_str(),
            Style::default().fg(colors.fg()),
        ))
        .block(
            Block::bordered()
                .border_style(Style::default().fg(color))
                .style(Style::default().bg(colors.bg())),
        )
        .wrap(Wrap { trim: true })
        .render(rect, buf);
    }
}

/// Full-screen wait shown while a question batch is generated.
pub struct LoadingOverlay<'a> {
    topic: &'a str,
    difficulty: Difficulty,
    message: &'a str,
    theme: &'a Theme,
}

impl<'a> LoadingOverlay<'a> {
    pub fn new(topic: &'a str, difficulty: Difficulty, message: &'a str, theme: &'a Theme) -> Self {
        Self {
            topic,
            difficulty,
            message,
            theme,
        }
    }
}

impl Widget for LoadingOverlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let rect = centered_rect(50, 30, area);
        Clear.render(rect, buf);

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                self.message,
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!(
                    "Generating {} questions: {}",
                    self.difficulty.as_str().to_lowercase(),
                    self.topic
                ),
                Style::default().fg(colors.fg()),
            )),
            Line::from(""),
            Line::from(Span::styled("[Esc] Cancel", Style::default().fg(colors.muted()))),
        ];
        Paragraph::new(lines)
            .block(
                Block::bordered()
                    .border_style(Style::default().fg(colors.accent()))
                    .style(Style::default().bg(colors.bg())),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(rect, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loading_overlay_names_topic_and_difficulty() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 120, 40);
        let mut buf = Buffer::empty(area);
        LoadingOverlay::new("Analogieën", Difficulty::Hard, "Briefing...", &theme)
            .render(area, &mut buf);

        let text: String = (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n");
        assert!(text.contains("Generating hard questions: Analogieën"));
        assert!(text.contains("Briefing..."));
    }
}
