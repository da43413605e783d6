use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::games::Feedback;
use crate::games::speed_math::SpeedMath;
use crate::ui::theme::Theme;

pub struct SpeedMathView<'a> {
    game: &'a SpeedMath,
    theme: &'a Theme,
}

impl<'a> SpeedMathView<'a> {
    pub fn new(game: &'a SpeedMath, theme: &'a Theme) -> Self {
        Self { game, theme }
    }
}

impl Widget for SpeedMathView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(format!(
                " Speed math \u{00b7} score {} \u{00b7} streak {} ",
                self.game.score, self.game.streak
            ))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("{} = ?", self.game.problem.text),
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("> ", Style::default().fg(colors.muted())),
                Span::styled(
                    format!("{}_", self.game.input),
                    Style::default().fg(colors.accent()),
                ),
            ]),
            Line::from(""),
        ];

        match self.game.feedback {
            Some(Feedback::Correct) => lines.push(Line::from(Span::styled(
                "Correct!",
                Style::default()
                    .fg(colors.success())
                    .add_modifier(Modifier::BOLD),
            ))),
            Some(Feedback::Incorrect) => {
                lines.push(Line::from(Span::styled(
                    format!("Wrong. The answer is {}.", self.game.problem.answer),
                    Style::default()
                        .fg(colors.error())
                        .add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(Span::styled(
                    self.game.problem.explanation.as_str(),
                    Style::default().fg(colors.fg()),
                )));
                lines.push(Line::from(Span::styled(
                    "Press Enter for the next problem.",
                    Style::default().fg(colors.muted()),
                )));
            }
            None => {}
        }

        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
