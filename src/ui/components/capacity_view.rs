use std::time::Instant;

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::games::Feedback;
use crate::games::capacity::{CapacityMode, CapacityTrainer, Drill};
use crate::games::compass::CompassGame;
use crate::games::memory::{Field, MemoryGame, MemoryPhase};
use crate::ui::theme::Theme;

pub struct CapacityView<'a> {
    trainer: &'a CapacityTrainer,
    now: Instant,
    theme: &'a Theme,
}

impl<'a> CapacityView<'a> {
    pub fn new(trainer: &'a CapacityTrainer, now: Instant, theme: &'a Theme) -> Self {
        Self {
            trainer,
            now,
            theme,
        }
    }

    fn picker_lines(&self) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        let mut lines = vec![Line::from("")];
        for (i, drill) in Drill::ALL.iter().enumerate() {
            let selected = i == self.trainer.selected;
            let style = if selected {
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };
            lines.push(Line::from(Span::styled(
                format!("{} {}", if selected { ">" } else { " " }, drill.title()),
                style,
            )));
            lines.push(Line::from(Span::styled(
                drill.description(),
                Style::default().fg(colors.muted()),
            )));
            lines.push(Line::from(""));
        }
        lines
    }

    fn memory_lines(&self, game: &MemoryGame) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        let t = &game.transmission;
        let mut lines = vec![Line::from(Span::styled(
            format!("Score {}", game.score),
            Style::default().fg(colors.muted()),
        ))];
        lines.push(Line::from(""));

        match game.phase {
            MemoryPhase::Memorize => {
                lines.push(Line::from(Span::styled(
                    format!(
                        "{}, climb to {} feet, heading {:03}, speed {} knots.",
                        t.callsign,
                        t.altitude,
                        t.heading,
                        t.speed
                    ),
                    Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    format!("Memorize... {}s", game.seconds_left(self.now)),
                    Style::default().fg(colors.warning()),
                )));
            }
            MemoryPhase::Recall => {
                lines.push(Line::from(Span::styled(
                    format!("Read back the instruction for {}", t.callsign),
                    Style::default().fg(colors.fg()),
                )));
                lines.push(Line::from(""));
                for field in Field::ALL {
                    let focused = field == game.focus;
                    let style = if focused {
                        Style::default()
                            .fg(colors.accent())
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(colors.fg())
                    };
                    let cursor = if focused { "_" } else { "" };
                    lines.push(Line::from(Span::styled(
                        format!("{:>14}: {}{cursor}", field.label(), game.input(field)),
                        style,
                    )));
                }
            }
            MemoryPhase::Feedback(readback) => {
                let expected = [
                    (Field::Altitude, t.altitude.to_string()),
                    (Field::Heading, t.heading.to_string()),
                    (Field::Speed, t.speed.to_string()),
                ];
                for (field, value) in expected {
                    let ok = readback.field(field);
                    let (mark, color) = if ok {
                        ("\u{2713}", colors.success())
                    } else {
                        ("\u{2717}", colors.error())
                    };
                    lines.push(Line::from(Span::styled(
                        format!(
                            "{mark} {:>14}: {} (was {value})",
                            field.label(),
                            game.input(field)
                        ),
                        Style::default().fg(color),
                    )));
                }
                lines.push(Line::from(""));
                let summary = if readback.all_correct() {
                    Span::styled(
                        "Readback correct.",
                        Style::default()
                            .fg(colors.success())
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled("Say again...", Style::default().fg(colors.error()))
                };
                lines.push(Line::from(summary));
                lines.push(Line::from(Span::styled(
                    "Press Enter for the next transmission.",
                    Style::default().fg(colors.muted()),
                )));
            }
        }
        lines
    }

    fn compass_lines(&self, game: &CompassGame) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        let p = &game.problem;
        let mut lines = vec![
            Line::from(Span::styled(
                format!("Score {}", game.score),
                Style::default().fg(colors.muted()),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!("Heading {:03}, turn {} {}\u{00b0}", p.heading, p.turn.as_str(), p.amount),
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!("New heading: {}_", game.input),
                Style::default().fg(colors.accent()),
            )),
            Line::from(""),
        ];
        match game.feedback {
            Some(Feedback::Correct) => lines.push(Line::from(Span::styled(
                format!("Correct, heading {:03}.", p.expected()),
                Style::default()
                    .fg(colors.success())
                    .add_modifier(Modifier::BOLD),
            ))),
            Some(Feedback::Incorrect) => lines.push(Line::from(Span::styled(
                "Not quite, try again.",
                Style::default().fg(colors.error()),
            ))),
            None => {}
        }
        lines
    }
}

impl Widget for CapacityView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let (title, lines) = match &self.trainer.mode {
            CapacityMode::Menu => (" Capacity trainer ".to_string(), self.picker_lines()),
            CapacityMode::Memory(game) => (
                format!(" {} ", Drill::Memory.title()),
                self.memory_lines(game),
            ),
            CapacityMode::Compass(game) => (
                format!(" {} ", Drill::Compass.title()),
                self.compass_lines(game),
            ),
        };

        Paragraph::new(lines)
            .block(
                Block::bordered()
                    .title(title)
                    .border_style(Style::default().fg(colors.accent()))
                    .style(Style::default().bg(colors.bg())),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
