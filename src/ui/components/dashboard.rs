use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::engine::UserStats;
use crate::engine::rank::RankTable;
use crate::session::question::Difficulty;
use crate::ui::components::chart::AccuracyChart;
use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::theme::Theme;

const BAR_WIDTH: usize = 20;

pub struct Dashboard<'a> {
    pub stats: &'a UserStats,
    pub ranks: &'a RankTable,
    pub theme: &'a Theme,
}

impl<'a> Dashboard<'a> {
    pub fn new(stats: &'a UserStats, ranks: &'a RankTable, theme: &'a Theme) -> Self {
        Self {
            stats,
            ranks,
            theme,
        }
    }

    fn render_rank(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let correct = self.stats.correct;
        let rank = self.ranks.current(correct);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(3)])
            .split(area);

        let bars: String = "\u{25ae}".repeat(rank.bars as usize);
        let lines = vec![
            Line::from(vec![
                Span::styled(
                    rank.title,
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("  {bars}"), Style::default().fg(colors.warning())),
            ]),
            Line::from(Span::styled(rank.description, Style::default().fg(colors.muted()))),
        ];
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(layout[0], buf);

        let caption = match self.ranks.next(correct) {
            Some(next) => format!(
                "{} more correct for {}",
                self.ranks.needed_for_next(correct),
                next.title
            ),
            None => "Highest rank reached".to_string(),
        };
        ProgressBar::new("Next rank", self.ranks.progress_to_next(correct), self.theme)
            .caption(caption)
            .render(layout[1], buf);
    }

    fn render_totals(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let accuracy = self.stats.accuracy();
        let mut lines = vec![
            Line::from(vec![
                Span::styled("  Answered:  ", Style::default().fg(colors.fg())),
                Span::styled(
                    self.stats.total_questions.to_string(),
                    Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("  Correct:   ", Style::default().fg(colors.fg())),
                Span::styled(self.stats.correct.to_string(), Style::default().fg(colors.success())),
                Span::styled("   Incorrect: ", Style::default().fg(colors.fg())),
                Span::styled(self.stats.incorrect().to_string(), Style::default().fg(colors.error())),
            ]),
            Line::from(vec![
                Span::styled("  Accuracy:  ", Style::default().fg(colors.fg())),
                Span::styled(
                    format!("{accuracy}%"),
                    Style::default()
                        .fg(colors.score_color(accuracy))
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
        ];
        for difficulty in Difficulty::ALL {
            let tally = self.stats.difficulty(difficulty);
            lines.push(Line::from(Span::styled(
                format!(
                    "  {:<8} {}/{}",
                    difficulty.as_str(),
                    tally.correct,
                    tally.total
                ),
                Style::default().fg(colors.muted()),
            )));
        }

        if let Some(rec) = self.stats.recommendation() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "  Recommendation",
                Style::default()
                    .fg(colors.warning())
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(Span::styled(
                format!("  {}", rec.text),
                Style::default().fg(colors.fg()),
            )));
            lines.push(Line::from(Span::styled(
                format!("  [g] {}", rec.label),
                Style::default().fg(colors.accent()),
            )));
        }

        let block = Block::bordered()
            .title(" Overview ")
            .border_style(Style::default().fg(colors.border()));
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }

    fn render_topics(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(" Topics ")
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        let rows = self.stats.topic_rows();
        if rows.is_empty() {
            Paragraph::new(Span::styled(
                "  No answers yet.",
                Style::default().fg(colors.muted()),
            ))
            .render(inner, buf);
            return;
        }

        let lines: Vec<Line> = rows
            .iter()
            .map(|row| {
                let filled = (row.accuracy as usize * BAR_WIDTH).div_ceil(100).min(BAR_WIDTH);
                let color = colors.score_color(row.accuracy);
                Line::from(vec![
                    Span::styled(
                        format!("  {:<20.20} ", row.topic),
                        Style::default().fg(colors.fg()),
                    ),
                    Span::styled("\u{2588}".repeat(filled), Style::default().fg(color)),
                    Span::styled(
                        "\u{2591}".repeat(BAR_WIDTH - filled),
                        Style::default().fg(colors.bar_empty()),
                    ),
                    Span::styled(
                        format!(" {:>3}% ({})", row.accuracy, row.total),
                        Style::default().fg(color),
                    ),
                ])
            })
            .collect();
        Paragraph::new(lines).render(inner, buf);
    }

    fn render_recent(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(" Recent sessions ")
            .border_style(Style::default().fg(colors.border()));

        let lines: Vec<Line> = self
            .stats
            .recent_sessions(5)
            .map(|session| {
                let accuracy = session.accuracy().round() as u32;
                Line::from(vec![
                    Span::styled(
                        format!(
                            "  {}  {:<20.20} {:<9} ",
                            session.date.with_timezone(&chrono::Local).format("%d-%m %H:%M"),
                            session.topic,
                            session.mode.as_str()
                        ),
                        Style::default().fg(colors.fg()),
                    ),
                    Span::styled(
                        format!("{}/{}", session.score, session.total),
                        Style::default().fg(colors.score_color(accuracy)),
                    ),
                    Span::styled(
                        format!("  {:.1}s/q", session.average_time),
                        Style::default().fg(colors.muted()),
                    ),
                ])
            })
            .collect();
        Paragraph::new(lines).block(block).render(area, buf);
    }
}

impl Widget for Dashboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Dashboard ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.stats.total_questions == 0 {
            let msg = Paragraph::new(Line::from(Span::styled(
                "No questions answered yet. Start a session from the menu!",
                Style::default().fg(colors.muted()),
            )));
            msg.render(inner, buf);
            return;
        }

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(6),
                Constraint::Min(8),
                Constraint::Length(7),
            ])
            .split(inner);
        self.render_rank(rows[0], buf);

        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(rows[1]);
        self.render_totals(middle[0], buf);
        self.render_topics(middle[1], buf);

        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[2]);
        self.render_recent(bottom[0], buf);
        AccuracyChart::new(&self.stats.history, self.theme).render(bottom[1], buf);
    }
}
