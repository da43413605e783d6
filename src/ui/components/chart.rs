use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::widgets::{Axis, Block, Chart, Dataset, GraphType, Widget};

use crate::session::result::SessionResult;
use crate::ui::theme::Theme;

/// Session accuracy over time, oldest session first.
pub struct AccuracyChart<'a> {
    pub history: &'a [SessionResult],
    pub theme: &'a Theme,
}

impl<'a> AccuracyChart<'a> {
    pub fn new(history: &'a [SessionResult], theme: &'a Theme) -> Self {
        Self { history, theme }
    }
}

impl Widget for AccuracyChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(" Accuracy per session ")
            .border_style(Style::default().fg(colors.border()));

        if self.history.len() < 2 {
            block.render(area, buf);
            return;
        }

        let data: Vec<(f64, f64)> = self
            .history
            .iter()
            .enumerate()
            .map(|(i, session)| ((i + 1) as f64, session.accuracy()))
            .collect();
        let max_x = data.len() as f64;

        let dataset = Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(colors.accent()))
            .data(&data);

        Chart::new(vec![dataset])
            .block(block)
            .x_axis(
                Axis::default()
                    .title("Session")
                    .style(Style::default().fg(colors.muted()))
                    .bounds([1.0, max_x]),
            )
            .y_axis(
                Axis::default()
                    .title("%")
                    .style(Style::default().fg(colors.muted()))
                    .bounds([0.0, 100.0])
                    .labels(["0", "50", "100"]),
            )
            .render(area, buf);
    }
}
