use std::collections::BTreeSet;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Widget};

use crate::engine::planner::month_grid;
use crate::ui::theme::Theme;

const WEEKDAYS: [&str; 7] = ["Ma", "Di", "Wo", "Do", "Vr", "Za", "Zo"];
const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];
const CELL_WIDTH: u16 = 4;

/// Month view, Monday first, with training days highlighted.
pub struct TrainingCalendar<'a> {
    year: i32,
    month: u32,
    today: Option<u32>,
    active: &'a BTreeSet<u32>,
    theme: &'a Theme,
}

impl<'a> TrainingCalendar<'a> {
    pub fn new(
        year: i32,
        month: u32,
        today: Option<u32>,
        active: &'a BTreeSet<u32>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            year,
            month,
            today,
            active,
            theme,
        }
    }
}

impl Widget for TrainingCalendar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let month_name = MONTHS
            .get(self.month.saturating_sub(1) as usize)
            .copied()
            .unwrap_or("");

        let block = Block::bordered()
            .title(format!(" {month_name} {} ", self.year))
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width < CELL_WIDTH * 7 || inner.height < 2 {
            return;
        }

        for (col, label) in WEEKDAYS.iter().enumerate() {
            buf.set_string(
                inner.x + col as u16 * CELL_WIDTH,
                inner.y,
                label,
                Style::default().fg(colors.muted()),
            );
        }

        let (blanks, days) = month_grid(self.year, self.month);
        for day in 1..=days {
            let slot = blanks + day - 1;
            let x = inner.x + (slot % 7) as u16 * CELL_WIDTH;
            let y = inner.y + 1 + (slot / 7) as u16;
            if y >= inner.y + inner.height {
                break;
            }

            let mut style = if self.active.contains(&day) {
                Style::default()
                    .fg(colors.bg())
                    .bg(colors.success())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };
            if self.today == Some(day) {
                style = style.add_modifier(Modifier::UNDERLINED | Modifier::BOLD);
            }
            buf.set_string(x, y, format!("{day:>2}"), style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_day_lands_under_its_weekday() {
        let theme = Theme::default();
        let active = BTreeSet::from([1]);
        // 1 October 2026 is a Thursday.
        let area = Rect::new(0, 0, 30, 9);
        let mut buf = Buffer::empty(area);
        TrainingCalendar::new(2026, 10, None, &active, &theme).render(area, &mut buf);

        assert_eq!(buf[(13, 1)].symbol(), "D");
        assert_eq!(buf[(14, 2)].symbol(), "1");
        assert_eq!(buf[(14, 2)].bg, theme.colors.success());
    }
}
