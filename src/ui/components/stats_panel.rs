use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::engine::stats::Stats;
use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::theme::Theme;

pub struct StatsPanel<'a> {
    pub stats: Stats,
    pub theme: &'a Theme,
}

impl<'a> StatsPanel<'a> {
    pub fn new(stats: Stats, theme: &'a Theme) -> Self {
        Self { stats, theme }
    }

    /// Single-line summary for layouts without room for the panel.
    pub fn compact_summary(stats: &Stats) -> String {
        format!(
            "✓ {}  ✗ {}  streak {}  {}%",
            stats.correct,
            stats.incorrect,
            stats.streak,
            stats.accuracy_percent()
        )
    }
}

fn stat_line<'a>(label: &'a str, value: String, color: Color) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {label:<10}"), Style::default().fg(color)),
        Span::styled(value, Style::default().fg(color).add_modifier(Modifier::BOLD)),
    ])
}

impl Widget for StatsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Your Progress ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(4),
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(inner);

        let lines = vec![
            stat_line("Correct", self.stats.correct.to_string(), colors.success()),
            stat_line("Incorrect", self.stats.incorrect.to_string(), colors.error()),
            stat_line("Streak", self.stats.streak.to_string(), colors.streak()),
            stat_line(
                "Accuracy",
                format!("{}%", self.stats.accuracy_percent()),
                colors.accent(),
            ),
        ];
        Paragraph::new(lines).render(layout[1], buf);

        let total = self.stats.total();
        if total == 0 {
            Paragraph::new(Line::from(Span::styled(
                "  No verbs practiced yet",
                Style::default().fg(colors.muted()),
            )))
            .render(layout[2], buf);
            return;
        }

        let noun = if total == 1 { "verb" } else { "verbs" };
        let title = format!("{total} {noun} practiced");
        ProgressBar::new(&title, self.stats.accuracy_ratio(), self.theme).render(layout[3], buf);
    }
}
