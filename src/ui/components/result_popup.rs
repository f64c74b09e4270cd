use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget};

use crate::ui::theme::Theme;

/// Overlay announcing the verdict of the last check.
pub struct ResultPopup<'a> {
    pub correct: bool,
    pub remaining_ms: u64,
    pub theme: &'a Theme,
}

impl<'a> ResultPopup<'a> {
    pub fn new(correct: bool, remaining_ms: u64, theme: &'a Theme) -> Self {
        Self {
            correct,
            remaining_ms,
            theme,
        }
    }
}

impl Widget for ResultPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let color = if self.correct {
            colors.success()
        } else {
            colors.error()
        };

        Clear.render(area, buf);
        let block = Block::bordered()
            .border_style(Style::default().fg(color))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let (headline, message) = if self.correct {
            ("✓ Perfect!", "Keep up the great work!")
        } else {
            ("✗ Not Quite!", "Keep practising!")
        };

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                headline,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(message, Style::default().fg(colors.fg()))),
            Line::from(""),
            Line::from(Span::styled(
                format!("closing in {:.1}s · any key", self.remaining_ms as f64 / 1000.0),
                Style::default().fg(colors.muted()),
            )),
        ];
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(inner, buf);
    }
}

/// Yes/no question drawn over the current screen.
pub struct ConfirmDialog<'a> {
    pub title: &'a str,
    pub message: &'a str,
    pub theme: &'a Theme,
}

impl<'a> ConfirmDialog<'a> {
    pub fn new(title: &'a str, message: &'a str, theme: &'a Theme) -> Self {
        Self {
            title,
            message,
            theme,
        }
    }
}

impl Widget for ConfirmDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        Clear.render(area, buf);
        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(colors.warning()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(self.message, Style::default().fg(colors.fg()))),
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    "[y] Yes",
                    Style::default()
                        .fg(colors.warning())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled("    ", Style::default()),
                Span::styled("[n] No", Style::default().fg(colors.accent())),
            ]),
        ];
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(buf: &Buffer) -> String {
        let area = buf.area;
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn popup_reflects_verdict_and_countdown() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 40, 8);

        let mut buf = Buffer::empty(area);
        ResultPopup::new(true, 1500, &theme).render(area, &mut buf);
        let text = text_of(&buf);
        assert!(text.contains("Perfect!"));
        assert!(text.contains("closing in 1.5s"));

        let mut buf = Buffer::empty(area);
        ResultPopup::new(false, 200, &theme).render(area, &mut buf);
        assert!(text_of(&buf).contains("Not Quite!"));
    }

    #[test]
    fn confirm_dialog_lists_choices() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 44, 7);
        let mut buf = Buffer::empty(area);
        ConfirmDialog::new("Reset", "Reset all statistics?", &theme).render(area, &mut buf);
        let text = text_of(&buf);
        assert!(text.contains("Reset all statistics?"));
        assert!(text.contains("[y] Yes"));
        assert!(text.contains("[n] No"));
    }
}
