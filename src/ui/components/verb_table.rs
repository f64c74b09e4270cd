use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::catalog::{Catalog, Regularity, VerbRecord};
use crate::ui::theme::{Theme, ThemeColors};

const COL_INFINITIVE: usize = 14;
const COL_FORM: usize = 14;

/// Scrollable reference listing of every verb, irregular table first.
pub struct VerbTable<'a> {
    catalog: &'a Catalog,
    scroll: u16,
    theme: &'a Theme,
}

impl<'a> VerbTable<'a> {
    pub fn new(catalog: &'a Catalog, scroll: u16, theme: &'a Theme) -> Self {
        Self {
            catalog,
            scroll,
            theme,
        }
    }

    /// Number of rows the listing occupies, used to bound scrolling.
    pub fn content_height(catalog: &Catalog) -> u16 {
        // title + header + rule per section, blank line between sections
        let rows = 3 + catalog.irregular().len() + 1 + 3 + catalog.regular().len();
        u16::try_from(rows).unwrap_or(u16::MAX)
    }

    fn section<'b>(
        title: String,
        headers: [&'static str; 4],
        verbs: &[&'b VerbRecord],
        regularity: Regularity,
        colors: &ThemeColors,
    ) -> Vec<Line<'b>> {
        let header_style = Style::default()
            .fg(colors.accent())
            .add_modifier(Modifier::BOLD);
        let mut lines = vec![
            Line::from(Span::styled(
                title,
                Style::default()
                    .fg(colors.header_fg())
                    .bg(colors.header_bg())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!(
                    " {:<COL_INFINITIVE$}{:<COL_FORM$}{:<COL_FORM$}{}",
                    headers[0], headers[1], headers[2], headers[3]
                ),
                header_style,
            )),
            Line::from(Span::styled(
                format!(" {}", "─".repeat(COL_INFINITIVE + COL_FORM * 2 + 16)),
                Style::default().fg(colors.accent_dim()),
            )),
        ];

        for verb in verbs {
            let mut spans = vec![
                Span::styled(
                    format!(" {:<COL_INFINITIVE$}", verb.infinitive),
                    Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("{:<COL_FORM$}", verb.past_simple),
                    Style::default().fg(colors.fg()),
                ),
            ];
            // Regular verbs share one past form; the table shows it once.
            if regularity == Regularity::Irregular {
                spans.push(Span::styled(
                    format!("{:<COL_FORM$}", verb.past_participle),
                    Style::default().fg(colors.fg()),
                ));
            }
            spans.push(Span::styled(
                format!("{:<16}", verb.translation),
                Style::default().fg(colors.muted()),
            ));
            spans.push(Span::styled(
                verb.difficulty.label(),
                Style::default().fg(colors.difficulty(verb.difficulty)),
            ));
            lines.push(Line::from(spans));
        }
        lines
    }

    fn lines(&self) -> Vec<Line<'a>> {
        let colors = &self.theme.colors;
        let irregular = self.catalog.sorted_for_reference(Regularity::Irregular);
        let regular = self.catalog.sorted_for_reference(Regularity::Regular);

        let mut lines = Self::section(
            format!(" Irregular Verbs ({}) ", irregular.len()),
            ["Infinitive", "Past Simple", "Participle", "Translation"],
            &irregular,
            Regularity::Irregular,
            colors,
        );
        lines.push(Line::from(""));
        lines.extend(Self::section(
            format!(" Regular Verbs ({}) ", regular.len()),
            ["Infinitive", "Past (-ed)", "Translation", ""],
            &regular,
            Regularity::Regular,
            colors,
        ));
        lines
    }
}

impl Widget for VerbTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(" Verb Reference ")
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        Paragraph::new(self.lines())
            .scroll((self.scroll, 0))
            .render(inner, buf);
    }
}
