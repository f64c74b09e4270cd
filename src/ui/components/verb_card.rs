use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::catalog::VerbRecord;
use crate::engine::grader::AnswerCheck;
use crate::engine::selector::SelectError;
use crate::ui::line_input::LineInput;
use crate::ui::theme::{Theme, ThemeColors};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnswerField {
    PastSimple,
    PastParticiple,
}

impl AnswerField {
    pub fn toggle(self) -> Self {
        match self {
            AnswerField::PastSimple => AnswerField::PastParticiple,
            AnswerField::PastParticiple => AnswerField::PastSimple,
        }
    }
}

/// What the card shows: a verb to answer, or why there is none.
pub enum CardContent<'a> {
    Verb(&'a VerbRecord),
    Unavailable(&'a SelectError),
}

pub struct VerbCard<'a> {
    pub content: CardContent<'a>,
    pub past_simple: &'a LineInput,
    pub past_participle: &'a LineInput,
    pub focus: AnswerField,
    pub check: Option<AnswerCheck>,
    pub theme: &'a Theme,
}

impl<'a> VerbCard<'a> {
    pub fn new(
        content: CardContent<'a>,
        past_simple: &'a LineInput,
        past_participle: &'a LineInput,
        focus: AnswerField,
        check: Option<AnswerCheck>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            content,
            past_simple,
            past_participle,
            focus,
            check,
            theme,
        }
    }
}

fn input_line<'a>(
    input: &'a LineInput,
    focused: bool,
    verdict: Option<bool>,
    placeholder: &'a str,
    colors: &ThemeColors,
) -> Line<'a> {
    let text_style = match verdict {
        Some(true) => Style::default().fg(colors.success()).add_modifier(Modifier::BOLD),
        Some(false) => Style::default().fg(colors.error()).add_modifier(Modifier::BOLD),
        None => Style::default().fg(colors.fg()),
    }
    .bg(colors.input_bg());
    let marker_style = Style::default().fg(if focused && verdict.is_none() {
        colors.accent()
    } else {
        colors.border()
    });

    let mut spans = vec![Span::styled(if focused { "  ▸ " } else { "    " }, marker_style)];

    if input.is_empty() && verdict.is_none() {
        let cursor_style = Style::default().fg(colors.cursor_fg()).bg(colors.cursor_bg());
        if focused {
            spans.push(Span::styled(" ", cursor_style));
        }
        spans.push(Span::styled(
            placeholder,
            Style::default().fg(colors.muted()).bg(colors.input_bg()),
        ));
        return Line::from(spans);
    }

    let (before, cursor, after) = input.render_parts();
    spans.push(Span::styled(before, text_style));
    if focused && verdict.is_none() {
        let cursor_style = Style::default().fg(colors.cursor_fg()).bg(colors.cursor_bg());
        let cursor_text = cursor.map(String::from).unwrap_or_else(|| " ".to_string());
        spans.push(Span::styled(cursor_text, cursor_style));
    } else if let Some(ch) = cursor {
        spans.push(Span::styled(ch.to_string(), text_style));
    }
    spans.push(Span::styled(after, text_style));

    match verdict {
        Some(true) => spans.push(Span::styled("  ✓", Style::default().fg(colors.success()))),
        Some(false) => spans.push(Span::styled("  ✗", Style::default().fg(colors.error()))),
        None => {}
    }
    Line::from(spans)
}

fn correction_line<'a>(expected: &'a str, verdict: Option<bool>, colors: &ThemeColors) -> Line<'a> {
    match verdict {
        Some(false) => Line::from(vec![
            Span::styled("    ✓ Correct: ", Style::default().fg(colors.success())),
            Span::styled(
                expected,
                Style::default()
                    .fg(colors.success())
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        _ => Line::from(""),
    }
}

impl VerbCard<'_> {
    fn render_unavailable(&self, err: &SelectError, inner: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "No verbs to practice",
                Style::default()
                    .fg(colors.warning())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(err.to_string(), Style::default().fg(colors.fg()))),
            Line::from(""),
            Line::from(Span::styled(
                "Open the settings (Ctrl-O) and pick another difficulty or mode.",
                Style::default().fg(colors.muted()),
            )),
        ];
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}

impl Widget for VerbCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let border_color = match self.check {
            Some(check) if check.is_correct() => colors.success(),
            Some(_) => colors.error(),
            None => colors.border_focused(),
        };
        let block = Block::bordered()
            .title(" Conjugate ")
            .border_style(Style::default().fg(border_color))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let verb = match &self.content {
            CardContent::Verb(verb) => *verb,
            CardContent::Unavailable(err) => {
                self.render_unavailable(err, inner, buf);
                return;
            }
        };

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // spacer
                Constraint::Length(1), // infinitive
                Constraint::Length(1), // translation + difficulty
                Constraint::Length(1), // spacer
                Constraint::Length(1), // past simple label
                Constraint::Length(1), // past simple input
                Constraint::Length(1), // past simple correction
                Constraint::Length(1), // past participle label
                Constraint::Length(1), // past participle input
                Constraint::Length(1), // past participle correction
                Constraint::Length(1), // spacer
                Constraint::Length(1), // feedback
                Constraint::Min(0),
            ])
            .split(inner);

        let infinitive = Paragraph::new(Line::from(vec![
            Span::styled("to ", Style::default().fg(colors.muted())),
            Span::styled(
                verb.infinitive.as_str(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ),
        ]))
        .alignment(Alignment::Center);
        infinitive.render(layout[1], buf);

        let subtitle = Paragraph::new(Line::from(vec![
            Span::styled(verb.translation.as_str(), Style::default().fg(colors.fg())),
            Span::styled("  ·  ", Style::default().fg(colors.muted())),
            Span::styled(
                verb.difficulty.label(),
                Style::default().fg(colors.difficulty(verb.difficulty)),
            ),
        ]))
        .alignment(Alignment::Center);
        subtitle.render(layout[2], buf);

        let label_style = |field: AnswerField| {
            let focused = self.focus == field && self.check.is_none();
            Style::default()
                .fg(if focused { colors.accent() } else { colors.fg() })
                .add_modifier(Modifier::BOLD)
        };

        let simple_verdict = self.check.map(|c| c.past_simple);
        let participle_verdict = self.check.map(|c| c.past_participle);

        Paragraph::new(Line::from(Span::styled(
            "  Past Simple",
            label_style(AnswerField::PastSimple),
        )))
        .render(layout[4], buf);
        Paragraph::new(input_line(
            self.past_simple,
            self.focus == AnswerField::PastSimple,
            simple_verdict,
            "type the past simple form...",
            colors,
        ))
        .render(layout[5], buf);
        Paragraph::new(correction_line(&verb.past_simple, simple_verdict, colors))
            .render(layout[6], buf);

        Paragraph::new(Line::from(Span::styled(
            "  Past Participle",
            label_style(AnswerField::PastParticiple),
        )))
        .render(layout[7], buf);
        Paragraph::new(input_line(
            self.past_participle,
            self.focus == AnswerField::PastParticiple,
            participle_verdict,
            "type the past participle form...",
            colors,
        ))
        .render(layout[8], buf);
        Paragraph::new(correction_line(
            &verb.past_participle,
            participle_verdict,
            colors,
        ))
        .render(layout[9], buf);

        let feedback = match self.check {
            Some(check) if check.is_correct() => Line::from(Span::styled(
                "Perfect! Keep going!",
                Style::default()
                    .fg(colors.success())
                    .add_modifier(Modifier::BOLD),
            )),
            Some(_) => Line::from(Span::styled(
                "Keep practising!",
                Style::default()
                    .fg(colors.error())
                    .add_modifier(Modifier::BOLD),
            )),
            None if self.past_simple.is_empty() || self.past_participle.is_empty() => {
                Line::from(Span::styled(
                    "Fill in both forms, then press Enter",
                    Style::default().fg(colors.muted()),
                ))
            }
            None => Line::from(Span::styled(
                "Press Enter to check",
                Style::default().fg(colors.accent()),
            )),
        };
        Paragraph::new(feedback)
            .alignment(Alignment::Center)
            .render(layout[11], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Difficulty;
    use crate::engine::selector::PracticeMode;

    fn render_to_string(card: VerbCard<'_>, width: u16, height: u16) -> String {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        card.render(area, &mut buf);
        (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn go() -> VerbRecord {
        VerbRecord::irregular("go", "went", "gone", "ir", Difficulty::Easy)
    }

    #[test]
    fn shows_infinitive_and_translation() {
        let theme = Theme::default();
        let verb = go();
        let empty = LineInput::default();
        let card = VerbCard::new(
            CardContent::Verb(&verb),
            &empty,
            &empty,
            AnswerField::PastSimple,
            None,
            &theme,
        );
        let text = render_to_string(card, 60, 16);
        assert!(text.contains("to go"));
        assert!(text.contains("ir"));
        assert!(text.contains("Fill in both forms"));
    }

    #[test]
    fn wrong_field_shows_correct_form() {
        let theme = Theme::default();
        let verb = go();
        let simple = LineInput::new("went");
        let participle = LineInput::new("went");
        let check = AnswerCheck {
            past_simple: true,
            past_participle: false,
        };
        let card = VerbCard::new(
            CardContent::Verb(&verb),
            &simple,
            &participle,
            AnswerField::PastParticiple,
            Some(check),
            &theme,
        );
        let text = render_to_string(card, 60, 16);
        assert!(text.contains("Correct: gone"));
        assert!(!text.contains("Correct: went"));
        assert!(text.contains("Keep practising!"));
    }

    #[test]
    fn unavailable_pool_explains_next_step() {
        let theme = Theme::default();
        let err = SelectError::NoVerbsAvailable {
            difficulty: Difficulty::Hard,
            mode: PracticeMode::Regular,
        };
        let empty = LineInput::default();
        let card = VerbCard::new(
            CardContent::Unavailable(&err),
            &empty,
            &empty,
            AnswerField::PastSimple,
            None,
            &theme,
        );
        let text = render_to_string(card, 80, 12);
        assert!(text.contains("No verbs to practice"));
        assert!(text.contains("settings"));
    }

    #[test]
    fn field_toggle_alternates() {
        assert_eq!(AnswerField::PastSimple.toggle(), AnswerField::PastParticiple);
        assert_eq!(AnswerField::PastParticiple.toggle(), AnswerField::PastSimple);
    }
}
