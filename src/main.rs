mod app;
mod catalog;
mod config;
mod engine;
mod event;
mod logging;
mod session;
mod speech;
mod store;
mod ui;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use app::{App, AppScreen};
use catalog::{Catalog, Difficulty};
use config::Config;
use engine::selector::PracticeMode;
use event::{AppEvent, EventHandler};
use speech::Speaker;
use store::StatsStore;
use store::json_store::{self, JsonStore};
use store::memory::MemoryStore;
use ui::components::result_popup::{ConfirmDialog, ResultPopup};
use ui::components::stats_panel::StatsPanel;
use ui::components::verb_card::{CardContent, VerbCard};
use ui::components::verb_table::VerbTable;
use ui::layout::{AppLayout, centered_rect, pack_hint_lines};
use ui::theme::Theme;

#[derive(Parser)]
#[command(
    name = "verbdrill",
    version,
    about = "Practice English past simple and past participle forms in the terminal"
)]
struct Cli {
    #[arg(short, long, help = "Difficulty (easy, medium, hard)")]
    difficulty: Option<Difficulty>,

    #[arg(short, long, help = "Verb set (regular, irregular, both)")]
    mode: Option<PracticeMode>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Directory for stats and logs")]
    data_dir: Option<PathBuf>,

    #[arg(long, help = "Keep stats and settings in memory only")]
    ephemeral: bool,

    #[arg(long, help = "Disable pronunciation")]
    no_speech: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(json_store::default_data_dir);
    // Held until after the terminal is restored so buffered events are flushed.
    let _log_guard = match logging::init_logging(&data_dir) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("verbdrill: logging disabled: {err:#}");
            None
        }
    };

    let mut config = Config::load().unwrap_or_else(|err| {
        tracing::warn!(%err, "unreadable config, using defaults");
        Config::default()
    });
    if let Some(difficulty) = cli.difficulty {
        config.difficulty = difficulty;
    }
    if let Some(mode) = cli.mode {
        config.mode = mode;
    }
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    config.validate(&Theme::available_themes());

    let store: Box<dyn StatsStore> = if cli.ephemeral {
        Box::new(MemoryStore::new())
    } else {
        Box::new(JsonStore::with_base_dir(data_dir).context("opening stats directory")?)
    };
    let speaker = if cli.no_speech {
        Speaker::disabled()
    } else {
        Speaker::detect(config.speech_command.as_deref(), config.speech_rate_wpm)
    };
    let catalog = Catalog::load()?;
    tracing::info!(verbs = catalog.len(), "catalog loaded");

    let mut app = App::new(config, catalog, store, speaker);
    app.persist_config = !cli.ephemeral;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events);

    app.speaker.stop();
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(?err, "terminal loop failed");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Paste(text) => app.handle_paste(&text),
            AppEvent::Tick => app.on_tick(),
            AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Practice => handle_practice_key(app, key),
        AppScreen::Settings => handle_settings_key(app, key),
        AppScreen::Reference => handle_reference_key(app, key),
    }
}

fn handle_practice_key(app: &mut App, key: KeyEvent) {
    // Confirmation dialog takes priority
    if app.confirm_reset {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => app.resolve_reset(true),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.resolve_reset(false),
            _ => {}
        }
        return;
    }

    if app.popup.is_some() {
        app.dismiss_popup(key.code == KeyCode::Enter);
        return;
    }

    app.status = None;
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Enter => app.submit_or_advance(),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => app.switch_field(),
        KeyCode::F(2) => app.toggle_speech(),
        KeyCode::Char('p') if ctrl => app.toggle_speech(),
        KeyCode::Char('o') if ctrl => app.go_to_settings(),
        KeyCode::Char('l') if ctrl => app.go_to_reference(),
        KeyCode::Char('r') if ctrl => app.request_reset(),
        KeyCode::Char('t') if ctrl => app.toggle_theme(),
        _ => {
            if app.accepts_input() {
                app.focused_input_mut().handle(key);
            }
        }
    }
}

fn handle_settings_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.leave_settings(),
        KeyCode::Char('o') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.leave_settings()
        }
        KeyCode::Up | KeyCode::Char('k') => app.settings_select_prev(),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => app.settings_select_next(),
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => app.settings_cycle_forward(),
        KeyCode::Left | KeyCode::Char('h') => app.settings_cycle_backward(),
        _ => {}
    }
}

fn handle_reference_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.leave_reference(),
        KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.leave_reference()
        }
        KeyCode::Up | KeyCode::Char('k') => app.scroll_reference(-1),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_reference(1),
        KeyCode::PageUp => app.scroll_reference(-10),
        KeyCode::PageDown | KeyCode::Char(' ') => app.scroll_reference(10),
        KeyCode::Home | KeyCode::Char('g') => app.reference_scroll = 0,
        KeyCode::End | KeyCode::Char('G') => app.scroll_reference_to_end(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Practice => render_practice(frame, app),
        AppScreen::Settings => render_settings(frame, app),
        AppScreen::Reference => render_reference(frame, app),
    }

    if let Some(popup) = app.popup {
        let popup_area = centered_rect(40, 30, 34, 8, area);
        frame.render_widget(
            ResultPopup::new(popup.correct, app.popup_remaining_ms(), app.theme),
            popup_area,
        );
    }

    if app.confirm_reset {
        let dialog_area = centered_rect(40, 25, 40, 7, area);
        frame.render_widget(
            ConfirmDialog::new(
                "Reset statistics",
                "Clear all correct, incorrect and streak counts?",
                app.theme,
            ),
            dialog_area,
        );
    }
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: Rect, detail: String) {
    let colors = &app.theme.colors;
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " verbdrill ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            detail,
            Style::default().fg(colors.muted()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, area: Rect, hints: &[&str]) {
    let colors = &app.theme.colors;
    let mut lines: Vec<Line> = Vec::new();
    if let Some(status) = &app.status {
        lines.push(Line::from(Span::styled(
            format!(" {status}"),
            Style::default().fg(colors.warning()),
        )));
    }
    for hint_line in pack_hint_lines(hints, area.width as usize) {
        lines.push(Line::from(Span::styled(
            hint_line,
            Style::default().fg(colors.muted()),
        )));
    }
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_practice(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let app_layout = AppLayout::new(area);
    let settings = app.session.settings();
    let (served, pool) = app.session.round_progress();

    let mut detail = format!(
        " {} · {} · {served}/{pool} this round",
        settings.difficulty.label(),
        settings.mode.label()
    );
    if app_layout.stats.is_none() {
        detail.push_str("  |  ");
        detail.push_str(&StatsPanel::compact_summary(&app.tracker.stats()));
    }
    if app.speaker.is_available() {
        detail.push_str("  |  ♪");
    }
    render_header(frame, app, app_layout.header, detail);

    let content = match (&app.selection_error, app.session.current()) {
        (Some(err), _) => Some(CardContent::Unavailable(err)),
        (None, Some(verb)) => Some(CardContent::Verb(verb)),
        (None, None) => None,
    };
    if let Some(content) = content {
        let card_area = card_rect(app_layout.main);
        let card = VerbCard::new(
            content,
            &app.past_simple,
            &app.past_participle,
            app.focus,
            app.session.last_check(),
            app.theme,
        );
        frame.render_widget(card, card_area);
    }

    if let Some(stats_area) = app_layout.stats {
        frame.render_widget(StatsPanel::new(app.tracker.stats(), app.theme), stats_area);
    }

    let hints: &[&str] = if app.session.is_graded() {
        &["[Enter] Next verb", "[Ctrl-P] Pronounce", "[Ctrl-O] Settings", "[Esc] Quit"]
    } else {
        &[
            "[Enter] Check",
            "[Tab] Switch field",
            "[Ctrl-P] Pronounce",
            "[Ctrl-O] Settings",
            "[Ctrl-L] Verb list",
            "[Ctrl-T] Theme",
            "[Ctrl-R] Reset stats",
            "[Esc] Quit",
        ]
    };
    render_footer(frame, app, app_layout.footer, hints);
}

/// Card height is fixed; it sits vertically centred in the main area.
fn card_rect(main: Rect) -> Rect {
    let height = main.height.min(16);
    let top = main.y + (main.height - height) / 2;
    Rect::new(main.x, top, main.width, height)
}

fn render_settings(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let centered = centered_rect(60, 80, 44, 18, area);

    let block = Block::bordered()
        .title(" Settings ")
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(centered);
    block.render(centered, frame.buffer_mut());

    let settings = app.session.settings();
    let auto_pronounce = match (app.config.auto_pronounce, app.speaker.is_available()) {
        (true, true) => "On",
        (true, false) => "On (no speech program found)",
        (false, _) => "Off",
    };
    let fields: [(&str, String); 4] = [
        ("Difficulty", settings.difficulty.label().to_string()),
        ("Verb Set", settings.mode.label().to_string()),
        ("Theme", app.config.theme.clone()),
        ("Auto-pronounce", auto_pronounce.to_string()),
    ];

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(fields.len() as u16 * 3),
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(inner);

    let header = Paragraph::new(Line::from(Span::styled(
        "  Use arrows to navigate, Enter/Right to change, ESC to save & exit",
        Style::default().fg(colors.muted()),
    )));
    header.render(layout[0], frame.buffer_mut());

    let field_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(fields.iter().map(|_| Constraint::Length(3)).collect::<Vec<_>>())
        .split(layout[1]);

    for (i, (label, value)) in fields.iter().enumerate() {
        let is_selected = i == app.settings_selected;
        let indicator = if is_selected { " > " } else { "   " };

        let label_style = Style::default()
            .fg(if is_selected { colors.accent() } else { colors.fg() })
            .add_modifier(if is_selected {
                Modifier::BOLD
            } else {
                Modifier::empty()
            });
        let value_style = Style::default().fg(if is_selected {
            colors.streak()
        } else {
            colors.muted()
        });

        let lines = vec![
            Line::from(Span::styled(format!("{indicator}{label}:"), label_style)),
            Line::from(Span::styled(format!("  < {value} >"), value_style)),
        ];
        Paragraph::new(lines).render(field_layout[i], frame.buffer_mut());
    }

    let pool_line = match &app.selection_error {
        Some(err) => Span::styled(format!("  {err}"), Style::default().fg(colors.warning())),
        None => Span::styled(
            format!("  {} verbs in this set", app.session.pool_size()),
            Style::default().fg(colors.success()),
        ),
    };
    Paragraph::new(Line::from(pool_line)).render(layout[2], frame.buffer_mut());

    let footer = Paragraph::new(Line::from(Span::styled(
        "  [ESC] Save & back  [Enter/arrows] Change value",
        Style::default().fg(colors.accent()),
    )));
    footer.render(layout[4], frame.buffer_mut());
}

fn render_reference(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let app_layout = AppLayout::new(area);
    let catalog = app.session.catalog();

    render_header(
        frame,
        app,
        app_layout.header,
        format!(" Verb reference · {} verbs", catalog.len()),
    );

    let body = Rect::new(
        area.x,
        app_layout.header.bottom(),
        area.width,
        app_layout.footer.y.saturating_sub(app_layout.header.bottom()),
    );
    frame.render_widget(VerbTable::new(catalog, app.reference_scroll, app.theme), body);

    render_footer(
        frame,
        app,
        app_layout.footer,
        &["[↑↓/jk] Scroll", "[PgUp/PgDn] Page", "[Home/End] Jump", "[Esc] Back"],
    );
}
