use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::engine::grader::Answer;
use crate::engine::selector::{SelectError, Settings};
use crate::session::{PracticeSession, StatsTracker};
use crate::speech::Speaker;
use crate::store::StatsStore;
use crate::ui::components::verb_card::AnswerField;
use crate::ui::components::verb_table::VerbTable;
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Practice,
    Settings,
    Reference,
}

/// Result overlay shown after grading until dismissed or timed out.
#[derive(Clone, Copy, Debug)]
pub struct PopupState {
    pub correct: bool,
    pub shown_at: Instant,
}

pub const SETTINGS_FIELDS: usize = 4;

pub struct App {
    pub screen: AppScreen,
    pub session: PracticeSession,
    pub tracker: StatsTracker,
    pub config: Config,
    pub theme: &'static Theme,
    /// Loaded themes by name; each is leaked once and reused.
    themes: HashMap<String, &'static Theme>,
    pub speaker: Speaker,
    /// A verb was drawn off the practice screen with auto-pronounce on.
    pub pronounce_on_return: bool,
    pub past_simple: LineInput,
    pub past_participle: LineInput,
    pub focus: AnswerField,
    pub popup: Option<PopupState>,
    pub confirm_reset: bool,
    pub settings_selected: usize,
    pub reference_scroll: u16,
    pub selection_error: Option<SelectError>,
    pub status: Option<String>,
    /// When false (`--ephemeral`), config changes stay in memory.
    pub persist_config: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        config: Config,
        catalog: Catalog,
        store: Box<dyn StatsStore>,
        speaker: Speaker,
    ) -> Self {
        let session = PracticeSession::new(catalog, config.settings());
        Self::with_session(config, session, store, speaker)
    }

    pub fn with_session(
        config: Config,
        session: PracticeSession,
        store: Box<dyn StatsStore>,
        speaker: Speaker,
    ) -> Self {
        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));
        let themes = HashMap::from([(config.theme.clone(), theme)]);

        let mut app = Self {
            screen: AppScreen::Practice,
            session,
            tracker: StatsTracker::load(store),
            config,
            theme,
            themes,
            speaker,
            pronounce_on_return: false,
            past_simple: LineInput::default(),
            past_participle: LineInput::default(),
            focus: AnswerField::PastSimple,
            popup: None,
            confirm_reset: false,
            settings_selected: 0,
            reference_scroll: 0,
            selection_error: None,
            status: None,
            persist_config: true,
            should_quit: false,
        };
        app.next_verb();
        app
    }

    pub fn answer(&self) -> Answer {
        Answer::new(self.past_simple.value(), self.past_participle.value())
    }

    pub fn focused_input_mut(&mut self) -> &mut LineInput {
        match self.focus {
            AnswerField::PastSimple => &mut self.past_simple,
            AnswerField::PastParticiple => &mut self.past_participle,
        }
    }

    /// Answer fields accept input only while a verb awaits grading.
    pub fn accepts_input(&self) -> bool {
        self.popup.is_none() && !self.session.is_graded() && self.session.current().is_some()
    }

    pub fn switch_field(&mut self) {
        if self.accepts_input() {
            self.focus = self.focus.toggle();
        }
    }

    pub fn handle_paste(&mut self, text: &str) {
        if self.screen == AppScreen::Practice && self.accepts_input() && !self.confirm_reset {
            self.focused_input_mut().insert_str(text);
        }
    }

    /// Enter on the practice screen: grade, or move on once graded.
    pub fn submit_or_advance(&mut self) {
        if self.session.is_graded() {
            self.next_verb();
        } else {
            self.check_answer();
        }
    }

    pub fn check_answer(&mut self) {
        let answer = self.answer();
        if !answer.is_complete() {
            if self.session.current().is_some() {
                self.status = Some("Fill in both forms before checking".to_string());
            }
            return;
        }
        let Some(check) = self.session.submit(&answer) else {
            return;
        };
        let correct = check.is_correct();
        self.tracker.record(correct);
        self.status = None;
        self.popup = Some(PopupState {
            correct,
            shown_at: Instant::now(),
        });
    }

    pub fn next_verb(&mut self) {
        let result = self.session.next_verb().map(|_| ());
        self.after_selection(result);
    }

    pub fn apply_settings(&mut self, settings: Settings) {
        self.config.set_settings(settings);
        let result = self.session.apply_settings(settings).map(|_| ());
        self.after_selection(result);
    }

    fn after_selection(&mut self, result: Result<(), SelectError>) {
        self.past_simple.clear();
        self.past_participle.clear();
        self.focus = AnswerField::PastSimple;
        self.popup = None;
        match result {
            Ok(()) => {
                self.selection_error = None;
                if !self.config.auto_pronounce {
                    self.pronounce_on_return = false;
                } else if self.screen == AppScreen::Practice {
                    self.pronounce_current();
                } else {
                    self.pronounce_on_return = true;
                }
            }
            Err(err) => self.selection_error = Some(err),
        }
    }

    fn pronounce_current(&mut self) {
        let Some(verb) = self.session.current() else {
            return;
        };
        if let Err(err) = self.speaker.speak_verb(verb) {
            tracing::warn!(%err, "pronunciation failed");
        }
    }

    /// Start or stop pronouncing the current verb.
    pub fn toggle_speech(&mut self) {
        let Some(verb) = self.session.current() else {
            return;
        };
        if let Err(err) = self.speaker.toggle(verb) {
            tracing::warn!(%err, "pronunciation failed");
            self.status = Some(err.to_string());
        }
    }

    pub fn popup_remaining_ms(&self) -> u64 {
        let Some(popup) = self.popup else {
            return 0;
        };
        let total = Duration::from_millis(self.config.popup_duration_ms);
        total
            .saturating_sub(popup.shown_at.elapsed())
            .as_millis()
            .try_into()
            .unwrap_or(u64::MAX)
    }

    /// Close the result overlay; with `advance`, also move to the next verb.
    pub fn dismiss_popup(&mut self, advance: bool) {
        self.popup = None;
        if advance {
            self.next_verb();
        }
    }

    pub fn on_tick(&mut self) {
        if self.popup.is_some() && self.popup_remaining_ms() == 0 {
            self.popup = None;
        }
        // reaps a finished speech process
        self.speaker.is_speaking();
    }

    pub fn request_reset(&mut self) {
        self.confirm_reset = true;
    }

    pub fn resolve_reset(&mut self, confirmed: bool) {
        self.confirm_reset = false;
        if confirmed {
            self.tracker.reset();
            self.status = Some("Statistics reset".to_string());
        }
    }

    fn save_config(&mut self) {
        if !self.persist_config {
            return;
        }
        if let Err(err) = self.config.save() {
            tracing::warn!(%err, "failed to save config");
            self.status = Some(format!("Could not save settings: {err}"));
        }
    }

    fn set_theme(&mut self, name: &str) {
        let theme = match self.themes.get(name) {
            Some(theme) => *theme,
            None => {
                let Some(new_theme) = Theme::load(name) else {
                    return;
                };
                let theme: &'static Theme = Box::leak(Box::new(new_theme));
                self.themes.insert(name.to_string(), theme);
                theme
            }
        };
        self.theme = theme;
        self.config.theme = name.to_string();
    }

    pub fn toggle_theme(&mut self) {
        let themes = Theme::available_themes();
        if let Some(next) = Theme::next_name(&self.config.theme, &themes) {
            self.set_theme(&next);
            self.save_config();
        }
    }

    pub fn go_to_settings(&mut self) {
        self.speaker.stop();
        self.settings_selected = 0;
        self.screen = AppScreen::Settings;
    }

    pub fn leave_settings(&mut self) {
        self.save_config();
        self.screen = AppScreen::Practice;
        if std::mem::take(&mut self.pronounce_on_return) && self.config.auto_pronounce {
            self.pronounce_current();
        }
    }

    pub fn settings_select_prev(&mut self) {
        self.settings_selected = self.settings_selected.saturating_sub(1);
    }

    pub fn settings_select_next(&mut self) {
        if self.settings_selected + 1 < SETTINGS_FIELDS {
            self.settings_selected += 1;
        }
    }

    pub fn settings_cycle_forward(&mut self) {
        let settings = self.session.settings();
        match self.settings_selected {
            0 => self.apply_settings(Settings {
                difficulty: settings.difficulty.next(),
                ..settings
            }),
            1 => self.apply_settings(Settings {
                mode: settings.mode.next(),
                ..settings
            }),
            2 => {
                let themes = Theme::available_themes();
                if let Some(next) = Theme::next_name(&self.config.theme, &themes) {
                    self.set_theme(&next);
                }
            }
            3 => self.config.auto_pronounce = !self.config.auto_pronounce,
            _ => {}
        }
    }

    pub fn settings_cycle_backward(&mut self) {
        let settings = self.session.settings();
        match self.settings_selected {
            0 => self.apply_settings(Settings {
                difficulty: settings.difficulty.prev(),
                ..settings
            }),
            1 => self.apply_settings(Settings {
                mode: settings.mode.prev(),
                ..settings
            }),
            2 => {
                let themes = Theme::available_themes();
                if let Some(prev) = Theme::prev_name(&self.config.theme, &themes) {
                    self.set_theme(&prev);
                }
            }
            3 => self.config.auto_pronounce = !self.config.auto_pronounce,
            _ => {}
        }
    }

    pub fn go_to_reference(&mut self) {
        self.reference_scroll = 0;
        self.screen = AppScreen::Reference;
    }

    pub fn leave_reference(&mut self) {
        self.screen = AppScreen::Practice;
    }

    pub fn scroll_reference(&mut self, delta: i32) {
        let max = VerbTable::content_height(self.session.catalog()).saturating_sub(1);
        let next = (i32::from(self.reference_scroll) + delta).clamp(0, i32::from(max));
        self.reference_scroll = u16::try_from(next).unwrap_or(0);
    }

    pub fn scroll_reference_to_end(&mut self) {
        self.reference_scroll = VerbTable::content_height(self.session.catalog()).saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::catalog::{Difficulty, VerbRecord};
    use crate::engine::selector::PracticeMode;
    use crate::store::memory::MemoryStore;

    fn catalog() -> Catalog {
        Catalog::from_parts(
            vec![VerbRecord::regular("walk", "walked", "caminar", Difficulty::Easy)],
            vec![
                VerbRecord::irregular("go", "went", "gone", "ir", Difficulty::Easy),
                VerbRecord::irregular("fly", "flew", "flown", "volar", Difficulty::Medium),
            ],
        )
    }

    fn test_app(settings: Settings) -> (App, Rc<MemoryStore>) {
        let mut config = Config::default();
        config.set_settings(settings);
        let store = Rc::new(MemoryStore::new());
        let session =
            PracticeSession::with_rng(catalog(), settings, SmallRng::seed_from_u64(7));
        let mut app = App::with_session(
            config,
            session,
            Box::new(Rc::clone(&store)),
            Speaker::disabled(),
        );
        app.persist_config = false;
        (app, store)
    }

    fn irregular_easy() -> Settings {
        Settings {
            difficulty: Difficulty::Easy,
            mode: PracticeMode::Irregular,
        }
    }

    fn type_answer(app: &mut App, simple: &str, participle: &str) {
        app.past_simple.insert_str(simple);
        app.past_participle.insert_str(participle);
    }

    #[test]
    fn starts_with_a_verb_on_screen() {
        let (app, _) = test_app(irregular_easy());
        assert_eq!(app.session.current().map(|v| v.infinitive.as_str()), Some("go"));
        assert!(app.selection_error.is_none());
        assert_eq!(app.screen, AppScreen::Practice);
    }

    #[test]
    fn incomplete_answer_is_ignored() {
        let (mut app, store) = test_app(irregular_easy());
        type_answer(&mut app, "went", "");
        app.submit_or_advance();
        assert!(!app.session.is_graded());
        assert!(app.popup.is_none());
        assert!(app.status.is_some());
        assert_eq!(app.tracker.stats().total(), 0);
        assert!(store.raw().is_none());
    }

    #[test]
    fn correct_answer_records_and_shows_popup() {
        let (mut app, store) = test_app(irregular_easy());
        type_answer(&mut app, " Went ", "GONE");
        app.submit_or_advance();
        assert!(app.session.is_graded());
        assert!(app.popup.is_some_and(|p| p.correct));
        assert_eq!(app.tracker.stats().correct, 1);
        assert_eq!(app.tracker.stats().streak, 1);
        assert!(store.raw().is_some());
        assert!(!app.accepts_input());
    }

    #[test]
    fn enter_after_grading_moves_on() {
        let (mut app, _) = test_app(irregular_easy());
        type_answer(&mut app, "goed", "goed");
        app.submit_or_advance();
        assert!(app.popup.is_some_and(|p| !p.correct));
        assert_eq!(app.tracker.stats().incorrect, 1);

        // grading twice is a no-op
        app.check_answer();
        assert_eq!(app.tracker.stats().total(), 1);

        app.dismiss_popup(false);
        app.submit_or_advance();
        assert!(!app.session.is_graded());
        assert!(app.past_simple.is_empty());
        assert!(app.past_participle.is_empty());
        assert_eq!(app.focus, AnswerField::PastSimple);
    }

    #[test]
    fn popup_times_out_on_tick() {
        let (mut app, _) = test_app(irregular_easy());
        type_answer(&mut app, "went", "gone");
        app.check_answer();
        app.on_tick();
        assert!(app.popup.is_some());

        let past = Instant::now() - Duration::from_millis(app.config.popup_duration_ms + 10);
        if let Some(popup) = app.popup.as_mut() {
            popup.shown_at = past;
        }
        assert_eq!(app.popup_remaining_ms(), 0);
        app.on_tick();
        assert!(app.popup.is_none());
    }

    #[test]
    fn settings_change_reselects_and_reports_empty_pool() {
        let (mut app, _) = test_app(irregular_easy());
        app.go_to_settings();

        // easy -> medium
        app.settings_cycle_forward();
        assert_eq!(app.config.difficulty, Difficulty::Medium);
        assert_eq!(app.session.current().map(|v| v.infinitive.as_str()), Some("fly"));

        // medium -> hard: nothing in the catalog
        app.settings_cycle_forward();
        assert!(matches!(
            app.selection_error,
            Some(SelectError::NoVerbsAvailable {
                difficulty: Difficulty::Hard,
                ..
            })
        ));
        assert!(app.session.current().is_none());
        assert!(!app.accepts_input());

        app.settings_cycle_backward();
        assert!(app.selection_error.is_none());
        app.leave_settings();
        assert_eq!(app.screen, AppScreen::Practice);
    }

    #[test]
    fn mode_and_auto_pronounce_cycle() {
        let (mut app, _) = test_app(irregular_easy());
        app.settings_selected = 1;
        app.settings_cycle_forward();
        assert_eq!(app.session.settings().mode, PracticeMode::Irregular.next());
        app.settings_cycle_backward();
        assert_eq!(app.session.settings().mode, PracticeMode::Irregular);

        app.settings_selected = 3;
        app.settings_cycle_forward();
        assert!(app.config.auto_pronounce);
        // no speech program: auto-pronounce must not disturb selection
        app.next_verb();
        assert!(app.selection_error.is_none());
    }

    #[test]
    fn auto_pronounce_waits_for_practice_screen() {
        let (mut app, _) = test_app(irregular_easy());
        app.config.auto_pronounce = true;
        app.next_verb();
        assert!(!app.pronounce_on_return);

        app.go_to_settings();
        app.settings_cycle_forward();
        app.settings_cycle_backward();
        assert!(app.pronounce_on_return);

        app.leave_settings();
        assert!(!app.pronounce_on_return);
        assert_eq!(app.screen, AppScreen::Practice);
    }

    #[test]
    fn settings_without_reselection_leave_nothing_to_pronounce() {
        let (mut app, _) = test_app(irregular_easy());
        app.config.auto_pronounce = true;
        app.go_to_settings();
        app.settings_selected = 3;
        // turning auto-pronounce off
        app.settings_cycle_forward();
        app.settings_selected = 0;
        app.settings_cycle_forward();
        assert!(!app.pronounce_on_return);
    }

    #[test]
    fn theme_cycling_reuses_loaded_themes() {
        let (mut app, _) = test_app(irregular_easy());
        let start = app.theme;
        let count = Theme::available_themes().len();
        assert!(count >= 2);

        app.toggle_theme();
        assert!(!std::ptr::eq(app.theme, start));
        let second = app.theme;
        for _ in 1..count {
            app.toggle_theme();
        }
        assert!(std::ptr::eq(app.theme, start));
        for _ in 0..count {
            app.toggle_theme();
        }
        assert!(std::ptr::eq(app.theme, start));
        app.toggle_theme();
        assert!(std::ptr::eq(app.theme, second));
    }

    #[test]
    fn settings_selection_is_bounded() {
        let (mut app, _) = test_app(irregular_easy());
        app.settings_select_prev();
        assert_eq!(app.settings_selected, 0);
        for _ in 0..10 {
            app.settings_select_next();
        }
        assert_eq!(app.settings_selected, SETTINGS_FIELDS - 1);
    }

    #[test]
    fn reset_requires_confirmation() {
        let (mut app, store) = test_app(irregular_easy());
        type_answer(&mut app, "went", "gone");
        app.check_answer();

        app.request_reset();
        app.resolve_reset(false);
        assert_eq!(app.tracker.stats().correct, 1);

        app.request_reset();
        assert!(app.confirm_reset);
        app.resolve_reset(true);
        assert!(!app.confirm_reset);
        assert_eq!(app.tracker.stats().total(), 0);
        assert!(store.raw().is_none());
    }

    #[test]
    fn paste_goes_to_focused_field() {
        let (mut app, _) = test_app(irregular_easy());
        app.handle_paste("went\n");
        app.switch_field();
        app.handle_paste("gone");
        assert_eq!(app.past_simple.value(), "went");
        assert_eq!(app.past_participle.value(), "gone");
    }

    #[test]
    fn reference_scroll_is_clamped() {
        let (mut app, _) = test_app(irregular_easy());
        app.go_to_reference();
        app.scroll_reference(-5);
        assert_eq!(app.reference_scroll, 0);
        app.scroll_reference(1_000);
        let max = VerbTable::content_height(app.session.catalog()) - 1;
        assert_eq!(app.reference_scroll, max);
        app.leave_reference();
        assert_eq!(app.screen, AppScreen::Practice);
    }

    #[test]
    fn speech_toggle_without_program_reports_status() {
        let (mut app, _) = test_app(irregular_easy());
        app.toggle_speech();
        assert!(app.status.is_some());
        assert_eq!(app.tracker.stats().total(), 0);
    }
}
