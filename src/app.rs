use std::time::Duration;

use chrono::Local;
use log::{info, warn};
use tokio::time::Instant;

use portfolio_tui::config::ProfileConfig;
use portfolio_tui::i18n::{Language, Translator};
use portfolio_tui::{PreferenceSnapshot, PreferenceStore, StyleRoot};

/// Stand-in for the network round trip of a form submission.
pub const SUBMIT_DELAY: Duration = Duration::from_millis(1500);
/// How long the success message stays up before the form resets.
pub const SUCCESS_DISPLAY: Duration = Duration::from_millis(3000);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Profile,
    Projects,
    CurrentProject,
    Contact,
    Settings,
}

impl Route {
    pub const ALL: [Route; 5] = [
        Route::Profile,
        Route::Projects,
        Route::CurrentProject,
        Route::Contact,
        Route::Settings,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Route::Profile => "/profile",
            Route::Projects => "/projects",
            Route::CurrentProject => "/current-project",
            Route::Contact => "/contact",
            Route::Settings => "/settings",
        }
    }

    /// `/` and unknown paths land on the profile page.
    pub fn from_path(path: &str) -> Route {
        Route::ALL
            .into_iter()
            .find(|route| route.path() == path)
            .unwrap_or(Route::Profile)
    }

    /// Translation key of the sidebar label.
    pub fn label_key(self) -> &'static str {
        match self {
            Route::Profile => "profile",
            Route::Projects => "projects",
            Route::CurrentProject => "mysteryProject",
            Route::Contact => "contact",
            Route::Settings => "settings",
        }
    }

    fn position(self) -> usize {
        Route::ALL.iter().position(|r| *r == self).unwrap_or(0)
    }

    pub fn next(self) -> Route {
        Route::ALL[(self.position() + 1) % Route::ALL.len()]
    }

    pub fn prev(self) -> Route {
        Route::ALL[(self.position() + Route::ALL.len() - 1) % Route::ALL.len()]
    }
}

/// One entry of the theme picker on the settings page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThemeOption {
    Auto,
    Theme(usize),
}

impl ThemeOption {
    pub fn name_key(self) -> &'static str {
        match self {
            ThemeOption::Auto => "autoChange",
            ThemeOption::Theme(0) => "redTheme",
            ThemeOption::Theme(1) => "blueTheme",
            ThemeOption::Theme(_) => "greyTheme",
        }
    }

    pub fn description_key(self) -> &'static str {
        match self {
            ThemeOption::Auto => "autoChangeDesc",
            ThemeOption::Theme(0) => "redThemeDesc",
            ThemeOption::Theme(1) => "blueThemeDesc",
            ThemeOption::Theme(_) => "greyThemeDesc",
        }
    }

    /// Auto is active while rotating; a theme only when picked manually.
    pub fn is_active(self, snapshot: &PreferenceSnapshot) -> bool {
        match self {
            ThemeOption::Auto => snapshot.auto_rotate,
            ThemeOption::Theme(index) => !snapshot.auto_rotate && snapshot.current_index == index,
        }
    }
}

pub const THEME_OPTIONS: [ThemeOption; 4] = [
    ThemeOption::Auto,
    ThemeOption::Theme(1),
    ThemeOption::Theme(0),
    ThemeOption::Theme(2),
];

/// Focusable rows of the settings page, top to bottom.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsEntry {
    Theme(ThemeOption),
    Language(Language),
    BugDetails,
    SubmitBug,
}

pub fn settings_entries() -> Vec<SettingsEntry> {
    THEME_OPTIONS
        .iter()
        .map(|o| SettingsEntry::Theme(*o))
        .chain(Language::ALL.iter().map(|l| SettingsEntry::Language(*l)))
        .chain([SettingsEntry::BugDetails, SettingsEntry::SubmitBug])
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Sending { until: Instant },
    Sent { until: Instant },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmissionEvent {
    /// The simulated request finished.
    Delivered,
    /// The success message timed out.
    Dismissed,
}

/// A fake form submission: `SUBMIT_DELAY` of sending, then `SUCCESS_DISPLAY`
/// of success, then idle again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Submission {
    pub state: SubmissionState,
}

impl Default for Submission {
    fn default() -> Self {
        Self { state: SubmissionState::Idle }
    }
}

impl Submission {
    /// Returns false if a submission is already in flight or on display.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.state != SubmissionState::Idle {
            return false;
        }
        self.state = SubmissionState::Sending { until: now + SUBMIT_DELAY };
        true
    }

    pub fn poll(&mut self, now: Instant) -> Option<SubmissionEvent> {
        match self.state {
            SubmissionState::Sending { until } if now >= until => {
                self.state = SubmissionState::Sent { until: now + SUCCESS_DISPLAY };
                Some(SubmissionEvent::Delivered)
            }
            SubmissionState::Sent { until } if now >= until => {
                self.state = SubmissionState::Idle;
                Some(SubmissionEvent::Dismissed)
            }
            _ => None,
        }
    }

    pub fn is_sending(&self) -> bool {
        matches!(self.state, SubmissionState::Sending { .. })
    }

    pub fn is_sent(&self) -> bool {
        matches!(self.state, SubmissionState::Sent { .. })
    }
}

pub const CONTACT_FIELD_KEYS: [&str; 4] = ["fullName", "emailAddress", "subject", "messageLabel"];

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContactForm {
    pub fields: [String; 4],
    /// 0..=3 select a field, 4 is the send button.
    pub cursor: usize,
}

impl ContactForm {
    pub fn is_complete(&self) -> bool {
        self.fields.iter().all(|f| !f.trim().is_empty())
    }

    pub fn clear(&mut self) {
        self.fields = Default::default();
        self.cursor = 0;
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BugReport {
    pub details: String,
    /// Set when the report is delivered.
    pub timestamp: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditTarget {
    ContactField(usize),
    BugDetails,
}

pub struct App {
    pub route: Route,
    pub store: PreferenceStore,
    pub style: StyleRoot,
    pub translator: Translator,
    pub profile: ProfileConfig,
    pub settings_cursor: usize,
    pub contact: ContactForm,
    pub contact_submission: Submission,
    pub bug: BugReport,
    pub bug_submission: Submission,
    pub editing: Option<EditTarget>,
    pub show_help: bool,
    pub status_message: String,
}

impl App {
    pub fn new(store: PreferenceStore, style: StyleRoot, translator: Translator, profile: ProfileConfig) -> App {
        App {
            route: Route::Profile,
            store,
            style,
            translator,
            profile,
            settings_cursor: 0,
            contact: ContactForm::default(),
            contact_submission: Submission::default(),
            bug: BugReport::default(),
            bug_submission: Submission::default(),
            editing: None,
            show_help: false,
            status_message: "Tab/←/→ to navigate, 1-5 to jump, '?' for help, 'q' to quit.".to_string(),
        }
    }

    pub fn t(&self, key: &str) -> String {
        self.translator.t(key)
    }

    pub fn navigate(&mut self, route: Route) {
        self.editing = None;
        self.route = route;
    }

    pub fn navigate_path(&mut self, path: &str) {
        self.navigate(Route::from_path(path));
    }

    pub fn next_route(&mut self) {
        self.navigate(self.route.next());
    }

    pub fn prev_route(&mut self) {
        self.navigate(self.route.prev());
    }

    pub fn show_help_screen(&mut self) {
        self.show_help = true;
    }

    pub fn exit_help_screen(&mut self) {
        self.show_help = false;
    }

    pub fn set_status_message(&mut self, message: String) {
        self.status_message = message;
    }

    // ===== Settings =====

    pub fn selected_settings_entry(&self) -> SettingsEntry {
        let entries = settings_entries();
        entries[self.settings_cursor.min(entries.len() - 1)]
    }

    pub fn move_settings_cursor(&mut self, direction: i32) {
        let len = settings_entries().len() as i32;
        let next = (self.settings_cursor as i32 + direction).rem_euclid(len);
        self.settings_cursor = next as usize;
    }

    /// Apply a theme picker choice the way the settings page does: Auto turns
    /// rotation on, a concrete theme turns it off and selects the theme.
    pub fn choose_theme(&mut self, option: ThemeOption) {
        let result = match option {
            ThemeOption::Auto => self.store.set_auto_rotate(true),
            ThemeOption::Theme(index) => self
                .store
                .set_auto_rotate(false)
                .and_then(|_| self.store.set_theme(index)),
        };
        match result {
            Ok(()) => {
                let name = self.t(option.name_key());
                self.set_status_message(format!("Theme: {}", name));
            }
            Err(e) => {
                warn!("Theme change failed: {}", e);
                self.set_status_message(format!("Theme change failed: {}", e));
            }
        }
    }

    pub fn choose_language(&mut self, language: Language) {
        self.translator.set_language(language);
        info!("Language set to {}", language.code());
        self.set_status_message(format!("Language: {}", language.name()));
    }

    pub fn activate_settings_entry(&mut self, now: Instant) {
        match self.selected_settings_entry() {
            SettingsEntry::Theme(option) => self.choose_theme(option),
            SettingsEntry::Language(language) => self.choose_language(language),
            SettingsEntry::BugDetails => self.editing = Some(EditTarget::BugDetails),
            SettingsEntry::SubmitBug => self.submit_bug_report(now),
        }
    }

    pub fn submit_bug_report(&mut self, now: Instant) {
        if self.bug.details.trim().is_empty() {
            self.set_status_message("Describe the bug before submitting.".to_string());
            return;
        }
        if self.bug_submission.start(now) {
            self.editing = None;
            self.set_status_message(self.t("sending"));
        }
    }

    // ===== Contact =====

    pub fn move_contact_cursor(&mut self, direction: i32) {
        let next = (self.contact.cursor as i32 + direction).rem_euclid(CONTACT_FIELD_KEYS.len() as i32 + 1);
        self.contact.cursor = next as usize;
    }

    pub fn activate_contact_entry(&mut self, now: Instant) {
        if self.contact.cursor < CONTACT_FIELD_KEYS.len() {
            self.editing = Some(EditTarget::ContactField(self.contact.cursor));
        } else {
            self.submit_contact(now);
        }
    }

    pub fn submit_contact(&mut self, now: Instant) {
        if !self.contact.is_complete() {
            self.set_status_message("Fill in every field before sending.".to_string());
            return;
        }
        if self.contact_submission.start(now) {
            self.editing = None;
            self.set_status_message(self.t("sending"));
        }
    }

    // ===== Text editing =====

    fn edit_buffer(&mut self) -> Option<&mut String> {
        match self.editing? {
            EditTarget::ContactField(i) => self.contact.fields.get_mut(i),
            EditTarget::BugDetails => Some(&mut self.bug.details),
        }
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(buffer) = self.edit_buffer() {
            buffer.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(buffer) = self.edit_buffer() {
            buffer.pop();
        }
    }

    /// Enter while editing: contact fields advance to the next row, the bug
    /// details field submits.
    pub fn finish_edit(&mut self, now: Instant) {
        match self.editing.take() {
            Some(EditTarget::ContactField(i)) => self.contact.cursor = (i + 1).min(CONTACT_FIELD_KEYS.len()),
            Some(EditTarget::BugDetails) => self.submit_bug_report(now),
            None => {}
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub fn paste_from_clipboard(&mut self) {
        match arboard::Clipboard::new() {
            Ok(mut clipboard) => match clipboard.get_text() {
                Ok(text) => {
                    if let Some(buffer) = self.edit_buffer() {
                        buffer.push_str(&text);
                    }
                }
                Err(e) => self.set_status_message(format!("Failed to paste from clipboard: {}", e)),
            },
            Err(e) => self.set_status_message(format!("Failed to access clipboard: {}", e)),
        }
    }

    // ===== Timers =====

    /// Advance the simulated submissions. Returns true if anything changed.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        let mut changed = false;

        match self.contact_submission.poll(now) {
            Some(SubmissionEvent::Delivered) => {
                self.contact.clear();
                self.set_status_message(self.t("messageSentSuccess"));
                info!("Contact message delivered");
                changed = true;
            }
            Some(SubmissionEvent::Dismissed) => changed = true,
            None => {}
        }

        match self.bug_submission.poll(now) {
            Some(SubmissionEvent::Delivered) => {
                self.bug.timestamp = Some(Local::now().format("%Y-%m-%d %H:%M:%S").to_string());
                self.set_status_message(self.t("bugReportSuccess"));
                info!("Bug report delivered");
                changed = true;
            }
            Some(SubmissionEvent::Dismissed) => {
                self.bug = BugReport::default();
                changed = true;
            }
            None => {}
        }

        changed
    }

    pub fn snapshot(&self) -> PreferenceSnapshot {
        self.store.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portfolio_tui::persistence::{MemoryStorage, AUTO_CHANGE_THEME_KEY};
    use portfolio_tui::preferences::DEFAULT_ROTATION_INTERVAL;

    fn app_with(storage: MemoryStorage) -> App {
        let style = StyleRoot::new();
        let store = PreferenceStore::initialize(Box::new(storage.clone()), style.clone(), DEFAULT_ROTATION_INTERVAL)
            .unwrap();
        let translator = Translator::load(Box::new(storage));
        App::new(store, style, translator, ProfileConfig::default())
    }

    #[test]
    fn routes_resolve_paths() {
        assert_eq!(Route::from_path("/"), Route::Profile);
        assert_eq!(Route::from_path("/profile"), Route::Profile);
        assert_eq!(Route::from_path("/current-project"), Route::CurrentProject);
        assert_eq!(Route::from_path("/settings"), Route::Settings);
        assert_eq!(Route::from_path("/nope"), Route::Profile);
    }

    #[test]
    fn route_cycling_wraps() {
        assert_eq!(Route::Settings.next(), Route::Profile);
        assert_eq!(Route::Profile.prev(), Route::Settings);
        assert_eq!(Route::Projects.next(), Route::CurrentProject);
    }

    #[tokio::test(start_paused = true)]
    async fn picking_a_theme_turns_rotation_off() {
        let mut app = app_with(MemoryStorage::new());
        app.choose_theme(ThemeOption::Theme(1));
        let snapshot = app.snapshot();
        assert!(!snapshot.auto_rotate);
        assert_eq!(snapshot.current_index, 1);
        assert!(ThemeOption::Theme(1).is_active(&snapshot));
        assert!(!ThemeOption::Auto.is_active(&snapshot));
        assert_eq!(app.style.get("primary-color").as_deref(), Some("#667eea"));
    }

    #[tokio::test(start_paused = true)]
    async fn picking_auto_keeps_index_and_marks_only_auto() {
        let mut app = app_with(MemoryStorage::with_values([(AUTO_CHANGE_THEME_KEY, "false")]));
        app.choose_theme(ThemeOption::Theme(2));
        app.choose_theme(ThemeOption::Auto);
        let snapshot = app.snapshot();
        assert!(snapshot.auto_rotate);
        assert_eq!(snapshot.current_index, 2);
        assert!(ThemeOption::Auto.is_active(&snapshot));
        assert!(THEME_OPTIONS[1..].iter().all(|o| !o.is_active(&snapshot)));
    }

    #[tokio::test(start_paused = true)]
    async fn settings_cursor_wraps_and_activates_language() {
        let mut app = app_with(MemoryStorage::with_values([(AUTO_CHANGE_THEME_KEY, "false")]));
        app.move_settings_cursor(-1);
        assert_eq!(app.selected_settings_entry(), SettingsEntry::SubmitBug);

        app.settings_cursor = THEME_OPTIONS.len() + 1;
        assert_eq!(app.selected_settings_entry(), SettingsEntry::Language(Language::Spanish));
        app.activate_settings_entry(Instant::now());
        assert_eq!(app.translator.language(), Language::Spanish);
        assert_eq!(app.t("settings"), "Ajustes");
    }

    #[tokio::test(start_paused = true)]
    async fn contact_submission_runs_its_timers() {
        let mut app = app_with(MemoryStorage::with_values([(AUTO_CHANGE_THEME_KEY, "false")]));
        let start = Instant::now();

        app.submit_contact(start);
        assert!(!app.contact_submission.is_sending(), "incomplete form must not send");

        app.contact.fields = [
            "Ada".to_string(),
            "ada@example.com".to_string(),
            "Hi".to_string(),
            "Hello there".to_string(),
        ];
        app.submit_contact(start);
        assert!(app.contact_submission.is_sending());

        assert!(!app.on_tick(start + Duration::from_millis(1000)));
        assert!(app.on_tick(start + SUBMIT_DELAY));
        assert!(app.contact_submission.is_sent());
        assert!(app.contact.fields.iter().all(String::is_empty));

        assert!(app.on_tick(start + SUBMIT_DELAY + SUCCESS_DISPLAY));
        assert_eq!(app.contact_submission.state, SubmissionState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn bug_report_requires_details_and_resets_after_success() {
        let mut app = app_with(MemoryStorage::with_values([(AUTO_CHANGE_THEME_KEY, "false")]));
        let start = Instant::now();

        app.submit_bug_report(start);
        assert!(!app.bug_submission.is_sending());

        app.editing = Some(EditTarget::BugDetails);
        for c in "crash on load".chars() {
            app.push_char(c);
        }
        app.pop_char();
        assert_eq!(app.bug.details, "crash on loa");

        app.finish_edit(start);
        assert!(app.bug_submission.is_sending());
        assert_eq!(app.editing, None);

        app.on_tick(start + SUBMIT_DELAY);
        assert!(app.bug.timestamp.is_some());
        assert_eq!(app.bug.details, "crash on loa");

        app.on_tick(start + SUBMIT_DELAY + SUCCESS_DISPLAY);
        assert_eq!(app.bug, BugReport::default());
    }

    #[test]
    fn submission_cannot_restart_while_busy() {
        let mut submission = Submission::default();
        let now = Instant::now();
        assert!(submission.start(now));
        assert!(!submission.start(now));
        assert_eq!(submission.poll(now + SUBMIT_DELAY), Some(SubmissionEvent::Delivered));
        assert!(!submission.start(now + SUBMIT_DELAY));
    }

    #[tokio::test(start_paused = true)]
    async fn contact_enter_advances_through_fields() {
        let mut app = app_with(MemoryStorage::with_values([(AUTO_CHANGE_THEME_KEY, "false")]));
        let now = Instant::now();
        app.navigate(Route::Contact);
        app.activate_contact_entry(now);
        assert_eq!(app.editing, Some(EditTarget::ContactField(0)));
        app.push_char('A');
        app.finish_edit(now);
        assert_eq!(app.contact.cursor, 1);
        assert_eq!(app.contact.fields[0], "A");

        app.move_contact_cursor(-2);
        assert_eq!(app.contact.cursor, 4);
    }
}
