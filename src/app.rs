//! Application state and navigation logic.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use ratatui::layout::Rect;

use crate::console::{SuggestionAction, SUGGESTIONS};
use crate::context::DashboardContext;
use crate::ui::Theme;

/// How long a status bar message stays visible.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// The current view/tab in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Live efficiency chart.
    Overview,
    /// Awareness gauges, quantum and neural streams, thought patterns.
    Consciousness,
    /// Backend health cards.
    Status,
    /// Prompt console.
    Prompt,
}

impl View {
    pub const ALL: [View; 4] = [View::Overview, View::Consciousness, View::Status, View::Prompt];

    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Overview => View::Consciousness,
            View::Consciousness => View::Status,
            View::Status => View::Prompt,
            View::Prompt => View::Overview,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        match self {
            View::Overview => View::Prompt,
            View::Consciousness => View::Overview,
            View::Status => View::Consciousness,
            View::Prompt => View::Status,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Overview => "Overview",
            View::Consciousness => "Consciousness",
            View::Status => "Status",
            View::Prompt => "Prompt",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            View::Overview => 0,
            View::Consciousness => 1,
            View::Status => 2,
            View::Prompt => 3,
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,

    /// Keystrokes go to the prompt input line.
    pub input_active: bool,
    pub selected_suggestion: usize,
    /// Where the suggestion list was last drawn, for mouse hit-testing.
    pub suggestion_area: Option<Rect>,

    pub ctx: DashboardContext,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App over a dashboard context.
    pub fn new(ctx: DashboardContext) -> Self {
        Self::with_theme(ctx, Theme::auto_detect())
    }

    pub fn with_theme(ctx: DashboardContext, theme: Theme) -> Self {
        Self {
            running: true,
            current_view: View::Overview,
            show_help: false,
            input_active: false,
            selected_suggestion: 0,
            suggestion_area: None,
            ctx,
            theme,
            status_message: None,
        }
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < STATUS_MESSAGE_TTL {
                return Some(msg);
            }
        }
        None
    }

    pub fn next_view(&mut self) {
        self.set_view(self.current_view.next());
    }

    pub fn prev_view(&mut self) {
        self.set_view(self.current_view.prev());
    }

    /// Switch to a specific view. Leaving the prompt view ends input mode.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
        if view != View::Prompt {
            self.input_active = false;
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Pause or resume metric generation.
    pub fn toggle_pause(&mut self) {
        let active = self.ctx.toggle_active();
        let msg = if active { "Metrics resumed" } else { "Metrics paused" };
        self.set_status_message(msg.to_string());
    }

    /// Poll backend health now.
    pub fn refresh_status(&mut self) {
        self.ctx.refresh_status();
        self.set_status_message("Refreshing backend status...".to_string());
    }

    pub fn start_input(&mut self) {
        self.current_view = View::Prompt;
        self.input_active = true;
    }

    /// Leave input mode, keeping the typed text.
    pub fn cancel_input(&mut self) {
        self.input_active = false;
    }

    pub fn input_push(&mut self, c: char) {
        self.ctx.console().input_push(c);
    }

    pub fn input_pop(&mut self) {
        self.ctx.console().input_pop();
    }

    /// Send the input line.
    pub fn submit_input(&mut self) {
        if !self.ctx.submit_input() && self.ctx.console().is_sending() {
            self.set_status_message("Waiting for the previous reply".to_string());
        }
    }

    pub fn select_next_suggestion(&mut self) {
        self.selected_suggestion = (self.selected_suggestion + 1).min(SUGGESTIONS.len() - 1);
    }

    pub fn select_prev_suggestion(&mut self) {
        self.selected_suggestion = self.selected_suggestion.saturating_sub(1);
    }

    /// Apply the highlighted suggestion, sending it if `send_now`.
    pub fn use_selected_suggestion(&mut self, send_now: bool) {
        self.click_suggestion(self.selected_suggestion, send_now);
    }

    /// Apply a click on suggestion `index`.
    pub fn click_suggestion(&mut self, index: usize, send_now: bool) {
        if index < SUGGESTIONS.len() {
            self.selected_suggestion = index;
        }
        match self.ctx.click_suggestion(index, send_now) {
            SuggestionAction::Populated => {
                self.input_active = true;
            }
            SuggestionAction::Submitted(_) => {
                self.input_active = false;
            }
            SuggestionAction::Ignored => {}
        }
    }

    /// Export current dashboard state to a file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.ctx.state())?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::ScriptedBackend;
    use crate::api::Backend;
    use crate::config::Settings;
    use std::sync::Arc;

    fn app() -> App {
        let backend = Arc::new(ScriptedBackend::new()) as Arc<dyn Backend>;
        App::with_theme(DashboardContext::new(Settings::default(), backend), Theme::dark())
    }

    #[test]
    fn views_cycle_both_ways() {
        for view in View::ALL {
            assert_eq!(view.next().prev(), view);
            assert_eq!(View::ALL[view.index()], view);
        }
        assert_eq!(View::Prompt.next(), View::Overview);
    }

    #[test]
    fn leaving_prompt_ends_input() {
        let mut app = app();
        app.start_input();
        assert_eq!(app.current_view, View::Prompt);
        assert!(app.input_active);
        app.next_view();
        assert!(!app.input_active);
    }

    #[test]
    fn suggestion_selection_is_clamped() {
        let mut app = app();
        app.select_prev_suggestion();
        assert_eq!(app.selected_suggestion, 0);
        for _ in 0..20 {
            app.select_next_suggestion();
        }
        assert_eq!(app.selected_suggestion, SUGGESTIONS.len() - 1);
    }

    #[test]
    fn populating_suggestion_enters_input_mode() {
        let mut app = app();
        app.click_suggestion(3, false);
        assert!(app.input_active);
        assert_eq!(app.selected_suggestion, 3);
        assert_eq!(app.ctx.console().input(), SUGGESTIONS[3].text);
    }

    #[tokio::test]
    async fn sending_suggestion_leaves_input_mode() {
        let mut app = app();
        app.input_active = true;
        app.click_suggestion(0, true);
        assert!(!app.input_active);
        assert_eq!(app.ctx.console().messages().len(), 1);
        app.ctx.shutdown().await;
    }

    #[test]
    fn status_message_expires() {
        let mut app = app();
        app.set_status_message("hello".to_string());
        assert_eq!(app.get_status_message(), Some("hello"));
        app.status_message = Some(("old".to_string(), Instant::now() - Duration::from_secs(10)));
        assert_eq!(app.get_status_message(), None);
    }

    #[test]
    fn export_writes_dashboard_json() {
        let app = app();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nexus_export.json");
        app.export_state(&path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(json["overview"]["streams"]["realtime"].is_object());
        assert!(json["consciousness"]["gauges"]["consciousness_level"].is_number());
        assert_eq!(json["status"]["polls"], 0);
    }
}
