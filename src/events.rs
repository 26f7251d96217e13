use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::{App, View};

/// File written by the export key.
pub const EXPORT_FILE: &str = "nexus_export.json";

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // If prompt input is active, handle text input
    if app.input_active {
        handle_input(app, key);
        return;
    }

    if app.current_view == View::Prompt && handle_prompt_key(app, key) {
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        // View switching
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_view();
            } else {
                app.next_view();
            }
        }
        KeyCode::BackTab => app.prev_view(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_view(),
        KeyCode::Right | KeyCode::Char('l') => app.next_view(),

        // Direct view access
        KeyCode::Char('1') => app.set_view(View::Overview),
        KeyCode::Char('2') => app.set_view(View::Consciousness),
        KeyCode::Char('3') => app.set_view(View::Status),
        KeyCode::Char('4') => app.set_view(View::Prompt),

        // Simulation and polling
        KeyCode::Char('p') | KeyCode::Char(' ') => app.toggle_pause(),
        KeyCode::Char('r') => app.refresh_status(),

        // Prompt input
        KeyCode::Char('i') | KeyCode::Char('/') => app.start_input(),

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        // Export
        KeyCode::Char('e') => {
            let export_path = PathBuf::from(EXPORT_FILE);
            match app.export_state(&export_path) {
                Ok(()) => {
                    app.set_status_message(format!("Exported to {}", export_path.display()));
                }
                Err(e) => {
                    app.set_status_message(format!("Export failed: {}", e));
                }
            }
        }

        _ => {}
    }
}

/// Suggestion navigation on the prompt view. Returns true if the key was used.
fn handle_prompt_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.select_prev_suggestion(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_suggestion(),
        // Alt+Enter sends immediately, like a modifier-click
        KeyCode::Enter => app.use_selected_suggestion(key.modifiers.contains(KeyModifiers::ALT)),
        _ => return false,
    }
    true
}

/// Handle key input while the prompt line is active
fn handle_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_input(),

        // Leave input mode, keep the text
        KeyCode::Esc => app.cancel_input(),

        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.ctx.console().clear_input();
            app.cancel_input();
        }

        KeyCode::Backspace => app.input_pop(),

        KeyCode::Char(c) => app.input_push(c),

        _ => {}
    }
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollUp if app.current_view == View::Prompt => {
            app.select_prev_suggestion();
        }
        MouseEventKind::ScrollDown if app.current_view == View::Prompt => {
            app.select_next_suggestion();
        }

        MouseEventKind::Down(MouseButton::Left) => {
            // Tab clicks (row 1, after header)
            if mouse.row == 1 {
                if let Some(view) = tab_at(mouse.column) {
                    app.set_view(view);
                }
                return;
            }

            if app.current_view == View::Prompt {
                if let Some(index) = suggestion_at(app, mouse.column, mouse.row) {
                    let send_now = mouse.modifiers.contains(KeyModifiers::SHIFT);
                    app.click_suggestion(index, send_now);
                }
            }
        }

        _ => {}
    }
}

// Tab positions follow the titles drawn by `render_tabs`
fn tab_at(column: u16) -> Option<View> {
    let mut start = 0u16;
    for view in View::ALL {
        let width = crate::ui::common::tab_title(view).chars().count() as u16 + 1;
        if column < start + width {
            return Some(view);
        }
        start += width;
    }
    None
}

fn suggestion_at(app: &App, column: u16, row: u16) -> Option<usize> {
    let area = app.suggestion_area?;
    if column < area.x || column >= area.x + area.width {
        return None;
    }
    if row < area.y || row >= area.y + area.height {
        return None;
    }
    Some((row - area.y) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::ScriptedBackend;
    use crate::api::Backend;
    use crate::config::Settings;
    use crate::console::SUGGESTIONS;
    use crate::context::DashboardContext;
    use crate::ui::Theme;
    use crossterm::event::KeyEventKind;
    use ratatui::layout::Rect;
    use std::sync::Arc;

    fn app() -> App {
        let backend = Arc::new(ScriptedBackend::new()) as Arc<dyn Backend>;
        App::with_theme(DashboardContext::new(Settings::default(), backend), Theme::dark())
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn click(column: u16, row: u16, modifiers: KeyModifiers) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers,
        }
    }

    #[test]
    fn number_keys_switch_views() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Char('3')));
        assert_eq!(app.current_view, View::Status);
        handle_key_event(&mut app, key(KeyCode::Tab));
        assert_eq!(app.current_view, View::Prompt);
    }

    #[test]
    fn typing_goes_to_input_line() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Char('i')));
        assert!(app.input_active);
        for c in "hiq".chars() {
            handle_key_event(&mut app, key(KeyCode::Char(c)));
        }
        handle_key_event(&mut app, key(KeyCode::Backspace));
        assert_eq!(app.ctx.console().input(), "hi");
        assert!(app.running);

        handle_key_event(&mut app, key(KeyCode::Esc));
        assert!(!app.input_active);
        assert_eq!(app.ctx.console().input(), "hi");
    }

    #[tokio::test]
    async fn enter_submits_input() {
        let mut app = app();
        app.start_input();
        app.ctx.console().set_input("hello");
        handle_key_event(&mut app, key(KeyCode::Enter));
        assert_eq!(app.ctx.console().messages().len(), 1);
        assert_eq!(app.ctx.console().input(), "");
        app.ctx.shutdown().await;
    }

    #[test]
    fn enter_on_suggestion_populates_input() {
        let mut app = app();
        app.set_view(View::Prompt);
        handle_key_event(&mut app, key(KeyCode::Down));
        handle_key_event(&mut app, key(KeyCode::Enter));
        assert_eq!(app.ctx.console().input(), SUGGESTIONS[1].text);
        assert!(app.ctx.console().messages().is_empty());
    }

    #[tokio::test]
    async fn alt_enter_on_suggestion_sends() {
        let mut app = app();
        app.set_view(View::Prompt);
        handle_key_event(&mut app, KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT));
        assert_eq!(app.ctx.console().messages()[0].content, SUGGESTIONS[0].text);
        app.ctx.shutdown().await;
    }

    #[test]
    fn help_swallows_next_key() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Char('?')));
        assert!(app.show_help);
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.show_help);
        assert!(app.running);
    }

    #[test]
    fn pause_key_toggles_generation() {
        let mut app = app();
        let mut event = key(KeyCode::Char('p'));
        event.kind = KeyEventKind::Press;
        handle_key_event(&mut app, event);
        assert!(!app.ctx.is_active());
        handle_key_event(&mut app, event);
        assert!(app.ctx.is_active());
    }

    #[test]
    fn click_on_tab_switches_view() {
        let mut app = app();
        let start = crate::ui::common::tab_title(View::Overview).chars().count() as u16 + 1;
        handle_mouse_event(&mut app, click(start + 1, 1, KeyModifiers::NONE));
        assert_eq!(app.current_view, View::Consciousness);
    }

    #[test]
    fn plain_click_populates_suggestion() {
        let mut app = app();
        app.set_view(View::Prompt);
        app.suggestion_area = Some(Rect::new(2, 5, 30, 8));
        handle_mouse_event(&mut app, click(10, 7, KeyModifiers::NONE));
        assert_eq!(app.ctx.console().input(), SUGGESTIONS[2].text);
        assert!(app.ctx.console().messages().is_empty());

        // Outside the list
        handle_mouse_event(&mut app, click(40, 7, KeyModifiers::NONE));
        assert_eq!(app.selected_suggestion, 2);
    }

    #[tokio::test]
    async fn shift_click_sends_suggestion() {
        let mut app = app();
        app.set_view(View::Prompt);
        app.suggestion_area = Some(Rect::new(2, 5, 30, 8));
        handle_mouse_event(&mut app, click(10, 5, KeyModifiers::SHIFT));
        assert_eq!(app.ctx.console().messages().len(), 1);
        assert_eq!(app.ctx.console().input(), "");

        // Ignored while the first request is in flight
        handle_mouse_event(&mut app, click(10, 6, KeyModifiers::SHIFT));
        assert_eq!(app.ctx.console().messages().len(), 1);
        app.ctx.shutdown().await;
    }
}
