use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, AppMode};
use crate::traffic::ResetScope;

/// Work the sampling task has to do on behalf of a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Reset(ResetScope),
    Cleanup,
}

/// Handle a single key input event.
///
/// Returns an action once the user confirms a reset or asks for a cleanup;
/// the caller forwards it to the sampling task.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Option<Action> {
    // Ctrl+C quits from anywhere
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return None;
    }

    match app.mode {
        AppMode::Normal => handle_normal_mode(app, key),
        AppMode::Help => {
            handle_help_mode(app, key);
            None
        }
        AppMode::ConfirmReset(scope) => handle_confirm_mode(app, key, scope),
    }
}

// ── Normal mode ─────────────────────────────────────────────────────────

fn handle_normal_mode(app: &mut App, key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::F(10) | KeyCode::Char('q') => app.should_quit = true,

        KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('h') => app.mode = AppMode::Help,

        KeyCode::Char('t') => app.mode = AppMode::ConfirmReset(ResetScope::Today),
        KeyCode::Char('m') => app.mode = AppMode::ConfirmReset(ResetScope::Month),

        KeyCode::Char('c') => app.cycle_color_scheme(),

        KeyCode::Char('x') => return Some(Action::Cleanup),

        KeyCode::Esc => app.status = None,
        _ => {}
    }
    None
}

// ── Help ────────────────────────────────────────────────────────────────

fn handle_help_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::F(10) | KeyCode::Char('q') => app.should_quit = true,
        // Any other key closes help, like htop
        _ => app.mode = AppMode::Normal,
    }
}

// ── Reset confirmation ──────────────────────────────────────────────────

fn handle_confirm_mode(app: &mut App, key: KeyEvent, scope: ResetScope) -> Option<Action> {
    match key.code {
        KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
            app.mode = AppMode::Normal;
            Some(Action::Reset(scope))
        }
        KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Char('q') => {
            app.mode = AppMode::Normal;
            None
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color_scheme::ColorSchemeId;
    use crate::traffic::{TrafficSnapshot, UsageSummary};
    use chrono::NaiveDate;

    fn new_app() -> App {
        App::new(
            TrafficSnapshot {
                date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
                upload_speed: 0.0,
                download_speed: 0.0,
                total_upload: 0,
                total_download: 0,
                usage: UsageSummary::default(),
            },
            ColorSchemeId::Default,
        )
    }

    fn press(app: &mut App, code: KeyCode) -> Option<Action> {
        handle_input(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn reset_needs_confirmation() {
        let mut app = new_app();
        assert_eq!(press(&mut app, KeyCode::Char('m')), None);
        assert_eq!(app.mode, AppMode::ConfirmReset(ResetScope::Month));

        assert_eq!(press(&mut app, KeyCode::Char('x')), None);
        assert_eq!(app.mode, AppMode::ConfirmReset(ResetScope::Month));

        assert_eq!(press(&mut app, KeyCode::Enter), Some(Action::Reset(ResetScope::Month)));
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn escape_cancels_reset() {
        let mut app = new_app();
        press(&mut app, KeyCode::Char('t'));
        assert_eq!(press(&mut app, KeyCode::Esc), None);
        assert_eq!(app.mode, AppMode::Normal);
        assert!(!app.should_quit);
    }

    #[test]
    fn quit_keys() {
        let mut app = new_app();
        press(&mut app, KeyCode::F(10));
        assert!(app.should_quit);

        let mut app = new_app();
        handle_input(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.should_quit);
        assert_eq!(app.color_scheme_id, ColorSchemeId::Default);
    }

    #[test]
    fn cleanup_key_asks_for_cleanup_without_popup() {
        let mut app = new_app();
        assert_eq!(press(&mut app, KeyCode::Char('x')), Some(Action::Cleanup));
        assert_eq!(app.mode, AppMode::Normal);

        // Not while a reset is waiting for confirmation
        press(&mut app, KeyCode::Char('t'));
        assert_eq!(press(&mut app, KeyCode::Char('x')), None);
    }

    #[test]
    fn help_closes_on_any_key() {
        let mut app = new_app();
        press(&mut app, KeyCode::F(1));
        assert_eq!(app.mode, AppMode::Help);
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.mode, AppMode::Normal);
    }
}
