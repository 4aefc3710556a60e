use crate::app::AppState;
use crate::domain::UiMode;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

/// Handle keyboard input events; returns true when the app should quit
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match app.ui_mode {
        UiMode::Normal => handle_normal_mode(app, key),
        UiMode::Confirm => handle_confirm_mode(app, key),
        UiMode::AddingTask | UiMode::GoalInput => handle_input_form_mode(app, key),
    }
}

/// Handle keys in normal mode
fn handle_normal_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    // Any key dismisses the last status line
    app.status_message = None;

    match key.code {
        // Navigation
        KeyCode::Up | KeyCode::Char('k') => {
            app.move_selection_up();
            Ok(false)
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.move_selection_down();
            Ok(false)
        }

        // Timer
        KeyCode::Char(' ') | KeyCode::Char('s') => {
            app.toggle_start_pause();
            Ok(false)
        }
        KeyCode::Char('x') => {
            app.stop();
            Ok(false)
        }
        KeyCode::Char('m') | KeyCode::Char('M') => {
            app.cycle_mode();
            Ok(false)
        }

        // Tasks
        KeyCode::Enter => {
            app.activate_selected();
            Ok(false)
        }
        KeyCode::Char('a') | KeyCode::Char('A') => {
            app.start_add_task();
            Ok(false)
        }
        KeyCode::Char('d') | KeyCode::Char('D') => {
            app.complete_selected();
            Ok(false)
        }
        KeyCode::Delete | KeyCode::Backspace => {
            app.request_delete_selected();
            Ok(false)
        }

        // Goal, history, data
        KeyCode::Char('g') | KeyCode::Char('G') => {
            app.start_goal_input();
            Ok(false)
        }
        KeyCode::Char('H') => {
            app.request_delete_last_history();
            Ok(false)
        }
        KeyCode::Char('X') => {
            app.request_clear_all();
            Ok(false)
        }
        KeyCode::Char('e') | KeyCode::Char('E') => {
            app.export();
            Ok(false)
        }

        // Quit
        KeyCode::Char('q') | KeyCode::Char('Q') => Ok(true),

        _ => Ok(false),
    }
}

/// Handle keys while a confirmation modal is open
fn handle_confirm_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            app.confirm_modal();
            Ok(false)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.cancel_modal();
            Ok(false)
        }
        _ => Ok(false),
    }
}

/// Handle keys in input form mode (new task or daily goal)
fn handle_input_form_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        // Submit form
        KeyCode::Enter => {
            app.submit_input_form();
            Ok(false)
        }

        // Cancel form
        KeyCode::Esc => {
            app.cancel_input_form();
            Ok(false)
        }

        // Backspace
        KeyCode::Backspace => {
            app.input_form_backspace();
            Ok(false)
        }

        // Add character
        KeyCode::Char(c) => {
            app.input_form_add_char(c);
            Ok(false)
        }

        _ => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TimerStatus;
    use crate::engine::EngineConfig;
    use chrono::Utc;
    use crossterm::event::KeyModifiers;
    use tempfile::TempDir;

    fn create_test_app() -> (TempDir, AppState) {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut app = AppState::load(temp_dir.path(), EngineConfig::default());
        app.notifications_enabled = false;
        app.engine.add_task("Test task", Utc::now()).unwrap();
        (temp_dir, app)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    #[test]
    fn test_handle_navigation() {
        let (_dir, mut app) = create_test_app();
        app.engine.add_task("Task 2", Utc::now()).unwrap();

        assert_eq!(app.selected_index, 0);

        handle_key(&mut app, key(KeyCode::Down)).unwrap();
        assert_eq!(app.selected_index, 1);

        handle_key(&mut app, key(KeyCode::Up)).unwrap();
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_handle_quit() {
        let (_dir, mut app) = create_test_app();
        let should_quit = handle_key(&mut app, key(KeyCode::Char('q'))).unwrap();
        assert!(should_quit);
    }

    #[test]
    fn test_handle_add_task() {
        let (_dir, mut app) = create_test_app();
        let initial_count = app.engine.tasks().len();

        // Press 'a' to open form
        handle_key(&mut app, key(KeyCode::Char('a'))).unwrap();
        assert_eq!(app.ui_mode, UiMode::AddingTask);
        assert!(app.input_form.is_some());

        // Typing 'q' in the form must not quit
        for c in ['N', 'e', 'q'] {
            assert!(!handle_key(&mut app, key(KeyCode::Char(c))).unwrap());
        }

        // Submit with Enter
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        assert_eq!(app.engine.tasks().len(), initial_count + 1);
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert!(app.input_form.is_none());
    }

    #[test]
    fn test_handle_start_pause_stop() {
        let (_dir, mut app) = create_test_app();

        handle_key(&mut app, key(KeyCode::Char(' '))).unwrap();
        assert_eq!(app.engine.status(), TimerStatus::Running);

        handle_key(&mut app, key(KeyCode::Char('s'))).unwrap();
        assert_eq!(app.engine.status(), TimerStatus::Paused);

        handle_key(&mut app, key(KeyCode::Char('x'))).unwrap();
        assert_eq!(app.engine.status(), TimerStatus::Idle);
    }

    #[test]
    fn test_handle_delete_needs_yes() {
        let (_dir, mut app) = create_test_app();

        handle_key(&mut app, key(KeyCode::Delete)).unwrap();
        assert_eq!(app.ui_mode, UiMode::Confirm);

        // Unrelated keys are ignored while confirming
        handle_key(&mut app, key(KeyCode::Char('q'))).unwrap();
        assert_eq!(app.engine.tasks().len(), 1);

        handle_key(&mut app, key(KeyCode::Char('n'))).unwrap();
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert_eq!(app.engine.tasks().len(), 1);

        handle_key(&mut app, key(KeyCode::Delete)).unwrap();
        handle_key(&mut app, key(KeyCode::Char('y'))).unwrap();
        assert!(app.engine.tasks().is_empty());
    }

    #[test]
    fn test_handle_goal_input() {
        let (_dir, mut app) = create_test_app();

        handle_key(&mut app, key(KeyCode::Char('g'))).unwrap();
        assert_eq!(app.ui_mode, UiMode::GoalInput);
        for _ in 0..3 {
            handle_key(&mut app, key(KeyCode::Backspace)).unwrap();
        }
        handle_key(&mut app, key(KeyCode::Char('4'))).unwrap();
        handle_key(&mut app, key(KeyCode::Char('5'))).unwrap();
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();

        assert_eq!(app.engine.daily_goal(), 45);
    }

    #[test]
    fn test_handle_complete_task() {
        let (_dir, mut app) = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('d'))).unwrap();
        assert!(app.engine.tasks().is_empty());
        assert_eq!(app.engine.completed_tasks().len(), 1);
    }
}
