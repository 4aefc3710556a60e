use crate::domain::{task_rows, Document, TaskRow, TimerStatus, UiMode};
use crate::engine::{EngineConfig, FocusEngine, PhaseEvent};
use crate::notifications;
use crate::persistence::{data_file, export_to, DocumentStore};
use crate::report::stats::{self, DayTotal};
use anyhow::Result;
use chrono::{Local, Utc};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Days shown in the focus chart
pub const CHART_DAYS: u32 = 7;

/// Destructive actions waiting for a y/n answer
#[derive(Debug, Clone, PartialEq)]
pub enum Confirmation {
    DeleteTask(Uuid),
    DeleteHistoryEntry(Uuid),
    ClearAllData,
}

/// Modal state for a pending confirmation
#[derive(Debug, Clone)]
pub struct ModalState {
    pub action: Confirmation,
    pub message: String,
}

/// Single-line input used for new tasks and the daily goal
#[derive(Debug, Clone, Default)]
pub struct InputFormState {
    pub text: String,
}

/// Main application state
pub struct AppState {
    pub engine: FocusEngine,
    store: DocumentStore,
    pub data_dir: PathBuf,
    pub selected_index: usize,
    pub ui_mode: UiMode,
    pub modal: Option<ModalState>,
    pub input_form: Option<InputFormState>,
    /// One-line feedback shown in the footer
    pub status_message: Option<String>,
    pub needs_save: bool,
    pub notifications_enabled: bool,
}

impl AppState {
    pub fn new(engine: FocusEngine, data_dir: PathBuf) -> Self {
        Self {
            engine,
            store: DocumentStore::new(data_file(&data_dir)),
            data_dir,
            selected_index: 0,
            ui_mode: UiMode::Normal,
            modal: None,
            input_form: None,
            status_message: None,
            needs_save: false,
            notifications_enabled: true,
        }
    }

    /// Load the data directory's document (or defaults) into a fresh engine
    pub fn load(data_dir: &Path, config: EngineConfig) -> Self {
        let store = DocumentStore::new(data_file(data_dir));
        let document = store.load().unwrap_or_default();
        tracing::info!(
            tasks = document.tasks.len(),
            history = document.time_history.len(),
            "loaded data"
        );
        let engine = FocusEngine::from_document(document, config, Utc::now());
        Self::new(engine, data_dir.to_path_buf())
    }

    // ----- Views -----

    pub fn rows(&self) -> Vec<TaskRow> {
        let run_times = self.engine.run_times();
        task_rows(self.engine.tasks(), self.engine.active_task_id(), |id| {
            run_times.minutes(id)
        })
    }

    pub fn selected_task_id(&self) -> Option<Uuid> {
        self.engine.tasks().get(self.selected_index).map(|t| t.id)
    }

    /// Minutes recorded today, including the run in progress
    pub fn today_minutes(&self) -> f64 {
        let today = Local::now().date_naive();
        stats::minutes_on(self.engine.time_history(), today, &Local)
            + self.engine.run_times().total()
    }

    pub fn goal_progress(&self) -> f64 {
        stats::goal_progress(self.today_minutes(), self.engine.daily_goal())
    }

    /// Recorded minutes per day for the chart, oldest first
    pub fn recent_days(&self) -> Vec<DayTotal> {
        let today = Local::now().date_naive();
        stats::daily_totals(self.engine.time_history(), CHART_DAYS, today, &Local)
    }

    // ----- Selection -----

    /// Move selection up
    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// Move selection down
    pub fn move_selection_down(&mut self) {
        if self.selected_index + 1 < self.engine.tasks().len() {
            self.selected_index += 1;
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.engine.tasks().len();
        if self.selected_index >= len {
            self.selected_index = len.saturating_sub(1);
        }
    }

    // ----- Timer -----

    /// Start, pause, or resume depending on the current status
    pub fn toggle_start_pause(&mut self) {
        let now = Utc::now();
        match self.engine.status() {
            TimerStatus::Running => self.engine.pause(now),
            TimerStatus::Idle | TimerStatus::Paused => self.engine.start(now),
        }
        tracing::debug!(status = self.engine.status().to_tag(), "timer toggled");
        self.needs_save = true;
    }

    pub fn stop(&mut self) {
        if self.engine.status() == TimerStatus::Idle {
            return;
        }
        match self.engine.stop(Utc::now()) {
            Some(entry) => {
                self.status_message = Some(format!(
                    "Recorded {} min on {}",
                    entry.rounded_minutes(),
                    entry.task
                ));
            }
            None => {
                self.status_message = Some("Run too short to record".to_string());
            }
        }
        self.clamp_selection();
        self.needs_save = true;
    }

    pub fn cycle_mode(&mut self) {
        let next = self.engine.mode().next();
        match self.engine.set_mode(next) {
            Ok(()) => self.status_message = Some(format!("Mode: {}", next.label())),
            Err(e) => self.status_message = Some(e.to_string()),
        }
    }

    /// Advance the engine and fire cues for any phase changes
    pub fn tick(&mut self) -> Vec<PhaseEvent> {
        let events = self.engine.tick(Utc::now());
        self.announce(&events);
        events
    }

    /// Cue only the latest phase change of a tick, so a catch-up burst
    /// rings once. Returns the number of cues fired.
    fn announce(&mut self, events: &[PhaseEvent]) -> usize {
        let Some(last) = events.last() else {
            return 0;
        };
        if self.notifications_enabled {
            notifications::notify_phase(last);
        }
        self.status_message = Some(notifications::phase_message(last).1);
        self.needs_save = true;
        1
    }

    // ----- Tasks -----

    /// Make the selected task the one accruing time
    pub fn activate_selected(&mut self) {
        let Some(id) = self.selected_task_id() else {
            return;
        };
        if let Err(e) = self.engine.set_active_task(id, Utc::now()) {
            self.status_message = Some(e.to_string());
        }
    }

    pub fn complete_selected(&mut self) {
        let Some(id) = self.selected_task_id() else {
            return;
        };
        match self.engine.complete_task(id, Utc::now()) {
            Ok(record) => {
                self.status_message = Some(format!(
                    "Completed {} ({:.0} min)",
                    record.task, record.duration
                ));
                self.clamp_selection();
                self.needs_save = true;
            }
            Err(e) => self.status_message = Some(e.to_string()),
        }
    }

    /// Start adding a new task (opens input form)
    pub fn start_add_task(&mut self) {
        self.input_form = Some(InputFormState::default());
        self.ui_mode = UiMode::AddingTask;
    }

    /// Open the daily goal prompt prefilled with the current goal
    pub fn start_goal_input(&mut self) {
        self.input_form = Some(InputFormState {
            text: self.engine.daily_goal().to_string(),
        });
        self.ui_mode = UiMode::GoalInput;
    }

    pub fn input_form_add_char(&mut self, c: char) {
        if let Some(form) = &mut self.input_form {
            if self.ui_mode == UiMode::GoalInput && !c.is_ascii_digit() {
                return;
            }
            form.text.push(c);
        }
    }

    pub fn input_form_backspace(&mut self) {
        if let Some(form) = &mut self.input_form {
            form.text.pop();
        }
    }

    /// Submit input form
    pub fn submit_input_form(&mut self) {
        if let Some(form) = self.input_form.take() {
            match self.ui_mode {
                UiMode::AddingTask => match self.engine.add_task(&form.text, Utc::now()) {
                    Ok(_) => self.needs_save = true,
                    Err(e) => self.status_message = Some(e.to_string()),
                },
                UiMode::GoalInput => match form.text.trim().parse::<u32>() {
                    Ok(minutes) => {
                        self.engine.set_daily_goal(minutes);
                        self.status_message = Some(format!(
                            "Daily goal: {} min",
                            self.engine.daily_goal()
                        ));
                        self.needs_save = true;
                    }
                    Err(_) => self.status_message = Some("Goal must be a number".to_string()),
                },
                _ => {}
            }
            self.ui_mode = UiMode::Normal;
        }
    }

    /// Cancel input form
    pub fn cancel_input_form(&mut self) {
        self.input_form = None;
        self.ui_mode = UiMode::Normal;
    }

    // ----- Confirmations -----

    fn ask(&mut self, action: Confirmation, message: String) {
        self.modal = Some(ModalState { action, message });
        self.ui_mode = UiMode::Confirm;
    }

    pub fn request_delete_selected(&mut self) {
        let Some(task) = self.engine.tasks().get(self.selected_index).cloned() else {
            return;
        };
        self.ask(
            Confirmation::DeleteTask(task.id),
            format!("Delete task \"{}\"? Its time is discarded.", task.text),
        );
    }

    /// Ask to delete the most recent history entry
    pub fn request_delete_last_history(&mut self) {
        let Some(entry) = self.engine.time_history().last().cloned() else {
            self.status_message = Some("No history to delete".to_string());
            return;
        };
        self.ask(
            Confirmation::DeleteHistoryEntry(entry.id),
            format!(
                "Delete the {} min session on {}?",
                entry.rounded_minutes(),
                entry.task
            ),
        );
    }

    pub fn request_clear_all(&mut self) {
        self.ask(
            Confirmation::ClearAllData,
            "Delete ALL tasks, history, and streaks?".to_string(),
        );
    }

    /// Carry out the pending destructive action
    pub fn confirm_modal(&mut self) {
        let Some(modal) = self.modal.take() else {
            self.ui_mode = UiMode::Normal;
            return;
        };
        let result = match modal.action {
            Confirmation::DeleteTask(id) => self
                .engine
                .delete_task(id, Utc::now())
                .map(|task| format!("Deleted {}", task.text)),
            Confirmation::DeleteHistoryEntry(id) => self
                .engine
                .delete_history_entry(id)
                .map(|_| "Session deleted".to_string()),
            Confirmation::ClearAllData => {
                self.engine.clear_all_data();
                Ok("All data cleared".to_string())
            }
        };
        match result {
            Ok(message) => {
                self.status_message = Some(message);
                self.needs_save = true;
            }
            Err(e) => self.status_message = Some(e.to_string()),
        }
        self.clamp_selection();
        self.ui_mode = UiMode::Normal;
    }

    pub fn cancel_modal(&mut self) {
        self.modal = None;
        self.ui_mode = UiMode::Normal;
    }

    // ----- Files -----

    /// Current data as a document stamped with the save time
    pub fn document(&self) -> Document {
        self.engine.to_document(Utc::now())
    }

    /// Save state to disk
    pub fn save(&mut self) -> Result<()> {
        self.store.save(&self.document())?;
        self.needs_save = false;
        Ok(())
    }

    /// Save, logging instead of propagating failures. In-memory state stays
    /// authoritative and the write is not retried until the next change.
    pub fn autosave(&mut self) {
        if let Err(e) = self.save() {
            tracing::error!(error = %format!("{e:#}"), "failed to save data");
            self.status_message = Some("Save failed, see log".to_string());
            self.needs_save = false;
        }
    }

    /// Write an export file into the data directory
    pub fn export(&mut self) {
        match export_to(&self.document(), &self.data_dir, Utc::now()) {
            Ok(path) => self.status_message = Some(format!("Exported to {}", path.display())),
            Err(e) => {
                tracing::error!(error = %format!("{e:#}"), "export failed");
                self.status_message = Some(format!("Export failed: {}", e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Mode;
    use tempfile::tempdir;

    fn create_test_app(dir: &Path) -> AppState {
        let mut app = AppState::load(dir, EngineConfig::default());
        app.notifications_enabled = false;
        app.engine.add_task("Task 1", Utc::now()).unwrap();
        app.engine.add_task("Task 2", Utc::now()).unwrap();
        app
    }

    #[test]
    fn test_burst_of_phase_changes_cues_once() {
        let temp_dir = tempdir().unwrap();
        let mut app = create_test_app(temp_dir.path());
        let events = vec![
            PhaseEvent::WorkComplete {
                sessions: 1,
                streak: 0.5,
            },
            PhaseEvent::BreakComplete { cycles: 1 },
            PhaseEvent::WorkComplete {
                sessions: 2,
                streak: 1.0,
            },
        ];

        assert_eq!(app.announce(&events), 1);
        assert_eq!(
            app.status_message,
            Some(notifications::phase_message(&events[2]).1)
        );
        assert!(app.needs_save);

        app.needs_save = false;
        app.status_message = None;
        assert_eq!(app.announce(&[]), 0);
        assert_eq!(app.status_message, None);
        assert!(!app.needs_save);
    }

    #[test]
    fn test_app_state_new() {
        let temp_dir = tempdir().unwrap();
        let app = create_test_app(temp_dir.path());
        assert_eq!(app.engine.tasks().len(), 2);
        assert_eq!(app.selected_index, 0);
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert!(app.modal.is_none());
    }

    #[test]
    fn test_move_selection() {
        let temp_dir = tempdir().unwrap();
        let mut app = create_test_app(temp_dir.path());

        app.move_selection_down();
        assert_eq!(app.selected_index, 1);

        // Can't go past the end
        app.move_selection_down();
        assert_eq!(app.selected_index, 1);

        app.move_selection_up();
        assert_eq!(app.selected_index, 0);

        // Can't go below 0
        app.move_selection_up();
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_toggle_start_pause() {
        let temp_dir = tempdir().unwrap();
        let mut app = create_test_app(temp_dir.path());

        app.toggle_start_pause();
        assert_eq!(app.engine.status(), TimerStatus::Running);
        assert_eq!(app.engine.active_task_id(), app.selected_task_id());

        app.toggle_start_pause();
        assert_eq!(app.engine.status(), TimerStatus::Paused);

        app.stop();
        assert_eq!(app.engine.status(), TimerStatus::Idle);
        assert_eq!(
            app.status_message.as_deref(),
            Some("Run too short to record")
        );
    }

    #[test]
    fn test_cycle_mode_only_when_idle() {
        let temp_dir = tempdir().unwrap();
        let mut app = create_test_app(temp_dir.path());

        app.cycle_mode();
        assert_eq!(app.engine.mode(), Mode::Extended);

        app.toggle_start_pause();
        app.cycle_mode();
        assert_eq!(app.engine.mode(), Mode::Extended);
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_add_task_form() {
        let temp_dir = tempdir().unwrap();
        let mut app = create_test_app(temp_dir.path());

        app.start_add_task();
        assert_eq!(app.ui_mode, UiMode::AddingTask);
        for c in "Review".chars() {
            app.input_form_add_char(c);
        }
        app.input_form_backspace();
        app.submit_input_form();

        assert_eq!(app.ui_mode, UiMode::Normal);
        assert!(app.engine.tasks().iter().any(|t| t.text == "Revie"));
        assert!(app.needs_save);
    }

    #[test]
    fn test_blank_task_rejected_with_message() {
        let temp_dir = tempdir().unwrap();
        let mut app = create_test_app(temp_dir.path());

        app.start_add_task();
        app.input_form_add_char(' ');
        app.submit_input_form();

        assert_eq!(app.engine.tasks().len(), 2);
        assert_eq!(
            app.status_message.as_deref(),
            Some("task text cannot be empty")
        );
    }

    #[test]
    fn test_goal_input_accepts_digits_only() {
        let temp_dir = tempdir().unwrap();
        let mut app = create_test_app(temp_dir.path());

        app.start_goal_input();
        app.input_form_backspace();
        app.input_form_backspace();
        app.input_form_backspace();
        for c in "9x0".chars() {
            app.input_form_add_char(c);
        }
        app.submit_input_form();
        assert_eq!(app.engine.daily_goal(), 90);
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let temp_dir = tempdir().unwrap();
        let mut app = create_test_app(temp_dir.path());

        app.request_delete_selected();
        assert_eq!(app.ui_mode, UiMode::Confirm);
        assert_eq!(app.engine.tasks().len(), 2);

        app.cancel_modal();
        assert_eq!(app.engine.tasks().len(), 2);

        app.request_delete_selected();
        app.confirm_modal();
        assert_eq!(app.engine.tasks().len(), 1);
        assert_eq!(app.ui_mode, UiMode::Normal);
    }

    #[test]
    fn test_clear_all_after_confirmation() {
        let temp_dir = tempdir().unwrap();
        let mut app = create_test_app(temp_dir.path());

        app.request_clear_all();
        app.confirm_modal();
        assert!(app.engine.tasks().is_empty());
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_complete_selected_clamps_selection() {
        let temp_dir = tempdir().unwrap();
        let mut app = create_test_app(temp_dir.path());

        app.move_selection_down();
        app.complete_selected();
        assert_eq!(app.engine.tasks().len(), 1);
        assert_eq!(app.selected_index, 0);
        assert_eq!(app.engine.task_history().len(), 1);
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = tempdir().unwrap();
        let mut app = create_test_app(temp_dir.path());
        app.engine.set_daily_goal(75);
        app.save().unwrap();
        assert!(!app.needs_save);

        let reloaded = AppState::load(temp_dir.path(), EngineConfig::default());
        assert_eq!(reloaded.engine.tasks().len(), 2);
        assert_eq!(reloaded.engine.daily_goal(), 75);
    }

    #[test]
    fn test_autosave_failure_is_not_fatal() {
        let temp_dir = tempdir().unwrap();
        let missing = temp_dir.path().join("gone");
        let mut app = AppState::new(FocusEngine::new(EngineConfig::default()), missing);
        app.needs_save = true;

        app.autosave();
        assert!(!app.needs_save);
        assert_eq!(app.status_message.as_deref(), Some("Save failed, see log"));
    }

    #[test]
    fn test_export_writes_into_data_dir() {
        let temp_dir = tempdir().unwrap();
        let mut app = create_test_app(temp_dir.path());
        app.export();

        let exported = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .any(|e| e.file_name().to_string_lossy().starts_with("pomodoro-data-"));
        assert!(exported);
    }

    #[test]
    fn test_recent_days_has_chart_width() {
        let temp_dir = tempdir().unwrap();
        let app = create_test_app(temp_dir.path());
        assert_eq!(app.recent_days().len(), CHART_DAYS as usize);
        assert_eq!(app.today_minutes(), 0.0);
    }
}
