pub mod history_pane;
pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod list_pane;
pub mod modal;
pub mod stats_pane;
pub mod styles;
pub mod timer_pane;

use crate::app::AppState;
use crate::domain::UiMode;
use history_pane::render_history_pane;
use input_form::render_input_form;
use keybindings::render_keybindings;
use layout::create_layout;
use list_pane::render_list_pane;
use modal::render_modal;
use ratatui::{layout::Rect, text::Span, widgets::Paragraph, Frame};
use stats_pane::render_stats_pane;
use styles::hint_style;
use timer_pane::render_timer_pane;

/// Render the one-line status message
fn render_status_line(f: &mut Frame, app: &AppState, area: Rect) {
    let text = app.status_message.as_deref().unwrap_or("");
    f.render_widget(
        Paragraph::new(Span::styled(format!(" {}", text), hint_style())),
        area,
    );
}

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &AppState) {
    let size = f.size();
    let layout = create_layout(size);

    render_keybindings(f, layout.keybindings_area);

    render_timer_pane(f, app, layout.timer_area);
    render_list_pane(f, app, layout.list_area);
    render_history_pane(f, app, layout.history_area);
    render_stats_pane(f, app, layout.stats_area);
    render_status_line(f, app, layout.status_area);

    // Render confirmation modal if active
    if app.ui_mode == UiMode::Confirm {
        render_modal(f, app, size);
    }

    // Render input form if active
    if app.input_form.is_some() {
        render_input_form(f, app, size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineConfig;
    use chrono::Utc;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_render_full_screen() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut app = AppState::load(temp_dir.path(), EngineConfig::default());
        app.engine.add_task("Write chapter", Utc::now()).unwrap();
        app.request_clear_all();

        let backend = TestBackend::new(120, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| render(f, &app)).unwrap();

        let buffer = terminal.backend().buffer();
        let content: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(content.contains("Timer"));
        assert!(content.contains("Write chapter"));
        assert!(content.contains("Clear All Data"));
    }
}
