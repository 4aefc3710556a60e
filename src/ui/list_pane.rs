use crate::app::AppState;
use crate::domain::{format_minutes, TaskRow};
use crate::ui::styles::{
    border_style, default_style, hint_style, idle_style, running_style, selected_style,
    title_style,
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

/// Render the task list pane
pub fn render_list_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let rows = app.rows();

    let items: Vec<ListItem> = if rows.is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            "No tasks yet. Press 'a' to add one, or start to use a default task.",
            hint_style(),
        )))]
    } else {
        rows.iter()
            .map(|row| {
                let style = if row.index == app.selected_index {
                    selected_style()
                } else {
                    default_style()
                };
                ListItem::new(create_task_line(row)).style(style)
            })
            .collect()
    };

    let title = format!(" Tasks ({}) ", rows.len());
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title(Span::styled(title, title_style())),
    );

    let mut state = ListState::default();
    if !rows.is_empty() {
        state.select(Some(app.selected_index.min(rows.len() - 1)));
    }
    f.render_stateful_widget(list, area, &mut state);
}

/// Create a single line for a task
/// Format: ▶ Write proposal  1h 20m (+12m)
fn create_task_line(row: &TaskRow) -> Line<'static> {
    let mut spans = Vec::new();

    if row.is_active {
        spans.push(Span::styled("▶ ".to_string(), running_style()));
    } else {
        spans.push(Span::raw("  ".to_string()));
    }

    if row.is_default {
        spans.push(Span::styled(format!("{} (default)", row.text), idle_style()));
    } else {
        spans.push(Span::raw(row.text.clone()));
    }

    spans.push(Span::raw("  ".to_string()));
    spans.push(Span::raw(format_minutes(row.total_minutes)));

    if row.run_minutes > 0.0 {
        spans.push(Span::styled(
            format!(" (+{:.1}m)", row.run_minutes),
            running_style(),
        ));
    }

    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn row(is_active: bool, is_default: bool, run_minutes: f64) -> TaskRow {
        TaskRow {
            index: 0,
            id: Uuid::new_v4(),
            text: "Test task".to_string(),
            is_active,
            is_default,
            total_minutes: 80.0 + run_minutes,
            run_minutes,
        }
    }

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_create_task_line() {
        let line = create_task_line(&row(false, false, 0.0));
        assert_eq!(text(&line), "  Test task  1h 20m");
    }

    #[test]
    fn test_create_active_task_line() {
        let line = create_task_line(&row(true, false, 2.5));
        let line_str = text(&line);
        assert!(line_str.starts_with("▶ Test task"));
        assert!(line_str.ends_with("(+2.5m)"));
    }

    #[test]
    fn test_selected_task_stays_visible() {
        use crate::engine::EngineConfig;
        use chrono::Utc;
        use ratatui::{backend::TestBackend, Terminal};

        let temp_dir = tempfile::tempdir().unwrap();
        let mut app = AppState::load(temp_dir.path(), EngineConfig::default());
        app.notifications_enabled = false;
        for n in 0..20 {
            app.engine.add_task(&format!("Task {:02}", n), Utc::now()).unwrap();
        }
        app.selected_index = 19;

        let mut terminal = Terminal::new(TestBackend::new(50, 6)).unwrap();
        terminal
            .draw(|f| render_list_pane(f, &app, f.size()))
            .unwrap();

        let content: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(content.contains("Task 19"));
        assert!(!content.contains("Task 00"));
    }

    #[test]
    fn test_default_task_marked() {
        let line = create_task_line(&row(false, true, 0.0));
        assert!(text(&line).contains("(default)"));
    }
}
