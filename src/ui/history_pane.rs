use crate::app::AppState;
use crate::domain::{format_minutes, CompletedTask, HistoryEntry};
use crate::ui::styles::{border_style, default_style, done_style, hint_style, title_style};
use chrono::Local;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Create a line for a recorded session
/// Format: 06-10 09:30  25/5  42m  ×1  Write, Read
fn create_history_line(entry: &HistoryEntry) -> Line<'static> {
    let when = entry.timestamp.with_timezone(&Local).format("%m-%d %H:%M");
    Line::from(vec![
        Span::styled(format!("{}  ", when), hint_style()),
        Span::raw(format!("{:<9} ", entry.session_type.label())),
        Span::styled(
            format!("{:>6}  ", format_minutes(entry.total_minutes)),
            title_style(),
        ),
        Span::raw(format!("×{}  ", entry.session_count)),
        Span::styled(entry.task.clone(), default_style()),
    ])
}

/// Create a line for a task completed in the last day
fn create_done_line(task: &CompletedTask) -> Line<'static> {
    Line::from(vec![
        Span::styled("✓ ".to_string(), done_style()),
        Span::styled(task.text.clone(), default_style()),
        Span::styled(
            format!("  {}", task.timestamp.with_timezone(&Local).format("%H:%M")),
            hint_style(),
        ),
    ])
}

/// Render session history (newest first) followed by recently completed tasks
pub fn render_history_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let history = app.engine.time_history();
    let completed = app.engine.completed_tasks();

    let mut items: Vec<ListItem> = history
        .iter()
        .rev()
        .map(|entry| ListItem::new(create_history_line(entry)))
        .collect();

    if history.is_empty() {
        items.push(ListItem::new(Line::from(Span::styled(
            "No sessions recorded yet",
            hint_style(),
        ))));
    }

    if !completed.is_empty() {
        items.push(ListItem::new(Line::raw("")));
        items.extend(
            completed
                .iter()
                .rev()
                .map(|task| ListItem::new(create_done_line(task))),
        );
    }

    let title = format!(
        " History ({}) · Done today ({}) ",
        history.len(),
        completed.len()
    );
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title(Span::styled(title, title_style())),
    );

    f.render_widget(list, area);
}
