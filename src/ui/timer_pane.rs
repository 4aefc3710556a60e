use crate::app::AppState;
use crate::domain::{format_clock, phase_progress, status_badge, Phase, TimerStatus};
use crate::engine::EngineSnapshot;
use crate::ui::styles::{
    border_style, break_style, default_style, gauge_style, idle_style, paused_style,
    running_style, title_style,
};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

fn badge_style(snapshot: &EngineSnapshot) -> Style {
    match (snapshot.status, snapshot.phase) {
        (TimerStatus::Running, Phase::Work) => running_style(),
        (TimerStatus::Running, Phase::Break) => break_style(),
        (TimerStatus::Paused, _) => paused_style(),
        (TimerStatus::Idle, _) => idle_style(),
    }
}

/// Text lines shown above the phase gauge
fn timer_lines(app: &AppState, snapshot: &EngineSnapshot) -> Vec<Line<'static>> {
    let style = badge_style(snapshot);
    let mut lines = Vec::new();

    lines.push(Line::from(Span::styled(
        status_badge(snapshot.status, snapshot.phase).to_string(),
        style,
    )));
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        format_clock(snapshot.display_secs),
        style,
    )));
    lines.push(Line::raw(""));

    let active = snapshot
        .active_task_id
        .and_then(|id| app.engine.task(&id))
        .map(|t| t.text.clone())
        .unwrap_or_else(|| "-".to_string());
    lines.push(Line::from(vec![
        Span::styled("Task: ", title_style()),
        Span::raw(active),
    ]));

    let mut mode = vec![
        Span::styled("Mode: ", title_style()),
        Span::raw(snapshot.mode.label()),
    ];
    if snapshot.mode.is_timed() {
        mode.push(Span::raw(format!("  ({})", snapshot.phase.name())));
    }
    let acceleration = app.engine.acceleration();
    if !acceleration.is_real_time() {
        mode.push(Span::styled(
            format!("  x{}", acceleration.factor()),
            paused_style(),
        ));
    }
    lines.push(Line::from(mode));

    lines.push(Line::from(vec![
        Span::styled("Run: ", title_style()),
        Span::raw(format!(
            "{:.1} min  {} sessions  {} cycles",
            snapshot.run_minutes, snapshot.temp_session_count, snapshot.temp_cycle_count
        )),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Streak: ", title_style()),
        Span::styled(
            format!(
                "{:.1} (best {:.1})",
                snapshot.current_session_streak, snapshot.longest_session_streak
            ),
            default_style(),
        ),
    ]));

    lines
}

/// Render the countdown / stopwatch pane
pub fn render_timer_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let snapshot = app.engine.snapshot();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(" Timer ", title_style()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    let paragraph = Paragraph::new(timer_lines(app, &snapshot)).alignment(Alignment::Center);
    f.render_widget(paragraph, chunks[0]);

    if snapshot.mode.is_timed() {
        let ratio = phase_progress(snapshot.display_secs, snapshot.phase_total_secs);
        let gauge = Gauge::default()
            .gauge_style(gauge_style())
            .ratio(ratio)
            .label(format!("{:.0}%", ratio * 100.0));
        f.render_widget(gauge, chunks[1]);
    }
}
