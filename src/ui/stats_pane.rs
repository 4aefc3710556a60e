use crate::app::AppState;
use crate::domain::format_minutes;
use crate::report::stats::DayTotal;
use crate::ui::styles::{bar_style, border_style, gauge_style, title_style};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{BarChart, Block, Borders, Gauge, Paragraph},
    Frame,
};

/// Weekday label and whole minutes for each chart bar
fn chart_bars(days: &[DayTotal]) -> Vec<(String, u64)> {
    days.iter()
        .map(|d| {
            (
                d.date.format("%a").to_string(),
                d.minutes.max(0.0).round() as u64,
            )
        })
        .collect()
}

/// Render daily goal progress and the last week's focus chart
pub fn render_stats_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(" Focus ", title_style()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Goal text
            Constraint::Length(1), // Goal gauge
            Constraint::Length(1), // Spacer
            Constraint::Min(0),    // Chart
        ])
        .split(inner);

    let today = app.today_minutes();
    let goal = app.engine.daily_goal();
    let progress = app.goal_progress();

    let goal_line = Line::from(vec![
        Span::styled("Today: ", title_style()),
        Span::raw(format!(
            "{} / {} goal",
            format_minutes(today),
            format_minutes(goal as f64)
        )),
    ]);
    f.render_widget(Paragraph::new(goal_line), chunks[0]);

    let gauge = Gauge::default()
        .gauge_style(gauge_style())
        .ratio(progress)
        .label(format!("{:.0}%", progress * 100.0));
    f.render_widget(gauge, chunks[1]);

    let bars = chart_bars(&app.recent_days());
    let data: Vec<(&str, u64)> = bars.iter().map(|(label, v)| (label.as_str(), *v)).collect();
    let chart = BarChart::default()
        .data(data.as_slice())
        .bar_width(4)
        .bar_gap(1)
        .bar_style(bar_style())
        .value_style(gauge_style());
    f.render_widget(chart, chunks[3]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_chart_bars() {
        let days = vec![
            DayTotal {
                date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
                minutes: 42.6,
            },
            DayTotal {
                date: NaiveDate::from_ymd_opt(2024, 6, 11).unwrap(),
                minutes: 0.0,
            },
        ];
        assert_eq!(
            chart_bars(&days),
            vec![("Mon".to_string(), 43), ("Tue".to_string(), 0)]
        );
    }
}
