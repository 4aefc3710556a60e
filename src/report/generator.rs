use crate::domain::{format_minutes, Document};
use crate::report::stats::{
    active_day_streak, daily_totals, goal_progress, history_stats, minutes_on, task_totals,
    MAX_REPORT_DAYS,
};
use chrono::{NaiveDate, TimeZone};

/// Format percentage with 1 decimal place
fn format_percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

/// Text bar scaled against the largest day
fn bar(minutes: f64, max: f64, width: usize) -> String {
    if max <= 0.0 {
        return String::new();
    }
    let filled = ((minutes / max) * width as f64).round() as usize;
    "█".repeat(filled.min(width))
}

/// Build a markdown summary of the last `days` days ending on `today`
pub fn generate_report<Tz: TimeZone>(
    document: &Document,
    today: NaiveDate,
    days: u32,
    tz: &Tz,
) -> String {
    let days = days.clamp(1, MAX_REPORT_DAYS);
    let history = &document.time_history;
    let today_minutes = minutes_on(history, today, tz);
    let totals = daily_totals(history, days, today, tz);
    let window_start = totals.first().map(|d| d.date).unwrap_or(today);

    let window: Vec<_> = history
        .iter()
        .filter(|e| e.timestamp.with_timezone(tz).date_naive() >= window_start)
        .cloned()
        .collect();
    let stats = history_stats(&window);

    let mut report = String::new();

    report.push_str(&format!("# Focus Report - {}\n\n", today));

    // Today
    report.push_str("## Today\n\n");
    report.push_str(&format!(
        "- **Focus Time:** {} / {} goal ({})\n",
        format_minutes(today_minutes),
        format_minutes(document.daily_goal as f64),
        format_percent(goal_progress(today_minutes, document.daily_goal))
    ));
    report.push_str(&format!(
        "- **Active Days in a Row:** {}\n\n",
        active_day_streak(history, today, tz)
    ));

    // Window summary
    report.push_str(&format!("## Last {} Days\n\n", totals.len()));
    report.push_str(&format!("- **Runs:** {}\n", stats.runs));
    report.push_str(&format!(
        "- **Total Focus:** {}\n",
        format_minutes(stats.total_minutes)
    ));
    report.push_str(&format!(
        "- **Average Run:** {}\n",
        format_minutes(stats.avg_run_minutes)
    ));
    report.push_str(&format!("- **Sessions:** {}\n", stats.sessions));
    report.push_str(&format!("- **Cycles:** {}\n", stats.cycles));
    report.push_str(&format!(
        "- **Best Run Streak:** {:.1}\n",
        stats.best_run_streak
    ));
    report.push_str(&format!(
        "- **Longest Streak Ever:** {:.1}\n\n",
        document.longest_session_streak
    ));

    // Daily breakdown
    report.push_str("## Daily Breakdown\n\n");
    let max = totals.iter().map(|d| d.minutes).fold(0.0, f64::max);
    for day in &totals {
        report.push_str(&format!(
            "- {} `{:<20}` {}\n",
            day.date.format("%a %m-%d"),
            bar(day.minutes, max, 20),
            format_minutes(day.minutes)
        ));
    }
    report.push('\n');

    // Tasks
    let tasks = task_totals(&window);
    if !tasks.is_empty() {
        report.push_str("## Time by Task\n\n");
        for (name, minutes) in &tasks {
            report.push_str(&format!("- **{}:** {}\n", name, format_minutes(*minutes)));
        }
        report.push('\n');
    }

    let completed: Vec<_> = document
        .task_history
        .iter()
        .filter(|t| t.timestamp.with_timezone(tz).date_naive() >= window_start)
        .collect();
    if !completed.is_empty() {
        report.push_str("## Completed Tasks\n\n");
        for entry in completed {
            report.push_str(&format!(
                "- {} ({}) on {}\n",
                entry.task,
                format_minutes(entry.duration),
                entry.timestamp.with_timezone(tz).date_naive()
            ));
        }
        report.push('\n');
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HistoryEntry, Mode, TaskHistoryEntry};
    use chrono::Utc;
    use uuid::Uuid;

    fn document() -> Document {
        let at = Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap();
        let mut doc = Document::default();
        doc.daily_goal = 60;
        doc.longest_session_streak = 2.0;
        doc.time_history.push(HistoryEntry {
            id: Uuid::new_v4(),
            task: "Write, Read".to_string(),
            total_minutes: 30.0,
            session_count: 1,
            cycle_count: 1,
            overall_streak: 0.5,
            timestamp: at,
            session_type: Mode::Classic,
            task_breakdown: [("Write".to_string(), 20.0), ("Read".to_string(), 10.0)]
                .into_iter()
                .collect(),
        });
        doc.task_history.push(TaskHistoryEntry {
            id: Uuid::new_v4(),
            task: "Write".to_string(),
            timestamp: at,
            duration: 20.0,
        });
        doc
    }

    #[test]
    fn test_report_sections() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let report = generate_report(&document(), today, 7, &Utc);

        assert!(report.starts_with("# Focus Report - 2024-06-10"));
        assert!(report.contains("30m / 1h goal (50.0%)"));
        assert!(report.contains("## Last 7 Days"));
        assert!(report.contains("- **Sessions:** 1"));
        assert!(report.contains("- **Longest Streak Ever:** 2.0"));
        assert!(report.contains("- **Write:** 20m"));
        assert!(report.contains("## Completed Tasks"));
    }

    #[test]
    fn test_report_outside_window_is_empty() {
        let today = NaiveDate::from_ymd_opt(2024, 7, 10).unwrap();
        let report = generate_report(&document(), today, 7, &Utc);

        assert!(report.contains("- **Runs:** 0"));
        assert!(!report.contains("## Time by Task"));
        assert!(!report.contains("## Completed Tasks"));
    }
}
