use crate::domain::HistoryEntry;
use chrono::{Duration, NaiveDate, TimeZone};
use std::collections::BTreeMap;

/// Longest window `daily_totals` will cover, about ten years
pub const MAX_REPORT_DAYS: u32 = 3660;

/// Focus minutes recorded on one calendar day
#[derive(Debug, Clone, PartialEq)]
pub struct DayTotal {
    pub date: NaiveDate,
    pub minutes: f64,
}

/// Totals across a whole history
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HistoryStats {
    pub runs: usize,
    pub total_minutes: f64,
    pub sessions: u32,
    pub cycles: u32,
    pub best_run_streak: f64,
    pub avg_run_minutes: f64,
}

/// Calendar day of an entry in the given time zone
fn entry_day<Tz: TimeZone>(entry: &HistoryEntry, tz: &Tz) -> NaiveDate {
    entry.timestamp.with_timezone(tz).date_naive()
}

/// Minutes recorded on `day`
pub fn minutes_on<Tz: TimeZone>(history: &[HistoryEntry], day: NaiveDate, tz: &Tz) -> f64 {
    history
        .iter()
        .filter(|e| entry_day(e, tz) == day)
        .map(|e| e.total_minutes)
        .sum()
}

/// Fraction of the daily goal reached, capped at 1.0
pub fn goal_progress(minutes: f64, daily_goal: u32) -> f64 {
    if daily_goal == 0 {
        return 0.0;
    }
    (minutes / daily_goal as f64).clamp(0.0, 1.0)
}

/// Per-day totals for the `days` days ending on `today`, oldest first.
/// Days without runs are included with zero minutes. The window is capped at
/// [`MAX_REPORT_DAYS`] and stops at the earliest representable date.
pub fn daily_totals<Tz: TimeZone>(
    history: &[HistoryEntry],
    days: u32,
    today: NaiveDate,
    tz: &Tz,
) -> Vec<DayTotal> {
    let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for entry in history {
        *by_day.entry(entry_day(entry, tz)).or_default() += entry.total_minutes;
    }

    let mut totals: Vec<DayTotal> = (0..days.min(MAX_REPORT_DAYS))
        .map_while(|offset| today.checked_sub_signed(Duration::days(i64::from(offset))))
        .map(|date| DayTotal {
            date,
            minutes: by_day.get(&date).copied().unwrap_or(0.0),
        })
        .collect();
    totals.reverse();
    totals
}

/// Minutes per task name summed over every breakdown, largest first
pub fn task_totals(history: &[HistoryEntry]) -> Vec<(String, f64)> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for entry in history {
        for (name, minutes) in &entry.task_breakdown {
            *totals.entry(name.as_str()).or_default() += minutes;
        }
    }

    let mut sorted: Vec<(String, f64)> = totals
        .into_iter()
        .map(|(name, minutes)| (name.to_string(), minutes))
        .collect();
    sorted.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted
}

/// Aggregate counters over the history
pub fn history_stats(history: &[HistoryEntry]) -> HistoryStats {
    if history.is_empty() {
        return HistoryStats::default();
    }

    let total_minutes: f64 = history.iter().map(|e| e.total_minutes).sum();
    HistoryStats {
        runs: history.len(),
        total_minutes,
        sessions: history.iter().map(|e| e.session_count).sum(),
        cycles: history.iter().map(|e| e.cycle_count).sum(),
        best_run_streak: history
            .iter()
            .map(|e| e.overall_streak)
            .fold(0.0, f64::max),
        avg_run_minutes: total_minutes / history.len() as f64,
    }
}

/// Consecutive days, ending today or yesterday, with at least one recorded run
pub fn active_day_streak<Tz: TimeZone>(
    history: &[HistoryEntry],
    today: NaiveDate,
    tz: &Tz,
) -> u32 {
    let days: std::collections::BTreeSet<NaiveDate> =
        history.iter().map(|e| entry_day(e, tz)).collect();

    let mut cursor = if days.contains(&today) {
        today
    } else {
        today - Duration::days(1)
    };
    let mut streak = 0;
    while days.contains(&cursor) {
        streak += 1;
        cursor -= Duration::days(1);
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Mode;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn entry(day: u32, hour: u32, minutes: f64, breakdown: &[(&str, f64)]) -> HistoryEntry {
        HistoryEntry {
            id: Uuid::new_v4(),
            task: breakdown
                .iter()
                .map(|(n, _)| *n)
                .collect::<Vec<_>>()
                .join(", "),
            total_minutes: minutes,
            session_count: (minutes / 25.0) as u32,
            cycle_count: 0,
            overall_streak: (minutes / 25.0).floor() * 0.5,
            timestamp: Utc.with_ymd_and_hms(2024, 6, day, hour, 0, 0).unwrap(),
            session_type: Mode::Classic,
            task_breakdown: breakdown
                .iter()
                .map(|(n, m)| (n.to_string(), *m))
                .collect(),
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn test_minutes_on_and_goal() {
        let history = vec![
            entry(10, 9, 30.0, &[("A", 30.0)]),
            entry(10, 15, 45.0, &[("B", 45.0)]),
            entry(9, 9, 20.0, &[("A", 20.0)]),
        ];
        let today = minutes_on(&history, day(10), &Utc);
        assert_eq!(today, 75.0);
        assert_eq!(goal_progress(today, 150), 0.5);
        assert_eq!(goal_progress(300.0, 120), 1.0);
        assert_eq!(goal_progress(10.0, 0), 0.0);
    }

    #[test]
    fn test_daily_totals_fill_gaps() {
        let history = vec![
            entry(10, 9, 30.0, &[("A", 30.0)]),
            entry(8, 9, 20.0, &[("A", 20.0)]),
            entry(1, 9, 99.0, &[("A", 99.0)]),
        ];
        let totals = daily_totals(&history, 3, day(10), &Utc);
        assert_eq!(
            totals,
            vec![
                DayTotal { date: day(8), minutes: 20.0 },
                DayTotal { date: day(9), minutes: 0.0 },
                DayTotal { date: day(10), minutes: 30.0 },
            ]
        );
    }

    #[test]
    fn test_daily_totals_window_is_bounded() {
        let totals = daily_totals(&[], 200_000_000, day(10), &Utc);
        assert_eq!(totals.len(), MAX_REPORT_DAYS as usize);
        assert_eq!(totals.last().map(|d| d.date), Some(day(10)));

        let near_min = NaiveDate::MIN + Duration::days(2);
        let totals = daily_totals(&[], 10, near_min, &Utc);
        let dates: Vec<NaiveDate> = totals.iter().map(|d| d.date).collect();
        assert_eq!(
            dates,
            vec![NaiveDate::MIN, NaiveDate::MIN + Duration::days(1), near_min]
        );
    }

    #[test]
    fn test_task_totals_sorted_by_minutes() {
        let history = vec![
            entry(10, 9, 15.0, &[("A", 10.0), ("B", 5.0)]),
            entry(10, 11, 20.0, &[("B", 20.0)]),
        ];
        assert_eq!(
            task_totals(&history),
            vec![("B".to_string(), 25.0), ("A".to_string(), 10.0)]
        );
    }

    #[test]
    fn test_history_stats() {
        let history = vec![
            entry(10, 9, 50.0, &[("A", 50.0)]),
            entry(10, 11, 25.0, &[("B", 25.0)]),
        ];
        let stats = history_stats(&history);
        assert_eq!(stats.runs, 2);
        assert_eq!(stats.total_minutes, 75.0);
        assert_eq!(stats.sessions, 3);
        assert_eq!(stats.best_run_streak, 1.0);
        assert_eq!(stats.avg_run_minutes, 37.5);

        assert_eq!(history_stats(&[]), HistoryStats::default());
    }

    #[test]
    fn test_active_day_streak() {
        let history = vec![
            entry(7, 9, 10.0, &[("A", 10.0)]),
            entry(8, 9, 10.0, &[("A", 10.0)]),
            entry(9, 9, 10.0, &[("A", 10.0)]),
        ];
        // Nothing yet today, streak still counts through yesterday
        assert_eq!(active_day_streak(&history, day(10), &Utc), 3);
        assert_eq!(active_day_streak(&history, day(9), &Utc), 3);
        assert_eq!(active_day_streak(&history, day(12), &Utc), 0);
    }
}
