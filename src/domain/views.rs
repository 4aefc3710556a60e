use super::enums::{Phase, TimerStatus};
use super::task::Task;
use uuid::Uuid;

/// A task prepared for rendering in the task list
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRow {
    /// Index in the task list
    pub index: usize,
    pub id: Uuid,
    pub text: String,
    pub is_active: bool,
    pub is_default: bool,
    /// Accumulated minutes plus what the current run has added so far
    pub total_minutes: f64,
    pub run_minutes: f64,
}

/// Build display rows; `run_minutes` looks up the current run's minutes per task
pub fn task_rows<F>(tasks: &[Task], active: Option<Uuid>, run_minutes: F) -> Vec<TaskRow>
where
    F: Fn(&Uuid) -> f64,
{
    tasks
        .iter()
        .enumerate()
        .map(|(index, task)| {
            let run = run_minutes(&task.id);
            TaskRow {
                index,
                id: task.id,
                text: task.text.clone(),
                is_active: active == Some(task.id),
                is_default: task.is_default,
                total_minutes: task.accumulated_time + run,
                run_minutes: run,
            }
        })
        .collect()
}

/// Format seconds as "MM:SS", or "H:MM:SS" past an hour
pub fn format_clock(secs: i64) -> String {
    let secs = secs.max(0);
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{:02}:{:02}", m, s)
    }
}

/// Fraction of the current phase already elapsed (0.0 to 1.0)
pub fn phase_progress(remaining_secs: i64, total_secs: i64) -> f64 {
    if total_secs <= 0 {
        return 0.0;
    }
    let elapsed = (total_secs - remaining_secs.clamp(0, total_secs)) as f64;
    elapsed / total_secs as f64
}

/// Get status badge text
pub fn status_badge(status: TimerStatus, phase: Phase) -> &'static str {
    match (status, phase) {
        (TimerStatus::Running, Phase::Work) => "⏱ FOCUS",
        (TimerStatus::Running, Phase::Break) => "☕ BREAK",
        (TimerStatus::Paused, _) => "⏸ PAUSED",
        (TimerStatus::Idle, _) => "🌿 IDLE",
    }
}
