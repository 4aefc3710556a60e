use super::enums::Mode;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Text given to the fallback task created when a run starts with no tasks
pub const DEFAULT_TASK_TEXT: &str = "Focus";

/// Completed tasks older than this are pruned from the done list
pub const COMPLETED_RETENTION_HOURS: i64 = 24;

/// A task that can accrue focus time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub text: String,
    /// Minutes folded in from finished runs
    #[serde(default)]
    pub accumulated_time: f64,
    /// Fallback bucket created by `start` when no tasks exist
    #[serde(default)]
    pub is_default: bool,
}

impl Task {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            accumulated_time: 0.0,
            is_default: false,
        }
    }

    pub fn new_default() -> Self {
        Self {
            is_default: true,
            ..Self::new(DEFAULT_TASK_TEXT)
        }
    }

    /// Short label for ids that no longer resolve to a task
    pub fn fallback_name(id: &Uuid) -> String {
        let id = id.to_string();
        format!("Task {}", &id[..8])
    }
}

/// A task the user marked as done; shown for a day, then pruned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedTask {
    pub id: Uuid,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl CompletedTask {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.timestamp) > Duration::hours(COMPLETED_RETENTION_HOURS)
    }
}

/// Permanent record of a completed task and the minutes it took
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskHistoryEntry {
    pub id: Uuid,
    pub task: String,
    pub timestamp: DateTime<Utc>,
    /// Minutes
    pub duration: f64,
}

/// One stopped run, as written to the session history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: Uuid,
    /// Names of every task that accrued time, joined with ", "
    pub task: String,
    pub total_minutes: f64,
    pub session_count: u32,
    pub cycle_count: u32,
    pub overall_streak: f64,
    pub timestamp: DateTime<Utc>,
    pub session_type: Mode,
    #[serde(default)]
    pub task_breakdown: BTreeMap<String, f64>,
}

impl HistoryEntry {
    /// Minutes rounded to the nearest whole minute, for display
    pub fn rounded_minutes(&self) -> i64 {
        self.total_minutes.round() as i64
    }
}

/// Format minutes as "Xh Ym" (omits 0 values)
pub fn format_minutes(minutes: f64) -> String {
    let total_minutes = minutes.max(0.0).floor() as i64;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours > 0 && minutes > 0 {
        format!("{}h {}m", hours, minutes)
    } else if hours > 0 {
        format!("{}h", hours)
    } else {
        format!("{}m", minutes)
    }
}
