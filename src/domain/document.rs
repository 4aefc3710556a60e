use super::task::{CompletedTask, HistoryEntry, Task, TaskHistoryEntry};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DOCUMENT_VERSION: &str = "1.0";
pub const DEFAULT_DAILY_GOAL: u32 = 120;
pub const MAX_DAILY_GOAL: u32 = 24 * 60;

/// Keep a daily goal within 1..=1440 minutes
pub fn clamp_daily_goal(minutes: u32) -> u32 {
    minutes.clamp(1, MAX_DAILY_GOAL)
}

fn default_daily_goal() -> u32 {
    DEFAULT_DAILY_GOAL
}

fn default_version() -> String {
    DOCUMENT_VERSION.to_string()
}

/// Everything that survives a restart, stored as one JSON file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Focus goal in minutes per day
    #[serde(default = "default_daily_goal")]
    pub daily_goal: u32,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub completed_tasks: Vec<CompletedTask>,
    #[serde(default)]
    pub time_history: Vec<HistoryEntry>,
    #[serde(default)]
    pub task_history: Vec<TaskHistoryEntry>,
    #[serde(default)]
    pub current_session_streak: f64,
    #[serde(default)]
    pub longest_session_streak: f64,
    #[serde(default)]
    pub last_session_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_saved: Option<DateTime<Utc>>,
    #[serde(default = "default_version")]
    pub version: String,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            daily_goal: DEFAULT_DAILY_GOAL,
            tasks: Vec::new(),
            completed_tasks: Vec::new(),
            time_history: Vec::new(),
            task_history: Vec::new(),
            current_session_streak: 0.0,
            longest_session_streak: 0.0,
            last_session_date: None,
            last_saved: None,
            version: default_version(),
        }
    }
}

/// Export file: the document plus the moment it was exported
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument<'a> {
    #[serde(flatten)]
    pub document: &'a Document,
    pub export_date: DateTime<Utc>,
}

/// An imported document where every field is optional.
///
/// Fields missing from the file keep their current values.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialDocument {
    pub daily_goal: Option<u32>,
    pub tasks: Option<Vec<Task>>,
    pub completed_tasks: Option<Vec<CompletedTask>>,
    pub time_history: Option<Vec<HistoryEntry>>,
    pub task_history: Option<Vec<TaskHistoryEntry>>,
    pub current_session_streak: Option<f64>,
    pub longest_session_streak: Option<f64>,
    pub last_session_date: Option<DateTime<Utc>>,
}

impl PartialDocument {
    /// Overlay the present fields onto `base`
    pub fn apply_to(self, mut base: Document) -> Document {
        if let Some(goal) = self.daily_goal {
            base.daily_goal = clamp_daily_goal(goal);
        }
        if let Some(tasks) = self.tasks {
            base.tasks = tasks;
        }
        if let Some(completed) = self.completed_tasks {
            base.completed_tasks = completed;
        }
        if let Some(history) = self.time_history {
            base.time_history = history;
        }
        if let Some(history) = self.task_history {
            base.task_history = history;
        }
        if let Some(streak) = self.current_session_streak {
            base.current_session_streak = streak;
        }
        if let Some(streak) = self.longest_session_streak {
            base.longest_session_streak = streak;
        }
        if self.last_session_date.is_some() {
            base.last_session_date = self.last_session_date;
        }
        base
    }

    /// True when the file carried none of the known fields
    pub fn is_empty(&self) -> bool {
        self.daily_goal.is_none()
            && self.tasks.is_none()
            && self.completed_tasks.is_none()
            && self.time_history.is_none()
            && self.task_history.is_none()
            && self.current_session_streak.is_none()
            && self.longest_session_streak.is_none()
            && self.last_session_date.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_deserializes_to_defaults() {
        let doc: Document = serde_json::from_str("{}").unwrap();
        assert_eq!(doc, Document::default());
        assert_eq!(doc.version, "1.0");
        assert_eq!(doc.daily_goal, DEFAULT_DAILY_GOAL);
    }

    #[test]
    fn test_export_document_flattens_fields() {
        let doc = Document::default();
        let export = ExportDocument {
            document: &doc,
            export_date: Utc::now(),
        };
        let json = serde_json::to_value(&export).unwrap();
        assert!(json.get("exportDate").is_some());
        assert!(json.get("dailyGoal").is_some());
        assert!(json.get("timeHistory").is_some());
        assert_eq!(json["version"], "1.0");
    }

    #[test]
    fn test_partial_document_keeps_missing_fields() {
        let mut base = Document::default();
        base.daily_goal = 90;
        base.tasks.push(Task::new("Keep me"));

        let partial: PartialDocument =
            serde_json::from_str(r#"{"longestSessionStreak": 3.5}"#).unwrap();
        let merged = partial.apply_to(base);

        assert_eq!(merged.daily_goal, 90);
        assert_eq!(merged.tasks.len(), 1);
        assert_eq!(merged.longest_session_streak, 3.5);
    }

    #[test]
    fn test_partial_document_clamps_daily_goal() {
        let partial: PartialDocument = serde_json::from_str(r#"{"dailyGoal": 0}"#).unwrap();
        assert_eq!(partial.apply_to(Document::default()).daily_goal, 1);

        let partial: PartialDocument = serde_json::from_str(r#"{"dailyGoal": 5000}"#).unwrap();
        assert_eq!(partial.apply_to(Document::default()).daily_goal, MAX_DAILY_GOAL);
    }
}
