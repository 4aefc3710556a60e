pub mod document;
pub mod enums;
pub mod task;
pub mod views;

pub use document::{clamp_daily_goal, Document, ExportDocument, PartialDocument, DOCUMENT_VERSION};
pub use enums::{Mode, Phase, TimerStatus, UiMode};
pub use task::{
    format_minutes, CompletedTask, HistoryEntry, Task, TaskHistoryEntry, DEFAULT_TASK_TEXT,
};
pub use views::{format_clock, phase_progress, status_badge, task_rows, TaskRow};
