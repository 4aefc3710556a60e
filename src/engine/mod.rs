pub mod accrual;
pub mod focus;

pub use accrual::{Acceleration, AccrualClock, RunEntry, TaskTimes};
pub use focus::{EngineConfig, EngineSnapshot, FocusEngine, PhaseEvent};

use thiserror::Error;
use uuid::Uuid;

/// Commands the engine refuses
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("task text cannot be empty")]
    EmptyTaskText,
    #[error("no task with id {0}")]
    UnknownTask(Uuid),
    #[error("no history entry with id {0}")]
    UnknownHistoryEntry(Uuid),
    #[error("the default task cannot be completed or deleted")]
    DefaultTaskLocked,
    #[error("stop the timer before changing mode")]
    TimerBusy,
}
