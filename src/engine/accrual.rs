use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Multiplier applied to wall-clock deltas (1.0 = real time)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Acceleration(f64);

impl Acceleration {
    pub const REAL_TIME: Acceleration = Acceleration(1.0);

    /// Largest accepted factor: one simulated hour per wall second
    pub const MAX_FACTOR: f64 = 3600.0;

    /// Non-finite or non-positive factors fall back to real time;
    /// factors above [`Acceleration::MAX_FACTOR`] are capped
    pub fn new(factor: f64) -> Self {
        if factor.is_finite() && factor > Self::MAX_FACTOR {
            tracing::warn!(factor, max = Self::MAX_FACTOR, "capping acceleration factor");
            Self(Self::MAX_FACTOR)
        } else if factor.is_finite() && factor > 0.0 {
            Self(factor)
        } else {
            tracing::warn!(factor, "ignoring invalid acceleration factor");
            Self::REAL_TIME
        }
    }

    pub fn factor(&self) -> f64 {
        self.0
    }

    pub fn is_real_time(&self) -> bool {
        self.0 == 1.0
    }
}

impl Default for Acceleration {
    fn default() -> Self {
        Self::REAL_TIME
    }
}

/// Converts wall-clock instants into simulated elapsed seconds.
///
/// The baseline is the instant up to which time has already been handed out.
/// Every conversion goes through [`AccrualClock::advance`], which is the only
/// place the acceleration factor is applied.
#[derive(Debug, Clone)]
pub struct AccrualClock {
    acceleration: Acceleration,
    baseline: Option<DateTime<Utc>>,
}

impl AccrualClock {
    pub fn new(acceleration: Acceleration) -> Self {
        Self {
            acceleration,
            baseline: None,
        }
    }

    pub fn acceleration(&self) -> Acceleration {
        self.acceleration
    }

    /// Restart measuring from `now` without handing out any time
    pub fn rebase(&mut self, now: DateTime<Utc>) {
        self.baseline = Some(now);
    }

    /// Stop measuring (paused or stopped)
    pub fn clear(&mut self) {
        self.baseline = None;
    }

    /// Simulated seconds elapsed since the baseline; moves the baseline to `now`.
    ///
    /// Without a baseline this only establishes one and returns zero. A clock
    /// that jumped backwards yields zero and rebases at the new instant.
    pub fn advance(&mut self, now: DateTime<Utc>) -> f64 {
        let Some(baseline) = self.baseline.replace(now) else {
            return 0.0;
        };
        let wall_ms = now.signed_duration_since(baseline).num_milliseconds().max(0);
        wall_ms as f64 / 1000.0 * self.acceleration.factor()
    }
}

/// Minutes one task accrued during the current run
#[derive(Debug, Clone, PartialEq)]
pub struct RunEntry {
    pub task_id: Uuid,
    /// Task text as of the latest accrual
    pub name: String,
    pub minutes: f64,
}

/// Per-run minutes keyed by task id, kept in first-accrual order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskTimes {
    entries: Vec<RunEntry>,
}

impl TaskTimes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add minutes to a task's bucket and refresh its name snapshot
    pub fn add(&mut self, task_id: Uuid, name: &str, minutes: f64) {
        match self.entries.iter_mut().find(|e| e.task_id == task_id) {
            Some(entry) => {
                entry.minutes += minutes;
                if entry.name != name {
                    entry.name = name.to_string();
                }
            }
            None => self.entries.push(RunEntry {
                task_id,
                name: name.to_string(),
                minutes,
            }),
        }
    }

    pub fn minutes(&self, task_id: &Uuid) -> f64 {
        self.entries
            .iter()
            .find(|e| e.task_id == *task_id)
            .map(|e| e.minutes)
            .unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.minutes).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RunEntry> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
