use super::accrual::{Acceleration, AccrualClock, TaskTimes};
use super::EngineError;
use crate::domain::{
    clamp_daily_goal, CompletedTask, Document, HistoryEntry, Mode, Phase, Task, TaskHistoryEntry,
    TimerStatus, DOCUMENT_VERSION,
};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Engine settings fixed for the lifetime of the process
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineConfig {
    pub acceleration: Acceleration,
}

/// Phase transitions the notifier reacts to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhaseEvent {
    WorkComplete { sessions: u32, streak: f64 },
    BreakComplete { cycles: u32 },
}

/// Read-only view of the engine handed to the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSnapshot {
    pub status: TimerStatus,
    pub mode: Mode,
    pub phase: Phase,
    /// Seconds left in the phase (timed modes) or elapsed (stopwatch)
    pub display_secs: i64,
    /// Length of the current phase in seconds (0 for stopwatch)
    pub phase_total_secs: i64,
    pub active_task_id: Option<Uuid>,
    pub run_minutes: f64,
    pub temp_session_count: u32,
    pub temp_cycle_count: u32,
    pub temp_overall_streak: f64,
    pub current_session_streak: f64,
    pub longest_session_streak: f64,
    pub daily_goal: u32,
}

/// Owns all timer, task, and history state.
///
/// Every command takes the wall-clock instant it happens at, so the
/// accounting is deterministic under test.
pub struct FocusEngine {
    // Persisted
    daily_goal: u32,
    tasks: Vec<Task>,
    completed_tasks: Vec<CompletedTask>,
    time_history: Vec<HistoryEntry>,
    task_history: Vec<TaskHistoryEntry>,
    current_session_streak: f64,
    longest_session_streak: f64,
    last_session_date: Option<DateTime<Utc>>,

    // Current run
    mode: Mode,
    status: TimerStatus,
    phase: Phase,
    remaining_secs: f64,
    stopwatch_secs: f64,
    active_task_id: Option<Uuid>,
    run_times: TaskTimes,
    clock: AccrualClock,
    temp_session_count: u32,
    temp_cycle_count: u32,
    temp_overall_streak: f64,
    pending_events: Vec<PhaseEvent>,
}

impl FocusEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self::from_document(Document::default(), config, Utc::now())
    }

    /// Build an engine from persisted data; run state starts idle
    pub fn from_document(document: Document, config: EngineConfig, now: DateTime<Utc>) -> Self {
        let mode = Mode::default();
        let mut engine = Self {
            daily_goal: clamp_daily_goal(document.daily_goal),
            tasks: document.tasks,
            completed_tasks: document.completed_tasks,
            time_history: document.time_history,
            task_history: document.task_history,
            current_session_streak: document.current_session_streak,
            longest_session_streak: document.longest_session_streak,
            last_session_date: document.last_session_date,
            mode,
            status: TimerStatus::Idle,
            phase: Phase::Work,
            remaining_secs: mode.phase_secs(Phase::Work) as f64,
            stopwatch_secs: 0.0,
            active_task_id: None,
            run_times: TaskTimes::new(),
            clock: AccrualClock::new(config.acceleration),
            temp_session_count: 0,
            temp_cycle_count: 0,
            temp_overall_streak: 0.0,
            pending_events: Vec::new(),
        };
        engine.prune_completed(now);
        engine
    }

    /// Persistable copy of the current data
    pub fn to_document(&self, now: DateTime<Utc>) -> Document {
        Document {
            daily_goal: self.daily_goal,
            tasks: self.tasks.clone(),
            completed_tasks: self.completed_tasks.clone(),
            time_history: self.time_history.clone(),
            task_history: self.task_history.clone(),
            current_session_streak: self.current_session_streak,
            longest_session_streak: self.longest_session_streak,
            last_session_date: self.last_session_date,
            last_saved: Some(now),
            version: DOCUMENT_VERSION.to_string(),
        }
    }

    /// Replace all persisted data (import); any run in progress is discarded
    pub fn replace_document(&mut self, document: Document, now: DateTime<Utc>) {
        let config = EngineConfig {
            acceleration: self.clock.acceleration(),
        };
        let mode = self.mode;
        *self = Self::from_document(document, config, now);
        self.mode = mode;
        self.reset_run();
    }

    // ----- Read access -----

    pub fn snapshot(&self) -> EngineSnapshot {
        let display_secs = if self.mode.is_timed() {
            self.remaining_secs.max(0.0).ceil() as i64
        } else {
            self.stopwatch_secs.floor() as i64
        };
        EngineSnapshot {
            status: self.status,
            mode: self.mode,
            phase: self.phase,
            display_secs,
            phase_total_secs: self.mode.phase_secs(self.phase),
            active_task_id: self.active_task_id,
            run_minutes: self.run_times.total(),
            temp_session_count: self.temp_session_count,
            temp_cycle_count: self.temp_cycle_count,
            temp_overall_streak: self.temp_overall_streak,
            current_session_streak: self.current_session_streak,
            longest_session_streak: self.longest_session_streak,
            daily_goal: self.daily_goal,
        }
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: &Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == *id)
    }

    pub fn active_task_id(&self) -> Option<Uuid> {
        self.active_task_id
    }

    pub fn run_times(&self) -> &TaskTimes {
        &self.run_times
    }

    pub fn completed_tasks(&self) -> &[CompletedTask] {
        &self.completed_tasks
    }

    pub fn time_history(&self) -> &[HistoryEntry] {
        &self.time_history
    }

    pub fn task_history(&self) -> &[TaskHistoryEntry] {
        &self.task_history
    }

    pub fn daily_goal(&self) -> u32 {
        self.daily_goal
    }

    pub fn last_session_date(&self) -> Option<DateTime<Utc>> {
        self.last_session_date
    }

    pub fn acceleration(&self) -> Acceleration {
        self.clock.acceleration()
    }

    /// Drain phase transitions produced since the last call
    pub fn take_events(&mut self) -> Vec<PhaseEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ----- Timer commands -----

    /// Start a run from idle, or resume a paused one
    pub fn start(&mut self, now: DateTime<Utc>) {
        match self.status {
            TimerStatus::Running => return,
            TimerStatus::Paused => {
                tracing::debug!("resuming run");
            }
            TimerStatus::Idle => {
                if self.tasks.is_empty() {
                    let task = Task::new_default();
                    tracing::info!(id = %task.id, "no tasks, created default task");
                    self.active_task_id = Some(task.id);
                    self.tasks.push(task);
                } else if self.active_task().is_none() {
                    self.active_task_id = self.tasks.first().map(|t| t.id);
                }
                self.phase = Phase::Work;
                self.remaining_secs = self.mode.phase_secs(Phase::Work) as f64;
                self.stopwatch_secs = 0.0;
                tracing::info!(mode = self.mode.label(), "run started");
            }
        }
        self.status = TimerStatus::Running;
        self.clock.rebase(now);
    }

    /// Flush pending time and stop ticking; the active task stays selected
    pub fn pause(&mut self, now: DateTime<Utc>) {
        if self.status != TimerStatus::Running {
            return;
        }
        self.advance(now);
        self.clock.clear();
        self.status = TimerStatus::Paused;
        tracing::debug!(run_minutes = self.run_times.total(), "run paused");
    }

    /// Advance the run to `now`; returns phase transitions that happened
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<PhaseEvent> {
        if self.status == TimerStatus::Running {
            self.advance(now);
        }
        self.take_events()
    }

    /// End the run, fold per-run minutes into tasks, and record history.
    ///
    /// Returns the history entry written, if the run was worth recording.
    /// A no-op while idle.
    pub fn stop(&mut self, now: DateTime<Utc>) -> Option<HistoryEntry> {
        if self.status == TimerStatus::Idle {
            return None;
        }
        if self.status == TimerStatus::Running {
            self.advance(now);
        }

        for entry in self.run_times.iter() {
            if let Some(task) = self.tasks.iter_mut().find(|t| t.id == entry.task_id) {
                task.accumulated_time += entry.minutes;
            }
        }

        let total_minutes = self.run_times.total();
        let has_counters = self.temp_session_count > 0
            || self.temp_cycle_count > 0
            || self.temp_overall_streak > 0.0;
        let record = total_minutes >= 1.0 || (self.mode.is_timed() && has_counters);

        let entry = if record {
            let entry = self.build_history_entry(total_minutes, now);
            tracing::info!(
                total_minutes,
                sessions = entry.session_count,
                cycles = entry.cycle_count,
                "run recorded"
            );
            self.time_history.push(entry.clone());
            self.last_session_date = Some(now);
            Some(entry)
        } else {
            tracing::debug!(total_minutes, "run too short to record");
            None
        };

        self.tasks
            .retain(|t| !(t.is_default && t.accumulated_time <= 0.0));
        self.reset_run();
        self.current_session_streak = 0.0;
        entry
    }

    /// Change the timer mode; only allowed while idle
    pub fn set_mode(&mut self, mode: Mode) -> Result<(), EngineError> {
        if self.status != TimerStatus::Idle {
            return Err(EngineError::TimerBusy);
        }
        self.mode = mode;
        self.phase = Phase::Work;
        self.remaining_secs = mode.phase_secs(Phase::Work) as f64;
        self.stopwatch_secs = 0.0;
        Ok(())
    }

    pub fn set_daily_goal(&mut self, minutes: u32) {
        self.daily_goal = clamp_daily_goal(minutes);
    }

    // ----- Task commands -----

    /// Add a task; while running it becomes the active task
    pub fn add_task(&mut self, text: &str, now: DateTime<Utc>) -> Result<Uuid, EngineError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(EngineError::EmptyTaskText);
        }
        let task = Task::new(text);
        let id = task.id;

        // Default tasks always sort last
        let position = self
            .tasks
            .iter()
            .position(|t| t.is_default)
            .unwrap_or(self.tasks.len());
        self.tasks.insert(position, task);

        if self.status == TimerStatus::Running {
            self.switch_active(Some(id), now);
        }
        Ok(id)
    }

    /// Select the task that accrues time from now on
    pub fn set_active_task(&mut self, id: Uuid, now: DateTime<Utc>) -> Result<(), EngineError> {
        if self.task(&id).is_none() {
            return Err(EngineError::UnknownTask(id));
        }
        if self.active_task_id != Some(id) {
            self.switch_active(Some(id), now);
        }
        Ok(())
    }

    /// Mark a task done and record how long it took
    pub fn complete_task(
        &mut self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<TaskHistoryEntry, EngineError> {
        let task = self.remove_task(id, now)?;

        let mut duration = task.accumulated_time + self.run_times.minutes(&id);
        if duration <= 0.0 {
            duration = self.estimated_phase_minutes();
        }

        self.completed_tasks.push(CompletedTask {
            id: task.id,
            text: task.text.clone(),
            timestamp: now,
        });
        let record = TaskHistoryEntry {
            id: Uuid::new_v4(),
            task: task.text,
            timestamp: now,
            duration,
        };
        self.task_history.push(record.clone());
        self.prune_completed(now);

        tracing::info!(task = %record.task, duration, "task completed");
        Ok(record)
    }

    /// Remove a task without recording it
    pub fn delete_task(&mut self, id: Uuid, now: DateTime<Utc>) -> Result<Task, EngineError> {
        let task = self.remove_task(id, now)?;
        tracing::info!(task = %task.text, "task deleted");
        Ok(task)
    }

    // ----- History commands -----

    pub fn delete_history_entry(&mut self, id: Uuid) -> Result<HistoryEntry, EngineError> {
        let index = self
            .time_history
            .iter()
            .position(|e| e.id == id)
            .ok_or(EngineError::UnknownHistoryEntry(id))?;
        Ok(self.time_history.remove(index))
    }

    /// Wipe tasks, history, and streaks; keeps the mode and daily goal
    pub fn clear_all_data(&mut self) {
        self.tasks.clear();
        self.completed_tasks.clear();
        self.time_history.clear();
        self.task_history.clear();
        self.current_session_streak = 0.0;
        self.longest_session_streak = 0.0;
        self.last_session_date = None;
        self.reset_run();
        tracing::warn!("all data cleared");
    }

    // ----- Internals -----

    fn active_task(&self) -> Option<&Task> {
        self.active_task_id.and_then(|id| self.task(&id))
    }

    /// Hand out time since the last baseline to the active task and the countdown
    fn advance(&mut self, now: DateTime<Utc>) {
        let secs = self.clock.advance(now);
        if secs <= 0.0 {
            return;
        }

        if let Some(task) = self.active_task() {
            let (id, name) = (task.id, task.text.clone());
            self.run_times.add(id, &name, secs / 60.0);
        }

        if !self.mode.is_timed() {
            self.stopwatch_secs += secs;
            return;
        }

        // Overshoot carries into the next phase
        self.remaining_secs -= secs;
        if self.remaining_secs <= 0.0 {
            self.skip_whole_cycles();
        }
        while self.remaining_secs <= 0.0 {
            match self.phase {
                Phase::Work => self.complete_work_phase(),
                Phase::Break => self.complete_break_phase(),
            }
            self.remaining_secs += self.mode.phase_secs(self.phase) as f64;
        }
    }

    /// Count every full work+break cycle inside the overshoot without
    /// emitting events, leaving less than one cycle for the phase loop
    fn skip_whole_cycles(&mut self) {
        let cycle_secs =
            (self.mode.phase_secs(Phase::Work) + self.mode.phase_secs(Phase::Break)) as f64;
        if cycle_secs <= 0.0 {
            return;
        }
        let cycles = (-self.remaining_secs / cycle_secs).floor();
        if cycles < 1.0 {
            return;
        }
        self.remaining_secs += cycles * cycle_secs;

        let skipped = cycles.min(u32::MAX as f64) as u32;
        let weight = self.mode.streak_weight() * f64::from(skipped);
        self.temp_session_count = self.temp_session_count.saturating_add(skipped);
        self.temp_cycle_count = self.temp_cycle_count.saturating_add(skipped);
        self.temp_overall_streak += weight;
        self.current_session_streak += weight;
        if self.current_session_streak > self.longest_session_streak {
            self.longest_session_streak = self.current_session_streak;
        }
        tracing::info!(cycles = skipped, "caught up on whole cycles");
    }

    fn complete_work_phase(&mut self) {
        let weight = self.mode.streak_weight();
        self.temp_session_count += 1;
        self.temp_overall_streak += weight;
        self.current_session_streak += weight;
        if self.current_session_streak > self.longest_session_streak {
            self.longest_session_streak = self.current_session_streak;
        }
        self.phase = Phase::Break;
        self.pending_events.push(PhaseEvent::WorkComplete {
            sessions: self.temp_session_count,
            streak: self.current_session_streak,
        });
        tracing::info!(sessions = self.temp_session_count, "work phase complete");
    }

    fn complete_break_phase(&mut self) {
        self.temp_cycle_count += 1;
        self.phase = Phase::Work;
        self.pending_events.push(PhaseEvent::BreakComplete {
            cycles: self.temp_cycle_count,
        });
        tracing::info!(cycles = self.temp_cycle_count, "break phase complete");
    }

    /// Flush the outgoing task, then start measuring for `next`
    fn switch_active(&mut self, next: Option<Uuid>, now: DateTime<Utc>) {
        if self.status == TimerStatus::Running {
            self.advance(now);
            self.clock.rebase(now);
        }
        self.active_task_id = next;
    }

    /// Replacement when the task at `index` goes away: next non-default task
    /// after it, else the nearest non-default before it, else the default task
    fn replacement_for(&self, index: usize) -> Option<Uuid> {
        self.tasks
            .iter()
            .skip(index + 1)
            .find(|t| !t.is_default)
            .or_else(|| self.tasks[..index].iter().rev().find(|t| !t.is_default))
            .or_else(|| self.tasks.iter().find(|t| t.is_default))
            .map(|t| t.id)
    }

    fn remove_task(&mut self, id: Uuid, now: DateTime<Utc>) -> Result<Task, EngineError> {
        let index = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(EngineError::UnknownTask(id))?;
        if self.tasks[index].is_default {
            return Err(EngineError::DefaultTaskLocked);
        }

        if self.active_task_id == Some(id) {
            let replacement = self.replacement_for(index);
            self.switch_active(replacement, now);
        }
        Ok(self.tasks.remove(index))
    }

    /// Rough minutes spent in the current phase, used when a completed task
    /// has no accrued time at all
    fn estimated_phase_minutes(&self) -> f64 {
        if self.status == TimerStatus::Idle {
            return 0.0;
        }
        if !self.mode.is_timed() {
            return self.stopwatch_secs / 60.0;
        }
        if self.phase != Phase::Work {
            return 0.0;
        }
        let work_secs = self.mode.phase_secs(Phase::Work) as f64;
        ((work_secs - self.remaining_secs) / 60.0).max(0.0)
    }

    fn build_history_entry(&self, total_minutes: f64, now: DateTime<Utc>) -> HistoryEntry {
        let mut breakdown: BTreeMap<String, f64> = BTreeMap::new();
        let mut names: Vec<String> = Vec::new();

        for entry in self.run_times.iter() {
            let name = self
                .task(&entry.task_id)
                .map(|t| t.text.clone())
                .or_else(|| (!entry.name.is_empty()).then(|| entry.name.clone()))
                .unwrap_or_else(|| Task::fallback_name(&entry.task_id));
            *breakdown.entry(name.clone()).or_insert(0.0) += entry.minutes;
            if !names.contains(&name) {
                names.push(name);
            }
        }

        HistoryEntry {
            id: Uuid::new_v4(),
            task: names.join(", "),
            total_minutes,
            session_count: self.temp_session_count,
            cycle_count: self.temp_cycle_count,
            overall_streak: self.temp_overall_streak,
            timestamp: now,
            session_type: self.mode,
            task_breakdown: breakdown,
        }
    }

    fn reset_run(&mut self) {
        self.status = TimerStatus::Idle;
        self.phase = Phase::Work;
        self.remaining_secs = self.mode.phase_secs(Phase::Work) as f64;
        self.stopwatch_secs = 0.0;
        self.active_task_id = None;
        self.run_times.clear();
        self.clock.clear();
        self.temp_session_count = 0;
        self.temp_cycle_count = 0;
        self.temp_overall_streak = 0.0;
    }

    fn prune_completed(&mut self, now: DateTime<Utc>) {
        let before = self.completed_tasks.len();
        self.completed_tasks.retain(|c| !c.is_expired(now));
        let pruned = before - self.completed_tasks.len();
        if pruned > 0 {
            tracing::debug!(pruned, "pruned expired completed tasks");
        }
    }
}
