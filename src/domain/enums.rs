use serde::{Deserialize, Serialize};

/// Timer mode: work/break lengths or an open-ended stopwatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    #[serde(rename = "25/5")]
    Classic,
    #[serde(rename = "50/10")]
    Extended,
    #[serde(rename = "stopwatch")]
    Stopwatch,
}

impl Mode {
    /// Work phase length in minutes (None for stopwatch)
    pub fn work_minutes(&self) -> Option<u32> {
        match self {
            Self::Classic => Some(25),
            Self::Extended => Some(50),
            Self::Stopwatch => None,
        }
    }

    /// Break phase length in minutes (None for stopwatch)
    pub fn break_minutes(&self) -> Option<u32> {
        match self {
            Self::Classic => Some(5),
            Self::Extended => Some(10),
            Self::Stopwatch => None,
        }
    }

    /// Streak weight added per completed work phase
    pub fn streak_weight(&self) -> f64 {
        match self {
            Self::Classic => 0.5,
            Self::Extended => 1.0,
            Self::Stopwatch => 0.0,
        }
    }

    /// Whether this mode counts down through work/break phases
    pub fn is_timed(&self) -> bool {
        !matches!(self, Self::Stopwatch)
    }

    /// Length of the given phase in seconds (0 for stopwatch)
    pub fn phase_secs(&self, phase: Phase) -> i64 {
        let minutes = match phase {
            Phase::Work => self.work_minutes(),
            Phase::Break => self.break_minutes(),
        };
        minutes.map(|m| i64::from(m) * 60).unwrap_or(0)
    }

    /// Label used in the UI and in persisted history
    pub fn label(&self) -> &'static str {
        match self {
            Self::Classic => "25/5",
            Self::Extended => "50/10",
            Self::Stopwatch => "stopwatch",
        }
    }

    /// Parse from a label like "25/5" (also accepts a few shorthands)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "25/5" | "25" | "classic" => Some(Self::Classic),
            "50/10" | "50" | "extended" => Some(Self::Extended),
            "stopwatch" | "sw" => Some(Self::Stopwatch),
            _ => None,
        }
    }

    /// Cycle to the next mode (used by the mode key in the UI)
    pub fn next(&self) -> Self {
        match self {
            Self::Classic => Self::Extended,
            Self::Extended => Self::Stopwatch,
            Self::Stopwatch => Self::Classic,
        }
    }

    pub fn all() -> &'static [Mode] {
        &[Mode::Classic, Mode::Extended, Mode::Stopwatch]
    }
}

/// Countdown phase within a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Work,
    Break,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Work => "Focus",
            Self::Break => "Break",
        }
    }
}

/// Runtime status of the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerStatus {
    #[default]
    Idle,
    Running,
    Paused,
}

impl TimerStatus {
    pub fn to_tag(&self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Running => "RUNNING",
            Self::Paused => "PAUSED",
        }
    }
}

/// UI mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    AddingTask,
    GoalInput,
    Confirm,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_durations() {
        assert_eq!(Mode::Classic.phase_secs(Phase::Work), 1500);
        assert_eq!(Mode::Classic.phase_secs(Phase::Break), 300);
        assert_eq!(Mode::Extended.phase_secs(Phase::Work), 3000);
        assert_eq!(Mode::Extended.phase_secs(Phase::Break), 600);
        assert_eq!(Mode::Stopwatch.phase_secs(Phase::Work), 0);
        assert!(!Mode::Stopwatch.is_timed());
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!(Mode::parse("25/5"), Some(Mode::Classic));
        assert_eq!(Mode::parse(" 50/10 "), Some(Mode::Extended));
        assert_eq!(Mode::parse("Stopwatch"), Some(Mode::Stopwatch));
        assert_eq!(Mode::parse("90/20"), None);
    }

    #[test]
    fn test_mode_serde_labels() {
        assert_eq!(serde_json::to_string(&Mode::Classic).unwrap(), "\"25/5\"");
        let mode: Mode = serde_json::from_str("\"50/10\"").unwrap();
        assert_eq!(mode, Mode::Extended);
        for mode in Mode::all() {
            assert_eq!(Mode::parse(mode.label()), Some(*mode));
        }
    }

    #[test]
    fn test_streak_weights() {
        assert_eq!(Mode::Classic.streak_weight(), 0.5);
        assert_eq!(Mode::Extended.streak_weight(), 1.0);
    }
}
