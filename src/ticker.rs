use std::time::{Duration, Instant};

/// Tick interval in milliseconds. Acceleration never shortens it.
pub const DEFAULT_TICK_MS: u64 = 1000;

/// Get tick duration
pub fn tick_duration() -> Duration {
    Duration::from_millis(DEFAULT_TICK_MS)
}

/// Paces the UI loop so the engine is ticked once per interval even when
/// key presses wake the loop early
#[derive(Debug)]
pub struct Ticker {
    interval: Duration,
    last_tick: Instant,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_tick: Instant::now(),
        }
    }

    /// How long to wait for input before the next tick is due
    pub fn timeout(&self) -> Duration {
        self.interval.saturating_sub(self.last_tick.elapsed())
    }

    /// True (and resets) once the interval has elapsed
    pub fn due(&mut self) -> bool {
        if self.last_tick.elapsed() >= self.interval {
            self.last_tick = Instant::now();
            true
        } else {
            false
        }
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(tick_duration())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_duration() {
        let duration = tick_duration();
        assert_eq!(duration, Duration::from_secs(1));
    }

    #[test]
    fn test_ticker_due_after_interval() {
        let mut ticker = Ticker::new(Duration::from_millis(0));
        assert!(ticker.due());
        assert_eq!(ticker.timeout(), Duration::ZERO);

        let mut slow = Ticker::new(Duration::from_secs(3600));
        assert!(!slow.due());
        assert!(slow.timeout() > Duration::from_secs(3500));
    }
}
