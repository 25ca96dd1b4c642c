//! Operation timing
//!
//! Registry operations run under an [`OperationTimer`] that reports its
//! duration when dropped: at debug level normally, at warn level once the
//! configured slow-operation threshold is crossed.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::time::{Duration, Instant};
use log::{debug, warn};

/// Timer for a single registry operation
#[derive(Debug)]
pub struct OperationTimer {
    /// Operation name
    operation: &'static str,

    /// Start time
    start: Instant,

    /// Duration above which the operation is reported as slow
    slow_threshold: Duration,
}

impl OperationTimer {
    /// Start timing `operation`
    pub fn start(operation: &'static str, slow_threshold: Duration) -> Self {
        OperationTimer {
            operation,
            start: Instant::now(),
            slow_threshold,
        }
    }

    /// Time elapsed since the timer was started
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Whether the operation has exceeded the slow threshold
    pub fn is_slow(&self) -> bool {
        self.elapsed() > self.slow_threshold
    }
}

impl Display for OperationTimer {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}: {:?}", self.operation, self.elapsed())
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        if self.is_slow() {
            warn!("{} [SLOW]", self);
        } else {
            debug!("{}", self);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_timer_elapsed() {
        let timer = OperationTimer::start("test", Duration::from_secs(60));
        thread::sleep(Duration::from_millis(5));

        assert!(timer.elapsed() >= Duration::from_millis(5));
        assert!(!timer.is_slow());
    }

    #[test]
    fn test_timer_slow_threshold() {
        let timer = OperationTimer::start("test", Duration::from_millis(1));
        thread::sleep(Duration::from_millis(5));

        assert!(timer.is_slow());
        assert!(timer.to_string().starts_with("test: "));
    }
}
