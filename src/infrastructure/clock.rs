//! Wall clock.

use chrono::Utc;

use crate::domain::ports::ClockPort;

/// Clock reading system UTC time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl ClockPort for SystemClock {
    fn now_secs(&self) -> i64 {
        Utc::now().timestamp()
    }
}
