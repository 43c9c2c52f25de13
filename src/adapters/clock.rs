use crate::ports::clock::Clock;
use chrono::{DateTime, Utc};

/// Wall-clock time source used by the server binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
