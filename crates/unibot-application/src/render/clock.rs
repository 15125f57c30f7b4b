use chrono::{DateTime, Local};

/// Display format of view timestamps.
pub const TIME_FORMAT: &str = "%H:%M";

/// Source of the wall-clock time stamped on rendered views.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// The local system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}
