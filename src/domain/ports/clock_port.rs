/// Port for reading wall-clock time.
pub trait ClockPort: Send + Sync {
    /// Current unix time in seconds.
    fn now_secs(&self) -> i64;
}
