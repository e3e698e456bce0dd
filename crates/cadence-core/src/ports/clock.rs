use chrono::{DateTime, Utc};

/// Source of "now" for time-guarded transitions.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
