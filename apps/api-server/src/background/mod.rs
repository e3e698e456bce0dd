//! Background processing: periodic scan for posts that are due.

#[cfg(feature = "scheduler")]
mod due;
#[cfg(feature = "scheduler")]
mod scheduler;

#[cfg(feature = "scheduler")]
pub use due::register_due_scan;
#[cfg(feature = "scheduler")]
pub use scheduler::Scheduler;

/// Scheduler configuration.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Enable scheduler.
    pub enabled: bool,
    /// Six-field cron expression for the due-post scan.
    pub due_scan_cron: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            due_scan_cron: "0 * * * * *".to_string(),
        }
    }
}

impl SchedulerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: crate::config::flag("SCHEDULER_ENABLED", defaults.enabled),
            due_scan_cron: std::env::var("DUE_SCAN_CRON").unwrap_or(defaults.due_scan_cron),
        }
    }
}
