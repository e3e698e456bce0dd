//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use chrono::{FixedOffset, Offset, Utc};

use crate::background::SchedulerConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Offset in which calendar days are evaluated.
    pub calendar_offset: FixedOffset,
    /// Load the agency's sample roster and posts at startup.
    pub seed_sample_data: bool,
    /// Capacity of each event bus channel.
    pub event_buffer_size: usize,
    pub scheduler: SchedulerConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("PORT", 8080),
            calendar_offset: env::var("CALENDAR_UTC_OFFSET")
                .ok()
                .and_then(|raw| match parse_offset(&raw) {
                    Some(offset) => Some(offset),
                    None => {
                        tracing::warn!(value = %raw, "Invalid CALENDAR_UTC_OFFSET, using UTC");
                        None
                    }
                })
                .unwrap_or(Utc.fix()),
            seed_sample_data: flag("SEED_SAMPLE_DATA", true),
            event_buffer_size: parsed("EVENT_BUFFER_SIZE", 100),
            scheduler: SchedulerConfig::from_env(),
        }
    }
}

/// Read and parse `key`, falling back to `default` when unset or invalid.
pub(crate) fn parsed<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Invalid configuration value, using default");
            default
        }),
        Err(_) => default,
    }
}

/// Boolean switch: anything but `false`/`0` counts as on.
pub(crate) fn flag(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| v != "false" && v != "0")
        .unwrap_or(default)
}

/// Accepts `Z`, `UTC`, or `±HH:MM`.
pub fn parse_offset(raw: &str) -> Option<FixedOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return Some(Utc.fix());
    }
    raw.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_offset() {
        assert_eq!(parse_offset("Z"), Some(Utc.fix()));
        assert_eq!(parse_offset("utc"), Some(Utc.fix()));
        assert_eq!(parse_offset("-03:00"), FixedOffset::west_opt(3 * 3600));
        assert_eq!(parse_offset("+05:30"), FixedOffset::east_opt(5 * 3600 + 1800));
        assert_eq!(parse_offset("brasilia"), None);
    }
}
