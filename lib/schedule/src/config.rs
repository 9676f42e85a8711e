//! Schedule source configuration.

use serde::Deserialize;
use std::time::Duration;

/// Settings for the joind.in talk source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScheduleConfig {
    /// API root, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// joind.in event whose talks are served.
    #[serde(default = "default_event_id")]
    pub event_id: u32,

    /// Number of talks in the event. Random picks are drawn from `1..=talk_count`.
    #[serde(default = "default_talk_count")]
    pub talk_count: u32,

    /// Per-request timeout, in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// User-Agent header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "https://api.joind.in/v2.1".to_string()
}

fn default_event_id() -> u32 {
    6314
}

fn default_talk_count() -> u32 {
    220
}

fn default_timeout_seconds() -> u64 {
    5
}

fn default_user_agent() -> String {
    "talkfinder".to_string()
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            event_id: default_event_id(),
            talk_count: default_talk_count(),
            timeout_seconds: default_timeout_seconds(),
            user_agent: default_user_agent(),
        }
    }
}

impl ScheduleConfig {
    /// Returns the request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Returns the URL listing talks for the configured event.
    #[must_use]
    pub fn talks_url(&self) -> String {
        format!(
            "{}/events/{}/talks",
            self.base_url.trim_end_matches('/'),
            self.event_id
        )
    }
}
