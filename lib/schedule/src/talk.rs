//! Talk records and the source trait.

use crate::error::ScheduleError;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use rootcause::Report;

/// One scheduled talk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Talk {
    pub title: String,
    pub description: String,
    pub speaker: String,
    /// Start time in the event's own offset.
    pub start: DateTime<FixedOffset>,
    pub room: String,
    pub track: Option<String>,
}

impl Talk {
    /// Splits a combined `"room - track"` label.
    ///
    /// A label without the separator is all room. Only the segment after
    /// the first separator names the track, and a blank track is none.
    #[must_use]
    pub fn split_location(label: &str) -> (String, Option<String>) {
        let mut segments = label.split(" - ");
        let room = segments.next().unwrap_or_default().trim().to_string();
        let track = segments
            .next()
            .map(str::trim)
            .filter(|track| !track.is_empty())
            .map(str::to_string);
        (room, track)
    }

    /// Weekday name, e.g. `Thursday`.
    #[must_use]
    pub fn day(&self) -> String {
        self.start.format("%A").to_string()
    }

    /// Twelve-hour clock time, e.g. `9:00 am`.
    #[must_use]
    pub fn time(&self) -> String {
        self.start.format("%-I:%M %P").to_string()
    }
}

/// Something that can look up a talk by its position in the schedule.
#[async_trait]
pub trait TalkSource: Send + Sync {
    /// Fetches the talk at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if the talk cannot be fetched or parsed.
    async fn talk_at(&self, index: u32) -> Result<Talk, Report<ScheduleError>>;
}
