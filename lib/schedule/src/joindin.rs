//! joind.in REST client.
//!
//! Talks are fetched one at a time with
//! `GET {base_url}/events/{event_id}/talks?start={index}&resultsperpage=1`.
//! Only the first speaker and the first track label of a talk are used.

use crate::config::ScheduleConfig;
use crate::error::ScheduleError;
use crate::talk::{Talk, TalkSource};
use async_trait::async_trait;
use chrono::DateTime;
use rootcause::Report;
use serde::Deserialize;
use tracing::{debug, instrument};

#[derive(Debug, Deserialize)]
struct TalkPage {
    talks: Vec<RawTalk>,
}

#[derive(Debug, Deserialize)]
struct RawTalk {
    talk_title: String,
    #[serde(default)]
    talk_description: String,
    start_date: String,
    #[serde(default)]
    speakers: Vec<RawSpeaker>,
    #[serde(default)]
    tracks: Vec<RawTrack>,
}

#[derive(Debug, Deserialize)]
struct RawSpeaker {
    speaker_name: String,
}

#[derive(Debug, Deserialize)]
struct RawTrack {
    track_name: String,
}

/// A [`TalkSource`] reading from joind.in.
#[derive(Debug, Clone)]
pub struct JoindInClient {
    http: reqwest::Client,
    talks_url: String,
}

impl JoindInClient {
    /// Creates a client for the configured event.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ScheduleConfig) -> Result<Self, Report<ScheduleError>> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ScheduleError::ClientSetup {
                reason: e.to_string(),
            })?;

        Ok(Self {
            http,
            talks_url: config.talks_url(),
        })
    }
}

#[async_trait]
impl TalkSource for JoindInClient {
    #[instrument(skip(self))]
    async fn talk_at(&self, index: u32) -> Result<Talk, Report<ScheduleError>> {
        let response = self
            .http
            .get(&self.talks_url)
            .query(&[("start", index), ("resultsperpage", 1)])
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScheduleError::UnexpectedStatus {
                status: status.as_u16(),
            }
            .into());
        }

        let body = response.text().await.map_err(request_error)?;
        let talk = parse_talk_page(&body, index)?;
        debug!(title = %talk.title, "fetched talk");
        Ok(talk)
    }
}

fn request_error(e: reqwest::Error) -> ScheduleError {
    if e.is_timeout() {
        ScheduleError::Timeout
    } else {
        ScheduleError::RequestFailed {
            reason: e.to_string(),
        }
    }
}

fn malformed(reason: impl Into<String>) -> ScheduleError {
    ScheduleError::MalformedPayload {
        reason: reason.into(),
    }
}

/// Parses a one-talk page of the talks listing.
pub(crate) fn parse_talk_page(body: &str, index: u32) -> Result<Talk, Report<ScheduleError>> {
    let page: TalkPage = serde_json::from_str(body).map_err(|e| malformed(e.to_string()))?;
    let raw = page
        .talks
        .into_iter()
        .next()
        .ok_or(ScheduleError::NoTalkAt { index })?;

    let start = DateTime::parse_from_rfc3339(&raw.start_date)
        .map_err(|e| malformed(format!("start_date '{}': {e}", raw.start_date)))?;
    let speaker = raw
        .speakers
        .into_iter()
        .next()
        .ok_or_else(|| malformed("talk has no speakers"))?
        .speaker_name;
    let label = raw
        .tracks
        .into_iter()
        .next()
        .ok_or_else(|| malformed("talk has no tracks"))?
        .track_name;
    let (room, track) = Talk::split_location(&label);

    Ok(Talk {
        title: raw.talk_title,
        description: raw.talk_description,
        speaker,
        start,
        room,
        track,
    })
}
