//! Template variables for the conference skill.

use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use talkfinder_dialog::{ConversationModel, ModelEffects, Variable, from_fn};
use talkfinder_schedule::{Talk, TalkSource};
use tracing::{debug, warn};

/// Model key for the topic named by `LearnAboutTopicIntent`.
pub const SESSION_TOPIC: &str = "sessionTopic";

/// Model key for the talk last described to the user.
pub const STORED_TALK_DETAILS: &str = "storedTalkDetails";

const FETCH_FAILED: &str =
    "Sorry we could not find any talks for OpenWest. Would you like to try again or exit?";

const LOST_TALK: &str = "Sorry, I lost track of that talk.";

/// The spoken fields of a talk, cached between the description and the
/// details turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TalkDetails {
    pub title: String,
    pub description: String,
    pub speaker: String,
    pub day: String,
    pub time: String,
    pub room: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track: Option<String>,
}

impl From<Talk> for TalkDetails {
    fn from(talk: Talk) -> Self {
        Self {
            day: talk.day(),
            time: talk.time(),
            title: talk.title,
            description: talk.description,
            speaker: talk.speaker,
            room: talk.room,
            track: talk.track,
        }
    }
}

/// `{sessionTopic}`: the topic the user asked about.
pub fn session_topic() -> impl Variable {
    from_fn(|model| {
        model
            .get_str(SESSION_TOPIC)
            .unwrap_or("that topic")
            .to_string()
    })
}

/// `{RandomSessionDescription}`: fetches a random talk, caches its details
/// and describes it.
pub struct RandomSessionDescription {
    source: Arc<dyn TalkSource>,
    talk_count: u32,
}

impl RandomSessionDescription {
    /// Picks talks from positions `1..=talk_count` of `source`.
    #[must_use]
    pub fn new(source: Arc<dyn TalkSource>, talk_count: u32) -> Self {
        Self {
            source,
            talk_count: talk_count.max(1),
        }
    }
}

#[async_trait]
impl Variable for RandomSessionDescription {
    async fn resolve(&self, model: &mut ConversationModel) -> String {
        let index = rand::thread_rng().gen_range(1..=self.talk_count);
        let talk = match self.source.talk_at(index).await {
            Ok(talk) => TalkDetails::from(talk),
            Err(e) => {
                warn!(index, error = %e, "could not fetch a talk");
                return FETCH_FAILED.to_string();
            }
        };

        let text = format!(
            "On {} {} will be presenting a talk called {}. {} <break time=\"0.5s\"/> Wanna learn more or go to the next one?",
            talk.day, talk.speaker, talk.title, talk.description
        );
        if let Err(e) = model.insert_serialized(STORED_TALK_DETAILS, &talk) {
            warn!(error = %e, "could not cache talk details");
        }
        text
    }

    fn effects(&self) -> ModelEffects {
        ModelEffects::none().produces(STORED_TALK_DETAILS)
    }
}

/// `{SessionDetails}`: speaks the cached talk's schedule and clears the cache.
pub struct SessionDetails;

#[async_trait]
impl Variable for SessionDetails {
    async fn resolve(&self, model: &mut ConversationModel) -> String {
        let Some(talk) = model.take::<TalkDetails>(STORED_TALK_DETAILS) else {
            debug!("no cached talk");
            return LOST_TALK.to_string();
        };

        let track = talk
            .track
            .map(|track| format!(" as part of the {track} track"))
            .unwrap_or_default();
        format!(
            "{} will be presenting their {} talk on {} at {} in room {}{}. <break time=\"0.5s\"/> Wanna to hear about another talk?",
            talk.speaker, talk.title, talk.day, talk.time, talk.room, track
        )
    }

    fn effects(&self) -> ModelEffects {
        ModelEffects::none().consumes(STORED_TALK_DETAILS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use rootcause::Report;
    use talkfinder_schedule::ScheduleError;

    struct FixedSource(Talk);

    #[async_trait]
    impl TalkSource for FixedSource {
        async fn talk_at(&self, _index: u32) -> Result<Talk, Report<ScheduleError>> {
            Ok(self.0.clone())
        }
    }

    struct DownSource;

    #[async_trait]
    impl TalkSource for DownSource {
        async fn talk_at(&self, _index: u32) -> Result<Talk, Report<ScheduleError>> {
            Err(ScheduleError::UnexpectedStatus { status: 502 }.into())
        }
    }

    fn talk(track: Option<&str>) -> Talk {
        Talk {
            title: "Rust for Web Developers".to_string(),
            description: "A gentle introduction.".to_string(),
            speaker: "Alex Smith".to_string(),
            start: DateTime::parse_from_rfc3339("2018-07-12T10:30:00-06:00").expect("timestamp"),
            room: "Room 4".to_string(),
            track: track.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn session_topic_falls_back_when_unset() {
        let topic = session_topic();
        let mut model = ConversationModel::new();
        assert_eq!(topic.resolve(&mut model).await, "that topic");

        model.insert(SESSION_TOPIC, "microservices");
        assert_eq!(topic.resolve(&mut model).await, "microservices");
    }

    #[tokio::test]
    async fn description_caches_details() {
        let variable = RandomSessionDescription::new(Arc::new(FixedSource(talk(Some("Languages")))), 220);
        let mut model = ConversationModel::new();

        let text = variable.resolve(&mut model).await;

        assert_eq!(
            text,
            "On Thursday Alex Smith will be presenting a talk called Rust for Web Developers. \
             A gentle introduction. <break time=\"0.5s\"/> Wanna learn more or go to the next one?"
        );
        let cached: TalkDetails = model.get(STORED_TALK_DETAILS).expect("cached");
        assert_eq!(cached.time, "10:30 am");
        assert_eq!(cached.track.as_deref(), Some("Languages"));
    }

    #[tokio::test]
    async fn fetch_failure_apologizes_and_leaves_cache_alone() {
        let variable = RandomSessionDescription::new(Arc::new(DownSource), 220);
        let mut model = ConversationModel::new();

        assert_eq!(variable.resolve(&mut model).await, FETCH_FAILED);
        assert!(!model.contains(STORED_TALK_DETAILS));
    }

    #[tokio::test]
    async fn details_are_consumed_once() {
        let mut model = ConversationModel::new();
        model
            .insert_serialized(STORED_TALK_DETAILS, &TalkDetails::from(talk(Some("Languages"))))
            .expect("cache");

        let text = SessionDetails.resolve(&mut model).await;

        assert_eq!(
            text,
            "Alex Smith will be presenting their Rust for Web Developers talk on Thursday at 10:30 am \
             in room Room 4 as part of the Languages track. <break time=\"0.5s\"/> Wanna to hear about another talk?"
        );
        assert!(!model.contains(STORED_TALK_DETAILS));
        assert_eq!(SessionDetails.resolve(&mut model).await, LOST_TALK);
    }

    #[tokio::test]
    async fn details_without_track_omit_the_clause() {
        let mut model = ConversationModel::new();
        model
            .insert_serialized(STORED_TALK_DETAILS, &TalkDetails::from(talk(None)))
            .expect("cache");

        let text = SessionDetails.resolve(&mut model).await;

        assert!(text.contains("in room Room 4. <break"));
        assert!(!text.contains("track"));
    }

    #[test]
    fn declared_effects() {
        let producer = RandomSessionDescription::new(Arc::new(DownSource), 0);
        assert_eq!(producer.talk_count, 1);
        assert_eq!(producer.effects().produces, [STORED_TALK_DETAILS]);
        assert_eq!(SessionDetails.effects().consumes, [STORED_TALK_DETAILS]);
    }
}
