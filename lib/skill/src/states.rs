//! Conversation states and their transitions.
//!
//! Every handler is declarative so that the engine can check, before
//! serving, that talk details are only read after they were fetched.

use crate::variables::SESSION_TOPIC;
use talkfinder_core::{Result, StateName};
use talkfinder_dialog::{Registry, RegistryError, Rule, TransitionTable};
use tracing::debug;

pub const LAUNCH_RECOMMENDATION: StateName = StateName::from_static("launchRecommendationState");
pub const RECOMMENDATION: StateName = StateName::from_static("recommendationState");
pub const SOMETHING_NEW: StateName = StateName::from_static("somethingNewState");
pub const RANDOM_SESSION: StateName = StateName::from_static("randomSessionState");
pub const SESSION_DETAIL: StateName = StateName::from_static("sessionDetailState");

/// Every view a transition can reply with.
pub const REPLY_KEYS: [&str; 9] = [
    "Intent.Launch",
    "Intent.Info",
    "Intent.Recommendation.Main",
    "Intent.Recommendation.No",
    "Intent.SomethingNew.Main",
    "Intent.SomethingNew.Yes",
    "Intent.LearnAboutTopicIntent.Main",
    "Intent.Help",
    "Intent.SessionDetail.Main",
];

fn goodbye() -> Rule {
    Rule::new("Intent.Recommendation.No", StateName::DIE)
}

fn next_talk() -> Rule {
    Rule::new("Intent.SomethingNew.Yes", RANDOM_SESSION)
}

fn learn_about_topic() -> Rule {
    Rule::new("Intent.LearnAboutTopicIntent.Main", StateName::ENTRY).with_effect(|request, model| {
        match request.intent.slot_value(SESSION_TOPIC) {
            Some(topic) => {
                model.insert(SESSION_TOPIC, topic);
            }
            None => {
                debug!("no topic given");
                model.remove(SESSION_TOPIC);
            }
        }
    })
}

/// Builds the skill's handler registry.
///
/// # Errors
///
/// Returns an error if a handler is registered for a terminal state.
pub fn registry() -> Result<Registry, RegistryError> {
    Registry::builder()
        .on_intent("LaunchIntent", Rule::new("Intent.Launch", LAUNCH_RECOMMENDATION))
        .on_intent("InfoIntent", Rule::new("Intent.Info", StateName::ENTRY))
        .on_intent(
            "RecommendationIntent",
            Rule::new("Intent.Recommendation.Main", RECOMMENDATION),
        )
        .on_intent("AMAZON.HelpIntent", Rule::new("Intent.Help", StateName::DIE))
        .on_state(
            LAUNCH_RECOMMENDATION,
            TransitionTable::new()
                .on(
                    "AMAZON.YesIntent",
                    Rule::new("Intent.Recommendation.Main", RECOMMENDATION),
                )
                .on("AMAZON.NoIntent", goodbye()),
        )
        .on_state(
            RECOMMENDATION,
            TransitionTable::new()
                .on(
                    "SomethingNewIntent",
                    Rule::new("Intent.SomethingNew.Main", SOMETHING_NEW),
                )
                .on("LearnAboutTopicIntent", learn_about_topic()),
        )
        .on_state(
            SOMETHING_NEW,
            TransitionTable::new()
                .on("AMAZON.YesIntent", next_talk())
                .on("AMAZON.NoIntent", goodbye()),
        )
        .on_state(
            RANDOM_SESSION,
            TransitionTable::new()
                .on(
                    "SessionDetailIntent",
                    Rule::new("Intent.SessionDetail.Main", SESSION_DETAIL),
                )
                .on_any(["AMAZON.NextIntent", "TryAgainIntent"], next_talk()),
        )
        .on_state(
            SESSION_DETAIL,
            TransitionTable::new()
                .on("AMAZON.YesIntent", next_talk())
                .on("AMAZON.NoIntent", goodbye()),
        )
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use talkfinder_dialog::{ConversationModel, Directive, HandlerOutcome, Intent, Request};

    fn dispatch(intent: Intent, state: StateName) -> (HandlerOutcome, ConversationModel) {
        let mut model = ConversationModel::new();
        let outcome = registry()
            .expect("registry")
            .dispatch(&Request::new(intent, state), &mut model);
        (outcome, model)
    }

    fn directive(reply: &'static str, to: StateName) -> HandlerOutcome {
        Directive::new(reply, to).into()
    }

    #[test]
    fn state_handler_wins() {
        let (outcome, _) = dispatch(Intent::new("SomethingNewIntent"), RECOMMENDATION);
        assert_eq!(outcome, directive("Intent.SomethingNew.Main", SOMETHING_NEW));
    }

    #[test]
    fn globals_are_reachable_from_entry_and_declining_states() {
        for state in [StateName::ENTRY, SOMETHING_NEW, StateName::DIE] {
            let (outcome, _) = dispatch(Intent::new("LaunchIntent"), state);
            assert_eq!(outcome, directive("Intent.Launch", LAUNCH_RECOMMENDATION));
        }
    }

    #[test]
    fn unknown_intent_in_die_is_unhandled() {
        let (outcome, _) = dispatch(Intent::new("SessionDetailIntent"), StateName::DIE);
        assert_eq!(outcome, HandlerOutcome::NotHandled);
    }

    #[test]
    fn next_and_try_again_fetch_another_talk() {
        for intent in ["AMAZON.NextIntent", "TryAgainIntent"] {
            let (outcome, _) = dispatch(Intent::new(intent), RANDOM_SESSION);
            assert_eq!(outcome, directive("Intent.SomethingNew.Yes", RANDOM_SESSION));
        }
    }

    #[test]
    fn learn_about_topic_stores_slot() {
        let (outcome, model) = dispatch(
            Intent::new("LearnAboutTopicIntent").with_slot("sessionTopic", "microservices"),
            RECOMMENDATION,
        );
        assert_eq!(
            outcome,
            directive("Intent.LearnAboutTopicIntent.Main", StateName::ENTRY)
        );
        assert_eq!(model.get_str(SESSION_TOPIC), Some("microservices"));
    }

    #[test]
    fn learn_about_topic_without_slot_clears_topic() {
        let mut model = ConversationModel::new();
        model.insert(SESSION_TOPIC, "stale");
        let request = Request::new(Intent::new("LearnAboutTopicIntent"), RECOMMENDATION);

        let outcome = registry().expect("registry").dispatch(&request, &mut model);

        assert!(outcome.is_handled());
        assert!(!model.contains(SESSION_TOPIC));
    }

    #[test]
    fn help_ends_the_session() {
        let (outcome, _) = dispatch(Intent::new("AMAZON.HelpIntent"), RANDOM_SESSION);
        assert_eq!(outcome, directive("Intent.Help", StateName::DIE));
    }
}
