//! Incoming turn requests.
//!
//! Natural-language understanding happens upstream; by the time a request
//! reaches the engine it carries an already-classified intent and its
//! extracted slot values.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use talkfinder_core::{IntentName, SlotName, StateName};

/// A value extracted from the user's speech for a named slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// The spoken value. Unfilled slots carry no value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Slot {
    /// Creates a filled slot.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
        }
    }
}

/// A classified user intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    /// The intent name.
    pub name: IntentName,
    /// Slot values keyed by slot name.
    #[serde(default)]
    pub slots: HashMap<SlotName, Slot>,
}

impl Intent {
    /// Creates an intent without slots.
    #[must_use]
    pub fn new(name: impl Into<IntentName>) -> Self {
        Self {
            name: name.into(),
            slots: HashMap::new(),
        }
    }

    /// Adds a filled slot.
    #[must_use]
    pub fn with_slot(mut self, name: impl Into<SlotName>, value: impl Into<String>) -> Self {
        self.slots.insert(name.into(), Slot::new(value));
        self
    }

    /// Returns the value of a slot if it was filled.
    #[must_use]
    pub fn slot_value(&self, name: &str) -> Option<&str> {
        self.slots.get(name)?.value.as_deref()
    }
}

/// One incoming turn: the intent plus the state the session is in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// The classified intent.
    pub intent: Intent,
    /// The session's current state.
    #[serde(default)]
    pub state: StateName,
}

impl Request {
    /// Creates a request for the given intent in the given state.
    #[must_use]
    pub fn new(intent: Intent, state: impl Into<StateName>) -> Self {
        Self {
            intent,
            state: state.into(),
        }
    }

    /// Returns true if the request carries the named intent.
    #[must_use]
    pub fn is(&self, intent: &str) -> bool {
        self.intent.name == intent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_lookup() {
        let intent = Intent::new("LearnAboutTopicIntent").with_slot("sessionTopic", "microservices");
        assert_eq!(intent.slot_value("sessionTopic"), Some("microservices"));
        assert_eq!(intent.slot_value("other"), None);
    }

    #[test]
    fn unfilled_slot_has_no_value() {
        let json = serde_json::json!({
            "name": "LearnAboutTopicIntent",
            "slots": { "sessionTopic": {} }
        });
        let intent: Intent = serde_json::from_value(json).expect("deserialize");
        assert!(intent.slots.contains_key("sessionTopic"));
        assert_eq!(intent.slot_value("sessionTopic"), None);
    }

    #[test]
    fn state_defaults_to_entry() {
        let json = serde_json::json!({ "intent": { "name": "LaunchIntent" } });
        let request: Request = serde_json::from_value(json).expect("deserialize");
        assert_eq!(request.state, StateName::ENTRY);
        assert!(request.is("LaunchIntent"));
        assert!(request.intent.slots.is_empty());
    }
}
