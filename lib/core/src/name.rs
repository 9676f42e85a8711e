//! Strongly-typed names for intents, slots, states and views.
//!
//! Names arrive as plain strings from the voice platform and from the
//! view catalog, but they mean different things. Wrapping each in its own
//! type keeps a state name from being passed where a view key is expected.

use serde::{Deserialize, Serialize};
use std::borrow::{Borrow, Cow};
use std::fmt;

/// Macro to generate a string-backed name type.
macro_rules! define_name {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Cow<'static, str>);

        impl $name {
            /// Creates a name from any string.
            #[must_use]
            pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
                Self(name.into())
            }

            /// Creates a name from a static string in const context.
            #[must_use]
            pub const fn from_static(name: &'static str) -> Self {
                Self(Cow::Borrowed(name))
            }

            /// Returns the name as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&'static str> for $name {
            fn from(name: &'static str) -> Self {
                Self::from_static(name)
            }
        }

        impl From<String> for $name {
            fn from(name: String) -> Self {
                Self(Cow::Owned(name))
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

define_name!(
    /// Name of an already-classified user intent (e.g. `AMAZON.YesIntent`).
    IntentName
);

define_name!(
    /// Name of a slot carried on an intent.
    SlotName
);

define_name!(
    /// Name of a conversation state.
    StateName
);

define_name!(
    /// Dot-delimited path selecting a response in the view catalog.
    ViewKey
);

impl StateName {
    /// The idle state. Sessions start here.
    pub const ENTRY: Self = Self::from_static("entry");

    /// The terminal state. Reaching it ends the session.
    pub const DIE: Self = Self::from_static("die");

    /// Returns true for the terminal state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        *self == Self::DIE
    }
}

impl Default for StateName {
    fn default() -> Self {
        Self::ENTRY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn reserved_states() {
        assert_eq!(StateName::ENTRY, "entry");
        assert!(StateName::DIE.is_terminal());
        assert!(!StateName::new("recommendationState").is_terminal());
        assert_eq!(StateName::default(), StateName::ENTRY);
    }

    #[test]
    fn owned_and_static_names_compare_equal() {
        let owned = IntentName::from("LaunchIntent".to_string());
        assert_eq!(owned, IntentName::from_static("LaunchIntent"));
    }

    #[test]
    fn lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(StateName::new("somethingNewState"), 1);
        assert_eq!(map.get("somethingNewState"), Some(&1));
    }

    #[test]
    fn names_serialize_as_plain_strings() {
        let json = serde_json::to_string(&StateName::DIE).expect("serialize");
        assert_eq!(json, "\"die\"");
        let parsed: StateName = serde_json::from_str("\"entry\"").expect("deserialize");
        assert_eq!(parsed, StateName::ENTRY);
    }
}
