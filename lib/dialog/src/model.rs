//! Per-session conversation model.
//!
//! The model is a free-form key/value map owned by one session. Handlers
//! and variable resolvers read and write it during a turn, and the adapter
//! round-trips it through the platform's session attributes between turns.

use crate::error::ModelError;
use rootcause::Report;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Mutable per-session data shared between handlers and resolvers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationModel {
    attributes: Map<String, JsonValue>,
}

impl ConversationModel {
    /// Creates an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the string stored under `key`, if it is a string.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(JsonValue::as_str)
    }

    /// Returns the value under `key` decoded as `T`.
    ///
    /// Absent keys and values of the wrong shape both yield `None`.
    #[must_use]
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.attributes.get(key)?;
        match serde_json::from_value(value.clone()) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::debug!(key, error = %e, "model field has unexpected shape");
                None
            }
        }
    }

    /// Stores a raw value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Option<JsonValue> {
        self.attributes.insert(key.into(), value.into())
    }

    /// Serializes `value` and stores it under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be represented as JSON. The
    /// model is left unchanged in that case.
    pub fn insert_serialized<T: Serialize>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> Result<(), Report<ModelError>> {
        let key = key.into();
        let value = serde_json::to_value(value).map_err(|e| ModelError::SerializationFailed {
            key: key.clone(),
            reason: e.to_string(),
        })?;
        self.attributes.insert(key, value);
        Ok(())
    }

    /// Removes the value under `key` and decodes it as `T`.
    ///
    /// The key is cleared even when decoding fails.
    pub fn take<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        let value = self.attributes.remove(key)?;
        serde_json::from_value(value).ok()
    }

    /// Removes the value under `key`.
    pub fn remove(&mut self, key: &str) -> Option<JsonValue> {
        self.attributes.remove(key)
    }

    /// Returns true if `key` holds a value.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    /// Returns the number of stored fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Returns whether the model is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}
