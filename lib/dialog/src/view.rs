//! View catalog.
//!
//! Views are authored as a nested JSON object. Any object carrying `ask`,
//! `tell` or `reprompt` is a response node; every other object is a branch
//! whose children extend the dotted key. For example:
//!
//! ```json
//! { "Intent": { "Launch": { "ask": "Welcome!", "reprompt": "Well?" } } }
//! ```
//!
//! defines the view `Intent.Launch`.

use crate::error::{CatalogError, DialogError};
use crate::model::ConversationModel;
use crate::template::Template;
use crate::variable::VariableResolver;
use rootcause::Report;
use serde_json::{Map, Value as JsonValue};
use std::collections::{BTreeSet, HashMap};
use talkfinder_core::ViewKey;

/// Whether a response keeps the session open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// Speak and wait for the user.
    Ask,
    /// Speak and end the session.
    Tell,
}

impl ResponseKind {
    /// Returns true if this response closes the session.
    #[must_use]
    pub fn ends_session(&self) -> bool {
        matches!(self, Self::Tell)
    }
}

/// A compiled response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseNode {
    kind: ResponseKind,
    text: Template,
    reprompt: Option<Template>,
}

impl ResponseNode {
    /// Creates a response that waits for the user.
    #[must_use]
    pub fn ask(text: impl Into<String>) -> Self {
        Self {
            kind: ResponseKind::Ask,
            text: Template::compile(text),
            reprompt: None,
        }
    }

    /// Creates a response that ends the session.
    #[must_use]
    pub fn tell(text: impl Into<String>) -> Self {
        Self {
            kind: ResponseKind::Tell,
            text: Template::compile(text),
            reprompt: None,
        }
    }

    /// Adds a reprompt.
    #[must_use]
    pub fn with_reprompt(mut self, reprompt: impl Into<String>) -> Self {
        self.reprompt = Some(Template::compile(reprompt));
        self
    }

    /// Returns the response kind.
    #[must_use]
    pub fn kind(&self) -> ResponseKind {
        self.kind
    }

    /// Returns the reprompt template.
    #[must_use]
    pub fn reprompt(&self) -> Option<&Template> {
        self.reprompt.as_ref()
    }

    /// Returns every placeholder in the main text and reprompt.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.text
            .placeholders()
            .chain(self.reprompt.iter().flat_map(Template::placeholders))
    }

    /// Renders the text and reprompt.
    ///
    /// Nothing is returned until every placeholder of both templates has
    /// been resolved.
    ///
    /// # Errors
    ///
    /// Returns an error if a placeholder has no resolver.
    pub async fn render(
        &self,
        variables: &VariableResolver,
        model: &mut ConversationModel,
    ) -> Result<RenderedResponse, Report<DialogError>> {
        let speech_text = self.text.render(variables, model).await?;
        let reprompt_text = match &self.reprompt {
            Some(reprompt) => Some(reprompt.render(variables, model).await?),
            None => None,
        };
        Ok(RenderedResponse {
            kind: self.kind,
            speech_text,
            reprompt_text,
        })
    }
}

/// A response with all placeholders filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedResponse {
    /// Whether the response keeps the session open.
    pub kind: ResponseKind,
    /// Text to speak.
    pub speech_text: String,
    /// Text to speak if the user stays silent.
    pub reprompt_text: Option<String>,
}

/// All views, keyed by dotted path.
#[derive(Debug, Clone, Default)]
pub struct ViewCatalog {
    views: HashMap<ViewKey, ResponseNode>,
}

impl ViewCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a view. A later view under the same key wins.
    #[must_use]
    pub fn with_view(mut self, key: impl Into<ViewKey>, node: ResponseNode) -> Self {
        self.views.insert(key.into(), node);
        self
    }

    /// Loads and compiles a catalog from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not JSON or a node is malformed.
    pub fn from_json_str(source: &str) -> Result<Self, Report<CatalogError>> {
        let value: JsonValue =
            serde_json::from_str(source).map_err(|e| CatalogError::ParseFailed {
                reason: e.to_string(),
            })?;
        Self::from_json(&value)
    }

    /// Loads and compiles a catalog from a nested JSON object.
    ///
    /// # Errors
    ///
    /// Returns an error if the root is not an object or a node is malformed.
    pub fn from_json(value: &JsonValue) -> Result<Self, Report<CatalogError>> {
        let root = value.as_object().ok_or_else(|| CatalogError::InvalidNode {
            key: String::new(),
            reason: "catalog root must be an object".to_string(),
        })?;
        let mut catalog = Self::new();
        catalog.load_branch(String::new(), root)?;
        Ok(catalog)
    }

    fn load_branch(
        &mut self,
        prefix: String,
        branch: &Map<String, JsonValue>,
    ) -> Result<(), Report<CatalogError>> {
        if ["ask", "tell", "reprompt"].iter().any(|f| branch.contains_key(*f)) {
            let node = compile_node(&prefix, branch)?;
            self.views.insert(ViewKey::from(prefix), node);
            return Ok(());
        }

        for (name, child) in branch {
            let key = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{prefix}.{name}")
            };
            match child {
                JsonValue::Object(child) => self.load_branch(key, child)?,
                _ => {
                    return Err(CatalogError::InvalidNode {
                        key,
                        reason: "expected a view or a group of views".to_string(),
                    }
                    .into());
                }
            }
        }
        Ok(())
    }

    /// Returns the view for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ResponseNode> {
        self.views.get(key)
    }

    /// Returns the view for a key, or an error naming the missing key.
    ///
    /// # Errors
    ///
    /// Returns an error if no view exists under `key`.
    pub fn lookup(&self, key: &ViewKey) -> Result<&ResponseNode, Report<DialogError>> {
        self.views.get(key).ok_or_else(|| {
            DialogError::UnresolvedViewKey { key: key.clone() }.into()
        })
    }

    /// Returns true if a view exists under `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.views.contains_key(key)
    }

    /// Returns all views.
    pub fn iter(&self) -> impl Iterator<Item = (&ViewKey, &ResponseNode)> {
        self.views.iter()
    }

    /// Returns every placeholder name used by any view.
    #[must_use]
    pub fn placeholders(&self) -> BTreeSet<&str> {
        self.views
            .values()
            .flat_map(ResponseNode::placeholders)
            .collect()
    }

    /// Returns the number of views.
    #[must_use]
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Returns whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

fn compile_node(key: &str, fields: &Map<String, JsonValue>) -> Result<ResponseNode, Report<CatalogError>> {
    let mut ask = None;
    let mut tell = None;
    let mut reprompt = None;

    for (field, value) in fields {
        let text = value.as_str().ok_or_else(|| CatalogError::InvalidNode {
            key: key.to_string(),
            reason: format!("field '{field}' must be a string"),
        })?;
        match field.as_str() {
            "ask" => ask = Some(text),
            "tell" => tell = Some(text),
            "reprompt" => reprompt = Some(text),
            other => {
                return Err(CatalogError::InvalidNode {
                    key: key.to_string(),
                    reason: format!("unexpected field '{other}'"),
                }
                .into());
            }
        }
    }

    let node = match (ask, tell) {
        (Some(text), None) => ResponseNode::ask(text),
        (None, Some(text)) => ResponseNode::tell(text),
        (Some(_), Some(_)) => {
            return Err(CatalogError::AmbiguousNode {
                key: key.to_string(),
            }
            .into());
        }
        (None, None) => {
            return Err(CatalogError::InvalidNode {
                key: key.to_string(),
                reason: "a view needs either 'ask' or 'tell'".to_string(),
            }
            .into());
        }
    };

    Ok(match reprompt {
        Some(text) => node.with_reprompt(text),
        None => node,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variable::from_fn;
    use serde_json::json;

    fn catalog() -> ViewCatalog {
        ViewCatalog::from_json(&json!({
            "Intent": {
                "Launch": {
                    "ask": "Welcome! Want a talk?",
                    "reprompt": "Want a talk?"
                },
                "Recommendation": {
                    "No": { "tell": "Goodbye for now." }
                },
                "LearnAboutTopicIntent": {
                    "Main": { "tell": "You want to learn about {sessionTopic}." }
                }
            }
        }))
        .expect("valid catalog")
    }

    #[test]
    fn flattens_nested_keys() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 3);
        assert!(catalog.contains("Intent.Launch"));
        assert!(catalog.contains("Intent.Recommendation.No"));
        assert!(!catalog.contains("Intent.Recommendation"));

        let launch = catalog.get("Intent.Launch").expect("present");
        assert_eq!(launch.kind(), ResponseKind::Ask);
        assert!(launch.reprompt().is_some());
    }

    #[test]
    fn lookup_reports_missing_key() {
        let err = catalog()
            .lookup(&ViewKey::from("Intent.Nope"))
            .expect_err("missing");
        assert!(err.to_string().contains("Intent.Nope"));
    }

    #[test]
    fn collects_placeholders() {
        let catalog = catalog();
        let placeholders = catalog.placeholders();
        assert_eq!(placeholders.into_iter().collect::<Vec<_>>(), ["sessionTopic"]);
    }

    #[test]
    fn rejects_node_without_ask_or_tell() {
        let err = ViewCatalog::from_json(&json!({
            "Intent": { "Help": { "say": "Some help text here." } }
        }))
        .expect_err("say is not a response field");
        assert!(err.to_string().contains("Intent.Help"));
    }

    #[test]
    fn rejects_node_with_both_ask_and_tell() {
        let err = ViewCatalog::from_json(&json!({
            "Intent": { "Info": { "ask": "a", "tell": "b" } }
        }))
        .expect_err("ambiguous");
        assert!(err.to_string().contains("both"));
    }

    #[test]
    fn rejects_reprompt_without_text() {
        assert!(ViewCatalog::from_json(&json!({ "A": { "reprompt": "Well?" } })).is_err());
    }

    #[test]
    fn rejects_invalid_json_text() {
        assert!(ViewCatalog::from_json_str("{ not json").is_err());
    }

    #[tokio::test]
    async fn renders_text_and_reprompt() {
        let node = ResponseNode::ask("Tell me about {topic}.").with_reprompt("Still there, {topic} fan?");
        let variables = VariableResolver::new().with_variable("topic", from_fn(|_| "rust".to_string()));
        let mut model = ConversationModel::new();

        let rendered = node.render(&variables, &mut model).await.expect("render");

        assert_eq!(rendered.speech_text, "Tell me about rust.");
        assert_eq!(rendered.reprompt_text.as_deref(), Some("Still there, rust fan?"));
        assert!(!rendered.kind.ends_session());
    }
}
