//! Template variables.
//!
//! A variable computes the text for one placeholder from the conversation
//! model. Resolution is asynchronous because some variables call external
//! services; variables that fail internally are expected to return a spoken
//! fallback rather than an error.

use crate::error::DialogError;
use crate::model::ConversationModel;
use async_trait::async_trait;
use rootcause::Report;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Model fields a variable writes or consumes.
///
/// Declared so that engine validation can prove a consuming variable is
/// only rendered after the variable that produces its input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelEffects {
    /// Fields this variable stores in the model.
    pub produces: Vec<&'static str>,
    /// Fields this variable reads and clears.
    pub consumes: Vec<&'static str>,
}

impl ModelEffects {
    /// A variable with no declared model effects.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Declares a produced field.
    #[must_use]
    pub fn produces(mut self, key: &'static str) -> Self {
        self.produces.push(key);
        self
    }

    /// Declares a consumed field.
    #[must_use]
    pub fn consumes(mut self, key: &'static str) -> Self {
        self.consumes.push(key);
        self
    }
}

/// Computes the replacement text for a placeholder.
#[async_trait]
pub trait Variable: Send + Sync {
    /// Resolves the variable against the model.
    async fn resolve(&self, model: &mut ConversationModel) -> String;

    /// Model fields this variable produces or consumes.
    fn effects(&self) -> ModelEffects {
        ModelEffects::none()
    }
}

/// A variable backed by a synchronous closure.
pub struct FnVariable<F> {
    f: F,
}

/// Wraps a closure as a [`Variable`].
pub fn from_fn<F>(f: F) -> FnVariable<F>
where
    F: Fn(&mut ConversationModel) -> String + Send + Sync,
{
    FnVariable { f }
}

#[async_trait]
impl<F> Variable for FnVariable<F>
where
    F: Fn(&mut ConversationModel) -> String + Send + Sync,
{
    async fn resolve(&self, model: &mut ConversationModel) -> String {
        (self.f)(model)
    }
}

/// Named variables available to templates.
#[derive(Clone, Default)]
pub struct VariableResolver {
    variables: HashMap<String, Arc<dyn Variable>>,
}

impl VariableResolver {
    /// Creates an empty resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a variable. A later registration under the same name wins.
    #[must_use]
    pub fn with_variable(mut self, name: impl Into<String>, variable: impl Variable + 'static) -> Self {
        self.variables.insert(name.into(), Arc::new(variable));
        self
    }

    /// Returns the variable registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Variable>> {
        self.variables.get(name)
    }

    /// Returns true if a variable is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Returns all registered names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    /// Returns the number of registered variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Returns whether no variables are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Resolves one placeholder.
    ///
    /// # Errors
    ///
    /// Returns an error if no variable is registered under `name`.
    pub async fn resolve(
        &self,
        name: &str,
        model: &mut ConversationModel,
    ) -> Result<String, Report<DialogError>> {
        let variable = self
            .variables
            .get(name)
            .ok_or_else(|| DialogError::UnresolvedPlaceholder {
                name: name.to_string(),
            })?;
        Ok(variable.resolve(model).await)
    }
}

impl fmt::Debug for VariableResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("VariableResolver")
            .field("variables", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Producer;

    #[async_trait]
    impl Variable for Producer {
        async fn resolve(&self, model: &mut ConversationModel) -> String {
            model.insert("cached", "value");
            "produced".to_string()
        }

        fn effects(&self) -> ModelEffects {
            ModelEffects::none().produces("cached")
        }
    }

    #[tokio::test]
    async fn resolves_registered_variables() {
        let variables = VariableResolver::new()
            .with_variable("greeting", from_fn(|_| "hello".to_string()))
            .with_variable("producer", Producer);
        let mut model = ConversationModel::new();

        assert_eq!(variables.resolve("greeting", &mut model).await.expect("resolve"), "hello");
        assert_eq!(variables.resolve("producer", &mut model).await.expect("resolve"), "produced");
        assert_eq!(model.get_str("cached"), Some("value"));
    }

    #[tokio::test]
    async fn unknown_variable_is_an_error() {
        let mut model = ConversationModel::new();
        let err = VariableResolver::new()
            .resolve("missing", &mut model)
            .await
            .expect_err("unregistered");
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn effects_are_declared_per_variable() {
        let variables = VariableResolver::new()
            .with_variable("greeting", from_fn(|_| String::new()))
            .with_variable("producer", Producer);

        assert_eq!(variables.get("greeting").map(|v| v.effects()), Some(ModelEffects::none()));
        assert_eq!(
            variables.get("producer").map(|v| v.effects().produces),
            Some(vec!["cached"])
        );
        assert_eq!(variables.len(), 2);
    }
}
