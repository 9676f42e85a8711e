//! Response templates.
//!
//! Template text is compiled once, when the view catalog is loaded, into a
//! sequence of literal and placeholder tokens. A placeholder is `{name}`
//! where `name` is a non-empty run of ASCII letters, digits and
//! underscores; any other brace is literal text.

use crate::error::DialogError;
use crate::model::ConversationModel;
use crate::variable::VariableResolver;
use rootcause::Report;

/// One piece of a compiled template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Text spoken as-is.
    Literal(String),
    /// A variable to resolve at render time.
    Placeholder(String),
}

/// A compiled template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    tokens: Vec<Token>,
}

impl Template {
    /// Compiles template text.
    #[must_use]
    pub fn compile(source: impl Into<String>) -> Self {
        let source = source.into();
        let tokens = tokenize(&source);
        Self { source, tokens }
    }

    /// Returns the compiled tokens.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Returns placeholder names in the order they appear.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().filter_map(|token| match token {
            Token::Placeholder(name) => Some(name.as_str()),
            Token::Literal(_) => None,
        })
    }

    /// Returns true if the template has no placeholders.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.placeholders().next().is_none()
    }

    /// Renders the template.
    ///
    /// Placeholders are resolved one at a time in declaration order, each
    /// occurrence with a fresh resolver call.
    ///
    /// # Errors
    ///
    /// Returns an error if a placeholder has no resolver.
    pub async fn render(
        &self,
        variables: &VariableResolver,
        model: &mut ConversationModel,
    ) -> Result<String, Report<DialogError>> {
        if self.is_static() {
            return Ok(self.source.clone());
        }

        let mut rendered = String::with_capacity(self.source.len());
        for token in &self.tokens {
            match token {
                Token::Literal(text) => rendered.push_str(text),
                Token::Placeholder(name) => {
                    let value = variables.resolve(name, model).await?;
                    rendered.push_str(&value);
                }
            }
        }
        Ok(rendered)
    }
}

fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut rest = source;

    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        let name = after
            .find('}')
            .map(|close| &after[..close])
            .filter(|name| is_placeholder_name(name));

        match name {
            Some(name) => {
                literal.push_str(&rest[..open]);
                if !literal.is_empty() {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(Token::Placeholder(name.to_string()));
                rest = &after[name.len() + 1..];
            }
            None => {
                literal.push_str(&rest[..=open]);
                rest = after;
            }
        }
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    tokens
}

fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
