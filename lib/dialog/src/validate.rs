//! Static checks over an engine configuration.
//!
//! Run once when an engine is built. The checks cover:
//!
//! - every reply named by a rule exists in the view catalog
//! - every placeholder in the catalog has a variable
//! - a reply whose variables consume a model field is only reachable from
//!   states that can only be entered through replies producing that field
//!
//! The last check walks a graph of states whose edges are the transitions
//! declared by rules and transition tables. Global intents are reachable
//! from every state, so they contribute an edge from every node.

use crate::handler::Rule;
use crate::registry::Registry;
use crate::variable::VariableResolver;
use crate::view::ViewCatalog;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use talkfinder_core::{IntentName, StateName, ViewKey};

/// A problem found by [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationIssue {
    /// A rule replies with a view that does not exist.
    UnknownView { key: ViewKey },
    /// A view uses a placeholder with no variable.
    UnknownPlaceholder { key: ViewKey, name: String },
    /// A view consuming `field` is reachable without `field` being produced.
    UnguardedConsumer {
        reply: ViewKey,
        field: &'static str,
        state: Option<StateName>,
        entered_by: Option<ViewKey>,
    },
    /// A custom handler hides transitions needed by the reachability check.
    OpaqueHandler { scope: String },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownView { key } => write!(f, "reply '{key}' is not in the view catalog"),
            Self::UnknownPlaceholder { key, name } => {
                write!(f, "view '{key}' uses '{{{name}}}' which has no variable")
            }
            Self::UnguardedConsumer {
                reply,
                field,
                state,
                entered_by,
            } => match (state, entered_by) {
                (None, _) => write!(
                    f,
                    "view '{reply}' consumes '{field}' but is reachable from any state"
                ),
                (Some(state), None) => write!(
                    f,
                    "view '{reply}' consumes '{field}' but '{state}' is where sessions start"
                ),
                (Some(state), Some(view)) => write!(
                    f,
                    "view '{reply}' consumes '{field}' but '{state}' can be entered via '{view}', which does not produce it"
                ),
            },
            Self::OpaqueHandler { scope } => write!(
                f,
                "{scope} uses a custom handler, so cached-field reachability cannot be verified"
            ),
        }
    }
}

enum Scope<'a> {
    State(&'a StateName),
    Global,
}

struct Transition<'a> {
    from: Scope<'a>,
    rule: &'a Rule,
}

/// Checks an engine configuration, returning every issue found.
#[must_use]
pub fn validate(
    registry: &Registry,
    views: &ViewCatalog,
    variables: &VariableResolver,
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let mut opaque = Vec::new();
    let mut transitions = Vec::new();

    for (state, handler) in registry.state_handlers() {
        match handler.transitions() {
            Some(rules) => transitions.extend(rules.into_iter().map(|(_, rule)| Transition {
                from: Scope::State(state),
                rule,
            })),
            None => opaque.push(format!("state '{state}'")),
        }
    }
    for (intent, handler) in registry.intent_handlers() {
        match handler.transitions() {
            Some(rules) => transitions.extend(rules.into_iter().map(|(_, rule)| Transition {
                from: Scope::Global,
                rule,
            })),
            None => opaque.push(format!("intent '{intent}'")),
        }
    }

    for transition in &transitions {
        let reply = transition.rule.reply();
        if !views.contains(reply.as_str()) {
            issues.push(ValidationIssue::UnknownView { key: reply.clone() });
        }
    }

    for (key, node) in views.iter() {
        for name in node.placeholders() {
            if !variables.contains(name) {
                issues.push(ValidationIssue::UnknownPlaceholder {
                    key: key.clone(),
                    name: name.to_string(),
                });
            }
        }
    }

    let fields = |reply: &ViewKey, consumed: bool| -> BTreeSet<&'static str> {
        let Some(node) = views.get(reply.as_str()) else {
            return BTreeSet::new();
        };
        node.placeholders()
            .filter_map(|name| variables.get(name))
            .flat_map(|variable| {
                let effects = variable.effects();
                if consumed { effects.consumes } else { effects.produces }
            })
            .collect()
    };

    let (graph, index) = state_graph(&transitions);
    let mut has_consumers = false;

    for transition in &transitions {
        let reply = transition.rule.reply();
        for field in fields(reply, true) {
            has_consumers = true;
            let state = match transition.from {
                Scope::Global => {
                    issues.push(ValidationIssue::UnguardedConsumer {
                        reply: reply.clone(),
                        field,
                        state: None,
                        entered_by: None,
                    });
                    continue;
                }
                Scope::State(state) => state,
            };

            if *state == StateName::ENTRY {
                issues.push(ValidationIssue::UnguardedConsumer {
                    reply: reply.clone(),
                    field,
                    state: Some(state.clone()),
                    entered_by: None,
                });
            }

            let Some(&node) = index.get(state) else {
                continue;
            };
            for edge in graph.edges_directed(node, Direction::Incoming) {
                let entered_by = edge.weight();
                if !fields(entered_by, false).contains(field) {
                    issues.push(ValidationIssue::UnguardedConsumer {
                        reply: reply.clone(),
                        field,
                        state: Some(state.clone()),
                        entered_by: Some(entered_by.clone()),
                    });
                }
            }
        }
    }

    // A custom handler may enter any state, including one whose replies
    // consume a cached field.
    if has_consumers {
        issues.extend(
            opaque
                .iter()
                .map(|scope| ValidationIssue::OpaqueHandler { scope: scope.clone() }),
        );
    }

    if opaque.is_empty() {
        warn_unreachable(registry, &graph, &index);
    }

    issues.sort();
    issues.dedup();
    issues
}

fn state_graph(
    transitions: &[Transition<'_>],
) -> (DiGraph<StateName, ViewKey>, HashMap<StateName, NodeIndex>) {
    let mut graph = DiGraph::new();
    let mut index = HashMap::new();

    let mut node_for = |graph: &mut DiGraph<StateName, ViewKey>, state: &StateName| {
        *index
            .entry(state.clone())
            .or_insert_with(|| graph.add_node(state.clone()))
    };

    node_for(&mut graph, &StateName::ENTRY);
    node_for(&mut graph, &StateName::DIE);
    for transition in transitions {
        if let Scope::State(state) = transition.from {
            node_for(&mut graph, state);
        }
        node_for(&mut graph, transition.rule.to());
    }

    let all_nodes: Vec<NodeIndex> = graph.node_indices().collect();
    for transition in transitions {
        let target = node_for(&mut graph, transition.rule.to());
        let reply = transition.rule.reply().clone();
        match transition.from {
            Scope::State(state) => {
                let source = node_for(&mut graph, state);
                graph.add_edge(source, target, reply);
            }
            Scope::Global => {
                for &source in &all_nodes {
                    graph.add_edge(source, target, reply.clone());
                }
            }
        }
    }

    (graph, index)
}

fn warn_unreachable(
    registry: &Registry,
    graph: &DiGraph<StateName, ViewKey>,
    index: &HashMap<StateName, NodeIndex>,
) {
    let Some(&entry) = index.get(&StateName::ENTRY) else {
        return;
    };
    let mut reachable = BTreeSet::new();
    let mut dfs = Dfs::new(graph, entry);
    while let Some(node) = dfs.next(graph) {
        reachable.insert(graph[node].clone());
    }

    for (state, _) in registry.state_handlers() {
        if !reachable.contains(state) {
            tracing::warn!(%state, "state handler is not reachable from entry");
        }
    }
}

/// Returns the intents that lead out of `state`, including global ones.
///
/// Custom handlers contribute nothing.
#[must_use]
pub fn intents_from<'a>(registry: &'a Registry, state: &str) -> BTreeSet<&'a IntentName> {
    let mut intents: BTreeSet<&IntentName> = registry
        .intent_handlers()
        .map(|(intent, _)| intent)
        .collect();
    if let Some(rules) = registry.state_handler(state).and_then(|h| h.transitions()) {
        intents.extend(rules.into_iter().filter_map(|(intent, _)| intent));
    }
    intents
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::HandlerOutcome;
    use crate::handler::{Handler, TransitionTable};
    use crate::model::ConversationModel;
    use crate::variable::{ModelEffects, Variable, from_fn};
    use crate::view::ResponseNode;
    use async_trait::async_trait;

    struct Fill;

    #[async_trait]
    impl Variable for Fill {
        async fn resolve(&self, model: &mut ConversationModel) -> String {
            model.insert("cached", "x");
            "filled".to_string()
        }

        fn effects(&self) -> ModelEffects {
            ModelEffects::none().produces("cached")
        }
    }

    struct Drain;

    #[async_trait]
    impl Variable for Drain {
        async fn resolve(&self, model: &mut ConversationModel) -> String {
            model.remove("cached");
            "drained".to_string()
        }

        fn effects(&self) -> ModelEffects {
            ModelEffects::none().consumes("cached")
        }
    }

    fn views() -> ViewCatalog {
        ViewCatalog::new()
            .with_view("Start", ResponseNode::ask("Ready?"))
            .with_view("Fill", ResponseNode::ask("{Fill}"))
            .with_view("Drain", ResponseNode::ask("{Drain}"))
    }

    fn variables() -> VariableResolver {
        VariableResolver::new()
            .with_variable("Fill", Fill)
            .with_variable("Drain", Drain)
    }

    fn guarded() -> crate::registry::RegistryBuilder {
        Registry::builder()
            .on_intent("Begin", Rule::new("Start", "ready"))
            .on_state("ready", TransitionTable::new().on("Yes", Rule::new("Fill", "filled")))
            .on_state(
                "filled",
                TransitionTable::new()
                    .on("Details", Rule::new("Drain", "drained"))
                    .on("Next", Rule::new("Fill", "filled")),
            )
    }

    #[test]
    fn guarded_consumer_passes() {
        let registry = guarded().build().expect("registry");
        assert!(validate(&registry, &views(), &variables()).is_empty());
    }

    #[test]
    fn reports_unknown_view_and_placeholder() {
        let registry = Registry::builder()
            .on_intent("Begin", Rule::new("Missing", StateName::ENTRY))
            .build()
            .expect("registry");
        let views = ViewCatalog::new().with_view("Hello", ResponseNode::tell("Hi {who}"));

        let issues = validate(&registry, &views, &VariableResolver::new());

        assert!(issues.contains(&ValidationIssue::UnknownView {
            key: ViewKey::from("Missing")
        }));
        assert!(issues.contains(&ValidationIssue::UnknownPlaceholder {
            key: ViewKey::from("Hello"),
            name: "who".to_string()
        }));
    }

    #[test]
    fn consumer_entered_without_producer_is_reported() {
        let registry = guarded()
            .on_intent("Jump", Rule::new("Start", "filled"))
            .build()
            .expect("registry");

        let issues = validate(&registry, &views(), &variables());

        assert_eq!(
            issues,
            [ValidationIssue::UnguardedConsumer {
                reply: ViewKey::from("Drain"),
                field: "cached",
                state: Some(StateName::new("filled")),
                entered_by: Some(ViewKey::from("Start")),
            }]
        );
    }

    #[test]
    fn global_consumer_is_reported() {
        let registry = guarded()
            .on_intent("Details", Rule::new("Drain", "drained"))
            .build()
            .expect("registry");

        let issues = validate(&registry, &views(), &variables());

        assert!(issues.iter().any(|issue| matches!(
            issue,
            ValidationIssue::UnguardedConsumer { state: None, .. }
        )));
    }

    #[test]
    fn custom_handler_blocks_verification_of_consumers() {
        let registry = guarded()
            .on_state("other", Handler::custom(|_, _| HandlerOutcome::NotHandled))
            .build()
            .expect("registry");

        let issues = validate(&registry, &views(), &variables());

        assert_eq!(
            issues,
            [ValidationIssue::OpaqueHandler {
                scope: "state 'other'".to_string()
            }]
        );
    }

    #[test]
    fn custom_handler_without_consumers_is_fine() {
        let registry = Registry::builder()
            .on_state("other", Handler::custom(|_, _| HandlerOutcome::NotHandled))
            .build()
            .expect("registry");
        let variables = VariableResolver::new().with_variable("x", from_fn(|_| String::new()));

        assert!(validate(&registry, &ViewCatalog::new(), &variables).is_empty());
    }

    #[test]
    fn intents_from_includes_globals() {
        let registry = guarded().build().expect("registry");
        let intents: Vec<_> = intents_from(&registry, "filled")
            .into_iter()
            .map(IntentName::as_str)
            .collect();
        assert_eq!(intents, ["Begin", "Details", "Next"]);
    }
}
