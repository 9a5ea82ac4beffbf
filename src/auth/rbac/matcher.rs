//! Resource and namespace pattern matching

use super::types::{Action, ResourceRule};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Resource or namespace pattern.
///
/// `*` matches anything, a trailing `*` is a prefix match, anything else is an
/// exact match. Matching is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Pattern {
    Any,
    Prefix(String),
    Exact(String),
}

impl Pattern {
    pub fn parse(raw: &str) -> Self {
        if raw == "*" {
            return Pattern::Any;
        }
        let lowered = raw.to_lowercase();
        match lowered.strip_suffix('*') {
            Some(prefix) => Pattern::Prefix(prefix.to_string()),
            None => Pattern::Exact(lowered),
        }
    }

    /// `value` must already be lowercased
    fn matches_lowered(&self, value: &str) -> bool {
        match self {
            Pattern::Any => true,
            Pattern::Prefix(prefix) => value.starts_with(prefix.as_str()),
            Pattern::Exact(exact) => value == exact,
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        self.matches_lowered(&value.to_lowercase())
    }
}

impl From<String> for Pattern {
    fn from(raw: String) -> Self {
        Pattern::parse(&raw)
    }
}

impl From<&str> for Pattern {
    fn from(raw: &str) -> Self {
        Pattern::parse(raw)
    }
}

impl From<Pattern> for String {
    fn from(pattern: Pattern) -> Self {
        pattern.to_string()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Any => f.write_str("*"),
            Pattern::Prefix(prefix) => write!(f, "{}*", prefix),
            Pattern::Exact(exact) => f.write_str(exact),
        }
    }
}

impl ResourceRule {
    /// Whether the rule covers `(resource, action, namespace)`
    pub fn matches(&self, resource: &str, action: Action, namespace: &str) -> bool {
        matches_resources(&self.resources, resource)
            && matches_actions(&self.actions, action)
            && matches_namespaces(&self.namespaces, namespace)
    }
}

fn matches_resources(patterns: &[Pattern], resource: &str) -> bool {
    let resource = resource.to_lowercase();
    patterns.iter().any(|p| p.matches_lowered(&resource))
}

fn matches_actions(actions: &[Action], target: Action) -> bool {
    actions.iter().any(|a| *a == target || *a == Action::Any)
}

fn matches_namespaces(patterns: &[Pattern], namespace: &str) -> bool {
    // Cluster-scoped resources have no namespace and bypass namespace filtering
    if namespace.is_empty() {
        return true;
    }
    let namespace = namespace.to_lowercase();
    patterns.iter().any(|p| p.matches_lowered(&namespace))
}
