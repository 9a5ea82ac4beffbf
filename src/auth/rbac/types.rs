//! RBAC type definitions

use super::matcher::Pattern;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operation a role may perform on a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    #[serde(rename = "view")]
    View,
    #[serde(rename = "delete")]
    Delete,
    #[serde(rename = "scale")]
    Scale,
    #[serde(rename = "restart")]
    Restart,
    #[serde(rename = "exec")]
    Exec,
    #[serde(rename = "port-forward")]
    PortForward,
    #[serde(rename = "apply")]
    Apply,
    #[serde(rename = "logs")]
    Logs,
    #[serde(rename = "create")]
    Create,
    #[serde(rename = "edit")]
    Edit,
    /// Matches every action when used inside a rule
    #[serde(rename = "*")]
    Any,
}

impl Action {
    /// Every concrete action
    pub const ALL: [Action; 10] = [
        Action::View,
        Action::Delete,
        Action::Scale,
        Action::Restart,
        Action::Exec,
        Action::PortForward,
        Action::Apply,
        Action::Logs,
        Action::Create,
        Action::Edit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Delete => "delete",
            Action::Scale => "scale",
            Action::Restart => "restart",
            Action::Exec => "exec",
            Action::PortForward => "port-forward",
            Action::Apply => "apply",
            Action::Logs => "logs",
            Action::Create => "create",
            Action::Edit => "edit",
            Action::Any => "*",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "*" {
            return Ok(Action::Any);
        }
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| format!("unknown action: {}", s))
    }
}

/// UI/API capability gate, independent of resource actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Dashboard,
    Topology,
    Metrics,
    HelmManagement,
    SecurityScan,
    AiAssistant,
    Terminal,
    Reports,
    Templates,
    EventTimeline,
    AuditLogs,
    PortForward,
    #[serde(rename = "gitops")]
    GitOps,
    Velero,
    CostEstimate,
    NetworkPolicy,
    RbacViz,
    SettingsGeneral,
    SettingsAdmin,
    SettingsSecurity,
    SettingsNotif,
    /// Matches every feature when used inside a feature list
    #[serde(rename = "*")]
    Any,
}

impl Feature {
    /// Every concrete feature
    pub const ALL: [Feature; 21] = [
        Feature::Dashboard,
        Feature::Topology,
        Feature::Metrics,
        Feature::HelmManagement,
        Feature::SecurityScan,
        Feature::AiAssistant,
        Feature::Terminal,
        Feature::Reports,
        Feature::Templates,
        Feature::EventTimeline,
        Feature::AuditLogs,
        Feature::PortForward,
        Feature::GitOps,
        Feature::Velero,
        Feature::CostEstimate,
        Feature::NetworkPolicy,
        Feature::RbacViz,
        Feature::SettingsGeneral,
        Feature::SettingsAdmin,
        Feature::SettingsSecurity,
        Feature::SettingsNotif,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::Dashboard => "dashboard",
            Feature::Topology => "topology",
            Feature::Metrics => "metrics",
            Feature::HelmManagement => "helm_management",
            Feature::SecurityScan => "security_scan",
            Feature::AiAssistant => "ai_assistant",
            Feature::Terminal => "terminal",
            Feature::Reports => "reports",
            Feature::Templates => "templates",
            Feature::EventTimeline => "event_timeline",
            Feature::AuditLogs => "audit_logs",
            Feature::PortForward => "port_forward",
            Feature::GitOps => "gitops",
            Feature::Velero => "velero",
            Feature::CostEstimate => "cost_estimate",
            Feature::NetworkPolicy => "network_policy",
            Feature::RbacViz => "rbac_viz",
            Feature::SettingsGeneral => "settings_general",
            Feature::SettingsAdmin => "settings_admin",
            Feature::SettingsSecurity => "settings_security",
            Feature::SettingsNotif => "settings_notif",
            Feature::Any => "*",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Permissions for a set of resources, actions and namespaces.
///
/// A request matches only when all three dimensions match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRule {
    /// Resource name patterns, e.g. `pods`, `*`
    #[serde(default)]
    pub resources: Vec<Pattern>,
    /// Actions covered by the rule
    #[serde(default)]
    pub actions: Vec<Action>,
    /// Namespace patterns, e.g. `dev-*`, `*`
    #[serde(default)]
    pub namespaces: Vec<Pattern>,
}

impl ResourceRule {
    pub fn new(resources: &[&str], actions: &[Action], namespaces: &[&str]) -> Self {
        Self {
            resources: resources.iter().map(|r| Pattern::parse(r)).collect(),
            actions: actions.to_vec(),
            namespaces: namespaces.iter().map(|n| Pattern::parse(n)).collect(),
        }
    }
}

/// Named bundle of rules and feature gates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDefinition {
    /// Unique role name
    pub name: String,
    /// Human readable description
    #[serde(default)]
    pub description: String,
    /// Allow rules, scanned in order
    #[serde(default)]
    pub allow: Vec<ResourceRule>,
    /// Deny rules; any match overrides every allow rule
    #[serde(default)]
    pub deny: Vec<ResourceRule>,
    /// Features the role can reach (`*` = all)
    #[serde(default)]
    pub allowed_features: Vec<Feature>,
    /// Features explicitly denied (overrides allowed)
    #[serde(default)]
    pub denied_features: Vec<Feature>,
    /// False for the built-in roles
    #[serde(default)]
    pub is_custom: bool,
}

impl RoleDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            allow: Vec::new(),
            deny: Vec::new(),
            allowed_features: Vec::new(),
            denied_features: Vec::new(),
            is_custom: true,
        }
    }

    pub fn with_allow(mut self, rule: ResourceRule) -> Self {
        self.allow.push(rule);
        self
    }

    pub fn with_deny(mut self, rule: ResourceRule) -> Self {
        self.deny.push(rule);
        self
    }

    pub fn with_allowed_features(mut self, features: &[Feature]) -> Self {
        self.allowed_features.extend_from_slice(features);
        self
    }

    pub fn with_denied_features(mut self, features: &[Feature]) -> Self {
        self.denied_features.extend_from_slice(features);
        self
    }
}

/// Outcome of an authorization check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthzDecision {
    /// Whether the action is permitted
    pub allowed: bool,
    /// Human readable explanation
    pub reason: String,
}

impl AuthzDecision {
    pub(super) fn allow() -> Self {
        Self {
            allowed: true,
            reason: "allowed".to_string(),
        }
    }

    pub(super) fn deny(reason: String) -> Self {
        Self {
            allowed: false,
            reason,
        }
    }
}
