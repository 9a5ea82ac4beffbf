//! Permission checking methods

use std::collections::BTreeMap;
use tracing::debug;

use super::system::Authorizer;
use super::types::{Action, AuthzDecision, Feature};

impl Authorizer {
    /// Decide whether `role` may perform `action` on `resource` in `namespace`.
    ///
    /// Deny rules are scanned first and any match denies; then the first
    /// matching allow rule allows; otherwise the request is denied. An empty
    /// namespace denotes a cluster-scoped resource.
    pub fn is_allowed(
        &self,
        role: &str,
        resource: &str,
        action: Action,
        namespace: &str,
    ) -> AuthzDecision {
        let Some(definition) = self.lookup(role) else {
            return AuthzDecision::deny(format!("unknown role: {}", role));
        };

        if definition
            .deny
            .iter()
            .any(|rule| rule.matches(resource, action, namespace))
        {
            debug!(role, resource, %action, namespace, "matched deny rule");
            return AuthzDecision::deny(format!(
                "denied by deny rule: {} cannot {} {} in {}",
                role, action, resource, namespace
            ));
        }

        if definition
            .allow
            .iter()
            .any(|rule| rule.matches(resource, action, namespace))
        {
            return AuthzDecision::allow();
        }

        AuthzDecision::deny(format!(
            "no allow rule for: {} to {} {} in {}",
            role, action, resource, namespace
        ))
    }

    /// Whether `role` can reach `feature`; denied features override allowed ones
    pub fn is_feature_allowed(&self, role: &str, feature: Feature) -> bool {
        let Some(definition) = self.lookup(role) else {
            return false;
        };

        let listed = |features: &[Feature]| {
            features
                .iter()
                .any(|f| *f == feature || *f == Feature::Any)
        };

        if listed(&definition.denied_features) {
            return false;
        }
        listed(&definition.allowed_features)
    }

    /// Allowed/denied map over every concrete feature for `role`
    pub fn feature_permissions(&self, role: &str) -> BTreeMap<Feature, bool> {
        Feature::ALL
            .into_iter()
            .map(|feature| (feature, self.is_feature_allowed(role, feature)))
            .collect()
    }
}
