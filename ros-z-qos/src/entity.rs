//! Per-entity sets of overridable policies.

use std::collections::HashMap;

use crate::policy::QosPolicyKind;

/// Which policies an entity kind allows to be overridden, and the label used
/// for it in parameter names and descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityPolicySet {
    pub entity_type: &'static str,
    pub allowed_policies: &'static [QosPolicyKind],
}

impl EntityPolicySet {
    pub const PUBLISHER: EntityPolicySet = EntityPolicySet {
        entity_type: "publisher",
        allowed_policies: &[
            QosPolicyKind::AvoidRosNamespaceConventions,
            QosPolicyKind::Deadline,
            QosPolicyKind::Durability,
            QosPolicyKind::History,
            QosPolicyKind::Depth,
            QosPolicyKind::Lifespan,
            QosPolicyKind::Liveliness,
            QosPolicyKind::LivelinessLeaseDuration,
            QosPolicyKind::Reliability,
        ],
    };

    /// Lifespan is publisher-only.
    pub const SUBSCRIPTION: EntityPolicySet = EntityPolicySet {
        entity_type: "subscription",
        allowed_policies: &[
            QosPolicyKind::AvoidRosNamespaceConventions,
            QosPolicyKind::Deadline,
            QosPolicyKind::Durability,
            QosPolicyKind::History,
            QosPolicyKind::Depth,
            QosPolicyKind::Liveliness,
            QosPolicyKind::LivelinessLeaseDuration,
            QosPolicyKind::Reliability,
        ],
    };

    pub fn allows(&self, kind: QosPolicyKind) -> bool {
        self.allowed_policies.contains(&kind)
    }
}

/// Policy sets keyed by entity type label.
#[derive(Debug, Clone)]
pub struct EntityPolicyRegistry {
    sets: HashMap<&'static str, EntityPolicySet>,
}

impl EntityPolicyRegistry {
    pub fn new() -> Self {
        Self {
            sets: HashMap::new(),
        }
    }

    /// Registry holding the publisher and subscription sets.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(EntityPolicySet::PUBLISHER);
        registry.register(EntityPolicySet::SUBSCRIPTION);
        registry
    }

    /// Add or replace the set for `set.entity_type`.
    pub fn register(&mut self, set: EntityPolicySet) -> Option<EntityPolicySet> {
        self.sets.insert(set.entity_type, set)
    }

    pub fn get(&self, entity_type: &str) -> Option<&EntityPolicySet> {
        self.sets.get(entity_type)
    }
}

impl Default for EntityPolicyRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
