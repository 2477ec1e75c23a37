//! Caller options selecting which QoS policies become parameters.

use std::fmt;
use std::sync::Arc;

use crate::policy::QosPolicyKind;
use crate::qos::QosProfile;

/// Called once with the fully overridden profile; `false` rejects it.
pub type QosCallback = Arc<dyn Fn(&QosProfile) -> bool + Send + Sync>;

/// Policies made overridable when none are listed explicitly.
pub const DEFAULT_OVERRIDABLE_POLICIES: &[QosPolicyKind] = &[
    QosPolicyKind::History,
    QosPolicyKind::Depth,
    QosPolicyKind::Reliability,
];

/// Options passed when creating a publisher or subscription to make some of
/// its QoS policies overridable through parameters.
///
/// The default value declares nothing, so the QoS profile is used as given.
///
/// ```
/// use ros_z_qos::{QosOverridingOptions, QosPolicyKind};
///
/// let options = QosOverridingOptions::new([QosPolicyKind::Reliability, QosPolicyKind::Depth])
///     .with_id("sensor1")
///     .with_validation_callback(|qos| qos.depth > 0);
/// assert!(options.is_enabled());
/// ```
#[derive(Clone, Default)]
pub struct QosOverridingOptions {
    /// Disambiguates several entities on the same topic.
    pub id: String,
    /// Policy kinds that may be reconfigured.
    pub policy_kinds: Vec<QosPolicyKind>,
    pub validation_callback: Option<QosCallback>,
}

impl QosOverridingOptions {
    pub fn new(policy_kinds: impl IntoIterator<Item = QosPolicyKind>) -> Self {
        Self {
            policy_kinds: policy_kinds.into_iter().collect(),
            ..Default::default()
        }
    }

    /// History, depth and reliability.
    pub fn with_default_policies() -> Self {
        Self::new(DEFAULT_OVERRIDABLE_POLICIES.iter().copied())
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_validation_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&QosProfile) -> bool + Send + Sync + 'static,
    {
        self.validation_callback = Some(Arc::new(callback));
        self
    }

    /// Whether any policy was requested.
    pub fn is_enabled(&self) -> bool {
        !self.policy_kinds.is_empty()
    }

    pub fn contains(&self, kind: QosPolicyKind) -> bool {
        self.policy_kinds.contains(&kind)
    }
}

impl fmt::Debug for QosOverridingOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QosOverridingOptions")
            .field("id", &self.id)
            .field("policy_kinds", &self.policy_kinds)
            .field("validation_callback", &self.validation_callback.is_some())
            .finish()
    }
}
