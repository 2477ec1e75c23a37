//! QoS policy kinds that can be exposed as parameters.

/// One overridable dimension of a [`QosProfile`](crate::qos::QosProfile).
///
/// The string form (`depth`, `reliability`, ...) is the last segment of the
/// declared parameter name.
#[derive(
    Debug,
    Hash,
    PartialEq,
    Eq,
    Clone,
    Copy,
    strum::EnumString,
    strum::Display,
    strum::IntoStaticStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum QosPolicyKind {
    AvoidRosNamespaceConventions,
    Deadline,
    Durability,
    History,
    Depth,
    Lifespan,
    Liveliness,
    LivelinessLeaseDuration,
    Reliability,
}

impl QosPolicyKind {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}
