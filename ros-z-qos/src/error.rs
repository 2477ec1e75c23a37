//! Error types for QoS override declaration

use crate::parameter::{ParameterError, ParameterType};
use crate::policy::QosPolicyKind;

pub type Result<T> = std::result::Result<T, QosOverrideError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QosOverrideError {
    #[error("unsupported qos policy kind: {0}")]
    UnsupportedPolicyKind(QosPolicyKind),

    #[error("unknown {kind} qos policy value: {{{value}}}")]
    UnrepresentableDefaultValue { kind: QosPolicyKind, value: String },

    #[error("unknown qos policy {kind} value: {value}")]
    UnknownOverrideValue { kind: QosPolicyKind, value: String },

    #[error("invalid qos overrides: {0}")]
    InvalidQosOverrides(String),

    #[error("qos policy {kind} expects a {expected} parameter, got {actual}")]
    ParameterTypeMismatch {
        kind: QosPolicyKind,
        expected: ParameterType,
        actual: ParameterType,
    },

    #[error("qos policy {kind} value out of range: {value}")]
    OutOfRange { kind: QosPolicyKind, value: i64 },

    #[error(transparent)]
    Parameter(#[from] ParameterError),
}

impl QosOverrideError {
    /// The policy kind the error is about, if any.
    pub fn policy_kind(&self) -> Option<QosPolicyKind> {
        match self {
            Self::UnsupportedPolicyKind(kind)
            | Self::UnrepresentableDefaultValue { kind, .. }
            | Self::UnknownOverrideValue { kind, .. }
            | Self::ParameterTypeMismatch { kind, .. }
            | Self::OutOfRange { kind, .. } => Some(*kind),
            Self::InvalidQosOverrides(_) | Self::Parameter(_) => None,
        }
    }
}
