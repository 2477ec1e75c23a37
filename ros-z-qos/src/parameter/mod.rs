//! Parameter seam used to expose QoS policies.
//!
//! The override protocol only needs one capability from a parameter
//! subsystem: declare a parameter with a default and get back the value that
//! is actually in effect. That capability is [`ParameterDeclarer`].
//! [`ParameterStore`] is an in-memory implementation seeded from parameter
//! overrides, typically loaded with [`yaml::load_parameter_file`].

pub mod store;
pub mod types;
pub mod yaml;

pub use store::ParameterStore;
pub use types::{ParameterDescriptor, ParameterType, ParameterValue};

/// Errors raised by a parameter store.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParameterError {
    #[error("parameter '{0}' already declared")]
    AlreadyDeclared(String),

    #[error("parameter '{0}' not declared")]
    NotDeclared(String),

    #[error("parameter '{0}' is read-only")]
    ReadOnly(String),

    #[error("parameter '{name}': type mismatch, expected {expected} but got {actual}")]
    TypeMismatch {
        name: String,
        expected: ParameterType,
        actual: ParameterType,
    },
}

/// Capability to declare parameters.
///
/// Implementations must return the resolved value: a pre-supplied override
/// for `name` if one exists, otherwise `default`. They must also reject later
/// external writes to parameters declared with `descriptor.read_only`.
pub trait ParameterDeclarer {
    fn declare_parameter(
        &mut self,
        name: &str,
        default: ParameterValue,
        descriptor: ParameterDescriptor,
    ) -> Result<ParameterValue, ParameterError>;
}
