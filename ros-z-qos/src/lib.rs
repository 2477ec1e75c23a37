//! Expose QoS policies of publishers and subscriptions as parameters.
//!
//! A caller creating an entity passes its QoS profile together with
//! [`QosOverridingOptions`]. Each requested policy is declared as a read-only
//! parameter named `qos_overrides.<topic>.<entity>[_<id>].<policy>`, with the
//! profile's setting as default, and whatever value the parameter store
//! resolves is written back into the profile.
//!
//! ```
//! use ros_z_qos::{
//!     ParameterStore, QosOverridingOptions, QosProfile, QosReliability,
//!     declare_publisher_qos_parameters,
//! };
//!
//! let mut store = ParameterStore::new();
//! store.add_override("qos_overrides./chatter.publisher.reliability", "best_effort");
//!
//! let mut qos = QosProfile::keep_last(10);
//! declare_publisher_qos_parameters(
//!     &QosOverridingOptions::with_default_policies(),
//!     &mut store,
//!     "/chatter",
//!     &mut qos,
//! )?;
//! assert_eq!(qos.reliability, QosReliability::BestEffort);
//! # Ok::<(), ros_z_qos::QosOverrideError>(())
//! ```

pub mod codec;
pub mod entity;
pub mod error;
pub mod options;
pub mod overrides;
pub mod parameter;
pub mod policy;
pub mod qos;

pub use codec::{PolicyCodec, PolicyEntry};
pub use entity::{EntityPolicyRegistry, EntityPolicySet};
pub use error::{QosOverrideError, Result};
pub use options::{QosCallback, QosOverridingOptions};
pub use overrides::{
    declare_publisher_qos_parameters, declare_qos_parameters, declare_qos_parameters_with,
    declare_subscription_qos_parameters, resolve_qos,
};
pub use parameter::{
    ParameterDeclarer, ParameterDescriptor, ParameterError, ParameterStore, ParameterType,
    ParameterValue,
};
pub use policy::QosPolicyKind;
pub use qos::{QosDurability, QosDuration, QosHistory, QosLiveliness, QosProfile, QosReliability};
