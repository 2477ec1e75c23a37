//! Declaring QoS policies as read-only parameters.
//!
//! For a publisher on `/chatter` with id `sensor1`, overriding depth declares:
//!
//! ```text
//! name:        qos_overrides./chatter.publisher_sensor1.depth
//! description: qos policy {depth} for publisher {/chatter} with id {sensor1}
//! ```
//!
//! Each declaration uses the profile's current setting as default, and the
//! value the parameter store resolves (default or pre-supplied override) is
//! written back into the profile.
//!
//! Policies are applied one at a time. If declaration fails part way, or the
//! validation callback rejects the result, the profile keeps the policies that
//! were already applied. [`resolve_qos`] works on a copy for callers that
//! need all-or-nothing.

use tracing::{debug, info, warn};

use crate::codec::PolicyCodec;
use crate::entity::EntityPolicySet;
use crate::error::{QosOverrideError, Result};
use crate::options::QosOverridingOptions;
use crate::parameter::{ParameterDeclarer, ParameterDescriptor};
use crate::qos::QosProfile;

pub const PARAMETER_NAMESPACE: &str = "qos_overrides";

/// `qos_overrides.<topic>.<entity_type>[_<id>].`
pub fn parameter_prefix(topic_name: &str, entity_type: &str, id: &str) -> String {
    let mut prefix = format!("{PARAMETER_NAMESPACE}.{topic_name}.{entity_type}");
    if !id.is_empty() {
        prefix.push('_');
        prefix.push_str(id);
    }
    prefix.push('.');
    prefix
}

/// `} for <entity_type> {<topic>}[ with id {<id>}]`, appended after the policy
/// kind in each description.
pub fn description_suffix(topic_name: &str, entity_type: &str, id: &str) -> String {
    let mut suffix = format!("}} for {entity_type} {{{topic_name}}}");
    if !id.is_empty() {
        suffix.push_str(&format!(" with id {{{id}}}"));
    }
    suffix
}

/// Declare the requested QoS parameters for an entity and apply their values
/// to `qos`, using the standard policy codec.
///
/// Only kinds present in both `entity.allowed_policies` and
/// `options.policy_kinds` are declared; the others are left untouched.
pub fn declare_qos_parameters(
    options: &QosOverridingOptions,
    params: &mut dyn ParameterDeclarer,
    topic_name: &str,
    qos: &mut QosProfile,
    entity: &EntityPolicySet,
) -> Result<()> {
    declare_qos_parameters_with(PolicyCodec::standard(), options, params, topic_name, qos, entity)
}

/// Same as [`declare_qos_parameters`] with an explicit codec table.
pub fn declare_qos_parameters_with(
    codec: &PolicyCodec,
    options: &QosOverridingOptions,
    params: &mut dyn ParameterDeclarer,
    topic_name: &str,
    qos: &mut QosProfile,
    entity: &EntityPolicySet,
) -> Result<()> {
    let prefix = parameter_prefix(topic_name, entity.entity_type, &options.id);
    let description_suffix = description_suffix(topic_name, entity.entity_type, &options.id);

    for &kind in entity.allowed_policies {
        if !options.contains(kind) {
            continue;
        }

        let name = format!("{prefix}{kind}");
        let descriptor = ParameterDescriptor::default()
            .with_description(format!("qos policy {{{kind}{description_suffix}"))
            .read_only();
        let default = codec.encode(kind, qos)?;

        debug!("[QOS] Declaring '{}' (default: {})", name, default);
        let value = params.declare_parameter(&name, default.clone(), descriptor)?;
        if value != default {
            info!("[QOS] '{}' overridden: {} -> {}", name, default, value);
        }

        codec.apply(kind, &value, qos)?;
    }

    if let Some(callback) = &options.validation_callback
        && !callback(qos)
    {
        warn!(
            "[QOS] Validation callback rejected {} for {} {}",
            qos, entity.entity_type, topic_name
        );
        return Err(QosOverrideError::InvalidQosOverrides(
            "validation callback failed".into(),
        ));
    }

    Ok(())
}

/// [`declare_qos_parameters`] for a publisher.
pub fn declare_publisher_qos_parameters(
    options: &QosOverridingOptions,
    params: &mut dyn ParameterDeclarer,
    topic_name: &str,
    qos: &mut QosProfile,
) -> Result<()> {
    declare_qos_parameters(options, params, topic_name, qos, &EntityPolicySet::PUBLISHER)
}

/// [`declare_qos_parameters`] for a subscription.
pub fn declare_subscription_qos_parameters(
    options: &QosOverridingOptions,
    params: &mut dyn ParameterDeclarer,
    topic_name: &str,
    qos: &mut QosProfile,
) -> Result<()> {
    declare_qos_parameters(options, params, topic_name, qos, &EntityPolicySet::SUBSCRIPTION)
}

/// Compute the QoS an entity should be created with.
///
/// Returns `qos` unchanged when no policies are requested, or when policies
/// are requested but no parameter interface is available (a warning is
/// logged). Otherwise the overrides are declared on a copy, so on error the
/// caller's profile is never partially modified.
pub fn resolve_qos(
    options: &QosOverridingOptions,
    params: Option<&mut dyn ParameterDeclarer>,
    topic_name: &str,
    qos: &QosProfile,
    entity: &EntityPolicySet,
) -> Result<QosProfile> {
    if !options.is_enabled() {
        return Ok(*qos);
    }

    let Some(params) = params else {
        warn!("[QOS] qos override options ignored because no parameter interface was provided");
        return Ok(*qos);
    };

    let mut actual_qos = *qos;
    declare_qos_parameters(options, params, topic_name, &mut actual_qos, entity)?;
    Ok(actual_qos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::{ParameterStore, ParameterValue};
    use crate::policy::QosPolicyKind;
    use crate::qos::QosReliability;

    #[test]
    fn test_prefix_and_suffix() {
        assert_eq!(
            parameter_prefix("chatter", "publisher", ""),
            "qos_overrides.chatter.publisher."
        );
        assert_eq!(
            parameter_prefix("chatter", "publisher", "sensor1"),
            "qos_overrides.chatter.publisher_sensor1."
        );
        assert_eq!(
            description_suffix("/chatter", "subscription", ""),
            "} for subscription {/chatter}"
        );
        assert_eq!(
            description_suffix("/chatter", "subscription", "a"),
            "} for subscription {/chatter} with id {a}"
        );
    }

    #[test]
    fn test_resolve_disabled_declares_nothing() {
        let mut store = ParameterStore::new();
        let qos = QosProfile::default();
        let actual = resolve_qos(
            &QosOverridingOptions::default(),
            Some(&mut store),
            "chatter",
            &qos,
            &EntityPolicySet::PUBLISHER,
        )
        .unwrap();
        assert_eq!(actual, qos);
        assert!(store.names_with_prefix("").is_empty());
    }

    #[test]
    fn test_resolve_without_parameter_interface() {
        let qos = QosProfile::default();
        let actual = resolve_qos(
            &QosOverridingOptions::with_default_policies(),
            None,
            "chatter",
            &qos,
            &EntityPolicySet::PUBLISHER,
        )
        .unwrap();
        assert_eq!(actual, qos);
    }

    #[test]
    fn test_resolve_applies_overrides_to_copy() {
        let mut store = ParameterStore::new();
        store.add_override("qos_overrides.chatter.subscription.reliability", "best_effort");
        let qos = QosProfile::default();
        let actual = resolve_qos(
            &QosOverridingOptions::new([QosPolicyKind::Reliability]),
            Some(&mut store),
            "chatter",
            &qos,
            &EntityPolicySet::SUBSCRIPTION,
        )
        .unwrap();
        assert_eq!(actual.reliability, QosReliability::BestEffort);
        assert_eq!(qos.reliability, QosReliability::Reliable);
        assert_eq!(
            store.get("qos_overrides.chatter.subscription.reliability"),
            Some(ParameterValue::String("best_effort".into()))
        );
    }

    #[test]
    fn test_resolve_error_leaves_profile_untouched() {
        let mut store = ParameterStore::new();
        store.add_override("qos_overrides.chatter.publisher.depth", 3i64);
        store.add_override("qos_overrides.chatter.publisher.reliability", "nope");
        let qos = QosProfile::default();
        let err = resolve_qos(
            &QosOverridingOptions::new([QosPolicyKind::Depth, QosPolicyKind::Reliability]),
            Some(&mut store),
            "chatter",
            &qos,
            &EntityPolicySet::PUBLISHER,
        )
        .unwrap_err();
        assert_eq!(
            err,
            QosOverrideError::UnknownOverrideValue {
                kind: QosPolicyKind::Reliability,
                value: "nope".into(),
            }
        );
        assert_eq!(
            store.get("qos_overrides.chatter.publisher.depth"),
            Some(ParameterValue::Integer(3))
        );
        assert_eq!(qos, QosProfile::default());
    }
}
