//! Conversion between QoS policies and parameter values.
//!
//! Each policy kind maps to a pair of plain functions: one reads the policy
//! out of a [`QosProfile`] as a [`ParameterValue`], the other writes a
//! parameter value back into the profile. Encodings:
//!
//! | policy kind                          | parameter |
//! |--------------------------------------|-----------|
//! | `avoid_ros_namespace_conventions`    | bool      |
//! | `deadline`, `lifespan`, `liveliness_lease_duration` | integer (ns) |
//! | `depth`                              | integer   |
//! | `durability`, `history`, `liveliness`, `reliability` | string |

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use crate::error::{QosOverrideError, Result};
use crate::parameter::{ParameterType, ParameterValue};
use crate::policy::QosPolicyKind;
use crate::qos::{QosDurability, QosDuration, QosHistory, QosLiveliness, QosProfile, QosReliability};

pub type EncodeFn = fn(&QosProfile) -> Result<ParameterValue>;
pub type ApplyFn = fn(&ParameterValue, &mut QosProfile) -> Result<()>;

/// Encode/apply pair for one policy kind.
#[derive(Clone, Copy)]
pub struct PolicyEntry {
    pub encode: EncodeFn,
    pub apply: ApplyFn,
}

impl fmt::Debug for PolicyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolicyEntry").finish_non_exhaustive()
    }
}

static STANDARD_CODEC: LazyLock<PolicyCodec> = LazyLock::new(|| {
    use QosPolicyKind::*;

    PolicyCodec::empty()
        .with_entry(
            AvoidRosNamespaceConventions,
            PolicyEntry {
                encode: |qos| Ok(ParameterValue::Bool(qos.avoid_ros_namespace_conventions)),
                apply: |value, qos| {
                    qos.avoid_ros_namespace_conventions =
                        expect_bool(AvoidRosNamespaceConventions, value)?;
                    Ok(())
                },
            },
        )
        .with_entry(
            Deadline,
            PolicyEntry {
                encode: |qos| Ok(encode_duration(qos.deadline)),
                apply: |value, qos| {
                    qos.deadline = decode_duration(Deadline, value)?;
                    Ok(())
                },
            },
        )
        .with_entry(
            Durability,
            PolicyEntry {
                encode: |qos| encode_named(Durability, qos.durability),
                apply: |value, qos| {
                    qos.durability = decode_named(Durability, value)?;
                    Ok(())
                },
            },
        )
        .with_entry(
            History,
            PolicyEntry {
                encode: |qos| encode_named(History, qos.history),
                apply: |value, qos| {
                    qos.history = decode_named(History, value)?;
                    Ok(())
                },
            },
        )
        .with_entry(
            Depth,
            PolicyEntry {
                encode: |qos| {
                    let depth = i64::try_from(qos.depth).unwrap_or(i64::MAX);
                    Ok(ParameterValue::Integer(depth))
                },
                apply: |value, qos| {
                    let depth = expect_integer(Depth, value)?;
                    qos.depth = usize::try_from(depth).map_err(|_| QosOverrideError::OutOfRange {
                        kind: Depth,
                        value: depth,
                    })?;
                    Ok(())
                },
            },
        )
        .with_entry(
            Lifespan,
            PolicyEntry {
                encode: |qos| Ok(encode_duration(qos.lifespan)),
                apply: |value, qos| {
                    qos.lifespan = decode_duration(Lifespan, value)?;
                    Ok(())
                },
            },
        )
        .with_entry(
            Liveliness,
            PolicyEntry {
                encode: |qos| encode_named(Liveliness, qos.liveliness),
                apply: |value, qos| {
                    qos.liveliness = decode_named(Liveliness, value)?;
                    Ok(())
                },
            },
        )
        .with_entry(
            LivelinessLeaseDuration,
            PolicyEntry {
                encode: |qos| Ok(encode_duration(qos.liveliness_lease_duration)),
                apply: |value, qos| {
                    qos.liveliness_lease_duration =
                        decode_duration(LivelinessLeaseDuration, value)?;
                    Ok(())
                },
            },
        )
        .with_entry(
            Reliability,
            PolicyEntry {
                encode: |qos| encode_named(Reliability, qos.reliability),
                apply: |value, qos| {
                    qos.reliability = decode_named(Reliability, value)?;
                    Ok(())
                },
            },
        )
});

/// Table of policy conversions keyed by [`QosPolicyKind`].
///
/// [`PolicyCodec::standard`] covers every kind. Custom tables can be built
/// with [`PolicyCodec::empty`] and [`PolicyCodec::with_entry`]; a kind
/// missing from the table fails both directions with
/// [`QosOverrideError::UnsupportedPolicyKind`].
#[derive(Clone, Default)]
pub struct PolicyCodec {
    entries: HashMap<QosPolicyKind, PolicyEntry>,
}

impl PolicyCodec {
    /// The process-wide table covering all policy kinds.
    pub fn standard() -> &'static PolicyCodec {
        &STANDARD_CODEC
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, kind: QosPolicyKind, entry: PolicyEntry) -> Self {
        self.entries.insert(kind, entry);
        self
    }

    pub fn without(mut self, kind: QosPolicyKind) -> Self {
        self.entries.remove(&kind);
        self
    }

    pub fn supports(&self, kind: QosPolicyKind) -> bool {
        self.entries.contains_key(&kind)
    }

    /// Read the current setting of `kind` out of `qos`.
    pub fn encode(&self, kind: QosPolicyKind, qos: &QosProfile) -> Result<ParameterValue> {
        (self.entry(kind)?.encode)(qos)
    }

    /// Write `value` into the `kind` field of `qos`. Other fields are untouched.
    pub fn apply(
        &self,
        kind: QosPolicyKind,
        value: &ParameterValue,
        qos: &mut QosProfile,
    ) -> Result<()> {
        (self.entry(kind)?.apply)(value, qos)
    }

    fn entry(&self, kind: QosPolicyKind) -> Result<&PolicyEntry> {
        self.entries
            .get(&kind)
            .ok_or(QosOverrideError::UnsupportedPolicyKind(kind))
    }
}

impl fmt::Debug for PolicyCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

/// Enumerated policy setting with a canonical string form.
trait NamedPolicy: Copy + fmt::Debug {
    const UNKNOWN: Self;
    fn policy_str(&self) -> Option<&'static str>;
    fn from_policy_str(s: &str) -> Self;
}

macro_rules! impl_named_policy {
    ($($ty:ty),*) => {
        $(
            impl NamedPolicy for $ty {
                const UNKNOWN: Self = <$ty>::Unknown;
                fn policy_str(&self) -> Option<&'static str> {
                    self.as_str()
                }
                fn from_policy_str(s: &str) -> Self {
                    <$ty>::from_policy_str(s)
                }
            }
        )*
    };
}

impl_named_policy!(QosReliability, QosDurability, QosHistory, QosLiveliness);

fn encode_named<T: NamedPolicy>(kind: QosPolicyKind, setting: T) -> Result<ParameterValue> {
    setting
        .policy_str()
        .map(ParameterValue::from)
        .ok_or_else(|| QosOverrideError::UnrepresentableDefaultValue {
            kind,
            value: format!("{:?}", setting),
        })
}

fn decode_named<T: NamedPolicy + PartialEq>(
    kind: QosPolicyKind,
    value: &ParameterValue,
) -> Result<T> {
    let s = expect_str(kind, value)?;
    let setting = T::from_policy_str(s);
    if setting == T::UNKNOWN {
        return Err(QosOverrideError::UnknownOverrideValue {
            kind,
            value: s.to_string(),
        });
    }
    Ok(setting)
}

fn encode_duration(duration: QosDuration) -> ParameterValue {
    ParameterValue::Integer(duration.as_nanos())
}

fn decode_duration(kind: QosPolicyKind, value: &ParameterValue) -> Result<QosDuration> {
    let nanos = expect_integer(kind, value)?;
    QosDuration::try_from_nanos(nanos).ok_or(QosOverrideError::OutOfRange { kind, value: nanos })
}

fn type_mismatch(kind: QosPolicyKind, expected: ParameterType, value: &ParameterValue) -> QosOverrideError {
    QosOverrideError::ParameterTypeMismatch {
        kind,
        expected,
        actual: value.parameter_type(),
    }
}

fn expect_bool(kind: QosPolicyKind, value: &ParameterValue) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| type_mismatch(kind, ParameterType::Bool, value))
}

fn expect_integer(kind: QosPolicyKind, value: &ParameterValue) -> Result<i64> {
    value
        .as_integer()
        .ok_or_else(|| type_mismatch(kind, ParameterType::Integer, value))
}

fn expect_str(kind: QosPolicyKind, value: &ParameterValue) -> Result<&str> {
    value
        .as_str()
        .ok_or_else(|| type_mismatch(kind, ParameterType::String, value))
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    fn custom_profile() -> QosProfile {
        QosProfile {
            reliability: QosReliability::BestEffort,
            durability: QosDurability::TransientLocal,
            history: QosHistory::KeepAll,
            depth: 42,
            deadline: QosDuration::new(1, 5),
            lifespan: QosDuration::new(0, 100),
            liveliness: QosLiveliness::ManualByTopic,
            liveliness_lease_duration: QosDuration::new(3, 0),
            avoid_ros_namespace_conventions: true,
        }
    }

    #[test]
    fn test_round_trip_is_identity() {
        let codec = PolicyCodec::standard();
        for original in [QosProfile::default(), custom_profile()] {
            for kind in QosPolicyKind::iter() {
                let mut qos = original;
                let value = codec.encode(kind, &qos).unwrap();
                codec.apply(kind, &value, &mut qos).unwrap();
                assert_eq!(qos, original, "round trip changed {kind}");
            }
        }
    }

    #[test]
    fn test_round_trip_with_excess_nanoseconds() {
        let codec = PolicyCodec::standard();
        let original = QosProfile {
            deadline: QosDuration::new(0, 1_500_000_000),
            ..QosProfile::default()
        };
        let mut qos = original;
        let value = codec.encode(QosPolicyKind::Deadline, &qos).unwrap();
        assert_eq!(value, ParameterValue::Integer(1_500_000_000));
        codec.apply(QosPolicyKind::Deadline, &value, &mut qos).unwrap();
        assert_eq!(qos, original);
    }

    #[test]
    fn test_encodings() {
        let codec = PolicyCodec::standard();
        let qos = custom_profile();
        assert_eq!(
            codec.encode(QosPolicyKind::AvoidRosNamespaceConventions, &qos),
            Ok(ParameterValue::Bool(true))
        );
        assert_eq!(
            codec.encode(QosPolicyKind::Deadline, &qos),
            Ok(ParameterValue::Integer(1_000_000_005))
        );
        assert_eq!(
            codec.encode(QosPolicyKind::Depth, &qos),
            Ok(ParameterValue::Integer(42))
        );
        assert_eq!(
            codec.encode(QosPolicyKind::Durability, &qos),
            Ok(ParameterValue::String("transient_local".into()))
        );
        assert_eq!(
            codec.encode(QosPolicyKind::History, &qos),
            Ok(ParameterValue::String("keep_all".into()))
        );
        assert_eq!(
            codec.encode(QosPolicyKind::Liveliness, &qos),
            Ok(ParameterValue::String("manual_by_topic".into()))
        );
        assert_eq!(
            codec.encode(QosPolicyKind::Reliability, &qos),
            Ok(ParameterValue::String("best_effort".into()))
        );
        assert_eq!(
            codec.encode(QosPolicyKind::Lifespan, &QosProfile::default()),
            Ok(ParameterValue::Integer(i64::MAX))
        );
    }

    #[test]
    fn test_apply_touches_only_target_field() {
        let codec = PolicyCodec::standard();
        let mut qos = QosProfile::default();
        codec
            .apply(QosPolicyKind::Reliability, &"best_effort".into(), &mut qos)
            .unwrap();
        assert_eq!(
            qos,
            QosProfile {
                reliability: QosReliability::BestEffort,
                ..QosProfile::default()
            }
        );

        codec
            .apply(QosPolicyKind::Lifespan, &ParameterValue::Integer(1_500_000_000), &mut qos)
            .unwrap();
        assert_eq!(qos.lifespan, QosDuration::new(1, 500_000_000));
        assert_eq!(qos.deadline, QosDuration::INFINITE);
    }

    #[test]
    fn test_unrepresentable_default() {
        let codec = PolicyCodec::standard();
        let qos = QosProfile {
            liveliness: QosLiveliness::ManualByNode,
            reliability: QosReliability::Unknown,
            ..Default::default()
        };
        let err = codec.encode(QosPolicyKind::Liveliness, &qos).unwrap_err();
        assert_eq!(
            err,
            QosOverrideError::UnrepresentableDefaultValue {
                kind: QosPolicyKind::Liveliness,
                value: "ManualByNode".into(),
            }
        );
        assert!(matches!(
            codec.encode(QosPolicyKind::Reliability, &qos),
            Err(QosOverrideError::UnrepresentableDefaultValue {
                kind: QosPolicyKind::Reliability,
                ..
            })
        ));
    }

    #[test]
    fn test_unknown_override_string() {
        let codec = PolicyCodec::standard();
        for kind in [
            QosPolicyKind::Durability,
            QosPolicyKind::History,
            QosPolicyKind::Liveliness,
            QosPolicyKind::Reliability,
        ] {
            let mut qos = QosProfile::default();
            let err = codec
                .apply(kind, &"unknown_policy_value".into(), &mut qos)
                .unwrap_err();
            assert_eq!(
                err,
                QosOverrideError::UnknownOverrideValue {
                    kind,
                    value: "unknown_policy_value".into(),
                }
            );
            assert_eq!(qos, QosProfile::default());
        }
    }

    #[test]
    fn test_type_mismatch() {
        let codec = PolicyCodec::standard();
        let mut qos = QosProfile::default();
        assert_eq!(
            codec.apply(QosPolicyKind::Reliability, &ParameterValue::Integer(1), &mut qos),
            Err(QosOverrideError::ParameterTypeMismatch {
                kind: QosPolicyKind::Reliability,
                expected: ParameterType::String,
                actual: ParameterType::Integer,
            })
        );
        assert!(matches!(
            codec.apply(QosPolicyKind::Depth, &ParameterValue::Double(1.0), &mut qos),
            Err(QosOverrideError::ParameterTypeMismatch { .. })
        ));
        assert!(matches!(
            codec.apply(
                QosPolicyKind::AvoidRosNamespaceConventions,
                &ParameterValue::NotSet,
                &mut qos
            ),
            Err(QosOverrideError::ParameterTypeMismatch { .. })
        ));
    }

    #[test]
    fn test_out_of_range() {
        let codec = PolicyCodec::standard();
        let mut qos = QosProfile::default();
        assert_eq!(
            codec.apply(QosPolicyKind::Depth, &ParameterValue::Integer(-1), &mut qos),
            Err(QosOverrideError::OutOfRange {
                kind: QosPolicyKind::Depth,
                value: -1,
            })
        );
        assert!(matches!(
            codec.apply(QosPolicyKind::Deadline, &ParameterValue::Integer(-5), &mut qos),
            Err(QosOverrideError::OutOfRange { .. })
        ));
        assert_eq!(qos, QosProfile::default());
    }

    #[test]
    fn test_unsupported_kind() {
        let codec = PolicyCodec::standard().clone().without(QosPolicyKind::Lifespan);
        assert!(!codec.supports(QosPolicyKind::Lifespan));
        let mut qos = QosProfile::default();
        assert_eq!(
            codec.encode(QosPolicyKind::Lifespan, &qos),
            Err(QosOverrideError::UnsupportedPolicyKind(QosPolicyKind::Lifespan))
        );
        assert_eq!(
            codec.apply(QosPolicyKind::Lifespan, &ParameterValue::Integer(1), &mut qos),
            Err(QosOverrideError::UnsupportedPolicyKind(QosPolicyKind::Lifespan))
        );
        assert!(PolicyCodec::empty().encode(QosPolicyKind::Depth, &qos).is_err());
    }

    #[test]
    fn test_standard_covers_every_kind() {
        let codec = PolicyCodec::standard();
        assert!(QosPolicyKind::iter().all(|kind| codec.supports(kind)));
    }
}
