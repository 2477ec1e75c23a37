//! QoS overrides loaded from ROS 2 parameter files.

use std::io::Write;

use ros_z_qos::parameter::yaml::{ParameterFileError, load_parameter_file};
use ros_z_qos::{
    ParameterStore, QosDurability, QosDuration, QosOverrideError, QosOverridingOptions,
    QosPolicyKind, QosProfile, QosReliability, declare_publisher_qos_parameters,
    declare_subscription_qos_parameters,
};

const PARAMS_YAML: &str = r#"
/**:
  ros__parameters:
    qos_overrides:
      /chatter:
        publisher:
          reliability: best_effort
          depth: 3
        subscription_listener:
          durability: transient_local
          deadline: 100000000

/talker:
  ros__parameters:
    qos_overrides./chatter.publisher.depth: 8
"#;

fn write_params(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write params");
    file
}

#[test]
fn test_publisher_overrides_from_file() {
    let file = write_params(PARAMS_YAML);
    let overrides = load_parameter_file(file.path(), "/talker").unwrap();
    let mut store = ParameterStore::with_overrides(overrides);
    let mut qos = QosProfile::keep_last(10);

    declare_publisher_qos_parameters(
        &QosOverridingOptions::with_default_policies(),
        &mut store,
        "/chatter",
        &mut qos,
    )
    .unwrap();

    assert_eq!(qos.reliability, QosReliability::BestEffort);
    // node-specific section wins over the wildcard one
    assert_eq!(qos.depth, 8);
}

#[test]
fn test_subscription_overrides_with_id_from_file() {
    let file = write_params(PARAMS_YAML);
    let overrides = load_parameter_file(file.path(), "/listener").unwrap();
    let mut store = ParameterStore::with_overrides(overrides);
    let mut qos = QosProfile::default();

    declare_subscription_qos_parameters(
        &QosOverridingOptions::new([QosPolicyKind::Durability, QosPolicyKind::Deadline])
            .with_id("listener"),
        &mut store,
        "/chatter",
        &mut qos,
    )
    .unwrap();

    assert_eq!(qos.durability, QosDurability::TransientLocal);
    assert_eq!(qos.deadline, QosDuration::new(0, 100_000_000));
    // publisher entries do not leak into the subscription
    assert_eq!(qos.reliability, QosReliability::Reliable);
    assert_eq!(store.pending_overrides().count(), 2);
}

#[test]
fn test_bad_policy_string_in_file() {
    let file = write_params(
        r#"
/**:
  ros__parameters:
    qos_overrides./chatter.publisher.reliability: sometimes
"#,
    );
    let overrides = load_parameter_file(file.path(), "/talker").unwrap();
    let mut store = ParameterStore::with_overrides(overrides);
    let mut qos = QosProfile::default();

    let err = declare_publisher_qos_parameters(
        &QosOverridingOptions::with_default_policies(),
        &mut store,
        "/chatter",
        &mut qos,
    )
    .unwrap_err();

    assert_eq!(
        err,
        QosOverrideError::UnknownOverrideValue {
            kind: QosPolicyKind::Reliability,
            value: "sometimes".into(),
        }
    );
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_parameter_file(&dir.path().join("missing.yaml"), "/talker").unwrap_err();
    assert!(matches!(err, ParameterFileError::Io { .. }));
}
