//! ROS 2-style YAML parameter file loading.
//!
//! Supports the standard ROS 2 parameter file format:
//!
//! ```yaml
//! /**:
//!   ros__parameters:
//!     qos_overrides:
//!       /chatter:
//!         publisher:
//!           reliability: best_effort
//!           depth: 5
//!
//! /my_ns/my_node:
//!   ros__parameters:
//!     qos_overrides./chatter.subscription.durability: transient_local
//! ```
//!
//! Nested mappings flatten into dot-separated names, so both entries above
//! produce `qos_overrides./chatter.<entity>.<policy>` parameters.
//! Node patterns support wildcards: `/**` matches all nodes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use tracing::warn;

use super::types::ParameterValue;

const PARAMETERS_KEY: &str = "ros__parameters";

#[derive(Debug, thiserror::Error)]
pub enum ParameterFileError {
    #[error("failed to read parameter file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid parameter file layout: {0}")]
    Layout(String),
}

/// Load parameter overrides from a YAML file for the given node.
///
/// Returns a map of parameter name → value containing only the parameters
/// applicable to the specified node (by its fully-qualified name).
pub fn load_parameter_file(
    path: &Path,
    node_fqn: &str,
) -> Result<HashMap<String, ParameterValue>, ParameterFileError> {
    let content = std::fs::read_to_string(path).map_err(|source| ParameterFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_parameter_string(&content, node_fqn)
}

/// Parse a YAML string and extract parameter overrides for the given node.
pub fn load_parameter_string(
    yaml: &str,
    node_fqn: &str,
) -> Result<HashMap<String, ParameterValue>, ParameterFileError> {
    let doc: Value = serde_yaml::from_str(yaml)?;

    let mapping = doc
        .as_mapping()
        .ok_or_else(|| ParameterFileError::Layout("YAML root must be a mapping".into()))?;

    let mut result = HashMap::new();

    for (key, node_val) in mapping {
        let selector = key
            .as_str()
            .ok_or_else(|| ParameterFileError::Layout("YAML keys must be strings".into()))?;

        if !matches_node(selector, node_fqn) {
            continue;
        }

        let node_map = node_val.as_mapping().ok_or_else(|| {
            ParameterFileError::Layout(format!("value for '{}' must be a mapping", selector))
        })?;

        if let Some(params) = node_map.get(PARAMETERS_KEY) {
            let params_map = params.as_mapping().ok_or_else(|| {
                ParameterFileError::Layout(format!("{} must be a mapping", PARAMETERS_KEY))
            })?;
            // Later entries override earlier ones (more specific selectors win)
            flatten_into("", params_map, &mut result)?;
        }
    }

    Ok(result)
}

fn flatten_into(
    prefix: &str,
    map: &Mapping,
    out: &mut HashMap<String, ParameterValue>,
) -> Result<(), ParameterFileError> {
    for (pname, pval) in map {
        let name = pname
            .as_str()
            .ok_or_else(|| ParameterFileError::Layout("parameter names must be strings".into()))?;
        let full_name = if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", prefix, name)
        };

        if let Value::Mapping(nested) = pval {
            flatten_into(&full_name, nested, out)?;
            continue;
        }

        match yaml_value_to_parameter(pval) {
            Some(value) => {
                out.insert(full_name, value);
            }
            None => warn!("[PARAMS] Skipping unsupported value for '{}'", full_name),
        }
    }
    Ok(())
}

/// Check whether a node selector matches the given fully-qualified node name.
///
/// Selectors:
/// - `/**` — matches any node
/// - `/some_ns/**` — matches any node under `/some_ns/`
/// - `/some_ns/*` — matches nodes directly under `/some_ns/`
/// - `/node_name` or `/ns/node_name` — exact match
fn matches_node(selector: &str, node_fqn: &str) -> bool {
    if selector == "/**" || selector == "**" {
        return true;
    }

    if let Some(prefix) = selector.strip_suffix("/**") {
        return node_fqn
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'));
    }

    if let Some(prefix) = selector.strip_suffix("/*") {
        // Match one level: /ns/* matches /ns/foo but not /ns/foo/bar
        let Some(rest) = node_fqn.strip_prefix(prefix) else {
            return false;
        };
        let Some(rest) = rest.strip_prefix('/') else {
            return false;
        };
        return !rest.is_empty() && !rest.contains('/');
    }

    selector == node_fqn
}

/// Convert a scalar YAML value to a ParameterValue.
fn yaml_value_to_parameter(val: &Value) -> Option<ParameterValue> {
    match val {
        Value::Bool(b) => Some(ParameterValue::Bool(*b)),
        Value::Number(n) => n
            .as_i64()
            .map(ParameterValue::Integer)
            .or_else(|| n.as_f64().map(ParameterValue::Double)),
        Value::String(s) => Some(ParameterValue::String(s.clone())),
        Value::Null => Some(ParameterValue::NotSet),
        _ => None,
    }
}
