//! In-memory parameter storage.
//!
//! `ParameterStore` holds declared parameters and the overrides that were
//! supplied before declaration. It enforces type and read-only restrictions.

use std::collections::HashMap;

use tracing::debug;

use super::types::{ParameterDescriptor, ParameterType, ParameterValue};
use super::{ParameterDeclarer, ParameterError};

#[derive(Debug, Clone)]
struct ParameterEntry {
    value: ParameterValue,
    descriptor: ParameterDescriptor,
}

/// Parameter store holding all declared parameters for a node.
#[derive(Debug, Default)]
pub struct ParameterStore {
    parameters: HashMap<String, ParameterEntry>,
    /// Parameter overrides applied at declaration time.
    overrides: HashMap<String, ParameterValue>,
}

impl ParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_overrides(overrides: HashMap<String, ParameterValue>) -> Self {
        Self {
            parameters: HashMap::new(),
            overrides,
        }
    }

    /// Add an override to be picked up by a later declaration of `name`.
    pub fn add_override(&mut self, name: impl Into<String>, value: impl Into<ParameterValue>) {
        self.overrides.insert(name.into(), value.into());
    }

    /// Declare a parameter with a default value and descriptor.
    ///
    /// If an override exists for this parameter name, it is consumed and used
    /// instead of the default. Returns the actual initial value.
    pub fn declare(
        &mut self,
        name: &str,
        default: ParameterValue,
        mut descriptor: ParameterDescriptor,
    ) -> Result<ParameterValue, ParameterError> {
        if self.parameters.contains_key(name) {
            return Err(ParameterError::AlreadyDeclared(name.to_string()));
        }

        if descriptor.type_ == ParameterType::NotSet {
            descriptor.type_ = default.parameter_type();
        }

        let initial_value = match self.overrides.remove(name) {
            Some(value)
                if descriptor.type_ != ParameterType::NotSet
                    && value.parameter_type() != descriptor.type_ =>
            {
                let actual = value.parameter_type();
                self.overrides.insert(name.to_string(), value);
                return Err(ParameterError::TypeMismatch {
                    name: name.to_string(),
                    expected: descriptor.type_,
                    actual,
                });
            }
            Some(value) => {
                debug!("[PARAMS] Using override for '{}'", name);
                value
            }
            None => default,
        };

        descriptor.name = name.to_string();
        self.parameters.insert(
            name.to_string(),
            ParameterEntry {
                value: initial_value.clone(),
                descriptor,
            },
        );

        Ok(initial_value)
    }

    /// Get the value of a parameter.
    pub fn get(&self, name: &str) -> Option<ParameterValue> {
        self.parameters.get(name).map(|e| e.value.clone())
    }

    /// Get the descriptor of a parameter.
    pub fn describe(&self, name: &str) -> Option<ParameterDescriptor> {
        self.parameters.get(name).map(|e| e.descriptor.clone())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.parameters.contains_key(name)
    }

    /// Set the value of a declared parameter, returning the previous value.
    pub fn set(&mut self, name: &str, value: ParameterValue) -> Result<ParameterValue, ParameterError> {
        let entry = self
            .parameters
            .get_mut(name)
            .ok_or_else(|| ParameterError::NotDeclared(name.to_string()))?;

        if entry.descriptor.read_only {
            return Err(ParameterError::ReadOnly(name.to_string()));
        }

        if entry.descriptor.type_ != ParameterType::NotSet
            && value.parameter_type() != entry.descriptor.type_
        {
            return Err(ParameterError::TypeMismatch {
                name: name.to_string(),
                expected: entry.descriptor.type_,
                actual: value.parameter_type(),
            });
        }

        Ok(std::mem::replace(&mut entry.value, value))
    }

    /// Sorted names of declared parameters equal to `prefix` or below it.
    pub fn names_with_prefix(&self, prefix: &str) -> Vec<String> {
        let dotted = format!("{}.", prefix);
        let mut names: Vec<String> = self
            .parameters
            .keys()
            .filter(|name| prefix.is_empty() || *name == prefix || name.starts_with(&dotted))
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Overrides that no declaration has consumed yet.
    pub fn pending_overrides(&self) -> impl Iterator<Item = (&str, &ParameterValue)> {
        self.overrides.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl ParameterDeclarer for ParameterStore {
    fn declare_parameter(
        &mut self,
        name: &str,
        default: ParameterValue,
        descriptor: ParameterDescriptor,
    ) -> Result<ParameterValue, ParameterError> {
        self.declare(name, default, descriptor)
    }
}
