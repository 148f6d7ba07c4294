//! Validation-time error surface.
//!
//! Two families: `ArgumentError` for malformed input to the engine
//! itself (non-container constructor arguments, cast targets with no
//! conversion) and `ValidationError` for records that violate their
//! schema. Validation errors are raised at the first failing attribute;
//! nothing is aggregated.

use serde_json::Value;
use thiserror::Error;

use crate::value::{Key, ValueKind};

/// Result type for validation operations.
pub type ValidateResult<T> = Result<T, Error>;

/// Sub-kind of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKind {
    /// Required attribute missing or Null
    Presence,
    /// Value's runtime kind violates the declared constraint
    TypeMismatch,
    /// A collection value holds an element of the wrong kind
    CollectionElementMismatch,
    /// Value outside the declared one_of set
    OneOfViolation,
    /// A custom validator returned false
    CustomValidationFailure,
    /// Input key outside the declared key set
    KeyRestrictionViolation,
}

/// A record violated its schema.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} in type {type_name}")]
pub struct ValidationError {
    kind: ValidationKind,
    message: String,
    type_name: String,
}

impl ValidationError {
    /// Required attribute missing or Null.
    pub fn presence(key: &Key, type_name: &str) -> Self {
        Self {
            kind: ValidationKind::Presence,
            message: format!("Required value {} not present", key),
            type_name: type_name.to_string(),
        }
    }

    /// Runtime kind does not satisfy the declared constraint.
    pub fn type_mismatch(key: &Key, actual: ValueKind, expected: &str, type_name: &str) -> Self {
        Self {
            kind: ValidationKind::TypeMismatch,
            message: format!(
                "Class mismatch for {} -> {}. Should be a {}",
                key, actual, expected
            ),
            type_name: type_name.to_string(),
        }
    }

    /// A collection value holds elements of the wrong kind.
    pub fn collection_mismatch(key: &Key, element: &str, type_name: &str) -> Self {
        Self {
            kind: ValidationKind::CollectionElementMismatch,
            message: format!(
                "Class mismatch for {}. All values should be of type {}",
                key, element
            ),
            type_name: type_name.to_string(),
        }
    }

    /// Value outside the declared one_of set.
    pub fn one_of_violation(key: &Key, permitted: &[Value], type_name: &str) -> Self {
        Self {
            kind: ValidationKind::OneOfViolation,
            message: format!(
                "Value for {} not one of {}",
                key,
                join_literals(permitted)
            ),
            type_name: type_name.to_string(),
        }
    }

    /// A custom validator returned false.
    pub fn custom_failure(key: &Key, type_name: &str) -> Self {
        Self {
            kind: ValidationKind::CustomValidationFailure,
            message: format!("Custom validation not met for {}", key),
            type_name: type_name.to_string(),
        }
    }

    /// Input carried a key outside the declared set.
    pub fn key_restriction(allowed: &[String], type_name: &str) -> Self {
        Self {
            kind: ValidationKind::KeyRestrictionViolation,
            message: format!("Keys are restricted to {}", allowed.join(", ")),
            type_name: type_name.to_string(),
        }
    }

    /// The failure sub-kind.
    pub fn kind(&self) -> ValidationKind {
        self.kind
    }

    /// Human-readable message, without the type suffix.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Name of the offending record type.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}

/// Renders literal values for messages: strings bare, everything else
/// in JSON form.
fn join_literals(values: &[Value]) -> String {
    values
        .iter()
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// The engine was handed something it cannot work with.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArgumentError {
    /// Map record constructed from a non-map value
    #[error("only map-like values can be used to construct {type_name}, got {actual}")]
    NotAMap {
        /// Record type being constructed
        type_name: String,
        /// Kind of the rejected value
        actual: ValueKind,
    },

    /// List record constructed from a non-list value
    #[error("only list-like values can be used to construct {type_name}, got {actual}")]
    NotAList {
        /// Record type being constructed
        type_name: String,
        /// Kind of the rejected value
        actual: ValueKind,
    },

    /// Cast requested towards a target with no registered conversion
    #[error("no conversion registered to cast attribute {key} to {target}")]
    UnsupportedCast {
        /// Offending attribute key
        key: String,
        /// Declared cast target
        target: String,
    },
}

impl ArgumentError {
    pub(crate) fn not_a_map(type_name: &str, value: &Value) -> Self {
        ArgumentError::NotAMap {
            type_name: type_name.to_string(),
            actual: ValueKind::of(value),
        }
    }

    pub(crate) fn not_a_list(type_name: &str, value: &Value) -> Self {
        ArgumentError::NotAList {
            type_name: type_name.to_string(),
            actual: ValueKind::of(value),
        }
    }

    pub(crate) fn unsupported_cast(key: &Key, target: &str) -> Self {
        ArgumentError::UnsupportedCast {
            key: key.to_string(),
            target: target.to_string(),
        }
    }
}

/// Any failure a construction or mutation can surface.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Malformed input to the engine
    #[error(transparent)]
    Argument(#[from] ArgumentError),
    /// Schema violation
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl Error {
    /// The validation failure, if this is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Error::Validation(err) => Some(err),
            Error::Argument(_) => None,
        }
    }
}
