//! Declaration-time schema errors.
//!
//! These surface misuse of the declaration API itself, before any record
//! exists. Input validation failures live in
//! [`validate::errors`](crate::validate::errors).

use thiserror::Error;

/// Result type for schema declaration and registration.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors raised while declaring or registering a schema.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    /// A schema for this type name was already registered
    #[error("schema '{0}' is already registered")]
    AlreadyRegistered(String),

    /// A required attribute declares a default that can never apply,
    /// because presence is checked before defaults could matter
    #[error("required attribute '{key}' of '{type_name}' declares a default")]
    DefaultOnRequired {
        /// Record type being declared
        type_name: String,
        /// Offending attribute key
        key: String,
    },

    /// A delegation points at a key no attribute declares
    #[error("delegation '{exposed}' of '{type_name}' targets undeclared attribute '{target}'")]
    UnknownDelegateTarget {
        /// Record type being declared
        type_name: String,
        /// Exposed delegated name
        exposed: String,
        /// Missing target key
        target: String,
    },

    /// An empty permitted-value set would reject every value
    #[error("attribute '{key}' of '{type_name}' declares an empty one_of set")]
    EmptyOneOf {
        /// Record type being declared
        type_name: String,
        /// Offending attribute key
        key: String,
    },
}
