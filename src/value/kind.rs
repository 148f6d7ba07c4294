//! Runtime type tags for JSON-shaped values.
//!
//! Every `serde_json::Value` maps to exactly one `ValueKind`. Integers
//! (i64/u64) are `Int`; all other numbers are `Float`. Type constraints
//! and error messages are expressed in terms of these tags.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The runtime type of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// The absent-value marker
    Null,
    /// Boolean
    Bool,
    /// 64-bit integer (signed or unsigned)
    Int,
    /// Floating point number
    Float,
    /// UTF-8 string
    String,
    /// Ordered container
    Array,
    /// Keyed container
    Object,
}

impl ValueKind {
    /// Returns the kind of a value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(n) => {
                if n.is_i64() || n.is_u64() {
                    ValueKind::Int
                } else {
                    ValueKind::Float
                }
            }
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    /// Returns the tag name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Null => "Null",
            ValueKind::Bool => "Boolean",
            ValueKind::Int => "Integer",
            ValueKind::Float => "Float",
            ValueKind::String => "String",
            ValueKind::Array => "Array",
            ValueKind::Object => "Object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
