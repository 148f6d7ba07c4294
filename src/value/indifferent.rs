//! Numeric-indifferent key lookup over a keyed container.
//!
//! Semi-structured sources disagree on how numeric keys are spelled:
//! the same entry may arrive as `1`, `"1"` or `"1.0"`. `IndifferentMap`
//! wraps a canonical map and resolves a lookup by trying a fixed list of
//! spellings in order, returning the first non-Null hit. Nested map
//! values are wrapped in the same adapter on read.

use serde_json::{Map, Value};

use crate::validate::errors::ArgumentError;

/// Keyed container with indifferent numeric lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct IndifferentMap {
    entries: Map<String, Value>,
}

impl IndifferentMap {
    /// Wraps a map value. Anything else is rejected.
    pub fn new(value: Value) -> Result<Self, ArgumentError> {
        match value {
            Value::Object(entries) => Ok(Self { entries }),
            other => Err(ArgumentError::not_a_map("IndifferentMap", &other)),
        }
    }

    /// Looks up `key`, trying each candidate spelling in order.
    pub fn lookup(&self, key: &str) -> Option<Value> {
        let value = candidate_spellings(key)
            .iter()
            .find_map(|candidate| self.entries.get(candidate).filter(|v| !v.is_null()))?;
        Some(value.clone())
    }

    /// Like [`lookup`](Self::lookup) but wraps a map result in the
    /// adapter so deeper lookups stay indifferent.
    pub fn lookup_map(&self, key: &str) -> Option<IndifferentMap> {
        match self.lookup(key)? {
            Value::Object(entries) => Some(Self { entries }),
            _ => None,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exports the plain value form.
    pub fn to_value(&self) -> Value {
        Value::Object(self.entries.clone())
    }
}

/// The spellings tried for one key, most specific first: the key
/// verbatim, then (for numeric-looking keys) the float form and the
/// integer form.
fn candidate_spellings(key: &str) -> Vec<String> {
    let mut spellings = vec![key.to_string()];
    if let Ok(f) = key.parse::<f64>() {
        push_unique(&mut spellings, format!("{:?}", f));
        push_unique(&mut spellings, format!("{}", f.trunc() as i64));
    }
    spellings
}

fn push_unique(spellings: &mut Vec<String>, candidate: String) {
    if !spellings.contains(&candidate) {
        spellings.push(candidate);
    }
}
