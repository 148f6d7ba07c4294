//! Generic keyed/ordered containers and attribute keys.
//!
//! The validation pipeline operates on a `Container` staging copy so the
//! same stage logic serves both map-backed and list-backed records. Map
//! entries are addressed by name, list entries by position; `Key` unifies
//! the two.

use serde_json::{Map, Value};
use std::fmt;

/// Address of one attribute inside a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// Named entry of a map record
    Name(String),
    /// Position of a list record entry
    Index(usize),
}

impl Key {
    /// Returns the accessor name for this key, if it has one.
    ///
    /// Pure positions are reachable only through indexed access.
    pub fn accessor_name(&self) -> Option<&str> {
        match self {
            Key::Name(name) => Some(name),
            Key::Index(_) => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Name(name) => write!(f, "{}", name),
            Key::Index(idx) => write!(f, "{}", idx),
        }
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(name)
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Key::Index(index)
    }
}

/// Mutable staging container fed through the validation pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Container {
    /// Keyed entries
    Map(Map<String, Value>),
    /// Ordered entries
    List(Vec<Value>),
}

impl Container {
    /// Wraps a raw value, or `None` if it is not a container.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Container::Map(map)),
            Value::Array(list) => Some(Container::List(list)),
            _ => None,
        }
    }

    /// Returns the value at `key`, if present.
    pub fn get(&self, key: &Key) -> Option<&Value> {
        match (self, key) {
            (Container::Map(map), Key::Name(name)) => map.get(name),
            (Container::List(list), Key::Index(idx)) => list.get(*idx),
            _ => None,
        }
    }

    /// Whether `key` is present, even with a Null value.
    pub fn contains(&self, key: &Key) -> bool {
        match (self, key) {
            (Container::Map(map), Key::Name(name)) => map.contains_key(name),
            (Container::List(list), Key::Index(idx)) => *idx < list.len(),
            _ => false,
        }
    }

    /// Sets the value at `key`. A list position past the end pads the
    /// gap with Null entries.
    pub fn set(&mut self, key: &Key, value: Value) {
        match (self, key) {
            (Container::Map(map), Key::Name(name)) => {
                map.insert(name.clone(), value);
            }
            (Container::List(list), Key::Index(idx)) => {
                if *idx >= list.len() {
                    list.resize(*idx + 1, Value::Null);
                }
                list[*idx] = value;
            }
            _ => {}
        }
    }

    /// Returns every key present, in container order.
    pub fn keys(&self) -> Vec<Key> {
        match self {
            Container::Map(map) => map.keys().map(|k| Key::Name(k.clone())).collect(),
            Container::List(list) => (0..list.len()).map(Key::Index).collect(),
        }
    }

    /// Drops Null-valued entries in place.
    pub fn compact(&mut self) {
        match self {
            Container::Map(map) => map.retain(|_, v| !v.is_null()),
            Container::List(list) => list.retain(|v| !v.is_null()),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        match self {
            Container::Map(map) => map.len(),
            Container::List(list) => list.len(),
        }
    }

    /// Whether the container has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Exports the plain value form.
    pub fn to_value(&self) -> Value {
        match self {
            Container::Map(map) => Value::Object(map.clone()),
            Container::List(list) => Value::Array(list.clone()),
        }
    }
}
