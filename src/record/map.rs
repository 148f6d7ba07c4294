//! Map-backed validated records.

use serde_json::{Map, Value};
use std::sync::Arc;

use crate::schema::{AttributeSpec, Schema};
use crate::validate::errors::ArgumentError;
use crate::validate::{pipeline, ValidateResult};
use crate::value::{Container, Key};

/// A keyed record validated against its type's schema.
///
/// Construction and every sanctioned mutation run the full validation
/// pipeline; a failing mutation leaves the record untouched.
#[derive(Debug, Clone)]
pub struct MapRecord {
    schema: Arc<Schema>,
    entries: Map<String, Value>,
}

impl MapRecord {
    /// Builds a record from a raw map value.
    ///
    /// Non-map input fails with an `ArgumentError` before any validation
    /// runs.
    pub fn new(schema: Arc<Schema>, raw: Value) -> ValidateResult<Self> {
        let entries = match raw {
            Value::Object(entries) => entries,
            other => {
                return Err(ArgumentError::not_a_map(schema.type_name(), &other).into());
            }
        };
        let entries = if schema.canonicalize_keys() {
            canonicalize(entries)
        } else {
            entries
        };
        let entries = validated(&schema, entries)?;
        Ok(Self { schema, entries })
    }

    /// The schema this record was validated against.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Raw stored value at `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Accessor read: resolves an alias (or key) name, applying the
    /// attribute's transform, and falls through to delegations.
    ///
    /// Returns `None` for names the schema never declared; an absent
    /// attribute reads as Null.
    pub fn fetch(&self, name: &str) -> Option<Value> {
        if let Some(spec) = self.schema.accessor(name) {
            return Some(self.attribute_output(spec));
        }
        if let Some(target) = self.schema.delegation(name) {
            let spec = self.schema.attribute_for_key(target)?;
            // A delegation through an absent attribute reads as Null
            // without invoking the target's transform.
            if self.entries.get(&target.to_string()).map_or(true, Value::is_null) {
                return Some(Value::Null);
            }
            return Some(self.attribute_output(spec));
        }
        None
    }

    fn attribute_output(&self, spec: &AttributeSpec) -> Value {
        let stored = match &spec.key {
            Key::Name(name) => self.entries.get(name).cloned().unwrap_or(Value::Null),
            Key::Index(_) => Value::Null,
        };
        match &spec.transform {
            Some(transform) => transform(&stored),
            None => stored,
        }
    }

    /// Sets one entry, re-validating the whole candidate state first.
    pub fn set(&mut self, key: &str, value: Value) -> ValidateResult<()> {
        let mut candidate = self.entries.clone();
        candidate.insert(key.to_string(), value);
        self.entries = validated(&self.schema, candidate)?;
        Ok(())
    }

    /// Merges `other`'s entries into this record in place.
    pub fn merge_in(&mut self, other: Value) -> ValidateResult<()> {
        let other = as_map(&self.schema, other)?;
        let mut candidate = self.entries.clone();
        candidate.extend(other);
        self.entries = validated(&self.schema, candidate)?;
        Ok(())
    }

    /// Returns a new validated record with `other`'s entries merged in.
    pub fn merge(&self, other: Value) -> ValidateResult<MapRecord> {
        let other = as_map(&self.schema, other)?;
        let mut merged = self.entries.clone();
        merged.extend(other);
        Self::new(Arc::clone(&self.schema), Value::Object(merged))
    }

    /// Removes the named entries in place, re-validating first.
    pub fn remove(&mut self, keys: &[&str]) -> ValidateResult<()> {
        let mut candidate = self.entries.clone();
        candidate.retain(|k, _| !keys.contains(&k.as_str()));
        self.entries = validated(&self.schema, candidate)?;
        Ok(())
    }

    /// Returns a new validated record without the named entries.
    pub fn except(&self, keys: &[&str]) -> ValidateResult<MapRecord> {
        let mut remaining = self.entries.clone();
        remaining.retain(|k, _| !keys.contains(&k.as_str()));
        Self::new(Arc::clone(&self.schema), Value::Object(remaining))
    }

    /// Returns a new validated record without Null-valued entries.
    pub fn compacted(&self) -> ValidateResult<MapRecord> {
        let mut remaining = self.entries.clone();
        remaining.retain(|_, v| !v.is_null());
        Self::new(Arc::clone(&self.schema), Value::Object(remaining))
    }

    /// The values stored at declared keys, in declaration order.
    /// Absent attributes are skipped.
    pub fn attribute_values(&self) -> Vec<Value> {
        self.schema
            .declared_keys()
            .into_iter()
            .filter_map(|key| match key {
                Key::Name(name) => self.entries.get(name).cloned(),
                Key::Index(_) => None,
            })
            .collect()
    }

    /// Exports the plain map form.
    pub fn to_value(&self) -> Value {
        Value::Object(self.entries.clone())
    }

    /// Iterates the stored keys in container order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the record stores no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Runs the pipeline over a candidate state and applies the compact flag.
fn validated(schema: &Schema, entries: Map<String, Value>) -> ValidateResult<Map<String, Value>> {
    let mut container = Container::Map(entries);
    pipeline::run(&mut container, schema)?;
    if schema.compact() {
        container.compact();
    }
    match container {
        Container::Map(entries) => Ok(entries),
        // The pipeline never changes the container shape.
        Container::List(_) => unreachable!("map pipeline produced a list"),
    }
}

fn as_map(schema: &Schema, value: Value) -> ValidateResult<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ArgumentError::not_a_map(schema.type_name(), &other).into()),
    }
}

/// Collapses the `:name` spelling of a key onto the bare name, so both
/// spellings address the same declared attribute.
fn canonicalize(entries: Map<String, Value>) -> Map<String, Value> {
    entries
        .into_iter()
        .map(|(key, value)| {
            let canonical = key
                .strip_prefix(':')
                .map(str::to_string)
                .unwrap_or(key);
            (canonical, value)
        })
        .collect()
}
