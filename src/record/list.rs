//! List-backed validated records.

use serde_json::Value;
use std::sync::Arc;

use crate::schema::{AttributeSpec, Schema};
use crate::validate::errors::ArgumentError;
use crate::validate::{pipeline, ValidateResult};
use crate::value::{Container, Key};

/// An ordered record validated against its type's schema.
///
/// Attributes are declared by position; an alias gives a position a
/// named accessor. Construction, positional writes and appends all run
/// the full validation pipeline before committing.
#[derive(Debug, Clone)]
pub struct ListRecord {
    schema: Arc<Schema>,
    entries: Vec<Value>,
}

impl ListRecord {
    /// Builds a record from a raw list value.
    ///
    /// Non-list input fails with an `ArgumentError` before any
    /// validation runs.
    pub fn new(schema: Arc<Schema>, raw: Value) -> ValidateResult<Self> {
        let entries = match raw {
            Value::Array(entries) => entries,
            other => {
                return Err(ArgumentError::not_a_list(schema.type_name(), &other).into());
            }
        };
        let entries = validated(&schema, entries)?;
        Ok(Self { schema, entries })
    }

    /// The schema this record was validated against.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Raw stored value at `index`.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.entries.get(index)
    }

    /// Accessor read for aliased positions and delegations, applying
    /// the attribute's transform.
    pub fn fetch(&self, name: &str) -> Option<Value> {
        if let Some(spec) = self.schema.accessor(name) {
            return Some(self.attribute_output(spec));
        }
        if let Some(target) = self.schema.delegation(name) {
            let spec = self.schema.attribute_for_key(target)?;
            if self.stored(&spec.key).is_null() {
                return Some(Value::Null);
            }
            return Some(self.attribute_output(spec));
        }
        None
    }

    fn stored(&self, key: &Key) -> Value {
        match key {
            Key::Index(idx) => self.entries.get(*idx).cloned().unwrap_or(Value::Null),
            Key::Name(_) => Value::Null,
        }
    }

    fn attribute_output(&self, spec: &AttributeSpec) -> Value {
        let stored = self.stored(&spec.key);
        match &spec.transform {
            Some(transform) => transform(&stored),
            None => stored,
        }
    }

    /// Writes one position, re-validating the whole candidate state
    /// first. A position past the end pads the gap with Null entries.
    pub fn set(&mut self, index: usize, value: Value) -> ValidateResult<()> {
        let mut candidate = self.entries.clone();
        if index >= candidate.len() {
            candidate.resize(index + 1, Value::Null);
        }
        candidate[index] = value;
        self.entries = validated(&self.schema, candidate)?;
        Ok(())
    }

    /// Appends one entry, re-validating first.
    pub fn push(&mut self, value: Value) -> ValidateResult<()> {
        let mut candidate = self.entries.clone();
        candidate.push(value);
        self.entries = validated(&self.schema, candidate)?;
        Ok(())
    }

    /// Returns a new validated record without Null entries.
    pub fn compacted(&self) -> ValidateResult<ListRecord> {
        let remaining: Vec<Value> = self
            .entries
            .iter()
            .filter(|v| !v.is_null())
            .cloned()
            .collect();
        Self::new(Arc::clone(&self.schema), Value::Array(remaining))
    }

    /// The values stored at declared positions, in declaration order.
    pub fn attribute_values(&self) -> Vec<Value> {
        self.schema
            .declared_keys()
            .into_iter()
            .filter_map(|key| match key {
                Key::Index(idx) => self.entries.get(*idx).cloned(),
                Key::Name(_) => None,
            })
            .collect()
    }

    /// Exports the plain list form.
    pub fn to_value(&self) -> Value {
        Value::Array(self.entries.clone())
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
fn validated(schema: &Schema, entries: Vec<Value>) -> ValidateResult<Vec<Value>> {
    let mut container = Container::List(entries);
    pipeline::run(&mut container, schema)?;
    if schema.compact() {
        container.compact();
    }
    match container {
        Container::List(entries) => Ok(entries),
        // The pipeline never changes the container shape.
        Container::Map(_) => unreachable!("list pipeline produced a map"),
    }
}
