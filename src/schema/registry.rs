//! Process-wide schema storage.
//!
//! Schemas are registered once per record type during startup and read
//! many times afterwards. Records hold `Arc<Schema>` handles, so lookup
//! never copies a schema and the validation path takes no locks.

use std::collections::HashMap;
use std::sync::Arc;

use super::errors::{SchemaError, SchemaResult};
use super::types::Schema;

/// Registry of built schemas keyed by record type name.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Arc<Schema>>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a schema under its type name, exactly once.
    ///
    /// Returns the shared handle for the stored schema. Registering the
    /// same type name twice is an error; schemas are immutable once
    /// declared.
    pub fn register(&mut self, schema: Schema) -> SchemaResult<Arc<Schema>> {
        let name = schema.type_name().to_string();
        if self.schemas.contains_key(&name) {
            return Err(SchemaError::AlreadyRegistered(name));
        }
        tracing::debug!(type_name = %name, "schema registered");
        let handle = Arc::new(schema);
        self.schemas.insert(name, Arc::clone(&handle));
        Ok(handle)
    }

    /// Looks up the schema registered for `type_name`.
    pub fn get(&self, type_name: &str) -> Option<Arc<Schema>> {
        self.schemas.get(type_name).map(Arc::clone)
    }

    /// Whether a schema is registered for `type_name`.
    pub fn contains(&self, type_name: &str) -> bool {
        self.schemas.contains_key(type_name)
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether no types are registered.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AttrOptions, TypeConstraint};

    fn sample_schema() -> Schema {
        Schema::builder("Coordinate")
            .attribute("x", TypeConstraint::number(), AttrOptions::new())
            .build()
            .unwrap()
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = SchemaRegistry::new();
        registry.register(sample_schema()).unwrap();

        let handle = registry.get("Coordinate").unwrap();
        assert_eq!(handle.type_name(), "Coordinate");
        assert!(registry.contains("Coordinate"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = SchemaRegistry::new();
        registry.register(sample_schema()).unwrap();

        let result = registry.register(sample_schema());
        assert_eq!(
            result.unwrap_err(),
            SchemaError::AlreadyRegistered("Coordinate".into())
        );
    }

    #[test]
    fn test_get_unknown_type() {
        let registry = SchemaRegistry::new();
        assert!(registry.get("Unknown").is_none());
    }

    #[test]
    fn test_handles_share_one_schema() {
        let mut registry = SchemaRegistry::new();
        let registered = registry.register(sample_schema()).unwrap();
        let fetched = registry.get("Coordinate").unwrap();
        assert!(Arc::ptr_eq(&registered, &fetched));
    }
}
