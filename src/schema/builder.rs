//! One-shot schema declaration.
//!
//! A record type declares its schema through a single builder invocation
//! at startup. Inheritance is explicit: `extends(&parent)` copies the
//! parent's effective lists ahead of the type's own declarations, so no
//! ancestor walking happens at validation time.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::validate::Validator;
use crate::value::Key;

use super::errors::{SchemaError, SchemaResult};
use super::types::{
    AttributeSpec, CastFn, DefaultValue, GlobalSpec, Schema, Transform, TypeConstraint,
};

/// Per-attribute declaration options.
#[derive(Clone, Default)]
pub struct AttrOptions {
    optional: bool,
    default: Option<DefaultValue>,
    cast: bool,
    one_of: Option<Vec<Value>>,
    validator: Option<Arc<dyn Validator>>,
    alias: Option<String>,
    transform: Option<Transform>,
    cast_with: Option<CastFn>,
}

impl AttrOptions {
    /// No options: required, no default, no cast.
    pub fn new() -> Self {
        <Self as Default>::default()
    }

    /// Tolerate absence of the attribute.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Literal default applied when the value is absent.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultValue::Literal(value.into()));
        self
    }

    /// Default resolved from another attribute of the same record.
    pub fn default_from(mut self, key: impl Into<Key>) -> Self {
        self.default = Some(DefaultValue::reference(key));
        self
    }

    /// Convert the raw value before validating it.
    pub fn cast(mut self) -> Self {
        self.cast = true;
        self
    }

    /// Restrict the value to a closed set of literals.
    pub fn one_of(mut self, values: Vec<Value>) -> Self {
        self.one_of = Some(values);
        self
    }

    /// Attach a custom validator.
    pub fn validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Expose the accessor under an alternate name.
    pub fn alias(mut self, name: impl Into<String>) -> Self {
        self.alias = Some(name.into());
        self
    }

    /// Transform the value on accessor reads (storage is untouched).
    pub fn transform(mut self, f: impl Fn(&Value) -> Value + Send + Sync + 'static) -> Self {
        self.transform = Some(Arc::new(f));
        self
    }

    /// Custom conversion tried before the fixed cast table.
    pub fn cast_with(
        mut self,
        f: impl Fn(&Value) -> Option<Value> + Send + Sync + 'static,
    ) -> Self {
        self.cast_with = Some(Arc::new(f));
        self
    }
}

/// Builder producing an immutable [`Schema`].
pub struct SchemaBuilder {
    type_name: String,
    required: Vec<AttributeSpec>,
    optional: Vec<AttributeSpec>,
    globals: Vec<GlobalSpec>,
    delegations: Vec<(String, Key)>,
    restrict: bool,
    canonicalize_keys: bool,
    compact: bool,
}

impl SchemaBuilder {
    pub(super) fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            required: Vec::new(),
            optional: Vec::new(),
            globals: Vec::new(),
            delegations: Vec::new(),
            restrict: false,
            canonicalize_keys: false,
            compact: false,
        }
    }

    /// Composes the parent schema's effective lists ahead of this type's
    /// own declarations. Structural flags are not inherited.
    pub fn extends(mut self, parent: &Schema) -> Self {
        self.required.splice(0..0, parent.required.iter().cloned());
        self.optional.splice(0..0, parent.optional.iter().cloned());
        self.globals.splice(0..0, parent.globals.iter().cloned());
        self.delegations
            .splice(0..0, parent.delegations.iter().cloned());
        self
    }

    /// Declares one attribute. Appends to the required or optional list
    /// depending on the options.
    pub fn attribute(
        mut self,
        key: impl Into<Key>,
        constraint: TypeConstraint,
        options: AttrOptions,
    ) -> Self {
        let spec = AttributeSpec {
            key: key.into(),
            constraint,
            optional: options.optional,
            default: options.default,
            cast: options.cast,
            one_of: options.one_of,
            validator: options.validator,
            alias: options.alias,
            transform: options.transform,
            cast_with: options.cast_with,
        };
        if spec.optional {
            self.optional.push(spec);
        } else {
            self.required.push(spec);
        }
        self
    }

    /// Declares a wildcard rule applied to every input key.
    pub fn global(mut self, constraint: TypeConstraint, options: AttrOptions) -> Self {
        self.globals.push(GlobalSpec {
            constraint,
            optional: options.optional,
            cast: options.cast,
            one_of: options.one_of,
            validator: options.validator,
            cast_with: options.cast_with,
        });
        self
    }

    /// Exposes `name` as a forward to `target`'s accessor output.
    pub fn delegate(mut self, name: impl Into<String>, target: impl Into<Key>) -> Self {
        self.delegations.push((name.into(), target.into()));
        self
    }

    /// Rejects input keys outside the declared attribute set.
    pub fn restrict_keys(mut self) -> Self {
        self.restrict = true;
        self
    }

    /// Normalizes map keys to canonical form on construction.
    pub fn canonicalize_keys(mut self, on: bool) -> Self {
        self.canonicalize_keys = on;
        self
    }

    /// Drops Null-valued entries after validation.
    pub fn compact(mut self, on: bool) -> Self {
        self.compact = on;
        self
    }

    /// Finishes the declaration.
    ///
    /// Rejects contradictory declarations: a required attribute with a
    /// default (unreachable, since presence fails first), an empty
    /// one_of set, or a delegation to an undeclared key.
    pub fn build(self) -> SchemaResult<Schema> {
        for spec in &self.required {
            if spec.default.is_some() {
                return Err(SchemaError::DefaultOnRequired {
                    type_name: self.type_name.clone(),
                    key: spec.key.to_string(),
                });
            }
        }

        for spec in self.required.iter().chain(self.optional.iter()) {
            if matches!(&spec.one_of, Some(values) if values.is_empty()) {
                return Err(SchemaError::EmptyOneOf {
                    type_name: self.type_name.clone(),
                    key: spec.key.to_string(),
                });
            }
        }

        let declared: Vec<&Key> = self
            .required
            .iter()
            .chain(self.optional.iter())
            .map(|spec| &spec.key)
            .collect();
        for (exposed, target) in &self.delegations {
            if !declared.contains(&target) {
                return Err(SchemaError::UnknownDelegateTarget {
                    type_name: self.type_name.clone(),
                    exposed: exposed.clone(),
                    target: target.to_string(),
                });
            }
        }

        let mut accessors = HashMap::new();
        for (index, spec) in self.required.iter().chain(self.optional.iter()).enumerate() {
            if let Some(name) = spec.accessor_name() {
                // Later declarations shadow earlier accessors of the
                // same name; both entries still validate.
                accessors.insert(name.to_string(), index);
            }
        }

        tracing::debug!(
            type_name = %self.type_name,
            required = self.required.len(),
            optional = self.optional.len(),
            globals = self.globals.len(),
            "schema built"
        );

        Ok(Schema {
            type_name: self.type_name,
            required: self.required,
            optional: self.optional,
            globals: self.globals,
            delegations: self.delegations,
            restrict: self.restrict,
            canonicalize_keys: self.canonicalize_keys,
            compact: self.compact,
            accessors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueKind;
    use serde_json::json;

    fn parent() -> Schema {
        Schema::builder("Parent")
            .attribute("x", TypeConstraint::number(), AttrOptions::new())
            .attribute(
                "tag",
                TypeConstraint::Kind(ValueKind::String),
                AttrOptions::new().optional(),
            )
            .delegate("x_value", "x")
            .build()
            .unwrap()
    }

    #[test]
    fn test_required_default_rejected() {
        let result = Schema::builder("Broken")
            .attribute(
                "x",
                TypeConstraint::Any,
                AttrOptions::new().default(json!(1)),
            )
            .build();
        assert_eq!(
            result.unwrap_err(),
            SchemaError::DefaultOnRequired {
                type_name: "Broken".into(),
                key: "x".into(),
            }
        );
    }

    #[test]
    fn test_optional_default_accepted() {
        let schema = Schema::builder("Ok")
            .attribute(
                "x",
                TypeConstraint::Any,
                AttrOptions::new().optional().default(json!(1)),
            )
            .build()
            .unwrap();
        assert_eq!(schema.optional().len(), 1);
    }

    #[test]
    fn test_empty_one_of_rejected() {
        let result = Schema::builder("Broken")
            .attribute("x", TypeConstraint::Any, AttrOptions::new().one_of(vec![]))
            .build();
        assert!(matches!(result, Err(SchemaError::EmptyOneOf { .. })));
    }

    #[test]
    fn test_unknown_delegate_target_rejected() {
        let result = Schema::builder("Broken")
            .attribute("x", TypeConstraint::Any, AttrOptions::new())
            .delegate("name", "missing")
            .build();
        assert!(matches!(
            result,
            Err(SchemaError::UnknownDelegateTarget { .. })
        ));
    }

    #[test]
    fn test_extends_puts_parent_first() {
        let child = Schema::builder("Child")
            .attribute("y", TypeConstraint::number(), AttrOptions::new())
            .extends(&parent())
            .build()
            .unwrap();

        let keys: Vec<String> = child.required().iter().map(|s| s.key.to_string()).collect();
        assert_eq!(keys, vec!["x", "y"]);
        // Optional and delegations carried over too.
        assert_eq!(child.optional().len(), 1);
        assert_eq!(child.delegation("x_value"), Some(&Key::from("x")));
    }

    #[test]
    fn test_extends_does_not_inherit_flags() {
        let restricted = Schema::builder("Restricted")
            .attribute("x", TypeConstraint::Any, AttrOptions::new())
            .restrict_keys()
            .build()
            .unwrap();
        let child = Schema::builder("Child")
            .extends(&restricted)
            .build()
            .unwrap();
        assert!(!child.restrict());
    }

    #[test]
    fn test_duplicate_key_keeps_both_entries_last_accessor_wins() {
        let child = Schema::builder("Child")
            .extends(&parent())
            .attribute(
                "x",
                TypeConstraint::Kind(ValueKind::Int),
                AttrOptions::new(),
            )
            .build()
            .unwrap();

        assert_eq!(child.required().len(), 2);
        let spec = child.accessor("x").unwrap();
        assert_eq!(spec.constraint, TypeConstraint::Kind(ValueKind::Int));
    }

    #[test]
    fn test_alias_shadows_key_name() {
        let schema = Schema::builder("Aliased")
            .attribute(
                "raw_name",
                TypeConstraint::Any,
                AttrOptions::new().alias("name"),
            )
            .build()
            .unwrap();
        assert!(schema.accessor("name").is_some());
        assert!(schema.accessor("raw_name").is_none());
    }

    #[test]
    fn test_positional_attribute_has_no_accessor() {
        let schema = Schema::builder("Positional")
            .attribute(0, TypeConstraint::Any, AttrOptions::new())
            .attribute(1, TypeConstraint::Any, AttrOptions::new().alias("second"))
            .build()
            .unwrap();
        assert!(schema.accessor("0").is_none());
        assert!(schema.accessor("second").is_some());
    }
}
