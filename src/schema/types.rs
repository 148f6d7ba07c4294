//! Schema definitions: type constraints, attribute specifications, and
//! the immutable per-record-type `Schema`.
//!
//! A `Schema` is built once through [`SchemaBuilder`](super::SchemaBuilder)
//! during a type's declaration phase and never mutated afterwards.
//! Inherited attributes are composed eagerly at build time, so the lists
//! held here are already effective (parent entries first).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::validate::Validator;
use crate::value::{Key, ValueKind};

use super::builder::SchemaBuilder;

/// Element-level constraint inside a "collection of T" declaration.
///
/// Single level only: an element may be anything, one kind, or one of a
/// set of kinds, but never itself a collection constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementConstraint {
    /// Any element accepted
    Any,
    /// Single acceptable kind
    Kind(ValueKind),
    /// Ordered set of acceptable kinds
    AnyOf(Vec<ValueKind>),
}

impl ElementConstraint {
    /// Describes the constraint for error messages.
    pub fn describe(&self) -> String {
        match self {
            ElementConstraint::Any => "any".to_string(),
            ElementConstraint::Kind(kind) => kind.name().to_string(),
            ElementConstraint::AnyOf(kinds) => kinds
                .iter()
                .map(|k| k.name())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Declared type constraint of one attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeConstraint {
    /// Wildcard: every value satisfies it
    Any,
    /// Single acceptable kind
    Kind(ValueKind),
    /// Ordered set of acceptable kinds
    AnyOf(Vec<ValueKind>),
    /// Ordered container whose every element satisfies the inner constraint
    ArrayOf(ElementConstraint),
    /// Keyed container whose every value satisfies the inner constraint
    MapOf(ElementConstraint),
}

impl TypeConstraint {
    /// Integer or floating point.
    pub fn number() -> Self {
        TypeConstraint::AnyOf(vec![ValueKind::Int, ValueKind::Float])
    }

    /// Boolean.
    pub fn boolean() -> Self {
        TypeConstraint::Kind(ValueKind::Bool)
    }

    /// Any non-container scalar.
    pub fn primitive() -> Self {
        TypeConstraint::AnyOf(vec![
            ValueKind::String,
            ValueKind::Float,
            ValueKind::Int,
            ValueKind::Bool,
        ])
    }

    /// Describes the acceptable kinds for error messages.
    pub fn describe(&self) -> String {
        match self {
            TypeConstraint::Any => "any".to_string(),
            TypeConstraint::Kind(kind) => kind.name().to_string(),
            TypeConstraint::AnyOf(kinds) => kinds
                .iter()
                .map(|k| k.name())
                .collect::<Vec<_>>()
                .join(", "),
            TypeConstraint::ArrayOf(_) => ValueKind::Array.name().to_string(),
            TypeConstraint::MapOf(_) => ValueKind::Object.name().to_string(),
        }
    }
}

/// Default applied to an absent optional attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    /// Fixed literal
    Literal(Value),
    /// The current value of another attribute of the same record
    Reference(Key),
}

impl DefaultValue {
    /// Builds a "default = other attribute" marker.
    pub fn reference(key: impl Into<Key>) -> Self {
        DefaultValue::Reference(key.into())
    }
}

/// Pure function applied to a stored value when exposed through its
/// accessor. The stored value itself is never transformed.
pub type Transform = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Custom conversion hook used by the cast resolver before the fixed
/// conversion table. Returning `None` means the conversion is undefined
/// for that input.
pub type CastFn = Arc<dyn Fn(&Value) -> Option<Value> + Send + Sync>;

/// One declared attribute of a record type.
#[derive(Clone)]
pub struct AttributeSpec {
    /// Key the attribute is stored under
    pub key: Key,
    /// Declared type constraint
    pub constraint: TypeConstraint,
    /// Whether absence (Null) is tolerated
    pub optional: bool,
    /// Default applied when the value is absent
    pub default: Option<DefaultValue>,
    /// Whether the raw value is converted before validation
    pub cast: bool,
    /// Closed set of permitted literal values
    pub one_of: Option<Vec<Value>>,
    /// Custom validator invoked after the built-in checks
    pub validator: Option<Arc<dyn Validator>>,
    /// Alternate accessor name
    pub alias: Option<String>,
    /// Accessor-output transform
    pub transform: Option<Transform>,
    /// Custom cast hook
    pub cast_with: Option<CastFn>,
}

impl AttributeSpec {
    /// The name this attribute's accessor is exposed under, if any.
    ///
    /// The alias wins over the key name; pure positions without an alias
    /// have no named accessor.
    pub fn accessor_name(&self) -> Option<&str> {
        self.alias.as_deref().or_else(|| self.key.accessor_name())
    }
}

impl fmt::Debug for AttributeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeSpec")
            .field("key", &self.key)
            .field("constraint", &self.constraint)
            .field("optional", &self.optional)
            .field("default", &self.default)
            .field("cast", &self.cast)
            .field("one_of", &self.one_of)
            .field("validator", &self.validator.is_some())
            .field("alias", &self.alias)
            .field("transform", &self.transform.is_some())
            .field("cast_with", &self.cast_with.is_some())
            .finish()
    }
}

/// Wildcard rule applied to every key present in the input.
#[derive(Clone)]
pub struct GlobalSpec {
    /// Type constraint applied to each value
    pub constraint: TypeConstraint,
    /// Whether Null values are tolerated
    pub optional: bool,
    /// Whether values are converted before validation
    pub cast: bool,
    /// Closed set of permitted literal values
    pub one_of: Option<Vec<Value>>,
    /// Custom validator
    pub validator: Option<Arc<dyn Validator>>,
    /// Custom cast hook
    pub cast_with: Option<CastFn>,
}

impl GlobalSpec {
    /// Expands this rule into an ephemeral per-key attribute spec.
    pub fn bind(&self, key: Key) -> AttributeSpec {
        AttributeSpec {
            key,
            constraint: self.constraint.clone(),
            optional: self.optional,
            default: None,
            cast: self.cast,
            one_of: self.one_of.clone(),
            validator: self.validator.clone(),
            alias: None,
            transform: None,
            cast_with: self.cast_with.clone(),
        }
    }
}

impl fmt::Debug for GlobalSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobalSpec")
            .field("constraint", &self.constraint)
            .field("optional", &self.optional)
            .field("cast", &self.cast)
            .field("one_of", &self.one_of)
            .field("validator", &self.validator.is_some())
            .field("cast_with", &self.cast_with.is_some())
            .finish()
    }
}

/// Immutable schema of one record type.
///
/// The attribute lists are effective lists: a schema built with
/// [`extends`](SchemaBuilder::extends) already carries its ancestors'
/// entries ahead of its own.
#[derive(Debug, Clone)]
pub struct Schema {
    pub(super) type_name: String,
    pub(super) required: Vec<AttributeSpec>,
    pub(super) optional: Vec<AttributeSpec>,
    pub(super) globals: Vec<GlobalSpec>,
    pub(super) delegations: Vec<(String, Key)>,
    pub(super) restrict: bool,
    pub(super) canonicalize_keys: bool,
    pub(super) compact: bool,
    /// Accessor name -> position in declaration order (required then
    /// optional). Built once at schema build time; duplicate names keep
    /// the later entry.
    pub(super) accessors: HashMap<String, usize>,
}

impl Schema {
    /// Starts declaring a schema for `type_name`.
    pub fn builder(type_name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(type_name)
    }

    /// The record type's name, used in error messages.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Required attributes, parent entries first.
    pub fn required(&self) -> &[AttributeSpec] {
        &self.required
    }

    /// Optional attributes, parent entries first.
    pub fn optional(&self) -> &[AttributeSpec] {
        &self.optional
    }

    /// All declared attributes in validation order: required, then
    /// optional.
    pub fn attributes(&self) -> impl Iterator<Item = &AttributeSpec> {
        self.required.iter().chain(self.optional.iter())
    }

    /// Wildcard rules, parent entries first.
    pub fn globals(&self) -> &[GlobalSpec] {
        &self.globals
    }

    /// Delegation bindings in declaration order.
    pub fn delegations(&self) -> &[(String, Key)] {
        &self.delegations
    }

    /// Resolves a delegated name to its target attribute key.
    pub fn delegation(&self, name: &str) -> Option<&Key> {
        self.delegations
            .iter()
            .rev()
            .find(|(exposed, _)| exposed == name)
            .map(|(_, target)| target)
    }

    /// Whether undeclared input keys are rejected.
    pub fn restrict(&self) -> bool {
        self.restrict
    }

    /// Whether map keys are normalized to canonical form on construction.
    pub fn canonicalize_keys(&self) -> bool {
        self.canonicalize_keys
    }

    /// Whether Null entries are dropped after validation.
    pub fn compact(&self) -> bool {
        self.compact
    }

    /// Every declared key in declaration order, required then optional.
    pub fn declared_keys(&self) -> Vec<&Key> {
        self.attributes().map(|spec| &spec.key).collect()
    }

    /// Resolves an accessor name to its attribute spec.
    ///
    /// When parent and child declare the same name the later entry wins.
    pub fn accessor(&self, name: &str) -> Option<&AttributeSpec> {
        let index = *self.accessors.get(name)?;
        self.attributes().nth(index)
    }

    /// The last declared spec for `key`, if any.
    pub fn attribute_for_key(&self, key: &Key) -> Option<&AttributeSpec> {
        self.required
            .iter()
            .chain(self.optional.iter())
            .rev()
            .find(|spec| &spec.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_descriptions() {
        assert_eq!(TypeConstraint::Kind(ValueKind::Float).describe(), "Float");
        assert_eq!(TypeConstraint::number().describe(), "Integer, Float");
        assert_eq!(
            TypeConstraint::ArrayOf(ElementConstraint::Kind(ValueKind::Int)).describe(),
            "Array"
        );
        assert_eq!(
            TypeConstraint::MapOf(ElementConstraint::Any).describe(),
            "Object"
        );
    }

    #[test]
    fn test_primitive_covers_scalars() {
        let TypeConstraint::AnyOf(kinds) = TypeConstraint::primitive() else {
            panic!("primitive should be a kind set");
        };
        assert!(kinds.contains(&ValueKind::String));
        assert!(kinds.contains(&ValueKind::Bool));
        assert!(!kinds.contains(&ValueKind::Array));
    }

    #[test]
    fn test_constraint_serialization_round_trip() {
        let constraint = TypeConstraint::ArrayOf(ElementConstraint::Kind(ValueKind::Int));
        let round_trip: TypeConstraint =
            serde_json::from_value(serde_json::to_value(&constraint).unwrap()).unwrap();
        assert_eq!(round_trip, constraint);
    }

    #[test]
    fn test_global_bind_carries_rule_fields() {
        let global = GlobalSpec {
            constraint: TypeConstraint::number(),
            optional: false,
            cast: true,
            one_of: None,
            validator: None,
            cast_with: None,
        };
        let bound = global.bind(Key::from("price"));
        assert_eq!(bound.key, Key::from("price"));
        assert_eq!(bound.constraint, TypeConstraint::number());
        assert!(bound.cast);
        assert!(bound.alias.is_none());
        assert!(bound.default.is_none());
    }
}
