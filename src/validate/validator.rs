//! Custom validator protocol.

use serde_json::Value;

use crate::schema::AttributeSpec;
use crate::value::Container;

/// A pluggable per-attribute check, invoked after the built-in presence,
/// type and one_of checks succeed.
///
/// The full staging record is passed alongside the value so a validator
/// can perform cross-field checks. Returning `false` fails the pipeline
/// with a custom-validation error naming the attribute.
pub trait Validator: Send + Sync {
    /// Whether `value` is acceptable for the attribute described by
    /// `spec` within `record`.
    fn validate(&self, value: &Value, spec: &AttributeSpec, record: &Container) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Key;

    /// Accepts numbers strictly above a bound.
    struct AboveBound(f64);

    impl Validator for AboveBound {
        fn validate(&self, value: &Value, _spec: &AttributeSpec, _record: &Container) -> bool {
            value.as_f64().map_or(false, |v| v > self.0)
        }
    }

    /// Accepts a value only if it equals another attribute of the record.
    struct MatchesAttribute(Key);

    impl Validator for MatchesAttribute {
        fn validate(&self, value: &Value, _spec: &AttributeSpec, record: &Container) -> bool {
            record.get(&self.0) == Some(value)
        }
    }

    fn spec_for(key: &str) -> AttributeSpec {
        use crate::schema::TypeConstraint;
        AttributeSpec {
            key: Key::from(key),
            constraint: TypeConstraint::Any,
            optional: false,
            default: None,
            cast: false,
            one_of: None,
            validator: None,
            alias: None,
            transform: None,
            cast_with: None,
        }
    }

    #[test]
    fn test_value_based_validator() {
        let validator = AboveBound(10.0);
        let record = Container::from_value(serde_json::json!({"n": 11})).unwrap();
        let spec = spec_for("n");
        assert!(validator.validate(&serde_json::json!(11), &spec, &record));
        assert!(!validator.validate(&serde_json::json!(9), &spec, &record));
    }

    #[test]
    fn test_cross_field_validator() {
        let validator = MatchesAttribute(Key::from("confirmation"));
        let record =
            Container::from_value(serde_json::json!({"email": "a@b", "confirmation": "a@b"}))
                .unwrap();
        let spec = spec_for("email");
        assert!(validator.validate(&serde_json::json!("a@b"), &spec, &record));
        assert!(!validator.validate(&serde_json::json!("x@y"), &spec, &record));
    }
}
