//! Cast resolution: converting raw values towards their declared type
//! before validation.
//!
//! Resolution order for one value: already-satisfying values pass
//! through untouched; then the attribute's custom `cast_with` hook; then
//! the fixed kind conversion table. A conversion the table cannot
//! express (for example towards Boolean) is a configuration error, not a
//! validation failure.
//!
//! The table is deliberately forgiving about unconvertible inputs: a
//! string that does not parse as a number is passed through unchanged so
//! the type-validation stage reports it with the expected-vs-actual
//! message instead of a cast panic.

use serde_json::Value;

use crate::schema::{AttributeSpec, ElementConstraint, TypeConstraint};
use crate::value::ValueKind;

use super::constraint;
use super::errors::{ArgumentError, Error, ValidationError};

/// Casts `value` towards the attribute's declared constraint.
///
/// Collection constraints cast element-wise; the raw value must already
/// be the right container kind — a scalar is never auto-wrapped, it
/// fails as a type mismatch.
pub fn apply(spec: &AttributeSpec, value: &Value, type_name: &str) -> Result<Value, Error> {
    match &spec.constraint {
        TypeConstraint::ArrayOf(of) => {
            let Some(items) = value.as_array() else {
                return Err(ValidationError::type_mismatch(
                    &spec.key,
                    ValueKind::of(value),
                    &spec.constraint.describe(),
                    type_name,
                )
                .into());
            };
            let target = element_target(of);
            let cast_items = items
                .iter()
                .map(|item| cast_single(spec, item, &target))
                .collect::<Result<Vec<_>, Error>>()?;
            Ok(Value::Array(cast_items))
        }
        TypeConstraint::MapOf(of) => {
            let Some(entries) = value.as_object() else {
                return Err(ValidationError::type_mismatch(
                    &spec.key,
                    ValueKind::of(value),
                    &spec.constraint.describe(),
                    type_name,
                )
                .into());
            };
            let target = element_target(of);
            let cast_entries = entries
                .iter()
                .map(|(key, item)| Ok((key.clone(), cast_single(spec, item, &target)?)))
                .collect::<Result<serde_json::Map<_, _>, Error>>()?;
            Ok(Value::Object(cast_entries))
        }
        other => cast_single(spec, value, other),
    }
}

/// Lowers an element constraint into a standalone cast target.
fn element_target(of: &ElementConstraint) -> TypeConstraint {
    match of {
        ElementConstraint::Any => TypeConstraint::Any,
        ElementConstraint::Kind(kind) => TypeConstraint::Kind(*kind),
        ElementConstraint::AnyOf(kinds) => TypeConstraint::AnyOf(kinds.clone()),
    }
}

fn cast_single(
    spec: &AttributeSpec,
    value: &Value,
    target: &TypeConstraint,
) -> Result<Value, Error> {
    if constraint::satisfies(target, value) {
        return Ok(value.clone());
    }

    if let Some(hook) = &spec.cast_with {
        return hook(value).ok_or_else(|| {
            ArgumentError::unsupported_cast(&spec.key, &target.describe()).into()
        });
    }

    match target {
        TypeConstraint::Kind(kind) => table_cast(value, *kind)
            .ok_or_else(|| ArgumentError::unsupported_cast(&spec.key, &target.describe()).into()),
        // A kind set is an ambiguous cast target; the collection forms
        // were unpacked by the caller and Any always satisfies.
        _ => Err(ArgumentError::unsupported_cast(&spec.key, &target.describe()).into()),
    }
}

/// Fixed conversion table keyed on the target kind.
///
/// `None` means no conversion exists for that target at all.
/// Inputs the target's conversion does not cover come back unchanged and
/// are left for type validation to report.
fn table_cast(value: &Value, target: ValueKind) -> Option<Value> {
    match target {
        ValueKind::String => Some(match value {
            Value::Bool(b) => Value::String(b.to_string()),
            Value::Number(n) => Value::String(n.to_string()),
            _ => value.clone(),
        }),
        ValueKind::Float => Some(match value {
            Value::Number(n) => n.as_f64().map(Value::from).unwrap_or_else(|| value.clone()),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .map(Value::from)
                .unwrap_or_else(|| value.clone()),
            _ => value.clone(),
        }),
        ValueKind::Int => Some(match value {
            Value::Number(n) => n
                .as_f64()
                .map(|f| Value::from(f.trunc() as i64))
                .unwrap_or_else(|| value.clone()),
            Value::String(s) => {
                let trimmed = s.trim();
                trimmed
                    .parse::<i64>()
                    .ok()
                    .map(Value::from)
                    .or_else(|| {
                        trimmed
                            .parse::<f64>()
                            .ok()
                            .map(|f| Value::from(f.trunc() as i64))
                    })
                    .unwrap_or_else(|| value.clone())
            }
            _ => value.clone(),
        }),
        // Containers pass through; type validation reports the shape.
        ValueKind::Array | ValueKind::Object => Some(value.clone()),
        ValueKind::Bool | ValueKind::Null => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Key;
    use serde_json::json;

    fn spec(constraint: TypeConstraint, cast_with: Option<crate::schema::CastFn>) -> AttributeSpec {
        AttributeSpec {
            key: Key::from("field"),
            constraint,
            optional: false,
            default: None,
            cast: true,
            one_of: None,
            validator: None,
            alias: None,
            transform: None,
            cast_with,
        }
    }

    #[test]
    fn test_satisfying_value_unchanged() {
        let spec = spec(TypeConstraint::Kind(ValueKind::Float), None);
        assert_eq!(apply(&spec, &json!(1.5), "T").unwrap(), json!(1.5));
    }

    #[test]
    fn test_string_to_float() {
        let spec = spec(TypeConstraint::Kind(ValueKind::Float), None);
        assert_eq!(apply(&spec, &json!("0.0"), "T").unwrap(), json!(0.0));
        assert_eq!(apply(&spec, &json!("2.5"), "T").unwrap(), json!(2.5));
    }

    #[test]
    fn test_int_to_float() {
        let spec = spec(TypeConstraint::Kind(ValueKind::Float), None);
        assert_eq!(apply(&spec, &json!(5), "T").unwrap(), json!(5.0));
    }

    #[test]
    fn test_float_to_int_truncates() {
        let spec = spec(TypeConstraint::Kind(ValueKind::Int), None);
        assert_eq!(apply(&spec, &json!(5.9), "T").unwrap(), json!(5));
        assert_eq!(apply(&spec, &json!("7"), "T").unwrap(), json!(7));
        assert_eq!(apply(&spec, &json!("7.9"), "T").unwrap(), json!(7));
    }

    #[test]
    fn test_number_to_string() {
        let spec = spec(TypeConstraint::Kind(ValueKind::String), None);
        assert_eq!(apply(&spec, &json!(5), "T").unwrap(), json!("5"));
        assert_eq!(apply(&spec, &json!(true), "T").unwrap(), json!("true"));
    }

    #[test]
    fn test_unparseable_string_left_for_validation() {
        let spec = spec(TypeConstraint::Kind(ValueKind::Float), None);
        assert_eq!(apply(&spec, &json!("abc"), "T").unwrap(), json!("abc"));
    }

    #[test]
    fn test_bool_target_has_no_conversion() {
        let spec = spec(TypeConstraint::Kind(ValueKind::Bool), None);
        let err = apply(&spec, &json!(1), "T").unwrap_err();
        assert!(matches!(
            err,
            Error::Argument(ArgumentError::UnsupportedCast { .. })
        ));
    }

    #[test]
    fn test_kind_set_target_is_ambiguous() {
        let spec = spec(TypeConstraint::number(), None);
        let err = apply(&spec, &json!("5"), "T").unwrap_err();
        assert!(matches!(
            err,
            Error::Argument(ArgumentError::UnsupportedCast { .. })
        ));
    }

    #[test]
    fn test_custom_hook_wins_over_table() {
        let spec = spec(
            TypeConstraint::Kind(ValueKind::Int),
            Some(std::sync::Arc::new(|_| Some(json!(42)))),
        );
        assert_eq!(apply(&spec, &json!("anything"), "T").unwrap(), json!(42));
    }

    #[test]
    fn test_custom_hook_refusal_is_configuration_error() {
        let spec = spec(
            TypeConstraint::Kind(ValueKind::Bool),
            Some(std::sync::Arc::new(|_| None)),
        );
        assert!(apply(&spec, &json!(1), "T").is_err());
    }

    #[test]
    fn test_collection_cast_is_element_wise() {
        let spec = spec(
            TypeConstraint::ArrayOf(ElementConstraint::Kind(ValueKind::Float)),
            None,
        );
        assert_eq!(
            apply(&spec, &json!(["1.5", 2, 3.0]), "T").unwrap(),
            json!([1.5, 2.0, 3.0])
        );
    }

    #[test]
    fn test_collection_cast_rejects_non_collection() {
        let spec = spec(
            TypeConstraint::ArrayOf(ElementConstraint::Kind(ValueKind::Float)),
            None,
        );
        let err = apply(&spec, &json!("1.5"), "T").unwrap_err();
        let validation = err.as_validation().expect("should be a validation error");
        assert!(validation.message().contains("Should be a Array"));
    }

    #[test]
    fn test_map_of_cast_converts_values() {
        let spec = spec(
            TypeConstraint::MapOf(ElementConstraint::Kind(ValueKind::Int)),
            None,
        );
        assert_eq!(
            apply(&spec, &json!({"a": "1", "b": 2.9}), "T").unwrap(),
            json!({"a": 1, "b": 2})
        );
    }
}
