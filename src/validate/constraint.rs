//! Type-constraint evaluation.
//!
//! Pure predicates: no state, no allocation. Containers are evaluated
//! element-wise only when an element constraint is declared; without one,
//! kind membership applies to the whole value, containers included, as
//! opaque values.

use serde_json::Value;

use crate::schema::{ElementConstraint, TypeConstraint};
use crate::value::ValueKind;

/// Whether `value` satisfies `constraint`.
pub fn satisfies(constraint: &TypeConstraint, value: &Value) -> bool {
    match constraint {
        TypeConstraint::Any => true,
        TypeConstraint::Kind(kind) => ValueKind::of(value) == *kind,
        TypeConstraint::AnyOf(kinds) => kinds.contains(&ValueKind::of(value)),
        TypeConstraint::ArrayOf(of) => value
            .as_array()
            .is_some_and(|items| items.iter().all(|item| element_satisfies(of, item))),
        TypeConstraint::MapOf(of) => value
            .as_object()
            .is_some_and(|map| map.values().all(|item| element_satisfies(of, item))),
    }
}

/// Whether one collection element satisfies the inner constraint.
pub fn element_satisfies(constraint: &ElementConstraint, value: &Value) -> bool {
    match constraint {
        ElementConstraint::Any => true,
        ElementConstraint::Kind(kind) => ValueKind::of(value) == *kind,
        ElementConstraint::AnyOf(kinds) => kinds.contains(&ValueKind::of(value)),
    }
}
