//! The staged validation pipeline.
//!
//! One run takes a mutable staging container and a schema, and applies
//! the stages in a fixed order — key restriction, defaults, casts,
//! per-attribute validation — so later stages observe earlier stages'
//! effects. The first violation aborts the run; the caller's committed
//! state is never touched because callers stage a candidate copy.
//!
//! Wildcard (global) rules are expanded once per run into one ephemeral
//! spec per key present at pipeline start, and checked after the
//! explicitly declared attributes.

use serde_json::Value;
use tracing::{debug, trace};

use crate::schema::{AttributeSpec, DefaultValue, Schema, TypeConstraint};
use crate::value::{Container, ValueKind};

use super::cast;
use super::constraint;
#[cfg(test)]
use super::errors::Error;
use super::errors::{ValidateResult, ValidationError};

/// Runs the full pipeline over `container` against `schema`.
///
/// On success the container holds the defaulted, cast, validated state.
/// On failure the container's intermediate state is unspecified and must
/// be discarded by the caller.
pub fn run(container: &mut Container, schema: &Schema) -> ValidateResult<()> {
    debug!(
        type_name = %schema.type_name(),
        entries = container.len(),
        "validation pipeline start"
    );

    let globals = expand_globals(container, schema);

    check_key_restriction(container, schema)?;
    apply_defaults(container, schema);
    cast_values(container, schema, &globals)?;
    validate_attributes(container, schema, &globals)?;

    trace!(type_name = %schema.type_name(), "validation pipeline complete");
    Ok(())
}

/// One ephemeral spec per (global rule, key present at pipeline start).
fn expand_globals(container: &Container, schema: &Schema) -> Vec<AttributeSpec> {
    let keys = container.keys();
    schema
        .globals()
        .iter()
        .flat_map(|global| keys.iter().map(|key| global.bind(key.clone())))
        .collect()
}

fn check_key_restriction(container: &Container, schema: &Schema) -> ValidateResult<()> {
    if !schema.restrict() {
        return Ok(());
    }
    let declared = schema.declared_keys();
    for key in container.keys() {
        if !declared.contains(&&key) {
            let allowed: Vec<String> = declared.iter().map(|k| k.to_string()).collect();
            return Err(ValidationError::key_restriction(&allowed, schema.type_name()).into());
        }
    }
    Ok(())
}

/// Fills absent optional attributes, in declaration order, so a
/// reference default can observe an earlier default's effect.
fn apply_defaults(container: &mut Container, schema: &Schema) {
    for spec in schema.optional() {
        let Some(default) = &spec.default else {
            continue;
        };
        let absent = container
            .get(&spec.key)
            .map_or(true, |value| value.is_null());
        if !absent {
            continue;
        }
        let value = match default {
            DefaultValue::Literal(value) => value.clone(),
            DefaultValue::Reference(other) => {
                container.get(other).cloned().unwrap_or(Value::Null)
            }
        };
        trace!(key = %spec.key, "default applied");
        container.set(&spec.key, value);
    }
}

fn cast_values(
    container: &mut Container,
    schema: &Schema,
    globals: &[AttributeSpec],
) -> ValidateResult<()> {
    let declared: Vec<AttributeSpec> = schema.attributes().cloned().collect();
    for spec in declared.iter().chain(globals.iter()) {
        if !spec.cast {
            continue;
        }
        let Some(current) = container.get(&spec.key) else {
            continue;
        };
        if current.is_null() {
            continue;
        }
        let cast_value = cast::apply(spec, current, schema.type_name())?;
        container.set(&spec.key, cast_value);
    }
    Ok(())
}

/// Per-attribute checks in declaration order: required, optional, then
/// global-expanded. For each: presence, type, one_of, custom — the
/// first failure aborts.
fn validate_attributes(
    container: &Container,
    schema: &Schema,
    globals: &[AttributeSpec],
) -> ValidateResult<()> {
    for spec in schema
        .required()
        .iter()
        .chain(schema.optional().iter())
        .chain(globals.iter())
    {
        validate_attribute(container, schema, spec)?;
    }
    Ok(())
}

fn validate_attribute(
    container: &Container,
    schema: &Schema,
    spec: &AttributeSpec,
) -> ValidateResult<()> {
    let value = container.get(&spec.key).cloned().unwrap_or(Value::Null);

    if spec.optional && value.is_null() {
        return Ok(());
    }

    if value.is_null() {
        return Err(ValidationError::presence(&spec.key, schema.type_name()).into());
    }

    if !constraint::satisfies(&spec.constraint, &value) {
        let err = match &spec.constraint {
            TypeConstraint::ArrayOf(of) | TypeConstraint::MapOf(of) => {
                ValidationError::collection_mismatch(&spec.key, &of.describe(), schema.type_name())
            }
            other => ValidationError::type_mismatch(
                &spec.key,
                ValueKind::of(&value),
                &other.describe(),
                schema.type_name(),
            ),
        };
        return Err(err.into());
    }

    if let Some(permitted) = &spec.one_of {
        if !permitted.contains(&value) {
            return Err(
                ValidationError::one_of_violation(&spec.key, permitted, schema.type_name()).into(),
            );
        }
    }

    if let Some(validator) = &spec.validator {
        if !validator.validate(&value, spec, container) {
            return Err(ValidationError::custom_failure(&spec.key, schema.type_name()).into());
        }
    }

    Ok(())
}
