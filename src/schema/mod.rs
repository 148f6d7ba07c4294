//! Schema declaration and storage.
//!
//! A record type declares its attributes, wildcard rules, delegations
//! and structural flags once, through [`SchemaBuilder`]; the resulting
//! [`Schema`] is immutable and lives in a [`SchemaRegistry`] for the
//! life of the process. Subtype schemas compose their parent's effective
//! lists eagerly at build time.

mod builder;
mod errors;
mod registry;
mod types;

pub use builder::{AttrOptions, SchemaBuilder};
pub use errors::{SchemaError, SchemaResult};
pub use registry::SchemaRegistry;
pub use types::{
    AttributeSpec, CastFn, DefaultValue, ElementConstraint, GlobalSpec, Schema, Transform,
    TypeConstraint,
};
