//! conform - runtime schema validation for semi-structured records
//!
//! Declare a schema once per record type — attributes with type
//! constraints, optionality, defaults, casts, custom validators, key
//! restriction, aliasing and delegation — then construct map-backed or
//! list-backed records that are validated on construction and re-validated
//! on every mutation.
//!
//! ```
//! use std::sync::Arc;
//! use serde_json::json;
//! use conform::record::MapRecord;
//! use conform::schema::{AttrOptions, Schema, TypeConstraint};
//! use conform::value::ValueKind;
//!
//! let schema = Arc::new(
//!     Schema::builder("User")
//!         .attribute("name", TypeConstraint::Kind(ValueKind::String), AttrOptions::new())
//!         .attribute(
//!             "age",
//!             TypeConstraint::Kind(ValueKind::Int),
//!             AttrOptions::new().optional().cast(),
//!         )
//!         .build()
//!         .unwrap(),
//! );
//!
//! let user = MapRecord::new(schema, json!({"name": "Ada", "age": "36"})).unwrap();
//! assert_eq!(user.get("age"), Some(&json!(36)));
//! assert_eq!(user.fetch("name"), Some(json!("Ada")));
//! ```

pub mod record;
pub mod schema;
pub mod validate;
pub mod value;

pub use record::{ListRecord, MapRecord};
pub use schema::{AttrOptions, Schema, SchemaError, SchemaRegistry, TypeConstraint};
pub use validate::{ArgumentError, Error, ValidationError, ValidationKind, Validator};
pub use value::{Container, IndifferentMap, Key, ValueKind};
