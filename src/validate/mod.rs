//! The validation engine: constraint evaluation, cast resolution, the
//! custom validator protocol, and the staged pipeline that ties them
//! together.

pub mod cast;
pub mod constraint;
pub mod errors;
pub mod pipeline;
mod validator;

pub use errors::{ArgumentError, Error, ValidateResult, ValidationError, ValidationKind};
pub use validator::Validator;
