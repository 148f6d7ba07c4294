//! Value model: runtime type tags, generic containers, and the
//! numeric-indifferent lookup adapter.

mod container;
mod indifferent;
mod kind;

pub use container::{Container, Key};
pub use indifferent::IndifferentMap;
pub use kind::ValueKind;
