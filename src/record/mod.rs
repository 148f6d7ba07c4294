//! User-facing validated record wrappers, map-backed and list-backed.

mod list;
mod map;

pub use list::ListRecord;
pub use map::MapRecord;
