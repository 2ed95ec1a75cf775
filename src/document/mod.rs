//! Document module: the item-side view the index reads from.
//!
//! Items are any type implementing [`Searchable`]; attribute values come
//! back as [`FieldValue`]s.

pub mod field_value;
pub mod searchable;

// Re-export commonly used types
pub use field_value::FieldValue;
pub use searchable::{Searchable, json_to_field_value};
