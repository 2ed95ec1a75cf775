//! Named attribute access for searchable items.
//!
//! The engine knows nothing about an item's shape beyond this trait: the
//! index asks for each configured field by name and stores whatever text
//! comes back. Content types implement it once, typically with a `match`
//! over their attribute names.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::document::field_value::FieldValue;

/// An item that exposes named attributes to the index.
pub trait Searchable {
    /// Return the value of the named attribute, or `None` if the item has no
    /// such attribute.
    fn field(&self, name: &str) -> Option<FieldValue>;
}

impl<T: Searchable + ?Sized> Searchable for &T {
    fn field(&self, name: &str) -> Option<FieldValue> {
        (**self).field(name)
    }
}

impl<T: Searchable + ?Sized> Searchable for Box<T> {
    fn field(&self, name: &str) -> Option<FieldValue> {
        (**self).field(name)
    }
}

impl Searchable for HashMap<String, FieldValue> {
    fn field(&self, name: &str) -> Option<FieldValue> {
        self.get(name).cloned()
    }
}

/// JSON objects are searchable by member name.
///
/// Arrays become lists (nested values use their JSON text), numbers and
/// booleans keep their natural form and nested objects are rendered as JSON.
impl Searchable for Value {
    fn field(&self, name: &str) -> Option<FieldValue> {
        self.as_object().and_then(|object| object.field(name))
    }
}

impl Searchable for Map<String, Value> {
    fn field(&self, name: &str) -> Option<FieldValue> {
        self.get(name).map(json_to_field_value)
    }
}

/// Convert a JSON value into a [`FieldValue`].
pub fn json_to_field_value(value: &Value) -> FieldValue {
    match value {
        Value::Null => FieldValue::Null,
        Value::Bool(b) => FieldValue::Boolean(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => FieldValue::Integer(i),
            None => FieldValue::Float(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => FieldValue::Text(s.clone()),
        Value::Array(values) => FieldValue::List(
            values
                .iter()
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => json_to_field_value(other).to_text(),
                })
                .collect(),
        ),
        Value::Object(_) => FieldValue::Text(value.to_string()),
    }
}
