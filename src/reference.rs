//! `$ref` fragments for properties that hold another class.

use serde_json::Value;

use crate::types::{Fragment, TypeDescriptor};

/// Build the `$ref` fragment for a class-typed property.
///
/// `Class(name)` yields `{ "$ref": prefix + name }`. An array of classes yields
/// `{ "type": "array", "items": { "$ref": ... } }`. Any other type has no
/// reference and returns `None`.
pub fn reference_fragment(property_type: &TypeDescriptor, prefix: &str) -> Option<Fragment> {
    match property_type {
        TypeDescriptor::Class(name) => Some(ref_to(name, prefix)),
        TypeDescriptor::Array(inner) => match inner.as_ref() {
            TypeDescriptor::Class(name) => {
                let mut result = Fragment::new();
                result.insert("items".to_string(), Value::Object(ref_to(name, prefix)));
                result.insert("type".to_string(), Value::from("array"));
                Some(result)
            }
            _ => None,
        },
        _ => None,
    }
}

fn ref_to(class_name: &str, prefix: &str) -> Fragment {
    let mut result = Fragment::new();
    result.insert(
        "$ref".to_string(),
        Value::String(format!("{}{}", prefix, class_name)),
    );
    result
}
