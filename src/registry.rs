//! Converter registry - maps rule kinds to schema fragments.
//!
//! Lookup order for a record:
//! 1. a caller-supplied override for the rule kind, used in place of the default
//! 2. the reference resolver, for `nestedValidation`
//! 3. the built-in table
//!
//! A kind with no entry anywhere contributes an empty fragment.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::reference::reference_fragment;
use crate::types::{kinds, Fragment, RuleRecord, SchemaOptions, TypeDescriptor};

/// Rule kinds with a built-in converter.
pub const BUILTIN_KINDS: &[&str] = &[
    kinds::IS_DEFINED,
    kinds::IS_OPTIONAL,
    kinds::CUSTOM_VALIDATION,
    kinds::NESTED_VALIDATION,
    kinds::EQUALS,
    kinds::IS_IN,
    kinds::IS_NOT_IN,
    kinds::IS_BOOLEAN,
    kinds::IS_DATE,
    kinds::IS_NUMBER,
    kinds::IS_STRING,
    kinds::IS_DATE_STRING,
    kinds::IS_ARRAY,
    kinds::IS_INT,
    kinds::IS_ENUM,
    kinds::IS_DIVISIBLE_BY,
    kinds::IS_POSITIVE,
    kinds::IS_NEGATIVE,
    kinds::MIN,
    kinds::MAX,
    kinds::IS_BOOLEAN_STRING,
    kinds::IS_NUMBER_STRING,
    kinds::CONTAINS,
    kinds::NOT_CONTAINS,
    kinds::IS_ALPHA,
    kinds::IS_ALPHANUMERIC,
    kinds::IS_ASCII,
    kinds::IS_BASE64,
    kinds::IS_CREDIT_CARD,
    kinds::IS_EMAIL,
    kinds::IS_FQDN,
    kinds::IS_HEX_COLOR,
    kinds::IS_HEXADECIMAL,
    kinds::IS_IP,
    kinds::IS_ISO8601,
    kinds::IS_JSON,
    kinds::IS_LOWERCASE,
    kinds::IS_UPPERCASE,
    kinds::IS_MILITARY_TIME,
    kinds::IS_URL,
    kinds::IS_UUID,
    kinds::IS_NOT_EMPTY,
    kinds::LENGTH,
    kinds::MIN_LENGTH,
    kinds::MAX_LENGTH,
    kinds::MATCHES,
    kinds::ARRAY_NOT_EMPTY,
    kinds::ARRAY_MIN_SIZE,
    kinds::ARRAY_MAX_SIZE,
    kinds::ARRAY_UNIQUE,
];

/// Function form of a converter.
pub type ConvertFn = dyn Fn(&RuleRecord) -> Fragment + Send + Sync;

/// Produces the schema fragment for one rule record.
#[derive(Clone)]
pub enum Converter {
    /// The same fragment for every record.
    Static(Fragment),
    /// A fragment computed from the record.
    Dynamic(Arc<ConvertFn>),
}

impl Converter {
    /// Wrap a closure as a converter.
    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn(&RuleRecord) -> Fragment + Send + Sync + 'static,
    {
        Converter::Dynamic(Arc::new(f))
    }

    /// Produce the fragment for `record`.
    pub fn apply(&self, record: &RuleRecord) -> Fragment {
        match self {
            Converter::Static(fragment) => fragment.clone(),
            Converter::Dynamic(f) => f(record),
        }
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Converter::Static(fragment) => f.debug_tuple("Static").field(fragment).finish(),
            Converter::Dynamic(_) => f.write_str("Dynamic(<fn>)"),
        }
    }
}

impl From<Fragment> for Converter {
    fn from(fragment: Fragment) -> Self {
        Converter::Static(fragment)
    }
}

/// Non-object values become an empty static fragment.
impl From<Value> for Converter {
    fn from(value: Value) -> Self {
        Converter::Static(fragment(value))
    }
}

/// Convert a JSON object into a fragment. Anything else yields an empty fragment.
pub fn fragment(value: Value) -> Fragment {
    match value {
        Value::Object(map) => map,
        _ => Fragment::new(),
    }
}

/// Built-in converters plus the per-call override layer.
#[derive(Debug, Clone, Copy)]
pub struct ConverterRegistry<'a> {
    overrides: &'a HashMap<String, Converter>,
    ref_pointer_prefix: &'a str,
}

impl<'a> ConverterRegistry<'a> {
    pub fn new(options: &'a SchemaOptions) -> Self {
        Self {
            overrides: &options.additional_converters,
            ref_pointer_prefix: &options.ref_pointer_prefix,
        }
    }

    /// Fragment contributed by `record`, wrapped as array items when the
    /// rule applies to each element.
    pub fn convert(&self, record: &RuleRecord) -> Fragment {
        let resolved = self.resolve(record);
        if record.each && !resolved.is_empty() {
            let mut wrapped = Fragment::new();
            wrapped.insert("items".to_string(), Value::Object(resolved));
            wrapped.insert("type".to_string(), Value::from("array"));
            wrapped
        } else {
            resolved
        }
    }

    fn resolve(&self, record: &RuleRecord) -> Fragment {
        if let Some(converter) = self.overrides.get(&record.rule_kind) {
            tracing::debug!(
                kind = %record.rule_kind,
                class = %record.target_class,
                property = %record.property_key,
                "using override converter"
            );
            return converter.apply(record);
        }

        match self.default_fragment(record) {
            Some(fragment) => fragment,
            None => {
                tracing::debug!(
                    kind = %record.rule_kind,
                    class = %record.target_class,
                    property = %record.property_key,
                    "no converter for rule kind"
                );
                Fragment::new()
            }
        }
    }

    /// Built-in fragment for `record`, or `None` for an unknown rule kind.
    ///
    /// Known kinds whose arguments have the wrong shape yield an empty fragment.
    pub fn default_fragment(&self, record: &RuleRecord) -> Option<Fragment> {
        let result = match record.rule_kind.as_str() {
            kinds::IS_DEFINED | kinds::IS_OPTIONAL => Fragment::new(),
            kinds::CUSTOM_VALIDATION => record
                .property_type
                .primitive_name()
                .map(|name| fragment(json!({ "type": name })))
                .unwrap_or_default(),
            kinds::NESTED_VALIDATION => {
                // `each` wraps the result in an array, so reference the element type.
                let target = match &record.property_type {
                    TypeDescriptor::Array(inner) if record.each => inner.as_ref(),
                    other => other,
                };
                reference_fragment(target, self.ref_pointer_prefix)
                    .unwrap_or_else(|| {
                        tracing::warn!(
                            class = %record.target_class,
                            property = %record.property_key,
                            "nested validation on a property without a class type"
                        );
                        Fragment::new()
                    })
            }

            kinds::EQUALS => match record.constraint(0) {
                Some(value) => match primitive_type_of(value) {
                    Some(ty) => fragment(json!({ "enum": [value], "type": ty })),
                    None => Fragment::new(),
                },
                None => Fragment::new(),
            },
            kinds::IS_IN => match record.constraint(0) {
                Some(Value::Array(values)) => enum_fragment(values),
                _ => Fragment::new(),
            },
            kinds::IS_NOT_IN => match record.constraint(0) {
                Some(Value::Array(values)) => fragment(json!({ "not": { "enum": values } })),
                _ => Fragment::new(),
            },

            kinds::IS_BOOLEAN => fragment(json!({ "type": "boolean" })),
            kinds::IS_NUMBER => fragment(json!({ "type": "number" })),
            kinds::IS_INT => fragment(json!({ "type": "integer" })),
            kinds::IS_STRING => fragment(json!({ "type": "string" })),
            kinds::IS_DATE | kinds::IS_ISO8601 => fragment(json!({
                "oneOf": [
                    { "format": "date", "type": "string" },
                    { "format": "date-time", "type": "string" }
                ]
            })),
            kinds::IS_DATE_STRING => fragment(json!({ "format": "date-time", "type": "string" })),
            kinds::IS_ARRAY => fragment(json!({ "items": {}, "type": "array" })),
            kinds::IS_ENUM => match record.constraint(0) {
                Some(Value::Object(entries)) => {
                    let values: Vec<Value> = entries.values().cloned().collect();
                    enum_fragment(&values)
                }
                Some(Value::Array(values)) => enum_fragment(values),
                _ => Fragment::new(),
            },

            kinds::IS_DIVISIBLE_BY => numeric_bound(record, "multipleOf", "number"),
            kinds::IS_POSITIVE => fragment(json!({
                "exclusiveMinimum": true,
                "minimum": 0,
                "type": "number"
            })),
            kinds::IS_NEGATIVE => fragment(json!({
                "exclusiveMaximum": true,
                "maximum": 0,
                "type": "number"
            })),
            kinds::MIN => numeric_bound(record, "minimum", "number"),
            kinds::MAX => numeric_bound(record, "maximum", "number"),

            kinds::IS_BOOLEAN_STRING => fragment(json!({
                "enum": ["true", "false"],
                "type": "string"
            })),
            kinds::IS_NUMBER_STRING => string_pattern(r"^[-+]?[0-9]+$"),
            kinds::CONTAINS => match record.constraint(0).and_then(Value::as_str) {
                Some(seed) => string_pattern(&format!(".*{}.*", regex::escape(seed))),
                None => Fragment::new(),
            },
            kinds::NOT_CONTAINS => match record.constraint(0).and_then(Value::as_str) {
                Some(seed) => fragment(json!({
                    "not": { "pattern": format!(".*{}.*", regex::escape(seed)) },
                    "type": "string"
                })),
                None => Fragment::new(),
            },
            kinds::IS_ALPHA => string_pattern(r"^[a-zA-Z]+$"),
            kinds::IS_ALPHANUMERIC => string_pattern(r"^[0-9a-zA-Z]+$"),
            kinds::IS_ASCII => string_pattern(r"^[\x00-\x7F]+$"),
            kinds::IS_HEX_COLOR => string_pattern(r"^#?([0-9A-F]{3}|[0-9A-F]{6})$"),
            kinds::IS_HEXADECIMAL => string_pattern(r"^[0-9a-fA-F]+$"),
            kinds::IS_MILITARY_TIME => string_pattern(r"^([01]\d|2[0-3]):?([0-5]\d)$"),
            kinds::MATCHES => match record.constraint(0).and_then(Value::as_str) {
                Some(pattern) => string_pattern(pattern),
                None => Fragment::new(),
            },

            kinds::IS_BASE64 => string_format("base64"),
            kinds::IS_CREDIT_CARD => string_format("credit-card"),
            kinds::IS_EMAIL => string_format("email"),
            kinds::IS_FQDN => string_format("hostname"),
            kinds::IS_JSON => string_format("json"),
            kinds::IS_URL => string_format("uri"),
            kinds::IS_UUID => string_format("uuid"),
            kinds::IS_IP => {
                let version = match record.constraint(0) {
                    Some(Value::String(v)) if v == "6" => 6,
                    Some(Value::Number(n)) if n.as_u64() == Some(6) => 6,
                    _ => 4,
                };
                string_format(&format!("ipv{}", version))
            }
            kinds::IS_LOWERCASE | kinds::IS_UPPERCASE => fragment(json!({ "type": "string" })),

            kinds::IS_NOT_EMPTY => fragment(json!({ "minLength": 1, "type": "string" })),
            kinds::LENGTH => match (record.constraint(0), record.constraint(1)) {
                (Some(min @ Value::Number(_)), Some(max @ Value::Number(_))) => fragment(json!({
                    "maxLength": max,
                    "minLength": min,
                    "type": "string"
                })),
                (Some(min @ Value::Number(_)), _) => {
                    fragment(json!({ "minLength": min, "type": "string" }))
                }
                _ => Fragment::new(),
            },
            kinds::MIN_LENGTH => numeric_bound(record, "minLength", "string"),
            kinds::MAX_LENGTH => numeric_bound(record, "maxLength", "string"),

            kinds::ARRAY_NOT_EMPTY => fragment(json!({
                "items": {},
                "minItems": 1,
                "type": "array"
            })),
            kinds::ARRAY_MIN_SIZE => array_bound(record, "minItems"),
            kinds::ARRAY_MAX_SIZE => array_bound(record, "maxItems"),
            kinds::ARRAY_UNIQUE => fragment(json!({
                "items": {},
                "type": "array",
                "uniqueItems": true
            })),

            _ => return None,
        };
        Some(result)
    }
}

/// Whether `kind` has a built-in converter.
pub fn is_builtin(kind: &str) -> bool {
    BUILTIN_KINDS.contains(&kind)
}

// --- Internal helpers ---

fn primitive_type_of(value: &Value) -> Option<&'static str> {
    match value {
        Value::String(_) => Some("string"),
        Value::Number(_) => Some("number"),
        Value::Bool(_) => Some("boolean"),
        _ => None,
    }
}

/// `enum` fragment, typed when every value shares one primitive type.
fn enum_fragment(values: &[Value]) -> Fragment {
    let mut result = Fragment::new();
    result.insert("enum".to_string(), Value::Array(values.to_vec()));

    let mut types = values.iter().map(primitive_type_of);
    if let Some(Some(first)) = types.next() {
        if types.all(|t| t == Some(first)) {
            result.insert("type".to_string(), Value::from(first));
        }
    }
    result
}

/// `{ <keyword>: constraints[0], type }`, or empty if the argument is not a number.
fn numeric_bound(record: &RuleRecord, keyword: &str, ty: &str) -> Fragment {
    match record.constraint(0) {
        Some(bound @ Value::Number(_)) => {
            let mut result = Fragment::new();
            result.insert(keyword.to_string(), bound.clone());
            result.insert("type".to_string(), Value::from(ty));
            result
        }
        _ => Fragment::new(),
    }
}

fn array_bound(record: &RuleRecord, keyword: &str) -> Fragment {
    let mut result = numeric_bound(record, keyword, "array");
    if !result.is_empty() {
        result.insert("items".to_string(), json!({}));
    }
    result
}

fn string_pattern(pattern: &str) -> Fragment {
    fragment(json!({ "pattern": pattern, "type": "string" }))
}

fn string_format(format: &str) -> Fragment {
    fragment(json!({ "format": format, "type": "string" }))
}
