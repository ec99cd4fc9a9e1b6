//! Core types for rule-to-schema conversion.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::registry::Converter;

/// Default prefix for `$ref` pointers to other class schemas.
pub const DEFAULT_REF_POINTER_PREFIX: &str = "#/definitions/";

/// A partial JSON Schema object describing one aspect of a property.
pub type Fragment = Map<String, Value>;

/// Rule kind tags, following the class-validator vocabulary.
pub mod kinds {
    // Markers
    pub const IS_DEFINED: &str = "isDefined";
    pub const IS_OPTIONAL: &str = "isOptional";
    pub const CUSTOM_VALIDATION: &str = "customValidation";
    pub const NESTED_VALIDATION: &str = "nestedValidation";

    // Equality
    pub const EQUALS: &str = "equals";
    pub const IS_IN: &str = "isIn";
    pub const IS_NOT_IN: &str = "isNotIn";

    // Type checks
    pub const IS_BOOLEAN: &str = "isBoolean";
    pub const IS_DATE: &str = "isDate";
    pub const IS_NUMBER: &str = "isNumber";
    pub const IS_STRING: &str = "isString";
    pub const IS_DATE_STRING: &str = "isDateString";
    pub const IS_ARRAY: &str = "isArray";
    pub const IS_INT: &str = "isInt";
    pub const IS_ENUM: &str = "isEnum";

    // Numbers
    pub const IS_DIVISIBLE_BY: &str = "isDivisibleBy";
    pub const IS_POSITIVE: &str = "isPositive";
    pub const IS_NEGATIVE: &str = "isNegative";
    pub const MIN: &str = "min";
    pub const MAX: &str = "max";

    // Strings
    pub const IS_BOOLEAN_STRING: &str = "isBooleanString";
    pub const IS_NUMBER_STRING: &str = "isNumberString";
    pub const CONTAINS: &str = "contains";
    pub const NOT_CONTAINS: &str = "notContains";
    pub const IS_ALPHA: &str = "isAlpha";
    pub const IS_ALPHANUMERIC: &str = "isAlphanumeric";
    pub const IS_ASCII: &str = "isAscii";
    pub const IS_BASE64: &str = "isBase64";
    pub const IS_CREDIT_CARD: &str = "isCreditCard";
    pub const IS_EMAIL: &str = "isEmail";
    pub const IS_FQDN: &str = "isFqdn";
    pub const IS_HEX_COLOR: &str = "isHexColor";
    pub const IS_HEXADECIMAL: &str = "isHexadecimal";
    pub const IS_IP: &str = "isIp";
    pub const IS_ISO8601: &str = "isIso8601";
    pub const IS_JSON: &str = "isJson";
    pub const IS_LOWERCASE: &str = "isLowercase";
    pub const IS_UPPERCASE: &str = "isUppercase";
    pub const IS_MILITARY_TIME: &str = "isMilitaryTime";
    pub const IS_URL: &str = "isUrl";
    pub const IS_UUID: &str = "isUuid";
    pub const IS_NOT_EMPTY: &str = "isNotEmpty";
    pub const LENGTH: &str = "length";
    pub const MIN_LENGTH: &str = "minLength";
    pub const MAX_LENGTH: &str = "maxLength";
    pub const MATCHES: &str = "matches";

    // Arrays
    pub const ARRAY_NOT_EMPTY: &str = "arrayNotEmpty";
    pub const ARRAY_MIN_SIZE: &str = "arrayMinSize";
    pub const ARRAY_MAX_SIZE: &str = "arrayMaxSize";
    pub const ARRAY_UNIQUE: &str = "arrayUnique";
}

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Resolved runtime type of a validated property.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeDescriptor {
    String,
    Number,
    Boolean,
    /// Another class, referenced by name.
    Class(String),
    /// Array of the inner type.
    Array(Box<TypeDescriptor>),
    /// Type could not be determined.
    #[default]
    Unknown,
}

impl TypeDescriptor {
    /// JSON Schema `type` keyword for primitive descriptors.
    ///
    /// Returns `None` for class references, arrays and unknown types.
    pub fn primitive_name(&self) -> Option<&'static str> {
        match self {
            TypeDescriptor::String => Some("string"),
            TypeDescriptor::Number => Some("number"),
            TypeDescriptor::Boolean => Some("boolean"),
            _ => None,
        }
    }

    /// Shorthand for `TypeDescriptor::Class`.
    pub fn class(name: impl Into<String>) -> Self {
        TypeDescriptor::Class(name.into())
    }

    /// Shorthand for `TypeDescriptor::Array`.
    pub fn array_of(inner: TypeDescriptor) -> Self {
        TypeDescriptor::Array(Box::new(inner))
    }
}

/// One validation rule attached to a class property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleRecord {
    /// Name of the class that owns the property.
    pub target_class: String,
    pub property_key: String,
    pub rule_kind: String,
    /// Rule arguments, in declaration order.
    #[serde(default)]
    pub constraints: Vec<Value>,
    /// Rule applies to each element of an array property.
    #[serde(default)]
    pub each: bool,
    #[serde(default)]
    pub property_type: TypeDescriptor,
    /// Identity of the custom validator behind a `customValidation` record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validator: Option<String>,
}

impl RuleRecord {
    /// Create a record with no constraints and an unknown property type.
    pub fn new(
        target_class: impl Into<String>,
        property_key: impl Into<String>,
        rule_kind: impl Into<String>,
    ) -> Self {
        Self {
            target_class: target_class.into(),
            property_key: property_key.into(),
            rule_kind: rule_kind.into(),
            constraints: Vec::new(),
            each: false,
            property_type: TypeDescriptor::Unknown,
            validator: None,
        }
    }

    /// Set the rule arguments.
    pub fn constraints(mut self, constraints: Vec<Value>) -> Self {
        self.constraints = constraints;
        self
    }

    /// Mark the rule as applying to each array element.
    pub fn each(mut self, each: bool) -> Self {
        self.each = each;
        self
    }

    /// Set the resolved property type.
    pub fn property_type(mut self, property_type: TypeDescriptor) -> Self {
        self.property_type = property_type;
        self
    }

    /// Set the custom validator identity.
    pub fn validator(mut self, validator: impl Into<String>) -> Self {
        self.validator = Some(validator.into());
        self
    }

    /// Constraint argument at `index`, if present.
    pub fn constraint(&self, index: usize) -> Option<&Value> {
        self.constraints.get(index)
    }
}

/// Options for schema generation.
#[derive(Debug, Clone)]
pub struct SchemaOptions {
    /// Prefix for `$ref` pointers to nested class schemas.
    pub ref_pointer_prefix: String,
    /// Converters that replace the built-in ones, keyed by rule kind.
    pub additional_converters: HashMap<String, Converter>,
    /// When true, only properties marked `isDefined` are required.
    pub skip_missing_properties: bool,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self {
            ref_pointer_prefix: DEFAULT_REF_POINTER_PREFIX.to_string(),
            additional_converters: HashMap::new(),
            skip_missing_properties: false,
        }
    }
}

impl SchemaOptions {
    /// Create options with default prefix, no overrides and loose required mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `$ref` pointer prefix.
    pub fn ref_pointer_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.ref_pointer_prefix = prefix.into();
        self
    }

    /// Register a converter that replaces the built-in one for `kind`.
    pub fn converter(mut self, kind: impl Into<String>, converter: impl Into<Converter>) -> Self {
        self.additional_converters
            .insert(kind.into(), converter.into());
        self
    }

    /// Select strict required mode.
    pub fn skip_missing_properties(mut self, skip: bool) -> Self {
        self.skip_missing_properties = skip;
        self
    }
}

/// Options as read from a JSON options file.
///
/// Converters in a file can only be static fragments. Unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptionsFile {
    pub ref_pointer_prefix: Option<String>,
    pub additional_converters: HashMap<String, Fragment>,
    pub skip_missing_properties: Option<bool>,
}

impl From<OptionsFile> for SchemaOptions {
    fn from(file: OptionsFile) -> Self {
        let mut options = SchemaOptions::new();
        if let Some(prefix) = file.ref_pointer_prefix {
            options.ref_pointer_prefix = prefix;
        }
        if let Some(skip) = file.skip_missing_properties {
            options.skip_missing_properties = skip;
        }
        for (kind, fragment) in file.additional_converters {
            options
                .additional_converters
                .insert(kind, Converter::Static(fragment));
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn type_descriptor_primitive_names() {
        assert_eq!(TypeDescriptor::String.primitive_name(), Some("string"));
        assert_eq!(TypeDescriptor::Number.primitive_name(), Some("number"));
        assert_eq!(TypeDescriptor::Boolean.primitive_name(), Some("boolean"));
        assert_eq!(TypeDescriptor::class("User").primitive_name(), None);
        assert_eq!(TypeDescriptor::Unknown.primitive_name(), None);
    }

    #[test]
    fn type_descriptor_deserializes() {
        let t: TypeDescriptor = serde_json::from_value(json!("string")).unwrap();
        assert_eq!(t, TypeDescriptor::String);

        let t: TypeDescriptor = serde_json::from_value(json!({ "class": "User" })).unwrap();
        assert_eq!(t, TypeDescriptor::class("User"));

        let t: TypeDescriptor =
            serde_json::from_value(json!({ "array": { "class": "Tag" } })).unwrap();
        assert_eq!(t, TypeDescriptor::array_of(TypeDescriptor::class("Tag")));
    }

    #[test]
    fn rule_record_defaults_optional_fields() {
        let record: RuleRecord = serde_json::from_value(json!({
            "targetClass": "User",
            "propertyKey": "id",
            "ruleKind": "isString"
        }))
        .unwrap();

        assert!(record.constraints.is_empty());
        assert!(!record.each);
        assert_eq!(record.property_type, TypeDescriptor::Unknown);
        assert_eq!(record.validator, None);
    }

    #[test]
    fn options_file_ignores_unknown_keys() {
        let file: OptionsFile = serde_json::from_value(json!({
            "refPointerPrefix": "#/components/schemas/",
            "somethingElse": 42
        }))
        .unwrap();
        let options = SchemaOptions::from(file);

        assert_eq!(options.ref_pointer_prefix, "#/components/schemas/");
        assert!(!options.skip_missing_properties);
        assert!(options.additional_converters.is_empty());
    }

    #[test]
    fn options_file_converters_are_static() {
        let file: OptionsFile = serde_json::from_value(json!({
            "additionalConverters": {
                "isString": { "type": "string", "description": "text" }
            },
            "skipMissingProperties": true
        }))
        .unwrap();
        let options = SchemaOptions::from(file);

        assert!(options.skip_missing_properties);
        assert!(matches!(
            options.additional_converters.get("isString"),
            Some(Converter::Static(_))
        ));
    }
}
