//! Schema assembly - turns a sequence of rule records into one schema per class.

use std::collections::HashMap;

use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};

use crate::merge::merge_fragments;
use crate::registry::ConverterRegistry;
use crate::required::{required_properties, RequiredPolicy};
use crate::types::{Fragment, RuleRecord, SchemaOptions};

/// Rules targeting one property, in record order.
#[derive(Debug, Clone)]
pub struct PropertyGroup<'a> {
    pub name: &'a str,
    pub records: Vec<&'a RuleRecord>,
}

#[derive(Debug)]
struct ClassGroup<'a> {
    name: &'a str,
    properties: Vec<PropertyGroup<'a>>,
}

/// JSON Schema `object` document for one class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassSchema {
    /// Class name, used as the key in the schema set.
    pub name: String,
    /// Property name to merged fragment, in first-seen order.
    pub properties: Fragment,
    /// Required property names, in first-seen order. Omitted from output when empty.
    pub required: Vec<String>,
}

impl ClassSchema {
    /// Fragment for `property`, if the class has it.
    pub fn property(&self, property: &str) -> Option<&Value> {
        self.properties.get(property)
    }

    pub fn to_value(&self) -> Value {
        let mut result = Map::new();
        result.insert("type".to_string(), Value::from("object"));
        result.insert(
            "properties".to_string(),
            Value::Object(self.properties.clone()),
        );
        if !self.required.is_empty() {
            result.insert(
                "required".to_string(),
                Value::Array(self.required.iter().cloned().map(Value::String).collect()),
            );
        }
        Value::Object(result)
    }
}

impl Serialize for ClassSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

/// Generated class schemas, in first-seen class order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaSet {
    classes: Vec<ClassSchema>,
}

impl SchemaSet {
    /// Schema for the class named `name`.
    pub fn get(&self, name: &str) -> Option<&ClassSchema> {
        self.classes.iter().find(|c| c.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ClassSchema> {
        self.classes.iter()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Class names, in first-seen order.
    pub fn names(&self) -> Vec<&str> {
        self.classes.iter().map(|c| c.name.as_str()).collect()
    }

    /// Map of class name to schema object.
    pub fn to_value(&self) -> Value {
        let map: Map<String, Value> = self
            .classes
            .iter()
            .map(|c| (c.name.clone(), c.to_value()))
            .collect();
        Value::Object(map)
    }

    /// Wrap the set as `{ "definitions": { ... } }`.
    ///
    /// With the default `#/definitions/` prefix, nested references resolve
    /// within the returned document.
    pub fn to_definitions(&self) -> Value {
        json!({ "definitions": self.to_value() })
    }
}

impl<'a> IntoIterator for &'a SchemaSet {
    type Item = &'a ClassSchema;
    type IntoIter = std::slice::Iter<'a, ClassSchema>;

    fn into_iter(self) -> Self::IntoIter {
        self.classes.iter()
    }
}

impl Serialize for SchemaSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.classes.iter().map(|c| (&c.name, c)))
    }
}

/// Generate one JSON Schema per class from validation rule records.
///
/// Records are grouped by class, then by property, keeping first-seen order
/// at both levels. Every rule on a property contributes a fragment; fragments
/// are overlaid left to right. Conversion never fails: unknown rule kinds and
/// malformed arguments contribute empty fragments.
///
/// # Example
///
/// ```
/// use constraint_schema::{generate_schemas, kinds, RuleRecord, SchemaOptions};
/// use serde_json::json;
///
/// let records = vec![
///     RuleRecord::new("User", "email", kinds::IS_EMAIL),
///     RuleRecord::new("User", "nick", kinds::IS_OPTIONAL),
///     RuleRecord::new("User", "nick", kinds::IS_STRING),
/// ];
///
/// let schemas = generate_schemas(&records, &SchemaOptions::new());
/// assert_eq!(
///     schemas.to_value()["User"],
///     json!({
///         "type": "object",
///         "properties": {
///             "email": { "format": "email", "type": "string" },
///             "nick": { "type": "string" }
///         },
///         "required": ["email"]
///     })
/// );
/// ```
pub fn generate_schemas(records: &[RuleRecord], options: &SchemaOptions) -> SchemaSet {
    let registry = ConverterRegistry::new(options);
    let policy = RequiredPolicy::from_skip_missing_properties(options.skip_missing_properties);

    let classes = group_records(records)
        .iter()
        .map(|group| build_class(group, &registry, policy))
        .collect();

    SchemaSet { classes }
}

// --- Internal implementation ---

fn group_records(records: &[RuleRecord]) -> Vec<ClassGroup<'_>> {
    let mut classes: Vec<ClassGroup<'_>> = Vec::new();
    let mut class_index: HashMap<&str, usize> = HashMap::new();
    let mut property_index: HashMap<(&str, &str), usize> = HashMap::new();

    for record in records {
        let class_pos = *class_index
            .entry(record.target_class.as_str())
            .or_insert_with(|| {
                classes.push(ClassGroup {
                    name: &record.target_class,
                    properties: Vec::new(),
                });
                classes.len() - 1
            });
        let class = &mut classes[class_pos];

        let property_pos = *property_index
            .entry((
                record.target_class.as_str(),
                record.property_key.as_str(),
            ))
            .or_insert_with(|| {
                class.properties.push(PropertyGroup {
                    name: &record.property_key,
                    records: Vec::new(),
                });
                class.properties.len() - 1
            });
        class.properties[property_pos].records.push(record);
    }

    classes
}

fn build_class(
    group: &ClassGroup<'_>,
    registry: &ConverterRegistry<'_>,
    policy: RequiredPolicy,
) -> ClassSchema {
    let mut properties = Fragment::new();
    for property in &group.properties {
        let merged = merge_fragments(property.records.iter().map(|r| registry.convert(r)));
        properties.insert(property.name.to_string(), Value::Object(merged));
    }

    let required = required_properties(&group.properties, policy);

    tracing::debug!(
        class = group.name,
        properties = properties.len(),
        required = required.len(),
        "generated class schema"
    );

    ClassSchema {
        name: group.name.to_string(),
        properties,
        required,
    }
}
