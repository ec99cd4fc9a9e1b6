//! Loading rule records and options from JSON files and strings.

use std::path::Path;

use serde_json::Value;

use crate::error::LoadError;
use crate::types::{json_type_name, OptionsFile, RuleRecord, SchemaOptions};

/// Read and parse a JSON file.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist,
/// or `LoadError::InvalidJson` if the file isn't valid JSON.
pub fn load_json(path: &Path) -> Result<Value, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| LoadError::InvalidJson { source })
}

/// Parse rule records from a JSON value.
///
/// The value must be an array of record objects.
///
/// # Errors
///
/// Returns `LoadError::InvalidArgument` if the value is not an array or an
/// element is not a valid record. The error path points at the element.
pub fn parse_records(value: Value) -> Result<Vec<RuleRecord>, LoadError> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(LoadError::InvalidArgument {
                path: "/".to_string(),
                message: format!(
                    "expected an array of rule records, got {}",
                    json_type_name(&other)
                ),
            })
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value(item).map_err(|e| LoadError::InvalidArgument {
                path: format!("/{}", i),
                message: e.to_string(),
            })
        })
        .collect()
}

/// Load rule records from a JSON file.
pub fn load_records(path: &Path) -> Result<Vec<RuleRecord>, LoadError> {
    parse_records(load_json(path)?)
}

/// Load rule records from a JSON string.
pub fn load_records_str(content: &str) -> Result<Vec<RuleRecord>, LoadError> {
    let value = serde_json::from_str(content).map_err(|source| LoadError::InvalidJson { source })?;
    parse_records(value)
}

/// Parse options from a JSON value. Unrecognized keys are ignored.
///
/// # Errors
///
/// Returns `LoadError::InvalidArgument` if the value is not an object or a
/// recognized option has the wrong type.
pub fn parse_options(value: Value) -> Result<SchemaOptions, LoadError> {
    if !value.is_object() {
        return Err(LoadError::InvalidArgument {
            path: "/".to_string(),
            message: format!("expected an options object, got {}", json_type_name(&value)),
        });
    }

    let file: OptionsFile =
        serde_json::from_value(value).map_err(|e| LoadError::InvalidArgument {
            path: "/".to_string(),
            message: e.to_string(),
        })?;
    Ok(file.into())
}

/// Load options from a JSON file.
pub fn load_options(path: &Path) -> Result<SchemaOptions, LoadError> {
    parse_options(load_json(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeDescriptor;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn load_records_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"[{{"targetClass": "User", "propertyKey": "id", "ruleKind": "isString", "propertyType": "string"}}]"#
        )
        .unwrap();

        let records = load_records(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].target_class, "User");
        assert_eq!(records[0].property_type, TypeDescriptor::String);
    }

    #[test]
    fn load_records_file_not_found() {
        let result = load_records(Path::new("/nonexistent/records.json"));
        assert!(matches!(result, Err(LoadError::FileNotFound { .. })));
    }

    #[test]
    fn load_records_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let result = load_records(file.path());
        assert!(matches!(result, Err(LoadError::InvalidJson { .. })));
    }

    #[test]
    fn parse_records_rejects_non_array() {
        let result = parse_records(json!({ "records": [] }));
        assert!(matches!(
            result,
            Err(LoadError::InvalidArgument { message, .. }) if message.contains("got object")
        ));
    }

    #[test]
    fn parse_records_points_at_bad_element() {
        let result = parse_records(json!([
            { "targetClass": "User", "propertyKey": "id", "ruleKind": "isString" },
            { "targetClass": "User", "propertyKey": "id" }
        ]));
        assert!(matches!(
            result,
            Err(LoadError::InvalidArgument { path, .. }) if path == "/1"
        ));
    }

    #[test]
    fn load_records_str_empty_array() {
        assert!(load_records_str("[]").unwrap().is_empty());
    }

    #[test]
    fn parse_options_values() {
        let options = parse_options(json!({
            "refPointerPrefix": "#/components/schemas/",
            "skipMissingProperties": true
        }))
        .unwrap();
        assert_eq!(options.ref_pointer_prefix, "#/components/schemas/");
        assert!(options.skip_missing_properties);
    }

    #[test]
    fn parse_options_rejects_wrong_type() {
        let result = parse_options(json!({ "skipMissingProperties": "yes" }));
        assert!(matches!(result, Err(LoadError::InvalidArgument { .. })));

        let result = parse_options(json!(["refPointerPrefix"]));
        assert!(matches!(result, Err(LoadError::InvalidArgument { .. })));
    }

    #[test]
    fn load_options_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"additionalConverters": {{"isString": {{"type": "string", "minLength": 1}}}}}}"#).unwrap();

        let options = load_options(file.path()).unwrap();
        assert!(options.additional_converters.contains_key("isString"));
    }
}
