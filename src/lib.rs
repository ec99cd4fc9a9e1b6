//! Constraint Schema
//!
//! Converts class validation-rule metadata into JSON Schema documents, one per class.
//!
//! Each rule record names a class, a property, a rule kind (`isEmail`,
//! `maxLength`, `nestedValidation`, ...) and the rule's arguments. Records are
//! grouped per class and property, converted to schema fragments, merged, and
//! assembled into `{ "type": "object", "properties": ..., "required": ... }`.
//!
//! # Example
//!
//! ```
//! use constraint_schema::{generate_schemas, kinds, RuleRecord, SchemaOptions, TypeDescriptor};
//! use serde_json::json;
//!
//! let records = vec![
//!     RuleRecord::new("User", "id", kinds::IS_DEFINED),
//!     RuleRecord::new("User", "id", kinds::IS_STRING),
//!     RuleRecord::new("Post", "author", kinds::NESTED_VALIDATION)
//!         .property_type(TypeDescriptor::class("User")),
//! ];
//!
//! let schemas = generate_schemas(&records, &SchemaOptions::new());
//!
//! assert_eq!(
//!     schemas.get("Post").unwrap().property("author"),
//!     Some(&json!({ "$ref": "#/definitions/User" }))
//! );
//! ```
//!
//! # Required Properties
//!
//! | `skip_missing_properties` | Property is required when |
//! |---------------------------|---------------------------|
//! | `false` (default) | it has no `isOptional` rule |
//! | `true` | it has an `isDefined` rule |
//!
//! A class with no required properties has no `required` key.
//!
//! # Overrides
//!
//! Converters in `SchemaOptions::additional_converters` replace the built-in
//! converter for their rule kind entirely:
//!
//! ```
//! use constraint_schema::{fragment, generate_schemas, kinds, Converter, RuleRecord, SchemaOptions};
//! use serde_json::json;
//!
//! let options = SchemaOptions::new().converter(
//!     kinds::MAX_LENGTH,
//!     Converter::dynamic(|record| {
//!         let max = record.constraint(0).and_then(|v| v.as_u64()).unwrap_or(0);
//!         fragment(json!({ "maxLength": max + 1, "type": "string" }))
//!     }),
//! );
//!
//! let records = vec![RuleRecord::new("User", "name", kinds::MAX_LENGTH).constraints(vec![json!(20)])];
//! let schemas = generate_schemas(&records, &options);
//! assert_eq!(
//!     schemas.get("User").unwrap().property("name"),
//!     Some(&json!({ "maxLength": 21, "type": "string" }))
//! );
//! ```

mod assembler;
mod error;
mod loader;
mod merge;
mod reference;
mod registry;
mod required;
mod types;

pub use assembler::{generate_schemas, ClassSchema, PropertyGroup, SchemaSet};
pub use error::LoadError;
pub use loader::{
    load_json, load_options, load_records, load_records_str, parse_options, parse_records,
};
pub use merge::{merge_fragments, overlay};
pub use reference::reference_fragment;
pub use registry::{fragment, is_builtin, ConvertFn, Converter, ConverterRegistry, BUILTIN_KINDS};
pub use required::{required_properties, RequiredPolicy};
pub use types::{
    json_type_name, kinds, Fragment, OptionsFile, RuleRecord, SchemaOptions, TypeDescriptor,
    DEFAULT_REF_POINTER_PREFIX,
};
