//! Schema-based validation
//!
//! Structural checks that run before any business rule: field types,
//! required fields and minimum string length. Unknown fields are ignored.
//!
//! A schema failure reports the top-level field it happened under as the
//! invalid property, so an error deep inside `secret_refs` is attributed to
//! `secret_refs`. A required field that is missing at the top level has no
//! property to point at, and the error carries none.

use crate::errors::{ValidationError, ValidationResult};
use crate::validators::utils::type_name;
use serde_json::Value;

/// Schema for validating JSON request bodies
#[derive(Debug, Clone)]
pub struct Schema {
    /// Name used in error messages
    name: String,
    /// Field definitions, checked in declaration order
    fields: Vec<(String, FieldSchema)>,
}

/// Schema for a single field
#[derive(Debug, Clone)]
pub struct FieldSchema {
    /// Field type
    field_type: FieldType,
    /// Whether field is required
    required: bool,
    /// Child schema for objects
    object_schema: Option<Box<Schema>>,
    /// Item schema for arrays
    array_item_schema: Option<Box<FieldSchema>>,
    /// Minimum length for strings, in characters
    min_length: Option<usize>,
}

/// Supported field types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// String type
    String,
    /// Object type (with optional schema)
    Object,
    /// Array type
    Array,
}

impl FieldType {
    fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Object => "object",
            FieldType::Array => "array",
        }
    }
}

impl Schema {
    /// Create a builder for a schema with the given name
    pub fn builder(name: &str) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    /// Validate a value against this schema
    pub fn validate(&self, value: &Value) -> ValidationResult<()> {
        self.validate_with_path(value, None, "")
    }

    /// Validate with the top-level property and path used for error reporting
    fn validate_with_path(&self, value: &Value, root: Option<&str>, path: &str) -> ValidationResult<()> {
        let obj = match value {
            Value::Object(obj) => obj,
            other => {
                let reason = format!("{} is not of type 'object'", type_name(other));
                return Err(self.error(root, reason));
            }
        };

        // Check required fields
        for (field_name, field_schema) in &self.fields {
            if field_schema.required && !obj.contains_key(field_name) {
                let reason = format!("'{}' is a required property{}", field_name, location(path));
                return Err(self.error(root, reason));
            }
        }

        // Validate each field
        for (field_name, field_schema) in &self.fields {
            if let Some(field_value) = obj.get(field_name) {
                let field_path = if path.is_empty() {
                    field_name.clone()
                } else {
                    format!("{}.{}", path, field_name)
                };
                let field_root = root.unwrap_or(field_name.as_str());
                field_schema.validate(&self.name, field_value, field_root, &field_path)?;
            }
        }

        Ok(())
    }

    fn error(&self, root: Option<&str>, reason: String) -> ValidationError {
        match root {
            Some(root) => ValidationError::invalid_field(&self.name, root, reason),
            None => ValidationError::invalid_object(&self.name, reason),
        }
    }
}

fn location(path: &str) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!(" in '{}'", path)
    }
}

impl FieldSchema {
    /// Create a new string field schema
    pub fn string() -> FieldSchemaBuilder {
        FieldSchemaBuilder::new(FieldType::String)
    }

    /// Create a new object field schema
    pub fn object(schema: Schema) -> FieldSchemaBuilder {
        let mut builder = FieldSchemaBuilder::new(FieldType::Object);
        builder.schema.object_schema = Some(Box::new(schema));
        builder
    }

    /// Create a new array field schema
    pub fn array(item_schema: FieldSchema) -> FieldSchemaBuilder {
        let mut builder = FieldSchemaBuilder::new(FieldType::Array);
        builder.schema.array_item_schema = Some(Box::new(item_schema));
        builder
    }

    /// Validate a value against this field schema
    fn validate(&self, schema_name: &str, value: &Value, root: &str, path: &str) -> ValidationResult<()> {
        let fail = |reason: String| ValidationError::invalid_field(schema_name, root, reason);

        match (&self.field_type, value) {
            (FieldType::String, Value::String(s)) => {
                if let Some(min_len) = self.min_length {
                    if s.chars().count() < min_len {
                        return Err(fail(format!(
                            "'{}' is too short (minimum length {}) at '{}'",
                            s, min_len, path
                        )));
                    }
                }
            }
            (FieldType::Object, Value::Object(_)) => {
                if let Some(schema) = &self.object_schema {
                    return schema.validate_with_path(value, Some(root), path);
                }
            }
            (FieldType::Array, Value::Array(items)) => {
                if let Some(item_schema) = &self.array_item_schema {
                    for (idx, item) in items.iter().enumerate() {
                        let item_path = format!("{}[{}]", path, idx);
                        item_schema.validate(schema_name, item, root, &item_path)?;
                    }
                }
            }
            (expected, other) => {
                return Err(fail(format!(
                    "{} is not of type '{}' at '{}'",
                    type_name(other),
                    expected.as_str(),
                    path
                )));
            }
        }

        Ok(())
    }
}

/// Builder for field schemas
#[derive(Debug)]
pub struct FieldSchemaBuilder {
    schema: FieldSchema,
}

impl FieldSchemaBuilder {
    /// Create a new field schema builder
    fn new(field_type: FieldType) -> Self {
        Self {
            schema: FieldSchema {
                field_type,
                required: false,
                object_schema: None,
                array_item_schema: None,
                min_length: None,
            },
        }
    }

    /// Set minimum length for strings
    pub fn with_min_length(mut self, min: usize) -> Self {
        self.schema.min_length = Some(min);
        self
    }

    /// Build the field schema
    pub fn build(self) -> FieldSchema {
        self.schema
    }
}

/// Schema builder for constructing schemas fluently
#[derive(Debug)]
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    /// Create a new schema builder
    pub fn new(name: &str) -> Self {
        Self {
            schema: Schema {
                name: name.to_string(),
                fields: Vec::new(),
            },
        }
    }

    /// Add a required field
    pub fn required_field(mut self, name: &str, field_schema: FieldSchema) -> Self {
        let mut field = field_schema;
        field.required = true;
        self.schema.fields.push((name.to_string(), field));
        self
    }

    /// Add an optional field
    pub fn optional_field(mut self, name: &str, field_schema: FieldSchema) -> Self {
        let mut field = field_schema;
        field.required = false;
        self.schema.fields.push((name.to_string(), field));
        self
    }

    /// Build the schema
    pub fn build(self) -> Schema {
        self.schema
    }
}
