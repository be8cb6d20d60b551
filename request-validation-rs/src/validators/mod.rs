//! Validator functions and utilities
//!
//! Primitive, field-level checks. Each takes the schema name and the property
//! being checked so that a failure is always attributable to one field.

pub mod datetime;
pub mod generic;
pub mod numeric;
pub mod string;
pub mod url;

// Re-export all validators for convenience
pub use self::datetime::*;
pub use self::generic::*;
pub use self::numeric::*;
pub use self::string::*;
pub use self::url::*;

/// Utility module for validation helpers
pub mod utils {
    use crate::errors::{ValidationError, ValidationResult};
    use serde_json::{Map, Value};

    /// JSON type name of a value, for error messages
    pub fn type_name(value: &Value) -> &'static str {
        match value {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(n) if n.is_f64() => "number",
            Value::Number(_) => "integer",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Require the request body to be a JSON object
    pub fn as_object<'a>(schema: &str, value: &'a Value) -> ValidationResult<&'a Map<String, Value>> {
        value.as_object().ok_or_else(|| {
            ValidationError::invalid_object(
                schema,
                format!("{} is not of type 'object'", type_name(value)),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::utils::*;
    use serde_json::json;

    #[test]
    fn test_as_object() {
        assert!(as_object("Secret", &json!({"name": "n"})).is_ok());

        let err = as_object("Secret", &json!([])).unwrap_err();
        assert!(err.invalid_property().is_none());
        assert!(err.message().contains("array"));
    }

    #[test]
    fn test_type_name() {
        assert_eq!(type_name(&json!(1)), "integer");
        assert_eq!(type_name(&json!(1.5)), "number");
        assert_eq!(type_name(&json!(null)), "null");
    }
}
