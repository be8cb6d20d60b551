//! String validators
//!
//! Field-level string checks. Values are trimmed of surrounding whitespace
//! before emptiness is judged, and the trimmed form is what callers get back.

use super::utils::type_name;
use crate::errors::{ValidationError, ValidationResult};
use serde_json::Value;

/// Validate a string field and return its trimmed value
///
/// An absent optional field yields `Ok(None)`. A present field must be a
/// JSON string; `null` and every other type fail. A required field must
/// also be non-empty after trimming.
pub fn check_string(
    schema: &str,
    property: &str,
    value: Option<&Value>,
    required: bool,
) -> ValidationResult<Option<String>> {
    let value = match value {
        Some(value) => value,
        None if required => {
            return Err(ValidationError::invalid_field(
                schema,
                property,
                format!("'{}' is a required property", property),
            ))
        }
        None => return Ok(None),
    };

    let trimmed = match value {
        Value::String(s) => s.trim().to_string(),
        other => {
            return Err(ValidationError::invalid_field(
                schema,
                property,
                format!("{} is not of type 'string'", type_name(other)),
            ))
        }
    };

    if required && trimmed.is_empty() {
        return Err(ValidationError::invalid_field(
            schema,
            property,
            format!("'{}' must not be empty", property),
        ));
    }

    Ok(Some(trimmed))
}

/// Validate a required string field that must be non-empty after trimming
pub fn required_string(schema: &str, property: &str, value: Option<&Value>) -> ValidationResult<String> {
    check_string(schema, property, value, true)?.ok_or_else(|| {
        ValidationError::invalid_field(
            schema,
            property,
            format!("'{}' is a required property", property),
        )
    })
}

/// Validate an optional string field
pub fn optional_string(schema: &str, property: &str, value: Option<&Value>) -> ValidationResult<Option<String>> {
    check_string(schema, property, value, false)
}

/// Validate that a string is not empty
pub fn not_empty(schema: &str, property: &str, s: &str) -> ValidationResult<()> {
    if s.trim().is_empty() {
        Err(ValidationError::invalid_field(
            schema,
            property,
            format!("If '{}' specified, must be non empty", property),
        ))
    } else {
        Ok(())
    }
}

/// Validate that a value is a member of an allowed set
///
/// The value is compared as given, without trimming. Returns the matched
/// value, lower-cased when matching case-insensitively.
pub fn check_enum(
    schema: &str,
    property: &str,
    value: &str,
    allowed: &[&str],
    case_insensitive: bool,
) -> ValidationResult<String> {
    let candidate = if case_insensitive {
        value.to_lowercase()
    } else {
        value.to_string()
    };

    let found = allowed.iter().any(|allowed_value| {
        if case_insensitive {
            allowed_value.to_lowercase() == candidate
        } else {
            *allowed_value == candidate
        }
    });

    if found {
        Ok(candidate)
    } else {
        Err(ValidationError::invalid_field(
            schema,
            property,
            format!("'{}' is not one of {:?}", value, allowed),
        ))
    }
}
