//! Numeric validators
//!
//! This module provides validators for integer fields and payload sizes.

use super::utils::type_name;
use crate::errors::{ValidationError, ValidationResult};
use crate::ValidationConfig;
use serde_json::Value;

/// Validate an optional non-negative integer field
///
/// Only JSON integers are accepted. Numeric strings such as `"23"` and
/// floating point numbers are rejected rather than coerced.
pub fn non_negative_integer(
    schema: &str,
    property: &str,
    value: Option<&Value>,
) -> ValidationResult<Option<u64>> {
    let value = match value {
        Some(value) => value,
        None => return Ok(None),
    };

    match value {
        Value::Number(n) => {
            if let Some(unsigned) = n.as_u64() {
                Ok(Some(unsigned))
            } else if let Some(signed) = n.as_i64() {
                Err(ValidationError::invalid_field(
                    schema,
                    property,
                    format!("{} is less than the minimum of 0", signed),
                ))
            } else {
                Err(ValidationError::invalid_field(
                    schema,
                    property,
                    format!("{} is not of type 'integer'", n),
                ))
            }
        }
        other => Err(ValidationError::invalid_field(
            schema,
            property,
            format!("{} is not of type 'integer'", type_name(other)),
        )),
    }
}

/// Whether a payload exceeds the configured maximum secret size
///
/// The size is the UTF-8 encoded byte length, so multi-byte characters
/// count for every byte they occupy.
pub fn secret_too_big<P: AsRef<[u8]> + ?Sized>(payload: &P, config: &ValidationConfig) -> bool {
    payload.as_ref().len() > config.max_allowed_secret_in_bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_non_negative_integer() {
        assert_eq!(non_negative_integer("Secret", "bit_length", None).unwrap(), None);
        assert_eq!(
            non_negative_integer("Secret", "bit_length", Some(&json!(512))).unwrap(),
            Some(512)
        );
        assert_eq!(
            non_negative_integer("Secret", "bit_length", Some(&json!(0))).unwrap(),
            Some(0)
        );
    }

    #[test]
    fn test_rejects_negative_and_non_integers() {
        for value in [json!(-23), json!("23"), json!(1.5), json!(null), json!("")] {
            let err = non_negative_integer("Secret", "bit_length", Some(&value)).unwrap_err();
            assert_eq!(err.invalid_property(), Some("bit_length"));
        }
    }

    #[test]
    fn test_secret_too_big_boundary() {
        let config = ValidationConfig {
            max_allowed_secret_in_bytes: 16,
        };

        assert!(!secret_too_big(&[0xb0u8][..], &config));
        assert!(!secret_too_big(&vec![1u8; 16], &config));
        assert!(secret_too_big(&vec![1u8; 17], &config));
        assert!(!secret_too_big("a".repeat(16).as_str(), &config));
        assert!(secret_too_big("a".repeat(17).as_str(), &config));
    }

    #[test]
    fn test_secret_too_big_counts_utf8_bytes() {
        let config = ValidationConfig {
            max_allowed_secret_in_bytes: 16,
        };

        // Four 4-byte characters fill the limit exactly
        let beer = "\u{1F37A}".repeat(4);
        assert!(!secret_too_big(beer.as_str(), &config));

        let over = format!("{}1", beer);
        assert!(secret_too_big(over.as_str(), &config));
    }
}
