//! Transport key registration requests

use super::{log_outcome, RequestValidator};
use crate::errors::ValidationResult;
use crate::validators::{optional_string, required_string, utils::as_object};
use serde::Serialize;
use serde_json::Value;

const SCHEMA: &str = "Transport Key";

/// A transport key request after normalization
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedTransportKey {
    pub plugin_name: Option<String>,
    pub transport_key: String,
}

/// Validates transport key registration requests
#[derive(Debug, Clone, Copy, Default)]
pub struct NewTransportKeyValidator;

impl NewTransportKeyValidator {
    pub fn new() -> Self {
        Self
    }
}

impl RequestValidator for NewTransportKeyValidator {
    type Output = ValidatedTransportKey;

    fn name(&self) -> &'static str {
        SCHEMA
    }

    fn validate(&self, body: &Value) -> ValidationResult<ValidatedTransportKey> {
        let result = as_object(SCHEMA, body).and_then(|obj| {
            Ok(ValidatedTransportKey {
                plugin_name: optional_string(SCHEMA, "plugin_name", obj.get("plugin_name"))?,
                transport_key: required_string(SCHEMA, "transport_key", obj.get("transport_key"))?,
            })
        });
        log_outcome(SCHEMA, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_should_validate_all_fields() {
        let req = json!({"plugin_name": "name", "transport_key": " abcdef "});
        let result = NewTransportKeyValidator::new().validate(&req).unwrap();
        assert_eq!(result.transport_key, "abcdef");
        assert_eq!(result.plugin_name.as_deref(), Some("name"));
    }

    #[test]
    fn test_should_raise_with_invalid_json_data_type() {
        assert!(NewTransportKeyValidator::new().validate(&json!([])).is_err());
    }

    #[test]
    fn test_should_raise_with_empty_or_missing_transport_key() {
        for req in [json!({"plugin_name": "name", "transport_key": ""}), json!({"plugin_name": "name"})] {
            let err = NewTransportKeyValidator::new().validate(&req).unwrap_err();
            assert_eq!(err.invalid_property(), Some("transport_key"));
        }
    }

    #[test]
    fn test_should_raise_with_numeric_plugin_name() {
        let req = json!({"plugin_name": 7, "transport_key": "abcdef"});
        let err = NewTransportKeyValidator::new().validate(&req).unwrap_err();
        assert_eq!(err.invalid_property(), Some("plugin_name"));
    }
}
