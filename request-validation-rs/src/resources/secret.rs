//! Secret creation requests

use super::{log_outcome, RequestValidator};
use crate::errors::{ValidationError, ValidationResult};
use crate::mime_types;
use crate::validators::{
    future_datetime, non_negative_integer, not_empty, optional_string, secret_too_big, utils::as_object,
};
use crate::ValidationConfig;
use chrono::{NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::Value;

const SCHEMA: &str = "Secret";

/// A secret request after normalization
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedSecret {
    pub name: Option<String>,
    pub algorithm: Option<String>,
    pub mode: Option<String>,
    pub bit_length: Option<u64>,
    /// `None` means the secret never expires
    pub expiration: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_content_encoding: Option<String>,
}

/// Validates secret creation requests
#[derive(Debug, Clone, Default)]
pub struct NewSecretValidator {
    config: ValidationConfig,
}

impl NewSecretValidator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate against an explicit reference time
    pub fn validate_at(&self, body: &Value, now: NaiveDateTime) -> ValidationResult<ValidatedSecret> {
        let obj = as_object(SCHEMA, body)?;

        let name = optional_string(SCHEMA, "name", obj.get("name"))?;
        let algorithm = optional_string(SCHEMA, "algorithm", obj.get("algorithm"))?;
        let mode = optional_string(SCHEMA, "mode", obj.get("mode"))?;
        let bit_length = non_negative_integer(SCHEMA, "bit_length", obj.get("bit_length"))?;
        let expiration = future_datetime(SCHEMA, "expiration", obj.get("expiration"), now)?;

        let content_type = optional_string(SCHEMA, "payload_content_type", obj.get("payload_content_type"))?;
        let content_encoding =
            optional_string(SCHEMA, "payload_content_encoding", obj.get("payload_content_encoding"))?;

        let (payload, payload_content_type) = match obj.get("payload") {
            Some(raw) => {
                let payload = optional_string(SCHEMA, "payload", Some(raw))?.unwrap_or_default();
                let content_type = content_type.ok_or_else(|| {
                    ValidationError::invalid_field(
                        SCHEMA,
                        "payload_content_type",
                        "If 'payload' is supplied, 'payload_content_type' must also be supplied.",
                    )
                })?;
                let content_type = self.validate_content_parameters(&content_type, content_encoding.as_deref())?;

                not_empty(SCHEMA, "payload", &payload)?;
                if secret_too_big(payload.as_str(), &self.config) {
                    return Err(ValidationError::invalid_field(
                        SCHEMA,
                        "payload",
                        format!(
                            "'payload' exceeds the maximum allowed size of {} bytes",
                            self.config.max_allowed_secret_in_bytes
                        ),
                    ));
                }
                (Some(payload), Some(content_type))
            }
            None => {
                if content_type.is_some() {
                    return Err(ValidationError::invalid_field(
                        SCHEMA,
                        "payload",
                        "'payload' must be provided when 'payload_content_type' is specified",
                    ));
                }
                (None, None)
            }
        };

        Ok(ValidatedSecret {
            name,
            algorithm,
            mode,
            bit_length,
            expiration,
            payload,
            payload_content_type,
            payload_content_encoding: content_encoding.map(|e| e.to_lowercase()),
        })
    }

    /// Check the content type and encoding pair, returning the normalized type
    fn validate_content_parameters(&self, content_type: &str, encoding: Option<&str>) -> ValidationResult<String> {
        if !mime_types::is_supported(content_type) {
            return Err(ValidationError::invalid_field(
                SCHEMA,
                "payload_content_type",
                format!(
                    "'{}' is not a supported payload_content_type; expected one of {}",
                    content_type,
                    mime_types::supported_list()
                ),
            ));
        }
        let content_type = mime_types::normalize_content_type(content_type);

        if mime_types::is_plain_text(&content_type) {
            if encoding.is_some() {
                return Err(ValidationError::invalid_field(
                    SCHEMA,
                    "payload_content_encoding",
                    "payload_content_encoding must not be specified for plain text payloads",
                ));
            }
            return Ok(content_type);
        }

        match encoding {
            Some(encoding) if !mime_types::is_content_type_with_encoding_supported(&content_type, encoding) => {
                Err(ValidationError::invalid_field(
                    SCHEMA,
                    "payload_content_encoding",
                    format!(
                        "payload_content_encoding '{}' is not supported for '{}'",
                        encoding, content_type
                    ),
                ))
            }
            None if content_type == "application/octet-stream" => Err(ValidationError::invalid_field(
                SCHEMA,
                "payload_content_encoding",
                "payload_content_encoding must be specified when payload_content_type is application/octet-stream",
            )),
            _ => Ok(content_type),
        }
    }
}

impl RequestValidator for NewSecretValidator {
    type Output = ValidatedSecret;

    fn name(&self) -> &'static str {
        SCHEMA
    }

    fn validate(&self, body: &Value) -> ValidationResult<ValidatedSecret> {
        log_outcome(SCHEMA, self.validate_at(body, Utc::now().naive_utc()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn secret_req() -> Value {
        json!({
            "name": "name",
            "payload_content_type": "text/plain",
            "algorithm": "algo",
            "bit_length": 512,
            "mode": "cytype",
            "payload": "not-encrypted"
        })
    }

    fn validator() -> NewSecretValidator {
        NewSecretValidator::new(ValidationConfig::default())
    }

    #[test]
    fn test_should_validate_all_fields() {
        let result = validator().validate(&secret_req()).unwrap();
        assert_eq!(result.name.as_deref(), Some("name"));
        assert_eq!(result.bit_length, Some(512));
        assert_eq!(result.payload_content_type.as_deref(), Some("text/plain"));
        assert_eq!(result.expiration, None);
    }

    #[test]
    fn test_should_not_mutate_input() {
        let mut req = secret_req();
        req["payload"] = json!("  padded  ");
        let before = req.clone();
        validator().validate(&req).unwrap();
        assert_eq!(req, before);
    }

    #[test]
    fn test_should_validate_empty_name() {
        let mut req = secret_req();
        req["name"] = json!("    ");
        let result = validator().validate(&req).unwrap();
        assert_eq!(result.name.as_deref(), Some(""));
    }

    #[test]
    fn test_should_omit_payload_when_absent() {
        let mut req = secret_req();
        let obj = req.as_object_mut().unwrap();
        obj.remove("payload");
        obj.remove("payload_content_type");

        let result = validator().validate(&req).unwrap();
        assert!(result.payload.is_none());

        let serialized = serde_json::to_value(&result).unwrap();
        assert!(serialized.get("payload").is_none());
        assert!(serialized.get("payload_content_type").is_none());
    }

    #[test]
    fn test_should_raise_content_type_without_payload() {
        let mut req = secret_req();
        req.as_object_mut().unwrap().remove("payload");

        let err = validator().validate(&req).unwrap_err();
        assert_eq!(err.invalid_property(), Some("payload"));
    }

    #[test]
    fn test_should_require_encoding_for_octet_stream() {
        let mut req = secret_req();
        req["payload_content_type"] = json!("application/octet-stream");

        let err = validator().validate(&req).unwrap_err();
        assert_eq!(err.invalid_property(), Some("payload_content_encoding"));
    }

    #[test]
    fn test_should_raise_payload_over_limit() {
        let small = NewSecretValidator::new(ValidationConfig {
            max_allowed_secret_in_bytes: 8,
        });

        let mut req = secret_req();
        req["payload"] = json!("12345678");
        assert!(small.validate(&req).is_ok());

        req["payload"] = json!("123456789");
        let err = small.validate(&req).unwrap_err();
        assert_eq!(err.invalid_property(), Some("payload"));
    }

    #[test]
    fn test_should_raise_non_object_body() {
        let err = validator().validate(&json!("secret")).unwrap_err();
        assert!(err.invalid_property().is_none());
    }
}
