//! Order requests
//!
//! The order `type` selects the metadata schema. Certificate orders dispatch
//! a second time on `meta.request_type`, which defaults to `custom`.

use super::{log_outcome, RequestValidator};
use crate::errors::{ValidationError, ValidationResult};
use crate::mime_types;
use crate::validators::{
    check_enum, future_datetime, non_negative_integer, optional_string, required_string,
    utils::{as_object, type_name},
};
use chrono::{NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

const SCHEMA: &str = "Order";
const ORDER_TYPES: &[&str] = &["key", "asymmetric", "certificate"];
const DEFAULT_REQUEST_TYPE: &str = "custom";

/// Order discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Key,
    Asymmetric,
    Certificate,
}

impl OrderType {
    /// Parse the `type` discriminator
    pub fn parse(value: &str) -> ValidationResult<Self> {
        match check_enum(SCHEMA, "type", value, ORDER_TYPES, false)?.as_str() {
            "asymmetric" => Ok(OrderType::Asymmetric),
            "certificate" => Ok(OrderType::Certificate),
            _ => Ok(OrderType::Key),
        }
    }

    fn schema_name(&self) -> &'static str {
        match self {
            OrderType::Key => "Key Order",
            OrderType::Asymmetric => "Asymmetric Order",
            OrderType::Certificate => "Certificate Order",
        }
    }
}

/// Metadata of a symmetric key order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyMeta {
    pub name: Option<String>,
    pub algorithm: String,
    pub bit_length: Option<u64>,
    pub mode: Option<String>,
    pub payload_content_type: Option<String>,
    /// `None` means the generated secret never expires
    pub expiration: Option<NaiveDateTime>,
}

/// Metadata of an asymmetric key pair order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AsymmetricMeta {
    pub name: Option<String>,
    pub algorithm: String,
    pub bit_length: Option<u64>,
    pub mode: Option<String>,
    pub payload_content_type: Option<String>,
    pub passphrase: Option<String>,
    pub expiration: Option<NaiveDateTime>,
}

/// Certificate request sub-schema, selected by `request_type`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "request_type", rename_all = "kebab-case")]
pub enum CertificateRequest {
    SimpleCmc {
        request_data: String,
    },
    FullCmc {
        request_data: String,
    },
    StoredKey {
        container_ref: String,
        subject_dn: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        extensions: Option<String>,
    },
    Custom,
}

impl CertificateRequest {
    pub fn request_type(&self) -> &'static str {
        match self {
            CertificateRequest::SimpleCmc { .. } => "simple-cmc",
            CertificateRequest::FullCmc { .. } => "full-cmc",
            CertificateRequest::StoredKey { .. } => "stored-key",
            CertificateRequest::Custom => "custom",
        }
    }
}

/// Metadata of a certificate order
///
/// Keys the selected sub-schema does not consume, such as the requestor
/// contact fields or CA-specific parameters, are kept verbatim in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CertificateMeta {
    #[serde(flatten)]
    pub request: CertificateRequest,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An order request after normalization
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "meta", rename_all = "lowercase")]
pub enum ValidatedOrder {
    Key(KeyMeta),
    Asymmetric(AsymmetricMeta),
    Certificate(CertificateMeta),
}

impl ValidatedOrder {
    pub fn order_type(&self) -> OrderType {
        match self {
            ValidatedOrder::Key(_) => OrderType::Key,
            ValidatedOrder::Asymmetric(_) => OrderType::Asymmetric,
            ValidatedOrder::Certificate(_) => OrderType::Certificate,
        }
    }
}

/// Validates order requests, dispatching on `type`
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeOrderValidator;

impl TypeOrderValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate against an explicit reference time
    pub fn validate_at(&self, body: &Value, now: NaiveDateTime) -> ValidationResult<ValidatedOrder> {
        let obj = as_object(SCHEMA, body)?;

        let order_type = match obj.get("type") {
            Some(Value::String(value)) => OrderType::parse(value)?,
            Some(other) => {
                return Err(ValidationError::invalid_field(
                    SCHEMA,
                    "type",
                    format!("{} is not of type 'string'", type_name(other)),
                ))
            }
            None => {
                return Err(ValidationError::invalid_field(
                    SCHEMA,
                    "type",
                    "'type' is a required property",
                ))
            }
        };

        let meta = match obj.get("meta") {
            Some(Value::Object(meta)) => meta,
            Some(other) => {
                return Err(ValidationError::invalid_field(
                    SCHEMA,
                    "meta",
                    format!("{} is not of type 'object'", type_name(other)),
                ))
            }
            None => {
                return Err(ValidationError::invalid_field(
                    SCHEMA,
                    "meta",
                    "'meta' is a required property",
                ))
            }
        };

        log::debug!("Validating {} order", order_type.schema_name());
        match order_type {
            OrderType::Key => validate_key_meta(meta, now).map(ValidatedOrder::Key),
            OrderType::Asymmetric => validate_asymmetric_meta(meta, now).map(ValidatedOrder::Asymmetric),
            OrderType::Certificate => validate_certificate_meta(meta).map(ValidatedOrder::Certificate),
        }
    }
}

impl RequestValidator for TypeOrderValidator {
    type Output = ValidatedOrder;

    fn name(&self) -> &'static str {
        SCHEMA
    }

    fn validate(&self, body: &Value) -> ValidationResult<ValidatedOrder> {
        log_outcome(SCHEMA, self.validate_at(body, Utc::now().naive_utc()))
    }
}

fn validate_key_meta(meta: &Map<String, Value>, now: NaiveDateTime) -> ValidationResult<KeyMeta> {
    let schema = OrderType::Key.schema_name();

    let payload_content_type = match optional_string(schema, "payload_content_type", meta.get("payload_content_type"))? {
        Some(content_type) if !mime_types::is_supported(&content_type) => {
            return Err(ValidationError::invalid_field(
                schema,
                "payload_content_type",
                format!(
                    "'{}' is not a supported payload_content_type; expected one of {}",
                    content_type,
                    mime_types::supported_list()
                ),
            ))
        }
        other => other.map(|content_type| mime_types::normalize_content_type(&content_type)),
    };

    Ok(KeyMeta {
        name: optional_string(schema, "name", meta.get("name"))?,
        algorithm: required_string(schema, "algorithm", meta.get("algorithm"))?,
        bit_length: non_negative_integer(schema, "bit_length", meta.get("bit_length"))?,
        mode: optional_string(schema, "mode", meta.get("mode"))?,
        payload_content_type,
        expiration: future_datetime(schema, "expiration", meta.get("expiration"), now)?,
    })
}

fn validate_asymmetric_meta(meta: &Map<String, Value>, now: NaiveDateTime) -> ValidationResult<AsymmetricMeta> {
    let schema = OrderType::Asymmetric.schema_name();

    let payload_content_type = match optional_string(schema, "payload_content_type", meta.get("payload_content_type"))? {
        Some(content_type) if mime_types::is_plain_text(&content_type) => {
            return Err(ValidationError::unsupported_field(
                "payload_content_type",
                schema,
                "plain text payloads are not supported for asymmetric orders",
            ))
        }
        Some(content_type) if !mime_types::is_binary(&content_type) => {
            return Err(ValidationError::invalid_field(
                schema,
                "payload_content_type",
                format!(
                    "'{}' is not a supported payload_content_type; expected one of {}",
                    content_type,
                    mime_types::BINARY.join(", ")
                ),
            ))
        }
        other => other.map(|content_type| mime_types::normalize_content_type(&content_type)),
    };

    Ok(AsymmetricMeta {
        name: optional_string(schema, "name", meta.get("name"))?,
        algorithm: required_string(schema, "algorithm", meta.get("algorithm"))?,
        bit_length: non_negative_integer(schema, "bit_length", meta.get("bit_length"))?,
        mode: optional_string(schema, "mode", meta.get("mode"))?,
        payload_content_type,
        passphrase: optional_string(schema, "passphrase", meta.get("passphrase"))?,
        expiration: future_datetime(schema, "expiration", meta.get("expiration"), now)?,
    })
}

fn validate_certificate_meta(meta: &Map<String, Value>) -> ValidationResult<CertificateMeta> {
    // Only an absent request_type defaults; a blank one is unrecognized
    let request_type = match meta.get("request_type") {
        None => DEFAULT_REQUEST_TYPE,
        Some(Value::String(value)) => value.as_str(),
        Some(other) => {
            return Err(ValidationError::invalid_field(
                OrderType::Certificate.schema_name(),
                "request_type",
                format!("{} is not of type 'string'", type_name(other)),
            ))
        }
    };

    let (request, consumed): (CertificateRequest, &[&str]) = match request_type {
        "simple-cmc" => (
            CertificateRequest::SimpleCmc {
                request_data: required_metadata(meta, "request_data")?,
            },
            &["request_data"][..],
        ),
        "full-cmc" => (
            CertificateRequest::FullCmc {
                request_data: required_metadata(meta, "request_data")?,
            },
            &["request_data"][..],
        ),
        "stored-key" => (
            CertificateRequest::StoredKey {
                container_ref: required_metadata(meta, "container_ref")?,
                subject_dn: required_metadata(meta, "subject_dn")?,
                extensions: metadata_string(meta, "extensions")?,
            },
            &["container_ref", "subject_dn", "extensions"][..],
        ),
        "custom" => (CertificateRequest::Custom, &[][..]),
        other => {
            return Err(ValidationError::InvalidCertificateRequestType {
                request_type: other.to_string(),
            })
        }
    };

    let extra = meta
        .iter()
        .filter(|(key, _)| key.as_str() != "request_type" && !consumed.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Ok(CertificateMeta { request, extra })
}

/// Read an optional metadata string; blank counts as absent
fn metadata_string(meta: &Map<String, Value>, key: &str) -> ValidationResult<Option<String>> {
    let schema = OrderType::Certificate.schema_name();
    Ok(optional_string(schema, key, meta.get(key))?.filter(|value| !value.is_empty()))
}

/// Read a metadata string the selected sub-schema requires
fn required_metadata(meta: &Map<String, Value>, key: &str) -> ValidationResult<String> {
    metadata_string(meta, key)?.ok_or_else(|| ValidationError::missing_metadata(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use serde_json::json;

    fn now() -> NaiveDateTime {
        Utc::now().naive_utc()
    }

    #[test]
    fn test_key_order_defaults_expiration() {
        let req = json!({
            "type": "key",
            "meta": {"name": "secretname", "algorithm": "AES", "bit_length": 256, "mode": "cbc"}
        });
        match TypeOrderValidator::new().validate_at(&req, now()).unwrap() {
            ValidatedOrder::Key(meta) => {
                assert_eq!(meta.algorithm, "AES");
                assert_eq!(meta.bit_length, Some(256));
                assert!(meta.expiration.is_none());
            }
            other => panic!("Expected key order, got {:?}", other),
        }
    }

    #[test]
    fn test_non_string_type_and_meta_name_property() {
        let err = TypeOrderValidator::new()
            .validate_at(&json!({"type": 5, "meta": {}}), now())
            .unwrap_err();
        assert_eq!(err.invalid_property(), Some("type"));

        let err = TypeOrderValidator::new()
            .validate_at(&json!({"type": "key", "meta": "aes"}), now())
            .unwrap_err();
        assert_eq!(err.invalid_property(), Some("meta"));
    }

    #[test]
    fn test_asymmetric_rejects_unknown_content_type_generically() {
        let req = json!({
            "type": "asymmetric",
            "meta": {"algorithm": "RSA", "payload_content_type": "image/png"}
        });
        let err = TypeOrderValidator::new().validate_at(&req, now()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidObject);
        assert_eq!(err.invalid_property(), Some("payload_content_type"));
    }

    #[test]
    fn test_certificate_extra_keys_pass_through() {
        let req = json!({
            "type": "certificate",
            "meta": {
                "request_type": "stored-key",
                "container_ref": "good_container_ref",
                "subject_dn": "cn=server,o=example.com",
                "requestor_name": "User"
            }
        });
        match TypeOrderValidator::new().validate_at(&req, now()).unwrap() {
            ValidatedOrder::Certificate(meta) => {
                assert_eq!(meta.request.request_type(), "stored-key");
                assert_eq!(meta.extra.get("requestor_name"), Some(&json!("User")));
                assert!(meta.extra.get("container_ref").is_none());
            }
            other => panic!("Expected certificate order, got {:?}", other),
        }
    }

    #[test]
    fn test_serialized_shape() {
        let req = json!({"type": "certificate", "meta": {"request_type": "simple-cmc", "request_data": "csr"}});
        let result = TypeOrderValidator::new().validate_at(&req, now()).unwrap();
        let serialized = serde_json::to_value(&result).unwrap();
        assert_eq!(serialized["type"], json!("certificate"));
        assert_eq!(serialized["meta"]["request_type"], json!("simple-cmc"));
        assert_eq!(serialized["meta"]["request_data"], json!("csr"));
    }

    #[test]
    fn test_blank_request_type_is_not_defaulted() {
        for request_type in ["", "   ", " custom "] {
            let req = json!({"type": "certificate", "meta": {"request_type": request_type}});
            let err = TypeOrderValidator::new().validate_at(&req, now()).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidCertificateRequestType);
            assert_eq!(err.invalid_property(), Some("request_type"));
        }

        let req = json!({"type": "certificate", "meta": {"request_type": 7}});
        let err = TypeOrderValidator::new().validate_at(&req, now()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidObject);
        assert_eq!(err.invalid_property(), Some("request_type"));
    }

    #[test]
    fn test_padded_order_type_is_rejected() {
        let req = json!({"type": " key ", "meta": {"algorithm": "AES"}});
        let err = TypeOrderValidator::new().validate_at(&req, now()).unwrap_err();
        assert_eq!(err.invalid_property(), Some("type"));
    }

    #[test]
    fn test_blank_request_data_is_missing() {
        let req = json!({"type": "certificate", "meta": {"request_type": "full-cmc", "request_data": "  "}});
        let err = TypeOrderValidator::new().validate_at(&req, now()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingMetadataField);
    }
}
