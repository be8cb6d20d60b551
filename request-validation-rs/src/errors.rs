//! Error handling for the validation library
//!
//! Every rejected request surfaces as exactly one [`ValidationError`]. The
//! variant tells callers which kind of failure occurred so they can map it to
//! a response, and [`ValidationError::invalid_property`] names the offending
//! field whenever one can be identified.

use std::fmt;
use thiserror::Error;

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Enum representing the validation failure taxonomy
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Generic schema or business-rule failure
    #[error(
        "Provided object does not match schema '{schema}': {reason}{}",
        property_note(.property)
    )]
    InvalidObject {
        schema: String,
        reason: String,
        property: Option<String>,
    },

    /// Well-formed value that is not permitted in this context
    #[error("No support for value set on field '{field}' on schema '{schema}': {reason}")]
    UnsupportedField {
        field: String,
        schema: String,
        reason: String,
    },

    /// Field required by the selected metadata sub-schema is absent
    #[error("Missing required metadata field for {required}")]
    MissingMetadataField { required: String },

    /// Unrecognized certificate `request_type` discriminator
    #[error("Invalid request_type '{request_type}' for certificate order")]
    InvalidCertificateRequestType { request_type: String },

    /// Malformed PKCS#10 request payload
    #[error("Invalid PKCS10 Data: {reason}")]
    InvalidPkcs10Data { reason: String },

    /// Malformed CMC request payload
    #[error("Invalid CMC Data: {reason}")]
    InvalidCmcData { reason: String },

    /// Malformed subject distinguished name
    #[error("Invalid subject DN: {subject_dn}")]
    InvalidSubjectDn { subject_dn: String },

    /// Malformed certificate extensions
    #[error("Invalid extensions data: {reason}")]
    InvalidExtensionsData { reason: String },

    /// Referenced container is missing, inaccessible or of the wrong type
    #[error("Invalid container: {reason}")]
    InvalidContainer { reason: String },
}

fn property_note(property: &Option<String>) -> String {
    match property {
        Some(p) => format!(". Invalid property: '{}'", p),
        None => String::new(),
    }
}

/// Discriminant-only view of [`ValidationError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidObject,
    UnsupportedField,
    MissingMetadataField,
    InvalidCertificateRequestType,
    InvalidPkcs10Data,
    InvalidCmcData,
    InvalidSubjectDn,
    InvalidExtensionsData,
    InvalidContainer,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidObject => "InvalidObject",
            ErrorKind::UnsupportedField => "UnsupportedField",
            ErrorKind::MissingMetadataField => "MissingMetadataField",
            ErrorKind::InvalidCertificateRequestType => "InvalidCertificateRequestType",
            ErrorKind::InvalidPkcs10Data => "InvalidPKCS10Data",
            ErrorKind::InvalidCmcData => "InvalidCMCData",
            ErrorKind::InvalidSubjectDn => "InvalidSubjectDN",
            ErrorKind::InvalidExtensionsData => "InvalidExtensionsData",
            ErrorKind::InvalidContainer => "InvalidContainer",
        };
        f.write_str(name)
    }
}

impl ValidationError {
    /// Create an `InvalidObject` error attributed to a single property
    pub fn invalid_field<S, P, R>(schema: S, property: P, reason: R) -> Self
    where
        S: Into<String>,
        P: Into<String>,
        R: Into<String>,
    {
        ValidationError::InvalidObject {
            schema: schema.into(),
            reason: reason.into(),
            property: Some(property.into()),
        }
    }

    /// Create an `InvalidObject` error with no identifiable property
    pub fn invalid_object<S: Into<String>, R: Into<String>>(schema: S, reason: R) -> Self {
        ValidationError::InvalidObject {
            schema: schema.into(),
            reason: reason.into(),
            property: None,
        }
    }

    /// Create an `UnsupportedField` error
    pub fn unsupported_field<F, S, R>(field: F, schema: S, reason: R) -> Self
    where
        F: Into<String>,
        S: Into<String>,
        R: Into<String>,
    {
        ValidationError::UnsupportedField {
            field: field.into(),
            schema: schema.into(),
            reason: reason.into(),
        }
    }

    /// Create a `MissingMetadataField` error
    pub fn missing_metadata<S: Into<String>>(required: S) -> Self {
        ValidationError::MissingMetadataField {
            required: required.into(),
        }
    }

    /// The field that failed, when one can be determined
    pub fn invalid_property(&self) -> Option<&str> {
        match self {
            ValidationError::InvalidObject { property, .. } => property.as_deref(),
            ValidationError::UnsupportedField { field, .. } => Some(field),
            ValidationError::MissingMetadataField { required } => Some(required),
            ValidationError::InvalidCertificateRequestType { .. } => Some("request_type"),
            ValidationError::InvalidPkcs10Data { .. } | ValidationError::InvalidCmcData { .. } => {
                Some("request_data")
            }
            ValidationError::InvalidSubjectDn { .. } => Some("subject_dn"),
            ValidationError::InvalidExtensionsData { .. } => Some("extensions"),
            ValidationError::InvalidContainer { .. } => Some("container_ref"),
        }
    }

    /// Human-readable description of the failure
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// The failure kind, for mapping to response codes
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidationError::InvalidObject { .. } => ErrorKind::InvalidObject,
            ValidationError::UnsupportedField { .. } => ErrorKind::UnsupportedField,
            ValidationError::MissingMetadataField { .. } => ErrorKind::MissingMetadataField,
            ValidationError::InvalidCertificateRequestType { .. } => {
                ErrorKind::InvalidCertificateRequestType
            }
            ValidationError::InvalidPkcs10Data { .. } => ErrorKind::InvalidPkcs10Data,
            ValidationError::InvalidCmcData { .. } => ErrorKind::InvalidCmcData,
            ValidationError::InvalidSubjectDn { .. } => ErrorKind::InvalidSubjectDn,
            ValidationError::InvalidExtensionsData { .. } => ErrorKind::InvalidExtensionsData,
            ValidationError::InvalidContainer { .. } => ErrorKind::InvalidContainer,
        }
    }
}
