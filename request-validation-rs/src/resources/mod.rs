//! Resource validators
//!
//! One validator per request kind. Each exposes a single entry point through
//! [`RequestValidator`] and builds its rules from the primitives in
//! [`crate::validators`].

pub mod consumer;
pub mod container;
pub mod order;
pub mod secret;
pub mod transport_key;

pub use consumer::{ContainerConsumerValidator, ValidatedConsumer};
pub use container::{ContainerType, ContainerValidator, SecretRef, ValidatedContainer};
pub use order::{
    AsymmetricMeta, CertificateMeta, CertificateRequest, KeyMeta, OrderType, TypeOrderValidator,
    ValidatedOrder,
};
pub use secret::{NewSecretValidator, ValidatedSecret};
pub use transport_key::{NewTransportKeyValidator, ValidatedTransportKey};

use crate::errors::ValidationResult;
use serde_json::Value;

/// A validator for one kind of request body
pub trait RequestValidator {
    /// Normalized result produced on success
    type Output;

    /// Schema name used in error messages
    fn name(&self) -> &'static str;

    /// Validate a decoded request body
    ///
    /// The body is never modified; on failure no partial result is returned.
    fn validate(&self, body: &Value) -> ValidationResult<Self::Output>;
}

/// Log the outcome of a validation run
pub(crate) fn log_outcome<T>(name: &str, result: ValidationResult<T>) -> ValidationResult<T> {
    match &result {
        Ok(_) => log::debug!("{} request passed validation", name),
        Err(err) => log::warn!(
            "{} request rejected (property: {}): {}",
            name,
            err.invalid_property().unwrap_or("-"),
            err
        ),
    }
    result
}
