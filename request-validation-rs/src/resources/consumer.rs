//! Container consumer registration requests
//!
//! A missing key is reported with the key's quoted name in the message
//! (`'name' is a required property`) as well as in the invalid property.

use super::{log_outcome, RequestValidator};
use crate::errors::ValidationResult;
use crate::validators::{required_string, utils::as_object};
use serde::Serialize;
use serde_json::Value;

const SCHEMA: &str = "Container Consumer";

/// A consumer registration after normalization
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedConsumer {
    pub name: String,
    #[serde(rename = "URL")]
    pub url: String,
}

/// Validates container consumer registrations
#[derive(Debug, Clone, Copy, Default)]
pub struct ContainerConsumerValidator;

impl ContainerConsumerValidator {
    pub fn new() -> Self {
        Self
    }
}

impl RequestValidator for ContainerConsumerValidator {
    type Output = ValidatedConsumer;

    fn name(&self) -> &'static str {
        SCHEMA
    }

    fn validate(&self, body: &Value) -> ValidationResult<ValidatedConsumer> {
        let result = as_object(SCHEMA, body).and_then(|obj| {
            Ok(ValidatedConsumer {
                name: required_string(SCHEMA, "name", obj.get("name"))?,
                url: required_string(SCHEMA, "URL", obj.get("URL"))?,
            })
        });
        log_outcome(SCHEMA, result)
    }
}
