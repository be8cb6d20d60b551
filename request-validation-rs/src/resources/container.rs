//! Container creation requests
//!
//! A container bundles secret references under a type-specific schema. The
//! base rules apply to every type; `rsa` and `certificate` containers add a
//! cap on the number of references and a closed set of reference names.

use super::{log_outcome, RequestValidator};
use crate::errors::{ValidationError, ValidationResult};
use crate::schema::{FieldSchema, Schema};
use crate::validators::{
    all_in, check_enum, contains, max_items, no_duplicates, optional_string, secret_id_from_ref,
    utils::as_object,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

const SCHEMA: &str = "Container";
const PROPERTY: &str = "secret_refs";

const CONTAINER_TYPES: &[&str] = &["generic", "rsa", "certificate"];
const RSA_NAMES: &[&str] = &["public_key", "private_key", "private_key_passphrase"];
const CERTIFICATE_NAMES: &[&str] = &[
    "certificate",
    "private_key",
    "private_key_passphrase",
    "intermediates",
];

/// Supported container types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerType {
    Generic,
    Rsa,
    Certificate,
}

impl ContainerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerType::Generic => "generic",
            ContainerType::Rsa => "rsa",
            ContainerType::Certificate => "certificate",
        }
    }

    /// Parse the `type` discriminator
    pub fn parse(value: &str) -> ValidationResult<Self> {
        match check_enum(SCHEMA, "type", value, CONTAINER_TYPES, false)?.as_str() {
            "rsa" => Ok(ContainerType::Rsa),
            "certificate" => Ok(ContainerType::Certificate),
            _ => Ok(ContainerType::Generic),
        }
    }

    /// Maximum number of references, if the type caps it
    pub fn max_refs(&self) -> Option<usize> {
        match self {
            ContainerType::Generic => None,
            ContainerType::Rsa => Some(3),
            ContainerType::Certificate => Some(4),
        }
    }

    /// Reference names the type accepts, if it restricts them
    pub fn allowed_names(&self) -> Option<&'static [&'static str]> {
        match self {
            ContainerType::Generic => None,
            ContainerType::Rsa => Some(RSA_NAMES),
            ContainerType::Certificate => Some(CERTIFICATE_NAMES),
        }
    }

    /// Reference name every container of this type must include
    pub fn required_name(&self) -> Option<&'static str> {
        match self {
            ContainerType::Generic => None,
            ContainerType::Rsa => Some("public_key"),
            ContainerType::Certificate => Some("certificate"),
        }
    }
}

impl fmt::Display for ContainerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a container's `secret_refs` list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecretRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub secret_ref: String,
}

impl SecretRef {
    /// Identifier the reference resolves to
    pub fn secret_id(&self) -> String {
        secret_id_from_ref(&self.secret_ref)
    }
}

/// A container request after normalization
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedContainer {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub container_type: ContainerType,
    pub secret_refs: Vec<SecretRef>,
}

/// Validates container creation requests
#[derive(Debug, Clone)]
pub struct ContainerValidator {
    schema: Schema,
}

impl Default for ContainerValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerValidator {
    pub fn new() -> Self {
        let secret_ref = Schema::builder(SCHEMA)
            .optional_field("name", FieldSchema::string().with_min_length(1).build())
            .required_field("secret_ref", FieldSchema::string().with_min_length(1).build())
            .build();

        let schema = Schema::builder(SCHEMA)
            .optional_field("name", FieldSchema::string().build())
            .required_field("type", FieldSchema::string().build())
            .optional_field(
                PROPERTY,
                FieldSchema::array(FieldSchema::object(secret_ref).build()).build(),
            )
            .build();

        Self { schema }
    }

    fn validate_container(&self, body: &Value) -> ValidationResult<ValidatedContainer> {
        self.schema.validate(body)?;
        let obj = as_object(SCHEMA, body)?;

        let name = optional_string(SCHEMA, "name", obj.get("name"))?;
        let container_type = match obj.get("type").and_then(Value::as_str) {
            Some(value) => ContainerType::parse(value)?,
            None => {
                return Err(ValidationError::invalid_object(
                    SCHEMA,
                    "'type' is a required property",
                ))
            }
        };

        let secret_refs = match obj.get(PROPERTY).and_then(Value::as_array) {
            Some(entries) => entries
                .iter()
                .enumerate()
                .map(|(idx, entry)| parse_secret_ref(idx, entry))
                .collect::<ValidationResult<Vec<_>>>()?,
            None => Vec::new(),
        };

        let names: Vec<String> = secret_refs
            .iter()
            .map(|entry| entry.name.clone().unwrap_or_default())
            .collect();

        no_duplicates(
            SCHEMA,
            PROPERTY,
            names.iter(),
            "Duplicate reference names are not allowed.",
        )?;
        no_duplicates(
            SCHEMA,
            PROPERTY,
            secret_refs.iter().map(SecretRef::secret_id),
            "Duplicate secret ids are not allowed.",
        )?;

        validate_type_rules(container_type, &secret_refs, &names)?;

        Ok(ValidatedContainer {
            name,
            container_type,
            secret_refs,
        })
    }
}

fn parse_secret_ref(idx: usize, entry: &Value) -> ValidationResult<SecretRef> {
    let entry: &Map<String, Value> = entry.as_object().ok_or_else(|| {
        ValidationError::invalid_field(
            SCHEMA,
            PROPERTY,
            format!("secret_refs[{}] must be an object", idx),
        )
    })?;

    let name = match entry.get("name") {
        Some(value) => {
            let name = value.as_str().map(str::trim).unwrap_or_default();
            if name.is_empty() {
                return Err(ValidationError::invalid_field(
                    SCHEMA,
                    PROPERTY,
                    format!("secret_refs[{}].name must be a non-empty string", idx),
                ));
            }
            Some(name.to_string())
        }
        None => None,
    };

    let secret_ref = entry
        .get("secret_ref")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            ValidationError::invalid_field(
                SCHEMA,
                PROPERTY,
                format!("secret_refs[{}].secret_ref must be a non-empty string", idx),
            )
        })?;

    Ok(SecretRef {
        name,
        secret_ref: secret_ref.to_string(),
    })
}

fn validate_type_rules(container_type: ContainerType, secret_refs: &[SecretRef], names: &[String]) -> ValidationResult<()> {
    if let Some(max) = container_type.max_refs() {
        max_items(SCHEMA, PROPERTY, secret_refs, max)?;
    }

    if let Some(allowed) = container_type.allowed_names() {
        all_in(
            SCHEMA,
            PROPERTY,
            names,
            allowed,
            &format!(
                "only {} reference names are allowed for {} type",
                quoted(allowed),
                container_type
            ),
        )?;
    }

    if let Some(required) = container_type.required_name() {
        contains(
            SCHEMA,
            PROPERTY,
            names,
            required,
            &format!(
                "The minimum required reference name for {} type is '{}'",
                container_type, required
            ),
        )?;
    }

    Ok(())
}

fn quoted(names: &[&str]) -> String {
    names
        .iter()
        .map(|name| format!("'{}'", name))
        .collect::<Vec<_>>()
        .join(", ")
}

impl RequestValidator for ContainerValidator {
    type Output = ValidatedContainer;

    fn name(&self) -> &'static str {
        SCHEMA
    }

    fn validate(&self, body: &Value) -> ValidationResult<ValidatedContainer> {
        log_outcome(SCHEMA, self.validate_container(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn generic_req() -> Value {
        json!({
            "name": "name",
            "type": "generic",
            "secret_refs": [
                {"name": "testname", "secret_ref": "1231"},
                {"name": "testname2", "secret_ref": "1232"}
            ]
        })
    }

    #[test]
    fn test_should_validate_all_fields() {
        let result = ContainerValidator::new().validate(&generic_req()).unwrap();
        assert_eq!(result.container_type, ContainerType::Generic);
        assert_eq!(result.secret_refs.len(), 2);
        assert_eq!(result.secret_refs[0].secret_id(), "1231");
    }

    #[test]
    fn test_should_validate_empty_or_missing_secret_refs() {
        let mut req = generic_req();
        req["secret_refs"] = json!([]);
        assert!(ContainerValidator::new().validate(&req).is_ok());

        req.as_object_mut().unwrap().remove("secret_refs");
        let result = ContainerValidator::new().validate(&req).unwrap();
        assert!(result.secret_refs.is_empty());
    }

    #[test]
    fn test_missing_type_has_no_property() {
        let mut req = generic_req();
        req.as_object_mut().unwrap().remove("type");

        let err = ContainerValidator::new().validate(&req).unwrap_err();
        assert!(err.invalid_property().is_none());
    }

    #[test]
    fn test_padded_type_is_rejected() {
        let req = json!({"type": " generic ", "secret_refs": []});
        let err = ContainerValidator::new().validate(&req).unwrap_err();
        assert_eq!(err.invalid_property(), Some("type"));
    }

    #[test]
    fn test_should_raise_whitespace_entry_name() {
        let mut req = generic_req();
        req["secret_refs"][0]["name"] = json!("   ");

        let err = ContainerValidator::new().validate(&req).unwrap_err();
        assert_eq!(err.invalid_property(), Some("secret_refs"));
    }

    #[test]
    fn test_unnamed_references_collide() {
        let req = json!({
            "type": "generic",
            "secret_refs": [{"secret_ref": "1"}, {"secret_ref": "2"}]
        });

        let err = ContainerValidator::new().validate(&req).unwrap_err();
        assert_eq!(err.invalid_property(), Some("secret_refs"));
    }

    #[test]
    fn test_serializes_type_field() {
        let result = ContainerValidator::new().validate(&generic_req()).unwrap();
        let serialized = serde_json::to_value(&result).unwrap();
        assert_eq!(serialized["type"], json!("generic"));
    }
}
