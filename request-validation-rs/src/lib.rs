//! # Request Validation Library
//!
//! Validation of secrets-management API request bodies. Each resource
//! validator takes an untrusted, decoded JSON body and returns either a
//! normalized, typed result or a single structured [`ValidationError`].
//!
//! ## Features
//!
//! - Primitive field checks (strings, non-negative integers, enums, date-times, payload size)
//! - Structural schemas evaluated before business rules
//! - Resource validators for secrets, containers, transport keys, container
//!   consumers and orders
//! - A failure taxonomy that keeps the offending property attributable
//!
//! Validators are stateless apart from a read-only [`ValidationConfig`], so a
//! single instance can be shared between threads.

mod errors;
pub mod mime_types;
pub mod resources;
pub mod schema;
pub mod validators;

pub use errors::{ErrorKind, ValidationError, ValidationResult};
pub use resources::RequestValidator;
pub use schema::Schema;

/// Re-export commonly used validators for convenience
pub mod prelude {
    pub use crate::errors::{ErrorKind, ValidationError, ValidationResult};
    pub use crate::resources::{
        ContainerConsumerValidator, ContainerValidator, NewSecretValidator, NewTransportKeyValidator,
        RequestValidator, TypeOrderValidator,
    };
    pub use crate::validators;
    pub use crate::ValidationConfig;
}

/// Version of the validation library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default maximum allowed secret size in bytes
pub const DEFAULT_MAX_ALLOWED_SECRET_IN_BYTES: usize = 10_000;

/// Configuration for the validation library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationConfig {
    /// Maximum accepted secret payload size, in UTF-8 bytes
    pub max_allowed_secret_in_bytes: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_allowed_secret_in_bytes: DEFAULT_MAX_ALLOWED_SECRET_IN_BYTES,
        }
    }
}

impl ValidationConfig {
    /// Build the configuration from the process environment
    ///
    /// Reads `MAX_ALLOWED_SECRET_IN_BYTES` (a `.env` file is honored), falling
    /// back to [`DEFAULT_MAX_ALLOWED_SECRET_IN_BYTES`].
    pub fn from_env() -> Self {
        let config = Self {
            max_allowed_secret_in_bytes: config_rs::get_max_allowed_secret_in_bytes(
                DEFAULT_MAX_ALLOWED_SECRET_IN_BYTES,
            ),
        };
        log::debug!(
            "Validation configured with max_allowed_secret_in_bytes={}",
            config.max_allowed_secret_in_bytes
        );
        config
    }
}

/// Get a new default configuration
pub fn default_config() -> ValidationConfig {
    ValidationConfig::default()
}
