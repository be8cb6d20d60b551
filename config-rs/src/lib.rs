//! config-rs/lib.rs
//! Shared configuration utilities for the request validation layer
//! Provides standardized functions for reading process-wide limits

use std::env;
use std::sync::Once;

/// Environment variable holding the maximum accepted secret size
pub const MAX_SECRET_SIZE_VAR: &str = "MAX_ALLOWED_SECRET_IN_BYTES";

static DOTENV: Once = Once::new();

/// Load a `.env` file from the working directory, at most once per process
pub fn load_dotenv() {
    DOTENV.call_once(|| {
        if let Ok(path) = dotenv::dotenv() {
            log::debug!("Loaded environment from {}", path.display());
        }
    });
}

/// Read an unsigned size from the environment with proper fallback
///
/// # Arguments
/// * `var_name` - The environment variable to read
/// * `default_value` - The value to use if the variable is unset or malformed
///
/// # Returns
/// The parsed size, or `default_value`
pub fn get_env_usize(var_name: &str, default_value: usize) -> usize {
    match env::var(var_name) {
        Ok(raw) => raw.trim().parse::<usize>().unwrap_or_else(|_| {
            log::warn!(
                "Invalid size '{}' in {}, using default {}",
                raw,
                var_name,
                default_value
            );
            default_value
        }),
        Err(_) => default_value,
    }
}

/// Get the maximum allowed secret size in bytes
///
/// # Arguments
/// * `default_value` - The limit to use if `MAX_ALLOWED_SECRET_IN_BYTES` is not set
///
/// # Returns
/// The configured limit
pub fn get_max_allowed_secret_in_bytes(default_value: usize) -> usize {
    load_dotenv();
    get_env_usize(MAX_SECRET_SIZE_VAR, default_value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_env_usize() {
        // Test with environment variable
        std::env::set_var("TEST_LIMIT_BYTES", "2048");
        assert_eq!(get_env_usize("TEST_LIMIT_BYTES", 10), 2048);

        // Test with surrounding whitespace
        std::env::set_var("TEST_LIMIT_BYTES_WS", " 512 ");
        assert_eq!(get_env_usize("TEST_LIMIT_BYTES_WS", 10), 512);

        // Test with malformed value
        std::env::set_var("TEST_LIMIT_BYTES_BAD", "lots");
        assert_eq!(get_env_usize("TEST_LIMIT_BYTES_BAD", 10), 10);

        // Test with default
        std::env::remove_var("UNKNOWN_LIMIT_BYTES");
        assert_eq!(get_env_usize("UNKNOWN_LIMIT_BYTES", 10), 10);
    }

    #[test]
    fn test_negative_size_falls_back() {
        std::env::set_var("TEST_LIMIT_BYTES_NEG", "-1");
        assert_eq!(get_env_usize("TEST_LIMIT_BYTES_NEG", 42), 42);
    }
}
