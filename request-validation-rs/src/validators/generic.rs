//! Generic validators
//!
//! Collection-level checks shared by the resource validators.

use crate::errors::{ValidationError, ValidationResult};
use std::collections::HashSet;
use std::hash::Hash;

/// Validate that every value in a collection belongs to an allowed set
pub fn all_in<T>(schema: &str, property: &str, values: &[T], allowed: &[&str], reason: &str) -> ValidationResult<()>
where
    T: AsRef<str>,
{
    if values.iter().all(|value| allowed.contains(&value.as_ref())) {
        Ok(())
    } else {
        Err(ValidationError::invalid_field(schema, property, reason))
    }
}

/// Validate that a collection contains a mandatory value
pub fn contains<T>(schema: &str, property: &str, values: &[T], required: &str, reason: &str) -> ValidationResult<()>
where
    T: AsRef<str>,
{
    if values.iter().any(|value| value.as_ref() == required) {
        Ok(())
    } else {
        Err(ValidationError::invalid_field(schema, property, reason))
    }
}

/// Validate that a collection doesn't contain duplicate values
pub fn no_duplicates<T, I>(schema: &str, property: &str, values: I, reason: &str) -> ValidationResult<()>
where
    T: Eq + Hash,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();

    for value in values {
        if !seen.insert(value) {
            return Err(ValidationError::invalid_field(schema, property, reason));
        }
    }

    Ok(())
}

/// Validate that a collection doesn't exceed a maximum number of items
pub fn max_items<T>(schema: &str, property: &str, collection: &[T], max: usize) -> ValidationResult<()> {
    if collection.len() > max {
        Err(ValidationError::invalid_field(
            schema,
            property,
            format!(
                "'{}' has {} items, more than the maximum of {}",
                property,
                collection.len(),
                max
            ),
        ))
    } else {
        Ok(())
    }
}
