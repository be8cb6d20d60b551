//! Date-time validators
//!
//! Expiration-style fields accept ISO-8601-like timestamps. A `T` or a single
//! space may separate date and time, a trailing `Z` marks UTC, and an explicit
//! `+HH:MM`/`-HH:MM` offset is folded into the instant. Every parsed value is
//! normalized to naive UTC.

use super::utils::type_name;
use crate::errors::{ValidationError, ValidationResult};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

lazy_static! {
    static ref ISO_TIMESTAMP: Regex = Regex::new(
        r"^(?P<date>\d{4}-\d{2}-\d{2})(?:[Tt ](?P<time>\d{2}:\d{2}(?::\d{2}(?:\.\d+)?)?))?(?P<tz>[Zz]|[+-]\d{2}:?\d{2})?$"
    )
    .expect("timestamp pattern is valid");
}

/// Parse a timestamp and normalize it to naive UTC
///
/// Returns `None` when the text is not a recognizable timestamp.
pub fn parse_datetime(input: &str) -> Option<NaiveDateTime> {
    let captures = ISO_TIMESTAMP.captures(input.trim())?;

    let date = NaiveDate::parse_from_str(captures.name("date")?.as_str(), "%Y-%m-%d").ok()?;
    let naive = match captures.name("time") {
        Some(time) => {
            let time = time.as_str();
            let format = if time.len() == 5 { "%H:%M" } else { "%H:%M:%S%.f" };
            let time = chrono::NaiveTime::parse_from_str(time, format).ok()?;
            date.and_time(time)
        }
        None => date.and_hms_opt(0, 0, 0)?,
    };

    match captures.name("tz").map(|tz| tz.as_str()) {
        None | Some("Z") | Some("z") => Some(naive),
        Some(offset) => {
            let offset = offset_seconds(offset)?;
            naive.checked_sub_signed(Duration::seconds(offset))
        }
    }
}

fn offset_seconds(offset: &str) -> Option<i64> {
    let sign = if offset.starts_with('-') { -1 } else { 1 };
    let digits: String = offset[1..].chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 {
        return None;
    }
    let hours: i64 = digits[..2].parse().ok()?;
    let minutes: i64 = digits[2..].parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(sign * (hours * 3600 + minutes * 60))
}

/// Validate an optional future date-time field
///
/// A blank value means "no value" and yields `Ok(None)`, as does an absent
/// field. Unparseable text, non-string values, and instants at or before
/// `now` fail with `property` as the invalid property.
pub fn future_datetime(
    schema: &str,
    property: &str,
    value: Option<&Value>,
    now: NaiveDateTime,
) -> ValidationResult<Option<NaiveDateTime>> {
    let raw = match value {
        None => return Ok(None),
        Some(Value::String(s)) => s,
        Some(other) => {
            return Err(ValidationError::invalid_field(
                schema,
                property,
                format!("{} is not of type 'string'", type_name(other)),
            ))
        }
    };

    if raw.trim().is_empty() {
        return Ok(None);
    }

    let parsed = parse_datetime(raw).ok_or_else(|| {
        ValidationError::invalid_field(
            schema,
            property,
            format!("Invalid date for '{}'", property),
        )
    })?;

    if parsed <= now {
        return Err(ValidationError::invalid_field(
            schema,
            property,
            format!("'{}' is before current time", property),
        ));
    }

    Ok(Some(parsed))
}
