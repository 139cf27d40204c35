//! Field validation shared by the entity validators

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

/// Jurisdiction used when a location or country is not given
pub const DEFAULT_JURISDICTION: &str = "Qatar";

/// Status given to tenders created without one
pub const DEFAULT_TENDER_STATUS: &str = "open";

/// A request field failed validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Absent and `null` are both treated as missing.
pub fn required<T>(field: &str, value: Option<T>) -> ValidationResult<T> {
    value.ok_or_else(|| ValidationError::new(field, "field required"))
}

pub fn non_blank(field: &str, value: String) -> ValidationResult<String> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    Ok(value)
}

pub fn non_negative_decimal(field: &str, value: Decimal) -> ValidationResult<Decimal> {
    if value < Decimal::ZERO {
        return Err(ValidationError::new(
            field,
            "must be greater than or equal to 0",
        ));
    }
    Ok(value)
}

pub fn non_negative_integer(field: &str, value: i64) -> ValidationResult<u64> {
    u64::try_from(value)
        .map_err(|_| ValidationError::new(field, "must be greater than or equal to 0"))
}

/// Parse an ISO 8601 timestamp. Values without an offset are taken as UTC,
/// and a bare date means midnight UTC.
pub fn timestamp(field: &str, value: &str) -> ValidationResult<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    Err(ValidationError::new(
        field,
        format!("'{value}' is not a valid ISO 8601 timestamp"),
    ))
}
