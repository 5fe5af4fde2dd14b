//! Repository layer: entity-scoped database operations.
//!
//! Reads validate every row before handing it to the analytics core:
//! timestamps must parse, ordinals must be in range, tag lists must be
//! JSON arrays. A malformed row fails the whole read with
//! `DatabaseError::InvalidValue`.

mod intake;
mod mood;
mod profile;
mod symptom;

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rusqlite::types::Value;
use uuid::Uuid;

use super::DatabaseError;

// Re-export all public items from sub-modules
pub use intake::*;
pub use mood::*;
pub use profile::*;
pub use symptom::*;

/// Canonical timestamp encoding: RFC 3339, UTC, second precision.
pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub(crate) fn parse_timestamp(field: &str, raw: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| DatabaseError::InvalidValue {
            field: field.into(),
            value: raw.into(),
        })
}

/// Stored timestamps may carry any RFC 3339 offset, which text comparison
/// misorders. Range queries select with bounds padded by this much and keep a
/// row only once its parsed instant falls inside the window.
const RANGE_PADDING_DAYS: i64 = 2;

pub(crate) fn padded_bounds(start: &DateTime<Utc>, end: &DateTime<Utc>) -> (String, String) {
    let pad = Duration::days(RANGE_PADDING_DAYS);
    let lower = start.checked_sub_signed(pad).unwrap_or(DateTime::<Utc>::MIN_UTC);
    let upper = end.checked_add_signed(pad).unwrap_or(DateTime::<Utc>::MAX_UTC);
    (format_timestamp(&lower), format_timestamp(&upper))
}

pub(crate) fn in_range(ts: &DateTime<Utc>, start: &DateTime<Utc>, end: &DateTime<Utc>) -> bool {
    ts >= start && ts <= end
}

pub(crate) fn parse_uuid(field: &str, raw: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(raw).map_err(|_| DatabaseError::InvalidValue {
        field: field.into(),
        value: raw.into(),
    })
}

pub(crate) fn encode_tags(tags: &BTreeSet<String>) -> String {
    // A set of strings always serializes.
    serde_json::to_string(tags).unwrap_or_else(|_| "[]".into())
}

pub(crate) fn decode_tags(field: &str, raw: &str) -> Result<BTreeSet<String>, DatabaseError> {
    let tags: Vec<String> = serde_json::from_str(raw).map_err(|_| DatabaseError::InvalidValue {
        field: field.into(),
        value: raw.into(),
    })?;
    Ok(tags
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect())
}

/// Reads an integer column that may have been written loosely (REAL or TEXT).
/// Non-finite, fractional or non-numeric values are rejected.
pub(crate) fn integer_value(field: &str, value: Value) -> Result<i64, DatabaseError> {
    let invalid = |v: String| DatabaseError::InvalidValue {
        field: field.into(),
        value: v,
    };
    match value {
        Value::Integer(n) => Ok(n),
        Value::Real(f) if f.is_finite() && f.fract() == 0.0 => Ok(f as i64),
        Value::Real(f) => Err(invalid(f.to_string())),
        Value::Text(t) => t.trim().parse::<i64>().map_err(|_| invalid(t)),
        Value::Null => Err(invalid("NULL".into())),
        Value::Blob(_) => Err(invalid("<blob>".into())),
    }
}

pub(crate) fn non_negative(field: &str, value: i64) -> Result<u32, DatabaseError> {
    u32::try_from(value).map_err(|_| DatabaseError::InvalidValue {
        field: field.into(),
        value: value.to_string(),
    })
}
