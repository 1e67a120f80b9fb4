//! Ordered validation of the capture history payload.
//!
//! Every stage either passes the payload on or stops with the first failure,
//! so a response never yields more than one [`ResponseError`].

use crate::error::{DateParseError, EmptyReason, ResponseError};
use chrono::NaiveDateTime;
use serde_json::{Map, Value};

/// The layout of every capture `date`.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Stand-in for a capture record without an `id`.
pub const MISSING_ID: &str = "NONE";

/// One historical capture, as received.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureRecord {
    pub id: Option<String>,
    pub date: String,
}

impl CaptureRecord {
    /// The record id, or [`MISSING_ID`].
    pub fn label(&self) -> &str {
        self.id.as_deref().unwrap_or(MISSING_ID)
    }

    pub fn timestamp(&self) -> Result<NaiveDateTime, DateParseError> {
        NaiveDateTime::parse_from_str(&self.date, DATE_FORMAT).map_err(|source| DateParseError {
            id: self.label().to_string(),
            date: self.date.clone(),
            source,
        })
    }
}

/// Capture records sorted ascending by `date`. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureSet {
    records: Vec<CaptureRecord>,
}

impl CaptureSet {
    pub fn records(&self) -> &[CaptureRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The most recent capture.
    pub fn last(&self) -> &CaptureRecord {
        // A `CaptureSet` is only built from a non-empty list.
        &self.records[self.records.len() - 1]
    }
}

/// A record before its `date` has been checked for presence.
struct RawRecord {
    id: Option<String>,
    date: Option<String>,
}

impl RawRecord {
    fn from_value(value: &Value) -> Self {
        let Some(fields) = value.as_object() else {
            return Self {
                id: None,
                date: None,
            };
        };

        Self {
            id: fields.get("id").map(render),
            date: fields.get("date").map(render),
        }
    }
}

/// Strings are taken verbatim, anything else as its JSON text.
fn render(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Validates a raw response body into a sorted, non-empty [`CaptureSet`].
pub fn parse_captures(body: &str) -> Result<CaptureSet, ResponseError> {
    let payload: Value = serde_json::from_str(body).map_err(ResponseError::Malformed)?;
    let Some(payload) = payload.as_object() else {
        return Err(ResponseError::MissingField {
            field: "count",
            id: None,
        });
    };

    let count = declared_count(payload)?;
    if count == 0 {
        return Err(ResponseError::EmptyResult(EmptyReason::ZeroCount));
    }

    let results = match payload.get("results") {
        None => {
            return Err(ResponseError::MissingField {
                field: "results",
                id: None,
            });
        }
        Some(Value::Array(results)) => results,
        Some(_) => return Err(ResponseError::InvalidFieldType { field: "results" }),
    };

    if i64::try_from(results.len()) != Ok(count) {
        return Err(ResponseError::CountMismatch {
            expected: count,
            actual: results.len(),
        });
    }

    if results.is_empty() {
        return Err(ResponseError::EmptyResult(EmptyReason::NoRecords));
    }

    let mut records: Vec<RawRecord> = results.iter().map(RawRecord::from_value).collect();
    // Lexical order of the fixed date format is chronological order.
    records.sort_by(|a, b| a.date.cmp(&b.date));

    let records = records
        .into_iter()
        .map(|record| match record.date {
            Some(date) => Ok(CaptureRecord {
                id: record.id,
                date,
            }),
            None => Err(ResponseError::MissingField {
                field: "date",
                id: Some(record.id.unwrap_or_else(|| MISSING_ID.to_string())),
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CaptureSet { records })
}

/// Reads `count` the way an integer conversion would: integers, floats
/// truncated toward zero, booleans, and integer text.
fn declared_count(payload: &Map<String, Value>) -> Result<i64, ResponseError> {
    let value = payload.get("count").ok_or(ResponseError::MissingField {
        field: "count",
        id: None,
    })?;

    let count = match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|float| float.is_finite())
                .map(|float| float.trunc() as i64)
        }),
        Value::Bool(flag) => Some(i64::from(*flag)),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    };

    count.ok_or(ResponseError::InvalidFieldType { field: "count" })
}
