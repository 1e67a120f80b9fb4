use std::{error::Error, fmt};
use thiserror::Error;

/// Exit code for input that could not be turned into a coordinate.
pub const EXIT_INVALID_INPUT: u8 = 2;
/// Exit code for a request that never produced a response body.
pub const EXIT_FETCH_FAILED: u8 = 3;
/// Exit code for a response body that failed validation.
pub const EXIT_INVALID_RESPONSE: u8 = 4;

/// Which half of the coordinate pair was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Latitude => write!(f, "latitude"),
            Axis::Longitude => write!(f, "longitude"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("Both latitude and longitude values must be floats.")]
pub struct InvalidCoordinateError {
    pub axis: Axis,
    pub value: String,
}

/// A capture record whose `date` could not be read with the fixed format.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("for ID {id} had a wrongly formatted date")]
pub struct DateParseError {
    pub id: String,
    pub date: String,
    #[source]
    pub source: chrono::ParseError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// The declared `count` was zero.
    ZeroCount,
    /// The `results` sequence had no records.
    NoRecords,
}

/// Failures of the ordered response validation. The `Display` text is the
/// cause that follows `HTTP GET request for <url>`.
#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("did not return JSON data.")]
    Malformed(#[source] serde_json::Error),

    #[error("{}", missing_field_message(.field, .id.as_deref()))]
    MissingField {
        field: &'static str,
        id: Option<String>,
    },

    #[error("did not contain {} for '{field}' value in JSON", expected_kind(.field))]
    InvalidFieldType { field: &'static str },

    #[error("{}", empty_message(.0))]
    EmptyResult(EmptyReason),

    #[error("count of {expected}, did not match number of results {actual}")]
    CountMismatch { expected: i64, actual: usize },

    /// The most recent capture is the anchor of the prediction, so its date
    /// cannot be skipped.
    #[error("{0}")]
    AnchorDate(#[source] DateParseError),

    #[error("predicted a time outside the representable calendar range")]
    OutOfRange,
}

fn missing_field_message(field: &str, id: Option<&str>) -> String {
    match id {
        Some(id) => format!("for ID {id} did not have a corresponding {field} value"),
        None => format!("did not contain '{field}' key in JSON"),
    }
}

fn empty_message(reason: &EmptyReason) -> &'static str {
    match reason {
        EmptyReason::ZeroCount => {
            "had 0 count in JSON payload, could not calculate the mean interval"
        }
        EmptyReason::NoRecords => "had empty results",
    }
}

fn expected_kind(field: &str) -> &'static str {
    match field {
        "count" => "an integer",
        _ => "an array",
    }
}

/// Everything that can stop a single prediction.
#[derive(Debug, Error)]
pub enum FlybyError {
    #[error(transparent)]
    InvalidCoordinate(#[from] InvalidCoordinateError),

    #[error("HTTP GET request for {url} failed: {}", fetch_cause(.source.as_ref()))]
    Fetch {
        url: String,
        source: Box<dyn Error + Send + Sync + 'static>,
    },

    #[error("HTTP GET request for {url} {reason}")]
    Response { url: String, reason: ResponseError },
}

impl FlybyError {
    pub fn exit_code(&self) -> u8 {
        match self {
            FlybyError::InvalidCoordinate(_) => EXIT_INVALID_INPUT,
            FlybyError::Fetch { .. } => EXIT_FETCH_FAILED,
            FlybyError::Response { .. } => EXIT_INVALID_RESPONSE,
        }
    }
}

fn fetch_cause(source: &(dyn Error + Send + Sync + 'static)) -> String {
    error_chain(source)
}

/// Joins an error and all of its sources with `": "`.
pub fn error_chain(err: &(dyn Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut current = err.source();

    while let Some(cause) = current {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        current = cause.source();
    }

    message
}
