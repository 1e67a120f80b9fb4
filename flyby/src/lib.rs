//! Predicts the next satellite image capture over a location from the
//! history of past captures.
//!
//! The pipeline is strictly sequential and stops at the first failure:
//!
//! 1. [`Coordinate::parse`] validates the raw latitude and longitude.
//! 2. An [`AssetSource`] performs the single GET for the capture history.
//! 3. [`parse_captures`] validates the payload into a sorted [`CaptureSet`].
//! 4. [`Prediction::from_captures`] adds the mean interval to the last capture.
//!
//! [`Reporter`] turns the outcome into the lines printed by the CLI.

pub mod config;
pub mod coordinate;
pub mod error;
pub mod fetch;
pub mod interval;
pub mod mock;
pub mod report;
pub mod response;

pub use coordinate::Coordinate;
pub use error::FlybyError;
pub use fetch::{AssetRequest, AssetSource, HttpAssetSource};
pub use interval::{IntervalList, Prediction};
pub use report::Reporter;
pub use response::{CaptureRecord, CaptureSet, parse_captures};

use reqwest::Url;
use tracing::debug;

pub struct FlybyPredictor<S> {
    source: S,
    endpoint: Url,
    api_key: String,
}

impl<S: AssetSource> FlybyPredictor<S> {
    pub fn new(source: S, endpoint: Url, api_key: impl Into<String>) -> Self {
        Self {
            source,
            endpoint,
            api_key: api_key.into(),
        }
    }

    /// Validates the raw coordinates, then predicts. Nothing is requested if
    /// either value is not a float.
    pub fn predict(&self, latitude: &str, longitude: &str) -> Result<Prediction, FlybyError> {
        let coordinate = Coordinate::parse(latitude, longitude)?;

        self.predict_at(coordinate)
    }

    pub fn predict_at(&self, coordinate: Coordinate) -> Result<Prediction, FlybyError> {
        let request = AssetRequest::new(&self.endpoint, coordinate, &self.api_key);
        let url = request.redacted().to_string();

        let body = self
            .source
            .fetch(&request)
            .map_err(|err| FlybyError::Fetch {
                url: url.clone(),
                source: Box::new(err),
            })?;

        let captures = parse_captures(&body).map_err(|reason| FlybyError::Response {
            url: url.clone(),
            reason,
        })?;
        debug!(records = captures.len(), "validated capture history");

        Prediction::from_captures(&captures).map_err(|reason| FlybyError::Response { url, reason })
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
