use crate::{error::FlybyError, interval::Prediction};
use std::error::Error;

/// Renders the single timestamp of a successful run.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Formats the outcome of one prediction for the coordinates it was asked
/// about. The raw input text is echoed, not the parsed values.
pub struct Reporter<'a> {
    latitude: &'a str,
    longitude: &'a str,
}

impl<'a> Reporter<'a> {
    pub fn new(latitude: &'a str, longitude: &'a str) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// The line that opens every failure report.
    pub fn context(&self) -> String {
        format!(
            "Attempted to calculate next flyby picture for coordinates ({}, {})",
            self.latitude, self.longitude
        )
    }

    pub fn success(&self, prediction: &Prediction) -> String {
        format!(
            "Next time: {}",
            prediction.next_capture.format(TIMESTAMP_FORMAT)
        )
    }

    /// One context-and-cause report per capture whose unreadable date was
    /// left out of the mean.
    pub fn skipped(&self, prediction: &Prediction) -> Vec<String> {
        prediction
            .intervals
            .skipped()
            .iter()
            .map(|err| format!("{}\nCapture record {err} ({:?})", self.context(), err.date))
            .collect()
    }

    /// Context line followed by the cause line.
    pub fn failure(&self, err: &FlybyError) -> String {
        format!("{}\n{}", self.context(), err)
    }

    /// Context line followed by the whole source chain, one cause per line,
    /// for failures outside the prediction pipeline.
    pub fn unexpected(&self, err: &(dyn Error + 'static)) -> String {
        let mut report = format!("{}\n{}", self.context(), err);
        let mut current = err.source();

        while let Some(cause) = current {
            report.push_str("\n  caused by: ");
            report.push_str(&cause.to_string());
            current = cause.source();
        }

        report
    }
}
