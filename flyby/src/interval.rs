use crate::{
    error::{DateParseError, ResponseError},
    response::CaptureSet,
};
use chrono::{NaiveDateTime, TimeDelta};
use std::cmp::Ordering;
use tracing::{debug, warn};

const MICROS_PER_SECOND: i128 = 1_000_000;

/// Gaps between consecutive captures whose dates could be read.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalList {
    intervals: Vec<TimeDelta>,
    skipped: Vec<DateParseError>,
}

impl IntervalList {
    /// Measures every record from the nearest earlier record with a readable
    /// date. A record whose date cannot be read contributes no interval and is
    /// kept in [`skipped`](IntervalList::skipped) instead.
    pub fn from_captures(captures: &CaptureSet) -> Self {
        let mut intervals = Vec::with_capacity(captures.len().saturating_sub(1));
        let mut skipped = Vec::new();
        let mut previous: Option<NaiveDateTime> = None;

        for record in captures.records() {
            match record.timestamp() {
                Ok(current) => {
                    if let Some(previous) = previous {
                        intervals.push(current - previous);
                    }
                    previous = Some(current);
                }
                Err(err) => {
                    warn!(date = %err.date, "capture record {err}, skipping its interval");
                    skipped.push(err);
                }
            }
        }

        Self { intervals, skipped }
    }

    pub fn intervals(&self) -> &[TimeDelta] {
        &self.intervals
    }

    pub fn skipped(&self) -> &[DateParseError] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Total of all intervals, in microseconds.
    fn total_micros(&self) -> i128 {
        self.intervals.iter().map(|delta| micros(*delta)).sum()
    }
}

fn micros(delta: TimeDelta) -> i128 {
    i128::from(delta.num_seconds()) * MICROS_PER_SECOND
        + i128::from(delta.subsec_nanos() / 1_000)
}

/// Division rounded to the nearest integer, ties to even. `divisor` must be
/// positive.
fn div_round_half_even(numerator: i128, divisor: i128) -> i128 {
    let quotient = numerator.div_euclid(divisor);
    let remainder = numerator.rem_euclid(divisor);

    match (2 * remainder).cmp(&divisor) {
        Ordering::Less => quotient,
        Ordering::Greater => quotient + 1,
        Ordering::Equal if quotient % 2 == 0 => quotient,
        Ordering::Equal => quotient + 1,
    }
}

/// The extrapolated next capture.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// The most recent known capture.
    pub last_capture: NaiveDateTime,
    /// Sum of the intervals divided by the number of capture records.
    pub mean_interval: TimeDelta,
    /// `last_capture + mean_interval`.
    pub next_capture: NaiveDateTime,
    pub records: usize,
    pub intervals: IntervalList,
}

impl Prediction {
    /// Extrapolates the next capture from the mean interval.
    ///
    /// The mean divides by the number of records rather than the number of
    /// intervals, so a single capture predicts itself.
    ///
    /// # Errors
    /// Returns [`ResponseError::AnchorDate`] if the most recent capture has an
    /// unreadable date, and [`ResponseError::OutOfRange`] if the prediction
    /// falls outside the calendar.
    pub fn from_captures(captures: &CaptureSet) -> Result<Self, ResponseError> {
        let last_capture = captures
            .last()
            .timestamp()
            .map_err(ResponseError::AnchorDate)?;

        let intervals = IntervalList::from_captures(captures);

        let records = captures.len();
        let mean = div_round_half_even(intervals.total_micros(), records as i128);
        let mean_interval = i64::try_from(mean)
            .ok()
            .map(TimeDelta::microseconds)
            .ok_or(ResponseError::OutOfRange)?;

        let next_capture = last_capture
            .checked_add_signed(mean_interval)
            .ok_or(ResponseError::OutOfRange)?;

        debug!(
            records,
            intervals = intervals.len(),
            skipped = intervals.skipped().len(),
            mean_interval = %mean_interval,
            "computed mean capture interval"
        );

        Ok(Self {
            last_capture,
            mean_interval,
            next_capture,
            records,
            intervals,
        })
    }
}
