use crate::error::{Axis, InvalidCoordinateError};

pub type Degrees = f64;

/// A location to predict captures for.
///
/// Only numeric parseability is checked. Out-of-range values are passed to the
/// remote service unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: Degrees,
    pub longitude: Degrees,
}

impl Coordinate {
    pub fn new(latitude: Degrees, longitude: Degrees) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Parses the raw latitude and longitude text, failing on the first value
    /// that is not a finite float.
    pub fn parse(latitude: &str, longitude: &str) -> Result<Self, InvalidCoordinateError> {
        let latitude = parse_degrees(Axis::Latitude, latitude)?;
        let longitude = parse_degrees(Axis::Longitude, longitude)?;

        Ok(Self::new(latitude, longitude))
    }
}

fn parse_degrees(axis: Axis, raw: &str) -> Result<Degrees, InvalidCoordinateError> {
    raw.trim()
        .parse::<Degrees>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| InvalidCoordinateError {
            axis,
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_signed_decimal_degrees() {
        let coordinate = Coordinate::parse("-34.6037", "-58.3816").unwrap();

        assert_eq!(coordinate, Coordinate::new(-34.6037, -58.3816));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let coordinate = Coordinate::parse(" 1.5 ", "\t100.75\n").unwrap();

        assert_eq!(coordinate, Coordinate::new(1.5, 100.75));
    }

    #[test]
    fn integers_are_accepted() {
        let coordinate = Coordinate::parse("45", "-120").unwrap();

        assert_eq!(coordinate, Coordinate::new(45.0, -120.0));
    }

    #[test]
    fn range_is_not_enforced() {
        let coordinate = Coordinate::parse("91", "181").unwrap();

        assert_eq!(coordinate, Coordinate::new(91.0, 181.0));
    }

    #[test]
    fn non_numeric_latitude_is_rejected() {
        let err = Coordinate::parse("abc", "10").unwrap_err();

        assert_eq!(err.axis, Axis::Latitude);
        assert_eq!(err.value, "abc");
        assert_eq!(
            err.to_string(),
            "Both latitude and longitude values must be floats."
        );
    }

    #[test]
    fn non_numeric_longitude_is_rejected() {
        let err = Coordinate::parse("10", "east").unwrap_err();

        assert_eq!(err.axis, Axis::Longitude);
        assert_eq!(err.value, "east");
    }

    #[test]
    fn latitude_is_checked_before_longitude() {
        let err = Coordinate::parse("north", "east").unwrap_err();

        assert_eq!(err.axis, Axis::Latitude);
    }

    #[test]
    fn empty_and_non_finite_values_are_rejected() {
        assert!(Coordinate::parse("", "10").is_err());
        assert!(Coordinate::parse("NaN", "10").is_err());
        assert!(Coordinate::parse("10", "inf").is_err());
    }
}
