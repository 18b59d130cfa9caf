//! Fixed-point coordinate value object
//!
//! Latitude and longitude are stored as integers equal to the degree value
//! multiplied by 1,000,000, so values survive round-trips through text-based
//! wire formats without floating-point drift.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Scale factor between degrees and the fixed-point representation
pub const FIXED_POINT_SCALE: f64 = 1_000_000.0;

const MAX_LAT_E6: i32 = 90_000_000;
const MAX_LON_E6: i32 = 180_000_000;

/// Convert degrees to fixed point: `round(degrees * 1e6)`
///
/// Callers must pass a finite value whose scaled magnitude fits an `i32`;
/// [`Point::from_degrees`] is the checked entry point.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // range checked by callers
pub fn to_fixed_point(degrees: f64) -> i32 {
    (degrees * FIXED_POINT_SCALE).round() as i32
}

/// Convert fixed point back to degrees: `value / 1e6`
#[must_use]
pub fn from_fixed_point(value: i32) -> f64 {
    f64::from(value) / FIXED_POINT_SCALE
}

/// A bare coordinate pair without identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    lat_e6: i32,
    lon_e6: i32,
}

impl Point {
    /// Create a point from fixed-point values (for trusted sources)
    #[must_use]
    pub const fn from_e6(lat_e6: i32, lon_e6: i32) -> Self {
        Self { lat_e6, lon_e6 }
    }

    /// Create a point from fixed-point values with range validation
    ///
    /// # Errors
    ///
    /// Returns `InvalidCoordinate` if latitude is outside ±90° or longitude
    /// outside ±180°.
    pub fn try_from_e6(lat_e6: i32, lon_e6: i32) -> Result<Self, DomainError> {
        if !(-MAX_LAT_E6..=MAX_LAT_E6).contains(&lat_e6) {
            return Err(DomainError::InvalidCoordinate(format!(
                "latitude {lat_e6} out of range"
            )));
        }
        if !(-MAX_LON_E6..=MAX_LON_E6).contains(&lon_e6) {
            return Err(DomainError::InvalidCoordinate(format!(
                "longitude {lon_e6} out of range"
            )));
        }
        Ok(Self { lat_e6, lon_e6 })
    }

    /// Create a point from degrees
    ///
    /// # Errors
    ///
    /// Returns `InvalidCoordinate` for non-finite values or values outside
    /// the valid latitude/longitude range.
    pub fn from_degrees(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(DomainError::InvalidCoordinate(format!(
                "{latitude},{longitude} is not finite"
            )));
        }
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(DomainError::InvalidCoordinate(format!(
                "{latitude},{longitude} out of range"
            )));
        }
        Ok(Self {
            lat_e6: to_fixed_point(latitude),
            lon_e6: to_fixed_point(longitude),
        })
    }

    /// Latitude in fixed point
    #[must_use]
    pub const fn lat_e6(&self) -> i32 {
        self.lat_e6
    }

    /// Longitude in fixed point
    #[must_use]
    pub const fn lon_e6(&self) -> i32 {
        self.lon_e6
    }

    /// Latitude in degrees
    #[must_use]
    pub fn latitude(&self) -> f64 {
        from_fixed_point(self.lat_e6)
    }

    /// Longitude in degrees
    #[must_use]
    pub fn longitude(&self) -> f64 {
        from_fixed_point(self.lon_e6)
    }

    /// Great-circle distance to another point in meters (haversine)
    #[must_use]
    pub fn distance_m(&self, other: &Self) -> f64 {
        const EARTH_RADIUS_M: f64 = 6_371_000.0;

        let lat1_rad = self.latitude().to_radians();
        let lat2_rad = other.latitude().to_radians();
        let delta_lat = (other.latitude() - self.latitude()).to_radians();
        let delta_lon = (other.longitude() - self.longitude()).to_radians();

        let a = (lat1_rad.cos() * lat2_rad.cos()).mul_add(
            (delta_lon / 2.0).sin().powi(2),
            (delta_lat / 2.0).sin().powi(2),
        );
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_M * c
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.latitude(), self.longitude())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degrees_round_to_fixed_point() {
        assert_eq!(to_fixed_point(49.123_456), 49_123_456);
        assert_eq!(to_fixed_point(-8.400_736_4), -8_400_736);
        assert_eq!(to_fixed_point(0.000_000_6), 1);
    }

    #[test]
    fn fixed_point_round_trip_is_exact() {
        for value in [0, 1, -1, 49_008_184, 8_400_736, -180_000_000, 90_000_000] {
            assert_eq!(to_fixed_point(from_fixed_point(value)), value);
        }
    }

    #[test]
    fn from_degrees_accepts_valid_range() {
        let point = Point::from_degrees(49.008_184, 8.400_736).unwrap();
        assert_eq!(point.lat_e6(), 49_008_184);
        assert_eq!(point.lon_e6(), 8_400_736);
        assert!(Point::from_degrees(90.0, 180.0).is_ok());
        assert!(Point::from_degrees(-90.0, -180.0).is_ok());
    }

    #[test]
    fn from_degrees_rejects_malformed_input() {
        assert!(Point::from_degrees(90.5, 0.0).is_err());
        assert!(Point::from_degrees(0.0, -181.0).is_err());
        assert!(Point::from_degrees(f64::NAN, 0.0).is_err());
        assert!(Point::from_degrees(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn try_from_e6_checks_range() {
        assert!(Point::try_from_e6(90_000_000, 180_000_000).is_ok());
        assert!(Point::try_from_e6(90_000_001, 0).is_err());
        assert!(Point::try_from_e6(0, -180_000_001).is_err());
    }

    #[test]
    fn distance_between_nearby_points() {
        let a = Point::from_e6(48_207_830, 16_371_170);
        let b = Point::from_e6(48_205_140, 16_357_960);
        let distance = a.distance_m(&b);
        assert!((distance - 1024.0).abs() < 30.0, "distance was {distance}");
        assert!(a.distance_m(&a).abs() < 0.001);
    }

    #[test]
    fn display_uses_six_decimals() {
        let point = Point::from_e6(49_008_184, 8_400_736);
        assert_eq!(point.to_string(), "49.008184,8.400736");
    }
}
