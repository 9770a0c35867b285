//! Great-circle distance calculation
//!
//! Listings on the site carry map coordinates. This module turns those
//! coordinates into a distance in miles from a fixed reference point using
//! the haversine formula on a sphere.

use crate::GeoError;
use serde::Deserialize;

/// Mean Earth radius in miles
pub const EARTH_RADIUS_MILES: f64 = 3956.0;

/// Default reference point that every listing distance is measured from
pub const ORIGIN: Coordinate = Coordinate {
    latitude: 32.881294,
    longitude: -117.237706,
};

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate from decimal degrees
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Parses a coordinate from its textual latitude and longitude
    ///
    /// Surrounding whitespace is ignored. Any value that is not a number
    /// yields `GeoError::InvalidInput`.
    pub fn parse(latitude: &str, longitude: &str) -> Result<Self, GeoError> {
        Ok(Self::new(parse_degrees(latitude)?, parse_degrees(longitude)?))
    }

    /// Returns true if latitude is within [-90, 90] and longitude within [-180, 180]
    pub fn is_in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl Default for Coordinate {
    fn default() -> Self {
        ORIGIN
    }
}

fn parse_degrees(value: &str) -> Result<f64, GeoError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| GeoError::InvalidInput {
            value: value.to_string(),
        })
}

/// Haversine distance in miles between two coordinates
pub fn haversine_miles(from: Coordinate, to: Coordinate) -> f64 {
    haversine(from, to, EARTH_RADIUS_MILES)
}

fn haversine(from: Coordinate, to: Coordinate, radius: f64) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let dlat = lat2 - lat1;
    let dlon = to.longitude.to_radians() - from.longitude.to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    radius * c
}

/// Distance in miles from [`ORIGIN`] to the given point
pub fn distance_from_origin(latitude: f64, longitude: f64) -> f64 {
    haversine_miles(ORIGIN, Coordinate::new(latitude, longitude))
}

/// Distance in miles from [`ORIGIN`] to a point given as text
///
/// # Example
///
/// ```
/// use listing_harvest::geo::distance_from_origin_str;
///
/// let distance = distance_from_origin_str("32.881294", "-117.237706").unwrap();
/// assert_eq!(distance, 0.0);
/// ```
pub fn distance_from_origin_str(latitude: &str, longitude: &str) -> Result<f64, GeoError> {
    let point = Coordinate::parse(latitude, longitude)?;
    Ok(haversine_miles(ORIGIN, point))
}

/// Measures distances from a configurable origin
///
/// Out-of-range coordinates are not rejected here; they go through the
/// trigonometry unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceCalculator {
    origin: Coordinate,
    radius_miles: f64,
}

impl DistanceCalculator {
    pub fn new(origin: Coordinate) -> Self {
        Self {
            origin,
            radius_miles: EARTH_RADIUS_MILES,
        }
    }

    /// Distance in miles from the origin to `point`
    pub fn distance_to(&self, point: Coordinate) -> f64 {
        haversine(self.origin, point, self.radius_miles)
    }
}

impl Default for DistanceCalculator {
    fn default() -> Self {
        Self::new(ORIGIN)
    }
}
