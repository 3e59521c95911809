//! Haversine distance provider.
//!
//! Great-circle distance over a spherical Earth. Ignores roads and terrain,
//! which is the right trade-off for depot-anchored air legs.

use crate::traits::DistanceProvider;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine-based distance provider.
///
/// Coordinates are (lat, lng) in degrees, latitude in [-90, 90] and
/// longitude in [-180, 180]. Out-of-range values are not rejected; they
/// produce a geometrically meaningless (but finite) result, so range
/// validity is the caller's responsibility.
#[derive(Debug, Clone, Copy, Default)]
pub struct Haversine;

impl Haversine {
    /// Calculate haversine distance between two (lat, lng) points in kilometers.
    pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
        let (lat1, lng1) = from;
        let (lat2, lng2) = to;

        let lat1_rad = lat1.to_radians();
        let lat2_rad = lat2.to_radians();
        let delta_lat = (lat2 - lat1).to_radians();
        let delta_lng = (lng2 - lng1).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_KM * c
    }
}

impl DistanceProvider for Haversine {
    fn distance_km(&self, from: (f64, f64), to: (f64, f64)) -> f64 {
        Self::haversine_km(from, to)
    }
}
