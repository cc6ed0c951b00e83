//! Haversine great-circle distance.
//!
//! One formula, two radii: kilometers for route totals and the
//! sequencer, meters for the navigator's proximity checks. Both must
//! stay on the same formula so ordering and arrival detection agree.

use crate::place::GeoPoint;

/// Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two points in kilometers.
///
/// Pure and total: NaN coordinates propagate NaN rather than panicking.
pub fn distance_km(from: GeoPoint, to: GeoPoint) -> f64 {
    EARTH_RADIUS_KM * central_angle(from, to)
}

/// Great-circle distance between two points in meters.
pub fn distance_m(from: GeoPoint, to: GeoPoint) -> f64 {
    EARTH_RADIUS_M * central_angle(from, to)
}

fn central_angle(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lon = (to.lon - from.lon).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);

    2.0 * a.sqrt().asin()
}
