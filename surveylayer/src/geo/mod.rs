//! Geodetic distance module
//!
//! Provides the point type shared by route planning and the great-circle
//! distance used to compare leg endpoints.

mod types;

pub use types::{GeoError, GeodeticPoint, EARTH_RADIUS_M, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Great-circle distance between two points in metres.
///
/// Uses the haversine formula on a sphere of radius [`EARTH_RADIUS_M`].
/// The result is symmetric in its arguments and zero for identical points.
///
/// # Arguments
///
/// * `a` - First point
/// * `b` - Second point
#[inline]
pub fn distance_m(a: &GeodeticPoint, b: &GeodeticPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);

    // Rounding can push h marginally above 1.0 for antipodal points
    let c = 2.0 * h.min(1.0).sqrt().asin();

    EARTH_RADIUS_M * c
}
