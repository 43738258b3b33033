//! Spherical (Web) Mercator projection, EPSG:3857.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

/// WGS84 semi-major axis used as the sphere radius (meters).
pub const WEB_MERCATOR_RADIUS: f64 = 6378137.0;

/// Latitude limit of the square Web Mercator world (degrees).
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Project geographic coordinates (degrees) to Web Mercator meters.
///
/// Latitudes beyond ±[`MAX_LATITUDE`] are clamped.
pub fn project(lon_deg: f64, lat_deg: f64) -> (f64, f64) {
    let lat = lat_deg.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = WEB_MERCATOR_RADIUS * lon_deg.to_radians();
    let y = WEB_MERCATOR_RADIUS * (FRAC_PI_4 + lat / 2.0).tan().ln();
    (x, y)
}

/// Convert Web Mercator meters back to geographic coordinates (degrees).
pub fn unproject(x: f64, y: f64) -> (f64, f64) {
    let lon = (x / WEB_MERCATOR_RADIUS).to_degrees();
    let lat = 2.0 * (y / WEB_MERCATOR_RADIUS).exp().atan() - FRAC_PI_2;
    (lon, lat.to_degrees())
}
