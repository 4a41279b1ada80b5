//! Geographic to planar coordinate transforms
//!
//! Normal computation projects every triangle corner before taking edge
//! vectors. Any `Fn([f64; 2]) -> [f64; 2]` can be injected; these are the
//! stock choices.

use std::f64::consts::PI;

/// WGS84 equatorial radius in meters
pub const EARTH_RADIUS: f64 = 6378137.0;

/// Half the Web Mercator world width in meters (2 * PI * R / 2)
pub const ORIGIN_SHIFT: f64 = PI * EARTH_RADIUS;

/// Latitude limit where Web Mercator becomes square
pub const MAX_LATITUDE: f64 = 85.0511287798;

/// Spherical Web Mercator: [lng, lat] in degrees to [x, y] in meters
pub fn lng_lat_to_meters(lng_lat: [f64; 2]) -> [f64; 2] {
    let [lng, lat] = lng_lat;
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);

    let x = lng * ORIGIN_SHIFT / 180.0;
    let y = ((90.0 + lat) * PI / 360.0).tan().ln() / (PI / 180.0);
    [x, y * ORIGIN_SHIFT / 180.0]
}

/// Identity transform for data that is already planar
pub fn planar(point: [f64; 2]) -> [f64; 2] {
    point
}
