//! Great-circle distance between coordinates (haversine formula).

use super::Coordinate;

/// Mean Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance between two coordinates, in meters.
///
/// Pure and symmetric; `distance_meters(a, a)` is zero within floating-point
/// tolerance.
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().asin();

    EARTH_RADIUS_M * c
}

/// Distance where either side may be absent.
///
/// Returns `+∞` when a coordinate is missing so that any threshold
/// comparison downstream fails closed.
pub fn distance_meters_opt(a: Option<&Coordinate>, b: Option<&Coordinate>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) => distance_meters(*a, *b),
        _ => f64::INFINITY,
    }
}
