use crate::Coordinate;
use geo::algorithm::line_measures::metric_spaces::HaversineMeasure;
use geo::{Bearing, Destination, Distance, Point};

/// Mean earth radius used by every distance and projection in the geofence.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

const METERS_PER_KM: f64 = 1000.0;

fn haversine() -> HaversineMeasure {
    HaversineMeasure::new(EARTH_RADIUS_KM * METERS_PER_KM)
}

fn point(lat: f64, lon: f64) -> Point<f64> {
    Point::new(lon, lat)
}

/// Great-circle distance in kilometers.
pub fn haversine_distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let meters = haversine().distance(point(lat1, lon1), point(lat2, lon2));
    (meters / METERS_PER_KM).abs()
}

/// Initial compass bearing from point 1 to point 2, in `[0, 360)`.
pub fn bearing_degrees(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let bearing = haversine()
        .bearing(point(lat1, lon1), point(lat2, lon2))
        .rem_euclid(360.0);
    if bearing >= 360.0 { 0.0 } else { bearing }
}

/// Spherical forward projection. A negative distance projects along the reciprocal bearing.
///
/// Both components are rounded to 7 decimals so that projected vertices compare stably.
pub fn destination_point(lat: f64, lon: f64, distance_km: f64, bearing_deg: f64) -> Coordinate {
    let (distance_km, bearing_deg) = if distance_km < 0.0 {
        (-distance_km, bearing_deg + 180.0)
    } else {
        (distance_km, bearing_deg)
    };
    let target = haversine().destination(
        point(lat, lon),
        bearing_deg.rem_euclid(360.0),
        distance_km * METERS_PER_KM,
    );

    Coordinate {
        latitude: round7(target.y()),
        longitude: round7(target.x()),
    }
}

/// Distance from `point` to the closest point of segment `a`-`b`.
///
/// The closest point is found by a planar projection in degree space, clamped to the segment,
/// and then measured with the haversine formula.
pub fn distance_to_segment_km(point: Coordinate, a: Coordinate, b: Coordinate) -> f64 {
    let (px, py) = (point.latitude, point.longitude);
    let (x1, y1) = (a.latitude, a.longitude);
    let (x2, y2) = (b.latitude, b.longitude);

    let seg_len_sq = (x2 - x1).powi(2) + (y2 - y1).powi(2);
    if seg_len_sq < 1e-9 {
        return haversine_distance_km(px, py, x1, y1);
    }

    let t = (((px - x1) * (x2 - x1) + (py - y1) * (y2 - y1)) / seg_len_sq).clamp(0.0, 1.0);
    let nearest_x = x1 + t * (x2 - x1);
    let nearest_y = y1 + t * (y2 - y1);

    haversine_distance_km(px, py, nearest_x, nearest_y)
}

fn round7(value: f64) -> f64 {
    (value * 1e7).round() / 1e7
}
