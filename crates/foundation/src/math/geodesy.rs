//! Spherical helpers for latitude/longitude in degrees.

/// Mean Earth radius (kilometers) used for great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

pub const MIN_LAT_DEG: f64 = -90.0;
pub const MAX_LAT_DEG: f64 = 90.0;
pub const MIN_LNG_DEG: f64 = -180.0;
pub const MAX_LNG_DEG: f64 = 180.0;

pub fn is_valid_lat(lat_deg: f64) -> bool {
    lat_deg.is_finite() && (MIN_LAT_DEG..=MAX_LAT_DEG).contains(&lat_deg)
}

pub fn is_valid_lng(lng_deg: f64) -> bool {
    lng_deg.is_finite() && (MIN_LNG_DEG..=MAX_LNG_DEG).contains(&lng_deg)
}

pub fn is_valid_lat_lng(lat_deg: f64, lng_deg: f64) -> bool {
    is_valid_lat(lat_deg) && is_valid_lng(lng_deg)
}

/// Great-circle distance between two points (haversine), in kilometers.
pub fn haversine_km(lat1_deg: f64, lng1_deg: f64, lat2_deg: f64, lng2_deg: f64) -> f64 {
    let d_lat = (lat2_deg - lat1_deg).to_radians();
    let d_lng = (lng2_deg - lng1_deg).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1_deg.to_radians().cos() * lat2_deg.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Wraps a longitude into `(-180, 180]`.
///
/// Values already in range are returned untouched so exact inputs stay exact.
pub fn normalize_lng(lng_deg: f64) -> f64 {
    if !lng_deg.is_finite() || (lng_deg > MIN_LNG_DEG && lng_deg <= MAX_LNG_DEG) {
        return lng_deg;
    }
    let wrapped = (lng_deg + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped <= MIN_LNG_DEG { wrapped + 360.0 } else { wrapped }
}

/// Signed longitude difference `to - from`, folded onto the shorter arc.
///
/// The result lies in `[-180, 180]`.
pub fn shortest_lng_delta(from_deg: f64, to_deg: f64) -> f64 {
    let mut diff = to_deg - from_deg;
    if diff > 180.0 {
        diff -= 360.0;
    } else if diff < -180.0 {
        diff += 360.0;
    }
    diff
}

/// Interpolates longitude along the shorter arc, normalized into `(-180, 180]`.
pub fn lerp_lng_shortest(from_deg: f64, to_deg: f64, t: f64) -> f64 {
    normalize_lng(from_deg + shortest_lng_delta(from_deg, to_deg) * t)
}
