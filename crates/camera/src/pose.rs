use foundation::math::{lerp, lerp_lng_shortest, normalize_lng};

/// Camera point of view over the globe.
///
/// `altitude` is a unitless distance factor where 1.0 is roughly one globe
/// radius above the surface.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraPose {
    pub lat: f64,
    pub lng: f64,
    pub altitude: f64,
}

impl CameraPose {
    pub fn new(lat: f64, lng: f64, altitude: f64) -> Self {
        Self { lat, lng, altitude }
    }

    pub fn is_valid(&self) -> bool {
        foundation::math::is_valid_lat_lng(self.lat, self.lng)
            && self.altitude.is_finite()
            && self.altitude > 0.0
    }

    /// Pose at `eased` between `self` and `target`.
    ///
    /// Latitude and altitude move linearly; longitude follows the shorter arc
    /// and stays in `(-180, 180]`. At `eased >= 1` the target itself is returned.
    pub fn interpolate(self, target: CameraPose, eased: f64) -> CameraPose {
        if eased >= 1.0 {
            return CameraPose {
                lng: normalize_lng(target.lng),
                ..target
            };
        }
        CameraPose {
            lat: lerp(self.lat, target.lat, eased),
            lng: lerp_lng_shortest(self.lng, target.lng, eased),
            altitude: lerp(self.altitude, target.altitude, eased),
        }
    }
}
