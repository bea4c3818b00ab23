use catalog::Location;
use foundation::math::is_valid_lat_lng;

use crate::pose::CameraPose;

pub const ZOOM_OUT_ALTITUDE: f64 = 3.5;
pub const ZOOM_IN_ALTITUDE: f64 = 1.5;
pub const ZOOM_OUT_MS: f64 = 1000.0;
pub const ROTATE_MS: f64 = 1500.0;
pub const ZOOM_IN_MS: f64 = 1200.0;
pub const AUTO_ROTATE_RESUME_MS: f64 = 2000.0;
pub const AUTO_ROTATE_SPEED: f64 = 0.5;
pub const MARKER_SIZE: f64 = 0.05;
pub const MARKER_COLOR: &str = "#ff6b6b";

/// Number of legs in every flight.
pub const PHASE_COUNT: usize = 3;

/// Tunables for flights. `Default` gives the standard three-leg profile.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightConfig {
    pub initial_pose: CameraPose,
    pub zoom_out_altitude: f64,
    pub zoom_in_altitude: f64,
    pub zoom_out_ms: f64,
    pub rotate_ms: f64,
    pub zoom_in_ms: f64,
    /// Delay after the last leg before auto-rotation is switched back on.
    pub auto_rotate_resume_ms: f64,
    pub auto_rotate_speed: f64,
    pub marker_size: f64,
    pub marker_color: String,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            initial_pose: CameraPose::new(0.0, 0.0, 2.5),
            zoom_out_altitude: ZOOM_OUT_ALTITUDE,
            zoom_in_altitude: ZOOM_IN_ALTITUDE,
            zoom_out_ms: ZOOM_OUT_MS,
            rotate_ms: ROTATE_MS,
            zoom_in_ms: ZOOM_IN_MS,
            auto_rotate_resume_ms: AUTO_ROTATE_RESUME_MS,
            auto_rotate_speed: AUTO_ROTATE_SPEED,
            marker_size: MARKER_SIZE,
            marker_color: MARKER_COLOR.to_string(),
        }
    }
}

impl FlightConfig {
    pub fn total_ms(&self) -> f64 {
        self.zoom_out_ms + self.rotate_ms + self.zoom_in_ms
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PhaseKind {
    ZoomOut,
    Rotate,
    ZoomIn,
}

impl PhaseKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PhaseKind::ZoomOut => "zoom-out",
            PhaseKind::Rotate => "rotate",
            PhaseKind::ZoomIn => "zoom-in",
        }
    }
}

/// One leg: animate from wherever the camera is to `target` over `duration_ms`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Phase {
    pub kind: PhaseKind,
    pub target: CameraPose,
    pub duration_ms: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FlightError {
    InvalidDestination { lat: f64, lng: f64 },
}

impl std::fmt::Display for FlightError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlightError::InvalidDestination { lat, lng } => {
                write!(f, "invalid flight destination: lat {lat}, lng {lng}")
            }
        }
    }
}

impl std::error::Error for FlightError {}

/// Zoom out where we are, swing over to the destination, zoom in.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightPlan {
    destination: Location,
    phases: [Phase; PHASE_COUNT],
}

impl FlightPlan {
    pub fn new(
        start: CameraPose,
        destination: &Location,
        config: &FlightConfig,
    ) -> Result<Self, FlightError> {
        let (lat, lng) = (destination.latitude, destination.longitude);
        if !is_valid_lat_lng(lat, lng) {
            return Err(FlightError::InvalidDestination { lat, lng });
        }

        let phases = [
            Phase {
                kind: PhaseKind::ZoomOut,
                target: CameraPose::new(start.lat, start.lng, config.zoom_out_altitude),
                duration_ms: config.zoom_out_ms,
            },
            Phase {
                kind: PhaseKind::Rotate,
                target: CameraPose::new(lat, lng, config.zoom_out_altitude),
                duration_ms: config.rotate_ms,
            },
            Phase {
                kind: PhaseKind::ZoomIn,
                target: CameraPose::new(lat, lng, config.zoom_in_altitude),
                duration_ms: config.zoom_in_ms,
            },
        ];

        Ok(Self {
            destination: destination.clone(),
            phases,
        })
    }

    pub fn destination(&self) -> &Location {
        &self.destination
    }

    pub fn phases(&self) -> &[Phase; PHASE_COUNT] {
        &self.phases
    }

    pub fn total_ms(&self) -> f64 {
        self.phases.iter().map(|p| p.duration_ms).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn japan() -> Location {
        Location::new("Japan", "JP", 36.2048, 138.2529).expect("valid")
    }

    #[test]
    fn builds_three_standard_legs() {
        let start = CameraPose::new(10.0, -20.0, 2.5);
        let plan = FlightPlan::new(start, &japan(), &FlightConfig::default()).expect("plan");
        let [out, rotate, zoom_in] = *plan.phases();

        assert_eq!(out.kind, PhaseKind::ZoomOut);
        assert_eq!(out.target, CameraPose::new(10.0, -20.0, 3.5));
        assert_eq!(out.duration_ms, 1000.0);

        assert_eq!(rotate.kind, PhaseKind::Rotate);
        assert_eq!(rotate.target, CameraPose::new(36.2048, 138.2529, 3.5));
        assert_eq!(rotate.duration_ms, 1500.0);

        assert_eq!(zoom_in.kind, PhaseKind::ZoomIn);
        assert_eq!(zoom_in.target, CameraPose::new(36.2048, 138.2529, 1.5));
        assert_eq!(zoom_in.duration_ms, 1200.0);

        assert_eq!(plan.total_ms(), 3700.0);
        assert_eq!(plan.destination().name, "Japan");
    }

    #[test]
    fn rejects_out_of_range_destination() {
        let bad = Location {
            name: "Bad".into(),
            code: String::new(),
            latitude: 0.0,
            longitude: 200.0,
            capital: None,
        };
        let err = FlightPlan::new(CameraPose::new(0.0, 0.0, 2.5), &bad, &FlightConfig::default())
            .unwrap_err();
        assert_eq!(err, FlightError::InvalidDestination { lat: 0.0, lng: 200.0 });
    }

    #[test]
    fn config_total_matches_plan_total() {
        let config = FlightConfig::default();
        assert_eq!(config.total_ms(), 3700.0);
    }
}
