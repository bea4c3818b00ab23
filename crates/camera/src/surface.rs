use crate::pose::CameraPose;

/// A point marker drawn on the globe.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub lat: f64,
    pub lng: f64,
    pub label: String,
    /// Marker height as a fraction of globe radius.
    pub size: f64,
    pub color: String,
}

/// The 3D view the engine drives. Implemented by the host renderer.
pub trait RenderSurface {
    fn pose(&self) -> CameraPose;

    /// Moves the camera; `transition_ms == 0` means jump without the
    /// surface's own tweening.
    fn set_pose(&mut self, pose: CameraPose, transition_ms: u32);

    fn set_auto_rotate(&mut self, enabled: bool);

    fn set_auto_rotate_speed(&mut self, _speed: f64) {}

    /// Replaces the full marker set.
    fn set_markers(&mut self, markers: &[Marker]);
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PoseWrite {
    pub pose: CameraPose,
    pub transition_ms: u32,
}

/// In-memory surface that records everything written to it.
///
/// Used by the headless driver and by tests.
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    pose: CameraPose,
    auto_rotate: bool,
    auto_rotate_speed: f64,
    markers: Vec<Marker>,
    writes: Vec<PoseWrite>,
    auto_rotate_changes: Vec<bool>,
}

impl HeadlessSurface {
    pub fn new(pose: CameraPose) -> Self {
        Self {
            pose,
            auto_rotate: false,
            auto_rotate_speed: 0.0,
            markers: Vec::new(),
            writes: Vec::new(),
            auto_rotate_changes: Vec::new(),
        }
    }

    pub fn auto_rotate(&self) -> bool {
        self.auto_rotate
    }

    pub fn auto_rotate_speed(&self) -> f64 {
        self.auto_rotate_speed
    }

    pub fn auto_rotate_changes(&self) -> &[bool] {
        &self.auto_rotate_changes
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn writes(&self) -> &[PoseWrite] {
        &self.writes
    }

    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self::new(CameraPose::new(0.0, 0.0, 2.5))
    }
}

impl RenderSurface for HeadlessSurface {
    fn pose(&self) -> CameraPose {
        self.pose
    }

    fn set_pose(&mut self, pose: CameraPose, transition_ms: u32) {
        self.pose = pose;
        self.writes.push(PoseWrite {
            pose,
            transition_ms,
        });
    }

    fn set_auto_rotate(&mut self, enabled: bool) {
        self.auto_rotate = enabled;
        self.auto_rotate_changes.push(enabled);
    }

    fn set_auto_rotate_speed(&mut self, speed: f64) {
        self.auto_rotate_speed = speed;
    }

    fn set_markers(&mut self, markers: &[Marker]) {
        self.markers = markers.to_vec();
    }
}
