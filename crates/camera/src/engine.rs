//! Frame-driven flight engine.
//!
//! The engine owns the animation: every host paint calls [`FlightEngine::run_frame`],
//! which runs the callbacks requested on the previous paint, interpolates the
//! active leg and writes the pose with a zero transition. Callbacks belonging to
//! a replaced or stopped flight are cancelled before anything else is written,
//! so two flights never write the pose on the same timeline.

use catalog::Location;
use foundation::math::{ease_in_out_quad, progress};
use foundation::time::Time;
use runtime::{Event, EventBus, Frame, FrameRequest, FrameScheduler, TimerId, TimerQueue};
use tokio::sync::oneshot;
use tracing::{debug, info};

use crate::plan::{FlightConfig, FlightError, FlightPlan, PHASE_COUNT};
use crate::pose::CameraPose;
use crate::surface::{Marker, RenderSurface};

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FlightId(pub u64);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FlightOutcome {
    /// The last leg reached its target.
    Completed,
    /// Replaced by a newer flight or torn down by `stop()`.
    Cancelled,
}

/// Completion signal for one flight.
#[derive(Debug)]
pub struct FlightHandle {
    pub id: FlightId,
    done: oneshot::Receiver<FlightOutcome>,
}

impl FlightHandle {
    /// Waits for the flight to finish. A dropped engine counts as cancellation.
    pub async fn finished(self) -> FlightOutcome {
        self.done.await.unwrap_or(FlightOutcome::Cancelled)
    }

    /// Non-blocking check; `None` while the flight is still running.
    pub fn try_outcome(&mut self) -> Option<FlightOutcome> {
        match self.done.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(FlightOutcome::Cancelled),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum EngineTimer {
    ResumeAutoRotate,
}

#[derive(Debug, Copy, Clone)]
struct PhaseStart {
    pose: CameraPose,
    time: Time,
}

#[derive(Debug)]
struct ActiveFlight {
    id: FlightId,
    plan: FlightPlan,
    phase_index: usize,
    phase_start: Option<PhaseStart>,
    frame: FrameRequest,
    done: Option<oneshot::Sender<FlightOutcome>>,
}

impl ActiveFlight {
    fn resolve(&mut self, outcome: FlightOutcome) {
        if let Some(done) = self.done.take() {
            // Nobody listening is fine.
            let _ = done.send(outcome);
        }
    }
}

pub struct FlightEngine<S: RenderSurface> {
    surface: S,
    config: FlightConfig,
    frames: FrameScheduler<FlightId>,
    timers: TimerQueue<EngineTimer>,
    active: Option<ActiveFlight>,
    resume_timer: Option<TimerId>,
    markers: Vec<Marker>,
    next_flight: u64,
    last_frame: Frame,
    bus: EventBus,
}

impl<S: RenderSurface> FlightEngine<S> {
    pub fn new(surface: S) -> Self {
        Self::with_config(surface, FlightConfig::default())
    }

    pub fn with_config(surface: S, config: FlightConfig) -> Self {
        Self {
            surface,
            config,
            frames: FrameScheduler::new(),
            timers: TimerQueue::new(),
            active: None,
            resume_timer: None,
            markers: Vec::new(),
            next_flight: 0,
            last_frame: Frame::at(0, Time::ZERO),
            bus: EventBus::new(),
        }
    }

    /// Puts the camera at the configured initial view and starts idle rotation.
    pub fn start(&mut self) {
        self.surface.set_pose(self.config.initial_pose, 0);
        self.surface.set_auto_rotate_speed(self.config.auto_rotate_speed);
        self.surface.set_auto_rotate(true);
        debug!(pose = ?self.config.initial_pose, "flight engine started");
    }

    /// Cancels any running flight, its pending frames and the auto-rotate resume.
    ///
    /// Safe to call repeatedly.
    pub fn stop(&mut self) {
        self.cancel_active("stopped");
        if let Some(id) = self.resume_timer.take() {
            self.timers.cancel(id);
        }
        self.frames.cancel_all();
    }

    /// Starts a flight from the current camera pose to `destination`.
    ///
    /// A flight already in progress is cancelled first; the new one starts
    /// from the last pose it wrote.
    pub fn fly_to(&mut self, destination: &Location) -> Result<FlightHandle, FlightError> {
        let start = self.surface.pose();
        let plan = FlightPlan::new(start, destination, &self.config)?;

        self.cancel_active("superseded");
        if let Some(id) = self.resume_timer.take() {
            self.timers.cancel(id);
        }

        self.surface.set_auto_rotate(false);
        self.add_marker(destination);

        let id = FlightId(self.next_flight);
        self.next_flight = self.next_flight.wrapping_add(1);
        let frame = self.frames.request(id);
        let (tx, rx) = oneshot::channel();

        info!(
            flight = id.0,
            destination = %destination.name,
            lat = destination.latitude,
            lng = destination.longitude,
            "flight started"
        );
        self.bus.emit(
            self.last_frame,
            "flight.start",
            format!("{} {}", id.0, destination.name),
        );

        self.active = Some(ActiveFlight {
            id,
            plan,
            phase_index: 0,
            phase_start: None,
            frame,
            done: Some(tx),
        });

        Ok(FlightHandle { id, done: rx })
    }

    /// Runs everything due on this paint: pending flight frames, then timers.
    pub fn run_frame(&mut self, frame: Frame) {
        self.last_frame = frame;

        for (req, flight) in self.frames.take_due() {
            let current = self
                .active
                .as_ref()
                .is_some_and(|a| a.id == flight && a.frame == req);
            if current {
                self.advance(frame);
            } else {
                debug!(flight = flight.0, "dropping stale frame callback");
            }
        }

        for (id, timer) in self.timers.pop_due(frame.time) {
            match timer {
                EngineTimer::ResumeAutoRotate => {
                    if self.resume_timer == Some(id) {
                        self.resume_timer = None;
                        self.surface.set_auto_rotate(true);
                        self.bus.emit(frame, "flight.auto_rotate", "resumed");
                        debug!("auto-rotate resumed");
                    }
                }
            }
        }
    }

    fn advance(&mut self, frame: Frame) {
        loop {
            let Some(flight) = self.active.as_mut() else {
                return;
            };
            let phase = flight.plan.phases()[flight.phase_index];

            let start = match flight.phase_start {
                Some(start) => start,
                None => {
                    let start = PhaseStart {
                        pose: self.surface.pose(),
                        time: frame.time,
                    };
                    flight.phase_start = Some(start);
                    self.bus.emit(frame, "flight.phase", phase.kind.as_str());
                    start
                }
            };

            let t = progress(frame.time.since(start.time), phase.duration_ms);
            let pose = start.pose.interpolate(phase.target, ease_in_out_quad(t));
            self.surface.set_pose(pose, 0);

            if t < 1.0 {
                flight.frame = self.frames.request(flight.id);
                return;
            }

            flight.phase_index += 1;
            flight.phase_start = None;
            if flight.phase_index < PHASE_COUNT {
                continue;
            }

            if let Some(mut done) = self.active.take() {
                done.resolve(FlightOutcome::Completed);
                let due = frame.time.after_millis(self.config.auto_rotate_resume_ms);
                self.resume_timer = Some(self.timers.schedule(due, EngineTimer::ResumeAutoRotate));
                self.bus.emit(
                    frame,
                    "flight.complete",
                    format!("{} {}", done.id.0, done.plan.destination().name),
                );
                info!(flight = done.id.0, pose = ?pose, "flight completed");
            }
            return;
        }
    }

    fn cancel_active(&mut self, reason: &str) {
        let Some(mut flight) = self.active.take() else {
            return;
        };
        self.frames.cancel(flight.frame);
        flight.resolve(FlightOutcome::Cancelled);
        self.bus
            .emit(self.last_frame, "flight.cancel", format!("{} {reason}", flight.id.0));
        debug!(flight = flight.id.0, reason, "flight cancelled");
    }

    fn add_marker(&mut self, location: &Location) {
        self.markers.push(Marker {
            lat: location.latitude,
            lng: location.longitude,
            label: location.name.clone(),
            size: self.config.marker_size,
            color: self.config.marker_color.clone(),
        });
        self.surface.set_markers(&self.markers);
    }

    pub fn clear_markers(&mut self) {
        self.markers.clear();
        self.surface.set_markers(&self.markers);
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn is_flying(&self) -> bool {
        self.active.is_some()
    }

    /// True while a flight or the auto-rotate resume still needs frames.
    pub fn is_busy(&self) -> bool {
        self.active.is_some() || !self.timers.is_empty()
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn config(&self) -> &FlightConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn events(&self) -> &[Event] {
        self.bus.events()
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.bus.drain()
    }
}
