//! Headless frame loop for the flight engine.

use camera::{
    CameraPose, FlightConfig, FlightEngine, FlightError, FlightOutcome, HeadlessSurface, RenderSurface,
};
use catalog::Location;
use runtime::Frame;
use tracing::{info, warn};

/// When one leg of a flight began, in driver time.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseMark {
    pub name: String,
    pub started_ms: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlightReport {
    pub destination: Location,
    pub phases: Vec<PhaseMark>,
    pub final_pose: CameraPose,
    pub duration_ms: f64,
    pub frames: u64,
    pub outcome: FlightOutcome,
}

/// Paints frames at a fixed interval into a [`HeadlessSurface`].
pub struct HeadlessDriver {
    engine: FlightEngine<HeadlessSurface>,
    frame_ms: f64,
    next_index: u64,
    frame_budget: Option<u64>,
}

impl HeadlessDriver {
    pub fn new(config: FlightConfig, frame_ms: f64) -> Self {
        let surface = HeadlessSurface::new(config.initial_pose);
        let mut engine = FlightEngine::with_config(surface, config);
        engine.start();
        Self {
            engine,
            frame_ms,
            next_index: 0,
            frame_budget: None,
        }
    }

    /// Gives up on a flight after `frames` paints instead of a couple of
    /// frames past its planned duration.
    pub fn with_frame_budget(mut self, frames: u64) -> Self {
        self.frame_budget = Some(frames);
        self
    }

    pub fn engine(&self) -> &FlightEngine<HeadlessSurface> {
        &self.engine
    }

    pub fn now_ms(&self) -> f64 {
        self.next_index as f64 * self.frame_ms
    }

    pub fn tick(&mut self) -> Frame {
        let frame = Frame::new(self.next_index, self.frame_ms);
        self.next_index += 1;
        self.engine.run_frame(frame);
        frame
    }

    /// Flies to `destination` and paints until the flight lands.
    pub fn fly(&mut self, destination: &Location) -> Result<FlightReport, FlightError> {
        self.engine.drain_events();
        let mut handle = self.engine.fly_to(destination)?;
        let started = self.now_ms();
        let budget = self
            .frame_budget
            .unwrap_or_else(|| (self.engine.config().total_ms() / self.frame_ms).ceil() as u64 + 2);

        let mut phases = Vec::new();
        let mut frames = 0;
        let outcome = loop {
            let frame = self.tick();
            frames += 1;
            for event in self.engine.drain_events() {
                if event.kind == "flight.phase" {
                    info!(phase = %event.message, at_ms = frame.time.as_millis(), pose = ?self.engine.surface().pose(), "phase started");
                    phases.push(PhaseMark {
                        name: event.message,
                        started_ms: event.time.as_millis() - started,
                    });
                }
            }
            if let Some(outcome) = handle.try_outcome() {
                break outcome;
            }
            if frames >= budget {
                warn!(frames, "flight did not land within its frame budget");
                self.engine.stop();
                break FlightOutcome::Cancelled;
            }
        };

        let final_pose = self.engine.surface().pose();
        let duration_ms = self.now_ms() - self.frame_ms - started;
        info!(destination = %destination.name, pose = ?final_pose, duration_ms, "flight finished");
        Ok(FlightReport {
            destination: destination.clone(),
            phases,
            final_pose,
            duration_ms,
            frames,
            outcome,
        })
    }

    /// Keeps painting until no flight or auto-rotate resume is pending.
    pub fn run_until_idle(&mut self) -> u64 {
        let mut frames = 0;
        while self.engine.is_busy() {
            self.tick();
            frames += 1;
        }
        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    fn japan() -> Location {
        Location::new("Japan", "JP", 36.2048, 138.2529).expect("valid")
    }

    #[test]
    fn flight_reports_three_legs() {
        let mut driver = HeadlessDriver::new(FlightConfig::default(), 100.0);
        let report = driver.fly(&japan()).expect("flight");

        assert_eq!(report.outcome, FlightOutcome::Completed);
        let names: Vec<_> = report.phases.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["zoom-out", "rotate", "zoom-in"]);
        let starts: Vec<_> = report.phases.iter().map(|p| p.started_ms).collect();
        assert_eq!(starts, vec![0.0, 1000.0, 2500.0]);
        assert_close(report.duration_ms, 3700.0);
        assert_close(report.final_pose.lat, 36.2048);
        assert_close(report.final_pose.lng, 138.2529);
        assert_close(report.final_pose.altitude, 1.5);
    }

    #[test]
    fn auto_rotate_resumes_once_idle() {
        let mut driver = HeadlessDriver::new(FlightConfig::default(), 100.0);
        driver.fly(&japan()).expect("flight");
        assert!(!driver.engine().surface().auto_rotate());
        let frames = driver.run_until_idle();
        assert_eq!(frames, 20);
        assert!(driver.engine().surface().auto_rotate());
    }

    #[test]
    fn exhausted_budget_cancels_the_flight() {
        let mut driver = HeadlessDriver::new(FlightConfig::default(), 100.0).with_frame_budget(5);
        let report = driver.fly(&japan()).expect("flight");
        assert_eq!(report.outcome, FlightOutcome::Cancelled);
        assert_eq!(report.frames, 5);
        assert!(!driver.engine().is_busy());
        assert!(report.final_pose.altitude > 1.5);
    }

    #[test]
    fn odd_frame_rates_still_land_on_target() {
        let mut driver = HeadlessDriver::new(FlightConfig::default(), 1000.0 / 60.0);
        let report = driver.fly(&japan()).expect("flight");
        assert_eq!(report.outcome, FlightOutcome::Completed);
        assert_close(report.final_pose.altitude, 1.5);
        assert!(report.duration_ms >= 3700.0 - 1e-6);
        assert!(report.duration_ms < 3700.0 + 3.0 * 1000.0 / 60.0);
    }
}
