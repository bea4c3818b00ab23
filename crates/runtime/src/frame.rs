use foundation::time::Time;

/// One paint of the host surface.
///
/// Frames are the only source of time for animation. Fixed-rate frames built
/// with [`Frame::new`] are fully deterministic, which is what tests and the
/// headless driver use; a real host passes its paint timestamp via [`Frame::at`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Host time at the start of the frame.
    pub time: Time,
}

impl Frame {
    /// Fixed-rate frame: `time = index * dt_ms`.
    pub fn new(index: u64, dt_ms: f64) -> Self {
        Self {
            index,
            time: Time(index as f64 * dt_ms),
        }
    }

    pub fn at(index: u64, time: Time) -> Self {
        Self { index, time }
    }

    /// The following frame on a fixed `dt_ms` cadence.
    pub fn next(self, dt_ms: f64) -> Self {
        Self {
            index: self.index + 1,
            time: self.time.after_millis(dt_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Frame;
    use foundation::time::Time;

    #[test]
    fn frame_time_is_deterministic() {
        let a = Frame::new(10, 100.0);
        let b = Frame::new(10, 100.0);
        assert_eq!(a, b);
        assert_eq!(a.time, Time(1000.0));
    }

    #[test]
    fn next_advances_index_and_time() {
        let f0 = Frame::at(3, Time(40.0));
        let f1 = f0.next(16.0);
        assert_eq!(f1.index, 4);
        assert_eq!(f1.time, Time(56.0));
    }
}
