/// Host time in milliseconds.
///
/// The engine never reads a wall clock itself; every timestamp arrives from the
/// host (a paint callback, a test, a replay), which keeps animation replayable.
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd)]
pub struct Time(pub f64); // milliseconds

impl Time {
    pub const ZERO: Time = Time(0.0);

    pub fn from_millis(ms: f64) -> Self {
        Time(ms)
    }

    pub fn as_millis(self) -> f64 {
        self.0
    }

    /// Milliseconds elapsed since `earlier`, never negative.
    pub fn since(self, earlier: Time) -> f64 {
        (self.0 - earlier.0).max(0.0)
    }

    pub fn after_millis(self, ms: f64) -> Time {
        Time(self.0 + ms)
    }
}

#[cfg(test)]
mod tests {
    use super::Time;

    #[test]
    fn since_clamps_backwards_clock() {
        let a = Time(100.0);
        assert_eq!(Time(250.0).since(a), 150.0);
        assert_eq!(Time(50.0).since(a), 0.0);
    }

    #[test]
    fn after_millis_offsets() {
        assert_eq!(Time::ZERO.after_millis(2000.0), Time(2000.0));
    }
}
