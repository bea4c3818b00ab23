use foundation::time::Time;

/// Identifies a scheduled timer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u64);

#[derive(Debug)]
struct Timer<T> {
    id: TimerId,
    due: Time,
    payload: T,
}

/// Deterministic delayed-work queue driven by host time.
///
/// Key properties:
/// - Timers fire in `(due, id)` order; equal deadlines fire in schedule order.
/// - Cancellation does not perturb the order of remaining timers.
/// - Nothing fires until the host advances time past the deadline.
#[derive(Debug)]
pub struct TimerQueue<T> {
    next_id: u64,
    timers: Vec<Timer<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            timers: Vec::new(),
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: Time, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.timers.push(Timer { id, due, payload });
        id
    }

    /// Returns `true` if the timer was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    pub fn cancel_all(&mut self) -> usize {
        let n = self.timers.len();
        self.timers.clear();
        n
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Earliest pending deadline.
    pub fn next_due(&self) -> Option<Time> {
        self.timers
            .iter()
            .map(|t| t.due)
            .min_by(|a, b| a.0.total_cmp(&b.0))
    }

    /// Removes and returns every timer whose deadline is at or before `now`.
    pub fn pop_due(&mut self, now: Time) -> Vec<(TimerId, T)> {
        let (mut due, rest): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.timers).into_iter().partition(|t| t.due <= now);
        self.timers = rest;
        due.sort_by(|a, b| a.due.0.total_cmp(&b.due.0).then_with(|| a.id.cmp(&b.id)));
        due.into_iter().map(|t| (t.id, t.payload)).collect()
    }
}
