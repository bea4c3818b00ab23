/// Handle for one pending next-frame callback.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameRequest(pub u64);

/// Next-paint callback registry with cancellation.
///
/// Ordering contract:
/// - A request made while a frame is being dispatched runs on the *next*
///   frame, never the current one.
/// - Requests due on the same frame run in request order.
/// - A cancelled request is never returned by [`FrameScheduler::take_due`].
#[derive(Debug)]
pub struct FrameScheduler<T> {
    next_id: u64,
    pending: Vec<(FrameRequest, T)>,
}

impl<T> Default for FrameScheduler<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            pending: Vec::new(),
        }
    }
}

impl<T> FrameScheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self, payload: T) -> FrameRequest {
        let req = FrameRequest(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.pending.push((req, payload));
        req
    }

    /// Cancels a pending request.
    ///
    /// Returns `true` if the request was still pending. Cancelling a request
    /// that already ran (or was already cancelled) is a no-op.
    pub fn cancel(&mut self, req: FrameRequest) -> bool {
        let before = self.pending.len();
        self.pending.retain(|(r, _)| *r != req);
        self.pending.len() != before
    }

    pub fn cancel_all(&mut self) -> usize {
        let n = self.pending.len();
        self.pending.clear();
        n
    }

    pub fn is_pending(&self, req: FrameRequest) -> bool {
        self.pending.iter().any(|(r, _)| *r == req)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Removes and returns every request due on this frame.
    pub fn take_due(&mut self) -> Vec<(FrameRequest, T)> {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::FrameScheduler;

    #[test]
    fn runs_requests_in_request_order() {
        let mut sched = FrameScheduler::new();
        sched.request("b");
        sched.request("a");
        let due: Vec<_> = sched.take_due().into_iter().map(|(_, p)| p).collect();
        assert_eq!(due, vec!["b", "a"]);
        assert!(sched.is_empty());
    }

    #[test]
    fn requests_made_during_dispatch_wait_for_next_frame() {
        let mut sched = FrameScheduler::new();
        sched.request(1);
        let due = sched.take_due();
        assert_eq!(due.len(), 1);
        let follow_up = sched.request(2);
        assert!(sched.is_pending(follow_up));
        assert_eq!(sched.take_due().len(), 1);
    }

    #[test]
    fn cancelled_requests_never_run() {
        let mut sched = FrameScheduler::new();
        let a = sched.request("a");
        sched.request("b");
        assert!(sched.cancel(a));
        let due: Vec<_> = sched.take_due().into_iter().map(|(_, p)| p).collect();
        assert_eq!(due, vec!["b"]);
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut sched = FrameScheduler::new();
        let a = sched.request(());
        assert!(sched.cancel(a));
        assert!(!sched.cancel(a));
        let b = sched.request(());
        sched.take_due();
        assert!(!sched.cancel(b));
    }

    #[test]
    fn cancel_all_reports_count() {
        let mut sched = FrameScheduler::new();
        sched.request(());
        sched.request(());
        assert_eq!(sched.cancel_all(), 2);
        assert!(sched.take_due().is_empty());
    }
}
