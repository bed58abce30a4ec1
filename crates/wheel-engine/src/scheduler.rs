//! Frame scheduling
//!
//! The driver never owns a display loop. It asks a `FrameScheduler` for the
//! next frame or a one-shot timeout, and the host hands the fired callback
//! back through `SpinDriver::dispatch`.

use serde::{Deserialize, Serialize};

/// Opaque identity of a scheduled callback
pub type FrameHandle = u64;

/// A callback the host delivers back to the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScheduledCallback {
    /// Next display frame
    Frame(FrameHandle),
    /// One-shot timer
    Timeout(FrameHandle),
}

/// Host-side scheduling seam
pub trait FrameScheduler {
    /// Current time on the frame clock (ms)
    fn now_ms(&self) -> f64;

    /// Request a callback on the next display frame
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancel a frame request; unknown handles are ignored
    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Request a one-shot callback after `delay_ms`
    fn set_timeout(&mut self, delay_ms: f64) -> FrameHandle;

    /// Cancel a timeout; unknown handles are ignored
    fn clear_timeout(&mut self, handle: FrameHandle);
}

impl<T: FrameScheduler + ?Sized> FrameScheduler for &mut T {
    fn now_ms(&self) -> f64 {
        (**self).now_ms()
    }

    fn request_frame(&mut self) -> FrameHandle {
        (**self).request_frame()
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        (**self).cancel_frame(handle)
    }

    fn set_timeout(&mut self, delay_ms: f64) -> FrameHandle {
        (**self).set_timeout(delay_ms)
    }

    fn clear_timeout(&mut self, handle: FrameHandle) {
        (**self).clear_timeout(handle)
    }
}

/// Fake clock driven by explicit `advance` calls
///
/// Frames fire on the next `advance`, timeouts once the clock reaches their
/// due time.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    now_ms: f64,
    next_handle: FrameHandle,
    pending_frame: Option<FrameHandle>,
    /// (handle, due time)
    timeouts: Vec<(FrameHandle, f64)>,
    frames_requested: u64,
    cancellations: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_handle(&mut self) -> FrameHandle {
        self.next_handle += 1;
        self.next_handle
    }

    /// Move the clock forward and return every callback now due, frame first
    pub fn advance(&mut self, dt_ms: f64) -> Vec<ScheduledCallback> {
        self.now_ms += dt_ms.max(0.0);

        let mut due = Vec::new();
        if let Some(handle) = self.pending_frame.take() {
            due.push(ScheduledCallback::Frame(handle));
        }

        let now = self.now_ms;
        let mut fired: Vec<(FrameHandle, f64)> = Vec::new();
        self.timeouts.retain(|&(handle, at)| {
            if at <= now {
                fired.push((handle, at));
                false
            } else {
                true
            }
        });
        fired.sort_by(|a, b| a.1.total_cmp(&b.1));
        due.extend(fired.into_iter().map(|(h, _)| ScheduledCallback::Timeout(h)));
        due
    }

    /// Anything still waiting to fire
    pub fn has_pending(&self) -> bool {
        self.pending_frame.is_some() || !self.timeouts.is_empty()
    }

    pub fn has_pending_frame(&self) -> bool {
        self.pending_frame.is_some()
    }

    pub fn pending_timeouts(&self) -> usize {
        self.timeouts.len()
    }

    /// Total frames requested over the scheduler's lifetime
    pub fn frames_requested(&self) -> u64 {
        self.frames_requested
    }

    /// Frame and timeout cancellations that hit a live request
    pub fn cancellations(&self) -> u64 {
        self.cancellations
    }
}

impl FrameScheduler for ManualScheduler {
    fn now_ms(&self) -> f64 {
        self.now_ms
    }

    fn request_frame(&mut self) -> FrameHandle {
        debug_assert!(
            self.pending_frame.is_none(),
            "only one frame request may be outstanding"
        );
        let handle = self.next_handle();
        self.pending_frame = Some(handle);
        self.frames_requested += 1;
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending_frame == Some(handle) {
            self.pending_frame = None;
            self.cancellations += 1;
        }
    }

    fn set_timeout(&mut self, delay_ms: f64) -> FrameHandle {
        let handle = self.next_handle();
        self.timeouts.push((handle, self.now_ms + delay_ms.max(0.0)));
        handle
    }

    fn clear_timeout(&mut self, handle: FrameHandle) {
        let before = self.timeouts.len();
        self.timeouts.retain(|&(h, _)| h != handle);
        if self.timeouts.len() != before {
            self.cancellations += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_fires_on_next_advance() {
        let mut sched = ManualScheduler::new();
        let handle = sched.request_frame();

        assert!(sched.has_pending_frame());
        assert_eq!(sched.advance(16.0), vec![ScheduledCallback::Frame(handle)]);
        assert!(!sched.has_pending());
        assert_eq!(sched.now_ms(), 16.0);
    }

    #[test]
    fn test_timeouts_fire_when_due() {
        let mut sched = ManualScheduler::new();
        let late = sched.set_timeout(100.0);
        let early = sched.set_timeout(20.0);

        assert!(sched.advance(10.0).is_empty());
        assert_eq!(
            sched.advance(200.0),
            vec![
                ScheduledCallback::Timeout(early),
                ScheduledCallback::Timeout(late),
            ]
        );
    }

    #[test]
    fn test_cancel() {
        let mut sched = ManualScheduler::new();
        let frame = sched.request_frame();
        let timer = sched.set_timeout(5.0);

        sched.cancel_frame(frame);
        sched.clear_timeout(timer);
        sched.clear_timeout(timer);

        assert!(!sched.has_pending());
        assert_eq!(sched.cancellations(), 2);
        assert!(sched.advance(100.0).is_empty());
    }

    #[test]
    fn test_mut_ref_scheduler() {
        fn request<S: FrameScheduler>(mut scheduler: S) -> FrameHandle {
            scheduler.request_frame()
        }

        let mut sched = ManualScheduler::new();
        let handle = request(&mut sched);
        assert_eq!(sched.frames_requested(), 1);
        assert_eq!(sched.advance(1.0), vec![ScheduledCallback::Frame(handle)]);
    }
}
