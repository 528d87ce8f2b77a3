use thiserror::Error;

/// Id of a frame callback that has been requested but not yet delivered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

/// The frame source refused or could not take a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("no animation frame could be scheduled")]
pub struct ScheduleError;

/// Source of display-refresh frames and of the monotonic clock they are
/// stamped with.
///
/// `request_frame` only registers interest. The host delivers the frame later
/// by calling the owner's `on_frame(now)`, so nothing re-enters the caller.
pub trait FrameScheduler {
    /// Current time in milliseconds on the same clock frames are stamped with.
    fn now(&self) -> f64;
    /// On `Err` nothing is pending and no frame will be delivered.
    fn request_frame(&mut self) -> Result<FrameHandle, ScheduleError>;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Deterministic scheduler driven by hand: the clock only moves on `advance`.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    now: f64,
    next_id: i32,
    pending: Vec<FrameHandle>,
    cancelled: usize,
    failing: bool,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(now: f64) -> Self {
        ManualScheduler {
            now,
            ..Self::default()
        }
    }

    pub fn advance(&mut self, ms: f64) -> f64 {
        self.now += ms;
        self.now
    }

    pub fn set_now(&mut self, now: f64) {
        self.now = now;
    }

    /// Take the oldest pending frame, as a display refresh would.
    pub fn fire(&mut self) -> Option<FrameHandle> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.pending.remove(0))
        }
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending(&self) -> &[FrameHandle] {
        &self.pending
    }

    /// Make every following `request_frame` fail until switched back.
    pub fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }

    /// Number of handles cancelled so far.
    pub fn cancelled(&self) -> usize {
        self.cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn now(&self) -> f64 {
        self.now
    }

    fn request_frame(&mut self) -> Result<FrameHandle, ScheduleError> {
        if self.failing {
            return Err(ScheduleError);
        }
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.push(handle);
        Ok(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let before = self.pending.len();
        self.pending.retain(|h| *h != handle);
        if self.pending.len() != before {
            self.cancelled += 1;
        }
    }
}
