use std::f64::consts::{PI, TAU};
use std::num::NonZeroUsize;

use rand::Rng;

use crate::config::{SpinConfig, sample_between};
use crate::easing::{ease_out_cubic, progress};
use crate::error::{StateViolation, WheelError};
use crate::render::arc_size;
use crate::scheduler::{FrameHandle, FrameScheduler};

/// Screen angle of the fixed pointer (top center) in the rotation's frame.
pub const POINTER_ANGLE: f64 = 1.5 * PI;

/// Index of the segment under the pointer for a wheel turned by `rotation`.
///
/// Segment `i` covers `[rotation + i*arc, rotation + (i+1)*arc)`.
pub fn compute_winner(rotation: f64, entry_count: NonZeroUsize) -> usize {
    let n = entry_count.get() as i64;
    let normalized = rotation.rem_euclid(TAU);
    let raw = ((POINTER_ANGLE - normalized) / arc_size(entry_count)).floor() as i64;
    raw.rem_euclid(n) as usize
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Spinning,
    /// Finished a spin; spins again like `Idle` but keeps the last winner latched.
    Settled,
}

/// Everything about one spin, sampled when it starts.
#[derive(Clone, Debug, PartialEq)]
pub struct SpinParameters {
    pub extra_turns: f64,
    pub duration_ms: f64,
    pub start_rotation: f64,
    pub target_rotation: f64,
    pub start_time: f64,
    /// Segment count the spin was started with.
    pub entry_count: NonZeroUsize,
}

impl SpinParameters {
    pub fn sample<R: Rng + ?Sized>(
        config: &SpinConfig,
        start_rotation: f64,
        start_time: f64,
        entry_count: NonZeroUsize,
        rng: &mut R,
    ) -> Self {
        let extra_turns = sample_between(rng, config.min_turns, config.max_turns);
        let duration_ms = sample_between(rng, config.min_duration_ms, config.max_duration_ms);
        SpinParameters {
            extra_turns,
            duration_ms,
            start_rotation,
            target_rotation: start_rotation + extra_turns * TAU,
            start_time,
            entry_count,
        }
    }

    /// Rotation and eased progress at time `now`.
    pub fn sample_at(&self, now: f64) -> (f64, f64, f64) {
        let p = progress(now - self.start_time, self.duration_ms);
        let eased = ease_out_cubic(p);
        let rotation = if p >= 1.0 {
            self.target_rotation
        } else {
            self.start_rotation + (self.target_rotation - self.start_rotation) * eased
        };
        (rotation, eased, p)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum WheelEvent {
    /// Emitted on every animation frame; the wheel should be redrawn at `rotation`.
    Frame { rotation: f64, eased: f64 },
    /// Emitted once when a spin settles.
    Winner { index: usize, label: String },
}

/// Rotation state, spin animation and winner selection for one wheel.
pub struct WheelEngine<S, R> {
    entries: Vec<String>,
    rotation: f64,
    phase: Phase,
    last_winner: Option<usize>,
    config: SpinConfig,
    spin: Option<SpinParameters>,
    pending: Option<FrameHandle>,
    scheduler: S,
    rng: R,
}

impl<S: FrameScheduler, R: Rng> WheelEngine<S, R> {
    pub fn new(scheduler: S, rng: R) -> Self {
        Self::with_config(SpinConfig::default(), scheduler, rng)
    }

    pub fn with_config(config: SpinConfig, scheduler: S, rng: R) -> Self {
        WheelEngine {
            entries: Vec::new(),
            rotation: 0.0,
            phase: Phase::Idle,
            last_winner: None,
            config,
            spin: None,
            pending: None,
            scheduler,
            rng,
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn last_winner(&self) -> Option<usize> {
        self.last_winner
    }

    pub fn config(&self) -> &SpinConfig {
        &self.config
    }

    /// Parameters of the spin in flight, if any.
    pub fn spin_parameters(&self) -> Option<&SpinParameters> {
        self.spin.as_ref()
    }

    pub fn can_spin(&self) -> bool {
        self.phase != Phase::Spinning && !self.entries.is_empty()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    fn ensure_not_spinning(&self) -> Result<(), WheelError> {
        if self.phase == Phase::Spinning {
            Err(StateViolation::AlreadySpinning.into())
        } else {
            Ok(())
        }
    }

    /// Replace the entry list. Rejected mid-spin since the segment count
    /// drives the arc math.
    pub fn set_entries(&mut self, entries: Vec<String>) -> Result<(), WheelError> {
        self.ensure_not_spinning()?;
        if entries != self.entries {
            self.last_winner = None;
            self.entries = entries;
        }
        Ok(())
    }

    pub fn spin(&mut self) -> Result<(), WheelError> {
        self.ensure_not_spinning()?;
        let count = NonZeroUsize::new(self.entries.len()).ok_or(StateViolation::NoEntries)?;
        let now = self.scheduler.now();
        let params = SpinParameters::sample(&self.config, self.rotation, now, count, &mut self.rng);
        log::debug!(
            "spin: {:.2} turns over {:.0}ms across {} entries",
            params.extra_turns,
            params.duration_ms,
            count
        );
        // Nothing changes unless the first frame is actually on its way.
        let handle = self.scheduler.request_frame()?;
        self.spin = Some(params);
        self.phase = Phase::Spinning;
        self.pending = Some(handle);
        Ok(())
    }

    /// Advance the animation to `now`. Frames that arrive with nothing pending
    /// (after a reset, or before any spin) are ignored.
    pub fn on_frame(&mut self, now: f64) -> Vec<WheelEvent> {
        if self.pending.take().is_none() {
            return Vec::new();
        }
        let Some(params) = self.spin.take() else {
            return Vec::new();
        };
        let (mut rotation, eased, p) = params.sample_at(now);
        self.rotation = rotation;
        let mut events = vec![WheelEvent::Frame { rotation, eased }];
        if p < 1.0 {
            match self.scheduler.request_frame() {
                Ok(handle) => {
                    self.spin = Some(params);
                    self.pending = Some(handle);
                    return events;
                }
                Err(e) => {
                    // Without further frames the spin would never settle; jump to the end.
                    log::warn!("{e}; settling the spin early");
                    rotation = params.target_rotation;
                    self.rotation = rotation;
                    events.push(WheelEvent::Frame {
                        rotation,
                        eased: 1.0,
                    });
                }
            }
        }

        let index = compute_winner(rotation, params.entry_count);
        let label = self.entries[index].clone();
        log::info!("winner: #{index} {label:?}");
        self.phase = Phase::Settled;
        self.last_winner = Some(index);
        events.push(WheelEvent::Winner { index, label });
        events
    }

    /// Back to `Idle` at rotation 0. Any spin in flight is abandoned without a winner.
    pub fn reset(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
        if self.spin.take().is_some() {
            log::debug!("reset: abandoning spin in flight");
        }
        self.phase = Phase::Idle;
        self.rotation = 0.0;
        self.last_winner = None;
    }

    pub fn remove_entry(&mut self, index: usize) -> Result<String, WheelError> {
        self.ensure_not_spinning()?;
        let len = self.entries.len();
        if index >= len {
            return Err(StateViolation::IndexOutOfRange { index, len }.into());
        }
        self.last_winner = None;
        Ok(self.entries.remove(index))
    }

    /// Remove the entry the last spin landed on. `None` when no winner is latched.
    pub fn remove_last_winner(&mut self) -> Result<Option<String>, WheelError> {
        self.ensure_not_spinning()?;
        match self.last_winner {
            Some(index) => self.remove_entry(index).map(Some),
            None => Ok(None),
        }
    }
}
