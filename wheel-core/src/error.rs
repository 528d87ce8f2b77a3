use thiserror::Error;

use crate::scheduler::ScheduleError;

/// Why a command was rejected by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StateViolation {
    #[error("the wheel is already spinning")]
    AlreadySpinning,

    #[error("there are no entries on the wheel")]
    NoEntries,

    #[error("entry index {index} is out of range for {len} entries")]
    IndexOutOfRange { index: usize, len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WheelError {
    #[error("invalid state: {0}")]
    InvalidState(#[from] StateViolation),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

impl WheelError {
    /// The rejected precondition, for `InvalidState` errors.
    pub fn violation(&self) -> Option<StateViolation> {
        match self {
            WheelError::InvalidState(v) => Some(*v),
            WheelError::Schedule(_) => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid range for {field}: {min}..{max}")]
    InvalidRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("particle count must be at least 1")]
    NoParticles,
}
