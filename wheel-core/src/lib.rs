//! Spin-the-wheel engine: rotation animation, winner selection and a confetti
//! particle rain, all driven by an injected frame scheduler.

pub mod audio;
pub mod celebration;
pub mod config;
pub mod easing;
pub mod entries;
pub mod error;
pub mod render;
pub mod scheduler;
pub mod wheel;

pub use celebration::{CelebrationEffect, ConfettiRain, Particle, ParticleSurface};
pub use config::{ConfettiConfig, SpinConfig, WheelConfig};
pub use error::{ConfigError, StateViolation, WheelError};
pub use scheduler::{FrameHandle, FrameScheduler, ManualScheduler, ScheduleError};
pub use wheel::{Phase, SpinParameters, WheelEngine, WheelEvent, compute_winner};
