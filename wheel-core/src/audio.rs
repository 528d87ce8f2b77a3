//! Spin-sound hints derived from animation progress.

const MIN_PLAYBACK_RATE: f64 = 0.3;

/// Playback rate for the spin sound at eased progress `eased`.
pub fn playback_rate(eased: f64) -> f64 {
    (0.5 + 1.5 * eased).max(MIN_PLAYBACK_RATE)
}
