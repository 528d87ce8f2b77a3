/// Normalized time of an animation, clamped to `[0, 1]`.
///
/// A non-positive duration is treated as already finished.
pub fn progress(elapsed_ms: f64, duration_ms: f64) -> f64 {
    if duration_ms <= 0.0 {
        return 1.0;
    }
    (elapsed_ms / duration_ms).clamp(0.0, 1.0)
}

/// Cubic ease-out: fast start, gentle stop. `eased(0) == 0`, `eased(1) == 1`.
pub fn ease_out_cubic(p: f64) -> f64 {
    let p = p.clamp(0.0, 1.0);
    1.0 - (1.0 - p).powi(3)
}
