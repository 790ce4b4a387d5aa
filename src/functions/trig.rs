use notlab_macros::builtin_fn;

/// Sine of an angle in radians.
#[builtin_fn]
pub fn sin(angle: f64) -> f64 {
    angle.sin()
}
