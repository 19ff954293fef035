//! Easing curves for platform motion

use glam::DVec2;

/// Cubic ease-in/out on `t` in [0, 1]. Returns exactly 0 and 1 at the endpoints.
#[inline]
pub fn ease_in_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Linear interpolation from `a` to `b`, clamped componentwise to the box spanned by them
#[inline]
pub fn lerp_clamped(a: DVec2, b: DVec2, t: f64) -> DVec2 {
    a.lerp(b, t).clamp(a.min(b), a.max(b))
}
