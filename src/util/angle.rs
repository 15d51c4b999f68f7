//! Angle helpers for craft rotation

use std::f32::consts::{PI, TAU};

/// Wrap an angle into `(-PI, PI]`
pub fn wrap(angle: f32) -> f32 {
    let mut wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped += TAU;
    }
    wrapped
}

/// Signed shortest rotation from `from` to `to`
pub fn shortest_delta(from: f32, to: f32) -> f32 {
    wrap(to - from)
}

/// Rotate `current` toward `target` along the shortest arc by at most `max_step` radians.
///
/// Returns the target itself once it is within `max_step`, so repeated calls settle
/// exactly instead of oscillating around it.
pub fn rotate_towards(current: f32, target: f32, max_step: f32) -> f32 {
    let delta = shortest_delta(current, target);
    if delta.abs() <= max_step {
        current + delta
    } else {
        current + max_step.copysign(delta)
    }
}
