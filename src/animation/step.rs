//! Incremental motion primitives.
//!
//! Every function here does a bounded amount of work per call and reports whether the target has
//! been reached. Long transitions are driven by calling again on the next tick.

use crate::animation::ease::smoothstep;
use crate::foundation::core::{Point, Size};

/// Remaining distance is divided by this to grow the linear step far from the target.
pub const LINEAR_DISTANCE_DIVISOR: f64 = 64.0;

/// Smallest per-call step for linear motion and resizing. Guarantees termination.
pub const MIN_STEP: f64 = 0.01;

/// Eased motion snaps to its target once both axes are closer than this.
pub const GLIDE_SNAP_EPSILON: f64 = 0.1;

/// Lower bound for the eased velocity factor, so motion starts at progress 0.
pub const GLIDE_MIN_FACTOR: f64 = 0.2;

fn step_axis_linear(pos: &mut f64, target: f64, min_step: f64) {
    let step = min_step + (target - *pos).abs() / LINEAR_DISTANCE_DIVISOR;
    if *pos < target {
        *pos = (*pos + step).min(target);
    } else if *pos > target {
        *pos = (*pos - step).max(target);
    }
}

/// Move `pos` toward `target`, decelerating as it gets closer.
///
/// Each axis advances by `min_step + |target - pos| / 64`, clamped to the target. Returns `true`
/// once both axes sit exactly on the target; further calls leave `pos` untouched.
pub fn step_toward_linear(pos: &mut Point, target: Point, min_step: f64) -> bool {
    let min_step = sanitize_step(min_step);
    step_axis_linear(&mut pos.x, target.x, min_step);
    step_axis_linear(&mut pos.y, target.y, min_step);
    *pos == target
}

/// In-flight state of an eased move. Present only while the move is running.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlideProgress {
    /// Position captured on the first step toward `target`.
    pub start: Point,
    /// Target the start was captured for.
    pub target: Point,
}

fn step_axis_eased(pos: &mut f64, start: f64, target: f64, speed: f64) {
    let total = (target - start).abs();
    let remaining = (target - *pos).abs();
    if remaining == 0.0 {
        return;
    }
    let progress = if total == 0.0 {
        1.0
    } else {
        (1.0 - remaining / total).clamp(0.0, 1.0)
    };
    let factor = smoothstep(progress).max(GLIDE_MIN_FACTOR);
    let magnitude = speed * factor;
    if magnitude >= remaining {
        *pos = target;
    } else {
        *pos += (target - *pos).signum() * magnitude;
    }
}

/// Move `pos` toward `target` with S-curve easing.
///
/// The start point is captured into `progress` on the first call (or whenever the target
/// changes). Once both axes are within [`GLIDE_SNAP_EPSILON`] the position snaps to the target,
/// `progress` is cleared and `true` is returned.
pub fn step_toward_eased(
    pos: &mut Point,
    target: Point,
    speed: f64,
    progress: &mut Option<GlideProgress>,
) -> bool {
    let glide = match *progress {
        Some(g) if g.target == target => g,
        _ => {
            let g = GlideProgress { start: *pos, target };
            *progress = Some(g);
            g
        }
    };

    let speed = speed.abs();
    step_axis_eased(&mut pos.x, glide.start.x, target.x, speed);
    step_axis_eased(&mut pos.y, glide.start.y, target.y, speed);

    let at_target = (pos.x - target.x).abs() < GLIDE_SNAP_EPSILON
        && (pos.y - target.y).abs() < GLIDE_SNAP_EPSILON;
    if at_target {
        *pos = target;
        *progress = None;
    }
    at_target
}

/// Returns the size change actually applied on this axis.
fn step_axis_size(size: &mut f64, target: f64, delta: f64) -> f64 {
    let before = *size;
    if *size < target {
        *size = (*size + delta).min(target);
    } else if *size > target {
        *size = (*size - delta).max(target);
    }
    *size - before
}

/// Grow or shrink `size` toward `target` by `|delta|` per axis.
///
/// With `centered`, `pos` (the top-left corner) moves by half the applied change so the rectangle
/// center stays put.
pub fn resize_toward(
    pos: &mut Point,
    size: &mut Size,
    target: Size,
    delta: f64,
    centered: bool,
) -> bool {
    let delta = sanitize_step(delta);
    let dw = step_axis_size(&mut size.width, target.width, delta);
    let dh = step_axis_size(&mut size.height, target.height, delta);
    if centered {
        pos.x -= dw / 2.0;
        pos.y -= dh / 2.0;
    }
    *size == target
}

fn sanitize_step(step: f64) -> f64 {
    if step.is_finite() {
        step.abs().max(MIN_STEP)
    } else {
        MIN_STEP
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/step.rs"]
mod tests;
