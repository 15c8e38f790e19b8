/// Hermite S-curve `3t² - 2t³`, with `t` clamped to `[0, 1]`.
///
/// Slow near both ends, fastest at the midpoint.
pub fn smoothstep(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
