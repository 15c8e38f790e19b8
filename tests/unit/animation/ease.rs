use super::*;

#[test]
fn endpoints_are_stable() {
    assert_eq!(smoothstep(0.0), 0.0);
    assert_eq!(smoothstep(1.0), 1.0);
}

#[test]
fn monotonic_spot_check() {
    let a = smoothstep(0.25);
    let b = smoothstep(0.5);
    let c = smoothstep(0.75);
    assert!(a < b);
    assert!(b < c);
}

#[test]
fn symmetric_around_midpoint() {
    assert_eq!(smoothstep(0.5), 0.5);
    let lo = smoothstep(0.2);
    let hi = smoothstep(0.8);
    assert!((lo + hi - 1.0).abs() < 1e-12);
}

#[test]
fn out_of_range_input_is_clamped() {
    assert_eq!(smoothstep(-3.0), 0.0);
    assert_eq!(smoothstep(7.0), 1.0);
}
