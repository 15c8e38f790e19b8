use super::*;

fn run_linear(mut pos: Point, target: Point, min_step: f64, max_calls: usize) -> (Point, usize) {
    for n in 1..=max_calls {
        if step_toward_linear(&mut pos, target, min_step) {
            return (pos, n);
        }
    }
    panic!("linear step did not reach {target:?} within {max_calls} calls (at {pos:?})");
}

#[test]
fn linear_reaches_target_in_bounded_calls() {
    for (from, to) in [
        (Point::new(2000.0, 200.0), Point::new(200.0, 200.0)),
        (Point::new(0.0, 0.0), Point::new(-350.0, 975.5)),
        (Point::new(10.0, 10.0), Point::new(10.0, 10.0)),
    ] {
        let dist = (to - from).hypot();
        // Each call advances at least `min_step` per axis.
        let bound = (dist / 30.0).ceil() as usize + 1;
        let (end, _) = run_linear(from, to, 30.0, bound);
        assert_eq!(end, to);
    }
}

#[test]
fn linear_decelerates_near_target() {
    let mut pos = Point::new(0.0, 0.0);
    let target = Point::new(6400.0, 0.0);
    step_toward_linear(&mut pos, target, 1.0);
    let first = pos.x;
    for _ in 0..200 {
        step_toward_linear(&mut pos, target, 1.0);
    }
    let before = pos.x;
    step_toward_linear(&mut pos, target, 1.0);
    assert!(pos.x - before < first);
}

#[test]
fn linear_is_idempotent_once_reached() {
    let target = Point::new(450.0, 200.0);
    let (mut pos, _) = run_linear(Point::new(2000.0, 400.0), target, 30.0, 1000);
    for _ in 0..5 {
        assert!(step_toward_linear(&mut pos, target, 30.0));
        assert_eq!(pos, target);
    }
}

#[test]
fn linear_zero_min_step_still_terminates() {
    let (end, _) = run_linear(Point::new(0.0, 0.0), Point::new(5.0, 5.0), 0.0, 10_000);
    assert_eq!(end, Point::new(5.0, 5.0));
}

#[test]
fn eased_reaches_target_and_clears_progress() {
    let mut pos = Point::new(0.0, 0.0);
    let target = Point::new(300.0, -120.0);
    let mut progress = None;
    let mut done = false;
    for _ in 0..10_000 {
        if step_toward_eased(&mut pos, target, 5.0, &mut progress) {
            done = true;
            break;
        }
        assert!(progress.is_some());
    }
    assert!(done);
    assert_eq!(pos, target);
    assert!(progress.is_none());
}

#[test]
fn eased_captures_start_lazily() {
    let mut pos = Point::new(10.0, 20.0);
    let mut progress = None;
    step_toward_eased(&mut pos, Point::new(100.0, 20.0), 5.0, &mut progress);
    let g = progress.expect("progress captured on first call");
    assert_eq!(g.start, Point::new(10.0, 20.0));
    assert_eq!(g.target, Point::new(100.0, 20.0));
}

#[test]
fn eased_is_restartable_with_fresh_start() {
    let mut pos = Point::new(0.0, 0.0);
    let mut progress = None;
    let first = Point::new(100.0, 0.0);
    while !step_toward_eased(&mut pos, first, 5.0, &mut progress) {}
    assert!(progress.is_none());

    let second = Point::new(100.0, 250.0);
    step_toward_eased(&mut pos, second, 5.0, &mut progress);
    let g = progress.expect("restarted progress");
    assert_eq!(g.start, first);
    assert_eq!(g.target, second);

    while !step_toward_eased(&mut pos, second, 5.0, &mut progress) {}
    assert_eq!(pos, second);
}

#[test]
fn eased_never_overshoots() {
    let mut pos = Point::new(0.0, 0.0);
    let target = Point::new(50.0, 0.0);
    let mut progress = None;
    loop {
        let done = step_toward_eased(&mut pos, target, 40.0, &mut progress);
        assert!(pos.x <= target.x);
        if done {
            break;
        }
    }
}

#[test]
fn eased_zero_distance_completes_immediately() {
    let mut pos = Point::new(7.0, 7.0);
    let mut progress = None;
    assert!(step_toward_eased(&mut pos, Point::new(7.0, 7.0), 5.0, &mut progress));
    assert!(progress.is_none());
}

#[test]
fn resize_grows_and_shrinks_to_target() {
    let mut pos = Point::new(0.0, 0.0);
    let mut size = Size::new(40.0, 40.0);
    let big = Size::new(60.0, 60.0);
    let mut calls = 0;
    while !resize_toward(&mut pos, &mut size, big, 3.0, false) {
        calls += 1;
        assert!(calls < 100);
    }
    assert_eq!(size, big);
    assert_eq!(pos, Point::new(0.0, 0.0));

    while !resize_toward(&mut pos, &mut size, Size::new(40.0, 40.0), 3.0, false) {}
    assert_eq!(size, Size::new(40.0, 40.0));
}

#[test]
fn centered_resize_keeps_center_invariant() {
    let mut pos = Point::new(100.0, 100.0);
    let mut size = Size::new(40.0, 40.0);
    let center = |p: Point, s: Size| Point::new(p.x + s.width / 2.0, p.y + s.height / 2.0);
    let c0 = center(pos, size);
    loop {
        let done = resize_toward(&mut pos, &mut size, Size::new(61.0, 61.0), 3.0, true);
        let c = center(pos, size);
        assert!((c.x - c0.x).abs() < 1e-9 && (c.y - c0.y).abs() < 1e-9);
        if done {
            break;
        }
    }
}
