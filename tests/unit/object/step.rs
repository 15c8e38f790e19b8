use super::*;
use crate::object::palette::StepPalette;
use crate::render::surface::{DrawOp, RecordingSurface};

fn step() -> ExecutionStep {
    ExecutionStep::new(Point::new(100.0, 100.0), 40.0)
}

fn run(s: &mut ExecutionStep, ticks: u64) {
    for t in 0..ticks {
        s.update(Tick(t));
    }
}

#[test]
fn idle_step_ignores_updates() {
    let mut s = step();
    run(&mut s, 50);
    assert_eq!(s.state(), StepState::NotStarted);
    assert_eq!(s.fill_percent(), 0);
}

#[test]
fn done_after_exactly_100_over_velocity_updates() {
    for v in [10u32, 20, 25, 50] {
        let mut s = step().with_velocity(v);
        s.start_execution();
        let needed = u64::from(100 / v);
        run(&mut s, needed - 1);
        assert_eq!(s.state(), StepState::Running, "velocity {v}");
        run(&mut s, 1);
        assert!(s.is_executed(), "velocity {v}");
        assert_eq!(s.fill_percent(), 100);
        assert_eq!(s.pulse_stage(), Some(0));
    }
}

#[test]
fn uneven_velocity_rounds_up_and_caps_fill() {
    let mut s = step().with_velocity(30);
    s.start_execution();
    run(&mut s, 3);
    assert_eq!(s.state(), StepState::Running);
    run(&mut s, 1);
    assert!(s.is_executed());
    assert_eq!(s.fill_percent(), 100);
}

#[test]
fn zero_velocity_is_clamped() {
    let s = step().with_velocity(0);
    assert_eq!(s.velocity(), 1);
}

#[test]
fn start_is_noop_unless_not_started() {
    let mut s = step();
    s.start_execution();
    run(&mut s, 3);
    s.start_execution();
    assert_eq!(s.fill_percent(), 30);
}

#[test]
fn error_only_from_running_or_done() {
    let mut s = step();
    s.execution_error();
    assert_eq!(s.state(), StepState::NotStarted);

    s.start_execution();
    s.execution_error();
    assert_eq!(s.state(), StepState::Error);

    let mut s = step();
    s.start_execution();
    run(&mut s, 10);
    s.execution_error();
    assert_eq!(s.state(), StepState::Error);

    s.start_execution();
    run(&mut s, 5);
    assert_eq!(s.state(), StepState::Error);
}

#[test]
fn pulse_grows_shrinks_and_disarms() {
    let mut s = step();
    s.start_execution();
    run(&mut s, 10);
    let center = s.body().center();
    let mut max_width: f64 = 0.0;
    let mut ticks = 0;
    while s.pulse_stage().is_some() {
        s.update(Tick(ticks));
        ticks += 1;
        max_width = max_width.max(s.body().size.width);
        let c = s.body().center();
        assert!((c.x - center.x).abs() < 1e-9 && (c.y - center.y).abs() < 1e-9);
        assert!(ticks < 1000, "pulse never finished");
    }
    assert_eq!(max_width, 60.0);
    assert_eq!(s.body().size, s.base_size());
    assert!(s.is_executed());
    // Only plays once.
    run(&mut s, 20);
    assert_eq!(s.body().size, Size::new(40.0, 40.0));
}

#[test]
fn reset_restores_base_size_mid_pulse() {
    let mut s = step();
    s.start_execution();
    run(&mut s, 15);
    assert!(s.body().size.width > 40.0);
    s.reset();
    assert_eq!(s.state(), StepState::NotStarted);
    assert_eq!(s.fill_percent(), 0);
    assert_eq!(s.pulse_stage(), None);
    assert_eq!(s.body().size, Size::new(40.0, 40.0));
    assert_eq!(s.body().center(), Point::new(120.0, 120.0));
}

#[test]
fn place_keeps_pulsing_step_centered_on_slot() {
    let mut s = step();
    s.start_execution();
    run(&mut s, 13);
    let grown = s.body().size;
    s.place(Point::new(0.0, 0.0), 40.0);
    assert_eq!(s.body().size, grown);
    assert_eq!(s.body().center(), Point::new(20.0, 20.0));
}

#[test]
fn draws_border_then_state_fill() {
    let mut s = step();
    let palette = StepPalette::DEFAULT;
    let mut surface = RecordingSurface::new();

    s.draw(&mut surface).unwrap();
    match &surface.ops()[0] {
        DrawOp::RoundedRect {
            rect,
            radius,
            color,
        } => {
            assert_eq!(*rect, Rect::new(95.0, 95.0, 145.0, 145.0));
            assert_eq!(*radius, 3.0);
            assert_eq!(*color, palette.border);
        }
        op => panic!("expected border, got {op:?}"),
    }
    assert_eq!(
        surface.rects(),
        vec![(Rect::new(100.0, 100.0, 140.0, 140.0), palette.not_started)]
    );

    s.start_execution();
    run(&mut s, 4);
    surface.clear();
    s.draw(&mut surface).unwrap();
    assert_eq!(
        surface.rects(),
        vec![
            (Rect::new(116.0, 100.0, 140.0, 140.0), palette.not_started),
            (Rect::new(100.0, 100.0, 116.0, 140.0), palette.done),
        ]
    );

    s.execution_error();
    surface.clear();
    s.draw(&mut surface).unwrap();
    assert_eq!(surface.rects()[0].1, palette.error);
}
