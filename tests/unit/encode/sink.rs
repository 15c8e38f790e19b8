use super::*;
use crate::foundation::core::Rgba8;

fn cfg() -> SinkConfig {
    SinkConfig {
        canvas: Canvas {
            width: 4,
            height: 2,
        },
        fps: Fps::new(30, 1).unwrap(),
    }
}

#[test]
fn clones_share_captured_frames() {
    let handle = InMemorySink::new();
    let mut worker_side = handle.clone();
    worker_side.begin(cfg()).unwrap();
    worker_side
        .push_frame(0, &Frame::solid(4, 2, Rgba8::opaque(1, 2, 3)))
        .unwrap();
    worker_side.end().unwrap();

    assert_eq!(handle.config(), Some(cfg()));
    assert_eq!(handle.len(), 1);
    assert_eq!(handle.frames()[0].0, 0);
    assert!(handle.ended());
}

#[test]
fn begin_clears_previous_run() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    sink.push_frame(0, &Frame::solid(4, 2, Rgba8::opaque(0, 0, 0)))
        .unwrap();
    sink.begin(cfg()).unwrap();
    assert!(sink.is_empty());
}

#[test]
fn failing_sink_refuses_after_limit() {
    let mut sink = InMemorySink::new().failing_after(1);
    sink.begin(cfg()).unwrap();
    let f = Frame::solid(4, 2, Rgba8::opaque(0, 0, 0));
    sink.push_frame(0, &f).unwrap();
    let err = sink.push_frame(1, &f).unwrap_err();
    assert!(matches!(err, TickreelError::Encode(_)));
    assert_eq!(sink.len(), 1);
}
