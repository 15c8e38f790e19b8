use super::*;

fn canvas() -> Canvas {
    Canvas {
        width: 16,
        height: 8,
    }
}

#[test]
fn blank_frame_is_background() {
    let mut s = CpuSurface::new(canvas(), Rgba8::opaque(18, 20, 28), None).unwrap();
    s.begin_frame();
    let f = s.capture().unwrap();
    assert_eq!(f.width(), 16);
    assert_eq!(f.height(), 8);
    assert_eq!(f.data().len(), 16 * 8 * 3);
    assert_eq!(f.pixel(5, 5), Some([18, 20, 28]));
}

#[test]
fn filled_rect_lands_in_frame() {
    let mut s = CpuSurface::new(canvas(), Rgba8::opaque(0, 0, 0), None).unwrap();
    s.begin_frame();
    s.fill_rect(Rect::new(0.0, 0.0, 8.0, 8.0), Rgba8::opaque(255, 0, 0));
    let f = s.capture().unwrap();
    assert_eq!(f.pixel(2, 2), Some([255, 0, 0]));
    assert_eq!(f.pixel(12, 2), Some([0, 0, 0]));
}

#[test]
fn begin_frame_discards_previous_draws() {
    let mut s = CpuSurface::new(canvas(), Rgba8::opaque(0, 0, 0), None).unwrap();
    s.begin_frame();
    s.fill_rect(Rect::new(0.0, 0.0, 16.0, 8.0), Rgba8::opaque(0, 255, 0));
    let _ = s.capture().unwrap();
    s.begin_frame();
    let f = s.capture().unwrap();
    assert_eq!(f.pixel(3, 3), Some([0, 0, 0]));
}

#[test]
fn text_without_font_is_skipped() {
    let mut s = CpuSurface::new(canvas(), Rgba8::opaque(0, 0, 0), None).unwrap();
    s.begin_frame();
    let runs = [TextRun {
        text: "int",
        color: Rgba8::opaque(255, 255, 255),
    }];
    s.draw_text(Point::new(0.0, 0.0), &runs, 12.0).unwrap();
    assert_eq!(s.measure_text("int", 10.0).unwrap(), monospace_advance("int", 10.0));
}

#[test]
fn odd_canvas_is_rejected() {
    assert!(
        CpuSurface::new(
            Canvas {
                width: 15,
                height: 8
            },
            Rgba8::opaque(0, 0, 0),
            None
        )
        .is_err()
    );
}
