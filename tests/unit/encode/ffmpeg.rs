use super::*;
use crate::foundation::core::{Canvas, Rgba8};

fn cfg() -> SinkConfig {
    SinkConfig {
        canvas: Canvas {
            width: 1920,
            height: 1080,
        },
        fps: Fps::new(60, 1).unwrap(),
    }
}

#[test]
fn args_describe_rgb24_input_and_h264_output() {
    let sink = FfmpegSink::new(EncoderOpts::new("out/video.mp4"));
    let args = sink.command_args(cfg());
    let expected = "-y -loglevel error -f rawvideo -pix_fmt rgb24 -s 1920x1080 -r 60/1 \
        -thread_queue_size 512 -i pipe:0 -an -c:v libx264 -preset ultrafast -crf 23 \
        -pix_fmt yuv420p -movflags +faststart out/video.mp4";
    assert_eq!(args.join(" "), expected);
}

#[test]
fn no_overwrite_uses_dash_n() {
    let mut opts = EncoderOpts::new("a.mp4");
    opts.overwrite = false;
    opts.crf = 18;
    let args = FfmpegSink::new(opts).command_args(cfg());
    assert_eq!(args[0], "-n");
    assert!(args.windows(2).any(|w| w == ["-crf", "18"]));
}

#[test]
fn push_before_begin_fails() {
    let mut sink = FfmpegSink::new(EncoderOpts::new("unused.mp4"));
    let err = sink
        .push_frame(0, &Frame::solid(2, 2, Rgba8::opaque(0, 0, 0)))
        .unwrap_err();
    assert!(matches!(err, TickreelError::Encode(_)));
}

#[test]
fn begin_rejects_odd_canvas() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = FfmpegSink::new(EncoderOpts::new(dir.path().join("x.mp4")));
    let err = sink
        .begin(SinkConfig {
            canvas: Canvas {
                width: 31,
                height: 20,
            },
            fps: Fps::new(30, 1).unwrap(),
        })
        .unwrap_err();
    assert!(matches!(err, TickreelError::Validation(_)));
}

#[test]
fn existing_output_without_overwrite_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("taken.mp4");
    std::fs::write(&out, b"x").unwrap();
    let mut opts = EncoderOpts::new(&out);
    opts.overwrite = false;
    let err = FfmpegSink::new(opts).begin(cfg()).unwrap_err();
    assert!(matches!(err, TickreelError::Validation(_)));
}

#[test]
fn ensure_parent_dir_creates_nested_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("a/b/c.png");
    ensure_parent_dir(&out).unwrap();
    assert!(dir.path().join("a/b").is_dir());
    ensure_parent_dir(Path::new("bare.png")).unwrap();
}

#[test]
fn finish_timeout_defaults_to_a_minute() {
    let opts = EncoderOpts::new("a.mp4");
    assert_eq!(opts.finish_timeout, DEFAULT_FINISH_TIMEOUT);
    assert_eq!(DEFAULT_FINISH_TIMEOUT, Duration::from_secs(60));
}

#[test]
fn broken_pipe_error_carries_ffmpeg_stderr() {
    if !is_ffmpeg_on_path() {
        eprintln!("skipping: ffmpeg not on PATH");
        return;
    }
    // A directory where the output file should go makes ffmpeg exit once it opens the output.
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("blocked.mp4");
    std::fs::create_dir(&out).unwrap();

    let small = SinkConfig {
        canvas: Canvas {
            width: 64,
            height: 36,
        },
        fps: Fps::new(30, 1).unwrap(),
    };
    let mut sink = FfmpegSink::new(EncoderOpts::new(&out));
    sink.begin(small).unwrap();

    let frame = Frame::solid(64, 36, Rgba8::opaque(10, 20, 30));
    let mut failure = None;
    for seq in 0..5_000u64 {
        if let Err(e) = sink.push_frame(seq, &frame) {
            failure = Some(e);
            break;
        }
        if seq % 50 == 49 {
            std::thread::sleep(Duration::from_millis(5));
        }
    }
    let err = failure.expect("writes into an exited ffmpeg should fail");
    assert!(matches!(err, TickreelError::Encode(_)));
    assert!(err.to_string().contains("ffmpeg said:"), "{err}");
    // The child has been reaped; finishing reports that nothing is running.
    assert!(sink.end().is_err());
}
