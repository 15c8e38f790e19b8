use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::time::{Duration, Instant};

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::Fps;
use crate::foundation::error::{TickreelError, TickreelResult};
use crate::render::frame::Frame;

/// How long `end` waits for ffmpeg to exit before killing it.
pub const DEFAULT_FINISH_TIMEOUT: Duration = Duration::from_secs(60);

const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Options for [`FfmpegSink`] MP4 output.
#[derive(Clone, Debug)]
pub struct EncoderOpts {
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
    /// x264 preset.
    pub preset: String,
    /// x264 constant rate factor.
    pub crf: u8,
    /// Upper bound on waiting for ffmpeg to exit after stdin is closed.
    ///
    /// Only the final exit wait is bounded. Frame writes block on the stdin pipe, so an ffmpeg
    /// that stalls mid-stream without exiting also stalls the pipeline worker and
    /// [`FramePipeline::close`](crate::encode::pipeline::FramePipeline::close).
    pub finish_timeout: Duration,
}

impl EncoderOpts {
    /// Create options for outputting an MP4 to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            preset: "ultrafast".to_owned(),
            crf: 23,
            finish_timeout: DEFAULT_FINISH_TIMEOUT,
        }
    }
}

/// Sink that spawns the system `ffmpeg` and streams raw RGB24 frames to its stdin.
pub struct FfmpegSink {
    opts: EncoderOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    cfg: Option<SinkConfig>,
    last_seq: Option<u64>,
}

impl FfmpegSink {
    /// Create a new sink that streams into `ffmpeg`.
    pub fn new(opts: EncoderOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            cfg: None,
            last_seq: None,
        }
    }

    /// Full argument list passed to `ffmpeg` for `cfg`.
    pub fn command_args(&self, cfg: SinkConfig) -> Vec<String> {
        let mut args = vec![
            if self.opts.overwrite { "-y" } else { "-n" }.to_owned(),
            "-loglevel".to_owned(),
            "error".to_owned(),
            "-f".to_owned(),
            "rawvideo".to_owned(),
            "-pix_fmt".to_owned(),
            "rgb24".to_owned(),
            "-s".to_owned(),
            format!("{}x{}", cfg.canvas.width, cfg.canvas.height),
        ];
        args.extend(input_fps_args(cfg.fps));
        args.extend(
            [
                "-thread_queue_size",
                "512",
                "-i",
                "pipe:0",
                "-an",
                "-c:v",
                "libx264",
                "-preset",
            ]
            .map(str::to_owned),
        );
        args.push(self.opts.preset.clone());
        args.push("-crf".to_owned());
        args.push(self.opts.crf.to_string());
        args.extend(["-pix_fmt", "yuv420p", "-movflags", "+faststart"].map(str::to_owned));
        args.push(self.opts.out_path.display().to_string());
        args
    }

    /// Tear down a broken encoder and return whatever it wrote to stderr.
    fn abort(&mut self) -> String {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            // Usually already gone after a broken pipe; kill keeps the stderr read from blocking.
            let _ = child.kill();
            let _ = child.wait();
        }
        self.cfg = None;
        self.collect_stderr().unwrap_or_default()
    }

    fn collect_stderr(&mut self) -> TickreelResult<String> {
        let bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| TickreelError::encode("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| TickreelError::encode(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };
        Ok(String::from_utf8_lossy(&bytes).trim().to_owned())
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> TickreelResult<()> {
        if cfg.fps.num == 0 || cfg.fps.den == 0 {
            return Err(TickreelError::validation("fps must be non-zero"));
        }
        cfg.canvas.validate()?;

        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(TickreelError::validation(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }

        if !is_ffmpeg_on_path() {
            return Err(TickreelError::encode(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let args = self.command_args(cfg);
        tracing::debug!(?args, "spawning ffmpeg");
        let mut child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                TickreelError::encode(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                ))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| TickreelError::encode("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| TickreelError::encode("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_seq = None;
        Ok(())
    }

    fn push_frame(&mut self, seq: u64, frame: &Frame) -> TickreelResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| TickreelError::encode("ffmpeg sink not started"))?;
        if let Some(last) = self.last_seq
            && seq <= last
        {
            return Err(TickreelError::encode(
                "ffmpeg sink received out-of-order frame",
            ));
        }
        self.last_seq = Some(seq);

        if frame.width() != cfg.canvas.width || frame.height() != cfg.canvas.height {
            return Err(TickreelError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width(),
                frame.height(),
                cfg.canvas.width,
                cfg.canvas.height
            )));
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(TickreelError::encode("ffmpeg sink is already finalized"));
        };

        use std::io::Write as _;
        if let Err(e) = stdin.write_all(frame.data()) {
            let stderr = self.abort();
            let mut msg = format!("failed to write frame {seq} to ffmpeg stdin: {e}");
            if !stderr.is_empty() {
                msg.push_str(&format!("; ffmpeg said: {stderr}"));
            }
            return Err(TickreelError::encode(msg));
        }
        Ok(())
    }

    fn end(&mut self) -> TickreelResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| TickreelError::encode("ffmpeg sink not started"))?;

        let deadline = Instant::now() + self.opts.finish_timeout;
        let status = loop {
            let polled = child.try_wait().map_err(|e| {
                TickreelError::encode(format!("failed to wait for ffmpeg to finish: {e}"))
            })?;
            if let Some(status) = polled {
                break status;
            }
            if Instant::now() >= deadline {
                tracing::error!(timeout = ?self.opts.finish_timeout, "ffmpeg did not exit, killing it");
                let _ = child.kill();
                let _ = child.wait();
                let stderr = self.collect_stderr().unwrap_or_default();
                return Err(TickreelError::encode(format!(
                    "ffmpeg did not exit within {:?} and was killed: {stderr}",
                    self.opts.finish_timeout
                )));
            }
            std::thread::sleep(EXIT_POLL_INTERVAL);
        };

        let stderr = self.collect_stderr()?;
        if !status.success() {
            return Err(TickreelError::encode(format!(
                "ffmpeg exited with status {status}: {stderr}"
            )));
        }

        tracing::debug!(out = %self.opts.out_path.display(), "ffmpeg finished");
        self.cfg = None;
        Ok(())
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            tracing::warn!("ffmpeg sink dropped before end, killing encoder");
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

fn input_fps_args(fps: Fps) -> [String; 2] {
    // For rawvideo input, `-r` before `-i` sets the input framerate, as `num/den`.
    ["-r".to_owned(), format!("{}/{}", fps.num, fps.den)]
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> TickreelResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
