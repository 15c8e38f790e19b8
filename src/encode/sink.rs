use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{TickreelError, TickreelResult};
use crate::render::frame::Frame;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output dimensions.
    pub canvas: Canvas,
    /// Output frames-per-second.
    pub fps: Fps,
}

/// Sink contract for consuming frames in submission order.
///
/// Ordering contract: `push_frame` is called with strictly increasing sequence numbers. Numbers
/// may skip when the producer drops frames under backpressure.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> TickreelResult<()>;
    /// Push one frame.
    fn push_frame(&mut self, seq: u64, frame: &Frame) -> TickreelResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> TickreelResult<()>;
}

#[derive(Debug, Default)]
struct Captured {
    cfg: Option<SinkConfig>,
    frames: Vec<(u64, Frame)>,
    ended: bool,
}

/// In-memory sink for tests and debugging.
///
/// Clones share storage, so a handle kept by the caller observes frames pushed by a pipeline
/// worker that owns another clone.
#[derive(Debug, Default, Clone)]
pub struct InMemorySink {
    captured: Arc<Mutex<Captured>>,
    write_delay: Option<Duration>,
    fail_after: Option<usize>,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep for `delay` on every frame, imitating a slow encoder.
    pub fn with_write_delay(mut self, delay: Duration) -> Self {
        self.write_delay = Some(delay);
        self
    }

    /// Fail every push once `n` frames have been accepted, imitating an encoder crash.
    pub fn failing_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Captured> {
        self.captured.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.lock().cfg
    }

    /// Copy of the captured frames with their sequence numbers.
    pub fn frames(&self) -> Vec<(u64, Frame)> {
        self.lock().frames.clone()
    }

    /// Number of captured frames.
    pub fn len(&self) -> usize {
        self.lock().frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `end` has been called.
    pub fn ended(&self) -> bool {
        self.lock().ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> TickreelResult<()> {
        let mut c = self.lock();
        c.cfg = Some(cfg);
        c.frames.clear();
        c.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, seq: u64, frame: &Frame) -> TickreelResult<()> {
        if let Some(delay) = self.write_delay {
            std::thread::sleep(delay);
        }
        let mut c = self.lock();
        if self.fail_after.is_some_and(|n| c.frames.len() >= n) {
            return Err(TickreelError::encode(format!(
                "in-memory sink refused frame {seq}"
            )));
        }
        c.frames.push((seq, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> TickreelResult<()> {
        self.lock().ended = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
