//! Bounded producer/consumer hand-off between the tick loop and a [`FrameSink`].
//!
//! The producer calls [`FramePipeline::send_frame`] once per tick. A dedicated worker thread pops
//! frames in FIFO order and pushes them into the sink. The queue is the only state shared between
//! the two sides.

use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, SendTimeoutError, Sender};

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{TickreelError, TickreelResult};
use crate::render::frame::Frame;

/// Queue depth used when none is configured: about two seconds at 60 fps.
pub const DEFAULT_QUEUE_CAPACITY: usize = 120;

/// How long a dropping pipeline waits for queue space before discarding a frame.
pub const DEFAULT_DROP_TIMEOUT: Duration = Duration::from_millis(100);

const WORKER_IDLE_POLL: Duration = Duration::from_millis(250);

/// What `send_frame` does when the queue is full. Fixed for the lifetime of a pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backpressure {
    /// Wait up to `timeout` for space, then drop the frame and log a warning. Memory stays
    /// bounded; a slow encoder costs frames.
    Drop { timeout: Duration },
    /// Wait for space indefinitely. No frame is lost; a stalled encoder stalls the producer.
    Block,
}

impl Default for Backpressure {
    fn default() -> Self {
        Self::Drop {
            timeout: DEFAULT_DROP_TIMEOUT,
        }
    }
}

/// Pipeline construction parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PipelineOpts {
    pub canvas: Canvas,
    pub fps: Fps,
    pub queue_capacity: usize,
    pub backpressure: Backpressure,
}

impl PipelineOpts {
    pub fn new(canvas: Canvas, fps: Fps) -> Self {
        Self {
            canvas,
            fps,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            backpressure: Backpressure::default(),
        }
    }

    pub fn validate(&self) -> TickreelResult<()> {
        self.canvas.validate()?;
        if self.fps.num == 0 || self.fps.den == 0 {
            return Err(TickreelError::validation("fps must be non-zero"));
        }
        if self.queue_capacity == 0 {
            return Err(TickreelError::validation(
                "pipeline queue capacity must be >= 1",
            ));
        }
        Ok(())
    }
}

/// Frame accounting reported by [`FramePipeline::close`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Frames handed to `send_frame` that passed validation.
    pub submitted: u64,
    /// Frames discarded because the queue stayed full.
    pub dropped: u64,
    /// Frames the sink accepted.
    pub written: u64,
}

struct Queued {
    seq: u64,
    frame: Frame,
}

struct WorkerExit {
    written: u64,
    result: TickreelResult<()>,
}

enum Stage {
    Created(Box<dyn FrameSink>),
    Running {
        tx: Sender<Queued>,
        worker: JoinHandle<WorkerExit>,
    },
    /// Terminal. Holds the error message of a failed run so repeated `close` calls agree.
    Closed(Option<String>),
}

/// Two-phase frame pipeline: [`FramePipeline::new`] validates, [`FramePipeline::start`] begins the
/// sink and spawns the worker.
pub struct FramePipeline {
    opts: PipelineOpts,
    stage: Stage,
    stats: PipelineStats,
}

impl FramePipeline {
    pub fn new(opts: PipelineOpts, sink: impl FrameSink + 'static) -> TickreelResult<Self> {
        opts.validate()?;
        Ok(Self {
            opts,
            stage: Stage::Created(Box::new(sink)),
            stats: PipelineStats::default(),
        })
    }

    pub fn opts(&self) -> &PipelineOpts {
        &self.opts
    }

    /// Counters so far. Final once [`FramePipeline::close`] has returned.
    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    pub fn is_running(&self) -> bool {
        matches!(self.stage, Stage::Running { .. })
    }

    /// Begin the sink and spawn the worker thread.
    pub fn start(&mut self) -> TickreelResult<()> {
        let mut sink = match std::mem::replace(&mut self.stage, Stage::Closed(None)) {
            Stage::Created(sink) => sink,
            other => {
                self.stage = other;
                return Err(TickreelError::validation("pipeline was already started"));
            }
        };

        if let Err(e) = sink.begin(SinkConfig {
            canvas: self.opts.canvas,
            fps: self.opts.fps,
        }) {
            self.stage = Stage::Closed(Some(failure_message(&e)));
            return Err(e);
        }

        let (tx, rx) = crossbeam_channel::bounded::<Queued>(self.opts.queue_capacity);
        let worker = match std::thread::Builder::new()
            .name("tickreel-encoder".to_owned())
            .spawn(move || run_worker(sink, rx))
        {
            Ok(handle) => handle,
            Err(e) => {
                let msg = format!("failed to spawn encoder worker: {e}");
                self.stage = Stage::Closed(Some(msg.clone()));
                return Err(TickreelError::encode(msg));
            }
        };

        tracing::debug!(
            capacity = self.opts.queue_capacity,
            backpressure = ?self.opts.backpressure,
            "frame pipeline started"
        );
        self.stage = Stage::Running { tx, worker };
        Ok(())
    }

    /// Queue one frame for encoding.
    ///
    /// Returns a validation error for frames that do not match the configured canvas or when the
    /// pipeline is not running. Once the sink has failed, every call returns that encode error. A frame dropped under
    /// [`Backpressure::Drop`] is not an error.
    pub fn send_frame(&mut self, frame: Frame) -> TickreelResult<()> {
        let canvas = self.opts.canvas;
        if frame.width() != canvas.width
            || frame.height() != canvas.height
            || frame.data().len() != canvas.rgb24_len()
        {
            return Err(TickreelError::validation(format!(
                "frame size mismatch: got {}x{} ({} bytes), pipeline expects {}x{} rgb24",
                frame.width(),
                frame.height(),
                frame.data().len(),
                canvas.width,
                canvas.height
            )));
        }

        let tx = match &self.stage {
            Stage::Running { tx, .. } => tx,
            Stage::Created(_) => {
                return Err(TickreelError::validation("pipeline has not been started"));
            }
            Stage::Closed(Some(failure)) => {
                return Err(TickreelError::encode(failure.clone()));
            }
            Stage::Closed(None) => {
                return Err(TickreelError::validation("send_frame called after close"));
            }
        };

        let seq = self.stats.submitted;
        self.stats.submitted += 1;
        let msg = Queued { seq, frame };

        let disconnected = match self.opts.backpressure {
            Backpressure::Block => tx.send(msg).is_err(),
            Backpressure::Drop { timeout } => match tx.send_timeout(msg, timeout) {
                Ok(()) => false,
                Err(SendTimeoutError::Timeout(_)) => {
                    self.stats.dropped += 1;
                    tracing::warn!(
                        seq,
                        dropped = self.stats.dropped,
                        "encoder is too slow, frame dropped"
                    );
                    false
                }
                Err(SendTimeoutError::Disconnected(_)) => true,
            },
        };

        if disconnected {
            // The worker only hangs up after a sink failure.
            let err = match self.shutdown() {
                Err(e) => e,
                Ok(()) => TickreelError::encode("encoder worker stopped unexpectedly"),
            };
            return Err(err);
        }
        Ok(())
    }

    /// Close the queue, wait for the worker to drain it, and finish the sink.
    ///
    /// Idempotent: later calls return the same outcome without doing any work.
    pub fn close(&mut self) -> TickreelResult<PipelineStats> {
        self.shutdown()?;
        Ok(self.stats)
    }

    fn shutdown(&mut self) -> TickreelResult<()> {
        match std::mem::replace(&mut self.stage, Stage::Closed(None)) {
            Stage::Created(_) => {
                tracing::debug!("frame pipeline closed before start");
                Ok(())
            }
            Stage::Closed(failure) => {
                let result = match &failure {
                    Some(msg) => Err(TickreelError::encode(msg.clone())),
                    None => Ok(()),
                };
                self.stage = Stage::Closed(failure);
                result
            }
            Stage::Running { tx, worker } => {
                drop(tx);
                let exit = worker.join().unwrap_or_else(|_| WorkerExit {
                    written: 0,
                    result: Err(TickreelError::encode("encoder worker panicked")),
                });
                self.stats.written = exit.written;
                tracing::debug!(
                    submitted = self.stats.submitted,
                    dropped = self.stats.dropped,
                    written = self.stats.written,
                    "frame pipeline closed"
                );
                match exit.result {
                    Ok(()) => Ok(()),
                    Err(e) => {
                        self.stage = Stage::Closed(Some(failure_message(&e)));
                        Err(e)
                    }
                }
            }
        }
    }
}

impl Drop for FramePipeline {
    fn drop(&mut self) {
        if self.is_running() {
            tracing::warn!("frame pipeline dropped without close(); closing it now");
            if let Err(e) = self.shutdown() {
                tracing::error!(error = %e, "closing dropped frame pipeline failed");
            }
        }
    }
}

/// Text of a failure as kept for later calls, without the error category prefix.
fn failure_message(err: &TickreelError) -> String {
    match err {
        TickreelError::Encode(msg) => msg.clone(),
        other => other.to_string(),
    }
}

fn run_worker(mut sink: Box<dyn FrameSink>, rx: Receiver<Queued>) -> WorkerExit {
    let mut written = 0u64;
    let result = loop {
        match rx.recv_timeout(WORKER_IDLE_POLL) {
            Ok(Queued { seq, frame }) => {
                if let Err(e) = sink.push_frame(seq, &frame) {
                    tracing::error!(seq, error = %e, "sink rejected frame, stopping encoder worker");
                    break Err(e);
                }
                written += 1;
            }
            Err(RecvTimeoutError::Timeout) => {
                tracing::trace!("encoder worker idle");
            }
            // All senders are gone and the queue is empty.
            Err(RecvTimeoutError::Disconnected) => break sink.end(),
        }
    };
    WorkerExit { written, result }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/pipeline.rs"]
mod tests;
