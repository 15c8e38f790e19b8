use std::path::Path;

use crate::config::RenderConfig;
use crate::encode::ffmpeg::FfmpegSink;
use crate::encode::pipeline::{FramePipeline, PipelineStats};
use crate::encode::sink::FrameSink;
use crate::foundation::core::Tick;
use crate::foundation::error::TickreelResult;
use crate::render::cpu::CpuSurface;
use crate::render::frame::Frame;
use crate::scene::SceneSequence;

/// Outcome of a recorded run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Simulation ticks executed, one frame each.
    pub ticks: u64,
    /// Whether the run ended because every scene finished (rather than hitting `max_ticks`).
    pub finished: bool,
    pub pipeline: PipelineStats,
}

/// Drives the scene sequence one tick at a time and turns each tick into a frame.
///
/// Each tick updates the scenes top-down, then draws the current scene onto a fresh CPU surface.
pub struct RenderSession {
    config: RenderConfig,
    scenes: SceneSequence,
    surface: CpuSurface,
    tick: Tick,
}

impl RenderSession {
    pub fn new(config: RenderConfig) -> TickreelResult<Self> {
        config.validate()?;
        let scenes = config.build_scenes()?;
        let surface = CpuSurface::new(
            config.canvas(),
            config.background,
            config.font_path.as_deref(),
        )?;
        Ok(Self {
            config,
            scenes,
            surface,
            tick: Tick::default(),
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Next tick to be simulated.
    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn is_finished(&self) -> bool {
        self.scenes.is_finished()
    }

    /// Rebuild the scenes and rewind to tick 0.
    pub fn restart(&mut self) -> TickreelResult<()> {
        self.scenes = self.config.build_scenes()?;
        self.tick = Tick::default();
        Ok(())
    }

    /// Simulate one tick without drawing.
    pub fn advance(&mut self) {
        self.scenes.update(self.tick);
        self.tick = self.tick.next();
    }

    /// Simulate one tick and rasterize the result.
    pub fn step(&mut self) -> TickreelResult<Frame> {
        self.advance();
        self.draw()
    }

    fn draw(&mut self) -> TickreelResult<Frame> {
        self.surface.begin_frame();
        self.scenes.draw(&mut self.surface)?;
        self.surface.capture()
    }

    /// Frame shown after simulating ticks `0..=tick`. Rewinds when `tick` is in the past.
    ///
    /// Ticks past the end of the last scene yield a background-only frame without simulating the
    /// idle ticks in between.
    #[tracing::instrument(skip(self))]
    pub fn render_tick(&mut self, tick: u64) -> TickreelResult<Frame> {
        if self.tick.0 > tick {
            self.restart()?;
        }
        // Nothing changes once every scene is done.
        while self.tick.0 < tick && !self.scenes.is_finished() {
            self.advance();
        }
        self.step()
    }

    /// Record every tick into `sink` through a [`FramePipeline`] until the scenes finish or
    /// `max_ticks` is reached.
    #[tracing::instrument(skip(self, sink))]
    pub fn render_to_sink(&mut self, sink: impl FrameSink + 'static) -> TickreelResult<RenderStats> {
        let mut pipeline = FramePipeline::new(self.config.pipeline_opts(), sink)?;
        pipeline.start()?;

        let limit = self.config.max_ticks.unwrap_or(u64::MAX);
        let mut ticks = 0u64;
        let produced = self.produce(&mut pipeline, limit, &mut ticks);

        // Always drain and finish the sink, but report the producer error first.
        let closed = pipeline.close();
        produced?;
        let pipeline = closed?;

        let finished = self.scenes.is_finished();
        tracing::info!(
            ticks,
            secs = self.config.fps.ticks_to_secs(ticks),
            finished,
            dropped = pipeline.dropped,
            written = pipeline.written,
            "render complete"
        );
        Ok(RenderStats {
            ticks,
            finished,
            pipeline,
        })
    }

    fn produce(
        &mut self,
        pipeline: &mut FramePipeline,
        limit: u64,
        ticks: &mut u64,
    ) -> TickreelResult<()> {
        while !self.scenes.is_finished() && *ticks < limit {
            let frame = self.step()?;
            pipeline.send_frame(frame)?;
            *ticks += 1;
        }
        Ok(())
    }

    /// Record to an MP4 file with the system `ffmpeg`.
    pub fn render_to_mp4(&mut self, out: &Path) -> TickreelResult<RenderStats> {
        let sink = FfmpegSink::new(self.config.encoder_opts(out));
        self.render_to_sink(sink)
    }
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
