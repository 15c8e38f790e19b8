//! tickreel renders tick-driven 2D explainer animations and records them to video.
//!
//! Everything advances in fixed simulation ticks. Each tick the session:
//!
//! - updates the current [`Scene`] top-down (phases, instructions, steps)
//! - draws it onto a [`CpuSurface`] and captures an RGB24 [`Frame`]
//! - hands the frame to a [`FramePipeline`], whose worker thread feeds a [`FrameSink`] such as
//!   [`FfmpegSink`]
#![forbid(unsafe_code)]

/// Incremental motion primitives and easing.
pub mod animation;
/// JSON render configuration.
pub mod config;
/// Frame sinks and the encoding pipeline.
pub mod encode;
mod foundation;
/// Animated objects.
pub mod object;
/// Drawing surfaces and frames.
pub mod render;
/// Scenes and phase sequencing.
pub mod scene;
/// Tick loop driving scenes into frames.
pub mod session;

pub use crate::foundation::core::{Canvas, Fps, Point, Rect, Rgba8, Size, Tick, Vec2};
pub use crate::foundation::error::{TickreelError, TickreelResult};

pub use crate::config::RenderConfig;
pub use crate::encode::ffmpeg::{EncoderOpts, FfmpegSink, is_ffmpeg_on_path};
pub use crate::encode::pipeline::{Backpressure, FramePipeline, PipelineOpts, PipelineStats};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::object::Animatable;
pub use crate::render::cpu::CpuSurface;
pub use crate::render::frame::Frame;
pub use crate::render::surface::{RecordingSurface, Surface};
pub use crate::scene::{Scene, SceneSequence};
pub use crate::session::{RenderSession, RenderStats};
