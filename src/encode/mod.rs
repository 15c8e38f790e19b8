//! Encoding sinks and the pipeline that feeds them.
//!
//! Sinks consume frames in submission order; [`pipeline::FramePipeline`] moves them off the tick
//! loop onto a worker thread.

/// `ffmpeg`-based sink (MP4 output via system `ffmpeg`).
pub mod ffmpeg;
/// Bounded queue and encoder worker.
pub mod pipeline;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
