//! JSON render configuration.
//!
//! Every field has a default, so `{}` is a valid configuration that renders the built-in scenes
//! at 1920x1080, 60 fps.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::encode::ffmpeg::EncoderOpts;
use crate::encode::pipeline::{Backpressure, DEFAULT_QUEUE_CAPACITY, PipelineOpts};
use crate::foundation::core::{Canvas, Fps, Rgba8};
use crate::foundation::error::{TickreelError, TickreelResult};
use crate::scene::SceneSequence;
use crate::scene::code::{CodeScene, CodeSceneOpts};
use crate::scene::instructions::{InstructionScene, InstructionSceneOpts};

/// Scenes that can be listed in [`RenderConfig::scenes`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneKind {
    Code,
    Instructions,
}

/// Serialized form of [`Backpressure`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum BackpressureConfig {
    Drop {
        #[serde(default = "default_drop_timeout_ms")]
        timeout_ms: u64,
    },
    Block,
}

fn default_drop_timeout_ms() -> u64 {
    100
}

impl Default for BackpressureConfig {
    fn default() -> Self {
        Self::Drop {
            timeout_ms: default_drop_timeout_ms(),
        }
    }
}

impl From<BackpressureConfig> for Backpressure {
    fn from(cfg: BackpressureConfig) -> Self {
        match cfg {
            BackpressureConfig::Drop { timeout_ms } => Self::Drop {
                timeout: Duration::from_millis(timeout_ms),
            },
            BackpressureConfig::Block => Self::Block,
        }
    }
}

/// x264 settings and process supervision for MP4 output.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    pub preset: String,
    pub crf: u8,
    pub finish_timeout_secs: u64,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            preset: "ultrafast".to_owned(),
            crf: 23,
            finish_timeout_secs: 60,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub fps: Fps,
    pub background: Rgba8,
    /// TTF/OTF used for all text. Without one, text is skipped when rasterizing.
    pub font_path: Option<PathBuf>,
    pub queue_capacity: usize,
    pub backpressure: BackpressureConfig,
    /// Hard stop for a render, in ticks. `None` renders until the last scene finishes.
    pub max_ticks: Option<u64>,
    pub encoder: EncoderConfig,
    pub scenes: Vec<SceneKind>,
    pub code_scene: CodeSceneOpts,
    pub instruction_scene: InstructionSceneOpts,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            fps: Fps { num: 60, den: 1 },
            background: Rgba8::opaque(0, 0, 0),
            font_path: None,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            backpressure: BackpressureConfig::default(),
            max_ticks: None,
            encoder: EncoderConfig::default(),
            scenes: vec![SceneKind::Code, SceneKind::Instructions],
            code_scene: CodeSceneOpts::default(),
            instruction_scene: InstructionSceneOpts::default(),
        }
    }
}

impl RenderConfig {
    /// Read and validate a JSON config file. A relative `font_path` resolves against the file's
    /// directory.
    pub fn from_path(path: &Path) -> TickreelResult<Self> {
        use anyhow::Context as _;

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let mut cfg = Self::from_json(&text)?;
        if let Some(font) = cfg.font_path.as_mut()
            && font.is_relative()
            && let Some(dir) = path.parent()
        {
            *font = dir.join(&*font);
        }
        Ok(cfg)
    }

    /// Parse and validate a JSON config.
    pub fn from_json(text: &str) -> TickreelResult<Self> {
        let cfg: Self = serde_json::from_str(text)
            .map_err(|e| TickreelError::serde(format!("parse config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> TickreelResult<()> {
        self.canvas().validate()?;
        Fps::new(self.fps.num, self.fps.den)?;
        if self.queue_capacity == 0 {
            return Err(TickreelError::validation("queue_capacity must be >= 1"));
        }
        if self.encoder.crf > 51 {
            return Err(TickreelError::validation(format!(
                "encoder crf must be in 0..=51, got {}",
                self.encoder.crf
            )));
        }
        if self.encoder.finish_timeout_secs == 0 {
            return Err(TickreelError::validation(
                "encoder finish_timeout_secs must be >= 1",
            ));
        }
        if self.scenes.is_empty() {
            return Err(TickreelError::validation("at least one scene is required"));
        }
        Ok(())
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    pub fn pipeline_opts(&self) -> PipelineOpts {
        PipelineOpts {
            canvas: self.canvas(),
            fps: self.fps,
            queue_capacity: self.queue_capacity,
            backpressure: self.backpressure.into(),
        }
    }

    pub fn encoder_opts(&self, out_path: impl Into<PathBuf>) -> EncoderOpts {
        EncoderOpts {
            preset: self.encoder.preset.clone(),
            crf: self.encoder.crf,
            finish_timeout: Duration::from_secs(self.encoder.finish_timeout_secs),
            ..EncoderOpts::new(out_path)
        }
    }

    /// Instantiate the configured scenes, in order.
    pub fn build_scenes(&self) -> TickreelResult<SceneSequence> {
        let mut seq = SceneSequence::new();
        for kind in &self.scenes {
            match kind {
                SceneKind::Code => seq.push(Box::new(CodeScene::new(self.code_scene.clone())?)),
                SceneKind::Instructions => seq.push(Box::new(InstructionScene::new(
                    self.instruction_scene.clone(),
                ))),
            }
        }
        Ok(seq)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
