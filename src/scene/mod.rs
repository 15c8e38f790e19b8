//! Scenes: scripted owners of animated objects.

pub mod code;
pub mod instructions;
pub mod phase;

use crate::foundation::core::Tick;
use crate::foundation::error::TickreelResult;
use crate::render::surface::Surface;

/// A self-contained piece of the animation.
pub trait Scene {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Advance the scene script and every owned object by one tick.
    fn update(&mut self, tick: Tick);

    fn draw(&self, surface: &mut dyn Surface) -> TickreelResult<()>;

    fn is_finished(&self) -> bool;
}

/// Plays scenes back to back. Only the current scene is updated and drawn.
#[derive(Default)]
pub struct SceneSequence {
    scenes: Vec<Box<dyn Scene>>,
    current: usize,
}

impl SceneSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a scene.
    pub fn then(mut self, scene: impl Scene + 'static) -> Self {
        self.scenes.push(Box::new(scene));
        self
    }

    pub fn push(&mut self, scene: Box<dyn Scene>) {
        self.scenes.push(scene);
    }

    /// Scene that is currently playing.
    pub fn current(&self) -> Option<&dyn Scene> {
        self.scenes.get(self.current).map(|s| s.as_ref())
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn update(&mut self, tick: Tick) {
        let Some(scene) = self.scenes.get_mut(self.current) else {
            return;
        };
        scene.update(tick);
        if scene.is_finished() {
            tracing::debug!(scene = scene.name(), tick = tick.0, "scene finished");
            self.current += 1;
        }
    }

    pub fn draw(&self, surface: &mut dyn Surface) -> TickreelResult<()> {
        match self.current() {
            Some(scene) => scene.draw(surface),
            None => Ok(()),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.current >= self.scenes.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/mod.rs"]
mod tests;
