//! Animated scene objects.
//!
//! Every object owns a [`Body`] and implements [`Animatable`]. The provided movement helpers
//! mutate the body and then call [`Animatable::relayout`], so composites can keep their children
//! attached before the next draw.

pub mod code;
pub mod instruction;
pub mod palette;
pub mod step;

use crate::animation::step::{GlideProgress, resize_toward, step_toward_eased, step_toward_linear};
use crate::foundation::core::{Point, Rect, Size, Tick, Vec2};
use crate::foundation::error::TickreelResult;
use crate::render::surface::Surface;

/// Position (top-left corner) and size of an object, plus its in-flight eased move.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    /// Top-left corner.
    pub pos: Point,
    /// Width and height.
    pub size: Size,
    glide: Option<GlideProgress>,
}

impl Body {
    /// Create a body at `pos` with `size`.
    pub fn new(pos: Point, size: Size) -> Self {
        Self {
            pos,
            size,
            glide: None,
        }
    }

    /// Axis-aligned bounds.
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.pos, self.size)
    }

    /// Center of the bounds.
    pub fn center(&self) -> Point {
        self.rect().center()
    }

    /// Start point and target of the eased move in progress, if any.
    pub fn glide(&self) -> Option<GlideProgress> {
        self.glide
    }
}

/// Something that advances once per tick and can draw itself.
pub trait Animatable {
    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;

    /// Advance internal state by one tick.
    fn update(&mut self, tick: Tick);

    /// Draw the current state.
    fn draw(&self, surface: &mut dyn Surface) -> TickreelResult<()>;

    /// Re-derive child geometry from the body. Called after every provided mutator.
    fn relayout(&mut self) {}

    fn move_by(&mut self, delta: Vec2) {
        self.body_mut().pos += delta;
        self.relayout();
    }

    fn set_position(&mut self, pos: Point) {
        self.body_mut().pos = pos;
        self.relayout();
    }

    fn set_size(&mut self, size: Size) {
        self.body_mut().size = size;
        self.relayout();
    }

    /// One decelerating linear step toward `target`. Returns `true` once there.
    fn move_to(&mut self, target: Point, min_step: f64) -> bool {
        let done = step_toward_linear(&mut self.body_mut().pos, target, min_step);
        self.relayout();
        done
    }

    /// One eased step toward `target`. Returns `true` once there.
    fn glide_to(&mut self, target: Point, speed: f64) -> bool {
        let body = self.body_mut();
        let done = step_toward_eased(&mut body.pos, target, speed, &mut body.glide);
        self.relayout();
        done
    }

    /// One resize step toward `target`. Returns `true` once there.
    fn resize_to(&mut self, target: Size, delta: f64, centered: bool) -> bool {
        let body = self.body_mut();
        let done = resize_toward(&mut body.pos, &mut body.size, target, delta, centered);
        self.relayout();
        done
    }
}

#[cfg(test)]
#[path = "../../tests/unit/object/mod.rs"]
mod tests;
