//! One square of an instruction: a fill animation followed by a one-shot pulse.

use crate::foundation::core::{Point, Rect, Size, Tick};
use crate::foundation::error::TickreelResult;
use crate::object::palette::StepPalette;
use crate::object::{Animatable, Body};
use crate::render::surface::Surface;

/// Fill percentage added per tick while running, unless overridden.
pub const DEFAULT_EXECUTING_VELOCITY: u32 = 10;

/// Size change per tick while pulsing.
pub const PULSE_DELTA: f64 = 3.0;

/// Pulse targets as multiples of the base size, played in order.
pub const PULSE_SCALES: [f64; 4] = [1.5, 1.0, 1.3, 1.0];

/// Execution state of a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepState {
    NotStarted,
    Running,
    Done,
    Error,
}

/// Pulse in flight. `stage` indexes [`PULSE_SCALES`]; one past the end disarms on the next tick.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Pulse {
    stage: usize,
}

#[derive(Clone, Debug)]
pub struct ExecutionStep {
    body: Body,
    base_size: Size,
    state: StepState,
    fill_percent: u32,
    velocity: u32,
    pulse: Option<Pulse>,
    palette: StepPalette,
}

impl ExecutionStep {
    /// A square step of side `side` at `pos`.
    pub fn new(pos: Point, side: f64) -> Self {
        let size = Size::new(side, side);
        Self {
            body: Body::new(pos, size),
            base_size: size,
            state: StepState::NotStarted,
            fill_percent: 0,
            velocity: DEFAULT_EXECUTING_VELOCITY,
            pulse: None,
            palette: StepPalette::DEFAULT,
        }
    }

    /// Fill percentage per tick. Clamped to at least 1.
    pub fn with_velocity(mut self, velocity: u32) -> Self {
        self.velocity = velocity.max(1);
        self
    }

    pub fn set_palette(&mut self, palette: StepPalette) {
        self.palette = palette;
    }

    pub fn state(&self) -> StepState {
        self.state
    }

    /// Fill progress in `0..=100`.
    pub fn fill_percent(&self) -> u32 {
        self.fill_percent
    }

    pub fn velocity(&self) -> u32 {
        self.velocity
    }

    /// Current pulse stage, `None` when no pulse is playing.
    pub fn pulse_stage(&self) -> Option<usize> {
        self.pulse.map(|p| p.stage)
    }

    /// Size the step returns to after pulsing or a reset.
    pub fn base_size(&self) -> Size {
        self.base_size
    }

    pub fn is_executed(&self) -> bool {
        self.state == StepState::Done
    }

    /// NotStarted -> Running with an empty fill. No-op in any other state.
    pub fn start_execution(&mut self) {
        if self.state == StepState::NotStarted {
            self.state = StepState::Running;
            self.fill_percent = 0;
        }
    }

    /// Running or Done -> Error. No-op otherwise.
    pub fn execution_error(&mut self) {
        if matches!(self.state, StepState::Running | StepState::Done) {
            self.state = StepState::Error;
        }
    }

    /// Back to NotStarted with the base size restored.
    pub fn reset(&mut self) {
        self.state = StepState::NotStarted;
        self.fill_percent = 0;
        if self.pulse.take().is_some() || self.body.size != self.base_size {
            let center = self.body.center();
            self.body.size = self.base_size;
            self.body.pos = center - self.base_size.to_vec2() / 2.0;
        }
    }

    /// Put the step into a layout slot with top-left `origin` and side `side`.
    ///
    /// A pulsing step stays centered on the slot.
    pub fn place(&mut self, origin: Point, side: f64) {
        self.base_size = Size::new(side, side);
        if self.pulse.is_none() {
            self.body.size = self.base_size;
        }
        let grow = self.body.size - self.base_size;
        self.body.pos = origin - grow.to_vec2() / 2.0;
    }

    fn advance_pulse(&mut self) {
        let Some(mut pulse) = self.pulse else {
            return;
        };
        match PULSE_SCALES.get(pulse.stage) {
            Some(&scale) => {
                let target = self.base_size * scale;
                if self.resize_to(target, PULSE_DELTA, true) {
                    pulse.stage += 1;
                }
                self.pulse = Some(pulse);
            }
            None => self.pulse = None,
        }
    }
}

impl Animatable for ExecutionStep {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn update(&mut self, _tick: Tick) {
        match self.state {
            StepState::Running => {
                self.fill_percent = (self.fill_percent + self.velocity).min(100);
                if self.fill_percent >= 100 {
                    self.state = StepState::Done;
                    self.pulse = Some(Pulse { stage: 0 });
                }
            }
            StepState::Done => self.advance_pulse(),
            StepState::NotStarted | StepState::Error => {}
        }
    }

    fn draw(&self, surface: &mut dyn Surface) -> TickreelResult<()> {
        let rect = self.body.rect();
        let bw = self.palette.border_width;
        surface.fill_rounded_rect(
            rect.inflate(bw, bw),
            self.palette.border_radius,
            self.palette.border,
        );

        if self.state == StepState::Running {
            let executed = rect.width() * f64::from(self.fill_percent) / 100.0;
            let split = rect.x0 + executed;
            surface.fill_rect(
                Rect::new(split, rect.y0, rect.x1, rect.y1),
                self.palette.not_started,
            );
            surface.fill_rect(
                Rect::new(rect.x0, rect.y0, split, rect.y1),
                self.palette.done,
            );
        } else {
            surface.fill_rect(rect, self.palette.fill(self.state));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/object/step.rs"]
mod tests;
