use crate::foundation::core::{Point, Size, Tick};
use crate::foundation::error::TickreelResult;
use crate::object::palette::StepPalette;
use crate::object::step::{DEFAULT_EXECUTING_VELOCITY, ExecutionStep};
use crate::object::{Animatable, Body};
use crate::render::surface::Surface;

/// Number of steps in every instruction.
pub const STEP_COUNT: usize = 5;

/// Aggregate execution state of an [`Instruction`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InstructionState {
    NotStarted,
    Executing,
    Executed,
    Error,
}

/// A row of [`STEP_COUNT`] squares executed strictly left to right.
///
/// Steps are laid out edge to edge with side `floor(width / STEP_COUNT)`, and follow the
/// instruction whenever it is moved or resized through [`Animatable`].
#[derive(Clone, Debug)]
pub struct Instruction {
    body: Body,
    state: InstructionState,
    cursor: usize,
    steps: [ExecutionStep; STEP_COUNT],
}

impl Instruction {
    pub fn new(pos: Point, width: f64) -> Self {
        Self::with_velocity(pos, width, DEFAULT_EXECUTING_VELOCITY)
    }

    /// Like [`Instruction::new`] with a custom per-tick fill velocity for every step.
    pub fn with_velocity(pos: Point, width: f64, velocity: u32) -> Self {
        let side = step_side(width);
        let steps = std::array::from_fn(|i| {
            ExecutionStep::new(Point::new(pos.x + side * i as f64, pos.y), side)
                .with_velocity(velocity)
        });
        Self {
            body: Body::new(pos, Size::new(width, side)),
            state: InstructionState::NotStarted,
            cursor: 0,
            steps,
        }
    }

    pub fn with_palette(mut self, palette: StepPalette) -> Self {
        for step in &mut self.steps {
            step.set_palette(palette);
        }
        self
    }

    pub fn state(&self) -> InstructionState {
        self.state
    }

    pub fn steps(&self) -> &[ExecutionStep; STEP_COUNT] {
        &self.steps
    }

    /// Index of the step currently executing; [`STEP_COUNT`] once all are done.
    pub fn executing_step(&self) -> usize {
        self.cursor
    }

    /// Side length of each step.
    pub fn step_width(&self) -> f64 {
        step_side(self.body.size.width)
    }

    pub fn is_executed(&self) -> bool {
        self.state == InstructionState::Executed
    }

    /// NotStarted -> Executing from the first step. No-op otherwise.
    pub fn start_execution(&mut self) {
        if self.state == InstructionState::NotStarted {
            self.state = InstructionState::Executing;
            self.cursor = 0;
        }
    }

    /// Mark the instruction and every running or finished step as failed.
    pub fn execution_error(&mut self) {
        self.state = InstructionState::Error;
        for step in &mut self.steps {
            step.execution_error();
        }
    }

    pub fn reset(&mut self) {
        self.state = InstructionState::NotStarted;
        self.cursor = 0;
        for step in &mut self.steps {
            step.reset();
        }
    }

    /// Move the cursor past a finished step or start the current one. At most one step per call.
    fn advance(&mut self) {
        if self.state != InstructionState::Executing {
            return;
        }
        if self.steps[self.cursor].is_executed() {
            self.cursor += 1;
            if self.cursor >= STEP_COUNT {
                self.state = InstructionState::Executed;
                return;
            }
        }
        self.steps[self.cursor].start_execution();
    }
}

fn step_side(width: f64) -> f64 {
    (width / STEP_COUNT as f64).floor()
}

impl Animatable for Instruction {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn update(&mut self, tick: Tick) {
        self.advance();
        for step in &mut self.steps {
            step.update(tick);
        }
        // Hand over to the next step in the same tick the current one finishes.
        self.advance();
    }

    fn draw(&self, surface: &mut dyn Surface) -> TickreelResult<()> {
        for step in &self.steps {
            step.draw(surface)?;
        }
        Ok(())
    }

    fn relayout(&mut self) {
        let side = self.step_width();
        let origin = self.body.pos;
        for (i, step) in self.steps.iter_mut().enumerate() {
            step.place(Point::new(origin.x + side * i as f64, origin.y), side);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/object/instruction.rs"]
mod tests;
