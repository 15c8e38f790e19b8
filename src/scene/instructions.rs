//! The instruction-pipeline demo: five instructions fly in, execute one after another, reset,
//! rearrange into a staircase and execute again overlapped.

use crate::foundation::core::{Point, Tick};
use crate::foundation::error::TickreelResult;
use crate::object::Animatable;
use crate::object::instruction::Instruction;
use crate::render::surface::Surface;
use crate::scene::Scene;
use crate::scene::phase::{Phase, PhaseRunner};

/// Layout and pacing of [`InstructionScene`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct InstructionSceneOpts {
    pub count: usize,
    pub width: f64,
    /// Fill percentage per tick of every step.
    pub velocity: u32,
    /// Where the first instruction starts, off screen.
    pub start: Point,
    /// Vertical distance between starting positions.
    pub start_spacing: f64,
    /// Minimum per-tick step of the fly-in moves.
    pub move_min_step: f64,
    /// Left end of the line and top of the staircase.
    pub line_origin: Point,
    /// Horizontal distance between instructions on the line.
    pub line_spacing: f64,
}

impl Default for InstructionSceneOpts {
    fn default() -> Self {
        Self {
            count: 5,
            width: 200.0,
            velocity: 20,
            start: Point::new(2000.0, 200.0),
            start_spacing: 100.0,
            move_min_step: 30.0,
            line_origin: Point::new(200.0, 200.0),
            line_spacing: 250.0,
        }
    }
}

/// Move instructions one at a time, each starting only after the previous one arrived.
pub struct SequentialMove {
    targets: Vec<Point>,
    min_step: f64,
    moved: usize,
}

impl SequentialMove {
    pub fn new(targets: Vec<Point>, min_step: f64) -> Self {
        Self {
            targets,
            min_step,
            moved: 0,
        }
    }
}

impl Phase<Vec<Instruction>> for SequentialMove {
    fn step(&mut self, instructions: &mut Vec<Instruction>) -> bool {
        let n = self.targets.len().min(instructions.len());
        if self.moved < n && instructions[self.moved].move_to(self.targets[self.moved], self.min_step)
        {
            self.moved += 1;
        }
        self.moved >= n
    }
}

/// Execute instructions strictly one after another.
#[derive(Default)]
pub struct SequentialExecute {
    executed: usize,
}

impl Phase<Vec<Instruction>> for SequentialExecute {
    fn step(&mut self, instructions: &mut Vec<Instruction>) -> bool {
        if let Some(current) = instructions.get_mut(self.executed) {
            if current.is_executed() {
                self.executed += 1;
            } else {
                current.start_execution();
            }
        }
        self.executed >= instructions.len()
    }
}

/// Reset every instruction to NotStarted. Completes immediately.
pub struct ResetAll;

impl Phase<Vec<Instruction>> for ResetAll {
    fn step(&mut self, instructions: &mut Vec<Instruction>) -> bool {
        for instruction in instructions.iter_mut() {
            instruction.reset();
        }
        true
    }
}

/// Pipelined execution: the next instruction launches once the previous one has finished its
/// first step.
#[derive(Default)]
pub struct StaggeredExecute {
    launched: usize,
}

impl Phase<Vec<Instruction>> for StaggeredExecute {
    fn step(&mut self, instructions: &mut Vec<Instruction>) -> bool {
        if let Some(current) = instructions.get_mut(self.launched) {
            if current.executing_step() >= 1 {
                self.launched += 1;
            } else {
                current.start_execution();
            }
        }
        instructions.iter().all(Instruction::is_executed)
    }
}

fn line_targets(opts: &InstructionSceneOpts, count: usize) -> Vec<Point> {
    (0..count)
        .map(|i| {
            Point::new(
                opts.line_origin.x + opts.line_spacing * i as f64,
                opts.line_origin.y,
            )
        })
        .collect()
}

fn staircase_targets(origin: Point, step_width: f64, count: usize) -> Vec<Point> {
    (0..count)
        .map(|i| {
            let i = i as f64;
            Point::new(origin.x + step_width * i, origin.y + (step_width + 10.0) * i)
        })
        .collect()
}

pub struct InstructionScene {
    instructions: Vec<Instruction>,
    runner: PhaseRunner<Vec<Instruction>>,
}

impl InstructionScene {
    pub fn new(opts: InstructionSceneOpts) -> Self {
        let instructions = (0..opts.count)
            .map(|i| {
                let pos = Point::new(opts.start.x, opts.start.y + opts.start_spacing * i as f64);
                Instruction::with_velocity(pos, opts.width, opts.velocity)
            })
            .collect();

        let line = opts.clone();
        let min_step = opts.move_min_step;
        let origin = opts.line_origin;
        let runner = PhaseRunner::new()
            .then("move-to-line", move |ins: &Vec<Instruction>| {
                Box::new(SequentialMove::new(line_targets(&line, ins.len()), min_step))
                    as Box<dyn Phase<Vec<Instruction>>>
            })
            .then("execute-sequential", |_: &Vec<Instruction>| {
                Box::new(SequentialExecute::default()) as Box<dyn Phase<Vec<Instruction>>>
            })
            .then("reset", |_: &Vec<Instruction>| {
                Box::new(ResetAll) as Box<dyn Phase<Vec<Instruction>>>
            })
            .then("move-to-staircase", move |ins: &Vec<Instruction>| {
                let step_width = ins.first().map_or(0.0, Instruction::step_width);
                Box::new(SequentialMove::new(
                    staircase_targets(origin, step_width, ins.len()),
                    min_step,
                )) as Box<dyn Phase<Vec<Instruction>>>
            })
            .then("execute-staggered", |_: &Vec<Instruction>| {
                Box::new(StaggeredExecute::default()) as Box<dyn Phase<Vec<Instruction>>>
            });

        Self {
            instructions,
            runner,
        }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Name of the running phase, `None` once the script is over.
    pub fn current_phase(&self) -> Option<&'static str> {
        self.runner.current_phase()
    }
}

impl Default for InstructionScene {
    fn default() -> Self {
        Self::new(InstructionSceneOpts::default())
    }
}

impl Scene for InstructionScene {
    fn name(&self) -> &str {
        "instructions"
    }

    fn update(&mut self, tick: Tick) {
        self.runner.update(&mut self.instructions);
        for instruction in &mut self.instructions {
            instruction.update(tick);
        }
    }

    fn draw(&self, surface: &mut dyn Surface) -> TickreelResult<()> {
        for instruction in &self.instructions {
            instruction.draw(surface)?;
        }
        Ok(())
    }

    fn is_finished(&self) -> bool {
        self.runner.is_finished()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/instructions.rs"]
mod tests;
