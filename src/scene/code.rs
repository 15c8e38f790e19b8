use crate::foundation::core::{Point, Tick};
use crate::foundation::error::TickreelResult;
use crate::object::Animatable;
use crate::object::code::{CodeBlock, Identifiers, Tokenizer};
use crate::render::surface::Surface;
use crate::scene::Scene;

/// Listing shown when no code is configured.
pub const SAMPLE_CODE: &str = r#"#include <iostream>

using namespace std;

// Larger of two ints without a branch.
int max_branchless(int a, int b)
{
    int diff = a - b;
    int mask = diff >> 31;
    return a - (diff & mask);
}

int main()
{
    int values[] = {3, 9};
    std::cout << max_branchless(values[0], values[1]) << std::endl;
    return 0;
}"#;

/// Layout and timing of [`CodeScene`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CodeSceneOpts {
    pub code: String,
    pub pos: Point,
    pub width: f64,
    pub font_size: f32,
    pub highlight_line: Option<usize>,
    /// How many ticks the listing stays on screen.
    pub hold_ticks: u64,
    pub identifiers: Identifiers,
}

impl Default for CodeSceneOpts {
    fn default() -> Self {
        Self {
            code: SAMPLE_CODE.to_owned(),
            pos: Point::new(100.0, 50.0),
            width: 700.0,
            font_size: 20.0,
            highlight_line: Some(8),
            hold_ticks: 120,
            identifiers: Identifiers {
                custom_types: vec!["std".to_owned()],
                functions: vec!["main".to_owned(), "max_branchless".to_owned()],
                variables: ["a", "b", "diff", "mask", "values"]
                    .map(str::to_owned)
                    .to_vec(),
            },
        }
    }
}

/// Shows a highlighted code listing for a fixed number of ticks.
pub struct CodeScene {
    block: CodeBlock,
    hold_ticks: u64,
    elapsed: u64,
}

impl CodeScene {
    pub fn new(opts: CodeSceneOpts) -> TickreelResult<Self> {
        let mut block = CodeBlock::new(opts.pos, opts.width, &opts.code, opts.font_size)?
            .with_tokenizer(Tokenizer::cpp_with(&opts.identifiers)?);
        if let Some(line) = opts.highlight_line {
            block.highlight_line(line)?;
        }
        Ok(Self {
            block,
            hold_ticks: opts.hold_ticks,
            elapsed: 0,
        })
    }

    pub fn block(&self) -> &CodeBlock {
        &self.block
    }

    pub fn block_mut(&mut self) -> &mut CodeBlock {
        &mut self.block
    }
}

impl Scene for CodeScene {
    fn name(&self) -> &str {
        "code"
    }

    fn update(&mut self, tick: Tick) {
        self.block.update(tick);
        self.elapsed = self.elapsed.saturating_add(1);
    }

    fn draw(&self, surface: &mut dyn Surface) -> TickreelResult<()> {
        self.block.draw(surface)
    }

    fn is_finished(&self) -> bool {
        self.elapsed >= self.hold_ticks
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/code.rs"]
mod tests;
