//! Syntax-highlighted code listing with a line-number gutter.

use regex::Regex;

use crate::foundation::core::{Point, Rect, Size, Tick};
use crate::foundation::error::{TickreelError, TickreelResult};
use crate::object::palette::SyntaxPalette;
use crate::object::{Animatable, Body};
use crate::render::surface::{Surface, TextRun};

/// Extra vertical space added to the font size to get the line height.
pub const LINE_SPACING: f64 = 4.0;
/// Gap between consecutive lines.
pub const LINE_MARGIN: f64 = 5.0;
/// Space between the widest line number and the code.
pub const GUTTER_PADDING: f64 = 10.0;

/// Classification of a token, used to pick its color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword,
    String,
    Number,
    Comment,
    IncludePath,
    Control,
    Brace,
    Bracket,
    Paren,
    BuiltinType,
    CustomType,
    Function,
    Variable,
    Plain,
}

/// A slice of a source line and its classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub kind: TokenKind,
}

/// Project-specific names highlighted beyond the language's built-ins.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Identifiers {
    pub custom_types: Vec<String>,
    pub functions: Vec<String>,
    pub variables: Vec<String>,
}

impl Default for Identifiers {
    fn default() -> Self {
        Self {
            custom_types: vec!["std".to_owned(), "uint16_t".to_owned()],
            functions: vec!["main".to_owned()],
            variables: vec!["i".to_owned()],
        }
    }
}

#[derive(Clone, Debug)]
struct Matcher {
    kind: TokenKind,
    pattern: Regex,
}

const CPP_RULES: &[(TokenKind, &str)] = &[
    (
        TokenKind::Keyword,
        r"(?:public|private|protected):|(?:class|struct|typedef|enum|namespace|constexpr|const|static|virtual|override|true|false)\b",
    ),
    (TokenKind::String, r#""[^"]*"|'[^']*'"#),
    (TokenKind::Number, r"\d+(?:\.\d+)?\b"),
    (TokenKind::Comment, r"//.*|/\*.*?\*/"),
    (TokenKind::IncludePath, r"<[\w./+-]+>"),
    (
        TokenKind::Control,
        r"#include\b|(?:using|new|delete|while|for|if|else|switch|case|break|continue|return|default|goto)\b",
    ),
    (TokenKind::Brace, r"[{}]"),
    (TokenKind::Bracket, r"[\[\]]"),
    (TokenKind::Paren, r"[()]"),
    (
        TokenKind::BuiltinType,
        r"(?:int|float|double|char|void|bool|short|long|unsigned|signed|size_t|auto)\b",
    ),
];

/// Splits a line into colored tokens.
///
/// Whitespace runs are kept as plain tokens. Otherwise matchers are tried in order and the first
/// match wins; identifiers nobody claims are plain, and any other character becomes a
/// one-character plain token. Every line therefore tokenizes completely.
#[derive(Clone, Debug)]
pub struct Tokenizer {
    matchers: Vec<Matcher>,
}

impl Tokenizer {
    /// C/C++ rules with the default [`Identifiers`].
    pub fn cpp() -> TickreelResult<Self> {
        Self::cpp_with(&Identifiers::default())
    }

    pub fn cpp_with(identifiers: &Identifiers) -> TickreelResult<Self> {
        let mut matchers = CPP_RULES
            .iter()
            .map(|&(kind, pattern)| compile(kind, pattern))
            .collect::<TickreelResult<Vec<_>>>()?;

        for (kind, names) in [
            (TokenKind::CustomType, &identifiers.custom_types),
            (TokenKind::Function, &identifiers.functions),
            (TokenKind::Variable, &identifiers.variables),
        ] {
            if let Some(pattern) = word_list(names) {
                matchers.push(compile(kind, &pattern)?);
            }
        }
        matchers.push(compile(TokenKind::Plain, r"[A-Za-z_]\w*")?);
        Ok(Self { matchers })
    }

    pub fn tokenize<'a>(&self, line: &'a str) -> Vec<Token<'a>> {
        let mut tokens = Vec::new();
        let mut rest = line;
        while let Some(first) = rest.chars().next() {
            let len = if first.is_whitespace() {
                let end = rest
                    .find(|c: char| !c.is_whitespace())
                    .unwrap_or(rest.len());
                tokens.push(Token {
                    text: &rest[..end],
                    kind: TokenKind::Plain,
                });
                end
            } else {
                match self.match_at_start(rest) {
                    Some(token) => {
                        tokens.push(token);
                        token.text.len()
                    }
                    None => {
                        let end = first.len_utf8();
                        tokens.push(Token {
                            text: &rest[..end],
                            kind: TokenKind::Plain,
                        });
                        end
                    }
                }
            };
            rest = &rest[len..];
        }
        tokens
    }

    fn match_at_start<'a>(&self, text: &'a str) -> Option<Token<'a>> {
        self.matchers.iter().find_map(|m| {
            m.pattern
                .find(text)
                .filter(|found| !found.is_empty())
                .map(|found| Token {
                    text: found.as_str(),
                    kind: m.kind,
                })
        })
    }
}

fn compile(kind: TokenKind, pattern: &str) -> TickreelResult<Matcher> {
    let anchored = format!("^(?:{pattern})");
    let pattern = Regex::new(&anchored).map_err(|e| {
        TickreelError::validation(format!("invalid {kind:?} token pattern '{pattern}': {e}"))
    })?;
    Ok(Matcher { kind, pattern })
}

fn word_list(names: &[String]) -> Option<String> {
    let alternatives = names
        .iter()
        .filter(|n| !n.is_empty())
        .map(|n| regex::escape(n))
        .collect::<Vec<_>>();
    if alternatives.is_empty() {
        return None;
    }
    Some(format!(r"(?:{})\b", alternatives.join("|")))
}

/// A multi-line code listing. The body position is the top-left of the first code line; line
/// numbers hang to its left.
#[derive(Clone, Debug)]
pub struct CodeBlock {
    body: Body,
    lines: Vec<String>,
    highlighted: Option<usize>,
    font_size: f32,
    tokenizer: Tokenizer,
    palette: SyntaxPalette,
}

impl CodeBlock {
    pub fn new(pos: Point, width: f64, code: &str, font_size: f32) -> TickreelResult<Self> {
        if !(font_size.is_finite() && font_size > 0.0) {
            return Err(TickreelError::validation(format!(
                "code font size must be positive, got {font_size}"
            )));
        }
        let mut block = Self {
            body: Body::new(pos, Size::new(width, 0.0)),
            lines: Vec::new(),
            highlighted: None,
            font_size,
            tokenizer: Tokenizer::cpp()?,
            palette: SyntaxPalette::DEFAULT,
        };
        block.set_code(code);
        Ok(block)
    }

    pub fn with_tokenizer(mut self, tokenizer: Tokenizer) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn with_palette(mut self, palette: SyntaxPalette) -> Self {
        self.palette = palette;
        self
    }

    /// Replace the listing. A highlight past the new last line is cleared.
    pub fn set_code(&mut self, code: &str) {
        self.lines = code
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l).to_owned())
            .collect();
        if self.highlighted.is_some_and(|h| h >= self.lines.len()) {
            self.highlighted = None;
        }
        self.body.size.height = self.line_pitch() * self.lines.len() as f64;
    }

    /// Highlight the line at 0-based `index`.
    pub fn highlight_line(&mut self, index: usize) -> TickreelResult<()> {
        if index >= self.lines.len() {
            return Err(TickreelError::validation(format!(
                "line {index} is out of range for a listing of {} lines",
                self.lines.len()
            )));
        }
        self.highlighted = Some(index);
        Ok(())
    }

    pub fn clear_highlight(&mut self) {
        self.highlighted = None;
    }

    pub fn highlighted_line(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn line_height(&self) -> f64 {
        f64::from(self.font_size) + LINE_SPACING
    }

    fn line_pitch(&self) -> f64 {
        self.line_height() + LINE_MARGIN
    }

    /// Top-left corner of line `index`.
    pub fn line_origin(&self, index: usize) -> Point {
        Point::new(
            self.body.pos.x,
            self.body.pos.y + self.line_pitch() * index as f64,
        )
    }
}

impl Animatable for CodeBlock {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn update(&mut self, _tick: Tick) {}

    fn draw(&self, surface: &mut dyn Surface) -> TickreelResult<()> {
        let size = self.font_size;
        let gutter = surface.measure_text("000", size)? + GUTTER_PADDING;

        for (index, line) in self.lines.iter().enumerate() {
            let origin = self.line_origin(index);
            let highlighted = self.highlighted == Some(index);

            if highlighted {
                let sample = if line.is_empty() { " " } else { line.as_str() };
                let width = surface.measure_text(sample, size)?;
                surface.fill_rect(
                    Rect::from_origin_size(origin, (width, self.line_height())),
                    self.palette.highlight_band,
                );
            }

            let number = index.to_string();
            let number_color = if highlighted {
                self.palette.line_number_highlighted
            } else {
                self.palette.line_number
            };
            surface.draw_text(
                Point::new(origin.x - gutter, origin.y),
                &[TextRun {
                    text: &number,
                    color: number_color,
                }],
                size,
            )?;

            let runs = self
                .tokenizer
                .tokenize(line)
                .into_iter()
                .map(|t| TextRun {
                    text: t.text,
                    color: self.palette.token(t.kind),
                })
                .collect::<Vec<_>>();
            if !runs.is_empty() {
                surface.draw_text(origin, &runs, size)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/object/code.rs"]
mod tests;
