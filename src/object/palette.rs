use crate::foundation::core::Rgba8;
use crate::object::code::TokenKind;
use crate::object::step::StepState;

/// Colors and border geometry of an execution step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepPalette {
    pub not_started: Rgba8,
    pub done: Rgba8,
    pub error: Rgba8,
    pub border: Rgba8,
    pub border_width: f64,
    pub border_radius: f64,
}

impl StepPalette {
    pub const DEFAULT: Self = Self {
        not_started: Rgba8::opaque(128, 128, 128),
        done: Rgba8::opaque(50, 205, 50),
        error: Rgba8::opaque(220, 20, 60),
        border: Rgba8::opaque(0, 0, 139),
        border_width: 5.0,
        border_radius: 3.0,
    };

    /// Flat fill for `state`. A running step is drawn split between `done` and `not_started`.
    pub fn fill(&self, state: StepState) -> Rgba8 {
        match state {
            StepState::NotStarted | StepState::Running => self.not_started,
            StepState::Done => self.done,
            StepState::Error => self.error,
        }
    }
}

impl Default for StepPalette {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Colors of a code listing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SyntaxPalette {
    pub keyword: Rgba8,
    pub string: Rgba8,
    pub number: Rgba8,
    pub comment: Rgba8,
    pub include_path: Rgba8,
    pub control: Rgba8,
    pub delimiter: Rgba8,
    pub builtin_type: Rgba8,
    pub custom_type: Rgba8,
    pub function: Rgba8,
    pub variable: Rgba8,
    pub plain: Rgba8,
    pub line_number: Rgba8,
    pub line_number_highlighted: Rgba8,
    pub highlight_band: Rgba8,
}

impl SyntaxPalette {
    pub const DEFAULT: Self = Self {
        keyword: Rgba8::opaque(86, 156, 214),
        string: Rgba8::opaque(206, 145, 120),
        number: Rgba8::opaque(181, 206, 168),
        comment: Rgba8::opaque(106, 153, 85),
        include_path: Rgba8::opaque(206, 145, 120),
        control: Rgba8::opaque(197, 134, 192),
        delimiter: Rgba8::opaque(255, 215, 0),
        builtin_type: Rgba8::opaque(86, 156, 214),
        custom_type: Rgba8::opaque(78, 201, 176),
        function: Rgba8::opaque(220, 220, 170),
        variable: Rgba8::opaque(156, 220, 254),
        plain: Rgba8::opaque(255, 255, 255),
        line_number: Rgba8::opaque(150, 150, 150),
        line_number_highlighted: Rgba8::opaque(255, 255, 255),
        highlight_band: Rgba8::opaque(0, 100, 255).with_alpha(100),
    };

    pub fn token(&self, kind: TokenKind) -> Rgba8 {
        match kind {
            TokenKind::Keyword => self.keyword,
            TokenKind::String => self.string,
            TokenKind::Number => self.number,
            TokenKind::Comment => self.comment,
            TokenKind::IncludePath => self.include_path,
            TokenKind::Control => self.control,
            TokenKind::Brace | TokenKind::Bracket | TokenKind::Paren => self.delimiter,
            TokenKind::BuiltinType => self.builtin_type,
            TokenKind::CustomType => self.custom_type,
            TokenKind::Function => self.function,
            TokenKind::Variable => self.variable,
            TokenKind::Plain => self.plain,
        }
    }
}

impl Default for SyntaxPalette {
    fn default() -> Self {
        Self::DEFAULT
    }
}
