use super::*;
use crate::render::surface::{DrawOp, RecordingSurface};

fn kinds<'a>(tokens: &[Token<'a>]) -> Vec<(&'a str, TokenKind)> {
    tokens.iter().map(|t| (t.text, t.kind)).collect()
}

fn tok() -> Tokenizer {
    Tokenizer::cpp().unwrap()
}

#[test]
fn tokens_cover_the_whole_line() {
    let t = tok();
    for line in [
        "    int num = 14123;",
        "std::cout << \"hola\" << std::endl;",
        "for(int i = 0; i < 100; i++);",
        "  uint16_t* a = (uint16_t*)&asd; // cast",
        "\tλ → ünïcode",
        "",
    ] {
        let joined: String = t.tokenize(line).iter().map(|t| t.text).collect();
        assert_eq!(joined, line);
    }
}

#[test]
fn classifies_include_line() {
    assert_eq!(
        kinds(&tok().tokenize("#include <iostream>")),
        vec![
            ("#include", TokenKind::Control),
            (" ", TokenKind::Plain),
            ("<iostream>", TokenKind::IncludePath),
        ]
    );
}

#[test]
fn classifies_declaration() {
    assert_eq!(
        kinds(&tok().tokenize("static const int main() {")),
        vec![
            ("static", TokenKind::Keyword),
            (" ", TokenKind::Plain),
            ("const", TokenKind::Keyword),
            (" ", TokenKind::Plain),
            ("int", TokenKind::BuiltinType),
            (" ", TokenKind::Plain),
            ("main", TokenKind::Function),
            ("(", TokenKind::Paren),
            (")", TokenKind::Paren),
            (" ", TokenKind::Plain),
            ("{", TokenKind::Brace),
        ]
    );
}

#[test]
fn earlier_matchers_win() {
    let t = tok();
    // Strings beat comments and numbers.
    assert_eq!(t.tokenize("\"// 12\"")[0].kind, TokenKind::String);
    // Control keywords beat the variable list.
    assert_eq!(t.tokenize("if")[0].kind, TokenKind::Control);
    assert_eq!(t.tokenize("i")[0].kind, TokenKind::Variable);
    assert_eq!(t.tokenize("public:")[0], Token {
        text: "public:",
        kind: TokenKind::Keyword,
    });
}

#[test]
fn words_do_not_match_inside_identifiers() {
    let t = tok();
    assert_eq!(kinds(&t.tokenize("constant")), vec![("constant", TokenKind::Plain)]);
    assert_eq!(kinds(&t.tokenize("index")), vec![("index", TokenKind::Plain)]);
    assert_eq!(kinds(&t.tokenize("printf")), vec![("printf", TokenKind::Plain)]);
}

#[test]
fn unmatched_characters_fall_back_one_at_a_time() {
    assert_eq!(
        kinds(&tok().tokenize("+=&")),
        vec![
            ("+", TokenKind::Plain),
            ("=", TokenKind::Plain),
            ("&", TokenKind::Plain),
        ]
    );
}

#[test]
fn comments_and_literals() {
    let t = tok();
    assert_eq!(
        kinds(&t.tokenize("3.14 // pi")),
        vec![
            ("3.14", TokenKind::Number),
            (" ", TokenKind::Plain),
            ("// pi", TokenKind::Comment),
        ]
    );
    assert_eq!(t.tokenize("/* a */ b")[0].text, "/* a */");
    assert_eq!(t.tokenize("arr[0]")[1], Token {
        text: "[",
        kind: TokenKind::Bracket,
    });
}

#[test]
fn custom_identifier_sets() {
    let idents = Identifiers {
        custom_types: vec!["Widget".to_owned()],
        functions: vec!["render".to_owned(), "a+b".to_owned()],
        variables: Vec::new(),
    };
    let t = Tokenizer::cpp_with(&idents).unwrap();
    assert_eq!(t.tokenize("Widget")[0].kind, TokenKind::CustomType);
    assert_eq!(t.tokenize("render")[0].kind, TokenKind::Function);
    assert_eq!(t.tokenize("a+b")[0].kind, TokenKind::Function);
    // Default variable `i` is gone.
    assert_eq!(t.tokenize("i")[0].kind, TokenKind::Plain);
}

fn block(code: &str) -> CodeBlock {
    CodeBlock::new(Point::new(100.0, 50.0), 700.0, code, 20.0).unwrap()
}

#[test]
fn lines_and_geometry() {
    let b = block("int a;\r\nint b;\n");
    assert_eq!(b.lines(), &["int a;", "int b;", ""]);
    assert_eq!(b.line_height(), 24.0);
    assert_eq!(b.line_origin(2), Point::new(100.0, 108.0));
    assert_eq!(b.body().size, Size::new(700.0, 87.0));
}

#[test]
fn highlight_is_range_checked() {
    let mut b = block("a\nb\nc");
    assert!(b.highlight_line(3).is_err());
    assert_eq!(b.highlighted_line(), None);
    b.highlight_line(2).unwrap();
    assert_eq!(b.highlighted_line(), Some(2));
    b.set_code("only one");
    assert_eq!(b.highlighted_line(), None);
    b.highlight_line(0).unwrap();
    b.clear_highlight();
    assert_eq!(b.highlighted_line(), None);
}

#[test]
fn rejects_bad_font_size() {
    assert!(CodeBlock::new(Point::ORIGIN, 10.0, "x", 0.0).is_err());
    assert!(CodeBlock::new(Point::ORIGIN, 10.0, "x", f32::NAN).is_err());
}

#[test]
fn draws_gutter_band_and_tokens() {
    let mut b = block("int x;\nreturn 0;");
    b.highlight_line(1).unwrap();
    let mut s = RecordingSurface::new();
    b.draw(&mut s).unwrap();

    let palette = SyntaxPalette::DEFAULT;
    let gutter = s.measure_text("000", 20.0).unwrap() + GUTTER_PADDING;

    let band = s.rects();
    assert_eq!(band.len(), 1);
    let expected_w = s.measure_text("return 0;", 20.0).unwrap();
    assert_eq!(
        band[0],
        (
            Rect::new(100.0, 79.0, 100.0 + expected_w, 103.0),
            palette.highlight_band
        )
    );

    let texts: Vec<_> = s
        .ops()
        .iter()
        .filter_map(|op| match op {
            DrawOp::Text { origin, runs, .. } => Some((*origin, runs.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(texts.len(), 4);
    assert_eq!(texts[0].0, Point::new(100.0 - gutter, 50.0));
    assert_eq!(texts[0].1, vec![("0".to_owned(), palette.line_number)]);
    assert_eq!(texts[1].1[0], ("int".to_owned(), palette.builtin_type));
    assert_eq!(
        texts[2].1,
        vec![("1".to_owned(), palette.line_number_highlighted)]
    );
    assert_eq!(texts[3].0, Point::new(100.0, 79.0));
    assert_eq!(texts[3].1[0], ("return".to_owned(), palette.control));
}
