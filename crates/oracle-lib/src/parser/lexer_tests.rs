use crate::parser::lexer::{lex, token_text, unescape};

/// Format tokens without trivia (default for most tests)
fn snapshot(input: &str) -> String {
    format_tokens(input, false)
}

/// Format tokens with trivia included
fn snapshot_raw(input: &str) -> String {
    format_tokens(input, true)
}

fn format_tokens(input: &str, include_trivia: bool) -> String {
    let tokens = lex(input);
    let mut out = String::new();
    for token in tokens {
        if include_trivia || !token.kind.is_trivia() {
            out.push_str(&format!(
                "{:?} {:?}\n",
                token.kind,
                token_text(input, &token)
            ));
        }
    }
    out
}

#[test]
fn punctuation() {
    insta::assert_snapshot!(snapshot("{ } < > [ ] , = ? ?? - @"), @r#"
    BraceOpen "{"
    BraceClose "}"
    AngleOpen "<"
    AngleClose ">"
    BracketOpen "["
    BracketClose "]"
    Comma ","
    Equals "="
    Question "?"
    QuestionQuestion "??"
    Minus "-"
    At "@"
    "#);
}

#[test]
fn keywords_are_identifiers() {
    insta::assert_snapshot!(snapshot("Range struct extends enum import map"), @r#"
    Id "Range"
    Id "struct"
    Id "extends"
    Id "enum"
    Id "import"
    Id "map"
    "#);
}

#[test]
fn qualified_identifier() {
    insta::assert_snapshot!(snapshot("label.Label[]"), @r#"
    Id "label.Label"
    BracketOpen "["
    BracketClose "]"
    "#);
}

#[test]
fn numbers() {
    insta::assert_snapshot!(snapshot("0 42 -7 3.14 -0.5"), @r#"
    Int "0"
    Int "42"
    Int "-7"
    Float "3.14"
    Float "-0.5"
    "#);
}

#[test]
fn omission_is_minus_then_identifier() {
    insta::assert_snapshot!(snapshot("-age"), @r#"
    Minus "-"
    Id "age"
    "#);
}

#[test]
fn string_literal_split() {
    insta::assert_snapshot!(snapshot(r#"import "schema/core/label""#), @r#"
    Id "import"
    DoubleQuote "\""
    StrVal "schema/core/label"
    DoubleQuote "\""
    "#);
}

#[test]
fn empty_string_has_no_content_token() {
    insta::assert_snapshot!(snapshot(r#""""#), @r#"
    DoubleQuote "\""
    DoubleQuote "\""
    "#);
}

#[test]
fn trivia() {
    insta::assert_snapshot!(snapshot_raw("a // note\n/* block */ b"), @r#"
    Id "a"
    Whitespace " "
    LineComment "// note"
    Newline "\n"
    BlockComment "/* block */"
    Whitespace " "
    Id "b"
    "#);
}

#[test]
fn garbage_is_coalesced() {
    insta::assert_snapshot!(snapshot("a $%^ b"), @r#"
    Id "a"
    Garbage "$%^"
    Id "b"
    "#);
}

#[test]
fn unescape_known_sequences() {
    assert_eq!(unescape(r#"say \"hi\"\n"#), "say \"hi\"\n");
    assert_eq!(unescape(r"back\\slash"), r"back\slash");
    assert_eq!(unescape(r"keep \d"), r"keep \d");
}
