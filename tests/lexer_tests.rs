// tests/lexer_tests.rs

use plate_lang::ast::{Token, TokenKind};
use plate_lang::lexer::{LexError, Lexer, ScanMode};

fn tokens(input: &str, mode: ScanMode) -> Vec<Token> {
    let mut lexer = Lexer::with_mode(input, mode);
    let mut out = Vec::new();
    while lexer.advance().unwrap() {
        out.push(lexer.token().clone());
    }
    out
}

fn code(input: &str) -> Vec<(TokenKind, String)> {
    tokens(input, ScanMode::Code)
        .into_iter()
        .map(|t| (t.kind, t.text))
        .collect()
}

fn op(text: &str) -> (TokenKind, String) {
    (TokenKind::Operator, text.to_string())
}

// ============================================================================
// Text mode
// ============================================================================

#[test]
fn test_output_region_token_sequence() {
    let got = tokens("A{{ x }}B", ScanMode::Text);
    assert_eq!(
        got,
        vec![
            Token::new(TokenKind::Text, "A"),
            Token::new(TokenKind::Escape, "{{"),
            Token::new(TokenKind::Identifier, "x"),
            Token::new(TokenKind::Escape, "}}"),
            Token::new(TokenKind::Text, "B"),
        ]
    );
}

#[test]
fn test_end_of_input_leaves_none_token() {
    let mut lexer = Lexer::new("abc");
    assert!(lexer.advance().unwrap());
    assert!(!lexer.advance().unwrap());
    assert_eq!(lexer.kind(), TokenKind::None);
    assert!(!lexer.advance().unwrap());
}

#[test]
fn test_empty_input() {
    assert!(tokens("", ScanMode::Text).is_empty());
    assert!(tokens("", ScanMode::Code).is_empty());
}

#[test]
fn test_delimiter_at_start_has_no_text_token() {
    let got = tokens("{? a ?}", ScanMode::Text);
    assert_eq!(got[0], Token::new(TokenKind::Escape, "{?"));
    assert_eq!(got[2], Token::new(TokenKind::Escape, "?}"));
    assert_eq!(got.len(), 3);
}

#[test]
fn test_lone_braces_and_angles_are_text() {
    let got = tokens("a { b < c {", ScanMode::Text);
    assert_eq!(got, vec![Token::new(TokenKind::Text, "a { b < c {")]);
}

#[test]
fn test_template_comment_removed_from_text() {
    let got = tokens("a{* hidden {{ x }} *}b", ScanMode::Text);
    assert_eq!(got, vec![Token::new(TokenKind::Text, "ab")]);
}

#[test]
fn test_unclosed_template_comment_runs_to_end() {
    let got = tokens("a{* never closed", ScanMode::Text);
    assert_eq!(got, vec![Token::new(TokenKind::Text, "a")]);
}

#[test]
fn test_comment_only_text_goes_straight_to_code() {
    let got = tokens("{* c *}{{ x }}", ScanMode::Text);
    assert_eq!(got[0], Token::new(TokenKind::Escape, "{{"));
}

#[test]
fn test_block_delimiters() {
    let got = tokens("<<#if(x)>>y<</>>", ScanMode::Text);
    let texts: Vec<&str> = got.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["<<", "#", "if", "(", "x", ")", ">>", "y", "<<", "/>>"]);
    assert_eq!(got[6].kind, TokenKind::Escape);
    assert_eq!(got[7].kind, TokenKind::Text);
    assert_eq!(got[9].kind, TokenKind::Escape);
}

#[test]
fn test_self_closing_block_returns_to_text() {
    let got = tokens("<<#x/>>tail", ScanMode::Text);
    assert_eq!(got.last(), Some(&Token::new(TokenKind::Text, "tail")));
}

// ============================================================================
// Code mode
// ============================================================================

#[test]
fn test_identifiers_and_numbers() {
    assert_eq!(
        code("foo _bar9 42 3.14"),
        vec![
            (TokenKind::Identifier, "foo".to_string()),
            (TokenKind::Identifier, "_bar9".to_string()),
            (TokenKind::Number, "42".to_string()),
            (TokenKind::Number, "3.14".to_string()),
        ]
    );
}

#[test]
fn test_multi_char_operators() {
    assert_eq!(
        code("== === != !== >= <= += ?? =>"),
        vec![
            op("=="),
            op("==="),
            op("!="),
            op("!=="),
            op(">="),
            op("<="),
            op("+="),
            op("??"),
            op("=>"),
        ]
    );
}

#[test]
fn test_terminal_operators_stand_alone() {
    assert_eq!(
        code("a.b[c](d),$e"),
        vec![
            (TokenKind::Identifier, "a".to_string()),
            op("."),
            (TokenKind::Identifier, "b".to_string()),
            op("["),
            (TokenKind::Identifier, "c".to_string()),
            op("]"),
            op("("),
            (TokenKind::Identifier, "d".to_string()),
            op(")"),
            op(","),
            op("$"),
            (TokenKind::Identifier, "e".to_string()),
        ]
    );
}

#[test]
fn test_closing_brackets_do_not_merge() {
    assert_eq!(code("]]"), vec![op("]"), op("]")]);
}

#[test]
fn test_word_operators_are_operators() {
    let got = code("a and not b or c xor d");
    assert_eq!(got[1], op("and"));
    assert_eq!(got[2], op("not"));
    assert_eq!(got[4], op("or"));
    assert_eq!(got[6], op("xor"));
}

#[test]
fn test_semicolon_is_delimiter_and_stays_in_code() {
    assert_eq!(
        code("a; b"),
        vec![
            (TokenKind::Identifier, "a".to_string()),
            (TokenKind::Escape, ";".to_string()),
            (TokenKind::Identifier, "b".to_string()),
        ]
    );
}

#[test]
fn test_code_comments_skipped() {
    assert_eq!(
        code("a // line\n/* block */ b"),
        vec![
            (TokenKind::Identifier, "a".to_string()),
            (TokenKind::Identifier, "b".to_string()),
        ]
    );
}

#[test]
fn test_division_is_not_a_comment() {
    assert_eq!(code("a / b")[1], op("/"));
}

#[test]
fn test_unknown_character() {
    assert_eq!(code("`"), vec![(TokenKind::Unknown, "`".to_string())]);
}

// ============================================================================
// Strings
// ============================================================================

#[test]
fn test_string_escapes() {
    let got = code(r#""a\n\t\"b\\" 'it\'s'"#);
    assert_eq!(got[0], (TokenKind::String, "a\n\t\"b\\".to_string()));
    assert_eq!(got[1], (TokenKind::String, "it's".to_string()));
}

#[test]
fn test_unknown_escape_keeps_backslash() {
    assert_eq!(code(r#""\q""#), vec![(TokenKind::String, "\\q".to_string())]);
}

#[test]
fn test_unterminated_string() {
    let mut lexer = Lexer::with_mode("\n'abc", ScanMode::Code);
    assert_eq!(
        lexer.advance(),
        Err(LexError::UnterminatedLiteral { line: 2, quote: '\'' })
    );
}

// ============================================================================
// Lines
// ============================================================================

#[test]
fn test_line_counting_across_modes() {
    let mut lexer = Lexer::new("one\ntwo\n{{\nx }}");
    lexer.advance().unwrap(); // text
    assert_eq!(lexer.line(), 3);
    lexer.advance().unwrap(); // {{
    lexer.advance().unwrap(); // x
    assert_eq!(lexer.line(), 4);
}

#[test]
fn test_line_comment_counts_newline_once() {
    let mut lexer = Lexer::with_mode("// c\nx", ScanMode::Code);
    lexer.advance().unwrap();
    assert_eq!(lexer.text(), "x");
    assert_eq!(lexer.line(), 2);
}

#[test]
fn test_windows_line_endings() {
    let mut lexer = Lexer::with_mode("a\r\n\r\nb", ScanMode::Code);
    lexer.advance().unwrap();
    lexer.advance().unwrap();
    assert_eq!(lexer.text(), "b");
    assert_eq!(lexer.line(), 3);
}

#[test]
fn test_mode_switches() {
    let mut lexer = Lexer::new("{{ x }}");
    assert_eq!(lexer.mode(), ScanMode::Text);
    lexer.advance().unwrap();
    assert_eq!(lexer.mode(), ScanMode::Code);
    lexer.advance().unwrap();
    lexer.advance().unwrap();
    assert_eq!(lexer.mode(), ScanMode::Text);
}
