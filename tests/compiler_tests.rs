// tests/compiler_tests.rs

use plate_lang::ast::{Item, Literal, Node};
use plate_lang::output::to_sexpr;
use plate_lang::{compile_str, ParseError};
use pretty_assertions::assert_eq;

fn items(source: &str) -> Vec<Item> {
    compile_str(source).unwrap().items
}

fn text(s: &str) -> Item {
    Item::Text(s.to_string())
}

#[test]
fn test_plain_text() {
    assert_eq!(items("just text\n"), vec![text("just text\n")]);
    assert!(compile_str("").unwrap().is_empty());
}

#[test]
fn test_output_between_text() {
    assert_eq!(
        items("Hello {{ name }}!"),
        vec![text("Hello "), Item::Output(Node::local("name")), text("!")]
    );
}

#[test]
fn test_adjacent_outputs() {
    let got = items("{{a}}{{ b | upper }}");
    assert_eq!(got.len(), 2);
    match &got[1] {
        Item::Output(node) => assert_eq!(to_sexpr(node), "(| b upper)"),
        other => panic!("expected output, got {:?}", other),
    }
}

#[test]
fn test_eval_statements() {
    let got = items("{? a = 1; ; b += 2; ?}x");
    assert_eq!(got.len(), 3);
    let forms: Vec<String> = got
        .iter()
        .filter_map(|item| match item {
            Item::Eval(node) => Some(to_sexpr(node)),
            _ => None,
        })
        .collect();
    assert_eq!(forms, vec!["(= a 1)", "(+= b 2)"]);
    assert_eq!(got[2], text("x"));
}

#[test]
fn test_empty_eval_region() {
    assert_eq!(items("a{??}b"), vec![text("a"), text("b")]);
}

#[test]
fn test_block_with_body() {
    assert_eq!(
        items("<<#if(user)>>Hi {{ user }}<</>>"),
        vec![Item::Block {
            name: "if".to_string(),
            args: vec![Node::local("user")],
            body: Some(vec![text("Hi "), Item::Output(Node::local("user"))]),
        }]
    );
}

#[test]
fn test_self_closing_block() {
    assert_eq!(
        items("<<#include('footer')/>>end"),
        vec![
            Item::Block {
                name: "include".to_string(),
                args: vec![Node::Literal(Literal::String("footer".to_string()))],
                body: None,
            },
            text("end"),
        ]
    );
}

#[test]
fn test_nested_blocks() {
    let got = items("<<#each(xs)>><<#if(x)>>y<</>><</>>");
    let Item::Block { body: Some(outer), .. } = &got[0] else {
        panic!("expected block with body");
    };
    let Item::Block { name, body: Some(inner), .. } = &outer[0] else {
        panic!("expected nested block");
    };
    assert_eq!(name, "if");
    assert_eq!(inner, &vec![text("y")]);
}

#[test]
fn test_block_without_arguments() {
    let got = items("<< #else />>");
    assert_eq!(
        got,
        vec![Item::Block {
            name: "else".to_string(),
            args: vec![],
            body: None,
        }]
    );
}

#[test]
fn test_comments_do_not_split_text() {
    assert_eq!(items("a{* note *}b{{ x }}"), vec![text("ab"), Item::Output(Node::local("x"))]);
}

#[test]
fn test_code_comments_inside_regions() {
    assert_eq!(
        items("{{ x /* why */ // trailing\n }}"),
        vec![Item::Output(Node::local("x"))]
    );
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_incomplete_expression_in_output() {
    let err = compile_str("{{ 1 + }}").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedToken { line: 1, .. }));
    assert_eq!(
        err.to_string(),
        "line 1: Expected expression, found delimiter \"}}\""
    );
}

#[test]
fn test_unclosed_output() {
    assert!(matches!(
        compile_str("{{ x").unwrap_err(),
        ParseError::PrematureEnd { .. }
    ));
    assert!(matches!(
        compile_str("{{ x ?}").unwrap_err(),
        ParseError::UnexpectedToken { .. }
    ));
}

#[test]
fn test_missing_statement_separator() {
    assert!(matches!(
        compile_str("{? a b ?}").unwrap_err(),
        ParseError::UnexpectedToken { .. }
    ));
    assert!(matches!(
        compile_str("{? a").unwrap_err(),
        ParseError::PrematureEnd { .. }
    ));
}

#[test]
fn test_unclosed_block() {
    let err = compile_str("<<#if(x)>>\nbody").unwrap_err();
    assert_eq!(
        err,
        ParseError::PrematureEnd {
            line: 2,
            expected: "expected \"<</>>\" to close block".to_string()
        }
    );
}

#[test]
fn test_stray_closing_tag() {
    assert!(matches!(
        compile_str("a<</>>").unwrap_err(),
        ParseError::UnexpectedToken { .. }
    ));
}

#[test]
fn test_non_block_after_open_angle() {
    let err = compile_str("<< x >>").unwrap_err();
    assert_eq!(
        err.to_string(),
        "line 1: Expected a block after \"<<\", found local reference"
    );
}

#[test]
fn test_error_line_after_text() {
    let err = compile_str("one\ntwo\n{{ [a => 1] }}").unwrap_err();
    assert_eq!(err, ParseError::NonConstantKey { line: 3 });
}

#[test]
fn test_unterminated_string_in_template() {
    assert_eq!(
        compile_str("{{ \"abc }}").unwrap_err(),
        ParseError::UnterminatedLiteral {
            line: 1,
            quote: '"'
        }
    );
}
