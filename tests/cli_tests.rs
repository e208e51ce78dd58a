// tests/cli_tests.rs

use plate_lang::ast::TokenKind;
use plate_lang::cli::{
    execute_check, format_tokens, get_doc_category, get_docs_overview, list_tokens, CheckOptions,
    CheckResult, CliError, OutputFormat,
};
use plate_lang::{ParseError, ScanMode};
use pretty_assertions::assert_eq;

fn check(source: &str, expression: bool, format: OutputFormat) -> Result<CheckResult, CliError> {
    execute_check(&CheckOptions {
        source: source.to_string(),
        expression,
        format,
        ..Default::default()
    })
}

#[test]
fn test_check_expression_tree() {
    let result = check("1 + 2 * 3", true, OutputFormat::Tree).unwrap();
    assert_eq!(result, CheckResult::Success("(+ 1 (* 2 3))".to_string()));
}

#[test]
fn test_check_expression_json() {
    let result = check("-x", true, OutputFormat::Json).unwrap();
    assert_eq!(
        result,
        CheckResult::Success(r#"["e","-",["l","x"]]"#.to_string())
    );
}

#[test]
fn test_check_template_json() {
    let result = check("a{{ b }}", false, OutputFormat::Json).unwrap();
    assert_eq!(
        result,
        CheckResult::Success(r#"{"format":1,"items":["a",["o",["l","b"]]]}"#.to_string())
    );
}

#[test]
fn test_check_template_tree() {
    let result = check("Hi {{ n | upper }}<<#if(x)>>{? y = 1 ?}<</>>", false, OutputFormat::Tree)
        .unwrap();
    let expected = "text \"Hi \"\n\
                    output (| n upper)\n\
                    block (#if x)\n  \
                    eval (= y 1)\n\
                    end";
    assert_eq!(result, CheckResult::Success(expected.to_string()));
}

#[test]
fn test_check_pretty_json() {
    let result = execute_check(&CheckOptions {
        source: "x".to_string(),
        expression: true,
        pretty: true,
        ..Default::default()
    })
    .unwrap();
    assert_eq!(
        result,
        CheckResult::Success("[\n  \"l\",\n  \"x\"\n]".to_string())
    );
}

#[test]
fn test_check_syntax_only() {
    let result = execute_check(&CheckOptions {
        source: "{{ a[0](1) }}".to_string(),
        syntax_only: true,
        ..Default::default()
    })
    .unwrap();
    assert_eq!(result, CheckResult::SyntaxValid);
}

#[test]
fn test_check_reports_parse_errors() {
    let err = check("{{ 1 + }}", false, OutputFormat::Json).unwrap_err();
    assert!(matches!(
        err,
        CliError::Parse(ParseError::UnexpectedToken { line: 1, .. })
    ));
    assert!(err.to_string().starts_with("Parse error: line 1:"));
}

#[test]
fn test_expression_mode_rejects_template_text() {
    // `{{` in code mode is a delimiter, not an expression start
    assert!(check("{{ x }}", true, OutputFormat::Tree).is_err());
}

#[test]
fn test_list_tokens_text_mode() {
    let tokens = list_tokens("A\n{{ x }}", ScanMode::Text).unwrap();
    let kinds: Vec<TokenKind> = tokens.iter().map(|(_, t)| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Text,
            TokenKind::Escape,
            TokenKind::Identifier,
            TokenKind::Escape
        ]
    );
    assert_eq!(tokens[2].0, 2);
}

#[test]
fn test_list_tokens_unterminated_string() {
    assert!(matches!(
        list_tokens("'abc", ScanMode::Code),
        Err(CliError::Parse(ParseError::UnterminatedLiteral { .. }))
    ));
}

#[test]
fn test_format_tokens() {
    let tokens = list_tokens("a + 'b'", ScanMode::Code).unwrap();
    assert_eq!(
        format_tokens(&tokens),
        "   1  identifier \"a\"\n   1  operator   \"+\"\n   1  string     \"b\""
    );
}

#[test]
fn test_docs() {
    assert!(get_docs_overview().contains("PLATE DOCUMENTATION"));
    assert!(get_doc_category("operators").unwrap().contains("-2 ^ 2"));
    assert!(get_doc_category("Arrays").unwrap().starts_with("ARRAYS"));
    assert!(matches!(
        get_doc_category("bogus"),
        Err(CliError::UnknownCategory(_))
    ));
}
