//! Dump the scanner token stream

use super::CliError;
use crate::{Lexer, ScanMode, Token};

/// Scans `source` to the end and returns every token with its line.
pub fn list_tokens(source: &str, mode: ScanMode) -> Result<Vec<(usize, Token)>, CliError> {
    let mut lexer = Lexer::with_mode(source, mode);
    let mut tokens = Vec::new();

    while lexer.advance()? {
        tokens.push((lexer.line(), lexer.token().clone()));
    }

    Ok(tokens)
}

/// One token per line: `line kind text`.
pub fn format_tokens(tokens: &[(usize, Token)]) -> String {
    tokens
        .iter()
        .map(|(line, token)| format!("{:>4}  {:<10} {:?}", line, token.kind.name(), token.text))
        .collect::<Vec<_>>()
        .join("\n")
}
