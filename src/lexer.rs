use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::ast::{Token, TokenKind};

/// Characters that start (and may continue) an operator token.
const OPERATOR_CHARS: &str = "+-*/|&.,@#$!?:;~%^=<>()[]{}";

/// Operator characters that always form a single-character token.
const TERMINAL_OPERATOR_CHARS: &str = ".,@#;()[]$";

/// Bare words scanned as operators rather than identifiers.
const WORD_OPERATORS: [&str; 4] = ["and", "or", "xor", "not"];

static LINE_ENDINGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\r|\r\n|\r").expect("line ending pattern is valid"));

/// Which scanner runs on the next [`Lexer::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanMode {
    /// Literal text, copied verbatim until an opening delimiter
    #[default]
    Text,
    /// Expression tokens
    Code,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("line {line}: unterminated string literal, expected closing {quote}")]
    UnterminatedLiteral { line: usize, quote: char },
}

#[derive(Clone, Copy)]
enum DelimiterState {
    Start,
    OpenBrace,
    Close,
    Angle,
    Greater,
    Slash,
}

/// Two-mode scanner over a template source.
///
/// Holds exactly one live token; [`advance`](Lexer::advance) replaces it.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    mode: ScanMode,
    token: Token,
}

impl Lexer {
    /// Creates a lexer that starts in text mode.
    pub fn new(input: &str) -> Self {
        Self::with_mode(input, ScanMode::Text)
    }

    /// Creates a lexer starting in `mode`; use [`ScanMode::Code`] to scan a
    /// bare expression.
    pub fn with_mode(input: &str, mode: ScanMode) -> Self {
        let normalized = LINE_ENDINGS.replace_all(input, "\n");
        Lexer {
            input: normalized.chars().collect(),
            position: 0,
            line: 1,
            mode,
            token: Token::default(),
        }
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn kind(&self) -> TokenKind {
        self.token.kind
    }

    pub fn text(&self) -> &str {
        &self.token.text
    }

    pub fn is_token(&self, kind: TokenKind, text: &str) -> bool {
        self.token.is(kind, text)
    }

    /// Current line, starting at 1.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    /// Scans the next token. Returns `false` at end of input, leaving a
    /// [`TokenKind::None`] token.
    pub fn advance(&mut self) -> Result<bool, LexError> {
        match self.mode {
            ScanMode::Text => self.scan_text(),
            ScanMode::Code => self.scan_code(),
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn set_token(&mut self, kind: TokenKind, text: String) {
        self.token = Token { kind, text };
    }

    fn slice(&self, start: usize, end: usize) -> String {
        self.input[start..end].iter().collect()
    }

    fn scan_text(&mut self) -> Result<bool, LexError> {
        let mut text = String::new();
        let mut start = self.position;
        let mut cursor = self.position;

        while let Some(ch) = self.input.get(cursor).copied() {
            if ch != '{' && ch != '<' {
                if ch == '\n' {
                    self.line += 1;
                }
                cursor += 1;
                continue;
            }

            let Some(next) = self.input.get(cursor + 1).copied() else {
                cursor = self.input.len();
                break;
            };

            if ch == '{' && next == '*' {
                text.extend(&self.input[start..cursor]);
                cursor = self.skip_template_comment(cursor + 2);
                start = cursor;
                continue;
            }

            if (ch == '{' && (next == '{' || next == '?')) || (ch == '<' && next == '<') {
                self.mode = ScanMode::Code;
                trace!(line = self.line, "text -> code");
                break;
            }

            cursor += 1;
        }

        text.extend(&self.input[start..cursor]);
        self.position = cursor;

        if !text.is_empty() {
            self.set_token(TokenKind::Text, text);
            return Ok(true);
        }

        // Nothing pending: go straight on to the code token behind the delimiter.
        if self.mode == ScanMode::Code {
            return self.scan_code();
        }

        self.set_token(TokenKind::None, String::new());
        Ok(false)
    }

    /// Skips a `{* ... *}` comment body starting at `cursor` and returns the
    /// position after the closing `*}`, or end of input.
    fn skip_template_comment(&mut self, mut cursor: usize) -> usize {
        while let Some(ch) = self.input.get(cursor).copied() {
            if ch == '*' && self.input.get(cursor + 1) == Some(&'}') {
                return cursor + 2;
            }
            if ch == '\n' {
                self.line += 1;
            }
            cursor += 1;
        }
        self.input.len()
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while let Some(ch) = self.current_char() {
                if !matches!(ch, ' ' | '\t' | '\r' | '\n') {
                    break;
                }
                if ch == '\n' {
                    self.line += 1;
                }
                self.position += 1;
            }

            if self.current_char() != Some('/') {
                return;
            }

            match self.peek_char(1) {
                Some('/') => {
                    self.position += 2;
                    // The newline itself is counted by the whitespace loop.
                    while let Some(ch) = self.current_char() {
                        if ch == '\n' {
                            break;
                        }
                        self.position += 1;
                    }
                }
                Some('*') => {
                    self.position += 2;
                    while let Some(ch) = self.current_char() {
                        if ch == '*' && self.peek_char(1) == Some('/') {
                            self.position += 2;
                            break;
                        }
                        if ch == '\n' {
                            self.line += 1;
                        }
                        self.position += 1;
                    }
                }
                _ => return,
            }
        }
    }

    fn scan_code(&mut self) -> Result<bool, LexError> {
        self.skip_whitespace_and_comments();

        let Some(ch) = self.current_char() else {
            self.set_token(TokenKind::None, String::new());
            return Ok(false);
        };

        match ch {
            '"' | '\'' => self.read_string(ch)?,
            c if OPERATOR_CHARS.contains(c) => self.read_operator(c),
            c if c.is_ascii_digit() => self.read_number(),
            c if c.is_ascii_alphabetic() || c == '_' => self.read_identifier(),
            c => {
                self.position += 1;
                self.set_token(TokenKind::Unknown, c.to_string());
            }
        }

        Ok(true)
    }

    fn read_string(&mut self, quote: char) -> Result<(), LexError> {
        let mut result = String::new();
        self.position += 1; // opening quote

        loop {
            match self.current_char() {
                None => {
                    return Err(LexError::UnterminatedLiteral {
                        line: self.line,
                        quote,
                    });
                }
                Some(c) if c == quote => {
                    self.position += 1;
                    break;
                }
                Some('\\') if self.peek_char(1).is_some() => {
                    let escaped = match self.peek_char(1) {
                        Some('n') => Some('\n'),
                        Some('r') => Some('\r'),
                        Some('t') => Some('\t'),
                        Some('\'') => Some('\''),
                        Some('"') => Some('"'),
                        Some('\\') => Some('\\'),
                        _ => None,
                    };
                    match escaped {
                        Some(c) => {
                            result.push(c);
                            self.position += 2;
                        }
                        // Unknown escapes stay as written.
                        None => {
                            result.push('\\');
                            self.position += 1;
                        }
                    }
                }
                Some(c) => {
                    if c == '\n' {
                        self.line += 1;
                    }
                    result.push(c);
                    self.position += 1;
                }
            }
        }

        self.set_token(TokenKind::String, result);
        Ok(())
    }

    fn read_operator(&mut self, first: char) {
        let start = self.position;

        if let Some(len) = self.delimiter_len() {
            self.position += len;
            if !matches!(first, '{' | '<' | ';') {
                self.mode = ScanMode::Text;
                trace!(line = self.line, "code -> text");
            }
            let delimiter = self.slice(start, self.position);
            self.set_token(TokenKind::Escape, delimiter);
            return;
        }

        self.position += 1;
        if !TERMINAL_OPERATOR_CHARS.contains(first) {
            while let Some(ch) = self.current_char() {
                if !OPERATOR_CHARS.contains(ch) || TERMINAL_OPERATOR_CHARS.contains(ch) {
                    break;
                }
                self.position += 1;
            }
        }

        let op = self.slice(start, self.position);
        self.set_token(TokenKind::Operator, op);
    }

    /// Matches `{{ {? ?} }} << >> />>` or `;` at the cursor and returns its
    /// length.
    fn delimiter_len(&self) -> Option<usize> {
        use DelimiterState::*;

        let mut state = Start;
        let mut len = 0;
        loop {
            let ch = self.peek_char(len)?;
            len += 1;
            state = match (state, ch) {
                (Start, ';') | (OpenBrace, '{' | '?') | (Close, '}') | (Angle, '<') | (Greater, '>') => {
                    return Some(len);
                }
                (Start, '{') => OpenBrace,
                (Start, '?' | '}') => Close,
                (Start, '<') => Angle,
                (Start, '>') | (Slash, '>') => Greater,
                (Start, '/') => Slash,
                _ => return None,
            };
        }
    }

    fn read_number(&mut self) {
        let start = self.position;
        while let Some(ch) = self.current_char() {
            if !(ch.is_ascii_digit() || ch == '.') {
                break;
            }
            self.position += 1;
        }
        let number = self.slice(start, self.position);
        self.set_token(TokenKind::Number, number);
    }

    fn read_identifier(&mut self) {
        let start = self.position;
        while let Some(ch) = self.current_char() {
            if !(ch.is_ascii_alphanumeric() || ch == '_') {
                break;
            }
            self.position += 1;
        }

        let ident = self.slice(start, self.position);
        let kind = if WORD_OPERATORS.contains(&ident.as_str()) {
            TokenKind::Operator
        } else {
            TokenKind::Identifier
        };
        self.set_token(kind, ident);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn next(lexer: &mut Lexer) -> (TokenKind, String) {
        lexer.advance().unwrap();
        (lexer.kind(), lexer.text().to_string())
    }

    #[test]
    fn test_word_operators() {
        let mut lexer = Lexer::with_mode("and or xor not nota", ScanMode::Code);
        assert_eq!(next(&mut lexer), (TokenKind::Operator, "and".into()));
        assert_eq!(next(&mut lexer), (TokenKind::Operator, "or".into()));
        assert_eq!(next(&mut lexer), (TokenKind::Operator, "xor".into()));
        assert_eq!(next(&mut lexer), (TokenKind::Operator, "not".into()));
        assert_eq!(next(&mut lexer), (TokenKind::Identifier, "nota".into()));
        assert!(!lexer.advance().unwrap());
    }

    #[test]
    fn test_line_endings_normalized() {
        let mut lexer = Lexer::new("a\r\nb\rc\n\rd");
        assert_eq!(next(&mut lexer), (TokenKind::Text, "a\nb\nc\nd".into()));
        assert_eq!(lexer.line(), 4);
    }
}
