use tracing::trace;

use crate::{
    ast::{
        builtin_operators, expressions::ArrayBuilder, ArrayKey, Literal, Node, OperatorRule,
        OperatorTables, Token, TokenKind,
    },
    lexer::{LexError, Lexer, ScanMode},
};

/// Compile error raised by the parser. The first error aborts the parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A quoted string reached end of input
    #[error("line {line}: unterminated string literal, expected closing {quote}")]
    UnterminatedLiteral { line: usize, quote: char },

    /// A token appeared where the grammar requires something else
    #[error("line {line}: {message}")]
    UnexpectedToken { line: usize, message: String },

    /// An operator has no entry in the table consulted at this position
    #[error("line {line}: unknown operator \"{operator}\"")]
    UnknownOperator { line: usize, operator: String },

    /// The expression before `=>` in an inline array is not a literal
    #[error("line {line}: expected constant for key in array")]
    NonConstantKey { line: usize },

    /// A production needed another token and the input ended
    #[error("line {line}: unexpected end of input, {expected}")]
    PrematureEnd { line: usize, expected: String },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            ParseError::UnterminatedLiteral { line, .. }
            | ParseError::UnexpectedToken { line, .. }
            | ParseError::UnknownOperator { line, .. }
            | ParseError::NonConstantKey { line }
            | ParseError::PrematureEnd { line, .. } => *line,
        }
    }
}

impl From<LexError> for ParseError {
    fn from(e: LexError) -> Self {
        match e {
            LexError::UnterminatedLiteral { line, quote } => {
                ParseError::UnterminatedLiteral { line, quote }
            }
        }
    }
}

/// Parses a single expression from code-mode source.
///
/// # Examples
///
/// ```
/// use plate_lang::parser::parse_expression_str;
/// use plate_lang::output::to_sexpr;
///
/// let node = parse_expression_str("1 + 2 * 3").unwrap();
/// assert_eq!(to_sexpr(&node), "(+ 1 (* 2 3))");
/// ```
pub fn parse_expression_str(source: &str) -> Result<Node, ParseError> {
    Parser::new(Lexer::with_mode(source, ScanMode::Code))?.parse()
}

/// Operator-precedence parser pulling tokens from a live [`Lexer`].
///
/// Operator behavior comes entirely from the [`OperatorTables`]; the parser
/// only knows the structural primaries (`#block`, `( )`, `[ ]`, `$global`).
pub struct Parser {
    lexer: Lexer,
    operators: &'static OperatorTables,
}

impl Parser {
    /// Creates a parser with the built-in operators and reads the first token.
    pub fn new(lexer: Lexer) -> Result<Self, ParseError> {
        Self::with_operators(lexer, builtin_operators())
    }

    pub fn with_operators(
        mut lexer: Lexer,
        operators: &'static OperatorTables,
    ) -> Result<Self, ParseError> {
        lexer.advance()?;
        Ok(Parser { lexer, operators })
    }

    pub fn token(&self) -> &Token {
        self.lexer.token()
    }

    pub fn line(&self) -> usize {
        self.lexer.line()
    }

    /// Moves to the next token; `false` at end of input.
    pub fn advance(&mut self) -> Result<bool, ParseError> {
        Ok(self.lexer.advance()?)
    }

    fn check_operator(&self, op: &str) -> bool {
        self.token().is_operator(op)
    }

    fn expect_operator(&mut self, op: &str, message: &str) -> Result<(), ParseError> {
        if !self.check_operator(op) {
            return Err(self.expected(message));
        }
        self.advance()?;
        Ok(())
    }

    pub(crate) fn unexpected(&self, message: &str) -> ParseError {
        ParseError::UnexpectedToken {
            line: self.line(),
            message: format!("{}, found {}", message, self.token()),
        }
    }

    pub(crate) fn premature_end(&self, expected: &str) -> ParseError {
        ParseError::PrematureEnd {
            line: self.line(),
            expected: expected.to_string(),
        }
    }

    /// Reports a missing production: premature end at end of input,
    /// unexpected token otherwise.
    pub(crate) fn expected(&self, message: &str) -> ParseError {
        if self.lexer.kind() == TokenKind::None {
            self.premature_end(message)
        } else {
            self.unexpected(message)
        }
    }

    /// Parses one whole expression that must span the rest of the input.
    pub fn parse(&mut self) -> Result<Node, ParseError> {
        let node = self.parse_expression(1)?;
        if self.lexer.kind() != TokenKind::None {
            return Err(self.unexpected("Expected end of expression"));
        }
        Ok(node)
    }

    /// Parses an expression whose infix operators bind at `min_level` or
    /// tighter, leaving the first unconsumed token current.
    pub fn parse_expression(&mut self, min_level: u8) -> Result<Node, ParseError> {
        let mut left = self.parse_primary(min_level)?;

        while self.lexer.kind() == TokenKind::Operator {
            let Some((level, rule)) = self.operators.infix.find(min_level, self.lexer.text())
            else {
                break;
            };
            let op = self.lexer.text().to_string();
            trace!(op = %op, prec = level, "infix");

            if !self.advance()? {
                return Err(self.premature_end(&format!("expected operand after \"{}\"", op)));
            }

            left = match rule {
                OperatorRule::Custom(rule) => rule(self, left, level)?,
                OperatorRule::Simple => {
                    let right = self.parse_expression(level + 1)?;
                    Node::binary(op, left, right)
                }
            };

            left = self.parse_postfix(min_level, left)?;
        }

        Ok(left)
    }

    fn parse_primary(&mut self, min_level: u8) -> Result<Node, ParseError> {
        let kind = self.lexer.kind();
        let text = self.lexer.text().to_string();

        let node = match kind {
            TokenKind::Operator => {
                return match text.as_str() {
                    "#" => self.parse_block(min_level),
                    "(" => self.parse_group(min_level),
                    "[" => self.parse_array_literal(min_level),
                    "$" => self.parse_global(min_level),
                    _ => self.parse_prefix(min_level, text),
                };
            }
            TokenKind::Identifier => match text.as_str() {
                "true" => Node::Literal(Literal::Boolean(true)),
                "false" => Node::Literal(Literal::Boolean(false)),
                "null" => Node::Literal(Literal::Null),
                _ => Node::Local(text),
            },
            TokenKind::Number => Node::Literal(Literal::from_number(&text)),
            TokenKind::String => Node::Literal(Literal::String(text)),
            TokenKind::None => return Err(self.premature_end("expected expression")),
            TokenKind::Text | TokenKind::Escape | TokenKind::Unknown => {
                return Err(self.unexpected("Expected expression"));
            }
        };

        self.advance()?;
        self.parse_postfix(min_level, node)
    }

    /// `#name` or `#name(arg, ...)`
    fn parse_block(&mut self, min_level: u8) -> Result<Node, ParseError> {
        if !self.advance()? || self.lexer.kind() != TokenKind::Identifier {
            return Err(self.expected("Block name expected after \"#\""));
        }

        let name = self.lexer.text().to_string();
        let mut args = Vec::new();
        if self.advance()? && self.check_operator("(") {
            args = self.parse_argument_list("block arguments")?;
        }

        trace!(block = %name, args = args.len(), "block");
        self.parse_postfix(min_level, Node::Block { name, args })
    }

    fn parse_group(&mut self, min_level: u8) -> Result<Node, ParseError> {
        if !self.advance()? {
            return Err(self.premature_end("expected expression after \"(\""));
        }

        let node = self.parse_expression(1)?;
        self.expect_operator(")", "Expected \")\"")?;
        self.parse_postfix(min_level, node)
    }

    /// `$` alone is the whole global scope, `$name` one global.
    fn parse_global(&mut self, min_level: u8) -> Result<Node, ParseError> {
        let mut name = None;
        if self.advance()? && self.lexer.kind() == TokenKind::Identifier {
            name = Some(self.lexer.text().to_string());
            self.advance()?;
        }

        self.parse_postfix(min_level, Node::Global(name))
    }

    fn parse_prefix(&mut self, min_level: u8, op: String) -> Result<Node, ParseError> {
        let Some((level, rule)) = self.operators.prefix.find(min_level, &op) else {
            return Err(ParseError::UnknownOperator {
                line: self.line(),
                operator: op,
            });
        };
        trace!(op = %op, prec = level, "prefix");

        if !self.advance()? {
            return Err(self.premature_end(&format!("expected operand after \"{}\"", op)));
        }

        // Same level, not level + 1: the operand takes only tighter operators.
        let operand = self.parse_expression(level)?;
        let node = match rule {
            OperatorRule::Custom(rule) => rule(self, operand, level)?,
            OperatorRule::Simple => Node::unary(op, operand),
        };

        self.parse_postfix(min_level, node)
    }

    fn parse_array_literal(&mut self, min_level: u8) -> Result<Node, ParseError> {
        if !self.advance()? {
            return Err(self.premature_end("expected expression or \"]\" after \"[\""));
        }

        let mut entries = ArrayBuilder::default();
        loop {
            // empty array, or a trailing comma
            if self.check_operator("]") {
                break;
            }

            let value = self.parse_expression(1)?;
            if self.check_operator("=>") {
                let Some(key) = value.as_literal() else {
                    return Err(ParseError::NonConstantKey { line: self.line() });
                };
                let key = ArrayKey::from_literal(key);
                self.advance()?;
                entries.insert(key, self.parse_expression(1)?);
            } else {
                entries.push(value);
            }

            if !self.check_operator(",") {
                break;
            }
            self.advance()?;
        }

        self.expect_operator("]", "Expected \"]\" for inline array")?;
        self.parse_postfix(min_level, Node::Array(entries.finish()))
    }

    /// `( expr, ... )` with the current token at `(`; at least one argument.
    fn parse_argument_list(&mut self, context: &str) -> Result<Vec<Node>, ParseError> {
        let mut args = Vec::new();
        loop {
            if self.advance()? && self.check_operator(")") {
                return Err(self.unexpected(&format!("Expected argument in {}", context)));
            }
            args.push(self.parse_expression(1)?);
            if !self.check_operator(",") {
                break;
            }
        }

        self.expect_operator(")", &format!("Expected \")\" to close {}", context))?;
        Ok(args)
    }

    /// Applies postfix operators binding at `min_level` or tighter.
    pub fn parse_postfix(&mut self, min_level: u8, mut value: Node) -> Result<Node, ParseError> {
        while self.lexer.kind() == TokenKind::Operator {
            let Some((level, rule)) = self.operators.postfix.find(min_level, self.lexer.text())
            else {
                break;
            };
            let op = self.lexer.text().to_string();
            trace!(op = %op, prec = level, "postfix");

            self.advance()?;
            value = match rule {
                OperatorRule::Custom(rule) => rule(self, value, level)?,
                OperatorRule::Simple => Node::Postfix {
                    op,
                    operand: Box::new(value),
                },
            };
        }

        Ok(value)
    }

    /// `value | name` or `value | name(arg, ...)`
    pub(crate) fn parse_pipe_call(&mut self, value: Node, _level: u8) -> Result<Node, ParseError> {
        if self.lexer.kind() != TokenKind::Identifier {
            return Err(self.expected("Function name expected in \"|\""));
        }

        let function = self.lexer.text().to_string();
        let mut args = Vec::new();
        if self.advance()? && self.check_operator("(") {
            args = self.parse_argument_list("pipe function arguments")?;
        }

        Ok(Node::PipeCall {
            value: Box::new(value),
            function,
            args,
        })
    }

    /// `value[index]`
    pub(crate) fn parse_index(&mut self, value: Node, _level: u8) -> Result<Node, ParseError> {
        if self.lexer.kind() == TokenKind::None {
            return Err(self.premature_end("expected index expression in \"[\""));
        }

        let index = self.parse_expression(1)?;
        self.expect_operator("]", "Expected \"]\"")?;

        Ok(Node::Index {
            value: Box::new(value),
            index: Box::new(index),
        })
    }

    /// `callee(arg, ...)`; the argument list may be empty.
    pub(crate) fn parse_call(&mut self, callee: Node, _level: u8) -> Result<Node, ParseError> {
        let mut args = Vec::new();
        if !self.check_operator(")") {
            args.push(self.parse_expression(1)?);
            while self.check_operator(",") {
                self.advance()?;
                args.push(self.parse_expression(1)?);
            }
        }

        self.expect_operator(")", "Expected \")\" in function call")?;

        Ok(Node::Call {
            callee: Box::new(callee),
            args,
        })
    }
}
