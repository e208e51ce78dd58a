//! Statement compiler: assembles text runs and parsed expressions into a
//! [`Program`].
//!
//! ```text
//! Hello {{ name }}!                      Text, Output, Text
//! {? count = 0; total += 1 ?}            Eval, Eval
//! <<#if(user)>>hi<</>>                   Block with body
//! <<#include('footer')/>>                Block without body
//! ```

use tracing::debug;

use crate::{
    ast::{Item, Node, Program, TokenKind},
    lexer::Lexer,
    parser::{ParseError, Parser},
};

/// Compiles a whole template source.
///
/// # Examples
///
/// ```
/// use plate_lang::compile_str;
/// use plate_lang::ast::Item;
///
/// let program = compile_str("Hi {{ name }}").unwrap();
/// assert_eq!(program.items.len(), 2);
/// assert!(matches!(&program.items[0], Item::Text(t) if t == "Hi "));
/// ```
pub fn compile_str(source: &str) -> Result<Program, ParseError> {
    Compiler::new(source)?.compile()
}

pub struct Compiler {
    parser: Parser,
}

impl Compiler {
    pub fn new(source: &str) -> Result<Self, ParseError> {
        Ok(Compiler {
            parser: Parser::new(Lexer::new(source))?,
        })
    }

    pub fn compile(mut self) -> Result<Program, ParseError> {
        let items = self.compile_items(false)?;
        debug!(items = items.len(), lines = self.parser.line(), "compiled template");
        Ok(Program::new(items))
    }

    /// Compiles items until end of input, or until the closing `<</>>` when
    /// inside a block body.
    fn compile_items(&mut self, in_block: bool) -> Result<Vec<Item>, ParseError> {
        let mut items = Vec::new();

        loop {
            let kind = self.parser.token().kind;
            let text = self.parser.token().text.clone();

            match (kind, text.as_str()) {
                (TokenKind::None, _) => {
                    if in_block {
                        return Err(self.parser.premature_end("expected \"<</>>\" to close block"));
                    }
                    return Ok(items);
                }
                (TokenKind::Text, _) => {
                    items.push(Item::Text(text.clone()));
                    self.parser.advance()?;
                }
                (TokenKind::Escape, "{{") => items.push(self.compile_output()?),
                (TokenKind::Escape, "{?") => self.compile_statements(&mut items)?,
                (TokenKind::Escape, "<<") => {
                    self.parser.advance()?;
                    if self.parser.token().is_escape("/>>") {
                        if !in_block {
                            return Err(self.parser.unexpected("Closing tag without an open block"));
                        }
                        self.parser.advance()?;
                        return Ok(items);
                    }
                    items.push(self.compile_block()?);
                }
                _ => return Err(self.parser.unexpected("Expected text or an opening delimiter")),
            }
        }
    }

    /// `{{ expr }}`
    fn compile_output(&mut self) -> Result<Item, ParseError> {
        if !self.parser.advance()? {
            return Err(self.parser.premature_end("expected expression after \"{{\""));
        }

        let node = self.parser.parse_expression(1)?;
        if !self.parser.token().is_escape("}}") {
            return Err(self.parser.expected("Expected \"}}\""));
        }
        self.parser.advance()?;

        Ok(Item::Output(node))
    }

    /// `{? stmt; stmt ?}`, empty statements allowed.
    fn compile_statements(&mut self, items: &mut Vec<Item>) -> Result<(), ParseError> {
        self.parser.advance()?;

        loop {
            let token = self.parser.token();
            if token.is_escape("?}") {
                self.parser.advance()?;
                return Ok(());
            }
            if token.is_escape(";") {
                self.parser.advance()?;
                continue;
            }
            if token.kind == TokenKind::None {
                return Err(self.parser.premature_end("expected \"?}\""));
            }

            let node = self.parser.parse_expression(1)?;
            items.push(Item::Eval(node));

            let token = self.parser.token();
            if !token.is_escape(";") && !token.is_escape("?}") {
                return Err(self.parser.expected("Expected \";\" or \"?}\""));
            }
        }
    }

    /// `<< #name(args) >> body <</>>` or `<< #name(args) />>`, with the
    /// current token just past `<<`.
    fn compile_block(&mut self) -> Result<Item, ParseError> {
        let line = self.parser.line();
        let (name, args) = match self.parser.parse_expression(1)? {
            Node::Block { name, args } => (name, args),
            other => {
                return Err(ParseError::UnexpectedToken {
                    line,
                    message: format!("Expected a block after \"<<\", found {}", other.kind_name()),
                });
            }
        };

        let body = if self.parser.token().is_escape("/>>") {
            self.parser.advance()?;
            None
        } else if self.parser.token().is_escape(">>") {
            self.parser.advance()?;
            Some(self.compile_items(true)?)
        } else {
            return Err(self.parser.expected("Expected \">>\" or \"/>>\" after block"));
        };

        Ok(Item::Block { name, args, body })
    }
}
