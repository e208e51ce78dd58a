pub mod ast;
pub mod cli;
pub mod compiler;
pub mod convert;
pub mod engine;
pub mod lexer;
pub mod output;
pub mod parser;

pub use ast::{Item, Literal, Node, Program, Token, TokenKind};
pub use compiler::{compile_str, Compiler};
pub use convert::{json_to_node, json_to_program, node_to_json, program_to_json, ConvertError};
pub use engine::{EngineError, EngineOptions, TemplateEngine};
pub use lexer::{LexError, Lexer, ScanMode};
pub use output::{to_sexpr, to_sexpr_pretty};
pub use parser::{parse_expression_str, ParseError, Parser};
