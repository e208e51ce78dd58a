//! # Plate Template Language - Abstract Syntax Tree
//!
//! This module defines the tokens, expression nodes, operator tables and
//! statement items of the Plate template language: literal markup with
//! embedded expressions and directives.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - The single live token produced by the lexer
//! - **[expressions]** - Expression nodes (literals, references, operations, calls)
//! - **[operators]** - Data-driven prefix, infix and postfix operator tables
//! - **[statements]** - Template items (text, output, eval, block)
//! - **[program]** - A complete compiled template
//!
//! ## Quick Start
//!
//! ```text
//! Hello, {{ user.name | upper }}!
//! ```
//!
//! Literal text is copied verbatim; `{{ ... }}` embeds an expression whose
//! value is written to the output.
//!
//! ## Code Regions
//!
//! | Open | Close | Meaning |
//! |------|-------|---------|
//! | `{{` | `}}`  | output an expression |
//! | `{?` | `?}`  | run `;`-separated statements |
//! | `<<` | `>>` or `/>>` | open a block, or a self-closing block |
//! | `<<` | `/>>` (as `<</>>`) | close the innermost block |
//!
//! Text between `{*` and `*}` is a comment and is dropped. Inside code,
//! `// line` and `/* block */` comments are skipped.
//!
//! ## Expressions
//!
//! ### References
//!
//! ```text
//! user          // local variable
//! $site         // global variable
//! $             // the whole global scope
//! ```
//!
//! ### Pipes, Calls and Indexing
//!
//! ```text
//! title | truncate(20) | upper
//! items[0](1, 2)
//! ```
//!
//! ### Inline Arrays
//!
//! ```text
//! [1, 2, 'x' => 3]   // keys 0, 1 and "x"
//! ```
//!
//! ### Blocks
//!
//! ```text
//! <<#each(items)>>{{ item }}<</>>
//! ```
//!
//! Block names and arguments are parsed here; what a block does is up to
//! the host's handler registry.
pub mod tokens;
pub mod expressions;
pub mod operators;
pub mod statements;
pub mod program;

pub use tokens::{Token, TokenKind};
pub use expressions::{ArrayEntry, ArrayKey, Literal, Node};
pub use operators::{builtin_operators, OperatorRule, OperatorTable, OperatorTables, ParseRule};
pub use statements::Item;
pub use program::Program;
