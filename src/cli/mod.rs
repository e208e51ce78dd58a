//! CLI support for plate-lang
//!
//! Provides programmatic access to the `plate` commands so other tools can
//! embed them.

mod check;
mod docs;
mod tokens;

pub use check::{execute_check, CheckOptions, CheckResult, OutputFormat};
pub use docs::{get_doc_category, get_docs_overview, DocCategory};
pub use tokens::{list_tokens, format_tokens};

use std::io;

/// Errors that can occur during CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Parse error: {0}")]
    Parse(#[from] crate::ParseError),

    #[error("{0}")]
    Engine(#[from] crate::EngineError),

    #[error("Serialization error: {0}")]
    Convert(#[from] crate::ConvertError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No input provided. Pass a template argument or pipe it to stdin.")]
    NoInput,

    #[error("Unknown category: '{0}'\nRun 'plate docs' to see available categories.")]
    UnknownCategory(String),
}

impl From<crate::LexError> for CliError {
    fn from(e: crate::LexError) -> Self {
        CliError::Parse(e.into())
    }
}
