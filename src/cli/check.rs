//! Compile templates or single expressions and print the result

use super::CliError;
use crate::{
    ast::Item,
    compile_str, node_to_json,
    output::{to_sexpr, to_sexpr_pretty},
    parse_expression_str, program_to_json, Node, Program,
};

/// How compiled output is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// The persisted JSON program format
    #[default]
    Json,
    /// Indented item list with prefix-form expressions
    Tree,
}

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Template source, or a single expression when `expression` is set
    pub source: String,
    /// Parse `source` as one code-mode expression instead of a template
    pub expression: bool,
    pub format: OutputFormat,
    /// Pretty-print the output
    pub pretty: bool,
    /// Only validate syntax, don't print the result
    pub syntax_only: bool,
}

/// Result of a check operation
#[derive(Debug, PartialEq)]
pub enum CheckResult {
    /// Syntax validation passed
    SyntaxValid,
    /// Rendered compilation output
    Success(String),
}

enum Compiled {
    Expression(Node),
    Template(Program),
}

/// Execute a plate check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let compiled = if options.expression {
        Compiled::Expression(parse_expression_str(&options.source)?)
    } else {
        Compiled::Template(compile_str(&options.source)?)
    };

    if options.syntax_only {
        return Ok(CheckResult::SyntaxValid);
    }

    let output = match (options.format, &compiled) {
        (OutputFormat::Json, Compiled::Expression(node)) => {
            json_text(&node_to_json(node)?, options.pretty)?
        }
        (OutputFormat::Json, Compiled::Template(program)) => {
            json_text(&program_to_json(program)?, options.pretty)?
        }
        (OutputFormat::Tree, Compiled::Expression(node)) => render_node(node, options.pretty),
        (OutputFormat::Tree, Compiled::Template(program)) => {
            let mut out = String::new();
            render_items(&program.items, 0, options.pretty, &mut out);
            out.truncate(out.trim_end().len());
            out
        }
    };

    Ok(CheckResult::Success(output))
}

fn json_text(value: &serde_json::Value, pretty: bool) -> Result<String, CliError> {
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(crate::ConvertError::from)?;
    Ok(text)
}

fn render_node(node: &Node, pretty: bool) -> String {
    if pretty {
        to_sexpr_pretty(node)
    } else {
        to_sexpr(node)
    }
}

fn render_items(items: &[Item], indent: usize, pretty: bool, out: &mut String) {
    let pad = "  ".repeat(indent);
    for item in items {
        match item {
            Item::Text(text) => out.push_str(&format!("{}text {:?}\n", pad, text)),
            Item::Output(node) => out.push_str(&format!("{}output {}\n", pad, render_node(node, pretty))),
            Item::Eval(node) => out.push_str(&format!("{}eval {}\n", pad, render_node(node, pretty))),
            Item::Block { name, args, body } => {
                let block = Node::Block {
                    name: name.clone(),
                    args: args.clone(),
                };
                out.push_str(&format!("{}block {}\n", pad, render_node(&block, pretty)));
                if let Some(body) = body {
                    render_items(body, indent + 1, pretty, out);
                    out.push_str(&format!("{}end\n", pad));
                }
            }
        }
    }
}
