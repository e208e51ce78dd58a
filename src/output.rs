//! Compact text rendering of parsed expressions.
//!
//! This module prints [`Node`] trees in a prefix form that makes operator
//! grouping visible at a glance. It is what `plate check --format tree`
//! prints, and what the tests compare against.
//!
//! # Forms
//!
//! - **Literals** print as written: `42`, `1.5`, `"text"`, `true`, `null`
//! - **References** print bare: `name`, `$site`, `$`
//! - **Operators** print as `(op operand...)`; postfix ones as `(operand op)`
//! - **Pipes, indexing and calls** print as `(| value fn args...)`,
//!   `([] value index)` and `(() callee args...)`
//! - **Blocks** print as `(#name args...)`
//! - **Arrays** print as `[key => value, ...]`
//!
//! # Examples
//!
//! ```
//! use plate_lang::output::to_sexpr;
//! use plate_lang::parser::parse_expression_str;
//!
//! let node = parse_expression_str("x | upper | truncate(10)").unwrap();
//! assert_eq!(to_sexpr(&node), "(| (| x upper) truncate 10)");
//! ```

use crate::ast::{Literal, Node};

pub struct NodePrinter {
    /// Print inline arrays one entry per line
    multiline_arrays: bool,
}

impl NodePrinter {
    pub fn new(multiline_arrays: bool) -> Self {
        NodePrinter { multiline_arrays }
    }

    pub fn print(&self, node: &Node) -> String {
        self.print_node(node, 0)
    }

    fn print_node(&self, node: &Node, indent: usize) -> String {
        match node {
            Node::Literal(literal) => self.print_literal(literal),
            Node::Local(name) => name.clone(),
            Node::Global(Some(name)) => format!("${}", name),
            Node::Global(None) => "$".to_string(),
            Node::Block { name, args } => self.print_form(&format!("#{}", name), &[], args, indent),
            Node::Binary { op, left, right } => {
                format!(
                    "({} {} {})",
                    op,
                    self.print_node(left, indent),
                    self.print_node(right, indent)
                )
            }
            Node::Unary { op, operand } => format!("({} {})", op, self.print_node(operand, indent)),
            Node::Postfix { op, operand } => format!("({} {})", self.print_node(operand, indent), op),
            Node::Array(entries) => self.print_array(entries, indent),
            Node::PipeCall {
                value,
                function,
                args,
            } => {
                let head = [self.print_node(value, indent), function.clone()];
                self.print_form("|", &head, args, indent)
            }
            Node::Index { value, index } => format!(
                "([] {} {})",
                self.print_node(value, indent),
                self.print_node(index, indent)
            ),
            Node::Call { callee, args } => {
                self.print_form("()", &[self.print_node(callee, indent)], args, indent)
            }
        }
    }

    fn print_form(&self, name: &str, head: &[String], args: &[Node], indent: usize) -> String {
        if head.is_empty() && args.is_empty() {
            return format!("({})", name);
        }

        let parts: Vec<String> = head
            .iter()
            .cloned()
            .chain(args.iter().map(|arg| self.print_node(arg, indent)))
            .collect();
        format!("({} {})", name, parts.join(" "))
    }

    fn print_literal(&self, literal: &Literal) -> String {
        match literal {
            Literal::String(s) => format!("\"{}\"", self.escape_string(s)),
            other => other.to_string(),
        }
    }

    fn print_array(&self, entries: &[crate::ast::ArrayEntry], indent: usize) -> String {
        if entries.is_empty() {
            return "[]".to_string();
        }

        let items: Vec<String> = entries
            .iter()
            .map(|entry| {
                format!(
                    "{} => {}",
                    entry.key,
                    self.print_node(&entry.value, indent + 1)
                )
            })
            .collect();

        if self.multiline_arrays {
            let mut result = "[\n".to_string();
            for item in &items {
                result.push_str(&self.indent(indent + 1));
                result.push_str(item);
                result.push_str(",\n");
            }
            result.push_str(&self.indent(indent));
            result.push(']');
            result
        } else {
            format!("[{}]", items.join(", "))
        }
    }

    fn indent(&self, level: usize) -> String {
        "  ".repeat(level)
    }

    fn escape_string(&self, s: &str) -> String {
        s.chars()
            .flat_map(|c| match c {
                '"' => vec!['\\', '"'],
                '\\' => vec!['\\', '\\'],
                '\n' => vec!['\\', 'n'],
                '\r' => vec!['\\', 'r'],
                '\t' => vec!['\\', 't'],
                c if c.is_control() => format!("\\u{:04x}", c as u32).chars().collect(),
                c => vec![c],
            })
            .collect()
    }
}

/// Renders a node on a single line.
pub fn to_sexpr(node: &Node) -> String {
    NodePrinter::new(false).print(node)
}

/// Renders a node with inline arrays spread over several lines.
pub fn to_sexpr_pretty(node: &Node) -> String {
    NodePrinter::new(true).print(node)
}
