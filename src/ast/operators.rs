use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::ast::Node;
use crate::parser::{ParseError, Parser};

/// Custom parsing callback stored in an operator table.
///
/// Called with the operator token already consumed (infix, postfix) or with
/// the operand already parsed (prefix). Receives the left/operand node and
/// the level the operator was found at, and must consume its own closing
/// tokens.
pub type ParseRule = fn(&mut Parser, Node, u8) -> Result<Node, ParseError>;

/// What the precedence-climbing loop does with a matched operator.
#[derive(Clone, Copy)]
pub enum OperatorRule {
    /// Build the fixed-arity node for the table kind (unary, binary, postfix).
    Simple,
    /// Hand the rest of the production over to a callback.
    Custom(ParseRule),
}

impl std::fmt::Debug for OperatorRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperatorRule::Simple => f.write_str("Simple"),
            OperatorRule::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Operators grouped by precedence level.
///
/// Levels ascend from loose to tight binding. A lookup at `min_level`
/// returns the lowest level `>= min_level` holding the symbol.
#[derive(Debug, Clone, Default)]
pub struct OperatorTable {
    levels: BTreeMap<u8, Vec<(String, OperatorRule)>>,
}

impl OperatorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds plain operators at `level`.
    pub fn level(mut self, level: u8, symbols: &[&str]) -> Self {
        let ops = self.levels.entry(level).or_default();
        ops.extend(symbols.iter().map(|s| (s.to_string(), OperatorRule::Simple)));
        self
    }

    /// Adds an operator with a custom parsing rule at `level`.
    pub fn rule(mut self, level: u8, symbol: &str, rule: ParseRule) -> Self {
        self.levels
            .entry(level)
            .or_default()
            .push((symbol.to_string(), OperatorRule::Custom(rule)));
        self
    }

    pub fn find(&self, min_level: u8, symbol: &str) -> Option<(u8, OperatorRule)> {
        self.levels.range(min_level..).find_map(|(level, ops)| {
            ops.iter()
                .find(|(op, _)| op == symbol)
                .map(|(_, rule)| (*level, *rule))
        })
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.find(0, symbol).is_some()
    }
}

/// The three tables consulted by the parser.
#[derive(Debug, Clone, Default)]
pub struct OperatorTables {
    pub prefix: OperatorTable,
    pub infix: OperatorTable,
    pub postfix: OperatorTable,
}

/// Built-in operator set.
///
/// ```text
/// 1  = += -= *= /=
/// 2  ??
/// 3  or
/// 4  xor
/// 5  and
/// 6  == === != !== >= <= < >
/// 7  + -
/// 8  * /
/// 9  ^
/// 10 prefix + - ! not      postfix | [ (
/// 11 prefix $              infix .
/// ```
pub fn builtin_operators() -> &'static OperatorTables {
    static BUILTIN: LazyLock<OperatorTables> = LazyLock::new(|| OperatorTables {
        prefix: OperatorTable::new()
            .level(10, &["+", "-", "!", "not"])
            .level(11, &["$"]),
        infix: OperatorTable::new()
            .level(1, &["=", "+=", "-=", "*=", "/="])
            .level(2, &["??"])
            .level(3, &["or"])
            .level(4, &["xor"])
            .level(5, &["and"])
            .level(6, &["==", "===", "!=", "!==", ">=", "<=", "<", ">"])
            .level(7, &["+", "-"])
            .level(8, &["*", "/"])
            .level(9, &["^"])
            .level(11, &["."]),
        postfix: OperatorTable::new()
            .rule(10, "|", Parser::parse_pipe_call)
            .rule(10, "[", Parser::parse_index)
            .rule(10, "(", Parser::parse_call),
    });
    &BUILTIN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_respects_minimum_level() {
        let ops = builtin_operators();
        assert_eq!(ops.infix.find(1, "+").map(|(l, _)| l), Some(7));
        assert_eq!(ops.infix.find(7, "+").map(|(l, _)| l), Some(7));
        assert!(ops.infix.find(8, "+").is_none());
        assert!(ops.prefix.find(11, "-").is_none());
        assert!(ops.infix.find(1, "=>").is_none());
    }

    #[test]
    fn same_symbol_in_several_tables() {
        let ops = builtin_operators();
        assert!(ops.prefix.contains("-"));
        assert!(ops.infix.contains("-"));
        assert!(!ops.postfix.contains("-"));
        assert!(matches!(
            ops.postfix.find(1, "("),
            Some((10, OperatorRule::Custom(_)))
        ));
    }
}
