//! Node and Program <-> `serde_json::Value` conversion
//!
//! Nodes map to tagged arrays whose first element names the shape:
//!
//! ```text
//! ["r", 42]                          literal
//! ["l", "name"]                      local reference
//! ["g", "site"] / ["g", null]        global reference
//! ["b", "name", [args]]              block
//! ["i", "+", left, right]            binary
//! ["e", "-", operand]                unary
//! ["p", "!", operand]                postfix
//! ["a", [[0, value], ["x", value]]]  inline array
//! ["|", value, "upper", [args]]      pipe call
//! ["[", value, index]                index
//! ["(", callee, [args]]              call
//! ```
//!
//! Program items are a plain string for text, `["o", node]` for output,
//! `["x", node]` for eval and `["B", "name", [args], [body] | null]` for
//! blocks, wrapped as `{"format": 1, "items": [...]}`.

use serde_json::{json, Number, Value};

use crate::ast::{ArrayEntry, ArrayKey, Item, Literal, Node, Program};

/// Version tag written into serialized programs.
pub const FORMAT_VERSION: u64 = 1;

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("unknown tag {0:?}")]
    UnknownTag(String),

    #[error("expected {expected}, found {found}")]
    InvalidShape { expected: &'static str, found: String },

    #[error("number {0} cannot be stored")]
    NonFiniteNumber(f64),

    #[error("unsupported program format {0}")]
    UnsupportedFormat(String),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn invalid(expected: &'static str, found: &Value) -> ConvertError {
    let mut found = found.to_string();
    if found.len() > 60 {
        let cut = (0..=60).rev().find(|&i| found.is_char_boundary(i)).unwrap_or(0);
        found.truncate(cut);
        found.push_str("...");
    }
    ConvertError::InvalidShape { expected, found }
}

fn literal_to_json(literal: &Literal) -> Result<Value, ConvertError> {
    Ok(match literal {
        Literal::Null => Value::Null,
        Literal::Boolean(b) => Value::Bool(*b),
        Literal::Integer(n) => Value::Number((*n).into()),
        Literal::Float(n) => Number::from_f64(*n)
            .map(Value::Number)
            .ok_or(ConvertError::NonFiniteNumber(*n))?,
        Literal::String(s) => Value::String(s.clone()),
    })
}

fn json_to_literal(value: &Value) -> Result<Literal, ConvertError> {
    match value {
        Value::Null => Ok(Literal::Null),
        Value::Bool(b) => Ok(Literal::Boolean(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(Literal::Integer(i)),
            None => n
                .as_f64()
                .map(Literal::Float)
                .ok_or_else(|| invalid("number", value)),
        },
        Value::String(s) => Ok(Literal::String(s.clone())),
        _ => Err(invalid("literal value", value)),
    }
}

fn nodes_to_json(nodes: &[Node]) -> Result<Value, ConvertError> {
    Ok(Value::Array(
        nodes.iter().map(node_to_json).collect::<Result<_, _>>()?,
    ))
}

/// Convert a Node to its tagged-array form.
pub fn node_to_json(node: &Node) -> Result<Value, ConvertError> {
    Ok(match node {
        Node::Literal(literal) => json!(["r", literal_to_json(literal)?]),
        Node::Local(name) => json!(["l", name]),
        Node::Global(name) => json!(["g", name]),
        Node::Block { name, args } => json!(["b", name, nodes_to_json(args)?]),
        Node::Binary { op, left, right } => {
            json!(["i", op, node_to_json(left)?, node_to_json(right)?])
        }
        Node::Unary { op, operand } => json!(["e", op, node_to_json(operand)?]),
        Node::Postfix { op, operand } => json!(["p", op, node_to_json(operand)?]),
        Node::Array(entries) => {
            let entries = entries
                .iter()
                .map(|entry| -> Result<Value, ConvertError> {
                    let key = match &entry.key {
                        ArrayKey::Index(n) => json!(n),
                        ArrayKey::Name(s) => json!(s),
                    };
                    Ok(json!([key, node_to_json(&entry.value)?]))
                })
                .collect::<Result<Vec<_>, ConvertError>>()?;
            json!(["a", entries])
        }
        Node::PipeCall {
            value,
            function,
            args,
        } => json!(["|", node_to_json(value)?, function, nodes_to_json(args)?]),
        Node::Index { value, index } => {
            json!(["[", node_to_json(value)?, node_to_json(index)?])
        }
        Node::Call { callee, args } => json!(["(", node_to_json(callee)?, nodes_to_json(args)?]),
    })
}

fn tagged<'a>(value: &'a Value, what: &'static str) -> Result<(&'a str, &'a [Value]), ConvertError> {
    match value.as_array().map(Vec::as_slice) {
        Some([Value::String(tag), rest @ ..]) => Ok((tag.as_str(), rest)),
        _ => Err(invalid(what, value)),
    }
}

fn string(value: &Value) -> Result<String, ConvertError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| invalid("string", value))
}

fn json_to_nodes(value: &Value) -> Result<Vec<Node>, ConvertError> {
    value
        .as_array()
        .ok_or_else(|| invalid("argument list", value))?
        .iter()
        .map(json_to_node)
        .collect()
}

fn boxed(value: &Value) -> Result<Box<Node>, ConvertError> {
    json_to_node(value).map(Box::new)
}

fn json_to_entry(value: &Value) -> Result<ArrayEntry, ConvertError> {
    let Some([key, node]) = value.as_array().map(Vec::as_slice) else {
        return Err(invalid("[key, value] array entry", value));
    };
    let key = match key {
        Value::String(s) => ArrayKey::Name(s.clone()),
        Value::Number(n) => ArrayKey::Index(n.as_i64().ok_or_else(|| invalid("integer key", key))?),
        _ => return Err(invalid("array key", key)),
    };
    Ok(ArrayEntry {
        key,
        value: json_to_node(node)?,
    })
}

/// Convert a tagged array back to a Node.
pub fn json_to_node(value: &Value) -> Result<Node, ConvertError> {
    let (tag, rest) = tagged(value, "tagged node array")?;

    let node = match (tag, rest) {
        ("r", [literal]) => Node::Literal(json_to_literal(literal)?),
        ("l", [name]) => Node::Local(string(name)?),
        ("g", [Value::Null]) => Node::Global(None),
        ("g", [name]) => Node::Global(Some(string(name)?)),
        ("b", [name, args]) => Node::Block {
            name: string(name)?,
            args: json_to_nodes(args)?,
        },
        ("i", [op, left, right]) => Node::Binary {
            op: string(op)?,
            left: boxed(left)?,
            right: boxed(right)?,
        },
        ("e", [op, operand]) => Node::Unary {
            op: string(op)?,
            operand: boxed(operand)?,
        },
        ("p", [op, operand]) => Node::Postfix {
            op: string(op)?,
            operand: boxed(operand)?,
        },
        ("a", [entries]) => Node::Array(
            entries
                .as_array()
                .ok_or_else(|| invalid("array entries", entries))?
                .iter()
                .map(json_to_entry)
                .collect::<Result<_, _>>()?,
        ),
        ("|", [value, function, args]) => Node::PipeCall {
            value: boxed(value)?,
            function: string(function)?,
            args: json_to_nodes(args)?,
        },
        ("[", [value, index]) => Node::Index {
            value: boxed(value)?,
            index: boxed(index)?,
        },
        ("(", [callee, args]) => Node::Call {
            callee: boxed(callee)?,
            args: json_to_nodes(args)?,
        },
        ("r" | "l" | "g" | "b" | "i" | "e" | "p" | "a" | "|" | "[" | "(", _) => {
            return Err(invalid("node with matching arity", value));
        }
        (tag, _) => return Err(ConvertError::UnknownTag(tag.to_string())),
    };

    Ok(node)
}

fn items_to_json(items: &[Item]) -> Result<Value, ConvertError> {
    let items = items
        .iter()
        .map(|item| -> Result<Value, ConvertError> {
            Ok(match item {
                Item::Text(text) => Value::String(text.clone()),
                Item::Output(node) => json!(["o", node_to_json(node)?]),
                Item::Eval(node) => json!(["x", node_to_json(node)?]),
                Item::Block { name, args, body } => {
                    let body = match body {
                        Some(body) => items_to_json(body)?,
                        None => Value::Null,
                    };
                    json!(["B", name, nodes_to_json(args)?, body])
                }
            })
        })
        .collect::<Result<Vec<_>, ConvertError>>()?;
    Ok(Value::Array(items))
}

fn json_to_items(value: &Value) -> Result<Vec<Item>, ConvertError> {
    let items = value
        .as_array()
        .ok_or_else(|| invalid("item list", value))?;

    items
        .iter()
        .map(|item| -> Result<Item, ConvertError> {
            if let Value::String(text) = item {
                return Ok(Item::Text(text.clone()));
            }

            let (tag, rest) = tagged(item, "template item")?;
            match (tag, rest) {
                ("o", [node]) => Ok(Item::Output(json_to_node(node)?)),
                ("x", [node]) => Ok(Item::Eval(json_to_node(node)?)),
                ("B", [name, args, body]) => Ok(Item::Block {
                    name: string(name)?,
                    args: json_to_nodes(args)?,
                    body: match body {
                        Value::Null => None,
                        body => Some(json_to_items(body)?),
                    },
                }),
                ("o" | "x" | "B", _) => Err(invalid("item with matching arity", item)),
                (tag, _) => Err(ConvertError::UnknownTag(tag.to_string())),
            }
        })
        .collect()
}

/// Convert a Program to its versioned JSON envelope.
pub fn program_to_json(program: &Program) -> Result<Value, ConvertError> {
    Ok(json!({
        "format": FORMAT_VERSION,
        "items": items_to_json(&program.items)?,
    }))
}

/// Convert a versioned JSON envelope back to a Program.
pub fn json_to_program(value: &Value) -> Result<Program, ConvertError> {
    let format = value
        .get("format")
        .ok_or_else(|| invalid("program with a format field", value))?;
    if format.as_u64() != Some(FORMAT_VERSION) {
        return Err(ConvertError::UnsupportedFormat(format.to_string()));
    }

    let items = value
        .get("items")
        .ok_or_else(|| invalid("program with an items field", value))?;
    Ok(Program::new(json_to_items(items)?))
}

impl Program {
    /// Serializes to compact JSON text.
    pub fn to_json_string(&self) -> Result<String, ConvertError> {
        Ok(serde_json::to_string(&program_to_json(self)?)?)
    }

    pub fn from_json_str(json: &str) -> Result<Program, ConvertError> {
        let value: Value = serde_json::from_str(json)?;
        json_to_program(&value)
    }
}
