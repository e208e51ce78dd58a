use std::fmt;

/// Compile-time constant produced only by literal syntax.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// `null`
    Null,

    /// `true` / `false`
    Boolean(bool),

    /// Integer number
    ///
    /// # Example
    /// ```text
    /// 42
    /// ```
    Integer(i64),

    /// Fractional number, or an integer too large for `i64`
    ///
    /// # Example
    /// ```text
    /// 3.14
    /// ```
    Float(f64),

    /// String literal with escapes applied
    String(String),
}

impl Literal {
    /// Interprets scanned number text.
    ///
    /// The scanner accepts any run of digits and dots, so `1.2.3` is possible;
    /// only the leading numeric prefix (`1.2`) is used.
    pub fn from_number(text: &str) -> Literal {
        let numeric = match text.match_indices('.').nth(1) {
            Some((second_dot, _)) => &text[..second_dot],
            None => text,
        };

        if !numeric.contains('.') {
            if let Ok(n) = numeric.parse::<i64>() {
                return Literal::Integer(n);
            }
        }

        Literal::Float(numeric.parse::<f64>().unwrap_or(0.0))
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => f.write_str("null"),
            Literal::Boolean(b) => write!(f, "{}", b),
            Literal::Integer(n) => write!(f, "{}", n),
            Literal::Float(n) => write!(f, "{:?}", n),
            Literal::String(s) => write!(f, "{:?}", s),
        }
    }
}

/// Key of an inline array entry after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArrayKey {
    Index(i64),
    Name(String),
}

impl ArrayKey {
    /// Normalizes a literal used before `=>`.
    ///
    /// Booleans become `0`/`1`, floats truncate toward zero, `null` becomes
    /// the empty name, and strings spelling a canonical decimal integer
    /// (`"7"`, `"-3"`, but not `"07"`) become integer keys.
    pub fn from_literal(literal: &Literal) -> ArrayKey {
        match literal {
            Literal::Null => ArrayKey::Name(String::new()),
            Literal::Boolean(b) => ArrayKey::Index(i64::from(*b)),
            Literal::Integer(n) => ArrayKey::Index(*n),
            Literal::Float(n) => ArrayKey::Index(n.trunc() as i64),
            Literal::String(s) => match canonical_integer(s) {
                Some(n) => ArrayKey::Index(n),
                None => ArrayKey::Name(s.clone()),
            },
        }
    }
}

fn canonical_integer(s: &str) -> Option<i64> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if (digits.len() > 1 && digits.starts_with('0')) || s == "-0" {
        return None;
    }
    s.parse().ok()
}

impl fmt::Display for ArrayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayKey::Index(n) => write!(f, "{}", n),
            ArrayKey::Name(s) => write!(f, "{:?}", s),
        }
    }
}

/// One `key => value` pair of an inline array.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayEntry {
    pub key: ArrayKey,
    pub value: Node,
}

/// Collects inline array entries with associative-array key rules:
/// positional entries take the next free integer key, and a repeated key
/// replaces the earlier value without moving it.
#[derive(Debug, Default)]
pub(crate) struct ArrayBuilder {
    entries: Vec<ArrayEntry>,
    next_index: i64,
}

impl ArrayBuilder {
    pub(crate) fn push(&mut self, value: Node) {
        let key = ArrayKey::Index(self.next_index);
        self.insert(key, value);
    }

    pub(crate) fn insert(&mut self, key: ArrayKey, value: Node) {
        if let ArrayKey::Index(n) = key {
            if n >= self.next_index {
                self.next_index = n.saturating_add(1);
            }
        }

        match self.entries.iter_mut().find(|entry| entry.key == key) {
            Some(entry) => entry.value = value,
            None => self.entries.push(ArrayEntry { key, value }),
        }
    }

    pub(crate) fn finish(self) -> Vec<ArrayEntry> {
        self.entries
    }
}

/// Abstract Syntax Tree node produced by the expression parser.
///
/// Nodes are immutable once built and own their children.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Constant value
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 'hello'
    /// null
    /// ```
    Literal(Literal),

    /// Lookup in the run-time variable scope
    ///
    /// # Example
    /// ```text
    /// user
    /// ```
    Local(String),

    /// Lookup in the global scope; `None` is the whole global scope
    ///
    /// # Examples
    /// ```text
    /// $site
    /// $
    /// ```
    Global(Option<String>),

    /// Named directive invocation, interpreted by an external handler
    ///
    /// # Examples
    /// ```text
    /// #include('header')
    /// #else
    /// ```
    Block { name: String, args: Vec<Node> },

    /// Infix operation
    Binary {
        op: String,
        left: Box<Node>,
        right: Box<Node>,
    },

    /// Prefix operation
    ///
    /// # Examples
    /// ```text
    /// -x
    /// not done
    /// ```
    Unary { op: String, operand: Box<Node> },

    /// Plain postfix operation from a custom operator table
    Postfix { op: String, operand: Box<Node> },

    /// Inline array
    ///
    /// # Example
    /// ```text
    /// [1, 2, 'x' => 3]
    /// ```
    Array(Vec<ArrayEntry>),

    /// Value piped into a named function
    ///
    /// # Examples
    /// ```text
    /// name | upper
    /// text | truncate(10, '...')
    /// ```
    PipeCall {
        value: Box<Node>,
        function: String,
        args: Vec<Node>,
    },

    /// Subscript access
    ///
    /// # Example
    /// ```text
    /// items[0]
    /// ```
    Index { value: Box<Node>, index: Box<Node> },

    /// Direct invocation
    ///
    /// # Example
    /// ```text
    /// format(a, b)
    /// ```
    Call { callee: Box<Node>, args: Vec<Node> },
}

impl Node {
    pub fn local(name: impl Into<String>) -> Node {
        Node::Local(name.into())
    }

    pub fn binary(op: impl Into<String>, left: Node, right: Node) -> Node {
        Node::Binary {
            op: op.into(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(op: impl Into<String>, operand: Node) -> Node {
        Node::Unary {
            op: op.into(),
            operand: Box::new(operand),
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Node::Literal(literal) => Some(literal),
            _ => None,
        }
    }

    /// Short tag naming the node shape, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Literal(_) => "literal",
            Node::Local(_) => "local reference",
            Node::Global(_) => "global reference",
            Node::Block { .. } => "block",
            Node::Binary { .. } => "binary operation",
            Node::Unary { .. } => "unary operation",
            Node::Postfix { .. } => "postfix operation",
            Node::Array(_) => "array literal",
            Node::PipeCall { .. } => "pipe call",
            Node::Index { .. } => "index",
            Node::Call { .. } => "call",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_prefix_is_used() {
        assert_eq!(Literal::from_number("42"), Literal::Integer(42));
        assert_eq!(Literal::from_number("1.5"), Literal::Float(1.5));
        assert_eq!(Literal::from_number("1.2.3"), Literal::Float(1.2));
        assert_eq!(Literal::from_number("7."), Literal::Float(7.0));
        assert_eq!(
            Literal::from_number("99999999999999999999"),
            Literal::Float(1e20)
        );
    }

    #[test]
    fn string_keys_that_look_like_integers() {
        let key = |s: &str| ArrayKey::from_literal(&Literal::String(s.to_string()));
        assert_eq!(key("7"), ArrayKey::Index(7));
        assert_eq!(key("-3"), ArrayKey::Index(-3));
        assert_eq!(key("07"), ArrayKey::Name("07".to_string()));
        assert_eq!(key("-0"), ArrayKey::Name("-0".to_string()));
        assert_eq!(key("x"), ArrayKey::Name("x".to_string()));
    }

    #[test]
    fn builder_continues_after_largest_index() {
        let mut builder = ArrayBuilder::default();
        builder.push(Node::local("a"));
        builder.insert(ArrayKey::Index(5), Node::local("b"));
        builder.push(Node::local("c"));
        let keys: Vec<_> = builder.finish().into_iter().map(|e| e.key).collect();
        assert_eq!(
            keys,
            vec![ArrayKey::Index(0), ArrayKey::Index(5), ArrayKey::Index(6)]
        );
    }
}
