use std::fmt;

/// Classification of the token currently held by the [`Lexer`](crate::Lexer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TokenKind {
    /// No token: end of input was reached.
    #[default]
    None,

    /// Identifier
    ///
    /// Must start with an ASCII letter or underscore, followed by letters,
    /// digits, or underscores.
    ///
    /// # Examples
    /// ```text
    /// user
    /// item_count
    /// true
    /// ```
    Identifier,

    /// Operator run or single structural character
    ///
    /// The words `and`, `or`, `xor` and `not` are operators too.
    ///
    /// # Examples
    /// ```text
    /// +=
    /// ===
    /// (
    /// and
    /// ```
    Operator,

    /// Quoted string with escapes already applied
    ///
    /// # Examples
    /// ```text
    /// "hello"
    /// 'it\'s'
    /// ```
    String,

    /// Unsigned decimal number, kept as scanned text
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 3.14
    /// ```
    Number,

    /// Run of literal template text outside any code region
    Text,

    /// Mode-switching delimiter
    ///
    /// One of `{{`, `{?`, `?}`, `}}`, `<<`, `>>`, `/>>` or `;`.
    Escape,

    /// Any character the code scanner does not recognize
    Unknown,
}

impl TokenKind {
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::None => "end of input",
            TokenKind::Identifier => "identifier",
            TokenKind::Operator => "operator",
            TokenKind::String => "string",
            TokenKind::Number => "number",
            TokenKind::Text => "text",
            TokenKind::Escape => "delimiter",
            TokenKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The single live token: a kind plus its text payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Token {
            kind,
            text: text.into(),
        }
    }

    pub fn is(&self, kind: TokenKind, text: &str) -> bool {
        self.kind == kind && self.text == text
    }

    pub fn is_operator(&self, text: &str) -> bool {
        self.is(TokenKind::Operator, text)
    }

    pub fn is_escape(&self, text: &str) -> bool {
        self.is(TokenKind::Escape, text)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::None => f.write_str("end of input"),
            kind => write!(f, "{} \"{}\"", kind, self.text),
        }
    }
}
