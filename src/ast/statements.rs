use crate::ast::Node;

/// Template statement item.
///
/// A compiled template is a sequence of these, interleaving literal text
/// with parsed expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    /// Literal text copied to the output verbatim
    Text(String),

    /// Expression whose value is written to the output
    ///
    /// # Example
    /// ```text
    /// Hello, {{ user.name | upper }}!
    /// ```
    Output(Node),

    /// Expression evaluated for its effect only
    ///
    /// # Example
    /// ```text
    /// {? total = 0; count += 1 ?}
    /// ```
    Eval(Node),

    /// Named block with an optional body
    ///
    /// # Examples
    /// ```text
    /// <<#if(user)>>Welcome back<</>>
    /// <<#include('footer')/>>
    /// ```
    Block {
        name: String,
        args: Vec<Node>,
        body: Option<Vec<Item>>,
    },
}
