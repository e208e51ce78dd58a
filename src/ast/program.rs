use crate::ast::Item;

/// Compiled template.
///
/// Produced by the [`Compiler`](crate::Compiler) and persisted through
/// [`convert`](crate::convert).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    /// Top-level items in source order
    pub items: Vec<Item>,
}

impl Program {
    pub fn new(items: Vec<Item>) -> Self {
        Program { items }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
