//! Documentation content for the plate CLI

use super::CliError;

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Syntax,
    Delimiters,
    Operators,
    Blocks,
    Arrays,
}

impl DocCategory {
    /// Parse category name from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "syntax" => Some(Self::Syntax),
            "delimiters" | "delimiter" | "tags" => Some(Self::Delimiters),
            "operators" | "ops" | "precedence" => Some(Self::Operators),
            "blocks" | "block" => Some(Self::Blocks),
            "arrays" | "array" => Some(Self::Arrays),
            _ => None,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r#"PLATE DOCUMENTATION

Plate templates are plain text with embedded code regions. The compiler turns
a template into a list of items (text, output, eval, block) whose expressions
are parsed by a table-driven operator-precedence parser.

DOCUMENTATION CATEGORIES

  syntax            Literals, names, globals, strings, and comments
  delimiters        The code regions: {{ }}, {? ?}, << >>, and {* *}
  operators         Prefix, infix, and postfix operators by precedence level
  blocks            #name(args) blocks, block bodies, and self-closing blocks
  arrays            Array literals and how their keys are assigned

QUICK REFERENCE

  {{ expr }}        Output an expression
  {? a; b ?}        Evaluate statements
  <<#name(x)>>      Open a block, closed by <</>>
  <<#name(x)/>>     Self-closing block
  {* ... *}         Template comment
  x | f(1)          Pipe call
  a[0](1, 2)        Index, then call

Run 'plate doc <category>' for detailed documentation.
"#
}

/// Get documentation for a specific category
pub fn get_doc_category(name: &str) -> Result<&'static str, CliError> {
    match DocCategory::from_str(name) {
        Some(DocCategory::Syntax) => Ok(SYNTAX_DOC),
        Some(DocCategory::Delimiters) => Ok(DELIMITERS_DOC),
        Some(DocCategory::Operators) => Ok(OPERATORS_DOC),
        Some(DocCategory::Blocks) => Ok(BLOCKS_DOC),
        Some(DocCategory::Arrays) => Ok(ARRAYS_DOC),
        None => Err(CliError::UnknownCategory(name.to_string())),
    }
}

const SYNTAX_DOC: &str = r#"SYNTAX - Values and Names

LITERALS
  null, true, false
    Keyword literals, lowercase only.

  42, 3.5
    Numbers. A number without a dot is an integer; with a dot it is a float.

  "text", 'text'
    Strings in either quote. Backslash escapes:
      \n \r \t \\ \" \'
    Any other escaped character keeps its backslash.

    Constraints:
      - A string must end before the template ends
      - Strings may span lines

NAMES
  user
    A local variable. Identifiers start with a letter or underscore.

  $config
    A global. A bare $ is the global scope itself.

  user.name
    Member access, an infix operator at the highest level.

GROUPING
  (a + b) * c
    Parentheses override precedence.

COMMENTS
  {* template comment *}
    Removed from text. Never produces output.

  // line comment
  /* block comment */
    Allowed between tokens inside code regions.
"#;

const DELIMITERS_DOC: &str = r#"DELIMITERS - Code Regions

OUTPUT
  {{ expr }}
    Compiles to one output item holding the expression.

    Example:
      Hello {{ user.name }}!
      => text "Hello ", output (. user name), text "!"

EVAL
  {? stmt; stmt ?}
    Each statement becomes an eval item. Empty statements are skipped.

    Example:
      {? total = 0; count += 1 ?}

BLOCKS
  << #name(args) >> ... <</>>
  << #name(args) />>
    See 'plate doc blocks'.

LINE ENDINGS
  \r\n, \n\r, and \r are all read as \n. Line numbers in error messages
  count these normalized newlines.
"#;

const OPERATORS_DOC: &str = r#"OPERATORS - Precedence Levels

Higher levels bind tighter. All infix operators are left-associative.

INFIX
  1   =  +=  -=  *=  /=          Assignment
  2   ??                         Null coalescing
  3   or                         Logical or
  4   xor                        Logical exclusive or
  5   and                        Logical and
  6   == === != !== >= <= < >    Comparison
  7   +  -                       Additive
  8   *  /                       Multiplicative
  9   ^                          Power
  11  .                          Member access

PREFIX
  10  +  -  !  not               Unary
  11  $                          Global

  A prefix operator binds operands at its own level, so
    -2 ^ 2   =>  (^ (- 2) 2)

POSTFIX
  10  x | f(args)                Pipe call, args optional
  10  a[index]                   Index
  10  f(args)                    Call, args may be empty

  Postfix operators chain left to right:
    x | upper | truncate(10)
    a[0](1, 2)

WORD OPERATORS
  and, or, xor, not are read as operators, not identifiers.
"#;

const BLOCKS_DOC: &str = r#"BLOCKS - Named Blocks

EXPRESSION FORM
  #name(arg, arg)
    A block node. The argument list holds at least one expression.

  #name
    A block without arguments.

TEMPLATE FORM
  <<#if(user)>>Welcome back<</>>
    A block item with a body. The body is compiled as a template and may
    hold text, output, eval, and nested blocks.

  <<#include("header")/>>
    A self-closing block item without a body.

    Constraints:
      - The region after << must hold a block expression
      - Every opened block needs a matching <</>>
"#;

const ARRAYS_DOC: &str = r#"ARRAYS - Array Literals

ELEMENTS
  [1, 2, 3]
    Elements without a key get the next integer index, starting at 0.

KEYED ELEMENTS
  ["a" => 1, "b" => 2]
    Keys must be literal constants.

KEY RULES
  - A string holding a canonical integer ("7", "-3") becomes that integer
  - A float key is truncated to an integer
  - true is 1, false is 0, null is ""
  - A repeated key replaces the earlier value in place
  - After an integer key n, the next unkeyed element gets n + 1

  Example:
    [5 => "a", "b", "5" => "c"]
    =>  [5 => "c", 6 => "b"]
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_aliases() {
        assert_eq!(DocCategory::from_str("OPS"), Some(DocCategory::Operators));
        assert_eq!(DocCategory::from_str("block"), Some(DocCategory::Blocks));
        assert_eq!(DocCategory::from_str("queries"), None);
    }

    #[test]
    fn test_unknown_category() {
        assert!(matches!(
            get_doc_category("nope"),
            Err(CliError::UnknownCategory(name)) if name == "nope"
        ));
    }
}
