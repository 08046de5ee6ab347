//! Expression-shape tree the evaluator dispatches over.
//!
//! The parser (see `scheme`) produces [`Expr`] values; the evaluator walks
//! them recursively. Expression shapes and runtime values are deliberately
//! separate types: an [`Expr`] is static program structure, a
//! [`crate::value::Value`] is what evaluation produces. The two meet in two
//! places only - a quoted literal embeds the datum it evaluates to, and a
//! closure value embeds the body expressions it will evaluate when applied.

use crate::primitives::PrimDef;
use crate::value::Value;

/// Type alias for number values in the interpreter
pub(crate) type NumberType = i64;

/// Allowed non-alphanumeric characters in symbol names
/// Most represent mathematical symbols or predicates ("?"), "!" supported for `set!`
pub(crate) const SYMBOL_SPECIAL_CHARS: &str = "+-*/<>=!?_$";

/// Check if a string is a valid symbol name
/// Valid: non-empty, no leading digit, no "-digit" prefix, alphanumeric + SYMBOL_SPECIAL_CHARS
/// Note: This function is tested as part of the parser tests in scheme.rs
pub(crate) fn is_valid_symbol(name: &str) -> bool {
    let mut chars = name.chars();

    match chars.next() {
        None => false, // name is empty
        Some(first_char) => {
            if first_char.is_ascii_digit() {
                return false;
            }

            if first_char == '-' {
                if let Some(second_char) = chars.next() {
                    if second_char.is_ascii_digit() {
                        return false;
                    }
                }
            }

            // Check all characters are valid
            // The first character is checked here again, but it's a cheap operation.
            name.chars()
                .all(|c| c.is_alphanumeric() || SYMBOL_SPECIAL_CHARS.contains(c))
        }
    }
}

/// One `let` binding: a name and the expression whose value it binds.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub name: String,
    pub expr: Expr,
}

/// The closed set of expression shapes.
///
/// `Define` is a top-level form, not an expression: the parser only accepts
/// it at the top level of a program, and the evaluator rejects it
/// defensively should one ever reach expression position.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Number literal
    Num(NumberType),
    /// Boolean literal
    Bool(bool),
    /// String literal
    Str(String),
    /// Quoted datum - evaluates to the embedded value unchanged
    Lit(Value),
    /// Reference to a primitive operation, resolved at parse time
    Prim(&'static PrimDef),
    /// Variable reference, resolved through the environment chain at run time
    VarRef(String),
    /// Conditional; only the taken branch is evaluated
    If {
        test: Box<Expr>,
        then: Box<Expr>,
        alt: Box<Expr>,
    },
    /// Procedure literal (`lambda`); evaluates to a closure capturing the
    /// current environment
    Proc { params: Vec<String>, body: Vec<Expr> },
    /// Non-recursive `let`: binding right-hand sides are evaluated in the
    /// enclosing environment and are not visible to each other
    Let {
        bindings: Vec<Binding>,
        body: Vec<Expr>,
    },
    /// Mutation of an existing binding's store cell
    Set { name: String, expr: Box<Expr> },
    /// Application of an operator expression to operand expressions
    App { rator: Box<Expr>, rands: Vec<Expr> },
    /// Top-level definition, extending the global frame
    Define { name: String, expr: Box<Expr> },
}
