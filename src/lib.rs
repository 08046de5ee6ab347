//! Cellar - A Scheme-subset interpreter with a store-based environment model
//!
//! This crate implements a small expression language with first-class
//! procedures, lexical scoping, explicit mutation (`set!`), and top-level
//! definitions that support mutual recursion. The defining design decision is
//! the separation of the *environment* (a structural, mostly immutable
//! name-to-address mapping) from the *store* (an append-only sequence of
//! mutable cells holding the actual runtime values):
//!
//! ```scheme
//! (define make-counter
//!   (lambda ()
//!     (let ((n 0))
//!       (lambda () (set! n (+ n 1)) n))))
//! ```
//!
//! Every binding occurrence allocates one store cell; `set!` replaces the
//! contents of that cell in place, observable through every closure that
//! captured the binding. Top-level definitions append to a single mutable
//! global frame, so a closure created before a later `define` still sees that
//! definition when it finally runs - this is what makes mutually recursive
//! top-level procedures work without a dedicated `letrec` form.
//!
//! ## Modules
//!
//! - `scheme`: S-expression parsing and special-form compilation from text
//! - `ast`: the expression-shape tree the evaluator dispatches over
//! - `value`: runtime values, including closures and quoted data
//! - `store`: the append-only cell store, addressed by integer index
//! - `env`: the global frame and the chain of immutable local frames
//! - `evaluator`: the recursive tree-walking evaluator and program driver
//! - `primitives`: the fixed table of builtin operations
//!
//! ## Evaluation semantics
//!
//! Evaluation is applicative-order and strictly left to right: operator
//! before operands, `let` bindings in source order, sequence elements front
//! to back. Any value other than `#f` counts as true in a conditional.
//! All failures are ordinary `Result` values that short-circuit the
//! enclosing evaluation; store mutations that already happened before a
//! failure are not rolled back.

use std::fmt;

/// Maximum parsing depth to prevent stack overflow from deeply nested input
pub const MAX_PARSE_DEPTH: usize = 32;

/// Maximum evaluation depth to prevent stack overflow in recursive evaluation.
/// Depth accumulates through procedure application, so this bounds recursion
/// depth as well as expression nesting.
pub const MAX_EVAL_DEPTH: usize = 256;

/// Categorizes the different kinds of parsing errors.
#[derive(Debug, PartialEq, Clone)]
pub enum ParseErrorKind {
    /// Invalid or unexpected syntax (bad tokens, malformed expressions)
    InvalidSyntax,
    /// Input ended before the expression was complete (EOF, unterminated string, unclosed parens)
    Incomplete,
    /// Expression nesting exceeded the maximum parse depth
    TooDeeplyNested,
    /// Extra input found after a complete, valid expression
    TrailingContent,
    /// A special form used with the wrong shape (non-symbol `set!` target, etc.)
    MalformedSpecialForm,
}

/// A structured error providing detailed information about a parsing failure.
#[derive(Debug, PartialEq, Clone)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    /// Context snippet from the input showing where the error occurred (max 100 chars)
    pub context: Option<String>,
}

impl ParseError {
    /// Create a simple ParseError with a kind and message but no context
    pub fn from_message(kind: ParseErrorKind, message: impl Into<String>) -> Self {
        ParseError {
            kind,
            message: message.into(),
            context: None,
        }
    }

    /// Create a ParseError with context extracted from input at a given offset
    pub fn with_context(
        kind: ParseErrorKind,
        message: impl Into<String>,
        input: &str,
        error_offset: usize,
    ) -> Self {
        const MAX_CONTEXT: usize = 100;

        // Show some context before the error position as well
        let context_start = error_offset.saturating_sub(20);
        let context_str: String = input
            .chars()
            .skip(context_start)
            .take(MAX_CONTEXT)
            .collect();

        let mut display_context = String::new();
        if context_start > 0 {
            display_context.push_str("[...]");
        }
        display_context.push_str(&context_str);
        if context_start + context_str.len() < input.len() {
            display_context.push_str("[...]");
        }

        // Replace newlines with visible markers for better error display
        let display_context = display_context.replace('\n', "\\n").replace('\r', "");

        ParseError {
            kind,
            message: message.into(),
            context: Some(display_context),
        }
    }
}

/// Error types for the interpreter
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    ParseError(ParseError),
    EvalError(String),
    TypeError(String),
    /// A name not found anywhere in the environment chain
    UnboundVariable(String),
    /// A store address outside the current bounds of the store. Normal
    /// lookups only ever produce addresses the store already contains, so
    /// this indicates an internal inconsistency.
    InvalidAddress(usize),
    /// An application whose operator is neither a primitive nor a closure
    NotAProcedure(String),
    /// A program, procedure body, or `let` body with zero forms
    EmptyBody,
    ArityError {
        expected: usize,
        got: usize,
        expression: Option<String>, // Optional expression context
    },
}

impl Error {
    /// Create an ArityError without expression context
    pub fn arity_error(expected: usize, got: usize) -> Self {
        Error::ArityError {
            expected,
            got,
            expression: None,
        }
    }

    /// Create an ArityError with expression context
    pub fn arity_error_with_expr(expected: usize, got: usize, expression: String) -> Self {
        Error::ArityError {
            expected,
            got,
            expression: Some(expression),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::ParseError(e) => {
                write!(f, "ParseError: {}", e.message)?;
                if let Some(context) = &e.context {
                    write!(f, "\nContext: {context}")?;
                }
                Ok(())
            }
            Error::EvalError(msg) => write!(f, "EvaluationError: {msg}"),
            Error::TypeError(msg) => write!(f, "Type error: {msg}"),
            Error::UnboundVariable(var) => write!(f, "Unbound variable: {var}"),
            Error::InvalidAddress(address) => write!(f, "Invalid store address: {address}"),
            Error::NotAProcedure(what) => write!(f, "Not a procedure: {what}"),
            Error::EmptyBody => write!(f, "Empty program or body is not evaluable"),
            Error::ArityError {
                expected,
                got,
                expression,
            } => match expression {
                Some(expr) => write!(
                    f,
                    "ArityError: expression {expr}: expected {expected} arguments, got {got}"
                ),
                None => write!(
                    f,
                    "ArityError: procedure expected {expected} arguments but got {got}"
                ),
            },
        }
    }
}

pub mod ast;
pub mod env;
pub mod evaluator;
pub mod primitives;
pub mod scheme;
pub mod store;
pub mod value;
