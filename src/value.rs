//! Runtime values produced by evaluation.
//!
//! The main enum, [`Value`], covers numbers, booleans, strings, quoted data
//! (symbols and lists), primitive-procedure tags, and closures. Ergonomic
//! helper functions such as [`val`], [`sym`], and [`nil`] are provided for
//! convenient value construction in tests, along with conversion traits for
//! common Rust types. Display follows Scheme surface syntax, so values
//! round-trip through the parser where that is meaningful.
//!
//! A closure captures its formal parameter names, its body (a sequence of
//! expressions), and the environment that was current at the point of its
//! own creation - not at the point of call. The captured environment is a
//! cheap [`crate::env::Env`] handle: local frames are `Rc`-shared and the
//! global frame is reached through the interpreter, so a closure created
//! before a later top-level definition still observes that definition.

use std::rc::Rc;

use crate::Error;
use crate::ast::{Expr, NumberType};
use crate::env::Env;
use crate::primitives::PrimDef;

/// Runtime value type of the interpreter
#[derive(Clone)]
pub enum Value {
    /// Numbers (integers only)
    Number(NumberType),
    /// Boolean values
    Bool(bool),
    /// String literals
    String(String),
    /// Symbols, appearing only inside quoted data
    Symbol(String),
    /// Lists (quoted data and list-primitive results; empty list represents nil)
    List(Vec<Value>),
    /// Primitive-procedure tag; applying it dispatches to the builtin table
    Prim(&'static PrimDef),
    /// User-defined procedure: formals, body sequence, captured environment
    Closure {
        params: Vec<String>,
        body: Rc<Vec<Expr>>,
        env: Env,
    },
    /// Unspecified values (e.g., the result of `set!`)
    /// These values never equal themselves or any other value
    Unspecified,
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(n) => write!(f, "Number({n})"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::String(s) => write!(f, "String(\"{s}\")"),
            Value::Symbol(s) => write!(f, "Symbol({s})"),
            Value::List(list) => {
                write!(f, "List(")?;
                for (i, v) in list.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v:?}")?;
                }
                write!(f, ")")
            }
            Value::Prim(op) => write!(f, "Prim({})", op.name),
            Value::Closure { params, .. } => write!(f, "Closure(params={params:?})"),
            Value::Unspecified => write!(f, "Unspecified"),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{}", if *b { "#t" } else { "#f" }),
            Value::String(s) => {
                write!(f, "\"")?;
                for ch in s.chars() {
                    match ch {
                        '"' => write!(f, "\\\"")?,
                        '\\' => write!(f, "\\\\")?,
                        '\n' => write!(f, "\\n")?,
                        '\t' => write!(f, "\\t")?,
                        '\r' => write!(f, "\\r")?,
                        c => write!(f, "{c}")?,
                    }
                }
                write!(f, "\"")
            }
            Value::Symbol(s) => write!(f, "{s}"),
            Value::List(elements) => {
                write!(f, "(")?;
                for (i, elem) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{elem}")?;
                }
                write!(f, ")")
            }
            Value::Prim(op) => write!(f, "#<primitive:{}>", op.name),
            Value::Closure { .. } => write!(f, "#<procedure>"),
            Value::Unspecified => write!(f, "#<unspecified>"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            // Primitives compare by name, not function pointer
            (Value::Prim(a), Value::Prim(b)) => a.name == b.name,
            // Closures compare by identity of their body and capture
            (
                Value::Closure {
                    params: p1,
                    body: b1,
                    env: e1,
                },
                Value::Closure {
                    params: p2,
                    body: b2,
                    env: e2,
                },
            ) => p1 == p2 && Rc::ptr_eq(b1, b2) && e1 == e2,
            (Value::Unspecified, _) | (_, Value::Unspecified) => false, // Unspecified never equals anything
            _ => false, // Different variants are never equal
        }
    }
}

impl Value {
    /// Check if a value represents nil (empty list)
    pub(crate) fn is_nil(&self) -> bool {
        matches!(self, Value::List(list) if list.is_empty())
    }
}

// From trait implementations for Value - enables .into() conversion
impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! impl_from_integer {
    ($int_type:ty) => {
        impl From<$int_type> for Value {
            fn from(n: $int_type) -> Self {
                Value::Number(n as i64)
            }
        }
    };
}

// Generate From implementations for the common integer types
impl_from_integer!(i8);
impl_from_integer!(i16);
impl_from_integer!(i32);
impl_from_integer!(NumberType); // Special case - no casting
impl_from_integer!(u8);
impl_from_integer!(u16);
impl_from_integer!(u32);

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(|x| x.into()).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(arr: [T; N]) -> Self {
        Value::List(arr.into_iter().map(|x| x.into()).collect())
    }
}

// Fallible conversion from `Value` back into the number type.

impl std::convert::TryInto<NumberType> for Value {
    type Error = Error;

    fn try_into(self) -> Result<NumberType, Error> {
        if let Value::Number(n) = self {
            Ok(n)
        } else {
            Err(Error::TypeError("expected number".into()))
        }
    }
}

/// Helper function for creating symbols - works great in mixed lists!
/// Accepts both &str and String
#[cfg_attr(not(test), expect(dead_code))]
pub(crate) fn sym<S: AsRef<str>>(name: S) -> Value {
    Value::Symbol(name.as_ref().to_owned())
}

/// Helper function for creating Values - works great in mixed lists!
/// Accepts any type that can be converted to Value
#[cfg_attr(not(test), expect(dead_code))]
pub(crate) fn val<T: Into<Value>>(value: T) -> Value {
    value.into()
}

/// Helper function for creating empty lists (nil) - follows Lisp/Scheme conventions
/// In Lisp, nil represents the empty list
#[cfg_attr(not(test), expect(dead_code))]
pub(crate) fn nil() -> Value {
    Value::List(vec![])
}
