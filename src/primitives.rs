//! The fixed table of primitive operations.
//!
//! Primitive names are resolved at parse time: a symbol that matches an
//! entry here compiles to a primitive reference, which evaluates to a
//! tagged procedure value. Application then dispatches through
//! [`apply_primitive`], which validates arity and calls the
//! implementation. Primitives receive their arguments fully evaluated; all
//! special forms (`if`, `lambda`, `let`, `set!`, `quote`, `define`) are
//! handled by the evaluator and are deliberately absent from this table.
//!
//! Arithmetic uses checked operations: overflow and division by zero are
//! evaluation errors, never panics or wrapping.

use crate::Error;
use crate::ast::NumberType;
use crate::value::Value;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Canonical signature of a primitive implementation
pub type PrimitiveFn = fn(&[Value]) -> Result<Value, Error>;

/// Expected number of arguments for a primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
    Any,
}

impl Arity {
    /// Check if the given number of arguments is valid for this arity
    pub fn validate(&self, got: usize) -> Result<(), Error> {
        let ok = match self {
            Arity::Exact(n) => got == *n,
            Arity::AtLeast(n) => got >= *n,
            Arity::Any => true,
        };
        if ok {
            Ok(())
        } else {
            let expected = match self {
                Arity::Exact(n) | Arity::AtLeast(n) => *n,
                Arity::Any => 0,
            };
            Err(Error::arity_error(expected, got))
        }
    }
}

/// Definition of one primitive operation
pub struct PrimDef {
    /// The surface identifier for this operation
    pub name: &'static str,
    /// Expected number of arguments, validated at application time
    pub arity: Arity,
    func: PrimitiveFn,
}

impl std::fmt::Debug for PrimDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PrimDef({})", self.name)
    }
}

impl PartialEq for PrimDef {
    fn eq(&self, other: &Self) -> bool {
        // Compare operations by name, which uniquely identifies them
        self.name == other.name
    }
}

/// Apply a primitive to already-evaluated argument values.
pub fn apply_primitive(op: &PrimDef, args: &[Value]) -> Result<Value, Error> {
    op.arity.validate(args.len())?;
    (op.func)(args)
}

/// Find a primitive operation by its surface identifier
pub fn find_primitive(name: &str) -> Option<&'static PrimDef> {
    PRIMITIVES_BY_NAME.get(name).copied()
}

//
// Primitive implementations
//

/// Extract numbers from every argument, or fail with a uniform type error
fn number_args(op_name: &str, args: &[Value]) -> Result<Vec<NumberType>, Error> {
    args.iter()
        .map(|arg| match arg {
            Value::Number(n) => Ok(*n),
            other => Err(Error::TypeError(format!(
                "{op_name} requires numbers, got {other}"
            ))),
        })
        .collect()
}

fn prim_add(args: &[Value]) -> Result<Value, Error> {
    let mut sum: NumberType = 0;
    for n in number_args("+", args)? {
        sum = sum
            .checked_add(n)
            .ok_or_else(|| Error::EvalError("Integer overflow in addition".into()))?;
    }
    Ok(Value::Number(sum))
}

fn prim_sub(args: &[Value]) -> Result<Value, Error> {
    let nums = number_args("-", args)?;
    match nums.as_slice() {
        [single] => single
            .checked_neg()
            .map(Value::Number)
            .ok_or_else(|| Error::EvalError("Integer overflow in negation".into())),
        [first, rest @ ..] => {
            let mut result = *first;
            for n in rest {
                result = result
                    .checked_sub(*n)
                    .ok_or_else(|| Error::EvalError("Integer overflow in subtraction".into()))?;
            }
            Ok(Value::Number(result))
        }
        [] => Err(Error::arity_error(1, 0)),
    }
}

fn prim_mul(args: &[Value]) -> Result<Value, Error> {
    let nums = number_args("*", args)?;
    let Some((first, rest)) = nums.split_first() else {
        return Err(Error::arity_error(1, 0));
    };
    let mut product = *first;
    for n in rest {
        product = product
            .checked_mul(*n)
            .ok_or_else(|| Error::EvalError("Integer overflow in multiplication".into()))?;
    }
    Ok(Value::Number(product))
}

fn prim_div(args: &[Value]) -> Result<Value, Error> {
    let nums = number_args("/", args)?;
    let Some((first, rest)) = nums.split_first() else {
        return Err(Error::arity_error(2, 0));
    };
    let mut result = *first;
    for n in rest {
        if *n == 0 {
            return Err(Error::EvalError("Division by zero".into()));
        }
        result = result
            .checked_div(*n)
            .ok_or_else(|| Error::EvalError("Integer overflow in division".into()))?;
    }
    Ok(Value::Number(result))
}

// Chained comparison: all adjacent pairs must satisfy the operator
macro_rules! numeric_comparison {
    ($name:ident, $op:tt, $op_str:expr) => {
        fn $name(args: &[Value]) -> Result<Value, Error> {
            let nums = number_args($op_str, args)?;
            Ok(Value::Bool(nums.windows(2).all(|pair| pair[0] $op pair[1])))
        }
    };
}

numeric_comparison!(prim_num_eq, ==, "=");
numeric_comparison!(prim_lt, <, "<");
numeric_comparison!(prim_gt, >, ">");
numeric_comparison!(prim_le, <=, "<=");
numeric_comparison!(prim_ge, >=, ">=");

fn prim_eq(args: &[Value]) -> Result<Value, Error> {
    match args {
        [a, b] => Ok(Value::Bool(a == b)),
        _ => Err(Error::arity_error(2, args.len())),
    }
}

fn prim_string_eq(args: &[Value]) -> Result<Value, Error> {
    match args {
        [Value::String(a), Value::String(b)] => Ok(Value::Bool(a == b)),
        [_, _] => Err(Error::TypeError("string=? requires strings".into())),
        _ => Err(Error::arity_error(2, args.len())),
    }
}

fn prim_not(args: &[Value]) -> Result<Value, Error> {
    // (not x) is #t only for #f itself; everything else counts as true
    match args {
        [value] => Ok(Value::Bool(matches!(value, Value::Bool(false)))),
        _ => Err(Error::arity_error(1, args.len())),
    }
}

fn prim_cons(args: &[Value]) -> Result<Value, Error> {
    match args {
        [first, Value::List(tail)] => {
            let mut list = Vec::with_capacity(tail.len() + 1);
            list.push(first.clone());
            list.extend_from_slice(tail);
            Ok(Value::List(list))
        }
        [_, _] => Err(Error::TypeError(
            "cons requires a list as second argument".into(),
        )),
        _ => Err(Error::arity_error(2, args.len())),
    }
}

fn prim_car(args: &[Value]) -> Result<Value, Error> {
    match args {
        [Value::List(list)] => list
            .first()
            .cloned()
            .ok_or_else(|| Error::EvalError("car of empty list".into())),
        [_] => Err(Error::TypeError("car requires a list".into())),
        _ => Err(Error::arity_error(1, args.len())),
    }
}

fn prim_cdr(args: &[Value]) -> Result<Value, Error> {
    match args {
        [Value::List(list)] => match list.split_first() {
            Some((_, rest)) => Ok(Value::List(rest.to_vec())),
            None => Err(Error::EvalError("cdr of empty list".into())),
        },
        [_] => Err(Error::TypeError("cdr requires a list".into())),
        _ => Err(Error::arity_error(1, args.len())),
    }
}

fn prim_list(args: &[Value]) -> Result<Value, Error> {
    Ok(Value::List(args.to_vec()))
}

// Type predicates share one shape
macro_rules! type_predicate {
    ($name:ident, $pattern:pat) => {
        fn $name(args: &[Value]) -> Result<Value, Error> {
            match args {
                [value] => Ok(Value::Bool(matches!(value, $pattern))),
                _ => Err(Error::arity_error(1, args.len())),
            }
        }
    };
}

type_predicate!(prim_is_number, Value::Number(_));
type_predicate!(prim_is_boolean, Value::Bool(_));
type_predicate!(prim_is_string, Value::String(_));
type_predicate!(prim_is_symbol, Value::Symbol(_));
type_predicate!(
    prim_is_procedure,
    Value::Prim(_) | Value::Closure { .. }
);

fn prim_is_null(args: &[Value]) -> Result<Value, Error> {
    match args {
        [value] => Ok(Value::Bool(value.is_nil())),
        _ => Err(Error::arity_error(1, args.len())),
    }
}

fn prim_is_pair(args: &[Value]) -> Result<Value, Error> {
    match args {
        [value] => Ok(Value::Bool(
            matches!(value, Value::List(list) if !list.is_empty()),
        )),
        _ => Err(Error::arity_error(1, args.len())),
    }
}

/// Registry of all primitive operations
static PRIMITIVES: &[PrimDef] = &[
    // Arithmetic
    PrimDef {
        name: "+",
        arity: Arity::Any,
        func: prim_add,
    },
    PrimDef {
        name: "-",
        arity: Arity::AtLeast(1),
        func: prim_sub,
    },
    PrimDef {
        name: "*",
        arity: Arity::AtLeast(1),
        func: prim_mul,
    },
    PrimDef {
        name: "/",
        arity: Arity::AtLeast(2),
        func: prim_div,
    },
    // Comparison
    PrimDef {
        name: "=",
        arity: Arity::AtLeast(2),
        func: prim_num_eq,
    },
    PrimDef {
        name: "<",
        arity: Arity::AtLeast(2),
        func: prim_lt,
    },
    PrimDef {
        name: ">",
        arity: Arity::AtLeast(2),
        func: prim_gt,
    },
    PrimDef {
        name: "<=",
        arity: Arity::AtLeast(2),
        func: prim_le,
    },
    PrimDef {
        name: ">=",
        arity: Arity::AtLeast(2),
        func: prim_ge,
    },
    PrimDef {
        name: "eq?",
        arity: Arity::Exact(2),
        func: prim_eq,
    },
    PrimDef {
        name: "string=?",
        arity: Arity::Exact(2),
        func: prim_string_eq,
    },
    // Logic
    PrimDef {
        name: "not",
        arity: Arity::Exact(1),
        func: prim_not,
    },
    // Lists
    PrimDef {
        name: "cons",
        arity: Arity::Exact(2),
        func: prim_cons,
    },
    PrimDef {
        name: "car",
        arity: Arity::Exact(1),
        func: prim_car,
    },
    PrimDef {
        name: "cdr",
        arity: Arity::Exact(1),
        func: prim_cdr,
    },
    PrimDef {
        name: "list",
        arity: Arity::Any,
        func: prim_list,
    },
    PrimDef {
        name: "pair?",
        arity: Arity::Exact(1),
        func: prim_is_pair,
    },
    PrimDef {
        name: "null?",
        arity: Arity::Exact(1),
        func: prim_is_null,
    },
    // Type predicates
    PrimDef {
        name: "number?",
        arity: Arity::Exact(1),
        func: prim_is_number,
    },
    PrimDef {
        name: "boolean?",
        arity: Arity::Exact(1),
        func: prim_is_boolean,
    },
    PrimDef {
        name: "string?",
        arity: Arity::Exact(1),
        func: prim_is_string,
    },
    PrimDef {
        name: "symbol?",
        arity: Arity::Exact(1),
        func: prim_is_symbol,
    },
    PrimDef {
        name: "procedure?",
        arity: Arity::Exact(1),
        func: prim_is_procedure,
    },
];

/// Lazy index from name to PrimDef (private - use find_primitive)
static PRIMITIVES_BY_NAME: LazyLock<HashMap<&'static str, &'static PrimDef>> =
    LazyLock::new(|| PRIMITIVES.iter().map(|op| (op.name, op)).collect());
