//! The recursive evaluator and its interpreter context.
//!
//! An [`Interpreter`] owns the two pieces of mutable state the language
//! needs: the append-only [`Store`] of value cells and the mutable
//! [`GlobalFrame`] of top-level bindings. Everything else (local frames,
//! closures) is immutable and `Rc`-shared, so evaluation threads a single
//! `&mut Interpreter` plus a cheap [`Env`] handle.
//!
//! Evaluation is applicative-order and left-to-right: an application first
//! evaluates the operator, then each operand in source order, and only then
//! applies. A procedure call allocates one fresh store cell per argument
//! and builds a new local frame mapping the formals to those cells, on top
//! of the environment the closure captured when it was created. `let`
//! works the same way, except the new frame sits on the environment of the
//! `let` itself.
//!
//! Top-level `define` evaluates its right-hand side in the global
//! environment, allocates a cell, and appends the binding to the global
//! frame. Because closures resolve free variables through the global frame
//! at call time, definitions may refer to names defined later in the
//! program, which is what makes mutually recursive top-level procedures
//! work.

use std::rc::Rc;

use crate::ast::{Binding, Expr};
use crate::env::{Env, GlobalFrame};
use crate::primitives::apply_primitive;
use crate::scheme::parse_program;
use crate::store::Store;
use crate::value::Value;
use crate::{Error, MAX_EVAL_DEPTH};

/// Truthiness: every value except `#f` counts as true in conditionals.
pub fn is_true_value(value: &Value) -> bool {
    !matches!(value, Value::Bool(false))
}

/// Interpreter state: the store and the global frame.
///
/// A fresh interpreter has an empty store and no global bindings. State
/// persists across [`Interpreter::eval_program`] calls, so a REPL can feed
/// one form at a time and definitions accumulate.
#[derive(Debug, Default)]
pub struct Interpreter {
    store: Store,
    globals: GlobalFrame,
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter {
            store: Store::new(),
            globals: GlobalFrame::new(),
        }
    }

    /// Evaluate a sequence of top-level forms and return the value of the
    /// last one. An empty program is an error, not silence.
    pub fn eval_program(&mut self, forms: &[Expr]) -> Result<Value, Error> {
        let Some((last, rest)) = forms.split_last() else {
            return Err(Error::EmptyBody);
        };
        for form in rest {
            self.eval_form(form)?;
        }
        self.eval_form(last)
    }

    /// Parse and evaluate source text in one step.
    pub fn eval_expression(&mut self, input: &str) -> Result<Value, Error> {
        let forms = parse_program(input)?;
        self.eval_program(&forms)
    }

    /// Read access to the store, mainly for inspecting effects in tests.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Current global bindings as (name, value) pairs in definition order.
    ///
    /// Shadowed re-definitions are omitted, matching what lookup would
    /// actually resolve each name to.
    pub fn global_bindings(&self) -> Vec<(String, Value)> {
        let mut seen: Vec<&str> = Vec::new();
        let mut bindings = Vec::new();
        for (name, address) in self.globals.entries() {
            if seen.contains(&name) {
                continue;
            }
            seen.push(name);
            if let Ok(value) = self.store.get(address) {
                bindings.push((name.to_owned(), value.clone()));
            }
        }
        bindings
    }

    /// Evaluate one top-level form. `define` is only legal here.
    fn eval_form(&mut self, form: &Expr) -> Result<Value, Error> {
        match form {
            Expr::Define { name, expr } => {
                let value = self.eval(expr, &Env::Global, 0)?;
                let address = self.store.extend(value.clone());
                self.globals.add_binding(name.clone(), address);
                Ok(value)
            }
            expr => self.eval(expr, &Env::Global, 0),
        }
    }

    fn eval(&mut self, expr: &Expr, env: &Env, depth: usize) -> Result<Value, Error> {
        if depth > MAX_EVAL_DEPTH {
            return Err(Error::EvalError(format!(
                "Evaluation depth exceeded maximum of {MAX_EVAL_DEPTH}"
            )));
        }

        match expr {
            Expr::Num(n) => Ok(Value::Number(*n)),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Str(s) => Ok(Value::String(s.clone())),
            Expr::Lit(value) => Ok(value.clone()),
            Expr::Prim(op) => Ok(Value::Prim(*op)),
            Expr::VarRef(name) => {
                let address = env.lookup(&self.globals, name)?;
                Ok(self.store.get(address)?.clone())
            }
            Expr::If { test, then, alt } => {
                let test_value = self.eval(test, env, depth + 1)?;
                if is_true_value(&test_value) {
                    self.eval(then, env, depth + 1)
                } else {
                    self.eval(alt, env, depth + 1)
                }
            }
            Expr::Proc { params, body } => Ok(Value::Closure {
                params: params.clone(),
                body: Rc::new(body.clone()),
                env: env.clone(),
            }),
            Expr::Let { bindings, body } => self.eval_let(bindings, body, env, depth),
            Expr::Set { name, expr } => {
                // Resolve the cell first so an unbound name fails before
                // the right-hand side runs
                let address = env.lookup(&self.globals, name)?;
                let value = self.eval(expr, env, depth + 1)?;
                self.store.set(address, value);
                Ok(Value::Unspecified)
            }
            Expr::App { rator, rands } => {
                let procedure = self.eval(rator, env, depth + 1)?;
                let mut args = Vec::with_capacity(rands.len());
                for rand in rands {
                    args.push(self.eval(rand, env, depth + 1)?);
                }
                self.apply_procedure(procedure, args, depth)
            }
            Expr::Define { .. } => Err(Error::EvalError(
                "define is only allowed at the top level".to_owned(),
            )),
        }
    }

    /// Evaluate body expressions in order, returning the last value.
    fn eval_sequence(
        &mut self,
        body: &[Expr],
        env: &Env,
        depth: usize,
    ) -> Result<Value, Error> {
        let Some((last, rest)) = body.split_last() else {
            return Err(Error::EmptyBody);
        };
        for expr in rest {
            self.eval(expr, env, depth + 1)?;
        }
        self.eval(last, env, depth + 1)
    }

    /// `let`: evaluate every right-hand side in the enclosing environment,
    /// then bind all names at once in one fresh frame.
    fn eval_let(
        &mut self,
        bindings: &[Binding],
        body: &[Expr],
        env: &Env,
        depth: usize,
    ) -> Result<Value, Error> {
        let mut values = Vec::with_capacity(bindings.len());
        for binding in bindings {
            values.push(self.eval(&binding.expr, env, depth + 1)?);
        }

        let names = bindings.iter().map(|b| b.name.clone()).collect();
        let addresses = values.into_iter().map(|v| self.store.extend(v)).collect();
        let extended = env.extended(names, addresses);

        self.eval_sequence(body, &extended, depth)
    }

    fn apply_procedure(
        &mut self,
        procedure: Value,
        args: Vec<Value>,
        depth: usize,
    ) -> Result<Value, Error> {
        match procedure {
            Value::Prim(op) => apply_primitive(op, &args),
            Value::Closure { params, body, env } => {
                if params.len() != args.len() {
                    return Err(Error::arity_error(params.len(), args.len()));
                }
                let addresses = args.into_iter().map(|v| self.store.extend(v)).collect();
                let call_env = env.extended(params, addresses);
                self.eval_sequence(&body, &call_env, depth)
            }
            other => Err(Error::NotAProcedure(format!("{other}"))),
        }
    }
}

/// Parse-and-evaluate convenience for one-shot use: a fresh interpreter
/// per call, so no state survives.
pub fn eval_str(input: &str) -> Result<Value, Error> {
    Interpreter::new().eval_expression(input)
}
