//! The two-shaped environment structure.
//!
//! An environment maps names to store addresses. It comes in exactly two
//! shapes: the single mutable *global frame* owned by the interpreter, and
//! a chain of immutable *local frames* created per procedure call and per
//! `let` block. Local frames are never mutated after construction - new
//! bindings always build a new frame linked to the old one. The chain
//! bottoms out at the global frame.
//!
//! The global frame holds two parallel growable sequences (names and
//! addresses), insertion-ordered and append-only. Lookup scans front to
//! back and returns the first match, so redefining a name appends a new
//! pair but the earliest binding stays the one lookup finds; `set!` remains
//! the way to change what a name means.

use std::rc::Rc;

use crate::Error;
use crate::store::Address;

/// The single mutable top-level name-to-address table.
///
/// [`GlobalFrame::add_binding`] is the sole mutation; it never removes or
/// overwrites existing entries.
#[derive(Debug, Default)]
pub struct GlobalFrame {
    names: Vec<String>,
    addresses: Vec<Address>,
}

impl GlobalFrame {
    pub fn new() -> Self {
        GlobalFrame {
            names: Vec::new(),
            addresses: Vec::new(),
        }
    }

    /// Append a (name, address) pair to the global binding table.
    pub fn add_binding(&mut self, name: impl Into<String>, address: Address) {
        self.names.push(name.into());
        self.addresses.push(address);
    }

    /// First-match lookup in insertion order.
    pub fn lookup(&self, name: &str) -> Option<Address> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.addresses[i])
    }

    /// All (name, address) pairs in insertion order, duplicates included.
    pub fn entries(&self) -> impl Iterator<Item = (&str, Address)> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.addresses.iter().copied())
    }
}

/// One immutable frame in a local environment chain.
///
/// `names` and `addresses` are parallel arrays of equal length, one store
/// address per bound name.
#[derive(Debug)]
pub struct LocalFrame {
    names: Vec<String>,
    addresses: Vec<Address>,
    parent: Env,
}

/// An environment: either the global frame or a link into a local chain.
///
/// `Env` is a cheap handle - local frames are `Rc`-shared, and the global
/// frame's data lives in the interpreter, reached by passing it to
/// [`Env::lookup`]. Cloning an `Env` captures the chain by reference,
/// which is exactly what closures need.
#[derive(Debug, Clone)]
pub enum Env {
    Global,
    Local(Rc<LocalFrame>),
}

impl Env {
    /// Build a new immutable local frame on top of this environment.
    /// `names` and `addresses` must be parallel (one address per name).
    pub fn extended(&self, names: Vec<String>, addresses: Vec<Address>) -> Env {
        debug_assert_eq!(names.len(), addresses.len());
        Env::Local(Rc::new(LocalFrame {
            names,
            addresses,
            parent: self.clone(),
        }))
    }

    /// Resolve `name` to a store address.
    ///
    /// A local frame's own names are scanned first, so inner bindings
    /// shadow outer ones; on a miss the search continues into the parent
    /// and eventually into the global frame.
    pub fn lookup(&self, globals: &GlobalFrame, name: &str) -> Result<Address, Error> {
        let mut env = self;
        loop {
            match env {
                Env::Global => {
                    return globals
                        .lookup(name)
                        .ok_or_else(|| Error::UnboundVariable(name.to_owned()));
                }
                Env::Local(frame) => {
                    if let Some(i) = frame.names.iter().position(|n| n == name) {
                        return Ok(frame.addresses[i]);
                    }
                    env = &frame.parent;
                }
            }
        }
    }
}

impl PartialEq for Env {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Env::Global, Env::Global) => true,
            (Env::Local(a), Env::Local(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unbound(err: Result<Address, Error>) -> bool {
        matches!(err, Err(Error::UnboundVariable(_)))
    }

    #[test]
    fn test_global_lookup_returns_first_match() {
        let mut globals = GlobalFrame::new();
        globals.add_binding("x", 0);
        globals.add_binding("y", 1);
        globals.add_binding("x", 2); // redefinition appends, never overwrites

        assert_eq!(globals.lookup("x"), Some(0)); // earliest binding wins
        assert_eq!(globals.lookup("y"), Some(1));
        assert_eq!(globals.lookup("z"), None);
        assert_eq!(globals.entries().count(), 3);
    }

    #[test]
    fn test_unbound_variable_error() {
        let globals = GlobalFrame::new();
        assert!(unbound(Env::Global.lookup(&globals, "missing")));

        let frame = Env::Global.extended(vec!["a".to_owned()], vec![0]);
        assert!(unbound(frame.lookup(&globals, "missing")));
    }

    #[test]
    fn test_inner_frame_shadows_outer() {
        let mut globals = GlobalFrame::new();
        globals.add_binding("x", 0);

        let outer = Env::Global.extended(vec!["x".to_owned(), "y".to_owned()], vec![1, 2]);
        let inner = outer.extended(vec!["x".to_owned()], vec![3]);

        // Innermost binding wins at every level of the chain
        assert_eq!(inner.lookup(&globals, "x"), Ok(3));
        assert_eq!(outer.lookup(&globals, "x"), Ok(1));
        assert_eq!(Env::Global.lookup(&globals, "x"), Ok(0));

        // Misses fall through to the enclosing environment
        assert_eq!(inner.lookup(&globals, "y"), Ok(2));
    }

    #[test]
    fn test_extension_never_mutates_existing_frames() {
        let mut globals = GlobalFrame::new();
        globals.add_binding("x", 0);

        let outer = Env::Global.extended(vec!["y".to_owned()], vec![1]);
        let _inner = outer.extended(vec!["z".to_owned()], vec![2]);

        // The outer frame still resolves exactly what it did before
        assert_eq!(outer.lookup(&globals, "y"), Ok(1));
        assert!(unbound(outer.lookup(&globals, "z")));
    }

    #[test]
    fn test_env_equality_is_identity() {
        let a = Env::Global.extended(vec!["x".to_owned()], vec![0]);
        let b = Env::Global.extended(vec!["x".to_owned()], vec![0]);
        assert_eq!(a, a.clone());
        assert_ne!(a, b); // structurally identical frames are distinct
        assert_eq!(Env::Global, Env::Global);
    }
}
