//! The append-only cell store.
//!
//! Runtime values live in store cells once bound; environments map names to
//! cell addresses, never to values directly. This two-step indirection is
//! what gives `set!` its semantics: mutation replaces the contents of a
//! cell, and every environment entry aliasing that address observes the new
//! contents.
//!
//! Invariants: the store never shrinks, never reorders existing cells, and
//! never reuses an address. An address, once returned by [`Store::extend`],
//! identifies the same cell for the remainder of the interpreter's life.
//! There is no garbage collection.

use crate::Error;
use crate::value::Value;

/// Zero-based index identifying one cell in the store
pub type Address = usize;

/// The growable sequence of mutable cells
#[derive(Debug, Default)]
pub struct Store {
    cells: Vec<Value>,
}

impl Store {
    pub fn new() -> Self {
        Store { cells: Vec::new() }
    }

    /// Number of cells currently allocated
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Append a new cell holding `value` and return its address.
    /// The new address is always the store length before the append.
    pub fn extend(&mut self, value: Value) -> Address {
        self.cells.push(value);
        self.cells.len() - 1
    }

    /// Read the current contents of the cell at `address`.
    ///
    /// An address equal to the current length is invalid: no cell exists
    /// there yet. Out-of-bounds reads indicate an internal inconsistency,
    /// since environment lookups only produce addresses of existing cells.
    pub fn get(&self, address: Address) -> Result<&Value, Error> {
        self.cells
            .get(address)
            .ok_or(Error::InvalidAddress(address))
    }

    /// Overwrite the cell at `address` in place.
    ///
    /// Out-of-bounds writes are silently ignored rather than reported:
    /// callers are expected to have validated the address through an
    /// environment lookup first.
    pub fn set(&mut self, address: Address, value: Value) {
        if let Some(cell) = self.cells.get_mut(address) {
            *cell = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::val;

    #[test]
    fn test_extend_assigns_sequential_addresses() {
        let mut store = Store::new();
        assert!(store.is_empty());

        let a0 = store.extend(val(10));
        let a1 = store.extend(val(20));
        let a2 = store.extend(val(30));

        assert_eq!((a0, a1, a2), (0, 1, 2));
        assert_eq!(store.len(), 3);
        // Earlier cells keep their identity as the store grows
        assert_eq!(store.get(a0), Ok(&val(10)));
        assert_eq!(store.get(a1), Ok(&val(20)));
        assert_eq!(store.get(a2), Ok(&val(30)));
    }

    #[test]
    fn test_write_then_read_round_trips() {
        let mut store = Store::new();
        let addr = store.extend(val(1));

        store.set(addr, val("replaced"));
        assert_eq!(store.get(addr), Ok(&val("replaced")));

        store.set(addr, val(false));
        assert_eq!(store.get(addr), Ok(&val(false)));
    }

    #[test]
    fn test_get_rejects_out_of_bounds_addresses() {
        let mut store = Store::new();
        assert_eq!(store.get(0), Err(Error::InvalidAddress(0)));

        store.extend(val(1));
        // An address equal to the current length has no cell yet
        assert_eq!(store.get(1), Err(Error::InvalidAddress(1)));
        assert_eq!(store.get(100), Err(Error::InvalidAddress(100)));
        assert!(store.get(0).is_ok());
    }

    #[test]
    fn test_set_out_of_bounds_is_a_no_op() {
        let mut store = Store::new();
        let addr = store.extend(val(7));

        store.set(addr + 1, val(99));
        store.set(1000, val(99));

        // The store is unchanged: same length, same contents
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(addr), Ok(&val(7)));
    }
}
