//! Monotonic revision counter

use std::cell::Cell;
use std::fmt;

/// Monotonic counter bumped on every observable mutation.
///
/// The counter never decreases, so its string form changes whenever
/// [`Revision::bump`] has been called since the last read.
#[derive(Debug, Default)]
pub struct Revision {
    value: Cell<u64>,
}

impl Revision {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value.
    pub fn get(&self) -> u64 {
        self.value.get()
    }

    /// Advance the counter and return the new value.
    pub fn bump(&self) -> u64 {
        let next = self.value.get() + 1;
        self.value.set(next);
        next
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}
