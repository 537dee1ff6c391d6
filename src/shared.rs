//! Snapshot handoff between interrupt and foreground context.

use core::cell::Cell;

use critical_section::Mutex;

use crate::Snapshot;

/// Holds the most recently published [`Snapshot`].
///
/// Both `publish` and `load` copy the whole value inside a critical section,
/// so a reader never sees a half-updated time.
pub struct SharedSnapshot {
    inner: Mutex<Cell<Snapshot>>,
}

impl SharedSnapshot {
    pub const fn new(initial: Snapshot) -> Self {
        Self {
            inner: Mutex::new(Cell::new(initial)),
        }
    }

    pub fn publish(&self, snapshot: Snapshot) {
        critical_section::with(|cs| self.inner.borrow(cs).set(snapshot));
    }

    pub fn load(&self) -> Snapshot {
        critical_section::with(|cs| self.inner.borrow(cs).get())
    }
}
