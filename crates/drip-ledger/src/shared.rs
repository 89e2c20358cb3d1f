//! Thread-safe handle that serializes calls against one ledger.
//!
//! Each closure runs with the lock held for its whole duration, so no two
//! calls interleave their reads and writes.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::ledger::Ledger;

/// A cloneable, lock-guarded ledger.
#[derive(Clone, Debug)]
pub struct SharedLedger {
    inner: Arc<Mutex<Ledger>>,
}

impl SharedLedger {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ledger)),
        }
    }

    /// Run one logical call with exclusive access.
    pub fn call<R>(&self, f: impl FnOnce(&mut Ledger) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }

    /// Run a read-only query.
    pub fn view<R>(&self, f: impl FnOnce(&Ledger) -> R) -> R {
        let guard = self.inner.lock();
        f(&guard)
    }

    /// Clone the current ledger state.
    pub fn snapshot(&self) -> Ledger {
        self.inner.lock().clone()
    }
}
