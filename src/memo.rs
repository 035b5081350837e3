//! Exactly-once, single-entry caching.

use std::{
    fmt,
    sync::{Mutex, OnceLock, PoisonError},
};

use tracing::trace;

/// A lazily computed value that is evaluated at most once.
///
/// The first successful initialisation is stored and returned on every later
/// access; there is no invalidation. A failed [`get_or_try_init`](Self::get_or_try_init)
/// leaves the cache empty so the next access tries again.
pub struct Memo<T> {
    cell: OnceLock<T>,
    // Serialises fallible initialisers so a successful one runs only once.
    init: Mutex<()>,
}

impl<T> Memo<T> {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
            init: Mutex::new(()),
        }
    }

    /// Returns the cached value, if it has been computed.
    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    pub fn is_computed(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn get_or_init(&self, f: impl FnOnce() -> T) -> &T {
        self.cell.get_or_init(|| {
            trace!("computing memoized value");
            f()
        })
    }

    pub fn get_or_try_init<E>(&self, f: impl FnOnce() -> Result<T, E>) -> Result<&T, E> {
        if let Some(value) = self.cell.get() {
            return Ok(value);
        }
        let _guard = self.init.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(value) = self.cell.get() {
            return Ok(value);
        }
        trace!("computing memoized value");
        let value = f()?;
        Ok(self.cell.get_or_init(|| value))
    }
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Memo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Memo").field(&self.cell.get()).finish()
    }
}
