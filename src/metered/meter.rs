//! The pair of counting callbacks shared by a connection and its streams.

use std::fmt;
use std::sync::Arc;

/// Accounting hook invoked with a byte count.
///
/// Streams of one connection are driven from many tasks at once, so the
/// callback is called concurrently and must accumulate safely on its own
/// (an atomic, a metrics handle, a lock of the caller's choosing).
pub type CountFn = Arc<dyn Fn(u64) + Send + Sync>;

/// Read and write counting callbacks.
///
/// Cloning shares the same callbacks; it never duplicates counter state.
#[derive(Clone)]
pub struct Meter {
    on_read: CountFn,
    on_write: CountFn,
}

impl Meter {
    pub fn new<R, W>(on_read: R, on_write: W) -> Self
    where
        R: Fn(u64) + Send + Sync + 'static,
        W: Fn(u64) + Send + Sync + 'static,
    {
        Self {
            on_read: Arc::new(on_read),
            on_write: Arc::new(on_write),
        }
    }

    /// A meter that discards every count.
    pub fn noop() -> Self {
        Self::new(|_| {}, |_| {})
    }

    pub fn read_only<R>(on_read: R) -> Self
    where
        R: Fn(u64) + Send + Sync + 'static,
    {
        Self::new(on_read, |_| {})
    }

    pub fn write_only<W>(on_write: W) -> Self
    where
        W: Fn(u64) + Send + Sync + 'static,
    {
        Self::new(|_| {}, on_write)
    }

    #[inline]
    pub fn record_read(&self, bytes: u64) {
        (self.on_read)(bytes)
    }

    #[inline]
    pub fn record_write(&self, bytes: u64) {
        (self.on_write)(bytes)
    }
}

impl Default for Meter {
    fn default() -> Self {
        Self::noop()
    }
}

impl fmt::Debug for Meter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Meter").finish_non_exhaustive()
    }
}
