use crate::metered::Meter;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Point-in-time copy of a [`ByteCounters`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ByteTotals {
    pub read: u64,
    pub written: u64,
}

#[derive(Debug, Default)]
struct Totals {
    read: AtomicU64,
    written: AtomicU64,
}

/// Shared read/write byte totals, safe to feed from many streams at once.
#[derive(Debug, Clone, Default)]
pub struct ByteCounters {
    totals: Arc<Totals>,
}

impl ByteCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Meter whose callbacks add into these totals.
    pub fn meter(&self) -> Meter {
        let read = self.totals.clone();
        let written = self.totals.clone();
        Meter::new(
            move |n| {
                read.read.fetch_add(n, Ordering::Relaxed);
            },
            move |n| {
                written.written.fetch_add(n, Ordering::Relaxed);
            },
        )
    }

    pub fn bytes_read(&self) -> u64 {
        self.totals.read.load(Ordering::Relaxed)
    }

    pub fn bytes_written(&self) -> u64 {
        self.totals.written.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> ByteTotals {
        ByteTotals {
            read: self.bytes_read(),
            written: self.bytes_written(),
        }
    }

    /// Zero both totals, returning what they held.
    pub fn reset(&self) -> ByteTotals {
        ByteTotals {
            read: self.totals.read.swap(0, Ordering::Relaxed),
            written: self.totals.written.swap(0, Ordering::Relaxed),
        }
    }
}
