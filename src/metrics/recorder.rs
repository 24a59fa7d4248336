//! Byte metering on the global `metrics` recorder.
//!
//! Whatever exporter the application installs (Prometheus or otherwise)
//! picks these counters up; without one they are no-ops.

use crate::metered::Meter;
use metrics::{counter, describe_counter, Unit};
use std::sync::atomic::{AtomicBool, Ordering};

pub const BYTES_READ: &str = "meterconn_bytes_read_total";
pub const BYTES_WRITTEN: &str = "meterconn_bytes_written_total";

static METRICS_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Initialize metric descriptions (call once at startup)
pub fn init_metrics() {
    if METRICS_INITIALIZED.swap(true, Ordering::SeqCst) {
        return; // Already initialized
    }

    describe_counter!(
        BYTES_READ,
        Unit::Bytes,
        "Total bytes read from metered streams"
    );
    describe_counter!(
        BYTES_WRITTEN,
        Unit::Bytes,
        "Total bytes written to metered streams"
    );
}

/// Build a [`Meter`] that increments the byte counters labelled with `peer`.
///
/// Counter handles are registered once here, against the recorder installed
/// at call time, so the per-transfer path is a single increment.
pub fn metrics_meter(peer: impl Into<String>) -> Meter {
    let peer = peer.into();
    let read = counter!(BYTES_READ, "peer" => peer.clone());
    let written = counter!(BYTES_WRITTEN, "peer" => peer);

    Meter::new(move |n| read.increment(n), move |n| written.increment(n))
}
