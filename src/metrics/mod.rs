//! Ready-made accounting sinks for [`Meter`](crate::Meter).
//!
//! - [`ByteCounters`]: in-process atomic totals
//! - [`recorder`]: counters on the global `metrics` recorder, labelled by peer

pub mod counter;
pub mod recorder;

pub use counter::{ByteCounters, ByteTotals};
pub use recorder::{init_metrics, metrics_meter};
