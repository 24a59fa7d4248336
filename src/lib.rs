//! Byte metering for multiplexed stream connections.
//!
//! [`MeteredConnection`] wraps anything implementing [`MuxConnection`] and hands
//! out [`MeteredStream`]s that report every transferred byte to a shared pair of
//! counting callbacks. Data, timing and errors are passed through untouched.

pub mod metered;
pub mod metrics;
pub mod mux;
pub mod quic;

pub use metered::{CountFn, Meter, MeteredConnection, MeteredStream};
pub use mux::{BoxStream, MuxConnection, MuxStream};
