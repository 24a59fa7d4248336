//! QUIC multiplexer (quinn) exposed through the [`MuxConnection`](crate::MuxConnection)
//! and [`MuxStream`](crate::MuxStream) capability traits.

pub mod connection;
pub mod endpoint;
pub mod error;
pub mod stream;
pub mod types;

pub use connection::QuicConnection;
pub use endpoint::QuicEndpoint;
pub use error::{QuicError, QuicResult};
pub use stream::QuicStream;
pub use types::QuicConfig;
