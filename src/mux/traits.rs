//! Capability traits for multiplexed connections and their streams.
//!
//! Both real transports and the metering wrappers implement these, so a
//! wrapped connection can be used anywhere the original was expected.

use async_trait::async_trait;
use std::io;
use std::net::SocketAddr;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::time::Instant;

/// One logical bidirectional byte channel carried by a [`MuxConnection`].
///
/// Reads and writes go through [`AsyncRead`] / [`AsyncWrite`]. Deadlines take
/// `None` to clear a previously set deadline.
pub trait MuxStream: AsyncRead + AsyncWrite + Unpin + Send {
    /// Gracefully close the stream.
    fn close(&mut self) -> io::Result<()>;

    /// Abort the stream in both directions.
    fn reset(&mut self) -> io::Result<()>;

    /// Set both the read and the write deadline.
    fn set_deadline(&mut self, deadline: Option<Instant>) -> io::Result<()>;

    fn set_read_deadline(&mut self, deadline: Option<Instant>) -> io::Result<()>;

    fn set_write_deadline(&mut self, deadline: Option<Instant>) -> io::Result<()>;
}

/// Type-erased stream.
pub type BoxStream = Box<dyn MuxStream>;

impl<S: MuxStream + ?Sized> MuxStream for Box<S> {
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }

    fn reset(&mut self) -> io::Result<()> {
        (**self).reset()
    }

    fn set_deadline(&mut self, deadline: Option<Instant>) -> io::Result<()> {
        (**self).set_deadline(deadline)
    }

    fn set_read_deadline(&mut self, deadline: Option<Instant>) -> io::Result<()> {
        (**self).set_read_deadline(deadline)
    }

    fn set_write_deadline(&mut self, deadline: Option<Instant>) -> io::Result<()> {
        (**self).set_write_deadline(deadline)
    }
}

/// A single network connection able to carry many independent streams.
#[async_trait]
pub trait MuxConnection: Send + Sync {
    type Stream: MuxStream;
    type Error: std::error::Error + Send + Sync + 'static;
    /// Handle of the transport that owns this connection.
    type Transport;

    /// Wait for the peer to open a stream.
    async fn accept_stream(&self) -> Result<Self::Stream, Self::Error>;

    /// Open a new outbound stream.
    async fn open_stream(&self) -> Result<Self::Stream, Self::Error>;

    fn close(&self) -> Result<(), Self::Error>;

    fn is_closed(&self) -> bool;

    fn local_addr(&self) -> SocketAddr;

    fn remote_addr(&self) -> SocketAddr;

    fn transport(&self) -> &Self::Transport;
}
