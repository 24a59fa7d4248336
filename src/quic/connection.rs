use crate::mux::MuxConnection;
use crate::quic::error::{QuicError, QuicResult};
use crate::quic::stream::QuicStream;
use async_trait::async_trait;
use quinn::{Connection, Endpoint};
use std::net::SocketAddr;

/// An established QUIC connection carrying bidirectional streams.
#[derive(Debug, Clone)]
pub struct QuicConnection {
    conn: Connection,
    endpoint: Endpoint,
    local_addr: SocketAddr,
}

impl QuicConnection {
    pub(crate) fn new(conn: Connection, endpoint: Endpoint) -> QuicResult<Self> {
        let bound = endpoint.local_addr()?;
        // Prefer the concrete interface address over a wildcard bind
        let ip = conn.local_ip().unwrap_or(bound.ip());

        Ok(Self {
            conn,
            endpoint,
            local_addr: SocketAddr::new(ip, bound.port()),
        })
    }

    pub fn inner(&self) -> &Connection {
        &self.conn
    }
}

#[async_trait]
impl MuxConnection for QuicConnection {
    type Stream = QuicStream;
    type Error = QuicError;
    type Transport = Endpoint;

    async fn accept_stream(&self) -> Result<Self::Stream, Self::Error> {
        let (send, recv) = self.conn.accept_bi().await?;
        Ok(QuicStream::new(send, recv))
    }

    async fn open_stream(&self) -> Result<Self::Stream, Self::Error> {
        let (send, recv) = self.conn.open_bi().await?;
        Ok(QuicStream::new(send, recv))
    }

    fn close(&self) -> Result<(), Self::Error> {
        self.conn.close(0u32.into(), b"closing");
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.conn.close_reason().is_some()
    }

    fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    fn remote_addr(&self) -> SocketAddr {
        self.conn.remote_address()
    }

    fn transport(&self) -> &Self::Transport {
        &self.endpoint
    }
}
