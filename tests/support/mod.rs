//! In-memory stand-ins for a multiplexed connection and its streams.

#![allow(dead_code)]

use async_trait::async_trait;
use meterconn::{MuxConnection, MuxStream};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::io;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::time::Instant;

/// Pass-through calls observed by a [`MockStream`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StreamCalls {
    pub closed: bool,
    pub resets: u32,
    pub deadline: Option<Option<Instant>>,
    pub read_deadline: Option<Option<Instant>>,
    pub write_deadline: Option<Option<Instant>>,
}

#[derive(Debug, Default)]
pub struct MockStream {
    pub data_to_read: VecDeque<u8>,
    pub written: Arc<Mutex<Vec<u8>>>,
    pub calls: Arc<Mutex<StreamCalls>>,
    /// Most bytes a single write call accepts
    pub write_limit: Option<usize>,
}

impl MockStream {
    pub fn with_data(data: &[u8]) -> Self {
        Self {
            data_to_read: data.iter().copied().collect(),
            ..Default::default()
        }
    }
}

impl AsyncRead for MockStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let n = buf.remaining().min(self.data_to_read.len());
        let chunk: Vec<u8> = self.data_to_read.drain(..n).collect();
        buf.put_slice(&chunk);
        Poll::Ready(Ok(()))
    }
}

impl AsyncWrite for MockStream {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        if self.calls.lock().closed {
            return Poll::Ready(Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "write on closed stream",
            )));
        }
        let n = self.write_limit.map_or(buf.len(), |limit| buf.len().min(limit));
        self.written.lock().extend_from_slice(&buf[..n]);
        Poll::Ready(Ok(n))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.calls.lock().closed = true;
        Poll::Ready(Ok(()))
    }
}

impl MuxStream for MockStream {
    fn close(&mut self) -> io::Result<()> {
        self.calls.lock().closed = true;
        Ok(())
    }

    fn reset(&mut self) -> io::Result<()> {
        let mut calls = self.calls.lock();
        calls.resets += 1;
        if calls.resets > 1 {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "stream already reset"));
        }
        Ok(())
    }

    fn set_deadline(&mut self, deadline: Option<Instant>) -> io::Result<()> {
        self.calls.lock().deadline = Some(deadline);
        Ok(())
    }

    fn set_read_deadline(&mut self, deadline: Option<Instant>) -> io::Result<()> {
        self.calls.lock().read_deadline = Some(deadline);
        Ok(())
    }

    fn set_write_deadline(&mut self, deadline: Option<Instant>) -> io::Result<()> {
        self.calls.lock().write_deadline = Some(deadline);
        Ok(())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MockError {
    #[error("no stream available")]
    NoStream,

    #[error("connection closed")]
    Closed,
}

#[derive(Debug, PartialEq, Eq)]
pub struct MockTransport {
    pub name: &'static str,
}

#[derive(Debug)]
pub struct MockConnection {
    pub streams_to_accept: Mutex<VecDeque<MockStream>>,
    pub streams_to_open: Mutex<VecDeque<MockStream>>,
    pub closed: AtomicBool,
    pub local: SocketAddr,
    pub remote: SocketAddr,
    pub transport: MockTransport,
}

impl Default for MockConnection {
    fn default() -> Self {
        Self {
            streams_to_accept: Mutex::new(VecDeque::new()),
            streams_to_open: Mutex::new(VecDeque::new()),
            closed: AtomicBool::new(false),
            local: "127.0.0.1:4001".parse().unwrap(),
            remote: "10.0.0.2:4002".parse().unwrap(),
            transport: MockTransport { name: "mock" },
        }
    }
}

impl MockConnection {
    pub fn push_accept(&self, stream: MockStream) {
        self.streams_to_accept.lock().push_back(stream);
    }

    pub fn push_open(&self, stream: MockStream) {
        self.streams_to_open.lock().push_back(stream);
    }

    fn next(&self, queue: &Mutex<VecDeque<MockStream>>) -> Result<MockStream, MockError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(MockError::Closed);
        }
        queue.lock().pop_front().ok_or(MockError::NoStream)
    }
}

#[async_trait]
impl MuxConnection for MockConnection {
    type Stream = MockStream;
    type Error = MockError;
    type Transport = MockTransport;

    async fn accept_stream(&self) -> Result<Self::Stream, Self::Error> {
        self.next(&self.streams_to_accept)
    }

    async fn open_stream(&self) -> Result<Self::Stream, Self::Error> {
        self.next(&self.streams_to_open)
    }

    fn close(&self) -> Result<(), Self::Error> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Err(MockError::Closed);
        }
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn local_addr(&self) -> SocketAddr {
        self.local
    }

    fn remote_addr(&self) -> SocketAddr {
        self.remote
    }

    fn transport(&self) -> &Self::Transport {
        &self.transport
    }
}
