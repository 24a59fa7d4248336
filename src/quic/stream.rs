use crate::mux::MuxStream;
use quinn::{ClosedStream, RecvStream, SendStream, VarInt};
use std::future::Future;
use std::io::{self, IoSlice};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::time::{Instant, Sleep};

const RESET_CODE: VarInt = VarInt::from_u32(0);

/// A bidirectional QUIC stream with read and write deadlines.
///
/// Once a deadline passes, pending and later operations in that direction fail
/// with [`io::ErrorKind::TimedOut`] until the deadline is cleared or moved.
#[derive(Debug)]
pub struct QuicStream {
    send: SendStream,
    recv: RecvStream,
    read_deadline: Option<Pin<Box<Sleep>>>,
    write_deadline: Option<Pin<Box<Sleep>>>,
}

impl QuicStream {
    pub(crate) fn new(send: SendStream, recv: RecvStream) -> Self {
        Self {
            send,
            recv,
            read_deadline: None,
            write_deadline: None,
        }
    }

    pub fn id(&self) -> quinn::StreamId {
        self.send.id()
    }
}

fn deadline_timer(deadline: Option<Instant>) -> Option<Pin<Box<Sleep>>> {
    deadline.map(|at| Box::pin(tokio::time::sleep_until(at)))
}

fn deadline_passed(timer: &mut Option<Pin<Box<Sleep>>>, cx: &mut Context<'_>) -> bool {
    match timer {
        Some(sleep) => sleep.as_mut().poll(cx).is_ready(),
        None => false,
    }
}

fn timed_out() -> io::Error {
    io::Error::new(io::ErrorKind::TimedOut, "stream deadline exceeded")
}

fn closed(err: ClosedStream) -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, err)
}

impl AsyncRead for QuicStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = &mut *self;
        if deadline_passed(&mut this.read_deadline, cx) {
            return Poll::Ready(Err(timed_out()));
        }
        Pin::new(&mut this.recv).poll_read(cx, buf)
    }
}

impl AsyncWrite for QuicStream {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = &mut *self;
        if deadline_passed(&mut this.write_deadline, cx) {
            return Poll::Ready(Err(timed_out()));
        }
        AsyncWrite::poll_write(Pin::new(&mut this.send), cx, buf)
    }

    fn poll_write_vectored(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        bufs: &[IoSlice<'_>],
    ) -> Poll<io::Result<usize>> {
        let this = &mut *self;
        if deadline_passed(&mut this.write_deadline, cx) {
            return Poll::Ready(Err(timed_out()));
        }
        Pin::new(&mut this.send).poll_write_vectored(cx, bufs)
    }

    fn is_write_vectored(&self) -> bool {
        self.send.is_write_vectored()
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.send).poll_flush(cx)
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.send).poll_shutdown(cx)
    }
}

impl MuxStream for QuicStream {
    /// Finish the send side. The peer still sees everything written so far.
    fn close(&mut self) -> io::Result<()> {
        self.send.finish().map_err(closed)
    }

    fn reset(&mut self) -> io::Result<()> {
        // Already finished or stopped by the peer
        let _ = self.recv.stop(RESET_CODE);
        self.send.reset(RESET_CODE).map_err(closed)
    }

    fn set_deadline(&mut self, deadline: Option<Instant>) -> io::Result<()> {
        self.set_read_deadline(deadline)?;
        self.set_write_deadline(deadline)
    }

    fn set_read_deadline(&mut self, deadline: Option<Instant>) -> io::Result<()> {
        self.read_deadline = deadline_timer(deadline);
        Ok(())
    }

    fn set_write_deadline(&mut self, deadline: Option<Instant>) -> io::Result<()> {
        self.write_deadline = deadline_timer(deadline);
        Ok(())
    }
}
