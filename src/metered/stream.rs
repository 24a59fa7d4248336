use crate::metered::meter::Meter;
use crate::mux::MuxStream;
use std::io::{self, IoSlice};
use std::pin::Pin;
use std::task::{ready, Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::time::Instant;

/// A stream that reports every byte it reads or writes to a [`Meter`].
///
/// Each completed read or write invokes the matching callback exactly once
/// with the number of bytes the inner stream actually transferred. That count
/// may be 0, and a failed call reports whatever was transferred before the
/// failure. Pending polls are not completed calls and report nothing.
#[derive(Debug)]
pub struct MeteredStream<S> {
    inner: S,
    meter: Meter,
}

impl<S> MeteredStream<S> {
    pub fn new(inner: S, meter: Meter) -> Self {
        Self { inner, meter }
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn meter(&self) -> &Meter {
        &self.meter
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: AsyncRead + Unpin> AsyncRead for MeteredStream<S> {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let before = buf.filled().len();
        let res = ready!(Pin::new(&mut self.inner).poll_read(cx, buf));
        let read = buf.filled().len().saturating_sub(before);
        self.meter.record_read(read as u64);
        Poll::Ready(res)
    }
}

impl<S: AsyncWrite + Unpin> AsyncWrite for MeteredStream<S> {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let res = ready!(Pin::new(&mut self.inner).poll_write(cx, buf));
        self.meter.record_write(written(&res));
        Poll::Ready(res)
    }

    fn poll_write_vectored(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        bufs: &[IoSlice<'_>],
    ) -> Poll<io::Result<usize>> {
        let res = ready!(Pin::new(&mut self.inner).poll_write_vectored(cx, bufs));
        self.meter.record_write(written(&res));
        Poll::Ready(res)
    }

    fn is_write_vectored(&self) -> bool {
        self.inner.is_write_vectored()
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_flush(cx)
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_shutdown(cx)
    }
}

#[inline]
fn written(res: &io::Result<usize>) -> u64 {
    match res {
        Ok(n) => *n as u64,
        Err(_) => 0,
    }
}

impl<S: MuxStream> MuxStream for MeteredStream<S> {
    fn close(&mut self) -> io::Result<()> {
        self.inner.close()
    }

    fn reset(&mut self) -> io::Result<()> {
        self.inner.reset()
    }

    fn set_deadline(&mut self, deadline: Option<Instant>) -> io::Result<()> {
        self.inner.set_deadline(deadline)
    }

    fn set_read_deadline(&mut self, deadline: Option<Instant>) -> io::Result<()> {
        self.inner.set_read_deadline(deadline)
    }

    fn set_write_deadline(&mut self, deadline: Option<Instant>) -> io::Result<()> {
        self.inner.set_write_deadline(deadline)
    }
}
