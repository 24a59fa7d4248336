use crate::metered::meter::Meter;
use crate::metered::stream::MeteredStream;
use crate::mux::MuxConnection;
use async_trait::async_trait;
use std::net::SocketAddr;

/// Wraps a [`MuxConnection`] so that every stream it accepts or opens is a
/// [`MeteredStream`] reporting into this connection's [`Meter`].
///
/// All streams share one pair of callbacks, so counts aggregate at the
/// connection level. Accepting and opening are not metered themselves, and
/// every other operation is forwarded unchanged.
#[derive(Debug)]
pub struct MeteredConnection<C> {
    inner: C,
    meter: Meter,
}

impl<C> MeteredConnection<C> {
    pub fn new<R, W>(inner: C, on_read: R, on_write: W) -> Self
    where
        R: Fn(u64) + Send + Sync + 'static,
        W: Fn(u64) + Send + Sync + 'static,
    {
        Self::with_meter(inner, Meter::new(on_read, on_write))
    }

    pub fn with_meter(inner: C, meter: Meter) -> Self {
        Self { inner, meter }
    }

    pub fn get_ref(&self) -> &C {
        &self.inner
    }

    pub fn meter(&self) -> &Meter {
        &self.meter
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

#[async_trait]
impl<C: MuxConnection> MuxConnection for MeteredConnection<C> {
    type Stream = MeteredStream<C::Stream>;
    type Error = C::Error;
    type Transport = C::Transport;

    async fn accept_stream(&self) -> Result<Self::Stream, Self::Error> {
        let stream = self.inner.accept_stream().await?;
        tracing::trace!(remote = %self.inner.remote_addr(), "metering accepted stream");
        Ok(MeteredStream::new(stream, self.meter.clone()))
    }

    async fn open_stream(&self) -> Result<Self::Stream, Self::Error> {
        let stream = self.inner.open_stream().await?;
        tracing::trace!(remote = %self.inner.remote_addr(), "metering opened stream");
        Ok(MeteredStream::new(stream, self.meter.clone()))
    }

    fn close(&self) -> Result<(), Self::Error> {
        self.inner.close()
    }

    fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }

    fn local_addr(&self) -> SocketAddr {
        self.inner.local_addr()
    }

    fn remote_addr(&self) -> SocketAddr {
        self.inner.remote_addr()
    }

    fn transport(&self) -> &Self::Transport {
        self.inner.transport()
    }
}
