use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct QuicConfig {
    pub bind_addr: SocketAddr,
    pub max_idle_timeout: Duration,
    pub keep_alive_interval: Duration,
    pub max_concurrent_bidi_streams: u32,
    /// Name presented for TLS when dialing and embedded in the self-signed
    /// server certificate.
    pub server_name: String,
    /// Accept any server certificate (INSECURE, testing only)
    pub insecure_skip_verify: bool,
}

impl Default for QuicConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 0)),
            max_idle_timeout: Duration::from_secs(60),
            keep_alive_interval: Duration::from_secs(5),
            max_concurrent_bidi_streams: 100,
            server_name: "localhost".to_string(),
            insecure_skip_verify: false,
        }
    }
}
