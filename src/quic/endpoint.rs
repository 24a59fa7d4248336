use crate::quic::connection::QuicConnection;
use crate::quic::error::{QuicError, QuicResult};
use crate::quic::types::QuicConfig;
use quinn::crypto::rustls::QuicClientConfig;
use quinn::{ClientConfig, Endpoint, IdleTimeout, ServerConfig, TransportConfig};
use rustls::crypto::CryptoProvider;
use rustls::pki_types::{CertificateDer, PrivatePkcs8KeyDer};
use std::net::SocketAddr;
use std::sync::Arc;

/// A QUIC endpoint that both accepts and dials connections.
///
/// The server side presents a freshly generated self-signed certificate.
pub struct QuicEndpoint {
    endpoint: Endpoint,
    config: QuicConfig,
}

impl QuicEndpoint {
    /// Bind a new endpoint. Must run inside a tokio runtime.
    pub async fn new(config: QuicConfig) -> QuicResult<Self> {
        if config.insecure_skip_verify {
            tracing::warn!(
                "SECURITY WARNING: TLS certificate verification is DISABLED. \
                 This is insecure and should only be used for testing with self-signed certificates."
            );
        }

        let provider = crypto_provider();
        let transport = Arc::new(Self::transport_config(&config)?);

        let server_config = Self::make_server_config(&config, transport.clone())?;
        let mut endpoint = Endpoint::server(server_config, config.bind_addr)?;
        endpoint.set_default_client_config(Self::make_client_config(&config, provider, transport)?);

        tracing::debug!(local = ?endpoint.local_addr().ok(), "QUIC endpoint bound");

        Ok(Self { endpoint, config })
    }

    fn transport_config(config: &QuicConfig) -> QuicResult<TransportConfig> {
        let idle_timeout = IdleTimeout::try_from(config.max_idle_timeout)
            .map_err(|e| QuicError::InvalidConfig(format!("max_idle_timeout: {e}")))?;

        let mut transport = TransportConfig::default();
        transport
            .max_concurrent_bidi_streams(config.max_concurrent_bidi_streams.into())
            .max_idle_timeout(Some(idle_timeout))
            .keep_alive_interval(Some(config.keep_alive_interval));

        Ok(transport)
    }

    fn make_server_config(
        config: &QuicConfig,
        transport: Arc<TransportConfig>,
    ) -> QuicResult<ServerConfig> {
        let cert = rcgen::generate_simple_self_signed(vec![config.server_name.clone()])?;
        let cert_der = CertificateDer::from(cert.cert.der().to_vec());
        let key = PrivatePkcs8KeyDer::from(cert.key_pair.serialize_der());

        let mut server_config = ServerConfig::with_single_cert(vec![cert_der], key.into())?;
        server_config.transport_config(transport);

        Ok(server_config)
    }

    /// With `insecure_skip_verify` any certificate is accepted; otherwise the
    /// system roots are used, falling back to the webpki roots.
    fn make_client_config(
        config: &QuicConfig,
        provider: Arc<CryptoProvider>,
        transport: Arc<TransportConfig>,
    ) -> QuicResult<ClientConfig> {
        let crypto = if config.insecure_skip_verify {
            rustls::ClientConfig::builder()
                .dangerous()
                .with_custom_certificate_verifier(Arc::new(SkipServerVerification(provider)))
                .with_no_client_auth()
        } else {
            let mut root_store = rustls::RootCertStore::empty();

            match rustls_native_certs::load_native_certs() {
                Ok(certs) => {
                    for cert in certs {
                        if let Err(e) = root_store.add(cert) {
                            tracing::warn!("Failed to add certificate to root store: {}", e);
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to load native certificates: {}. Using webpki roots.",
                        e
                    );
                }
            }

            if root_store.is_empty() {
                root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
            }

            rustls::ClientConfig::builder()
                .with_root_certificates(root_store)
                .with_no_client_auth()
        };

        let crypto = QuicClientConfig::try_from(crypto)
            .map_err(|e| QuicError::CertificateError(e.to_string()))?;
        let mut client_config = ClientConfig::new(Arc::new(crypto));
        client_config.transport_config(transport);

        Ok(client_config)
    }

    /// Dial a remote endpoint.
    pub async fn connect(&self, remote_addr: SocketAddr) -> QuicResult<QuicConnection> {
        let conn = self
            .endpoint
            .connect(remote_addr, &self.config.server_name)?
            .await?;
        tracing::debug!(%remote_addr, "QUIC connection established");

        QuicConnection::new(conn, self.endpoint.clone())
    }

    /// Wait for the next inbound connection.
    pub async fn accept(&self) -> QuicResult<QuicConnection> {
        let incoming = self
            .endpoint
            .accept()
            .await
            .ok_or(QuicError::EndpointClosed)?;
        let conn = incoming.await?;
        tracing::debug!(remote_addr = %conn.remote_address(), "QUIC connection accepted");

        QuicConnection::new(conn, self.endpoint.clone())
    }

    pub fn local_addr(&self) -> QuicResult<SocketAddr> {
        self.endpoint.local_addr().map_err(QuicError::IoError)
    }

    /// Close every connection on this endpoint.
    pub fn close(&self) {
        self.endpoint.close(0u32.into(), b"closing");
    }

    /// Wait until all connections have finished closing.
    pub async fn wait_idle(&self) {
        self.endpoint.wait_idle().await;
    }
}

/// Process-wide rustls provider, installing ring when none is set yet.
fn crypto_provider() -> Arc<CryptoProvider> {
    if let Some(provider) = CryptoProvider::get_default() {
        return provider.clone();
    }
    // A concurrent install may win the race; read back whichever landed
    let _ = rustls::crypto::ring::default_provider().install_default();
    CryptoProvider::get_default()
        .cloned()
        .unwrap_or_else(|| Arc::new(rustls::crypto::ring::default_provider()))
}

// Certificate verifier that accepts any certificate (INSECURE - for testing only)
#[derive(Debug)]
struct SkipServerVerification(Arc<CryptoProvider>);

impl rustls::client::danger::ServerCertVerifier for SkipServerVerification {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &rustls::pki_types::ServerName<'_>,
        _ocsp_response: &[u8],
        _now: rustls::pki_types::UnixTime,
    ) -> Result<rustls::client::danger::ServerCertVerified, rustls::Error> {
        Ok(rustls::client::danger::ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &rustls::DigitallySignedStruct,
    ) -> Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls12_signature(
            message,
            cert,
            dss,
            &self.0.signature_verification_algorithms,
        )
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &rustls::DigitallySignedStruct,
    ) -> Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls13_signature(
            message,
            cert,
            dss,
            &self.0.signature_verification_algorithms,
        )
    }

    fn supported_verify_schemes(&self) -> Vec<rustls::SignatureScheme> {
        self.0.signature_verification_algorithms.supported_schemes()
    }
}
