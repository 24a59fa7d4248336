use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuicError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Connection error: {0}")]
    Connection(#[from] quinn::ConnectionError),

    #[error("Endpoint closed")]
    EndpointClosed,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Certificate error: {0}")]
    CertificateError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<quinn::ConnectError> for QuicError {
    fn from(err: quinn::ConnectError) -> Self {
        QuicError::ConnectionFailed(err.to_string())
    }
}

impl From<rcgen::Error> for QuicError {
    fn from(err: rcgen::Error) -> Self {
        QuicError::CertificateError(err.to_string())
    }
}

impl From<rustls::Error> for QuicError {
    fn from(err: rustls::Error) -> Self {
        QuicError::CertificateError(err.to_string())
    }
}

pub type QuicResult<T> = Result<T, QuicError>;
