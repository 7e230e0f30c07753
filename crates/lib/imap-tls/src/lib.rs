//! TLS plumbing for the IMAP connection.

/// The secured stream the IMAP session runs over.
pub type TlsStream = tokio_rustls::client::TlsStream<tokio::net::TcpStream>;

/// Errors returned while establishing the TLS layer.
#[derive(Debug, thiserror::Error)]
pub enum TlsError {
    /// Failed to load system root certificates.
    #[error("failed to load system root certificates: {0}")]
    RootCerts(#[from] rustls_native_certs::Error),

    /// The server hostname is not a valid TLS server name.
    #[error("invalid TLS server name: {0}")]
    InvalidServerName(String),

    /// TLS handshake or I/O error.
    #[error("TLS I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Upgrade an established TCP stream to TLS for the given server name.
///
/// The client config is built from the system root certificates on
/// every call; sessions are established rarely (startup and
/// reconnects), and a reconnect after certificate rotation picks up
/// the fresh roots.
pub async fn secure(
    server: &str,
    tcp_stream: tokio::net::TcpStream,
) -> Result<TlsStream, TlsError> {
    let server_name = rustls::pki_types::ServerName::try_from(server.to_string())
        .map_err(|_| TlsError::InvalidServerName(server.to_string()))?;

    let rustls_native_certs::CertificateResult { certs, errors, .. } =
        rustls_native_certs::load_native_certs();
    if let Some(err) = errors.into_iter().next() {
        return Err(TlsError::RootCerts(err));
    }

    let mut root_store = rustls::RootCertStore::empty();
    let _ = root_store.add_parsable_certificates(certs);

    let config = rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();
    let connector = tokio_rustls::TlsConnector::from(std::sync::Arc::new(config));

    let tls_stream = connector.connect(server_name, tcp_stream).await?;
    Ok(tls_stream)
}
