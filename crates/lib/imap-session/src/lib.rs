//! IMAP session establishment: connect, verify capabilities, authenticate.

/// The live authenticated IMAP session.
pub type Session = async_imap::Session<imap_tls::TlsStream>;

/// Parameters for establishing a session.
#[derive(Debug, Clone, PartialEq)]
pub struct Params<'a> {
    /// IMAP server hostname, also used as the TLS server name.
    pub host: &'a str,

    /// IMAP port (implicit TLS).
    pub port: u16,

    /// Username for IMAP authentication.
    ///
    /// Typically an email address.
    pub username: &'a str,

    /// Password for IMAP authentication.
    pub password: &'a str,
}

/// Errors returned while establishing a session.
#[derive(Debug, thiserror::Error)]
pub enum EstablishError {
    /// Network I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TLS setup or handshake error.
    #[error("TLS error: {0}")]
    Tls(#[from] imap_tls::TlsError),

    /// IMAP protocol error.
    #[error("IMAP error: {0}")]
    Imap(#[source] async_imap::error::Error),

    /// The server did not send the expected greeting.
    #[error("IMAP server sent no greeting")]
    MissingGreeting,

    /// The server does not advertise the IDLE capability.
    ///
    /// Reconnecting cannot fix a missing server feature, so callers must
    /// treat this as fatal.
    #[error("IMAP server does not advertise IDLE capability")]
    IdleNotSupported,

    /// The server rejected the credentials.
    #[error("IMAP login rejected: {0}")]
    Login(#[source] async_imap::error::Error),
}

/// Connect and authenticate, yielding a session that is ready to IDLE.
///
/// Each call builds a fresh TCP, TLS and IMAP stack; safe to call again
/// after a prior session was discarded.
pub async fn establish(params: Params<'_>) -> Result<Session, EstablishError> {
    let Params {
        host,
        port,
        username,
        password,
    } = params;

    let tcp_stream = tokio::net::TcpStream::connect((host, port)).await?;
    let tls_stream = imap_tls::secure(host, tcp_stream).await?;

    let mut client = async_imap::Client::new(tls_stream);
    client
        .read_response()
        .await
        .ok_or(EstablishError::MissingGreeting)??;

    let mut session = client
        .login(username, password)
        .await
        .map_err(|(err, _client)| EstablishError::Login(err))?;

    let capabilities = session
        .capabilities()
        .await
        .map_err(EstablishError::Imap)?;
    if !capabilities.has_str("IDLE") {
        return Err(EstablishError::IdleNotSupported);
    }

    tracing::debug!(host, port, "IMAP session established");
    Ok(session)
}
