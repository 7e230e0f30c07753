//! Environment configuration for the mailbox watcher.
//!
//! All settings are read once at startup into an immutable [`Config`]
//! value; nothing reads the environment after that.

mod password;

pub use password::Password;

/// Default IMAP host.
pub const DEFAULT_SERVER: &str = "imap.gmail.com";

/// Default IMAP port (implicit TLS).
pub const DEFAULT_PORT: u16 = 993;

/// Default watched folder.
pub const DEFAULT_FOLDER: &str = "INBOX";

/// Default client-side idle ceiling (25 minutes).
///
/// Kept under the ~29 minute cap most servers apply to IDLE.
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 1500;

/// Fully resolved watcher configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// IMAP server hostname.
    pub server: String,

    /// IMAP port.
    pub port: u16,

    /// Username for IMAP authentication.
    pub username: String,

    /// Password for IMAP authentication.
    pub password: Password,

    /// Folder to watch.
    pub folder: String,

    /// Client-side idle ceiling.
    pub idle_timeout: std::time::Duration,

    /// Verbose protocol logging.
    pub debug: bool,
}

/// The env reading error for a variable parsed as `T`.
type VarError<T> = envfury::Error<envfury::ValueError<<T as std::str::FromStr>::Err>>;

/// The env reading error for a required variable parsed as `T`.
type MustVarError<T> = envfury::Error<envfury::MustError<<T as std::str::FromStr>::Err>>;

/// Errors returned while reading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum FromEnvError {
    /// `MAILREAP_SERVER` reading error.
    #[error("MAILREAP_SERVER env var read: {0}")]
    Server(#[source] VarError<String>),

    /// `MAILREAP_PORT` reading error.
    #[error("MAILREAP_PORT env var read: {0}")]
    Port(#[source] VarError<u16>),

    /// `MAILREAP_USERNAME` reading error.
    #[error("MAILREAP_USERNAME env var read: {0}")]
    Username(#[source] MustVarError<String>),

    /// `MAILREAP_PASSWORD` reading error.
    #[error("MAILREAP_PASSWORD env var read: {0}")]
    Password(#[source] MustVarError<String>),

    /// `MAILREAP_FOLDER` reading error.
    #[error("MAILREAP_FOLDER env var read: {0}")]
    Folder(#[source] VarError<String>),

    /// `MAILREAP_IDLE_TIMEOUT_SECS` reading error.
    #[error("MAILREAP_IDLE_TIMEOUT_SECS env var read: {0}")]
    IdleTimeout(#[source] VarError<u64>),

    /// `MAILREAP_DEBUG` reading error.
    #[error("MAILREAP_DEBUG env var read: {0}")]
    Debug(#[source] VarError<bool>),
}

impl Config {
    /// Read the configuration from `MAILREAP_*` environment variables.
    ///
    /// Missing username or password fails immediately, before any
    /// network activity.
    pub fn from_env() -> Result<Self, FromEnvError> {
        let server = envfury::or("MAILREAP_SERVER", DEFAULT_SERVER.to_string())
            .map_err(FromEnvError::Server)?;
        let port = envfury::or("MAILREAP_PORT", DEFAULT_PORT).map_err(FromEnvError::Port)?;
        let username: String =
            envfury::must("MAILREAP_USERNAME").map_err(FromEnvError::Username)?;
        let password: String =
            envfury::must("MAILREAP_PASSWORD").map_err(FromEnvError::Password)?;
        let folder = envfury::or("MAILREAP_FOLDER", DEFAULT_FOLDER.to_string())
            .map_err(FromEnvError::Folder)?;
        let idle_timeout_secs = envfury::or("MAILREAP_IDLE_TIMEOUT_SECS", DEFAULT_IDLE_TIMEOUT_SECS)
            .map_err(FromEnvError::IdleTimeout)?;
        let debug = envfury::or("MAILREAP_DEBUG", false).map_err(FromEnvError::Debug)?;

        Ok(Self {
            server,
            port,
            username,
            password: Password::from(password),
            folder,
            idle_timeout: std::time::Duration::from_secs(idle_timeout_secs),
            debug,
        })
    }
}
