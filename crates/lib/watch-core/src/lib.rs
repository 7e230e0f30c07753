//! Shared vocabulary for the mailbox watch loop.
//!
//! The watch loop is generic over these traits so that the IMAP-backed
//! implementation and in-memory test doubles are interchangeable.

/// Why a blocking wait returned.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Wake {
    /// The server pushed an unsolicited status update (e.g. new mail).
    ServerPush,

    /// The client-side idle ceiling elapsed with no server activity.
    TimedOut,

    /// The wait was interrupted by a local stop request.
    Interrupted,
}

/// A message harvested from the watched folder.
///
/// The identifier is server-assigned and becomes invalid once purged.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct HarvestedMail {
    /// Server-assigned message identifier (IMAP UID).
    pub uid: u32,

    /// Sender address extracted from the `From` header.
    ///
    /// `None` when the headers were malformed; the record still flows
    /// through notification and purge.
    pub sender: Option<String>,
}

/// How a failure should be handled by the watch loop.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ErrorClass {
    /// The server can never satisfy the watcher; terminate.
    Fatal,

    /// Credentials rejected; retried a bounded number of times, then fatal.
    Auth,

    /// Network or protocol failure; recovered by a full reconnect.
    Transient,
}

/// Classification of connection failures for the retry policy.
pub trait Classify {
    /// Classify the failure.
    fn classify(&self) -> ErrorClass;
}

/// One live authenticated session on the watched folder.
///
/// `wait` takes the session by value because the underlying blocking
/// wait consumes it; it is handed back together with the wake signal.
/// On any error the session is considered lost and must be replaced
/// through [`Connect`].
pub trait Mailbox: Sized + Send {
    /// Failure of a session operation. Always recovered by reconnecting.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Re-select the folder and block until server activity, the idle
    /// ceiling, or cancellation.
    fn wait(
        self,
        cancel: &tokio_util::sync::CancellationToken,
    ) -> impl Future<Output = Result<(Self, Wake), Self::Error>> + Send;

    /// Retrieve all undeleted messages, extract senders and flag each
    /// for deletion. An empty candidate set yields `Ok(vec![])`.
    fn harvest(&mut self) -> impl Future<Output = Result<Vec<HarvestedMail>, Self::Error>> + Send;

    /// Commit all pending deletion flags in one batch; returns the
    /// number of messages removed.
    fn purge(&mut self) -> impl Future<Output = Result<u64, Self::Error>> + Send;

    /// Tear the session down gracefully. Best effort; only used on an
    /// operator-requested stop.
    fn close(self) -> impl Future<Output = ()> + Send;
}

/// Factory for live sessions; called once at startup and on every
/// reconnect.
pub trait Connect: Sync {
    /// The session type produced.
    type Mailbox: Mailbox;

    /// Connection failure, classified for the retry policy.
    type Error: Classify + std::error::Error + Send + Sync + 'static;

    /// Establish a fresh session. Each call must yield an independent
    /// session reusing nothing from prior ones.
    fn connect(&self) -> impl Future<Output = Result<Self::Mailbox, Self::Error>> + Send;
}
