//! IMAP-backed implementation of the watch loop traits.

/// Connection failure, classified for the retry policy.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    /// Session establishment error.
    #[error(transparent)]
    Establish(#[from] imap_session::EstablishError),
}

impl watch_core::Classify for ConnectError {
    fn classify(&self) -> watch_core::ErrorClass {
        let Self::Establish(err) = self;
        match err {
            imap_session::EstablishError::IdleNotSupported => watch_core::ErrorClass::Fatal,
            imap_session::EstablishError::Login(_) => watch_core::ErrorClass::Auth,
            _ => watch_core::ErrorClass::Transient,
        }
    }
}

/// Failure of a session operation; always recovered by reconnecting.
#[derive(Debug, thiserror::Error)]
pub enum MailboxError {
    /// Idle wait error.
    #[error("wait error: {0}")]
    Wait(#[from] idle_wait::WaitError),

    /// Harvest error.
    #[error("harvest error: {0}")]
    Harvest(#[from] mail_harvest::HarvestError),

    /// Purge error.
    #[error("purge error: {0}")]
    Purge(#[from] mail_harvest::PurgeError),
}

/// Factory producing live IMAP sessions from the watcher configuration.
pub struct ImapConnector {
    config: watch_config::Config,
}

impl ImapConnector {
    /// Create a connector for the given configuration.
    pub fn new(config: watch_config::Config) -> Self {
        Self { config }
    }
}

impl watch_core::Connect for ImapConnector {
    type Mailbox = ImapMailbox;
    type Error = ConnectError;

    async fn connect(&self) -> Result<ImapMailbox, ConnectError> {
        tracing::info!(
            server = %self.config.server,
            port = self.config.port,
            folder = %self.config.folder,
            "connecting to IMAP server"
        );

        let session = imap_session::establish(imap_session::Params {
            host: &self.config.server,
            port: self.config.port,
            username: &self.config.username,
            password: self.config.password.as_str(),
        })
        .await?;

        Ok(ImapMailbox {
            session,
            folder: self.config.folder.clone(),
            idle_timeout: self.config.idle_timeout,
        })
    }
}

/// One live authenticated session on the watched folder.
pub struct ImapMailbox {
    /// The live session; replaced wholesale on every reconnect.
    session: imap_session::Session,

    /// Watched folder, re-selected at the start of every wait.
    folder: String,

    /// Client-side idle ceiling.
    idle_timeout: std::time::Duration,
}

impl watch_core::Mailbox for ImapMailbox {
    type Error = MailboxError;

    async fn wait(
        self,
        cancel: &tokio_util::sync::CancellationToken,
    ) -> Result<(Self, watch_core::Wake), MailboxError> {
        let Self {
            session,
            folder,
            idle_timeout,
        } = self;

        let (session, wake) = idle_wait::wait(session, &folder, idle_timeout, cancel).await?;

        Ok((
            Self {
                session,
                folder,
                idle_timeout,
            },
            wake,
        ))
    }

    async fn harvest(&mut self) -> Result<Vec<watch_core::HarvestedMail>, MailboxError> {
        Ok(mail_harvest::harvest(&mut self.session).await?)
    }

    async fn purge(&mut self) -> Result<u64, MailboxError> {
        Ok(mail_harvest::purge(&mut self.session).await?)
    }

    async fn close(self) {
        let mut session = self.session;
        if let Err(err) = session.logout().await {
            tracing::debug!(error = %err, "logout failed during shutdown");
        }
    }
}
