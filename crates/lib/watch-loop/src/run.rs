//! The watch loop state machine.

use watch_core::{Classify as _, Connect, ErrorClass, Mailbox};

/// Consecutive login rejections tolerated before the loop gives up.
pub const DEFAULT_AUTH_ATTEMPTS: u32 = 3;

/// Parameters for [`run`].
pub struct Params<'a, C, Notify> {
    /// Factory for live sessions.
    pub connector: &'a C,

    /// Hook invoked once per harvested message.
    ///
    /// Infallible from the loop's perspective; callers wrap fallible
    /// hooks and log their failures.
    pub notify: Notify,

    /// Cooperative stop signal, observed inside the blocking wait and
    /// at cycle boundaries.
    pub cancel: &'a tokio_util::sync::CancellationToken,

    /// Reconnect delay schedule for transient failures.
    pub reconnect: crate::Backoff,

    /// Consecutive login rejections tolerated before giving up.
    pub auth_attempts: u32,
}

/// Errors that terminate the loop.
///
/// Everything transient is recovered internally; only failures that
/// reconnecting can never fix escape here.
#[derive(Debug, thiserror::Error)]
pub enum RunError<E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    /// The server lacks a required feature.
    #[error("server cannot satisfy the watcher: {0}")]
    Unsupported(#[source] E),

    /// The credentials were rejected on every attempt.
    #[error("authentication rejected {attempts} times: {last}")]
    AuthRejected {
        /// How many times login was attempted.
        attempts: u32,

        /// The final rejection.
        #[source]
        last: E,
    },
}

/// Run the watch loop until cancellation or an unrecoverable failure.
///
/// Cycle: connect, wait for activity, harvest, notify each record,
/// purge, repeat. Exactly one session exists at a time; any transient
/// failure discards it and reconnects with backoff. A message is never
/// purged before its notification returned.
pub async fn run<C, Notify, NotifyFut>(params: Params<'_, C, Notify>) -> Result<(), RunError<C::Error>>
where
    C: Connect,
    Notify: FnMut(watch_core::HarvestedMail) -> NotifyFut + Send,
    NotifyFut: Future<Output = ()> + Send,
{
    let Params {
        connector,
        mut notify,
        cancel,
        reconnect: mut backoff,
        auth_attempts,
    } = params;

    let mut auth_failures = 0u32;

    'reconnect: loop {
        if cancel.is_cancelled() {
            return Ok(());
        }

        let mut mailbox = match connector.connect().await {
            Ok(mailbox) => {
                auth_failures = 0;
                backoff.reset();
                mailbox
            }
            Err(err) => match err.classify() {
                ErrorClass::Fatal => return Err(RunError::Unsupported(err)),
                ErrorClass::Auth => {
                    auth_failures += 1;
                    if auth_failures >= auth_attempts {
                        return Err(RunError::AuthRejected {
                            attempts: auth_failures,
                            last: err,
                        });
                    }
                    tracing::warn!(error = %err, attempt = auth_failures, "login rejected, retrying");
                    continue;
                }
                ErrorClass::Transient => {
                    let delay = backoff.advance();
                    tracing::warn!(error = %err, retry_in = ?delay, "connect failed, reconnecting after delay");
                    tokio::select! {
                        () = tokio::time::sleep(delay) => {}
                        () = cancel.cancelled() => return Ok(()),
                    }
                    continue;
                }
            },
        };

        loop {
            let wake = match mailbox.wait(cancel).await {
                Ok((awake, wake)) => {
                    mailbox = awake;
                    wake
                }
                Err(err) => {
                    tracing::warn!(error = %err, "wait failed, discarding session");
                    continue 'reconnect;
                }
            };

            if cancel.is_cancelled() {
                mailbox.close().await;
                return Ok(());
            }

            // Spurious wakes and idle timeouts yield an empty batch and
            // an uneventful cycle.
            let harvested = match mailbox.harvest().await {
                Ok(harvested) => harvested,
                Err(err) => {
                    tracing::warn!(error = %err, "harvest failed, discarding session");
                    continue 'reconnect;
                }
            };

            if !harvested.is_empty() {
                tracing::info!(count = harvested.len(), wake = ?wake, "harvested messages");
            }

            // Every record is delivered before any deletion commits.
            for mail in harvested {
                notify(mail).await;
            }

            match mailbox.purge().await {
                Ok(0) => {}
                Ok(committed) => tracing::info!(committed, "purged messages"),
                Err(err) => {
                    tracing::warn!(
                        error = %err,
                        "purge failed, flags persist server-side, discarding session"
                    );
                    continue 'reconnect;
                }
            }

            if cancel.is_cancelled() {
                mailbox.close().await;
                return Ok(());
            }
        }
    }
}
