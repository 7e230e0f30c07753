//! IMAP IDLE wait routine.

/// Errors returned while waiting for mailbox activity.
#[derive(Debug, thiserror::Error)]
pub enum WaitError {
    /// IMAP protocol error.
    #[error("IMAP error: {0}")]
    Imap(#[from] async_imap::error::Error),
}

/// Re-select the folder and block until the server pushes an update,
/// the idle ceiling elapses, or the cancellation token fires.
///
/// Re-selecting an already-selected folder is idempotent, and doing it
/// every cycle keeps the selection correct across reconnects. The IDLE
/// handle consumes the session; DONE is always sent before the session
/// is handed back, so it is command-ready on return. Keep
/// `idle_timeout` under the ~29 minute server-side cap.
pub async fn wait<S>(
    mut session: async_imap::Session<S>,
    folder: &str,
    idle_timeout: std::time::Duration,
    cancel: &tokio_util::sync::CancellationToken,
) -> Result<(async_imap::Session<S>, watch_core::Wake), WaitError>
where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin + Send + std::fmt::Debug,
{
    session.select(folder).await?;

    let mut idle_handle = session.idle();
    idle_handle.init().await?;

    let idle_response = {
        let (idle_wait, interrupt) = idle_handle.wait_with_timeout(idle_timeout);
        tokio::pin!(idle_wait);

        // Dropping the interrupt handle unblocks the wait with
        // ManualInterrupt; the loop then resumes awaiting the wait future.
        let mut interrupt = Some(interrupt);
        loop {
            tokio::select! {
                response = &mut idle_wait => break response?,
                () = cancel.cancelled(), if interrupt.is_some() => {
                    tracing::debug!("stop requested, interrupting idle wait");
                    drop(interrupt.take());
                }
            }
        }
    };

    let session = idle_handle.done().await?;

    let wake = match idle_response {
        async_imap::extensions::idle::IdleResponse::NewData(_) => {
            tracing::debug!("idle woke on server push");
            watch_core::Wake::ServerPush
        }
        async_imap::extensions::idle::IdleResponse::Timeout => {
            tracing::debug!("idle ceiling elapsed");
            watch_core::Wake::TimedOut
        }
        async_imap::extensions::idle::IdleResponse::ManualInterrupt => {
            watch_core::Wake::Interrupted
        }
    };

    Ok((session, wake))
}
