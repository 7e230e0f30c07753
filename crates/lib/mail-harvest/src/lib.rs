//! Message harvesting and purge routines.

use futures_util::TryStreamExt as _;

mod sender;

pub use sender::extract_sender;

/// Search criterion for harvest candidates.
///
/// `UNDELETED` skips messages already flagged by a cycle whose purge
/// failed; those are committed by the next successful purge instead of
/// being fetched again.
const CANDIDATE_CRITERION: &str = "UNDELETED";

/// Fetch query: UID plus the raw message without touching `\Seen`.
const FETCH_QUERY: &str = "(UID BODY.PEEK[])";

/// Errors returned while harvesting messages.
#[derive(Debug, thiserror::Error)]
pub enum HarvestError {
    /// IMAP protocol error.
    #[error("IMAP error: {0}")]
    Imap(#[from] async_imap::error::Error),
}

/// Errors returned while purging flagged messages.
#[derive(Debug, thiserror::Error)]
pub enum PurgeError {
    /// IMAP protocol error.
    #[error("IMAP error: {0}")]
    Imap(#[from] async_imap::error::Error),
}

/// Harvest every undeleted message in the selected folder.
///
/// Messages are processed in ascending UID order: fetch the raw
/// content, extract the `From` address, then flag the message
/// `\Deleted`. A message with malformed headers yields an unknown
/// sender and does not abort the rest of the batch. The flags are not
/// visible externally until [`purge`] commits them.
pub async fn harvest<S>(
    session: &mut async_imap::Session<S>,
) -> Result<Vec<watch_core::HarvestedMail>, HarvestError>
where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin + Send + std::fmt::Debug,
{
    let candidates = session.uid_search(CANDIDATE_CRITERION).await?;
    let mut uids: Vec<u32> = candidates.into_iter().collect();
    uids.sort_unstable();

    let mut harvested = Vec::with_capacity(uids.len());
    for uid in uids {
        let uid_set = uid.to_string();

        let mut raw = None;
        {
            let mut fetches = session.uid_fetch(&uid_set, FETCH_QUERY).await?;
            while let Some(fetch) = fetches.try_next().await? {
                if fetch.uid == Some(uid) {
                    raw = fetch.body().map(<[u8]>::to_vec);
                }
            }
        }

        let sender = raw.as_deref().and_then(sender::extract_sender);
        if sender.is_none() {
            tracing::warn!(uid, "message has no parseable sender, harvesting anyway");
        }

        {
            let mut responses = session.uid_store(&uid_set, "+FLAGS (\\Deleted)").await?;
            while let Some(_response) = responses.try_next().await? {}
        }

        tracing::debug!(uid, sender = sender.as_deref(), "harvested message");
        harvested.push(watch_core::HarvestedMail { uid, sender });
    }

    Ok(harvested)
}

/// Commit all pending `\Deleted` flags in one EXPUNGE.
///
/// Returns the number of messages the server reported as removed. A
/// failure here is retryable: the flags persist server-side and commit
/// on the next successful purge.
pub async fn purge<S>(session: &mut async_imap::Session<S>) -> Result<u64, PurgeError>
where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin + Send + std::fmt::Debug,
{
    let mut expunged = std::pin::pin!(session.expunge().await?);
    let mut committed = 0u64;
    while let Some(_seq) = expunged.try_next().await? {
        committed += 1;
    }
    Ok(committed)
}
