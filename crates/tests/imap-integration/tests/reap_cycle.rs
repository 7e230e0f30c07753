//! Docker-backed harvest and purge round-trip tests.

use std::error::Error;
use std::time::Duration;

const IMAP_USER: &str = "test";
const IMAP_PASSWORD: &str = "secret";

const FIRST_MESSAGE: &[u8] = b"From: a@x.com\r\nSubject: one\r\n\r\nfirst\r\n";
const SECOND_MESSAGE: &[u8] = b"From: b@y.com\r\nSubject: two\r\n\r\nsecond\r\n";

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn harvest_notify_purge_roundtrip() -> Result<(), Box<dyn Error + Send + Sync>> {
    imap_integration::require_integration_tests_enabled()?;

    let container = imap_integration::start_greenmail(IMAP_USER, IMAP_PASSWORD).await?;
    let host = container.get_host().await?.to_string();
    let port = container
        .get_host_port_ipv4(imap_integration::IMAP_PORT)
        .await?;

    let mut session =
        imap_integration::connect_with_retry(&host, port, IMAP_USER, IMAP_PASSWORD).await?;
    session.select("INBOX").await?;

    session.append("INBOX", None, None, FIRST_MESSAGE).await?;
    session.append("INBOX", None, None, SECOND_MESSAGE).await?;
    session.noop().await?;

    let harvested = mail_harvest::harvest(&mut session).await?;
    let senders: Vec<_> = harvested
        .iter()
        .map(|mail| mail.sender.as_deref())
        .collect();
    assert_eq!(senders, vec![Some("a@x.com"), Some("b@y.com")]);

    let uids: Vec<u32> = harvested.iter().map(|mail| mail.uid).collect();
    let mut ascending = uids.clone();
    ascending.sort_unstable();
    assert_eq!(uids, ascending);

    let committed = mail_harvest::purge(&mut session).await?;
    assert_eq!(committed, 2);

    let leftover = mail_harvest::harvest(&mut session).await?;
    assert!(leftover.is_empty());

    session.logout().await?;

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn idle_wakes_on_appended_mail() -> Result<(), Box<dyn Error + Send + Sync>> {
    imap_integration::require_integration_tests_enabled()?;

    let container = imap_integration::start_greenmail(IMAP_USER, IMAP_PASSWORD).await?;
    let host = container.get_host().await?.to_string();
    let port = container
        .get_host_port_ipv4(imap_integration::IMAP_PORT)
        .await?;

    let watcher =
        imap_integration::connect_with_retry(&host, port, IMAP_USER, IMAP_PASSWORD).await?;

    let appender = {
        let host = host.clone();
        tokio::spawn(async move {
            let mut session =
                imap_integration::connect_with_retry(&host, port, IMAP_USER, IMAP_PASSWORD)
                    .await?;
            tokio::time::sleep(Duration::from_secs(2)).await;
            session.append("INBOX", None, None, FIRST_MESSAGE).await?;
            session.logout().await?;
            Ok::<(), Box<dyn Error + Send + Sync>>(())
        })
    };

    let cancel = tokio_util::sync::CancellationToken::new();
    let (mut session, wake) =
        idle_wait::wait(watcher, "INBOX", Duration::from_secs(60), &cancel).await?;
    appender.await??;

    assert_eq!(wake, watch_core::Wake::ServerPush);

    let harvested = mail_harvest::harvest(&mut session).await?;
    assert_eq!(harvested.len(), 1);
    assert_eq!(harvested[0].sender.as_deref(), Some("a@x.com"));

    session.logout().await?;

    Ok(())
}
