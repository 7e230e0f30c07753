//! Main entrypoint for the mailbox watcher.

/// Install the fmt subscriber; the debug flag lowers the default filter.
fn init_tracing(debug: bool) {
    let default_filter = if debug { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

/// The business action behind the notification hook.
///
/// The watcher's contract ends at handing over the sender address; an
/// automatic response (or any other reaction) goes here. Hook failures
/// are logged and never reach the watch loop.
async fn notify(mail: watch_core::HarvestedMail) {
    match mail.sender {
        Some(sender) => tracing::info!(uid = mail.uid, %sender, "message received"),
        None => tracing::warn!(uid = mail.uid, "message received from unknown sender"),
    }
}

#[tokio::main]
async fn main() -> color_eyre::eyre::Result<()> {
    color_eyre::install()?;

    // Configuration is resolved before any network activity; missing
    // credentials terminate here with a non-zero exit.
    let config = watch_config::Config::from_env()?;
    init_tracing(config.debug);

    tracing::info!(
        server = %config.server,
        username = %config.username,
        folder = %config.folder,
        "starting mailbox watch"
    );

    let cancel = tokio_util::sync::CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("stop requested");
                cancel.cancel();
            }
        });
    }

    let connector = watch_imap::ImapConnector::new(config);

    watch_loop::run(watch_loop::Params {
        connector: &connector,
        notify: |mail| notify(mail),
        cancel: &cancel,
        reconnect: watch_loop::Backoff::default(),
        auth_attempts: watch_loop::DEFAULT_AUTH_ATTEMPTS,
    })
    .await?;

    tracing::info!("mailbox watch stopped");
    Ok(())
}
