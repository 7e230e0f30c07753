//! IMAP connectivity helpers.

use std::time::Duration;

/// A plain-text test session against the container.
pub type TestSession = async_imap::Session<tokio::net::TcpStream>;

/// Connects and logs in, retrying until the container accepts commands.
pub async fn connect_with_retry(
    host: &str,
    port: u16,
    user: &str,
    password: &str,
) -> Result<TestSession, std::io::Error> {
    let mut attempts_left = 60u8;
    loop {
        match try_connect(host, port, user, password).await {
            Ok(session) => return Ok(session),
            Err(err) if attempts_left == 0 => return Err(err),
            Err(_) => {
                attempts_left -= 1;
                tokio::time::sleep(Duration::from_millis(250)).await;
            }
        }
    }
}

async fn try_connect(
    host: &str,
    port: u16,
    user: &str,
    password: &str,
) -> Result<TestSession, std::io::Error> {
    let stream = tokio::net::TcpStream::connect((host, port)).await?;

    let mut client = async_imap::Client::new(stream);
    let Some(_greeting) = client.read_response().await.transpose()? else {
        return Err(std::io::Error::other("missing IMAP greeting"));
    };

    client
        .login(user, password)
        .await
        .map_err(|(err, _client)| std::io::Error::other(err))
}
