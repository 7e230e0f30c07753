//! Sender address extraction.

use mailparse::MailHeaderMap as _;

/// Extract the first `From` address from a raw RFC 2822 message.
///
/// Handles bare addresses and the `Display Name <addr>` form. Returns
/// `None` when the headers cannot be parsed or carry no usable `From`
/// value.
pub fn extract_sender(raw: &[u8]) -> Option<String> {
    let parsed = mailparse::parse_mail(raw).ok()?;
    let from = parsed.headers.get_first_value("From")?;
    address_of(&from)
}

/// Pull the address out of a `From` header value.
fn address_of(header: &str) -> Option<String> {
    if let (Some(start), Some(end)) = (header.rfind('<'), header.rfind('>')) {
        if end > start {
            let addr = header[start + 1..end].trim();
            return (!addr.is_empty()).then(|| addr.to_string());
        }
    }

    let addr = header.trim();
    (!addr.is_empty() && addr.contains('@')).then(|| addr.to_string())
}
