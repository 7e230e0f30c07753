//! Password wrapper type.

/// An IMAP password that never appears in logs.
///
/// The `Debug` representation is redacted so that configuration values
/// can be logged wholesale.
#[derive(Clone, Eq, PartialEq)]
pub struct Password(String);

impl Password {
    /// Expose the inner secret for authentication.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Password {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Password {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}
