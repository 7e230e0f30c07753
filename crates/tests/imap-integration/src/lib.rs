//! Integration test harness crate.

mod greenmail;
mod imap;

pub use greenmail::*;
pub use imap::*;

/// Plain-text IMAP port inside the GreenMail container.
pub const IMAP_PORT: u16 = 3143;

/// Returns Ok when integration tests should run, otherwise logs a hint and returns an error.
pub fn require_integration_tests_enabled() -> Result<(), &'static str> {
    if std::env::var("RUN_IMAP_INTEGRATION_TESTS").is_ok() {
        return Ok(());
    }

    eprintln!("skipping IMAP integration tests; set RUN_IMAP_INTEGRATION_TESTS=true to run");

    Err("integration tests disabled")
}
