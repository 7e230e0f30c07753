//! The watch-fetch-cleanup loop and its failure-recovery policy.

mod backoff;
mod run;

pub use backoff::*;
pub use run::*;
