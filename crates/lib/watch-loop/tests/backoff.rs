//! Tests for the reconnect delay schedule.

use std::time::Duration;

#[test]
fn doubles_up_to_the_ceiling() {
    let mut backoff = watch_loop::Backoff::new(Duration::from_secs(1), 2, Duration::from_secs(30));

    let delays: Vec<_> = (0..7).map(|_| backoff.advance()).collect();
    assert_eq!(
        delays,
        [1, 2, 4, 8, 16, 30, 30].map(Duration::from_secs).to_vec()
    );
}

#[test]
fn reset_snaps_back_to_initial() {
    let mut backoff = watch_loop::Backoff::new(Duration::from_secs(1), 2, Duration::from_secs(30));

    backoff.advance();
    backoff.advance();
    backoff.reset();

    assert_eq!(backoff.advance(), Duration::from_secs(1));
}

#[test]
fn default_matches_reconnect_policy() {
    let mut backoff = watch_loop::Backoff::default();
    assert_eq!(backoff.advance(), Duration::from_secs(1));
    assert_eq!(backoff.advance(), Duration::from_secs(2));
}
