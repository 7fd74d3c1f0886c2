//! In-flight call accounting shared by the client components.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Number of remote calls currently in flight.
#[derive(Debug, Default)]
pub(crate) struct InFlight(AtomicUsize);

impl InFlight {
    pub(crate) fn is_busy(&self) -> bool {
        self.0.load(Ordering::SeqCst) > 0
    }

    /// Count a call until the returned guard is dropped.
    pub(crate) fn start(&self) -> Pending<'_> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Pending(&self.0)
    }
}

/// Marks a remote call in flight for as long as it is alive. Dropping the
/// future that owns it (timeout, abandoned request) releases it too.
pub(crate) struct Pending<'a>(&'a AtomicUsize);

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlapping_calls_keep_busy_until_last_ends() {
        let in_flight = InFlight::default();
        let first = in_flight.start();
        let second = in_flight.start();

        drop(first);
        assert!(in_flight.is_busy());

        drop(second);
        assert!(!in_flight.is_busy());
    }
}
