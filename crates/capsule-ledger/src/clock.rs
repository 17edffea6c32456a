use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// The ledger's trusted time source, in whole seconds since the UNIX epoch.
///
/// Unlock checks read this clock and never a caller-supplied timestamp.
/// Implementations must be monotonically nondecreasing.
pub trait Clock: Send + Sync {
    fn now_secs(&self) -> u64;
}

/// Wall-clock time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

/// A settable clock for tests and simulations.
///
/// Cloning shares the underlying instant, so a test can hold a handle while
/// the ledger owns its own copy.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(now_secs: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(now_secs)),
        }
    }

    /// Jump to an absolute time. Moving backwards is not supported.
    pub fn set(&self, now_secs: u64) {
        self.now.fetch_max(now_secs, Ordering::SeqCst);
    }

    /// Advance by `secs`.
    pub fn advance(&self, secs: u64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_secs(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_past_2020() {
        assert!(SystemClock.now_secs() > 1_577_836_800);
    }

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::new(100);
        assert_eq!(clock.now_secs(), 100);
        clock.advance(60);
        assert_eq!(clock.now_secs(), 160);
    }

    #[test]
    fn manual_clock_set_never_goes_backwards() {
        let clock = ManualClock::new(500);
        clock.set(400);
        assert_eq!(clock.now_secs(), 500);
        clock.set(600);
        assert_eq!(clock.now_secs(), 600);
    }

    #[test]
    fn clones_share_the_instant() {
        let clock = ManualClock::new(10);
        let handle = clock.clone();
        handle.advance(5);
        assert_eq!(clock.now_secs(), 15);
    }
}
