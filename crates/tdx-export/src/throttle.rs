//! Fixed-pause batch throttle.
//!
//! After every `batch_size` scanned records the pipeline sleeps for a fixed
//! duration. There is no token bucket and no adaptive backoff; the pause
//! only bounds how hard one export leans on the store.

use std::num::NonZeroUsize;
use std::thread;
use std::time::Duration;
use tracing::info;

/// Block the current thread for `duration`. Zero returns immediately.
pub fn pause(duration: Duration) {
    if !duration.is_zero() {
        thread::sleep(duration);
    }
}

/// Counts scanned records and pauses at each batch boundary.
#[derive(Debug)]
pub struct BatchThrottle {
    batch_size: NonZeroUsize,
    pause: Duration,
    position: usize,
    pauses: u64,
}

impl BatchThrottle {
    /// Create a throttle that pauses for `pause` every `batch_size` records.
    pub fn new(batch_size: NonZeroUsize, pause: Duration) -> Self {
        Self {
            batch_size,
            pause,
            position: 0,
            pauses: 0,
        }
    }

    /// Count one record. Returns true if this record closed a batch and
    /// the throttle paused.
    pub fn record(&mut self) -> bool {
        self.position += 1;
        if self.position < self.batch_size.get() {
            return false;
        }

        info!(pause = ?self.pause, "Processing trades SLEEPING");
        pause(self.pause);
        self.position = 0;
        self.pauses += 1;
        true
    }

    /// Number of batch boundaries reached so far.
    pub fn pauses(&self) -> u64 {
        self.pauses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn batch(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_pauses_every_batch() {
        let mut throttle = BatchThrottle::new(batch(2), Duration::ZERO);

        let boundaries: Vec<bool> = (0..5).map(|_| throttle.record()).collect();

        assert_eq!(boundaries, vec![false, true, false, true, false]);
        assert_eq!(throttle.pauses(), 2);
    }

    #[test]
    fn test_batch_of_one_pauses_every_record() {
        let mut throttle = BatchThrottle::new(batch(1), Duration::ZERO);
        assert!(throttle.record());
        assert!(throttle.record());
        assert_eq!(throttle.pauses(), 2);
    }

    #[test]
    fn test_pause_sleeps() {
        let mut throttle = BatchThrottle::new(batch(1), Duration::from_millis(20));
        let start = Instant::now();
        throttle.record();
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_zero_pause_returns_immediately() {
        let start = Instant::now();
        pause(Duration::ZERO);
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
