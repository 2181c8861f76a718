//! Completion countdown between an orchestrator and its pipelines.
//!
//! The orchestrator owns a [`Completion`], hands one [`CompletionSignal`] to
//! each pipeline it launches, then waits. A signal completes when it is
//! consumed with [`CompletionSignal::done`] or simply dropped, so a worker
//! that returns early, fails, or panics still counts down exactly once.

use crossbeam::sync::WaitGroup;
use tracing::debug;

/// Orchestrator side of the countdown.
#[derive(Default)]
pub struct Completion {
    wait_group: WaitGroup,
    issued: usize,
}

impl Completion {
    /// Create a countdown with no outstanding signals.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a signal for one more worker.
    pub fn signal(&mut self) -> CompletionSignal {
        self.issued += 1;
        CompletionSignal {
            wait_group: self.wait_group.clone(),
            worker: self.issued,
        }
    }

    /// Number of signals handed out.
    pub fn issued(&self) -> usize {
        self.issued
    }

    /// Block until every issued signal has completed.
    pub fn wait(self) {
        debug!(workers = self.issued, "Waiting for pipelines to complete");
        self.wait_group.wait();
    }
}

/// Worker side of the countdown.
pub struct CompletionSignal {
    wait_group: WaitGroup,
    worker: usize,
}

impl CompletionSignal {
    /// Mark this worker as finished.
    pub fn done(self) {
        debug!(worker = self.worker, "Pipeline signalled completion");
        drop(self.wait_group);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_wait_without_workers_returns() {
        let completion = Completion::new();
        assert_eq!(completion.issued(), 0);
        completion.wait();
    }

    #[test]
    fn test_wait_blocks_until_all_done() {
        let mut completion = Completion::new();
        let finished = Arc::new(AtomicUsize::new(0));

        for i in 0..3 {
            let signal = completion.signal();
            let finished = Arc::clone(&finished);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(10 * (i + 1)));
                finished.fetch_add(1, Ordering::SeqCst);
                signal.done();
            });
        }

        assert_eq!(completion.issued(), 3);
        completion.wait();
        assert_eq!(finished.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_dropped_signal_completes() {
        let mut completion = Completion::new();
        let signal = completion.signal();
        drop(signal);
        completion.wait();
    }

    #[test]
    fn test_panicking_worker_completes() {
        let mut completion = Completion::new();
        let signal = completion.signal();

        let handle = thread::spawn(move || {
            let _signal = signal;
            panic!("worker failed");
        });

        completion.wait();
        assert!(handle.join().is_err());
    }
}
