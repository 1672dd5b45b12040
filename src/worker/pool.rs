//! Worker pool management.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, Sender};
use tracing::{debug, info};

use crate::crypto::Pubkey;
use crate::matcher::Pattern;

use super::cpu::{CpuWorker, SearchTarget, WorkerStats};

/// Result of a successful vanity search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VanityResult {
    /// The keypair's public key
    pub pubkey: Pubkey,
    /// The 64-byte keypair, base-58 encoded
    pub secret_key: String,
    /// The associated token address, when that was the search target
    pub associated_address: Option<Pubkey>,
    /// The ID of the worker that found this result
    pub worker_id: usize,
}

/// Manages a pool of workers for parallel vanity keypair search.
pub struct WorkerPool {
    /// Number of workers
    num_workers: usize,
    /// Worker thread handles (Option to allow taking during join)
    handles: Option<Vec<JoinHandle<()>>>,
    /// Channel receiver for results
    result_rx: Receiver<VanityResult>,
    /// Shared stop flag
    stop_flag: Arc<AtomicBool>,
    /// Shared statistics
    stats: Arc<WorkerStats>,
    /// Start time
    start_time: Instant,
}

impl WorkerPool {
    /// Creates a new worker pool with the specified number of workers.
    ///
    /// Fails if a worker thread cannot be spawned; any workers already
    /// started are stopped again.
    pub fn new(num_workers: usize, pattern: Pattern, target: SearchTarget) -> io::Result<Self> {
        let (result_tx, result_rx) = bounded(100);
        let stop_flag = Arc::new(AtomicBool::new(false));
        let stats = Arc::new(WorkerStats::new());

        let handles = Self::spawn_workers(
            num_workers,
            &pattern,
            target,
            result_tx,
            stop_flag.clone(),
            stats.clone(),
        )?;
        info!(workers = num_workers, pattern = pattern.pattern(), "worker pool started");

        Ok(Self {
            num_workers,
            handles: Some(handles),
            result_rx,
            stop_flag,
            stats,
            start_time: Instant::now(),
        })
    }

    /// Spawns worker threads.
    fn spawn_workers(
        num_workers: usize,
        pattern: &Pattern,
        target: SearchTarget,
        result_tx: Sender<VanityResult>,
        stop_flag: Arc<AtomicBool>,
        stats: Arc<WorkerStats>,
    ) -> io::Result<Vec<JoinHandle<()>>> {
        let mut handles = Vec::with_capacity(num_workers);

        for id in 0..num_workers {
            let pattern = pattern.clone();
            let result_tx = result_tx.clone();
            let worker_stop = stop_flag.clone();
            let stats = stats.clone();

            let spawned = thread::Builder::new()
                .name(format!("vanity-worker-{}", id))
                .spawn(move || {
                    let worker = CpuWorker::new(id, pattern, target, result_tx, worker_stop, stats);
                    worker.run();
                });

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(err) => {
                    stop_flag.store(true, Ordering::Relaxed);
                    for handle in handles {
                        let _ = handle.join();
                    }
                    return Err(err);
                }
            }
        }

        Ok(handles)
    }

    /// Waits for a result with optional timeout.
    ///
    /// Returns `Some(result)` if a match is found, `None` if timeout expires.
    pub fn wait_for_result(&self, timeout: Duration) -> Option<VanityResult> {
        self.result_rx.recv_timeout(timeout).ok()
    }

    /// Signals all workers to stop.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }

    /// Stops all workers and waits for them to exit.
    pub fn join(mut self) {
        self.stop_and_join();
    }

    fn stop_and_join(&mut self) {
        self.stop();
        if let Some(handles) = self.handles.take() {
            // Keep draining so no worker stays blocked on a full channel.
            while !handles.iter().all(|handle| handle.is_finished()) {
                while self.result_rx.try_recv().is_ok() {}
                thread::sleep(Duration::from_millis(1));
            }
            for handle in handles {
                let _ = handle.join();
            }
            debug!(
                keys = self.total_keys(),
                matches = self.total_matches(),
                "worker pool stopped"
            );
        }
    }

    /// Returns the number of workers.
    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Returns the total keys generated across all workers.
    pub fn total_keys(&self) -> u64 {
        self.stats.total_keys()
    }

    /// Returns the total matches found.
    pub fn total_matches(&self) -> u64 {
        self.stats.total_matches()
    }

    /// Returns the elapsed time since the pool was created.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Returns the current generation rate (keys per second).
    pub fn keys_per_second(&self) -> f64 {
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.total_keys() as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Returns a clone of the stop flag for external use (e.g., signal handlers).
    pub fn stop_flag_clone(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    /// Returns true if the pool has been signaled to stop.
    pub fn is_stopped(&self) -> bool {
        self.stop_flag.load(Ordering::Relaxed)
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::PatternType;

    #[test]
    fn test_pool_finds_single_character_prefix() {
        // Roughly one key in 58 starts with any given character.
        let pattern = Pattern::new("2", PatternType::Prefix, true);
        let pool = WorkerPool::new(2, pattern.clone(), SearchTarget::PublicKey).unwrap();

        let result = pool
            .wait_for_result(Duration::from_secs(30))
            .expect("no result within timeout");
        assert!(pattern.matches(&result.pubkey).is_match());
        assert!(result.worker_id < 2);
        assert!(pool.total_matches() >= 1);

        pool.join();
    }

    #[test]
    fn test_pool_stop_flag() {
        let pattern = Pattern::new("zzzzzzzz", PatternType::Prefix, true);
        let pool = WorkerPool::new(1, pattern, SearchTarget::PublicKey).unwrap();
        assert!(!pool.is_stopped());

        pool.stop_flag_clone().store(true, Ordering::Relaxed);
        assert!(pool.is_stopped());
        assert_eq!(pool.num_workers(), 1);
        pool.join();
    }
}
