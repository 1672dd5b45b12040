//! CPU-based worker for vanity keypair generation.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::Sender;
use tracing::{debug, warn};

use crate::crypto::{Keypair, Pubkey};
use crate::matcher::Pattern;
use crate::token::get_associated_token_address_with_program_id;

use super::VanityResult;

/// What a generated keypair is matched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchTarget {
    /// The keypair's own public key
    #[default]
    PublicKey,
    /// The associated token address the keypair would own for `mint`
    AssociatedAddress {
        mint: Pubkey,
        token_program_id: Pubkey,
    },
}

/// Statistics for a CPU worker.
#[derive(Debug, Default)]
pub struct WorkerStats {
    /// Total keys generated
    pub keys_generated: AtomicU64,
    /// Matches found
    pub matches_found: AtomicU64,
}

impl WorkerStats {
    /// Creates new worker stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total keys generated.
    pub fn total_keys(&self) -> u64 {
        self.keys_generated.load(Ordering::Relaxed)
    }

    /// Returns the total matches found.
    pub fn total_matches(&self) -> u64 {
        self.matches_found.load(Ordering::Relaxed)
    }
}

/// A CPU worker that generates and tests keypairs.
pub struct CpuWorker {
    /// Worker ID
    id: usize,
    /// The pattern to match against
    pattern: Pattern,
    /// What the pattern is matched on
    target: SearchTarget,
    /// Channel to send results
    result_tx: Sender<VanityResult>,
    /// Shared stop flag
    stop_flag: Arc<AtomicBool>,
    /// Worker statistics
    stats: Arc<WorkerStats>,
}

impl CpuWorker {
    /// Creates a new CPU worker.
    pub fn new(
        id: usize,
        pattern: Pattern,
        target: SearchTarget,
        result_tx: Sender<VanityResult>,
        stop_flag: Arc<AtomicBool>,
        stats: Arc<WorkerStats>,
    ) -> Self {
        Self {
            id,
            pattern,
            target,
            result_tx,
            stop_flag,
            stats,
        }
    }

    /// Runs the worker loop.
    ///
    /// Generates keypairs and tests them against the pattern until:
    /// - Stop flag is set
    /// - Channel is closed
    pub fn run(&self) {
        // Process in batches to reduce atomic operation overhead
        const BATCH_SIZE: u64 = 256;

        debug!(worker = self.id, target = ?self.target, "worker started");

        'search: loop {
            if self.stop_flag.load(Ordering::Relaxed) {
                break;
            }

            for tried in 1..=BATCH_SIZE {
                let keypair = Keypair::generate();
                let Some(result) = self.check(&keypair) else {
                    continue;
                };

                self.stats.matches_found.fetch_add(1, Ordering::Relaxed);
                if self.result_tx.send(result).is_err() {
                    // Receiver dropped: nobody is waiting for results.
                    self.stats.keys_generated.fetch_add(tried, Ordering::Relaxed);
                    break 'search;
                }
            }

            self.stats.keys_generated.fetch_add(BATCH_SIZE, Ordering::Relaxed);
        }

        debug!(worker = self.id, "worker stopped");
    }

    /// Tests a single keypair, returning a result if it matches.
    pub fn check(&self, keypair: &Keypair) -> Option<VanityResult> {
        let pubkey = keypair.pubkey();
        let associated_address = match self.target {
            SearchTarget::PublicKey => {
                if !self.pattern.matches(&pubkey).is_match() {
                    return None;
                }
                None
            }
            SearchTarget::AssociatedAddress {
                mint,
                token_program_id,
            } => {
                let address = match get_associated_token_address_with_program_id(
                    &pubkey,
                    &mint,
                    &token_program_id,
                ) {
                    Ok(address) => address,
                    Err(err) => {
                        warn!(worker = self.id, %pubkey, %err, "skipping keypair");
                        return None;
                    }
                };
                if !self.pattern.matches(&address).is_match() {
                    return None;
                }
                Some(address)
            }
        };

        Some(VanityResult {
            pubkey,
            secret_key: keypair.to_base58_string(),
            associated_address,
            worker_id: self.id,
        })
    }
}
