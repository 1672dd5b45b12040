//! Worker pool for parallel vanity keypair search.
//!
//! This module provides:
//! - Multi-threaded CPU workers
//! - Coordinated work distribution
//! - Progress tracking and reporting

mod cpu;
mod pool;

pub use cpu::{CpuWorker, SearchTarget, WorkerStats};
pub use pool::{VanityResult, WorkerPool};
