//! # associated_address
//!
//! Solana associated token address derivation, program-derived addresses
//! and vanity keypair search.
//!
//! ## Architecture
//!
//! - `crypto`: Public keys, ed25519 keypairs and program-derived addresses
//! - `token`: Associated token address derivation and well-known program ids
//! - `matcher`: Pattern matching strategies
//! - `worker`: Parallel execution and worker pool management
//! - `config`: Runtime configuration

pub mod config;
pub mod crypto;
pub mod matcher;
pub mod token;
pub mod worker;

pub use config::Config;
pub use crypto::{create_program_address, find_program_address, Keypair, PdaError, Pubkey};
pub use matcher::{MatchResult, Pattern, PatternType};
pub use token::{
    get_associated_token_address, get_associated_token_address_and_bump_seed,
    get_associated_token_address_checked, get_associated_token_address_with_program_id,
    TokenError,
};
pub use worker::{SearchTarget, VanityResult, WorkerPool};
