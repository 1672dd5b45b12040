//! Cryptographic primitives for Solana keys and addresses.
//!
//! This module provides:
//! - Public keys with base-58 encoding and an ed25519 on-curve check
//! - Ed25519 keypair generation, restoring and signing
//! - Program-derived address search

mod keypair;
pub mod pda;
mod pubkey;

pub use keypair::{verify_signature, Keypair, KeypairError, KEYPAIR_LENGTH, SEED_LENGTH};
pub use pda::{create_program_address, find_program_address, PdaError};
pub use pubkey::{Pubkey, PubkeyError, MAX_BASE58_LEN, PUBKEY_BYTES};
