//! Program-derived addresses.
//!
//! A program-derived address is `sha256(seeds || program_id || PDA_MARKER)`
//! constrained to fall off the ed25519 curve, so that no private key can
//! ever sign for it.

use sha2::{Digest, Sha256};
use tracing::trace;

use super::Pubkey;

/// Maximum length of a single seed, in bytes.
pub const MAX_SEED_LEN: usize = 32;

/// Maximum number of seeds, including the bump seed.
pub const MAX_SEEDS: usize = 16;

/// Domain separator appended to every derivation preimage.
pub const PDA_MARKER: &[u8; 21] = b"ProgramDerivedAddress";

/// Errors that can occur while deriving a program address.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PdaError {
    #[error("Length of the seed is too long for address generation")]
    MaxSeedLengthExceeded,

    #[error("Too many seeds for address generation")]
    MaxSeedsExceeded,

    #[error("Provided seeds do not result in a valid address")]
    InvalidSeeds,

    #[error("Unable to find a viable program address bump seed")]
    DerivationExhausted,
}

fn check_seeds(seeds: &[&[u8]], max_seeds: usize) -> Result<(), PdaError> {
    if seeds.len() > max_seeds {
        return Err(PdaError::MaxSeedsExceeded);
    }
    if seeds.iter().any(|seed| seed.len() > MAX_SEED_LEN) {
        return Err(PdaError::MaxSeedLengthExceeded);
    }
    Ok(())
}

/// Starts a hash over the seeds; callers finish it with [`finish_hash`].
fn hash_seeds(seeds: &[&[u8]]) -> Sha256 {
    let mut hasher = Sha256::new();
    for seed in seeds {
        hasher.update(seed);
    }
    hasher
}

fn finish_hash(mut hasher: Sha256, program_id: &Pubkey) -> Pubkey {
    hasher.update(program_id.as_ref());
    hasher.update(PDA_MARKER);
    Pubkey::new_from_array(hasher.finalize().into())
}

/// Derives a program address from `seeds` and `program_id`.
///
/// Fails with [`PdaError::InvalidSeeds`] when the resulting hash happens to
/// be a valid curve point; use [`find_program_address`] to search for a
/// bump seed that avoids this.
pub fn create_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> Result<Pubkey, PdaError> {
    check_seeds(seeds, MAX_SEEDS)?;

    let address = finish_hash(hash_seeds(seeds), program_id);
    if address.is_on_curve() {
        return Err(PdaError::InvalidSeeds);
    }
    Ok(address)
}

/// Finds a valid program address and its bump seed.
///
/// Appends a single bump byte to `seeds`, starting at 255 and counting
/// down, and returns the first combination whose hash falls off the curve.
/// Every call with the same inputs returns the same `(address, bump)`.
pub fn find_program_address(
    seeds: &[&[u8]],
    program_id: &Pubkey,
) -> Result<(Pubkey, u8), PdaError> {
    // The bump takes one of the seed slots.
    check_seeds(seeds, MAX_SEEDS - 1)?;

    let prefix = hash_seeds(seeds);
    for bump in (1..=u8::MAX).rev() {
        let mut hasher = prefix.clone();
        hasher.update([bump]);
        let address = finish_hash(hasher, program_id);

        if !address.is_on_curve() {
            trace!(%address, bump, "found program address");
            return Ok((address, bump));
        }
    }

    Err(PdaError::DerivationExhausted)
}
