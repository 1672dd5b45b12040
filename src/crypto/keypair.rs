//! Ed25519 keypair generation.

use std::fs;
use std::path::Path;

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;

use super::Pubkey;

/// Length of a serialized keypair: secret key followed by public key.
pub const KEYPAIR_LENGTH: usize = 64;

/// Length of the secret seed an ed25519 key is expanded from.
pub const SEED_LENGTH: usize = 32;

/// Errors that can occur when loading a keypair.
#[derive(Debug, thiserror::Error)]
pub enum KeypairError {
    #[error("Could not read keypair file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Keypair file must hold exactly 64 bytes, found {0}")]
    InvalidLength(usize),

    #[error("Public key does not match secret key")]
    Mismatch,
}

/// Represents an ed25519 keypair (signing key + derived public key).
#[derive(Debug, Clone)]
pub struct Keypair {
    signing_key: SigningKey,
    pubkey: Pubkey,
}

impl Keypair {
    /// Generates a new random keypair.
    ///
    /// Uses the operating system's cryptographically secure RNG.
    #[inline]
    pub fn generate() -> Self {
        Self::from_signing_key(SigningKey::generate(&mut OsRng))
    }

    /// Derives a keypair from a 32-byte secret seed.
    ///
    /// The same seed always yields the same keypair.
    pub fn from_seed(seed: &[u8; SEED_LENGTH]) -> Self {
        Self::from_signing_key(SigningKey::from_bytes(seed))
    }

    /// Restores a keypair from its 64-byte form (secret key || public key).
    pub fn from_bytes(bytes: &[u8; KEYPAIR_LENGTH]) -> Result<Self, KeypairError> {
        let signing_key =
            SigningKey::from_keypair_bytes(bytes).map_err(|_| KeypairError::Mismatch)?;
        Ok(Self::from_signing_key(signing_key))
    }

    /// Reads a keypair from a file holding the raw 64-byte form.
    pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self, KeypairError> {
        let contents = fs::read(path)?;
        let bytes: [u8; KEYPAIR_LENGTH] = contents
            .as_slice()
            .try_into()
            .map_err(|_| KeypairError::InvalidLength(contents.len()))?;
        Self::from_bytes(&bytes)
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let pubkey = Pubkey::new_from_array(signing_key.verifying_key().to_bytes());
        Self {
            signing_key,
            pubkey,
        }
    }

    /// Returns the 64-byte form: secret key followed by public key.
    pub fn to_bytes(&self) -> [u8; KEYPAIR_LENGTH] {
        self.signing_key.to_keypair_bytes()
    }

    /// Returns the 64-byte form as base-58, the format wallets import.
    pub fn to_base58_string(&self) -> String {
        bs58::encode(self.to_bytes()).into_string()
    }

    /// Returns the secret seed as a hex string.
    pub fn secret_hex(&self) -> String {
        hex::encode(self.signing_key.to_bytes())
    }

    /// Returns the public key.
    #[inline]
    pub fn pubkey(&self) -> Pubkey {
        self.pubkey
    }

    /// Signs a message with the secret key.
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }

    /// Verifies a signature against this keypair's public key.
    pub fn verify(&self, message: &[u8], signature: &[u8; 64]) -> bool {
        verify_signature(&self.pubkey, message, signature)
    }
}

/// Verifies an ed25519 signature made by `pubkey`.
///
/// Returns false for off-curve keys, which cannot have signed anything.
pub fn verify_signature(pubkey: &Pubkey, message: &[u8], signature: &[u8; 64]) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(pubkey.as_array()) else {
        return false;
    };
    verifying_key
        .verify(message, &Signature::from_bytes(signature))
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED_KEYPAIR: [u8; KEYPAIR_LENGTH] = [
        174, 47, 154, 16, 202, 193, 206, 113, 199, 190, 53, 133, 169, 175, 31, 56, 222, 53, 138,
        189, 224, 216, 117, 173, 10, 149, 53, 45, 73, 251, 237, 246, 15, 185, 186, 82, 177, 240,
        148, 69, 241, 227, 167, 80, 141, 89, 240, 121, 121, 35, 172, 247, 68, 251, 226, 218, 48,
        63, 176, 109, 168, 89, 238, 135,
    ];

    #[test]
    fn test_keypair_generation() {
        let keypair = Keypair::generate();
        assert!(keypair.pubkey().is_on_curve());
        assert_ne!(keypair.pubkey(), Keypair::generate().pubkey());
    }

    #[test]
    fn test_from_seed() {
        let mut seed = [0u8; SEED_LENGTH];
        seed.copy_from_slice(&SEED_KEYPAIR[..SEED_LENGTH]);
        let keypair = Keypair::from_seed(&seed);
        assert_eq!(
            keypair.pubkey().to_base58(),
            "24PNhTaNtomHhoy3fTRaMhAFCRj4uHqhZEEoWrKDbR5p"
        );
        assert_eq!(keypair.to_bytes(), SEED_KEYPAIR);
    }

    #[test]
    fn test_zero_seed() {
        let keypair = Keypair::from_seed(&[0u8; SEED_LENGTH]);
        assert_eq!(
            keypair.pubkey().to_base58(),
            "4zvwRjXUKGfvwnParsHAS3HuSVzV5cA4McphgmoCtajS"
        );
    }

    #[test]
    fn test_from_bytes() {
        let keypair = Keypair::from_bytes(&SEED_KEYPAIR).unwrap();
        assert_eq!(
            keypair.to_base58_string(),
            "4UzFMkVbk1q6ApxvDS8inUxg4cMBxCQRVXRx5msqQyktbi1QkJkt574Jda6BjZThSJi54CHfVoLFdVFX8XFn233L"
        );

        let mut tampered = SEED_KEYPAIR;
        tampered[63] ^= 1;
        assert!(matches!(
            Keypair::from_bytes(&tampered),
            Err(KeypairError::Mismatch)
        ));
    }

    #[test]
    fn test_sign_and_verify() {
        let keypair = Keypair::generate();
        let signature = keypair.sign(b"hello");
        assert!(keypair.verify(b"hello", &signature));
        assert!(!keypair.verify(b"goodbye", &signature));
    }

    fn temp_file(name: &str, contents: &[u8]) -> std::path::PathBuf {
        let path = std::env::temp_dir()
            .join(format!("associated-address-{}-{}", std::process::id(), name));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_read_from_file() {
        let path = temp_file("keypair.bin", &SEED_KEYPAIR);
        let result = Keypair::read_from_file(&path);
        fs::remove_file(&path).unwrap();

        let keypair = result.unwrap();
        assert_eq!(
            keypair.pubkey().to_base58(),
            "24PNhTaNtomHhoy3fTRaMhAFCRj4uHqhZEEoWrKDbR5p"
        );
        assert_eq!(keypair.to_bytes(), SEED_KEYPAIR);
    }

    #[test]
    fn test_read_short_file() {
        let path = temp_file("short.bin", &SEED_KEYPAIR[..63]);
        let result = Keypair::read_from_file(&path);
        fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(KeypairError::InvalidLength(63))));
    }

    #[test]
    fn test_read_missing_file() {
        let result = Keypair::read_from_file("/nonexistent/keypair.bin");
        assert!(matches!(result, Err(KeypairError::Io(_))));
    }
}
