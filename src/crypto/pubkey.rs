//! Solana public key representation and utilities.

use std::fmt;
use std::str::FromStr;

use curve25519_dalek::edwards::CompressedEdwardsY;

/// Number of bytes in a public key.
pub const PUBKEY_BYTES: usize = 32;

/// Maximum length of a base-58 encoded public key.
pub const MAX_BASE58_LEN: usize = 44;

/// A 32-byte public key: an ed25519 point for wallets, an arbitrary
/// off-curve hash for program-derived addresses.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pubkey([u8; PUBKEY_BYTES]);

/// Errors that can occur when parsing a public key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PubkeyError {
    #[error("String is the wrong size")]
    WrongSize,

    #[error("Invalid Base58 string")]
    Invalid,
}

impl Pubkey {
    /// Creates a public key from raw bytes.
    #[inline]
    pub const fn new_from_array(bytes: [u8; PUBKEY_BYTES]) -> Self {
        Self(bytes)
    }

    /// Returns the public key as raw bytes.
    #[inline]
    pub const fn to_bytes(self) -> [u8; PUBKEY_BYTES] {
        self.0
    }

    /// Returns a reference to the raw bytes.
    #[inline]
    pub const fn as_array(&self) -> &[u8; PUBKEY_BYTES] {
        &self.0
    }

    /// Returns the base-58 encoding of the key.
    pub fn to_base58(&self) -> String {
        bs58::encode(self.0).into_string()
    }

    /// Returns true if the bytes decompress to a point on the ed25519 curve.
    ///
    /// Keys created from a keypair are always on the curve; program-derived
    /// addresses never are.
    pub fn is_on_curve(&self) -> bool {
        CompressedEdwardsY(self.0).decompress().is_some()
    }
}

impl FromStr for Pubkey {
    type Err = PubkeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() > MAX_BASE58_LEN {
            return Err(PubkeyError::WrongSize);
        }
        let bytes = bs58::decode(s).into_vec().map_err(|_| PubkeyError::Invalid)?;
        let bytes: [u8; PUBKEY_BYTES] = bytes.try_into().map_err(|_| PubkeyError::WrongSize)?;
        Ok(Self(bytes))
    }
}

impl From<[u8; PUBKEY_BYTES]> for Pubkey {
    fn from(bytes: [u8; PUBKEY_BYTES]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Pubkey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base58_roundtrip() {
        let text = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";
        let key: Pubkey = text.parse().unwrap();
        assert_eq!(key.to_base58(), text);
        assert_eq!(key.to_string(), text);
    }

    #[test]
    fn test_all_zero_key() {
        let key = Pubkey::new_from_array([0u8; 32]);
        assert_eq!(key.to_base58(), "11111111111111111111111111111111");
        assert_eq!(key, Pubkey::default());
    }

    #[test]
    fn test_wrong_size() {
        // 31 bytes of zeros
        assert_eq!(
            "1111111111111111111111111111111".parse::<Pubkey>(),
            Err(PubkeyError::WrongSize)
        );
        assert_eq!(
            "1".repeat(MAX_BASE58_LEN + 1).parse::<Pubkey>(),
            Err(PubkeyError::WrongSize)
        );
    }

    #[test]
    fn test_invalid_character() {
        // '0', 'O', 'I' and 'l' are not part of the base-58 alphabet
        assert_eq!(
            "0okenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA".parse::<Pubkey>(),
            Err(PubkeyError::Invalid)
        );
    }

    #[test]
    fn test_on_curve() {
        let wallet: Pubkey = "5oNDL3swdJJF1g9DzJiZ4ynHXgszjAEpUkxVYejchzrY".parse().unwrap();
        assert!(wallet.is_on_curve());

        let derived: Pubkey = "ApMFHdM1fohWjMpYEWWRsbxGJDFL3FqA6oe9GEGa8dbQ".parse().unwrap();
        assert!(!derived.is_on_curve());
    }
}
