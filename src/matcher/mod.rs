//! Pattern matching for base-58 addresses.
//!
//! Supports multiple matching strategies:
//! - Prefix: Match at the start of the address
//! - Suffix: Match at the end of the address
//! - Contains: Match anywhere in the address
//! - PrefixAndSuffix (`both`): Match a prefix and a suffix together

mod pattern;

pub use pattern::{MatchResult, Pattern, PatternType, BASE58_ALPHABET};
