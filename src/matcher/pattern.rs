//! Pattern matching implementation.

use std::str::FromStr;

use crate::crypto::Pubkey;

/// The base-58 alphabet used for Solana addresses.
pub const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// The type of pattern matching to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PatternType {
    /// Match at the beginning of the address
    #[default]
    Prefix,
    /// Match at the end of the address
    Suffix,
    /// Match anywhere in the address
    Contains,
    /// Match both prefix and suffix
    PrefixAndSuffix,
}

impl FromStr for PatternType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "prefix" | "start" | "begin" => Ok(PatternType::Prefix),
            "suffix" | "end" => Ok(PatternType::Suffix),
            "contains" | "anywhere" | "any" => Ok(PatternType::Contains),
            "prefixandsuffix" | "both" => Ok(PatternType::PrefixAndSuffix),
            _ => Err(format!("Unknown pattern type: {}", s)),
        }
    }
}

impl std::fmt::Display for PatternType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatternType::Prefix => write!(f, "prefix"),
            PatternType::Suffix => write!(f, "suffix"),
            PatternType::Contains => write!(f, "contains"),
            PatternType::PrefixAndSuffix => write!(f, "prefix+suffix"),
        }
    }
}

/// Result of a pattern match operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    /// Full match found
    Match,
    /// No match
    NoMatch,
}

impl MatchResult {
    #[inline]
    pub fn is_match(self) -> bool {
        matches!(self, MatchResult::Match)
    }
}

/// A compiled pattern for matching base-58 addresses.
#[derive(Debug, Clone)]
pub struct Pattern {
    /// The pattern string (normalized)
    pattern: String,
    /// Optional suffix pattern for PrefixAndSuffix mode
    suffix: Option<String>,
    /// The pattern type
    pattern_type: PatternType,
    /// Whether matching is case sensitive
    case_sensitive: bool,
}

impl Pattern {
    /// Creates a new pattern.
    pub fn new(pattern: impl Into<String>, pattern_type: PatternType, case_sensitive: bool) -> Self {
        let pattern = pattern.into();
        let pattern = if case_sensitive {
            pattern
        } else {
            pattern.to_lowercase()
        };

        Self {
            pattern,
            suffix: None,
            pattern_type,
            case_sensitive,
        }
    }

    /// Creates a new prefix+suffix pattern.
    pub fn new_prefix_and_suffix(
        prefix: impl Into<String>,
        suffix: impl Into<String>,
        case_sensitive: bool,
    ) -> Self {
        let normalize = |s: String| if case_sensitive { s } else { s.to_lowercase() };

        Self {
            pattern: normalize(prefix.into()),
            suffix: Some(normalize(suffix.into())),
            pattern_type: PatternType::PrefixAndSuffix,
            case_sensitive,
        }
    }

    /// Returns the pattern string.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the suffix pattern, if any.
    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    /// Returns the pattern type.
    pub fn pattern_type(&self) -> PatternType {
        self.pattern_type
    }

    /// Matches a public key's base-58 form against this pattern.
    #[inline]
    pub fn matches(&self, pubkey: &Pubkey) -> MatchResult {
        self.matches_str(&pubkey.to_base58())
    }

    /// Matches already-encoded text against this pattern.
    pub fn matches_str(&self, encoded: &str) -> MatchResult {
        let lowered;
        let text = if self.case_sensitive {
            encoded
        } else {
            lowered = encoded.to_lowercase();
            lowered.as_str()
        };

        let matched = match self.pattern_type {
            PatternType::Prefix => text.starts_with(&self.pattern),
            PatternType::Suffix => text.ends_with(&self.pattern),
            PatternType::Contains => text.contains(&self.pattern),
            PatternType::PrefixAndSuffix => {
                let suffix = self.suffix.as_deref().unwrap_or("");
                text.starts_with(&self.pattern) && text.ends_with(suffix)
            }
        };

        if matched {
            MatchResult::Match
        } else {
            MatchResult::NoMatch
        }
    }

    /// Returns the estimated difficulty (number of attempts to find a match).
    ///
    /// Each pattern character matches `k` of the 58 alphabet characters:
    /// one when case sensitive, two for letters that exist in both cases
    /// otherwise. Expected attempts are the product of `58 / k`.
    pub fn estimated_difficulty(&self) -> u64 {
        let chars = self
            .pattern
            .chars()
            .chain(self.suffix.iter().flat_map(|s| s.chars()));

        let mut difficulty = 1f64;
        for c in chars {
            difficulty *= 58.0 / self.alphabet_matches(c) as f64;
        }

        if difficulty >= u64::MAX as f64 {
            u64::MAX
        } else {
            difficulty as u64
        }
    }

    fn alphabet_matches(&self, c: char) -> usize {
        if self.case_sensitive {
            return 1;
        }
        BASE58_ALPHABET
            .chars()
            .filter(|a| a.to_ascii_lowercase() == c)
            .count()
            .max(1)
    }

    /// Returns a human-readable difficulty estimate.
    pub fn difficulty_description(&self) -> String {
        let diff = self.estimated_difficulty();
        match diff {
            0..=1_000 => "Very Easy (< 1 second)".into(),
            1_001..=100_000 => "Easy (seconds)".into(),
            100_001..=10_000_000 => "Medium (minutes)".into(),
            10_000_001..=1_000_000_000 => "Hard (hours)".into(),
            _ => "Very Hard (days or more)".into(),
        }
    }
}
