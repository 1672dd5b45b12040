//! Runtime configuration for the command-line tool.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::crypto::{Pubkey, MAX_BASE58_LEN, SEED_LENGTH};
use crate::matcher::{Pattern, PatternType, BASE58_ALPHABET};
use crate::token::{ASSOCIATED_TOKEN_PROGRAM_ID, NATIVE_MINT, TOKEN_PROGRAM_ID};
use crate::worker::SearchTarget;

/// Solana associated token address and program address tool
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Increase log verbosity (-v debug, -vv trace); overrides RUST_LOG
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Generate a keypair and derive its wrapped SOL associated token address
    Demo,
    /// Derive the associated token address for an owner and mint
    Ata(AtaArgs),
    /// Find a program-derived address for a set of seeds
    Pda(PdaArgs),
    /// Check whether a public key lies on the ed25519 curve
    OnCurve {
        /// Base-58 public key
        pubkey: Pubkey,
    },
    /// Generate a keypair, randomly or from a seed
    Keygen {
        /// 32-byte secret seed as hex
        #[arg(long)]
        seed: Option<SecretSeed>,
    },
    /// Check that a seed or keypair file yields the expected public key
    Verify(VerifyArgs),
    /// Search for a keypair whose address matches a pattern
    Vanity(VanityArgs),
}

#[derive(Args, Debug, Clone)]
pub struct AtaArgs {
    /// Owner (wallet) address
    #[arg(short, long)]
    pub owner: Pubkey,

    /// Token mint address
    #[arg(short, long, default_value_t = NATIVE_MINT)]
    pub mint: Pubkey,

    /// Token program the account belongs to
    #[arg(long, default_value_t = TOKEN_PROGRAM_ID)]
    pub token_program: Pubkey,

    /// Associated token program used for the derivation
    #[arg(long, default_value_t = ASSOCIATED_TOKEN_PROGRAM_ID)]
    pub program: Pubkey,

    /// Accept an owner that is itself off the curve (a program address)
    #[arg(long, default_value = "false")]
    pub allow_owner_off_curve: bool,
}

#[derive(Args, Debug, Clone)]
pub struct PdaArgs {
    /// Program the address is derived for
    #[arg(short, long)]
    pub program: Pubkey,

    /// Seeds as pubkey:<base58>, str:<text> or hex:<bytes>
    pub seeds: Vec<Seed>,
}

#[derive(Args, Debug, Clone)]
pub struct VerifyArgs {
    /// Expected public key
    #[arg(short, long)]
    pub pubkey: Pubkey,

    /// 32-byte secret seed as hex
    #[arg(long, conflicts_with = "keypair", required_unless_present = "keypair")]
    pub seed: Option<SecretSeed>,

    /// File holding the 64-byte keypair
    #[arg(short, long)]
    pub keypair: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct VanityArgs {
    /// Pattern to search for (base-58 characters only)
    #[arg(short, long)]
    pub pattern: String,

    /// Suffix pattern (when used, --pattern becomes the prefix and matching uses both)
    #[arg(short = 's', long)]
    pub suffix: Option<String>,

    /// Pattern type: prefix, suffix, contains, or both (prefix and --suffix)
    #[arg(short = 't', long, default_value = "prefix")]
    pub pattern_type: PatternType,

    /// Number of worker threads (default: number of CPU cores)
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,

    /// Case sensitive matching
    #[arg(short = 'c', long, default_value = "false")]
    pub case_sensitive: bool,

    /// Stop after finding N keypairs (0 = run forever)
    #[arg(short = 'n', long, default_value = "1")]
    pub count: usize,

    /// Progress report interval in seconds
    #[arg(short = 'r', long, default_value = "5")]
    pub report_interval: u64,

    /// Match the associated token address for this mint instead of the public key
    #[arg(short = 'm', long)]
    pub mint: Option<Pubkey>,

    /// Token program used with --mint
    #[arg(long, default_value_t = TOKEN_PROGRAM_ID)]
    pub token_program: Pubkey,
}

impl Config {
    /// Returns the subcommand, defaulting to the demo.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Demo)
    }

    /// Returns the log filter implied by `--verbose`, if any.
    pub fn log_directive(&self) -> Option<&'static str> {
        match self.verbose {
            0 => None,
            1 => Some("debug"),
            _ => Some("trace"),
        }
    }
}

impl VanityArgs {
    /// Returns the number of workers, defaulting to CPU count
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == Some(0) {
            return Err(ConfigError::InvalidWorkers);
        }

        self.validate_part("Pattern", &self.pattern)?;
        let mut total_len = self.pattern.chars().count();

        if let Some(ref suffix) = self.suffix {
            self.validate_part("Suffix", suffix)?;
            total_len += suffix.chars().count();
        }

        if total_len > MAX_BASE58_LEN {
            return Err(ConfigError::InvalidPattern(format!(
                "Combined prefix + suffix cannot be longer than {} characters",
                MAX_BASE58_LEN
            )));
        }

        Ok(())
    }

    fn validate_part(&self, name: &str, part: &str) -> Result<(), ConfigError> {
        if part.is_empty() {
            return Err(ConfigError::InvalidPattern(format!("{} cannot be empty", name)));
        }

        if let Some(c) = part.chars().find(|&c| !self.is_base58_char(c)) {
            return Err(ConfigError::InvalidPattern(format!(
                "{} contains '{}', which never appears in base-58 (no 0, O, I or l)",
                name, c
            )));
        }

        if part.chars().count() > MAX_BASE58_LEN {
            return Err(ConfigError::InvalidPattern(format!(
                "{} cannot be longer than {} characters (full address)",
                name, MAX_BASE58_LEN
            )));
        }

        Ok(())
    }

    fn is_base58_char(&self, c: char) -> bool {
        if self.case_sensitive {
            BASE58_ALPHABET.contains(c)
        } else {
            BASE58_ALPHABET
                .chars()
                .any(|a| a.eq_ignore_ascii_case(&c))
        }
    }

    /// Returns the effective pattern type, accounting for --suffix flag
    pub fn effective_pattern_type(&self) -> PatternType {
        if self.suffix.is_some() {
            PatternType::PrefixAndSuffix
        } else {
            self.pattern_type
        }
    }

    /// Builds the compiled pattern.
    pub fn build_pattern(&self) -> Pattern {
        match (&self.suffix, self.effective_pattern_type()) {
            (Some(suffix), _) => {
                Pattern::new_prefix_and_suffix(&*self.pattern, &**suffix, self.case_sensitive)
            }
            (None, pattern_type) => Pattern::new(&*self.pattern, pattern_type, self.case_sensitive),
        }
    }

    /// Returns what generated keypairs are matched on.
    pub fn search_target(&self) -> SearchTarget {
        match self.mint {
            Some(mint) => SearchTarget::AssociatedAddress {
                mint,
                token_program_id: self.token_program,
            },
            None => SearchTarget::PublicKey,
        }
    }
}

/// A 32-byte secret seed given as hex on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecretSeed(pub [u8; SEED_LENGTH]);

impl FromStr for SecretSeed {
    type Err = SeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s.trim_start_matches("0x"))?;
        let bytes: [u8; SEED_LENGTH] = bytes
            .try_into()
            .map_err(|b: Vec<u8>| SeedError::WrongLength(b.len()))?;
        Ok(Self(bytes))
    }
}

/// A single program-derived address seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seed(pub Vec<u8>);

impl AsRef<[u8]> for Seed {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for Seed {
    type Err = SeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, value) = s
            .split_once(':')
            .ok_or_else(|| SeedError::UnknownKind(s.to_string()))?;

        let bytes = match kind {
            "pubkey" => value
                .parse::<Pubkey>()
                .map_err(|_| SeedError::InvalidPubkey(value.to_string()))?
                .to_bytes()
                .to_vec(),
            "str" | "string" => value.as_bytes().to_vec(),
            "hex" => hex::decode(value)?,
            _ => return Err(SeedError::UnknownKind(kind.to_string())),
        };
        Ok(Self(bytes))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Worker count must be at least 1")]
    InvalidWorkers,

    #[error("Either --seed or --keypair is required")]
    MissingKeySource,
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum SeedError {
    #[error("Invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("Secret seed must be 32 bytes, got {0}")]
    WrongLength(usize),

    #[error("Invalid base-58 public key: {0}")]
    InvalidPubkey(String),

    #[error("Unknown seed kind '{0}' (expected pubkey:, str: or hex:)")]
    UnknownKind(String),
}
