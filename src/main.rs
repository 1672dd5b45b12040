//! Solana associated token address CLI
//!
//! Usage:
//!   associated_address                          # New keypair + its wrapped SOL token account
//!   associated_address ata -o <OWNER> -m <MINT> # Associated token address for a wallet
//!   associated_address pda -p <PROGRAM> str:vault pubkey:<KEY>
//!   associated_address vanity -p Sol -n 2       # Keypairs whose address starts with "Sol"

use std::io;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use associated_address::config::{
    AtaArgs, Command, ConfigError, PdaArgs, SecretSeed, VanityArgs, VerifyArgs,
};
use associated_address::crypto::{
    find_program_address, Keypair, KeypairError, PdaError, Pubkey,
};
use associated_address::token::{
    get_associated_token_address, get_associated_token_address_checked, TokenError, NATIVE_MINT,
};
use associated_address::{Config, SearchTarget, VanityResult, WorkerPool};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Derivation failed: {0}")]
    Pda(#[from] PdaError),

    #[error("{0}")]
    Token(#[from] TokenError),

    #[error("{0}")]
    Keypair(#[from] KeypairError),

    #[error("Could not start workers: {0}")]
    Io(#[from] io::Error),

    #[error("Public key mismatch: expected {expected}, got {actual}")]
    Mismatch { expected: Pubkey, actual: Pubkey },
}

fn main() {
    let config = Config::parse();
    init_tracing(&config);

    if let Err(e) = run(config.command()) {
        eprintln!("{}", e);
        process::exit(1);
    }
}

fn init_tracing(config: &Config) {
    let filter = match config.log_directive() {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(command: Command) -> Result<(), CliError> {
    debug!(?command, "running");
    match command {
        Command::Demo => demo(),
        Command::Ata(args) => ata(&args),
        Command::Pda(args) => pda(&args),
        Command::OnCurve { pubkey } => {
            println!("{}", pubkey.is_on_curve());
            Ok(())
        }
        Command::Keygen { seed } => keygen(seed),
        Command::Verify(args) => verify(&args),
        Command::Vanity(args) => vanity(&args),
    }
}

fn demo() -> Result<(), CliError> {
    let keypair = Keypair::generate();
    let associated = get_associated_token_address(&keypair.pubkey(), &NATIVE_MINT)?;

    println!("Public Key:         {}", keypair.pubkey());
    println!("Associated Address: {}", associated);
    Ok(())
}

fn ata(args: &AtaArgs) -> Result<(), CliError> {
    let (address, bump) = get_associated_token_address_checked(
        &args.owner,
        &args.mint,
        args.allow_owner_off_curve,
        &args.program,
        &args.token_program,
    )?;

    println!("Address: {}", address);
    println!("Bump:    {}", bump);
    Ok(())
}

fn pda(args: &PdaArgs) -> Result<(), CliError> {
    let seeds: Vec<&[u8]> = args.seeds.iter().map(|seed| seed.as_ref()).collect();
    let (address, bump) = find_program_address(&seeds, &args.program)?;

    println!("Address: {}", address);
    println!("Bump:    {}", bump);
    Ok(())
}

fn keygen(seed: Option<SecretSeed>) -> Result<(), CliError> {
    let keypair = match seed {
        Some(SecretSeed(seed)) => Keypair::from_seed(&seed),
        None => Keypair::generate(),
    };

    println!("Public Key:  {}", keypair.pubkey());
    println!("Secret Seed: {}", keypair.secret_hex());
    println!("Secret Key:  {}", keypair.to_base58_string());
    Ok(())
}

fn verify(args: &VerifyArgs) -> Result<(), CliError> {
    let keypair = match (&args.seed, &args.keypair) {
        (Some(SecretSeed(seed)), _) => Keypair::from_seed(seed),
        (None, Some(path)) => Keypair::read_from_file(path)?,
        (None, None) => return Err(ConfigError::MissingKeySource.into()),
    };

    if keypair.pubkey() != args.pubkey {
        return Err(CliError::Mismatch {
            expected: args.pubkey,
            actual: keypair.pubkey(),
        });
    }

    println!("Verified: {}", keypair.pubkey());
    Ok(())
}

fn vanity(config: &VanityArgs) -> Result<(), CliError> {
    config.validate()?;

    let pattern = config.build_pattern();
    let target = config.search_target();

    // Print startup info
    println!("Solana Vanity Keypair Search");
    println!("============================");
    match pattern.suffix() {
        Some(suffix) => println!(
            "Pattern:    {} ... {} ({})",
            pattern.pattern(),
            suffix,
            pattern.pattern_type()
        ),
        None => println!("Pattern:    {} ({})", pattern.pattern(), pattern.pattern_type()),
    }
    if let SearchTarget::AssociatedAddress { mint, .. } = target {
        println!("Matching:   associated token address for mint {}", mint);
    }
    println!("Difficulty: {}", pattern.difficulty_description());

    let pool = WorkerPool::new(config.worker_count(), pattern, target)?;
    println!("Workers:    {}", pool.num_workers());
    println!("Target:     {} keypair(s)", config.count);
    println!();
    ctrlc_handler(pool.stop_flag_clone());

    println!("Searching... (Press Ctrl+C to stop)\n");

    let mut found = 0;
    let report_interval = Duration::from_secs(config.report_interval);

    loop {
        match pool.wait_for_result(report_interval) {
            Some(result) => {
                found += 1;
                print_result(&result, found);

                if config.count > 0 && found >= config.count {
                    println!("\nTarget reached! Found {} keypair(s).", found);
                    break;
                }
            }
            None => print_progress(&pool),
        }

        if pool.is_stopped() {
            println!("\nStopped by user.");
            break;
        }
    }

    println!("\n--- Final Statistics ---");
    println!("Total keys generated: {}", format_number(pool.total_keys()));
    println!("Total matches found:  {}", pool.total_matches());
    println!("Time elapsed:         {:.2}s", pool.elapsed().as_secs_f64());
    println!(
        "Average speed:        {}/s",
        format_number(pool.keys_per_second() as u64)
    );

    pool.join();
    Ok(())
}

fn print_result(result: &VanityResult, index: usize) {
    println!("=== Match #{} ===", index);
    println!("Public Key:  {}", result.pubkey);
    if let Some(address) = result.associated_address {
        println!("Associated:  {}", address);
    }
    println!("Secret Key:  {}", result.secret_key);
    println!("Worker:      {}", result.worker_id);
    println!();
}

fn print_progress(pool: &WorkerPool) {
    let keys = pool.total_keys();
    let rate = pool.keys_per_second();
    let elapsed = pool.elapsed().as_secs();

    println!(
        "[{:>4}s] Generated {} keys ({}/s)",
        elapsed,
        format_number(keys),
        format_number(rate as u64)
    );
}

fn format_number(n: u64) -> String {
    if n >= 1_000_000_000 {
        format!("{:.2}B", n as f64 / 1_000_000_000.0)
    } else if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.2}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

fn ctrlc_handler(stop_flag: Arc<AtomicBool>) {
    if let Err(e) = ctrlc::set_handler(move || {
        stop_flag.store(true, Ordering::Relaxed);
    }) {
        warn!("Could not set Ctrl-C handler: {}", e);
    }
}
