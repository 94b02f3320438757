//! Autolykos Prover CLI
//!
//! A command-line tool around the BLAKE2b-256 hashing core.
//!
//! # Commands
//!
//! - `hash` - Hash UTF-8 or hex input
//! - `check` - Test a digest against a threshold
//! - `table` - Build a table of indexed digests
//! - `search` - Run a batched nonce search
//! - `benchmark` - Run performance benchmark

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use autolykos::algorithm::batch::{build_table, init_workers, search};
use autolykos::algorithm::{
    blake2b, blake2b256_with, Digest, ExecutionContext, Parallel, Sequential, Threshold,
    DIGEST_SIZE, N_LEN,
};
use autolykos::config::{decode_hex, MinerConfig};

#[derive(Parser)]
#[command(name = "autolykos")]
#[command(version = "0.1.0")]
#[command(about = "BLAKE2b-256 table builder and nonce search for Autolykos mining")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Number of worker threads (default: number of CPU cores)
    #[arg(short, long, global = true)]
    threads: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the BLAKE2b-256 digest of the input
    Hash {
        /// Input text
        input: String,

        /// Treat the input as hex
        #[arg(long)]
        hex: bool,

        /// Key for the keyed variant, as hex
        #[arg(long)]
        key: Option<String>,
    },

    /// Check whether a digest is below the threshold
    Check {
        /// The 32-byte digest, as hex
        #[arg(long)]
        digest: String,

        /// Big-endian threshold as hex (default: config, then Q)
        #[arg(long)]
        threshold: Option<String>,
    },

    /// Build a table of digests over index || seed
    Table {
        /// Table seed, as hex
        #[arg(long)]
        seed: String,

        /// Number of entries (default: config table size)
        #[arg(short, long)]
        count: Option<u32>,

        /// Write raw 32-byte entries to this file
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Search for a nonce whose digest is below the threshold
    Search {
        /// Message prefix, as hex (default: config prefix)
        #[arg(long)]
        prefix: Option<String>,

        /// First nonce to try
        #[arg(long, default_value = "0")]
        start: u64,

        /// Number of nonces to try
        #[arg(short, long, default_value = "1000000")]
        count: u64,

        /// Big-endian threshold as hex (default: config, then Q)
        #[arg(long)]
        threshold: Option<String>,

        /// Stop after this many seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Run performance benchmark
    Benchmark {
        /// Number of hashes to compute per strategy
        #[arg(short, long, default_value = "100000")]
        count: u32,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = load_config(cli.config.as_deref(), cli.threads).and_then(|config| {
        match cli.command {
            Commands::Hash { input, hex, key } => cmd_hash(&input, hex, key.as_deref()),
            Commands::Check { digest, threshold } => {
                cmd_check(&config, &digest, threshold.as_deref())
            }
            Commands::Table { seed, count, out } => cmd_table(&config, &seed, count, out),
            Commands::Search {
                prefix,
                start,
                count,
                threshold,
                timeout,
            } => cmd_search(
                &config,
                prefix.as_deref(),
                start,
                count,
                threshold.as_deref(),
                timeout,
            ),
            Commands::Benchmark { count } => cmd_benchmark(count),
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>, threads: Option<usize>) -> anyhow::Result<MinerConfig> {
    let mut config = match path {
        Some(path) => MinerConfig::load(path)?,
        None => MinerConfig::default(),
    };
    if let Some(threads) = threads {
        if threads == 0 {
            anyhow::bail!("--threads must be greater than zero");
        }
        config.threads = threads;
    }
    Ok(config)
}

fn threshold_or_config(config: &MinerConfig, flag: Option<&str>) -> anyhow::Result<Threshold> {
    match flag {
        Some(text) => Ok(Threshold::from_hex(text)?),
        None => Ok(config.threshold()?),
    }
}

fn cmd_hash(input: &str, is_hex: bool, key: Option<&str>) -> anyhow::Result<()> {
    let data = if is_hex {
        decode_hex("input", input)?
    } else {
        input.as_bytes().to_vec()
    };
    let key = key.map(|k| decode_hex("key", k)).transpose()?;

    let digest = blake2b(&data, DIGEST_SIZE, key.as_deref())?;
    println!("{}", hex::encode(digest));

    Ok(())
}

fn cmd_check(config: &MinerConfig, digest_hex: &str, threshold: Option<&str>) -> anyhow::Result<()> {
    let bytes = decode_hex("digest", digest_hex)?;
    let bytes: [u8; DIGEST_SIZE] = match bytes.try_into() {
        Ok(bytes) => bytes,
        Err(bytes) => anyhow::bail!(
            "Digest must be {} bytes, got {}",
            DIGEST_SIZE,
            bytes.len()
        ),
    };
    let digest = Digest(bytes);
    let threshold = threshold_or_config(config, threshold)?;

    println!("Digest:    {}", digest.to_u256());
    println!("Threshold: {}", threshold);
    if threshold.admits(&digest) {
        println!("Result: below threshold");
    } else {
        println!("Result: not below threshold");
    }

    Ok(())
}

fn cmd_table(
    config: &MinerConfig,
    seed_hex: &str,
    count: Option<u32>,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    let seed = decode_hex("seed", seed_hex)?;
    let count = count.unwrap_or(config.table_size);
    if count > N_LEN {
        anyhow::bail!("Table size {} exceeds the full table of {} entries", count, N_LEN);
    }
    let context = config.batch_config().context;
    if context == ExecutionContext::Parallel {
        init_workers(config.threads);
    }

    let start = Instant::now();
    let table = build_table(&seed, 0..count, context);
    let elapsed = start.elapsed();

    match out {
        Some(path) => {
            let bytes: Vec<u8> = table.iter().flat_map(|d| d.0).collect();
            std::fs::write(&path, bytes)?;
            println!("Wrote {} entries to {}", table.len(), path.display());
        }
        None => {
            for (index, entry) in table.iter().enumerate() {
                println!("{:>8} {:x}", index, entry);
            }
        }
    }
    log::info!(
        "Table of {} entries built in {:.2}s",
        table.len(),
        elapsed.as_secs_f64()
    );

    Ok(())
}

fn cmd_search(
    config: &MinerConfig,
    prefix: Option<&str>,
    start: u64,
    count: u64,
    threshold: Option<&str>,
    timeout: Option<u64>,
) -> anyhow::Result<()> {
    let prefix = match prefix {
        Some(text) => decode_hex("prefix", text)?,
        None => config.prefix_bytes()?,
    };
    let threshold = threshold_or_config(config, threshold)?;
    let batch = config.batch_config();
    if batch.context == ExecutionContext::Parallel {
        init_workers(config.threads);
    }

    let end = start.saturating_add(count);
    println!("Searching nonces {}..{}", start, end);
    println!("Threshold: {}", threshold);
    println!("Threads: {}", config.threads);

    let stop = Arc::new(AtomicBool::new(false));
    if let Some(seconds) = timeout {
        let stop = Arc::clone(&stop);
        let deadline = Instant::now() + Duration::from_secs(seconds);
        std::thread::spawn(move || {
            while !stop.load(Ordering::Relaxed) {
                if Instant::now() >= deadline {
                    log::info!("Search timed out after {}s", seconds);
                    stop.store(true, Ordering::SeqCst);
                    break;
                }
                std::thread::sleep(Duration::from_millis(50));
            }
        });
    }

    let started = Instant::now();
    let result = search(&prefix, start..end, &threshold, &batch, &stop);
    let elapsed = started.elapsed().as_secs_f64();

    match result {
        Some(solution) => {
            println!("\nFound valid nonce!");
            println!("Nonce: {}", solution.nonce);
            println!("Digest: {:x}", solution.digest);
            println!("Hashes computed: {}", solution.hashes);
            if elapsed > 0.0 {
                println!("Hashrate: {:.2} H/s", solution.hashes as f64 / elapsed);
            }
        }
        None => {
            if stop.load(Ordering::SeqCst) {
                println!("\nSearch stopped before a solution was found.");
            } else {
                println!("\nNo solution in nonces {}..{}.", start, end);
            }
        }
    }

    Ok(())
}

fn cmd_benchmark(count: u32) -> anyhow::Result<()> {
    println!("Running benchmark with {} hashes...", count);

    let mut input = [0u8; 72];
    input[..36].copy_from_slice(b"benchmark input data for BLAKE2b-256");

    let run = |hash: fn(&[u8]) -> Digest| {
        let mut data = input;
        let start = Instant::now();
        for i in 0..count {
            data[64..72].copy_from_slice(&u64::from(i).to_be_bytes());
            let _ = hash(&data);
        }
        start.elapsed()
    };

    let sequential = run(blake2b256_with::<Sequential>);
    let parallel = run(blake2b256_with::<Parallel>);

    println!("\nResults:");
    for (name, elapsed) in [("sequential", sequential), ("carry-chain", parallel)] {
        let secs = elapsed.as_secs_f64();
        let hashrate = if secs > 0.0 { count as f64 / secs } else { 0.0 };
        println!("  {:<12} {:.3}s  {:.2} H/s", name, secs, hashrate);
    }

    println!("\nAlgorithm parameters:");
    println!("  Block size: {} bytes", autolykos::algorithm::BLOCK_SIZE);
    println!("  Rounds: {}", autolykos::algorithm::ROUNDS);
    println!("  Digest size: {} bytes", DIGEST_SIZE);

    Ok(())
}
