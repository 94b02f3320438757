//! Autolykos Prover Library
//!
//! Front end for the Autolykos proof-of-work hashing core: configuration
//! handling on top of the BLAKE2b-256 table builder and nonce search.
//!
//! # Overview
//!
//! Mining repeatedly hashes a message prefix followed by a candidate nonce
//! and accepts the nonce once the digest, read as a big-endian 256-bit
//! number, is strictly below the target threshold.
//!
//! # Example
//!
//! ```rust
//! use autolykos::algorithm::{blake2b256, Threshold};
//!
//! // Candidate message: prefix || nonce
//! let mut input = b"header digest".to_vec();
//! input.extend_from_slice(&42u64.to_be_bytes());
//!
//! // Compute hash
//! let digest = blake2b256(&input);
//!
//! // Check it against the valid-range bound
//! if Threshold::Q.admits(&digest) {
//!     println!("Valid digest found!");
//! }
//! ```

// Re-export the core algorithm
pub use autolykos_core as algorithm;

pub mod config;

// Convenience re-exports
pub use algorithm::batch::{build_table, search, BatchConfig, Solution};
pub use algorithm::{blake2b256, Digest, HostSession, Threshold};
pub use config::{ConfigError, MinerConfig};
