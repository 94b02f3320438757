//! # Autolykos Hashing Core
//!
//! BLAKE2b-256 hashing and 256-bit threshold comparison for proof-of-work
//! mining, built to give bit-identical results whether a session runs once
//! on a host thread or millions of times across data-parallel workers.
//!
//! ## Components
//!
//! - **Compression**: 12-round BLAKE2b mixing over one 128-byte block
//! - **Sessions**: `initialize -> absorb -> finalize` with deferred last block
//! - **Counter strategies**: branch-based ([`Sequential`]) and carry-chain
//!   ([`Parallel`]) 128-bit byte counters, always equal
//! - **Comparator**: four-limb 256-bit ordering against a [`Threshold`]
//! - **Batch driver**: table generation and nonce search over index ranges
//!
//! ## Digest Layout
//!
//! A [`Digest`] is raw hash bytes. Only at comparison time is it read as a
//! big-endian 256-bit number, eight bytes per limb:
//!
//! ```text
//! digest = d[0..8] || d[8..16] || d[16..24] || d[24..32]
//!          limb 0     limb 1      limb 2       limb 3    (most significant first)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use autolykos_core::{HostSession, Threshold, blake2b256};
//!
//! // Single-shot hashing
//! let digest = blake2b256(b"header || nonce");
//!
//! // Incremental session
//! let mut session = HostSession::new();
//! session.absorb(b"header || ").unwrap();
//! session.absorb(b"nonce").unwrap();
//! assert_eq!(session.finalize().unwrap(), digest);
//!
//! // Difficulty check
//! if Threshold::Q.admits(&digest) {
//!     println!("digest is in the valid range");
//! }
//! ```
//!
//! ## no_std Support
//!
//! This crate supports `no_std` environments with the `alloc` crate:
//!
//! ```toml
//! [dependencies]
//! autolykos-core = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod batch;
pub mod bignum;
pub mod compress;
pub mod counter;
pub mod endian;
mod error;
mod params;
pub mod session;
pub mod state;

#[cfg(feature = "std")]
mod ffi;

pub use bignum::{Threshold, U256, compare};
pub use counter::{CounterStrategy, ExecutionContext, Parallel, Sequential};
pub use endian::{digest_limbs, reverse_endian, reverse_endian_in_place};
pub use error::HashError;
pub use params::*;
pub use session::{DeviceSession, Digest, HostSession, Session, blake2b, blake2b256, blake2b256_with};
pub use state::HashState;

#[cfg(feature = "std")]
pub use ffi::{b2b_below_threshold, b2b_benchmark, b2b_hash, b2b_hashrate};
