//! Batched table generation and nonce search
//!
//! Both loops run one complete session per index or nonce. Sessions share
//! nothing mutable: every worker builds its own [`Session`] and only reads
//! the seed, prefix and threshold. A search is cancelled through an
//! `AtomicBool` that is checked between batches, never inside a session.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use core::ops::Range;
use core::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::bignum::Threshold;
use crate::counter::{CounterStrategy, ExecutionContext, Parallel, Sequential};
use crate::params::DEFAULT_BATCH_SIZE;
use crate::session::{Digest, Session};

/// How batched work is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchConfig {
    /// Sessions per batch; the stop flag is checked between batches
    pub batch_size: usize,
    /// Sequential loop or data-parallel workers
    pub context: ExecutionContext,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            context: if cfg!(feature = "parallel") {
                ExecutionContext::Parallel
            } else {
                ExecutionContext::Sequential
            },
        }
    }
}

/// A nonce whose digest is below the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Solution {
    pub nonce: u64,
    pub digest: Digest,
    /// Sessions run before the search stopped
    pub hashes: u64,
}

/// Table entry for `index`: BLAKE2b-256(index as 4 big-endian bytes || seed).
#[inline(always)]
pub fn table_entry<S: CounterStrategy>(seed: &[u8], index: u32) -> Digest {
    let mut session = Session::<S>::new();
    session.update(&index.to_be_bytes());
    session.update(seed);
    session.finish_digest()
}

/// Search digest for `nonce`: BLAKE2b-256(prefix || nonce as 8 big-endian bytes).
#[inline(always)]
pub fn nonce_digest<S: CounterStrategy>(prefix: &[u8], nonce: u64) -> Digest {
    let mut session = Session::<S>::new();
    session.update(prefix);
    session.update(&nonce.to_be_bytes());
    session.finish_digest()
}

/// Hash every index in `range`; entry `k` belongs to index `range.start + k`.
pub fn build_table(seed: &[u8], range: Range<u32>, context: ExecutionContext) -> Vec<Digest> {
    let count = range.len();
    debug!(
        "Building table entries {}..{} ({:?})",
        range.start, range.end, context
    );

    let table: Vec<Digest> = match context {
        ExecutionContext::Sequential => range
            .map(|index| table_entry::<Sequential>(seed, index))
            .collect(),
        ExecutionContext::Parallel => build_table_parallel(seed, range),
    };

    info!("Built {} table entries", count);
    table
}

#[cfg(feature = "parallel")]
fn build_table_parallel(seed: &[u8], range: Range<u32>) -> Vec<Digest> {
    range
        .into_par_iter()
        .map(|index| table_entry::<Parallel>(seed, index))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn build_table_parallel(seed: &[u8], range: Range<u32>) -> Vec<Digest> {
    range
        .map(|index| table_entry::<Parallel>(seed, index))
        .collect()
}

/// Search `nonces` for the first digest below `threshold`.
///
/// Returns the lowest admitted nonce of the first batch containing one and
/// sets `stop`. Returns `None` when the range is exhausted or `stop` was
/// raised by someone else.
pub fn search(
    prefix: &[u8],
    nonces: Range<u64>,
    threshold: &Threshold,
    config: &BatchConfig,
    stop: &AtomicBool,
) -> Option<Solution> {
    let batch_size = config.batch_size.max(1) as u64;
    let mut start = nonces.start;
    let mut hashes = 0u64;

    while start < nonces.end {
        if stop.load(Ordering::Relaxed) {
            debug!("Search stopped before nonce {}", start);
            return None;
        }

        let end = start.saturating_add(batch_size).min(nonces.end);
        let found = match config.context {
            ExecutionContext::Sequential => scan_sequential(prefix, start..end, threshold),
            ExecutionContext::Parallel => scan_parallel(prefix, start..end, threshold),
        };

        if let Some((nonce, digest)) = found {
            hashes += nonce - start + 1;
            stop.store(true, Ordering::SeqCst);
            info!("Found nonce {} after {} hashes", nonce, hashes);
            return Some(Solution {
                nonce,
                digest,
                hashes,
            });
        }

        hashes += end - start;
        debug!("Batch {}..{} exhausted", start, end);
        start = end;
    }

    info!("Nonce range exhausted after {} hashes", hashes);
    None
}

fn scan_sequential(prefix: &[u8], batch: Range<u64>, threshold: &Threshold) -> Option<(u64, Digest)> {
    batch
        .map(|nonce| (nonce, nonce_digest::<Sequential>(prefix, nonce)))
        .find(|(_, digest)| threshold.admits(digest))
}

#[cfg(feature = "parallel")]
fn scan_parallel(prefix: &[u8], batch: Range<u64>, threshold: &Threshold) -> Option<(u64, Digest)> {
    batch
        .into_par_iter()
        .map(|nonce| (nonce, nonce_digest::<Parallel>(prefix, nonce)))
        .find_first(|(_, digest)| threshold.admits(digest))
}

#[cfg(not(feature = "parallel"))]
fn scan_parallel(prefix: &[u8], batch: Range<u64>, threshold: &Threshold) -> Option<(u64, Digest)> {
    batch
        .map(|nonce| (nonce, nonce_digest::<Parallel>(prefix, nonce)))
        .find(|(_, digest)| threshold.admits(digest))
}

/// Size the global worker pool. Returns `false` if it was already running.
#[cfg(feature = "parallel")]
pub fn init_workers(threads: usize) -> bool {
    match rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
    {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Worker pool already initialized: {}", e);
            false
        }
    }
}
