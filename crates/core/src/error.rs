//! Error types for the hashing core

use thiserror::Error;

/// Failures a caller can observe from the hashing core.
///
/// Every variant signals a caller bug or bad input. None of them leave a
/// session in a half-updated state.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashError {
    #[error("session already finalized")]
    Finalized,

    #[error("invalid output length {0} (expected 1..=64)")]
    OutputLength(usize),

    #[error("invalid key length {0} (expected at most 64)")]
    KeyLength(usize),

    #[error("digest length {actual} does not match expected {expected}")]
    DigestLength { expected: usize, actual: usize },

    #[error("invalid hex character at position {0}")]
    InvalidHex(usize),

    #[error("hex value has {0} digits (expected at most 64)")]
    HexLength(usize),
}
