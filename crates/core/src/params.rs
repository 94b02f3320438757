//! BLAKE2b and Autolykos Parameters
//!
//! Sizes and constants shared by the hashing session, the comparator
//! and the batch driver.

/// BLAKE2b input block size in bytes
pub const BLOCK_SIZE: usize = 128;

/// Number of 64-bit words in one message block
pub const BLOCK_WORDS: usize = BLOCK_SIZE / 8;

/// Number of mixing rounds per compression
pub const ROUNDS: usize = 12;

/// Digest size used for mining (BLAKE2b-256)
pub const DIGEST_SIZE: usize = 32;

/// Largest output length BLAKE2b supports
pub const MAX_OUTPUT_SIZE: usize = 64;

/// Largest key length BLAKE2b supports
pub const MAX_KEY_SIZE: usize = 64;

/// BLAKE2b initialization vector (same words as SHA-512's IV)
pub const IV: [u64; 8] = [
    0x6A09E667F3BCC908,
    0xBB67AE8584CAA73B,
    0x3C6EF372FE94F82B,
    0xA54FF53A5F1D36F1,
    0x510E527FADE682D1,
    0x9B05688C2B3E6C1F,
    0x1F83D9ABFB41BD6B,
    0x5BE0CD19137E2179,
];

/// Secret keys and hashes size in bytes
pub const NUM_SIZE_8: usize = 32;

/// Secret keys and hashes size in 32-bit words
pub const NUM_SIZE_32: usize = NUM_SIZE_8 >> 2;

/// Secret keys and hashes size in 64-bit words
pub const NUM_SIZE_64: usize = NUM_SIZE_8 >> 3;

/// Compressed public key size in bytes
pub const PK_SIZE_8: usize = 33;

/// Nonce size in bytes
pub const NONCE_SIZE_8: usize = 8;

/// Number of table indices combined per solution
pub const K_LEN: usize = 32;

/// Number of precalculated table hashes (2^26)
pub const N_LEN: u32 = 0x400_0000;

/// Mask for reducing an index modulo `N_LEN`
pub const N_MASK: u32 = N_LEN - 1;

/// Autolykos valid range bound Q, four 64-bit limbs, most significant first
pub const Q: [u64; 4] = [
    0xFFFFFFFFFFFFFFFF,
    0xFFFFFFFFFFFFFFFE,
    0xBAAEDCE6AF48A03B,
    0xBFD25E8CD0364141,
];

/// Q as eight 32-bit hex immediates, most significant first
pub const Q_HEX32: [&str; 8] = [
    "0xFFFFFFFF",
    "0xFFFFFFFF",
    "0xFFFFFFFF",
    "0xFFFFFFFE",
    "0xBAAEDCE6",
    "0xAF48A03B",
    "0xBFD25E8C",
    "0xD0364141",
];

/// Default number of sessions per batch
pub const DEFAULT_BATCH_SIZE: usize = 4096;
