//! Hash state carried across one hashing session
//!
//! Input arrives as bytes but the compression function works on 64-bit
//! words. The conversion between the two is done by explicit little-endian
//! pack/unpack helpers, never by viewing one buffer as the other.

use crate::compress::compress;
use crate::counter::CounterStrategy;
use crate::params::{BLOCK_SIZE, BLOCK_WORDS, IV};

/// Mutable context of one in-progress session.
#[derive(Clone)]
pub struct HashState {
    /// Partially filled input awaiting compression
    pub(crate) buffer: [u8; BLOCK_SIZE],
    /// Running chained hash value
    pub(crate) chain: [u64; 8],
    /// Total bytes absorbed, `[low, high]`, mod 2^128
    pub(crate) counter: [u64; 2],
    /// Cursor into `buffer`, 0..=128
    pub(crate) fill: usize,
    /// Compressions performed so far
    pub(crate) compressions: u64,
}

impl HashState {
    /// Fresh state for the given parameter-block word 0 (output length,
    /// key length, fanout and depth).
    pub(crate) fn new(param_word: u64) -> Self {
        let mut chain = IV;
        chain[0] ^= param_word;
        Self {
            buffer: [0u8; BLOCK_SIZE],
            chain,
            counter: [0, 0],
            fill: 0,
            compressions: 0,
        }
    }

    /// Count the buffered block and compress it.
    #[inline(always)]
    pub(crate) fn compress_buffer<S: CounterStrategy>(&mut self, bytes: usize, last: bool) {
        S::advance(&mut self.counter, bytes as u64);
        let block = load_block(&self.buffer);
        self.chain = compress(&self.chain, &block, self.counter, last);
        self.compressions += 1;
    }

    pub fn chain(&self) -> &[u64; 8] {
        &self.chain
    }

    pub fn counter(&self) -> [u64; 2] {
        self.counter
    }

    pub fn fill(&self) -> usize {
        self.fill
    }

    pub fn compressions(&self) -> u64 {
        self.compressions
    }
}

/// Unpack a 128-byte block into 16 little-endian words.
#[inline(always)]
pub fn load_block(bytes: &[u8; BLOCK_SIZE]) -> [u64; BLOCK_WORDS] {
    let mut words = [0u64; BLOCK_WORDS];
    for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(8)) {
        let mut le = [0u8; 8];
        le.copy_from_slice(chunk);
        *word = u64::from_le_bytes(le);
    }
    words
}

/// Pack chain words into little-endian bytes, truncated to `out.len()`.
#[inline(always)]
pub fn store_words(words: &[u64; 8], out: &mut [u8]) {
    for (chunk, word) in out.chunks_mut(8).zip(words.iter()) {
        let le = word.to_le_bytes();
        chunk.copy_from_slice(&le[..chunk.len()]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_block_little_endian() {
        let mut bytes = [0u8; BLOCK_SIZE];
        bytes[0] = 0x01;
        bytes[7] = 0x80;
        bytes[120] = 0xFF;

        let words = load_block(&bytes);
        assert_eq!(words[0], 0x8000_0000_0000_0001);
        assert_eq!(words[15], 0xFF);
    }

    #[test]
    fn test_store_words_truncates() {
        let words = [0x0706_0504_0302_0100, 0x0F0E_0D0C_0B0A_0908, 0, 0, 0, 0, 0, 0];
        let mut out = [0u8; 12];
        store_words(&words, &mut out);
        assert_eq!(out, [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]);
    }

    #[test]
    fn test_new_state_mixes_parameter_word() {
        let state = HashState::new(0x0101_0020);
        assert_eq!(state.chain()[0], IV[0] ^ 0x0101_0020);
        assert_eq!(state.chain()[1..], IV[1..]);
        assert_eq!(state.counter(), [0, 0]);
        assert_eq!(state.fill(), 0);
    }
}
