//! BLAKE2b compression function
//!
//! Advances the 8-word chain by one 128-byte block. Twelve rounds, each
//! applying the G mixing function to the four columns and then the four
//! diagonals of the 16-word working vector, with message words picked by the
//! round's row of [`SIGMA`].

use crate::params::{BLOCK_WORDS, IV, ROUNDS};

/// Message schedule: one permutation of the 16 block words per round.
///
/// Rounds 10 and 11 reuse rows 0 and 1.
pub const SIGMA: [[usize; 16]; ROUNDS] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
    [14, 10, 4, 8, 9, 15, 13, 6, 1, 12, 0, 2, 11, 7, 5, 3],
    [11, 8, 12, 0, 5, 2, 15, 13, 10, 14, 3, 6, 7, 1, 9, 4],
    [7, 9, 3, 1, 13, 12, 11, 14, 2, 6, 5, 10, 4, 0, 15, 8],
    [9, 0, 5, 7, 2, 4, 10, 15, 14, 1, 11, 12, 6, 8, 3, 13],
    [2, 12, 6, 10, 0, 11, 8, 3, 4, 13, 7, 5, 15, 14, 1, 9],
    [12, 5, 1, 15, 14, 13, 4, 10, 0, 7, 6, 3, 9, 2, 8, 11],
    [13, 11, 7, 14, 12, 1, 3, 9, 5, 0, 15, 4, 8, 6, 2, 10],
    [6, 15, 14, 9, 11, 3, 0, 8, 12, 2, 13, 7, 1, 4, 10, 5],
    [10, 2, 8, 4, 7, 6, 1, 5, 15, 11, 9, 14, 3, 12, 13, 0],
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
    [14, 10, 4, 8, 9, 15, 13, 6, 1, 12, 0, 2, 11, 7, 5, 3],
];

/// Working-vector indices (a, b, c, d) for the 8 G calls of a round:
/// four columns, then four diagonals.
const LANES: [[usize; 4]; 8] = [
    [0, 4, 8, 12],
    [1, 5, 9, 13],
    [2, 6, 10, 14],
    [3, 7, 11, 15],
    [0, 5, 10, 15],
    [1, 6, 11, 12],
    [2, 7, 8, 13],
    [3, 4, 9, 14],
];

/// Compress one message block into the chain.
///
/// `counter` is the byte count `[low, high]` including this block. `last`
/// marks the final block of the session.
#[inline(always)]
pub fn compress(
    chain: &[u64; 8],
    block: &[u64; BLOCK_WORDS],
    counter: [u64; 2],
    last: bool,
) -> [u64; 8] {
    let mut v = [0u64; 16];
    v[..8].copy_from_slice(chain);
    v[8..].copy_from_slice(&IV);

    v[12] ^= counter[0];
    v[13] ^= counter[1];
    if last {
        v[14] = !v[14];
    }

    for s in &SIGMA {
        for (lane, [a, b, c, d]) in LANES.iter().enumerate() {
            g(&mut v, *a, *b, *c, *d, block[s[2 * lane]], block[s[2 * lane + 1]]);
        }
    }

    let mut next = [0u64; 8];
    for i in 0..8 {
        next[i] = chain[i] ^ v[i] ^ v[i + 8];
    }
    next
}

/// BLAKE2b G mixing function
#[inline(always)]
fn g(v: &mut [u64; 16], a: usize, b: usize, c: usize, d: usize, x: u64, y: u64) {
    v[a] = v[a].wrapping_add(v[b]).wrapping_add(x);
    v[d] = (v[d] ^ v[a]).rotate_right(32);
    v[c] = v[c].wrapping_add(v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(24);
    v[a] = v[a].wrapping_add(v[b]).wrapping_add(y);
    v[d] = (v[d] ^ v[a]).rotate_right(16);
    v[c] = v[c].wrapping_add(v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(63);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigma_rows_are_permutations() {
        for row in &SIGMA {
            let mut seen = [false; 16];
            for &i in row {
                assert!(!seen[i], "index {} repeated", i);
                seen[i] = true;
            }
        }
    }

    #[test]
    fn test_compress_deterministic() {
        let chain = IV;
        let block = [1u64; BLOCK_WORDS];

        let result1 = compress(&chain, &block, [128, 0], false);
        let result2 = compress(&chain, &block, [128, 0], false);

        assert_eq!(result1, result2);
        assert_ne!(result1, chain);
    }

    #[test]
    fn test_last_flag_changes_output() {
        let block = [0u64; BLOCK_WORDS];
        assert_ne!(
            compress(&IV, &block, [0, 0], false),
            compress(&IV, &block, [0, 0], true)
        );
    }

    #[test]
    fn test_high_counter_limb_is_mixed() {
        let block = [0u64; BLOCK_WORDS];
        assert_ne!(
            compress(&IV, &block, [128, 0], false),
            compress(&IV, &block, [128, 1], false)
        );
    }

    #[test]
    fn test_rfc7693_abc_single_block() {
        // BLAKE2b-512("abc") from RFC 7693 Appendix A
        let mut chain = IV;
        chain[0] ^= 0x0101_0000 ^ 64;
        let mut block = [0u64; BLOCK_WORDS];
        block[0] = 0x0000_0000_0063_6261;

        let out = compress(&chain, &block, [3, 0], true);
        assert_eq!(out[0], 0x0D4D_1C98_3FA5_80BA);
        assert_eq!(out[7], 0x2399_00D4_ED86_23B9);
    }
}
