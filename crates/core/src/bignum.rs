//! 256-bit unsigned integers and the difficulty threshold
//!
//! Values are four 64-bit limbs stored most significant first, the same
//! order the threshold constants are published in.

use core::cmp::Ordering;
use core::fmt;

use crate::endian::digest_limbs;
use crate::error::HashError;
use crate::params::{DIGEST_SIZE, Q};
use crate::session::Digest;

/// Unsigned 256-bit integer, limbs most significant first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct U256(pub [u64; 4]);

impl U256 {
    pub const ZERO: U256 = U256([0; 4]);
    pub const ONE: U256 = U256([0, 0, 0, 1]);
    pub const MAX: U256 = U256([u64::MAX; 4]);

    /// Build from a `u64` (lands in the least significant limb)
    pub const fn from_u64(value: u64) -> Self {
        U256([0, 0, 0, value])
    }

    /// Limbs, most significant first
    pub const fn limbs(&self) -> &[u64; 4] {
        &self.0
    }

    /// Interpret 32 bytes as a big-endian number
    pub fn from_be_bytes(bytes: &[u8; DIGEST_SIZE]) -> Self {
        U256(digest_limbs(bytes))
    }

    /// Big-endian byte encoding
    pub fn to_be_bytes(&self) -> [u8; DIGEST_SIZE] {
        let mut out = [0u8; DIGEST_SIZE];
        for (chunk, limb) in out.chunks_exact_mut(8).zip(self.0.iter()) {
            chunk.copy_from_slice(&limb.to_be_bytes());
        }
        out
    }

    /// Eight 32-bit limbs, most significant first.
    ///
    /// For device code that can only embed 32-bit immediates.
    pub fn to_u32_limbs(&self) -> [u32; 8] {
        let mut out = [0u32; 8];
        for (pair, limb) in out.chunks_exact_mut(2).zip(self.0.iter()) {
            pair[0] = (limb >> 32) as u32;
            pair[1] = *limb as u32;
        }
        out
    }

    /// Parse up to 64 hex digits, with or without a `0x` prefix.
    pub fn from_hex(text: &str) -> Result<Self, HashError> {
        let digits = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
            .unwrap_or(text);
        if digits.is_empty() || digits.len() > 64 {
            return Err(HashError::HexLength(digits.len()));
        }

        let mut limbs = [0u64; 4];
        for (from_end, (pos, ch)) in digits.char_indices().rev().enumerate() {
            let nibble = ch.to_digit(16).ok_or(HashError::InvalidHex(pos))? as u64;
            limbs[3 - from_end / 16] |= nibble << (4 * (from_end % 16));
        }
        Ok(U256(limbs))
    }

    /// Add with carry across all four limbs; returns the wrapped sum and
    /// whether it overflowed 2^256.
    pub fn overflowing_add(self, rhs: U256) -> (U256, bool) {
        let mut out = [0u64; 4];
        let mut carry = false;
        for i in (0..4).rev() {
            let (sum, c1) = self.0[i].overflowing_add(rhs.0[i]);
            let (sum, c2) = sum.overflowing_add(carry as u64);
            out[i] = sum;
            carry = c1 | c2;
        }
        (U256(out), carry)
    }

    /// Subtract with borrow; returns the wrapped difference and whether it
    /// borrowed past zero.
    pub fn overflowing_sub(self, rhs: U256) -> (U256, bool) {
        let mut out = [0u64; 4];
        let mut borrow = false;
        for i in (0..4).rev() {
            let (diff, b1) = self.0[i].overflowing_sub(rhs.0[i]);
            let (diff, b2) = diff.overflowing_sub(borrow as u64);
            out[i] = diff;
            borrow = b1 | b2;
        }
        (U256(out), borrow)
    }
}

/// Compare two 256-bit values limb by limb, most significant first.
///
/// The first unequal limb pair decides.
#[inline(always)]
pub fn compare(a: &[u64; 4], b: &[u64; 4]) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        if x < y {
            return Ordering::Less;
        }
        if x > y {
            return Ordering::Greater;
        }
    }
    Ordering::Equal
}

impl Ord for U256 {
    fn cmp(&self, other: &Self) -> Ordering {
        compare(&self.0, &other.0)
    }
}

impl PartialOrd for U256 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::LowerHex for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for limb in &self.0 {
            write!(f, "{:016x}", limb)?;
        }
        Ok(())
    }
}

impl fmt::Display for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self)
    }
}

impl From<[u64; 4]> for U256 {
    fn from(limbs: [u64; 4]) -> Self {
        U256(limbs)
    }
}

/// Largest digest value (exclusive) accepted as a valid proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Threshold(U256);

impl Threshold {
    /// Autolykos valid range bound
    pub const Q: Threshold = Threshold(U256(Q));

    pub const fn new(value: U256) -> Self {
        Threshold(value)
    }

    pub fn from_hex(text: &str) -> Result<Self, HashError> {
        U256::from_hex(text).map(Threshold)
    }

    pub const fn value(&self) -> &U256 {
        &self.0
    }

    /// Whether a digest, read as a big-endian number, is strictly below
    /// the threshold.
    #[inline(always)]
    pub fn admits(&self, digest: &Digest) -> bool {
        self.admits_limbs(&digest_limbs(digest.as_bytes()))
    }

    /// Same test on an already converted digest.
    #[inline(always)]
    pub fn admits_limbs(&self, limbs: &[u64; 4]) -> bool {
        compare(limbs, &self.0.0) == Ordering::Less
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Threshold::Q
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Q_HEX32;

    #[test]
    fn test_compare_decided_by_most_significant_limb() {
        let a = [1, 0, 0, 0];
        let b = [0, u64::MAX, u64::MAX, u64::MAX];
        assert_eq!(compare(&a, &b), Ordering::Greater);
        assert_eq!(compare(&b, &a), Ordering::Less);
    }

    #[test]
    fn test_compare_least_significant_limb_only() {
        let a = [7, 7, 7, 1];
        let b = [7, 7, 7, 2];
        assert_eq!(compare(&a, &b), Ordering::Less);
        assert_eq!(compare(&a, &a), Ordering::Equal);
    }

    #[test]
    fn test_hex_roundtrip_q() {
        let q = U256::from_hex(
            "0xFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141",
        )
        .unwrap();
        assert_eq!(q, *Threshold::Q.value());
        assert_eq!(
            format!("{:x}", q),
            "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141"
        );
    }

    #[test]
    fn test_short_hex_is_right_aligned() {
        assert_eq!(U256::from_hex("1").unwrap(), U256::ONE);
        assert_eq!(
            U256::from_hex("10000000000000000").unwrap(),
            U256([0, 0, 1, 0])
        );
    }

    #[test]
    fn test_hex_errors() {
        assert_eq!(U256::from_hex(""), Err(HashError::HexLength(0)));
        assert_eq!(U256::from_hex("0x12g4"), Err(HashError::InvalidHex(2)));
        let too_long = "1".repeat(65);
        assert_eq!(U256::from_hex(&too_long), Err(HashError::HexLength(65)));
    }

    #[test]
    fn test_u32_limbs_match_immediates() {
        let words = Threshold::Q.value().to_u32_limbs();
        for (word, text) in words.iter().zip(Q_HEX32.iter()) {
            assert_eq!(format!("0x{:08X}", word), *text);
        }
    }

    #[test]
    fn test_add_sub_carry_across_limbs() {
        let low_full = U256([0, 0, 0, u64::MAX]);
        let (sum, overflow) = low_full.overflowing_add(U256::ONE);
        assert_eq!(sum, U256([0, 0, 1, 0]));
        assert!(!overflow);

        let (back, borrow) = sum.overflowing_sub(U256::ONE);
        assert_eq!(back, low_full);
        assert!(!borrow);

        assert_eq!(U256::MAX.overflowing_add(U256::ONE), (U256::ZERO, true));
        assert_eq!(U256::ZERO.overflowing_sub(U256::ONE), (U256::MAX, true));
    }

    #[test]
    fn test_be_bytes_roundtrip() {
        let value = U256([1, 2, 3, 4]);
        assert_eq!(U256::from_be_bytes(&value.to_be_bytes()), value);
    }

    #[test]
    fn test_threshold_is_strict() {
        let threshold = Threshold::new(U256::from_u64(100));
        assert!(threshold.admits_limbs(&[0, 0, 0, 99]));
        assert!(!threshold.admits_limbs(&[0, 0, 0, 100]));
        assert!(!threshold.admits_limbs(&[0, 0, 1, 0]));
    }
}
