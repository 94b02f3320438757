//! Byte-buffer to big-endian number conversion
//!
//! A digest leaves `finalize` as raw bytes. Comparing it against a threshold
//! needs the bytes read as a big-endian number, eight bytes per limb. These
//! helpers only accept byte buffers; feeding them a value that was already
//! converted reinterprets it a second time.

use crate::params::DIGEST_SIZE;

/// Read 8 bytes with byte 0 as the most significant byte.
#[inline(always)]
pub fn reverse_endian(bytes: &[u8; 8]) -> u64 {
    let mut value = 0u64;
    for (i, &byte) in bytes.iter().enumerate() {
        value ^= (byte as u64) << (8 * (7 - i));
    }
    value
}

/// Overwrite an 8-byte buffer with the number [`reverse_endian`] reads from it.
///
/// The number is written little-endian, so the buffer now holds the same
/// value as a native word would on the little-endian hosts and devices this
/// runs on.
#[inline(always)]
pub fn reverse_endian_in_place(bytes: &mut [u8; 8]) {
    let value = reverse_endian(bytes);
    *bytes = value.to_le_bytes();
}

/// Split a digest into four big-endian limbs, most significant first.
#[inline(always)]
pub fn digest_limbs(digest: &[u8; DIGEST_SIZE]) -> [u64; 4] {
    let mut limbs = [0u64; 4];
    for (limb, chunk) in limbs.iter_mut().zip(digest.chunks_exact(8)) {
        let mut group = [0u8; 8];
        group.copy_from_slice(chunk);
        *limb = reverse_endian(&group);
    }
    limbs
}
