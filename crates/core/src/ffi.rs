//! C FFI bindings for host programs and device launchers

use crate::bignum::{Threshold, U256};
use crate::params::DIGEST_SIZE;
use crate::session::{Digest, blake2b256};
use core::slice;

/// Compute BLAKE2b-256 of input data
/// - input: pointer to input bytes (may be null when input_len is 0)
/// - input_len: length of input
/// - output: pointer to 32-byte buffer for result
///
/// Returns 0 on success, -1 on a null pointer.
#[unsafe(no_mangle)]
pub extern "C" fn b2b_hash(input: *const u8, input_len: usize, output: *mut u8) -> i32 {
    if output.is_null() || (input.is_null() && input_len > 0) {
        return -1;
    }

    unsafe {
        let input_slice = if input_len == 0 {
            &[][..]
        } else {
            slice::from_raw_parts(input, input_len)
        };
        let digest = blake2b256(input_slice);

        let output_slice = slice::from_raw_parts_mut(output, DIGEST_SIZE);
        output_slice.copy_from_slice(digest.as_bytes());
    }
    0
}

/// Test a 32-byte digest against a 32-byte big-endian threshold
///
/// Returns 1 if the digest is strictly below the threshold, 0 if not,
/// -1 on a null pointer.
#[unsafe(no_mangle)]
pub extern "C" fn b2b_below_threshold(digest: *const u8, threshold_be: *const u8) -> i32 {
    if digest.is_null() || threshold_be.is_null() {
        return -1;
    }

    let (digest, threshold) = unsafe {
        let mut d = [0u8; DIGEST_SIZE];
        d.copy_from_slice(slice::from_raw_parts(digest, DIGEST_SIZE));
        let mut t = [0u8; DIGEST_SIZE];
        t.copy_from_slice(slice::from_raw_parts(threshold_be, DIGEST_SIZE));
        (Digest(d), Threshold::new(U256::from_be_bytes(&t)))
    };

    threshold.admits(&digest) as i32
}

/// Benchmark: compute N hashes and return total microseconds
#[unsafe(no_mangle)]
pub extern "C" fn b2b_benchmark(iterations: u32) -> u64 {
    use std::time::Instant;

    let mut data = [0u8; 76];
    data[..36].copy_from_slice(b"benchmark test input data for mining");

    let start = Instant::now();
    for i in 0..iterations {
        data[68..72].copy_from_slice(&i.to_le_bytes());
        let _ = blake2b256(&data);
    }
    let elapsed = start.elapsed();

    elapsed.as_micros() as u64
}

/// Get hash rate (hashes per second) from a benchmark run
#[unsafe(no_mangle)]
pub extern "C" fn b2b_hashrate(iterations: u32, microseconds: u64) -> f64 {
    if microseconds == 0 {
        return 0.0;
    }
    (iterations as f64) / (microseconds as f64 / 1_000_000.0)
}
