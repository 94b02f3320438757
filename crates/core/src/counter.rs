//! 128-bit byte counter arithmetic
//!
//! BLAKE2b mixes the total number of absorbed bytes into every compression.
//! The counter is two 64-bit limbs `[low, high]`. Two strategies advance it:
//!
//! - [`Sequential`]: add to the low limb and branch on wrap-around. Used for
//!   single-threaded host work such as setup and table generation.
//! - [`Parallel`]: split into four 32-bit limbs and run a carry chain with no
//!   data-dependent branches, so thousands of lockstep workers never diverge.
//!
//! Both must produce bit-identical counters for every input.

/// One way of advancing the 128-bit byte counter.
pub trait CounterStrategy {
    /// Execution context this strategy belongs to
    const CONTEXT: ExecutionContext;

    /// Add `bytes` to `counter` modulo 2^128.
    fn advance(counter: &mut [u64; 2], bytes: u64);
}

/// Where a hashing session runs. Never mixed within one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExecutionContext {
    /// Single logical thread of control
    #[default]
    Sequential,
    /// Many independent data-parallel workers
    Parallel,
}

/// Branch-based carry detection.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequential;

impl CounterStrategy for Sequential {
    const CONTEXT: ExecutionContext = ExecutionContext::Sequential;

    #[inline(always)]
    fn advance(counter: &mut [u64; 2], bytes: u64) {
        let prior = counter[0];
        counter[0] = counter[0].wrapping_add(bytes);
        if counter[0] < prior {
            counter[1] = counter[1].wrapping_add(1);
        }
    }
}

/// Flag-style carry propagation over 32-bit limbs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Parallel;

impl CounterStrategy for Parallel {
    const CONTEXT: ExecutionContext = ExecutionContext::Parallel;

    #[inline(always)]
    fn advance(counter: &mut [u64; 2], bytes: u64) {
        let mut limbs = unpack_limbs(counter);
        let addend = [bytes as u32, (bytes >> 32) as u32, 0, 0];

        let mut carry = 0u32;
        for (limb, add) in limbs.iter_mut().zip(addend) {
            let (sum, c1) = limb.overflowing_add(add);
            let (sum, c2) = sum.overflowing_add(carry);
            *limb = sum;
            carry = (c1 | c2) as u32;
        }

        *counter = pack_limbs(&limbs);
    }
}

/// Split `[low, high]` into four 32-bit limbs, least significant first.
#[inline(always)]
pub fn unpack_limbs(counter: &[u64; 2]) -> [u32; 4] {
    [
        counter[0] as u32,
        (counter[0] >> 32) as u32,
        counter[1] as u32,
        (counter[1] >> 32) as u32,
    ]
}

/// Inverse of [`unpack_limbs`].
#[inline(always)]
pub fn pack_limbs(limbs: &[u32; 4]) -> [u64; 2] {
    [
        (limbs[0] as u64) | ((limbs[1] as u64) << 32),
        (limbs[2] as u64) | ((limbs[3] as u64) << 32),
    ]
}

/// Reference value: the counter as a native `u128`.
#[inline(always)]
pub fn as_u128(counter: &[u64; 2]) -> u128 {
    (counter[0] as u128) | ((counter[1] as u128) << 64)
}
