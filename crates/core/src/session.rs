//! Hashing session controller
//!
//! A session runs `initialize -> absorb* -> finalize` over one [`HashState`].
//! A full buffer is only compressed once more input shows up, so the last
//! block (full or partial) is always left for `finalize`, which compresses it
//! with the final-block flag set. A message whose length is a multiple of
//! 128 bytes therefore still ends with a final compression of its last full
//! block, never an extra empty one.
//!
//! The counter strategy is a type parameter: [`HostSession`] for the
//! sequential context, [`DeviceSession`] for the parallel one.

#[cfg(not(feature = "std"))]
use alloc::vec;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use core::fmt;
use core::marker::PhantomData;

use crate::bignum::U256;
use crate::counter::{CounterStrategy, ExecutionContext, Parallel, Sequential};
use crate::endian::digest_limbs;
use crate::error::HashError;
use crate::params::{BLOCK_SIZE, DIGEST_SIZE, MAX_KEY_SIZE, MAX_OUTPUT_SIZE};
use crate::state::{HashState, store_words};

/// Session driven with branch-based counter arithmetic
pub type HostSession = Session<Sequential>;

/// Session driven with carry-chain counter arithmetic
pub type DeviceSession = Session<Parallel>;

/// 32 raw digest bytes as produced by `finalize`.
///
/// The byte layout is the hash output. Use [`Digest::to_limbs`] or
/// [`Digest::to_u256`] for the big-endian numeric view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Digest(pub [u8; DIGEST_SIZE]);

impl Digest {
    pub fn as_bytes(&self) -> &[u8; DIGEST_SIZE] {
        &self.0
    }

    /// Big-endian limbs, most significant first
    pub fn to_limbs(&self) -> [u64; 4] {
        digest_limbs(&self.0)
    }

    pub fn to_u256(&self) -> U256 {
        U256(self.to_limbs())
    }
}

impl From<[u8; DIGEST_SIZE]> for Digest {
    fn from(bytes: [u8; DIGEST_SIZE]) -> Self {
        Digest(bytes)
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::LowerHex for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Absorbing,
    Finalized,
}

/// One BLAKE2b hashing session.
#[derive(Clone)]
pub struct Session<S: CounterStrategy = Sequential> {
    state: HashState,
    output_len: usize,
    phase: Phase,
    _strategy: PhantomData<S>,
}

impl<S: CounterStrategy> Session<S> {
    /// Unkeyed session producing a 32-byte digest
    pub fn new() -> Self {
        Self::with_params(DIGEST_SIZE, &[])
    }

    /// Start a session with the given output length (1..=64) and optional
    /// key (at most 64 bytes; an empty key means unkeyed).
    pub fn initialize(output_len: usize, key: Option<&[u8]>) -> Result<Self, HashError> {
        if output_len == 0 || output_len > MAX_OUTPUT_SIZE {
            return Err(HashError::OutputLength(output_len));
        }
        let key = key.unwrap_or(&[]);
        if key.len() > MAX_KEY_SIZE {
            return Err(HashError::KeyLength(key.len()));
        }
        Ok(Self::with_params(output_len, key))
    }

    fn with_params(output_len: usize, key: &[u8]) -> Self {
        // Parameter block word 0: depth 1, fanout 1, key length, digest length
        let param = 0x0101_0000 ^ ((key.len() as u64) << 8) ^ output_len as u64;
        let mut state = HashState::new(param);
        if !key.is_empty() {
            // Key occupies a full zero-padded block ahead of the message
            state.buffer[..key.len()].copy_from_slice(key);
            state.fill = BLOCK_SIZE;
        }
        Self {
            state,
            output_len,
            phase: Phase::Absorbing,
            _strategy: PhantomData,
        }
    }

    /// Append bytes to the session.
    pub fn absorb(&mut self, data: &[u8]) -> Result<(), HashError> {
        self.ensure_absorbing()?;
        self.update(data);
        Ok(())
    }

    /// Finish a 32-byte session and return its digest.
    pub fn finalize(&mut self) -> Result<Digest, HashError> {
        self.ensure_absorbing()?;
        if self.output_len != DIGEST_SIZE {
            return Err(HashError::DigestLength {
                expected: DIGEST_SIZE,
                actual: self.output_len,
            });
        }
        let mut digest = [0u8; DIGEST_SIZE];
        self.finish(&mut digest);
        Ok(Digest(digest))
    }

    /// Finish a session of any output length into `out`, which must be
    /// exactly `output_len` bytes.
    pub fn finalize_into(&mut self, out: &mut [u8]) -> Result<(), HashError> {
        self.ensure_absorbing()?;
        if out.len() != self.output_len {
            return Err(HashError::DigestLength {
                expected: self.output_len,
                actual: out.len(),
            });
        }
        self.finish(out);
        Ok(())
    }

    /// Finish and return the output as an owned buffer.
    pub fn finalize_vec(&mut self) -> Result<Vec<u8>, HashError> {
        self.ensure_absorbing()?;
        let mut out = vec![0u8; self.output_len];
        self.finish(&mut out);
        Ok(out)
    }

    pub fn output_len(&self) -> usize {
        self.output_len
    }

    pub fn is_finalized(&self) -> bool {
        self.phase == Phase::Finalized
    }

    /// Number of compressions performed so far
    pub fn compressions(&self) -> u64 {
        self.state.compressions
    }

    pub fn state(&self) -> &HashState {
        &self.state
    }

    /// Execution context selected by the counter strategy
    pub fn context(&self) -> ExecutionContext {
        S::CONTEXT
    }

    #[inline(always)]
    fn ensure_absorbing(&self) -> Result<(), HashError> {
        match self.phase {
            Phase::Absorbing => Ok(()),
            Phase::Finalized => Err(HashError::Finalized),
        }
    }

    #[inline(always)]
    pub(crate) fn update(&mut self, mut data: &[u8]) {
        while !data.is_empty() {
            if self.state.fill == BLOCK_SIZE {
                self.state.compress_buffer::<S>(BLOCK_SIZE, false);
                self.state.fill = 0;
            }
            let take = (BLOCK_SIZE - self.state.fill).min(data.len());
            let fill = self.state.fill;
            self.state.buffer[fill..fill + take].copy_from_slice(&data[..take]);
            self.state.fill += take;
            data = &data[take..];
        }
    }

    #[inline(always)]
    fn finish(&mut self, out: &mut [u8]) {
        let fill = self.state.fill;
        self.state.buffer[fill..].fill(0);
        self.state.compress_buffer::<S>(fill, true);
        self.phase = Phase::Finalized;
        store_words(&self.state.chain, out);
    }

    /// `finish` for sessions created by [`Session::new`].
    #[inline(always)]
    pub(crate) fn finish_digest(&mut self) -> Digest {
        let mut digest = [0u8; DIGEST_SIZE];
        self.finish(&mut digest);
        Digest(digest)
    }
}

impl<S: CounterStrategy> Default for Session<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: CounterStrategy> fmt::Debug for Session<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("context", &S::CONTEXT)
            .field("output_len", &self.output_len)
            .field("fill", &self.state.fill)
            .field("counter", &self.state.counter)
            .field("phase", &self.phase)
            .finish()
    }
}

/// BLAKE2b-256 of `data` in the sequential context.
pub fn blake2b256(data: &[u8]) -> Digest {
    blake2b256_with::<Sequential>(data)
}

/// BLAKE2b-256 of `data` with an explicit counter strategy.
#[inline(always)]
pub fn blake2b256_with<S: CounterStrategy>(data: &[u8]) -> Digest {
    let mut session = Session::<S>::new();
    session.update(data);
    session.finish_digest()
}

/// BLAKE2b with any output length and an optional key.
pub fn blake2b(data: &[u8], output_len: usize, key: Option<&[u8]>) -> Result<Vec<u8>, HashError> {
    let mut session = HostSession::initialize(output_len, key)?;
    session.update(data);
    let mut out = vec![0u8; output_len];
    session.finish(&mut out);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_message_single_final_compression() {
        let mut session = HostSession::new();
        let digest = session.finalize().unwrap();

        assert_eq!(session.compressions(), 1);
        assert_eq!(
            hex::encode(digest.as_bytes()),
            "0e5751c026e543b2e8ab2eb06099daa1d1e5df47778f7787faab45cdf12fe3a8"
        );
    }

    #[test]
    fn test_abc() {
        assert_eq!(
            hex::encode(blake2b256(b"abc").as_bytes()),
            "bddd813c634239723171ef3fee98579b94964e3bb1cb3e427262c8c068d52319"
        );
    }

    #[test]
    fn test_finalized_session_rejects_calls() {
        let mut session = HostSession::new();
        session.absorb(b"data").unwrap();
        let digest = session.finalize().unwrap();

        assert!(session.is_finalized());
        assert_eq!(session.absorb(b"more"), Err(HashError::Finalized));
        assert_eq!(session.finalize(), Err(HashError::Finalized));
        assert_eq!(session.finalize_vec(), Err(HashError::Finalized));
        // State left as it was
        assert_eq!(session.compressions(), 1);
        assert_eq!(digest, blake2b256(b"data"));
    }

    #[test]
    fn test_full_block_deferred_until_more_input() {
        let mut session = HostSession::new();
        session.absorb(&[7u8; BLOCK_SIZE]).unwrap();
        assert_eq!(session.compressions(), 0);
        assert_eq!(session.state().fill(), BLOCK_SIZE);

        session.absorb(&[7u8]).unwrap();
        assert_eq!(session.compressions(), 1);
        assert_eq!(session.state().fill(), 1);
        assert_eq!(session.state().counter(), [BLOCK_SIZE as u64, 0]);
    }

    #[test]
    fn test_split_absorb_matches_one_shot() {
        let data: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
        let mut session = HostSession::new();
        for chunk in data.chunks(37) {
            session.absorb(chunk).unwrap();
        }
        assert_eq!(session.finalize().unwrap(), blake2b256(&data));
    }

    #[test]
    fn test_invalid_parameters() {
        assert_eq!(
            HostSession::initialize(0, None).unwrap_err(),
            HashError::OutputLength(0)
        );
        assert_eq!(
            HostSession::initialize(65, None).unwrap_err(),
            HashError::OutputLength(65)
        );
        assert_eq!(
            HostSession::initialize(32, Some(&[0u8; 65][..])).unwrap_err(),
            HashError::KeyLength(65)
        );
    }

    #[test]
    fn test_finalize_requires_32_byte_session() {
        let mut session = HostSession::initialize(64, None).unwrap();
        assert_eq!(
            session.finalize(),
            Err(HashError::DigestLength {
                expected: 32,
                actual: 64
            })
        );
        // Length mismatch does not consume the session
        let mut out = [0u8; 64];
        session.finalize_into(&mut out).unwrap();
        assert!(session.is_finalized());
    }

    #[test]
    fn test_empty_key_is_unkeyed() {
        let keyed = blake2b(b"abc", 32, Some(&[][..])).unwrap();
        assert_eq!(keyed.as_slice(), blake2b256(b"abc").as_bytes());
    }

    #[test]
    fn test_context_follows_strategy() {
        assert_eq!(HostSession::new().context(), ExecutionContext::Sequential);
        assert_eq!(DeviceSession::new().context(), ExecutionContext::Parallel);
    }
}
