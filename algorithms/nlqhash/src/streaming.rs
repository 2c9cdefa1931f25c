//! Streaming Hasher
//!
//! The incremental interface: feed bytes over any number of `write`
//! calls, finalize once. The hasher owns the 8-word running state, the
//! message-wide mixing accumulator, and a 64-byte carry buffer; those
//! three fully determine each block transform, so the digest is
//! independent of how the input was split across calls.

use crate::engine::dispatcher::{self, Kernel};
use crate::framing;
use crate::kernels;
use crate::kernels::constants::{BLOCK_SIZE, INITIAL_STATE, OUTPUT_SIZE};

#[cfg(feature = "digest-trait")]
use digest::{
    consts::U32, FixedOutput, HashMarker, Output, OutputSizeUser, Reset, Update,
};

// =============================================================================
// STREAMING HASHER
// =============================================================================

/// Streaming hasher over 64-byte blocks.
///
/// Finalization consumes the hasher, so a finalized instance can never
/// be written to again; construct a new one (or `reset` before
/// finalizing) to hash another message.
#[derive(Clone)]
pub struct Hasher {
    /// Running 8-word state.
    state: [u32; 8],
    /// Carry buffer for the 0–63 bytes not yet forming a full block.
    buf: [u8; BLOCK_SIZE],
    /// Total message bytes written (buffered bytes included).
    bytes: u64,
    /// Padded-stream bytes already compressed; the offset of the next
    /// block, feeding the neural activation predicate.
    compressed: u64,
    /// Message-wide quantum mixing accumulator.
    quantum_mix: u32,
    /// Per-block transform selected at construction.
    kernel: Kernel,
}

impl Hasher {
    // =========================================================================
    // INITIALIZATION
    // =========================================================================

    /// Creates a fresh hasher with the dispatcher-selected kernel.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: INITIAL_STATE,
            buf: [0u8; BLOCK_SIZE],
            bytes: 0,
            compressed: 0,
            quantum_mix: 0,
            kernel: dispatcher::get_best_kernel(),
        }
    }

    // =========================================================================
    // STATE MODIFICATION
    // =========================================================================

    /// Appends bytes to the message, compressing every completed
    /// 64-byte block. Returns `self` for chaining. Any byte sequence is
    /// valid input.
    pub fn write(&mut self, mut data: &[u8]) -> &mut Self {
        #[allow(clippy::cast_possible_truncation)]
        let mut bufsize = (self.bytes % BLOCK_SIZE as u64) as usize;

        if bufsize > 0 && bufsize + data.len() >= BLOCK_SIZE {
            // Top up the carry buffer and compress it.
            let take = BLOCK_SIZE - bufsize;
            self.buf[bufsize..].copy_from_slice(&data[..take]);
            self.bytes += take as u64;
            data = &data[take..];
            let block = self.buf;
            self.process(&block);
            bufsize = 0;
        }

        while data.len() >= BLOCK_SIZE {
            let mut block = [0u8; BLOCK_SIZE];
            block.copy_from_slice(&data[..BLOCK_SIZE]);
            self.process(&block);
            self.bytes += BLOCK_SIZE as u64;
            data = &data[BLOCK_SIZE..];
        }

        if !data.is_empty() {
            self.buf[bufsize..bufsize + data.len()].copy_from_slice(data);
            self.bytes += data.len() as u64;
        }

        self
    }

    /// Frames the buffered remainder, compresses the final block(s),
    /// and returns the 32-byte big-endian digest. Consumes the hasher.
    #[must_use]
    pub fn finalize(mut self) -> [u8; OUTPUT_SIZE] {
        let mut fill = [0u8; BLOCK_SIZE];
        fill[0] = 0x80;
        let sizedesc = (self.bytes << 3).to_be_bytes();

        self.write(&fill[..framing::fill_len(self.bytes)]);
        self.write(&sizedesc);

        let mut out = [0u8; OUTPUT_SIZE];
        for (chunk, word) in out.chunks_exact_mut(4).zip(self.state.iter()) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        out
    }

    /// Restores the hasher to its freshly-constructed state.
    pub fn reset(&mut self) -> &mut Self {
        self.state = INITIAL_STATE;
        self.bytes = 0;
        self.compressed = 0;
        self.quantum_mix = 0;
        self
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    /// Runs one block through the kernel at the current stream offset.
    fn process(&mut self, block: &[u8; BLOCK_SIZE]) {
        let neural_active = kernels::neural_predicate(block[0], self.compressed);
        (self.kernel.compress)(&mut self.state, block, &mut self.quantum_mix, neural_active);
        self.compressed += BLOCK_SIZE as u64;
    }
}

// =============================================================================
// TRAIT IMPLS
// =============================================================================

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "digest-trait")]
impl OutputSizeUser for Hasher {
    type OutputSize = U32;
}

#[cfg(feature = "digest-trait")]
impl Update for Hasher {
    fn update(&mut self, data: &[u8]) {
        self.write(data);
    }
}

#[cfg(feature = "digest-trait")]
impl FixedOutput for Hasher {
    fn finalize_into(self, out: &mut Output<Self>) {
        out.copy_from_slice(&self.finalize());
    }
}

#[cfg(feature = "digest-trait")]
impl Reset for Hasher {
    fn reset(&mut self) {
        self.reset();
    }
}

#[cfg(feature = "digest-trait")]
impl HashMarker for Hasher {}
