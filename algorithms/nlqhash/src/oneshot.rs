//! Public API Layer
//!
//! Whole-message hashing, constant-time digest verification, and the
//! batch pair transform used by tree-hashing callers.

use crate::engine::dispatcher;
use crate::framing;
use crate::kernels;
use crate::kernels::constants::{BLOCK_SIZE, INITIAL_STATE, OUTPUT_SIZE};
use crate::types::BatchLengthError;
use subtle::ConstantTimeEq;

#[cfg(feature = "multithread")]
use rayon::prelude::*;

// =============================================================================
// ONE-SHOT HASHING
// =============================================================================

/// Computes the 32-byte digest of a whole message.
///
/// Byte-identical to writing the same message through [`crate::Hasher`]
/// in any number of chunks: both paths frame through the same padding
/// rule and run the same per-block transform.
///
/// # Example
/// ```rust
/// let digest = nlqhash::hash(b"block header bytes");
/// assert_eq!(digest.len(), 32);
/// ```
#[must_use]
pub fn hash(input: &[u8]) -> [u8; OUTPUT_SIZE] {
    let kernel = dispatcher::get_best_kernel();
    let padded = framing::pad_message(input);

    let mut state = INITIAL_STATE;
    let mut quantum_mix = 0u32;
    let mut block = [0u8; BLOCK_SIZE];

    for (index, chunk) in padded.chunks_exact(BLOCK_SIZE).enumerate() {
        block.copy_from_slice(chunk);
        let offset = (index * BLOCK_SIZE) as u64;
        let neural_active = kernels::neural_predicate(block[0], offset);
        (kernel.compress)(&mut state, &block, &mut quantum_mix, neural_active);
    }

    let mut out = [0u8; OUTPUT_SIZE];
    for (chunk, word) in out.chunks_exact_mut(4).zip(state.iter()) {
        chunk.copy_from_slice(&word.to_be_bytes());
    }
    out
}

/// Verifies a digest in constant time.
#[must_use]
pub fn verify(input: &[u8], expected: &[u8; OUTPUT_SIZE]) -> bool {
    let computed = hash(input);
    computed.ct_eq(expected).into()
}

// =============================================================================
// BATCH PAIR TRANSFORM
// =============================================================================

/// Transforms `blocks` independent pre-formed 64-byte inputs into
/// `blocks` 32-byte digests, straight from the initial state with no
/// padding. Intended for combining concatenated 32-byte digest pairs
/// when bulk-hashing tree levels.
///
/// This is a distinct code path from [`hash`]: a 64-byte message fed to
/// `hash` gains a second padding block, so the two do not produce the
/// same digest for the same 64 bytes.
///
/// # Errors
/// Returns [`BatchLengthError`] when `input` is not exactly
/// `blocks * 64` bytes or `output` is not exactly `blocks * 32` bytes.
pub fn pair_transform(
    output: &mut [u8],
    input: &[u8],
    blocks: usize,
) -> Result<(), BatchLengthError> {
    if input.len() != blocks * BLOCK_SIZE {
        return Err(BatchLengthError::new(
            "input",
            blocks * BLOCK_SIZE,
            input.len(),
        ));
    }
    if output.len() != blocks * OUTPUT_SIZE {
        return Err(BatchLengthError::new(
            "output",
            blocks * OUTPUT_SIZE,
            output.len(),
        ));
    }

    let kernel = dispatcher::get_best_kernel();

    #[cfg(feature = "multithread")]
    {
        output
            .par_chunks_exact_mut(OUTPUT_SIZE)
            .zip(input.par_chunks_exact(BLOCK_SIZE))
            .for_each(|(out_chunk, in_chunk)| {
                transform_one(&kernel, out_chunk, in_chunk);
            });
    }

    #[cfg(not(feature = "multithread"))]
    {
        for (out_chunk, in_chunk) in output
            .chunks_exact_mut(OUTPUT_SIZE)
            .zip(input.chunks_exact(BLOCK_SIZE))
        {
            transform_one(&kernel, out_chunk, in_chunk);
        }
    }

    Ok(())
}

/// Runs the pair kernel over one (input, output) chunk pair.
fn transform_one(kernel: &dispatcher::Kernel, out_chunk: &mut [u8], in_chunk: &[u8]) {
    let mut block = [0u8; BLOCK_SIZE];
    block.copy_from_slice(in_chunk);
    let mut digest = [0u8; OUTPUT_SIZE];
    (kernel.pair64)(&mut digest, &block);
    out_chunk.copy_from_slice(&digest);
}
