//! Shared types used across the nlqhash library.

use core::fmt;
use std::error;

use crate::kernels::constants::{BLOCK_SIZE, OUTPUT_SIZE};

// =============================================================================
// KERNEL INTERFACE
// =============================================================================

/// Per-block transform signature: `(state, block, accumulator, neural_active)`.
///
/// Every kernel implements this same signature so the dispatcher can
/// select one at startup and inject it into each hasher.
pub type CompressFn = fn(&mut [u32; 8], &[u8; BLOCK_SIZE], &mut u32, bool);

/// Direct 64-byte block to 32-byte digest transform signature.
pub type Pair64Fn = fn(&mut [u8; OUTPUT_SIZE], &[u8; BLOCK_SIZE]);

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Error for mismatched batch buffer lengths in the pair transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchLengthError {
    buffer: &'static str,
    expected: usize,
    got: usize,
}

impl BatchLengthError {
    pub(crate) const fn new(buffer: &'static str, expected: usize, got: usize) -> Self {
        Self {
            buffer,
            expected,
            got,
        }
    }
}

impl fmt::Display for BatchLengthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} buffer length mismatch: expected {} bytes, got {}",
            self.buffer, self.expected, self.got
        )
    }
}

impl error::Error for BatchLengthError {}
