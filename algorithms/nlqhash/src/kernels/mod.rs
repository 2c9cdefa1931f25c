//! Compression Kernels
//!
//! Implementations of the per-block transform. Only the portable
//! kernel exists today; the dispatcher in `engine` is the single place
//! that would grow hardware-specific variants.

pub mod constants;
pub mod portable;

/// Per-block activation predicate for the neural perturbation stage.
///
/// `first` is the first byte of the block and `offset` is the number of
/// padded-stream bytes preceding it, so the predicate is computable
/// identically whether blocks arrive incrementally or all at once.
pub fn neural_predicate(first: u8, offset: u64) -> bool {
    (u64::from(first) + offset) % 5 == 0
}
