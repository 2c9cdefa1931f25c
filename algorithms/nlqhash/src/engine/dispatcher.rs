//! Kernel Dispatcher
//!
//! Selects the per-block transform once, before any hasher exists, and
//! hands it out as an immutable strategy object. There is no mutable
//! process-wide function pointer: each hasher carries its own copy of
//! the selected kernel, so the active implementation cannot change
//! under in-flight hashing.

use crate::kernels;
use crate::types::{CompressFn, Pair64Fn};

// =============================================================================
// KERNEL STRATEGY
// =============================================================================

/// The per-block transform pair selected for this process, injected
/// into each hasher at construction.
#[derive(Debug, Clone, Copy)]
pub struct Kernel {
    /// Full per-block transform (compression + between-block mixing).
    pub compress: CompressFn,
    /// Direct 64-byte to 32-byte transform for pre-formed blocks.
    pub pair64: Pair64Fn,
    /// Name of the backing implementation.
    pub name: &'static str,
}

/// Returns the best kernel for this CPU. Only the portable kernel
/// exists today; hardware-specific variants would be probed here.
#[must_use]
pub fn get_best_kernel() -> Kernel {
    Kernel {
        compress: kernels::portable::process_block,
        pair64: kernels::portable::pair64,
        name: "nlqhash-portable",
    }
}

/// Returns the name of the active backend.
#[must_use]
pub fn get_active_backend_name() -> &'static str {
    get_best_kernel().name
}
