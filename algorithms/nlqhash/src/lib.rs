//! # nlqhash
//!
//! Streaming 256-bit proof-of-work hash built from a SHA-2-style
//! Merkle–Damgård compression core, extended with two deterministic
//! perturbation stages: a fixed feed-forward neural transform and a
//! small 2-qubit quantum-circuit simulation whose measurement scalars
//! are folded into a message-wide mixing accumulator.
//!
//! Every block transform is a pure function of the 8-word state, the
//! block, and the accumulator — no clock, no RNG, no thread identity —
//! so the same message hashes to the same digest on every platform.
//! Consensus callers should gate startup on [`auto_detect`], which
//! refuses to name the implementation unless the self-test harness
//! passes.
//!
//! # Usage
//! ```rust
//! // One-shot
//! let digest = nlqhash::hash(b"candidate block header");
//! assert!(nlqhash::verify(b"candidate block header", &digest));
//!
//! // Streaming
//! let mut hasher = nlqhash::Hasher::new();
//! hasher.write(b"candidate ").write(b"block header");
//! assert_eq!(hasher.finalize(), digest);
//! ```

// =============================================================================
// MODULES
// =============================================================================

mod engine;
mod framing;
// Internal kernels, public for tests and benches only.
#[doc(hidden)]
pub mod kernels;
mod oneshot;
pub mod selftest;
mod streaming;
mod types;

// =============================================================================
// EXPORTS
// =============================================================================

pub use kernels::constants::{BLOCK_SIZE, OUTPUT_SIZE};
pub use oneshot::{hash, pair_transform, verify};
pub use selftest::{auto_detect, FixtureStatus, SelfTestError, SelfTestReport};
pub use streaming::Hasher;
pub use types::BatchLengthError;

#[cfg(feature = "digest-trait")]
pub use digest;

/// Returns the name of the kernel backend currently in use. Unlike
/// [`auto_detect`], this does not gate on the self-test harness.
#[must_use]
pub fn active_backend() -> &'static str {
    engine::get_active_backend_name()
}
