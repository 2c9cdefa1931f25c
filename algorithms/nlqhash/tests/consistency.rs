//! Consistency & Regression Tests
//!
//! - Streaming vs one-shot equivalence at every interesting size
//! - Arbitrary split points, including pathological 1-byte writes
//! - Reset semantics
//! - Cross-thread determinism

#![allow(clippy::pedantic, clippy::nursery)]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use nlqhash::{hash, Hasher};

// =============================================================================
// STREAMING CONSISTENCY
// =============================================================================

#[test]
fn test_streaming_consistency() {
    // Sizes chosen around the 64-byte block boundary and the padding
    // trailer boundary (55/56 bytes).
    let sizes = [0usize, 1, 31, 55, 56, 63, 64, 65, 127, 128, 129, 1000, 4096];

    for &size in &sizes {
        let input: Vec<u8> = (0..size).map(|i| (i % 251) as u8).collect();
        let h_oneshot = hash(&input);

        let mut hasher = Hasher::new();
        hasher.write(&input);
        let h_streaming = hasher.finalize();

        assert_eq!(
            h_oneshot, h_streaming,
            "CONSISTENCY FAILURE at size {size}: one-shot and streaming produced different digests",
        );
    }
}

#[test]
fn test_arbitrary_split_points() {
    let input: Vec<u8> = (0..300).map(|i| (i * 7 % 256) as u8).collect();
    let expected = hash(&input);

    for split in [1usize, 2, 63, 64, 65, 150, 299] {
        let (first, second) = input.split_at(split);
        let mut hasher = Hasher::new();
        hasher.write(first).write(second);
        assert_eq!(
            hasher.finalize(),
            expected,
            "split at {split} diverged from one-shot"
        );
    }
}

#[test]
fn test_bytewise_streaming() {
    let input = b"the quick brown fox jumps over the lazy dog, twice over";
    let expected = hash(input);

    let mut hasher = Hasher::new();
    for byte in input {
        hasher.write(&[*byte]);
    }
    assert_eq!(hasher.finalize(), expected);
}

#[test]
fn test_pseudo_random_chunking() {
    // Deterministic xorshift chunk widths; no external RNG needed.
    let input: Vec<u8> = (0..5000).map(|i| (i % 256) as u8).collect();
    let expected = hash(&input);

    let mut seed = 0x9e37_79b9u32;
    let mut hasher = Hasher::new();
    let mut rest = input.as_slice();
    while !rest.is_empty() {
        seed ^= seed << 13;
        seed ^= seed >> 17;
        seed ^= seed << 5;
        let take = ((seed as usize) % 97 + 1).min(rest.len());
        let (chunk, tail) = rest.split_at(take);
        hasher.write(chunk);
        rest = tail;
    }
    assert_eq!(hasher.finalize(), expected);
}

// =============================================================================
// RESET SEMANTICS
// =============================================================================

#[test]
fn test_reset_matches_fresh_instance() {
    let first_message = b"a message that dirties the state and the accumulator";
    let second_message = b"the message under test";

    let mut reused = Hasher::new();
    reused.write(first_message);
    reused.reset();
    reused.write(second_message);

    assert_eq!(reused.finalize(), hash(second_message));
}

#[test]
fn test_reset_empty_equals_fresh_empty() {
    let mut reused = Hasher::new();
    reused.write(b"leftover bytes");
    reused.reset();
    assert_eq!(reused.finalize(), hash(b""));
}

// =============================================================================
// DETERMINISM
// =============================================================================

#[test]
fn test_repeated_hash_is_identical() {
    let input = vec![0xa5u8; 777];
    let h1 = hash(&input);
    let h2 = hash(&input);
    assert_eq!(h1, h2);
}

#[test]
fn test_cross_thread_determinism() {
    let input: Vec<u8> = (0..2048).map(|i| (i % 253) as u8).collect();
    let expected = hash(&input);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let data = input.clone();
            std::thread::spawn(move || hash(&data))
        })
        .collect();

    for handle in handles {
        let digest = handle.join().expect("hashing thread panicked");
        assert_eq!(digest, expected, "digest depended on thread context");
    }
}

// =============================================================================
// DIGEST TRAIT
// =============================================================================

#[cfg(feature = "digest-trait")]
#[test]
fn test_digest_trait_matches_native_api() {
    use nlqhash::digest::Digest;

    let input = b"digest trait interop";
    let mut hasher = <nlqhash::Hasher as Digest>::new();
    Digest::update(&mut hasher, input);
    let via_trait = Digest::finalize(hasher);
    assert_eq!(via_trait.as_slice(), hash(input).as_slice());
}
