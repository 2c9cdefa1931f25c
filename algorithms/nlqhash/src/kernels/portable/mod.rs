//! Portable Compression Engine
//!
//! The reference implementation of the per-block transform: message
//! schedule expansion, four outer rounds of sixteen SHA-2-style mixing
//! steps, the conditional neural perturbation, the quantum-simulated
//! 65th step, the Merkle–Damgård feed-forward, and the between-block
//! register mixing. All integer arithmetic is wrapping; for a fixed
//! (state, block, accumulator) triple the output is identical on every
//! platform and thread.

use crate::kernels::constants::{BLOCK_SIZE, INITIAL_STATE, OUTPUT_SIZE, ROUND_KEYS, SCHEDULE_WORDS};

pub mod neural;
pub mod quantum;

// =============================================================================
// MESSAGE SCHEDULE
// =============================================================================

/// Expands one 64-byte block into 64 working words. The first 16 are
/// the big-endian word decomposition of the block; the rest follow the
/// SHA-2 recurrence `w[i] = w[i-16] + s0(w[i-15]) + w[i-7] + s1(w[i-2])`.
pub fn expand_schedule(block: &[u8; BLOCK_SIZE]) -> [u32; SCHEDULE_WORDS] {
    let mut w = [0u32; SCHEDULE_WORDS];
    for (i, chunk) in block.chunks_exact(4).enumerate() {
        w[i] = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    for i in 16..SCHEDULE_WORDS {
        let s0 = w[i - 15].rotate_right(7) ^ w[i - 15].rotate_right(18) ^ (w[i - 15] >> 3);
        let s1 = w[i - 2].rotate_right(17) ^ w[i - 2].rotate_right(19) ^ (w[i - 2] >> 10);
        w[i] = w[i - 16]
            .wrapping_add(s0)
            .wrapping_add(w[i - 7])
            .wrapping_add(s1);
    }
    w
}

// =============================================================================
// REGISTER MIXING
// =============================================================================

/// One cross-register mixing pass: four rotate/XOR/add operations
/// chaining four registers.
const fn improved_mix(a: u32, b: u32, c: u32, d: u32) -> (u32, u32, u32, u32) {
    let a = a.rotate_left(13) ^ b;
    let b = b.rotate_right(7).wrapping_add(c);
    let c = c.rotate_left(17) ^ d;
    let d = d.rotate_right(11).wrapping_add(a);
    (a, b, c, d)
}

/// Mixes a window of four consecutive state words in place.
fn mix_window(state: &mut [u32; 8], at: usize) {
    let (a, b, c, d) = improved_mix(state[at], state[at + 1], state[at + 2], state[at + 3]);
    state[at] = a;
    state[at + 1] = b;
    state[at + 2] = c;
    state[at + 3] = d;
}

/// Additional mixing applied between blocks: overlapping `improved_mix`
/// windows sliding across all eight state words.
pub fn mix_between_blocks(state: &mut [u32; 8]) {
    for at in 0..5 {
        mix_window(state, at);
    }
}

// =============================================================================
// COMPRESSION
// =============================================================================

/// The `(S1, ch, temp2)` triple of a SHA-2 mixing step, computed from a
/// snapshot of the working registers.
const fn step_inputs(regs: &[u32; 8]) -> (u32, u32, u32) {
    let [a, b, c, _, e, f, g, _] = *regs;
    let s1 = e.rotate_right(6) ^ e.rotate_right(11) ^ e.rotate_right(25);
    let ch = (e & f) ^ (!e & g);
    let s0 = a.rotate_right(2) ^ a.rotate_right(13) ^ a.rotate_right(22);
    let maj = (a & b) ^ (a & c) ^ (b & c);
    (s1, ch, s0.wrapping_add(maj))
}

/// One register rotation step: fold `temp1`/`temp2` into the eight
/// working registers, shifting each down by one.
const fn rotate_registers(regs: &mut [u32; 8], temp1: u32, temp2: u32) {
    let [a, b, c, d, e, f, g, _] = *regs;
    regs[7] = g;
    regs[6] = f;
    regs[5] = e;
    regs[4] = d.wrapping_add(temp1);
    regs[3] = c;
    regs[2] = b;
    regs[1] = a;
    regs[0] = temp1.wrapping_add(temp2);
}

/// Compresses one 64-byte block into the running state.
///
/// `quantum_mix` is the message-wide mixing accumulator: it is XORed
/// into every step's `temp1` and updated by this block's quantum stage
/// before the distinguished 65th step consumes it. `neural_active`
/// carries the caller's per-block activation predicate
/// (see [`crate::kernels::neural_predicate`]).
pub fn compress(
    state: &mut [u32; 8],
    block: &[u8; BLOCK_SIZE],
    quantum_mix: &mut u32,
    neural_active: bool,
) {
    let w = expand_schedule(block);
    let mut regs = *state;

    for round in 0..4 {
        // Step inputs are snapshotted at round entry; the sixteen steps
        // of a round reuse them with the shifting h register.
        let (s1, ch, temp2) = step_inputs(&regs);

        for step in 0..16 {
            let ri = step * round;
            let temp1 = regs[7]
                .wrapping_add(s1)
                .wrapping_add(ch)
                .wrapping_add(ROUND_KEYS[ri])
                .wrapping_add(w[ri])
                ^ *quantum_mix;
            rotate_registers(&mut regs, temp1, temp2);
        }

        mix_window(&mut regs, 0);
        mix_window(&mut regs, 4);
    }

    if neural_active {
        // Absorb the rounds into the state, perturb it through the
        // network, and reload the working registers from the result.
        for (s, r) in state.iter_mut().zip(regs.iter()) {
            *s = s.wrapping_add(*r);
        }
        neural::perturb(state);
        regs = *state;
    }

    {
        // Distinguished 65th step: the quantum stage updates the
        // accumulator, which lands in this step's temp1.
        let (s1, ch, temp2) = step_inputs(&regs);

        *quantum_mix ^= quantum::measure_fold(&regs);

        let temp1 = regs[7]
            .wrapping_add(s1)
            .wrapping_add(ch)
            .wrapping_add(ROUND_KEYS[63])
            .wrapping_add(w[63])
            ^ *quantum_mix;
        rotate_registers(&mut regs, temp1, temp2);
    }

    mix_window(&mut regs, 0);
    mix_window(&mut regs, 4);

    // Merkle–Damgård feed-forward.
    for (s, r) in state.iter_mut().zip(regs.iter()) {
        *s = s.wrapping_add(*r);
    }
}

/// Full per-block transform: compression followed by the between-block
/// mixing pass. This is the unit both the streaming and one-shot paths
/// apply once per 64-byte block.
pub fn process_block(
    state: &mut [u32; 8],
    block: &[u8; BLOCK_SIZE],
    quantum_mix: &mut u32,
    neural_active: bool,
) {
    compress(state, block, quantum_mix, neural_active);
    mix_between_blocks(state);
}

/// Direct 64-byte to 32-byte transform: one pre-formed block compressed
/// straight from the initial state with a fresh accumulator, bypassing
/// padding. Used for combining two 32-byte digests in tree hashing.
pub fn pair64(out: &mut [u8; OUTPUT_SIZE], input: &[u8; BLOCK_SIZE]) {
    let mut state = INITIAL_STATE;
    let mut quantum_mix = 0u32;
    let neural_active = crate::kernels::neural_predicate(input[0], 0);
    process_block(&mut state, input, &mut quantum_mix, neural_active);
    for (chunk, word) in out.chunks_exact_mut(4).zip(state.iter()) {
        chunk.copy_from_slice(&word.to_be_bytes());
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_first_words_are_big_endian() {
        let mut block = [0u8; BLOCK_SIZE];
        block[..4].copy_from_slice(&[0x01, 0x02, 0x03, 0x04]);
        block[60..].copy_from_slice(&[0xaa, 0xbb, 0xcc, 0xdd]);
        let w = expand_schedule(&block);
        assert_eq!(w[0], 0x0102_0304);
        assert_eq!(w[15], 0xaabb_ccdd);
    }

    #[test]
    fn schedule_recurrence_matches_definition() {
        let mut block = [0u8; BLOCK_SIZE];
        for (i, byte) in block.iter_mut().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            {
                *byte = i as u8;
            }
        }
        let w = expand_schedule(&block);
        let s0 = w[1].rotate_right(7) ^ w[1].rotate_right(18) ^ (w[1] >> 3);
        let s1 = w[14].rotate_right(17) ^ w[14].rotate_right(19) ^ (w[14] >> 10);
        assert_eq!(
            w[16],
            w[0].wrapping_add(s0).wrapping_add(w[9]).wrapping_add(s1)
        );
    }

    #[test]
    fn compress_is_deterministic() {
        let block = [0x5au8; BLOCK_SIZE];
        let mut s1 = INITIAL_STATE;
        let mut s2 = INITIAL_STATE;
        let (mut q1, mut q2) = (0u32, 0u32);
        compress(&mut s1, &block, &mut q1, true);
        compress(&mut s2, &block, &mut q2, true);
        assert_eq!(s1, s2);
        assert_eq!(q1, q2);
    }

    #[test]
    fn accumulator_feeds_back_into_state() {
        let block = [0u8; BLOCK_SIZE];
        let mut s1 = INITIAL_STATE;
        let mut s2 = INITIAL_STATE;
        let mut q1 = 0u32;
        let mut q2 = 0xffff_ffffu32;
        compress(&mut s1, &block, &mut q1, false);
        compress(&mut s2, &block, &mut q2, false);
        assert_ne!(s1, s2, "accumulator must influence the block transform");
    }

    #[test]
    fn neural_branch_changes_output() {
        let block = [0x11u8; BLOCK_SIZE];
        let mut with_nl = INITIAL_STATE;
        let mut without_nl = INITIAL_STATE;
        let (mut q1, mut q2) = (0u32, 0u32);
        compress(&mut with_nl, &block, &mut q1, true);
        compress(&mut without_nl, &block, &mut q2, false);
        assert_ne!(with_nl, without_nl);
    }

    #[test]
    fn pair64_is_deterministic() {
        let mut input = [0u8; BLOCK_SIZE];
        for (chunk, word) in input.chunks_exact_mut(4).zip(INITIAL_STATE.iter().cycle()) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        let mut out1 = [0u8; OUTPUT_SIZE];
        let mut out2 = [0u8; OUTPUT_SIZE];
        pair64(&mut out1, &input);
        pair64(&mut out2, &input);
        assert_eq!(out1, out2);
        assert_ne!(out1, [0u8; OUTPUT_SIZE]);
    }
}
