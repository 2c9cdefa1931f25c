//! Neural Perturbation Stage
//!
//! A fixed single-layer feed-forward network (32 inputs, 8 outputs,
//! softsign activation) run over the state bytes once per block when
//! the activation predicate holds. Nothing is trained and nothing is
//! loaded: the weight matrix and biases are derived deterministically
//! from the round-key table, so the stage is a pure function of the
//! current state and the round constants.
//!
//! Softsign (`x / (1 + |x|)`) is used instead of a transcendental
//! activation so the stage stays within exact IEEE 754 arithmetic on
//! every platform.

use crate::kernels::constants::{NL_INPUTS, NL_OUTPUTS, NL_SCALE, ROUND_KEYS};

// =============================================================================
// NETWORK DEFINITION
// =============================================================================

/// Maps a round key to a weight in `[-1, 1]`.
#[allow(clippy::cast_possible_truncation)]
fn key_to_unit(key: u32) -> f32 {
    (f64::from(key) / f64::from(u32::MAX)).mul_add(2.0, -1.0) as f32
}

/// Weight of input `i` into output neuron `o`.
fn weight(o: usize, i: usize) -> f32 {
    let key = ROUND_KEYS[(o * NL_INPUTS + i) % ROUND_KEYS.len()];
    key_to_unit(key.rotate_left(((o + i) % 31 + 1) as u32))
}

/// Bias of output neuron `o`.
fn bias(o: usize) -> f32 {
    key_to_unit(ROUND_KEYS[ROUND_KEYS.len() - 1 - o])
}

/// Softsign activation, exact in f32 arithmetic.
fn softsign(x: f32) -> f32 {
    x / (1.0 + x.abs())
}

// =============================================================================
// FORWARD PASS
// =============================================================================

/// Decomposes the 8-word state into 32 normalized byte inputs
/// (big-endian byte order within each word).
fn state_to_inputs(state: &[u32; 8]) -> [f32; NL_INPUTS] {
    let mut inputs = [0.0f32; NL_INPUTS];
    for (i, word) in state.iter().enumerate() {
        for (j, byte) in word.to_be_bytes().iter().enumerate() {
            inputs[i * 4 + j] = f32::from(*byte) / 255.0;
        }
    }
    inputs
}

/// Runs the forward pass, producing one output per state word.
fn forward(inputs: &[f32; NL_INPUTS]) -> [f32; NL_OUTPUTS] {
    let mut outputs = [0.0f32; NL_OUTPUTS];
    for (o, out) in outputs.iter_mut().enumerate() {
        let mut acc = bias(o);
        for (i, input) in inputs.iter().enumerate() {
            acc = weight(o, i).mul_add(*input, acc);
        }
        *out = softsign(acc);
    }
    outputs
}

// =============================================================================
// STATE PERTURBATION
// =============================================================================

/// Feeds the state through the network and XORs the scaled, truncated
/// outputs back into the state words, chained with the round keys and
/// each word's predecessor.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn perturb(state: &mut [u32; 8]) {
    let outputs = forward(&state_to_inputs(state));

    for i in 1..10 {
        let scaled = (outputs[i % NL_OUTPUTS] * NL_SCALE) as u32;
        state[i % 8] ^= scaled ^ ROUND_KEYS[i] ^ state[(i - 1) % 8];
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outputs_stay_in_open_unit_interval() {
        let outputs = forward(&state_to_inputs(&[u32::MAX; 8]));
        for out in outputs {
            assert!(out.abs() < 1.0, "softsign output escaped (-1, 1): {out}");
        }
    }

    #[test]
    fn perturb_is_pure() {
        let mut s1 = [7u32, 6, 5, 4, 3, 2, 1, 0];
        let mut s2 = s1;
        perturb(&mut s1);
        perturb(&mut s2);
        assert_eq!(s1, s2);
    }

    #[test]
    fn perturb_changes_state() {
        let before = [0x0123_4567u32; 8];
        let mut after = before;
        perturb(&mut after);
        assert_ne!(before, after);
    }

    #[test]
    fn weights_are_stable_across_calls() {
        assert_eq!(weight(3, 17).to_bits(), weight(3, 17).to_bits());
        assert_eq!(bias(5).to_bits(), bias(5).to_bits());
    }
}
