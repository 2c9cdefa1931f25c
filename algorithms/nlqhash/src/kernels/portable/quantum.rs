//! Quantum-Simulated Mixing Stage
//!
//! A fresh 2-qubit register is built per block from the eight working
//! registers, pushed through a fixed circuit (two Hadamards, four
//! parametrized rotations, one CNOT), and "measured" by projecting onto
//! the `|00>` outcome. Five scalars fall out of the projection — the
//! outcome probability and the real/imaginary parts of the first two
//! components of the collapsed state — and each is mapped back to a
//! 32-bit word and folded into the caller's mixing accumulator.
//!
//! The simulation is a pure function of the working registers: no
//! wall-clock, no hardware RNG, no thread identity. Reading the fixed
//! outcome `|00>` instead of sampling one keeps the stage reproducible
//! across runs and platforms, which the consensus rule depends on.

use num_complex::Complex;

/// Amplitudes of a 2-qubit register. Index bit 1 is qubit 0, bit 0 is
/// qubit 1 (qubit 0 is the most significant, as in `|q0 q1>`).
type Register = [Complex<f64>; 4];

// =============================================================================
// GATES
// =============================================================================

/// Rotation about the X axis: `[[cos(t/2), -i sin(t/2)], [-i sin(t/2), cos(t/2)]]`.
fn rx(theta: f64) -> [[Complex<f64>; 2]; 2] {
    let (s, c) = ((theta / 2.0).sin(), (theta / 2.0).cos());
    [
        [Complex::new(c, 0.0), Complex::new(0.0, -s)],
        [Complex::new(0.0, -s), Complex::new(c, 0.0)],
    ]
}

/// Rotation about the Y axis: `[[cos(t/2), -sin(t/2)], [sin(t/2), cos(t/2)]]`.
fn ry(theta: f64) -> [[Complex<f64>; 2]; 2] {
    let (s, c) = ((theta / 2.0).sin(), (theta / 2.0).cos());
    [
        [Complex::new(c, 0.0), Complex::new(-s, 0.0)],
        [Complex::new(s, 0.0), Complex::new(c, 0.0)],
    ]
}

/// Rotation about the Z axis: `diag(e^{-it/2}, e^{it/2})`.
fn rz(theta: f64) -> [[Complex<f64>; 2]; 2] {
    let (s, c) = ((theta / 2.0).sin(), (theta / 2.0).cos());
    [
        [Complex::new(c, -s), Complex::new(0.0, 0.0)],
        [Complex::new(0.0, 0.0), Complex::new(c, s)],
    ]
}

/// Applies a single-qubit gate to qubit `q` (0 or 1) of the register.
fn apply_single(reg: &mut Register, q: usize, m: &[[Complex<f64>; 2]; 2]) {
    // Amplitude pairs that differ only in the target qubit's bit.
    let pairs: [(usize, usize); 2] = if q == 0 { [(0, 2), (1, 3)] } else { [(0, 1), (2, 3)] };
    for (lo, hi) in pairs {
        let (a, b) = (reg[lo], reg[hi]);
        reg[lo] = m[0][0] * a + m[0][1] * b;
        reg[hi] = m[1][0] * a + m[1][1] * b;
    }
}

/// CNOT with qubit 0 as control and qubit 1 as target: swaps `|10>` and `|11>`.
fn apply_cnot(reg: &mut Register) {
    reg.swap(2, 3);
}

// =============================================================================
// SCALAR MAPPING
// =============================================================================

/// Maps a 32-bit word into the unit interval.
fn normalize(x: u32) -> f64 {
    f64::from(x) / f64::from(u32::MAX)
}

/// Maps a unit-interval scalar back to a 32-bit word, saturating at the
/// interval ends so out-of-range inputs (negative amplitude components)
/// collapse to 0 rather than wrapping.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn denormalize(x: f64) -> u32 {
    (x * f64::from(u32::MAX)) as u32
}

// =============================================================================
// MIXING STAGE
// =============================================================================

/// Runs the 2-qubit circuit for one block and returns the XOR-fold of
/// the five measurement scalars. The caller XORs the result into the
/// message-wide mixing accumulator.
pub fn measure_fold(regs: &[u32; 8]) -> u32 {
    let [a, b, c, d, e, f, g, h] = *regs;

    // |00> through H on both qubits: the uniform superposition (1,1,1,1)/2.
    let mut reg: Register = [Complex::new(0.5, 0.0); 4];

    // Parametrized rotations, angles drawn from register XOR pairs.
    apply_single(&mut reg, 0, &rz(normalize(a ^ e)));
    apply_single(&mut reg, 1, &rx(normalize(b ^ f)));
    apply_single(&mut reg, 0, &ry(normalize(c ^ g)));
    apply_single(&mut reg, 1, &rz(normalize(d ^ h)));

    apply_cnot(&mut reg);

    // Projection onto outcome |00>: probability plus the first two
    // components of the renormalized post-measurement state. The second
    // component of a state collapsed onto |00> is identically zero.
    let p0 = reg[0].norm_sqr();
    let x = if p0 > 0.0 {
        reg[0] / p0.sqrt()
    } else {
        Complex::new(0.0, 0.0)
    };
    let y = Complex::new(0.0, 0.0);

    denormalize(p0)
        ^ denormalize(x.re)
        ^ denormalize(x.im)
        ^ denormalize(y.re)
        ^ denormalize(y.im)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn circuit_norm(regs: &[u32; 8]) -> f64 {
        let [a, b, c, d, e, f, g, h] = *regs;
        let mut reg: Register = [Complex::new(0.5, 0.0); 4];
        apply_single(&mut reg, 0, &rz(normalize(a ^ e)));
        apply_single(&mut reg, 1, &rx(normalize(b ^ f)));
        apply_single(&mut reg, 0, &ry(normalize(c ^ g)));
        apply_single(&mut reg, 1, &rz(normalize(d ^ h)));
        apply_cnot(&mut reg);
        reg.iter().map(num_complex::Complex::norm_sqr).sum()
    }

    #[test]
    fn circuit_preserves_norm() {
        let samples: [[u32; 8]; 3] = [
            [0; 8],
            [1, 2, 3, 4, 5, 6, 7, 8],
            [u32::MAX; 8],
        ];
        for regs in samples {
            let norm = circuit_norm(&regs);
            assert!((norm - 1.0).abs() < 1e-12, "norm drifted: {norm}");
        }
    }

    #[test]
    fn fold_is_deterministic() {
        let regs = [0xdead_beef, 1, 2, 3, 4, 5, 6, 7];
        assert_eq!(measure_fold(&regs), measure_fold(&regs));
    }

    #[test]
    fn fold_depends_on_registers() {
        let base = [10, 20, 30, 40, 50, 60, 70, 80];
        let mut flipped = base;
        flipped[0] ^= 1;
        // Not a formal guarantee, but these two inputs produce distinct
        // rotation angles and must not collide.
        assert_ne!(measure_fold(&base), measure_fold(&flipped));
    }

    #[test]
    fn denormalize_saturates() {
        assert_eq!(denormalize(-0.5), 0);
        assert_eq!(denormalize(0.0), 0);
        assert_eq!(denormalize(1.0), u32::MAX);
    }
}
