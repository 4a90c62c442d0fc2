//! Single-spin-flip Metropolis update.

use crate::lattice::Lattice;
use rand::Rng;

/// Returned by `metropolis_step`, allows O(1) book-keeping in the driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepInfo {
    pub accepted: bool,
    /// Site that was proposed for flipping.
    pub site: (usize, usize),
    /// Energy change of the proposed flip (reported even when rejected).
    pub delta_energy: f64,
    /// Change in mean magnetization actually applied (0 if rejected).
    pub delta_magnetization: f64,
}

/// Metropolis acceptance: ΔE ≤ 0 is always kept without consuming a draw,
/// otherwise keep iff p < exp(-β ΔE) for p ~ U[0, 1).
#[inline]
pub fn accept(delta_energy: f64, beta: f64, rng: &mut impl Rng) -> bool {
    if delta_energy <= 0.0 {
        true
    } else {
        rng.gen::<f64>() < (-beta * delta_energy).exp()
    }
}

/// Propose flipping a uniformly random site and accept/reject it.
///
/// Draw order is fixed: row, column, then (only for ΔE > 0) the acceptance
/// draw. ΔE comes from the four local bonds, so the step is O(1).
pub fn metropolis_step(
    lattice: &mut Lattice,
    beta: f64,
    coupling: f64,
    rng: &mut impl Rng,
) -> StepInfo {
    let side = lattice.side();
    let i = rng.gen_range(0..side);
    let j = rng.gen_range(0..side);

    let delta_energy = lattice.delta_energy(i, j, coupling);
    let accepted = accept(delta_energy, beta, rng);

    let delta_magnetization = if accepted {
        let old = lattice.get(i, j);
        lattice.flip(i, j);
        -2.0 * old as f64 / lattice.n() as f64
    } else {
        0.0
    };

    StepInfo { accepted, site: (i, j), delta_energy, delta_magnetization }
}
