// observables.rs - Energy and magnetization of a spin configuration

use crate::lattice::Lattice;

/// Thermodynamic snapshot of one configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Snapshot {
    /// Nearest-neighbour interaction energy, each bond counted once.
    pub energy: f64,
    /// Mean spin value, in [-1, 1].
    pub magnetization: f64,
}

/// Σ s_ij (s_up + s_down + s_left + s_right) over the lattice: every bond
/// counted from both ends.
pub fn bond_sum(lattice: &Lattice) -> i64 {
    let side = lattice.side();
    let mut sum: i64 = 0;

    for i in 0..side {
        for j in 0..side {
            sum += (lattice.get(i, j) as i32 * lattice.neighbor_sum(i, j)) as i64;
        }
    }
    sum
}

/// Full O(L²) evaluation of (E, M); E = -J · bond_sum / 2.
pub fn evaluate(lattice: &Lattice, coupling: f64) -> Snapshot {
    Snapshot {
        energy: -coupling * bond_sum(lattice) as f64 / 2.0,
        magnetization: magnetization(lattice),
    }
}

/// Mean magnetization only; O(N) without the bond scan.
pub fn magnetization(lattice: &Lattice) -> f64 {
    lattice.spin_sum() as f64 / lattice.n() as f64
}
