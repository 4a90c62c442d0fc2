//! Square spin lattice with periodic boundaries.

use rand::Rng;
use rand_distr::{Distribution, Uniform};

/// Spin values are stored as `i8` and are always exactly -1 or +1.
pub type Spin = i8;

/// An L×L grid of spins, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lattice {
    side: usize,
    spins: Vec<Spin>,
}

/// Indices `[i-1, i+1, j-1, j+1]` of the four neighbours of `(i, j)`,
/// wrapped onto a torus of side `side`.
///
/// For `side == 1` every neighbour is the site itself; `side` must be at
/// least 1, which every `Lattice` constructor enforces.
#[inline]
pub fn neighbor_indices(i: usize, j: usize, side: usize) -> [usize; 4] {
    let up    = if i == 0 { side - 1 } else { i - 1 };
    let down  = if i + 1 == side { 0 } else { i + 1 };
    let left  = if j == 0 { side - 1 } else { j - 1 };
    let right = if j + 1 == side { 0 } else { j + 1 };
    [up, down, left, right]
}

impl Lattice {
    /// Build a random lattice using a caller-supplied RNG; `None` for
    /// `side == 0`.
    ///
    /// Exactly one uniform draw per cell, row-major: u < 0.5 gives -1,
    /// anything else +1.
    pub fn random_with(rng: &mut impl Rng, side: usize) -> Option<Self> {
        if side == 0 {
            return None;
        }
        let unit = Uniform::new(0.0_f64, 1.0);
        let spins = (0..side * side)
            .map(|_| if unit.sample(rng) < 0.5 { -1 } else { 1 })
            .collect();
        Some(Self { side, spins })
    }

    /// Every site set to `spin` (anything non-negative maps to +1).
    pub fn uniform(side: usize, spin: Spin) -> Option<Self> {
        if side == 0 {
            return None;
        }
        let s = if spin < 0 { -1 } else { 1 };
        Some(Self { side, spins: vec![s; side * side] })
    }

    /// Build from explicit row-major values; `None` if `side` is zero, the
    /// length is not `side²` or a value is not ±1.
    pub fn from_spins(side: usize, spins: Vec<Spin>) -> Option<Self> {
        if side == 0
            || spins.len() != side * side
            || spins.iter().any(|&s| s != 1 && s != -1)
        {
            return None;
        }
        Some(Self { side, spins })
    }

    /// Side length L.
    #[inline(always)]
    pub fn side(&self) -> usize {
        self.side
    }

    /// Number of sites N = L².
    #[inline(always)]
    pub fn n(&self) -> usize {
        self.spins.len()
    }

    #[inline(always)]
    pub fn get(&self, i: usize, j: usize) -> Spin {
        self.spins[i * self.side + j]
    }

    /// Negate the spin at `(i, j)`.
    #[inline(always)]
    pub fn flip(&mut self, i: usize, j: usize) {
        let idx = i * self.side + j;
        self.spins[idx] = -self.spins[idx];
    }

    pub fn spins(&self) -> &[Spin] {
        &self.spins
    }

    /// Coordinates `(i-1, j), (i+1, j), (i, j-1), (i, j+1)` under wraparound.
    pub fn neighbors(&self, i: usize, j: usize) -> [(usize, usize); 4] {
        let [up, down, left, right] = neighbor_indices(i, j, self.side);
        [(up, j), (down, j), (i, left), (i, right)]
    }

    /// Σ s over the four neighbours of `(i, j)`.
    #[inline]
    pub fn neighbor_sum(&self, i: usize, j: usize) -> i32 {
        self.neighbors(i, j)
            .iter()
            .map(|&(a, b)| self.get(a, b) as i32)
            .sum()
    }

    /// Σ s over the whole lattice.
    pub fn spin_sum(&self) -> i64 {
        self.spins.iter().map(|&s| s as i64).sum()
    }

    /// Σ s over the neighbours of `(i, j)` that are not the site itself.
    ///
    /// On an L = 1 torus every neighbour wraps back onto the site, and s·s
    /// is unchanged by a flip, so those entries are skipped.
    #[inline]
    pub fn local_field(&self, i: usize, j: usize) -> i32 {
        self.neighbors(i, j)
            .iter()
            .filter(|&&(a, b)| (a, b) != (i, j))
            .map(|&(a, b)| self.get(a, b) as i32)
            .sum()
    }

    /// Energy change of flipping `(i, j)` with coupling `coupling`.
    ///
    /// Only the bonds touching the site change: ΔE = 2 J s_ij h_ij, with
    /// h_ij the [`local_field`](Self::local_field).
    #[inline]
    pub fn delta_energy(&self, i: usize, j: usize, coupling: f64) -> f64 {
        let s = self.get(i, j) as i32;
        2.0 * coupling * (s * self.local_field(i, j)) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn random_lattice_holds_only_unit_spins() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let lat = Lattice::random_with(&mut rng, 16).unwrap();
        assert_eq!(lat.n(), 256);
        assert!(lat.spins().iter().all(|&s| s == 1 || s == -1));
        // Both values should appear on 256 fair draws.
        assert!(lat.spins().contains(&1) && lat.spins().contains(&-1));
    }

    #[test]
    fn same_seed_same_lattice() {
        let a = Lattice::random_with(&mut ChaCha20Rng::seed_from_u64(11), 9).unwrap();
        let b = Lattice::random_with(&mut ChaCha20Rng::seed_from_u64(11), 9).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn from_spins_rejects_bad_input() {
        assert!(Lattice::from_spins(2, vec![1, -1, 1]).is_none());
        assert!(Lattice::from_spins(2, vec![1, -1, 0, 1]).is_none());
        assert!(Lattice::from_spins(2, vec![1, -1, -1, 1]).is_some());
        assert!(Lattice::from_spins(0, vec![]).is_none());
    }

    #[test]
    fn zero_side_is_rejected() {
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        assert!(Lattice::random_with(&mut rng, 0).is_none());
        assert!(Lattice::uniform(0, 1).is_none());
        // No draws were spent on the rejected lattice.
        let mut fresh = ChaCha20Rng::seed_from_u64(0);
        assert_eq!(rng.gen::<u64>(), fresh.gen::<u64>());
    }

    #[test]
    fn single_site_wraps_to_itself() {
        assert_eq!(neighbor_indices(0, 0, 1), [0, 0, 0, 0]);
        let lat = Lattice::uniform(1, 1).unwrap();
        assert_eq!(lat.neighbors(0, 0), [(0, 0); 4]);
        assert_eq!(lat.delta_energy(0, 0, 1.0), 0.0);
    }

    #[test]
    fn flip_twice_is_identity() {
        let mut lat = Lattice::random_with(&mut ChaCha20Rng::seed_from_u64(3), 5).unwrap();
        let before = lat.clone();
        lat.flip(2, 4);
        assert_ne!(lat, before);
        lat.flip(2, 4);
        assert_eq!(lat, before);
    }
}
