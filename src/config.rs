//! Run-time configuration (single source of truth for every run parameter).

use crate::error::{IsingError, Result};

/// Which (E, M) pair the evolution driver records after each step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordConvention {
    /// State after the accept/reject decision.
    #[default]
    Accepted,
    /// Trial energy E₀ + ΔE (even when the flip was rejected) paired with the
    /// magnetization from before the flip.
    Trial,
}

#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Total number of lattice sites N (must be a perfect square).
    pub n_sites: usize,
    /// Coupling constant J.
    pub coupling: f64,
    /// Metropolis steps per temperature, including the initial snapshot.
    pub n_iter: usize,
    /// First step included in the equilibrium averages.
    pub t_equil: usize,
    /// Number of temperature samples.
    pub n_temps: usize,
    /// Lowest sampled temperature as a fraction of T_c.
    pub t_min_ratio: f64,
    /// Highest sampled temperature as a fraction of T_c.
    pub t_max_ratio: f64,
    pub seed: Option<u64>,
    pub convention: RecordConvention,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            n_sites:     81,
            coupling:    1.0,
            n_iter:      8_000,
            t_equil:     6_000,
            n_temps:     100,
            t_min_ratio: 0.01,
            t_max_ratio: 3.0,
            seed:        None,
            convention:  RecordConvention::Accepted,
        }
    }
}

impl SimConfig {
    /// Check every parameter once, before any simulation work starts.
    pub fn validate(&self) -> Result<()> {
        if self.n_sites == 0 || exact_sqrt(self.n_sites).is_none() {
            return Err(IsingError::Configuration(format!(
                "N = {} is not a positive perfect square",
                self.n_sites
            )));
        }
        if !self.coupling.is_finite() {
            return Err(IsingError::Configuration(format!(
                "coupling J = {} is not finite",
                self.coupling
            )));
        }
        if self.t_equil >= self.n_iter {
            return Err(IsingError::Configuration(format!(
                "equilibration cutoff {} must be below the iteration count {}",
                self.t_equil, self.n_iter
            )));
        }
        if self.n_temps == 0 {
            return Err(IsingError::Configuration(
                "at least one temperature sample is required".into(),
            ));
        }
        if !(self.t_min_ratio.is_finite() && self.t_max_ratio.is_finite())
            || self.t_min_ratio > self.t_max_ratio
        {
            return Err(IsingError::Configuration(format!(
                "invalid temperature range [{}, {}]",
                self.t_min_ratio, self.t_max_ratio
            )));
        }
        Ok(())
    }

    /// Lattice side length L = √N.
    pub fn side(&self) -> Result<usize> {
        exact_sqrt(self.n_sites).ok_or_else(|| {
            IsingError::Configuration(format!("N = {} is not a perfect square", self.n_sites))
        })
    }

    /// Onsager critical temperature T_c = 2J / asinh(1).
    pub fn critical_temperature(&self) -> f64 {
        critical_temperature(self.coupling)
    }
}

/// β_c = asinh(1) / (2J), so T_c = 2J / asinh(1) ≈ 2.269 J.
pub fn critical_temperature(coupling: f64) -> f64 {
    2.0 * coupling / 1.0_f64.asinh()
}

fn exact_sqrt(n: usize) -> Option<usize> {
    let mut root = (n as f64).sqrt() as usize;
    // Float sqrt can land one off for large n.
    while root.checked_mul(root).map_or(true, |sq| sq > n) {
        root -= 1;
    }
    while (root + 1).checked_mul(root + 1).map_or(false, |sq| sq <= n) {
        root += 1;
    }
    (root.checked_mul(root) == Some(n)).then_some(root)
}
