//! Record time-series observables and reduce them to equilibrium averages
use crate::error::{IsingError, Result};
use crate::observables::Snapshot;

/// Energy and magnetization per simulation step, aligned by index.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeSeries {
    pub energy: Vec<f64>,
    pub magnetization: Vec<f64>,
}

impl TimeSeries {
    /// Series of `len` slots, every slot preset to `fill`.
    pub fn filled(len: usize, fill: f64) -> Self {
        Self {
            energy: vec![fill; len],
            magnetization: vec![fill; len],
        }
    }

    /// The canonical time axis `0..n_iter`.
    pub fn steps(n_iter: usize) -> Vec<usize> {
        (0..n_iter).collect()
    }

    pub fn len(&self) -> usize {
        self.energy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.energy.is_empty()
    }

    #[inline]
    pub fn record(&mut self, t: usize, snap: Snapshot) {
        self.energy[t] = snap.energy;
        self.magnetization[t] = snap.magnetization;
    }

    pub fn get(&self, t: usize) -> Option<Snapshot> {
        Some(Snapshot {
            energy: *self.energy.get(t)?,
            magnetization: *self.magnetization.get(t)?,
        })
    }

    /// Slices `[t_equil, end)` of both series.
    pub fn tail(&self, t_equil: usize) -> Result<(&[f64], &[f64])> {
        if t_equil >= self.len() {
            return Err(IsingError::Configuration(format!(
                "equilibration cutoff {} must be below the series length {}",
                t_equil,
                self.len()
            )));
        }
        Ok((&self.energy[t_equil..], &self.magnetization[t_equil..]))
    }
}

/// Arithmetic means of E and M over `[t_equil, end)`.
pub fn equilibrium_average(series: &TimeSeries, t_equil: usize) -> Result<Snapshot> {
    let (e, m) = series.tail(t_equil)?;
    Ok(Snapshot {
        energy: mean(e),
        magnetization: mean(m),
    })
}

fn mean(x: &[f64]) -> f64 {
    x.iter().sum::<f64>() / x.len() as f64
}

/// Time series accumulator for calculating fluctuations
#[derive(Debug, Clone, Default)]
pub struct TimeSeriesAccumulator {
    n: usize,
    sum: f64,
    sum_abs: f64,
    sum_sq: f64,
    sum_4th: f64,
}

impl TimeSeriesAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_slice(values: &[f64]) -> Self {
        let mut acc = Self::new();
        values.iter().for_each(|&v| acc.push(v));
        acc
    }

    pub fn push(&mut self, value: f64) {
        self.n += 1;
        self.sum += value;
        self.sum_abs += value.abs();
        self.sum_sq += value * value;
        self.sum_4th += value.powi(4);
    }

    pub fn count(&self) -> usize {
        self.n
    }

    pub fn mean(&self) -> f64 {
        if self.n == 0 { 0.0 } else { self.sum / self.n as f64 }
    }

    pub fn mean_abs(&self) -> f64 {
        if self.n == 0 { 0.0 } else { self.sum_abs / self.n as f64 }
    }

    pub fn moment2(&self) -> f64 {
        if self.n == 0 { 0.0 } else { self.sum_sq / self.n as f64 }
    }

    pub fn moment4(&self) -> f64 {
        if self.n == 0 { 0.0 } else { self.sum_4th / self.n as f64 }
    }

    /// Population variance ⟨x²⟩ − ⟨x⟩², clamped at zero against round-off.
    pub fn variance(&self) -> f64 {
        if self.n < 2 { return 0.0; }
        (self.moment2() - self.mean().powi(2)).max(0.0)
    }

    /// U₄ = 1 − ⟨x⁴⟩ / (3⟨x²⟩²)
    pub fn binder_cumulant(&self) -> f64 {
        let m2 = self.moment2();
        if m2 > 0.0 {
            1.0 - self.moment4() / (3.0 * m2 * m2)
        } else {
            0.0
        }
    }
}

/// Specific heat per site C = Var(E) / (N T²).
pub fn specific_heat(energy: &TimeSeriesAccumulator, n_sites: usize, temperature: f64) -> f64 {
    energy.variance() / (n_sites as f64 * temperature * temperature)
}

/// Susceptibility χ = N Var(M) / T, with M the mean spin.
pub fn susceptibility(magnetization: &TimeSeriesAccumulator, n_sites: usize, temperature: f64) -> f64 {
    n_sites as f64 * magnetization.variance() / temperature
}
