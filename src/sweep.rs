//! Temperature sweep: one fresh lattice per temperature, equilibrium averages
//! per point, selected time series forwarded to the reporter.

use crate::config::SimConfig;
use crate::error::{IsingError, Result};
use crate::error_analysis::ErrorAnalysis;
use crate::evolution::evolve;
use crate::lattice::Lattice;
use crate::measure::{equilibrium_average, specific_heat, susceptibility, TimeSeries, TimeSeriesAccumulator};
use crate::report::Reporter;
use crate::utils::rng::stream_rng;
use log::{debug, info, warn};
use rand::Rng;
use rayon::prelude::*;

/// Strictly positive temperatures, in sweep order.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureGrid {
    temperatures: Vec<f64>,
}

impl TemperatureGrid {
    pub fn new(temperatures: Vec<f64>) -> Result<Self> {
        if temperatures.is_empty() {
            return Err(IsingError::Configuration("empty temperature grid".into()));
        }
        if let Some(&t) = temperatures.iter().find(|t| !(t.is_finite() && **t > 0.0)) {
            return Err(IsingError::Domain(format!(
                "temperature {t} is not positive; beta = 1/T is undefined"
            )));
        }
        Ok(Self { temperatures })
    }

    /// `n` points of linspace(lo, hi) scaled by `scale` (T_c for the sweep).
    pub fn linear(n: usize, lo: f64, hi: f64, scale: f64) -> Result<Self> {
        let temperatures = match n {
            0 => Vec::new(),
            1 => vec![lo * scale],
            _ => (0..n)
                .map(|k| (lo + (hi - lo) * k as f64 / (n - 1) as f64) * scale)
                .collect(),
        };
        Self::new(temperatures)
    }

    pub fn from_config(cfg: &SimConfig) -> Result<Self> {
        Self::linear(cfg.n_temps, cfg.t_min_ratio, cfg.t_max_ratio, cfg.critical_temperature())
    }

    pub fn temperatures(&self) -> &[f64] {
        &self.temperatures
    }

    pub fn len(&self) -> usize {
        self.temperatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.temperatures.is_empty()
    }
}

/// Equilibrium averages at one temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepPoint {
    pub temperature: f64,
    pub beta: f64,
    pub energy: f64,
    /// Autocorrelation-corrected standard error of `energy`.
    pub energy_err: f64,
    /// Blocked-jackknife error of `energy`.
    pub energy_jack_err: f64,
    pub magnetization: f64,
    pub magnetization_err: f64,
    pub magnetization_jack_err: f64,
    pub abs_magnetization: f64,
    pub specific_heat: f64,
    pub susceptibility: f64,
    pub binder_cumulant: f64,
    pub acceptance_rate: f64,
}

/// Temperature -> averages, one entry per sample in sweep order.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepResult {
    pub critical_temperature: f64,
    pub points: Vec<SweepPoint>,
}

impl SweepResult {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn temperatures(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.temperature).collect()
    }

    pub fn energies(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.energy).collect()
    }

    pub fn magnetizations(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.magnetization).collect()
    }

    /// Point whose temperature equals `temperature` exactly.
    pub fn get(&self, temperature: f64) -> Option<&SweepPoint> {
        self.points.iter().find(|p| p.temperature == temperature)
    }
}

pub struct TemperatureSweep {
    cfg: SimConfig,
    grid: TemperatureGrid,
    side: usize,
    times: Vec<usize>,
}

impl TemperatureSweep {
    /// Validate `cfg` and build the default grid from it.
    pub fn new(cfg: SimConfig) -> Result<Self> {
        cfg.validate()?;
        let grid = TemperatureGrid::from_config(&cfg)?;
        Self::with_grid(cfg, grid)
    }

    pub fn with_grid(cfg: SimConfig, grid: TemperatureGrid) -> Result<Self> {
        cfg.validate()?;
        let side = cfg.side()?;
        let times = TimeSeries::steps(cfg.n_iter);
        Ok(Self { cfg, grid, side, times })
    }

    pub fn config(&self) -> &SimConfig {
        &self.cfg
    }

    pub fn grid(&self) -> &TemperatureGrid {
        &self.grid
    }

    /// Plot label (1, 2, 3) for the first, quarter and last samples.
    pub fn report_label(&self, index: usize) -> Option<usize> {
        let n = self.grid.len();
        let picks = [0, n / 4, n - 1];
        if !picks.contains(&index) {
            return None;
        }
        // Coinciding picks share a label, so count the distinct ones up to here.
        let mut distinct: Vec<usize> = picks.iter().copied().filter(|&p| p <= index).collect();
        distinct.dedup();
        Some(distinct.len())
    }

    /// Sequential sweep drawing everything from one generator.
    pub fn run(&self, rng: &mut impl Rng, reporter: &mut impl Reporter) -> Result<SweepResult> {
        info!(
            "sweep: L = {}, J = {}, {} temperatures, {} steps (cutoff {})",
            self.side, self.cfg.coupling, self.grid.len(), self.cfg.n_iter, self.cfg.t_equil
        );

        let mut points = Vec::with_capacity(self.grid.len());
        for index in 0..self.grid.len() {
            let (point, series) = self.run_point(index, rng)?;
            if let Some(label) = self.report_label(index) {
                reporter.time_series(label, point.temperature, self.cfg.critical_temperature(), &series)?;
            }
            reporter.point(index, &point)?;
            points.push(point);
        }

        self.finish(points, reporter)
    }

    /// Temperature points in parallel, each with its own stream from
    /// `master_seed`. Reporting happens afterwards, in index order.
    pub fn run_parallel(&self, master_seed: u64, reporter: &mut impl Reporter) -> Result<SweepResult> {
        info!(
            "parallel sweep: L = {}, {} temperatures on {} threads",
            self.side,
            self.grid.len(),
            rayon::current_num_threads()
        );

        let outcomes: Vec<(SweepPoint, Option<TimeSeries>)> = (0..self.grid.len())
            .into_par_iter()
            .map(|index| -> Result<(SweepPoint, Option<TimeSeries>)> {
                let mut rng = stream_rng(master_seed, index);
                let (point, series) = self.run_point(index, &mut rng)?;
                let keep = self.report_label(index).map(|_| series);
                Ok((point, keep))
            })
            .collect::<Result<_>>()?;

        let mut points = Vec::with_capacity(outcomes.len());
        for (index, (point, series)) in outcomes.into_iter().enumerate() {
            if let (Some(label), Some(series)) = (self.report_label(index), series) {
                reporter.time_series(label, point.temperature, self.cfg.critical_temperature(), &series)?;
            }
            reporter.point(index, &point)?;
            points.push(point);
        }

        self.finish(points, reporter)
    }

    /// Fresh lattice, full evolution and equilibrium statistics at one grid point.
    pub fn run_point(&self, index: usize, rng: &mut impl Rng) -> Result<(SweepPoint, TimeSeries)> {
        let temperature = self.grid.temperatures()[index];
        let beta = 1.0 / temperature;

        let mut lattice = Lattice::random_with(rng, self.side).ok_or_else(|| {
            IsingError::Configuration(format!("lattice side {} must be positive", self.side))
        })?;
        let evolution = evolve(&self.times, beta, &mut lattice, &self.cfg, rng)?;
        let series = evolution.series;

        let avg = equilibrium_average(&series, self.cfg.t_equil)?;
        let (e_tail, m_tail) = series.tail(self.cfg.t_equil)?;

        let e_stats = TimeSeriesAccumulator::from_slice(e_tail);
        let m_stats = TimeSeriesAccumulator::from_slice(m_tail);
        let e_err = ErrorAnalysis::new(e_tail);
        let m_err = ErrorAnalysis::new(m_tail);

        let reliable = e_err.is_reliable() && m_err.is_reliable();
        let (e_err, m_err) = (e_err.errors(), m_err.errors());
        if !reliable {
            warn!(
                "T = {temperature:.4}: few effective samples (E: {:.1}, M: {:.1}); error bars are rough",
                e_err.n_eff,
                m_err.n_eff
            );
        }

        let n_sites = lattice.n();
        let point = SweepPoint {
            temperature,
            beta,
            energy: avg.energy,
            energy_err: e_err.stat_error,
            energy_jack_err: e_err.jack_error,
            magnetization: avg.magnetization,
            magnetization_err: m_err.stat_error,
            magnetization_jack_err: m_err.jack_error,
            abs_magnetization: m_stats.mean_abs(),
            specific_heat: specific_heat(&e_stats, n_sites, temperature),
            susceptibility: susceptibility(&m_stats, n_sites, temperature),
            binder_cumulant: m_stats.binder_cumulant(),
            acceptance_rate: evolution.acceptance_rate,
        };

        debug!(
            "T = {:.4} (T/Tc = {:.3}): E = {:.4}, M = {:.4}, acc = {:.3}",
            temperature,
            temperature / self.cfg.critical_temperature(),
            point.energy,
            point.magnetization,
            point.acceptance_rate
        );

        Ok((point, series))
    }

    fn finish(&self, points: Vec<SweepPoint>, reporter: &mut impl Reporter) -> Result<SweepResult> {
        let result = SweepResult {
            critical_temperature: self.cfg.critical_temperature(),
            points,
        };
        reporter.sweep(&result)?;
        info!("sweep complete: {} points", result.len());
        Ok(result)
    }
}
