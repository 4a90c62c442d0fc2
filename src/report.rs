//! Reporting side of the sweep: consumers of time series and sweep results.
//!
//! The simulation never renders anything itself; it hands plain data to a
//! `Reporter`.

use crate::error::Result;
use crate::measure::TimeSeries;
use crate::sweep::{SweepPoint, SweepResult};
use csv::WriterBuilder;
use std::fs;
use std::path::PathBuf;

pub trait Reporter {
    /// Full evolution at one temperature, tagged with a sequential label.
    fn time_series(
        &mut self,
        label: usize,
        temperature: f64,
        critical_temperature: f64,
        series: &TimeSeries,
    ) -> Result<()>;

    /// Called once per finished temperature point, in sweep order.
    fn point(&mut self, _index: usize, _point: &SweepPoint) -> Result<()> {
        Ok(())
    }

    /// Averages for the whole sweep.
    fn sweep(&mut self, result: &SweepResult) -> Result<()>;
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn time_series(&mut self, _: usize, _: f64, _: f64, _: &TimeSeries) -> Result<()> {
        Ok(())
    }

    fn sweep(&mut self, _: &SweepResult) -> Result<()> {
        Ok(())
    }
}

/// One forwarded evolution.
#[derive(Debug, Clone)]
pub struct ReportedSeries {
    pub label: usize,
    pub temperature: f64,
    pub series: TimeSeries,
}

/// Keeps every report in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryReporter {
    pub series: Vec<ReportedSeries>,
    pub points_seen: usize,
    pub result: Option<SweepResult>,
}

impl Reporter for MemoryReporter {
    fn time_series(&mut self, label: usize, temperature: f64, _: f64, series: &TimeSeries) -> Result<()> {
        self.series.push(ReportedSeries { label, temperature, series: series.clone() });
        Ok(())
    }

    fn point(&mut self, _: usize, _: &SweepPoint) -> Result<()> {
        self.points_seen += 1;
        Ok(())
    }

    fn sweep(&mut self, result: &SweepResult) -> Result<()> {
        self.result = Some(result.clone());
        Ok(())
    }
}

/// Writes `evolution_{label}.csv` per forwarded series and `sweep.csv`.
#[derive(Debug, Clone)]
pub struct CsvReporter {
    dir: PathBuf,
}

impl CsvReporter {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn evolution_path(&self, label: usize) -> PathBuf {
        self.dir.join(format!("evolution_{label}.csv"))
    }

    pub fn sweep_path(&self) -> PathBuf {
        self.dir.join("sweep.csv")
    }
}

impl Reporter for CsvReporter {
    fn time_series(&mut self, label: usize, temperature: f64, tc: f64, series: &TimeSeries) -> Result<()> {
        let mut wtr = WriterBuilder::new().from_path(self.evolution_path(label))?;
        wtr.write_record(["t", "energy", "magnetization", "T", "T_over_Tc"])?;

        let t_str = temperature.to_string();
        let ratio_str = (temperature / tc).to_string();
        for (t, (e, m)) in series.energy.iter().zip(&series.magnetization).enumerate() {
            wtr.write_record(&[
                t.to_string(),
                e.to_string(),
                m.to_string(),
                t_str.clone(),
                ratio_str.clone(),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }

    fn sweep(&mut self, result: &SweepResult) -> Result<()> {
        let mut wtr = WriterBuilder::new().from_path(self.sweep_path())?;
        wtr.write_record([
            "T", "T_over_Tc", "beta", "energy", "energy_err", "energy_jack_err",
            "magnetization", "magnetization_err", "magnetization_jack_err",
            "abs_magnetization", "specific_heat",
            "susceptibility", "binder", "acceptance",
        ])?;

        for p in &result.points {
            wtr.write_record(&[
                p.temperature.to_string(),
                (p.temperature / result.critical_temperature).to_string(),
                p.beta.to_string(),
                p.energy.to_string(),
                p.energy_err.to_string(),
                p.energy_jack_err.to_string(),
                p.magnetization.to_string(),
                p.magnetization_err.to_string(),
                p.magnetization_jack_err.to_string(),
                p.abs_magnetization.to_string(),
                p.specific_heat.to_string(),
                p.susceptibility.to_string(),
                p.binder_cumulant.to_string(),
                p.acceptance_rate.to_string(),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }
}
